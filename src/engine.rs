//! The transform engine: breadth-first search over candidate states, and
//! the small query API built on top of it.

use std::collections::{HashSet, VecDeque};

use crate::compile::{self, CompiledTransform};
use crate::conditions::{self, Conditions, ConditionUniverse};
use crate::descriptor::RawDescriptor;
use crate::error::LoadError;

/// Default bound on trace length (number of rules applied). The algorithm
/// calls for "typically <= 16"; this crate fixes it as a compile time
/// default rather than a runtime-configurable default, while still allowing
/// [`Engine::with_max_depth`] for callers that need a different bound.
pub const DEFAULT_MAX_TRACE_DEPTH: usize = 16;

/// One step in a transform trace: the text *before* this rule fired, which
/// transform produced it, and the index of the rule within that transform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceFrame {
    pub text: String,
    pub transform: String,
    pub rule_index: usize,
}

pub type Trace = Vec<TraceFrame>;

/// One node reached by the search: a candidate lemma, the grammatical
/// conditions it satisfies, and the trace of rules that derive the original
/// source text from it, in construction order (lemma -> surface).
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateState {
    pub text: String,
    pub conditions: Conditions,
    pub trace: Trace,
}

/// A compiled, query-able collection of language transform descriptors.
///
/// Cloning a descriptor into an `Engine` is the only mutation this type
/// supports; once built, `Engine` is immutable and safe to share across
/// callers (`Send + Sync`), matching the concurrency model: purely
/// functional, single-threaded per call, no timeouts.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    max_depth: usize,
    transforms: Vec<CompiledTransform>,
    universe: ConditionUniverse,
}

impl Engine {
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_TRACE_DEPTH,
            transforms: Vec::new(),
            universe: ConditionUniverse::new(),
        }
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            max_depth,
            ..Self::new()
        }
    }

    /// Parses and compiles a language transform descriptor from its JSON
    /// text, registering its conditions and transforms into this engine.
    /// Multiple descriptors may be added; their transforms accumulate and
    /// their condition names share one bit-assignment universe.
    pub fn add_descriptor(&mut self, json: &str) -> Result<(), LoadError> {
        let raw: RawDescriptor =
            serde_json::from_str(json).map_err(|source| LoadError::MalformedDescriptor { source })?;
        let compiled = compile::compile(&raw, &mut self.universe)?;
        self.transforms.extend(compiled);
        Ok(())
    }

    /// Returns every candidate lemma reachable from `source`, each paired
    /// with the conditions it satisfies and the rule trace that derives
    /// `source` from it. The first item is always `source` itself,
    /// untransformed (reflexivity).
    ///
    /// The search runs lazily: each candidate is expanded only when the
    /// returned iterator is advanced, so a caller that finds what it needs
    /// and stops early never pays for the unexplored remainder. Breadth
    /// first: candidates are expanded in the order they were discovered, so
    /// shorter transform chains are always produced before longer ones
    /// built on top of them.
    pub fn transform(&self, source: &str) -> Transform<'_> {
        let span = tracing::trace_span!("transform", source_len = source.len());
        let _enter = span.enter();

        if source.is_empty() {
            return Transform {
                queue: VecDeque::new(),
                visited: HashSet::new(),
                transforms: &self.transforms,
                max_depth: self.max_depth,
                emitted: 0,
            };
        }

        let mut visited = HashSet::new();
        visited.insert((source.to_string(), Conditions::ALL.0));

        let mut queue = VecDeque::new();
        queue.push_back(CandidateState {
            text: source.to_string(),
            conditions: Conditions::ALL,
            trace: Vec::new(),
        });

        Transform {
            queue,
            visited,
            transforms: &self.transforms,
            max_depth: self.max_depth,
            emitted: 0,
        }
    }

    /// Looks up the condition flags a named condition resolves to (e.g. to
    /// check whether a dictionary entry tagged with a given part of speech
    /// could be the lemma for some candidate).
    pub fn condition_flags_of(&self, name: &str) -> Result<Conditions, conditions::ConditionError> {
        self.universe.flags_of(name)
    }

    /// Exposes the condition algebra's acceptance predicate directly, for
    /// callers that want to test a candidate's conditions against a set of
    /// required conditions without going through `transform`.
    pub fn conditions_match(&self, have: Conditions, need: Conditions) -> bool {
        conditions::matches(have, need)
    }

    /// The union of every condition type the loaded descriptor(s) marked
    /// `isDictionaryForm`. Callers can test a candidate's `conditions`
    /// against this (via [`Engine::conditions_match`]) to filter for states
    /// that could plausibly be dictionary entries, without needing to know
    /// any specific condition name.
    pub fn dictionary_form_conditions(&self) -> Conditions {
        self.universe.dictionary_form_flags()
    }
}

/// The lazy candidate sequence returned by [`Engine::transform`].
///
/// Holds the work queue and visited set for one search; borrows the
/// engine's compiled transforms for the duration of iteration, so a
/// `Transform` cannot outlive the `Engine` that produced it.
pub struct Transform<'a> {
    queue: VecDeque<CandidateState>,
    visited: HashSet<(String, u64)>,
    transforms: &'a [CompiledTransform],
    max_depth: usize,
    emitted: usize,
}

impl<'a> Iterator for Transform<'a> {
    type Item = CandidateState;

    fn next(&mut self) -> Option<CandidateState> {
        let current = self.queue.pop_front()?;
        self.emitted += 1;

        if current.trace.len() >= self.max_depth {
            tracing::debug!(depth = current.trace.len(), "depth bound reached, not expanding");
            return Some(current);
        }

        for transform in self.transforms {
            if !transform.heuristic.is_match(&current.text).unwrap_or(false) {
                continue;
            }

            for (rule_index, variant) in transform.variants.iter().enumerate() {
                if !conditions::matches(current.conditions, variant.conditions_in) {
                    continue;
                }
                if !variant.matches_text(&current.text) {
                    continue;
                }

                let new_text = variant.apply(&current.text);
                if !self.visited.insert((new_text.clone(), variant.conditions_out.0)) {
                    tracing::debug!(
                        transform = %transform.id,
                        rule_index,
                        "already visited this (text, conditions) state, skipping"
                    );
                    continue;
                }

                let frame = TraceFrame {
                    text: current.text.clone(),
                    transform: transform.id.clone(),
                    rule_index,
                };
                let new_trace = prepend(&current.trace, frame);

                self.queue.push_back(CandidateState {
                    text: new_text,
                    conditions: variant.conditions_out,
                    trace: new_trace,
                });
            }
        }

        Some(current)
    }
}

impl<'a> Drop for Transform<'a> {
    fn drop(&mut self) {
        tracing::trace!(candidates = self.emitted, "transform finished");
    }
}

fn prepend(trace: &[TraceFrame], frame: TraceFrame) -> Trace {
    let mut new_trace = Vec::with_capacity(trace.len() + 1);
    new_trace.push(frame);
    new_trace.extend_from_slice(trace);
    new_trace
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const MINI_DESCRIPTOR: &str = r#"{
        "language": "test",
        "conditions": {
            "v": { "name": "Verb", "isDictionaryForm": true }
        },
        "transforms": {
            "past": {
                "name": "past",
                "rules": [
                    { "type": "suffix", "patternIn": "た", "deinflected": "る", "conditionsIn": [], "conditionsOut": ["v"] }
                ]
            }
        }
    }"#;

    #[test]
    fn reflexivity_source_is_always_first_result() {
        let mut engine = Engine::new();
        engine.add_descriptor(MINI_DESCRIPTOR).unwrap();
        let results: Vec<_> = engine.transform("たべた").collect();
        assert_eq!(results[0].text, "たべた");
        assert_eq!(results[0].trace, Vec::new());
    }

    #[test]
    fn one_hop_transform_produces_expected_trace() {
        let mut engine = Engine::new();
        engine.add_descriptor(MINI_DESCRIPTOR).unwrap();
        let results: Vec<_> = engine.transform("たべた").collect();
        let hit = results.iter().find(|c| c.text == "たべる").unwrap();
        assert_eq!(hit.trace.len(), 1);
        assert_eq!(hit.trace[0].transform, "past");
        assert_eq!(hit.trace[0].text, "たべた");
    }

    #[test]
    fn determinism() {
        let mut engine = Engine::new();
        engine.add_descriptor(MINI_DESCRIPTOR).unwrap();
        let a: Vec<_> = engine.transform("たべた").collect();
        let b: Vec<_> = engine.transform("たべた").collect();
        assert_eq!(a, b);
    }

    #[test]
    fn empty_source_yields_no_candidates() {
        let mut engine = Engine::new();
        engine.add_descriptor(MINI_DESCRIPTOR).unwrap();
        let results: Vec<_> = engine.transform("").collect();
        assert!(results.is_empty());
    }

    #[test]
    fn caller_can_stop_early_without_forcing_full_expansion() {
        let mut engine = Engine::new();
        engine.add_descriptor(MINI_DESCRIPTOR).unwrap();
        let first = engine.transform("たべた").next().unwrap();
        assert_eq!(first.text, "たべた");
    }
}
