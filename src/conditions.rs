//! The condition algebra: a set of grammatical conditions represented as a
//! bitmask, plus the registration pass that assigns bits to condition names
//! declared in a descriptor.

use indexmap::IndexMap;
use std::fmt;

use crate::descriptor::RawCondition;

/// Maximum number of distinct leaf condition types a single engine instance
/// can represent. A descriptor declaring more condition types than fit in
/// the `u64` mask fails loudly instead of wrapping around.
pub const MAX_CONDITIONS: u32 = 64;

/// A set of grammatical conditions, represented as a bitmask.
///
/// The sentinel value `Conditions::ALL` (all bits clear) means
/// "unconstrained" — it matches any `need` mask and is what a candidate
/// state starts with before any rule has fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Conditions(pub u64);

impl Conditions {
    pub const ALL: Conditions = Conditions(0);

    pub fn union(self, other: Conditions) -> Conditions {
        Conditions(self.0 | other.0)
    }

    pub fn is_all(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Binary for Conditions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Binary::fmt(&self.0, f)
    }
}

/// `matches(have, need)` from the condition algebra: a candidate whose
/// current conditions are `have` may take a rule whose `conditionsIn` is
/// `need` when any of:
/// - `have` and `need` share at least one set bit, or
/// - `need` is `ALL` (the rule places no constraint on the incoming stem), or
/// - `have` is `ALL` (the candidate is still unconstrained, e.g. raw source
///   text that hasn't been through any rule yet).
pub fn matches(have: Conditions, need: Conditions) -> bool {
    (have.0 & need.0) != 0 || need.0 == 0 || have.0 == 0
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConditionError {
    #[error("unknown condition: {condition}")]
    Missing { condition: String },
    #[error("no condition types were declared")]
    EmptyTypes,
    #[error("sub-condition cycle: {conditions}")]
    SubRuleCycle { conditions: String },
    #[error("more than {MAX_CONDITIONS} condition types were declared")]
    MaxConditions,
}

/// Resolves condition names to bitmasks for a single engine instance.
///
/// Leaf conditions (no `subConditions`) each get the next free bit. Compound
/// conditions get the union of their (already-resolved) sub-conditions' bits
/// and no bit of their own (e.g. `v` resolves to the union of
/// `v1`/`v5`/`vk`/`vs`/`vz` with no private bit).
#[derive(Debug, Clone, Default)]
pub struct ConditionUniverse {
    next_flag_index: u32,
    flags_of: IndexMap<String, Conditions>,
    dictionary_forms: IndexMap<String, Conditions>,
}

impl ConditionUniverse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers every condition declared in `raw`, resolving sub-condition
    /// references via fixed-point iteration. A pass that makes no progress
    /// means the remaining conditions reference each other in a cycle.
    pub fn register(
        &mut self,
        raw: &IndexMap<String, RawCondition>,
    ) -> Result<(), ConditionError> {
        if raw.is_empty() {
            return Err(ConditionError::EmptyTypes);
        }

        let mut targets: Vec<(&String, &RawCondition)> = raw.iter().collect();
        while !targets.is_empty() {
            let before = targets.len();
            let mut next_targets = Vec::with_capacity(targets.len());

            for (name, cond) in targets {
                let flags = match &cond.sub_conditions {
                    Some(subs) => match self.flags_of_all(subs) {
                        Ok(f) => f,
                        Err(_) => {
                            next_targets.push((name, cond));
                            continue;
                        }
                    },
                    None => {
                        if self.next_flag_index >= MAX_CONDITIONS {
                            return Err(ConditionError::MaxConditions);
                        }
                        let f = Conditions(1u64 << self.next_flag_index);
                        self.next_flag_index += 1;
                        f
                    }
                };
                self.flags_of.insert(name.clone(), flags);
                if cond.is_dictionary_form {
                    self.dictionary_forms.insert(name.clone(), flags);
                }
            }

            if next_targets.len() == before {
                let names = next_targets
                    .iter()
                    .map(|(n, _)| n.as_str())
                    .collect::<Vec<_>>()
                    .join(" -> ");
                return Err(ConditionError::SubRuleCycle { conditions: names });
            }
            targets = next_targets;
        }

        Ok(())
    }

    pub fn flags_of(&self, name: &str) -> Result<Conditions, ConditionError> {
        self.flags_of
            .get(name)
            .copied()
            .ok_or_else(|| ConditionError::Missing {
                condition: name.to_string(),
            })
    }

    /// Unions the flags of every name in `names`. An empty slice resolves to
    /// `Conditions::ALL`, matching a rule's `conditionsIn`/`conditionsOut`
    /// being absent or `[]` in the descriptor JSON.
    pub fn flags_of_all(&self, names: &[String]) -> Result<Conditions, ConditionError> {
        let mut acc = Conditions::ALL;
        for name in names {
            acc = acc.union(self.flags_of(name)?);
        }
        Ok(acc)
    }

    pub fn is_empty(&self) -> bool {
        self.flags_of.is_empty()
    }

    /// The union of every condition type's flags that the descriptor marked
    /// `isDictionaryForm`. A candidate whose conditions overlap this mask
    /// (or are `ALL`) could be a valid lemma; one that doesn't, can't be.
    pub fn dictionary_form_flags(&self) -> Conditions {
        self.dictionary_forms
            .values()
            .fold(Conditions::ALL, |acc, flags| acc.union(*flags))
    }
}
