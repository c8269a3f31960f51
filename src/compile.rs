//! The descriptor loader: turns a [`RawDescriptor`] into compiled transform
//! tables plus the registered [`ConditionUniverse`], resolving every
//! condition name exactly once.

use fancy_regex::Regex;
use snafu::ResultExt;

use crate::conditions::{ConditionError, ConditionUniverse, MAX_CONDITIONS};
use crate::descriptor::{RawDescriptor, RawRule};
use crate::error::{EmptyTransformSnafu, InvalidConditionsSnafu, LoadError};
use crate::variant::{CompiledVariant, MatchKind};

/// One compiled transform: a name/id pair, its variants in declaration
/// order, and a combined heuristic regex used to skip transforms that can't
/// possibly match before scanning their individual variants.
#[derive(Debug, Clone)]
pub struct CompiledTransform {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub variants: Vec<CompiledVariant>,
    pub heuristic: Regex,
}

fn condition_error_to_load_error(e: ConditionError) -> LoadError {
    match e {
        ConditionError::EmptyTypes => LoadError::EmptyConditions,
        ConditionError::MaxConditions => LoadError::TooManyConditions {
            limit: MAX_CONDITIONS,
        },
        ConditionError::SubRuleCycle { conditions } => LoadError::ConditionCycle { conditions },
        ConditionError::Missing { condition } => LoadError::UnknownCondition {
            name: condition,
            transform: String::new(),
        },
    }
}

fn build_regex(kind: MatchKind, pattern_in: &str) -> Result<Regex, fancy_regex::Error> {
    match kind {
        MatchKind::Prefix => Regex::new(&format!("^{pattern_in}")),
        MatchKind::Suffix => Regex::new(&format!("{pattern_in}$")),
        MatchKind::WholeWord => Regex::new(&format!("^{pattern_in}$")),
        MatchKind::Other => Regex::new(pattern_in),
    }
}

fn compile_rule(
    universe: &ConditionUniverse,
    transform_id: &str,
    index: usize,
    rule: &RawRule,
) -> Result<CompiledVariant, LoadError> {
    if rule.pattern_in.is_empty() {
        return Err(LoadError::MalformedVariant {
            transform: transform_id.to_string(),
            index,
            reason: "patternIn is empty".to_string(),
        });
    }

    let kind = MatchKind::from(rule.kind);
    let is_inflected = build_regex(kind, &rule.pattern_in).map_err(|e| LoadError::MalformedVariant {
        transform: transform_id.to_string(),
        index,
        reason: format!("invalid patternIn regex: {e}"),
    })?;

    let precondition = match &rule.is_inflected {
        Some(pat) => Some(Regex::new(pat).map_err(|e| LoadError::MalformedVariant {
            transform: transform_id.to_string(),
            index,
            reason: format!("invalid isInflected regex: {e}"),
        })?),
        None => None,
    };

    let replacement = rule
        .deinflected
        .clone()
        .unwrap_or_else(|| rule.pattern_in.clone());

    let conditions_in = universe
        .flags_of_all(&rule.conditions_in)
        .context(InvalidConditionsSnafu {
            transform: transform_id.to_string(),
            index,
        })?;
    let conditions_out = universe
        .flags_of_all(&rule.conditions_out)
        .context(InvalidConditionsSnafu {
            transform: transform_id.to_string(),
            index,
        })?;

    let variant = CompiledVariant {
        kind,
        pattern_in: rule.pattern_in.clone(),
        replacement,
        is_inflected,
        precondition,
        conditions_in,
        conditions_out,
    };

    if variant.is_no_op() {
        return Err(LoadError::EmptyOrDegenerateRule {
            transform: transform_id.to_string(),
            index,
        });
    }

    Ok(variant)
}

/// Compiles a raw descriptor's conditions into `universe` (which may already
/// hold condition names from a previously-added descriptor) and returns the
/// compiled transforms for this descriptor.
pub fn compile(
    raw: &RawDescriptor,
    universe: &mut ConditionUniverse,
) -> Result<Vec<CompiledTransform>, LoadError> {
    universe
        .register(&raw.conditions)
        .map_err(condition_error_to_load_error)?;

    let mut compiled = Vec::with_capacity(raw.transforms.len());
    for (transform_id, transform) in &raw.transforms {
        if transform.rules.is_empty() {
            return Err(EmptyTransformSnafu {
                transform: transform_id.clone(),
            }
            .build());
        }

        let mut variants = Vec::with_capacity(transform.rules.len());
        for (index, rule) in transform.rules.iter().enumerate() {
            variants.push(compile_rule(universe, transform_id, index, rule)?);
        }

        let combined_pattern = variants
            .iter()
            .map(|v| v.is_inflected.as_str())
            .collect::<Vec<_>>()
            .join("|");
        let heuristic = Regex::new(&combined_pattern).map_err(|e| LoadError::MalformedVariant {
            transform: transform_id.clone(),
            index: 0,
            reason: format!("failed to build combined heuristic: {e}"),
        })?;

        compiled.push(CompiledTransform {
            id: transform_id.clone(),
            name: transform.name.clone(),
            description: transform.description.clone(),
            variants,
            heuristic,
        });
    }

    Ok(compiled)
}
