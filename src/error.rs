//! Errors raised while compiling a descriptor. The query path
//! (`Engine::transform`) is total and never fails — see `engine.rs`.

use snafu::Snafu;

use crate::conditions::ConditionError;

#[derive(Debug, Snafu)]
pub enum LoadError {
    #[snafu(display("descriptor is not valid JSON: {source}"))]
    MalformedDescriptor { source: serde_json::Error },

    #[snafu(display("unknown condition `{name}` referenced by transform `{transform}`"))]
    UnknownCondition { name: String, transform: String },

    #[snafu(display("condition declarations form a cycle: {conditions}"))]
    ConditionCycle { conditions: String },

    #[snafu(display(
        "transform `{transform}` rule[{index}] has invalid conditions: {source}"
    ))]
    InvalidConditions {
        source: ConditionError,
        transform: String,
        index: usize,
    },

    #[snafu(display("transform `{transform}` rule[{index}] is malformed: {reason}"))]
    MalformedVariant {
        transform: String,
        index: usize,
        reason: String,
    },

    #[snafu(display(
        "transform `{transform}` rule[{index}] is empty or degenerate (no-op rewrite)"
    ))]
    EmptyOrDegenerateRule { transform: String, index: usize },

    #[snafu(display("transform `{transform}` declares no rules"))]
    EmptyTransform { transform: String },

    #[snafu(display("descriptor declares no condition types"))]
    EmptyConditions,

    #[snafu(display("descriptor declares more than {limit} condition types"))]
    TooManyConditions { limit: u32 },
}
