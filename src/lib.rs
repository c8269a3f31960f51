//! A data-driven morphological deinflection engine: recovers dictionary
//! forms and the transform chains that derive them from inflected surface
//! text, given a JSON language transform descriptor.

mod compile;
mod conditions;
mod descriptor;
mod engine;
mod error;
mod variant;

pub use conditions::{ConditionError, Conditions, MAX_CONDITIONS};
pub use engine::{CandidateState, Engine, Trace, TraceFrame, DEFAULT_MAX_TRACE_DEPTH};
pub use error::LoadError;
