//! The raw, `serde`-deserializable shape of a language transform descriptor
//! JSON document.

use indexmap::IndexMap;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct RawDescriptor {
    pub language: String,
    pub conditions: IndexMap<String, RawCondition>,
    pub transforms: IndexMap<String, RawTransform>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCondition {
    pub name: String,
    pub is_dictionary_form: bool,
    #[serde(default)]
    pub sub_conditions: Option<Vec<String>>,
    #[serde(default)]
    pub i18n: Option<Vec<RawI18n>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawI18n {
    pub language: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawTransform {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub rules: Vec<RawRule>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRule {
    #[serde(rename = "type")]
    pub kind: RawKind,
    /// The literal text a variant matches against, interpreted according to
    /// `kind` (suffix, prefix, whole word, or — for `other` — an arbitrary
    /// regex pattern). Required: every `Variant` in the data model carries a
    /// `pattern_in`, even though the descriptor schema only names the
    /// optional `isInflected` precondition.
    pub pattern_in: String,
    /// Optional additional regex precondition, checked alongside the
    /// `kind`/`pattern_in` match rather than instead of it.
    #[serde(default)]
    pub is_inflected: Option<String>,
    #[serde(default, alias = "deinflect")]
    pub deinflected: Option<String>,
    #[serde(default)]
    pub conditions_in: Vec<String>,
    #[serde(default)]
    pub conditions_out: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RawKind {
    Suffix,
    Prefix,
    #[serde(rename = "wholeword")]
    WholeWord,
    Other,
}
