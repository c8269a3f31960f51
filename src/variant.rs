//! Compiled variants: one per rule in a transform, holding the matching
//! logic and text rewrite for a single suffix/prefix/whole-word/other match
//! kind.

use fancy_regex::Regex;

use crate::conditions::Conditions;
use crate::descriptor::RawKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Suffix,
    Prefix,
    WholeWord,
    Other,
}

impl From<RawKind> for MatchKind {
    fn from(kind: RawKind) -> Self {
        match kind {
            RawKind::Suffix => MatchKind::Suffix,
            RawKind::Prefix => MatchKind::Prefix,
            RawKind::WholeWord => MatchKind::WholeWord,
            RawKind::Other => MatchKind::Other,
        }
    }
}

/// A single compiled rule: the regex that recognizes inflected text, the
/// literal rewrite it performs, and the condition gates on either side.
#[derive(Debug, Clone)]
pub struct CompiledVariant {
    pub kind: MatchKind,
    pub pattern_in: String,
    pub replacement: String,
    /// The kind-derived heuristic regex (`^pat`, `pat$`, `^pat$`, or, for
    /// `Other`, `pattern_in` used verbatim as the match/rewrite pattern).
    pub is_inflected: Regex,
    /// Optional extra regex precondition from the descriptor's
    /// `isInflected` field, checked in addition to `is_inflected`.
    pub precondition: Option<Regex>,
    pub conditions_in: Conditions,
    pub conditions_out: Conditions,
}

impl CompiledVariant {
    pub fn matches_text(&self, text: &str) -> bool {
        match self.kind {
            // The stem left over after stripping the matched affix must be
            // non-empty: the affix can't consume the whole word.
            MatchKind::Suffix | MatchKind::Prefix => {
                if text.len() <= self.pattern_in.len() {
                    return false;
                }
            }
            MatchKind::WholeWord | MatchKind::Other => {}
        }
        if !self.is_inflected.is_match(text).unwrap_or(false) {
            return false;
        }
        match &self.precondition {
            Some(re) => re.is_match(text).unwrap_or(false),
            None => true,
        }
    }

    pub fn apply(&self, text: &str) -> String {
        match self.kind {
            MatchKind::Suffix => {
                let stem = &text[..text.len() - self.pattern_in.len()];
                format!("{stem}{}", self.replacement)
            }
            MatchKind::Prefix => {
                let stem = &text[self.pattern_in.len()..];
                format!("{}{stem}", self.replacement)
            }
            MatchKind::WholeWord => self.replacement.clone(),
            MatchKind::Other => self
                .is_inflected
                .replace(text, self.replacement.as_str())
                .into_owned(),
        }
    }

    /// A variant is a no-op if it could never change the candidate's state:
    /// same text in as out, and no change of conditions either. Rejected at
    /// load time so the search never needs to special-case it.
    pub fn is_no_op(&self) -> bool {
        self.pattern_in == self.replacement && self.conditions_in == self.conditions_out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditions::Conditions;

    fn suffix_variant(pattern_in: &str, replacement: &str) -> CompiledVariant {
        CompiledVariant {
            kind: MatchKind::Suffix,
            pattern_in: pattern_in.to_string(),
            replacement: replacement.to_string(),
            is_inflected: Regex::new(&format!("{pattern_in}$")).unwrap(),
            precondition: None,
            conditions_in: Conditions::ALL,
            conditions_out: Conditions::ALL,
        }
    }

    #[test]
    fn suffix_rule_does_not_match_when_it_would_erase_the_whole_word() {
        let variant = suffix_variant("た", "る");
        assert!(!variant.matches_text("た"), "stem would be empty");
        assert!(variant.matches_text("食べた"), "non-empty stem is fine");
    }
}
