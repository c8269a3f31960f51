//! Synthetic descriptors that exercise the two termination guards directly:
//! the global visited-set cycle guard and the trace depth bound.
//!
//! A かわいげ/かわいい-style case (a zero-constraint rule reachable in one
//! hop from the search's unconstrained initial state) can't pin down these
//! guards: no guard runs before a state's own first expansion. What matters
//! — that the engine cannot be made to loop forever, or to re-walk a state
//! it has already produced — is covered here with descriptors built to
//! exercise exactly that, independent of any specific language's rule data.
//!
//! Every rule here leaves a non-empty stem (`"xa"`/`"xb"`/`"xaa"`, ...,
//! never bare `"a"`/`"b"`): the affix can never consume the whole word, so
//! these fixtures stay meaningful now that `matches_text` rejects a rule
//! whose stem would be empty.
use deinflect_engine::Engine;
use pretty_assertions::assert_eq;

const SWAP_DESCRIPTOR: &str = r#"{
    "language": "test",
    "conditions": {
        "x": { "name": "x", "isDictionaryForm": true }
    },
    "transforms": {
        "swap": {
            "name": "swap",
            "rules": [
                { "type": "suffix", "patternIn": "a", "deinflected": "b", "conditionsIn": [], "conditionsOut": ["x"] },
                { "type": "suffix", "patternIn": "b", "deinflected": "a", "conditionsIn": [], "conditionsOut": ["x"] }
            ]
        }
    }
}"#;

const GROW_DESCRIPTOR: &str = r#"{
    "language": "test",
    "conditions": {
        "x": { "name": "x", "isDictionaryForm": true }
    },
    "transforms": {
        "grow": {
            "name": "grow",
            "rules": [
                { "type": "suffix", "patternIn": "a", "deinflected": "aa", "conditionsIn": [], "conditionsOut": ["x"] }
            ]
        }
    }
}"#;

// `xa <-> xb` is mutually invertible, so a naive walk that didn't track
// visited (text, conditions) pairs would oscillate between them forever.
// The engine must stop once every reachable pair has actually been seen.
#[test]
fn mutually_invertible_rules_terminate_via_the_visited_set() {
    let mut engine = Engine::new();
    engine.add_descriptor(SWAP_DESCRIPTOR).unwrap();
    let results: Vec<_> = engine.transform("xa").collect();

    assert_eq!(results.len(), 3, "exactly {{xa/ALL, xb/x, xa/x}} should be reachable, no more");
    assert!(results.iter().any(|c| c.text == "xa" && c.trace.is_empty()));
    assert!(results.iter().any(|c| c.text == "xb" && c.trace.len() == 1));
    assert!(results.iter().any(|c| c.text == "xa" && c.trace.len() == 2));
}

// `xa -> xaa -> xaaa -> ...` never revisits a (text, conditions) pair, so
// only the depth bound can stop it.
#[test]
fn ever_growing_rule_is_bounded_by_max_depth() {
    let mut engine = Engine::with_max_depth(3);
    engine.add_descriptor(GROW_DESCRIPTOR).unwrap();
    let results: Vec<_> = engine.transform("xa").collect();

    assert_eq!(results.len(), 4, "source plus one candidate per depth up to the bound");
    let longest = results.iter().map(|c| c.trace.len()).max().unwrap();
    assert_eq!(longest, 3);
    assert!(results.iter().any(|c| c.text == "xaaaa"));
    assert!(!results.iter().any(|c| c.text == "xaaaaa"));
}

#[test]
fn default_depth_bound_also_terminates_an_ever_growing_rule() {
    let mut engine = Engine::new();
    engine.add_descriptor(GROW_DESCRIPTOR).unwrap();
    let results: Vec<_> = engine.transform("xa").collect();

    assert_eq!(
        results.iter().map(|c| c.trace.len()).max().unwrap(),
        deinflect_engine::DEFAULT_MAX_TRACE_DEPTH
    );
}
