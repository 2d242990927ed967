use proptest::prelude::*;
use transcript_md::normalize_latex_whitespace;

fn latex_like() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            Just("\n".to_string()),
            Just("\r\n".to_string()),
            Just("  ".to_string()),
            Just("\t".to_string()),
            "[a-z0-9+=^_{}\\\\]{1,6}",
        ],
        0..24,
    )
    .prop_map(|parts| parts.concat())
}

proptest! {
    #[test]
    fn inline_output_is_single_line(text in latex_like()) {
        let normalized = normalize_latex_whitespace(&text, false);
        prop_assert!(!normalized.contains('\n'));
        prop_assert!(!normalized.contains("  "));
        prop_assert_eq!(normalized.trim(), normalized.as_str());
    }

    #[test]
    fn display_output_has_no_edge_blank_lines(text in latex_like()) {
        let normalized = normalize_latex_whitespace(&text, true);
        prop_assert!(!normalized.starts_with('\n'));
        prop_assert!(!normalized.ends_with('\n'));
        prop_assert!(!normalized.contains("\n\n\n"));
        prop_assert!(!normalized.contains('\r'));
    }

    #[test]
    fn normalization_is_idempotent(text in latex_like(), display in any::<bool>()) {
        let once = normalize_latex_whitespace(&text, display);
        prop_assert_eq!(normalize_latex_whitespace(&once, display), once);
    }
}

#[test]
fn test_display_keeps_interior_structure() {
    assert_eq!(
        normalize_latex_whitespace("\n\nx=1\n\n\ny=2\n\n", true),
        "x=1\n\ny=2"
    );
}

#[test]
fn test_inline_joins_lines() {
    assert_eq!(normalize_latex_whitespace("a\n   b", false), "a b");
}
