//! Persian typography normalization and the Mama response prefix

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Canonical prefix every Mama response starts with
pub const MAMA_PREFIX: &str = "[ماما] ";

/// Persian half-space (zero-width non-joiner)
pub const ZWNJ: char = '\u{200C}';

/// Letters that may follow the continuous-tense prefix "می" / "نمی"
const VERB_INITIALS: &str = "آابپتثجچحخدذرزژسشصضطظعغفقکگلمنوهی";

static NEWLINE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\n\s*").expect("valid newline-run pattern"));

static HORIZONTAL_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\S\n]+").expect("valid whitespace pattern"));

static MISSING_SPACE_AFTER_PUNCT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([.!?،؛])([^\s.!?،؛])").expect("valid punctuation pattern")
});

static SPACE_BEFORE_PUNCT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" +([.!?،؛])").expect("valid punctuation pattern"));

static EXISTING_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:\[(?:mama|ماما)\]\s*)*").expect("valid prefix pattern"));

/// Normalize Persian spacing and punctuation.
///
/// - whitespace runs without a line break collapse to one space
/// - whitespace runs with line breaks collapse to at most two newlines
/// - one space after `. ! ? ، ؛` when a word follows directly
/// - no space before those marks
/// - "می"/"نمی" joined to the following verb with a half-space
/// - leading and trailing whitespace trimmed
///
/// Total and idempotent.
pub fn normalize_persian_text(text: &str) -> String {
    let collapsed = NEWLINE_RUN.replace_all(text, |caps: &Captures| {
        let breaks = caps[0].matches('\n').count().min(2);
        "\n".repeat(breaks)
    });
    let collapsed = HORIZONTAL_RUN.replace_all(&collapsed, " ");
    let spaced = MISSING_SPACE_AFTER_PUNCT.replace_all(&collapsed, "$1 $2");
    let tightened = SPACE_BEFORE_PUNCT.replace_all(&spaced, "$1");
    let joined = join_verb_prefixes(&tightened);

    joined.trim().to_string()
}

/// Replace the plain space in "می X" / "نمی X" with a half-space.
///
/// Scans characters rather than using a substitution pattern so that
/// chained prefixes ("می می‌رود") are all handled in a single pass.
fn join_verb_prefixes(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());

    for (i, &c) in chars.iter().enumerate() {
        let joins = c == ' '
            && i >= 2
            && chars[i - 2] == 'م'
            && chars[i - 1] == 'ی'
            && chars.get(i + 1).is_some_and(|next| VERB_INITIALS.contains(*next));
        out.push(if joins { ZWNJ } else { c });
    }

    out
}

/// Strip any leading `[Mama]`/`[ماما]` prefixes and prepend the canonical one.
///
/// Idempotent: applying it twice equals applying it once.
pub fn enforce_mama_prefix(text: &str) -> String {
    let cleaned = EXISTING_PREFIX.replace(text.trim_start(), "");
    format!("{MAMA_PREFIX}{cleaned}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_spaces() {
        assert_eq!(normalize_persian_text("سلام    ماما   جان"), "سلام ماما جان");
    }

    #[test]
    fn test_caps_newlines_at_two() {
        assert_eq!(normalize_persian_text("خط اول\n\n\n\nخط دوم"), "خط اول\n\nخط دوم");
        assert_eq!(normalize_persian_text("خط اول  \n  خط دوم"), "خط اول\nخط دوم");
    }

    #[test]
    fn test_space_after_punctuation() {
        assert_eq!(normalize_persian_text("سلام،خوبی؟"), "سلام، خوبی؟");
        assert_eq!(normalize_persian_text("تمام شد.بعدی"), "تمام شد. بعدی");
    }

    #[test]
    fn test_no_space_before_punctuation() {
        assert_eq!(normalize_persian_text("سلام ، خوبی !"), "سلام، خوبی!");
    }

    #[test]
    fn test_punctuation_runs_stay_together() {
        assert_eq!(normalize_persian_text("واقعا!!"), "واقعا!!");
        assert_eq!(normalize_persian_text("صبر کن...بعد"), "صبر کن... بعد");
    }

    #[test]
    fn test_zwnj_after_mi_prefix() {
        assert_eq!(normalize_persian_text("من می روم"), "من می\u{200C}روم");
        assert_eq!(normalize_persian_text("او نمی داند"), "او نمی\u{200C}داند");
    }

    #[test]
    fn test_zwnj_chained_prefixes() {
        assert_eq!(
            normalize_persian_text("می می رود"),
            "می\u{200C}می\u{200C}رود"
        );
    }

    #[test]
    fn test_zwnj_not_applied_before_latin() {
        assert_eq!(normalize_persian_text("می test"), "می test");
    }

    #[test]
    fn test_trims() {
        assert_eq!(normalize_persian_text("  \n سلام \n "), "سلام");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize_persian_text(""), "");
        assert_eq!(normalize_persian_text("   \n\t "), "");
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let inputs = [
            "سلام   ماما ،چطوری ؟من می روم.بعد\n\n\n\nمی می رود",
            "a . . b",
            "x!.y",
            "  .a",
            "hello ,world!how are you?fine",
            "می\nرود ؛ و  نمی  خواهد",
            "",
        ];
        for input in inputs {
            let once = normalize_persian_text(input);
            let twice = normalize_persian_text(&once);
            assert_eq!(once, twice, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn test_prefix_added() {
        assert_eq!(enforce_mama_prefix("سلام"), "[ماما] سلام");
    }

    #[test]
    fn test_prefix_replaces_existing() {
        assert_eq!(enforce_mama_prefix("[Mama] سلام"), "[ماما] سلام");
        assert_eq!(enforce_mama_prefix("[MAMA]سلام"), "[ماما] سلام");
        assert_eq!(enforce_mama_prefix("[ماما]   سلام"), "[ماما] سلام");
        assert_eq!(enforce_mama_prefix("  [Mama] [ماما] سلام"), "[ماما] سلام");
        assert_eq!(enforce_mama_prefix("  سلام"), "[ماما] سلام");
    }

    #[test]
    fn test_prefix_is_idempotent() {
        for input in ["", "سلام", "[Mama] x", "[ماما] [Mama] x", "  [ماما] y", "[mama]", "   z"] {
            let once = enforce_mama_prefix(input);
            assert_eq!(enforce_mama_prefix(&once), once, "not idempotent for {input:?}");
        }
    }
}
