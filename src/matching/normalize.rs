use once_cell::sync::Lazy;
use regex::Regex;

/// Straight, curly and Hebrew quotation marks (geresh / gershayim) plus backtick.
const QUOTE_CHARS: &[char] = &['\'', '"', '`', '‘', '’', '“', '”', '״', '׳'];

static DISALLOWED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\s\x{0590}-\x{05FF}]").expect("valid disallowed-char regex"));

static WHITESPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Leading honorific: `Dr`, `Dr.`, `ד״ר`, `ד"ר`, `ד'ר`, `דר`, `דוקטור`.
static HONORIFIC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)^\s*(?:dr\.?|ד["״'׳]?ר|דוקטור)(?:\s+|\.\s*)"#)
        .expect("valid honorific regex")
});

/// Which honorific family a name started with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Honorific {
    Latin,
    Hebrew,
}

/// Reduce a raw name to a comparable token string.
///
/// Lower-cases, removes quotes and anything that is not a word character,
/// whitespace or Hebrew letter, then collapses whitespace. Idempotent.
pub fn normalize(raw: &str) -> String {
    let lowered = strip_quotes(&raw.to_lowercase());
    let cleaned = DISALLOWED_RE.replace_all(&lowered, "");
    WHITESPACE_RE.replace_all(&cleaned, " ").trim().to_string()
}

pub fn strip_quotes(raw: &str) -> String {
    raw.chars().filter(|c| !QUOTE_CHARS.contains(c)).collect()
}

/// Split off a leading honorific. Returns the remainder and the honorific family,
/// or the input unchanged when no honorific leads the name.
pub fn split_honorific(name: &str) -> (&str, Option<Honorific>) {
    match HONORIFIC_RE.find(name) {
        Some(found) if found.end() < name.len() => {
            let matched = found.as_str().trim_start();
            let family = if matched
                .chars()
                .next()
                .map(|c| c.is_ascii_alphabetic())
                .unwrap_or(false)
            {
                Honorific::Latin
            } else {
                Honorific::Hebrew
            };
            (name[found.end()..].trim(), Some(family))
        }
        _ => (name.trim(), None),
    }
}

/// Name without its leading honorific.
pub fn strip_honorific(name: &str) -> &str {
    split_honorific(name).0
}

/// Tokens of at least `min_chars` characters.
pub fn tokens(name: &str, min_chars: usize) -> Vec<&str> {
    name.split_whitespace()
        .filter(|token| token.chars().count() >= min_chars)
        .collect()
}

/// Consonant skeleton used for transliteration matching: Latin vowels and
/// whitespace removed.
pub fn consonant_skeleton(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_lowercases_and_collapses_whitespace() {
        assert_eq!(normalize("  Dana   COHEN "), "dana cohen");
        assert_eq!(normalize("Dana\t\nCohen"), "dana cohen");
    }

    #[test]
    fn normalize_strips_quotes_and_punctuation() {
        assert_eq!(normalize("ד״ר שרה לוי"), "דר שרה לוי");
        assert_eq!(normalize("Dr. O'Brien"), "dr obrien");
        assert_eq!(normalize("“Yossi” - Levi!"), "yossi levi");
    }

    #[test]
    fn normalize_returns_empty_for_blank_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \t "), "");
        assert_eq!(normalize("\"'\""), "");
    }

    #[test]
    fn normalize_is_idempotent() {
        let samples = [
            "Dr. Dana Cohen",
            "  ד\"ר   רונית  בר-און ",
            "ד'ר משה",
            "Ñandú  Ärzte",
            "O’Neil, Jr.",
            "İstanbul",
            "a  -  b",
            "",
            "!!!",
            "שם_עם_קו",
        ];
        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "not idempotent for {sample:?}");
        }
    }

    #[test]
    fn split_honorific_recognizes_latin_and_hebrew_forms() {
        assert_eq!(split_honorific("dr dana cohen"), ("dana cohen", Some(Honorific::Latin)));
        assert_eq!(split_honorific("Dr. Dana"), ("Dana", Some(Honorific::Latin)));
        assert_eq!(split_honorific("DR.Dana"), ("Dana", Some(Honorific::Latin)));
        assert_eq!(split_honorific("ד״ר שרה"), ("שרה", Some(Honorific::Hebrew)));
        assert_eq!(split_honorific("ד'ר שרה"), ("שרה", Some(Honorific::Hebrew)));
        assert_eq!(split_honorific("דר שרה"), ("שרה", Some(Honorific::Hebrew)));
        assert_eq!(split_honorific("דוקטור שרה"), ("שרה", Some(Honorific::Hebrew)));
    }

    #[test]
    fn split_honorific_leaves_plain_names_alone() {
        assert_eq!(split_honorific("drora levi"), ("drora levi", None));
        assert_eq!(split_honorific("dana"), ("dana", None));
        // A bare honorific is not stripped down to nothing.
        assert_eq!(split_honorific("dr "), ("dr", None));
    }

    #[test]
    fn skeleton_drops_vowels_and_spaces() {
        assert_eq!(consonant_skeleton("yossi cohen"), "sschn");
        assert_eq!(consonant_skeleton("יוסי כהן"), "יוסיכהן");
    }
}
