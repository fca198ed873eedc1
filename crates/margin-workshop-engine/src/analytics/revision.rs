use std::sync::OnceLock;

use regex::Regex;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VersionError {
    #[error("Malformed version number: {0}")]
    Malformed(String),
    #[error("Version content is empty")]
    EmptyContent,
}

/// Number of whitespace-separated words.
pub fn word_count(text: &str) -> usize {
    static WORD_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = WORD_REGEX.get_or_init(|| Regex::new(r"\S+").expect("Invalid word regex"));
    regex.find_iter(text).count()
}

/// Signed word-count difference, formatted `+N` or `-N`.
pub fn word_count_change(old_text: &str, new_text: &str) -> String {
    let change = word_count(new_text) as i64 - word_count(old_text) as i64;
    if change >= 0 {
        format!("+{change}")
    } else {
        change.to_string()
    }
}

/// Version label for the next revision of a manuscript.
///
/// A manuscript without a version is implicitly `1.0`, so its first revision
/// is `2.0`. Major revisions bump the major number and reset the minor; minor
/// revisions bump the minor number. A missing minor part counts as zero.
pub fn next_version_number(current: Option<&str>, is_major: bool) -> Result<String, VersionError> {
    let Some(current) = current.map(str::trim).filter(|c| !c.is_empty()) else {
        return Ok("2.0".to_string());
    };

    let malformed = || VersionError::Malformed(current.to_string());
    let mut parts = current.split('.');
    let major: u32 = parts
        .next()
        .and_then(|p| p.parse().ok())
        .ok_or_else(malformed)?;
    let minor: u32 = match parts.next() {
        Some(p) => p.parse().map_err(|_| malformed())?,
        None => 0,
    };
    if parts.next().is_some() {
        return Err(malformed());
    }

    Ok(if is_major {
        format!("{}.0", major.checked_add(1).ok_or_else(malformed)?)
    } else {
        format!("{major}.{}", minor.checked_add(1).ok_or_else(malformed)?)
    })
}

/// A revision of a manuscript, ready to hand to the data layer.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Revision {
    pub version_number: String,
    pub content: String,
    pub word_count: usize,
    pub notes: String,
    pub is_major: bool,
}

impl Revision {
    /// Prepare the next revision after `current`. Content must not be blank.
    pub fn next(
        current: Option<&str>,
        content: &str,
        notes: &str,
        is_major: bool,
    ) -> Result<Self, VersionError> {
        if content.trim().is_empty() {
            return Err(VersionError::EmptyContent);
        }
        Ok(Self {
            version_number: next_version_number(current, is_major)?,
            content: content.to_string(),
            word_count: word_count(content),
            notes: notes.trim().to_string(),
            is_major,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("", 0)]
    #[case("   ", 0)]
    #[case("one", 1)]
    #[case("  The quick\n\tbrown   fox ", 4)]
    fn counts_words(#[case] text: &str, #[case] expected: usize) {
        assert_eq!(word_count(text), expected);
    }

    #[test]
    fn word_count_change_is_signed() {
        assert_eq!(word_count_change("a b c", "a b c d e"), "+2");
        assert_eq!(word_count_change("a b c", "a"), "-2");
        assert_eq!(word_count_change("a", "b"), "+0");
    }

    #[rstest]
    #[case(None, false, "2.0")]
    #[case(Some("1.0"), true, "2.0")]
    #[case(Some("1.0"), false, "1.1")]
    #[case(Some("2.3"), false, "2.4")]
    #[case(Some("3"), false, "3.1")]
    #[case(Some("3"), true, "4.0")]
    fn version_numbers(#[case] current: Option<&str>, #[case] major: bool, #[case] expected: &str) {
        assert_eq!(next_version_number(current, major).unwrap(), expected);
    }

    #[test]
    fn malformed_version_is_an_error() {
        assert_eq!(
            next_version_number(Some("v2"), false),
            Err(VersionError::Malformed("v2".to_string()))
        );
        assert!(next_version_number(Some("1.2.3"), false).is_err());
    }

    #[rstest]
    #[case("4294967295.0", true)]
    #[case("1.4294967295", false)]
    fn version_overflow_is_an_error(#[case] current: &str, #[case] major: bool) {
        assert_eq!(
            next_version_number(Some(current), major),
            Err(VersionError::Malformed(current.to_string()))
        );
    }

    #[test]
    fn revision_requires_content() {
        assert_eq!(
            Revision::next(Some("1.0"), "  \n", "", false),
            Err(VersionError::EmptyContent)
        );

        let revision = Revision::next(Some("1.0"), "New ending here", " Rewrote the ending ", true).unwrap();
        assert_eq!(revision.version_number, "2.0");
        assert_eq!(revision.word_count, 3);
        assert_eq!(revision.notes, "Rewrote the ending");
    }
}
