use std::sync::OnceLock;

use regex::Regex;

use crate::records::Comment;

/// Feedback themes and the keywords that signal them.
const THEME_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "Character Development",
        &["character", "protagonist", "development", "personality", "motivation", "arc", "growth"],
    ),
    (
        "Plot Structure",
        &["plot", "structure", "pacing", "beginning", "middle", "end", "climax", "resolution"],
    ),
    (
        "Dialogue",
        &["dialogue", "conversation", "speech", "voice", "speaking", "says", "said"],
    ),
    (
        "Setting & World",
        &["setting", "world", "place", "environment", "atmosphere", "scene", "location"],
    ),
    (
        "Style & Voice",
        &["style", "voice", "tone", "writing", "flow", "rhythm", "language"],
    ),
    (
        "Emotional Impact",
        &["emotion", "feeling", "impact", "powerful", "moving", "touching", "compelling"],
    ),
    (
        "Clarity & Flow",
        &["clear", "clarity", "confusing", "flow", "smooth", "transition", "connection"],
    ),
];

const MAX_THEMES: usize = 7;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeCount {
    pub name: &'static str,
    pub mentions: usize,
    /// Share of all theme mentions, rounded to a whole percent.
    pub percentage: u32,
}

fn theme_patterns() -> &'static [(&'static str, Vec<Regex>)] {
    static PATTERNS: OnceLock<Vec<(&'static str, Vec<Regex>)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        THEME_KEYWORDS
            .iter()
            .map(|(theme, keywords)| {
                let regexes = keywords
                    .iter()
                    .map(|k| {
                        Regex::new(&format!(r"(?i)\b{}", regex::escape(k)))
                            .expect("Invalid theme keyword regex")
                    })
                    .collect();
                (*theme, regexes)
            })
            .collect()
    })
}

/// Tally which themes a set of comments touches on.
///
/// Each keyword present in a comment (its text plus the selected passage)
/// counts once toward its theme. Keywords match at the start of a word, so
/// "characters" counts for "character" but "friend" does not count for "end".
/// Returns at most seven themes, most mentioned first.
pub fn feedback_themes(comments: &[Comment]) -> Vec<ThemeCount> {
    let mut counts: Vec<(&'static str, usize)> = theme_patterns()
        .iter()
        .map(|(theme, _)| (*theme, 0))
        .collect();

    for comment in comments {
        let text = format!("{} {}", comment.content, comment.selected_text);
        for ((_, patterns), (_, count)) in theme_patterns().iter().zip(counts.iter_mut()) {
            *count += patterns.iter().filter(|p| p.is_match(&text)).count();
        }
    }

    let total: usize = counts.iter().map(|(_, c)| c).sum();
    let mut themes: Vec<ThemeCount> = counts
        .into_iter()
        .filter(|(_, c)| *c > 0)
        .map(|(name, mentions)| ThemeCount {
            name,
            mentions,
            percentage: ((mentions as f64 / total as f64) * 100.0).round() as u32,
        })
        .collect();

    // Stable: equal counts keep table order
    themes.sort_by(|a, b| b.mentions.cmp(&a.mentions));
    themes.truncate(MAX_THEMES);
    themes
}

/// CSV export with a header row, theme names quoted.
pub fn themes_csv(themes: &[ThemeCount]) -> String {
    let mut lines = vec!["Theme,Mentions,Percentage".to_string()];
    lines.extend(
        themes
            .iter()
            .map(|t| format!("\"{}\",{},{}%", t.name, t.mentions, t.percentage)),
    );
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::CommentRecord;
    use pretty_assertions::assert_eq;

    fn comment(content: &str) -> Comment {
        Comment::from_record(CommentRecord {
            id: content.to_string(),
            content: Some(content.to_string()),
            ..CommentRecord::default()
        })
        .unwrap()
    }

    #[test]
    fn counts_keywords_per_theme() {
        let comments = vec![
            comment("The protagonist's motivation is unclear"),
            comment("Great dialogue, the characters sound real"),
        ];

        let themes = feedback_themes(&comments);

        assert_eq!(
            themes,
            vec![
                ThemeCount { name: "Character Development", mentions: 3, percentage: 75 },
                ThemeCount { name: "Dialogue", mentions: 1, percentage: 25 },
            ]
        );
    }

    #[test]
    fn keywords_match_at_word_start_only() {
        let themes = feedback_themes(&[comment("My friend liked it")]);
        assert!(themes.is_empty());
    }

    #[test]
    fn no_comments_no_themes() {
        assert!(feedback_themes(&[]).is_empty());
    }

    #[test]
    fn csv_export() {
        let themes = vec![ThemeCount { name: "Dialogue", mentions: 2, percentage: 100 }];
        insta::assert_snapshot!(themes_csv(&themes), @r#"
        Theme,Mentions,Percentage
        "Dialogue",2,100%
        "#);
    }
}
