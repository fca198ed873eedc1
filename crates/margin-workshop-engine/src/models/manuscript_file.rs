use relative_path::{RelativePath, RelativePathBuf};

/// Extensions recognised as manuscripts.
pub const MANUSCRIPT_EXTENSIONS: [&str; 2] = ["txt", "md"];

/// A manuscript on disk, addressed relative to the manuscripts root
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ManuscriptFile {
    relative_path: RelativePathBuf,
    display_name: String,
}

impl ManuscriptFile {
    pub fn new(relative_path: RelativePathBuf) -> Self {
        let display_name = relative_path
            .file_stem()
            .filter(|stem| !stem.is_empty())
            .unwrap_or("Untitled")
            .to_string();

        Self {
            relative_path,
            display_name,
        }
    }

    pub fn relative_path(&self) -> &RelativePath {
        &self.relative_path
    }

    /// File name without its extension, for titles and lists
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Path of the JSON file holding this manuscript's comments
    pub fn comments_path(&self) -> RelativePathBuf {
        let file_name = self.relative_path.file_name().unwrap_or("untitled");
        self.relative_path
            .with_file_name(format!("{file_name}.comments.json"))
    }

    /// Path of the CSV feedback-themes export
    pub fn themes_export_path(&self) -> RelativePathBuf {
        let file_name = self.relative_path.file_name().unwrap_or("untitled");
        self.relative_path
            .with_file_name(format!("{file_name}.themes.csv"))
    }

    /// Stable piece id for comment records: the relative path itself
    pub fn piece_id(&self) -> &str {
        self.relative_path.as_str()
    }

    pub fn is_manuscript_path(path: &str) -> bool {
        !path.ends_with(".comments.json")
            && MANUSCRIPT_EXTENSIONS
                .iter()
                .any(|ext| path.rsplit_once('.').is_some_and(|(_, e)| e == *ext))
    }
}

impl From<&str> for ManuscriptFile {
    fn from(path: &str) -> Self {
        Self::new(RelativePathBuf::from(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn display_name_strips_extension() {
        let file = ManuscriptFile::from("drafts/chapter-one.md");
        assert_eq!(file.display_name(), "chapter-one");
        assert_eq!(file.piece_id(), "drafts/chapter-one.md");
    }

    #[test]
    fn comments_sidecar_sits_next_to_manuscript() {
        let file = ManuscriptFile::from("drafts/story.txt");
        assert_eq!(file.comments_path().as_str(), "drafts/story.txt.comments.json");
        assert_eq!(file.themes_export_path().as_str(), "drafts/story.txt.themes.csv");
    }

    #[rstest]
    #[case("story.txt", true)]
    #[case("notes/story.md", true)]
    #[case("story.txt.comments.json", false)]
    #[case("cover.png", false)]
    #[case("README", false)]
    fn recognises_manuscripts(#[case] path: &str, #[case] expected: bool) {
        assert_eq!(ManuscriptFile::is_manuscript_path(path), expected);
    }
}
