use serde::{Deserialize, Serialize};

/// A draft split into where it goes and what it says.
///
/// Serializes to the body the note store expects on `POST /note`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ParsedDraft {
    pub folder: String,
    pub filename: String,
    #[serde(rename = "content")]
    pub body: String,
}

impl ParsedDraft {
    /// Splits raw draft text: line 1 is the folder, line 2 the filename, the rest the body.
    ///
    /// Returns `None` when there are fewer than three lines or when the folder or
    /// filename is blank once trimmed.
    pub fn parse(text: &str) -> Option<ParsedDraft> {
        let lines: Vec<&str> = text.split('\n').collect();
        if lines.len() < 3 {
            return None;
        }

        let folder = lines[0].trim();
        let filename = lines[1].trim();
        if folder.is_empty() || filename.is_empty() {
            return None;
        }

        Some(ParsedDraft {
            folder: folder.to_string(),
            filename: filename.to_string(),
            body: lines[2..].join("\n"),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct FolderList {
    #[serde(default)]
    pub folders: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NoteList {
    #[serde(default)]
    pub notes: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NoteBody {
    #[serde(default)]
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parses_folder_filename_and_body() {
        let parsed = ParsedDraft::parse("work\ntodo.txt\nbuy milk\ncall mom").unwrap();
        assert_eq!(parsed.folder, "work");
        assert_eq!(parsed.filename, "todo.txt");
        assert_eq!(parsed.body, "buy milk\ncall mom");
    }

    #[test]
    fn trims_location_but_not_body() {
        let parsed = ParsedDraft::parse("  work \n\ttodo.txt  \n  indented\n").unwrap();
        assert_eq!(parsed.folder, "work");
        assert_eq!(parsed.filename, "todo.txt");
        assert_eq!(parsed.body, "  indented\n");
    }

    #[test]
    fn trailing_newline_after_filename_gives_empty_body() {
        let parsed = ParsedDraft::parse("work\ntodo.txt\n").unwrap();
        assert_eq!(parsed.body, "");
    }

    #[test]
    fn rejects_short_or_blank_drafts() {
        assert_eq!(ParsedDraft::parse("work"), None);
        assert_eq!(ParsedDraft::parse("work\ntodo.txt"), None);
        assert_eq!(ParsedDraft::parse("   \ntodo.txt\nbody"), None);
        assert_eq!(ParsedDraft::parse("work\n \nbody"), None);
        assert_eq!(ParsedDraft::parse(""), None);
    }

    #[test]
    fn serializes_body_as_content() {
        let parsed = ParsedDraft::parse("work\ntodo.txt\nbuy milk").unwrap();
        let json = serde_json::to_value(&parsed).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "folder": "work", "filename": "todo.txt", "content": "buy milk" })
        );
    }

    #[test]
    fn missing_response_fields_default_to_empty() {
        let folders: FolderList = serde_json::from_str("{}").unwrap();
        let notes: NoteList = serde_json::from_str(r#"{"other": 1}"#).unwrap();
        let body: NoteBody = serde_json::from_str("{}").unwrap();
        assert!(folders.folders.is_empty());
        assert!(notes.notes.is_empty());
        assert_eq!(body.content, "");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn fewer_than_three_lines_never_parse(a in "[^\n]*", b in "[^\n]*", two in any::<bool>()) {
            let text = if two { format!("{a}\n{b}") } else { a };
            prop_assert!(ParsedDraft::parse(&text).is_none());
        }

        #[test]
        fn blank_folder_or_filename_never_parses(
            pad in "[ \t]*",
            other in "[a-z]{1,8}",
            body in "[a-z \n]*",
            blank_first in any::<bool>(),
        ) {
            let text = if blank_first {
                format!("{pad}\n{other}\n{body}")
            } else {
                format!("{other}\n{pad}\n{body}")
            };
            prop_assert!(ParsedDraft::parse(&text).is_none());
        }
    }
}
