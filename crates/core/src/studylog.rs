//! Studylog rules shared by the DB and API layers.

use std::collections::HashSet;

use crate::types::DbId;

/// Maximum title length of studylogs, reports and level logs, in characters.
pub const MAX_TITLE_LENGTH: usize = 50;

/// Maximum tag name length, in characters.
pub const MAX_TAG_NAME_LENGTH: usize = 20;

/// Trim a title and check it is neither blank nor too long.
///
/// The trimmed value is what gets stored, so it is also what gets measured.
pub fn normalize_title(raw: &str) -> Result<String, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("title must not be blank".to_string());
    }
    if trimmed.chars().count() > MAX_TITLE_LENGTH {
        return Err(format!("title must be at most {MAX_TITLE_LENGTH} characters"));
    }
    Ok(trimmed.to_string())
}

/// Trim tag names, drop blanks, and keep the first occurrence of each name.
pub fn normalize_tag_names<S: AsRef<str>>(names: &[S]) -> Result<Vec<String>, String> {
    let mut seen = HashSet::new();
    let mut normalized = Vec::new();

    for name in names {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.chars().count() > MAX_TAG_NAME_LENGTH {
            return Err(format!(
                "Tag '{trimmed}' exceeds {MAX_TAG_NAME_LENGTH} characters"
            ));
        }
        if seen.insert(trimmed.to_string()) {
            normalized.push(trimmed.to_string());
        }
    }

    Ok(normalized)
}

/// A view counts unless the author is reading their own studylog.
pub fn counts_as_view(author_id: DbId, viewer_id: Option<DbId>) -> bool {
    viewer_id != Some(author_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn titles_are_trimmed_before_checking() {
        assert_eq!(normalize_title("  T1 ").unwrap(), "T1");
        assert!(normalize_title("   ").is_err());
        assert!(normalize_title("").is_err());

        let padded = format!(" {} ", "x".repeat(MAX_TITLE_LENGTH));
        assert_eq!(normalize_title(&padded).unwrap().len(), MAX_TITLE_LENGTH);
        assert!(normalize_title(&"x".repeat(MAX_TITLE_LENGTH + 1)).is_err());
    }

    #[test]
    fn tag_names_are_trimmed_and_deduplicated() {
        let names = normalize_tag_names(&[" rust ", "axum", "rust", "  "]).unwrap();
        assert_eq!(names, vec!["rust".to_string(), "axum".to_string()]);
    }

    #[test]
    fn overlong_tag_name_is_rejected() {
        let long = "x".repeat(MAX_TAG_NAME_LENGTH + 1);
        let err = normalize_tag_names(&[long]).unwrap_err();
        assert!(err.contains("exceeds"));
    }

    #[test]
    fn empty_tag_list_is_fine() {
        let names: Vec<String> = normalize_tag_names::<&str>(&[]).unwrap();
        assert!(names.is_empty());
    }

    #[test]
    fn author_views_are_not_counted() {
        assert!(!counts_as_view(1, Some(1)));
        assert!(counts_as_view(1, Some(2)));
        assert!(counts_as_view(1, None));
    }
}
