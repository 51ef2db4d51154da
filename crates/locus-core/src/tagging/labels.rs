//! Class label list that maps model output indices to tag names.

use std::path::Path;

use crate::error::PipelineError;

/// Ordered class labels; index `i` names output score `i`.
#[derive(Debug, Clone)]
pub struct LabelSet {
    labels: Vec<String>,
}

impl LabelSet {
    /// Load labels from a text file, one per line.
    ///
    /// Blank lines are ignored. An unreadable or empty file means the model
    /// asset is unusable.
    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| PipelineError::ModelUnavailable {
                path: path.to_path_buf(),
                message: format!("Failed to read label file: {e}"),
            })?;

        let labels = Self::parse(&content);
        if labels.is_empty() {
            return Err(PipelineError::ModelUnavailable {
                path: path.to_path_buf(),
                message: "Label file contains no labels".to_string(),
            });
        }
        Ok(Self { labels })
    }

    fn parse(content: &str) -> Vec<String> {
        content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for LabelSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            labels: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_blank_lines() {
        let labels = LabelSet::parse("tabby\n\n  goldfish \n\n");
        assert_eq!(labels, vec!["tabby", "goldfish"]);
    }

    #[test]
    fn test_load_missing_file_is_model_unavailable() {
        let err = LabelSet::load(Path::new("/no/such/labels.txt")).unwrap_err();
        assert!(matches!(err, PipelineError::ModelUnavailable { .. }));
    }

    #[test]
    fn test_load_empty_file_is_model_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("labels.txt");
        std::fs::write(&path, "\n\n").unwrap();
        let err = LabelSet::load(&path).unwrap_err();
        assert!(err.to_string().contains("no labels"));
    }

    #[test]
    fn test_load_keeps_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("labels.txt");
        std::fs::write(&path, "restaurant\nplate\nchair\n").unwrap();
        let labels = LabelSet::load(&path).unwrap();
        assert_eq!(labels.len(), 3);
        assert_eq!(
            labels.iter().collect::<Vec<_>>(),
            vec!["restaurant", "plate", "chair"]
        );
    }
}
