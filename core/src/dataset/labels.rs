use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use csv::ReaderBuilder;

use crate::prelude::{HandSignError, HandSignResult};

/// Ordered class labels; a label's position is the model's class index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSet {
    labels: Vec<String>,
}

impl LabelSet {
    pub fn new(labels: Vec<String>) -> Self {
        Self { labels }
    }

    /// The `"0"` to `"9"` list used when no label artifact is supplied.
    pub fn digits() -> Self {
        Self::new((0..10).map(|digit| digit.to_string()).collect())
    }

    /// Sorted, de-duplicated labels, matching how a label encoder is fitted.
    pub fn fit<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let unique: BTreeSet<String> = labels.into_iter().map(Into::into).collect();
        Self::new(unique.into_iter().collect())
    }

    /// Fits a label set from the last column of dataset files, skipping their header rows.
    pub fn fit_from_csv<P: AsRef<Path>>(paths: &[P]) -> HandSignResult<Self> {
        let mut collected = Vec::new();
        for path in paths {
            let mut reader = ReaderBuilder::new()
                .has_headers(true)
                .flexible(true)
                .from_path(path.as_ref())?;
            for record in reader.records() {
                let record = record?;
                if let Some(label) = record.iter().last() {
                    collected.push(label.to_string());
                }
            }
        }
        Ok(Self::fit(collected))
    }

    /// Reads a label artifact: one label per line, blank lines ignored.
    pub fn load(path: impl AsRef<Path>) -> HandSignResult<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        let labels = contents
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .filter(|line| !line.trim().is_empty())
            .map(str::to_string)
            .collect();
        Ok(Self::new(labels))
    }

    /// Writes one label per line, in class-index order.
    pub fn save(&self, path: impl AsRef<Path>) -> HandSignResult<()> {
        let mut contents = String::new();
        for label in &self.labels {
            contents.push_str(label);
            contents.push('\n');
        }
        fs::write(path.as_ref(), contents)?;
        Ok(())
    }

    pub fn get(&self, index: usize) -> HandSignResult<&str> {
        self.labels
            .get(index)
            .map(String::as_str)
            .ok_or(HandSignError::LabelOutOfRange {
                index,
                count: self.labels.len(),
            })
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

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn digits_cover_ten_classes() {
        let labels = LabelSet::digits();
        assert_eq!(labels.len(), 10);
        assert_eq!(labels.get(7).unwrap(), "7");
    }

    #[test]
    fn fit_sorts_and_deduplicates() {
        let labels = LabelSet::fit(["Peace", "Good", "Peace", "Bad"]);
        assert_eq!(labels.iter().collect::<Vec<_>>(), vec!["Bad", "Good", "Peace"]);
    }

    #[test]
    fn out_of_range_index_is_reported() {
        let err = LabelSet::digits().get(12).unwrap_err();
        assert!(matches!(
            err,
            HandSignError::LabelOutOfRange { index: 12, count: 10 }
        ));
    }

    #[test]
    fn artifact_save_then_load_keeps_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("labels.txt");
        let labels = LabelSet::new(vec!["Hello".into(), "Thanks".into(), "Yes".into()]);
        labels.save(&path).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "Hello\nThanks\nYes\n");
        assert_eq!(LabelSet::load(&path).unwrap(), labels);
    }

    #[test]
    fn fit_from_csv_skips_header() {
        let dir = tempdir().unwrap();
        let good = dir.path().join("gesture_Good.csv");
        let bad = dir.path().join("gesture_Bad.csv");
        fs::write(&good, "0,1,2\n0.1,0.2,Good\n0.3,0.4,Good\n").unwrap();
        fs::write(&bad, "0,1,2\n0.5,0.6,Bad\n").unwrap();

        let labels = LabelSet::fit_from_csv(&[good, bad]).unwrap();
        assert_eq!(labels.iter().collect::<Vec<_>>(), vec!["Bad", "Good"]);
    }
}
