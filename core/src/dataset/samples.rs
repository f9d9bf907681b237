use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use csv::{Writer, WriterBuilder};
use log::info;

use crate::features::FeatureVector;
use crate::prelude::HandSignResult;

/// Feature vector paired with its ground-truth label.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledSample {
    pub features: FeatureVector,
    pub label: String,
}

impl LabeledSample {
    pub fn new(features: FeatureVector, label: impl Into<String>) -> Self {
        Self {
            features,
            label: label.into(),
        }
    }

    /// CSV fields: every feature value, then the label.
    pub fn to_record(&self) -> Vec<String> {
        let mut record: Vec<String> = self
            .features
            .as_slice()
            .iter()
            .map(|value| format!("{:?}", value))
            .collect();
        record.push(self.label.clone());
        record
    }
}

/// Conventional dataset file for a label inside `data_dir`.
pub fn sample_path(data_dir: impl AsRef<Path>, label: &str) -> PathBuf {
    data_dir.as_ref().join(format!("gesture_{}.csv", label))
}

/// Header written to new dataset files: column indices `0..=width`.
pub fn header_for(width: usize) -> Vec<String> {
    (0..=width).map(|column| column.to_string()).collect()
}

/// Appends labeled samples to a dataset file, one row per sample.
pub struct SampleWriter {
    writer: Writer<File>,
    path: PathBuf,
    rows_written: usize,
}

impl SampleWriter {
    /// Opens `path` for appending. The header row is written only when the
    /// file does not exist yet.
    pub fn open(path: impl AsRef<Path>, width: usize) -> HandSignResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let existed = path.exists();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);

        if !existed {
            writer.write_record(header_for(width))?;
            writer.flush()?;
            info!("created dataset {} with {} feature columns", path.display(), width);
        }

        Ok(Self {
            writer,
            path,
            rows_written: 0,
        })
    }

    pub fn append(&mut self, sample: &LabeledSample) -> HandSignResult<()> {
        self.writer.write_record(sample.to_record())?;
        self.writer.flush()?;
        self.rows_written += 1;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rows appended through this writer, header excluded.
    pub fn rows_written(&self) -> usize {
        self.rows_written
    }
}
