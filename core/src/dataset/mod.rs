pub mod labels;
pub mod relabel;
pub mod samples;

pub use labels::LabelSet;
pub use relabel::{relabel_last_column, RelabelSummary};
pub use samples::{header_for, sample_path, LabeledSample, SampleWriter};
