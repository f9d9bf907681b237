use std::fs;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Terminator, WriterBuilder};
use log::{debug, warn};

use crate::prelude::HandSignResult;

/// Outcome of a relabel pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelabelSummary {
    /// Rows rewritten, blank rows included.
    pub rows: usize,
}

/// One logical CSV row; blank lines are rows without fields.
#[derive(Debug, Clone, PartialEq)]
enum Row {
    Blank,
    Record(StringRecord),
}

/// Replaces the last field of every row in `path` with `new_label`, in place.
///
/// Rows are not interpreted: a header row, when present, has its last column
/// name overwritten as well. Blank rows are kept in place and the file is
/// written back with CRLF line endings.
pub fn relabel_last_column(path: impl AsRef<Path>, new_label: &str) -> HandSignResult<RelabelSummary> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let mut rows = Vec::new();
    for raw in split_rows(&contents) {
        rows.push(match parse_row(raw)? {
            Some(record) => Row::Record(replace_last(&record, new_label)),
            None => Row::Blank,
        });
    }

    if let Some(Row::Record(first)) = rows.first() {
        if looks_like_header(first) {
            warn!(
                "{} starts with a header row; its last column name is relabeled too",
                path.display()
            );
        }
    }

    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .terminator(Terminator::CRLF)
        .from_writer(Vec::new());
    for row in &rows {
        match row {
            Row::Record(record) => writer.write_record(record)?,
            Row::Blank => {
                writer.flush()?;
                writer.get_mut().extend_from_slice(b"\r\n");
            }
        }
    }
    writer.flush()?;
    fs::write(path, writer.get_ref())?;

    debug!("relabeled {} rows of {}", rows.len(), path.display());
    Ok(RelabelSummary { rows: rows.len() })
}

/// Splits `contents` into logical rows, keeping quoted line breaks inside their row.
fn split_rows(contents: &str) -> Vec<&str> {
    let mut rows = Vec::new();
    let mut start = 0;
    let mut quotes = 0usize;
    for (offset, byte) in contents.bytes().enumerate() {
        match byte {
            b'"' => quotes += 1,
            b'\n' if quotes % 2 == 0 => {
                rows.push(&contents[start..=offset]);
                start = offset + 1;
                quotes = 0;
            }
            _ => {}
        }
    }
    if start < contents.len() {
        rows.push(&contents[start..]);
    }
    rows
}

fn parse_row(raw: &str) -> HandSignResult<Option<StringRecord>> {
    if raw.trim_end_matches(['\r', '\n']).is_empty() {
        return Ok(None);
    }
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(raw.as_bytes());
    let mut record = StringRecord::new();
    if reader.read_record(&mut record)? {
        Ok(Some(record))
    } else {
        Ok(None)
    }
}

fn replace_last(record: &StringRecord, new_label: &str) -> StringRecord {
    let last = record.len().saturating_sub(1);
    record
        .iter()
        .enumerate()
        .map(|(index, field)| if index == last { new_label } else { field })
        .collect()
}

/// Dataset headers are the column indices `0..=width`.
fn looks_like_header(row: &StringRecord) -> bool {
    row.iter()
        .take(row.len().saturating_sub(1))
        .enumerate()
        .all(|(index, field)| field == index.to_string())
        && row.len() > 1
}
