use handsigncore::landmark::DetectionFrame;
use handsigncore::prelude::HandSignResult;
use std::io::{BufRead, Lines};

/// Detector frames read one JSON object per line; blank lines are skipped.
pub struct JsonLines<R> {
    lines: Lines<R>,
}

impl<R: BufRead> JsonLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }
}

impl<R: BufRead> Iterator for JsonLines<R> {
    type Item = HandSignResult<DetectionFrame>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(err) => return Some(Err(err.into())),
            };
            if line.trim().is_empty() {
                continue;
            }
            return Some(DetectionFrame::from_json_line(&line));
        }
    }
}
