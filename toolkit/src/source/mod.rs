pub mod jsonl;
pub mod synthetic;

use anyhow::Context;
use handsigncore::landmark::DetectionFrame;
use handsigncore::prelude::HandSignResult;
use jsonl::JsonLines;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use synthetic::{SyntheticConfig, SyntheticFrames};

pub type FrameStream = Box<dyn Iterator<Item = HandSignResult<DetectionFrame>>>;

/// Where detector frames come from.
#[derive(Debug, Clone)]
pub enum FrameSource {
    /// JSON lines file; `-` reads standard input.
    JsonLines(PathBuf),
    Synthetic(SyntheticConfig),
}

impl FrameSource {
    pub fn open(self) -> anyhow::Result<FrameStream> {
        match self {
            FrameSource::JsonLines(path) if path.as_os_str() == "-" => {
                Ok(Box::new(JsonLines::new(io::stdin().lock())))
            }
            FrameSource::JsonLines(path) => {
                let file = File::open(&path)
                    .with_context(|| format!("opening detections {}", path.display()))?;
                Ok(Box::new(JsonLines::new(BufReader::new(file))))
            }
            FrameSource::Synthetic(config) => Ok(Box::new(SyntheticFrames::new(config).map(Ok))),
        }
    }
}
