use crate::signal::QuitSignal;
use crate::workflow::config::{CaptureConfig, SessionConfig};
use anyhow::Context;
use handsigncore::dataset::{sample_path, LabeledSample, SampleWriter};
use handsigncore::landmark::DetectionFrame;
use handsigncore::prelude::{HandSignResult, KeyingMode};
use handsigncore::telemetry::{MetricsSnapshot, SessionMetrics};
use handsigncore::FeatureEncoder;
use log::{debug, info, warn};
use std::path::PathBuf;

pub const START_KEY: char = 's';
pub const QUIT_KEY: char = 'q';

/// Recording state driven by key presses and frame timestamps.
#[derive(Debug, Clone)]
pub struct Recorder {
    frames_to_record: usize,
    delay_ms: f64,
    recording: bool,
    record_count: usize,
    saved: usize,
    last_save_ms: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Continue,
    Started,
    Quit,
}

impl Recorder {
    pub fn new(config: &CaptureConfig) -> Self {
        Self {
            frames_to_record: config.frames_to_record,
            delay_ms: config.delay_ms,
            recording: false,
            record_count: 0,
            saved: 0,
            last_save_ms: None,
        }
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// Samples stored since the recorder was created.
    pub fn saved(&self) -> usize {
        self.saved
    }

    pub fn start(&mut self, now_ms: Option<f64>) {
        self.recording = true;
        self.record_count = 0;
        self.last_save_ms = now_ms;
    }

    /// Frames without a timestamp always count as past the delay.
    pub fn is_due(&self, now_ms: Option<f64>) -> bool {
        if !self.recording {
            return false;
        }
        match (now_ms, self.last_save_ms) {
            (Some(now), Some(last)) => now - last > self.delay_ms,
            _ => true,
        }
    }

    /// Books one stored sample; returns true when the batch just completed.
    pub fn mark_saved(&mut self, now_ms: Option<f64>) -> bool {
        self.saved += 1;
        self.record_count += 1;
        self.last_save_ms = now_ms;
        if self.record_count >= self.frames_to_record {
            self.recording = false;
            self.record_count = 0;
            return true;
        }
        false
    }

    pub fn handle_key(&mut self, key: Option<char>, now_ms: Option<f64>) -> KeyAction {
        match key {
            Some(START_KEY) if !self.recording => {
                self.start(now_ms);
                KeyAction::Started
            }
            Some(QUIT_KEY) => KeyAction::Quit,
            _ => KeyAction::Continue,
        }
    }
}

pub struct CaptureReport {
    pub path: PathBuf,
    pub samples: usize,
    pub metrics: MetricsSnapshot,
}

/// Records labeled samples from `frames` into the label's dataset file.
///
/// Unreadable frames are skipped. The loop ends on the quit key, on the quit
/// signal, or when the frames run out.
pub fn run_capture<I>(
    config: &SessionConfig,
    frames: I,
    quit: &QuitSignal,
    autostart: bool,
) -> anyhow::Result<CaptureReport>
where
    I: IntoIterator<Item = HandSignResult<DetectionFrame>>,
{
    let encoder = FeatureEncoder::from_config(&config.encoder_config(KeyingMode::Handedness))
        .context("building feature encoder")?;
    let label = config.capture.label.as_str();
    let dataset = sample_path(&config.capture.data_dir, label);
    let mut writer = SampleWriter::open(&dataset, encoder.width())
        .with_context(|| format!("opening dataset {}", dataset.display()))?;
    let mut recorder = Recorder::new(&config.capture);
    let metrics = SessionMetrics::new();

    if autostart {
        recorder.start(None);
        info!("recording {} frames for class '{}'", config.capture.frames_to_record, label);
    } else {
        info!(
            "press '{}' to start recording {} frames for class '{}', '{}' to quit",
            START_KEY, config.capture.frames_to_record, label, QUIT_KEY
        );
    }

    for item in frames {
        if quit.is_raised() {
            break;
        }
        let frame = match item {
            Ok(frame) => frame,
            Err(err) => {
                warn!("skipping unreadable frame: {}", err);
                metrics.record_skipped();
                continue;
            }
        };
        metrics.record_frame(frame.hands.len());
        let now = frame.timestamp_ms;

        if recorder.is_due(now) {
            let sample = LabeledSample::new(encoder.encode(&frame), label);
            writer
                .append(&sample)
                .with_context(|| format!("appending to {}", writer.path().display()))?;
            metrics.record_sample();
            if recorder.mark_saved(now) {
                info!(
                    "finished recording {} frames for '{}'",
                    config.capture.frames_to_record, label
                );
            } else {
                debug!("recorded sample {} for '{}'", recorder.saved(), label);
            }
        }

        match recorder.handle_key(frame.key, now) {
            KeyAction::Started => info!("starting recording"),
            KeyAction::Quit => break,
            KeyAction::Continue => {}
        }
    }

    if recorder.is_recording() {
        info!("stopped while recording, {} samples stored for '{}'", recorder.saved(), label);
    }

    Ok(CaptureReport {
        path: writer.path().to_path_buf(),
        samples: writer.rows_written(),
        metrics: metrics.snapshot(),
    })
}
