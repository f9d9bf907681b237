use anyhow::Context;
use handsigncore::inference::OutputDecoding;
use handsigncore::prelude::{EncoderConfig, KeyingMode, TWO_HAND_WIDTH};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings for one capture or predict session.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    /// Left unset, each command picks its own keying mode.
    pub encoder: Option<EncoderConfig>,
    pub capture: CaptureConfig,
    pub inference: InferenceConfig,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CaptureConfig {
    pub label: String,
    pub data_dir: PathBuf,
    pub frames_to_record: usize,
    /// Minimum time between two stored samples.
    pub delay_ms: f64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            label: "Good".into(),
            data_dir: PathBuf::from("gesture_data"),
            frames_to_record: 2000,
            delay_ms: 30.0,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InferenceConfig {
    pub model: PathBuf,
    /// Label artifact; the digit labels are used when absent.
    pub labels: Option<PathBuf>,
    pub decoding: OutputDecoding,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            model: PathBuf::from("model_2.onnx"),
            labels: None,
            decoding: OutputDecoding::ClassIndex,
        }
    }
}

impl SessionConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading session config {}", path_ref.display()))?;
        let config: SessionConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing session config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(
        encoder: EncoderConfig,
        capture: CaptureConfig,
        inference: InferenceConfig,
    ) -> Self {
        Self {
            encoder: Some(encoder),
            capture,
            inference,
        }
    }

    /// The configured encoder, or a two-hand layout keyed by `default_mode`.
    pub fn encoder_config(&self, default_mode: KeyingMode) -> EncoderConfig {
        self.encoder.clone().unwrap_or(EncoderConfig {
            mode: default_mode,
            width: TWO_HAND_WIDTH,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_match_capture_script() {
        let cfg = SessionConfig::default();
        let encoder = cfg.encoder_config(KeyingMode::Handedness);
        assert_eq!(encoder.mode, KeyingMode::Handedness);
        assert_eq!(encoder.width, 126);
        assert_eq!(cfg.capture.frames_to_record, 2000);
        assert_eq!(cfg.capture.delay_ms, 30.0);
    }

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"encoder:\n  mode: detection_order\n  width: 445\n\
              capture:\n  label: Peace\n\
              inference:\n  model: gesture.onnx\n  labels: labels.txt\n  decoding: scores\n",
        )
        .unwrap();
        let path = temp.into_temp_path();
        let cfg = SessionConfig::load(&path).unwrap();

        // An explicit encoder section wins over the command default.
        let encoder = cfg.encoder_config(KeyingMode::Handedness);
        assert_eq!(encoder.mode, KeyingMode::DetectionOrder);
        assert_eq!(encoder.width, 445);
        assert_eq!(cfg.capture.label, "Peace");
        assert_eq!(cfg.capture.frames_to_record, 2000);
        assert_eq!(cfg.inference.labels, Some(PathBuf::from("labels.txt")));
        assert_eq!(cfg.inference.decoding, OutputDecoding::Scores);
    }

    #[test]
    fn missing_encoder_section_keeps_command_default() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"inference:\n  model: gesture.onnx\n").unwrap();
        let path = temp.into_temp_path();
        let cfg = SessionConfig::load(&path).unwrap();

        assert!(cfg.encoder.is_none());
        let predict = cfg.encoder_config(KeyingMode::DetectionOrder);
        assert_eq!(predict.mode, KeyingMode::DetectionOrder);
        assert_eq!(predict.width, TWO_HAND_WIDTH);
        assert_eq!(cfg.encoder_config(KeyingMode::Handedness).mode, KeyingMode::Handedness);
    }

    #[test]
    fn config_load_reports_path_on_error() {
        let err = SessionConfig::load("does/not/exist.yaml").unwrap_err();
        assert!(format!("{:#}", err).contains("does/not/exist.yaml"));
    }
}
