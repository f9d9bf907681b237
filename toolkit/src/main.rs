use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use handsigncore::dataset::{relabel_last_column, LabelSet};
use handsigncore::inference::OutputDecoding;
use handsigncore::prelude::{EncoderConfig, KeyingMode, TWO_HAND_WIDTH};
use handsigncore::FeatureEncoder;
use signal::QuitSignal;
use source::synthetic::SyntheticConfig;
use source::FrameSource;
use std::path::PathBuf;
use workflow::capture::run_capture;
use workflow::config::{CaptureConfig, InferenceConfig, SessionConfig};
use workflow::predict::{load_predictor, run_predict};

mod signal;
mod source;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Hand-sign dataset capture, relabeling and inference")]
struct Args {
    /// Load session settings from YAML instead of the per-command flags
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Record labeled samples from detector frames into a CSV dataset
    Capture {
        #[command(flatten)]
        frames: FrameArgs,
        #[command(flatten)]
        encoder: EncoderArgs,
        #[arg(long, default_value = "Good")]
        label: String,
        #[arg(long, default_value = "gesture_data")]
        data_dir: PathBuf,
        #[arg(long, default_value_t = 2000)]
        frames_to_record: usize,
        /// Minimum milliseconds between stored samples
        #[arg(long, default_value_t = 30.0)]
        delay_ms: f64,
        /// Start recording at the first frame instead of waiting for an `s` key
        #[arg(long, default_value_t = false)]
        autostart: bool,
    },
    /// Classify detector frames with an ONNX gesture model
    Predict {
        #[command(flatten)]
        frames: FrameArgs,
        #[command(flatten)]
        encoder: EncoderArgs,
        #[arg(long, default_value = "model_2.onnx")]
        model: PathBuf,
        /// Label artifact, one label per line; digits 0-9 when omitted
        #[arg(long)]
        labels: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = DecodingArg::ClassIndex)]
        decoding: DecodingArg,
    },
    /// Overwrite the last column of every row in a CSV file
    Relabel { csv_file: PathBuf, new_value: String },
    /// Fit a label artifact from the labels found in CSV datasets
    Labels {
        #[arg(long, default_value = "labels.txt")]
        out: PathBuf,
        #[arg(required = true)]
        datasets: Vec<PathBuf>,
    },
}

#[derive(clap::Args)]
struct FrameArgs {
    /// JSON-lines detector output; `-` reads stdin
    #[arg(long, default_value = "-")]
    detections: PathBuf,
    /// Generate this many synthetic frames instead of reading detections
    #[arg(long)]
    synthetic: Option<usize>,
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

impl FrameArgs {
    fn source(&self) -> FrameSource {
        match self.synthetic {
            Some(frames) => FrameSource::Synthetic(SyntheticConfig {
                frames,
                seed: self.seed,
                ..Default::default()
            }),
            None => FrameSource::JsonLines(self.detections.clone()),
        }
    }
}

#[derive(clap::Args)]
struct EncoderArgs {
    /// Hand slot assignment; capture defaults to handedness, predict to detection order
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,
    #[arg(long, default_value_t = TWO_HAND_WIDTH)]
    width: usize,
}

impl EncoderArgs {
    fn to_config(&self, default_mode: KeyingMode) -> EncoderConfig {
        EncoderConfig {
            mode: self.mode.map(KeyingMode::from).unwrap_or(default_mode),
            width: self.width,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Handedness,
    DetectionOrder,
}

impl From<ModeArg> for KeyingMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Handedness => KeyingMode::Handedness,
            ModeArg::DetectionOrder => KeyingMode::DetectionOrder,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum DecodingArg {
    Scores,
    ClassIndex,
}

impl From<DecodingArg> for OutputDecoding {
    fn from(decoding: DecodingArg) -> Self {
        match decoding {
            DecodingArg::Scores => OutputDecoding::Scores,
            DecodingArg::ClassIndex => OutputDecoding::ClassIndex,
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    match args.command {
        Command::Capture {
            frames,
            encoder,
            label,
            data_dir,
            frames_to_record,
            delay_ms,
            autostart,
        } => {
            let session = match &args.config {
                Some(path) => SessionConfig::load(path)?,
                None => SessionConfig::from_args(
                    encoder.to_config(KeyingMode::Handedness),
                    CaptureConfig {
                        label,
                        data_dir,
                        frames_to_record,
                        delay_ms,
                    },
                    InferenceConfig::default(),
                ),
            };

            let quit = QuitSignal::new();
            quit.watch_ctrl_c()?;
            let stream = frames.source().open()?;
            let report = run_capture(&session, stream, &quit, autostart)?;

            println!(
                "Capture -> {} samples for '{}' in {} (frames {}, skipped {})",
                report.samples,
                session.capture.label,
                report.path.display(),
                report.metrics.frames,
                report.metrics.skipped_frames
            );
        }
        Command::Predict {
            frames,
            encoder,
            model,
            labels,
            decoding,
        } => {
            let session = match &args.config {
                Some(path) => SessionConfig::load(path)?,
                None => SessionConfig::from_args(
                    encoder.to_config(KeyingMode::DetectionOrder),
                    CaptureConfig::default(),
                    InferenceConfig {
                        model,
                        labels,
                        decoding: decoding.into(),
                    },
                ),
            };

            let feature_encoder =
                FeatureEncoder::from_config(&session.encoder_config(KeyingMode::DetectionOrder))
                .context("building feature encoder")?;
            let mut predictor = load_predictor(&session.inference)?;
            let quit = QuitSignal::new();
            quit.watch_ctrl_c()?;
            let stream = frames.source().open()?;

            let metrics = run_predict(
                &feature_encoder,
                &mut predictor,
                stream,
                &quit,
                |frame, prediction| match prediction {
                    Some(prediction) => println!(
                        "{}\tPrediction: {}",
                        frame
                            .timestamp_ms
                            .map(|ms| format!("{:.1}", ms))
                            .unwrap_or_else(|| "-".into()),
                        prediction.label
                    ),
                    None => log::trace!("no hands in frame"),
                },
            )?;

            println!(
                "Predict -> {} predictions over {} frames ({} labels)",
                metrics.predictions,
                metrics.frames,
                predictor.labels().len()
            );
        }
        Command::Relabel {
            csv_file,
            new_value,
        } => {
            let summary = relabel_last_column(&csv_file, &new_value)
                .with_context(|| format!("relabeling {}", csv_file.display()))?;
            log::debug!("{} rows rewritten", summary.rows);
            println!(
                "Updated the last column of {} to {}.",
                csv_file.display(),
                new_value
            );
        }
        Command::Labels { out, datasets } => {
            let labels = LabelSet::fit_from_csv(&datasets).context("reading datasets")?;
            labels
                .save(&out)
                .with_context(|| format!("writing labels {}", out.display()))?;
            println!("Wrote {} labels to {}", labels.len(), out.display());
        }
    }

    Ok(())
}
