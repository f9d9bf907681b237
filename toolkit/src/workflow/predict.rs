use crate::signal::QuitSignal;
use crate::workflow::capture::QUIT_KEY;
use crate::workflow::config::InferenceConfig;
use anyhow::Context;
use handsigncore::dataset::LabelSet;
use handsigncore::inference::{Classifier, Prediction, Predictor, TractClassifier};
use handsigncore::landmark::DetectionFrame;
use handsigncore::prelude::HandSignResult;
use handsigncore::telemetry::{MetricsSnapshot, SessionMetrics};
use handsigncore::FeatureEncoder;
use log::{info, warn};

/// Loads the label artifact named by `config`, or the digit labels when none is set.
pub fn load_labels(config: &InferenceConfig) -> anyhow::Result<LabelSet> {
    match &config.labels {
        Some(path) => LabelSet::load(path)
            .with_context(|| format!("reading labels {}", path.display())),
        None => Ok(LabelSet::digits()),
    }
}

/// Builds the ONNX-backed predictor described by `config`.
pub fn load_predictor(config: &InferenceConfig) -> anyhow::Result<Predictor<TractClassifier>> {
    let labels = load_labels(config)?;
    let classifier = TractClassifier::load(&config.model)
        .with_context(|| format!("loading model {}", config.model.display()))?;
    info!(
        "model {} takes {} features, {} labels",
        classifier.path().display(),
        classifier.input_width(),
        labels.len()
    );
    Ok(Predictor::new(classifier, labels, config.decoding))
}

/// Classifies every frame that contains at least one hand.
///
/// `emit` sees each frame with its prediction, or `None` when no hand was
/// detected. An unreadable frame ends the loop; a feature width that does not
/// match the model is an error.
pub fn run_predict<C, I, F>(
    encoder: &FeatureEncoder,
    predictor: &mut Predictor<C>,
    frames: I,
    quit: &QuitSignal,
    mut emit: F,
) -> anyhow::Result<MetricsSnapshot>
where
    C: Classifier,
    I: IntoIterator<Item = HandSignResult<DetectionFrame>>,
    F: FnMut(&DetectionFrame, Option<&Prediction>),
{
    let metrics = SessionMetrics::new();

    for item in frames {
        if quit.is_raised() {
            break;
        }
        let frame = match item {
            Ok(frame) => frame,
            Err(err) => {
                warn!("stopping at unreadable frame: {}", err);
                metrics.record_skipped();
                break;
            }
        };
        metrics.record_frame(frame.hands.len());

        if frame.has_hands() {
            let features = encoder.encode(&frame);
            let prediction = predictor
                .predict(&features)
                .context("classifying frame")?;
            metrics.record_prediction();
            emit(&frame, Some(&prediction));
        } else {
            emit(&frame, None);
        }

        if frame.key == Some(QUIT_KEY) {
            break;
        }
    }

    Ok(metrics.snapshot())
}
