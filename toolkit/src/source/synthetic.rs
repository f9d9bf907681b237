use handsigncore::landmark::{DetectionFrame, HandDetection, Handedness};
use handsigncore::prelude::{LANDMARKS_PER_HAND, MAX_HANDS};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::f32::consts::PI;

/// Configuration for generating synthetic detector frames.
#[derive(Debug, Clone)]
pub struct SyntheticConfig {
    pub frames: usize,
    pub seed: u64,
    pub max_hands: usize,
    pub frame_interval_ms: f64,
    pub jitter: f32,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            frames: 300,
            seed: 0,
            max_hands: MAX_HANDS,
            frame_interval_ms: 33.0,
            jitter: 0.02,
        }
    }
}

/// Seeded stream of plausible two-hand detections, used for dry runs.
pub struct SyntheticFrames {
    config: SyntheticConfig,
    rng: StdRng,
    index: usize,
}

impl SyntheticFrames {
    pub fn new(config: SyntheticConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self {
            config,
            rng,
            index: 0,
        }
    }

    fn build_hand(&mut self, handedness: Handedness) -> HandDetection {
        // Left hands sit on the right half of a mirrored frame and vice versa.
        let center_x = match handedness {
            Handedness::Left => 0.7,
            _ => 0.3,
        };
        let jitter = self.config.jitter;

        let landmarks = (0..LANDMARKS_PER_HAND)
            .map(|point| {
                let finger = point.saturating_sub(1) / 4;
                let joint = if point == 0 { 0 } else { (point - 1) % 4 + 1 };
                let angle = -PI / 2.0 + (finger as f32 - 2.0) * 0.3;
                let reach = joint as f32 * 0.05;
                let mut noise = || {
                    if jitter > 0.0 {
                        self.rng.gen_range(-jitter..jitter)
                    } else {
                        0.0
                    }
                };
                [
                    center_x + angle.cos() * reach + noise(),
                    0.7 + angle.sin() * reach + noise(),
                    -0.01 * joint as f32 + noise() * 0.1,
                ]
            })
            .collect();

        HandDetection::new(handedness, landmarks)
    }
}

impl Iterator for SyntheticFrames {
    type Item = DetectionFrame;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.config.frames {
            return None;
        }
        let timestamp = self.index as f64 * self.config.frame_interval_ms;
        self.index += 1;

        let hand_count = self.rng.gen_range(0..=self.config.max_hands.min(MAX_HANDS));
        let mut order = [Handedness::Left, Handedness::Right];
        if self.rng.gen_bool(0.5) {
            order.swap(0, 1);
        }
        let hands = order
            .into_iter()
            .take(hand_count)
            .map(|handedness| self.build_hand(handedness))
            .collect();

        Some(DetectionFrame::new(hands).with_timestamp(timestamp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generator_yields_requested_frame_count() {
        let frames: Vec<_> = SyntheticFrames::new(SyntheticConfig {
            frames: 25,
            ..Default::default()
        })
        .collect();
        assert_eq!(frames.len(), 25);
        assert_eq!(frames[1].timestamp_ms, Some(33.0));
        for frame in &frames {
            assert!(frame.hands.len() <= 2);
            for hand in &frame.hands {
                assert_eq!(hand.landmarks.len(), 21);
                assert_ne!(hand.handedness, Handedness::Unknown);
            }
        }
    }

    #[test]
    fn same_seed_repeats_frames() {
        let config = SyntheticConfig {
            frames: 10,
            seed: 13,
            ..Default::default()
        };
        let a: Vec<_> = SyntheticFrames::new(config.clone()).collect();
        let b: Vec<_> = SyntheticFrames::new(config).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn two_hands_never_share_handedness() {
        let config = SyntheticConfig {
            frames: 50,
            seed: 7,
            ..Default::default()
        };
        for frame in SyntheticFrames::new(config).filter(|f| f.hands.len() == 2) {
            assert_ne!(frame.hands[0].handedness, frame.hands[1].handedness);
        }
    }
}
