use log::debug;

use crate::features::vector::FeatureVector;
use crate::landmark::{DetectionFrame, HandDetection, Handedness};
use crate::prelude::{
    EncoderConfig, HandSignError, HandSignResult, KeyingMode, HAND_BLOCK, MAX_HANDS,
    TWO_HAND_WIDTH,
};

/// Width declared by the detection-order model that expects a 445-value input.
pub const WIDE_LAYOUT_WIDTH: usize = 445;

/// Turns detector output into fixed-width feature vectors.
///
/// The encoder is stateless: the same frame always yields a bit-identical
/// vector, and every vector has exactly the configured width no matter how
/// many hands were detected. Absent hands are zero-filled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureEncoder {
    mode: KeyingMode,
    width: usize,
}

impl FeatureEncoder {
    pub fn new(mode: KeyingMode, width: usize) -> HandSignResult<Self> {
        if width < TWO_HAND_WIDTH {
            return Err(HandSignError::InvalidLayout(format!(
                "width {} cannot hold {} hand blocks of {} values",
                width, MAX_HANDS, HAND_BLOCK
            )));
        }
        if width > TWO_HAND_WIDTH {
            debug!(
                "feature layout reserves {} values past the hand blocks; they stay zero",
                width - TWO_HAND_WIDTH
            );
        }
        Ok(Self { mode, width })
    }

    pub fn from_config(config: &EncoderConfig) -> HandSignResult<Self> {
        Self::new(config.mode, config.width)
    }

    /// Left/Right keyed layout used for dataset capture.
    pub fn handedness_keyed() -> Self {
        Self {
            mode: KeyingMode::Handedness,
            width: TWO_HAND_WIDTH,
        }
    }

    /// Detector-order layout padded to `width`.
    pub fn detection_order(width: usize) -> HandSignResult<Self> {
        Self::new(KeyingMode::DetectionOrder, width)
    }

    pub fn mode(&self) -> KeyingMode {
        self.mode
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn encode(&self, frame: &DetectionFrame) -> FeatureVector {
        let mut vector = FeatureVector::zeros(self.width);
        let buffer = vector.as_mut_slice();

        match self.mode {
            KeyingMode::Handedness => {
                for hand in &frame.hands {
                    let slot = match hand.handedness {
                        Handedness::Left => 0,
                        Handedness::Right => 1,
                        Handedness::Unknown => continue,
                    };
                    write_block(buffer, slot, hand);
                }
            }
            KeyingMode::DetectionOrder => {
                for (slot, hand) in frame.hands.iter().take(MAX_HANDS).enumerate() {
                    write_block(buffer, slot, hand);
                }
            }
        }

        vector
    }
}

/// Overwrites hand block `slot` with the hand's coordinates.
fn write_block(buffer: &mut [f32], slot: usize, hand: &HandDetection) {
    let block = &mut buffer[slot * HAND_BLOCK..(slot + 1) * HAND_BLOCK];
    block.fill(0.0);
    for (out, value) in block.iter_mut().zip(hand.flattened()) {
        *out = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered_hand(handedness: Handedness, base: f32) -> HandDetection {
        let landmarks = (0..21)
            .map(|i| {
                let v = base + i as f32 * 3.0;
                [v, v + 1.0, v + 2.0]
            })
            .collect();
        HandDetection::new(handedness, landmarks)
    }

    fn flat(hand: &HandDetection) -> Vec<f32> {
        hand.flattened().collect()
    }

    #[test]
    fn no_hands_yield_zeros_for_every_layout() {
        let frame = DetectionFrame::default();
        let encoders = [
            FeatureEncoder::handedness_keyed(),
            FeatureEncoder::detection_order(126).unwrap(),
            FeatureEncoder::detection_order(WIDE_LAYOUT_WIDTH).unwrap(),
        ];
        for encoder in encoders {
            let vector = encoder.encode(&frame);
            assert_eq!(vector.len(), encoder.width());
            assert!(vector.as_slice().iter().all(|&v| v == 0.0));
        }
    }

    #[test]
    fn single_left_hand_fills_first_block() {
        let hand = numbered_hand(Handedness::Left, 1.0);
        let vector = FeatureEncoder::handedness_keyed().encode(&DetectionFrame::new(vec![hand.clone()]));
        assert_eq!(&vector.as_slice()[..63], flat(&hand).as_slice());
        assert!(vector.as_slice()[63..].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn single_right_hand_of_uniform_points() {
        let hand = HandDetection::uniform(Handedness::Right, [0.5, 0.5, 0.0]);
        let vector = FeatureEncoder::handedness_keyed().encode(&DetectionFrame::new(vec![hand]));

        let mut expected = vec![0.0f32; 63];
        for _ in 0..21 {
            expected.extend_from_slice(&[0.5, 0.5, 0.0]);
        }
        assert_eq!(vector.as_slice(), expected.as_slice());
    }

    #[test]
    fn handedness_keying_ignores_detector_order() {
        let left = numbered_hand(Handedness::Left, 0.0);
        let right = numbered_hand(Handedness::Right, 100.0);
        let encoder = FeatureEncoder::handedness_keyed();

        let forward = encoder.encode(&DetectionFrame::new(vec![left.clone(), right.clone()]));
        let reversed = encoder.encode(&DetectionFrame::new(vec![right.clone(), left.clone()]));

        let mut expected = flat(&left);
        expected.extend(flat(&right));
        assert_eq!(forward.as_slice(), expected.as_slice());
        assert_eq!(forward, reversed);
    }

    #[test]
    fn unknown_handedness_is_dropped() {
        let hand = numbered_hand(Handedness::Unknown, 5.0);
        let vector = FeatureEncoder::handedness_keyed().encode(&DetectionFrame::new(vec![hand]));
        assert!(vector.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn duplicate_handedness_keeps_the_later_hand() {
        let first = numbered_hand(Handedness::Left, 0.0);
        let second = numbered_hand(Handedness::Left, 50.0);
        let vector = FeatureEncoder::handedness_keyed()
            .encode(&DetectionFrame::new(vec![first, second.clone()]));
        assert_eq!(&vector.as_slice()[..63], flat(&second).as_slice());
        assert!(vector.as_slice()[63..].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn detection_order_places_single_hand_at_offset_zero() {
        let encoder = FeatureEncoder::detection_order(126).unwrap();
        for handedness in [Handedness::Left, Handedness::Right, Handedness::Unknown] {
            let hand = numbered_hand(handedness, 1.0);
            let vector = encoder.encode(&DetectionFrame::new(vec![hand.clone()]));
            assert_eq!(&vector.as_slice()[..63], flat(&hand).as_slice());
            assert!(vector.as_slice()[63..].iter().all(|&v| v == 0.0));
        }
    }

    #[test]
    fn detection_order_caps_at_two_hands_and_keeps_tail_zero() {
        let hands = vec![
            numbered_hand(Handedness::Right, 1.0),
            numbered_hand(Handedness::Right, 200.0),
            numbered_hand(Handedness::Left, 400.0),
        ];
        let encoder = FeatureEncoder::detection_order(WIDE_LAYOUT_WIDTH).unwrap();
        let vector = encoder.encode(&DetectionFrame::new(hands.clone()));

        assert_eq!(vector.len(), WIDE_LAYOUT_WIDTH);
        assert_eq!(&vector.as_slice()[..63], flat(&hands[0]).as_slice());
        assert_eq!(&vector.as_slice()[63..126], flat(&hands[1]).as_slice());
        assert!(vector.as_slice()[126..].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn short_landmark_list_does_not_panic() {
        let hand = HandDetection::new(Handedness::Left, vec![[1.0, 2.0, 3.0]]);
        let vector = FeatureEncoder::handedness_keyed().encode(&DetectionFrame::new(vec![hand]));
        assert_eq!(&vector.as_slice()[..3], &[1.0, 2.0, 3.0]);
        assert!(vector.as_slice()[3..].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn encoding_is_repeatable() {
        let frame = DetectionFrame::new(vec![
            numbered_hand(Handedness::Right, 0.125),
            numbered_hand(Handedness::Left, 0.75),
        ]);
        for encoder in [
            FeatureEncoder::handedness_keyed(),
            FeatureEncoder::detection_order(WIDE_LAYOUT_WIDTH).unwrap(),
        ] {
            let a = encoder.encode(&frame);
            let b = encoder.encode(&frame);
            let bits_a: Vec<u32> = a.as_slice().iter().map(|v| v.to_bits()).collect();
            let bits_b: Vec<u32> = b.as_slice().iter().map(|v| v.to_bits()).collect();
            assert_eq!(bits_a, bits_b);
        }
    }

    #[test]
    fn narrow_layout_is_rejected() {
        let err = FeatureEncoder::new(KeyingMode::DetectionOrder, 100).unwrap_err();
        assert!(matches!(err, HandSignError::InvalidLayout(_)));
    }

    #[test]
    fn config_round_trips_into_encoder() {
        let config = EncoderConfig {
            mode: KeyingMode::DetectionOrder,
            width: WIDE_LAYOUT_WIDTH,
        };
        let encoder = FeatureEncoder::from_config(&config).unwrap();
        assert_eq!(encoder.mode(), KeyingMode::DetectionOrder);
        assert_eq!(encoder.width(), WIDE_LAYOUT_WIDTH);
    }
}
