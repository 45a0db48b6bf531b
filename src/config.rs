#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::string::StringGeometry;
use crate::error::StringError;

/// Engine-wide settings shared read-only by every string.
///
/// The base sample rate is the rate the physical model is tuned for. Voices
/// running at a multiple of it get proportionally less internal oversampling,
/// so the delay-line density stays the same whatever the host runs at.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    pub base_sample_rate: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_sample_rate: 44_100,
        }
    }
}

impl EngineConfig {
    pub fn with_base_sample_rate(mut self, base_sample_rate: u32) -> Self {
        self.base_sample_rate = base_sample_rate;
        self
    }

    /// Internal oversampling for a voice at `sample_rate` asking for `oversample`.
    ///
    /// Integer arithmetic throughout; never returns less than 1.
    pub fn oversample_factor(&self, sample_rate: u32, oversample: u32) -> u32 {
        let ratio = (sample_rate / self.base_sample_rate.max(1)).max(1);
        (oversample / ratio).max(1)
    }
}

/// Physical parameters of a single plucked string.
///
/// - `pitch`: fundamental in Hz
/// - `pick_position`: where the pluck lands, as a fraction of the string, strictly between 0.0 and 1.0
/// - `pickup_position`: where the output is tapped, as a fraction (0.0-1.0)
/// - `sample_rate`: output rate of the voice in Hz
/// - `oversample`: requested internal oversampling
/// - `randomize`: amplitude of the noise floor seeded into the string
/// - `string_loss`: energy lost per reflection (0.0 = lossless, < 1.0)
/// - `detune`: signed fractional change of string length (+ shortens, raises pitch)
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StringParams {
    pub pitch: f32,
    pub pick_position: f32,
    pub pickup_position: f32,
    pub sample_rate: u32,
    pub oversample: u32,
    pub randomize: f32,
    pub string_loss: f32,
    pub detune: f32,
}

impl Default for StringParams {
    fn default() -> Self {
        Self {
            pitch: 440.0,
            pick_position: 0.25,
            pickup_position: 0.5,
            sample_rate: 44_100,
            oversample: 1,
            randomize: 0.0,
            string_loss: 0.005,
            detune: 0.0,
        }
    }
}

impl StringParams {
    pub fn new(pitch: f32, sample_rate: u32) -> Self {
        Self {
            pitch,
            sample_rate,
            ..Self::default()
        }
    }

    pub fn with_pitch(mut self, pitch: f32) -> Self {
        self.pitch = pitch;
        self
    }

    pub fn with_pick(mut self, pick_position: f32) -> Self {
        self.pick_position = pick_position;
        self
    }

    pub fn with_pickup(mut self, pickup_position: f32) -> Self {
        self.pickup_position = pickup_position;
        self
    }

    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_oversample(mut self, oversample: u32) -> Self {
        self.oversample = oversample;
        self
    }

    pub fn with_randomize(mut self, randomize: f32) -> Self {
        self.randomize = randomize;
        self
    }

    pub fn with_string_loss(mut self, string_loss: f32) -> Self {
        self.string_loss = string_loss;
        self
    }

    pub fn with_detune(mut self, detune: f32) -> Self {
        self.detune = detune;
        self
    }

    /// Check every precondition of the string model and derive its geometry.
    ///
    /// Nothing is allocated here, so callers on the audio thread can vet a
    /// parameter set before handing it to a loader thread.
    pub fn validate(&self, engine: &EngineConfig) -> Result<StringGeometry, StringError> {
        if !(self.pitch.is_finite() && self.pitch > 0.0) {
            return Err(StringError::InvalidPitch(self.pitch));
        }
        if self.sample_rate == 0 {
            return Err(StringError::InvalidSampleRate(self.sample_rate));
        }
        if engine.base_sample_rate == 0 {
            return Err(StringError::InvalidSampleRate(engine.base_sample_rate));
        }
        // A pluck at either end would land on a reflection point.
        if !(self.pick_position > 0.0 && self.pick_position < 1.0) {
            return Err(StringError::InvalidPosition {
                name: "pick position",
                value: self.pick_position,
            });
        }
        check_unit("pickup position", self.pickup_position)?;
        if !(0.0..1.0).contains(&self.string_loss) {
            return Err(StringError::InvalidLoss(self.string_loss));
        }
        if !(self.randomize.is_finite() && self.randomize >= 0.0) {
            return Err(StringError::InvalidRandomize(self.randomize));
        }
        if !self.detune.is_finite() {
            return Err(StringError::InvalidDetune(self.detune));
        }

        StringGeometry::derive(self, engine)
    }
}

fn check_unit(name: &'static str, value: f32) -> Result<(), StringError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(StringError::InvalidPosition { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oversample_factor_tracks_rate_ratio() {
        let engine = EngineConfig::default();
        assert_eq!(engine.oversample_factor(44_100, 1), 1);
        assert_eq!(engine.oversample_factor(44_100, 4), 4);
        assert_eq!(engine.oversample_factor(88_200, 4), 2);
        assert_eq!(engine.oversample_factor(176_400, 2), 1);
    }

    #[test]
    fn oversample_factor_never_drops_below_one() {
        let engine = EngineConfig::default();
        assert_eq!(engine.oversample_factor(44_100, 0), 1);
        assert_eq!(engine.oversample_factor(22_050, 1), 1);
        assert_eq!(engine.oversample_factor(192_000, 1), 1);
    }

    #[test]
    fn rejects_non_positive_pitch() {
        let engine = EngineConfig::default();
        for pitch in [0.0, -220.0, f32::NAN, f32::INFINITY] {
            let err = StringParams::default().with_pitch(pitch).validate(&engine);
            assert!(matches!(err, Err(StringError::InvalidPitch(_))), "pitch {pitch}");
        }
    }

    #[test]
    fn rejects_zero_sample_rate() {
        let engine = EngineConfig::default();
        let err = StringParams::default().with_sample_rate(0).validate(&engine);
        assert_eq!(err.unwrap_err(), StringError::InvalidSampleRate(0));
    }

    #[test]
    fn rejects_out_of_range_positions_and_loss() {
        let engine = EngineConfig::default();
        assert!(matches!(
            StringParams::default().with_pick(1.5).validate(&engine),
            Err(StringError::InvalidPosition { name: "pick position", .. })
        ));
        assert!(matches!(
            StringParams::default().with_pickup(-0.1).validate(&engine),
            Err(StringError::InvalidPosition { name: "pickup position", .. })
        ));
        assert_eq!(
            StringParams::default().with_string_loss(1.0).validate(&engine),
            Err(StringError::InvalidLoss(1.0))
        );
    }

    #[test]
    fn rejects_detune_that_collapses_the_string() {
        let engine = EngineConfig::default();
        let err = StringParams::default().with_detune(1.0).validate(&engine);
        assert!(matches!(err, Err(StringError::DegenerateLength(_))));
    }

    #[test]
    fn pick_at_either_end_is_rejected() {
        let engine = EngineConfig::default();
        for pick in [0.0, 1.0] {
            assert!(matches!(
                StringParams::default().with_pick(pick).validate(&engine),
                Err(StringError::InvalidPosition { name: "pick position", .. })
            ));
        }
        for pickup in [0.0, 1.0] {
            assert!(StringParams::default().with_pickup(pickup).validate(&engine).is_ok());
        }
    }

    #[test]
    fn huge_negative_detune_is_too_long() {
        let err = StringParams::new(440.0, 44_100)
            .with_detune(-1.0e30)
            .validate(&EngineConfig::default());
        assert!(matches!(err, Err(StringError::TooLong(_))));
    }

    #[test]
    fn tiny_pitch_is_too_long() {
        let engine = EngineConfig::default();
        for pitch in [1.0e-30, 1.0e-3] {
            let err = StringParams::new(pitch, 44_100).validate(&engine);
            assert!(matches!(err, Err(StringError::TooLong(_))), "pitch {pitch}");
        }
    }

    #[test]
    fn longest_allowed_string_still_validates() {
        // 44100 / 0.011 + 1 slots, just under the cap
        let geometry = StringParams::new(0.011, 44_100)
            .validate(&EngineConfig::default())
            .unwrap();
        assert!(geometry.string_length <= crate::dsp::string::MAX_STRING_LENGTH);
    }

    #[test]
    fn defaults_are_valid() {
        let geometry = StringParams::default()
            .validate(&EngineConfig::default())
            .expect("default parameters should validate");
        assert!(geometry.string_length >= 1);
    }
}
