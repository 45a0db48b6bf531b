use rand::Rng;
use tracing::{debug, warn};

use crate::config::{EngineConfig, StringParams};
use crate::dsp::delay::DelayLine;
use crate::dsp::resample::resampled;
use crate::error::StringError;

/*
Vibrating String (Digital Waveguide)
====================================

A plucked string is modeled as two waves travelling in opposite directions.
Each direction lives in its own delay line; the displacement of the string at
any point is the sum of the two waves passing over that point.

Vocabulary
----------

  slot          Position along the string, counted from the bridge (slot 0)
                to the nut (slot string_length - 1). Both lines are read
                relative to their own cursor, so "slot k" is always
                `line.tap(k)`.

  to bridge     Delay line carrying the wave heading for the bridge. Its
                cursor moves forward, so every tick its contents slide one
                slot down toward slot 0.

  from bridge   Delay line carrying the wave that bounced off the bridge and
                is heading back toward the nut. Its cursor moves backward, so
                its contents slide one slot up toward the nut.

  tick          One step of the waveguide: both waves move one slot, and the
                samples that ran off either end come back reflected.

  pick          Slot where the excitation is laid into both lines.

  pickup        Slot where the output is read: the sum of both waves there.

  loss          Fraction of energy the bridge swallows on every reflection.


The Loop
--------

      slot:   L-1 ◄──────────── from bridge ──────────── 0
     nut ───┤                                             ├─── bridge
     (-1)     L-1 ──────────────── to bridge ──────────► 0   (-c·lowpass)

Each tick, the sample in slot 0 of "to bridge" is low-passed, scaled by the
loss coefficient c and inverted into slot 0 of "from bridge". The sample in
the last slot of "from bridge" is inverted into the last slot of "to bridge".
Each line is a pure delay of string_length ticks, so a wave needs
2 · string_length ticks for a round trip, and two inversions bring it back
with its original sign.

The string length is one full period at the internal (oversampled) rate, so
the model runs two ticks per oversampled frame, and one output sample costs
2 · oversample_factor ticks.

Because the two waves cross each other, where the pickup sits shapes the
tone: a pickup at a node of a harmonic never hears it. A pickup in the middle
of the string drops the even harmonics.


Dispersion Phase
----------------

With oversampling, several ticks elapse per output sample. Only one of them is
emitted; which one is chosen at random when the string is built. Strings in a
detuned unison stack then sit at slightly different sub-sample phases, which
smears their combined spectrum the way a stiff string disperses.


The Bridge Filter
-----------------

    state = c · (c · x + (1 - c) · state)

With c = 1 this is a wire: the string rings forever. Below 1 it is a one-pole
lowpass with DC gain c² / (1 - c + c²) < 1, so highs die first and everything
dies eventually. The memory starts at a small non-zero value, which gives the
first reflections a faint offset like a string that is never perfectly at rest.
*/

/// Initial memory of the bridge filter.
pub const INITIAL_STATE: f32 = 0.1;
/// Longest string accepted, in slots per delay line.
pub const MAX_STRING_LENGTH: usize = 1 << 22;

/// Share of the pluck written into each travelling direction.
const DIRECTION_GAIN: f32 = 0.5;

/// Integer layout of a string derived from its physical parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringGeometry {
    pub oversample_factor: u32,
    pub string_length: usize,
    pub pick_index: usize,
    pub pickup_index: usize,
}

impl StringGeometry {
    pub(crate) fn derive(params: &StringParams, engine: &EngineConfig) -> Result<Self, StringError> {
        let oversample_factor = engine.oversample_factor(params.sample_rate, params.oversample);

        let nominal = (oversample_factor as f64 * params.sample_rate as f64
            / params.pitch as f64)
            .floor()
            + 1.0;
        let length = nominal + (nominal * -(params.detune as f64)).floor();
        if length.is_nan() || length > MAX_STRING_LENGTH as f64 {
            return Err(StringError::TooLong(length));
        }
        if length < 1.0 {
            return Err(StringError::DegenerateLength(length as i64));
        }
        let string_length = length as usize;

        let pick_index =
            ((string_length as f64 * params.pick_position as f64).ceil() as usize).min(string_length);

        let pickup = (params.pickup_position as f64 * string_length as f64).floor() as usize;
        if pickup >= string_length {
            warn!(pickup, string_length, "pickup past end of string, clamping");
        }
        let pickup_index = pickup.min(string_length - 1);

        Ok(Self {
            oversample_factor,
            string_length,
            pick_index,
            pickup_index,
        })
    }
}

/// Plucked string voice built on a bidirectional waveguide.
///
/// Building one allocates and resamples; after that, [`next_sample`] is
/// allocation-free and O(oversample_factor).
///
/// [`next_sample`]: VibratingString::next_sample
pub struct VibratingString {
    params: StringParams,
    engine: EngineConfig,
    geometry: StringGeometry,

    loss: f32,  // string loss coefficient, 1 - string_loss
    state: f32, // bridge filter memory

    excitation: Vec<f32>,
    to_bridge: DelayLine,
    from_bridge: DelayLine,

    dispersion_choice: u32,
    ticks_per_sample: u32,
}

impl VibratingString {
    /// Build a string and pluck it with `excitation`.
    ///
    /// - `reuse == false`: `excitation` is a pluck shape of any length and is
    ///   resampled to the string length.
    /// - `reuse == true`: `excitation` is already at the string's native
    ///   length (typically taken from a sibling string) and is copied verbatim.
    pub fn new<R: Rng + ?Sized>(
        params: &StringParams,
        engine: &EngineConfig,
        excitation: &[f32],
        reuse: bool,
        rng: &mut R,
    ) -> Result<Self, StringError> {
        if excitation.is_empty() {
            return Err(StringError::EmptyExcitation);
        }
        let geometry = params.validate(engine)?;
        let length = geometry.string_length;

        let excitation = if reuse {
            excitation.to_vec()
        } else {
            resampled(excitation, length)
        };

        let mut to_bridge = DelayLine::with_noise(length, params.randomize, rng);
        let mut from_bridge = DelayLine::with_noise(length, params.randomize, rng);
        to_bridge.set_excitation(geometry.pick_index, &excitation, DIRECTION_GAIN, reuse);
        from_bridge.set_excitation(geometry.pick_index, &excitation, DIRECTION_GAIN, reuse);

        let dispersion_choice = rng.gen_range(0..geometry.oversample_factor);

        debug!(
            pitch = params.pitch,
            string_length = length,
            pick_index = geometry.pick_index,
            pickup_index = geometry.pickup_index,
            oversample_factor = geometry.oversample_factor,
            dispersion_choice,
            reuse,
            "plucked string"
        );

        Ok(Self {
            params: *params,
            engine: *engine,
            geometry,
            loss: 1.0 - params.string_loss,
            state: INITIAL_STATE,
            excitation,
            to_bridge,
            from_bridge,
            dispersion_choice,
            ticks_per_sample: 2 * geometry.oversample_factor,
        })
    }

    /// Build a detuned partner that shares this string's excitation.
    ///
    /// The excitation is reused verbatim rather than resampled again, so both
    /// strings start from the same pluck shape.
    pub fn sibling<R: Rng + ?Sized>(&self, detune: f32, rng: &mut R) -> Result<Self, StringError> {
        let params = self.params.with_detune(detune);
        Self::new(&params, &self.engine, &self.excitation, true, rng)
    }

    /// Advance the string by one output sample and return the pickup signal.
    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        let pickup = self.geometry.pickup_index;
        let mut out = 0.0;

        for tick in 0..self.ticks_per_sample {
            if tick == self.dispersion_choice {
                out = self.to_bridge.tap(pickup) + self.from_bridge.tap(pickup);
            }
            self.tick();
        }

        out
    }

    /// Fill `out` with consecutive samples.
    pub fn render(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = self.next_sample();
        }
    }

    #[inline]
    fn tick(&mut self) {
        let nut = self.geometry.string_length - 1;
        let arriving_at_bridge = self.to_bridge.tap(0);
        let arriving_at_nut = self.from_bridge.tap(nut);

        // Slot 0 leaves, the nut reflection enters at the top.
        self.to_bridge.write(-arriving_at_nut);
        self.to_bridge.advance();

        // The top slot leaves, the bridge reflection enters at slot 0.
        let reflected = self.bridge_reflection(arriving_at_bridge);
        self.from_bridge.retreat();
        self.from_bridge.write(-reflected);
    }

    #[inline]
    fn bridge_reflection(&mut self, sample: f32) -> f32 {
        let c = self.loss;
        self.state = c * (c * sample + (1.0 - c) * self.state);
        self.state
    }

    pub fn params(&self) -> &StringParams {
        &self.params
    }

    pub fn geometry(&self) -> StringGeometry {
        self.geometry
    }

    pub fn string_length(&self) -> usize {
        self.geometry.string_length
    }

    pub fn pick_index(&self) -> usize {
        self.geometry.pick_index
    }

    pub fn pickup_index(&self) -> usize {
        self.geometry.pickup_index
    }

    pub fn oversample_factor(&self) -> u32 {
        self.geometry.oversample_factor
    }

    pub fn dispersion_choice(&self) -> u32 {
        self.dispersion_choice
    }

    pub fn loss_coefficient(&self) -> f32 {
        self.loss
    }

    /// The excitation actually written into the string.
    pub fn excitation(&self) -> &[f32] {
        &self.excitation
    }

    pub fn to_bridge(&self) -> &DelayLine {
        &self.to_bridge
    }

    pub fn from_bridge(&self) -> &DelayLine {
        &self.from_bridge
    }
}
