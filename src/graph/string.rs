use rand::SeedableRng;
use rand_pcg::Pcg32;
use tracing::warn;

use crate::config::{EngineConfig, StringParams};
use crate::dsp::excitation::ExcitationShape;
use crate::dsp::string::VibratingString;
use crate::graph::node::{GraphNode, RenderCtx};
use crate::synth::{DAMP_TIME, SILENCE};

/// Frames used when a node generates its own pluck shape.
const SHAPE_LEN: usize = 64;

/// A plucked string behind the `GraphNode` interface.
///
/// `note_on` builds a fresh string at the context's frequency and sample rate,
/// which allocates. That is fine for offline rendering; live drivers should
/// build strings off the audio thread and hand them over through
/// [`StringPlayer`](crate::synth::player::StringPlayer).
pub struct StringNode {
    engine: EngineConfig,
    params: StringParams,
    shape: Vec<f32>,
    rng: Pcg32,
    string: Option<VibratingString>,
    gain: f32,
    level: f32,
    damping: f32, // per-sample level multiplier, 1.0 while held
}

impl StringNode {
    pub fn new(params: StringParams, shape: ExcitationShape) -> Self {
        let mut rng = Pcg32::seed_from_u64(0);
        let shape = shape.generate(SHAPE_LEN, &mut rng);
        Self {
            engine: EngineConfig::default(),
            params,
            shape,
            rng,
            string: None,
            gain: 1.0,
            level: 1.0,
            damping: 1.0,
        }
    }

    pub fn with_engine(mut self, engine: EngineConfig) -> Self {
        self.engine = engine;
        self
    }

    /// Reseed the noise source; two nodes with the same seed pluck identically.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Pcg32::seed_from_u64(seed);
        self
    }

    /// Use a caller-supplied pluck shape instead of a generated one.
    pub fn with_excitation(mut self, samples: Vec<f32>) -> Self {
        self.shape = samples;
        self
    }

    pub fn string(&self) -> Option<&VibratingString> {
        self.string.as_ref()
    }
}

impl GraphNode for StringNode {
    fn render_block(&mut self, out: &mut [f32], _ctx: &RenderCtx) {
        let Some(string) = self.string.as_mut() else {
            out.fill(0.0);
            return;
        };

        string.render(out);
        for sample in out.iter_mut() {
            *sample *= self.gain * self.level;
            self.level *= self.damping;
        }

        if self.level < SILENCE {
            self.string = None;
        }
    }

    fn note_on(&mut self, ctx: &RenderCtx) {
        let params = self
            .params
            .with_pitch(ctx.frequency)
            .with_sample_rate(ctx.sample_rate as u32);

        match VibratingString::new(&params, &self.engine, &self.shape, false, &mut self.rng) {
            Ok(string) => {
                self.string = Some(string);
                self.gain = (ctx.velocity / 127.0).clamp(0.0, 1.0);
                self.level = 1.0;
                self.damping = 1.0;
            }
            Err(err) => {
                warn!(%err, frequency = ctx.frequency, "could not pluck string");
                self.string = None;
            }
        }
    }

    fn note_off(&mut self, ctx: &RenderCtx) {
        if self.string.is_some() {
            self.damping = (-1.0 / (DAMP_TIME * ctx.sample_rate)).exp();
        }
    }

    fn is_active(&self) -> bool {
        self.string.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peak(buffer: &[f32]) -> f32 {
        buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()))
    }

    #[test]
    fn silent_until_plucked() {
        let mut node = StringNode::new(StringParams::default(), ExcitationShape::Triangle);
        let ctx = RenderCtx::from_freq(44_100.0, 220.0, 127.0);
        let mut buffer = vec![1.0; 128];

        node.render_block(&mut buffer, &ctx);

        assert!(!node.is_active());
        assert!(buffer.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn note_on_produces_audio() {
        let mut node = StringNode::new(StringParams::default(), ExcitationShape::Triangle);
        let ctx = RenderCtx::from_note(44_100.0, 57, 100.0);
        let mut buffer = vec![0.0; 1024];

        node.note_on(&ctx);
        node.render_block(&mut buffer, &ctx);

        assert!(node.is_active());
        assert!(peak(&buffer) > 0.1, "peak {}", peak(&buffer));
    }

    #[test]
    fn note_off_damps_to_silence() {
        let mut node = StringNode::new(StringParams::default(), ExcitationShape::Saw);
        let ctx = RenderCtx::from_freq(44_100.0, 330.0, 127.0);
        let mut buffer = vec![0.0; 512];

        node.note_on(&ctx);
        node.render_block(&mut buffer, &ctx);
        node.note_off(&ctx);

        for _ in 0..100 {
            node.render_block(&mut buffer, &ctx);
        }
        assert!(!node.is_active());
    }

    #[test]
    fn invalid_frequency_leaves_node_idle() {
        let mut node = StringNode::new(StringParams::default(), ExcitationShape::Sine);
        let ctx = RenderCtx::from_freq(44_100.0, 0.0, 127.0);

        node.note_on(&ctx);

        assert!(!node.is_active());
    }

    #[test]
    fn same_seed_plucks_identically() {
        let ctx = RenderCtx::from_freq(48_000.0, 196.0, 90.0);
        let render = || {
            let params = StringParams::default().with_randomize(0.1);
            let mut node = StringNode::new(params, ExcitationShape::Noise).with_seed(11);
            let mut buffer = vec![0.0; 256];
            node.note_on(&ctx);
            node.render_block(&mut buffer, &ctx);
            buffer
        };
        assert_eq!(render(), render());
    }
}
