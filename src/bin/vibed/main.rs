//! vibed - pluck a waveguide string from the terminal
//!
//! Run with: cargo run -- render --pitch 220
//!           cargo run -- play --pitch 110 --plucks 8

mod playback;
mod render;
mod spectrum;

use clap::{Args, Parser, Subcommand, ValueEnum};
use rand_pcg::Pcg32;
use tracing_subscriber::EnvFilter;
use vibed_dsp::{
    dsp::excitation::{self, ExcitationShape},
    EngineConfig, StringParams,
};

/// Frames generated for the pluck shape before the string resamples it.
const SHAPE_LEN: usize = 64;

#[derive(Parser)]
#[command(name = "vibed", about = "Physically modeled plucked string")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render one pluck offline and report its level and pitch
    Render(RenderArgs),
    /// Play plucks on the default output device
    Play(PlayArgs),
}

#[derive(Args, Clone)]
pub struct StringArgs {
    /// Fundamental in Hz
    #[arg(long, default_value_t = 220.0)]
    pitch: f32,
    /// Pluck position along the string (0-1)
    #[arg(long, default_value_t = 0.25)]
    pick: f32,
    /// Pickup position along the string (0-1)
    #[arg(long, default_value_t = 0.5)]
    pickup: f32,
    /// Requested internal oversampling
    #[arg(long, default_value_t = 1)]
    oversample: u32,
    /// Noise floor amplitude
    #[arg(long, default_value_t = 0.0)]
    randomize: f32,
    /// Energy lost per bridge reflection (0-1)
    #[arg(long, default_value_t = 0.005)]
    loss: f32,
    /// Signed fractional string-length change
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    detune: f32,
    /// Pluck shape
    #[arg(long, value_enum, default_value_t = Shape::Triangle)]
    shape: Shape,
    /// Soften the pluck shape before use
    #[arg(long)]
    smooth: bool,
    /// Engine base sample rate in Hz
    #[arg(long, default_value_t = 44_100)]
    base_rate: u32,
    /// Seed for noise and dispersion choice
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

#[derive(Args)]
pub struct RenderArgs {
    #[command(flatten)]
    string: StringArgs,
    /// Output sample rate in Hz
    #[arg(long, default_value_t = 44_100)]
    sample_rate: u32,
    /// Length of the render in seconds
    #[arg(long, default_value_t = 2.0)]
    seconds: f32,
}

#[derive(Args)]
pub struct PlayArgs {
    #[command(flatten)]
    string: StringArgs,
    /// Number of plucks to play
    #[arg(long, default_value_t = 4)]
    plucks: u32,
    /// Seconds between plucks
    #[arg(long, default_value_t = 0.75)]
    interval: f32,
}

#[derive(Clone, Copy, ValueEnum)]
enum Shape {
    Sine,
    Triangle,
    Saw,
    Square,
    Noise,
    Impulse,
}

impl From<Shape> for ExcitationShape {
    fn from(shape: Shape) -> Self {
        match shape {
            Shape::Sine => ExcitationShape::Sine,
            Shape::Triangle => ExcitationShape::Triangle,
            Shape::Saw => ExcitationShape::Saw,
            Shape::Square => ExcitationShape::Square,
            Shape::Noise => ExcitationShape::Noise,
            Shape::Impulse => ExcitationShape::Impulse,
        }
    }
}

impl StringArgs {
    pub fn params(&self, sample_rate: u32) -> StringParams {
        StringParams::new(self.pitch, sample_rate)
            .with_pick(self.pick)
            .with_pickup(self.pickup)
            .with_oversample(self.oversample)
            .with_randomize(self.randomize)
            .with_string_loss(self.loss)
            .with_detune(self.detune)
    }

    pub fn engine(&self) -> EngineConfig {
        EngineConfig::default().with_base_sample_rate(self.base_rate)
    }

    pub fn excitation(&self, rng: &mut Pcg32) -> Vec<f32> {
        let mut samples = ExcitationShape::from(self.shape).generate(SHAPE_LEN, rng);
        if self.smooth {
            excitation::smooth(&mut samples);
        }
        excitation::normalize(&mut samples);
        samples
    }
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Render(args) => render::run(&args),
        Command::Play(args) => playback::run(&args),
    }
}
