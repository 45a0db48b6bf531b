pub mod config; // Engine and string construction parameters
pub mod dsp;
pub mod error;
pub mod graph; // GraphNode adapter for the string model
pub mod synth; // Realtime hand-off of plucked strings

pub use config::{EngineConfig, StringParams};
pub use dsp::string::VibratingString;
pub use error::StringError;

pub const MAX_BLOCK_SIZE: usize = 2048;
