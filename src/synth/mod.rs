// Purpose: hand plucked strings from a control thread to the audio thread
// Strings are built (allocated, resampled) off the audio thread and arrive
// ready to play; retired strings travel back so they are freed elsewhere.

pub mod message;
pub mod player;

/// Time constant of the damping fade, in seconds.
pub const DAMP_TIME: f32 = 0.05;
/// Level below which a damped string is let go.
pub const SILENCE: f32 = 1.0e-4;

pub use message::{MessageReceiver, RetireSink, StringMessage};
pub use player::StringPlayer;
