use thiserror::Error;

/// Reasons a string cannot be built from a set of parameters.
///
/// All of these are caught before any buffer is allocated. Once a
/// [`VibratingString`](crate::VibratingString) exists, rendering cannot fail.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StringError {
    #[error("pitch must be positive and finite, got {0} Hz")]
    InvalidPitch(f32),

    #[error("sample rate must be positive, got {0} Hz")]
    InvalidSampleRate(u32),

    #[error("{name} {value} lies outside the string")]
    InvalidPosition { name: &'static str, value: f32 },

    #[error("string loss must lie in [0, 1), got {0}")]
    InvalidLoss(f32),

    #[error("randomize amount must be non-negative and finite, got {0}")]
    InvalidRandomize(f32),

    #[error("detune must be finite, got {0}")]
    InvalidDetune(f32),

    #[error("derived string length {0} is shorter than one sample")]
    DegenerateLength(i64),

    #[error("derived string length {0} exceeds {max} slots", max = crate::dsp::string::MAX_STRING_LENGTH)]
    TooLong(f64),

    #[error("excitation buffer is empty")]
    EmptyExcitation,
}
