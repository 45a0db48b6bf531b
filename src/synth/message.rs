use std::collections::VecDeque;

#[cfg(feature = "rtrb")]
use rtrb::{Consumer, Producer, PushError};

use crate::dsp::string::VibratingString;

pub enum StringMessage {
    /// Start sounding a fully built string, replacing the current one.
    Pluck(Box<VibratingString>),
    /// Fade the current string out.
    Damp,
    /// Cut the current string immediately.
    Silence,
}

pub trait MessageReceiver {
    fn pop(&mut self) -> Option<StringMessage>;
}

/// Destination for strings the audio thread has finished with.
///
/// Returns the string back when the sink cannot take it right now.
pub trait RetireSink {
    fn retire(&mut self, string: Box<VibratingString>) -> Result<(), Box<VibratingString>>;
}

#[cfg(feature = "rtrb")]
impl MessageReceiver for Consumer<StringMessage> {
    fn pop(&mut self) -> Option<StringMessage> {
        Consumer::pop(self).ok()
    }
}

#[cfg(feature = "rtrb")]
impl RetireSink for Producer<Box<VibratingString>> {
    fn retire(&mut self, string: Box<VibratingString>) -> Result<(), Box<VibratingString>> {
        self.push(string).map_err(|PushError::Full(string)| string)
    }
}

// Offline drivers: no realtime constraints, so plain queues will do.

impl MessageReceiver for VecDeque<StringMessage> {
    fn pop(&mut self) -> Option<StringMessage> {
        self.pop_front()
    }
}

impl RetireSink for Vec<Box<VibratingString>> {
    fn retire(&mut self, string: Box<VibratingString>) -> Result<(), Box<VibratingString>> {
        self.push(string);
        Ok(())
    }
}
