use crate::{
    dsp::string::VibratingString,
    synth::message::{MessageReceiver, RetireSink, StringMessage},
    synth::{DAMP_TIME, SILENCE},
};

/// Strings that can wait for room in a full sink.
pub const PARK_CAPACITY: usize = 8;

/// Audio-thread driver for one string at a time.
///
/// Strings arrive fully built through `rx`. A replaced, silenced or faded-out
/// string is pushed into `sink` so its buffers are dropped on the other side.
/// If the sink is full, the string waits in a parking queue allocated up front
/// and is retried at the start of every block. Only when that queue is full
/// too is a string freed in place; [`dropped`](Self::dropped) counts those.
pub struct StringPlayer<R, S> {
    rx: R,
    sink: S,
    current: Option<Box<VibratingString>>,
    parked: Vec<Box<VibratingString>>,
    dropped: u64,
    level: f32,
    damping: f32,
    damp_coef: f32,
    frame_counter: u64,
}

impl<R: MessageReceiver, S: RetireSink> StringPlayer<R, S> {
    pub fn new(sample_rate: f32, rx: R, sink: S) -> Self {
        Self {
            rx,
            sink,
            current: None,
            parked: Vec::with_capacity(PARK_CAPACITY),
            dropped: 0,
            level: 1.0,
            damping: 1.0,
            damp_coef: (-1.0 / (DAMP_TIME * sample_rate)).exp(),
            frame_counter: 0,
        }
    }

    pub fn render_block(&mut self, out: &mut [f32]) {
        self.flush_parked();

        // Process control messages
        while let Some(msg) = self.rx.pop() {
            match msg {
                StringMessage::Pluck(string) => {
                    if let Some(old) = self.current.replace(string) {
                        self.retire(old);
                    }
                    self.level = 1.0;
                    self.damping = 1.0;
                }
                StringMessage::Damp => {
                    self.damping = self.damp_coef;
                }
                StringMessage::Silence => {
                    if let Some(old) = self.current.take() {
                        self.retire(old);
                    }
                }
            }
        }

        match self.current.as_mut() {
            Some(string) => {
                for sample in out.iter_mut() {
                    *sample = string.next_sample() * self.level;
                    self.level *= self.damping;
                }
            }
            None => out.fill(0.0),
        }

        if self.level < SILENCE {
            if let Some(old) = self.current.take() {
                self.retire(old);
            }
            self.level = 1.0;
            self.damping = 1.0;
        }

        self.frame_counter += out.len() as u64;
    }

    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    /// Frames rendered since the player was created.
    pub fn frames(&self) -> u64 {
        self.frame_counter
    }

    /// Strings that had to be freed on this thread because the sink and the
    /// parking queue were both full.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    fn retire(&mut self, string: Box<VibratingString>) {
        self.flush_parked();
        if let Err(string) = self.sink.retire(string) {
            if self.parked.len() < PARK_CAPACITY {
                self.parked.push(string);
            } else {
                self.dropped += 1;
                drop(string);
            }
        }
    }

    fn flush_parked(&mut self) {
        while let Some(parked) = self.parked.pop() {
            if let Err(parked) = self.sink.retire(parked) {
                self.parked.push(parked);
                break;
            }
        }
    }
}
