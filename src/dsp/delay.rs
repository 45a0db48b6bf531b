use rand::Rng;

/// Fixed-length circular buffer with a single read/write cursor.
///
/// One sample slot per unit of delay. A line is created full of low-level
/// noise (the "thermal" floor of a real string), then excitation is laid on
/// top of it. A zero-length line owns no buffer and its cursor never moves.
#[derive(Debug, Clone, Default)]
pub struct DelayLine {
    buffer: Vec<f32>,
    cursor: usize,
    end_index: usize,
}

impl DelayLine {
    /// An empty, inert line.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Allocate `length` slots filled with uniform noise in
    /// `[-randomize / 2, randomize / 2]`.
    pub fn with_noise<R: Rng + ?Sized>(length: usize, randomize: f32, rng: &mut R) -> Self {
        if length == 0 {
            return Self::empty();
        }

        let buffer = (0..length)
            .map(|_| (rng.gen::<f32>() - 0.5) * randomize)
            .collect();

        Self {
            buffer,
            cursor: 0,
            end_index: length - 1,
        }
    }

    /// Lay `gain * excitation` over the line, starting at slot `pick`.
    ///
    /// With `reuse == false` the excitation was already resampled to the line
    /// length: slots from `pick` on take it in order and the slots before
    /// `pick` take its tail, mirrored back from the far end, so the whole line
    /// carries the pluck. With `reuse == true` the excitation keeps its own
    /// length and is written from `pick` on, truncated at the end of the line.
    pub fn set_excitation(&mut self, pick: usize, excitation: &[f32], gain: f32, reuse: bool) {
        let len = self.buffer.len();
        let pick = pick.min(len);

        if reuse {
            let count = excitation.len().min(len - pick);
            for (slot, &value) in self.buffer[pick..pick + count].iter_mut().zip(excitation) {
                *slot += gain * value;
            }
            return;
        }

        debug_assert_eq!(excitation.len(), len, "fresh excitation must match line length");
        let count = excitation.len().min(len);
        let start = pick.min(count);

        for (i, slot) in self.buffer[..start].iter_mut().enumerate() {
            *slot += gain * excitation[count - 1 - i];
        }
        for (i, slot) in self.buffer[start..count].iter_mut().enumerate() {
            *slot += gain * excitation[i];
        }
    }

    /// Free the buffer, leaving an empty line. Safe to call more than once.
    pub fn release(&mut self) {
        self.buffer = Vec::new();
        self.cursor = 0;
        self.end_index = 0;
    }

    /// Sample under the cursor.
    #[inline]
    pub fn read(&self) -> f32 {
        self.buffer[self.cursor]
    }

    /// Overwrite the sample under the cursor.
    #[inline]
    pub fn write(&mut self, sample: f32) {
        self.buffer[self.cursor] = sample;
    }

    /// Step the cursor forward, wrapping past `end_index`.
    #[inline]
    pub fn advance(&mut self) {
        self.cursor = if self.cursor >= self.end_index {
            0
        } else {
            self.cursor + 1
        };
    }

    /// Step the cursor backward, wrapping below zero to `end_index`.
    #[inline]
    pub fn retreat(&mut self) {
        self.cursor = if self.cursor == 0 {
            self.end_index
        } else {
            self.cursor - 1
        };
    }

    /// Sample `offset` slots ahead of the cursor. `offset` must be below `len()`.
    #[inline]
    pub fn tap(&self, offset: usize) -> f32 {
        debug_assert!(offset < self.buffer.len());
        let mut index = self.cursor + offset;
        if index > self.end_index {
            index -= self.buffer.len();
        }
        self.buffer[index]
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn end_index(&self) -> usize {
        self.end_index
    }

    /// Raw contents in buffer order (not cursor order).
    pub fn as_slice(&self) -> &[f32] {
        &self.buffer
    }
}
