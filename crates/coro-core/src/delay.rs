//! Circular delay line over caller-provided 16-bit storage.

/// A circular delay line with linear interpolation for fractional reads.
///
/// Storage is borrowed rather than owned, so the same type runs against a
/// heap buffer on desktop and a static buffer on an embedded target. The
/// line stores `i16` PCM directly; interpolated reads return `f32` so
/// downstream filtering and mixing can stay in float until the final cast.
///
/// # Example
///
/// ```
/// use coro_core::DelayLine;
///
/// let mut storage = [0i16; 64];
/// let mut line = DelayLine::new(&mut storage);
///
/// line.write(100);
/// line.write(200);
///
/// assert_eq!(line.read_interpolated(0.0), 200.0);
/// assert_eq!(line.read_interpolated(1.0), 100.0);
/// assert_eq!(line.read_interpolated(0.5), 150.0);
/// ```
#[derive(Debug)]
pub struct DelayLine<'a> {
    storage: &'a mut [i16],
    write_index: usize,
}

impl<'a> DelayLine<'a> {
    /// Creates a delay line over `storage`, zeroing its contents.
    ///
    /// # Panics
    ///
    /// Panics if `storage` is empty.
    pub fn new(storage: &'a mut [i16]) -> Self {
        assert!(!storage.is_empty(), "delay line storage must not be empty");
        storage.fill(0);
        Self {
            storage,
            write_index: 0,
        }
    }

    /// Writes one sample at the head and advances it.
    pub fn write(&mut self, sample: i16) {
        self.storage[self.write_index] = sample;
        self.write_index += 1;
        if self.write_index >= self.storage.len() {
            self.write_index = 0;
        }
    }

    /// Reads `delay_samples` behind the most recently written sample,
    /// linearly interpolating between the two straddling samples.
    ///
    /// A delay of `0.0` returns the last sample passed to
    /// [`write`](DelayLine::write). Positions outside the buffer wrap back
    /// in, so a modulation excursion past the line length reads recycled
    /// data instead of panicking.
    pub fn read_interpolated(&self, delay_samples: f32) -> f32 {
        let len = self.storage.len();
        // The newest sample sits one behind the write head.
        let newest = (self.write_index + len - 1) % len;
        let mut position = newest as f32 - delay_samples;
        while position < 0.0 {
            position += len as f32;
        }
        while position >= len as f32 {
            position -= len as f32;
        }

        let base = position as usize;
        let frac = position - base as f32;
        let mut next = base + 1;
        if next >= len {
            next = 0;
        }

        f32::from(self.storage[base]) * (1.0 - frac) + f32::from(self.storage[next]) * frac
    }

    /// Number of samples the line can hold.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Always `false`; construction rejects empty storage.
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Current write head position, for state inspection in tests.
    pub fn write_index(&self) -> usize {
        self.write_index
    }

    /// Zeroes the buffer and rewinds the write head.
    pub fn clear(&mut self) {
        self.storage.fill(0);
        self.write_index = 0;
    }
}
