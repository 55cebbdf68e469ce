//! Rolling window of recent sensor samples, exposed as a [`Signal`].
//!
//! Fixed-size ring buffer (no heap), oldest sample first when read.

use super::signal::{Signal, check_bounds};
use crate::error::SignalError;

/// Largest window the firmware will allocate.
pub const MAX_WINDOW: usize = 64;

pub struct SampleWindow {
    ring: [f32; MAX_WINDOW],
    capacity: usize,
    head: usize,
    count: usize,
}

impl SampleWindow {
    /// Create a window holding the last `capacity` samples.
    /// `capacity` is clamped to `1..=MAX_WINDOW`.
    pub fn new(capacity: usize) -> Self {
        Self {
            ring: [0.0; MAX_WINDOW],
            capacity: capacity.clamp(1, MAX_WINDOW),
            head: 0,
            count: 0,
        }
    }

    pub fn push(&mut self, sample: f32) {
        self.ring[self.head] = sample;
        self.head = (self.head + 1) % self.capacity;
        if self.count < self.capacity {
            self.count += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.head = 0;
        self.count = 0;
    }

    fn oldest(&self) -> usize {
        (self.head + self.capacity - self.count) % self.capacity
    }
}

impl Signal for SampleWindow {
    fn total_length(&self) -> usize {
        self.count
    }

    fn read(&self, offset: usize, out: &mut [f32]) -> Result<(), SignalError> {
        check_bounds(offset, out.len(), self.count)?;
        let start = self.oldest();
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = self.ring[(start + offset + i) % self.capacity];
        }
        Ok(())
    }
}
