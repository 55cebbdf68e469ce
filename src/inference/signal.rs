//! Streaming signal source.
//!
//! A [`Signal`] is a read-only, fixed-length sequence of `f32` samples that
//! consumers pull in `(offset, length)` slices, so the whole buffer never
//! has to be materialised by the consumer. Adapters own their backing
//! state; any number of signals can coexist.

use crate::error::SignalError;

/// Pull interface over a finite sample sequence.
pub trait Signal {
    /// Number of samples, fixed at construction.
    fn total_length(&self) -> usize;

    /// Copy `out.len()` samples starting at `offset` into `out`.
    ///
    /// Fails with [`SignalError::OutOfRange`] if
    /// `offset + out.len() > total_length()`.
    fn read(&self, offset: usize, out: &mut [f32]) -> Result<(), SignalError>;
}

/// Shared bounds check for adapters.
pub(crate) fn check_bounds(offset: usize, length: usize, total: usize) -> Result<(), SignalError> {
    match offset.checked_add(length) {
        Some(end) if end <= total => Ok(()),
        _ => Err(SignalError::OutOfRange {
            offset,
            length,
            total,
        }),
    }
}

// ───────────────────────────────────────────────────────────────
// Buffer-backed adapter
// ───────────────────────────────────────────────────────────────

/// Signal backed by a borrowed slice.
#[derive(Debug, Clone)]
pub struct BufferSignal<'a> {
    buf: Option<&'a [f32]>,
    total_length: usize,
}

impl<'a> BufferSignal<'a> {
    /// Wrap an existing buffer. Empty buffers are rejected.
    pub fn from_buffer(buf: &'a [f32]) -> Result<Self, SignalError> {
        if buf.is_empty() {
            return Err(SignalError::InvalidArgument);
        }
        Ok(Self {
            buf: Some(buf),
            total_length: buf.len(),
        })
    }

    /// Detach the backing buffer. Later reads fail with `Unbound`.
    pub fn unbind(&mut self) {
        self.buf = None;
    }

    pub fn is_bound(&self) -> bool {
        self.buf.is_some()
    }
}

impl Signal for BufferSignal<'_> {
    fn total_length(&self) -> usize {
        self.total_length
    }

    fn read(&self, offset: usize, out: &mut [f32]) -> Result<(), SignalError> {
        let buf = self.buf.ok_or(SignalError::Unbound)?;
        check_bounds(offset, out.len(), self.total_length)?;
        out.copy_from_slice(&buf[offset..offset + out.len()]);
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// Synthetic adapter
// ───────────────────────────────────────────────────────────────

/// Signal whose samples are generated on demand by `f(index)`.
///
/// Handy for exercising scorers against patterns that would be awkward
/// to spell out as literal buffers.
pub struct SyntheticSignal<F> {
    f: F,
    total_length: usize,
}

impl<F> SyntheticSignal<F>
where
    F: Fn(usize) -> f32,
{
    pub fn new(total_length: usize, f: F) -> Result<Self, SignalError> {
        if total_length == 0 {
            return Err(SignalError::InvalidArgument);
        }
        Ok(Self { f, total_length })
    }
}

impl<F> Signal for SyntheticSignal<F>
where
    F: Fn(usize) -> f32,
{
    fn total_length(&self) -> usize {
        self.total_length
    }

    fn read(&self, offset: usize, out: &mut [f32]) -> Result<(), SignalError> {
        check_bounds(offset, out.len(), self.total_length)?;
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = (self.f)(offset + i);
        }
        Ok(())
    }
}
