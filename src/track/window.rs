//! Fixed-width windows shared by the GC and coverage tracks.

use crate::error::{Result, TrackError};

/// One value of a windowed deviation track over `[start, end)` of a contig.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowedPoint {
    pub contig: String,
    pub start: usize,
    pub end: usize,
    pub value: f64,
    pub color: String,
}

/// Window bounds over `[0, len)`.
///
/// Starts are `0, w, 2w, ...`. The first window that would run past the end
/// is moved back so it ends at `len` (clamped at 0 for short contigs), and
/// nothing is emitted after it. The last two windows may overlap.
#[derive(Debug, Clone)]
pub struct WindowBounds {
    len: usize,
    window: usize,
    next_start: usize,
    done: bool,
}

impl WindowBounds {
    pub fn new(len: usize, window: usize) -> Result<Self> {
        if window == 0 {
            return Err(TrackError::InvalidParameter(
                "window size must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            len,
            window,
            next_start: 0,
            done: len == 0,
        })
    }
}

impl Iterator for WindowBounds {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.next_start >= self.len {
            return None;
        }

        let end = self.next_start + self.window;
        if end >= self.len {
            self.done = true;
            return Some((self.len.saturating_sub(self.window), self.len));
        }

        let start = self.next_start;
        self.next_start = end;
        Some((start, end))
    }
}
