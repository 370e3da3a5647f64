//! Slice bounds with start/stop/step semantics
//!
//! Negative bounds count from the end, out-of-range bounds clamp, and a
//! negative step walks backwards. `Slice::default()` selects everything.

use std::ops::{Range, RangeFrom, RangeFull, RangeTo};

use crate::error::CycleError;

/// A `[start:stop:step]` selection over a cycle's positions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Slice {
    /// First position (inclusive); `None` means the natural start for the step
    pub start: Option<isize>,
    /// End position (exclusive); `None` means the natural end for the step
    pub stop: Option<isize>,
    /// Stride; `None` means 1
    pub step: Option<isize>,
}

impl Slice {
    /// `[start:stop]`
    #[must_use]
    pub const fn new(start: Option<isize>, stop: Option<isize>) -> Self {
        Self {
            start,
            stop,
            step: None,
        }
    }

    /// `[::-1]`
    #[must_use]
    pub const fn reversed() -> Self {
        Self {
            start: None,
            stop: None,
            step: Some(-1),
        }
    }

    /// Same bounds with a different stride
    #[must_use]
    pub const fn with_step(mut self, step: isize) -> Self {
        self.step = Some(step);
        self
    }

    /// Resolve the selected positions for a sequence of `len` items.
    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    pub fn indices(&self, len: usize) -> Result<Vec<usize>, CycleError> {
        let step = self.step.unwrap_or(1);
        if step == 0 {
            return Err(CycleError::ZeroStep);
        }
        let len = len as isize;
        let (lower, upper) = if step < 0 { (-1, len - 1) } else { (0, len) };

        let clamp = |bound: isize| {
            if bound < 0 {
                (bound + len).max(lower)
            } else {
                bound.min(upper)
            }
        };
        let start = self
            .start
            .map_or(if step < 0 { upper } else { lower }, clamp);
        let stop = self
            .stop
            .map_or(if step < 0 { lower } else { upper }, clamp);

        let mut out = Vec::new();
        let mut i = start;
        while (step > 0 && i < stop) || (step < 0 && i > stop) {
            out.push(i as usize);
            match i.checked_add(step) {
                Some(next) => i = next,
                None => break,
            }
        }
        Ok(out)
    }

    /// Apply the slice to a list of values.
    pub fn apply<T: Clone>(&self, items: &[T]) -> Result<Vec<T>, CycleError> {
        Ok(self
            .indices(items.len())?
            .into_iter()
            .map(|i| items[i].clone())
            .collect())
    }
}

#[allow(clippy::cast_possible_wrap)]
impl From<Range<usize>> for Slice {
    fn from(r: Range<usize>) -> Self {
        Self::new(Some(r.start as isize), Some(r.end as isize))
    }
}

#[allow(clippy::cast_possible_wrap)]
impl From<RangeFrom<usize>> for Slice {
    fn from(r: RangeFrom<usize>) -> Self {
        Self::new(Some(r.start as isize), None)
    }
}

#[allow(clippy::cast_possible_wrap)]
impl From<RangeTo<usize>> for Slice {
    fn from(r: RangeTo<usize>) -> Self {
        Self::new(None, Some(r.end as isize))
    }
}

impl From<RangeFull> for Slice {
    fn from(_: RangeFull) -> Self {
        Self::default()
    }
}
