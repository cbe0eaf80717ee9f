use std::num::NonZeroU64;

/// A selection of [`Frame`](super::Frame)s.
#[derive(Debug, Default, Clone)]
pub enum FrameSelection {
    /// Include all frames that are in a trajectory.
    #[default]
    All,
    /// Include frames that lie within a certain [`Range`].
    Range(Range),
}

impl FrameSelection {
    /// Determine whether some index `idx` is included in this [`FrameSelection`].
    ///
    /// Will return [`None`] once the index is beyond the scope of this `FrameSelection`. Since
    /// indices are visited in ascending order, no later index will be included either.
    pub fn is_included(&self, idx: usize) -> Option<bool> {
        match self {
            FrameSelection::All => Some(true),
            FrameSelection::Range(range) => range.is_included(idx as u64),
        }
    }

    /// The exclusive upper bound of this selection, if it has one.
    pub fn until(&self) -> Option<usize> {
        match self {
            FrameSelection::All => None,
            FrameSelection::Range(range) => range.end.map(|end| end as usize),
        }
    }
}

/// A range of frame indices, walked with some stride.
///
/// The `start` of a [`Range`] is always bounded, and is zero by default. It is the number of
/// leading frames that are skipped.
/// The `end` may be bounded or unbounded. In case the end is unbounded ([`None`]), the range runs
/// up to and including the last frame.
/// The `step` describes the number of frames that passed in each stride, counted from `start`.
/// For instance, given a `step` of four, one frame is kept and the following three are skipped.
///
/// # Note
///
/// An instance where `start` > `end` is a valid `Range`, but it will not make much sense,
/// since the `Range` will be understood to produce zero frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    /// The `start` of a [`Range`] is always bounded, and is zero by default.
    pub start: u64,
    /// The `end` may be bounded or unbounded.
    ///
    /// When `end` is bounded, it is an exclusive bound.
    pub end: Option<u64>,
    /// The stride between two included frames.
    pub step: NonZeroU64,
}

impl Range {
    pub fn new(start: Option<u64>, end: Option<u64>, step: Option<NonZeroU64>) -> Self {
        let mut sel = Self {
            end,
            ..Self::default()
        };
        if let Some(start) = start {
            sel.start = start;
        }
        if let Some(step) = step {
            sel.step = step;
        }
        sel
    }

    fn is_included(&self, idx: u64) -> Option<bool> {
        if let Some(end) = self.end {
            // Determine whether `idx` is already beyond the defined range.
            if end <= idx {
                return None;
            }
        }
        let Some(offset) = idx.checked_sub(self.start) else {
            return Some(false);
        };
        Some(offset % self.step == 0)
    }
}

impl Default for Range {
    fn default() -> Self {
        Self {
            start: 0,
            end: None,
            step: NonZeroU64::MIN,
        }
    }
}
