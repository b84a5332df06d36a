// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Resize errors
//!
//! Every failure aborts the resize of one image only.  None of them
//! is ever "recovered" from inside the engine; the caller decides
//! whether to log, retry or skip.

use failure::Fail;
use std::fmt;

/// The two axes an image can be resized along.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Axis {
    Width,
    Height,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Axis::Width => write!(f, "width"),
            Axis::Height => write!(f, "height"),
        }
    }
}

#[derive(Debug, Fail, PartialEq)]
pub enum ResizeError {
    /// Seam carving was asked to grow an axis.  There is no seam
    /// insertion, and quietly scaling instead would be wrong.
    #[fail(
        display = "seam carving cannot grow the {} from {} to {}",
        axis, from, to
    )]
    UnsupportedOperation { axis: Axis, from: u32, to: u32 },

    #[fail(
        display = "could not allocate a {}x{} buffer with {} channels",
        width, height, channels
    )]
    AllocationFailure { width: u32, height: u32, channels: u8 },

    #[fail(display = "invalid dimensions: {}", reason)]
    InvalidDimensions { reason: String },

    #[fail(display = "a scale factor cannot be combined with a width or height")]
    ConflictingTargets,

    #[fail(display = "resampling to {}x{} failed: {}", width, height, reason)]
    ResampleFailed {
        width: u32,
        height: u32,
        reason: String,
    },
}

impl ResizeError {
    pub(crate) fn invalid<S: Into<String>>(reason: S) -> Self {
        ResizeError::InvalidDimensions {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ResizeError>;
