// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! What the caller asked for
//!
//! A resize is described once, up front, and passed down explicitly.
//! Only the orchestrator looks at it; the carving stages below it take
//! plain dimensions and a random number generator.

use crate::error::{ResizeError, Result};
use std::convert::TryFrom;
use std::time::{SystemTime, UNIX_EPOCH};

/// The requested output size.  A scale factor and explicit dimensions
/// cannot be mixed.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Target {
    /// Multiply both axes by this factor, rounding down.
    Scale(f64),
    /// Replace the axes that are given; keep the others.
    Explicit {
        width: Option<u32>,
        height: Option<u32>,
    },
}

impl Default for Target {
    fn default() -> Self {
        Target::Explicit {
            width: None,
            height: None,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct ResizeConfig {
    /// Carve seams instead of resampling.  Shrinking only.
    pub seam_carving: bool,
    pub target: Target,
    /// Seed for the seam tie-breaker.  `None` seeds from the clock.
    pub seed: Option<u64>,
}

fn positive(axis: &str, value: i64) -> Result<u32> {
    if value <= 0 {
        return Err(ResizeError::invalid(format!(
            "{} must be positive, got {}",
            axis, value
        )));
    }
    u32::try_from(value)
        .map_err(|_| ResizeError::invalid(format!("{} of {} is too large", axis, value)))
}

fn scaled(axis: &str, length: u32, scale: f64) -> Result<u32> {
    let result = (f64::from(length) * scale).floor();
    if result < 1.0 {
        return Err(ResizeError::invalid(format!(
            "scaling a {} of {} by {} leaves nothing",
            axis, length, scale
        )));
    }
    if result > f64::from(u32::MAX) {
        return Err(ResizeError::invalid(format!(
            "scaling a {} of {} by {} overflows",
            axis, length, scale
        )));
    }
    Ok(result as u32)
}

/// A seed that differs from run to run.
pub fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or(0)
}

impl ResizeConfig {
    /// Build a configuration from loose caller options, checking them
    /// the way a command line would want them checked: a scale cannot
    /// be combined with a width or height, and nothing may be zero or
    /// negative.  No options at all leaves the image its own size.
    pub fn from_options(
        seam_carving: bool,
        width: Option<i64>,
        height: Option<i64>,
        scale: Option<f64>,
    ) -> Result<Self> {
        let target = match (scale, width, height) {
            (Some(_), Some(_), _) | (Some(_), _, Some(_)) => {
                return Err(ResizeError::ConflictingTargets)
            }
            (Some(scale), None, None) => Target::Scale(scale),
            (None, width, height) => Target::Explicit {
                width: width.map(|w| positive("width", w)).transpose()?,
                height: height.map(|h| positive("height", h)).transpose()?,
            },
        };
        let config = ResizeConfig {
            seam_carving,
            target,
            seed: None,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_seed(self, seed: u64) -> Self {
        ResizeConfig {
            seed: Some(seed),
            ..self
        }
    }

    /// Reject targets that could never produce an image.
    pub fn validate(&self) -> Result<()> {
        match self.target {
            Target::Scale(scale) if !(scale.is_finite() && scale > 0.0) => Err(
                ResizeError::invalid(format!("scale must be positive, got {}", scale)),
            ),
            Target::Explicit { width: Some(0), .. } => {
                Err(ResizeError::invalid("width must be positive, got 0"))
            }
            Target::Explicit {
                height: Some(0), ..
            } => Err(ResizeError::invalid("height must be positive, got 0")),
            _ => Ok(()),
        }
    }

    /// The size an image of `width` x `height` should come out as.
    pub fn target_dimensions(&self, width: u32, height: u32) -> Result<(u32, u32)> {
        self.validate()?;
        match self.target {
            Target::Scale(scale) => Ok((
                scaled("width", width, scale)?,
                scaled("height", height, scale)?,
            )),
            Target::Explicit {
                width: w,
                height: h,
            } => Ok((w.unwrap_or(width), h.unwrap_or(height))),
        }
    }

    /// The seed this resize will use.
    pub fn effective_seed(&self) -> u64 {
        self.seed.unwrap_or_else(time_seed)
    }
}
