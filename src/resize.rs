// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Resize - the entry point
//!
//! Works out the target size, then either carves (height first, then
//! width) or hands the whole job to a resampler.  The caller's buffer
//! is only ever read; on any failure it is exactly as it was.

use crate::buffer::PixelBuffer;
use crate::config::ResizeConfig;
use crate::error::{Axis, ResizeError, Result};
use crate::resample::{FilterResampler, Resampler};
use crate::seamcarver::{reduce_height, reduce_width};
use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Resize `image` as `config` describes, resampling with the default
/// filter when seam carving is off.
pub fn resize(image: &PixelBuffer, config: &ResizeConfig) -> Result<PixelBuffer> {
    resize_with(image, config, &FilterResampler::default())
}

/// Resize `image` as `config` describes, using `resampler` when seam
/// carving is off.
pub fn resize_with(
    image: &PixelBuffer,
    config: &ResizeConfig,
    resampler: &dyn Resampler,
) -> Result<PixelBuffer> {
    let (width, height) = image.dimensions();
    let (out_width, out_height) = config.target_dimensions(width, height)?;

    if (out_width, out_height) == (width, height) {
        debug!("{}x{} is already the requested size", width, height);
        return image.try_clone();
    }

    if !config.seam_carving {
        debug!(
            "resampling {}x{} -> {}x{}",
            width, height, out_width, out_height
        );
        return resampler.resample(image, out_width, out_height);
    }

    // Both axes are checked before any pixel is touched.
    if out_height > height {
        return Err(ResizeError::UnsupportedOperation {
            axis: Axis::Height,
            from: height,
            to: out_height,
        });
    }
    if out_width > width {
        return Err(ResizeError::UnsupportedOperation {
            axis: Axis::Width,
            from: width,
            to: out_width,
        });
    }

    let seed = config.effective_seed();
    debug!(
        "carving {}x{} -> {}x{} (seed {})",
        width, height, out_width, out_height, seed
    );
    let mut rng = StdRng::seed_from_u64(seed);

    let shortened = if out_height < height {
        Some(reduce_height(image, out_height, &mut rng)?)
    } else {
        None
    };
    let source = shortened.as_ref().unwrap_or(image);

    if out_width < width {
        reduce_width(source, out_width, &mut rng)
    } else if let Some(shortened) = shortened {
        Ok(shortened)
    } else {
        image.try_clone()
    }
}
