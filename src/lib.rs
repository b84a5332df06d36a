// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Batch image resizing with optional content-aware seam carving.
//!
//! The engine works on an owned, decoded [`PixelBuffer`]: [`resize`]
//! computes the target size from a [`ResizeConfig`] and either removes
//! the cheapest seams one at a time (height first, by way of the
//! transpose, then width) or resamples uniformly.

pub mod buffer;
pub use buffer::PixelBuffer;

pub mod error;
pub use error::{Axis, ResizeError, Result};

pub mod grid;

pub mod energy;
pub use energy::calculate_energy;

pub mod seamfinder;
pub use seamfinder::{calculate_seam, find_seam, Seam};

pub mod seamcarver;
pub use seamcarver::{carve_seam, reduce_height, reduce_width};

pub mod resample;
pub use resample::{FilterResampler, Resampler};

pub mod config;
pub use config::{ResizeConfig, Target};

pub mod resize;
pub use resize::{resize, resize_with};

pub mod filetype;
pub mod batch;
