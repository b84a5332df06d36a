// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Uniform resampling
//!
//! The plain, content-blind resize.  The orchestrator only needs
//! something that maps a buffer to a new buffer of the requested size
//! or says why it can't; the default hands the job to `image`.

use crate::buffer::PixelBuffer;
use crate::error::{ResizeError, Result};
use image::imageops::{self, FilterType};
use image::{ImageBuffer, Pixel, Rgb, Rgba};

/// Something that can scale every pixel of an image uniformly.
pub trait Resampler {
    /// Produce a `width` x `height` copy of `image`.  Must not touch
    /// `image`, whether it succeeds or not.
    fn resample(&self, image: &PixelBuffer, width: u32, height: u32) -> Result<PixelBuffer>;
}

/// Resample with one of the `image` crate's reconstruction filters.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FilterResampler {
    pub filter: FilterType,
}

impl Default for FilterResampler {
    fn default() -> Self {
        FilterResampler {
            filter: FilterType::CatmullRom,
        }
    }
}

fn resize_as<P>(image: &PixelBuffer, width: u32, height: u32, filter: FilterType) -> Option<Vec<u8>>
where
    P: Pixel<Subpixel = u8> + 'static,
{
    let source: ImageBuffer<P, &[u8]> =
        ImageBuffer::from_raw(image.width(), image.height(), image.as_raw())?;
    Some(imageops::resize(&source, width, height, filter).into_raw())
}

impl Resampler for FilterResampler {
    fn resample(&self, image: &PixelBuffer, width: u32, height: u32) -> Result<PixelBuffer> {
        let failed = |reason: &str| ResizeError::ResampleFailed {
            width,
            height,
            reason: reason.to_string(),
        };
        if width == 0 || height == 0 {
            return Err(failed("empty target"));
        }

        let resized = match image.channels() {
            3 => resize_as::<Rgb<u8>>(image, width, height, self.filter),
            4 => resize_as::<Rgba<u8>>(image, width, height, self.filter),
            _ => None,
        };
        let data = resized.ok_or_else(|| failed("unsupported pixel layout"))?;
        PixelBuffer::from_raw(width, height, image.channels(), data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn halves_a_flat_image() {
        let image = PixelBuffer::from_raw(10, 10, 3, vec![128; 300]).unwrap();
        let half = FilterResampler::default().resample(&image, 5, 5).unwrap();
        assert_eq!(half.dimensions(), (5, 5));
        assert_eq!(half.channels(), 3);
        assert!(half.as_raw().iter().all(|&c| c == 128));
    }

    #[test]
    fn grows_with_alpha() {
        let image = PixelBuffer::from_raw(2, 2, 4, vec![50; 16]).unwrap();
        let resampler = FilterResampler {
            filter: FilterType::Nearest,
        };
        let big = resampler.resample(&image, 7, 3).unwrap();
        assert_eq!(big.dimensions(), (7, 3));
        assert_eq!(big.channels(), 4);
        assert!(big.as_raw().iter().all(|&c| c == 50));
    }

    #[test]
    fn refuses_empty_targets() {
        let image = PixelBuffer::from_raw(2, 2, 3, vec![0; 12]).unwrap();
        let err = FilterResampler::default().resample(&image, 0, 2).unwrap_err();
        assert!(matches!(err, ResizeError::ResampleFailed { width: 0, .. }));
    }
}
