// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The pixel buffer
//!
//! A flat, row-major run of interleaved 8-bit samples: three (RGB) or
//! four (RGBA) per pixel.  Every stage of the carver owns the buffer it
//! is working on and hands a fresh one to the next stage, so there is
//! never any aliasing between the "current" image and the "next" one.

use crate::error::{ResizeError, Result};
use image::{DynamicImage, RgbImage, RgbaImage};

/// An owned, decoded image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    channels: u8,
    data: Vec<u8>,
}

fn byte_len(width: u32, height: u32, channels: u8) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)?
        .checked_mul(channels as usize)
}

fn check_shape(width: u32, height: u32, channels: u8) -> Result<usize> {
    if channels != 3 && channels != 4 {
        return Err(ResizeError::invalid(format!(
            "{} channels per pixel, expected 3 or 4",
            channels
        )));
    }
    if width == 0 || height == 0 {
        return Err(ResizeError::invalid(format!(
            "{}x{} image has no pixels",
            width, height
        )));
    }
    byte_len(width, height, channels).ok_or_else(|| {
        ResizeError::invalid(format!("{}x{} image is too large", width, height))
    })
}

/// Reserve exactly `len` more bytes, turning an allocator refusal into
/// an error instead of an abort.
pub(crate) fn reserve(
    data: &mut Vec<u8>,
    len: usize,
    (width, height, channels): (u32, u32, u8),
) -> Result<()> {
    data.try_reserve_exact(len)
        .map_err(|_| ResizeError::AllocationFailure {
            width,
            height,
            channels,
        })
}

impl PixelBuffer {
    /// A black image of the given shape.
    pub fn new(width: u32, height: u32, channels: u8) -> Result<Self> {
        let len = check_shape(width, height, channels)?;
        let mut data = Vec::new();
        reserve(&mut data, len, (width, height, channels))?;
        data.resize(len, 0);
        Ok(PixelBuffer {
            width,
            height,
            channels,
            data,
        })
    }

    /// Wrap already-decoded samples.  The length of `data` must be
    /// exactly `width * height * channels`.
    pub fn from_raw(width: u32, height: u32, channels: u8, data: Vec<u8>) -> Result<Self> {
        let len = check_shape(width, height, channels)?;
        if data.len() != len {
            return Err(ResizeError::invalid(format!(
                "{} bytes supplied for a {}x{}x{} image, expected {}",
                data.len(),
                width,
                height,
                channels,
                len
            )));
        }
        Ok(PixelBuffer {
            width,
            height,
            channels,
            data,
        })
    }

    /// An empty buffer whose storage can hold a `width` x `height`
    /// image without reallocating.  Used as the second half of the
    /// carver's double buffer; it holds no pixels until refilled.
    pub(crate) fn scratch(width: u32, height: u32, channels: u8) -> Result<Self> {
        let len = check_shape(width, height, channels)?;
        let mut data = Vec::new();
        reserve(&mut data, len, (width, height, channels))?;
        Ok(PixelBuffer {
            width: 0,
            height,
            channels,
            data,
        })
    }

    /// Forget the current contents and take on a new shape, keeping the
    /// allocation.  The caller is responsible for pushing exactly
    /// `width * height * channels` bytes afterward.
    pub(crate) fn reshape(&mut self, width: u32, height: u32) -> Result<&mut Vec<u8>> {
        let len = check_shape(width, height, self.channels)?;
        self.width = width;
        self.height = height;
        self.data.clear();
        reserve(&mut self.data, len, (width, height, self.channels))?;
        Ok(&mut self.data)
    }

    /// A copy that reports allocation failure instead of aborting.
    pub fn try_clone(&self) -> Result<Self> {
        let mut copy = PixelBuffer::scratch(self.width, self.height, self.channels)?;
        copy.reshape(self.width, self.height)?
            .extend_from_slice(&self.data);
        Ok(copy)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    // As with the grids, the index math lives here and only here.
    fn get_index(&self, x: u32, y: u32) -> usize {
        self.channels as usize * ((y as usize) * (self.width as usize) + (x as usize))
    }

    /// The samples of one pixel.
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let start = self.get_index(x, y);
        &self.data[start..start + self.channels as usize]
    }

    /// The samples of one full row.
    pub fn row(&self, y: u32) -> &[u8] {
        let start = self.get_index(0, y);
        &self.data[start..start + self.channels as usize * self.width as usize]
    }

    /// Swap the axes: pixel (x, y) becomes pixel (y, x) of a
    /// `height` x `width` image.
    pub fn transpose(&self) -> Result<Self> {
        let (width, height) = (self.height, self.width);
        let mut out = PixelBuffer::scratch(width, height, self.channels)?;
        let data = out.reshape(width, height)?;
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(self.pixel(y, x));
            }
        }
        Ok(out)
    }

    /// Take over a decoded image.  Anything with an alpha channel
    /// becomes RGBA, everything else RGB; deeper samples are reduced
    /// to eight bits.
    pub fn from_dynamic(image: DynamicImage) -> Result<Self> {
        let (width, height) = (image.width(), image.height());
        if image.color().has_alpha() {
            PixelBuffer::from_raw(width, height, 4, image.into_rgba8().into_raw())
        } else {
            PixelBuffer::from_raw(width, height, 3, image.into_rgb8().into_raw())
        }
    }

    /// Hand the pixels back to the `image` crate for encoding.
    pub fn into_dynamic(self) -> Result<DynamicImage> {
        let (width, height, channels) = (self.width, self.height, self.channels);
        let image = match channels {
            3 => RgbImage::from_raw(width, height, self.data).map(DynamicImage::ImageRgb8),
            4 => RgbaImage::from_raw(width, height, self.data).map(DynamicImage::ImageRgba8),
            _ => None,
        };
        image.ok_or_else(|| {
            ResizeError::invalid(format!(
                "cannot express a {}x{}x{} buffer as an image",
                width, height, channels
            ))
        })
    }
}
