// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Seamcarve - removing seams until the image fits
//!
//! Only vertical seams are ever searched for.  Narrowing is a loop of
//! energy, seam, cut; shortening is the same loop run on the
//! transposed image, which is then transposed back.
//!
//! Growing an image by seam insertion is a different problem (pick the
//! k cheapest seams up front, then duplicate them in order) and is not
//! done here.  Asking for it is an error, never a silent rescale.

use crate::buffer::PixelBuffer;
use crate::error::{Axis, ResizeError, Result};
use crate::seamfinder::{calculate_seam, Seam};
use log::trace;
use rand::Rng;

fn check_target(axis: Axis, from: u32, to: u32) -> Result<()> {
    if to == 0 {
        return Err(ResizeError::invalid(format!("cannot carve the {} to zero", axis)));
    }
    if to > from {
        return Err(ResizeError::UnsupportedOperation { axis, from, to });
    }
    Ok(())
}

/// Cut `seam` out of `image`, writing the one-column-narrower result
/// into `target`.  `target`'s storage is reused; its previous contents
/// are discarded.
pub fn remove_seam_into(image: &PixelBuffer, seam: &Seam, target: &mut PixelBuffer) -> Result<()> {
    let (width, height) = image.dimensions();
    if !seam.fits(width, height) {
        return Err(ResizeError::invalid(format!(
            "a seam of {} rows does not fit a {}x{} image",
            seam.len(),
            width,
            height
        )));
    }
    if width < 2 {
        return Err(ResizeError::invalid("cannot carve the last column"));
    }
    if target.channels() != image.channels() {
        return Err(ResizeError::invalid(format!(
            "cannot carve a {}-channel image into a {}-channel buffer",
            image.channels(),
            target.channels()
        )));
    }

    let channels = image.channels() as usize;
    let data = target.reshape(width - 1, height)?;
    for (y, &x) in (0..height).zip(seam.columns()) {
        let row = image.row(y);
        let cut = x as usize * channels;
        data.extend_from_slice(&row[..cut]);
        data.extend_from_slice(&row[cut + channels..]);
    }
    Ok(())
}

/// Cut `seam` out of `image` into a freshly allocated buffer.
pub fn remove_seam(image: &PixelBuffer, seam: &Seam) -> Result<PixelBuffer> {
    let mut target = PixelBuffer::scratch(image.width(), image.height(), image.channels())?;
    remove_seam_into(image, seam, &mut target)?;
    Ok(target)
}

/// Change the width of `image` by one column along `seam`.  Only
/// shrinking is supported.
pub fn carve_seam(image: &PixelBuffer, seam: &Seam, out_width: u32) -> Result<PixelBuffer> {
    let width = image.width();
    check_target(Axis::Width, width, out_width)?;
    if out_width + 1 != width {
        return Err(ResizeError::invalid(format!(
            "a single seam takes a width of {} to {}, not {}",
            width,
            width - 1,
            out_width
        )));
    }
    remove_seam(image, seam)
}

/// Narrow `image` to `out_width` one seam at a time.
pub fn reduce_width<R: Rng + ?Sized>(
    image: &PixelBuffer,
    out_width: u32,
    rng: &mut R,
) -> Result<PixelBuffer> {
    reduce_width_with(image, out_width, rng, |_, _| ())
}

/// Narrow `image` to `out_width`, calling `each` with the working image
/// and the seam about to be cut from it before every step.
///
/// Two buffers, each big enough for the source image, are swapped back
/// and forth; nothing is allocated inside the loop.  The working image
/// is always complete between steps.
pub fn reduce_width_with<R, F>(
    image: &PixelBuffer,
    out_width: u32,
    rng: &mut R,
    mut each: F,
) -> Result<PixelBuffer>
where
    R: Rng + ?Sized,
    F: FnMut(&PixelBuffer, &Seam),
{
    let (width, height) = image.dimensions();
    check_target(Axis::Width, width, out_width)?;

    let mut current = image.try_clone()?;
    let mut next = PixelBuffer::scratch(width, height, image.channels())?;

    while current.width() > out_width {
        let seam = calculate_seam(&current, rng)?;
        trace!(
            "carving width {} -> {}, seam ends at column {}",
            current.width(),
            current.width() - 1,
            seam.columns().last().copied().unwrap_or(0)
        );
        each(&current, &seam);
        remove_seam_into(&current, &seam, &mut next)?;
        std::mem::swap(&mut current, &mut next);
    }
    Ok(current)
}

/// Shorten `image` to `out_height` by carving the transposed image and
/// transposing the result back.
pub fn reduce_height<R: Rng + ?Sized>(
    image: &PixelBuffer,
    out_height: u32,
    rng: &mut R,
) -> Result<PixelBuffer> {
    let height = image.height();
    check_target(Axis::Height, height, out_height)?;
    if out_height == height {
        return image.try_clone();
    }
    reduce_width(&image.transpose()?, out_height, rng)?.transpose()
}
