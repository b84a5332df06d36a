// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Calculate the energy of an image
//!
//! The energy of a pixel is the local color contrast around it: the
//! squared, normalized RGB difference between its left and right
//! neighbors plus the same between its upper and lower neighbors.  At
//! the borders the pixel stands in for its own missing neighbor, so
//! the gradient across the edge of the image is zero.  The sum is
//! clamped to 1.0 and quantized to a byte.
//!
//! This is the cheap four-neighbor gradient, not a Sobel kernel.  It
//! is symmetric under reordering of the color channels, and alpha
//! never contributes.

use crate::buffer::PixelBuffer;
use crate::grid::Grid;
use itertools::iproduct;
use num_traits::clamp;

/// One byte of energy per pixel of the image it was computed from.
pub type EnergyField = Grid<u8>;

const MAX_CHANNEL: f32 = 255.0;

// I'm fond of the ternary operator.  Rust's `if` is already an
// expression, but `cargo fmt` spreads it over five lines and the
// border rules below read much better as a table.
macro_rules! t {
    ($condition: expr, $_true: expr, $_false: expr) => {
        if $condition {
            $_true
        } else {
            $_false
        }
    };
}

// Takes the red, green and blue channels of two pixels, normalizes
// each difference to [0, 1], squares it, and sums them up:
//
//        |Δ|² = (Δr)² + (Δg)² + (Δb)²
//
#[inline]
fn gradient(p1: &[u8], p2: &[u8]) -> f32 {
    p1.iter()
        .zip(p2)
        .take(3)
        .map(|(&c1, &c2)| {
            let d = f32::from(c1.max(c2) - c1.min(c2)) / MAX_CHANNEL;
            d * d
        })
        .sum()
}

#[inline]
fn quantize(energy: f32) -> u8 {
    (clamp(energy, 0.0, 1.0) * MAX_CHANNEL) as u8
}

/// Compute the energy of every pixel in an image.
pub fn calculate_energy(image: &PixelBuffer) -> EnergyField {
    let (width, height) = image.dimensions();
    let (mw, mh) = (width - 1, height - 1);

    let mut emap = EnergyField::new(width, height);
    for (y, x) in iproduct!(0..height, 0..width) {
        let current_pixel = image.pixel(x, y);
        let (leftpixel, rightpixel, uppixel, downpixel) = (
            t!(x == 0, current_pixel, image.pixel(x - 1, y)),
            t!(x >= mw, current_pixel, image.pixel(x + 1, y)),
            t!(y == 0, current_pixel, image.pixel(x, y - 1)),
            t!(y >= mh, current_pixel, image.pixel(x, y + 1)),
        );
        emap[(x, y)] = quantize(gradient(leftpixel, rightpixel) + gradient(uppixel, downpixel));
    }
    emap
}
