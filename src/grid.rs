// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::ops::{Index, IndexMut};

/// An addressable two-dimensional field of scratch values: the byte
/// energy of each pixel, or the accumulated seam cost plus the parent
/// column it was reached from.  Allocated and thrown away once per
/// seam.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<P: Default + Copy> {
    pub width: u32,
    pub height: u32,
    cells: Vec<P>,
}

impl<P: Default + Copy> Grid<P> {
    /// A grid filled with `P::default()`.
    pub fn new(width: u32, height: u32) -> Self {
        Grid {
            width,
            height,
            cells: vec![P::default(); width as usize * height as usize],
        }
    }

    /// Wrap a row-major vector of cells.  Returns `None` if the vector
    /// is the wrong size.
    pub fn from_vec(width: u32, height: u32, cells: Vec<P>) -> Option<Self> {
        if cells.len() == width as usize * height as usize {
            Some(Grid {
                width,
                height,
                cells,
            })
        } else {
            None
        }
    }

    // Absolutely, the number one name of this game is keep the index
    // math in a singular location and never, ever mess with it.
    fn get_index(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + (x as usize)
    }

    /// One row of cells.
    pub fn row(&self, y: u32) -> &[P] {
        let start = self.get_index(0, y);
        &self.cells[start..start + self.width as usize]
    }

    /// Every cell, row-major.
    pub fn cells(&self) -> &[P] {
        &self.cells
    }
}

impl<P: Default + Copy> Index<(u32, u32)> for Grid<P> {
    type Output = P;

    fn index(&self, (x, y): (u32, u32)) -> &P {
        let index = self.get_index(x, y);
        &self.cells[index]
    }
}

impl<P: Default + Copy> IndexMut<(u32, u32)> for Grid<P> {
    fn index_mut(&mut self, (x, y): (u32, u32)) -> &mut P {
        let index = self.get_index(x, y);
        &mut self.cells[index]
    }
}

/// A cell of the accumulated cost field: the cheapest total energy of
/// any seam ending here, and the column in the row above it came from.
#[derive(Default, Debug, Copy, Clone, PartialEq)]
pub struct CostAndParent {
    pub cost: u32,
    pub parent: u32,
}
