// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Find the cheapest top-to-bottom seam
//!
//! The classic dynamic program: the first row of the cost field is the
//! energy itself, and every later cell is its own energy plus the
//! cheapest of the (up to) three cells above it.  Walking the parent
//! pointers back up from the cheapest cell of the last row gives the
//! seam.
//!
//! Ties are broken uniformly at random, both between parents and
//! between anchors in the last row.  Always picking the leftmost (or
//! rightmost) candidate drags every seam through a flat region toward
//! one side of it, which shows badly after a few dozen carves.

use crate::buffer::PixelBuffer;
use crate::energy::{calculate_energy, EnergyField};
use crate::error::{ResizeError, Result};
use crate::grid::{CostAndParent, Grid};
use rand::Rng;

/// The accumulated cost of the cheapest seam ending at each pixel,
/// with the column it arrived from.
pub type CostField = Grid<CostAndParent>;

/// A connected top-to-bottom path: one column index per row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seam(Vec<u32>);

impl Seam {
    /// Wrap a list of column indices, one per row.
    pub fn new(columns: Vec<u32>) -> Self {
        Seam(columns)
    }

    pub fn columns(&self) -> &[u32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True if consecutive rows never step more than one column.
    pub fn is_contiguous(&self) -> bool {
        self.0
            .windows(2)
            .all(|pair| pair[0].max(pair[1]) - pair[0].min(pair[1]) <= 1)
    }

    /// True if this seam can be cut out of a `width` x `height` image.
    pub fn fits(&self, width: u32, height: u32) -> bool {
        self.0.len() == height as usize && self.0.iter().all(|&x| x < width) && self.is_contiguous()
    }
}

// Pick one of the tied candidates.  A lone candidate costs no draw
// from the generator.
fn pick<R: Rng + ?Sized>(tied: &[u32], rng: &mut R) -> u32 {
    if tied.len() == 1 {
        tied[0]
    } else {
        tied[rng.gen_range(0..tied.len())]
    }
}

/// Build the accumulated cost field for an energy field.
pub fn accumulate_cost<R: Rng + ?Sized>(energy: &EnergyField, rng: &mut R) -> CostField {
    let (width, height) = (energy.width, energy.height);
    let mut target = CostField::new(width, height);
    if width == 0 || height == 0 {
        return target;
    }

    for x in 0..width {
        target[(x, 0)].cost = u32::from(energy[(x, 0)]);
    }

    let maxwidth = width - 1;
    let mut tied = [0u32; 3];
    for y in 1..height {
        for x in 0..width {
            let lo = if x == 0 { 0 } else { x - 1 };
            let hi = if x == maxwidth { maxwidth } else { x + 1 };

            let mut best = u32::MAX;
            let mut count = 0;
            for px in lo..=hi {
                let cost = target[(px, y - 1)].cost;
                if cost < best {
                    best = cost;
                    count = 0;
                }
                if cost == best {
                    tied[count] = px;
                    count += 1;
                }
            }

            target[(x, y)] = CostAndParent {
                cost: u32::from(energy[(x, y)]).saturating_add(best),
                parent: pick(&tied[..count], rng),
            };
        }
    }
    target
}

/// Trace the cheapest seam out of a finished cost field.
pub fn cost_to_seam<R: Rng + ?Sized>(cost: &CostField, rng: &mut R) -> Result<Seam> {
    let (width, height) = (cost.width, cost.height);
    if width == 0 || height == 0 {
        return Err(ResizeError::invalid(format!(
            "no seam through a {}x{} field",
            width, height
        )));
    }

    let bottom = cost.row(height - 1);
    let least = bottom.iter().map(|c| c.cost).min().unwrap_or(0);
    let anchors: Vec<u32> = (0..width)
        .filter(|&x| bottom[x as usize].cost == least)
        .collect();

    // Working backwards, generate the x coordinates of the seam from
    // the bottom row up, then reverse.
    let mut seam_col = pick(&anchors, rng);
    let mut columns: Vec<u32> = (0..height)
        .rev()
        .map(|y| {
            let here = seam_col;
            seam_col = cost[(here, y)].parent;
            here
        })
        .collect();
    columns.reverse();
    Ok(Seam(columns))
}

/// Given an energy field, return the globally cheapest vertical seam.
pub fn find_seam<R: Rng + ?Sized>(energy: &EnergyField, rng: &mut R) -> Result<Seam> {
    cost_to_seam(&accumulate_cost(energy, rng), rng)
}

/// A convenience wrapper: the next vertical seam of an image.
pub fn calculate_seam<R: Rng + ?Sized>(image: &PixelBuffer, rng: &mut R) -> Result<Seam> {
    find_seam(&calculate_energy(image), rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    const ENERGY_DATA: [u8; 20] = [9, 9, 0, 9, 9, 9, 1, 9, 8, 9, 9, 9, 9, 9, 0, 9, 9, 9, 0, 9];

    fn field(width: u32, height: u32, cells: &[u8]) -> EnergyField {
        Grid::from_vec(width, height, cells.to_vec()).unwrap()
    }

    fn seam_cost(energy: &EnergyField, seam: &[u32]) -> u32 {
        seam.iter()
            .enumerate()
            .map(|(y, &x)| u32::from(energy[(x, y as u32)]))
            .sum()
    }

    // Every legal seam, by brute force.
    fn cheapest_by_enumeration(energy: &EnergyField) -> u32 {
        fn walk(energy: &EnergyField, x: u32, y: u32) -> u32 {
            let here = u32::from(energy[(x, y)]);
            if y + 1 == energy.height {
                return here;
            }
            let lo = x.saturating_sub(1);
            let hi = (x + 1).min(energy.width - 1);
            here + (lo..=hi).map(|nx| walk(energy, nx, y + 1)).min().unwrap()
        }
        (0..energy.width).map(|x| walk(energy, x, 0)).min().unwrap()
    }

    #[test]
    fn energy_grid_to_vertical_seam() {
        let energies = field(5, 4, &ENERGY_DATA);
        let mut rng = StdRng::seed_from_u64(1);
        let seam = find_seam(&energies, &mut rng).unwrap();
        assert_eq!(seam.columns(), &[2, 3, 4, 3]);
    }

    #[test]
    fn cost_field_accumulates_downward() {
        let energies = field(5, 4, &ENERGY_DATA);
        let cost = accumulate_cost(&energies, &mut StdRng::seed_from_u64(1));
        let row: Vec<u32> = cost.row(3).iter().map(|c| c.cost).collect();
        assert_eq!(row, vec![19, 19, 19, 8, 17]);
        assert_eq!(cost[(3, 3)].parent, 4);
    }

    #[test]
    fn narrow_images_have_a_straight_seam() {
        let energies = field(1, 4, &[3, 200, 0, 9]);
        let seam = find_seam(&energies, &mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(seam.columns(), &[0, 0, 0, 0]);
    }

    #[test]
    fn empty_fields_have_no_seam() {
        let energies: EnergyField = Grid::new(0, 3);
        assert!(find_seam(&energies, &mut StdRng::seed_from_u64(7)).is_err());
    }

    #[test]
    fn seams_are_globally_cheapest() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for trial in 0..40 {
            let (width, height) = (2 + trial % 5, 1 + trial % 6);
            let cells: Vec<u8> = (0..width * height).map(|_| rng.gen_range(0..6)).collect();
            let energies = field(width, height, &cells);
            let seam = find_seam(&energies, &mut rng).unwrap();
            assert!(seam.fits(width, height));
            assert_eq!(
                seam_cost(&energies, seam.columns()),
                cheapest_by_enumeration(&energies)
            );
        }
    }

    #[test]
    fn same_seed_same_seam() {
        let energies = field(6, 5, &[4; 30]);
        let a = find_seam(&energies, &mut StdRng::seed_from_u64(42)).unwrap();
        let b = find_seam(&energies, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn ties_are_spread_across_every_candidate() {
        let energies = field(4, 3, &[0; 12]);
        let mut anchors = HashSet::new();
        let mut tops = HashSet::new();
        for seed in 0..200 {
            let seam = find_seam(&energies, &mut StdRng::seed_from_u64(seed)).unwrap();
            assert!(seam.is_contiguous());
            anchors.insert(seam.columns()[2]);
            tops.insert(seam.columns()[0]);
        }
        assert_eq!(anchors.len(), 4);
        assert_eq!(tops.len(), 4);
    }

    #[test]
    fn contiguity_check() {
        assert!(Seam::new(vec![3, 2, 2, 3, 4]).is_contiguous());
        assert!(!Seam::new(vec![0, 2]).is_contiguous());
        assert!(!Seam::new(vec![0, 1]).fits(1, 2));
    }
}
