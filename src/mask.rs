//! Mask patterns, the penalty score, and mask selection.

use rayon::prelude::*;
use tracing::debug;

use crate::matrix::{Module, ModuleMatrix};
use crate::tables::{PENALTY_N1, PENALTY_N2, PENALTY_N3, PENALTY_N4};
use crate::version::QrCodeEcc;

/// A mask pattern (0–7).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
pub struct Mask(u8);

impl Mask {
    /// Creates a mask object from the given number.
    ///
    /// # Panics
    ///
    /// Panics if the number is outside the range [0, 7].
    pub const fn new(mask: u8) -> Self {
        assert!(mask <= 7, "Mask value out of range");
        Self(mask)
    }

    /// Returns the value, which is in the range [0, 7].
    pub const fn value(self) -> u8 {
        self.0
    }

    /// All eight masks in index order.
    pub fn all() -> impl Iterator<Item = Mask> {
        (0u8..8).map(Mask)
    }

    /// Whether this mask flips the module at column `x`, row `y`.
    pub fn inverts(self, x: usize, y: usize) -> bool {
        match self.0 {
            0 => (x + y) % 2 == 0,
            1 => y % 2 == 0,
            2 => x % 3 == 0,
            3 => (x + y) % 3 == 0,
            4 => (x / 3 + y / 2) % 2 == 0,
            5 => (x * y) % 2 + (x * y) % 3 == 0,
            6 => ((x * y) % 2 + (x * y) % 3) % 2 == 0,
            7 => ((x + y) % 2 + (x * y) % 3) % 2 == 0,
            _ => unreachable!(),
        }
    }

    /// Returns a copy of `matrix` with this mask XORed onto every data module.
    /// Function modules are left alone.
    pub fn apply(self, matrix: &ModuleMatrix) -> ModuleMatrix {
        let mut result = matrix.clone();
        let size = result.size();
        for (index, module) in result.modules_mut().iter_mut().enumerate() {
            if let Module::Data(dark) = *module {
                let (x, y) = (index % size, index / size);
                *module = Module::Data(dark ^ self.inverts(x, y));
            }
        }
        result
    }
}

/// Masks `matrix` (codewords placed, format not yet written) with each of the eight
/// patterns, finishes each trial with its format and version information, and returns
/// the mask with the lowest penalty together with its finished matrix. Ties go to the
/// lowest mask index.
///
/// Trials run in parallel; each works on its own copy so `matrix` is never modified.
pub fn select_mask(matrix: &ModuleMatrix, ecl: QrCodeEcc) -> (Mask, ModuleMatrix) {
    let (penalty, mask, finished) = Mask::all()
        .collect::<Vec<_>>()
        .into_par_iter()
        .map(|mask| {
            let trial = finish(matrix, ecl, mask);
            (penalty_score(&trial), mask, trial)
        })
        .min_by_key(|(penalty, mask, _)| (*penalty, *mask))
        .expect("eight masks to choose from");
    debug!(mask = mask.value(), penalty, "selected mask");
    (mask, finished)
}

/// Applies `mask` and writes the format and version information.
pub fn finish(matrix: &ModuleMatrix, ecl: QrCodeEcc, mask: Mask) -> ModuleMatrix {
    let mut result = mask.apply(matrix);
    result.draw_format_bits(ecl, mask);
    result.draw_version_info();
    result
}

/// Penalty score of a finished symbol, summed over four rules:
///
/// 1. each run of five or more same-colored modules in a row or column (N1, plus one per extra module),
/// 2. each 2x2 block of one color (N2),
/// 3. each finder-like 1:1:3:1:1 dark/light run with four light modules on a side (N3),
/// 4. dark/light imbalance, N4 per 5% step away from 50%.
pub fn penalty_score(matrix: &ModuleMatrix) -> i32 {
    let size = matrix.size();
    let mut result: i32 = 0;

    for y in 0..size {
        result += line_penalty(size, (0..size).map(|x| matrix.is_dark(x, y)));
    }
    for x in 0..size {
        result += line_penalty(size, (0..size).map(|y| matrix.is_dark(x, y)));
    }

    for y in 0..size - 1 {
        for x in 0..size - 1 {
            let color: bool = matrix.is_dark(x, y);
            if color == matrix.is_dark(x + 1, y)
                && color == matrix.is_dark(x, y + 1)
                && color == matrix.is_dark(x + 1, y + 1)
            {
                result += PENALTY_N2;
            }
        }
    }

    let dark = matrix.dark_count() as i32;
    let total = (size * size) as i32;
    // Smallest k such that the dark ratio lies within (50 +/- 5(k+1))%
    let k: i32 = ((dark * 20 - total * 10).abs() + total - 1) / total - 1;
    result += k * PENALTY_N4;
    result
}

// Rules 1 and 3 for a single row or column.
fn line_penalty(size: usize, line: impl Iterator<Item = bool>) -> i32 {
    let mut result: i32 = 0;
    let mut runcolor = false;
    let mut runlen: i32 = 0;
    let mut runhistory = FinderPenalty::new(size);
    for color in line {
        if color == runcolor {
            runlen += 1;
            if runlen == 5 {
                result += PENALTY_N1;
            } else if runlen > 5 {
                result += 1;
            }
        } else {
            runhistory.add_history(runlen);
            if !runcolor {
                result += runhistory.count_patterns() * PENALTY_N3;
            }
            runcolor = color;
            runlen = 1;
        }
    }
    result + runhistory.terminate_and_count(runcolor, runlen) * PENALTY_N3
}

/// Recent run lengths along a line, newest first, for spotting finder-like patterns.
/// The light border outside the symbol counts as part of the first and last runs.
struct FinderPenalty {
    qr_size: i32,
    run_history: [i32; 7],
}

impl FinderPenalty {
    fn new(size: usize) -> Self {
        Self {
            qr_size: size as i32,
            run_history: [0; 7],
        }
    }

    fn add_history(&mut self, mut currentrunlength: i32) {
        if self.run_history[0] == 0 {
            currentrunlength += self.qr_size; // Add light border to initial run
        }
        let len: usize = self.run_history.len();
        self.run_history.copy_within(0..len - 1, 1);
        self.run_history[0] = currentrunlength;
    }

    // Called right after a light run ends; counts 1:1:3:1:1 with 4 light on either side.
    fn count_patterns(&self) -> i32 {
        let rh = &self.run_history;
        let n = rh[1];
        let core = n > 0 && rh[2] == n && rh[3] == n * 3 && rh[4] == n && rh[5] == n;
        i32::from(core && rh[0] >= n * 4 && rh[6] >= n)
            + i32::from(core && rh[6] >= n * 4 && rh[0] >= n)
    }

    fn terminate_and_count(mut self, currentruncolor: bool, mut currentrunlength: i32) -> i32 {
        if currentruncolor {
            // Terminate dark run
            self.add_history(currentrunlength);
            currentrunlength = 0;
        }
        currentrunlength += self.qr_size; // Add light border to final run
        self.add_history(currentrunlength);
        self.count_patterns()
    }
}
