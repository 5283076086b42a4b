//! The module grid and everything drawn on it: function patterns, codeword placement,
//! and the BCH-protected format and version information.

use crate::mask::Mask;
use crate::tables;
use crate::version::{QrCodeEcc, Version};

/// One cell of the symbol.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Module {
    /// Not written yet.
    #[default]
    Empty,
    /// Part of a finder, separator, timing, alignment, format or version pattern.
    /// Never touched by data placement or masking.
    Function(bool),
    /// Carries a codeword bit (or a remainder bit).
    Data(bool),
}

impl Module {
    pub fn is_dark(self) -> bool {
        matches!(self, Module::Function(true) | Module::Data(true))
    }

    pub fn is_function(self) -> bool {
        matches!(self, Module::Function(_))
    }
}

/// A square grid of modules, `4 * version + 17` on a side, stored row-major.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ModuleMatrix {
    version: Version,
    size: usize,
    modules: Vec<Module>,
}

impl ModuleMatrix {
    /// An empty grid for `version`.
    pub fn new(version: Version) -> Self {
        let size = version.size();
        Self {
            version,
            size,
            modules: vec![Module::Empty; size * size],
        }
    }

    /// A grid with every function pattern drawn and the format and version
    /// information areas reserved.
    pub fn with_function_patterns(version: Version) -> Self {
        let mut result = Self::new(version);
        let size = result.size;

        // Timing patterns; finders drawn afterwards overwrite their ends
        for i in 0..size {
            result.set_function(6, i, i % 2 == 0);
            result.set_function(i, 6, i % 2 == 0);
        }

        let far = size as i32 - 4;
        result.draw_finder_pattern(3, 3);
        result.draw_finder_pattern(far, 3);
        result.draw_finder_pattern(3, far);

        let alignpatpos = tables::alignment_pattern_positions(version);
        let last = alignpatpos.len().saturating_sub(1);
        for (i, &pos0) in alignpatpos.iter().enumerate() {
            for (j, &pos1) in alignpatpos.iter().enumerate() {
                // Corners already taken by finder patterns
                if (i == 0 && j == 0) || (i == 0 && j == last) || (i == last && j == 0) {
                    continue;
                }
                result.draw_alignment_pattern(usize::from(pos0), usize::from(pos1));
            }
        }

        result.draw_format_bits_raw(0);
        if version.has_version_info() {
            result.draw_version_bits(0);
        }
        result
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// # Panics
    ///
    /// Panics if the coordinates are outside the grid.
    pub fn get(&self, x: usize, y: usize) -> Module {
        assert!(x < self.size && y < self.size, "module out of bounds");
        self.modules[y * self.size + x]
    }

    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        self.get(x, y).is_dark()
    }

    pub fn dark_count(&self) -> usize {
        self.modules.iter().filter(|m| m.is_dark()).count()
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub(crate) fn modules_mut(&mut self) -> &mut [Module] {
        &mut self.modules
    }

    fn set(&mut self, x: usize, y: usize, module: Module) {
        assert!(x < self.size && y < self.size, "module out of bounds");
        self.modules[y * self.size + x] = module;
    }

    fn set_function(&mut self, x: usize, y: usize, isdark: bool) {
        self.set(x, y, Module::Function(isdark));
    }

    fn set_function_unbounded(&mut self, x: i32, y: i32, isdark: bool) {
        let range = 0..self.size as i32;
        if range.contains(&x) && range.contains(&y) {
            self.set_function(x as usize, y as usize, isdark);
        }
    }

    // 7x7 finder plus its one-module light separator, clipped at the edges.
    fn draw_finder_pattern(&mut self, x: i32, y: i32) {
        for dy in -4i32..=4 {
            for dx in -4i32..=4 {
                let dist: i32 = dx.abs().max(dy.abs());
                self.set_function_unbounded(x + dx, y + dy, dist != 2 && dist != 4);
            }
        }
    }

    fn draw_alignment_pattern(&mut self, x: usize, y: usize) {
        for dy in -2i32..=2 {
            for dx in -2i32..=2 {
                let dist: i32 = dx.abs().max(dy.abs());
                self.set_function((x as i32 + dx) as usize, (y as i32 + dy) as usize, dist != 1);
            }
        }
    }

    /// Writes the 15-bit format word: 2 bits of level, 3 bits of mask, 10 BCH bits,
    /// XORed with 0x5412.
    pub fn draw_format_bits(&mut self, ecl: QrCodeEcc, mask: Mask) {
        self.draw_format_bits_raw(format_bits(ecl, mask));
    }

    fn draw_format_bits_raw(&mut self, bits: u32) {
        // First copy, around the top-left finder
        for i in 0..6 {
            self.set_function(8, i, get_bit(bits, i));
        }
        self.set_function(8, 7, get_bit(bits, 6));
        self.set_function(8, 8, get_bit(bits, 7));
        self.set_function(7, 8, get_bit(bits, 8));
        for i in 9..15 {
            self.set_function(14 - i, 8, get_bit(bits, i));
        }

        // Second copy, split between the other two finders
        let size = self.size;
        for i in 0..8 {
            self.set_function(size - 1 - i, 8, get_bit(bits, i));
        }
        for i in 8..15 {
            self.set_function(8, size - 15 + i, get_bit(bits, i));
        }
        self.set_function(8, size - 8, true); // Always dark
    }

    /// Writes the 18-bit version word (6 bits of version, 12 BCH bits) into both 6x3
    /// blocks. Does nothing below version 7.
    pub fn draw_version_info(&mut self) {
        if self.version.has_version_info() {
            self.draw_version_bits(version_bits(self.version));
        }
    }

    fn draw_version_bits(&mut self, bits: u32) {
        let size = self.size;
        for i in 0..18 {
            let bit = get_bit(bits, i);
            let a = size - 11 + i % 3;
            let b = i / 3;
            self.set_function(a, b, bit);
            self.set_function(b, a, bit);
        }
    }

    /// Places the final codeword sequence, most significant bit first, along the zig-zag
    /// path of two-module columns from the bottom-right corner, skipping function modules.
    /// Cells left over after the last codeword become light remainder bits.
    ///
    /// # Panics
    ///
    /// Panics if `data` is not the version's total codeword count.
    pub fn place_codewords(&mut self, data: &[u8]) {
        assert_eq!(
            data.len(),
            tables::num_total_codewords(self.version),
            "Illegal argument"
        );
        let size = self.size as i32;
        let totalbits = data.len() * 8;
        let mut i: usize = 0;
        let mut remainder: usize = 0;
        let mut right: i32 = size - 1;
        while right >= 1 {
            // Skip the vertical timing column
            if right == 6 {
                right = 5;
            }
            let upward: bool = ((right + 1) & 2) == 0;
            for vert in 0..size {
                let y = (if upward { size - 1 - vert } else { vert }) as usize;
                for j in 0..2 {
                    let x = (right - j) as usize;
                    if self.get(x, y).is_function() {
                        continue;
                    }
                    if i < totalbits {
                        self.set(x, y, Module::Data(get_bit(u32::from(data[i >> 3]), 7 - (i & 7))));
                        i += 1;
                    } else {
                        self.set(x, y, Module::Data(false));
                        remainder += 1;
                    }
                }
            }
            right -= 2;
        }
        debug_assert_eq!(i, totalbits);
        debug_assert_eq!(remainder, tables::num_remainder_bits(self.version));
    }
}

/// Format word for a level and mask, BCH(15,5) protected and masked with 0x5412.
pub fn format_bits(ecl: QrCodeEcc, mask: Mask) -> u32 {
    let data = u32::from((ecl.format_bits() << 3) | mask.value());
    let mut rem: u32 = data;
    for _ in 0..10 {
        rem = (rem << 1) ^ ((rem >> 9) * 0x537);
    }
    ((data << 10) | rem) ^ 0x5412
}

/// Version word, BCH(18,6) protected.
pub fn version_bits(version: Version) -> u32 {
    let ver = u32::from(version.value());
    let mut rem: u32 = ver;
    for _ in 0..12 {
        rem = (rem << 1) ^ ((rem >> 11) * 0x1f25);
    }
    (ver << 12) | rem
}

fn get_bit(x: u32, i: usize) -> bool {
    ((x >> i) & 1) != 0
}
