//! Reed–Solomon error correction coding.
//!
//! Data codewords are split into blocks per version and level, each block gets its
//! error correction codewords, and the blocks are interleaved column-wise into the final
//! codeword sequence.
//!
//! Field arithmetic is over GF(2^8) with the reducing polynomial x^8 + x^4 + x^3 + x^2 + 1
//! (0x11D). The log/antilog tables and every generator polynomial the standard uses are
//! computed at compile time.

use tracing::debug;

use crate::tables::{self, MAX_ECC_CODEWORDS_PER_BLOCK};
use crate::version::{QrCodeEcc, Version};

const fn build_exp_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut x: u16 = 1;
    let mut i = 0;
    while i < 255 {
        table[i] = x as u8;
        x <<= 1;
        if x & 0x100 != 0 {
            x ^= 0x11D;
        }
        i += 1;
    }
    table[255] = table[0];
    table
}

const fn build_log_table(exp: &[u8; 256]) -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 255 {
        table[exp[i] as usize] = i as u8;
        i += 1;
    }
    table
}

const EXP_VALUES: [u8; 256] = build_exp_table();

static EXP_TABLE: [u8; 256] = EXP_VALUES;
static LOG_TABLE: [u8; 256] = build_log_table(&EXP_VALUES);

/// GF(256) field operations using log/exp tables
pub struct Gf256;

impl Gf256 {
    pub fn mul(a: u8, b: u8) -> u8 {
        if a == 0 || b == 0 {
            return 0;
        }
        let log_a = LOG_TABLE[a as usize] as usize;
        let log_b = LOG_TABLE[b as usize] as usize;
        EXP_TABLE[(log_a + log_b) % 255]
    }

    /// Returns alpha^n.
    pub fn exp(n: usize) -> u8 {
        EXP_TABLE[n % 255]
    }
}

// Same arithmetic as `Gf256::mul`, usable in const context.
const fn const_mul(x: u8, y: u8) -> u8 {
    let mut z: u8 = 0;
    let mut i = 8;
    while i > 0 {
        i -= 1;
        z = (z << 1) ^ ((z >> 7) * 0x1d);
        z ^= ((y >> i) & 1) * x;
    }
    z
}

/// Coefficients of the monic generator polynomial (x - a^0)(x - a^1)...(x - a^(degree-1)),
/// highest power first with the leading 1 omitted.
const fn build_generator(degree: usize) -> [u8; MAX_ECC_CODEWORDS_PER_BLOCK] {
    let mut divisor = [0u8; MAX_ECC_CODEWORDS_PER_BLOCK];
    if degree == 0 {
        return divisor;
    }
    divisor[degree - 1] = 1;
    let mut root: u8 = 1;
    let mut i = 0;
    while i < degree {
        let mut j = 0;
        while j < degree {
            divisor[j] = const_mul(divisor[j], root);
            if j + 1 < degree {
                divisor[j] ^= divisor[j + 1];
            }
            j += 1;
        }
        root = const_mul(root, 0x02);
        i += 1;
    }
    divisor
}

const fn build_generators() -> [[u8; MAX_ECC_CODEWORDS_PER_BLOCK]; MAX_ECC_CODEWORDS_PER_BLOCK + 1] {
    let mut table = [[0u8; MAX_ECC_CODEWORDS_PER_BLOCK]; MAX_ECC_CODEWORDS_PER_BLOCK + 1];
    let mut degree = 1;
    while degree <= MAX_ECC_CODEWORDS_PER_BLOCK {
        table[degree] = build_generator(degree);
        degree += 1;
    }
    table
}

static GENERATORS: [[u8; MAX_ECC_CODEWORDS_PER_BLOCK]; MAX_ECC_CODEWORDS_PER_BLOCK + 1] =
    build_generators();

/// Computes Reed–Solomon remainders for a fixed number of error correction codewords.
#[derive(Clone, Copy, Debug)]
pub struct ReedSolomonGenerator {
    divisor: &'static [u8],
}

impl ReedSolomonGenerator {
    /// # Panics
    ///
    /// Panics if `degree` is not in 1..=30.
    pub fn new(degree: usize) -> Self {
        assert!((1..=MAX_ECC_CODEWORDS_PER_BLOCK).contains(&degree), "Degree out of range");
        Self {
            divisor: &GENERATORS[degree][..degree],
        }
    }

    pub fn degree(&self) -> usize {
        self.divisor.len()
    }

    /// Returns the remainder of `data * x^degree` divided by the generator polynomial.
    pub fn compute_remainder(&self, data: &[u8]) -> Vec<u8> {
        let mut result = vec![0u8; self.degree()];
        for b in data {
            let factor: u8 = b ^ result[0];
            result.copy_within(1.., 0);
            if let Some(last) = result.last_mut() {
                *last = 0;
            }
            for (x, &y) in result.iter_mut().zip(self.divisor.iter()) {
                *x ^= Gf256::mul(y, factor);
            }
        }
        result
    }
}

/// How the data codewords of a (version, level) pair are divided into blocks.
///
/// When the data does not divide evenly, the first `num_short_blocks` blocks hold
/// `short_block_data_len` codewords and the rest hold one more.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockLayout {
    pub num_blocks: usize,
    pub ecc_per_block: usize,
    pub num_short_blocks: usize,
    pub short_block_data_len: usize,
}

impl BlockLayout {
    pub fn new(ver: Version, ecl: QrCodeEcc) -> Self {
        let num_blocks = tables::num_error_correction_blocks(ver, ecl);
        let ecc_per_block = tables::ecc_codewords_per_block(ver, ecl);
        let rawcodewords = tables::num_total_codewords(ver);
        Self {
            num_blocks,
            ecc_per_block,
            num_short_blocks: num_blocks - rawcodewords % num_blocks,
            short_block_data_len: rawcodewords / num_blocks - ecc_per_block,
        }
    }

    /// Number of data codewords in block `i`.
    pub fn data_len(&self, i: usize) -> usize {
        self.short_block_data_len + usize::from(i >= self.num_short_blocks)
    }

    pub fn total_data_codewords(&self) -> usize {
        (0..self.num_blocks).map(|i| self.data_len(i)).sum()
    }
}

/// One block of data codewords together with its error correction codewords.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EcBlock<'a> {
    pub data: &'a [u8],
    pub ecc: Vec<u8>,
}

/// Splits `data` into blocks and computes each block's error correction codewords.
///
/// # Panics
///
/// Panics if `data` is not exactly the data codeword capacity of `ver` at `ecl`.
pub fn split_into_blocks<'a>(data: &'a [u8], ver: Version, ecl: QrCodeEcc) -> Vec<EcBlock<'a>> {
    let layout = BlockLayout::new(ver, ecl);
    assert_eq!(
        data.len(),
        tables::num_data_codewords(ver, ecl),
        "codeword stream length does not match block table"
    );
    assert_eq!(layout.total_data_codewords(), data.len(), "block table is inconsistent");
    debug!(
        version = ver.value(),
        %ecl,
        blocks = layout.num_blocks,
        ecc_per_block = layout.ecc_per_block,
        "error correction layout"
    );

    let rs = ReedSolomonGenerator::new(layout.ecc_per_block);
    let mut rest: &[u8] = data;
    let mut blocks = Vec::with_capacity(layout.num_blocks);
    for i in 0..layout.num_blocks {
        let (block, tail) = rest.split_at(layout.data_len(i));
        blocks.push(EcBlock {
            data: block,
            ecc: rs.compute_remainder(block),
        });
        rest = tail;
    }
    debug_assert!(rest.is_empty());
    blocks
}

/// Interleaves blocks column-wise: data codeword 0 of every block, then codeword 1, and
/// so on (short blocks are skipped once exhausted), followed by the error correction
/// codewords in the same order.
pub fn interleave(blocks: &[EcBlock]) -> Vec<u8> {
    let maxdata = blocks.iter().map(|b| b.data.len()).max().unwrap_or(0);
    let ecclen = blocks.first().map_or(0, |b| b.ecc.len());
    let total: usize = blocks.iter().map(|b| b.data.len() + b.ecc.len()).sum();
    let mut result = Vec::with_capacity(total);
    for j in 0..maxdata {
        result.extend(blocks.iter().filter_map(|b| b.data.get(j)));
    }
    for j in 0..ecclen {
        result.extend(blocks.iter().map(|b| b.ecc[j]));
    }
    result
}

/// Returns the final codeword sequence for a symbol: blocks, error correction, interleaving.
pub fn add_ecc_and_interleave(data: &[u8], ver: Version, ecl: QrCodeEcc) -> Vec<u8> {
    let result = interleave(&split_into_blocks(data, ver, ecl));
    assert_eq!(
        result.len(),
        tables::num_total_codewords(ver),
        "interleaved codewords do not fill the symbol"
    );
    result
}
