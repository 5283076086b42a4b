//! A small reader for undamaged symbols, written against the standard rather than the
//! encoder's internals, so the round-trip tests check one against the other.

#![allow(dead_code)]

use binqr::qrcode::QrCode;
use binqr::version::QrCodeEcc;

// Block structure per level (L, M, Q, H) and version, as printed in the standard's
// error correction characteristics table.
const ECC_CODEWORDS_PER_BLOCK: [[u8; 41]; 4] = [
    [
        0, 7, 10, 15, 20, 26, 18, 20, 24, 30, 18, 20, 24, 26, 30, 22, 24, 28, 30, 28, 28, 28, 28,
        30, 30, 26, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ],
    [
        0, 10, 16, 26, 18, 24, 16, 18, 22, 22, 26, 30, 22, 22, 24, 24, 28, 28, 26, 26, 26, 26, 28,
        28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28,
    ],
    [
        0, 13, 22, 18, 26, 18, 24, 18, 22, 20, 24, 28, 26, 24, 20, 30, 24, 28, 28, 26, 30, 28, 30,
        30, 30, 30, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ],
    [
        0, 17, 28, 22, 16, 22, 28, 26, 26, 24, 28, 24, 28, 22, 24, 24, 30, 28, 28, 26, 28, 30, 24,
        30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ],
];

const NUM_BLOCKS: [[u8; 41]; 4] = [
    [
        0, 1, 1, 1, 1, 1, 2, 2, 2, 2, 4, 4, 4, 4, 4, 6, 6, 6, 6, 7, 8, 8, 9, 9, 10, 12, 12, 12,
        13, 14, 15, 16, 17, 18, 19, 19, 20, 21, 22, 24, 25,
    ],
    [
        0, 1, 1, 1, 2, 2, 4, 4, 4, 5, 5, 5, 8, 9, 9, 10, 10, 11, 13, 14, 16, 17, 17, 18, 20, 21,
        23, 25, 26, 28, 29, 31, 33, 35, 37, 38, 40, 43, 45, 47, 49,
    ],
    [
        0, 1, 1, 2, 2, 4, 4, 6, 6, 8, 8, 8, 10, 12, 16, 12, 17, 16, 18, 21, 20, 23, 23, 25, 27,
        29, 34, 34, 35, 38, 40, 43, 45, 48, 51, 53, 56, 59, 62, 65, 68,
    ],
    [
        0, 1, 1, 2, 4, 4, 4, 5, 6, 8, 8, 11, 11, 16, 16, 18, 16, 19, 21, 25, 25, 25, 34, 30, 32,
        35, 37, 40, 42, 45, 48, 51, 54, 57, 60, 63, 66, 70, 74, 77, 81,
    ],
];

fn level_index(ecl: QrCodeEcc) -> usize {
    match ecl {
        QrCodeEcc::Low => 0,
        QrCodeEcc::Medium => 1,
        QrCodeEcc::Quartile => 2,
        QrCodeEcc::High => 3,
    }
}

pub struct Decoded {
    pub ecl: QrCodeEcc,
    pub mask: u8,
    pub version_info: Option<u8>,
    pub data_codewords: usize,
    pub payload: Vec<u8>,
}

fn gf_mul(x: u8, y: u8) -> u8 {
    let mut z: u8 = 0;
    for i in (0..8).rev() {
        z = (z << 1) ^ ((z >> 7) * 0x1d);
        z ^= ((y >> i) & 1) * x;
    }
    z
}

fn gf_pow2(n: usize) -> u8 {
    (0..n).fold(1u8, |acc, _| gf_mul(acc, 2))
}

fn bch_remainder(mut value: u32, poly: u32, poly_degree: u32) -> u32 {
    if value == 0 {
        return 0;
    }
    let top = 31 - poly.leading_zeros();
    for shift in (0..=(31 - value.leading_zeros()).saturating_sub(top)).rev() {
        if value & (1 << (shift + top)) != 0 {
            value ^= poly << shift;
        }
    }
    debug_assert!(value < 1 << poly_degree);
    value
}

fn mask_inverts(mask: u8, x: usize, y: usize) -> bool {
    match mask {
        0 => (y + x) % 2 == 0,
        1 => y % 2 == 0,
        2 => x % 3 == 0,
        3 => (y + x) % 3 == 0,
        4 => (y / 2 + x / 3) % 2 == 0,
        5 => (y * x) % 2 + (y * x) % 3 == 0,
        6 => ((y * x) % 2 + (y * x) % 3) % 2 == 0,
        7 => ((y + x) % 2 + (y * x) % 3) % 2 == 0,
        _ => unreachable!(),
    }
}

fn alignment_centers(version: usize) -> Vec<usize> {
    if version == 1 {
        return Vec::new();
    }
    let num = version / 7 + 2;
    let step = if version == 32 {
        26
    } else {
        (version * 4 + num * 2 + 1) / (num * 2 - 2) * 2
    };
    let size = version * 4 + 17;
    let mut result: Vec<usize> = (0..num - 1).map(|i| size - 7 - i * step).collect();
    result.push(6);
    result.sort_unstable();
    result
}

/// Function-pattern map computed from the version alone.
pub fn function_map(version: usize) -> Vec<Vec<bool>> {
    let size = version * 4 + 17;
    let mut map = vec![vec![false; size]; size];
    fn fill(map: &mut [Vec<bool>], left: usize, top: usize, w: usize, h: usize) {
        for row in &mut map[top..top + h] {
            for cell in &mut row[left..left + w] {
                *cell = true;
            }
        }
    }
    fill(&mut map, 6, 0, 1, size);
    fill(&mut map, 0, 6, size, 1);
    // Finders, separators, and format areas
    fill(&mut map, 0, 0, 9, 9);
    fill(&mut map, size - 8, 0, 8, 9);
    fill(&mut map, 0, size - 8, 9, 8);
    let centers = alignment_centers(version);
    let last = centers.len().saturating_sub(1);
    for (i, &cx) in centers.iter().enumerate() {
        for (j, &cy) in centers.iter().enumerate() {
            if (i == 0 && j == 0) || (i == 0 && j == last) || (i == last && j == 0) {
                continue;
            }
            fill(&mut map, cx - 2, cy - 2, 5, 5);
        }
    }
    if version >= 7 {
        fill(&mut map, size - 11, 0, 3, 6);
        fill(&mut map, 0, size - 11, 6, 3);
    }
    map
}

fn read_format(qr: &QrCode) -> (QrCodeEcc, u8) {
    let dark = |x: i32, y: i32| u32::from(qr.get_module(x, y));
    let mut bits = 0u32;
    for i in 0..6 {
        bits |= dark(8, i) << i;
    }
    bits |= dark(8, 7) << 6;
    bits |= dark(8, 8) << 7;
    bits |= dark(7, 8) << 8;
    for i in 9..15 {
        bits |= dark(14 - i, 8) << i;
    }

    // The second copy must agree
    let size = qr.size();
    let mut second = 0u32;
    for i in 0..8 {
        second |= dark(size - 1 - i, 8) << i;
    }
    for i in 8..15 {
        second |= dark(8, size - 15 + i) << i;
    }
    assert_eq!(bits, second, "format copies differ");
    assert!(qr.get_module(8, size - 8), "dark module missing");

    let unmasked = bits ^ 0x5412;
    assert_eq!(bch_remainder(unmasked, 0x537, 10), 0, "format BCH check failed");
    let data = unmasked >> 10;
    let ecl = QrCodeEcc::from_format_bits((data >> 3) as u8).expect("2-bit level");
    (ecl, (data & 7) as u8)
}

fn read_version_info(qr: &QrCode) -> u8 {
    let size = qr.size();
    let mut bits = 0u32;
    let mut transposed = 0u32;
    for i in 0..18 {
        let a = size - 11 + i % 3;
        let b = i / 3;
        bits |= u32::from(qr.get_module(a, b)) << i;
        transposed |= u32::from(qr.get_module(b, a)) << i;
    }
    assert_eq!(bits, transposed, "version info copies differ");
    assert_eq!(bch_remainder(bits, 0x1f25, 12), 0, "version BCH check failed");
    (bits >> 12) as u8
}

/// Reads the symbol back into its payload, asserting every structural check on the way.
pub fn decode(qr: &QrCode) -> Decoded {
    let size = qr.size() as usize;
    let version = (size - 17) / 4;
    let func = function_map(version);
    for y in 0..size {
        for x in 0..size {
            assert_eq!(
                func[y][x],
                qr.is_function_module(x, y),
                "function map mismatch at ({}, {})",
                x,
                y
            );
        }
    }

    let (ecl, mask) = read_format(qr);
    let version_info = (version >= 7).then(|| read_version_info(qr));

    // Zig-zag read of unmasked bits
    let mut bits: Vec<bool> = Vec::new();
    let mut right = size as i32 - 1;
    while right >= 1 {
        if right == 6 {
            right = 5;
        }
        let upward = ((right + 1) & 2) == 0;
        for vert in 0..size {
            let y = if upward { size - 1 - vert } else { vert };
            for j in 0..2 {
                let x = (right - j) as usize;
                if !func[y][x] {
                    let dark = qr.get_module(x as i32, y as i32);
                    bits.push(dark ^ mask_inverts(mask, x, y));
                }
            }
        }
        right -= 2;
    }
    let codewords: Vec<u8> = bits
        .chunks_exact(8)
        .map(|c| c.iter().fold(0u8, |acc, &b| (acc << 1) | u8::from(b)))
        .collect();
    assert!(bits[codewords.len() * 8..].iter().all(|&b| !b), "remainder bits must be zero");

    // De-interleave; the split into short and long blocks follows from the codeword count
    let num_blocks = usize::from(NUM_BLOCKS[level_index(ecl)][version]);
    let ecc_per_block = usize::from(ECC_CODEWORDS_PER_BLOCK[level_index(ecl)][version]);
    let data_total = codewords.len() - num_blocks * ecc_per_block;
    let short_len = data_total / num_blocks;
    let num_short_blocks = num_blocks - data_total % num_blocks;
    let data_len = |b: usize| short_len + usize::from(b >= num_short_blocks);

    let mut blocks: Vec<Vec<u8>> = (0..num_blocks)
        .map(|b| Vec::with_capacity(data_len(b) + ecc_per_block))
        .collect();
    let mut it = codewords.iter().copied();
    for j in 0..=short_len {
        for (b, block) in blocks.iter_mut().enumerate() {
            if j < data_len(b) {
                block.push(it.next().expect("data codeword"));
            }
        }
    }
    for _ in 0..ecc_per_block {
        for block in blocks.iter_mut() {
            block.push(it.next().expect("ecc codeword"));
        }
    }
    assert!(it.next().is_none(), "leftover codewords");

    let mut data: Vec<u8> = Vec::new();
    for (i, block) in blocks.iter().enumerate() {
        for k in 0..ecc_per_block {
            let x = gf_pow2(k);
            let syndrome = block.iter().fold(0u8, |acc, &c| gf_mul(acc, x) ^ c);
            assert_eq!(syndrome, 0, "block {} syndrome {}", i, k);
        }
        data.extend_from_slice(&block[..data_len(i)]);
    }

    // Parse a single byte-mode segment
    let mut reader = BitReader { data: &data, pos: 0 };
    assert_eq!(reader.read(4), 0b0100, "expected byte mode");
    let ccbits = if version < 10 { 8 } else { 16 };
    let count = reader.read(ccbits) as usize;
    let payload: Vec<u8> = (0..count).map(|_| reader.read(8) as u8).collect();
    let remaining = data.len() * 8 - reader.pos;
    assert_eq!(reader.read(remaining.min(4)), 0, "terminator");
    reader.pos = reader.pos.div_ceil(8) * 8;
    let pads = [0xECu32, 0x11];
    let mut k = 0;
    while reader.pos < data.len() * 8 {
        assert_eq!(reader.read(8), pads[k % 2], "pad codeword");
        k += 1;
    }

    Decoded {
        ecl,
        mask,
        version_info,
        data_codewords: data_total,
        payload,
    }
}

struct BitReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl BitReader<'_> {
    fn read(&mut self, n: usize) -> u32 {
        let mut value = 0u32;
        for _ in 0..n {
            let bit = (self.data[self.pos >> 3] >> (7 - (self.pos & 7))) & 1;
            value = (value << 1) | u32::from(bit);
            self.pos += 1;
        }
        value
    }
}
