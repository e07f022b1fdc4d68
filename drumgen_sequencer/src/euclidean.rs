//! Precomputed euclidean rhythms as 32-bit step masks.
//!
//! The table holds 32 length buckets (pattern length 1..=32) of 8 coarse density buckets each.
//! Bit `k` of a mask is set when step `k` of the 32 step cycle is a hit.
use crate::{PatternError, STEP_COUNT};

pub const EUCLIDEAN_TABLE_SIZE: usize = 256;

/// Density buckets per pattern length.
pub const EUCLIDEAN_DENSITY_BUCKETS: u8 = 8;

/// Longest length reachable from a density value, see [`length_for_density`].
pub const EUCLIDEAN_MAX_DENSITY_LENGTH: u8 = 8;

#[rustfmt::skip]
const EUCLIDEAN_PATTERNS: [u32; EUCLIDEAN_TABLE_SIZE] = [
    0x00000000, 0x80000000, 0x80008000, 0x80808080, 0x88080808, 0x88088088, 0x88888888, 0x92492492,
    0x00000000, 0x80000000, 0x80008000, 0x80808080, 0x88080808, 0x88088088, 0x88888888, 0x92492492,
    0x00000000, 0x80000000, 0x80008000, 0x80808080, 0x88080808, 0x88088088, 0x88888888, 0x92492492,
    0x00000000, 0x80000000, 0x80008000, 0x80808080, 0x88080808, 0x88088088, 0x88888888, 0x92492492,
    0x00000000, 0x80000000, 0x84004000, 0x84208410, 0x88220811, 0x89124889, 0x91248891, 0x92492492,
    0x00000000, 0x80000000, 0x82002000, 0x88082080, 0x88822080, 0x90909088, 0x92249249, 0x94924924,
    0x00000000, 0x80000000, 0x80008000, 0x84008400, 0x88084808, 0x90089008, 0x92289228, 0x94489448,
    0x00000000, 0x80000000, 0x80040000, 0x82082080, 0x88084808, 0x88888808, 0x92288888, 0x92488888,
    0x00000000, 0x80000000, 0x80008000, 0x80808080, 0x84084084, 0x88088808, 0x90090909, 0x92492492,
    0x00000000, 0x80000000, 0x80008000, 0x80808080, 0x84084084, 0x88088808, 0x90090909, 0x92492492,
    0x00000000, 0x80000000, 0x80020000, 0x82008200, 0x88022088, 0x88888222, 0x90909090, 0x92492492,
    0x00000000, 0x80000000, 0x80100010, 0x84104104, 0x88888410, 0x90909090, 0x92492492, 0x94924924,
    0x00000000, 0x80000000, 0x80808080, 0x84848484, 0x88888888, 0x90909090, 0x92492492, 0x94924924,
    0x00000000, 0x80000000, 0x82000000, 0x88000800, 0x88888000, 0x90909088, 0x92492490, 0x94924924,
    0x00000000, 0x80000000, 0x82000000, 0x88000800, 0x88888000, 0x90909088, 0x92492490, 0x94924924,
    0x00000000, 0x80000000, 0x84000000, 0x88200820, 0x88888220, 0x90909090, 0x92492492, 0x94924924,
    0x00000000, 0x80000000, 0x88000000, 0x88880880, 0x88888888, 0x90909090, 0x92492492, 0x94924924,
    0x00000000, 0x80000000, 0x88000000, 0x88880880, 0x88888888, 0x90909090, 0x92492492, 0x94924924,
    0x00000000, 0x80000000, 0x88000000, 0x88880880, 0x88888888, 0x90909090, 0x92492492, 0x94924924,
    0x00000000, 0x80000000, 0x88000000, 0x88880880, 0x88888888, 0x90909090, 0x92492492, 0x94924924,
    0x00000000, 0x80000000, 0x90000000, 0x90909090, 0x90909090, 0x92492492, 0x92492492, 0x94924924,
    0x00000000, 0x80000000, 0x90000000, 0x90909090, 0x90909090, 0x92492492, 0x92492492, 0x94924924,
    0x00000000, 0x80000000, 0x90000000, 0x90909090, 0x90909090, 0x92492492, 0x92492492, 0x94924924,
    0x00000000, 0x80000000, 0x90000000, 0x90909090, 0x90909090, 0x92492492, 0x92492492, 0x94924924,
    0x00000000, 0x80000000, 0xa0000000, 0xa0a0a0a0, 0xa0a0a0a0, 0xa4a4a4a4, 0xa4a4a4a4, 0xa4a4a4a4,
    0x00000000, 0x80000000, 0xa0000000, 0xa0a0a0a0, 0xa0a0a0a0, 0xa4a4a4a4, 0xa4a4a4a4, 0xa4a4a4a4,
    0x00000000, 0x80000000, 0xa0000000, 0xa0a0a0a0, 0xa0a0a0a0, 0xa4a4a4a4, 0xa4a4a4a4, 0xa4a4a4a4,
    0x00000000, 0x80000000, 0xa0000000, 0xa0a0a0a0, 0xa0a0a0a0, 0xa4a4a4a4, 0xa4a4a4a4, 0xa4a4a4a4,
    0x00000000, 0x80000000, 0xc0000000, 0xc0c0c0c0, 0xc0c0c0c0, 0xc0c0c0c0, 0xc0c0c0c0, 0xc4c4c4c4,
    0x00000000, 0x80000000, 0xc0000000, 0xc0c0c0c0, 0xc0c0c0c0, 0xc0c0c0c0, 0xc0c0c0c0, 0xc4c4c4c4,
    0x00000000, 0x80000000, 0xc0000000, 0xc0c0c0c0, 0xc0c0c0c0, 0xc0c0c0c0, 0xc0c0c0c0, 0xc4c4c4c4,
    0x00000000, 0x80000000, 0xc0000000, 0xc0c0c0c0, 0xc0c0c0c0, 0xc0c0c0c0, 0xc0c0c0c0, 0xc4c4c4c4,
];

/// The built-in euclidean pattern table.
pub static EUCLIDEAN_TABLE: EuclideanTable = EuclideanTable::new(EUCLIDEAN_PATTERNS);

/// Map a density to a euclidean pattern length using its top three bits, giving 1..=8.
pub fn length_for_density(density: u8) -> u8 {
    (density >> 5) + 1
}

pub fn is_hit(pattern: u32, step: u8) -> bool {
    pattern & (1 << (step % STEP_COUNT)) != 0
}

#[derive(Clone, Debug, PartialEq)]
pub struct EuclideanTable {
    patterns: [u32; EUCLIDEAN_TABLE_SIZE],
}

impl EuclideanTable {
    pub const fn new(patterns: [u32; EUCLIDEAN_TABLE_SIZE]) -> EuclideanTable {
        EuclideanTable { patterns }
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.patterns
    }

    /// Mask used by euclidean output mode for a density-derived `length`.
    ///
    /// The lookup indexes the flat table directly with `length - 1`, so only the first length
    /// bucket is ever consulted. Panics if `length` is outside `1..=8`: that can only happen if the
    /// density to length mapping is broken.
    pub fn pattern_for_length(&self, length: u8) -> u32 {
        assert!(
            (1..=EUCLIDEAN_MAX_DENSITY_LENGTH).contains(&length),
            "euclidean length {} outside 1..={}",
            length,
            EUCLIDEAN_MAX_DENSITY_LENGTH
        );
        self.patterns[length as usize - 1]
    }

    /// Mask distributing `pulses` hits over a pattern of `steps` steps. `steps` must be in
    /// `1..=32` and `pulses` in `0..=32`; 32 pulses fall into the densest bucket.
    pub fn pattern_for(&self, steps: u8, pulses: u8) -> Result<u32, PatternError> {
        if !(1..=STEP_COUNT).contains(&steps) || pulses > STEP_COUNT {
            return Err(PatternError::InvalidEuclideanShape { steps, pulses });
        }
        let density_bucket =
            (pulses as usize * EUCLIDEAN_DENSITY_BUCKETS as usize / STEP_COUNT as usize)
                .min(EUCLIDEAN_DENSITY_BUCKETS as usize - 1);
        let index = (steps as usize - 1) * EUCLIDEAN_DENSITY_BUCKETS as usize + density_bucket;
        Ok(self.patterns[index])
    }
}
