//! The drum map: 25 probability nodes arranged on a 5x5 grid, and the bilinear interpolation that
//! turns an `(x, y)` position into a per-step trigger level.
//!
//! Each node holds 96 levels, 32 steps for each of the three instruments, at offset
//! `instrument * 32 + step`. The values are the pattern tables from Mutable Instruments Grids and
//! must stay bit-for-bit identical to them.
use crate::{Instrument, INSTRUMENT_COUNT, STEP_COUNT};

pub const NODE_SIZE: usize = INSTRUMENT_COUNT * STEP_COUNT as usize;

/// Nodes per axis.
pub const GRID_SIZE: usize = 5;

const GRID_MAX_INDEX: usize = GRID_SIZE - 1;

pub type DrumMapNode = [u8; NODE_SIZE];

#[rustfmt::skip]
const NODE_0: DrumMapNode = [
    255,   0,   0,   0,   0,   0, 145,   0,   0,   0,   0,   0, 218,   0,   0,   0,
     72,   0,  36,   0, 182,   0,   0,   0, 109,   0,   0,   0,  72,   0,   0,   0,
     36,   0, 109,   0,   0,   0,   8,   0, 255,   0,   0,   0,   0,   0,  72,   0,
      0,   0, 182,   0,   0,   0,  36,   0, 218,   0,   0,   0, 145,   0,   0,   0,
    170,   0, 113,   0, 255,   0,  56,   0, 170,   0, 141,   0, 198,   0,  56,   0,
    170,   0, 113,   0, 226,   0,  28,   0, 170,   0, 113,   0, 198,   0,  85,   0,
];
#[rustfmt::skip]
const NODE_1: DrumMapNode = [
    229,   0,  25,   0, 102,   0,  25,   0, 204,   0,  25,   0,  76,   0,   8,   0,
    255,   0,   8,   0,  51,   0,  25,   0, 178,   0,  25,   0, 153,   0, 127,   0,
     28,   0, 198,   0,  56,   0,  56,   0, 226,   0,  28,   0, 141,   0,  28,   0,
     28,   0, 170,   0,  28,   0,  28,   0, 255,   0, 113,   0,  85,   0,  85,   0,
    159,   0, 159,   0, 255,   0,  63,   0, 159,   0, 159,   0, 191,   0,  31,   0,
    159,   0, 127,   0, 255,   0,  31,   0, 159,   0, 127,   0, 223,   0,  95,   0,
];
#[rustfmt::skip]
const NODE_2: DrumMapNode = [
    255,   0,   0,   0, 127,   0,   0,   0,   0,   0, 102,   0,   0,   0, 229,   0,
      0,   0, 178,   0, 204,   0,   0,   0,  76,   0,  51,   0, 153,   0,  25,   0,
      0,   0, 127,   0,   0,   0,   0,   0, 255,   0, 191,   0,  31,   0,  63,   0,
      0,   0,  95,   0,   0,   0,   0,   0, 223,   0,   0,   0,  31,   0, 159,   0,
    255,   0,  85,   0, 148,   0,  85,   0, 127,   0,  85,   0, 106,   0,  63,   0,
    212,   0, 170,   0, 191,   0, 170,   0,  85,   0,  42,   0, 233,   0,  21,   0,
];
#[rustfmt::skip]
const NODE_3: DrumMapNode = [
    255,   0, 212,   0,  63,   0,   0,   0, 106,   0, 148,   0,  85,   0, 127,   0,
    191,   0,  21,   0, 233,   0,   0,   0,  21,   0, 170,   0,   0,   0,  42,   0,
      0,   0,   0,   0, 141,   0, 113,   0, 255,   0, 198,   0,   0,   0,  56,   0,
      0,   0,  85,   0,  56,   0,  28,   0, 226,   0,  28,   0, 170,   0,  56,   0,
    255,   0, 231,   0, 255,   0, 208,   0, 139,   0,  92,   0, 115,   0,  92,   0,
    185,   0,  69,   0,  46,   0,  46,   0, 162,   0,  23,   0, 208,   0,  46,   0,
];
#[rustfmt::skip]
const NODE_4: DrumMapNode = [
    255,   0,  31,   0,  63,   0,  63,   0, 127,   0,  95,   0, 191,   0,  63,   0,
    223,   0,  31,   0, 159,   0,  63,   0,  31,   0,  63,   0,  95,   0,  31,   0,
      8,   0,   0,   0,  95,   0,  63,   0, 255,   0,   0,   0, 127,   0,   0,   0,
      8,   0,   0,   0, 159,   0,  63,   0, 255,   0, 223,   0, 191,   0,  31,   0,
     76,   0,  25,   0, 255,   0, 127,   0, 153,   0,  51,   0, 204,   0, 102,   0,
     76,   0,  51,   0, 229,   0, 127,   0, 153,   0,  51,   0, 178,   0, 102,   0,
];
#[rustfmt::skip]
const NODE_5: DrumMapNode = [
    255,   0,  51,   0,  25,   0,  76,   0,   0,   0,   0,   0, 102,   0,   0,   0,
    204,   0, 229,   0,   0,   0, 178,   0,   0,   0, 153,   0, 127,   0,   8,   0,
    178,   0, 127,   0, 153,   0, 204,   0, 255,   0,   0,   0,  25,   0,  76,   0,
    102,   0,  51,   0,   0,   0,   0,   0, 229,   0,  25,   0,  25,   0, 204,   0,
    178,   0, 102,   0, 255,   0,  76,   0, 127,   0,  76,   0, 229,   0,  76,   0,
    153,   0, 102,   0, 255,   0,  25,   0, 127,   0,  51,   0, 204,   0,  51,   0,
];
#[rustfmt::skip]
const NODE_6: DrumMapNode = [
    255,   0,   0,   0, 223,   0,   0,   0,  31,   0,   8,   0, 127,   0,   0,   0,
     95,   0,   0,   0, 159,   0,   0,   0,  95,   0,  63,   0, 191,   0,   0,   0,
     51,   0, 204,   0,   0,   0, 102,   0, 255,   0, 127,   0,   8,   0, 178,   0,
     25,   0, 229,   0,   0,   0,  76,   0, 204,   0, 153,   0,  51,   0,  25,   0,
    255,   0, 226,   0, 255,   0, 255,   0, 198,   0,  28,   0, 141,   0,  56,   0,
    170,   0,  56,   0,  85,   0,  28,   0, 170,   0,  28,   0, 113,   0,  56,   0,
];
#[rustfmt::skip]
const NODE_7: DrumMapNode = [
    223,   0,   0,   0,  63,   0,   0,   0,  95,   0,   0,   0, 223,   0,  31,   0,
    255,   0,   0,   0, 159,   0,   0,   0, 127,   0,  31,   0, 191,   0,  31,   0,
      0,   0,   0,   0, 109,   0,   0,   0, 218,   0,   0,   0, 182,   0,  72,   0,
      8,   0,  36,   0, 145,   0,  36,   0, 255,   0,   8,   0, 182,   0,  72,   0,
    255,   0,  72,   0, 218,   0,  36,   0, 218,   0,   0,   0, 145,   0,   0,   0,
    255,   0,  36,   0, 182,   0,  36,   0, 182,   0,   0,   0, 109,   0,   0,   0,
];
#[rustfmt::skip]
const NODE_8: DrumMapNode = [
    255,   0,   0,   0, 218,   0,   0,   0,  36,   0,   0,   0, 218,   0,   0,   0,
    182,   0, 109,   0, 255,   0,   0,   0,   0,   0,   0,   0, 145,   0,  72,   0,
    159,   0,   0,   0,  31,   0, 127,   0, 255,   0,  31,   0,   0,   0,  95,   0,
      8,   0,   0,   0, 191,   0,  31,   0, 255,   0,  31,   0, 223,   0,  63,   0,
    255,   0,  31,   0,  63,   0,  31,   0,  95,   0,  31,   0,  63,   0, 127,   0,
    159,   0,  31,   0,  63,   0,  31,   0, 223,   0, 223,   0, 191,   0, 191,   0,
];
#[rustfmt::skip]
const NODE_9: DrumMapNode = [
    226,   0,  28,   0,  28,   0, 141,   0,   8,   0,   8,   0, 255,   0,   8,   0,
    113,   0,  28,   0, 198,   0,  85,   0,  56,   0, 198,   0, 170,   0,  28,   0,
      8,   0,  95,   0,   8,   0,   8,   0, 255,   0,  63,   0,  31,   0, 223,   0,
      8,   0,  31,   0, 191,   0,   8,   0, 255,   0, 127,   0, 127,   0, 159,   0,
    115,   0,  46,   0, 255,   0, 185,   0, 139,   0,  23,   0, 208,   0, 115,   0,
    231,   0,  69,   0, 255,   0, 162,   0, 139,   0, 115,   0, 231,   0,  92,   0,
];
#[rustfmt::skip]
const NODE_10: DrumMapNode = [
    145,   0,   0,   0,   0,   0, 109,   0,   0,   0,   0,   0, 255,   0, 109,   0,
     72,   0, 218,   0,   0,   0,   0,   0,  36,   0,   0,   0, 182,   0,   0,   0,
      0,   0, 127,   0, 159,   0, 127,   0, 159,   0, 191,   0, 223,   0,  63,   0,
    255,   0,  95,   0,  31,   0,  95,   0,  31,   0,   8,   0,  63,   0,   8,   0,
    255,   0,   0,   0, 145,   0,   0,   0, 182,   0, 109,   0, 109,   0, 109,   0,
    218,   0,   0,   0,  72,   0,   0,   0, 182,   0,  72,   0, 182,   0,  36,   0,
];
#[rustfmt::skip]
const NODE_11: DrumMapNode = [
    255,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,
    255,   0,   0,   0, 218,   0,  72,  36,   0,   0, 182,   0,   0,   0, 145, 109,
      0,   0, 127,   0,   0,   0,  42,   0, 212,   0,   0, 212,   0,   0, 212,   0,
      0,   0,   0,   0,  42,   0,   0,   0, 255,   0,   0,   0, 170, 170, 127,  85,
    145,   0, 109, 109, 218, 109,  72,   0, 145,   0,  72,   0, 218,   0, 109,   0,
    182,   0, 109,   0, 255,   0,  72,   0, 182, 109,  36, 109, 255, 109, 109,   0,
];
#[rustfmt::skip]
const NODE_12: DrumMapNode = [
    255,   0,   0,   0, 255,   0, 191,   0,   0,   0,   0,   0,  95,   0,  63,   0,
     31,   0,   0,   0, 223,   0, 223,   0,   0,   0,   8,   0, 159,   0, 127,   0,
      0,   0,  85,   0,  56,   0,  28,   0, 255,   0,  28,   0,   0,   0, 226,   0,
      0,   0, 170,   0,  56,   0, 113,   0, 198,   0,   0,   0, 113,   0, 141,   0,
    255,   0,  42,   0, 233,   0,  63,   0, 212,   0,  85,   0, 191,   0, 106,   0,
    191,   0,  21,   0, 170,   0,   8,   0, 170,   0, 127,   0, 148,   0, 148,   0,
];
#[rustfmt::skip]
const NODE_13: DrumMapNode = [
    255,   0,   0,   0,   0,   0,  63,   0, 191,   0,  95,   0,  31,   0, 223,   0,
    255,   0,  63,   0,  95,   0,  63,   0, 159,   0,   0,   0,   0,   0, 127,   0,
     72,   0,   0,   0,   0,   0,   0,   0, 255,   0,   0,   0,   0,   0,   0,   0,
     72,   0,  72,   0,  36,   0,   8,   0, 218,   0, 182,   0, 145,   0, 109,   0,
    255,   0, 162,   0, 231,   0, 162,   0, 231,   0, 115,   0, 208,   0, 139,   0,
    185,   0,  92,   0, 185,   0,  46,   0, 162,   0,  69,   0, 162,   0,  23,   0,
];
#[rustfmt::skip]
const NODE_14: DrumMapNode = [
    255,   0,   0,   0,  51,   0,   0,   0,   0,   0,   0,   0, 102,   0,   0,   0,
    204,   0,   0,   0, 153,   0,   0,   0,   0,   0,   0,   0,  51,   0,   0,   0,
      0,   0,   0,   0,   8,   0,  36,   0, 255,   0,   0,   0, 182,   0,   8,   0,
      0,   0,   0,   0,  72,   0, 109,   0, 145,   0,   0,   0, 255,   0, 218,   0,
    212,   0,   8,   0, 170,   0,   0,   0, 127,   0,   0,   0,  85,   0,   8,   0,
    255,   0,   8,   0, 170,   0,   0,   0, 127,   0,   0,   0,  42,   0,   8,   0,
];
#[rustfmt::skip]
const NODE_15: DrumMapNode = [
    255,   0,   0,   0,   0,   0,   0,   0,  36,   0,   0,   0, 182,   0,   0,   0,
    218,   0,   0,   0,   0,   0,   0,   0,  72,   0,   0,   0, 145,   0, 109,   0,
     36,   0,  36,   0,   0,   0,   0,   0, 255,   0,   0,   0, 182,   0,   0,   0,
      0,   0,   0,   0,   0,   0,   0, 109, 218,   0,   0,   0, 145,   0,  72,  72,
    255,   0,  28,   0, 226,   0,  56,   0, 198,   0,   0,   0,   0,   0,  28,  28,
    170,   0,   0,   0, 141,   0,   0,   0, 113,   0,   0,   0,  85,  85,  85,  85,
];
#[rustfmt::skip]
const NODE_16: DrumMapNode = [
    255,   0,   0,   0,   0,   0,  95,   0,   0,   0, 127,   0,   0,   0,   0,   0,
    223,   0,  95,   0,  63,   0,  31,   0, 191,   0,   0,   0, 159,   0,   0,   0,
      0,   0,  31,   0, 255,   0,   0,   0,   0,   0,  95,   0, 223,   0,   0,   0,
      0,   0,  63,   0, 191,   0,   0,   0,   0,   0,   0,   0, 159,   0, 127,   0,
    141,   0,  28,   0,  28,   0,  28,   0, 113,   0,   8,   0,   8,   0,   8,   0,
    255,   0,   0,   0, 226,   0,   0,   0, 198,   0,  56,   0, 170,   0,  85,   0,
];
#[rustfmt::skip]
const NODE_17: DrumMapNode = [
    255,   0,   0,   0,   8,   0,   0,   0, 182,   0,   0,   0,  72,   0,   0,   0,
    218,   0,   0,   0,  36,   0,   0,   0, 145,   0,   0,   0, 109,   0,   0,   0,
      0,   0,  51,  25,  76,  25,  25,   0, 153,   0,   0,   0, 127, 102, 178,   0,
    204,   0,   0,   0,   0,   0, 255,   0,   0,   0, 102,   0, 229,   0,  76,   0,
    113,   0,   0,   0, 141,   0,  85,   0,   0,   0,   0,   0, 170,   0,   0,   0,
     56,  28, 255,   0,   0,   0,   0,   0, 198,   0,   0,   0, 226,   0,   0,   0,
];
#[rustfmt::skip]
const NODE_18: DrumMapNode = [
    255,   0,   8,   0,  28,   0,  28,   0, 198,   0,  56,   0,  56,   0,  85,   0,
    255,   0,  85,   0, 113,   0, 113,   0, 226,   0, 141,   0, 170,   0, 141,   0,
      0,   0,   0,   0,   0,   0,   0,   0, 255,   0,   0,   0, 127,   0,   0,   0,
      0,   0,   0,   0,   0,   0,   0,   0,  63,   0,   0,   0, 191,   0,   0,   0,
    255,   0,   0,   0, 255,   0, 127,   0,   0,   0,  85,   0,   0,   0, 212,   0,
      0,   0, 212,   0,  42,   0, 170,   0,   0,   0, 127,   0,   0,   0,   0,   0,
];
#[rustfmt::skip]
const NODE_19: DrumMapNode = [
    255,   0,   0,   0,   0,   0, 218,   0, 182,   0,   0,   0,   0,   0, 145,   0,
    145,   0,  36,   0,   0,   0, 109,   0, 109,   0,   0,   0,  72,   0,  36,   0,
      0,   0,   0,   0, 109,   0,   8,   0,  72,   0,   0,   0, 255,   0, 182,   0,
      0,   0,   0,   0, 145,   0,   8,   0,  36,   0,   8,   0, 218,   0, 182,   0,
    255,   0,   0,   0,   0,   0, 226,   0,  85,   0,   0,   0, 141,   0,   0,   0,
      0,   0,   0,   0, 170,   0,  56,   0, 198,   0,   0,   0, 113,   0,  28,   0,
];
#[rustfmt::skip]
const NODE_20: DrumMapNode = [
    255,   0,   0,   0, 113,   0,   0,   0, 198,   0,  56,   0,  85,   0,  28,   0,
    255,   0,   0,   0, 226,   0,   0,   0, 170,   0,   0,   0, 141,   0,   0,   0,
      0,   0,   0,   0,   0,   0,   0,   0, 255,   0, 145,   0, 109,   0, 218,   0,
     36,   0, 182,   0,  72,   0,  72,   0, 255,   0,   0,   0,   0,   0, 109,   0,
     36,   0,  36,   0, 145,   0,   0,   0,  72,   0,  72,   0, 182,   0,   0,   0,
     72,   0,  72,   0, 218,   0,   0,   0, 109,   0, 109,   0, 255,   0,   0,   0,
];
#[rustfmt::skip]
const NODE_21: DrumMapNode = [
    255,   0,   0,   0, 218,   0,   0,   0, 145,   0,   0,   0,  36,   0,   0,   0,
    218,   0,   0,   0,  36,   0,   0,   0, 182,   0,  72,   0,   0,   0, 109,   0,
      0,   0,   0,   0,   8,   0,   0,   0, 255,   0,  85,   0, 212,   0,  42,   0,
      0,   0,   0,   0,   8,   0,   0,   0,  85,   0, 170,   0, 127,   0,  42,   0,
    109,   0, 109,   0, 255,   0,   0,   0,  72,   0,  72,   0, 218,   0,   0,   0,
    145,   0, 182,   0, 255,   0,   0,   0,  36,   0,  36,   0, 218,   0,   8,   0,
];
#[rustfmt::skip]
const NODE_22: DrumMapNode = [
    255,   0,   0,   0,  42,   0,   0,   0, 212,   0,   0,   0,   8,   0, 212,   0,
    170,   0,   0,   0,  85,   0,   0,   0, 212,   0,   8,   0, 127,   0,   8,   0,
    255,   0,  85,   0,   0,   0,   0,   0, 226,   0,  85,   0,   0,   0, 198,   0,
      0,   0, 141,   0,  56,   0,   0,   0, 170,   0,  28,   0,   0,   0, 113,   0,
    113,   0,  56,   0, 255,   0,   0,   0,  85,   0,  56,   0, 226,   0,   0,   0,
      0,   0, 170,   0,   0,   0, 141,   0,  28,   0,  28,   0, 198,   0,  28,   0,
];
#[rustfmt::skip]
const NODE_23: DrumMapNode = [
    255,   0,   0,   0, 229,   0,   0,   0, 204,   0, 204,   0,   0,   0,  76,   0,
    178,   0, 153,   0,  51,   0, 178,   0, 178,   0, 127,   0, 102,  51,  51,  25,
      0,   0,   0,   0,   0,   0,   0,  31,   0,   0,   0,   0, 255,   0,   0,  31,
      0,   0,   8,   0,   0,   0, 191, 159, 127,  95,  95,   0, 223,   0,  63,   0,
    255,   0, 255,   0, 204, 204, 204, 204,   0,   0,  51,  51,  51,  51,   0,   0,
    204,   0, 204,   0, 153, 153, 153, 153, 153,   0,   0,   0, 102, 102, 102, 102,
];
#[rustfmt::skip]
const NODE_24: DrumMapNode = [
    170,   0,   0,   0,   0, 255,   0,   0, 198,   0,   0,   0,   0,  28,   0,   0,
    141,   0,   0,   0,   0, 226,   0,   0,  56,   0,   0, 113,   0,  85,   0,   0,
    255,   0,   0,   0,   0, 113,   0,   0,  85,   0,   0,   0,   0, 226,   0,   0,
    141,   0,   0,   8,   0, 170,  56,  56, 198,   0,   0,  56,   0, 141,  28,   0,
    255,   0,   0,   0,   0, 191,   0,   0, 159,   0,   0,   0,   0, 223,   0,   0,
     95,   0,   0,   0,   0,  63,   0,   0, 127,   0,   0,   0,   0,  31,   0,   0,
];

/// The built-in Grids drum map.
pub static DRUM_MAP: DrumMap = DrumMap::new([
    [NODE_10, NODE_8, NODE_0, NODE_9, NODE_11],
    [NODE_15, NODE_7, NODE_13, NODE_12, NODE_6],
    [NODE_18, NODE_14, NODE_4, NODE_5, NODE_3],
    [NODE_23, NODE_16, NODE_21, NODE_1, NODE_2],
    [NODE_24, NODE_19, NODE_17, NODE_20, NODE_22],
]);

/// 8-bit fixed point crossfade from `a` (balance 0) towards `b` (balance 255). Truncates, so a
/// balance of 0 yields `a * 255 / 256` rather than `a`.
pub fn u8_mix(a: u8, b: u8, balance: u8) -> u8 {
    let (a, b, balance) = (a as u16, b as u16, balance as u16);
    ((b * balance + a * (255 - balance)) >> 8) as u8
}

/// Immutable 5x5 grid of probability nodes, indexed `[i][j]` where `i` follows `x` and `j`
/// follows `y`.
#[derive(Clone, Debug, PartialEq)]
pub struct DrumMap {
    nodes: [[DrumMapNode; GRID_SIZE]; GRID_SIZE],
}

impl DrumMap {
    pub const fn new(nodes: [[DrumMapNode; GRID_SIZE]; GRID_SIZE]) -> DrumMap {
        DrumMap { nodes }
    }

    /// Node at grid cell `(i, j)`. Indices are clamped to the far edge of the grid.
    pub fn node(&self, i: usize, j: usize) -> &DrumMapNode {
        &self.nodes[i.min(GRID_MAX_INDEX)][j.min(GRID_MAX_INDEX)]
    }

    /// Raw level stored in node `(i, j)` for `instrument` at `step`.
    pub fn level(&self, i: usize, j: usize, step: u8, instrument: Instrument) -> u8 {
        self.node(i, j)[offset(step, instrument)]
    }

    /// Interpolated trigger level at `(x, y)` for one step of one instrument.
    ///
    /// The top two bits of each coordinate select the grid cell, the low six bits the position
    /// inside it. The four corner levels are blended along `x` first, then along `y`.
    pub fn read(&self, x: u8, y: u8, step: u8, instrument: Instrument) -> u8 {
        let i = (x >> 6) as usize;
        let j = (y >> 6) as usize;

        let a = self.level(i, j, step, instrument);
        let b = self.level(i + 1, j, step, instrument);
        let c = self.level(i, j + 1, step, instrument);
        let d = self.level(i + 1, j + 1, step, instrument);

        let x_balance = (x & 0x3f) << 2;
        let y_balance = (y & 0x3f) << 2;

        u8_mix(
            u8_mix(a, b, x_balance),
            u8_mix(c, d, x_balance),
            y_balance,
        )
    }
}

fn offset(step: u8, instrument: Instrument) -> usize {
    instrument.index() * STEP_COUNT as usize + (step % STEP_COUNT) as usize
}
