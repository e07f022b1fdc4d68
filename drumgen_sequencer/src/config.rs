use crate::{clock::ClockResolution, pattern_generator::OutputMode, INSTRUMENT_COUNT};

pub const DEFAULT_X: u8 = 128;
pub const DEFAULT_Y: u8 = 128;
pub const DEFAULT_DENSITY: u8 = 128;
pub const DEFAULT_RANDOMNESS: u8 = 0;

/// Initial control values for a [`crate::PatternGenerator`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub x: u8,
    pub y: u8,
    pub density: [u8; INSTRUMENT_COUNT],
    pub randomness: u8,
    pub resolution: ClockResolution,
    pub mode: OutputMode,
}

impl Default for GeneratorConfig {
    fn default() -> GeneratorConfig {
        GeneratorConfig {
            x: DEFAULT_X,
            y: DEFAULT_Y,
            density: [DEFAULT_DENSITY; INSTRUMENT_COUNT],
            randomness: DEFAULT_RANDOMNESS,
            resolution: Default::default(),
            mode: Default::default(),
        }
    }
}
