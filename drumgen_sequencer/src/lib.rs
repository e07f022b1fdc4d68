#![cfg_attr(not(test), no_std)]

pub mod clock;
pub mod config;
pub mod drum_map;
pub mod error;
pub mod euclidean;
pub mod output;
pub mod param;
pub mod pattern_generator;
pub mod sequencer;
pub mod voice;

pub use clock::{ClockDivider, ClockResolution};
pub use config::GeneratorConfig;
pub use drum_map::{DrumMap, DRUM_MAP};
pub use error::PatternError;
pub use euclidean::{EuclideanTable, EUCLIDEAN_TABLE};
pub use output::Output;
pub use param::{Param, ParamError, ParamList, ParamValue};
pub use pattern_generator::{Control, OutputMode, PatternGenerator};
pub use sequencer::{ScheduledMidiMessage, Sequencer};
pub use voice::DrumVoice;

use core::fmt::{Display, Formatter, Result as FmtResult};

/// Number of drum channels driven by the generator (kick, snare, hi-hat).
pub const INSTRUMENT_COUNT: usize = 3;

/// Number of steps in one pattern cycle.
pub const STEP_COUNT: u8 = 32;

/// One of the three drum channels. The discriminant is the channel index used for table offsets
/// and output bit positions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Instrument {
    #[default]
    BD = 0,
    SD = 1,
    HH = 2,
}

impl Instrument {
    pub const ALL: [Instrument; INSTRUMENT_COUNT] = [Instrument::BD, Instrument::SD, Instrument::HH];

    pub fn index(self) -> usize {
        self as usize
    }
}

impl Display for Instrument {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(
            f,
            "{}",
            match *self {
                Instrument::BD => "BD",
                Instrument::SD => "SD",
                Instrument::HH => "HH",
            }
        )
    }
}

impl TryFrom<u8> for Instrument {
    type Error = PatternError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Instrument::BD),
            1 => Ok(Instrument::SD),
            2 => Ok(Instrument::HH),
            unexpected => Err(PatternError::InvalidInstrument(unexpected)),
        }
    }
}
