//! The 8-bit event word produced once per pulse.
//!
//! | bits | meaning                                   |
//! |------|-------------------------------------------|
//! | 0-2  | trigger for BD, SD, HH                    |
//! | 3-5  | accent for BD, SD, HH                     |
//! | 6    | clock, set on every grid mode step        |
//! | 7    | reset, set on the first step of the cycle |
use core::fmt::{Display, Formatter, Result as FmtResult};

use crate::Instrument;

pub const TRIGGER_MASK: u8 = 0b0000_0111;
pub const ACCENT_SHIFT: u8 = 3;
pub const CLOCK_BIT: u8 = 1 << 6;
pub const RESET_BIT: u8 = 1 << 7;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Output(u8);

impl Output {
    /// No event on this pulse.
    pub const NONE: Output = Output(0);

    pub const fn from_bits(bits: u8) -> Output {
        Output(bits)
    }

    pub const fn bits(&self) -> u8 {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn with_trigger(self, instrument: Instrument) -> Output {
        Output(self.0 | 1 << instrument.index())
    }

    pub fn with_accent(self, instrument: Instrument) -> Output {
        Output(self.0 | 1 << (instrument.index() as u8 + ACCENT_SHIFT))
    }

    pub fn with_clock(self) -> Output {
        Output(self.0 | CLOCK_BIT)
    }

    pub fn with_reset(self) -> Output {
        Output(self.0 | RESET_BIT)
    }

    pub fn is_triggered(&self, instrument: Instrument) -> bool {
        self.0 & 1 << instrument.index() != 0
    }

    pub fn is_accented(&self, instrument: Instrument) -> bool {
        self.0 & 1 << (instrument.index() as u8 + ACCENT_SHIFT) != 0
    }

    pub fn is_clock(&self) -> bool {
        self.0 & CLOCK_BIT != 0
    }

    pub fn is_reset(&self) -> bool {
        self.0 & RESET_BIT != 0
    }

    pub fn triggers(&self) -> u8 {
        self.0 & TRIGGER_MASK
    }

    /// Instruments triggered by this word, in channel order.
    pub fn triggered_instruments(&self) -> impl Iterator<Item = Instrument> + '_ {
        Instrument::ALL
            .into_iter()
            .filter(move |&instrument| self.is_triggered(instrument))
    }
}

impl From<Output> for u8 {
    fn from(output: Output) -> u8 {
        output.0
    }
}

impl From<u8> for Output {
    fn from(bits: u8) -> Output {
        Output(bits)
    }
}

/// Renders as `x-X` style hits: `x` trigger, `X` accented trigger, `-` rest.
impl Display for Output {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        for instrument in Instrument::ALL {
            let c = match (self.is_triggered(instrument), self.is_accented(instrument)) {
                (true, true) => 'X',
                (true, false) => 'x',
                _ => '-',
            };
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}
