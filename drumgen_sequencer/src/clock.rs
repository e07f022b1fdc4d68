//! Turn an external pulse stream into steps of the 32 step pattern cycle.
use core::fmt::{Display, Formatter, Result as FmtResult};
use heapless::Vec;

use crate::STEP_COUNT;

/// Resolution of the incoming clock, in pulses per quarter note.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockResolution {
    Ppqn4,
    Ppqn8,
    #[default]
    Ppqn24,
}

impl ClockResolution {
    pub fn all_variants() -> Vec<ClockResolution, 3> {
        [
            ClockResolution::Ppqn4,
            ClockResolution::Ppqn8,
            ClockResolution::Ppqn24,
        ]
        .into_iter()
        .collect()
    }

    pub fn pulses_per_step(&self) -> u8 {
        match self {
            ClockResolution::Ppqn4 => 1,
            ClockResolution::Ppqn8 => 2,
            ClockResolution::Ppqn24 => 3,
        }
    }
}

impl Display for ClockResolution {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(
            f,
            "{}",
            match *self {
                ClockResolution::Ppqn4 => "4",
                ClockResolution::Ppqn8 => "8",
                ClockResolution::Ppqn24 => "24",
            }
        )
    }
}

impl TryFrom<u8> for ClockResolution {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ClockResolution::Ppqn4),
            1 => Ok(ClockResolution::Ppqn8),
            2 => Ok(ClockResolution::Ppqn24),
            _ => Err(()),
        }
    }
}

/// Pulse and step counters. `step` cycles through `0..32`; `pulse` counts pulses within the
/// current step and is back below `pulses_per_step` after every [`ClockDivider::tick`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClockDivider {
    pulse: u8,
    step: u8,
    resolution: ClockResolution,
}

impl ClockDivider {
    pub fn new(resolution: ClockResolution) -> ClockDivider {
        ClockDivider {
            pulse: 0,
            step: 0,
            resolution,
        }
    }

    pub fn pulse(&self) -> u8 {
        self.pulse
    }

    pub fn step(&self) -> u8 {
        self.step
    }

    pub fn resolution(&self) -> ClockResolution {
        self.resolution
    }

    pub fn pulses_per_step(&self) -> u8 {
        self.resolution.pulses_per_step()
    }

    /// True on the first pulse of a step.
    pub fn is_step_boundary(&self) -> bool {
        self.pulse == 0
    }

    /// Advance by `num_pulses`, rolling over as many step boundaries as that covers.
    pub fn tick(&mut self, num_pulses: u32) {
        let pulses_per_step = self.pulses_per_step() as u32;
        // whole cycles land back on the same step and pulse
        let pulses = self.pulse as u32 + num_pulses % (pulses_per_step * STEP_COUNT as u32);
        let steps = pulses / pulses_per_step;
        self.pulse = (pulses % pulses_per_step) as u8;
        self.step = ((self.step as u32 + steps) % STEP_COUNT as u32) as u8;
    }

    /// Change the number of pulses per step. Counters are left alone, so a change mid-step can
    /// lengthen or shorten the current step.
    pub fn set_resolution(&mut self, resolution: ClockResolution) {
        self.resolution = resolution;
    }

    pub fn reset(&mut self) {
        self.pulse = 0;
        self.step = 0;
    }
}
