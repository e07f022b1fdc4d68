/// Encoder-driven controls as mutable values with metadata (name, range or options)
use core::fmt::{Display, Formatter, Result as FmtResult};
use heapless::{String, Vec};

use crate::{clock::ClockResolution, pattern_generator::OutputMode};

pub fn wrapping_add(a: i32, b: i32, max: i32) -> i32 {
    let size = max + 1;
    ((a + b % size) + size) % size
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParamError {
    OptionsDoesNotContainValue,
    UnexpectedValue,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParamValue {
    Number(u8),
    OutputMode(OutputMode),
    ClockResolution(ClockResolution),
}

impl Display for ParamValue {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            ParamValue::Number(num) => Display::fmt(&num, f),
            ParamValue::OutputMode(mode) => Display::fmt(&mode, f),
            ParamValue::ClockResolution(resolution) => Display::fmt(&resolution, f),
        }
    }
}

impl From<OutputMode> for ParamValue {
    fn from(mode: OutputMode) -> ParamValue {
        ParamValue::OutputMode(mode)
    }
}

impl From<ClockResolution> for ParamValue {
    fn from(resolution: ClockResolution) -> ParamValue {
        ParamValue::ClockResolution(resolution)
    }
}

impl TryFrom<ParamValue> for u8 {
    type Error = ParamError;

    fn try_from(value: ParamValue) -> Result<Self, Self::Error> {
        match value {
            ParamValue::Number(num) => Ok(num),
            _ => Err(ParamError::UnexpectedValue),
        }
    }
}

impl TryFrom<ParamValue> for OutputMode {
    type Error = ParamError;

    fn try_from(value: ParamValue) -> Result<Self, Self::Error> {
        match value {
            ParamValue::OutputMode(mode) => Ok(mode),
            _ => Err(ParamError::UnexpectedValue),
        }
    }
}

impl TryFrom<ParamValue> for ClockResolution {
    type Error = ParamError;

    fn try_from(value: ParamValue) -> Result<Self, Self::Error> {
        match value {
            ParamValue::ClockResolution(resolution) => Ok(resolution),
            _ => Err(ParamError::UnexpectedValue),
        }
    }
}

type ParamName = String<6>;
type ParamOptions = Vec<ParamValue, 4>;

/// How a param moves when incremented.
#[derive(Clone, Debug)]
enum ParamRange {
    /// Numbers stop at their bounds. Each increment moves `step` units.
    Number { min: u8, max: u8, step: u8 },
    /// Options wrap around in both directions.
    Options(ParamOptions),
}

#[derive(Clone, Debug)]
pub struct Param {
    name: ParamName,
    value: ParamValue,
    range: ParamRange,
}

impl Param {
    /// A number spanning the whole `u8` range.
    pub fn new_control_param(name: &str, value: u8, step: u8) -> Param {
        Param {
            name: name.into(),
            value: ParamValue::Number(value),
            range: ParamRange::Number {
                min: u8::MIN,
                max: u8::MAX,
                step,
            },
        }
    }

    pub fn new_output_mode_param(name: &str, value: OutputMode) -> Param {
        Param {
            name: name.into(),
            value: value.into(),
            range: ParamRange::Options(
                [OutputMode::Grid, OutputMode::Euclidean]
                    .into_iter()
                    .map(ParamValue::OutputMode)
                    .collect(),
            ),
        }
    }

    pub fn new_clock_resolution_param(name: &str, value: ClockResolution) -> Param {
        Param {
            name: name.into(),
            value: value.into(),
            range: ParamRange::Options(
                ClockResolution::all_variants()
                    .into_iter()
                    .map(ParamValue::ClockResolution)
                    .collect(),
            ),
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn value(&self) -> ParamValue {
        self.value
    }

    /// Move the value `n` increments. Numbers saturate at their bounds; options wrap.
    pub fn increment(&mut self, n: i32) {
        match &self.range {
            ParamRange::Number { min, max, step } => {
                let current = match self.value {
                    ParamValue::Number(num) => num as i32,
                    _ => *min as i32,
                };
                let next = (current + n * *step as i32).clamp(*min as i32, *max as i32);
                self.value = ParamValue::Number(next as u8);
            }
            ParamRange::Options(options) => {
                let value_pos = options
                    .iter()
                    .position(|option| *option == self.value)
                    .unwrap_or(0);
                let value_pos = wrapping_add(value_pos as i32, n, options.len() as i32 - 1);
                self.value = options[value_pos as usize];
            }
        }
    }

    pub fn set(&mut self, value: ParamValue) -> Result<(), ParamError> {
        let accepted = match (&self.range, value) {
            (ParamRange::Number { min, max, .. }, ParamValue::Number(num)) => {
                (*min..=*max).contains(&num)
            }
            (ParamRange::Options(options), value) => options.contains(&value),
            _ => false,
        };
        if !accepted {
            return Err(ParamError::OptionsDoesNotContainValue);
        }
        self.value = value;
        Ok(())
    }
}

pub const PARAM_LIST_CAPACITY: usize = 8;

pub type ParamList = Vec<Param, PARAM_LIST_CAPACITY>;

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_param_clock_resolution(expected: ClockResolution, param: &Param) {
        match param.value() {
            ParamValue::ClockResolution(resolution) => assert_eq!(expected, resolution),
            other => panic!("unexpected param value {:?}", other),
        }
    }

    #[test]
    fn wrapping_add_should_wrap_both_ways() {
        assert_eq!(0, wrapping_add(2, 1, 2));
        assert_eq!(2, wrapping_add(0, -1, 2));
        assert_eq!(1, wrapping_add(0, -8, 2));
    }

    #[test]
    fn param_number_should_increment_by_step() {
        let mut param_number = Param::new_control_param("X", 128, 4);
        param_number.increment(1);
        assert_eq!(ParamValue::Number(132), param_number.value());
        param_number.increment(-2);
        assert_eq!(ParamValue::Number(124), param_number.value());
    }

    #[test]
    fn param_number_should_saturate_at_bounds() {
        let mut param_number = Param::new_control_param("CHAOS", 0, 4);
        param_number.increment(-1);
        assert_eq!(ParamValue::Number(0), param_number.value());
        param_number.increment(100);
        assert_eq!(ParamValue::Number(255), param_number.value());
    }

    #[test]
    fn param_clock_resolution_should_wrap() {
        let mut param = Param::new_clock_resolution_param("PPQN", ClockResolution::Ppqn24);
        assert_param_clock_resolution(ClockResolution::Ppqn24, &param);
        param.increment(1);
        assert_param_clock_resolution(ClockResolution::Ppqn4, &param);
        param.increment(-2);
        assert_param_clock_resolution(ClockResolution::Ppqn8, &param);
        param.increment(7);
        assert_param_clock_resolution(ClockResolution::Ppqn24, &param);
    }

    #[test]
    fn param_output_mode_should_toggle() {
        let mut param = Param::new_output_mode_param("MODE", OutputMode::Grid);
        assert_eq!(ParamValue::OutputMode(OutputMode::Grid), param.value());
        param.increment(1);
        assert_eq!(ParamValue::OutputMode(OutputMode::Euclidean), param.value());
        param.increment(1);
        assert_eq!(ParamValue::OutputMode(OutputMode::Grid), param.value());
        assert_eq!("GRID", param.value().to_string());
    }

    #[test]
    fn param_set_should_only_accept_values_in_range() {
        let mut param = Param::new_control_param("BD", 10, 4);
        assert!(param.set(ParamValue::Number(255)).is_ok());
        assert_eq!(
            Err(ParamError::OptionsDoesNotContainValue),
            param.set(ParamValue::OutputMode(OutputMode::Euclidean))
        );
        assert_eq!(ParamValue::Number(255), param.value());

        let mut param = Param::new_output_mode_param("MODE", OutputMode::Grid);
        assert!(param
            .set(ParamValue::OutputMode(OutputMode::Euclidean))
            .is_ok());
        assert!(param.set(ParamValue::Number(1)).is_err());
        assert!(param
            .set(ParamValue::ClockResolution(ClockResolution::Ppqn8))
            .is_err());
        assert_eq!(ParamValue::OutputMode(OutputMode::Euclidean), param.value());
    }

    #[test]
    fn param_value_should_convert_to_typed_values() {
        assert_eq!(Ok(7u8), u8::try_from(ParamValue::Number(7)));
        assert_eq!(
            Err(ParamError::UnexpectedValue),
            OutputMode::try_from(ParamValue::Number(7))
        );
        assert_eq!(
            Ok(ClockResolution::Ppqn8),
            ClockResolution::try_from(ParamValue::ClockResolution(ClockResolution::Ppqn8))
        );
    }

    #[test]
    fn param_list_can_store_different_param_types() {
        let param_list = ParamList::from_slice(&[
            Param::new_control_param("X", 128, 4),
            Param::new_output_mode_param("MODE", OutputMode::Grid),
            Param::new_clock_resolution_param("PPQN", ClockResolution::Ppqn24),
        ])
        .unwrap();
        assert_eq!(3, param_list.len());
        assert_eq!("PPQN", param_list[2].name());
    }
}
