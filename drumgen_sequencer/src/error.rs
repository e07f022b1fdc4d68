use core::fmt::{Display, Formatter, Result as FmtResult};

/// Caller misuse of the generator API. None of these can arise from the engine's own arithmetic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PatternError {
    OutOfRange { value: i32, min: i32, max: i32 },
    OutOfUnitRange,
    InvalidInstrument(u8),
    InvalidEuclideanShape { steps: u8, pulses: u8 },
}

impl PatternError {
    pub(crate) fn check_range(value: i32, min: i32, max: i32) -> Result<i32, PatternError> {
        if (min..=max).contains(&value) {
            Ok(value)
        } else {
            Err(PatternError::OutOfRange { value, min, max })
        }
    }

    pub(crate) fn check_unit(value: f32) -> Result<f32, PatternError> {
        // NaN fails the range check too
        if (0.0..=1.0).contains(&value) {
            Ok(value)
        } else {
            Err(PatternError::OutOfUnitRange)
        }
    }
}

impl Display for PatternError {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match *self {
            PatternError::OutOfRange { value, min, max } => {
                write!(f, "value {} outside {}..={}", value, min, max)
            }
            PatternError::OutOfUnitRange => write!(f, "value outside 0.0..=1.0"),
            PatternError::InvalidInstrument(index) => write!(f, "no instrument {}", index),
            PatternError::InvalidEuclideanShape { steps, pulses } => {
                write!(f, "no euclidean pattern for {} pulses in {} steps", pulses, steps)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_range_should_reject_values_outside_bounds() {
        assert_eq!(Ok(255), PatternError::check_range(255, 0, 255));
        assert_eq!(
            Err(PatternError::OutOfRange { value: 256, min: 0, max: 255 }),
            PatternError::check_range(256, 0, 255)
        );
        assert!(PatternError::check_range(-1, 0, 255).is_err());
    }

    #[test]
    fn check_unit_should_reject_nan() {
        assert_eq!(Err(PatternError::OutOfUnitRange), PatternError::check_unit(f32::NAN));
        assert_eq!(Ok(1.0), PatternError::check_unit(1.0));
    }
}
