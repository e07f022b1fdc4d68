//! The six rotary encoders under the param pages, read by polling.
use defmt::{error, trace};
use rotary_encoder_hal::{Direction, Rotary};
use rp_pico::hal::gpio::DynPin;

pub const ENCODER_COUNT: usize = 6;

/// Pin pairs for each encoder, left to right.
pub type EncoderPins = [(DynPin, DynPin); ENCODER_COUNT];

/// Detents turned per encoder since the last take, `None` for encoders left alone.
pub type EncoderDetents = [Option<i8>; ENCODER_COUNT];

struct Encoder {
    rotary: Rotary<DynPin, DynPin>,
    detents: i8,
}

impl Encoder {
    fn new((mut pin_a, mut pin_b): (DynPin, DynPin)) -> Encoder {
        pin_a.into_pull_up_input();
        pin_b.into_pull_up_input();
        Encoder {
            rotary: Rotary::new(pin_a, pin_b),
            detents: 0,
        }
    }

    /// Returns true if the encoder moved a detent.
    fn poll(&mut self, index: usize) -> bool {
        let delta = match self.rotary.update() {
            Ok(Direction::Clockwise) => 1,
            Ok(Direction::CounterClockwise) => -1,
            Ok(Direction::None) => return false,
            Err(_) => {
                error!("[encoder] could not read encoder={}", index);
                return false;
            }
        };
        // a fast spin between reads pins at the i8 bounds
        self.detents = self.detents.saturating_add(delta);
        trace!("[encoder] encoder={} detents={}", index, self.detents);
        true
    }

    fn take_detents(&mut self) -> Option<i8> {
        match core::mem::take(&mut self.detents) {
            0 => None,
            detents => Some(detents),
        }
    }
}

pub struct EncoderBank {
    encoders: [Encoder; ENCODER_COUNT],
}

impl EncoderBank {
    pub fn new(pins: EncoderPins) -> EncoderBank {
        EncoderBank {
            encoders: pins.map(Encoder::new),
        }
    }

    /// Poll every encoder, including those after one that moved. Returns true if any moved.
    pub fn poll(&mut self) -> bool {
        self.encoders
            .iter_mut()
            .enumerate()
            .fold(false, |moved, (index, encoder)| encoder.poll(index) || moved)
    }

    pub fn take_detents(&mut self) -> EncoderDetents {
        let mut detents = [None; ENCODER_COUNT];
        for (slot, encoder) in detents.iter_mut().zip(&mut self.encoders) {
            *slot = encoder.take_detents();
        }
        detents
    }
}
