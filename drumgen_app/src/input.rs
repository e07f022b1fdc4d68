/// Handle user input (encoder turns, button presses).
use core::iter::zip;
use defmt::{debug, error};
use drumgen_sequencer::sequencer::{Sequencer, FILL_PARAMS, PATTERN_PARAMS};
use rand_core::RngCore;

use crate::encoder::EncoderDetents;

/// Which page of params the encoders are editing.
#[derive(Clone, Copy, Debug, Default, PartialEq, defmt::Format)]
pub enum InputMode {
    /// X, Y, CHAOS, MODE and PPQN.
    #[default]
    Pattern,
    /// BD, SD and HH fill density.
    Fill,
}

/// Increment the params on the page selected by `input_mode` by the matching encoder detents,
/// then write the params through to the pattern generator.
pub fn apply_encoder_detents<R: RngCore>(
    detents: EncoderDetents,
    input_mode: InputMode,
    sequencer: &mut Sequencer<R>,
) {
    let page = match input_mode {
        InputMode::Pattern => PATTERN_PARAMS,
        InputMode::Fill => FILL_PARAMS,
    };

    // encoders without a param on this page are ignored
    for (param, detents) in zip(&mut sequencer.params_mut()[page], detents) {
        if let Some(detents) = detents {
            param.increment(detents.into());
            debug!(
                "[input] increment param={} value={}",
                param.name(),
                param.value()
            );
        }
    }

    if let Err(err) = sequencer.apply_params() {
        error!("[input] could not apply params err={}", err);
    }
}
