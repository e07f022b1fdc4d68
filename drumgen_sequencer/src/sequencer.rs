use core::ops::Range;
use fugit::{ExtU64, MicrosDurationU64};
use heapless::{HistoryBuffer, Vec};
use midi_types::{Channel, MidiMessage};
use rand_core::RngCore;

use crate::{
    error::PatternError,
    param::{Param, ParamError, ParamList},
    pattern_generator::PatternGenerator,
    voice::{DrumVoice, PAN_CONTROLLER},
    Instrument, INSTRUMENT_COUNT,
};

// pan change, note on and note off for every instrument; pushes below never exceed this
const MAX_MESSAGES_PER_TICK: usize = INSTRUMENT_COUNT * 3;

const MIDI_HISTORY_SAMPLE_COUNT: usize = 6;

const DEFAULT_BPM: u64 = 130;
const DEFAULT_TICK_DURATION_US: u64 = (60_000_000 / DEFAULT_BPM) / 24;

/// Note gate time as % of step time.
pub const GATE_STEP_CENTS: u64 = 80;

/// MIDI channel 10, the General MIDI percussion channel.
pub const DEFAULT_MIDI_CHANNEL: u8 = 9;
const MIDI_MAX_CHANNEL: u8 = 15;

/// Amount a numeric control moves per encoder detent.
const CONTROL_PARAM_STEP: u8 = 4;

/// Params shown on the pattern page: X, Y, CHAOS, MODE and PPQN.
pub const PATTERN_PARAMS: Range<usize> = 0..5;

/// Params shown on the fill page: one density per instrument.
pub const FILL_PARAMS: Range<usize> = 5..8;

#[derive(Debug, PartialEq)]
pub enum ScheduledMidiMessage {
    Immediate(MidiMessage),
    Delayed(MidiMessage, MicrosDurationU64),
}

pub struct Sequencer<'a, R> {
    generator: PatternGenerator<'a, R>,
    voices: [DrumVoice; INSTRUMENT_COUNT],
    midi_channel: Channel,
    playing: bool,
    params: ParamList,
    last_tick_instant_us: Option<u64>,
    midi_tick_history: HistoryBuffer<u64, MIDI_HISTORY_SAMPLE_COUNT>,
}

fn generator_params<R: RngCore>(generator: &PatternGenerator<R>) -> ParamList {
    let number_param =
        |name: &str, value: u8| Param::new_control_param(name, value, CONTROL_PARAM_STEP);

    // if ordering changes, update apply_params, PATTERN_PARAMS and FILL_PARAMS
    [
        number_param("X", generator.x()),
        number_param("Y", generator.y()),
        number_param("CHAOS", generator.randomness()),
        Param::new_output_mode_param("MODE", generator.output_mode()),
        Param::new_clock_resolution_param("PPQN", generator.clock_resolution()),
        number_param("BD", generator.density(Instrument::BD)),
        number_param("SD", generator.density(Instrument::SD)),
        number_param("HH", generator.density(Instrument::HH)),
    ]
    .into_iter()
    .collect()
}

impl<'a, R: RngCore> Sequencer<'a, R> {
    pub fn new(generator: PatternGenerator<'a, R>) -> Sequencer<'a, R> {
        let params = generator_params(&generator);
        Sequencer {
            generator,
            voices: Instrument::ALL.map(DrumVoice::new),
            midi_channel: DEFAULT_MIDI_CHANNEL.into(),
            playing: false,
            params,
            last_tick_instant_us: None,
            midi_tick_history: HistoryBuffer::<u64, MIDI_HISTORY_SAMPLE_COUNT>::new(),
        }
    }

    pub fn playing(&self) -> bool {
        self.playing
    }

    pub fn generator(&self) -> &PatternGenerator<'a, R> {
        &self.generator
    }

    pub fn generator_mut(&mut self) -> &mut PatternGenerator<'a, R> {
        &mut self.generator
    }

    pub fn voices(&self) -> &[DrumVoice; INSTRUMENT_COUNT] {
        &self.voices
    }

    pub fn voices_mut(&mut self) -> &mut [DrumVoice; INSTRUMENT_COUNT] {
        &mut self.voices
    }

    pub fn voice_mut(&mut self, instrument: Instrument) -> &mut DrumVoice {
        &mut self.voices[instrument.index()]
    }

    pub fn midi_channel(&self) -> Channel {
        self.midi_channel
    }

    pub fn set_midi_channel(&mut self, channel: u8) -> Result<(), PatternError> {
        PatternError::check_range(channel as i32, 0, MIDI_MAX_CHANNEL as i32)?;
        self.midi_channel = channel.into();
        Ok(())
    }

    pub fn params(&self) -> &ParamList {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut ParamList {
        &mut self.params
    }

    /// Write the current param values into the pattern generator.
    pub fn apply_params(&mut self) -> Result<(), ParamError> {
        self.generator.set_x(self.params[0].value().try_into()?);
        self.generator.set_y(self.params[1].value().try_into()?);
        self.generator
            .set_randomness(self.params[2].value().try_into()?);
        self.generator
            .set_output_mode(self.params[3].value().try_into()?);
        self.generator
            .set_clock_resolution(self.params[4].value().try_into()?);
        for (instrument, param) in Instrument::ALL.into_iter().zip(&self.params[FILL_PARAMS]) {
            self.generator
                .set_density(instrument, param.value().try_into()?);
        }
        Ok(())
    }

    /// Start from the top of the pattern.
    pub fn start_playing(&mut self) {
        self.generator.reset();
        self.playing = true
    }

    pub fn stop_playing(&mut self) {
        self.playing = false;
    }

    pub fn continue_playing(&mut self) {
        self.playing = true
    }

    /// Handle one MIDI clock pulse received at `now_us`, returning the messages to send.
    pub fn advance(&mut self, now_us: u64) -> Vec<ScheduledMidiMessage, MAX_MESSAGES_PER_TICK> {
        let tick_duration = self.average_tick_duration(now_us);

        let mut output_messages = Vec::new();

        if !self.playing {
            return output_messages;
        }

        let output = self.generator.evaluate();
        let note_off_time = ((tick_duration.to_micros()
            * self.generator.pulses_per_step() as u64
            * GATE_STEP_CENTS)
            / 100)
            .micros();

        for instrument in output.triggered_instruments() {
            let voice = &mut self.voices[instrument.index()];
            let note = voice.midi_note();

            if let Some(pan) = voice.take_pan_change() {
                output_messages
                    .push(ScheduledMidiMessage::Immediate(MidiMessage::ControlChange(
                        self.midi_channel,
                        PAN_CONTROLLER.into(),
                        pan,
                    )))
                    .unwrap();
            }

            let note_on_message = MidiMessage::NoteOn(
                self.midi_channel,
                note,
                voice.midi_velocity(output.is_accented(instrument)),
            );
            output_messages
                .push(ScheduledMidiMessage::Immediate(note_on_message))
                .unwrap();

            let note_off_message = MidiMessage::NoteOff(self.midi_channel, note, 0.into());
            output_messages
                .push(ScheduledMidiMessage::Delayed(note_off_message, note_off_time))
                .unwrap();
        }

        self.generator.tick_clock(1);

        output_messages
    }

    /// Calculate average time between last k MIDI ticks. Defaults to tick frequency of
    /// 19,230us, which is equivalent to 130BPM.
    fn average_tick_duration(&mut self, now_us: u64) -> MicrosDurationU64 {
        let mut tick_duration = DEFAULT_TICK_DURATION_US.micros();

        if let Some(last_tick_instant_us) = self.last_tick_instant_us {
            let last_tick_duration = now_us.saturating_sub(last_tick_instant_us);
            self.midi_tick_history.write(last_tick_duration);
            tick_duration = (self.midi_tick_history.as_slice().iter().sum::<u64>()
                / self.midi_tick_history.len() as u64)
                .micros();
        }

        self.last_tick_instant_us = Some(now_us);

        tick_duration
    }
}
