use midi_types::{Note, Value7};

use crate::{error::PatternError, Instrument};

pub const BD_NOTE: u8 = 36;
pub const SD_NOTE: u8 = 38;
pub const HH_NOTE: u8 = 42;

/// Velocity of accented hits.
pub const ACCENT_VELOCITY: u8 = 127;

/// Lowest velocity a triggered note is sent with. A note on with velocity 0 is a note off.
pub const MIN_VELOCITY: u8 = 1;

/// MIDI controller carrying a voice's pan position.
pub const PAN_CONTROLLER: u8 = 10;

/// Pitch 0.0 plays one octave below the base note, 1.0 one octave above.
pub const PITCH_RANGE_SEMITONES: f32 = 24.0;

const MIDI_MAX: f32 = 127.0;
const DEFAULT_LEVEL: f32 = 0.5;

/// How one pattern channel is played: which note, how loud, how high and where in the stereo
/// field. Velocity, pitch and pan are fractions in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrumVoice {
    base_note: u8,
    velocity: f32,
    pitch: f32,
    pan: f32,
    pan_changed: bool,
}

impl DrumVoice {
    pub fn new(instrument: Instrument) -> DrumVoice {
        let base_note = match instrument {
            Instrument::BD => BD_NOTE,
            Instrument::SD => SD_NOTE,
            Instrument::HH => HH_NOTE,
        };
        DrumVoice {
            base_note,
            velocity: DEFAULT_LEVEL,
            pitch: DEFAULT_LEVEL,
            pan: DEFAULT_LEVEL,
            // a fresh voice announces its pan before its first note
            pan_changed: true,
        }
    }

    pub fn base_note(&self) -> u8 {
        self.base_note
    }

    pub fn set_base_note(&mut self, note: i32) -> Result<(), PatternError> {
        self.base_note = PatternError::check_range(note, 0, MIDI_MAX as i32)? as u8;
        Ok(())
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn set_velocity(&mut self, velocity: f32) -> Result<(), PatternError> {
        self.velocity = PatternError::check_unit(velocity)?;
        Ok(())
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn set_pitch(&mut self, pitch: f32) -> Result<(), PatternError> {
        self.pitch = PatternError::check_unit(pitch)?;
        Ok(())
    }

    pub fn pan(&self) -> f32 {
        self.pan
    }

    pub fn set_pan(&mut self, pan: f32) -> Result<(), PatternError> {
        let pan = PatternError::check_unit(pan)?;
        if pan != self.pan {
            self.pan = pan;
            self.pan_changed = true;
        }
        Ok(())
    }

    /// Note to play, shifted from the base note by pitch.
    pub fn midi_note(&self) -> Note {
        let note = self.base_note as f32 + (self.pitch - DEFAULT_LEVEL) * PITCH_RANGE_SEMITONES;
        Note::from((note as i32).clamp(0, MIDI_MAX as i32) as u8)
    }

    pub fn midi_velocity(&self, accented: bool) -> Value7 {
        let velocity = ((self.velocity * MIDI_MAX) as u8).max(MIN_VELOCITY);
        if accented {
            velocity.max(ACCENT_VELOCITY).into()
        } else {
            velocity.into()
        }
    }

    pub fn midi_pan(&self) -> Value7 {
        ((self.pan * MIDI_MAX) as u8).into()
    }

    /// The pan value to send before the next note, if it changed since it was last taken.
    pub fn take_pan_change(&mut self) -> Option<Value7> {
        if !self.pan_changed {
            return None;
        }
        self.pan_changed = false;
        Some(self.midi_pan())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drum_voice_new_should_use_general_midi_notes() {
        let notes: Vec<u8> = Instrument::ALL
            .into_iter()
            .map(|instrument| u8::from(DrumVoice::new(instrument).midi_note()))
            .collect();
        assert_eq!(vec![36, 38, 42], notes);
    }

    #[test]
    fn drum_voice_pitch_should_shift_note_by_up_to_an_octave() {
        let mut voice = DrumVoice::new(Instrument::BD);
        voice.set_pitch(1.0).unwrap();
        assert_eq!(48, u8::from(voice.midi_note()));
        voice.set_pitch(0.0).unwrap();
        assert_eq!(24, u8::from(voice.midi_note()));

        let mut voice = DrumVoice::new(Instrument::HH);
        voice.set_pitch(0.6).unwrap();
        assert_eq!(44, u8::from(voice.midi_note()));
    }

    #[test]
    fn drum_voice_note_should_clamp_to_midi_range() {
        let mut voice = DrumVoice::new(Instrument::BD);
        voice.set_base_note(125).unwrap();
        voice.set_pitch(1.0).unwrap();
        assert_eq!(127, u8::from(voice.midi_note()));
        voice.set_base_note(3).unwrap();
        voice.set_pitch(0.0).unwrap();
        assert_eq!(0, u8::from(voice.midi_note()));
    }

    #[test]
    fn drum_voice_velocity_should_scale_and_accent() {
        let mut voice = DrumVoice::new(Instrument::SD);
        assert_eq!(Value7::from(63), voice.midi_velocity(false));
        assert_eq!(Value7::from(ACCENT_VELOCITY), voice.midi_velocity(true));
        voice.set_velocity(1.0).unwrap();
        assert_eq!(Value7::from(127), voice.midi_velocity(false));
    }

    #[test]
    fn drum_voice_silent_velocity_should_still_play_a_note() {
        let mut voice = DrumVoice::new(Instrument::HH);
        voice.set_velocity(0.0).unwrap();
        assert_eq!(Value7::from(MIN_VELOCITY), voice.midi_velocity(false));
        assert_eq!(Value7::from(ACCENT_VELOCITY), voice.midi_velocity(true));
        voice.set_velocity(0.005).unwrap();
        assert_eq!(Value7::from(1), voice.midi_velocity(false));
    }

    #[test]
    fn drum_voice_setters_should_reject_values_outside_unit_range() {
        let mut voice = DrumVoice::new(Instrument::BD);
        assert_eq!(Err(PatternError::OutOfUnitRange), voice.set_velocity(1.5));
        assert_eq!(Err(PatternError::OutOfUnitRange), voice.set_pitch(-0.1));
        assert_eq!(Err(PatternError::OutOfUnitRange), voice.set_pan(f32::NAN));
        assert!(voice.set_base_note(128).is_err());
        assert_eq!(0.5, voice.velocity());
        assert_eq!(0.5, voice.pitch());
        assert_eq!(0.5, voice.pan());
        assert_eq!(36, voice.base_note());
    }

    #[test]
    fn drum_voice_should_report_pan_changes_once() {
        let mut voice = DrumVoice::new(Instrument::BD);
        assert_eq!(Some(Value7::from(63)), voice.take_pan_change());
        assert_eq!(None, voice.take_pan_change());

        voice.set_pan(0.5).unwrap();
        assert_eq!(None, voice.take_pan_change());

        voice.set_pan(1.0).unwrap();
        assert_eq!(Some(Value7::from(127)), voice.take_pan_change());
        assert_eq!(None, voice.take_pan_change());
    }
}
