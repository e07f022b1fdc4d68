use defmt::{debug, trace};
use drumgen_sequencer::voice::PAN_CONTROLLER;
use midi_types::MidiMessage;

/// Log an outgoing message. Notes and pan changes at debug, everything else at trace.
pub fn log_message(message: &MidiMessage) {
    match message {
        MidiMessage::NoteOn(channel, note, velocity) => debug!(
            "[midi_send] note on channel={} note={} velocity={}",
            u8::from(*channel),
            u8::from(*note),
            u8::from(*velocity)
        ),
        MidiMessage::NoteOff(channel, note, _velocity) => debug!(
            "[midi_send] note off channel={} note={}",
            u8::from(*channel),
            u8::from(*note)
        ),
        MidiMessage::ControlChange(channel, control, value)
            if u8::from(*control) == PAN_CONTROLLER =>
        {
            debug!(
                "[midi_send] pan channel={} value={}",
                u8::from(*channel),
                u8::from(*value)
            )
        }
        MidiMessage::ControlChange(channel, control, value) => trace!(
            "[midi_send] control change channel={} control={} value={}",
            u8::from(*channel),
            u8::from(*control),
            u8::from(*value)
        ),
        MidiMessage::TimingClock => trace!("[midi_send] clock"),
        MidiMessage::Start | MidiMessage::Stop | MidiMessage::Continue => {
            trace!("[midi_send] transport")
        }
        _ => trace!("[midi_send] other"),
    }
}
