// Purpose - external interfaces, wire formats

pub mod midi;

pub use midi::MidiEvent;
