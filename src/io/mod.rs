// src/io/mod.rs

//! Plumbing de eventos: a fila circular sem bloqueio que liga a interface
//! à thread de áudio, o vocabulário de mensagens e os buffers seriais MIDI.

pub mod message;
pub mod midi;
pub mod queue;

pub use message::{CtrlId, Message, ToGui, ToSynth};
pub use midi::{ByteFifo, MidiSplitter};
pub use queue::SpscQueue;
