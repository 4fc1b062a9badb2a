// src/cpu/mod.rs

//! CPU de 8 bits compatível com o Hitachi HD6303R: registradores, conjunto
//! de 256 opcodes, pilha, interrupções, registradores internos de E/S,
//! timer de comparação e canal serial.

pub mod alu;
pub mod core;
pub mod decode;

pub use alu::Ccr;
pub use core::{Hd6303, Step};
pub use decode::{Instruction, Mode, INSTRUCTIONS};
