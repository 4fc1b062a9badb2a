// src/memory/firmware.rs

//! Carga da ROM de firmware e do blob de vozes de fábrica.

use std::fs;
use std::path::Path;

use thiserror::Error;

/// A ROM de firmware ocupa o topo do mapa, 0xC000-0xFFFF.
pub const FIRMWARE_SIZE: usize = 16384;

/// O blob de fábrica embala 8 bancos contíguos de 4 KiB.
pub const VOICES_SIZE: usize = 32768;
pub const BANK_SIZE: usize = 4096;

#[derive(Debug, Error)]
pub enum FirmwareError {
    #[error("tamanho de firmware inválido: {0} != {FIRMWARE_SIZE}")]
    BadFirmwareSize(usize),

    #[error("tamanho de blob de vozes inválido: {0} != {VOICES_SIZE}")]
    BadVoicesSize(usize),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Lê uma ROM de firmware crua, validando o tamanho.
pub fn load_firmware(path: &Path) -> Result<Vec<u8>, FirmwareError> {
    let data = fs::read(path)?;
    if data.len() != FIRMWARE_SIZE {
        return Err(FirmwareError::BadFirmwareSize(data.len()));
    }
    Ok(data)
}

/// Os oito bancos de vozes de fábrica.
pub struct VoiceRom {
    data: Vec<u8>,
}

impl VoiceRom {
    pub fn load(path: &Path) -> Result<Self, FirmwareError> {
        let data = fs::read(path)?;
        Self::from_bytes(data)
    }

    pub fn from_bytes(data: Vec<u8>) -> Result<Self, FirmwareError> {
        if data.len() != VOICES_SIZE {
            return Err(FirmwareError::BadVoicesSize(data.len()));
        }
        Ok(Self { data })
    }

    /// Banco `n` (0-7); o índice enrola como no seletor de 3 bits.
    pub fn bank(&self, n: u8) -> &[u8] {
        let n = (n & 0x7) as usize;
        &self.data[n * BANK_SIZE..(n + 1) * BANK_SIZE]
    }
}
