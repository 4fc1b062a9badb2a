// src/memory/cartridge.rs

//! Cartucho em formato SysEx de despejo de vozes: cabeçalho de 6 bytes,
//! 4096 bytes de carga, checksum de 7 bits em complemento de dois e o
//! terminador 0xF7.

use std::fs;
use std::path::Path;

use thiserror::Error;

pub const CART_SIZE: usize = 4096;
pub const FILE_SIZE: usize = 4104;

const SYSEX_HEADER: [u8; 6] = [0xF0, 0x43, 0x00, 0x09, 0x20, 0x00];

#[derive(Debug, Error)]
pub enum CartridgeError {
    #[error("tamanho de cartucho inválido: {0} != {FILE_SIZE}")]
    BadSize(usize),

    #[error("cabeçalho SysEx inválido")]
    BadHeader,

    #[error("checksum SysEx inválido (resto {0})")]
    BadChecksum(u8),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A soma da carga mais o checksum, mascarada a 7 bits, fecha em zero.
fn checksum(payload: &[u8]) -> u8 {
    let sum: u32 = payload.iter().map(|&b| b as u32).sum();
    (sum as u8).wrapping_neg() & 0x7F
}

/// Valida um arquivo de cartucho e devolve a fatia da carga.
pub fn decode(data: &[u8]) -> Result<&[u8], CartridgeError> {
    if data.len() != FILE_SIZE {
        return Err(CartridgeError::BadSize(data.len()));
    }
    if data[..6] != SYSEX_HEADER {
        return Err(CartridgeError::BadHeader);
    }
    let payload = &data[6..6 + CART_SIZE];
    let sum = payload
        .iter()
        .fold(data[6 + CART_SIZE] as u32, |acc, &b| acc + b as u32);
    if sum & 0x7F != 0 {
        return Err(CartridgeError::BadChecksum((sum & 0x7F) as u8));
    }
    Ok(payload)
}

/// Monta o arquivo completo a partir da carga.
pub fn encode(payload: &[u8; CART_SIZE]) -> Vec<u8> {
    let mut out = Vec::with_capacity(FILE_SIZE);
    out.extend_from_slice(&SYSEX_HEADER);
    out.extend_from_slice(payload);
    out.push(checksum(payload));
    out.push(0xF7);
    out
}

pub fn load(path: &Path) -> Result<[u8; CART_SIZE], CartridgeError> {
    let data = fs::read(path)?;
    let payload = decode(&data)?;
    let mut out = [0u8; CART_SIZE];
    out.copy_from_slice(payload);
    Ok(out)
}

pub fn save(path: &Path, payload: &[u8; CART_SIZE]) -> Result<(), CartridgeError> {
    fs::write(path, encode(payload))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_payload() -> [u8; CART_SIZE] {
        let mut payload = [0u8; CART_SIZE];
        for (n, b) in payload.iter_mut().enumerate() {
            *b = (n % 128) as u8;
        }
        payload
    }

    #[test]
    fn test_encode_shape() {
        let data = encode(&sample_payload());
        assert_eq!(data.len(), FILE_SIZE);
        assert_eq!(&data[..6], &SYSEX_HEADER);
        assert_eq!(*data.last().unwrap(), 0xF7);
    }

    #[test]
    fn test_roundtrip_identity_and_zero_checksum() {
        let payload = sample_payload();
        let data = encode(&payload);
        let back = decode(&data).unwrap();
        assert_eq!(back, &payload[..]);

        // O checksum recomputado sobre carga+checksum fecha em zero
        let sum: u32 = data[6..6 + CART_SIZE + 1].iter().map(|&b| b as u32).sum();
        assert_eq!(sum & 0x7F, 0);
    }

    #[test]
    fn test_decode_rejects_bad_size() {
        assert!(matches!(
            decode(&[0u8; 100]),
            Err(CartridgeError::BadSize(100))
        ));
    }

    #[test]
    fn test_decode_rejects_bad_header() {
        let mut data = encode(&sample_payload());
        data[0] = 0xF7;
        assert!(matches!(decode(&data), Err(CartridgeError::BadHeader)));
    }

    #[test]
    fn test_decode_rejects_bad_checksum() {
        let mut data = encode(&sample_payload());
        data[100] ^= 0x01;
        assert!(matches!(decode(&data), Err(CartridgeError::BadChecksum(_))));
    }

    #[test]
    fn test_file_roundtrip() {
        let path = std::env::temp_dir().join("hexop_test_cart.syx");
        let payload = sample_payload();
        save(&path, &payload).unwrap();
        let back = load(&path).unwrap();
        assert_eq!(back, payload);
        std::fs::remove_file(&path).ok();
    }
}
