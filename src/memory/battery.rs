// src/memory/battery.rs

//! A RAM mantida por bateria: 6 KiB crus que sobrevivem ao desligamento
//! através de um arquivo de retaguarda.

use std::fs;
use std::path::Path;

use thiserror::Error;

pub const BATTERY_SIZE: usize = 6144;

#[derive(Debug, Error)]
pub enum BatteryError {
    #[error("tamanho de RAM inválido: {0} != {BATTERY_SIZE}")]
    BadSize(usize),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub fn load_battery_ram(path: &Path) -> Result<Vec<u8>, BatteryError> {
    let data = fs::read(path)?;
    if data.len() != BATTERY_SIZE {
        return Err(BatteryError::BadSize(data.len()));
    }
    Ok(data)
}

pub fn save_battery_ram(path: &Path, data: &[u8]) -> Result<(), BatteryError> {
    if data.len() != BATTERY_SIZE {
        return Err(BatteryError::BadSize(data.len()));
    }
    fs::write(path, data)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_identity() {
        let path = std::env::temp_dir().join("hexop_test_battery.ram");
        let data: Vec<u8> = (0..BATTERY_SIZE).map(|n| (n % 251) as u8).collect();
        save_battery_ram(&path, &data).unwrap();
        let back = load_battery_ram(&path).unwrap();
        assert_eq!(back, data);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_rejects_bad_size() {
        let path = std::env::temp_dir().join("hexop_test_battery_bad.ram");
        fs::write(&path, [0u8; 10]).unwrap();
        assert!(matches!(
            load_battery_ram(&path),
            Err(BatteryError::BadSize(10))
        ));
        std::fs::remove_file(&path).ok();
        assert!(save_battery_ram(&path, &[0u8; 3]).is_err());
    }
}
