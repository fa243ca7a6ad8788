//! Serializable machine state, used for post-run dumps.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::constants::REGISTER_COUNT;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineSnapshot {
    pub pc: u8,
    #[serde(default)]
    pub fl: u8,
    pub registers: [u8; REGISTER_COUNT],
    #[serde(default)]
    pub halted: bool,
    #[serde(default)]
    pub cycles: u64,
    #[serde(default)]
    pub memory: Vec<u8>,
}

impl MachineSnapshot {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Ls8Error;

    #[test]
    fn json_round_trip() {
        let snap = MachineSnapshot {
            pc: 0x12,
            fl: 0b001,
            registers: [1, 2, 3, 4, 5, 6, 7, 0xF4],
            halted: true,
            cycles: 99,
            memory: vec![0x82, 0, 8, 0x01],
        };
        let text = snap.to_json().unwrap();
        assert_eq!(MachineSnapshot::from_json(&text).unwrap(), snap);
    }

    #[test]
    fn optional_fields_default() {
        let snap =
            MachineSnapshot::from_json(r#"{"pc": 3, "registers": [0,0,0,0,0,0,0,244]}"#).unwrap();
        assert_eq!(snap.pc, 3);
        assert_eq!(snap.fl, 0);
        assert!(!snap.halted);
        assert!(snap.memory.is_empty());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            MachineSnapshot::from_json("{\"pc\": 300}"),
            Err(Ls8Error::Serde(_))
        ));
    }

    #[test]
    fn save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let snap = MachineSnapshot {
            pc: 1,
            fl: 0,
            registers: [0; REGISTER_COUNT],
            halted: false,
            cycles: 0,
            memory: Vec::new(),
        };
        snap.save(&path).unwrap();
        assert_eq!(MachineSnapshot::load(&path).unwrap(), snap);
    }
}
