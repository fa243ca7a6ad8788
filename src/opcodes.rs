//! Canonical LS-8 opcode table.
//!
//! Opcodes are matched by exact byte value; the operand count is a column of
//! the table rather than something read out of the opcode's bit layout.

use crate::alu::AluOp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instruction {
    Hlt,
    Ldi,
    Prn,
    Alu(AluOp),
    Push,
    Pop,
    Call,
    Ret,
    Jmp,
    Jeq,
    Jne,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpcodeEntry {
    pub opcode: u8,
    pub mnemonic: &'static str,
    pub operands: u8,
    pub instruction: Instruction,
}

impl OpcodeEntry {
    /// Encoded length in bytes.
    pub fn length(&self) -> u8 {
        1 + self.operands
    }

    /// True when the instruction sets PC itself instead of falling through.
    pub fn sets_pc(&self) -> bool {
        matches!(
            self.instruction,
            Instruction::Call
                | Instruction::Ret
                | Instruction::Jmp
                | Instruction::Jeq
                | Instruction::Jne
        )
    }
}

const fn entry(
    opcode: u8,
    mnemonic: &'static str,
    operands: u8,
    instruction: Instruction,
) -> OpcodeEntry {
    OpcodeEntry {
        opcode,
        mnemonic,
        operands,
        instruction,
    }
}

pub static OPCODES: &[OpcodeEntry] = &[
    entry(0b0000_0001, "HLT", 0, Instruction::Hlt),
    entry(0b1000_0010, "LDI", 2, Instruction::Ldi),
    entry(0b0100_0111, "PRN", 1, Instruction::Prn),
    entry(0b1010_0010, "MUL", 2, Instruction::Alu(AluOp::Mul)),
    entry(0b1010_0000, "ADD", 2, Instruction::Alu(AluOp::Add)),
    entry(0b0100_0101, "PUSH", 1, Instruction::Push),
    entry(0b0100_0110, "POP", 1, Instruction::Pop),
    entry(0b0101_0000, "CALL", 1, Instruction::Call),
    entry(0b0001_0001, "RET", 0, Instruction::Ret),
    entry(0b1010_0111, "CMP", 2, Instruction::Alu(AluOp::Cmp)),
    entry(0b0101_0100, "JMP", 1, Instruction::Jmp),
    entry(0b0101_0101, "JEQ", 1, Instruction::Jeq),
    entry(0b0101_0110, "JNE", 1, Instruction::Jne),
];

pub fn lookup(opcode: u8) -> Option<&'static OpcodeEntry> {
    OPCODES.iter().find(|entry| entry.opcode == opcode)
}

/// Dense opcode -> entry index, built once per machine.
#[derive(Clone)]
pub struct DecodeTable {
    slots: [Option<&'static OpcodeEntry>; 256],
}

impl Default for DecodeTable {
    fn default() -> Self {
        Self::new()
    }
}

impl DecodeTable {
    pub fn new() -> Self {
        let mut slots = [None; 256];
        for entry in OPCODES {
            slots[entry.opcode as usize] = Some(entry);
        }
        Self { slots }
    }

    pub fn decode(&self, opcode: u8) -> Option<&'static OpcodeEntry> {
        self.slots[opcode as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn table_has_no_duplicates() {
        let mut bytes = HashSet::new();
        let mut names = HashSet::new();
        for entry in OPCODES {
            assert!(
                bytes.insert(entry.opcode),
                "duplicate opcode 0b{:08b}",
                entry.opcode
            );
            assert!(names.insert(entry.mnemonic), "duplicate {}", entry.mnemonic);
        }
        assert_eq!(OPCODES.len(), 13);
    }

    #[test]
    fn decode_table_matches_linear_lookup() {
        let table = DecodeTable::new();
        for byte in 0..=255u8 {
            assert_eq!(table.decode(byte), lookup(byte), "opcode 0x{byte:02X}");
        }
    }

    #[test]
    fn lengths_and_branching() {
        let by_name = |name: &str| OPCODES.iter().find(|e| e.mnemonic == name);
        let ldi = by_name("LDI").expect("LDI present");
        assert_eq!(ldi.opcode, 0b1000_0010);
        assert_eq!(ldi.length(), 3);
        assert!(!ldi.sets_pc());

        let hlt = lookup(0b0000_0001).expect("HLT present");
        assert_eq!(hlt.length(), 1);

        for name in ["CALL", "RET", "JMP", "JEQ", "JNE"] {
            assert!(by_name(name).unwrap().sets_pc(), "{name}");
        }
        assert!(lookup(0x00).is_none());
        assert!(lookup(0xFF).is_none());
    }
}
