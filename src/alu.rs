use std::fmt;
use std::str::FromStr;

use crate::flags::Flags;
use crate::state::CpuState;
use crate::{Ls8Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AluOp {
    Add,
    Sub,
    Mul,
    Cmp,
}

impl fmt::Display for AluOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AluOp::Add => write!(f, "ADD"),
            AluOp::Sub => write!(f, "SUB"),
            AluOp::Mul => write!(f, "MUL"),
            AluOp::Cmp => write!(f, "CMP"),
        }
    }
}

impl FromStr for AluOp {
    type Err = Ls8Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "ADD" => Ok(AluOp::Add),
            "SUB" => Ok(AluOp::Sub),
            "MUL" => Ok(AluOp::Mul),
            "CMP" => Ok(AluOp::Cmp),
            _ => Err(Ls8Error::UnsupportedOperation(s.to_string())),
        }
    }
}

/// Apply `op` to registers `reg_a` and `reg_b`.
///
/// Arithmetic results land in `reg_a` and wrap at 8 bits. `Cmp` only touches FL.
pub fn apply(state: &mut CpuState, op: AluOp, reg_a: u8, reg_b: u8) -> Result<()> {
    let a = state.get_reg(reg_a)?;
    let b = state.get_reg(reg_b)?;
    match op {
        AluOp::Add => state.set_reg(reg_a, a.wrapping_add(b)),
        AluOp::Sub => state.set_reg(reg_a, a.wrapping_sub(b)),
        AluOp::Mul => state.set_reg(reg_a, a.wrapping_mul(b)),
        AluOp::Cmp => {
            state.set_flags(Flags::from_ordering(a.cmp(&b)));
            Ok(())
        }
    }
}
