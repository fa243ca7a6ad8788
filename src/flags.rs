//! FL register layout: `00000LGE`.

use bitflags::bitflags;
use std::cmp::Ordering;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Flags: u8 {
        const EQUAL = 0b0000_0001;
        const GREATER = 0b0000_0010;
        const LESS = 0b0000_0100;
    }
}

impl Flags {
    /// Flag pattern for the outcome of comparing `a` against `b`.
    pub fn from_ordering(ord: Ordering) -> Self {
        match ord {
            Ordering::Less => Flags::LESS,
            Ordering::Greater => Flags::GREATER,
            Ordering::Equal => Flags::EQUAL,
        }
    }
}
