//! Jump table instructions. After the opcode, padding brings the table to a 4-byte
//! boundary counted from the start of the method's code; every field after it is a
//! signed big-endian u4. Branch offsets are relative to the switch instruction.

use crate::bytecode::cursor::{InstructionCursor, InstructionView};
use crate::bytecode::format::OpcodeFamily;

/// `tableswitch`: default, low, high, then one offset per key in `low..=high`.
pub struct TableSwitchView<'m> {
    cursor: InstructionCursor<'m>,
}

impl<'m> TableSwitchView<'m> {
    pub fn new(cursor: InstructionCursor<'m>) -> Self {
        let view = TableSwitchView { cursor };
        view.verify();
        view
    }

    fn field(&self, n: usize) -> i32 {
        self.cursor.java_u4_at(self.cursor.aligned_offset(1) + n * 4)
    }

    pub fn default_offset(&self) -> i32 {
        self.field(0)
    }

    pub fn low_key(&self) -> i32 {
        self.field(1)
    }

    pub fn high_key(&self) -> i32 {
        self.field(2)
    }

    /// Number of entries in the table.
    pub fn length(&self) -> usize {
        (self.high_key() as i64 - self.low_key() as i64 + 1).max(0) as usize
    }

    pub fn dest_offset_at(&self, i: usize) -> i32 {
        self.field(3 + i)
    }

    /// Branch offset taken for `key`.
    pub fn dest_offset_for(&self, key: i32) -> i32 {
        let (lo, hi) = (self.low_key(), self.high_key());
        if key < lo || key > hi {
            return self.default_offset();
        }
        self.dest_offset_at((key as i64 - lo as i64) as usize)
    }
}

impl<'m> InstructionView<'m> for TableSwitchView<'m> {
    fn cursor(&self) -> &InstructionCursor<'m> {
        &self.cursor
    }

    fn is_valid(&self) -> bool {
        self.cursor.formats().family(self.raw_opcode()) == OpcodeFamily::TableSwitch
    }

    fn verify(&self) {
        checked_assert!(self.is_valid(), "not a tableswitch at bci {}", self.bci());
        checked_assert!(
            self.high_key() >= self.low_key(),
            "incorrect hi/low values in tableswitch at bci {}: {} < {}",
            self.bci(),
            self.high_key(),
            self.low_key()
        );
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupSwitchPair {
    pub match_key: i32,
    pub offset: i32,
}

/// `lookupswitch` and its linear/binary fast forms: default, pair count, then the
/// (key, offset) pairs in ascending key order.
///
/// Only positional access is offered; searching is up to the interpreter.
pub struct LookupSwitchView<'m> {
    cursor: InstructionCursor<'m>,
}

impl<'m> LookupSwitchView<'m> {
    pub fn new(cursor: InstructionCursor<'m>) -> Self {
        let view = LookupSwitchView { cursor };
        view.verify();
        view
    }

    fn field(&self, n: usize) -> i32 {
        self.cursor.java_u4_at(self.cursor.aligned_offset(1) + n * 4)
    }

    pub fn default_offset(&self) -> i32 {
        self.field(0)
    }

    pub fn number_of_pairs(&self) -> usize {
        self.field(1).max(0) as usize
    }

    pub fn pair_at(&self, i: usize) -> LookupSwitchPair {
        checked_assert!(i < self.number_of_pairs(), "pair index {} out of bounds", i);
        LookupSwitchPair {
            match_key: self.field(2 + i * 2),
            offset: self.field(3 + i * 2),
        }
    }

    pub fn pairs(&self) -> impl Iterator<Item = LookupSwitchPair> + '_ {
        (0..self.number_of_pairs()).map(move |i| self.pair_at(i))
    }
}

impl<'m> InstructionView<'m> for LookupSwitchView<'m> {
    fn cursor(&self) -> &InstructionCursor<'m> {
        &self.cursor
    }

    fn is_valid(&self) -> bool {
        self.cursor.formats().family(self.raw_opcode()) == OpcodeFamily::LookupSwitch
    }

    fn verify(&self) {
        checked_assert!(self.is_valid(), "not a lookupswitch at bci {}", self.bci());
        if !crate::bytecode::CHECKED {
            return;
        }
        let n = self.number_of_pairs();
        for i in 1..n {
            let (prev, next) = (self.pair_at(i - 1), self.pair_at(i));
            assert!(
                prev.match_key < next.match_key,
                "lookupswitch keys out of order at bci {}: {} then {}",
                self.bci(),
                prev.match_key,
                next.match_key
            );
        }
    }
}
