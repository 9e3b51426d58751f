use crate::bytecode::format::{FormatFlags, FormatTable};
use crate::bytecode::opcodes::Opcode;
use crate::bytecode::{read_java_u2, read_java_u4, read_native_u2, read_native_u4, CHECKED};
use crate::runtime::code::CodeBuffer;
use crate::runtime::Method;

/// A position at the start of one instruction in a method's code.
///
/// Cursors are cheap, transient and meant to live on the stack of the thread using
/// them. The bytes they read may be rewritten concurrently; every accessor reads the
/// current bytes, so a rewritten instruction is seen either before or after the
/// rewrite, never a mix (rewrites are length preserving and idempotent).
#[derive(Clone, Copy)]
pub struct InstructionCursor<'m> {
    code: &'m CodeBuffer,
    method: Option<&'m Method>,
    bci: usize,
    formats: &'m FormatTable,
}

impl<'m> InstructionCursor<'m> {
    /// `bci` must be the start of a real instruction.
    pub fn new(method: &'m Method, bci: usize) -> Self {
        InstructionCursor::with_formats(method, bci, FormatTable::global())
    }

    pub fn with_formats(method: &'m Method, bci: usize, formats: &'m FormatTable) -> Self {
        InstructionCursor { code: method.code(), method: Some(method), bci, formats }
    }

    /// A cursor over bare code, with no constant pool behind it.
    pub fn over_code(code: &'m CodeBuffer, bci: usize) -> Self {
        InstructionCursor { code, method: None, bci, formats: FormatTable::global() }
    }

    pub fn bci(&self) -> usize {
        self.bci
    }

    pub fn method(&self) -> Option<&'m Method> {
        self.method
    }

    pub fn code(&self) -> &'m CodeBuffer {
        self.code
    }

    pub fn formats(&self) -> &'m FormatTable {
        self.formats
    }

    #[inline]
    pub fn byte_at(&self, offset: usize) -> u8 {
        self.code.byte_at(self.bci + offset)
    }

    /// The opcode byte exactly as stored, fast forms included.
    pub fn raw_opcode(&self) -> Opcode {
        Opcode(self.code.opcode_byte_at(self.bci))
    }

    /// The opcode with any rewritten form collapsed to its standard code.
    pub fn opcode(&self) -> Opcode {
        self.formats.java_code(self.raw_opcode())
    }

    pub fn is_wide(&self) -> bool {
        self.raw_opcode() == Opcode::WIDE
    }

    /// The opcode following a `wide` prefix.
    pub fn wide_opcode(&self) -> Opcode {
        Opcode(self.code.opcode_byte_at(self.bci + 1))
    }

    pub fn has_wide_index(&self, op: Opcode) -> bool {
        self.formats.has_wide_index(op)
    }

    pub fn can_use_native_byte_order(&self, bc: Opcode, is_wide: bool) -> bool {
        cfg!(target_endian = "big") || self.formats.native_byte_order(bc, is_wide)
    }

    /// Whether the interpreter is guaranteed to rewrite `op` eagerly. Only meaningful
    /// as a post-condition check on opcodes that can be rewritten at all.
    pub fn must_rewrite(&self, op: Opcode) -> bool {
        self.formats.can_rewrite(op) && self.check_must_rewrite(op)
    }

    // callers have already filtered on can_rewrite
    fn check_must_rewrite(&self, op: Opcode) -> bool {
        match op {
            // may wait for a following getfield to rewrite first, so the pair can fuse
            Opcode::ALOAD_0 => false,
            // rewritten at link time, never by the interpreter
            Opcode::LOOKUPSWITCH => false,
            // depends on the state of the resolved class
            Opcode::NEW => false,
            _ => true,
        }
    }

    /// Rounds `offset` (relative to this instruction) up so that the absolute position
    /// is a multiple of 4 from the start of the code array.
    pub fn aligned_offset(&self, offset: usize) -> usize {
        let absolute = self.bci + offset;
        ((absolute + 3) & !3) - self.bci
    }

    pub(crate) fn java_u4_at(&self, offset: usize) -> i32 {
        read_java_u4(self.code, self.bci + offset) as i32
    }

    pub(crate) fn java_u2_at(&self, offset: usize) -> u16 {
        read_java_u2(self.code, self.bci + offset)
    }

    pub fn get_index_u1(&self, bc: Opcode) -> u8 {
        self.assert_same_format_as(bc, false);
        self.assert_index_size(1, bc, false);
        self.byte_at(1)
    }

    pub fn get_index_u2(&self, bc: Opcode, is_wide: bool) -> u16 {
        self.assert_same_format_as(bc, is_wide);
        self.assert_index_size(2, bc, is_wide);
        let at = self.bci + if is_wide { 2 } else { 1 };
        if self.formats.native_byte_order(bc, is_wide) {
            read_native_u2(self.code, at)
        } else {
            read_java_u2(self.code, at)
        }
    }

    /// A rewritten 2-byte cache index, with the cache collaborator's tag added.
    pub fn get_index_u2_cpcache(&self, bc: Opcode, tag: u32) -> u32 {
        self.assert_same_format_as(bc, false);
        self.assert_index_size(2, bc, false);
        self.assert_native_index(bc, false);
        (read_native_u2(self.code, self.bci + 1) as u32).wrapping_add(tag)
    }

    pub fn get_index_u4(&self, bc: Opcode) -> u32 {
        self.assert_same_format_as(bc, false);
        self.assert_index_size(4, bc, false);
        checked_assert!(self.can_use_native_byte_order(bc, false), "u4 index of {} is not native", self.formats.name(bc));
        read_native_u4(self.code, self.bci + 1)
    }

    pub fn get_offset_s2(&self, bc: Opcode) -> i16 {
        self.assert_same_format_as(bc, false);
        self.assert_offset_size(2, bc, false);
        read_java_u2(self.code, self.bci + 1) as i16
    }

    pub fn get_offset_s4(&self, bc: Opcode) -> i32 {
        self.assert_same_format_as(bc, false);
        self.assert_offset_size(4, bc, false);
        read_java_u4(self.code, self.bci + 1) as i32
    }

    pub fn get_constant_u1(&self, offset: usize, bc: Opcode) -> i8 {
        self.assert_same_format_as(bc, false);
        self.assert_constant_size(1, offset, bc, false);
        self.byte_at(offset) as i8
    }

    pub fn get_constant_u2(&self, offset: usize, bc: Opcode, is_wide: bool) -> i16 {
        self.assert_same_format_as(bc, is_wide);
        self.assert_constant_size(2, offset, bc, is_wide);
        read_java_u2(self.code, self.bci + offset) as i16
    }

    /// Absolute target of a branch instruction, `None` for anything else.
    pub fn branch_destination(&self) -> Option<usize> {
        let raw = self.raw_opcode();
        let flags = self.formats.flags(raw, false);
        if !flags.contains(FormatFlags::HAS_O) {
            return None;
        }
        let offset = if flags.contains(FormatFlags::HAS_U4) {
            self.get_offset_s4(raw) as i64
        } else {
            self.get_offset_s2(raw) as i64
        };
        Some((self.bci as i64 + offset) as usize)
    }

    /// Full byte length of the instruction, including a wide prefix or an embedded
    /// jump table.
    pub fn length(&self) -> usize {
        let raw = self.raw_opcode();
        if let Some(n) = self.formats.length(raw, false) {
            return n;
        }
        match self.formats.java_code(raw) {
            Opcode::WIDE => {
                let op = self.wide_opcode();
                match self.formats.length(op, true) {
                    Some(n) => n,
                    None => panic!("{} has no wide form at bci {}", self.formats.name(op), self.bci),
                }
            }
            op @ (Opcode::TABLESWITCH | Opcode::LOOKUPSWITCH) => self.switch_length(op),
            // the original opcode lives in the debugger's table, not in the code
            _ => 1,
        }
    }

    /// Like `length`, but `None` when the instruction does not fit in the code that
    /// is left, or is a `wide` prefix with nothing valid after it. Never reads past
    /// the end of the code.
    pub fn checked_length(&self) -> Option<usize> {
        let size = self.code.len();
        if self.bci >= size {
            return None;
        }
        let raw = self.raw_opcode();
        let len = match self.formats.length(raw, false) {
            Some(n) => n,
            None => match self.formats.java_code(raw) {
                Opcode::WIDE => {
                    if self.bci + 1 >= size || !self.formats.is_defined(self.wide_opcode()) {
                        return None;
                    }
                    self.formats.length(self.wide_opcode(), true)?
                }
                op @ (Opcode::TABLESWITCH | Opcode::LOOKUPSWITCH) => {
                    if self.bci + self.switch_header_end(op) > size {
                        return None;
                    }
                    self.switch_length(op)
                }
                _ => 1,
            },
        };
        (self.bci + len <= size).then_some(len)
    }

    // Offset just past the fixed header of a switch: default and bounds for a
    // table, default and pair count for a lookup.
    fn switch_header_end(&self, java: Opcode) -> usize {
        let base = self.aligned_offset(1);
        if java == Opcode::TABLESWITCH { base + 12 } else { base + 8 }
    }

    fn switch_length(&self, java: Opcode) -> usize {
        let base = self.aligned_offset(1);
        if java == Opcode::TABLESWITCH {
            let lo = self.java_u4_at(base + 4) as i64;
            let hi = self.java_u4_at(base + 8) as i64;
            base + 12 + ((hi - lo + 1).max(0) as usize) * 4
        } else {
            let npairs = self.java_u4_at(base + 4).max(0) as usize;
            base + 8 + npairs * 8
        }
    }

    // Consistency checks between what a caller asserts about an instruction and what
    // the format table says about the bytes actually at the cursor. Active in checked
    // builds only; a mismatch means the caller and the format table have drifted.

    /// The concrete opcode at the cursor must share the field layout of `testbc`.
    pub fn assert_same_format_as(&self, testbc: Opcode, is_wide: bool) {
        if !CHECKED {
            return;
        }
        let mut thisbc = self.raw_opcode();
        if thisbc == Opcode::BREAKPOINT {
            return;
        }
        if is_wide {
            assert!(thisbc == Opcode::WIDE, "expected a wide instruction at bci {}", self.bci);
            thisbc = self.wide_opcode();
            if thisbc == Opcode::BREAKPOINT {
                return;
            }
        }
        let testflags = self.formats.flags(testbc, is_wide) & FormatFlags::ALL_FMT_BITS;
        let thisflags = self.formats.flags(thisbc, is_wide) & FormatFlags::ALL_FMT_BITS;
        assert!(
            thisflags == testflags,
            "expected format of {}{} at bci {}, found {}: {:?} != {:?}",
            self.formats.name(testbc),
            if is_wide { "/wide" } else { "" },
            self.bci,
            self.formats.name(thisbc),
            testflags,
            thisflags
        );
    }

    pub fn assert_index_size(&self, size: usize, bc: Opcode, is_wide: bool) {
        if !CHECKED {
            return;
        }
        // HAS_O is included: a branch offset is not an index
        let have = self.formats.flags(bc, is_wide)
            & (FormatFlags::HAS_U2 | FormatFlags::HAS_U4 | FormatFlags::NOT_SIMPLE | FormatFlags::HAS_O);
        let mut need = match size {
            1 => FormatFlags::empty(),
            2 => FormatFlags::HAS_U2,
            4 => FormatFlags::HAS_U4,
            _ => panic!("bad index size {}", size),
        };
        if is_wide {
            need |= FormatFlags::NOT_SIMPLE;
        }
        assert!(
            have == need,
            "index size {} does not fit {}{}: {:?} != {:?}",
            size,
            self.formats.name(bc),
            if is_wide { "/wide" } else { "" },
            have,
            need
        );
    }

    pub fn assert_offset_size(&self, size: usize, bc: Opcode, is_wide: bool) {
        if !CHECKED {
            return;
        }
        let have = self.formats.flags(bc, is_wide) & FormatFlags::ALL_FMT_BITS;
        let mut need = match size {
            2 => FormatFlags::FMT_BO2,
            4 => FormatFlags::FMT_BO4,
            _ => panic!("bad offset size {}", size),
        };
        if is_wide {
            need |= FormatFlags::NOT_SIMPLE;
        }
        assert!(
            have == need,
            "offset size {} does not fit {}{}: {:?} != {:?}",
            size,
            self.formats.name(bc),
            if is_wide { "/wide" } else { "" },
            have,
            need
        );
    }

    /// A signed constant of `size` bytes at `offset` must be the last field of `bc`.
    pub fn assert_constant_size(&self, size: usize, offset: usize, bc: Opcode, is_wide: bool) {
        if !CHECKED {
            return;
        }
        // ignore any local index field (iinc)
        let have = self.formats.flags(bc, is_wide) & (FormatFlags::ALL_FMT_BITS - FormatFlags::HAS_I);
        let mut need = match size {
            1 => FormatFlags::FMT_BC,
            2 => FormatFlags::FMT_BC | FormatFlags::HAS_U2,
            _ => panic!("bad constant size {}", size),
        };
        if is_wide {
            need |= FormatFlags::NOT_SIMPLE;
        }
        let length = self.formats.length(bc, is_wide);
        assert!(
            have == need,
            "constant size {} @{} does not fit {}{}: {:?} != {:?}",
            size,
            offset,
            self.formats.name(bc),
            if is_wide { "/wide" } else { "" },
            have,
            need
        );
        assert!(length == Some(offset + size), "constant at @{} overruns {}", offset, self.formats.name(bc));
    }

    pub fn assert_native_index(&self, bc: Opcode, is_wide: bool) {
        if !CHECKED {
            return;
        }
        assert!(
            self.formats.native_byte_order(bc, is_wide),
            "{} has no native index",
            self.formats.name(bc)
        );
    }
}

/// The capability every specialised view shares: decoding the instruction its cursor
/// is positioned at.
pub trait InstructionView<'m> {
    fn cursor(&self) -> &InstructionCursor<'m>;

    /// Whether the opcode belongs to the family this view decodes.
    fn is_valid(&self) -> bool;

    /// Checked-build assertions on the instruction; a no-op otherwise.
    fn verify(&self);

    fn bci(&self) -> usize {
        self.cursor().bci()
    }

    fn opcode(&self) -> Opcode {
        self.cursor().opcode()
    }

    fn raw_opcode(&self) -> Opcode {
        self.cursor().raw_opcode()
    }
}
