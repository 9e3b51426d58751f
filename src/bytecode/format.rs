use bitflags::bitflags;
use once_cell::sync::Lazy;
use rangemap::RangeInclusiveMap;
use crate::bytecode::error::BytecodeError;
use crate::bytecode::opcodes::{Opcode, OpcodeDef, OPCODE_DEFS};
use crate::types::BasicType;

// Field layout properties of an (opcode, wide) pair. The low two bits describe
// behaviour, everything from HAS_C upwards is determined by the format string alone.
bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FormatFlags: u16 {
        /// Execution can trap or block.
        const CAN_TRAP = 1 << 0;
        /// The opcode has an alternate, rewritten form.
        const CAN_REWRITE = 1 << 1;
        /// Signed constant operand, e.g. sipush "bcc".
        const HAS_C = 1 << 2;
        /// Resolution cache index, e.g. getfield "bJJ".
        const HAS_J = 1 << 3;
        /// Constant pool index, e.g. ldc "bk".
        const HAS_K = 1 << 4;
        /// Local variable index, e.g. iload "bi".
        const HAS_I = 1 << 5;
        /// Branch offset, e.g. ifeq "boo".
        const HAS_O = 1 << 6;
        /// Contains native-order field(s).
        const HAS_NBO = 1 << 7;
        const HAS_U2 = 1 << 8;
        const HAS_U4 = 1 << 9;
        /// Fixed length, either simple or wide.
        const NOT_VARIABLE = 1 << 10;
        /// Either wide or variable length.
        const NOT_SIMPLE = 1 << 11;

        const ALL_FMT_BITS = Self::HAS_C.bits() | Self::HAS_J.bits() | Self::HAS_K.bits()
            | Self::HAS_I.bits() | Self::HAS_O.bits() | Self::HAS_NBO.bits()
            | Self::HAS_U2.bits() | Self::HAS_U4.bits() | Self::NOT_VARIABLE.bits()
            | Self::NOT_SIMPLE.bits();

        // Derived syndromes, handy for checking layouts.
        const FMT_B = Self::NOT_VARIABLE.bits();
        const FMT_BC = Self::FMT_B.bits() | Self::HAS_C.bits();
        const FMT_BI = Self::FMT_B.bits() | Self::HAS_I.bits();
        const FMT_BKK = Self::FMT_B.bits() | Self::HAS_K.bits() | Self::HAS_U2.bits();
        const FMT_BJJ = Self::FMT_B.bits() | Self::HAS_J.bits() | Self::HAS_U2.bits() | Self::HAS_NBO.bits();
        const FMT_BO2 = Self::FMT_B.bits() | Self::HAS_O.bits() | Self::HAS_U2.bits();
        const FMT_BO4 = Self::FMT_B.bits() | Self::HAS_O.bits() | Self::HAS_U4.bits();
    }
}

/// Coarse grouping of java codes by the view that decodes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpcodeFamily {
    LoadConstant,
    FieldAccess,
    Invoke,
    DynamicInvoke,
    TypeReference,
    TableSwitch,
    LookupSwitch,
    Branch,
    Other,
}

/// Derives the layout flags of a format string.
///
/// A run of the same field letter makes a 2 or 4 byte field; any other run length is an
/// error, as is mixing java and native byte order or mixing field sizes (only the last
/// field may be shorter than the ones before it).
pub fn compute_flags(format: &str, more_flags: FormatFlags) -> Result<FormatFlags, BytecodeError> {
    let mut flags = more_flags;
    let bytes = format.as_bytes();
    let mut fp = 0;
    match bytes.first() {
        None => {
            // variable length, so never simple
            return Ok(flags | FormatFlags::NOT_SIMPLE);
        }
        Some(b'b') => {
            flags |= FormatFlags::NOT_VARIABLE;
            fp += 1;
        }
        Some(b'w') => {
            flags |= FormatFlags::NOT_VARIABLE | FormatFlags::NOT_SIMPLE;
            if bytes.get(1) != Some(&b'b') {
                fail!("wide format must start with 'wb': {}", format);
            }
            fp += 2;
        }
        Some(_) => fail!("format must start with 'b' or 'w': {}", format),
    }

    let (mut has_nbo, mut has_jbo, mut has_size) = (false, false, 0usize);
    while fp < bytes.len() {
        let fc = bytes[fp];
        fp += 1;
        let this_flag = match fc {
            b'_' => continue,
            b'j' | b'J' => FormatFlags::HAS_J,
            b'k' | b'K' => FormatFlags::HAS_K,
            b'i' | b'I' => FormatFlags::HAS_I,
            b'c' | b'C' => FormatFlags::HAS_C,
            b'o' | b'O' => FormatFlags::HAS_O,
            _ => fail!("bad char '{}' in format {}", fc as char, format),
        };
        if fc.is_ascii_uppercase() {
            has_nbo = true;
        } else {
            has_jbo = true;
        }
        if has_jbo && has_nbo {
            fail!("mixed byte orders in format {}", format);
        }
        flags |= this_flag;
        if has_nbo {
            flags |= FormatFlags::HAS_NBO;
        }

        let mut this_size = 1;
        while fp < bytes.len() && bytes[fp] == fc {
            this_size += 1;
            fp += 1;
        }
        match this_size {
            1 => {}
            2 => flags |= FormatFlags::HAS_U2,
            4 => flags |= FormatFlags::HAS_U4,
            _ => fail!("bad repeat count {} in format {}", this_size, format),
        }
        let last = fp == bytes.len();
        if !(has_size == 0 || this_size == has_size || (this_size < has_size && last)) {
            fail!("mixed field sizes in format {}", format);
        }
        has_size = this_size;
    }
    Ok(flags)
}

#[derive(Debug, Clone)]
struct FormatEntry {
    name: &'static str,
    flags: FormatFlags,
    wide_flags: FormatFlags,
    length: Option<usize>,
    wide_length: Option<usize>,
    result_type: BasicType,
    java_code: Opcode,
}

/// Immutable per-opcode metadata: lengths, layout flags, canonical codes.
///
/// Build one explicitly with [`FormatTable::new`] or share the process-wide instance
/// from [`FormatTable::global`]; either way it is never mutated after construction.
pub struct FormatTable {
    entries: Vec<Option<FormatEntry>>,
    families: RangeInclusiveMap<u8, OpcodeFamily>,
}

static FORMATS: Lazy<FormatTable> = Lazy::new(FormatTable::new);

impl FormatTable {
    /// Builds the table from the built-in opcode definitions.
    pub fn new() -> Self {
        FormatTable::from_defs(OPCODE_DEFS)
            .unwrap_or_else(|e| panic!("built-in opcode table is inconsistent: {}", e))
    }

    pub fn global() -> &'static FormatTable {
        &FORMATS
    }

    pub fn from_defs(defs: &[OpcodeDef]) -> Result<Self, BytecodeError> {
        let mut entries: Vec<Option<FormatEntry>> = vec![None; 256];
        for def in defs {
            let mut more = FormatFlags::empty();
            if def.can_trap {
                more |= FormatFlags::CAN_TRAP;
            }
            if def.can_rewrite {
                more |= FormatFlags::CAN_REWRITE;
            }
            let flags = compute_flags(def.format, more)
                .map_err(|e| err!(e, "opcode {}", def.name))?;
            let wide_flags = match def.wide_format {
                Some(w) => compute_flags(w, more).map_err(|e| err!(e, "wide opcode {}", def.name))?,
                None => FormatFlags::empty(),
            };
            let slot = &mut entries[def.code.byte() as usize];
            if slot.is_some() {
                fail!("opcode 0x{:02x} defined twice", def.code.byte());
            }
            *slot = Some(FormatEntry {
                name: def.name,
                flags,
                wide_flags,
                length: (!def.format.is_empty()).then_some(def.format.len()),
                wide_length: def.wide_format.map(str::len),
                result_type: def.result_type,
                java_code: def.java_code,
            });
        }

        let mut families = RangeInclusiveMap::new();
        families.insert(0x12..=0x14, OpcodeFamily::LoadConstant);
        families.insert(0x99..=0xa8, OpcodeFamily::Branch);
        families.insert(0xaa..=0xaa, OpcodeFamily::TableSwitch);
        families.insert(0xab..=0xab, OpcodeFamily::LookupSwitch);
        families.insert(0xb2..=0xb5, OpcodeFamily::FieldAccess);
        families.insert(0xb6..=0xb9, OpcodeFamily::Invoke);
        families.insert(0xba..=0xba, OpcodeFamily::DynamicInvoke);
        families.insert(0xbb..=0xbb, OpcodeFamily::TypeReference);
        families.insert(0xbd..=0xbd, OpcodeFamily::TypeReference);
        families.insert(0xc0..=0xc1, OpcodeFamily::TypeReference);
        families.insert(0xc5..=0xc5, OpcodeFamily::TypeReference);
        families.insert(0xc6..=0xc9, OpcodeFamily::Branch);

        Ok(FormatTable { entries, families })
    }

    #[track_caller]
    fn entry(&self, op: Opcode) -> &FormatEntry {
        match &self.entries[op.byte() as usize] {
            Some(e) => e,
            None => panic!("invalid opcode 0x{:02x}", op.byte()),
        }
    }

    pub fn is_defined(&self, op: Opcode) -> bool {
        self.entries[op.byte() as usize].is_some()
    }

    pub fn name(&self, op: Opcode) -> &'static str {
        self.entry(op).name
    }

    /// Byte length of the instruction, including any wide prefix. `None` when the
    /// opcode has no fixed length or, for `wide`, no wide form at all.
    pub fn length(&self, op: Opcode, wide: bool) -> Option<usize> {
        let e = self.entry(op);
        if wide { e.wide_length } else { e.length }
    }

    pub fn flags(&self, op: Opcode, wide: bool) -> FormatFlags {
        let e = self.entry(op);
        if wide { e.wide_flags } else { e.flags }
    }

    pub fn has_all_flags(&self, op: Opcode, test: FormatFlags, wide: bool) -> bool {
        self.flags(op, wide).contains(test)
    }

    pub fn can_rewrite(&self, op: Opcode) -> bool {
        self.has_all_flags(op, FormatFlags::CAN_REWRITE, false)
    }

    pub fn can_trap(&self, op: Opcode) -> bool {
        self.has_all_flags(op, FormatFlags::CAN_TRAP, false)
    }

    pub fn native_byte_order(&self, op: Opcode, wide: bool) -> bool {
        self.has_all_flags(op, FormatFlags::HAS_NBO, wide)
    }

    /// Collapses a rewritten form back to the standard code it stands for.
    pub fn java_code(&self, op: Opcode) -> Opcode {
        self.entry(op).java_code
    }

    pub fn result_type(&self, op: Opcode) -> BasicType {
        self.entry(op).result_type
    }

    /// Family of the canonical form of `op`.
    pub fn family(&self, op: Opcode) -> OpcodeFamily {
        let java = self.java_code(op);
        self.families.get(&java.byte()).copied().unwrap_or(OpcodeFamily::Other)
    }

    /// True only for reference forms carrying a 4-byte native cache index.
    pub fn has_wide_index(&self, op: Opcode) -> bool {
        self.has_all_flags(op, FormatFlags::HAS_J | FormatFlags::HAS_U4 | FormatFlags::HAS_NBO, false)
    }

    /// Defined opcodes in ascending order.
    pub fn opcodes(&self) -> impl Iterator<Item = Opcode> + '_ {
        (0..=u8::MAX).map(Opcode).filter(move |op| self.is_defined(*op))
    }
}

impl Default for FormatTable {
    fn default() -> Self {
        FormatTable::new()
    }
}
