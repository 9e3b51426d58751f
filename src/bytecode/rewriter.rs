//! Link-time rewriting and run-time quickening of a method's code.
//!
//! `rewrite` runs once, on exclusively owned code, before the method is shared:
//! member references switch from pool indices to resolution cache indices and a few
//! opcodes move to their fast forms. `quicken` runs on shared code while other threads
//! execute it; it publishes the resolved cache entry first and only then stores the
//! fast opcode byte, so a reader that sees the new byte also sees the entry.

use log::{debug, trace, warn};
use serde::Serialize;
use std::collections::HashMap;
use crate::bytecode::cursor::InstructionCursor;
use crate::bytecode::error::{BytecodeError, ErrorKind};
use crate::bytecode::format::{FormatTable, OpcodeFamily};
use crate::bytecode::member_ref::MemberRefView;
use crate::bytecode::opcodes::Opcode;
use crate::bytecode::{read_java_u2, write_native_u2, write_native_u4};
use crate::runtime::code::CodeBuffer;
use crate::runtime::memory::InMemoryCache;
use crate::runtime::{ConstantPool, LinkResolver, Method, ThreadContext};
use crate::types::{BasicType, ConstantTag};

/// Lookup switches with fewer pairs than this are searched linearly.
pub const LINEAR_SWITCH_THRESHOLD: usize = 5;

/// Hands out resolution cache indices while code is rewritten.
///
/// Field and method references share one entry per pool index; every dynamic call
/// site gets an entry of its own.
#[derive(Debug, Default, Clone)]
pub struct CacheIndexAllocator {
    pool_indices: Vec<u16>,
    shared: HashMap<u16, u32>,
}

impl CacheIndexAllocator {
    pub fn new() -> Self {
        CacheIndexAllocator::default()
    }

    fn push(&mut self, pool_index: u16) -> u32 {
        let ix = self.pool_indices.len() as u32;
        self.pool_indices.push(pool_index);
        ix
    }

    pub fn shared_entry(&mut self, pool_index: u16) -> u32 {
        if let Some(&ix) = self.shared.get(&pool_index) {
            return ix;
        }
        let ix = self.push(pool_index);
        self.shared.insert(pool_index, ix);
        ix
    }

    pub fn call_site_entry(&mut self, pool_index: u16) -> u32 {
        self.push(pool_index)
    }

    pub fn len(&self) -> usize {
        self.pool_indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pool_indices.is_empty()
    }

    /// Pool index of each allocated entry, in cache index order.
    pub fn into_pool_indices(self) -> Vec<u16> {
        self.pool_indices
    }

    pub fn into_cache(self, index_tag: u32) -> InMemoryCache {
        InMemoryCache::new(self.into_pool_indices(), index_tag)
    }
}

/// Counts of what a `rewrite` pass changed.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct RewriteSummary {
    pub member_refs: usize,
    pub call_sites: usize,
    pub constants: usize,
    pub switches: usize,
}

fn expect_tag(pool: &dyn ConstantPool, index: u16, bci: usize, accept: &[ConstantTag]) -> Result<ConstantTag, BytecodeError> {
    let tag = pool.tag_at(index).map_err(|e| err!(e, "bci {}", bci))?;
    if !accept.contains(&tag) {
        fail!(ErrorKind::Lookup, ("unexpected {:?} at pool index {} for bci {}", tag, index, bci));
    }
    Ok(tag)
}

fn narrow_cache_index(ix: u32, bci: usize) -> Result<u16, BytecodeError> {
    match u16::try_from(ix) {
        Ok(v) => Ok(v),
        Err(_) => fail!(ErrorKind::Lookup, ("cache index {} too large for bci {}", ix, bci)),
    }
}

/// Rewrites unlinked code in place. Every rewrite keeps the instruction length.
///
/// All or nothing: on error neither `code` nor `allocator` has changed, so the same
/// code can be linked again against a corrected pool.
pub fn rewrite(code: &mut CodeBuffer, pool: &dyn ConstantPool, allocator: &mut CacheIndexAllocator) -> Result<RewriteSummary, BytecodeError> {
    let mut staged_code = CodeBuffer::new(&code.to_vec());
    let mut staged = allocator.clone();
    let summary = rewrite_sites(&mut staged_code, pool, &mut staged)?;
    *code = staged_code;
    *allocator = staged;
    Ok(summary)
}

fn rewrite_sites(code: &mut CodeBuffer, pool: &dyn ConstantPool, allocator: &mut CacheIndexAllocator) -> Result<RewriteSummary, BytecodeError> {
    let formats = FormatTable::global();
    let mut summary = RewriteSummary::default();
    let mut bci = 0;
    while bci < code.len() {
        let (raw, len) = {
            let cursor = InstructionCursor::over_code(code, bci);
            match cursor.checked_length() {
                Some(len) => (cursor.raw_opcode(), len),
                None => fail!(ErrorKind::Lookup, ("instruction at bci {} runs past the end of the code", bci)),
            }
        };
        match formats.family(raw) {
            _ if raw.is_fast() => {}
            OpcodeFamily::FieldAccess => {
                let index = read_java_u2(code, bci + 1);
                expect_tag(pool, index, bci, &[ConstantTag::FieldRef])?;
                let ix = narrow_cache_index(allocator.shared_entry(index), bci)?;
                write_native_u2(code, bci + 1, ix);
                summary.member_refs += 1;
            }
            OpcodeFamily::Invoke => {
                let index = read_java_u2(code, bci + 1);
                expect_tag(pool, index, bci, &[ConstantTag::MethodRef, ConstantTag::InterfaceMethodRef])?;
                let ix = narrow_cache_index(allocator.shared_entry(index), bci)?;
                write_native_u2(code, bci + 1, ix);
                summary.member_refs += 1;
            }
            OpcodeFamily::DynamicInvoke => {
                let index = read_java_u2(code, bci + 1);
                expect_tag(pool, index, bci, &[ConstantTag::InvokeDynamic])?;
                let ix = allocator.call_site_entry(index);
                write_native_u4(code, bci + 1, ix);
                summary.call_sites += 1;
            }
            OpcodeFamily::LoadConstant if raw == Opcode::LDC => {
                let index = code.byte_at(bci + 1) as u16;
                if pool.tag_at(index)?.is_executable_reference() {
                    let ix = allocator.shared_entry(index);
                    match u8::try_from(ix) {
                        Ok(v) => {
                            code.set_byte(bci + 1, v);
                            code.set_byte(bci, Opcode::FAST_ALDC.byte());
                            summary.constants += 1;
                        }
                        Err(_) => warn!("ldc at bci {}: cache index {} does not fit one byte, left unrewritten", bci, ix),
                    }
                }
            }
            OpcodeFamily::LoadConstant if raw == Opcode::LDC_W => {
                let index = read_java_u2(code, bci + 1);
                if pool.tag_at(index)?.is_executable_reference() {
                    let ix = narrow_cache_index(allocator.shared_entry(index), bci)?;
                    write_native_u2(code, bci + 1, ix);
                    code.set_byte(bci, Opcode::FAST_ALDC_W.byte());
                    summary.constants += 1;
                }
            }
            OpcodeFamily::LookupSwitch => {
                let cursor = InstructionCursor::over_code(code, bci);
                let npairs = cursor.java_u4_at(cursor.aligned_offset(1) + 4);
                let fast = if (npairs.max(0) as usize) < LINEAR_SWITCH_THRESHOLD {
                    Opcode::FAST_LINEARSWITCH
                } else {
                    Opcode::FAST_BINARYSWITCH
                };
                code.set_byte(bci, fast.byte());
                summary.switches += 1;
            }
            _ => {}
        }
        bci += len;
    }
    debug!(
        "rewrote {} member refs, {} call sites, {} constants, {} switches ({} cache entries)",
        summary.member_refs,
        summary.call_sites,
        summary.constants,
        summary.switches,
        allocator.len()
    );
    Ok(summary)
}

fn fast_field_opcode(bc: Opcode, field_type: BasicType) -> Option<Opcode> {
    let get = bc == Opcode::GETFIELD;
    Some(match field_type {
        BasicType::Object | BasicType::Array => if get { Opcode::FAST_AGETFIELD } else { Opcode::FAST_APUTFIELD },
        BasicType::Boolean | BasicType::Byte => if get { Opcode::FAST_BGETFIELD } else { Opcode::FAST_BPUTFIELD },
        BasicType::Char => if get { Opcode::FAST_CGETFIELD } else { Opcode::FAST_CPUTFIELD },
        BasicType::Double => if get { Opcode::FAST_DGETFIELD } else { Opcode::FAST_DPUTFIELD },
        BasicType::Float => if get { Opcode::FAST_FGETFIELD } else { Opcode::FAST_FPUTFIELD },
        BasicType::Int => if get { Opcode::FAST_IGETFIELD } else { Opcode::FAST_IPUTFIELD },
        BasicType::Long => if get { Opcode::FAST_LGETFIELD } else { Opcode::FAST_LPUTFIELD },
        BasicType::Short => if get { Opcode::FAST_SGETFIELD } else { Opcode::FAST_SPUTFIELD },
        BasicType::Void | BasicType::Illegal => return None,
    })
}

/// Replaces the instruction at `bci` of shared, linked code with its fast form.
///
/// Returns the opcode stored, or `None` when the site has nothing to quicken, is
/// already quick, or is deferred. Safe to race with other quickeners and readers of
/// the same site: all of them store the same byte.
pub fn quicken(method: &Method, bci: usize, resolver: &dyn LinkResolver, thread: &dyn ThreadContext) -> Result<Option<Opcode>, BytecodeError> {
    let cursor = InstructionCursor::new(method, bci);
    let raw = cursor.raw_opcode();
    let fast = match raw {
        Opcode::GETFIELD | Opcode::PUTFIELD => {
            let view = MemberRefView::new(method, bci);
            // the resolver publishes the entry before we store the new byte
            let field = view.resolve_field(resolver, thread)?;
            if field.is_static {
                return Err(BytecodeError::incompatible_change(&format!(
                    "IncompatibleClassChangeError: expected non-static field {}.{}",
                    field.holder, field.name
                )));
            }
            match fast_field_opcode(raw, field.field_type) {
                Some(op) => op,
                None => fail!(ErrorKind::Linkage, ("field {} has no value type", field.name)),
            }
        }
        Opcode::ALOAD_0 => {
            let next = bci + 1;
            if next < method.code_size() {
                let following = InstructionCursor::new(method, next).raw_opcode();
                if following == Opcode::GETFIELD {
                    // wait for the getfield so the pair can still be combined
                    trace!("{}: deferring aload_0 at bci {}", method, bci);
                    return Ok(None);
                }
            }
            Opcode::FAST_ALOAD_0
        }
        _ => return Ok(None),
    };
    checked_assert!(
        cursor.formats().length(fast, false) == Some(cursor.length()),
        "{} would change the length of {} at bci {}",
        cursor.formats().name(fast),
        cursor.formats().name(raw),
        bci
    );
    method.code().patch_opcode(bci, fast.byte());
    trace!("{} quickened {} at bci {} to {}", thread.name(), cursor.formats().name(raw), bci, cursor.formats().name(fast));
    Ok(Some(fast))
}
