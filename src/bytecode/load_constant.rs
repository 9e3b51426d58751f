use crate::bytecode::cursor::{InstructionCursor, InstructionView};
use crate::bytecode::error::{BytecodeError, ErrorKind};
use crate::bytecode::format::OpcodeFamily;
use crate::bytecode::opcodes::Opcode;
use crate::runtime::code::CodeBuffer;
use crate::runtime::{Method, ResolvedConstant, ThreadContext};
use crate::types::BasicType;

/// View of `ldc`, `ldc_w`, `ldc2_w` and the `fast_aldc` forms the rewriter turns
/// method handle and method type loads into.
///
/// A view built with [`LoadConstantView::detached`] has no constant pool behind it; it
/// can still decode its operand, but anything needing the pool fails with
/// `ErrorKind::Unbound`.
pub struct LoadConstantView<'m> {
    cursor: InstructionCursor<'m>,
    method: Option<&'m Method>,
}

impl<'m> LoadConstantView<'m> {
    pub fn new(method: &'m Method, bci: usize) -> Self {
        let view = LoadConstantView { cursor: InstructionCursor::new(method, bci), method: Some(method) };
        view.verify();
        view
    }

    pub fn detached(code: &'m CodeBuffer, bci: usize) -> Self {
        let view = LoadConstantView { cursor: InstructionCursor::over_code(code, bci), method: None };
        view.verify();
        view
    }

    fn bound_method(&self) -> Result<&'m Method, BytecodeError> {
        match self.method {
            Some(m) => Ok(m),
            None => fail!(ErrorKind::Unbound, ("load constant at bci {} has no method", self.bci())),
        }
    }

    /// The operand as encoded: a pool index, or a cache index once rewritten.
    pub fn raw_index(&self) -> u16 {
        let raw = self.raw_opcode();
        checked_assert!(raw != Opcode::WIDE, "load constant reached through a wide prefix at bci {}", self.bci());
        if self.cursor.formats().java_code(raw) == Opcode::LDC {
            self.cursor.get_index_u1(raw) as u16
        } else {
            self.cursor.get_index_u2(raw, false)
        }
    }

    pub fn has_cache_index(&self) -> bool {
        self.raw_opcode().is_fast()
    }

    pub fn pool_index(&self) -> Result<u16, BytecodeError> {
        let index = self.raw_index();
        if !self.has_cache_index() {
            return Ok(index);
        }
        let method = self.bound_method()?;
        let Some(cache) = method.constants().cache() else {
            fail!(ErrorKind::Lookup, ("{} has no resolution cache", method));
        };
        cache.pool_index_at(index as u32)
    }

    pub fn result_type(&self) -> Result<BasicType, BytecodeError> {
        let method = self.bound_method()?;
        let tag = method.constants().tag_at(self.pool_index()?)?;
        match tag.basic_type() {
            BasicType::Illegal => fail!(ErrorKind::Lookup, ("{:?} constant at bci {} is not loadable", tag, self.bci())),
            t => Ok(t),
        }
    }

    /// Materializes the constant. Cache-indexed sites take the cached value when it is
    /// already there; anything else goes through first-use resolution, which may block.
    pub fn resolve_constant(&self, thread: &dyn ThreadContext) -> Result<ResolvedConstant, BytecodeError> {
        let method = self.bound_method()?;
        let pool = method.constants();
        let index = self.raw_index();
        let resolved = if self.has_cache_index() {
            pool.resolve_cached_constant_at(index as u32, thread)
        } else {
            pool.resolve_constant_at(index, thread)
        };
        resolved.map_err(|e| err!(e, "{} at bci {}", method, self.bci()))
    }
}

impl<'m> InstructionView<'m> for LoadConstantView<'m> {
    fn cursor(&self) -> &InstructionCursor<'m> {
        &self.cursor
    }

    fn is_valid(&self) -> bool {
        self.cursor.formats().family(self.raw_opcode()) == OpcodeFamily::LoadConstant
    }

    fn verify(&self) {
        checked_assert!(self.raw_opcode() != Opcode::WIDE, "load constant reached through a wide prefix at bci {}", self.bci());
        checked_assert!(self.is_valid(), "not a load constant at bci {}", self.bci());
    }
}
