use std::sync::Arc;
use crate::bytecode::cursor::{InstructionCursor, InstructionView};
use crate::bytecode::error::{BytecodeError, ErrorKind};
use crate::bytecode::format::OpcodeFamily;
use crate::bytecode::opcodes::Opcode;
use crate::runtime::{LinkResolver, Method, ResolvedField, SymbolicRef, ThreadContext};
use crate::types::{parameter_size_of, result_type_of, BasicType, Symbol};

/// The dispatch an invoke instruction asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvokeKind {
    Virtual,
    Special,
    Static,
    Interface,
    Dynamic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldAccess {
    GetStatic,
    PutStatic,
    GetField,
    PutField,
}

/// View of a field access or invoke instruction, including their rewritten forms.
///
/// The operand of a linked member reference is an index into the resolution cache,
/// not the constant pool: a native-order u2 (plus the cache's index tag) for field and
/// method references, a native-order u4 for `invokedynamic`. The pool index is
/// recovered through the cache entry.
pub struct MemberRefView<'m> {
    cursor: InstructionCursor<'m>,
    method: &'m Method,
}

impl<'m> MemberRefView<'m> {
    pub fn new(method: &'m Method, bci: usize) -> Self {
        let view = MemberRefView { cursor: InstructionCursor::new(method, bci), method };
        view.verify();
        view
    }

    pub fn method(&self) -> &'m Method {
        self.method
    }

    fn index_tag(&self) -> u32 {
        self.method.constants().cache().map_or(0, |c| c.index_tag())
    }

    fn has_index_u4(&self) -> bool {
        self.cursor.has_wide_index(self.raw_opcode())
    }

    /// The cache index as encoded, tag included for 2-byte forms.
    pub fn index(&self) -> u32 {
        let raw = self.raw_opcode();
        if self.has_index_u4() {
            self.cursor.get_index_u4(raw)
        } else {
            self.cursor.get_index_u2_cpcache(raw, self.index_tag())
        }
    }

    /// The cache slot the instruction refers to.
    pub fn cache_index(&self) -> u32 {
        if self.has_index_u4() {
            return self.index();
        }
        self.index().wrapping_sub(self.index_tag())
    }

    pub fn pool_index(&self) -> Result<u16, BytecodeError> {
        let Some(cache) = self.method.constants().cache() else {
            fail!(ErrorKind::Lookup, ("{} has no resolution cache", self.method));
        };
        cache
            .pool_index_at(self.cache_index())
            .map_err(|e| err!(e, "{} at bci {}", self.method, self.bci()))
    }

    fn site(&self) -> Result<SymbolicRef, BytecodeError> {
        Ok(SymbolicRef { pool_index: self.pool_index()?, cache_index: self.cache_index() })
    }

    pub fn name(&self) -> Result<Symbol, BytecodeError> {
        self.method.constants().name_ref_at(self.pool_index()?)
    }

    pub fn signature(&self) -> Result<Symbol, BytecodeError> {
        self.method.constants().signature_ref_at(self.pool_index()?)
    }

    /// Class the field or method is declared against. Dynamic call sites have none.
    pub fn holder_name(&self) -> Result<Symbol, BytecodeError> {
        self.method.constants().klass_ref_name_at(self.pool_index()?)
    }

    /// Category of the field's value or of the method's return value.
    pub fn result_type(&self) -> Result<BasicType, BytecodeError> {
        let signature = self.signature()?;
        result_type_of(&signature.to_str()?)
    }

    pub fn invoke_kind(&self) -> Option<InvokeKind> {
        Some(match self.opcode() {
            Opcode::INVOKEVIRTUAL => InvokeKind::Virtual,
            Opcode::INVOKESPECIAL => InvokeKind::Special,
            Opcode::INVOKESTATIC => InvokeKind::Static,
            Opcode::INVOKEINTERFACE => InvokeKind::Interface,
            Opcode::INVOKEDYNAMIC => InvokeKind::Dynamic,
            _ => return None,
        })
    }

    pub fn field_access(&self) -> Option<FieldAccess> {
        Some(match self.opcode() {
            Opcode::GETSTATIC => FieldAccess::GetStatic,
            Opcode::PUTSTATIC => FieldAccess::PutStatic,
            Opcode::GETFIELD => FieldAccess::GetField,
            Opcode::PUTFIELD => FieldAccess::PutField,
            _ => return None,
        })
    }

    pub fn is_static(&self) -> bool {
        matches!(
            self.opcode(),
            Opcode::GETSTATIC | Opcode::PUTSTATIC | Opcode::INVOKESTATIC | Opcode::INVOKEDYNAMIC
        )
    }

    pub fn has_receiver(&self) -> bool {
        !self.is_static()
    }

    /// Operand stack slots an invoke pops for its arguments, receiver included.
    pub fn parameter_size(&self) -> Result<usize, BytecodeError> {
        let signature = self.signature()?;
        let args = parameter_size_of(&signature.to_str()?)?;
        Ok(args + usize::from(self.has_receiver()))
    }

    /// Links the invoked method through the resolver entry point matching the opcode.
    pub fn static_target(&self, resolver: &dyn LinkResolver, thread: &dyn ThreadContext) -> Result<Arc<Method>, BytecodeError> {
        let site = self.site()?;
        match self.invoke_kind() {
            Some(InvokeKind::Dynamic) => resolver.resolve_dynamic_call_site(self.method, site, thread),
            Some(InvokeKind::Interface) => resolver.resolve_interface_method(self.method, site, thread),
            Some(_) => resolver.resolve_method(self.method, site, thread),
            None => fail!(ErrorKind::Lookup, ("{} at bci {} is not an invoke", self.cursor.formats().name(self.raw_opcode()), self.bci())),
        }
    }

    pub fn resolve_field(&self, resolver: &dyn LinkResolver, thread: &dyn ThreadContext) -> Result<ResolvedField, BytecodeError> {
        if self.field_access().is_none() {
            fail!(ErrorKind::Lookup, ("{} at bci {} is not a field access", self.cursor.formats().name(self.raw_opcode()), self.bci()));
        }
        resolver.resolve_field(self.method, self.site()?, thread)
    }
}

impl<'m> InstructionView<'m> for MemberRefView<'m> {
    fn cursor(&self) -> &InstructionCursor<'m> {
        &self.cursor
    }

    fn is_valid(&self) -> bool {
        matches!(
            self.cursor.formats().family(self.raw_opcode()),
            OpcodeFamily::FieldAccess | OpcodeFamily::Invoke | OpcodeFamily::DynamicInvoke
        )
    }

    fn verify(&self) {
        checked_assert!(self.is_valid(), "not a member reference at bci {}", self.bci());
        if self.invoke_kind().is_some() {
            checked_assert!(
                self.method.constants().cache().is_some(),
                "invoke at bci {} decoded before {} was linked",
                self.bci(),
                self.method
            );
        }
    }
}
