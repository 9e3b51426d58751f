//! Contracts of the runtime collaborators this layer reads through: the owning
//! method, its constant pool and resolution cache, the link resolver, and the
//! thread performing resolution.

pub mod code;
pub mod memory;

use std::fmt;
use std::sync::Arc;
use crate::bytecode::error::BytecodeError;
use crate::runtime::code::CodeBuffer;
use crate::types::{BasicType, ConstantTag, Symbol};

/// The thread on whose behalf resolution runs.
///
/// Resolution may need to stop at the runtime's cooperative synchronization point
/// (e.g. while classes are loaded); implementations block inside `safepoint_poll`
/// until the runtime lets the thread continue.
pub trait ThreadContext: Sync {
    fn name(&self) -> &str;
    fn safepoint_poll(&self);
}

/// A thread that never has to stop, for tools running outside the interpreter.
pub struct DetachedThread;

impl ThreadContext for DetachedThread {
    fn name(&self) -> &str {
        "detached"
    }

    fn safepoint_poll(&self) {}
}

/// A resolved field, as recorded in the resolution cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedField {
    pub holder: Symbol,
    pub name: Symbol,
    pub field_type: BasicType,
    pub offset: u32,
    pub is_static: bool,
}

/// A materialized loadable constant.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedConstant {
    Int(i32),
    Float(f32),
    Long(i64),
    Double(f64),
    String(Arc<str>),
    Class(Symbol),
    MethodType(Symbol),
    MethodHandle { kind: u8, member: Symbol },
}

/// What a resolution cache entry holds once resolved.
#[derive(Debug, Clone)]
pub enum ResolvedEntry {
    Field(ResolvedField),
    Method(Arc<Method>),
    CallSite(Arc<Method>),
    Constant(ResolvedConstant),
}

/// The reference a resolver is asked to link: the pool entry naming it and the
/// cache slot the outcome is published to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolicRef {
    pub pool_index: u16,
    pub cache_index: u32,
}

/// Per-method side table of resolved references.
///
/// Entries move from unresolved to resolved exactly once. `publish` must make the
/// entry fully visible to any thread that later observes it through `resolved_at`,
/// and concurrent publishers must agree on a single winner.
pub trait ResolutionCache: Send + Sync {
    /// Offset added to 2-byte cache indices read from the code. Opaque to this layer.
    fn index_tag(&self) -> u32 {
        0
    }

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The constant pool index the entry at `cache_index` was created for.
    fn pool_index_at(&self, cache_index: u32) -> Result<u16, BytecodeError>;

    /// The resolved value, or `None` while the entry is still a placeholder.
    fn resolved_at(&self, cache_index: u32) -> Option<ResolvedEntry>;

    /// Publishes a resolution outcome; returns whichever entry won.
    fn publish(&self, cache_index: u32, entry: ResolvedEntry) -> Result<ResolvedEntry, BytecodeError>;
}

/// Tagged constant pool of the class owning a method.
///
/// Member accessors (`name_ref_at`, `signature_ref_at`, `klass_ref_name_at`) take the
/// index of a field, method, interface method or dynamic call site entry.
pub trait ConstantPool: Send + Sync {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn tag_at(&self, index: u16) -> Result<ConstantTag, BytecodeError>;

    fn name_ref_at(&self, index: u16) -> Result<Symbol, BytecodeError>;

    fn signature_ref_at(&self, index: u16) -> Result<Symbol, BytecodeError>;

    /// Name of the class a field or method reference belongs to.
    fn klass_ref_name_at(&self, index: u16) -> Result<Symbol, BytecodeError>;

    /// Name of a class entry.
    fn klass_name_at(&self, index: u16) -> Result<Symbol, BytecodeError>;

    /// The resolution cache, once the owning class has been linked.
    fn cache(&self) -> Option<&dyn ResolutionCache>;

    /// First-use resolution of a loadable constant. May load classes, intern strings
    /// and block at a safepoint.
    fn resolve_constant_at(&self, index: u16, thread: &dyn ThreadContext) -> Result<ResolvedConstant, BytecodeError>;

    /// Resolution of a constant that the rewriter moved behind a cache slot.
    fn resolve_cached_constant_at(&self, cache_index: u32, thread: &dyn ThreadContext) -> Result<ResolvedConstant, BytecodeError>;
}

/// Turns symbolic references into concrete, loaded, access-checked targets.
pub trait LinkResolver: Sync {
    fn resolve_method(&self, caller: &Method, site: SymbolicRef, thread: &dyn ThreadContext) -> Result<Arc<Method>, BytecodeError>;

    fn resolve_interface_method(&self, caller: &Method, site: SymbolicRef, thread: &dyn ThreadContext) -> Result<Arc<Method>, BytecodeError>;

    /// Runs the call site's bootstrap and returns the linked target.
    fn resolve_dynamic_call_site(&self, caller: &Method, site: SymbolicRef, thread: &dyn ThreadContext) -> Result<Arc<Method>, BytecodeError>;

    fn resolve_field(&self, caller: &Method, site: SymbolicRef, thread: &dyn ThreadContext) -> Result<ResolvedField, BytecodeError>;
}

/// A method: its identity, its instruction bytes and the constant pool of its class.
pub struct Method {
    holder: Symbol,
    name: Symbol,
    signature: Symbol,
    code: CodeBuffer,
    constants: Arc<dyn ConstantPool>,
}

impl Method {
    pub fn new(holder: &str, name: &str, signature: &str, code: Vec<u8>, constants: Arc<dyn ConstantPool>) -> Self {
        Method::with_code(Symbol::new(holder), Symbol::new(name), Symbol::new(signature), code.into(), constants)
    }

    pub fn with_code(holder: Symbol, name: Symbol, signature: Symbol, code: CodeBuffer, constants: Arc<dyn ConstantPool>) -> Self {
        Method { holder, name, signature, code, constants }
    }

    pub fn holder(&self) -> &Symbol {
        &self.holder
    }

    pub fn name(&self) -> &Symbol {
        &self.name
    }

    pub fn signature(&self) -> &Symbol {
        &self.signature
    }

    pub fn code(&self) -> &CodeBuffer {
        &self.code
    }

    pub fn constants(&self) -> &dyn ConstantPool {
        self.constants.as_ref()
    }

    pub fn code_size(&self) -> usize {
        self.code.len()
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}{}", self.holder, self.name, self.signature)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
