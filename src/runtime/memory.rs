//! Reference in-memory collaborators: a constant pool assembled entry by entry, a
//! publish-once resolution cache and a registry-backed link resolver. Enough to run
//! the views end to end in tools and tests.

use log::{debug, trace};
use once_cell::sync::OnceCell;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use crate::bytecode::error::{BytecodeError, ErrorKind};
use crate::runtime::{
    ConstantPool, LinkResolver, Method, ResolutionCache, ResolvedConstant, ResolvedEntry,
    ResolvedField, SymbolicRef, ThreadContext,
};
use crate::types::{result_type_of, ConstantTag, Symbol};

#[derive(Debug, Clone)]
pub enum PoolEntry {
    /// Slot 0 and the second slot of a long or double.
    Invalid,
    Utf8(Symbol),
    Integer(i32),
    Float(f32),
    Long(i64),
    Double(f64),
    Class { name_index: u16 },
    String { utf8_index: u16 },
    FieldRef { class_index: u16, name_and_type_index: u16 },
    MethodRef { class_index: u16, name_and_type_index: u16 },
    InterfaceMethodRef { class_index: u16, name_and_type_index: u16 },
    NameAndType { name_index: u16, descriptor_index: u16 },
    MethodHandle { kind: u8, reference_index: u16 },
    MethodType { descriptor_index: u16 },
    InvokeDynamic { bootstrap_index: u16, name_and_type_index: u16 },
}

impl PoolEntry {
    pub fn tag(&self) -> ConstantTag {
        match self {
            PoolEntry::Invalid => ConstantTag::Invalid,
            PoolEntry::Utf8(_) => ConstantTag::Utf8,
            PoolEntry::Integer(_) => ConstantTag::Integer,
            PoolEntry::Float(_) => ConstantTag::Float,
            PoolEntry::Long(_) => ConstantTag::Long,
            PoolEntry::Double(_) => ConstantTag::Double,
            PoolEntry::Class { .. } => ConstantTag::Class,
            PoolEntry::String { .. } => ConstantTag::String,
            PoolEntry::FieldRef { .. } => ConstantTag::FieldRef,
            PoolEntry::MethodRef { .. } => ConstantTag::MethodRef,
            PoolEntry::InterfaceMethodRef { .. } => ConstantTag::InterfaceMethodRef,
            PoolEntry::NameAndType { .. } => ConstantTag::NameAndType,
            PoolEntry::MethodHandle { .. } => ConstantTag::MethodHandle,
            PoolEntry::MethodType { .. } => ConstantTag::MethodType,
            PoolEntry::InvokeDynamic { .. } => ConstantTag::InvokeDynamic,
        }
    }
}

/// Appends entries and hands back their indices.
///
/// # Examples
///
/// ```
/// use jvmcode::runtime::memory::InMemoryPool;
/// use jvmcode::runtime::ConstantPool;
///
/// let mut b = InMemoryPool::builder();
/// let f = b.field_ref("demo/Point", "x", "I");
/// let pool = b.build();
/// assert_eq!(pool.name_ref_at(f).unwrap().to_string(), "x");
/// ```
#[derive(Debug)]
pub struct PoolBuilder {
    entries: Vec<PoolEntry>,
    utf8: HashMap<String, u16>,
    classes: HashMap<String, u16>,
}

impl PoolBuilder {
    fn push(&mut self, entry: PoolEntry) -> u16 {
        let index = self.entries.len() as u16;
        self.entries.push(entry);
        index
    }

    pub fn utf8(&mut self, s: &str) -> u16 {
        if let Some(&ix) = self.utf8.get(s) {
            return ix;
        }
        let ix = self.push(PoolEntry::Utf8(Symbol::new(s)));
        self.utf8.insert(s.to_string(), ix);
        ix
    }

    pub fn class(&mut self, name: &str) -> u16 {
        if let Some(&ix) = self.classes.get(name) {
            return ix;
        }
        let name_index = self.utf8(name);
        let ix = self.push(PoolEntry::Class { name_index });
        self.classes.insert(name.to_string(), ix);
        ix
    }

    pub fn name_and_type(&mut self, name: &str, descriptor: &str) -> u16 {
        let name_index = self.utf8(name);
        let descriptor_index = self.utf8(descriptor);
        self.push(PoolEntry::NameAndType { name_index, descriptor_index })
    }

    pub fn field_ref(&mut self, class: &str, name: &str, descriptor: &str) -> u16 {
        let class_index = self.class(class);
        let name_and_type_index = self.name_and_type(name, descriptor);
        self.push(PoolEntry::FieldRef { class_index, name_and_type_index })
    }

    pub fn method_ref(&mut self, class: &str, name: &str, descriptor: &str) -> u16 {
        let class_index = self.class(class);
        let name_and_type_index = self.name_and_type(name, descriptor);
        self.push(PoolEntry::MethodRef { class_index, name_and_type_index })
    }

    pub fn interface_method_ref(&mut self, class: &str, name: &str, descriptor: &str) -> u16 {
        let class_index = self.class(class);
        let name_and_type_index = self.name_and_type(name, descriptor);
        self.push(PoolEntry::InterfaceMethodRef { class_index, name_and_type_index })
    }

    pub fn invoke_dynamic(&mut self, bootstrap_index: u16, name: &str, descriptor: &str) -> u16 {
        let name_and_type_index = self.name_and_type(name, descriptor);
        self.push(PoolEntry::InvokeDynamic { bootstrap_index, name_and_type_index })
    }

    pub fn integer(&mut self, v: i32) -> u16 {
        self.push(PoolEntry::Integer(v))
    }

    pub fn float(&mut self, v: f32) -> u16 {
        self.push(PoolEntry::Float(v))
    }

    /// Longs and doubles take two slots; the second one is unusable.
    pub fn long(&mut self, v: i64) -> u16 {
        let ix = self.push(PoolEntry::Long(v));
        self.push(PoolEntry::Invalid);
        ix
    }

    pub fn double(&mut self, v: f64) -> u16 {
        let ix = self.push(PoolEntry::Double(v));
        self.push(PoolEntry::Invalid);
        ix
    }

    pub fn string(&mut self, s: &str) -> u16 {
        let utf8_index = self.utf8(s);
        self.push(PoolEntry::String { utf8_index })
    }

    pub fn method_type(&mut self, descriptor: &str) -> u16 {
        let descriptor_index = self.utf8(descriptor);
        self.push(PoolEntry::MethodType { descriptor_index })
    }

    pub fn method_handle(&mut self, kind: u8, reference_index: u16) -> u16 {
        self.push(PoolEntry::MethodHandle { kind, reference_index })
    }

    pub fn build(self) -> InMemoryPool {
        InMemoryPool {
            entries: self.entries,
            cache: OnceCell::new(),
        }
    }
}

/// Constant pool held in memory. The resolution cache is installed once, after the
/// code referring to the pool has been rewritten.
#[derive(Debug)]
pub struct InMemoryPool {
    entries: Vec<PoolEntry>,
    cache: OnceCell<InMemoryCache>,
}

impl InMemoryPool {
    pub fn builder() -> PoolBuilder {
        PoolBuilder {
            entries: vec![PoolEntry::Invalid],
            utf8: HashMap::new(),
            classes: HashMap::new(),
        }
    }

    pub fn entry_at(&self, index: u16) -> Result<&PoolEntry, BytecodeError> {
        match self.entries.get(index as usize) {
            Some(PoolEntry::Invalid) | None => fail!("invalid constant pool index {}", index),
            Some(e) => Ok(e),
        }
    }

    pub fn install_cache(&self, cache: InMemoryCache) -> Result<(), BytecodeError> {
        let size = cache.len();
        if self.cache.set(cache).is_err() {
            fail!("resolution cache already installed");
        }
        debug!("installed resolution cache with {} entries", size);
        Ok(())
    }

    fn utf8_at(&self, index: u16) -> Result<Symbol, BytecodeError> {
        match self.entry_at(index)? {
            PoolEntry::Utf8(s) => Ok(s.clone()),
            other => fail!("expected utf8 at {}, found {:?}", index, other.tag()),
        }
    }

    fn name_and_type_of(&self, index: u16) -> Result<(u16, u16), BytecodeError> {
        let nt = match self.entry_at(index)? {
            PoolEntry::FieldRef { name_and_type_index, .. }
            | PoolEntry::MethodRef { name_and_type_index, .. }
            | PoolEntry::InterfaceMethodRef { name_and_type_index, .. }
            | PoolEntry::InvokeDynamic { name_and_type_index, .. } => *name_and_type_index,
            other => fail!("expected a member reference at {}, found {:?}", index, other.tag()),
        };
        match self.entry_at(nt)? {
            PoolEntry::NameAndType { name_index, descriptor_index } => Ok((*name_index, *descriptor_index)),
            other => fail!("expected name and type at {}, found {:?}", nt, other.tag()),
        }
    }
}

impl ConstantPool for InMemoryPool {
    fn len(&self) -> usize {
        self.entries.len()
    }

    fn tag_at(&self, index: u16) -> Result<ConstantTag, BytecodeError> {
        Ok(self.entry_at(index)?.tag())
    }

    fn name_ref_at(&self, index: u16) -> Result<Symbol, BytecodeError> {
        let (name, _) = self.name_and_type_of(index)?;
        self.utf8_at(name)
    }

    fn signature_ref_at(&self, index: u16) -> Result<Symbol, BytecodeError> {
        let (_, descriptor) = self.name_and_type_of(index)?;
        self.utf8_at(descriptor)
    }

    fn klass_ref_name_at(&self, index: u16) -> Result<Symbol, BytecodeError> {
        match self.entry_at(index)? {
            PoolEntry::FieldRef { class_index, .. }
            | PoolEntry::MethodRef { class_index, .. }
            | PoolEntry::InterfaceMethodRef { class_index, .. } => self.klass_name_at(*class_index),
            other => fail!("no holder class for {:?} at {}", other.tag(), index),
        }
    }

    fn klass_name_at(&self, index: u16) -> Result<Symbol, BytecodeError> {
        match self.entry_at(index)? {
            PoolEntry::Class { name_index } => self.utf8_at(*name_index),
            other => fail!("expected class at {}, found {:?}", index, other.tag()),
        }
    }

    fn cache(&self) -> Option<&dyn ResolutionCache> {
        self.cache.get().map(|c| c as &dyn ResolutionCache)
    }

    fn resolve_constant_at(&self, index: u16, thread: &dyn ThreadContext) -> Result<ResolvedConstant, BytecodeError> {
        let resolved = match self.entry_at(index)? {
            PoolEntry::Integer(v) => ResolvedConstant::Int(*v),
            PoolEntry::Float(v) => ResolvedConstant::Float(*v),
            PoolEntry::Long(v) => ResolvedConstant::Long(*v),
            PoolEntry::Double(v) => ResolvedConstant::Double(*v),
            PoolEntry::String { utf8_index } => {
                let s = self.utf8_at(*utf8_index)?;
                ResolvedConstant::String(Arc::from(s.to_str()?))
            }
            PoolEntry::Class { name_index } => {
                // class loading may have to wait for a safepoint
                thread.safepoint_poll();
                ResolvedConstant::Class(self.utf8_at(*name_index)?)
            }
            PoolEntry::MethodType { descriptor_index } => {
                let descriptor = self.utf8_at(*descriptor_index)?;
                result_type_of(&descriptor.to_str()?)?;
                thread.safepoint_poll();
                ResolvedConstant::MethodType(descriptor)
            }
            PoolEntry::MethodHandle { kind, reference_index } => {
                thread.safepoint_poll();
                ResolvedConstant::MethodHandle { kind: *kind, member: self.name_ref_at(*reference_index)? }
            }
            other => {
                return Err(BytecodeError::with_kind(
                    ErrorKind::Linkage,
                    &format!("constant at {} is not loadable ({:?})", index, other.tag()),
                ))
            }
        };
        trace!("{} resolved constant {} to {:?}", thread.name(), index, resolved);
        Ok(resolved)
    }

    fn resolve_cached_constant_at(&self, cache_index: u32, thread: &dyn ThreadContext) -> Result<ResolvedConstant, BytecodeError> {
        let Some(cache) = self.cache.get() else {
            fail!(ErrorKind::Lookup, ("no resolution cache for cached constant {}", cache_index));
        };
        if let Some(ResolvedEntry::Constant(c)) = cache.resolved_at(cache_index) {
            return Ok(c);
        }
        let pool_index = cache.pool_index_at(cache_index)?;
        let resolved = self.resolve_constant_at(pool_index, thread)?;
        match cache.publish(cache_index, ResolvedEntry::Constant(resolved))? {
            ResolvedEntry::Constant(c) => Ok(c),
            other => fail!("cache entry {} holds {:?}, not a constant", cache_index, other),
        }
    }
}

#[derive(Debug)]
struct CacheEntry {
    pool_index: u16,
    resolved: OnceCell<ResolvedEntry>,
}

/// Resolution cache whose entries are published through `OnceCell`.
#[derive(Debug)]
pub struct InMemoryCache {
    entries: Vec<CacheEntry>,
    index_tag: u32,
}

impl InMemoryCache {
    /// One entry per pool index, in cache index order.
    pub fn new(pool_indices: Vec<u16>, index_tag: u32) -> Self {
        InMemoryCache {
            entries: pool_indices
                .into_iter()
                .map(|pool_index| CacheEntry { pool_index, resolved: OnceCell::new() })
                .collect(),
            index_tag,
        }
    }

    fn entry(&self, cache_index: u32) -> Result<&CacheEntry, BytecodeError> {
        match self.entries.get(cache_index as usize) {
            Some(e) => Ok(e),
            None => fail!("cache index {} out of range ({} entries)", cache_index, self.entries.len()),
        }
    }
}

impl ResolutionCache for InMemoryCache {
    fn index_tag(&self) -> u32 {
        self.index_tag
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn pool_index_at(&self, cache_index: u32) -> Result<u16, BytecodeError> {
        Ok(self.entry(cache_index)?.pool_index)
    }

    fn resolved_at(&self, cache_index: u32) -> Option<ResolvedEntry> {
        self.entries.get(cache_index as usize)?.resolved.get().cloned()
    }

    fn publish(&self, cache_index: u32, entry: ResolvedEntry) -> Result<ResolvedEntry, BytecodeError> {
        Ok(self.entry(cache_index)?.resolved.get_or_init(|| entry).clone())
    }
}

/// Link resolver backed by registries of known methods, fields and bootstrap targets.
///
/// Successful resolutions are published to the caller's resolution cache.
#[derive(Default)]
pub struct SimpleLinkResolver {
    methods: HashMap<(Symbol, Symbol, Symbol), Arc<Method>>,
    fields: HashMap<(Symbol, Symbol), ResolvedField>,
    interfaces: HashSet<Symbol>,
    bootstraps: HashMap<Symbol, Arc<Method>>,
}

impl SimpleLinkResolver {
    pub fn new() -> Self {
        SimpleLinkResolver::default()
    }

    pub fn add_method(&mut self, method: Arc<Method>) {
        let key = (method.holder().clone(), method.name().clone(), method.signature().clone());
        self.methods.insert(key, method);
    }

    pub fn add_interface(&mut self, name: &str) {
        self.interfaces.insert(Symbol::new(name));
    }

    pub fn add_field(&mut self, field: ResolvedField) {
        self.fields.insert((field.holder.clone(), field.name.clone()), field);
    }

    /// Target returned by the bootstrap of any call site named `name`.
    pub fn add_bootstrap(&mut self, name: &str, target: Arc<Method>) {
        self.bootstraps.insert(Symbol::new(name), target);
    }

    fn lookup_method(&self, caller: &Method, site: SymbolicRef) -> Result<Arc<Method>, BytecodeError> {
        let pool = caller.constants();
        let holder = pool.klass_ref_name_at(site.pool_index)?;
        let name = pool.name_ref_at(site.pool_index)?;
        let signature = pool.signature_ref_at(site.pool_index)?;
        match self.methods.get(&(holder.clone(), name.clone(), signature.clone())) {
            Some(m) => Ok(m.clone()),
            None => Err(BytecodeError::linkage(&format!("NoSuchMethodError: {}.{}{}", holder, name, signature))),
        }
    }

    fn publish(&self, caller: &Method, site: SymbolicRef, entry: ResolvedEntry) -> Result<ResolvedEntry, BytecodeError> {
        match caller.constants().cache() {
            Some(cache) => cache.publish(site.cache_index, entry),
            None => Ok(entry),
        }
    }

    fn publish_method(&self, caller: &Method, site: SymbolicRef, method: Arc<Method>) -> Result<Arc<Method>, BytecodeError> {
        match self.publish(caller, site, ResolvedEntry::Method(method))? {
            ResolvedEntry::Method(m) => Ok(m),
            other => fail!("cache entry {} holds {:?}, not a method", site.cache_index, other),
        }
    }
}

impl LinkResolver for SimpleLinkResolver {
    fn resolve_method(&self, caller: &Method, site: SymbolicRef, thread: &dyn ThreadContext) -> Result<Arc<Method>, BytecodeError> {
        thread.safepoint_poll();
        let holder = caller.constants().klass_ref_name_at(site.pool_index)?;
        if self.interfaces.contains(&holder) {
            return Err(BytecodeError::incompatible_change(&format!(
                "IncompatibleClassChangeError: found interface {}, but class was expected",
                holder
            )));
        }
        let m = self.lookup_method(caller, site)?;
        debug!("{} linked {} at cache index {}", thread.name(), m, site.cache_index);
        self.publish_method(caller, site, m)
    }

    fn resolve_interface_method(&self, caller: &Method, site: SymbolicRef, thread: &dyn ThreadContext) -> Result<Arc<Method>, BytecodeError> {
        thread.safepoint_poll();
        let holder = caller.constants().klass_ref_name_at(site.pool_index)?;
        if !self.interfaces.contains(&holder) {
            return Err(BytecodeError::incompatible_change(&format!(
                "IncompatibleClassChangeError: found class {}, but interface was expected",
                holder
            )));
        }
        let m = self.lookup_method(caller, site)?;
        debug!("{} linked interface method {} at cache index {}", thread.name(), m, site.cache_index);
        self.publish_method(caller, site, m)
    }

    fn resolve_dynamic_call_site(&self, caller: &Method, site: SymbolicRef, thread: &dyn ThreadContext) -> Result<Arc<Method>, BytecodeError> {
        thread.safepoint_poll();
        let name = caller.constants().name_ref_at(site.pool_index)?;
        let Some(target) = self.bootstraps.get(&name) else {
            return Err(BytecodeError::linkage(&format!("BootstrapMethodError: no bootstrap for call site {}", name)));
        };
        debug!("{} bootstrapped call site {} at cache index {}", thread.name(), name, site.cache_index);
        match self.publish(caller, site, ResolvedEntry::CallSite(target.clone()))? {
            ResolvedEntry::CallSite(m) => Ok(m),
            other => fail!("cache entry {} holds {:?}, not a call site", site.cache_index, other),
        }
    }

    fn resolve_field(&self, caller: &Method, site: SymbolicRef, thread: &dyn ThreadContext) -> Result<ResolvedField, BytecodeError> {
        thread.safepoint_poll();
        let pool = caller.constants();
        let holder = pool.klass_ref_name_at(site.pool_index)?;
        let name = pool.name_ref_at(site.pool_index)?;
        let Some(field) = self.fields.get(&(holder.clone(), name.clone())) else {
            return Err(BytecodeError::linkage(&format!("NoSuchFieldError: {}.{}", holder, name)));
        };
        match self.publish(caller, site, ResolvedEntry::Field(field.clone()))? {
            ResolvedEntry::Field(f) => Ok(f),
            other => fail!("cache entry {} holds {:?}, not a field", site.cache_index, other),
        }
    }
}
