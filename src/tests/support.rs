// Shared helpers: a small code assembler and a linked-method fixture.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use crate::bytecode::opcodes::Opcode;
use crate::bytecode::rewriter::{rewrite, CacheIndexAllocator, RewriteSummary};
use crate::runtime::code::CodeBuffer;
use crate::runtime::memory::InMemoryPool;
use crate::runtime::{Method, ThreadContext};
use crate::types::Symbol;

#[derive(Default)]
pub(crate) struct CodeAssembler {
    bytes: Vec<u8>,
}

impl CodeAssembler {
    pub(crate) fn new() -> Self {
        CodeAssembler::default()
    }

    pub(crate) fn bci(&self) -> usize {
        self.bytes.len()
    }

    pub(crate) fn op(&mut self, op: Opcode) -> &mut Self {
        self.bytes.push(op.byte());
        self
    }

    pub(crate) fn u1(&mut self, v: u8) -> &mut Self {
        self.bytes.push(v);
        self
    }

    pub(crate) fn java_u2(&mut self, v: u16) -> &mut Self {
        self.bytes.extend_from_slice(&v.to_be_bytes());
        self
    }

    pub(crate) fn java_u4(&mut self, v: i32) -> &mut Self {
        self.bytes.extend_from_slice(&v.to_be_bytes());
        self
    }

    pub(crate) fn align(&mut self) -> &mut Self {
        while self.bytes.len() % 4 != 0 {
            self.bytes.push(0);
        }
        self
    }

    /// An instruction with a java-order u2 pool index: member refs, ldc_w, new, ...
    pub(crate) fn indexed(&mut self, op: Opcode, pool_index: u16) -> &mut Self {
        self.op(op).java_u2(pool_index)
    }

    pub(crate) fn invokeinterface(&mut self, pool_index: u16, count: u8) -> &mut Self {
        self.op(Opcode::INVOKEINTERFACE).java_u2(pool_index).u1(count).u1(0)
    }

    pub(crate) fn invokedynamic(&mut self, pool_index: u16) -> &mut Self {
        self.op(Opcode::INVOKEDYNAMIC).java_u2(pool_index).java_u2(0)
    }

    pub(crate) fn tableswitch(&mut self, default: i32, low: i32, targets: &[i32]) -> &mut Self {
        self.op(Opcode::TABLESWITCH).align();
        self.java_u4(default).java_u4(low).java_u4(low + targets.len() as i32 - 1);
        for t in targets {
            self.java_u4(*t);
        }
        self
    }

    pub(crate) fn lookupswitch(&mut self, default: i32, pairs: &[(i32, i32)]) -> &mut Self {
        self.op(Opcode::LOOKUPSWITCH).align();
        self.java_u4(default).java_u4(pairs.len() as i32);
        for (key, offset) in pairs {
            self.java_u4(*key).java_u4(*offset);
        }
        self
    }

    pub(crate) fn build(&self) -> Vec<u8> {
        self.bytes.clone()
    }
}

/// Method over code that is not linked: the pool has no resolution cache.
pub(crate) fn unlinked_method(code: Vec<u8>, pool: InMemoryPool) -> Method {
    Method::new("demo/Host", "run", "()V", code, Arc::new(pool))
}

/// Rewrites `code` against `pool`, installs the resulting cache and wraps both in a
/// method of `demo/Host`.
pub(crate) fn link_method(name: &str, signature: &str, code: Vec<u8>, pool: InMemoryPool, index_tag: u32) -> (Method, RewriteSummary) {
    let mut code = CodeBuffer::from(code);
    let mut allocator = CacheIndexAllocator::new();
    let summary = rewrite(&mut code, &pool, &mut allocator).unwrap();
    pool.install_cache(allocator.into_cache(index_tag)).unwrap();
    let method = Method::with_code(Symbol::new("demo/Host"), Symbol::new(name), Symbol::new(signature), code, Arc::new(pool));
    (method, summary)
}

/// Thread that records how often resolution stopped at a safepoint.
#[derive(Default)]
pub(crate) struct CountingThread {
    polls: AtomicUsize,
}

impl CountingThread {
    pub(crate) fn polls(&self) -> usize {
        self.polls.load(Ordering::SeqCst)
    }
}

impl ThreadContext for CountingThread {
    fn name(&self) -> &str {
        "counting"
    }

    fn safepoint_poll(&self) {
        self.polls.fetch_add(1, Ordering::SeqCst);
    }
}
