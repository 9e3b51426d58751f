//! # jvmcode
//!
//! Format-aware decoding of JVM method code for an interpreter: instruction cursors,
//! views over member references, loadable constants, jump tables and type references,
//! and the link-time rewriter and run-time quickener that move code to its fast forms
//! while other threads execute it.
//!
//! # Examples
//!
//! ```
//!  use std::sync::Arc;
//!  use jvmcode::bytecode::member_ref::MemberRefView;
//!  use jvmcode::bytecode::rewriter::{rewrite, CacheIndexAllocator};
//!  use jvmcode::runtime::memory::InMemoryPool;
//!  use jvmcode::runtime::code::CodeBuffer;
//!  use jvmcode::runtime::Method;
//!
//!  let mut b = InMemoryPool::builder();
//!  let count = b.field_ref("demo/Counter", "count", "I");
//!  let pool = Arc::new(b.build());
//!
//!  // getstatic demo/Counter.count; ireturn
//!  let [hi, lo] = count.to_be_bytes();
//!  let mut code = CodeBuffer::new(&[0xb2, hi, lo, 0xac]);
//!  let mut allocator = CacheIndexAllocator::new();
//!  rewrite(&mut code, pool.as_ref(), &mut allocator).unwrap();
//!  pool.install_cache(allocator.into_cache(0)).unwrap();
//!
//!  let method = Method::with_code("demo/Counter".into(), "get".into(), "()I".into(), code, pool);
//!  let view = MemberRefView::new(&method, 0);
//!  assert_eq!(view.pool_index().unwrap(), count);
//!  assert_eq!(view.name().unwrap().to_string(), "count");
//! ```

#[macro_use]
pub mod bytecode;
pub mod runtime;
pub mod types;
mod tests;

pub use crate::bytecode::error::{BytecodeError, ErrorKind};
pub use crate::bytecode::format::FormatTable;
pub use crate::bytecode::opcodes::Opcode;
pub use crate::bytecode::{decode_at, DecodedView};
