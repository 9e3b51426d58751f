#[macro_use]
pub mod error;

pub mod opcodes;
pub mod format;
pub mod cursor;
pub mod stream;
pub mod member_ref;
pub mod load_constant;
pub mod switch;
pub mod type_ref;
pub mod rewriter;

use num_traits::PrimInt;
use crate::bytecode::cursor::InstructionCursor;
use crate::bytecode::format::OpcodeFamily;
use crate::bytecode::load_constant::LoadConstantView;
use crate::bytecode::member_ref::MemberRefView;
use crate::bytecode::switch::{LookupSwitchView, TableSwitchView};
use crate::bytecode::type_ref::TypeRefView;
use crate::runtime::code::CodeBuffer;
use crate::runtime::Method;

/// True when the format/caller consistency assertions are compiled in.
pub const CHECKED: bool = cfg!(any(debug_assertions, feature = "checked"));

// Basic field reading. Offsets are absolute positions in the code array; callers
// guarantee they lie inside a verified instruction.
fn read_be<T>(code: &CodeBuffer, at: usize) -> T
where
    T: PrimInt + From<u8>,
{
    let mut acc = T::zero();
    for i in 0..std::mem::size_of::<T>()
    {
        acc = (acc << 8) | <T as From<u8>>::from(code.byte_at(at + i));
    }
    acc
}

pub(crate) fn read_java_u2(code: &CodeBuffer, at: usize) -> u16
{
    read_be::<u16>(code, at)
}

pub(crate) fn read_java_u4(code: &CodeBuffer, at: usize) -> u32
{
    read_be::<u32>(code, at)
}

// Fields written by the rewriter are in host order. The bytes are gathered
// big-endian above, so reinterpret them in host order.
pub(crate) fn read_native_u2(code: &CodeBuffer, at: usize) -> u16
{
    u16::from_be(read_be::<u16>(code, at))
}

pub(crate) fn read_native_u4(code: &CodeBuffer, at: usize) -> u32
{
    u32::from_be(read_be::<u32>(code, at))
}

pub(crate) fn write_java_u2(code: &mut CodeBuffer, at: usize, val: u16)
{
    for (i, b) in val.to_be_bytes().into_iter().enumerate()
    {
        code.set_byte(at + i, b);
    }
}

pub(crate) fn write_native_u2(code: &mut CodeBuffer, at: usize, val: u16)
{
    for (i, b) in val.to_ne_bytes().into_iter().enumerate()
    {
        code.set_byte(at + i, b);
    }
}

pub(crate) fn write_native_u4(code: &mut CodeBuffer, at: usize, val: u32)
{
    for (i, b) in val.to_ne_bytes().into_iter().enumerate()
    {
        code.set_byte(at + i, b);
    }
}

/// The specialised view matching the opcode family at a bci.
pub enum DecodedView<'m> {
    MemberRef(MemberRefView<'m>),
    LoadConstant(LoadConstantView<'m>),
    TableSwitch(TableSwitchView<'m>),
    LookupSwitch(LookupSwitchView<'m>),
    TypeRef(TypeRefView<'m>),
    /// Everything else: the cursor already exposes all there is to decode.
    Plain(InstructionCursor<'m>),
}

/// Positions a cursor at `bci` and derives the view for its opcode family.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use jvmcode::bytecode::{decode_at, DecodedView};
/// use jvmcode::runtime::memory::InMemoryPool;
/// use jvmcode::runtime::Method;
///
/// let pool = Arc::new(InMemoryPool::builder().build());
/// // iconst_1; ireturn
/// let method = Method::new("Demo", "one", "()I", vec![0x04, 0xac], pool);
/// assert!(matches!(decode_at(&method, 0), DecodedView::Plain(_)));
/// ```
pub fn decode_at(method: &Method, bci: usize) -> DecodedView<'_> {
    let cursor = InstructionCursor::new(method, bci);
    match cursor.formats().family(cursor.raw_opcode()) {
        OpcodeFamily::FieldAccess | OpcodeFamily::Invoke | OpcodeFamily::DynamicInvoke => {
            DecodedView::MemberRef(MemberRefView::new(method, bci))
        }
        OpcodeFamily::LoadConstant => DecodedView::LoadConstant(LoadConstantView::new(method, bci)),
        OpcodeFamily::TableSwitch => DecodedView::TableSwitch(TableSwitchView::new(cursor)),
        OpcodeFamily::LookupSwitch => DecodedView::LookupSwitch(LookupSwitchView::new(cursor)),
        OpcodeFamily::TypeReference => DecodedView::TypeRef(TypeRefView::new(method, bci)),
        OpcodeFamily::Branch | OpcodeFamily::Other => DecodedView::Plain(cursor),
    }
}
