/* Value categories, constant pool tags, symbols and descriptor scanning. */
/* Symbols are kept in the class file's modified UTF-8 encoding. */

use nom::branch::alt;
use nom::bytes::complete::{tag, take_while1};
use nom::character::complete::{char, one_of};
use nom::combinator::{map, value};
use nom::multi::{many0, many1};
use nom::sequence::{delimited, preceded, terminated};
use nom::{IResult, Parser};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use crate::bytecode::error::{BytecodeError, ErrorKind};

/// Coarse category of a value, as seen by the interpreter's operand stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BasicType {
    Boolean,
    Char,
    Float,
    Double,
    Byte,
    Short,
    Int,
    Long,
    Object,
    Array,
    Void,
    /// No value category applies, e.g. the result of a not-yet-resolved reference.
    Illegal,
}

impl BasicType {
    /// Maps a descriptor character to its category, `L` and `[` included.
    pub fn from_descriptor_char(c: char) -> Option<BasicType> {
        Some(match c {
            'Z' => BasicType::Boolean,
            'C' => BasicType::Char,
            'F' => BasicType::Float,
            'D' => BasicType::Double,
            'B' => BasicType::Byte,
            'S' => BasicType::Short,
            'I' => BasicType::Int,
            'J' => BasicType::Long,
            'L' => BasicType::Object,
            '[' => BasicType::Array,
            'V' => BasicType::Void,
            _ => return None,
        })
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, BasicType::Object | BasicType::Array)
    }

    /// Number of operand stack slots a value of this type takes.
    pub fn size(&self) -> usize {
        match self {
            BasicType::Long | BasicType::Double => 2,
            BasicType::Void | BasicType::Illegal => 0,
            _ => 1,
        }
    }
}

impl fmt::Display for BasicType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            BasicType::Boolean => "boolean",
            BasicType::Char => "char",
            BasicType::Float => "float",
            BasicType::Double => "double",
            BasicType::Byte => "byte",
            BasicType::Short => "short",
            BasicType::Int => "int",
            BasicType::Long => "long",
            BasicType::Object => "object",
            BasicType::Array => "array",
            BasicType::Void => "void",
            BasicType::Illegal => "illegal",
        };
        write!(f, "{}", s)
    }
}

/// Constant pool entry tags, numbered as in the class file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstantTag {
    /// Slot 0, and the unusable slot after a long or double.
    Invalid,
    Utf8,
    Integer,
    Float,
    Long,
    Double,
    Class,
    String,
    FieldRef,
    MethodRef,
    InterfaceMethodRef,
    NameAndType,
    MethodHandle,
    MethodType,
    InvokeDynamic,
}

impl ConstantTag {
    pub fn value(&self) -> u8 {
        match self {
            ConstantTag::Invalid => 0,
            ConstantTag::Utf8 => 1,
            ConstantTag::Integer => 3,
            ConstantTag::Float => 4,
            ConstantTag::Long => 5,
            ConstantTag::Double => 6,
            ConstantTag::Class => 7,
            ConstantTag::String => 8,
            ConstantTag::FieldRef => 9,
            ConstantTag::MethodRef => 10,
            ConstantTag::InterfaceMethodRef => 11,
            ConstantTag::NameAndType => 12,
            ConstantTag::MethodHandle => 15,
            ConstantTag::MethodType => 16,
            ConstantTag::InvokeDynamic => 18,
        }
    }

    /// Category of the value a load-constant instruction pushes for this tag.
    pub fn basic_type(&self) -> BasicType {
        match self {
            ConstantTag::Integer => BasicType::Int,
            ConstantTag::Float => BasicType::Float,
            ConstantTag::Long => BasicType::Long,
            ConstantTag::Double => BasicType::Double,
            ConstantTag::String
            | ConstantTag::Class
            | ConstantTag::MethodHandle
            | ConstantTag::MethodType => BasicType::Object,
            _ => BasicType::Illegal,
        }
    }

    /// True for the entries a load-constant can only materialize through the cache.
    pub fn is_executable_reference(&self) -> bool {
        matches!(self, ConstantTag::MethodHandle | ConstantTag::MethodType)
    }
}

/// An interned name or descriptor, stored as modified UTF-8 bytes.
///
/// Cloning is cheap; the bytes are shared.
///
/// # Examples
///
/// ```
/// use jvmcode::types::Symbol;
///
/// let s = Symbol::new("caf\u{e9}\0");
/// // NUL is encoded as two bytes in modified UTF-8
/// assert_eq!(s.as_bytes().len(), 7);
/// assert_eq!(s.to_str().unwrap(), "caf\u{e9}\0");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(Arc<[u8]>);

impl Symbol {
    pub fn new(s: &str) -> Symbol {
        Symbol(Arc::from(&*cesu8::to_java_cesu8(s)))
    }

    /// Wraps bytes taken straight from a class file.
    pub fn from_modified_utf8(bytes: &[u8]) -> Result<Symbol, BytecodeError> {
        match cesu8::from_java_cesu8(bytes) {
            Ok(_) => Ok(Symbol(Arc::from(bytes))),
            Err(_) => fail!(ErrorKind::Malformed, "invalid modified UTF-8 in symbol"),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_str(&self) -> Result<Cow<'_, str>, BytecodeError> {
        cesu8::from_java_cesu8(&self.0)
            .map_err(|_| BytecodeError::with_kind(ErrorKind::Malformed, "invalid modified UTF-8 in symbol"))
    }

    pub fn to_string_lossy(&self) -> String {
        match self.to_str() {
            Ok(s) => s.into_owned(),
            Err(_) => String::from_utf8_lossy(&self.0).into_owned(),
        }
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Symbol::new(s)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_string_lossy())
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Symbol({:?})", self.to_string_lossy())
    }
}

// Descriptor scanning. Only the category matters here, so object and array
// element types are consumed without being kept.

fn parse_object_type(d: &str) -> IResult<&str, BasicType> {
    value(
        BasicType::Object,
        delimited(char('L'), take_while1(|c: char| c != ';'), char(';')),
    )
    .parse(d)
}

fn parse_array_type(d: &str) -> IResult<&str, BasicType> {
    value(
        BasicType::Array,
        preceded(many1(char('[')), alt((parse_object_type, parse_primitive_type))),
    )
    .parse(d)
}

fn parse_primitive_type(d: &str) -> IResult<&str, BasicType> {
    map(one_of("ZCFDBSIJ"), |c| {
        BasicType::from_descriptor_char(c).unwrap_or(BasicType::Illegal)
    })
    .parse(d)
}

pub(crate) fn parse_field_type(d: &str) -> IResult<&str, BasicType> {
    alt((parse_object_type, parse_array_type, parse_primitive_type)).parse(d)
}

fn parse_return_type(d: &str) -> IResult<&str, BasicType> {
    alt((value(BasicType::Void, char('V')), parse_field_type)).parse(d)
}

/// Parses a method descriptor into its parameter categories and result category.
pub(crate) fn parse_method_descriptor(d: &str) -> IResult<&str, (Vec<BasicType>, BasicType)> {
    let (o, args) = delimited(tag("("), many0(parse_field_type), tag(")")).parse(d)?;
    let (o, result) = parse_return_type(o)?;
    Ok((o, (args, result)))
}

/// Category of the value a member reference produces: the return type of a method
/// descriptor, or the type of a field descriptor.
///
/// # Examples
///
/// ```
/// use jvmcode::types::{result_type_of, BasicType};
///
/// assert_eq!(result_type_of("(I[Ljava/lang/String;)J").unwrap(), BasicType::Long);
/// assert_eq!(result_type_of("[[I").unwrap(), BasicType::Array);
/// ```
pub fn result_type_of(descriptor: &str) -> Result<BasicType, BytecodeError> {
    let parsed = if descriptor.starts_with('(') {
        terminated(parse_method_descriptor, nom::combinator::eof)
            .parse(descriptor)
            .map(|(o, (_, result))| (o, result))
    } else {
        terminated(parse_field_type, nom::combinator::eof).parse(descriptor)
    };
    match parsed {
        Ok((_, t)) => Ok(t),
        Err(_) => fail!(ErrorKind::Malformed, ("malformed descriptor {}", descriptor)),
    }
}

/// Operand stack slots taken by the parameters of a method descriptor, receiver excluded.
pub fn parameter_size_of(descriptor: &str) -> Result<usize, BytecodeError> {
    match parse_method_descriptor(descriptor) {
        Ok(("", (args, _))) => Ok(args.iter().map(BasicType::size).sum()),
        _ => fail!(ErrorKind::Malformed, ("malformed method descriptor {}", descriptor)),
    }
}
