use std::fmt;

macro_rules! err {
    ($base:ident, $msg:literal) => {
        BytecodeError::with_context($base, $msg.to_string())
    };
    ($base:ident, $fmtstr:literal, $($args:tt)*) => {
        BytecodeError::with_context($base, format!($fmtstr, $($args)*))
    };
    ($kind:path, ($fmtstr:literal, $($args:tt)*)) => {
        BytecodeError::with_kind($kind, &format!($fmtstr, $($args)*))
    };
    ($msg:literal) => {
        BytecodeError::new($msg)
    };
    ($fmtstr:literal, $($args:tt)*) => {
        BytecodeError::new(&format!($fmtstr, $($args)*))
    };
}


#[macro_export]
macro_rules! fail {
    ($msg:literal) => {
        return Err($crate::bytecode::error::BytecodeError::new($msg))
    };
    ($kind:path, $msg:literal) => {
        return Err($crate::bytecode::error::BytecodeError::with_kind($kind, $msg))
    };
    ($kind:path, ($fmtstr:literal, $($args:tt)*)) => {
        return Err($crate::bytecode::error::BytecodeError::with_kind($kind, &format!($fmtstr, $($args)*)))
    };
    ($fmtstr:literal, $($args:tt)*) => {
        return Err($crate::bytecode::error::BytecodeError::new(&format!($fmtstr, $($args)*)))
    };
}

/// Assertion that only fires in checked builds (debug builds, or with the `checked` feature).
/// These guard format/caller contracts that a verified instruction stream never breaks.
macro_rules! checked_assert {
    ($cond:expr, $($args:tt)+) => {
        if $crate::bytecode::CHECKED {
            assert!($cond, $($args)+);
        }
    };
}


/// Broad classification of a failure, so the interpreter can pick the runtime-level
/// error it raises at the call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind
{
    /// Pool or cache index out of range, or an entry with an unexpected tag.
    Lookup,
    /// The view was built over bare code with no owning method.
    Unbound,
    Linkage,
    IncompatibleClassChange,
    /// A descriptor or symbol that could not be parsed.
    Malformed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BytecodeError
{
    kind: ErrorKind,
    msg: String,
    contexts: Vec<String>,
}

impl BytecodeError
{
    pub fn new(msg: &str) -> Self
    {
        BytecodeError::with_kind(ErrorKind::Lookup, msg)
    }

    pub fn with_kind(kind: ErrorKind, msg: &str) -> Self
    {
        BytecodeError {
            kind,
            msg: msg.to_string(),
            contexts: Vec::new(),
        }
    }

    pub fn linkage(msg: &str) -> Self
    {
        BytecodeError::with_kind(ErrorKind::Linkage, msg)
    }

    pub fn incompatible_change(msg: &str) -> Self
    {
        BytecodeError::with_kind(ErrorKind::IncompatibleClassChange, msg)
    }

    pub fn with_context(base: BytecodeError, context: String) -> Self
    {
        let mut contexts = base.contexts;
        contexts.push(context);
        BytecodeError { kind: base.kind, msg: base.msg, contexts }
    }

    pub fn kind(&self) -> ErrorKind
    {
        self.kind
    }

    pub fn message(&self) -> &str
    {
        &self.msg
    }
}

impl fmt::Display for BytecodeError
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "{}", self.msg)?;
        let mut connector = " for ";
        for context in &self.contexts
        {
            write!(f, "{}{}", connector, context)?;
            connector = " of ";
        }
        Ok(())
    }
}

impl std::error::Error for BytecodeError {}
