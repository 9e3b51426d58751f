use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

/// A method's instruction bytes, shared by every thread executing the method.
///
/// Operand bytes are plain relaxed loads. Opcode bytes are loaded with acquire and
/// patched with release, so a reader that sees a rewritten opcode also sees whatever
/// the rewriter published before patching it (the resolved cache entry).
pub struct CodeBuffer {
    bytes: Box<[AtomicU8]>,
}

impl CodeBuffer {
    pub fn new(bytes: &[u8]) -> Self {
        CodeBuffer {
            bytes: bytes.iter().map(|b| AtomicU8::new(*b)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[inline]
    pub fn byte_at(&self, at: usize) -> u8 {
        self.bytes[at].load(Ordering::Relaxed)
    }

    #[inline]
    pub fn opcode_byte_at(&self, bci: usize) -> u8 {
        self.bytes[bci].load(Ordering::Acquire)
    }

    /// Replaces the opcode byte of the instruction at `bci` in place.
    ///
    /// Only length-preserving rewrites are allowed: the new opcode must have the same
    /// layout as the old one. Storing the same byte twice is harmless.
    pub fn patch_opcode(&self, bci: usize, opcode: u8) {
        self.bytes[bci].store(opcode, Ordering::Release);
    }

    /// Exclusive write, used by link-time rewriting before the code is shared.
    pub fn set_byte(&mut self, at: usize, val: u8) {
        *self.bytes[at].get_mut() = val;
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.bytes.iter().map(|b| b.load(Ordering::Relaxed)).collect()
    }
}

impl From<Vec<u8>> for CodeBuffer {
    fn from(bytes: Vec<u8>) -> Self {
        CodeBuffer::new(&bytes)
    }
}

impl fmt::Debug for CodeBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CodeBuffer(")?;
        for (i, b) in self.to_vec().iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{:02x}", b)?;
        }
        write!(f, ")")
    }
}
