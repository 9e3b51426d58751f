use crate::bytecode::cursor::InstructionCursor;
use crate::bytecode::format::FormatTable;
use crate::runtime::Method;
use log::warn;

/// Walks a method's code one instruction at a time, starting at bci 0 or at a bci
/// known to start an instruction.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use jvmcode::bytecode::stream::InstructionStream;
/// use jvmcode::runtime::memory::InMemoryPool;
/// use jvmcode::runtime::Method;
///
/// let pool = Arc::new(InMemoryPool::builder().build());
/// // bipush 7; istore 1; iinc 1 1; return
/// let code = vec![0x10, 0x07, 0x36, 0x01, 0x84, 0x01, 0x01, 0xb1];
/// let method = Method::new("Demo", "count", "()V", code, pool);
/// let bcis: Vec<usize> = InstructionStream::new(&method).map(|c| c.bci()).collect();
/// assert_eq!(bcis, vec![0, 2, 4, 7]);
/// ```
pub struct InstructionStream<'m> {
    method: &'m Method,
    formats: &'m FormatTable,
    next_bci: usize,
    end_bci: usize,
}

impl<'m> InstructionStream<'m> {
    pub fn new(method: &'m Method) -> Self {
        InstructionStream::starting_at(method, 0)
    }

    pub fn starting_at(method: &'m Method, bci: usize) -> Self {
        InstructionStream {
            method,
            formats: FormatTable::global(),
            next_bci: bci,
            end_bci: method.code_size(),
        }
    }

    /// Stops the walk before `end_bci`.
    pub fn with_limit(mut self, end_bci: usize) -> Self {
        self.end_bci = end_bci.min(self.method.code_size());
        self
    }

    pub fn next_bci(&self) -> usize {
        self.next_bci
    }
}

impl<'m> Iterator for InstructionStream<'m> {
    type Item = InstructionCursor<'m>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_bci >= self.end_bci {
            return None;
        }
        let cursor = InstructionCursor::with_formats(self.method, self.next_bci, self.formats);
        // a truncated trailing instruction ends the walk
        let Some(len) = cursor.checked_length() else {
            warn!("{}: instruction at bci {} runs past the end of the code", self.method, self.next_bci);
            self.next_bci = self.end_bci;
            return None;
        };
        self.next_bci += len;
        Some(cursor)
    }
}
