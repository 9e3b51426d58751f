use crate::bytecode::cursor::{InstructionCursor, InstructionView};
use crate::bytecode::error::BytecodeError;
use crate::bytecode::format::OpcodeFamily;
use crate::bytecode::opcodes::Opcode;
use crate::runtime::Method;
use crate::types::Symbol;

/// View of the instructions naming a class through a java-order pool index:
/// `new`, `anewarray`, `checkcast`, `instanceof` and `multianewarray`.
pub struct TypeRefView<'m> {
    cursor: InstructionCursor<'m>,
    method: &'m Method,
}

impl<'m> TypeRefView<'m> {
    pub fn new(method: &'m Method, bci: usize) -> Self {
        let view = TypeRefView { cursor: InstructionCursor::new(method, bci), method };
        view.verify();
        view
    }

    pub fn index(&self) -> u16 {
        self.cursor.get_index_u2(self.raw_opcode(), false)
    }

    pub fn class_name(&self) -> Result<Symbol, BytecodeError> {
        self.method
            .constants()
            .klass_name_at(self.index())
            .map_err(|e| err!(e, "{} at bci {}", self.method, self.bci()))
    }

    /// Dimensions created by `multianewarray`, `None` for the other opcodes.
    pub fn dimensions(&self) -> Option<u8> {
        (self.opcode() == Opcode::MULTIANEWARRAY).then(|| self.cursor.byte_at(3))
    }
}

impl<'m> InstructionView<'m> for TypeRefView<'m> {
    fn cursor(&self) -> &InstructionCursor<'m> {
        &self.cursor
    }

    fn is_valid(&self) -> bool {
        self.cursor.formats().family(self.raw_opcode()) == OpcodeFamily::TypeReference
    }

    fn verify(&self) {
        checked_assert!(self.is_valid(), "not a type reference at bci {}", self.bci());
    }
}
