use crate::types::BasicType;

/// A single instruction kind. Java codes occupy `0x00..=0xc9`, `breakpoint` is `0xca`,
/// and the runtime's rewritten "fast" forms follow it.
///
/// Any byte value can be wrapped; only values known to the format table are defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Opcode(pub u8);

impl Opcode {
    /// First code past the standard instruction set.
    pub const NUMBER_OF_JAVA_CODES: u8 = 0xcb;
    /// First code past every defined opcode.
    pub const NUMBER_OF_CODES: u8 = 0xe9;

    #[inline]
    pub fn byte(self) -> u8 {
        self.0
    }

    /// True for the runtime-private forms produced by rewriting.
    #[inline]
    pub fn is_fast(self) -> bool {
        self.0 >= Opcode::NUMBER_OF_JAVA_CODES
    }
}

/// Static description of one opcode, the raw material of the `FormatTable`.
///
/// `format` and `wide_format` spell the instruction layout one character per byte:
/// `b` opcode, `w` wide prefix, `c` signed constant, `i` local index, `k` pool index,
/// `j` cache index, `o` branch offset, `_` unused. Upper case marks native byte
/// order. An empty format means the instruction has no fixed length.
#[derive(Debug, Clone)]
pub struct OpcodeDef {
    pub code: Opcode,
    pub name: &'static str,
    pub format: &'static str,
    pub wide_format: Option<&'static str>,
    pub result_type: BasicType,
    pub can_trap: bool,
    pub java_code: Opcode,
    pub can_rewrite: bool,
}

macro_rules! define_opcodes {
    ($(
        $konst:ident = $value:literal, $name:literal, $format:literal, $wide:expr,
        $result:ident, $trap:literal, $java:ident, $rewrite:literal;
    )*) => {
        impl Opcode {
            $( pub const $konst: Opcode = Opcode($value); )*
        }

        pub(crate) static OPCODE_DEFS: &[OpcodeDef] = &[
            $(
                OpcodeDef {
                    code: Opcode($value),
                    name: $name,
                    format: $format,
                    wide_format: $wide,
                    result_type: BasicType::$result,
                    can_trap: $trap,
                    java_code: Opcode::$java,
                    can_rewrite: $rewrite,
                },
            )*
        ];
    };
}

// code = value, name, format, wide format, result type, can trap, java code, can rewrite
define_opcodes! {
    NOP                       = 0x00, "nop", "b", None, Void, false, NOP, false;
    ACONST_NULL               = 0x01, "aconst_null", "b", None, Object, false, ACONST_NULL, false;
    ICONST_M1                 = 0x02, "iconst_m1", "b", None, Int, false, ICONST_M1, false;
    ICONST_0                  = 0x03, "iconst_0", "b", None, Int, false, ICONST_0, false;
    ICONST_1                  = 0x04, "iconst_1", "b", None, Int, false, ICONST_1, false;
    ICONST_2                  = 0x05, "iconst_2", "b", None, Int, false, ICONST_2, false;
    ICONST_3                  = 0x06, "iconst_3", "b", None, Int, false, ICONST_3, false;
    ICONST_4                  = 0x07, "iconst_4", "b", None, Int, false, ICONST_4, false;
    ICONST_5                  = 0x08, "iconst_5", "b", None, Int, false, ICONST_5, false;
    LCONST_0                  = 0x09, "lconst_0", "b", None, Long, false, LCONST_0, false;
    LCONST_1                  = 0x0a, "lconst_1", "b", None, Long, false, LCONST_1, false;
    FCONST_0                  = 0x0b, "fconst_0", "b", None, Float, false, FCONST_0, false;
    FCONST_1                  = 0x0c, "fconst_1", "b", None, Float, false, FCONST_1, false;
    FCONST_2                  = 0x0d, "fconst_2", "b", None, Float, false, FCONST_2, false;
    DCONST_0                  = 0x0e, "dconst_0", "b", None, Double, false, DCONST_0, false;
    DCONST_1                  = 0x0f, "dconst_1", "b", None, Double, false, DCONST_1, false;
    BIPUSH                    = 0x10, "bipush", "bc", None, Int, false, BIPUSH, false;
    SIPUSH                    = 0x11, "sipush", "bcc", None, Int, false, SIPUSH, false;
    LDC                       = 0x12, "ldc", "bk", None, Illegal, true, LDC, true;
    LDC_W                     = 0x13, "ldc_w", "bkk", None, Illegal, true, LDC_W, true;
    LDC2_W                    = 0x14, "ldc2_w", "bkk", None, Illegal, true, LDC2_W, false;
    ILOAD                     = 0x15, "iload", "bi", Some("wbii"), Int, false, ILOAD, true;
    LLOAD                     = 0x16, "lload", "bi", Some("wbii"), Long, false, LLOAD, false;
    FLOAD                     = 0x17, "fload", "bi", Some("wbii"), Float, false, FLOAD, false;
    DLOAD                     = 0x18, "dload", "bi", Some("wbii"), Double, false, DLOAD, false;
    ALOAD                     = 0x19, "aload", "bi", Some("wbii"), Object, false, ALOAD, false;
    ILOAD_0                   = 0x1a, "iload_0", "b", None, Int, false, ILOAD_0, false;
    ILOAD_1                   = 0x1b, "iload_1", "b", None, Int, false, ILOAD_1, false;
    ILOAD_2                   = 0x1c, "iload_2", "b", None, Int, false, ILOAD_2, false;
    ILOAD_3                   = 0x1d, "iload_3", "b", None, Int, false, ILOAD_3, false;
    LLOAD_0                   = 0x1e, "lload_0", "b", None, Long, false, LLOAD_0, false;
    LLOAD_1                   = 0x1f, "lload_1", "b", None, Long, false, LLOAD_1, false;
    LLOAD_2                   = 0x20, "lload_2", "b", None, Long, false, LLOAD_2, false;
    LLOAD_3                   = 0x21, "lload_3", "b", None, Long, false, LLOAD_3, false;
    FLOAD_0                   = 0x22, "fload_0", "b", None, Float, false, FLOAD_0, false;
    FLOAD_1                   = 0x23, "fload_1", "b", None, Float, false, FLOAD_1, false;
    FLOAD_2                   = 0x24, "fload_2", "b", None, Float, false, FLOAD_2, false;
    FLOAD_3                   = 0x25, "fload_3", "b", None, Float, false, FLOAD_3, false;
    DLOAD_0                   = 0x26, "dload_0", "b", None, Double, false, DLOAD_0, false;
    DLOAD_1                   = 0x27, "dload_1", "b", None, Double, false, DLOAD_1, false;
    DLOAD_2                   = 0x28, "dload_2", "b", None, Double, false, DLOAD_2, false;
    DLOAD_3                   = 0x29, "dload_3", "b", None, Double, false, DLOAD_3, false;
    ALOAD_0                   = 0x2a, "aload_0", "b", None, Object, false, ALOAD_0, true;
    ALOAD_1                   = 0x2b, "aload_1", "b", None, Object, false, ALOAD_1, false;
    ALOAD_2                   = 0x2c, "aload_2", "b", None, Object, false, ALOAD_2, false;
    ALOAD_3                   = 0x2d, "aload_3", "b", None, Object, false, ALOAD_3, false;
    IALOAD                    = 0x2e, "iaload", "b", None, Int, true, IALOAD, false;
    LALOAD                    = 0x2f, "laload", "b", None, Long, true, LALOAD, false;
    FALOAD                    = 0x30, "faload", "b", None, Float, true, FALOAD, false;
    DALOAD                    = 0x31, "daload", "b", None, Double, true, DALOAD, false;
    AALOAD                    = 0x32, "aaload", "b", None, Object, true, AALOAD, false;
    BALOAD                    = 0x33, "baload", "b", None, Int, true, BALOAD, false;
    CALOAD                    = 0x34, "caload", "b", None, Char, true, CALOAD, false;
    SALOAD                    = 0x35, "saload", "b", None, Short, true, SALOAD, false;
    ISTORE                    = 0x36, "istore", "bi", Some("wbii"), Void, false, ISTORE, false;
    LSTORE                    = 0x37, "lstore", "bi", Some("wbii"), Void, false, LSTORE, false;
    FSTORE                    = 0x38, "fstore", "bi", Some("wbii"), Void, false, FSTORE, false;
    DSTORE                    = 0x39, "dstore", "bi", Some("wbii"), Void, false, DSTORE, false;
    ASTORE                    = 0x3a, "astore", "bi", Some("wbii"), Void, false, ASTORE, false;
    ISTORE_0                  = 0x3b, "istore_0", "b", None, Void, false, ISTORE_0, false;
    ISTORE_1                  = 0x3c, "istore_1", "b", None, Void, false, ISTORE_1, false;
    ISTORE_2                  = 0x3d, "istore_2", "b", None, Void, false, ISTORE_2, false;
    ISTORE_3                  = 0x3e, "istore_3", "b", None, Void, false, ISTORE_3, false;
    LSTORE_0                  = 0x3f, "lstore_0", "b", None, Void, false, LSTORE_0, false;
    LSTORE_1                  = 0x40, "lstore_1", "b", None, Void, false, LSTORE_1, false;
    LSTORE_2                  = 0x41, "lstore_2", "b", None, Void, false, LSTORE_2, false;
    LSTORE_3                  = 0x42, "lstore_3", "b", None, Void, false, LSTORE_3, false;
    FSTORE_0                  = 0x43, "fstore_0", "b", None, Void, false, FSTORE_0, false;
    FSTORE_1                  = 0x44, "fstore_1", "b", None, Void, false, FSTORE_1, false;
    FSTORE_2                  = 0x45, "fstore_2", "b", None, Void, false, FSTORE_2, false;
    FSTORE_3                  = 0x46, "fstore_3", "b", None, Void, false, FSTORE_3, false;
    DSTORE_0                  = 0x47, "dstore_0", "b", None, Void, false, DSTORE_0, false;
    DSTORE_1                  = 0x48, "dstore_1", "b", None, Void, false, DSTORE_1, false;
    DSTORE_2                  = 0x49, "dstore_2", "b", None, Void, false, DSTORE_2, false;
    DSTORE_3                  = 0x4a, "dstore_3", "b", None, Void, false, DSTORE_3, false;
    ASTORE_0                  = 0x4b, "astore_0", "b", None, Void, false, ASTORE_0, false;
    ASTORE_1                  = 0x4c, "astore_1", "b", None, Void, false, ASTORE_1, false;
    ASTORE_2                  = 0x4d, "astore_2", "b", None, Void, false, ASTORE_2, false;
    ASTORE_3                  = 0x4e, "astore_3", "b", None, Void, false, ASTORE_3, false;
    IASTORE                   = 0x4f, "iastore", "b", None, Void, true, IASTORE, false;
    LASTORE                   = 0x50, "lastore", "b", None, Void, true, LASTORE, false;
    FASTORE                   = 0x51, "fastore", "b", None, Void, true, FASTORE, false;
    DASTORE                   = 0x52, "dastore", "b", None, Void, true, DASTORE, false;
    AASTORE                   = 0x53, "aastore", "b", None, Void, true, AASTORE, false;
    BASTORE                   = 0x54, "bastore", "b", None, Void, true, BASTORE, false;
    CASTORE                   = 0x55, "castore", "b", None, Void, true, CASTORE, false;
    SASTORE                   = 0x56, "sastore", "b", None, Void, true, SASTORE, false;
    POP                       = 0x57, "pop", "b", None, Void, false, POP, false;
    POP2                      = 0x58, "pop2", "b", None, Void, false, POP2, false;
    DUP                       = 0x59, "dup", "b", None, Void, false, DUP, false;
    DUP_X1                    = 0x5a, "dup_x1", "b", None, Void, false, DUP_X1, false;
    DUP_X2                    = 0x5b, "dup_x2", "b", None, Void, false, DUP_X2, false;
    DUP2                      = 0x5c, "dup2", "b", None, Void, false, DUP2, false;
    DUP2_X1                   = 0x5d, "dup2_x1", "b", None, Void, false, DUP2_X1, false;
    DUP2_X2                   = 0x5e, "dup2_x2", "b", None, Void, false, DUP2_X2, false;
    SWAP                      = 0x5f, "swap", "b", None, Void, false, SWAP, false;
    IADD                      = 0x60, "iadd", "b", None, Int, false, IADD, false;
    LADD                      = 0x61, "ladd", "b", None, Long, false, LADD, false;
    FADD                      = 0x62, "fadd", "b", None, Float, false, FADD, false;
    DADD                      = 0x63, "dadd", "b", None, Double, false, DADD, false;
    ISUB                      = 0x64, "isub", "b", None, Int, false, ISUB, false;
    LSUB                      = 0x65, "lsub", "b", None, Long, false, LSUB, false;
    FSUB                      = 0x66, "fsub", "b", None, Float, false, FSUB, false;
    DSUB                      = 0x67, "dsub", "b", None, Double, false, DSUB, false;
    IMUL                      = 0x68, "imul", "b", None, Int, false, IMUL, false;
    LMUL                      = 0x69, "lmul", "b", None, Long, false, LMUL, false;
    FMUL                      = 0x6a, "fmul", "b", None, Float, false, FMUL, false;
    DMUL                      = 0x6b, "dmul", "b", None, Double, false, DMUL, false;
    IDIV                      = 0x6c, "idiv", "b", None, Int, true, IDIV, false;
    LDIV                      = 0x6d, "ldiv", "b", None, Long, true, LDIV, false;
    FDIV                      = 0x6e, "fdiv", "b", None, Float, false, FDIV, false;
    DDIV                      = 0x6f, "ddiv", "b", None, Double, false, DDIV, false;
    IREM                      = 0x70, "irem", "b", None, Int, true, IREM, false;
    LREM                      = 0x71, "lrem", "b", None, Long, true, LREM, false;
    FREM                      = 0x72, "frem", "b", None, Float, false, FREM, false;
    DREM                      = 0x73, "drem", "b", None, Double, false, DREM, false;
    INEG                      = 0x74, "ineg", "b", None, Int, false, INEG, false;
    LNEG                      = 0x75, "lneg", "b", None, Long, false, LNEG, false;
    FNEG                      = 0x76, "fneg", "b", None, Float, false, FNEG, false;
    DNEG                      = 0x77, "dneg", "b", None, Double, false, DNEG, false;
    ISHL                      = 0x78, "ishl", "b", None, Int, false, ISHL, false;
    LSHL                      = 0x79, "lshl", "b", None, Long, false, LSHL, false;
    ISHR                      = 0x7a, "ishr", "b", None, Int, false, ISHR, false;
    LSHR                      = 0x7b, "lshr", "b", None, Long, false, LSHR, false;
    IUSHR                     = 0x7c, "iushr", "b", None, Int, false, IUSHR, false;
    LUSHR                     = 0x7d, "lushr", "b", None, Long, false, LUSHR, false;
    IAND                      = 0x7e, "iand", "b", None, Int, false, IAND, false;
    LAND                      = 0x7f, "land", "b", None, Long, false, LAND, false;
    IOR                       = 0x80, "ior", "b", None, Int, false, IOR, false;
    LOR                       = 0x81, "lor", "b", None, Long, false, LOR, false;
    IXOR                      = 0x82, "ixor", "b", None, Int, false, IXOR, false;
    LXOR                      = 0x83, "lxor", "b", None, Long, false, LXOR, false;
    IINC                      = 0x84, "iinc", "bic", Some("wbiicc"), Void, false, IINC, false;
    I2L                       = 0x85, "i2l", "b", None, Long, false, I2L, false;
    I2F                       = 0x86, "i2f", "b", None, Float, false, I2F, false;
    I2D                       = 0x87, "i2d", "b", None, Double, false, I2D, false;
    L2I                       = 0x88, "l2i", "b", None, Int, false, L2I, false;
    L2F                       = 0x89, "l2f", "b", None, Float, false, L2F, false;
    L2D                       = 0x8a, "l2d", "b", None, Double, false, L2D, false;
    F2I                       = 0x8b, "f2i", "b", None, Int, false, F2I, false;
    F2L                       = 0x8c, "f2l", "b", None, Long, false, F2L, false;
    F2D                       = 0x8d, "f2d", "b", None, Double, false, F2D, false;
    D2I                       = 0x8e, "d2i", "b", None, Int, false, D2I, false;
    D2L                       = 0x8f, "d2l", "b", None, Long, false, D2L, false;
    D2F                       = 0x90, "d2f", "b", None, Float, false, D2F, false;
    I2B                       = 0x91, "i2b", "b", None, Byte, false, I2B, false;
    I2C                       = 0x92, "i2c", "b", None, Char, false, I2C, false;
    I2S                       = 0x93, "i2s", "b", None, Short, false, I2S, false;
    LCMP                      = 0x94, "lcmp", "b", None, Int, false, LCMP, false;
    FCMPL                     = 0x95, "fcmpl", "b", None, Int, false, FCMPL, false;
    FCMPG                     = 0x96, "fcmpg", "b", None, Int, false, FCMPG, false;
    DCMPL                     = 0x97, "dcmpl", "b", None, Int, false, DCMPL, false;
    DCMPG                     = 0x98, "dcmpg", "b", None, Int, false, DCMPG, false;
    IFEQ                      = 0x99, "ifeq", "boo", None, Void, false, IFEQ, false;
    IFNE                      = 0x9a, "ifne", "boo", None, Void, false, IFNE, false;
    IFLT                      = 0x9b, "iflt", "boo", None, Void, false, IFLT, false;
    IFGE                      = 0x9c, "ifge", "boo", None, Void, false, IFGE, false;
    IFGT                      = 0x9d, "ifgt", "boo", None, Void, false, IFGT, false;
    IFLE                      = 0x9e, "ifle", "boo", None, Void, false, IFLE, false;
    IF_ICMPEQ                 = 0x9f, "if_icmpeq", "boo", None, Void, false, IF_ICMPEQ, false;
    IF_ICMPNE                 = 0xa0, "if_icmpne", "boo", None, Void, false, IF_ICMPNE, false;
    IF_ICMPLT                 = 0xa1, "if_icmplt", "boo", None, Void, false, IF_ICMPLT, false;
    IF_ICMPGE                 = 0xa2, "if_icmpge", "boo", None, Void, false, IF_ICMPGE, false;
    IF_ICMPGT                 = 0xa3, "if_icmpgt", "boo", None, Void, false, IF_ICMPGT, false;
    IF_ICMPLE                 = 0xa4, "if_icmple", "boo", None, Void, false, IF_ICMPLE, false;
    IF_ACMPEQ                 = 0xa5, "if_acmpeq", "boo", None, Void, false, IF_ACMPEQ, false;
    IF_ACMPNE                 = 0xa6, "if_acmpne", "boo", None, Void, false, IF_ACMPNE, false;
    GOTO                      = 0xa7, "goto", "boo", None, Void, false, GOTO, false;
    JSR                       = 0xa8, "jsr", "boo", None, Int, false, JSR, false;
    RET                       = 0xa9, "ret", "bi", Some("wbii"), Void, false, RET, false;
    TABLESWITCH               = 0xaa, "tableswitch", "", None, Void, false, TABLESWITCH, false;
    LOOKUPSWITCH              = 0xab, "lookupswitch", "", None, Void, false, LOOKUPSWITCH, true;
    IRETURN                   = 0xac, "ireturn", "b", None, Int, true, IRETURN, false;
    LRETURN                   = 0xad, "lreturn", "b", None, Long, true, LRETURN, false;
    FRETURN                   = 0xae, "freturn", "b", None, Float, true, FRETURN, false;
    DRETURN                   = 0xaf, "dreturn", "b", None, Double, true, DRETURN, false;
    ARETURN                   = 0xb0, "areturn", "b", None, Object, true, ARETURN, false;
    RETURN                    = 0xb1, "return", "b", None, Void, true, RETURN, true;
    GETSTATIC                 = 0xb2, "getstatic", "bJJ", None, Illegal, true, GETSTATIC, true;
    PUTSTATIC                 = 0xb3, "putstatic", "bJJ", None, Illegal, true, PUTSTATIC, true;
    GETFIELD                  = 0xb4, "getfield", "bJJ", None, Illegal, true, GETFIELD, true;
    PUTFIELD                  = 0xb5, "putfield", "bJJ", None, Illegal, true, PUTFIELD, true;
    INVOKEVIRTUAL             = 0xb6, "invokevirtual", "bJJ", None, Illegal, true, INVOKEVIRTUAL, true;
    INVOKESPECIAL             = 0xb7, "invokespecial", "bJJ", None, Illegal, true, INVOKESPECIAL, true;
    INVOKESTATIC              = 0xb8, "invokestatic", "bJJ", None, Illegal, true, INVOKESTATIC, true;
    INVOKEINTERFACE           = 0xb9, "invokeinterface", "bJJ__", None, Illegal, true, INVOKEINTERFACE, true;
    INVOKEDYNAMIC             = 0xba, "invokedynamic", "bJJJJ", None, Illegal, true, INVOKEDYNAMIC, true;
    NEW                       = 0xbb, "new", "bkk", None, Object, true, NEW, true;
    NEWARRAY                  = 0xbc, "newarray", "bc", None, Object, true, NEWARRAY, false;
    ANEWARRAY                 = 0xbd, "anewarray", "bkk", None, Object, true, ANEWARRAY, false;
    ARRAYLENGTH               = 0xbe, "arraylength", "b", None, Void, true, ARRAYLENGTH, false;
    ATHROW                    = 0xbf, "athrow", "b", None, Void, true, ATHROW, false;
    CHECKCAST                 = 0xc0, "checkcast", "bkk", None, Object, true, CHECKCAST, false;
    INSTANCEOF                = 0xc1, "instanceof", "bkk", None, Int, true, INSTANCEOF, false;
    MONITORENTER              = 0xc2, "monitorenter", "b", None, Void, true, MONITORENTER, false;
    MONITOREXIT               = 0xc3, "monitorexit", "b", None, Void, true, MONITOREXIT, false;
    WIDE                      = 0xc4, "wide", "", None, Void, false, WIDE, false;
    MULTIANEWARRAY            = 0xc5, "multianewarray", "bkkc", None, Object, true, MULTIANEWARRAY, false;
    IFNULL                    = 0xc6, "ifnull", "boo", None, Void, false, IFNULL, false;
    IFNONNULL                 = 0xc7, "ifnonnull", "boo", None, Void, false, IFNONNULL, false;
    GOTO_W                    = 0xc8, "goto_w", "boooo", None, Void, false, GOTO_W, false;
    JSR_W                     = 0xc9, "jsr_w", "boooo", None, Int, false, JSR_W, false;
    BREAKPOINT                = 0xca, "breakpoint", "", None, Void, true, BREAKPOINT, false;
    FAST_AGETFIELD            = 0xcb, "fast_agetfield", "bJJ", None, Object, true, GETFIELD, false;
    FAST_BGETFIELD            = 0xcc, "fast_bgetfield", "bJJ", None, Int, true, GETFIELD, false;
    FAST_CGETFIELD            = 0xcd, "fast_cgetfield", "bJJ", None, Char, true, GETFIELD, false;
    FAST_DGETFIELD            = 0xce, "fast_dgetfield", "bJJ", None, Double, true, GETFIELD, false;
    FAST_FGETFIELD            = 0xcf, "fast_fgetfield", "bJJ", None, Float, true, GETFIELD, false;
    FAST_IGETFIELD            = 0xd0, "fast_igetfield", "bJJ", None, Int, true, GETFIELD, false;
    FAST_LGETFIELD            = 0xd1, "fast_lgetfield", "bJJ", None, Long, true, GETFIELD, false;
    FAST_SGETFIELD            = 0xd2, "fast_sgetfield", "bJJ", None, Short, true, GETFIELD, false;
    FAST_APUTFIELD            = 0xd3, "fast_aputfield", "bJJ", None, Object, true, PUTFIELD, false;
    FAST_BPUTFIELD            = 0xd4, "fast_bputfield", "bJJ", None, Int, true, PUTFIELD, false;
    FAST_CPUTFIELD            = 0xd5, "fast_cputfield", "bJJ", None, Char, true, PUTFIELD, false;
    FAST_DPUTFIELD            = 0xd6, "fast_dputfield", "bJJ", None, Double, true, PUTFIELD, false;
    FAST_FPUTFIELD            = 0xd7, "fast_fputfield", "bJJ", None, Float, true, PUTFIELD, false;
    FAST_IPUTFIELD            = 0xd8, "fast_iputfield", "bJJ", None, Int, true, PUTFIELD, false;
    FAST_LPUTFIELD            = 0xd9, "fast_lputfield", "bJJ", None, Long, true, PUTFIELD, false;
    FAST_SPUTFIELD            = 0xda, "fast_sputfield", "bJJ", None, Short, true, PUTFIELD, false;
    FAST_ALOAD_0              = 0xdb, "fast_aload_0", "b", None, Object, false, ALOAD_0, false;
    FAST_IACCESS_0            = 0xdc, "fast_iaccess_0", "b_JJ", None, Int, true, ALOAD_0, false;
    FAST_AACCESS_0            = 0xdd, "fast_aaccess_0", "b_JJ", None, Object, true, ALOAD_0, false;
    FAST_FACCESS_0            = 0xde, "fast_faccess_0", "b_JJ", None, Object, true, ALOAD_0, false;
    FAST_ILOAD                = 0xdf, "fast_iload", "bi", None, Int, false, ILOAD, false;
    FAST_ILOAD2               = 0xe0, "fast_iload2", "bi_i", None, Int, false, ILOAD, false;
    FAST_ICALOAD              = 0xe1, "fast_icaload", "bi_", None, Int, false, ILOAD, false;
    FAST_INVOKEVFINAL         = 0xe2, "fast_invokevfinal", "bJJ", None, Illegal, true, INVOKEVIRTUAL, false;
    FAST_LINEARSWITCH         = 0xe3, "fast_linearswitch", "", None, Void, false, LOOKUPSWITCH, false;
    FAST_BINARYSWITCH         = 0xe4, "fast_binaryswitch", "", None, Void, false, LOOKUPSWITCH, false;
    FAST_ALDC                 = 0xe5, "fast_aldc", "bj", None, Object, true, LDC, false;
    FAST_ALDC_W               = 0xe6, "fast_aldc_w", "bJJ", None, Object, true, LDC_W, false;
    RETURN_REGISTER_FINALIZER = 0xe7, "return_register_finalizer", "b", None, Void, true, RETURN, false;
    SHOULDNOTREACHHERE        = 0xe8, "shouldnotreachhere", "b", None, Void, false, SHOULDNOTREACHHERE, false;
}
