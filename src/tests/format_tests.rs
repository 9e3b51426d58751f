#[cfg(test)]
mod tests {
    use crate::bytecode::format::{compute_flags, FormatFlags, FormatTable, OpcodeFamily};
    use crate::bytecode::opcodes::{Opcode, OpcodeDef, OPCODE_DEFS};
    use crate::types::BasicType;

    fn field_width(format: &str) -> usize {
        // everything after the opcode byte, and after the wide prefix if there is one
        let skip = if format.starts_with('w') { 2 } else { 1 };
        format.len() - skip
    }

    #[test]
    fn lengths_match_field_widths() {
        let formats = FormatTable::global();
        for def in OPCODE_DEFS {
            let expected = (!def.format.is_empty()).then(|| 1 + field_width(def.format));
            assert_eq!(formats.length(def.code, false), expected, "{}", def.name);
            if let Some(wide) = def.wide_format {
                // opcode byte, wide prefix, then every field doubled
                let wide_len = formats.length(def.code, true).unwrap();
                assert_eq!(wide_len, 2 + field_width(wide), "{}", def.name);
                assert_eq!(wide_len, 2 * formats.length(def.code, false).unwrap(), "{}", def.name);
            } else {
                assert_eq!(formats.length(def.code, true), None, "{}", def.name);
            }
        }
    }

    #[test]
    fn well_known_lengths() {
        let formats = FormatTable::global();
        let cases = [
            (Opcode::NOP, 1),
            (Opcode::BIPUSH, 2),
            (Opcode::SIPUSH, 3),
            (Opcode::LDC, 2),
            (Opcode::LDC_W, 3),
            (Opcode::IINC, 3),
            (Opcode::GOTO, 3),
            (Opcode::GOTO_W, 5),
            (Opcode::GETFIELD, 3),
            (Opcode::INVOKEINTERFACE, 5),
            (Opcode::INVOKEDYNAMIC, 5),
            (Opcode::MULTIANEWARRAY, 4),
            (Opcode::FAST_ALDC, 2),
            (Opcode::FAST_IGETFIELD, 3),
        ];
        for (op, len) in cases {
            assert_eq!(formats.length(op, false), Some(len), "{}", formats.name(op));
        }
        assert_eq!(formats.length(Opcode::IINC, true), Some(6));
        assert_eq!(formats.length(Opcode::ILOAD, true), Some(4));
        assert_eq!(formats.length(Opcode::TABLESWITCH, false), None);
        assert_eq!(formats.length(Opcode::LOOKUPSWITCH, false), None);
    }

    #[test]
    fn flags_from_format_strings() {
        let none = FormatFlags::empty();
        assert_eq!(compute_flags("b", none).unwrap(), FormatFlags::FMT_B);
        assert_eq!(compute_flags("bc", none).unwrap(), FormatFlags::FMT_BC);
        assert_eq!(compute_flags("bi", none).unwrap(), FormatFlags::FMT_BI);
        assert_eq!(compute_flags("bkk", none).unwrap(), FormatFlags::FMT_BKK);
        assert_eq!(compute_flags("bJJ", none).unwrap(), FormatFlags::FMT_BJJ);
        assert_eq!(compute_flags("boo", none).unwrap(), FormatFlags::FMT_BO2);
        assert_eq!(compute_flags("boooo", none).unwrap(), FormatFlags::FMT_BO4);
        assert_eq!(compute_flags("", none).unwrap(), FormatFlags::NOT_SIMPLE);

        let wide = compute_flags("wbiicc", FormatFlags::CAN_TRAP).unwrap();
        assert!(wide.contains(FormatFlags::NOT_SIMPLE | FormatFlags::NOT_VARIABLE | FormatFlags::HAS_U2));
        assert!(wide.contains(FormatFlags::HAS_I | FormatFlags::HAS_C | FormatFlags::CAN_TRAP));

        // unused bytes are skipped, and a shorter last field is allowed
        assert_eq!(compute_flags("bJJ__", none).unwrap(), FormatFlags::FMT_BJJ);
        assert!(compute_flags("bkkc", none).unwrap().contains(FormatFlags::HAS_C | FormatFlags::HAS_K));
    }

    #[test]
    fn inconsistent_formats_are_rejected() {
        let none = FormatFlags::empty();
        for bad in ["x", "wc", "bkJ", "bkkk", "bckk", "bq"] {
            assert!(compute_flags(bad, none).is_err(), "{:?}", bad);
        }
    }

    #[test]
    fn fast_forms_collapse_to_java_codes() {
        let formats = FormatTable::global();
        assert_eq!(formats.java_code(Opcode::FAST_IGETFIELD), Opcode::GETFIELD);
        assert_eq!(formats.java_code(Opcode::FAST_SPUTFIELD), Opcode::PUTFIELD);
        assert_eq!(formats.java_code(Opcode::FAST_ALDC), Opcode::LDC);
        assert_eq!(formats.java_code(Opcode::FAST_ALDC_W), Opcode::LDC_W);
        assert_eq!(formats.java_code(Opcode::FAST_BINARYSWITCH), Opcode::LOOKUPSWITCH);
        assert_eq!(formats.java_code(Opcode::FAST_INVOKEVFINAL), Opcode::INVOKEVIRTUAL);
        assert_eq!(formats.java_code(Opcode::IADD), Opcode::IADD);

        for op in formats.opcodes() {
            let java = formats.java_code(op);
            if java != op {
                assert!(!java.is_fast(), "{} collapses to another fast form", formats.name(op));
            }
            assert_eq!(formats.java_code(java), java);
        }
    }

    #[test]
    fn every_code_is_defined() {
        let formats = FormatTable::global();
        assert_eq!(formats.opcodes().count(), Opcode::NUMBER_OF_CODES as usize);
        assert!(!formats.is_defined(Opcode(Opcode::NUMBER_OF_CODES)));
        assert_eq!(formats.name(Opcode::BREAKPOINT), "breakpoint");
        assert_eq!(formats.result_type(Opcode::FAST_LGETFIELD), BasicType::Long);
    }

    #[test]
    #[should_panic(expected = "invalid opcode 0xf0")]
    fn undefined_opcode_is_fatal() {
        FormatTable::global().length(Opcode(0xf0), false);
    }

    #[test]
    fn only_invokedynamic_has_wide_index() {
        let formats = FormatTable::global();
        let wide: Vec<Opcode> = formats.opcodes().filter(|op| formats.has_wide_index(*op)).collect();
        assert_eq!(wide, vec![Opcode::INVOKEDYNAMIC]);
    }

    #[test]
    fn rewritable_opcodes() {
        let formats = FormatTable::global();
        let rewritable: Vec<Opcode> = formats.opcodes().filter(|op| formats.can_rewrite(*op)).collect();
        assert_eq!(
            rewritable,
            vec![
                Opcode::LDC,
                Opcode::LDC_W,
                Opcode::ILOAD,
                Opcode::ALOAD_0,
                Opcode::LOOKUPSWITCH,
                Opcode::RETURN,
                Opcode::GETSTATIC,
                Opcode::PUTSTATIC,
                Opcode::GETFIELD,
                Opcode::PUTFIELD,
                Opcode::INVOKEVIRTUAL,
                Opcode::INVOKESPECIAL,
                Opcode::INVOKESTATIC,
                Opcode::INVOKEINTERFACE,
                Opcode::INVOKEDYNAMIC,
                Opcode::NEW,
            ]
        );
        assert!(formats.can_trap(Opcode::GETFIELD));
        assert!(!formats.can_trap(Opcode::IADD));
    }

    #[test]
    fn native_order_follows_case() {
        let formats = FormatTable::global();
        assert!(formats.native_byte_order(Opcode::INVOKEVIRTUAL, false));
        assert!(formats.native_byte_order(Opcode::FAST_ALDC_W, false));
        assert!(!formats.native_byte_order(Opcode::LDC_W, false));
        assert!(!formats.native_byte_order(Opcode::NEW, false));
        assert!(!formats.native_byte_order(Opcode::ILOAD, true));
    }

    #[test]
    fn families() {
        let formats = FormatTable::global();
        assert_eq!(formats.family(Opcode::LDC2_W), OpcodeFamily::LoadConstant);
        assert_eq!(formats.family(Opcode::FAST_ALDC), OpcodeFamily::LoadConstant);
        assert_eq!(formats.family(Opcode::FAST_AGETFIELD), OpcodeFamily::FieldAccess);
        assert_eq!(formats.family(Opcode::INVOKEINTERFACE), OpcodeFamily::Invoke);
        assert_eq!(formats.family(Opcode::INVOKEDYNAMIC), OpcodeFamily::DynamicInvoke);
        assert_eq!(formats.family(Opcode::MULTIANEWARRAY), OpcodeFamily::TypeReference);
        assert_eq!(formats.family(Opcode::FAST_LINEARSWITCH), OpcodeFamily::LookupSwitch);
        assert_eq!(formats.family(Opcode::IFEQ), OpcodeFamily::Branch);
        assert_eq!(formats.family(Opcode::GOTO_W), OpcodeFamily::Branch);
        assert_eq!(formats.family(Opcode::FAST_ALOAD_0), OpcodeFamily::Other);
        assert_eq!(formats.family(Opcode::NOP), OpcodeFamily::Other);
    }

    #[test]
    fn table_from_custom_definitions() {
        let defs = [
            OpcodeDef {
                code: Opcode::NOP,
                name: "nop",
                format: "b",
                wide_format: None,
                result_type: BasicType::Void,
                can_trap: false,
                java_code: Opcode::NOP,
                can_rewrite: false,
            },
            OpcodeDef {
                code: Opcode::NOP,
                name: "nop_again",
                format: "b",
                wide_format: None,
                result_type: BasicType::Void,
                can_trap: false,
                java_code: Opcode::NOP,
                can_rewrite: false,
            },
        ];
        let table = FormatTable::from_defs(&defs[..1]).unwrap();
        assert_eq!(table.opcodes().count(), 1);
        assert!(!table.is_defined(Opcode::IADD));

        let e = FormatTable::from_defs(&defs).err().unwrap();
        assert!(e.to_string().contains("defined twice"), "{}", e);

        let broken = [OpcodeDef { format: "bkJ", ..defs[0].clone() }];
        let e = FormatTable::from_defs(&broken).err().unwrap();
        assert!(e.to_string().contains("for opcode nop"), "{}", e);
    }
}
