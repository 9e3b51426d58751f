#[cfg(test)]
mod tests {
    use crate::bytecode::cursor::{InstructionCursor, InstructionView};
    use crate::bytecode::opcodes::Opcode;
    use crate::bytecode::switch::{LookupSwitchPair, LookupSwitchView, TableSwitchView};
    use crate::bytecode::{decode_at, DecodedView};
    use crate::runtime::memory::InMemoryPool;
    use crate::runtime::Method;
    use crate::tests::support::{unlinked_method, CodeAssembler};

    fn method_with(prefix: usize, build: impl FnOnce(&mut CodeAssembler)) -> Method {
        let mut a = CodeAssembler::new();
        for _ in 0..prefix {
            a.op(Opcode::NOP);
        }
        build(&mut a);
        a.op(Opcode::RETURN);
        unlinked_method(a.build(), InMemoryPool::builder().build())
    }

    #[test]
    fn table_lookup_is_direct() {
        // every padding amount, 0 to 3 bytes
        for prefix in 0..4 {
            let m = method_with(prefix, |a| {
                a.tableswitch(99, 2, &[10, 20, 30, 40]);
            });
            let view = TableSwitchView::new(InstructionCursor::new(&m, prefix));
            assert_eq!(view.default_offset(), 99);
            assert_eq!(view.low_key(), 2);
            assert_eq!(view.high_key(), 5);
            assert_eq!(view.length(), 4);
            assert_eq!(view.dest_offset_for(2), 10);
            assert_eq!(view.dest_offset_for(4), 30);
            assert_eq!(view.dest_offset_for(5), 40);
            assert_eq!(view.dest_offset_for(1), 99);
            assert_eq!(view.dest_offset_for(6), 99);
            assert_eq!(view.dest_offset_for(i32::MIN), 99);
            assert_eq!(view.dest_offset_at(1), 20);
        }
    }

    #[test]
    fn table_with_negative_keys() {
        let m = method_with(1, |a| {
            a.tableswitch(-8, -1, &[-4, 0, 4]);
        });
        let view = TableSwitchView::new(InstructionCursor::new(&m, 1));
        assert_eq!((view.low_key(), view.high_key()), (-1, 1));
        assert_eq!(view.dest_offset_for(-1), -4);
        assert_eq!(view.dest_offset_for(1), 4);
        assert_eq!(view.dest_offset_for(-2), -8);
    }

    #[test]
    fn table_at_offset_seven_starts_at_eight() {
        let m = method_with(7, |a| {
            a.tableswitch(0x0102_0304, 0, &[5]);
        });
        let cursor = InstructionCursor::new(&m, 7);
        assert_eq!(7 + cursor.aligned_offset(1), 8);
        // no padding: the default offset sits right at bci 8
        assert_eq!(m.code().to_vec()[8..12], [1, 2, 3, 4]);
        let view = TableSwitchView::new(cursor);
        assert_eq!(view.dest_offset_for(0), 5);
        assert_eq!(view.dest_offset_for(1), 0x0102_0304);
        assert_eq!(cursor.length(), 1 + 12 + 4);
    }

    #[test]
    fn sorted_pairs_verify() {
        let m = method_with(3, |a| {
            a.lookupswitch(-1, &[(1, 100), (5, 200), (9, 300)]);
        });
        let view = LookupSwitchView::new(InstructionCursor::new(&m, 3));
        assert_eq!(view.default_offset(), -1);
        assert_eq!(view.number_of_pairs(), 3);
        assert_eq!(view.pair_at(1), LookupSwitchPair { match_key: 5, offset: 200 });
        let keys: Vec<i32> = view.pairs().map(|p| p.match_key).collect();
        assert_eq!(keys, vec![1, 5, 9]);
    }

    #[test]
    fn empty_lookup_table() {
        let m = method_with(0, |a| {
            a.lookupswitch(12, &[]);
        });
        let view = LookupSwitchView::new(InstructionCursor::new(&m, 0));
        assert_eq!(view.number_of_pairs(), 0);
        assert_eq!(view.pairs().count(), 0);
        assert_eq!(view.default_offset(), 12);
    }

    #[test]
    fn fast_lookup_forms_decode_the_same() {
        for fast in [Opcode::FAST_LINEARSWITCH, Opcode::FAST_BINARYSWITCH] {
            let mut a = CodeAssembler::new();
            a.op(Opcode::NOP);
            a.lookupswitch(4, &[(3, 8)]);
            let mut code = a.build();
            code[1] = fast.byte();
            let m = unlinked_method(code, InMemoryPool::builder().build());
            match decode_at(&m, 1) {
                DecodedView::LookupSwitch(view) => {
                    assert_eq!(view.raw_opcode(), fast);
                    assert_eq!(view.opcode(), Opcode::LOOKUPSWITCH);
                    assert_eq!(view.pair_at(0), LookupSwitchPair { match_key: 3, offset: 8 });
                }
                _ => panic!("expected a lookup switch view"),
            }
        }
    }

    // Without checked assertions malformed tables are trusted as the verifier left them.
    #[test]
    #[cfg(not(any(debug_assertions, feature = "checked")))]
    fn malformed_tables_are_trusted_when_unchecked() {
        let m = method_with(3, |a| {
            a.lookupswitch(-1, &[(1, 100), (9, 300), (5, 200)]);
        });
        let view = LookupSwitchView::new(InstructionCursor::new(&m, 3));
        let keys: Vec<i32> = view.pairs().map(|p| p.match_key).collect();
        assert_eq!(keys, vec![1, 9, 5]);

        let mut a = CodeAssembler::new();
        a.op(Opcode::TABLESWITCH).align();
        a.java_u4(7).java_u4(5).java_u4(2);
        let m = unlinked_method(a.build(), InMemoryPool::builder().build());
        let view = TableSwitchView::new(InstructionCursor::new(&m, 0));
        assert_eq!(view.length(), 0);
        assert_eq!(view.dest_offset_for(3), 7);
        assert_eq!(view.cursor().length(), 16);
    }

    #[test]
    #[cfg_attr(not(any(debug_assertions, feature = "checked")), ignore)]
    #[should_panic(expected = "lookupswitch keys out of order")]
    fn unsorted_pairs_are_fatal() {
        let m = method_with(3, |a| {
            a.lookupswitch(-1, &[(1, 100), (9, 300), (5, 200)]);
        });
        LookupSwitchView::new(InstructionCursor::new(&m, 3));
    }

    #[test]
    #[cfg_attr(not(any(debug_assertions, feature = "checked")), ignore)]
    #[should_panic(expected = "incorrect hi/low values")]
    fn inverted_bounds_are_fatal() {
        let mut a = CodeAssembler::new();
        a.op(Opcode::TABLESWITCH).align();
        a.java_u4(0).java_u4(5).java_u4(2);
        let m = unlinked_method(a.build(), InMemoryPool::builder().build());
        TableSwitchView::new(InstructionCursor::new(&m, 0));
    }

    #[test]
    #[cfg_attr(not(any(debug_assertions, feature = "checked")), ignore)]
    #[should_panic(expected = "not a tableswitch")]
    fn lookup_table_is_not_a_fixed_range() {
        let m = method_with(0, |a| {
            a.lookupswitch(0, &[(1, 1)]);
        });
        TableSwitchView::new(InstructionCursor::new(&m, 0));
    }
}
