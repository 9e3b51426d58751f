#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use crate::bytecode::cursor::InstructionView;
    use crate::bytecode::member_ref::{FieldAccess, InvokeKind, MemberRefView};
    use crate::bytecode::opcodes::Opcode;
    use crate::runtime::memory::{InMemoryPool, SimpleLinkResolver};
    use crate::runtime::{DetachedThread, Method, ResolvedEntry, ResolvedField};
    use crate::tests::support::{link_method, unlinked_method, CodeAssembler, CountingThread};
    use crate::types::{BasicType, Symbol};
    use crate::ErrorKind;

    struct Fixture {
        x: u16,
        origin: u16,
        length: u16,
        of: u16,
        compare: u16,
        concat: u16,
        method: Method,
    }

    // 0 getstatic ORIGIN, 3 getfield x, 6 invokevirtual length, 9 invokestatic of,
    // 12 invokeinterface compareTo, 17 and 22 invokedynamic makeConcat, 27 getfield x,
    // 30 return
    fn fixture(index_tag: u32) -> Fixture {
        let mut b = InMemoryPool::builder();
        let x = b.field_ref("demo/Point", "x", "I");
        let origin = b.field_ref("demo/Point", "ORIGIN", "Ldemo/Point;");
        let length = b.method_ref("demo/Point", "length", "()D");
        let of = b.method_ref("demo/Point", "of", "(II)Ldemo/Point;");
        let compare = b.interface_method_ref("java/lang/Comparable", "compareTo", "(Ljava/lang/Object;)I");
        let concat = b.invoke_dynamic(0, "makeConcat", "(I)Ljava/lang/String;");

        let mut a = CodeAssembler::new();
        a.indexed(Opcode::GETSTATIC, origin);
        a.indexed(Opcode::GETFIELD, x);
        a.indexed(Opcode::INVOKEVIRTUAL, length);
        a.indexed(Opcode::INVOKESTATIC, of);
        a.invokeinterface(compare, 2);
        a.invokedynamic(concat);
        a.invokedynamic(concat);
        a.indexed(Opcode::GETFIELD, x);
        a.op(Opcode::RETURN);

        let (method, summary) = link_method("run", "()V", a.build(), b.build(), index_tag);
        assert_eq!(summary.member_refs, 6);
        assert_eq!(summary.call_sites, 2);
        Fixture { x, origin, length, of, compare, concat, method }
    }

    fn target(holder: &str, name: &str, signature: &str) -> Arc<Method> {
        let pool = Arc::new(InMemoryPool::builder().build());
        Arc::new(Method::new(holder, name, signature, vec![Opcode::RETURN.byte()], pool))
    }

    fn resolver() -> SimpleLinkResolver {
        let mut r = SimpleLinkResolver::new();
        r.add_method(target("demo/Point", "length", "()D"));
        r.add_method(target("demo/Point", "of", "(II)Ldemo/Point;"));
        r.add_method(target("java/lang/Comparable", "compareTo", "(Ljava/lang/Object;)I"));
        r.add_interface("java/lang/Comparable");
        r.add_bootstrap("makeConcat", target("demo/Host", "concat$0", "(I)Ljava/lang/String;"));
        r.add_field(ResolvedField {
            holder: Symbol::new("demo/Point"),
            name: Symbol::new("x"),
            field_type: BasicType::Int,
            offset: 12,
            is_static: false,
        });
        r
    }

    #[test]
    fn pool_indices_survive_rewriting() {
        // the tag is opaque; values near the top of the range wrap
        for tag in [0, 1000, u32::MAX - 2] {
            let f = fixture(tag);
            let m = &f.method;
            let expected = [(0, f.origin), (3, f.x), (6, f.length), (9, f.of), (12, f.compare), (17, f.concat), (22, f.concat), (27, f.x)];
            for (bci, pool_index) in expected {
                assert_eq!(MemberRefView::new(m, bci).pool_index().unwrap(), pool_index, "bci {} tag {}", bci, tag);
            }
        }
    }

    #[test]
    fn cache_indices() {
        let f = fixture(1000);
        let m = &f.method;
        let first_x = MemberRefView::new(m, 3);
        let second_x = MemberRefView::new(m, 27);
        assert_eq!(first_x.cache_index(), second_x.cache_index());
        assert_eq!(first_x.index(), first_x.cache_index() + 1000);

        let f = fixture(u32::MAX);
        let x = MemberRefView::new(&f.method, 27);
        assert_eq!(x.index(), x.cache_index().wrapping_add(u32::MAX));
        assert_eq!(x.cache_index(), MemberRefView::new(&f.method, 3).cache_index());

        // call sites never share an entry, and their index carries no tag
        let site_a = MemberRefView::new(m, 17);
        let site_b = MemberRefView::new(m, 22);
        assert_ne!(site_a.cache_index(), site_b.cache_index());
        assert_eq!(site_a.index(), site_a.cache_index());
        assert!(site_a.cursor().has_wide_index(site_a.raw_opcode()));
        assert!(!first_x.cursor().has_wide_index(first_x.raw_opcode()));
    }

    #[test]
    fn names_and_types() {
        let f = fixture(0);
        let m = &f.method;

        let x = MemberRefView::new(m, 3);
        assert_eq!(x.name().unwrap().to_string(), "x");
        assert_eq!(x.signature().unwrap().to_string(), "I");
        assert_eq!(x.holder_name().unwrap().to_string(), "demo/Point");
        assert_eq!(x.result_type().unwrap(), BasicType::Int);

        assert_eq!(MemberRefView::new(m, 0).result_type().unwrap(), BasicType::Object);
        assert_eq!(MemberRefView::new(m, 6).result_type().unwrap(), BasicType::Double);
        assert_eq!(MemberRefView::new(m, 9).result_type().unwrap(), BasicType::Object);
        assert_eq!(MemberRefView::new(m, 12).holder_name().unwrap().to_string(), "java/lang/Comparable");

        let indy = MemberRefView::new(m, 17);
        assert_eq!(indy.name().unwrap().to_string(), "makeConcat");
        assert_eq!(indy.result_type().unwrap(), BasicType::Object);
        assert!(indy.holder_name().is_err());
    }

    #[test]
    fn reference_flavours() {
        let f = fixture(0);
        let m = &f.method;
        let cases = [
            (0, None, Some(FieldAccess::GetStatic), true, 0),
            (6, Some(InvokeKind::Virtual), None, false, 1),
            (9, Some(InvokeKind::Static), None, true, 2),
            (12, Some(InvokeKind::Interface), None, false, 2),
            (17, Some(InvokeKind::Dynamic), None, true, 1),
        ];
        for (bci, invoke, field, is_static, params) in cases {
            let view = MemberRefView::new(m, bci);
            assert_eq!(view.invoke_kind(), invoke, "bci {}", bci);
            assert_eq!(view.field_access(), field, "bci {}", bci);
            assert_eq!(view.is_static(), is_static, "bci {}", bci);
            assert_eq!(view.has_receiver(), !is_static, "bci {}", bci);
            if invoke.is_some() {
                assert_eq!(view.parameter_size().unwrap(), params, "bci {}", bci);
            }
        }
        assert_eq!(MemberRefView::new(m, 3).field_access(), Some(FieldAccess::GetField));
    }

    #[test]
    fn static_target_dispatch() {
        let f = fixture(7);
        let m = &f.method;
        let r = resolver();
        let thread = CountingThread::default();

        let length = MemberRefView::new(m, 6).static_target(&r, &thread).unwrap();
        assert_eq!(length.to_string(), "demo/Point.length()D");
        let of = MemberRefView::new(m, 9).static_target(&r, &thread).unwrap();
        assert_eq!(of.name().to_string(), "of");
        let compare = MemberRefView::new(m, 12).static_target(&r, &thread).unwrap();
        assert_eq!(compare.holder().to_string(), "java/lang/Comparable");
        let concat = MemberRefView::new(m, 22).static_target(&r, &thread).unwrap();
        assert_eq!(concat.name().to_string(), "concat$0");
        assert_eq!(thread.polls(), 4);

        // outcomes are published to the caller's cache
        let cache = m.constants().cache().unwrap();
        let view = MemberRefView::new(m, 6);
        assert!(matches!(cache.resolved_at(view.cache_index()), Some(ResolvedEntry::Method(ref t)) if Arc::ptr_eq(t, &length)));
        let site = MemberRefView::new(m, 22);
        assert!(matches!(cache.resolved_at(site.cache_index()), Some(ResolvedEntry::CallSite(_))));
        assert!(cache.resolved_at(MemberRefView::new(m, 17).cache_index()).is_none());
    }

    #[test]
    fn linkage_failures_propagate() {
        let f = fixture(0);
        let m = &f.method;
        let thread = DetachedThread;

        let empty = SimpleLinkResolver::new();
        let e = MemberRefView::new(m, 6).static_target(&empty, &thread).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::Linkage);
        assert!(e.to_string().contains("NoSuchMethodError"), "{}", e);
        let e = MemberRefView::new(m, 17).static_target(&empty, &thread).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::Linkage);

        // interface method through a class reference and the other way round
        let mut r = resolver();
        r.add_interface("demo/Point");
        let e = MemberRefView::new(m, 6).static_target(&r, &thread).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::IncompatibleClassChange);
        let mut r = SimpleLinkResolver::new();
        r.add_method(target("java/lang/Comparable", "compareTo", "(Ljava/lang/Object;)I"));
        let e = MemberRefView::new(m, 12).static_target(&r, &thread).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::IncompatibleClassChange);

        assert!(m.constants().cache().unwrap().resolved_at(MemberRefView::new(m, 6).cache_index()).is_none());
    }

    #[test]
    fn wrong_resolution_entry_point() {
        let f = fixture(0);
        let m = &f.method;
        let r = resolver();
        let e = MemberRefView::new(m, 3).static_target(&r, &DetachedThread).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::Lookup);
        let e = MemberRefView::new(m, 6).resolve_field(&r, &DetachedThread).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::Lookup);
    }

    #[test]
    fn field_resolution() {
        let f = fixture(0);
        let m = &f.method;
        let r = resolver();
        let field = MemberRefView::new(m, 27).resolve_field(&r, &DetachedThread).unwrap();
        assert_eq!(field.offset, 12);
        // both getfields share the entry the resolver just filled
        let cache = m.constants().cache().unwrap();
        assert!(matches!(cache.resolved_at(MemberRefView::new(m, 3).cache_index()), Some(ResolvedEntry::Field(_))));

        let e = MemberRefView::new(m, 0).resolve_field(&r, &DetachedThread).unwrap_err();
        assert!(e.to_string().contains("NoSuchFieldError: demo/Point.ORIGIN"), "{}", e);
    }

    #[test]
    fn unlinked_field_has_no_pool_index() {
        let mut b = InMemoryPool::builder();
        let x = b.field_ref("demo/Point", "x", "I");
        let mut a = CodeAssembler::new();
        a.indexed(Opcode::GETFIELD, x);
        let m = unlinked_method(a.build(), b.build());
        let e = MemberRefView::new(&m, 0).pool_index().unwrap_err();
        assert_eq!(e.kind(), ErrorKind::Lookup);
    }

    #[test]
    #[cfg_attr(not(any(debug_assertions, feature = "checked")), ignore)]
    #[should_panic(expected = "decoded before")]
    fn invokes_need_a_linked_method() {
        let mut b = InMemoryPool::builder();
        let length = b.method_ref("demo/Point", "length", "()D");
        let mut a = CodeAssembler::new();
        a.indexed(Opcode::INVOKEVIRTUAL, length);
        let m = unlinked_method(a.build(), b.build());
        MemberRefView::new(&m, 0);
    }

    #[test]
    #[cfg_attr(not(any(debug_assertions, feature = "checked")), ignore)]
    #[should_panic(expected = "not a member reference")]
    fn wrong_family_is_fatal() {
        let f = fixture(0);
        MemberRefView::new(&f.method, 30);
    }
}
