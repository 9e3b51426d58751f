#[cfg(test)]
mod support;

mod format_tests;
mod member_ref_tests;
mod switch_tests;

#[cfg(test)]
mod tests {
    use crate::types::{parameter_size_of, result_type_of, BasicType, ConstantTag, Symbol};
    use crate::ErrorKind;

    #[test]
    fn descriptor_result_types() {
        assert_eq!(result_type_of("()V").unwrap(), BasicType::Void);
        assert_eq!(result_type_of("(IJ)Z").unwrap(), BasicType::Boolean);
        assert_eq!(result_type_of("(Ljava/lang/Object;)Ljava/lang/String;").unwrap(), BasicType::Object);
        assert_eq!(result_type_of("()[[D").unwrap(), BasicType::Array);
        assert_eq!(result_type_of("J").unwrap(), BasicType::Long);
        assert_eq!(result_type_of("Ldemo/Point;").unwrap(), BasicType::Object);
    }

    #[test]
    fn malformed_descriptors() {
        for d in ["", "(I", "()", "Q", "(I)VV", "Ljava/lang/String", "[", "V"] {
            let e = result_type_of(d).unwrap_err();
            assert_eq!(e.kind(), ErrorKind::Malformed, "{:?}", d);
        }
    }

    #[test]
    fn parameter_sizes() {
        assert_eq!(parameter_size_of("()V").unwrap(), 0);
        assert_eq!(parameter_size_of("(IJD[Ljava/lang/Object;)V").unwrap(), 6);
        assert!(parameter_size_of("I").is_err());
    }

    #[test]
    fn loadable_tag_types() {
        assert_eq!(ConstantTag::Integer.basic_type(), BasicType::Int);
        assert_eq!(ConstantTag::Double.basic_type(), BasicType::Double);
        assert_eq!(ConstantTag::String.basic_type(), BasicType::Object);
        assert_eq!(ConstantTag::MethodType.basic_type(), BasicType::Object);
        assert_eq!(ConstantTag::FieldRef.basic_type(), BasicType::Illegal);
        assert!(ConstantTag::MethodHandle.is_executable_reference());
        assert!(!ConstantTag::Class.is_executable_reference());
        assert_eq!(ConstantTag::InvokeDynamic.value(), 18);
    }

    #[test]
    fn symbols_keep_modified_utf8() {
        let s = Symbol::new("a\u{10400}");
        // supplementary characters become a surrogate pair, three bytes each
        assert_eq!(s.as_bytes().len(), 7);
        assert_eq!(s.to_string(), "a\u{10400}");
        assert_eq!(Symbol::from_modified_utf8(s.as_bytes()).unwrap(), s);

        let e = Symbol::from_modified_utf8(&[0xc0]).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::Malformed);
    }
}
