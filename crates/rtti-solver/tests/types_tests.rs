use super::*;
use crate::type_factory::{ObjectBuilder, SignatureBuilder};

#[test]
fn test_identity_assigned_lazily() {
    let ty = Type::numeric();
    assert_eq!(ty.assigned_id(), None);

    let id = ty.id();
    assert!(id.is_valid());
    assert_eq!(ty.assigned_id(), Some(id));
    // Stable once assigned.
    assert_eq!(ty.id(), id);
}

#[test]
fn test_identities_are_distinct_and_increasing() {
    let first = Type::string();
    let second = Type::string();
    let a = first.id();
    let b = second.id();
    assert_ne!(a, b);
    assert!(b > a);
}

#[test]
fn test_clone_shares_identity() {
    let ty = Type::boolean();
    let alias = ty.clone();
    assert!(ty.ptr_eq(&alias));
    assert_eq!(ty.id(), alias.id());

    let other = Type::boolean();
    assert!(!ty.ptr_eq(&other));
}

#[test]
fn test_tags_match_kinds() {
    assert_eq!(Type::any().tag(), TypeTag::Any);
    assert_eq!(Type::void().tag(), TypeTag::Void);
    assert_eq!(Type::string_literal("a").tag(), TypeTag::StringLiteral);
    assert_eq!(
        Type::union(vec![Type::numeric(), Type::string()]).tag(),
        TypeTag::Union
    );
    assert_eq!(Type::type_parameter(Some("T")).tag(), TypeTag::TypeParameter);
    assert_eq!(ObjectBuilder::new().build().tag(), TypeTag::Object);
}

#[test]
fn test_universal_sources() {
    assert!(TypeTag::Void.is_universal_source());
    assert!(TypeTag::Any.is_universal_source());
    assert!(TypeTag::Null.is_universal_source());
    assert!(!TypeTag::Never.is_universal_source());
    assert!(!TypeTag::Object.is_universal_source());
}

#[test]
fn test_literal_tags() {
    assert!(TypeTag::BooleanLiteral.is_literal());
    assert!(TypeTag::NumericLiteral.is_literal());
    assert!(TypeTag::StringLiteral.is_literal());
    assert!(!TypeTag::String.is_literal());
}

#[test]
fn test_declared_object_can_refer_to_itself() {
    let node = Type::declare_object(Some("Node"));
    assert!(node.object_shape().is_err());

    ObjectBuilder::new()
        .property("value", Type::numeric())
        .optional_property("next", node.clone())
        .define(&node)
        .expect("first definition succeeds");

    let shape = node.object_shape().expect("defined");
    let next = shape.property("next").expect("next property");
    assert!(next.optional);
    assert!(next.ty.ptr_eq(&node));
}

#[test]
fn test_object_defined_twice_is_malformed() {
    let ty = Type::declare_object(None);
    ty.define_object(ObjectShape::default()).expect("first definition");
    let err = ty
        .define_object(ObjectShape::default())
        .expect_err("second definition must fail");
    assert!(matches!(err, EngineError::MalformedDescriptor(_)));
}

#[test]
fn test_define_on_non_object_is_malformed() {
    let err = Type::numeric()
        .define_object(ObjectShape::default())
        .expect_err("numbers have no shape");
    assert!(matches!(err, EngineError::MalformedDescriptor(_)));
}

#[test]
fn test_undefined_object_shape_is_malformed() {
    let ty = Type::declare_object(Some("Pending"));
    let object = ty.as_object().expect("object type");
    assert!(!object.is_defined());
    let err = object.shape().expect_err("never defined");
    assert!(err.to_string().contains("Pending"));
}

#[test]
fn test_property_order_is_preserved() {
    let ty = ObjectBuilder::new()
        .property("b", Type::numeric())
        .property("a", Type::string())
        .property("c", Type::boolean())
        .build();
    let names: Vec<&str> = ty
        .object_shape()
        .expect("defined")
        .properties
        .keys()
        .map(|k| &**k)
        .collect();
    assert_eq!(names, vec!["b", "a", "c"]);
}

#[test]
fn test_has_signatures() {
    let plain = ObjectBuilder::new().property("x", Type::numeric()).build();
    assert!(!plain.object_shape().expect("defined").has_signatures());

    let callable = ObjectBuilder::new()
        .call_signature(SignatureBuilder::new().build())
        .build();
    assert!(callable.object_shape().expect("defined").has_signatures());

    let constructible = ObjectBuilder::new()
        .construct_signature(SignatureBuilder::new().build())
        .build();
    assert!(constructible.object_shape().expect("defined").has_signatures());
}

#[test]
fn test_signature_param_at_falls_back_to_varargs() {
    let signature = SignatureBuilder::new()
        .param(Type::numeric())
        .rest(Type::string())
        .build();
    assert_eq!(signature.param_at(0).map(Type::tag), Some(TypeTag::Numeric));
    assert_eq!(signature.param_at(1).map(Type::tag), Some(TypeTag::String));
    assert_eq!(signature.param_at(7).map(Type::tag), Some(TypeTag::String));

    let fixed = SignatureBuilder::new().param(Type::numeric()).build();
    assert!(fixed.param_at(1).is_none());
}

#[test]
fn test_signature_builder_mandatory_args() {
    let signature = SignatureBuilder::new()
        .param(Type::numeric())
        .param(Type::string())
        .optional_param(Type::boolean())
        .build();
    assert_eq!(signature.args().len(), 3);
    assert_eq!(signature.mandatory_args(), 2);
    assert_eq!(signature.result().tag(), TypeTag::Void);

    let explicit = SignatureBuilder::new()
        .param(Type::numeric())
        .param(Type::numeric())
        .mandatory_args(0)
        .returns(Type::numeric())
        .build();
    assert_eq!(explicit.mandatory_args(), 0);
    assert_eq!(explicit.result().tag(), TypeTag::Numeric);
}

#[test]
fn test_signature_identity() {
    let signature = SignatureBuilder::new().build();
    assert_eq!(signature.assigned_id(), None);
    let id = signature.id();
    assert!(signature.clone().ptr_eq(&signature));
    assert_eq!(signature.assigned_id(), Some(id));
}

#[test]
fn test_debug_is_shallow_for_recursive_objects() {
    let node = Type::declare_object(Some("Node"));
    ObjectBuilder::new()
        .property("next", node.clone())
        .define(&node)
        .expect("defined");
    let rendered = format!("{node:?}");
    assert!(rendered.contains("Node"));
    assert!(rendered.contains("next"));
}
