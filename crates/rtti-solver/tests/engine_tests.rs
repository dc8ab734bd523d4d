use super::*;
use crate::type_factory::ObjectBuilder;
use std::sync::{Arc, Mutex};

fn point() -> Type {
    ObjectBuilder::new()
        .property("x", Type::numeric())
        .property("y", Type::numeric())
        .build()
}

fn recording_sink(engine: &mut TypeEngine) -> Arc<Mutex<Vec<(String, SourceLocation)>>> {
    let received = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&received);
    engine.set_error_sink(move |message, location| {
        sink.lock()
            .expect("sink lock")
            .push((message.to_string(), location.clone()));
    });
    received
}

#[test]
fn test_default_options() {
    let options = EngineOptions::default();
    assert!(!options.strict_nullable_sources);
    assert_eq!(options.subtype_profile, RecursionProfile::SubtypeCheck);
    assert_eq!(options.value_profile, RecursionProfile::ValueConformance);

    let strict = options.with_strict_nullable_sources(true);
    assert!(strict.strict_nullable_sources);
    assert_eq!(TypeEngine::with_options(strict).options(), strict);
}

#[test]
fn test_assert_type_returns_conforming_value() {
    let mut engine = TypeEngine::new();
    let value = Value::object([("x", Value::from(1.0)), ("y", Value::from(2.0))]);
    let returned = engine
        .assert_type(value.clone(), &point(), SourceLocation::new("main.ts", 1, 1))
        .expect("point conforms");
    assert!(returned.strict_equals(&value));
}

#[test]
fn test_assert_type_reports_violation() {
    let mut engine = TypeEngine::new();
    let received = recording_sink(&mut engine);
    let location = SourceLocation::new("main.ts", 4, 9);

    let err = engine
        .assert_type(Value::string("nope"), &Type::numeric(), location.clone())
        .expect_err("a string is not a number");

    let violation = err.violation().expect("violation");
    assert_eq!(
        violation.message,
        "Value:\n'nope'\nis not assignable to type:\nnumber"
    );
    assert_eq!(violation.location, location);
    assert_eq!(
        err.to_string(),
        "main.ts:4:9 Value:\n'nope'\nis not assignable to type:\nnumber"
    );

    let received = received.lock().expect("sink lock");
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].0, violation.message);
    assert_eq!(received[0].1, location);
}

#[test]
fn test_assert_type_formats_object_values() {
    let mut engine = TypeEngine::new();
    let err = engine
        .assert_type(
            Value::object([("x", Value::from(1.0))]),
            &point(),
            SourceLocation::unknown(),
        )
        .expect_err("missing y");
    let message = &err.violation().expect("violation").message;
    assert!(message.starts_with("Value:\n{\n  x: 1,\n}\nis not assignable to type:\n{\n"));
    assert!(message.contains("\"y\": number,"));
}

#[test]
fn test_cleared_sink_is_not_called() {
    let mut engine = TypeEngine::new();
    let received = recording_sink(&mut engine);
    engine.clear_error_sink();

    let result = engine.assert_type(Value::from(true), &Type::string(), SourceLocation::unknown());
    assert!(result.is_err());
    assert!(received.lock().expect("sink lock").is_empty());
}

#[test]
fn test_repeated_judgment_hits_cache() {
    let mut engine = TypeEngine::new();
    let source = ObjectBuilder::new()
        .property("x", Type::numeric())
        .property("y", Type::numeric())
        .property("label", Type::string())
        .build();
    let target = point();

    assert!(engine.is_compatible(&source, &target).expect("first"));
    let computed = engine.uncached_judgments();
    let hits = engine.cache_stats().hits;
    assert!(computed > 0);

    assert!(engine.is_compatible(&source, &target).expect("second"));
    assert_eq!(engine.uncached_judgments(), computed);
    assert_eq!(engine.cache_stats().hits, hits + 1);
}

#[test]
fn test_reset_clears_cache_and_counters() {
    let mut engine = TypeEngine::new();
    let source = Type::numeric_literal(1.0);
    let target = Type::numeric();
    assert!(engine.is_compatible(&source, &target).expect("literal into number"));
    assert!(engine.cache_stats().entries > 0);

    let id = source.id();
    engine.reset();
    assert_eq!(engine.cache_stats(), JudgmentCacheStats::default());
    assert_eq!(engine.uncached_judgments(), 0);
    // Identities survive a reset.
    assert_eq!(source.id(), id);

    assert!(engine.is_compatible(&source, &target).expect("recomputed"));
    assert_eq!(engine.uncached_judgments(), 1);
}

#[test]
fn test_identical_handles_skip_the_cache() {
    let mut engine = TypeEngine::new();
    let ty = point();
    assert!(engine.is_compatible(&ty, &ty).expect("reflexive"));
    assert_eq!(engine.uncached_judgments(), 0);
    assert_eq!(engine.cache_stats().entries, 0);
}

#[test]
fn test_engines_share_descriptors() {
    let source = Type::string_literal("a");
    let target = Type::string();
    let mut first = TypeEngine::new();
    let mut second = TypeEngine::new();
    assert!(first.is_compatible(&source, &target).expect("first engine"));
    assert!(second.is_compatible(&source, &target).expect("second engine"));
    // Caches are per engine.
    assert_eq!(second.uncached_judgments(), 1);
}

#[test]
fn test_recursion_limit_is_reported() {
    // A deep chain of distinct wrapper objects exceeds a tiny depth budget.
    let options = EngineOptions::default().with_subtype_profile(RecursionProfile::Custom {
        max_depth: 3,
        max_iterations: 1_000,
    });
    let mut engine = TypeEngine::with_options(options);

    let mut source = Type::numeric();
    let mut target = Type::numeric();
    for _ in 0..6 {
        source = ObjectBuilder::new().property("inner", source).build();
        target = ObjectBuilder::new().property("inner", target).build();
    }
    let err = engine
        .is_compatible(&source, &target)
        .expect_err("depth budget exhausted");
    assert!(matches!(err, EngineError::RecursionLimit(_)));

    // The guard is usable again afterwards.
    assert!(engine.is_compatible(&Type::numeric_literal(1.0), &Type::numeric()).expect("shallow"));
}
