//! End-to-end tests through the `rtti` facade: descriptors arrive as a
//! serialized document, values as JSON, and calls go through the engine.

use rtti::solver::{TypeTable, WireRef};
use rtti::{
    EngineError, FunctionObject, SourceLocation, Type, TypeEngine, Value, WireDocument,
};
use std::sync::{Arc, Mutex};

/// `interface User { id: number; name: string; tags?: string[] }` plus
/// `(user: User, ...notes: string[]) => string`.
const DOCUMENT: &str = r#"{
    "types": [
        { "type": "numeric" },
        { "type": "string" },
        { "type": "objectType", "numericIndexType": 1 },
        {
            "type": "objectType",
            "name": "User",
            "properties": {
                "id": { "type": 0 },
                "name": { "type": 1 },
                "tags": { "type": 2, "optional": true }
            }
        },
        {
            "type": "objectType",
            "callSignatures": [ { "args": [3], "varargs": 1, "result": 1 } ]
        },
        {
            "type": "objectType",
            "properties": {
                "id": { "type": 0 },
                "name": { "type": 1 },
                "tags": { "type": 2 },
                "admin": { "type": 5 }
            }
        },
        { "type": "boolean" }
    ],
    "root": 3
}"#;

fn table() -> TypeTable {
    WireDocument::from_json_str(DOCUMENT)
        .and_then(|document| document.decode())
        .expect("document decodes")
}

fn json(source: &str) -> Value {
    Value::from_json(&serde_json::from_str(source).expect("valid json"))
}

fn descriptor(table: &TypeTable, index: u32) -> Type {
    table.get(WireRef(index)).cloned().expect("descriptor")
}

#[test]
fn test_value_assertions_against_decoded_document() {
    let table = table();
    let user = table.root().clone();
    let mut engine = TypeEngine::new();

    let good = json(r#"{ "id": 1, "name": "ada", "tags": ["x", "y"] }"#);
    let returned = engine
        .assert_type(good.clone(), &user, SourceLocation::new("users.ts", 3, 14))
        .expect("conforming user");
    assert_eq!(returned, good);

    let bad_tags = json(r#"{ "id": 1, "name": "ada", "tags": ["x", 2] }"#);
    let err = engine
        .assert_type(bad_tags, &user, SourceLocation::new("users.ts", 9, 2))
        .expect_err("numeric tag");
    assert_eq!(
        err.to_string(),
        "users.ts:9:2 Value:\n{\n  id: 1,\n  name: 'ada',\n  tags: ['x', 2],\n}\nis not assignable to type:\nUser"
    );
}

#[test]
fn test_descriptor_compatibility_from_document() {
    let table = table();
    let user = descriptor(&table, 3);
    let admin = descriptor(&table, 5);
    let mut engine = TypeEngine::new();

    assert!(engine.is_compatible(&admin, &user).expect("admin is a user"));
    assert!(!engine.is_compatible(&user, &admin).expect("a user is not an admin"));

    // Repeating the query is answered from the cache.
    let computed = engine.uncached_judgments();
    assert!(engine.is_compatible(&admin, &user).expect("cached"));
    assert_eq!(engine.uncached_judgments(), computed);
}

#[test]
fn test_intercepted_calls_notify_the_sink_once() {
    let table = table();
    let greet_type = descriptor(&table, 4);
    let mut engine = TypeEngine::new();

    let notified = Arc::new(Mutex::new(Vec::<String>::new()));
    let sink = Arc::clone(&notified);
    engine.set_error_sink(move |message, _| {
        sink.lock().expect("sink lock").push(message.to_string());
    });

    let greet = FunctionObject::new(Some("greet"), |_, _, args| {
        let name = args.first().map(|user| user.get("name")).unwrap_or(Value::Undefined);
        match name {
            Value::String(name) => Ok(Value::string(&format!("hello {name}"))),
            _ => Err(EngineError::Thrown("no name".to_string())),
        }
    });
    let greet = engine.register_type(greet_type, &greet).expect("register");

    let ada = json(r#"{ "id": 1, "name": "ada" }"#);
    let result = engine
        .apply(&greet, Value::Undefined, &[ada, Value::from("note")])
        .expect("conforming call");
    assert_eq!(result, Value::from("hello ada"));
    assert!(notified.lock().expect("sink lock").is_empty());

    let anonymous = json(r#"{ "name": "nobody" }"#);
    let err = engine
        .apply(&greet, Value::Undefined, &[anonymous])
        .expect_err("missing id");
    assert!(err.is_violation());

    let notified = notified.lock().expect("sink lock");
    assert_eq!(notified.len(), 1);
    assert!(notified[0].starts_with("Function:\n{\n  (User, ...string[]) => string;\n}"));
}

#[test]
fn test_engines_are_independent() {
    let table = table();
    let user = table.root().clone();
    let value = json(r#"{ "id": "one", "name": "ada" }"#);

    let mut quiet = TypeEngine::new();
    let mut loud = TypeEngine::new();
    let count = Arc::new(Mutex::new(0u32));
    let counter = Arc::clone(&count);
    loud.set_error_sink(move |_, _| *counter.lock().expect("counter lock") += 1);

    assert!(quiet.assert_type(value.clone(), &user, SourceLocation::unknown()).is_err());
    assert_eq!(*count.lock().expect("counter lock"), 0);
    assert!(loud.assert_type(value, &user, SourceLocation::unknown()).is_err());
    assert_eq!(*count.lock().expect("counter lock"), 1);
}
