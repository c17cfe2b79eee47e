use adminkit_core::{
    DurableSlot, FieldKind, FileSlot, IdKind, MemorySlot, Record, RecordId, RecordStore, Schema,
    SlotError, SqliteSlot,
};
use serde_json::json;

fn users_schema() -> Schema {
    Schema::new("id", IdKind::Serial).required("name", FieldKind::String)
}

fn record(value: serde_json::Value) -> Record {
    Record::from_value(value).unwrap()
}

/// Contract every slot backend must satisfy.
fn exercise_slot_contract(slot: &dyn DurableSlot) {
    assert_eq!(slot.load("users").unwrap(), None);

    slot.save("users", r#"[{"id":1}]"#).unwrap();
    assert_eq!(
        slot.load("users").unwrap().as_deref(),
        Some(r#"[{"id":1}]"#)
    );

    slot.save("users", "[]").unwrap();
    assert_eq!(slot.load("users").unwrap().as_deref(), Some("[]"));

    // Keys are independent.
    assert_eq!(slot.load("posts").unwrap(), None);

    assert!(matches!(
        slot.load("a/b").unwrap_err(),
        SlotError::InvalidKey(_)
    ));
}

#[test]
fn memory_slot_satisfies_the_contract() {
    let slot = MemorySlot::new();
    exercise_slot_contract(&slot);
}

#[test]
fn file_slot_satisfies_the_contract() {
    let dir = tempfile::tempdir().unwrap();
    let slot = FileSlot::new(dir.path()).unwrap();
    exercise_slot_contract(&slot);
}

#[test]
fn sqlite_slot_satisfies_the_contract() {
    let slot = SqliteSlot::open_in_memory().unwrap();
    exercise_slot_contract(&slot);
}

#[test]
fn file_slot_payload_is_plain_json_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let slot = FileSlot::new(dir.path()).unwrap();

    let mut store = RecordStore::open(slot, "users", users_schema(), Vec::new()).unwrap();
    store.create(record(json!({"name": "Alice"}))).unwrap();

    let payload = std::fs::read_to_string(dir.path().join("users.json")).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&payload).unwrap();
    assert_eq!(parsed, json!([{"id": 1, "name": "Alice"}]));
}

#[test]
fn store_over_file_slot_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();

    let slot = FileSlot::new(dir.path()).unwrap();
    let mut store = RecordStore::open(slot, "users", users_schema(), Vec::new()).unwrap();
    store.create(record(json!({"name": "Alice"}))).unwrap();
    store.create(record(json!({"name": "Bob"}))).unwrap();
    store.delete(&RecordId::Int(1)).unwrap();
    drop(store);

    let slot = FileSlot::new(dir.path()).unwrap();
    let reopened = RecordStore::open(slot, "users", users_schema(), Vec::new()).unwrap();
    assert_eq!(reopened.len(), 1);
    assert_eq!(
        reopened.read(&RecordId::Int(2)).unwrap().get("name"),
        Some(&json!("Bob"))
    );
}

#[test]
fn store_over_sqlite_slot_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("adminkit.db");

    let slot = SqliteSlot::open(&db_path).unwrap();
    let mut store = RecordStore::open(slot, "users", users_schema(), Vec::new()).unwrap();
    store.create(record(json!({"name": "Alice"}))).unwrap();
    drop(store);

    let slot = SqliteSlot::open(&db_path).unwrap();
    let reopened = RecordStore::open(slot, "users", users_schema(), Vec::new()).unwrap();
    assert_eq!(reopened.len(), 1);
    assert_eq!(
        reopened.read(&RecordId::Int(1)).unwrap().get("name"),
        Some(&json!("Alice"))
    );
}

#[test]
fn one_slot_can_back_multiple_collections() {
    let slot = MemorySlot::new();

    let mut users =
        RecordStore::open(slot.clone(), "users", users_schema(), Vec::new()).unwrap();
    let mut posts = RecordStore::open(
        slot.clone(),
        "posts",
        Schema::new("id", IdKind::Serial).required("title", FieldKind::String),
        Vec::new(),
    )
    .unwrap();

    users.create(record(json!({"name": "Alice"}))).unwrap();
    posts.create(record(json!({"title": "Hello"}))).unwrap();
    posts.create(record(json!({"title": "Again"}))).unwrap();

    assert_eq!(users.len(), 1);
    assert_eq!(posts.len(), 2);

    let reopened_posts = RecordStore::open(
        slot,
        "posts",
        Schema::new("id", IdKind::Serial).required("title", FieldKind::String),
        Vec::new(),
    )
    .unwrap();
    assert_eq!(reopened_posts.len(), 2);
}
