use adminkit_core::{
    FieldKind, IdKind, ListQuery, MemorySlot, Record, RecordId, RecordStore, Schema, SortOrder,
};
use serde_json::json;
use std::collections::BTreeSet;

fn users_schema() -> Schema {
    Schema::new("id", IdKind::Serial)
        .required("name", FieldKind::String)
        .field("role", FieldKind::String)
}

fn record(value: serde_json::Value) -> Record {
    Record::from_value(value).unwrap()
}

fn seed_users() -> Vec<Record> {
    vec![
        record(json!({"id": 1, "name": "Alice", "role": "admin"})),
        record(json!({"id": 2, "name": "Bob", "role": "user"})),
        record(json!({"id": 3, "name": "Carol", "role": "admin"})),
    ]
}

fn open_store(seed: Vec<Record>) -> RecordStore<MemorySlot> {
    RecordStore::open(MemorySlot::new(), "users", users_schema(), seed).unwrap()
}

fn ids(page_data: &[Record]) -> Vec<RecordId> {
    page_data.iter().filter_map(|r| r.id("id")).collect()
}

#[test]
fn filter_and_sort_admins_by_name() {
    let store = open_store(seed_users());

    let page = store.list(&ListQuery {
        filters: [("role".to_string(), json!("admin"))].into_iter().collect(),
        sort: Some("name".to_string()),
        order: SortOrder::Asc,
        page: Some(1),
        per_page: Some(10),
        ..ListQuery::default()
    });

    assert_eq!(ids(&page.data), vec![RecordId::Int(1), RecordId::Int(3)]);
    assert_eq!(page.total, 2);
    assert_eq!(page.page, 1);
    assert_eq!(page.per_page, 10);
    assert_eq!(page.total_pages, 1);
}

#[test]
fn second_page_of_size_one_is_the_second_record() {
    let store = open_store(seed_users());

    let page = store.list(&ListQuery {
        page: Some(2),
        per_page: Some(1),
        ..ListQuery::default()
    });

    assert_eq!(ids(&page.data), vec![RecordId::Int(2)]);
    assert_eq!(page.total, 3);
    assert_eq!(page.total_pages, 3);
}

#[test]
fn pages_partition_the_result_set() {
    let seed = (1..=7)
        .map(|n| record(json!({"id": n, "name": format!("user-{n}")})))
        .collect();
    let store = open_store(seed);

    let descriptor = ListQuery {
        per_page: Some(3),
        ..ListQuery::default()
    };
    let first = store.list(&descriptor);
    assert_eq!(first.total, 7);
    assert_eq!(first.total_pages, 3);

    let mut seen: BTreeSet<i64> = BTreeSet::new();
    let mut summed = 0;
    for page_number in 1..=first.total_pages {
        let page = store.list(&ListQuery {
            page: Some(page_number),
            ..descriptor.clone()
        });
        summed += page.data.len();
        for id in ids(&page.data) {
            let RecordId::Int(n) = id else {
                panic!("expected integer ids")
            };
            // No record may appear on two different pages.
            assert!(seen.insert(n), "id {n} appeared twice");
        }
    }

    assert_eq!(summed, first.total);
    assert_eq!(seen.len(), 7);
}

#[test]
fn sort_is_stable_for_equal_keys() {
    let seed = vec![
        record(json!({"id": 1, "name": "Carol", "role": "user"})),
        record(json!({"id": 2, "name": "Alice", "role": "admin"})),
        record(json!({"id": 3, "name": "Bob", "role": "user"})),
        record(json!({"id": 4, "name": "Dora", "role": "admin"})),
    ];
    let store = open_store(seed);

    let page = store.list(&ListQuery {
        sort: Some("role".to_string()),
        ..ListQuery::default()
    });

    // Within each role, insertion order is preserved.
    assert_eq!(
        ids(&page.data),
        vec![
            RecordId::Int(2),
            RecordId::Int(4),
            RecordId::Int(1),
            RecordId::Int(3)
        ]
    );
}

#[test]
fn search_and_filter_conjoin_as_id_set_intersection() {
    let seed = vec![
        record(json!({"id": 1, "name": "Alice Smith", "role": "admin"})),
        record(json!({"id": 2, "name": "Bob Smith", "role": "user"})),
        record(json!({"id": 3, "name": "Carol Jones", "role": "admin"})),
        record(json!({"id": 4, "name": "Dan Smith", "role": "admin"})),
    ];
    let store = open_store(seed);

    let searched: BTreeSet<_> = ids(&store
        .list(&ListQuery {
            search: Some("smith".to_string()),
            ..ListQuery::default()
        })
        .data)
        .into_iter()
        .collect();
    let filtered: BTreeSet<_> = ids(&store
        .list(&ListQuery {
            filters: [("role".to_string(), json!("admin"))].into_iter().collect(),
            ..ListQuery::default()
        })
        .data)
        .into_iter()
        .collect();
    let both: BTreeSet<_> = ids(&store
        .list(&ListQuery {
            search: Some("smith".to_string()),
            filters: [("role".to_string(), json!("admin"))].into_iter().collect(),
            ..ListQuery::default()
        })
        .data)
        .into_iter()
        .collect();

    let expected: BTreeSet<_> = searched.intersection(&filtered).cloned().collect();
    assert_eq!(both, expected);
    assert_eq!(
        both,
        BTreeSet::from([RecordId::Int(1), RecordId::Int(4)])
    );
}

#[test]
fn identical_descriptors_yield_identical_pages() {
    let store = open_store(seed_users());
    let descriptor = ListQuery {
        search: Some("a".to_string()),
        sort: Some("name".to_string()),
        order: SortOrder::Desc,
        per_page: Some(2),
        ..ListQuery::default()
    };

    let first = store.list(&descriptor);
    let second = store.list(&descriptor);

    assert_eq!(first, second);
}

#[test]
fn zero_per_page_normalizes_to_default_instead_of_dividing_by_zero() {
    let store = open_store(seed_users());

    let page = store.list(&ListQuery {
        page: Some(0),
        per_page: Some(0),
        ..ListQuery::default()
    });

    assert_eq!(page.page, 1);
    assert_eq!(page.per_page, 10);
    assert_eq!(page.total_pages, 1);
    assert_eq!(page.data.len(), 3);
}

#[test]
fn empty_descriptor_defaults_to_first_page_of_ten() {
    let store = open_store(seed_users());

    let page = store.list(&ListQuery::default());

    assert_eq!(page.page, 1);
    assert_eq!(page.per_page, 10);
    assert_eq!(page.total, 3);
    assert_eq!(ids(&page.data), vec![
        RecordId::Int(1),
        RecordId::Int(2),
        RecordId::Int(3)
    ]);
}
