use super::*;

fn payload(name: &str, data: &str) -> SavePayload {
    SavePayload { name: name.into(), data: data.into() }
}

#[tokio::test]
async fn create_assigns_sequential_ids() {
    let store = MemoryStore::new();
    let a = store.create(&SavePayload::empty("A")).await.unwrap();
    let b = store.create(&SavePayload::empty("B")).await.unwrap();
    assert_eq!(a.id, "1");
    assert_eq!(b.id, "2");
    assert_eq!(a.data, "[]");
    assert!(a.created_at.is_some());
    assert_eq!(store.len().await, 2);
}

#[tokio::test]
async fn list_is_newest_first() {
    let store = MemoryStore::new();
    let a = store.create(&SavePayload::empty("A")).await.unwrap();
    store.create(&SavePayload::empty("B")).await.unwrap();
    store.save(&a.id, &payload("A2", "[]")).await.unwrap();

    let names: Vec<String> = store.list().await.unwrap().into_iter().map(|d| d.name).collect();
    assert_eq!(names, vec!["A2", "B"]);
}

#[tokio::test]
async fn save_overwrites_name_and_blob() {
    let store = MemoryStore::new();
    let doc = store.create(&SavePayload::empty("Board")).await.unwrap();
    store.save(&doc.id, &payload("Renamed", "[{\"x\":1}]")).await.unwrap();

    let loaded = store.load(&doc.id).await.unwrap();
    assert_eq!(loaded.name, "Renamed");
    assert_eq!(loaded.data, "[{\"x\":1}]");
}

#[tokio::test]
async fn rename_keeps_blob() {
    let store = MemoryStore::new();
    let doc = store.create(&payload("Old", "[1]")).await.unwrap();
    let renamed = store.rename(&doc.id, "New").await.unwrap();
    assert_eq!(renamed.name, "New");
    assert_eq!(renamed.data, "[1]");
}

#[tokio::test]
async fn missing_ids_are_not_found() {
    let store = MemoryStore::new();
    assert!(matches!(store.load("9").await, Err(StoreError::NotFound(id)) if id == "9"));
    assert!(matches!(store.save("9", &SavePayload::empty("x")).await, Err(StoreError::NotFound(_))));
    assert!(matches!(store.delete("9").await, Err(StoreError::NotFound(_))));
    assert!(matches!(store.rename("9", "x").await, Err(StoreError::NotFound(_))));
}

#[tokio::test]
async fn delete_removes() {
    let store = MemoryStore::new();
    let doc = store.create(&SavePayload::empty("Gone")).await.unwrap();
    store.delete(&doc.id).await.unwrap();
    assert!(store.is_empty().await);
}
