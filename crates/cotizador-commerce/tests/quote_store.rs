//! Quote store behavior: mutations, persistence, hydration, and the
//! submission flow end to end.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use cotizador_cache::{Backend, Cache, CacheError, FileBackend, MemoryBackend};
use cotizador_commerce::prelude::*;
use tempfile::TempDir;

fn product(id: u32) -> Product {
    Catalog::builtin()
        .find_by_id(ProductId::new(id))
        .cloned()
        .unwrap()
}

fn open_memory() -> (MemoryBackend, QuoteStore<MemoryBackend>) {
    let backend = MemoryBackend::new();
    let store = QuoteStore::open(Cache::new(backend.clone()));
    (backend, store)
}

/// Backend that fails every call and counts writes.
#[derive(Default)]
struct BrokenBackend {
    writes: Cell<usize>,
}

impl Backend for BrokenBackend {
    fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Err(CacheError::StoreError("disk unavailable".to_string()))
    }

    fn set(&self, _key: &str, _value: &[u8]) -> Result<(), CacheError> {
        self.writes.set(self.writes.get() + 1);
        Err(CacheError::StoreError("disk unavailable".to_string()))
    }

    fn delete(&self, _key: &str) -> Result<(), CacheError> {
        Err(CacheError::StoreError("disk unavailable".to_string()))
    }

    fn keys(&self) -> Result<Vec<String>, CacheError> {
        Err(CacheError::StoreError("disk unavailable".to_string()))
    }
}

/// Backend that records every write.
#[derive(Clone, Default)]
struct RecordingBackend {
    inner: MemoryBackend,
    writes: Rc<Cell<usize>>,
}

impl Backend for RecordingBackend {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), CacheError> {
        self.writes.set(self.writes.get() + 1);
        self.inner.set(key, value)
    }

    fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.inner.delete(key)
    }

    fn keys(&self) -> Result<Vec<String>, CacheError> {
        self.inner.keys()
    }
}

#[test]
fn test_add_twice_makes_one_line() {
    let (_, mut store) = open_memory();
    store.add_one(&product(1));
    store.add_one(&product(1));

    assert_eq!(store.item_count(), 1);
    assert_eq!(store.get(ProductId::new(1)).unwrap().quantity, 2);
}

#[test]
fn test_mixed_adds_scenario() {
    let (_, mut store) = open_memory();
    let a = product(4);
    let b = product(9);

    store.add_item(&a, 2);
    store.add_item(&b, 1);
    store.add_item(&a, 3);

    assert_eq!(store.get(a.id).unwrap().quantity, 5);
    assert_eq!(store.get(b.id).unwrap().quantity, 1);
    assert_eq!(store.item_count(), 2);
    assert_eq!(store.total_items(), 6);
    assert_eq!(
        store.view(),
        Hydration::Ready(QuoteSummary {
            item_count: 2,
            total_items: 6,
            urgent_count: 0,
        })
    );
}

#[test]
fn test_update_quantity_zero_is_noop() {
    let (_, mut store) = open_memory();
    store.add_item(&product(2), 3);

    assert!(!store.update_quantity(ProductId::new(2), 0));
    assert_eq!(store.get(ProductId::new(2)).unwrap().quantity, 3);
}

#[test]
fn test_removed_item_is_not_resurrected() {
    let (_, mut store) = open_memory();
    store.add_one(&product(5));
    store.remove_item(ProductId::new(5));

    store.update_quantity(ProductId::new(5), 4);
    store.update_notes(ProductId::new(5), "revivir");
    store.update_urgency(ProductId::new(5), Urgency::Urgent);

    assert!(!store.contains(ProductId::new(5)));
    assert!(store.is_empty());
}

#[test]
fn test_clear_empties_everything() {
    let (backend, mut store) = open_memory();
    store.add_item(&product(1), 2);
    store.add_item(&product(6), 1);
    store.clear_quote();

    assert_eq!(store.item_count(), 0);
    assert_eq!(store.total_items(), 0);

    let reopened = QuoteStore::open(Cache::new(backend));
    assert!(reopened.is_empty());
}

#[test]
fn test_urgency_filtering() {
    let (_, mut store) = open_memory();
    for id in [1, 4, 8] {
        store.add_one(&product(id));
    }
    store.update_urgency(ProductId::new(8), Urgency::Urgent);
    store.update_urgency(ProductId::new(1), Urgency::Urgent);

    let urgent: Vec<u32> = store
        .items_with_urgency(Urgency::Urgent)
        .iter()
        .map(|i| i.product_id().get())
        .collect();
    assert_eq!(urgent, vec![1, 8]);
    assert_eq!(store.items_with_urgency(Urgency::Normal).len(), 1);
}

#[test]
fn test_rehydrate_preserves_lines_and_order() {
    let (backend, mut store) = open_memory();
    store.add_item(&product(7), 2);
    store.add_item(&product(3), 1);
    store.add_item(&product(10), 12);
    store.update_notes(ProductId::new(3), "Plano adjunto por correo");
    store.update_urgency(ProductId::new(10), Urgency::Urgent);

    let reopened = QuoteStore::open(Cache::new(backend));
    assert_eq!(reopened.items(), store.items());
}

#[test]
fn test_persisted_document_shape() {
    let (backend, mut store) = open_memory();
    store.add_item(&product(2), 3);

    let cache = Cache::new(backend);
    let doc: serde_json::Value = cache.get(QUOTE_STORAGE_KEY).unwrap().unwrap();
    assert_eq!(doc["version"], 0);
    assert_eq!(doc["items"][0]["quantity"], 3);
    assert_eq!(doc["items"][0]["urgency"], "normal");
    assert_eq!(doc["items"][0]["product"]["sku"], "REV-SAC6000-001");
}

#[test]
fn test_no_writes_before_hydration() {
    let backend = RecordingBackend::default();
    let mut store = QuoteStore::new(Cache::new(backend.clone()));

    store.add_one(&product(1));
    assert_eq!(backend.writes.get(), 0);
    assert_eq!(store.view(), Hydration::Pending);

    // Nothing persisted yet, so the in-memory line survives and is saved.
    store.hydrate();
    assert_eq!(backend.writes.get(), 1);
    assert_eq!(store.item_count(), 1);

    store.add_one(&product(2));
    assert_eq!(backend.writes.get(), 2);
}

#[test]
fn test_hydration_replaces_memory_with_persisted() {
    let backend = MemoryBackend::new();
    {
        let mut saved = QuoteStore::open(Cache::new(backend.clone()));
        saved.add_item(&product(9), 4);
    }

    let mut store = QuoteStore::new(Cache::new(backend));
    store.add_one(&product(1));
    store.hydrate();

    let ids: Vec<u32> = store.items().iter().map(|i| i.product_id().get()).collect();
    assert_eq!(ids, vec![9]);
}

#[test]
fn test_listeners_fire_on_change_only() {
    let (_, mut store) = open_memory();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    store.subscribe(move |items| sink.borrow_mut().push(items.to_vec()));

    store.add_one(&product(1));
    store.update_quantity(ProductId::new(1), 1);
    store.update_quantity(ProductId::new(1), 0);
    store.update_notes(ProductId::new(1), "");
    store.remove_item(ProductId::new(99));
    store.update_urgency(ProductId::new(1), Urgency::Urgent);

    let seen = seen.borrow();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[1][0].urgency, Urgency::Urgent);
}

#[test]
fn test_listener_sees_hydration() {
    let backend = MemoryBackend::new();
    QuoteStore::open(Cache::new(backend.clone())).add_item(&product(4), 8);

    let mut store = QuoteStore::new(Cache::new(backend));
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    store.subscribe(move |items| {
        assert_eq!(items.len(), 1);
        counter.set(counter.get() + 1);
    });

    store.hydrate();
    store.hydrate();
    assert_eq!(calls.get(), 1);
}

#[test]
fn test_failing_backend_keeps_working_in_memory() {
    let mut store = QuoteStore::open(Cache::new(BrokenBackend::default()));
    assert!(store.is_hydrated());

    store.add_item(&product(1), 2);
    store.add_one(&product(1));
    store.update_urgency(ProductId::new(1), Urgency::Urgent);

    assert_eq!(store.total_items(), 3);
    assert!(store.get(ProductId::new(1)).unwrap().is_urgent());
    assert!(store.save().is_err());
}

#[test]
fn test_corrupt_state_is_replaced_on_next_change() {
    let backend = MemoryBackend::new();
    backend.set(QUOTE_STORAGE_KEY, b"{ not json").unwrap();

    let mut store = QuoteStore::open(Cache::new(backend.clone()));
    assert!(store.is_hydrated());
    assert!(store.is_empty());

    store.add_one(&product(6));
    let reopened = QuoteStore::open(Cache::new(backend));
    assert_eq!(reopened.item_count(), 1);
}

#[test]
fn test_corrupt_state_keeps_memory_lines_unsaved() {
    let backend = MemoryBackend::new();
    backend.set(QUOTE_STORAGE_KEY, b"{ not json").unwrap();

    let mut store = QuoteStore::new(Cache::new(backend.clone()));
    store.add_item(&product(3), 2);
    store.hydrate();

    assert!(store.is_hydrated());
    assert_eq!(store.get(ProductId::new(3)).unwrap().quantity, 2);
    assert_eq!(
        backend.get(QUOTE_STORAGE_KEY).unwrap().as_deref(),
        Some(&b"{ not json"[..])
    );
}

#[test]
fn test_file_backend_round_trip() {
    let dir = TempDir::new().unwrap();
    {
        let mut store = QuoteStore::open(Cache::new(FileBackend::open(dir.path()).unwrap()));
        store.add_item(&product(8), 1);
        store.update_notes(ProductId::new(8), "Relación 21:187");
    }

    let store = QuoteStore::open(Cache::new(FileBackend::open(dir.path()).unwrap()));
    let item = store.get(ProductId::new(8)).unwrap();
    assert_eq!(item.notes, "Relación 21:187");
    assert_eq!(item.product.sku, "PIN-CORONA-001");
}

#[test]
fn test_custom_storage_key() {
    let backend = MemoryBackend::new();
    let mut store = QuoteStore::with_key(Cache::new(backend.clone()), "planta-norte");
    store.hydrate();
    store.add_one(&product(1));

    assert_eq!(backend.keys().unwrap(), vec!["planta-norte".to_string()]);
}

#[test]
fn test_submit_from_store() {
    let (_, mut store) = open_memory();
    store.add_item(&product(1), 2);
    store.add_item(&product(9), 1);

    let mut flow = QuoteFlow::new();
    flow.advance(&store).unwrap();

    let client = ClientInfo {
        name: "Carla Muñoz".to_string(),
        company: "Codelco División Norte".to_string(),
        email: "cmunoz@example.cl".to_string(),
        phone: "+56 55 222 3333".to_string(),
        ..Default::default()
    };
    let delivery = DeliveryInfo {
        address: "Bodega Central s/n".to_string(),
        city: "Calama".to_string(),
        region: Some("II".parse().unwrap()),
        requested_date: None,
    };
    let request = QuoteRequest::from_store(&store, client, delivery)
        .with_observations("Entregar en horario diurno");

    let confirmation = flow.submit(request).unwrap();
    assert!(confirmation.reference.to_string().starts_with("COT-"));
    assert_eq!(confirmation.request.total_units(), 3);
    assert_eq!(flow.step(), QuoteStep::Success);
    assert_eq!(store.item_count(), 2);
}

#[test]
fn test_older_persisted_lines_get_defaults() {
    let backend = MemoryBackend::new();
    let legacy = br#"{
        "items": [
            { "product": { "id": 5, "sku": "PERNO-M42-001", "name": "Perno Liner M42 x 200mm", "categoryId": 2 }, "quantity": 40 }
        ]
    }"#;
    backend.set(QUOTE_STORAGE_KEY, legacy).unwrap();

    let store = QuoteStore::open(Cache::new(backend));
    let item = store.get(ProductId::new(5)).unwrap();
    assert_eq!(item.quantity, 40);
    assert_eq!(item.notes, "");
    assert_eq!(item.urgency, Urgency::Normal);
}
