//! In-memory item storage with sequential ID assignment.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info};

use crate::error::RegistryError;

use super::types::{HealthStatus, Item, ItemId, NewItem};

/// Monotonic ID counter. IDs start at 1 and are never reused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdSequence {
    next: ItemId,
}

impl IdSequence {
    /// First ID handed out by a fresh sequence.
    pub const FIRST: ItemId = 1;

    /// Create a sequence starting at [`IdSequence::FIRST`].
    pub fn new() -> Self {
        Self { next: Self::FIRST }
    }

    /// The ID the next successful [`advance`](Self::advance) will return.
    #[cfg(test)]
    fn peek(&self) -> ItemId {
        self.next
    }

    /// Take the next ID and move the counter forward.
    ///
    /// Fails without moving the counter once the ID space is used up.
    pub fn advance(&mut self) -> Result<ItemId, RegistryError> {
        let id = self.next;
        self.next = id
            .checked_add(1)
            .ok_or(RegistryError::IdSpaceExhausted { last: id })?;
        Ok(id)
    }
}

impl Default for IdSequence {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Default)]
struct RegistryState {
    // Keyed by ID, so iteration order is creation order.
    items: BTreeMap<ItemId, Item>,
    ids: IdSequence,
}

/// Process-local item registry.
///
/// ID assignment and insertion happen under one write lock; listing takes a
/// read lock and clones a consistent snapshot.
#[derive(Debug, Default)]
pub struct ItemRegistry {
    state: RwLock<RegistryState>,
}

impl ItemRegistry {
    /// Create an empty registry whose first item gets ID 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry health. The registry has a single always-available state.
    pub fn health(&self) -> HealthStatus {
        HealthStatus::Ok
    }

    /// All stored items, in creation order.
    pub fn list_items(&self) -> Result<Vec<Item>, RegistryError> {
        let state = self.read()?;
        Ok(state.items.values().cloned().collect())
    }

    /// Store a validated item under the next ID and return it.
    pub fn create_item(&self, new_item: NewItem) -> Result<Item, RegistryError> {
        let (item, total) = {
            let mut state = self.write()?;
            let id = state.ids.advance()?;
            let item = Item {
                id,
                name: new_item.name,
                description: new_item.description,
            };
            state.items.insert(id, item.clone());
            (item, state.items.len())
        };

        info!(id = item.id, name = %item.name, total, "Created item");
        Ok(item)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, RegistryState>, RegistryError> {
        self.state.read().map_err(|_| {
            debug!("registry lock poisoned on read");
            RegistryError::LockPoisoned
        })
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, RegistryState>, RegistryError> {
        self.state.write().map_err(|_| {
            debug!("registry lock poisoned on write");
            RegistryError::LockPoisoned
        })
    }

    /// Registry whose next assigned ID is `next`.
    #[cfg(test)]
    pub(crate) fn with_next_id(next: ItemId) -> Self {
        Self {
            state: RwLock::new(RegistryState {
                items: BTreeMap::new(),
                ids: IdSequence { next },
            }),
        }
    }

    /// Poison the state lock by panicking while holding it.
    #[cfg(test)]
    pub(crate) fn poison(&self) {
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = self.state.write().unwrap();
            panic!("poisoning registry lock");
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn new_item(name: &str, description: Option<&str>) -> NewItem {
        NewItem {
            name: name.to_string(),
            description: description.map(str::to_string),
        }
    }

    #[test]
    fn sequence_starts_at_one_and_increments() {
        let mut ids = IdSequence::new();
        assert_eq!(ids.peek(), 1);
        assert_eq!(ids.advance().unwrap(), 1);
        assert_eq!(ids.advance().unwrap(), 2);
        assert_eq!(ids.peek(), 3);
    }

    #[test]
    fn sequence_refuses_to_wrap() {
        let mut ids = IdSequence { next: ItemId::MAX };
        assert!(matches!(
            ids.advance(),
            Err(RegistryError::IdSpaceExhausted { last: ItemId::MAX })
        ));
        assert_eq!(ids.peek(), ItemId::MAX);
    }

    #[test]
    fn health_is_ok_regardless_of_contents() {
        let registry = ItemRegistry::new();
        assert_eq!(registry.health(), HealthStatus::Ok);

        registry.create_item(new_item("Laptop", None)).unwrap();
        assert_eq!(registry.health(), HealthStatus::Ok);
    }

    #[test]
    fn empty_registry_lists_nothing() {
        let registry = ItemRegistry::new();
        assert!(registry.list_items().unwrap().is_empty());
    }

    #[test]
    fn create_assigns_sequential_ids() {
        let registry = ItemRegistry::new();

        let created: Vec<Item> = (1..=5)
            .map(|i| {
                registry
                    .create_item(new_item(&format!("Item {i}"), None))
                    .unwrap()
            })
            .collect();

        let ids: Vec<ItemId> = created.iter().map(|item| item.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert_eq!(registry.list_items().unwrap(), created);
    }

    #[test]
    fn create_keeps_fields() {
        let registry = ItemRegistry::new();
        let item = registry
            .create_item(new_item("Laptop", Some("MacBook Pro 16-inch")))
            .unwrap();

        assert_eq!(
            item,
            Item {
                id: 1,
                name: "Laptop".to_string(),
                description: Some("MacBook Pro 16-inch".to_string()),
            }
        );
    }

    #[test]
    fn fresh_registry_restarts_ids() {
        let first = ItemRegistry::new();
        first.create_item(new_item("A", None)).unwrap();
        first.create_item(new_item("B", None)).unwrap();

        let second = ItemRegistry::new();
        assert_eq!(second.create_item(new_item("C", None)).unwrap().id, 1);
    }

    #[test]
    fn exhausted_ids_leave_registry_untouched() {
        let registry = ItemRegistry::with_next_id(ItemId::MAX);
        assert!(registry.create_item(new_item("Overflow", None)).is_err());
        assert!(registry.list_items().unwrap().is_empty());
    }

    #[test]
    fn poisoned_lock_is_reported() {
        let registry = ItemRegistry::new();
        registry.poison();

        assert!(matches!(
            registry.list_items(),
            Err(RegistryError::LockPoisoned)
        ));
        assert!(matches!(
            registry.create_item(new_item("After", None)),
            Err(RegistryError::LockPoisoned)
        ));
    }

    #[test]
    fn concurrent_creates_never_share_an_id() {
        let registry = Arc::new(ItemRegistry::new());

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    (0..50)
                        .map(|i| {
                            registry
                                .create_item(new_item(&format!("t{t}-{i}"), None))
                                .unwrap()
                                .id
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut ids: Vec<ItemId> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        ids.sort_unstable();

        assert_eq!(ids, (1..=400).collect::<Vec<_>>());

        let listed: Vec<ItemId> = registry
            .list_items()
            .unwrap()
            .into_iter()
            .map(|item| item.id)
            .collect();
        assert_eq!(listed, ids);
    }

    /// Records, for every event, whether the registry lock was free.
    struct LockState {
        registry: Arc<ItemRegistry>,
        observed: Arc<std::sync::Mutex<Vec<bool>>>,
    }

    impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for LockState {
        fn on_event(
            &self,
            _event: &tracing::Event<'_>,
            _ctx: tracing_subscriber::layer::Context<'_, S>,
        ) {
            let free = self.registry.state.try_write().is_ok();
            self.observed.lock().unwrap().push(free);
        }
    }

    #[test]
    fn create_logs_after_releasing_lock() {
        use tracing_subscriber::prelude::*;

        let registry = Arc::new(ItemRegistry::new());
        let observed = Arc::new(std::sync::Mutex::new(Vec::new()));
        let subscriber = tracing_subscriber::registry().with(LockState {
            registry: Arc::clone(&registry),
            observed: Arc::clone(&observed),
        });

        tracing::subscriber::with_default(subscriber, || {
            registry.create_item(new_item("Laptop", None)).unwrap();
        });

        let observed = observed.lock().unwrap();
        assert!(!observed.is_empty());
        assert!(observed.iter().all(|free| *free));
    }
}
