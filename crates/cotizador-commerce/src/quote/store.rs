//! The quote cart store.
//!
//! A single owned value holding the customer's quote lines. Every effective
//! change is written through to a [`Cache`] and announced to subscribers.
//!
//! The store starts un-hydrated: until [`QuoteStore::hydrate`] has read the
//! persisted cart, [`QuoteStore::view`] reports [`Hydration::Pending`] and
//! nothing is written back, so a pre-rendered empty cart can never overwrite
//! the customer's saved one.

use std::collections::HashSet;
use std::fmt;

use cotizador_cache::{Backend, Cache};
use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::quote::{QuoteItem, Urgency};

/// Storage key the cart is persisted under.
pub const QUOTE_STORAGE_KEY: &str = "cotizador-quote";

/// Version stamped on persisted carts.
const PERSISTED_VERSION: u32 = 0;

/// Persisted cart document.
#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedQuote {
    #[serde(default)]
    items: Vec<QuoteItem>,
    #[serde(default)]
    version: u32,
}

/// Borrowing twin of [`PersistedQuote`] for writes.
#[derive(Serialize)]
struct PersistedQuoteRef<'a> {
    items: &'a [QuoteItem],
    version: u32,
}

/// Readiness of client-side state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hydration<T> {
    /// Persisted state has not been restored yet; render a placeholder.
    Pending,
    /// Persisted state is restored.
    Ready(T),
}

impl<T> Hydration<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, Hydration::Ready(_))
    }

    pub fn ready(self) -> Option<T> {
        match self {
            Hydration::Ready(value) => Some(value),
            Hydration::Pending => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Hydration<U> {
        match self {
            Hydration::Ready(value) => Hydration::Ready(f(value)),
            Hydration::Pending => Hydration::Pending,
        }
    }

    /// The ready value, or `placeholder` while pending.
    pub fn unwrap_or(self, placeholder: T) -> T {
        self.ready().unwrap_or(placeholder)
    }
}

/// Aggregate numbers shown in the header badge and cart page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct QuoteSummary {
    /// Distinct lines.
    pub item_count: usize,
    /// Sum of quantities.
    pub total_items: u64,
    /// Lines flagged urgent.
    pub urgent_count: usize,
}

/// Handle returned by [`QuoteStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&[QuoteItem])>;

/// The quote cart: ordered lines, unique by product id, persisted and
/// observable.
pub struct QuoteStore<B> {
    items: Vec<QuoteItem>,
    cache: Cache<B>,
    key: String,
    hydrated: bool,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl<B: Backend> QuoteStore<B> {
    /// Create an empty, un-hydrated store persisting under
    /// [`QUOTE_STORAGE_KEY`].
    pub fn new(cache: Cache<B>) -> Self {
        Self::with_key(cache, QUOTE_STORAGE_KEY)
    }

    /// Create an empty, un-hydrated store persisting under `key`.
    pub fn with_key(cache: Cache<B>, key: impl Into<String>) -> Self {
        Self {
            items: Vec::new(),
            cache,
            key: key.into(),
            hydrated: false,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Create a store and hydrate it immediately.
    pub fn open(cache: Cache<B>) -> Self {
        let mut store = Self::new(cache);
        store.hydrate();
        store
    }

    /// Restore the persisted cart and mark the store ready.
    ///
    /// A persisted cart replaces whatever is in memory. Missing or
    /// unreadable state leaves the in-memory cart as is. Calling this on
    /// a hydrated store is a no-op.
    pub fn hydrate(&mut self) {
        if self.hydrated {
            return;
        }

        match self.cache.get::<PersistedQuote>(&self.key) {
            Ok(Some(persisted)) => {
                if persisted.version > PERSISTED_VERSION {
                    tracing::warn!(
                        key = %self.key,
                        version = persisted.version,
                        "persisted quote is from a newer version, reading what is understood"
                    );
                }
                self.items = dedupe(persisted.items);
                self.hydrated = true;
                tracing::debug!(key = %self.key, items = self.items.len(), "quote hydrated");
            }
            Ok(None) => {
                self.hydrated = true;
                if !self.items.is_empty() {
                    self.persist();
                }
                tracing::debug!(key = %self.key, "no persisted quote");
            }
            Err(e) => {
                self.hydrated = true;
                tracing::warn!(key = %self.key, error = %e, "failed to read persisted quote, keeping in-memory lines unsaved");
            }
        }

        self.notify();
    }

    /// Whether persisted state has been restored.
    pub fn is_hydrated(&self) -> bool {
        self.hydrated
    }

    /// Add `quantity` units of `product`.
    ///
    /// A new product is appended with empty notes and normal urgency; an
    /// existing line has `quantity` added to it. The quantity is not
    /// validated here.
    pub fn add_item(&mut self, product: &Product, quantity: u32) -> bool {
        match self.items.iter_mut().find(|i| i.product.id == product.id) {
            Some(existing) => {
                if quantity == 0 {
                    return false;
                }
                existing.quantity = existing.quantity.saturating_add(quantity);
                tracing::debug!(product_id = %product.id, quantity = existing.quantity, "quote line incremented");
            }
            None => {
                self.items.push(QuoteItem::new(product.clone(), quantity));
                tracing::debug!(product_id = %product.id, quantity, "quote line added");
            }
        }
        self.commit();
        true
    }

    /// Add a single unit of `product`.
    pub fn add_one(&mut self, product: &Product) -> bool {
        self.add_item(product, 1)
    }

    /// Remove the line for `product_id`, if present.
    pub fn remove_item(&mut self, product_id: ProductId) -> bool {
        let len_before = self.items.len();
        self.items.retain(|i| i.product.id != product_id);
        let removed = self.items.len() < len_before;
        if removed {
            tracing::debug!(%product_id, "quote line removed");
            self.commit();
        }
        removed
    }

    /// Replace a line's quantity. Quantities below one are ignored rather
    /// than clamped or treated as removal.
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: u32) -> bool {
        if quantity < 1 {
            return false;
        }
        self.update(product_id, |item| {
            if item.quantity == quantity {
                return false;
            }
            item.quantity = quantity;
            true
        })
    }

    /// Replace a line's notes.
    pub fn update_notes(&mut self, product_id: ProductId, notes: impl Into<String>) -> bool {
        let notes = notes.into();
        self.update(product_id, move |item| {
            if item.notes == notes {
                return false;
            }
            item.notes = notes;
            true
        })
    }

    /// Replace a line's urgency.
    pub fn update_urgency(&mut self, product_id: ProductId, urgency: Urgency) -> bool {
        self.update(product_id, |item| {
            if item.urgency == urgency {
                return false;
            }
            item.urgency = urgency;
            true
        })
    }

    /// Empty the cart.
    pub fn clear_quote(&mut self) -> bool {
        if self.items.is_empty() {
            return false;
        }
        self.items.clear();
        tracing::debug!("quote cleared");
        self.commit();
        true
    }

    fn update(&mut self, product_id: ProductId, f: impl FnOnce(&mut QuoteItem) -> bool) -> bool {
        let changed = match self.items.iter_mut().find(|i| i.product.id == product_id) {
            Some(item) => f(item),
            None => false,
        };
        if changed {
            tracing::debug!(%product_id, "quote line updated");
            self.commit();
        }
        changed
    }

    /// Sum of quantities across all lines.
    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Number of distinct lines.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Lines in insertion order.
    pub fn items(&self) -> &[QuoteItem] {
        &self.items
    }

    pub fn get(&self, product_id: ProductId) -> Option<&QuoteItem> {
        self.items.iter().find(|i| i.product.id == product_id)
    }

    /// Whether a product is already in the cart.
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.get(product_id).is_some()
    }

    /// Lines with the given urgency, in insertion order.
    pub fn items_with_urgency(&self, urgency: Urgency) -> Vec<&QuoteItem> {
        self.items.iter().filter(|i| i.urgency == urgency).collect()
    }

    pub fn summary(&self) -> QuoteSummary {
        QuoteSummary {
            item_count: self.item_count(),
            total_items: self.total_items(),
            urgent_count: self.items.iter().filter(|i| i.is_urgent()).count(),
        }
    }

    /// Summary once hydrated, [`Hydration::Pending`] before.
    pub fn view(&self) -> Hydration<QuoteSummary> {
        if self.hydrated {
            Hydration::Ready(self.summary())
        } else {
            Hydration::Pending
        }
    }

    /// Lines once hydrated, [`Hydration::Pending`] before.
    pub fn hydrated_items(&self) -> Hydration<&[QuoteItem]> {
        if self.hydrated {
            Hydration::Ready(&self.items)
        } else {
            Hydration::Pending
        }
    }

    /// Register a listener called with the full line list after every
    /// change and after hydration.
    pub fn subscribe(&mut self, listener: impl FnMut(&[QuoteItem]) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns false if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let len_before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() < len_before
    }

    /// Write the cart to storage now, reporting failures.
    pub fn save(&self) -> Result<(), CommerceError> {
        let doc = PersistedQuoteRef {
            items: &self.items,
            version: PERSISTED_VERSION,
        };
        self.cache.set(&self.key, &doc)?;
        Ok(())
    }

    fn commit(&mut self) {
        if self.hydrated {
            self.persist();
        }
        self.notify();
    }

    fn persist(&self) {
        if let Err(e) = self.save() {
            tracing::warn!(key = %self.key, error = %e, "failed to persist quote, keeping it in memory");
        }
    }

    fn notify(&mut self) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(&self.items);
        }
    }
}

impl<B> fmt::Debug for QuoteStore<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuoteStore")
            .field("key", &self.key)
            .field("hydrated", &self.hydrated)
            .field("items", &self.items)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Keep the first line per product id.
fn dedupe(items: Vec<QuoteItem>) -> Vec<QuoteItem> {
    let mut seen = HashSet::new();
    let before = items.len();
    let items: Vec<QuoteItem> = items
        .into_iter()
        .filter(|i| seen.insert(i.product.id))
        .collect();
    if items.len() < before {
        tracing::warn!(dropped = before - items.len(), "persisted quote had duplicate lines");
    }
    items
}
