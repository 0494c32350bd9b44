//! Snapshot entity stores.
//!
//! A store is an immutable snapshot of one entity list. Every update is a
//! reducer: it takes the current snapshot and returns a new one, leaving the
//! original untouched. Snapshots share their backing slice, so cloning a
//! store is cheap and a caller can hand the same snapshot to several views.
//!
//! ```rust
//! use ovolab_core::store::EntityStore;
//! # use ovolab_core::{Identified, RecordId};
//! # #[derive(Clone, Debug, PartialEq)]
//! # struct Row(i64);
//! # impl Identified for Row { fn id(&self) -> RecordId { RecordId::new(self.0) } }
//!
//! let empty = EntityStore::<Row>::default();
//! let one = empty.add(Row(1));
//! assert!(empty.is_empty());
//! assert_eq!(one.len(), 1);
//! ```

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::report::DonorLookup;
use crate::types::{
    ChequeoGfe, Donadora, Draft, Fecundacion, Foto, RecordId, SesionOpu, SesionTransferencia,
    Transferencia,
};

/// A record with a server-assigned id.
pub trait Identified {
    /// The record's id.
    fn id(&self) -> RecordId;

    /// Entity name used in error messages.
    fn entity() -> &'static str
    where
        Self: Sized,
    {
        "record"
    }
}

macro_rules! identified {
    ($($ty:ty => $name:literal),* $(,)?) => {
        $(
            impl Identified for $ty {
                fn id(&self) -> RecordId {
                    self.id
                }

                fn entity() -> &'static str {
                    $name
                }
            }
        )*
    };
}

identified! {
    Donadora => "donadora",
    SesionOpu => "sesion_opu",
    Fecundacion => "fecundacion",
    SesionTransferencia => "sesion_transferencia",
    Transferencia => "transferencia",
    ChequeoGfe => "chequeo_gfe",
    Foto => "foto",
    Draft => "draft",
}

// ============================================================================
// EntityStore
// ============================================================================

/// An immutable, cheaply cloneable list of records.
#[derive(Debug)]
pub struct EntityStore<T> {
    items: Arc<[T]>,
}

impl<T> Clone for EntityStore<T> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
        }
    }
}

impl<T> Default for EntityStore<T> {
    fn default() -> Self {
        Self {
            items: Arc::from(Vec::new()),
        }
    }
}

impl<T: Identified + Clone> EntityStore<T> {
    /// Creates a store holding `items` in the given order.
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items: Arc::from(items),
        }
    }

    /// Replaces the whole list, e.g. after a full reload.
    pub fn set_all(&self, items: Vec<T>) -> Self {
        Self::new(items)
    }

    /// Prepends a newly created record.
    pub fn add(&self, item: T) -> Self {
        let mut items = Vec::with_capacity(self.items.len() + 1);
        items.push(item);
        items.extend(self.items.iter().cloned());
        Self::new(items)
    }

    /// Replaces the record with `id` in place.
    pub fn update(&self, id: RecordId, item: T) -> Result<Self> {
        let position = self.position(id)?;
        let mut items = self.items.to_vec();
        items[position] = item;
        Ok(Self::new(items))
    }

    /// Removes the record with `id`.
    pub fn remove(&self, id: RecordId) -> Result<Self> {
        let position = self.position(id)?;
        let mut items = self.items.to_vec();
        items.remove(position);
        Ok(Self::new(items))
    }

    /// Looks up a record by id.
    pub fn get(&self, id: RecordId) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Records in store order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// The backing slice.
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether two stores share the same snapshot.
    pub fn same_snapshot(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.items, &other.items)
    }

    fn position(&self, id: RecordId) -> Result<usize> {
        self.items
            .iter()
            .position(|item| item.id() == id)
            .ok_or_else(|| Error::not_found(T::entity(), id.get()))
    }
}

impl<'a, T> IntoIterator for &'a EntityStore<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

// ============================================================================
// DonadoraStore
// ============================================================================

/// Donor store with donor-specific views.
pub type DonadoraStore = EntityStore<Donadora>;

impl EntityStore<Donadora> {
    /// Active donors only.
    pub fn active(&self) -> impl Iterator<Item = &Donadora> {
        self.iter().filter(|d| d.activo)
    }

    /// Donors whose name or registry number contains `term`.
    pub fn search<'a>(&'a self, term: &'a str) -> impl Iterator<Item = &'a Donadora> {
        self.iter().filter(move |d| d.matches(term))
    }

    /// Id-to-label lookup over every donor in the snapshot.
    pub fn lookup(&self) -> DonorLookup {
        self.iter().collect()
    }
}
