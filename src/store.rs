use std::sync::{Arc, RwLock};

use thiserror::Error;

use crate::address::Address;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("an address with id {0} already exists")]
    DuplicateId(String),
    #[error("address store lock poisoned")]
    Poisoned,
}

/// In-memory, insertion-ordered collection of addresses shared by all requests.
///
/// Every operation takes the lock for its whole duration, so concurrent creates and
/// deletes never interleave inside a single scan.
#[derive(Debug, Clone, Default)]
pub struct AddressStore {
    addresses: Arc<RwLock<Vec<Address>>>,
}

impl AddressStore {
    pub fn new(addresses: Vec<Address>) -> Self {
        Self {
            addresses: Arc::new(RwLock::new(addresses)),
        }
    }

    /// Store holding the two seed records
    pub fn seeded() -> Self {
        Self::new(Address::seed())
    }

    /// All addresses in insertion order
    pub fn list(&self) -> Result<Vec<Address>, StoreError> {
        let addresses = self.addresses.read().map_err(|_| StoreError::Poisoned)?;
        Ok(addresses.clone())
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        let addresses = self.addresses.read().map_err(|_| StoreError::Poisoned)?;
        Ok(addresses.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    /// Append an address to the end of the store
    pub fn insert(&self, address: Address) -> Result<(), StoreError> {
        let mut addresses = self.addresses.write().map_err(|_| StoreError::Poisoned)?;

        if addresses.iter().any(|existing| existing.id == address.id) {
            return Err(StoreError::DuplicateId(address.id));
        }

        addresses.push(address);
        Ok(())
    }

    /// Remove the first address with the given id. Returns whether one was found.
    pub fn remove_by_id(&self, id: &str) -> Result<bool, StoreError> {
        let mut addresses = self.addresses.write().map_err(|_| StoreError::Poisoned)?;

        match addresses.iter().position(|address| address.id == id) {
            Some(index) => {
                addresses.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
