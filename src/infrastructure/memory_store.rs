use crate::application::services::SettingsStore;
use crate::domain::value_objects::{StoreKey, StoreValue, normalize_location};
use anyhow::Result;
use std::cell::RefCell;
use std::collections::BTreeMap;

/// In-memory store for tests; locations can appear and disappear at will
#[derive(Default)]
pub struct MemoryStore {
    locations: RefCell<BTreeMap<String, BTreeMap<String, StoreValue>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_location(&self, location: &str) {
        self.locations
            .borrow_mut()
            .entry(normalize_location(location))
            .or_default();
    }

    pub fn remove_location(&self, location: &str) {
        self.locations.borrow_mut().remove(&normalize_location(location));
    }
}

impl SettingsStore for MemoryStore {
    fn read(&self, key: &StoreKey) -> Result<Option<StoreValue>> {
        Ok(self
            .locations
            .borrow()
            .get(&normalize_location(&key.location))
            .and_then(|values| values.get(&key.name))
            .cloned())
    }

    fn write_all(&self, values: &[(StoreKey, StoreValue)]) -> Result<()> {
        let mut locations = self.locations.borrow_mut();
        for (key, value) in values {
            locations
                .entry(normalize_location(&key.location))
                .or_default()
                .insert(key.name.clone(), value.clone());
        }
        Ok(())
    }

    fn location_exists(&self, location: &str) -> Result<bool> {
        Ok(self
            .locations
            .borrow()
            .contains_key(&normalize_location(location)))
    }
}
