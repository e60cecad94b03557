use crate::application::catalog::ProfileCatalog;
use crate::application::services::{InstallationProbe, MarkerProbe, SettingsResolver, SettingsStore};
use crate::domain::entities::ProfileDescriptor;
use anyhow::{Result, anyhow};
use std::rc::Rc;

pub struct ResolverBuilder {
    store: Option<Rc<dyn SettingsStore>>,
    probe: Option<Box<dyn InstallationProbe>>,
    extra_profiles: Vec<ProfileDescriptor>,
}

impl ResolverBuilder {
    pub fn new() -> Self {
        Self {
            store: None,
            probe: None,
            extra_profiles: Vec::new(),
        }
    }

    pub fn store(mut self, store: Rc<dyn SettingsStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Replaces the default marker lookup in the store
    pub fn probe(mut self, probe: Box<dyn InstallationProbe>) -> Self {
        self.probe = Some(probe);
        self
    }

    pub fn extra_profiles(mut self, profiles: &[ProfileDescriptor]) -> Self {
        self.extra_profiles.extend_from_slice(profiles);
        self
    }

    pub fn build(self) -> Result<SettingsResolver> {
        let store = self
            .store
            .ok_or_else(|| anyhow!("A settings store is required"))?;
        let probe = match self.probe {
            Some(probe) => probe,
            None => Box::new(MarkerProbe::new(store.clone())),
        };
        let catalog = ProfileCatalog::builtin().with_extra(self.extra_profiles)?;

        Ok(SettingsResolver::new(store, probe, catalog))
    }
}

impl Default for ResolverBuilder {
    fn default() -> Self {
        Self::new()
    }
}
