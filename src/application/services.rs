use crate::application::catalog::ProfileCatalog;
use crate::domain::entities::{Profile, ProfileDescriptor};
use crate::domain::errors::{ResolverError, ResolverResult};
use crate::domain::value_objects::{ProfileId, StoreKey, StoreValue};
use anyhow::Result;
use std::rc::Rc;
use tracing::{debug, info, warn};

/// Value name holding the custom executable path
pub const PATH_VALUE: &str = "CustomFsiPath";
/// Value name holding the enabled flag
pub const ENABLED_VALUE: &str = "CustomFsiEnabled";

/// Trait for persisted key-value stores to enable mocking and dependency inversion
#[cfg_attr(test, mockall::automock)]
pub trait SettingsStore {
    /// Reads one value; `None` when the location or the value is absent
    fn read(&self, key: &StoreKey) -> Result<Option<StoreValue>>;

    /// Writes every value in one pass, creating locations as needed.
    /// On error none of the values are persisted.
    fn write_all(&self, values: &[(StoreKey, StoreValue)]) -> Result<()>;

    fn location_exists(&self, location: &str) -> Result<bool>;
}

/// Decides whether the IDE extension a profile targets is present
pub trait InstallationProbe {
    fn is_installed(&self, descriptor: &ProfileDescriptor) -> bool;
}

impl<F> InstallationProbe for F
where
    F: Fn(&ProfileDescriptor) -> bool,
{
    fn is_installed(&self, descriptor: &ProfileDescriptor) -> bool {
        self(descriptor)
    }
}

/// Probe that looks for the descriptor's marker location in the store
pub struct MarkerProbe {
    store: Rc<dyn SettingsStore>,
}

impl MarkerProbe {
    pub fn new(store: Rc<dyn SettingsStore>) -> Self {
        Self { store }
    }
}

impl InstallationProbe for MarkerProbe {
    fn is_installed(&self, descriptor: &ProfileDescriptor) -> bool {
        match self.store.location_exists(&descriptor.marker_location) {
            Ok(present) => present,
            Err(e) => {
                warn!(profile = %descriptor.id, "installation marker unreadable: {:#}", e);
                false
            }
        }
    }
}

/// Application service mapping profile ids to their persisted override settings
/// This is the single source of truth shared by every shell
pub struct SettingsResolver {
    store: Rc<dyn SettingsStore>,
    probe: Box<dyn InstallationProbe>,
    catalog: ProfileCatalog,
}

impl SettingsResolver {
    pub fn new(
        store: Rc<dyn SettingsStore>,
        probe: Box<dyn InstallationProbe>,
        catalog: ProfileCatalog,
    ) -> Self {
        Self {
            store,
            probe,
            catalog,
        }
    }

    /// All profiles the resolver knows, installed or not
    pub fn known(&self) -> &[ProfileDescriptor] {
        self.catalog.descriptors()
    }

    pub fn descriptor(&self, id: &ProfileId) -> ResolverResult<&ProfileDescriptor> {
        self.catalog
            .find(id)
            .ok_or_else(|| ResolverError::NotFound { id: id.clone() })
    }

    /// Loads the current persisted values for a known profile
    pub fn resolve(&self, id: &ProfileId) -> ResolverResult<Profile> {
        let descriptor = self.descriptor(id)?;
        self.load(descriptor, self.probe.is_installed(descriptor))
    }

    /// Materializes every installed profile, in catalog order
    pub fn list_installed(&self) -> Vec<Profile> {
        self.catalog
            .descriptors()
            .iter()
            .filter(|descriptor| self.probe.is_installed(descriptor))
            .map(|descriptor| self.load_or_default(descriptor, true))
            .collect()
    }

    /// Materializes every known profile, in catalog order
    pub fn list_known(&self) -> Vec<Profile> {
        self.known()
            .iter()
            .map(|descriptor| {
                self.load_or_default(descriptor, self.probe.is_installed(descriptor))
            })
            .collect()
    }

    /// Persists both override fields. The path is stored as given.
    pub fn commit(&self, id: &ProfileId, enabled: bool, path: &str) -> ResolverResult<()> {
        let descriptor = self.descriptor(id)?;
        let location = &descriptor.settings_location;

        self.store.write_all(&[
            (
                StoreKey::new(location, PATH_VALUE),
                StoreValue::String(path.to_string()),
            ),
            (StoreKey::new(location, ENABLED_VALUE), StoreValue::flag(enabled)),
        ])?;

        info!(profile = %id, enabled, path, "committed override");
        Ok(())
    }

    /// Probes the installation marker; never cached
    pub fn is_installed(&self, id: &ProfileId) -> bool {
        self.catalog
            .find(id)
            .is_some_and(|descriptor| self.probe.is_installed(descriptor))
    }

    fn load(&self, descriptor: &ProfileDescriptor, is_installed: bool) -> ResolverResult<Profile> {
        let mut profile = Profile::unconfigured(descriptor, is_installed);
        let location = &descriptor.settings_location;

        let path_key = StoreKey::new(location, PATH_VALUE);
        if let Some(value) = self.store.read(&path_key)? {
            match value.as_text() {
                Some(path) => profile.custom_executable_path = path.to_string(),
                None => warn!(key = %path_key, ?value, "ignoring non-string path value"),
            }
        }

        let enabled_key = StoreKey::new(location, ENABLED_VALUE);
        if let Some(value) = self.store.read(&enabled_key)? {
            match value.as_flag() {
                Some(enabled) => profile.enabled = enabled,
                None => warn!(key = %enabled_key, ?value, "ignoring non-flag enabled value"),
            }
        }

        debug!(profile = %profile.id, installed = profile.is_installed, "resolved profile");
        Ok(profile)
    }

    fn load_or_default(&self, descriptor: &ProfileDescriptor, is_installed: bool) -> Profile {
        self.load(descriptor, is_installed).unwrap_or_else(|e| {
            warn!(profile = %descriptor.id, "falling back to defaults: {}", e);
            Profile::unconfigured(descriptor, is_installed)
        })
    }
}
