//! Editing session behind every dialog shell.
//!
//! The session materializes the profiles it offers once, when it is opened,
//! and keeps that exact list until it ends, so the index a shell shows in
//! its selector always designates the same profile. The form values are
//! display state only; the resolver stays authoritative.

use crate::application::services::SettingsResolver;
use crate::domain::entities::Profile;
use crate::domain::errors::ResolverResult;
use crate::domain::value_objects::ProfileId;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Values currently shown in the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub enabled: bool,
    pub path: String,
}

impl From<&Profile> for FormState {
    fn from(profile: &Profile) -> Self {
        Self {
            enabled: profile.enabled,
            path: profile.custom_executable_path.clone(),
        }
    }
}

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Committed,
    Cancelled,
}

pub struct EditorSession<'a> {
    resolver: &'a SettingsResolver,
    profiles: Vec<Profile>,
    selected: usize,
    form: FormState,
}

impl<'a> EditorSession<'a> {
    /// Session over one fixed profile, installed or not
    pub fn single(resolver: &'a SettingsResolver, id: &ProfileId) -> ResolverResult<Self> {
        let profile = resolver.resolve(id)?;
        Ok(Self::over(resolver, vec![profile]))
    }

    /// Session over every installed profile; `None` when there is nothing to configure
    pub fn multi(resolver: &'a SettingsResolver) -> Option<Self> {
        let profiles = resolver.list_installed();
        if profiles.is_empty() {
            return None;
        }
        Some(Self::over(resolver, profiles))
    }

    fn over(resolver: &'a SettingsResolver, profiles: Vec<Profile>) -> Self {
        let form = FormState::from(&profiles[0]);
        Self {
            resolver,
            profiles,
            selected: 0,
            form,
        }
    }

    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected(&self) -> &Profile {
        &self.profiles[self.selected]
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    /// Selects the `index`-th materialized profile and shows its values.
    /// Out-of-range indexes are ignored.
    pub fn select(&mut self, index: usize) {
        if let Some(profile) = self.profiles.get(index) {
            self.selected = index;
            self.form = FormState::from(profile);
            debug!(index, profile = %profile.id, "selected");
        }
    }

    pub fn toggle_enabled(&mut self) {
        self.form.enabled = !self.form.enabled;
    }

    pub fn set_path(&mut self, path: impl Into<String>) {
        self.form.path = path.into();
    }

    /// Directory a file chooser should open in: the parent of the current
    /// path, but only when that path is an existing file with a non-empty parent
    pub fn browse_start_dir(&self) -> Option<PathBuf> {
        let current = Path::new(&self.form.path);
        if !current.is_file() {
            return None;
        }
        current
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map(Path::to_path_buf)
    }

    /// Persists the form values for the selected profile
    pub fn confirm(&mut self) -> ResolverResult<Outcome> {
        let FormState { enabled, path } = self.form.clone();
        let profile = &mut self.profiles[self.selected];
        self.resolver.commit(&profile.id, enabled, &path)?;

        profile.enabled = enabled;
        profile.custom_executable_path = path;
        Ok(Outcome::Committed)
    }

    /// Discards the form and shows the persisted values again
    pub fn cancel(&mut self) -> ResolverResult<Outcome> {
        let stored = self.resolver.resolve(&self.selected().id)?;
        self.form = FormState::from(&stored);
        self.profiles[self.selected] = stored;
        Ok(Outcome::Cancelled)
    }
}
