use crate::domain::entities::ProfileDescriptor;
use crate::domain::value_objects::ProfileId;
use anyhow::{Result, bail};

/// Package GUIDs of the tool-window extension per IDE version
const VS2012_PACKAGE_GUID: &str = "9cf2e4d2-fa2e-4e55-9af0-185783ea2dc7";
const VS2013_PACKAGE_GUID: &str = "adff2b7c-9847-421c-9598-b378536cc3c4";

/// Ordered set of known profiles with unique ids
#[derive(Debug, Clone)]
pub struct ProfileCatalog {
    descriptors: Vec<ProfileDescriptor>,
}

impl ProfileCatalog {
    /// The IDE versions the editor ships with
    pub fn builtin() -> Self {
        Self {
            descriptors: vec![
                visual_studio("VS2012", "Visual Studio 2012", "11.0", VS2012_PACKAGE_GUID),
                visual_studio("VS2013", "Visual Studio 2013", "12.0", VS2013_PACKAGE_GUID),
            ],
        }
    }

    /// Appends user-declared profiles after the existing ones.
    /// An id that is already known is rejected.
    pub fn with_extra(mut self, extra: Vec<ProfileDescriptor>) -> Result<Self> {
        for descriptor in extra {
            if descriptor.id.as_str().trim().is_empty() {
                bail!("profile id cannot be empty");
            }
            if self.find(&descriptor.id).is_some() {
                bail!("profile '{}' is declared more than once", descriptor.id);
            }
            self.descriptors.push(descriptor);
        }
        Ok(self)
    }

    pub fn find(&self, id: &ProfileId) -> Option<&ProfileDescriptor> {
        self.descriptors.iter().find(|descriptor| &descriptor.id == id)
    }

    pub fn descriptors(&self) -> &[ProfileDescriptor] {
        &self.descriptors
    }
}

fn visual_studio(id: &str, display_name: &str, version: &str, package_guid: &str) -> ProfileDescriptor {
    let root = format!("Software\\Microsoft\\VisualStudio\\{}", version);
    ProfileDescriptor {
        id: ProfileId::from(id),
        display_name: display_name.to_string(),
        settings_location: format!("{}\\CustomFsi", root),
        marker_location: format!("{}\\Packages\\{{{}}}", root, package_guid),
    }
}
