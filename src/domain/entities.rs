use crate::domain::value_objects::ProfileId;
use serde::{Deserialize, Serialize};

/// Static description of an IDE version the editor knows about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileDescriptor {
    pub id: ProfileId,
    pub display_name: String,
    /// Store location holding the override path and flag
    pub settings_location: String,
    /// Store location whose presence means the IDE extension is installed
    pub marker_location: String,
}

/// Override configuration of one IDE profile, as read from the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Profile {
    pub id: ProfileId,
    pub display_name: String,
    pub is_installed: bool,
    pub custom_executable_path: String,
    pub enabled: bool,
}

impl Profile {
    /// A profile with nothing persisted yet
    pub fn unconfigured(descriptor: &ProfileDescriptor, is_installed: bool) -> Self {
        Self {
            id: descriptor.id.clone(),
            display_name: descriptor.display_name.clone(),
            is_installed,
            custom_executable_path: String::new(),
            enabled: false,
        }
    }
}
