use crate::domain::entities::Profile;
use anyhow::{Result, anyhow};
use colored::Colorize;

pub fn print_profiles(profiles: &[Profile], json: bool) -> Result<()> {
    if json {
        let pretty = serde_json::to_string_pretty(profiles)
            .map_err(|e| anyhow!("Failed to format JSON: {}", e))?;
        println!("{}", pretty);
        return Ok(());
    }
    if profiles.is_empty() {
        println!("{}", "No installed profiles: nothing to configure.".yellow());
        return Ok(());
    }
    for profile in profiles {
        println!("{}", format_profile(profile));
    }
    Ok(())
}

pub fn print_profile(profile: &Profile, json: bool) -> Result<()> {
    if json {
        let pretty = serde_json::to_string_pretty(profile)
            .map_err(|e| anyhow!("Failed to format JSON: {}", e))?;
        println!("{}", pretty);
    } else {
        println!("{}", format_profile(profile));
    }
    Ok(())
}

fn format_profile(profile: &Profile) -> String {
    let state = if profile.enabled {
        "enabled".green()
    } else {
        "disabled".white()
    };
    let installed = if profile.is_installed {
        "installed".cyan()
    } else {
        "not installed".dimmed()
    };
    let path = if profile.custom_executable_path.is_empty() {
        "(default fsi)".dimmed()
    } else {
        profile.custom_executable_path.normal()
    };
    format!(
        "{} {} [{}, {}] {}",
        profile.id.as_str().bold(),
        profile.display_name,
        state,
        installed,
        path
    )
}
