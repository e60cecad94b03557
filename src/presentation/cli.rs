use crate::application::services::SettingsResolver;
use crate::application::session::{EditorSession, Outcome};
use crate::domain::value_objects::ProfileId;
use crate::presentation::dialog;
use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing::warn;

/// CLI configuration for custom-fsi
#[derive(Parser, Debug)]
#[command(name = "custom-fsi", version)]
#[command(about = "Point the IDE's F# Interactive window at a custom executable", long_about = None)]
pub struct Cli {
    /// Settings hive to read and write
    #[arg(long, global = true, value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// Configuration file declaring the hive location and extra profiles
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List installed profiles
    List {
        /// Include profiles whose IDE extension is not installed
        #[arg(long)]
        all: bool,

        #[arg(long)]
        json: bool,
    },
    /// Show one profile
    Show {
        id: String,

        #[arg(long)]
        json: bool,
    },
    /// Change the override of one profile; omitted fields keep their value
    Set {
        id: String,

        #[arg(long, conflicts_with = "disable")]
        enable: bool,

        #[arg(long)]
        disable: bool,

        #[arg(long)]
        path: Option<String>,
    },
    /// Open the settings dialog, for one profile or every installed one
    Edit { id: Option<String> },
}

impl Cli {
    pub fn run(&self, resolver: &SettingsResolver) -> Result<()> {
        match &self.command {
            Command::List { all, json } => {
                let profiles = if *all {
                    resolver.list_known()
                } else {
                    resolver.list_installed()
                };
                crate::infrastructure::output::print_profiles(&profiles, *json)
            }
            Command::Show { id, json } => {
                let profile = resolver.resolve(&ProfileId::from(id.as_str()))?;
                crate::infrastructure::output::print_profile(&profile, *json)
            }
            Command::Set {
                id,
                enable,
                disable,
                path,
            } => {
                let enabled = match (enable, disable) {
                    (true, _) => Some(true),
                    (_, true) => Some(false),
                    _ => None,
                };
                set(resolver, &ProfileId::from(id.as_str()), enabled, path.as_deref())
            }
            Command::Edit { id } => edit(resolver, id.as_deref()),
        }
    }
}

fn set(
    resolver: &SettingsResolver,
    id: &ProfileId,
    enabled: Option<bool>,
    path: Option<&str>,
) -> Result<()> {
    let current = resolver.resolve(id)?;
    let enabled = enabled.unwrap_or(current.enabled);
    let path = path.unwrap_or(&current.custom_executable_path);

    if !resolver.is_installed(id) {
        warn!(profile = %id, "IDE extension not installed; the override takes effect once it is");
    }
    if !path.is_empty() && !Path::new(path).exists() {
        warn!(path, "executable does not exist; saving anyway");
    }
    resolver.commit(id, enabled, path)?;

    println!("{}", format!("Saved {}", id).green());
    Ok(())
}

fn edit(resolver: &SettingsResolver, id: Option<&str>) -> Result<()> {
    let session = match id {
        Some(id) => EditorSession::single(resolver, &ProfileId::from(id))?,
        None => match EditorSession::multi(resolver) {
            Some(session) => session,
            None => {
                println!("{}", "No installed profiles: nothing to configure.".yellow());
                return Ok(());
            }
        },
    };

    match dialog::run(session)? {
        Outcome::Committed => println!("{}", "Settings saved.".green()),
        Outcome::Cancelled => println!("{}", "No changes made.".white()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::builders::resolver_builder::ResolverBuilder;
    use crate::domain::entities::ProfileDescriptor;
    use crate::domain::errors::ResolverError;
    use crate::infrastructure::memory_store::MemoryStore;
    use std::rc::Rc;

    fn resolver(installed: bool) -> SettingsResolver {
        ResolverBuilder::new()
            .store(Rc::new(MemoryStore::new()))
            .probe(Box::new(move |_: &ProfileDescriptor| installed))
            .build()
            .unwrap()
    }

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("custom-fsi").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn parses_global_flags_after_the_subcommand() {
        let cli = parse(&["set", "VS2013", "--enable", "--path", "fsi.exe", "-vv", "--store", "hive.json"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.store, Some(PathBuf::from("hive.json")));
        assert!(matches!(
            cli.command,
            Command::Set { ref id, enable: true, disable: false, path: Some(ref p) } if id == "VS2013" && p == "fsi.exe"
        ));
    }

    #[test]
    fn enable_and_disable_conflict() {
        let parsed = Cli::try_parse_from(["custom-fsi", "set", "VS2013", "--enable", "--disable"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn set_keeps_fields_that_were_not_given() {
        let resolver = resolver(true);
        parse(&["set", "VS2013", "--enable", "--path", "C:\\tools\\fsi.exe"])
            .run(&resolver)
            .unwrap();
        parse(&["set", "VS2013", "--disable"]).run(&resolver).unwrap();

        let profile = resolver.resolve(&ProfileId::from("VS2013")).unwrap();
        assert!(!profile.enabled);
        assert_eq!(profile.custom_executable_path, "C:\\tools\\fsi.exe");

        parse(&["set", "VS2013", "--path", ""]).run(&resolver).unwrap();
        let profile = resolver.resolve(&ProfileId::from("VS2013")).unwrap();
        assert_eq!(profile.custom_executable_path, "");
    }

    #[test]
    fn unknown_profiles_fail_with_not_found() {
        let resolver = resolver(true);
        let err = parse(&["show", "VS2008"]).run(&resolver).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ResolverError>(),
            Some(ResolverError::NotFound { .. })
        ));
        assert!(parse(&["set", "VS2008", "--enable"]).run(&resolver).is_err());
    }

    #[test]
    fn edit_with_nothing_installed_is_not_an_error() {
        let resolver = resolver(false);
        assert!(parse(&["edit"]).run(&resolver).is_ok());
        assert!(parse(&["list"]).run(&resolver).is_ok());
    }

    #[test]
    fn set_saves_for_profiles_that_are_not_installed() {
        let resolver = resolver(false);
        parse(&["set", "VS2012", "--enable"]).run(&resolver).unwrap();

        assert!(resolver.resolve(&ProfileId::from("VS2012")).unwrap().enabled);
    }
}
