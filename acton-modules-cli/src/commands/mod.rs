//! CLI command implementations

pub mod list;
pub mod make;
pub mod make_controller;
pub mod make_migration;
pub mod toggle;

pub use list::{ListCommand, ListFilter, ListOptions};
pub use make::MakeCommand;
pub use make_controller::MakeControllerCommand;
pub use make_migration::MakeMigrationCommand;
pub use toggle::ToggleCommand;

use acton_modules::{Registry, Slug};
use anyhow::Result;
use clap::Subcommand;
use console::Emoji;

pub(crate) static SUCCESS: Emoji = Emoji("✓", "√");
pub(crate) static INFO: Emoji = Emoji("ℹ", "i");

/// Module management commands
#[derive(Debug, Subcommand)]
pub enum ModuleCommand {
    /// Create a new module
    ///
    /// Examples:
    ///   acton-modules module:make blog
    ///   acton-modules module:make user_profiles
    #[command(name = "module:make")]
    Make {
        /// Module name (normalised to a lower-case slug)
        name: String,
    },

    /// Create a migration inside a module
    #[command(name = "module:make:migration")]
    MakeMigration {
        /// Module slug
        module: String,
        /// Table name (e.g., `users`, `BlogPosts`)
        table: String,
    },

    /// Create a controller inside a module
    #[command(name = "module:make:controller")]
    MakeController {
        /// Module slug
        module: String,
        /// Controller name (e.g., `PostController`)
        name: String,
    },

    /// List modules
    #[command(name = "module:list")]
    List {
        /// Only enabled modules
        #[arg(long, conflicts_with = "disabled")]
        enabled: bool,
        /// Only disabled modules
        #[arg(long)]
        disabled: bool,
        /// Sort by a descriptor property (e.g., `order`)
        #[arg(long, value_name = "KEY")]
        sort: Option<String>,
        /// Sort descending
        #[arg(long, requires = "sort")]
        desc: bool,
    },

    /// Enable a module
    #[command(name = "module:enable")]
    Enable {
        /// Module slug
        slug: String,
    },

    /// Disable a module
    #[command(name = "module:disable")]
    Disable {
        /// Module slug
        slug: String,
    },
}

impl ModuleCommand {
    /// Execute the command against `registry`
    ///
    /// # Errors
    ///
    /// Returns the underlying [`acton_modules::RegistryError`] (possibly with
    /// context) if the operation fails.
    pub fn execute(&self, registry: &Registry) -> Result<()> {
        match self {
            Self::Make { name } => MakeCommand::new(name).execute(registry),
            Self::MakeMigration { module, table } => {
                MakeMigrationCommand::new(parse_slug(module)?, table).execute(registry)
            }
            Self::MakeController { module, name } => {
                MakeControllerCommand::new(parse_slug(module)?, name).execute(registry)
            }
            Self::List {
                enabled,
                disabled,
                sort,
                desc,
            } => {
                let filter = if *enabled {
                    ListFilter::Enabled
                } else if *disabled {
                    ListFilter::Disabled
                } else {
                    ListFilter::All
                };
                ListCommand::new(ListOptions {
                    filter,
                    sort: sort.clone(),
                    descending: *desc,
                })
                .execute(registry)
            }
            Self::Enable { slug } => ToggleCommand::enable(parse_slug(slug)?).execute(registry),
            Self::Disable { slug } => ToggleCommand::disable(parse_slug(slug)?).execute(registry),
        }
    }
}

fn parse_slug(input: &str) -> Result<Slug> {
    Ok(Slug::parse(input)?)
}
