//! acton-modules: Module registry and scaffolding engine for Acton applications
//!
//! Applications are split into self-contained modules that live under a common
//! root directory (`modules/Blog`, `modules/Shop`, ...). This crate tracks which
//! modules exist and whether they are enabled, and generates new modules and
//! module artifacts from stubs.
//!
//! # Design Principles
//!
//! 1. **One source of truth**: a module exists if and only if its repository
//!    says so
//! 2. **Derived, never stored**: paths and namespaces are computed from the slug
//! 3. **Pluggable storage**: file descriptors, SQLite, or a host-provided backend
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use acton_modules::prelude::*;
//!
//! fn main() -> Result<(), RegistryError> {
//!     let registry = Registry::new(ModulesConfig::load()?)?;
//!
//!     // modules/Blog with providers, routes, seeders and module.json
//!     let report = ScaffoldGenerator::new(&registry).generate("blog")?;
//!
//!     // modules/Blog/http/controllers/post_controller.rs
//!     ControllerGenerator::new(&registry).generate(report.module.slug(), "PostController")?;
//!
//!     registry.disable(report.module.slug())?;
//!     assert!(registry.enabled()?.is_empty());
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - `axum` - request-context middleware exposing module properties to handlers
//!   (default)

pub mod config;
pub mod error;
pub mod module;
pub mod naming;
pub mod observability;
pub mod paths;
pub mod registry;
pub mod repository;
pub mod scaffold;
pub mod template;

#[cfg(feature = "axum")]
pub mod middleware;

pub use config::{ModulesConfig, RepositoryDriver};
pub use error::{RegistryError, RegistryResult};
pub use module::{Module, Properties, Slug};
pub use registry::Registry;
pub use scaffold::{ScaffoldGenerator, ScaffoldReport};

pub mod prelude {
    //! Convenience re-exports for common types and traits
    //!
    //! ```rust
    //! use acton_modules::prelude::*;
    //! ```

    pub use crate::config::{ModulesConfig, RepositoryDriver};
    pub use crate::error::{RegistryError, RegistryResult};
    pub use crate::module::{Module, Properties, Slug};
    pub use crate::registry::Registry;
    pub use crate::repository::ModuleRepository;
    pub use crate::scaffold::{
        ArtifactGenerator, ControllerGenerator, MigrationGenerator, OptimizeHook,
        ScaffoldGenerator, ScaffoldReport,
    };

    #[cfg(feature = "axum")]
    pub use crate::middleware::{identify_module, ModuleContext, ModuleLayer};
}
