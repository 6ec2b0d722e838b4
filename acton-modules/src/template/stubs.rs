//! Built-in stub contents and on-disk overrides
//!
//! Each stub ships with the crate. A project can override any of them by placing
//! a file with the stub's name (e.g. `controller.stub`) in the directory named by
//! `stubs_path` in the configuration.

use crate::error::{RegistryError, RegistryResult};
use std::borrow::Cow;
use std::fs;
use std::path::PathBuf;

/// Stubs known to the generators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stub {
    /// Module database seeder
    Seeder,
    /// Module HTTP routes
    Routes,
    /// Module service provider
    ModuleServiceProvider,
    /// Route service provider
    RouteServiceProvider,
    /// `module.json` descriptor
    Descriptor,
    /// HTTP controller
    Controller,
    /// SQL migration
    Migration,
}

impl Stub {
    /// File name used for on-disk overrides
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Seeder => "seeder.stub",
            Self::Routes => "routes.stub",
            Self::ModuleServiceProvider => "moduleserviceprovider.stub",
            Self::RouteServiceProvider => "routeserviceprovider.stub",
            Self::Descriptor => "module.stub",
            Self::Controller => "controller.stub",
            Self::Migration => "migration.stub",
        }
    }

    /// Stub body shipped with the crate
    #[must_use]
    pub const fn builtin(self) -> &'static str {
        match self {
            Self::Seeder => SEEDER,
            Self::Routes => ROUTES,
            Self::ModuleServiceProvider => MODULE_SERVICE_PROVIDER,
            Self::RouteServiceProvider => ROUTE_SERVICE_PROVIDER,
            Self::Descriptor => DESCRIPTOR,
            Self::Controller => CONTROLLER,
            Self::Migration => MIGRATION,
        }
    }
}

/// Resolves stub contents, preferring project overrides
#[derive(Debug, Clone, Default)]
pub struct StubStore {
    override_dir: Option<PathBuf>,
}

impl StubStore {
    /// Create a store, optionally backed by an override directory
    #[must_use]
    pub const fn new(override_dir: Option<PathBuf>) -> Self {
        Self { override_dir }
    }

    /// Load a stub body
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Io`] if an override file exists but cannot be read.
    pub fn load(&self, stub: Stub) -> RegistryResult<Cow<'static, str>> {
        if let Some(dir) = &self.override_dir {
            let path = dir.join(stub.file_name());
            if path.is_file() {
                tracing::debug!(stub = stub.file_name(), path = %path.display(), "Using stub override");
                return fs::read_to_string(&path)
                    .map(Cow::Owned)
                    .map_err(|e| RegistryError::io(&path, e));
            }
        }

        Ok(Cow::Borrowed(stub.builtin()))
    }
}

/// Database seeder stub
pub const SEEDER: &str = r"//! Database seeder for the {{name}} module

use sqlx::SqlitePool;

/// Seeds initial data for the {{name}} module
pub struct {{name}}DatabaseSeeder;

impl {{name}}DatabaseSeeder {
    /// Run the database seeds
    ///
    /// # Errors
    ///
    /// Returns an error if any seed query fails
    pub async fn run(pool: &SqlitePool) -> anyhow::Result<()> {
        let _ = pool;
        Ok(())
    }
}
";

/// HTTP routes stub
pub const ROUTES: &str = r#"//! HTTP routes for the {{name}} module

use axum::{routing::get, Router};

/// Routes served under `/{{slug}}`
pub fn routes<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/", get(index))
}

async fn index() -> &'static str {
    "This is the {{name}} module index page."
}
"#;

/// Module service provider stub
pub const MODULE_SERVICE_PROVIDER: &str = r#"//! Service provider for the {{name}} module

use axum::Router;

use {{namespace}}::{{slug}}::providers::route_service_provider::RouteServiceProvider;

/// Registers the {{name}} module with the application
pub struct {{name}}ServiceProvider;

impl {{name}}ServiceProvider {
    /// Module slug
    pub const SLUG: &'static str = "{{slug}}";

    /// Register the module's services and routes
    pub fn register<S>(router: Router<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        RouteServiceProvider::map(router)
    }
}
"#;

/// Route service provider stub
pub const ROUTE_SERVICE_PROVIDER: &str = r#"//! Route service provider for the {{name}} module

use axum::Router;

use {{namespace}}::{{slug}}::http::routes;

/// Mounts the {{name}} module routes
pub struct RouteServiceProvider;

impl RouteServiceProvider {
    /// Nest the module router under `/{{slug}}`
    pub fn map<S>(router: Router<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        router.nest("/{{slug}}", routes::routes())
    }
}
"#;

/// Module descriptor stub
pub const DESCRIPTOR: &str = r#"{
    "name": "{{name}}",
    "slug": "{{slug}}",
    "version": "1.0",
    "description": "This is the description for the {{name}} module.",
    "enabled": true,
    "order": 0
}
"#;

/// HTTP controller stub
pub const CONTROLLER: &str = r#"//! {{className}} for the {{moduleName}} module
//!
//! Namespace: `{{namespace}}`

use axum::response::Html;

/// {{className}} handlers
pub struct {{className}};

impl {{className}} {
    /// Index action
    pub async fn index() -> Html<&'static str> {
        Html("{{moduleName}}: {{className}}")
    }
}
"#;

/// SQL migration stub
pub const MIGRATION: &str = r"-- Create {{table}} table for the {{module}} module
CREATE TABLE IF NOT EXISTS {{table}} (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);
";
