//! Request-context middleware
//!
//! Attaches the current module's properties to every request routed to it, so
//! handlers can read them with `Extension<ModuleContext>`.
//!
//! # Example
//!
//! ```rust,no_run
//! use acton_modules::middleware::{identify_module, ModuleContext, ModuleLayer};
//! use acton_modules::{ModulesConfig, Registry, Slug};
//! use axum::{routing::get, Extension, Router};
//! use std::sync::Arc;
//!
//! # fn example() -> Result<(), acton_modules::RegistryError> {
//! let registry = Arc::new(Registry::new(ModulesConfig::load()?)?);
//!
//! let blog = Router::new()
//!     .route("/", get(|Extension(module): Extension<ModuleContext>| async move {
//!         module.name().unwrap_or_default().to_string()
//!     }))
//!     .layer(axum::middleware::from_fn_with_state(
//!         ModuleLayer::new(registry, Slug::parse("blog")?),
//!         identify_module,
//!     ));
//!
//! let app: Router = Router::new().nest("/blog", blog);
//! # Ok(())
//! # }
//! ```

use crate::error::RegistryError;
use crate::module::{Properties, Slug};
use crate::registry::Registry;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use http::StatusCode;
use serde_json::Value;
use std::sync::Arc;

/// State for [`identify_module`]: the registry and the module being served
#[derive(Debug, Clone)]
pub struct ModuleLayer {
    registry: Arc<Registry>,
    slug: Slug,
}

impl ModuleLayer {
    /// Bind the middleware to one module
    #[must_use]
    pub const fn new(registry: Arc<Registry>, slug: Slug) -> Self {
        Self { registry, slug }
    }
}

/// Properties of the module handling the current request
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleContext {
    slug: Slug,
    properties: Properties,
}

impl ModuleContext {
    /// Name under which the context is exposed to templates and handlers
    pub const KEY: &'static str = "module";

    /// Module slug
    #[must_use]
    pub const fn slug(&self) -> &Slug {
        &self.slug
    }

    /// All stored properties
    #[must_use]
    pub const fn properties(&self) -> &Properties {
        &self.properties
    }

    /// One stored property
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Display name from the descriptor, if present
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.get("name").and_then(Value::as_str)
    }
}

/// Look up the bound module and insert its [`ModuleContext`] into the request
///
/// Responds `404 Not Found` if the module is not registered and
/// `500 Internal Server Error` if the repository fails.
pub async fn identify_module(
    State(layer): State<ModuleLayer>,
    mut request: Request,
    next: Next,
) -> Response {
    let registry = Arc::clone(&layer.registry);
    let slug = layer.slug.clone();

    // Repository calls block (the database backend drives its own runtime)
    let lookup = tokio::task::spawn_blocking(move || registry.properties(&slug)).await;

    match lookup {
        Ok(Ok(properties)) => {
            tracing::trace!(module = %layer.slug, "Module context attached");
            request.extensions_mut().insert(ModuleContext {
                slug: layer.slug,
                properties,
            });
            next.run(request).await
        }
        Ok(Err(e)) => e.into_response(),
        Err(e) => {
            tracing::error!(module = %layer.slug, error = %e, "Module lookup task failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

impl IntoResponse for RegistryError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()).into_response(),
            e => {
                tracing::error!(error = %e, "Module registry error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Module registry unavailable").into_response()
            }
        }
    }
}
