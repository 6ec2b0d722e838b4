//! SQLite-backed module repository
//!
//! Modules live in a `modules` table (one JSON properties column per row) and
//! global properties in `module_settings`. Tables are created on connect.
//!
//! The repository API is blocking, so the backend owns a current-thread tokio
//! runtime and drives every sqlx query to completion on it. When the caller is
//! itself inside a tokio runtime the query is driven from a scoped helper thread,
//! so a database-backed registry can be built, used and dropped from async code.
//! That still blocks the calling worker; prefer `tokio::task::spawn_blocking`.

use super::ModuleRepository;
use crate::error::{RegistryError, RegistryResult};
use crate::module::{Module, Properties, PropertyKey, Slug};
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::future::Future;
use std::str::FromStr;
use std::thread;
use tokio::runtime::{Builder, Handle, Runtime};

const CREATE_MODULES: &str = r"
CREATE TABLE IF NOT EXISTS modules (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    slug TEXT NOT NULL UNIQUE,
    properties TEXT NOT NULL
)";

const CREATE_SETTINGS: &str = r"
CREATE TABLE IF NOT EXISTS module_settings (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)";

/// Private runtime driving sqlx futures for the blocking API
#[derive(Debug)]
struct BlockingRuntime {
    runtime: Option<Runtime>,
}

impl BlockingRuntime {
    fn new() -> std::io::Result<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        Ok(Self {
            runtime: Some(runtime),
        })
    }

    fn run<T, F>(&self, future: F) -> RegistryResult<T>
    where
        F: Future<Output = Result<T, sqlx::Error>> + Send,
        T: Send,
    {
        let Some(runtime) = self.runtime.as_ref() else {
            return Err(RegistryError::Configuration(
                "module database runtime has shut down".to_string(),
            ));
        };

        let result = if Handle::try_current().is_ok() {
            // `block_on` panics on a thread that is already inside a runtime
            thread::scope(|scope| match scope.spawn(|| runtime.block_on(future)).join() {
                Ok(result) => result,
                Err(panic) => std::panic::resume_unwind(panic),
            })
        } else {
            runtime.block_on(future)
        };
        Ok(result?)
    }
}

impl Drop for BlockingRuntime {
    fn drop(&mut self) {
        // Dropping a runtime inside another runtime panics; this never blocks
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}

/// Module repository stored in SQLite
///
/// # Examples
///
/// ```rust,no_run
/// use acton_modules::repository::{DatabaseModuleRepository, ModuleRepository};
///
/// let repo = DatabaseModuleRepository::connect("sqlite://modules.db")?;
/// for module in repo.enabled()? {
///     println!("{}", module.slug());
/// }
/// # Ok::<(), acton_modules::RegistryError>(())
/// ```
#[derive(Debug)]
pub struct DatabaseModuleRepository {
    pool: SqlitePool,
    runtime: BlockingRuntime,
}

impl DatabaseModuleRepository {
    /// Open (creating if necessary) the database at `url`
    ///
    /// Safe to call from inside an async runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if the runtime cannot start, the URL is invalid, or the
    /// schema cannot be created.
    pub fn connect(url: &str) -> RegistryResult<Self> {
        let runtime = BlockingRuntime::new().map_err(|e| RegistryError::io(url, e))?;

        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

        // A single long-lived connection keeps `sqlite::memory:` databases alive
        let pool = runtime.run(
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options),
        )?;

        runtime.run(async {
            sqlx::query(CREATE_MODULES).execute(&pool).await?;
            sqlx::query(CREATE_SETTINGS).execute(&pool).await?;
            Ok::<_, sqlx::Error>(())
        })?;

        tracing::debug!(url, "Connected module repository database");
        Ok(Self { pool, runtime })
    }

    fn fetch_properties(&self, slug: &Slug) -> RegistryResult<Option<Properties>> {
        let row: Option<String> = self.runtime.run(
            sqlx::query_scalar("SELECT properties FROM modules WHERE slug = ?")
                .bind(slug.as_str())
                .fetch_optional(&self.pool),
        )?;

        row.map(|json| serde_json::from_str(&json).map_err(RegistryError::from))
            .transpose()
    }
}

impl Drop for DatabaseModuleRepository {
    fn drop(&mut self) {
        let pool = self.pool.clone();
        if let Err(e) = self.runtime.run(async move {
            pool.close().await;
            Ok::<_, sqlx::Error>(())
        }) {
            tracing::warn!(error = %e, "Failed to close module repository database");
        }
    }
}

impl ModuleRepository for DatabaseModuleRepository {
    fn all(&self) -> RegistryResult<Vec<Module>> {
        let rows: Vec<(String, String)> = self.runtime.run(
            sqlx::query_as("SELECT slug, properties FROM modules ORDER BY id")
                .fetch_all(&self.pool),
        )?;

        let mut modules = Vec::with_capacity(rows.len());
        for (slug, properties) in rows {
            match Slug::parse(&slug) {
                Ok(slug) => modules.push(Module::new(slug, serde_json::from_str(&properties)?)),
                Err(_) => tracing::warn!(slug = %slug, "Skipping module row with an invalid slug"),
            }
        }
        Ok(modules)
    }

    fn exists(&self, slug: &Slug) -> RegistryResult<bool> {
        let found: Option<i64> = self.runtime.run(
            sqlx::query_scalar("SELECT 1 FROM modules WHERE slug = ?")
                .bind(slug.as_str())
                .fetch_optional(&self.pool),
        )?;
        Ok(found.is_some())
    }

    fn count(&self) -> RegistryResult<usize> {
        let count: i64 = self
            .runtime
            .run(sqlx::query_scalar("SELECT COUNT(*) FROM modules").fetch_one(&self.pool))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    fn properties(&self, slug: &Slug) -> RegistryResult<Properties> {
        self.fetch_properties(slug)?
            .ok_or_else(|| RegistryError::NotFound(slug.to_string()))
    }

    fn property(&self, property: &str) -> RegistryResult<Option<Value>> {
        match PropertyKey::parse(property)? {
            PropertyKey::Module { slug, key } => {
                Ok(self.fetch_properties(&slug)?.and_then(|mut p| p.remove(&key)))
            }
            PropertyKey::Global(key) => {
                let value: Option<String> = self.runtime.run(
                    sqlx::query_scalar("SELECT value FROM module_settings WHERE key = ?")
                        .bind(&key)
                        .fetch_optional(&self.pool),
                )?;
                value
                    .map(|json| serde_json::from_str(&json).map_err(RegistryError::from))
                    .transpose()
            }
        }
    }

    fn set_property(&self, property: &str, value: Value) -> RegistryResult<()> {
        match PropertyKey::parse(property)? {
            PropertyKey::Module { slug, key } => {
                let mut properties = self.properties(&slug)?;
                tracing::debug!(module = %slug, key = %key, value = %value, "Setting module property");
                properties.insert(key, value);
                let json = serde_json::to_string(&properties)?;

                self.runtime.run(
                    sqlx::query("UPDATE modules SET properties = ? WHERE slug = ?")
                        .bind(json)
                        .bind(slug.as_str())
                        .execute(&self.pool),
                )?;
            }
            PropertyKey::Global(key) => {
                tracing::debug!(key = %key, value = %value, "Setting global property");
                let json = serde_json::to_string(&value)?;

                self.runtime.run(
                    sqlx::query(
                        "INSERT INTO module_settings (key, value) VALUES (?, ?) \
                         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                    )
                    .bind(key)
                    .bind(json)
                    .execute(&self.pool),
                )?;
            }
        }
        Ok(())
    }

    fn register(&self, slug: &Slug, properties: Properties) -> RegistryResult<()> {
        let json = serde_json::to_string(&properties)?;
        self.runtime.run(
            sqlx::query(
                "INSERT INTO modules (slug, properties) VALUES (?, ?) ON CONFLICT(slug) DO NOTHING",
            )
            .bind(slug.as_str())
            .bind(json)
            .execute(&self.pool),
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::{tempdir, TempDir};

    fn slug(s: &str) -> Slug {
        Slug::parse(s).unwrap()
    }

    fn props(value: Value) -> Properties {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    fn setup() -> (TempDir, String) {
        let dir = tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("modules.db").display());
        (dir, url)
    }

    #[test]
    fn test_register_and_query() {
        let (_dir, url) = setup();
        let repo = DatabaseModuleRepository::connect(&url).unwrap();

        repo.register(&slug("wiki"), props(json!({"slug": "wiki", "order": 2}))).unwrap();
        repo.register(&slug("blog"), props(json!({"slug": "blog", "order": 1}))).unwrap();

        // Insertion order, not alphabetical
        let slugs: Vec<_> = repo.all().unwrap().iter().map(|m| m.slug().to_string()).collect();
        assert_eq!(slugs, ["wiki", "blog"]);
        assert_eq!(repo.count().unwrap(), 2);
        assert!(repo.exists(&slug("blog")).unwrap());
        assert!(!repo.exists(&slug("shop")).unwrap());

        let sorted: Vec<_> = repo.sort_by("order").unwrap().iter().map(|m| m.slug().to_string()).collect();
        assert_eq!(sorted, ["blog", "wiki"]);
    }

    #[test]
    fn test_register_twice_keeps_first() {
        let (_dir, url) = setup();
        let repo = DatabaseModuleRepository::connect(&url).unwrap();

        repo.register(&slug("blog"), props(json!({"order": 1}))).unwrap();
        repo.register(&slug("blog"), props(json!({"order": 5}))).unwrap();

        assert_eq!(repo.count().unwrap(), 1);
        assert_eq!(repo.property("blog::order").unwrap(), Some(json!(1)));
    }

    #[test]
    fn test_toggle_persists_across_reopen() {
        let (_dir, url) = setup();
        {
            let repo = DatabaseModuleRepository::connect(&url).unwrap();
            repo.register(&slug("blog"), props(json!({"enabled": true}))).unwrap();
            repo.disable(&slug("blog")).unwrap();
            repo.disable(&slug("blog")).unwrap();
            repo.set_property("default_locale", json!("en")).unwrap();
        }

        let repo = DatabaseModuleRepository::connect(&url).unwrap();
        assert!(repo.is_disabled(&slug("blog")).unwrap());
        assert_eq!(repo.disabled().unwrap().len(), 1);
        assert!(repo.enabled().unwrap().is_empty());
        assert_eq!(repo.property("default_locale").unwrap(), Some(json!("en")));
    }

    #[test]
    fn test_global_property_last_write_wins() {
        let (_dir, url) = setup();
        let repo = DatabaseModuleRepository::connect(&url).unwrap();

        assert_eq!(repo.property_or("theme", json!("light")).unwrap(), json!("light"));
        repo.set_property("theme", json!("dark")).unwrap();
        repo.set_property("theme", json!("solarized")).unwrap();
        assert_eq!(repo.property("theme").unwrap(), Some(json!("solarized")));
    }

    #[test]
    fn test_unknown_module() {
        let (_dir, url) = setup();
        let repo = DatabaseModuleRepository::connect(&url).unwrap();

        assert!(matches!(
            repo.properties(&slug("ghost")),
            Err(RegistryError::NotFound(s)) if s == "ghost"
        ));
        assert!(matches!(repo.enable(&slug("ghost")), Err(RegistryError::NotFound(_))));
        assert_eq!(repo.property("ghost::enabled").unwrap(), None);
    }

    #[test]
    fn test_in_memory_database() {
        let repo = DatabaseModuleRepository::connect("sqlite::memory:").unwrap();
        repo.register(&slug("blog"), Properties::new()).unwrap();

        // Missing `enabled` defaults to enabled
        assert!(repo.is_enabled(&slug("blog")).unwrap());
    }

    #[test]
    fn test_invalid_url() {
        let result = DatabaseModuleRepository::connect("postgres://localhost/modules");
        assert!(matches!(result, Err(RegistryError::Database(_))));
    }

    #[tokio::test]
    async fn test_usable_inside_current_thread_runtime() {
        let (_dir, url) = setup();
        let repo = DatabaseModuleRepository::connect(&url).unwrap();

        repo.register(&slug("blog"), props(json!({"enabled": true}))).unwrap();
        repo.disable(&slug("blog")).unwrap();
        assert!(repo.is_disabled(&slug("blog")).unwrap());

        drop(repo);
        let reopened = DatabaseModuleRepository::connect(&url).unwrap();
        assert_eq!(reopened.count().unwrap(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_usable_inside_multi_thread_runtime() {
        let repo = DatabaseModuleRepository::connect("sqlite::memory:").unwrap();
        repo.register(&slug("blog"), Properties::new()).unwrap();

        let repo = tokio::task::spawn_blocking(move || {
            assert!(repo.exists(&slug("blog")).unwrap());
            repo
        })
        .await
        .unwrap();

        assert!(repo.slugs().unwrap().contains(&slug("blog")));
    }
}
