//! Module value types
//!
//! A module is identified by its [`Slug`] and carries a free-form property map.
//! Everything else about it (display name, directory, namespace) is derived from
//! the slug and configuration at the point of use and is never stored.

use crate::error::{RegistryError, RegistryResult};
use crate::naming::Naming;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Free-form module properties as stored in the descriptor
pub type Properties = serde_json::Map<String, Value>;

/// Property holding a module's enabled flag
pub const ENABLED_KEY: &str = "enabled";

/// Separator between slug and key in module-scoped property names
pub const PROPERTY_SEPARATOR: &str = "::";

/// Normalised module identifier
///
/// Slugs are lower-case and identifier-safe: `[a-z][a-z0-9_]*`.
///
/// # Examples
///
/// ```
/// use acton_modules::module::Slug;
///
/// let slug = Slug::parse("  Blog ").unwrap();
/// assert_eq!(slug.as_str(), "blog");
/// assert_eq!(slug.name(), "Blog");
///
/// assert!(Slug::parse("my blog").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    /// Normalise user input into a slug
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidSlug`] if the lower-cased input is empty,
    /// does not start with a letter, or contains characters other than ASCII
    /// letters, digits, and underscores. Underscores may only join words: a
    /// trailing underscore, a double underscore, or an underscore before a digit
    /// is rejected, since the studly directory name would drop it.
    pub fn parse(input: &str) -> RegistryResult<Self> {
        let normalized = input.trim().to_lowercase();

        let mut chars = normalized.chars();
        let valid_start = chars.next().is_some_and(|c| c.is_ascii_lowercase());
        let valid_rest = chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
        let valid_words = normalized
            .split('_')
            .all(|word| word.chars().next().is_some_and(|c| c.is_ascii_lowercase()));

        if valid_start && valid_rest && valid_words {
            Ok(Self(normalized))
        } else {
            Err(RegistryError::InvalidSlug(input.to_string()))
        }
    }

    /// Slug as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Studly display name (`blog_posts` -> `BlogPosts`)
    #[must_use]
    pub fn name(&self) -> String {
        Naming::studly(&self.0)
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Slug {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Slug {
    type Error = RegistryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Slug> for String {
    fn from(slug: Slug) -> Self {
        slug.0
    }
}

/// A registered module
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Module {
    slug: Slug,
    properties: Properties,
}

impl Module {
    /// Create a module from its slug and stored properties
    #[must_use]
    pub const fn new(slug: Slug, properties: Properties) -> Self {
        Self { slug, properties }
    }

    /// Module slug
    #[must_use]
    pub const fn slug(&self) -> &Slug {
        &self.slug
    }

    /// Studly display name derived from the slug
    #[must_use]
    pub fn name(&self) -> String {
        self.slug.name()
    }

    /// All stored properties
    #[must_use]
    pub const fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Consume the module, returning its properties
    #[must_use]
    pub fn into_properties(self) -> Properties {
        self.properties
    }

    /// A single stored property
    #[must_use]
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Enabled flag, `true` unless explicitly set to `false`
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        enabled_flag(&self.properties)
    }
}

/// Resolve the enabled flag of a property map (absent or non-boolean means enabled)
#[must_use]
pub fn enabled_flag(properties: &Properties) -> bool {
    properties
        .get(ENABLED_KEY)
        .and_then(Value::as_bool)
        .unwrap_or(true)
}

/// Target of a `property` / `set_property` call
///
/// `"blog::enabled"` addresses the `enabled` key of module `blog`; a bare
/// `"default_locale"` addresses the backend's global settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyKey {
    /// Key inside one module's descriptor
    Module {
        /// Owning module
        slug: Slug,
        /// Property name
        key: String,
    },
    /// Key shared across all modules
    Global(String),
}

impl PropertyKey {
    /// Parse a property name
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidSlug`] if the part before `::` is not a
    /// valid slug.
    pub fn parse(property: &str) -> RegistryResult<Self> {
        match property.split_once(PROPERTY_SEPARATOR) {
            Some((slug, key)) => Ok(Self::Module {
                slug: Slug::parse(slug)?,
                key: key.to_string(),
            }),
            None => Ok(Self::Global(property.to_string())),
        }
    }

    /// Build a module-scoped key
    #[must_use]
    pub fn module(slug: &Slug, key: &str) -> String {
        format!("{slug}{PROPERTY_SEPARATOR}{key}")
    }
}

/// Comparable projection of a property value used for sorting
#[derive(Debug, PartialEq)]
enum SortKey<'a> {
    Bool(bool),
    Number(f64),
    Text(&'a str),
}

impl<'a> SortKey<'a> {
    fn of(value: Option<&'a Value>) -> Option<Self> {
        match value? {
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Number(n) => n.as_f64().map(Self::Number),
            Value::String(s) => Some(Self::Text(s)),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    const fn rank(&self) -> u8 {
        match self {
            Self::Bool(_) => 0,
            Self::Number(_) => 1,
            Self::Text(_) => 2,
        }
    }

    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// Stable sort by a property; missing and non-scalar values always sort last
pub fn sort_modules(modules: &mut [Module], key: &str, descending: bool) {
    modules.sort_by(|a, b| {
        match (SortKey::of(a.property(key)), SortKey::of(b.property(key))) {
            (Some(x), Some(y)) => {
                let ordering = x.compare(&y);
                if descending {
                    ordering.reverse()
                } else {
                    ordering
                }
            }
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn module(slug: &str, properties: Value) -> Module {
        let Value::Object(map) = properties else {
            panic!("properties must be an object");
        };
        Module::new(Slug::parse(slug).unwrap(), map)
    }

    #[test]
    fn test_slug_normalisation() {
        assert_eq!(Slug::parse("Blog").unwrap().as_str(), "blog");
        assert_eq!(Slug::parse("user_profiles").unwrap().name(), "UserProfiles");
        assert_eq!(Slug::parse("cms2").unwrap().as_str(), "cms2");
    }

    #[test]
    fn test_invalid_slugs() {
        for input in ["", "   ", "2fa", "my blog", "my-blog", "blog/../etc", "_private"] {
            assert!(
                matches!(Slug::parse(input), Err(RegistryError::InvalidSlug(_))),
                "should reject: {input:?}"
            );
        }
    }

    #[test]
    fn test_slugs_that_would_share_a_directory() {
        for input in ["blog_", "a__b", "blog_2", "shop__"] {
            assert!(
                matches!(Slug::parse(input), Err(RegistryError::InvalidSlug(_))),
                "should reject: {input:?}"
            );
        }

        for input in ["a_b", "user_profiles", "v2_api", "blog2"] {
            assert!(Slug::parse(input).is_ok(), "should accept: {input:?}");
        }
        assert_eq!(Slug::parse("user_profiles").unwrap().name(), "UserProfiles");
    }

    #[test]
    fn test_enabled_defaults_to_true() {
        assert!(module("blog", json!({"name": "Blog"})).is_enabled());
        assert!(module("blog", json!({"enabled": true})).is_enabled());
        assert!(!module("blog", json!({"enabled": false})).is_enabled());
    }

    #[test]
    fn test_property_key_parsing() {
        assert_eq!(
            PropertyKey::parse("blog::enabled").unwrap(),
            PropertyKey::Module {
                slug: Slug::parse("blog").unwrap(),
                key: "enabled".into()
            }
        );
        assert_eq!(
            PropertyKey::parse("locale").unwrap(),
            PropertyKey::Global("locale".into())
        );
        assert!(PropertyKey::parse("Not A Slug::x").is_err());
        assert_eq!(PropertyKey::module(&Slug::parse("blog").unwrap(), "order"), "blog::order");
    }

    #[test]
    fn test_sort_missing_values_last() {
        let mut modules = vec![
            module("gamma", json!({})),
            module("beta", json!({"order": 2})),
            module("alpha", json!({"order": 1})),
            module("delta", json!({"order": [1, 2]})),
        ];

        sort_modules(&mut modules, "order", false);
        let slugs: Vec<_> = modules.iter().map(|m| m.slug().to_string()).collect();
        assert_eq!(slugs, ["alpha", "beta", "gamma", "delta"]);

        sort_modules(&mut modules, "order", true);
        let slugs: Vec<_> = modules.iter().map(|m| m.slug().to_string()).collect();
        assert_eq!(slugs[..2], ["beta", "alpha"]);
    }

    #[test]
    fn test_sort_is_stable() {
        let mut modules = vec![
            module("first", json!({"order": 1})),
            module("second", json!({"order": 1})),
            module("third", json!({"order": 0})),
        ];

        sort_modules(&mut modules, "order", false);
        let slugs: Vec<_> = modules.iter().map(|m| m.slug().to_string()).collect();
        assert_eq!(slugs, ["third", "first", "second"]);
    }
}
