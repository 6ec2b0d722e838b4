//! Placeholder substitution for module stubs
//!
//! Stubs are opaque text containing a closed set of `{{token}}` placeholders.
//! Rendering replaces each bound placeholder in a single pass; anything else,
//! including recognised but unbound tokens and stray `{{` sequences, is copied
//! through verbatim.
//!
//! There is no escape syntax: a stub cannot emit a literal `{{name}}` when
//! `name` is bound.

pub mod stubs;

use aho_corasick::AhoCorasick;
use std::collections::BTreeMap;
use std::sync::LazyLock;

pub use stubs::{Stub, StubStore};

/// Recognised placeholder tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Placeholder {
    /// `{{slug}}` - module slug (`blog_posts`)
    Slug,
    /// `{{name}}` - module display name (`BlogPosts`)
    Name,
    /// `{{namespace}}` - configured or artifact namespace
    Namespace,
    /// `{{className}}` - generated type name
    ClassName,
    /// `{{moduleName}}` - owning module display name
    ModuleName,
    /// `{{module}}` - owning module slug for migration-style artifacts
    Module,
    /// `{{table}}` - table name for migration-style artifacts
    Table,
}

impl Placeholder {
    /// Every placeholder, in pattern order
    pub const ALL: [Self; 7] = [
        Self::Slug,
        Self::Name,
        Self::Namespace,
        Self::ClassName,
        Self::ModuleName,
        Self::Module,
        Self::Table,
    ];

    /// Literal token as it appears in stubs
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Slug => "{{slug}}",
            Self::Name => "{{name}}",
            Self::Namespace => "{{namespace}}",
            Self::ClassName => "{{className}}",
            Self::ModuleName => "{{moduleName}}",
            Self::Module => "{{module}}",
            Self::Table => "{{table}}",
        }
    }
}

/// Values bound to placeholders for one render
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings(BTreeMap<Placeholder, String>);

impl Bindings {
    /// Empty bindings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a placeholder, returning the updated bindings
    #[must_use]
    pub fn with(mut self, placeholder: Placeholder, value: impl Into<String>) -> Self {
        self.insert(placeholder, value);
        self
    }

    /// Bind a placeholder in place
    pub fn insert(&mut self, placeholder: Placeholder, value: impl Into<String>) {
        self.0.insert(placeholder, value.into());
    }

    /// Bound value, if any
    #[must_use]
    pub fn get(&self, placeholder: Placeholder) -> Option<&str> {
        self.0.get(&placeholder).map(String::as_str)
    }
}

static MATCHER: LazyLock<AhoCorasick> = LazyLock::new(|| {
    AhoCorasick::new(Placeholder::ALL.map(Placeholder::token))
        .expect("placeholder tokens are valid literal patterns")
});

/// Stub renderer
pub struct TemplateRenderer;

impl TemplateRenderer {
    /// Substitute bound placeholders into `template`
    ///
    /// # Examples
    ///
    /// ```
    /// use acton_modules::template::{Bindings, Placeholder, TemplateRenderer};
    ///
    /// let bindings = Bindings::new()
    ///     .with(Placeholder::Name, "Blog")
    ///     .with(Placeholder::Slug, "blog");
    ///
    /// let out = TemplateRenderer::render("{{name}} at /{{slug}} ({{table}})", &bindings);
    /// assert_eq!(out, "Blog at /blog ({{table}})");
    /// ```
    #[must_use]
    pub fn render(template: &str, bindings: &Bindings) -> String {
        let mut rendered = String::with_capacity(template.len());
        MATCHER.replace_all_with(template, &mut rendered, |found, text, dst| {
            let placeholder = Placeholder::ALL[found.pattern().as_usize()];
            dst.push_str(bindings.get(placeholder).unwrap_or(text));
            true
        });
        rendered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn module_bindings() -> Bindings {
        Bindings::new()
            .with(Placeholder::Slug, "blog")
            .with(Placeholder::Name, "Blog")
            .with(Placeholder::Namespace, "crate::modules")
    }

    #[test]
    fn test_replaces_every_occurrence() {
        let out = TemplateRenderer::render("{{name}}/{{name}}/{{slug}}", &module_bindings());
        assert_eq!(out, "Blog/Blog/blog");
    }

    #[test]
    fn test_unbound_and_unknown_tokens_are_verbatim() {
        let out = TemplateRenderer::render(
            "{{className}} {{unknown}} {{ name }} {{",
            &module_bindings(),
        );
        assert_eq!(out, "{{className}} {{unknown}} {{ name }} {{");
    }

    #[test]
    fn test_values_are_not_reexpanded() {
        let bindings = Bindings::new()
            .with(Placeholder::Name, "{{slug}}")
            .with(Placeholder::Slug, "blog");
        assert_eq!(TemplateRenderer::render("{{name}}-{{slug}}", &bindings), "{{slug}}-blog");
    }

    #[test]
    fn test_empty_template() {
        assert_eq!(TemplateRenderer::render("", &module_bindings()), "");
    }

    #[test]
    fn test_tokens() {
        assert_eq!(Placeholder::ClassName.token(), "{{className}}");
        assert_eq!(Placeholder::ModuleName.token(), "{{moduleName}}");
        assert_eq!(Placeholder::ALL.len(), 7);
    }

    proptest! {
        #[test]
        fn render_is_deterministic(template in ".*", name in "[A-Za-z]{0,12}") {
            let bindings = Bindings::new().with(Placeholder::Name, name);
            prop_assert_eq!(
                TemplateRenderer::render(&template, &bindings),
                TemplateRenderer::render(&template, &bindings)
            );
        }

        #[test]
        fn render_without_tokens_is_identity(template in "[^{}]*") {
            prop_assert_eq!(TemplateRenderer::render(&template, &module_bindings()), template);
        }
    }
}
