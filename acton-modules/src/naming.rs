//! Naming helpers for module identifiers and generated artifacts
//!
//! Thin wrappers around the inflector crate so every component derives display
//! names, file names, and class names the same way.

use inflector::Inflector;

/// Naming conventions shared by the path resolver and the generators
pub struct Naming;

impl Naming {
    /// Studly (`PascalCase`) display name for a slug
    ///
    /// # Examples
    ///
    /// ```
    /// # use acton_modules::naming::Naming;
    /// assert_eq!(Naming::studly("blog"), "Blog");
    /// assert_eq!(Naming::studly("user_profiles"), "UserProfiles");
    /// ```
    #[must_use]
    pub fn studly(input: &str) -> String {
        input.to_pascal_case()
    }

    /// Convert string to `snake_case`
    ///
    /// # Examples
    ///
    /// ```
    /// # use acton_modules::naming::Naming;
    /// assert_eq!(Naming::snake("PostController"), "post_controller");
    /// assert_eq!(Naming::snake("HTTPRequest"), "http_request");
    /// ```
    #[must_use]
    pub fn snake(input: &str) -> String {
        input.to_snake_case()
    }

    /// Rust source file name for a class-like artifact
    ///
    /// # Examples
    ///
    /// ```
    /// # use acton_modules::naming::Naming;
    /// assert_eq!(Naming::file_name("PostController"), "post_controller.rs");
    /// ```
    #[must_use]
    pub fn file_name(class_name: &str) -> String {
        format!("{}.rs", Self::snake(class_name))
    }

    /// Normalised table name for migrations
    ///
    /// Table names are taken as given apart from casing, so `users` stays `users`
    /// and `BlogPosts` becomes `blog_posts`.
    #[must_use]
    pub fn table(input: &str) -> String {
        Self::snake(input.trim())
    }
}
