//! Project naming and the fixed application descriptor.

use std::sync::LazyLock;

use anyhow::{anyhow, Result};
use regex::Regex;

static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9][a-z0-9-]*$").expect("slug regex should be valid"));

/// Derive a project slug from free-form user input.
///
/// Trims, lowercases, and collapses whitespace runs to single hyphens, so
/// "My Site" becomes `my-site`.
pub fn slugify(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Validate that a slug is safe for stack names, directories, and URLs.
pub fn validate_slug(slug: &str) -> Result<()> {
    if slug.is_empty() {
        return Err(anyhow!("project name must not be empty"));
    }
    if !SLUG_RE.is_match(slug) {
        return Err(anyhow!(
            "project name must be lowercase letters, digits, and hyphens (got '{slug}')"
        ));
    }
    Ok(())
}

/// Descriptor for the one application this assistant manages.
///
/// Immutable once constructed; every field is fixed by the template except
/// the name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteSpec {
    pub name: String,
    pub description: String,
    pub framework: String,
    pub target_framework: String,
    pub container_port: u16,
}

impl SiteSpec {
    /// The fixed descriptor for a project slug.
    pub fn for_project(slug: &str) -> Self {
        Self {
            name: slug.to_string(),
            description: "A static website with Azure CDN".to_string(),
            framework: "go".to_string(),
            target_framework: "go".to_string(),
            container_port: 80,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_lowercases_and_hyphenates() {
        assert_eq!(slugify("My Site"), "my-site");
    }

    #[test]
    fn slugify_collapses_whitespace_runs() {
        assert_eq!(slugify("  My   Demo\tSite "), "my-demo-site");
    }

    #[test]
    fn validate_accepts_simple_slugs() {
        validate_slug("my-site").expect("valid slug");
        validate_slug("site2").expect("valid slug");
    }

    #[test]
    fn validate_rejects_empty_and_bad_chars() {
        assert!(validate_slug("").is_err());
        assert!(validate_slug("-leading").is_err());
        let err = validate_slug("my_site!").unwrap_err();
        assert!(err.to_string().contains("lowercase"));
    }

    #[test]
    fn spec_is_fixed_apart_from_name() {
        let spec = SiteSpec::for_project("my-site");
        assert_eq!(spec.name, "my-site");
        assert_eq!(spec.description, "A static website with Azure CDN");
        assert_eq!(spec.container_port, 80);
    }
}
