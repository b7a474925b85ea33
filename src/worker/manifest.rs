//! Asset Manifest
//!
//! The fixed list of static assets cached eagerly on install.

use url::Url;

use crate::error::{CacheError, Result};

/// Storefront shell assets: markup, stylesheet, script bundles, web manifest and icons.
pub const DEFAULT_MANIFEST: &[&str] = &[
    "/",
    "/index.html",
    "/css/style.css",
    "/js/app.js",
    "/js/auth.js",
    "/js/products.js",
    "/js/chat.js",
    "/manifest.json",
    "/images/logo.png",
    "/images/icons/menu.svg",
    "/images/icons/search.svg",
    "/images/icons/cart.svg",
    "/images/icons/arrow-back.svg",
    "/images/icons/home.svg",
    "/images/icons/favorite.svg",
    "/images/icons/purchases.svg",
    "/images/icons/chat.svg",
    "/images/icons/logout.svg",
    "/images/icons/send.svg",
    "/images/icons/more.svg",
    "/images/icons/filter.svg",
    "/images/icons/favorite-outline.svg",
];

pub fn default_manifest() -> Vec<String> {
    DEFAULT_MANIFEST.iter().map(|p| p.to_string()).collect()
}

/// Resolves a path against the origin.
///
/// The result must stay on the origin: scheme-relative paths such as
/// `//other.host/x` and absolute URLs to another host are rejected.
pub fn resolve(origin: &Url, path: &str) -> Result<Url> {
    let url = origin
        .join(path)
        .map_err(|e| CacheError::InvalidRequest(format!("invalid path '{}': {}", path, e)))?;

    if url.origin() != origin.origin() {
        return Err(CacheError::InvalidRequest(format!(
            "path '{}' leaves origin {}",
            path,
            origin.origin().ascii_serialization()
        )));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_manifest_has_no_duplicates() {
        let mut paths = default_manifest();
        let total = paths.len();
        paths.sort();
        paths.dedup();
        assert_eq!(paths.len(), total);
    }

    #[test]
    fn test_resolve_against_origin() {
        let origin = Url::parse("http://shop.test:8080").unwrap();

        let url = resolve(&origin, "/css/style.css").unwrap();
        assert_eq!(url.as_str(), "http://shop.test:8080/css/style.css");

        let root = resolve(&origin, "/").unwrap();
        assert_eq!(root.as_str(), "http://shop.test:8080/");
    }

    #[test]
    fn test_resolve_keeps_query() {
        let origin = Url::parse("http://shop.test").unwrap();
        let url = resolve(&origin, "/api/search?q=steam").unwrap();
        assert_eq!(url.query(), Some("q=steam"));
    }

    #[test]
    fn test_resolve_rejects_other_hosts() {
        let origin = Url::parse("http://shop.test").unwrap();

        let scheme_relative = resolve(&origin, "//evil.test/steal");
        assert!(matches!(scheme_relative, Err(CacheError::InvalidRequest(_))));

        let absolute = resolve(&origin, "https://shop.test/");
        assert!(matches!(absolute, Err(CacheError::InvalidRequest(_))));
    }
}
