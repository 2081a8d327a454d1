//! Cache key helpers
//!
//! Listing caches live under `"<resource>:list"` so a single prefix-clear
//! drops every cached page of a resource after a write.

/// Prefix shared by every cached listing of `resource`.
pub fn list_prefix(resource: &str) -> String {
    format!("{}:list", resource)
}

/// Key for one cached listing of `resource`, e.g. a page/filter combination.
///
/// An empty discriminator yields the bare prefix.
pub fn list_key(resource: &str, discriminator: &str) -> String {
    if discriminator.is_empty() {
        list_prefix(resource)
    } else {
        format!("{}:list:{}", resource, discriminator)
    }
}
