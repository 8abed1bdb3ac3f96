//! Admin actions for the catalogue verticals.
//!
//! Each action is a single ORM call or a short dependent sequence. Callers are
//! expected to invalidate the matching [`crate::cache::StorefrontCache`] scope after
//! a successful mutation.

pub mod banner;
pub mod category;
pub mod subcategory;
pub mod carousel;
pub mod product;
pub mod offering;
pub mod homepage;

use uuid::Uuid;

/// Slug given to soft-deleted rows so the original stays free for reuse.
/// `~` never passes slug validation, so tombstones cannot collide with live rows.
pub(crate) fn tombstone_slug(slug: &str, id: Uuid) -> String {
    let keep: String = slug.chars().take(100).collect();
    format!("{}~{}", keep, &id.simple().to_string()[..8])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tombstone_fits_column_and_is_not_a_valid_slug() {
        let id = Uuid::new_v4();
        let t = tombstone_slug(&"a".repeat(120), id);
        assert!(t.len() <= 120);
        assert!(models::validation::validate_slug(&t).is_err());
    }
}
