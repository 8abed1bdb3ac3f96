//! Service layer providing the storefront's business operations on top of models.
//! - Admin actions per vertical live in `catalog` and `orders`.
//! - Customer-facing reads go through `storefront`, backed by `cache`.
//! - `checkout` and `payment` cover order placement and gateway callbacks.

pub mod errors;
pub mod auth;
pub mod cache;
pub mod media;
pub mod catalog;
pub mod orders;
pub mod payment;
pub mod storefront;
#[cfg(test)]
pub mod test_support;
