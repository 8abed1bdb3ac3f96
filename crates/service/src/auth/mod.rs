//! Admin auth: domain, repository and service layers.
//!
//! Only dashboard admins authenticate; storefront customers check out anonymously.

pub mod domain;
pub mod errors;
pub mod repository;
pub mod service;
pub mod repo;

pub use service::{AuthService, AuthSettings};
