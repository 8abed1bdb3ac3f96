pub mod errors;
pub mod db;
pub mod validation;
pub mod status;
pub mod admin_user;
pub mod banner;
pub mod category;
pub mod subcategory;
pub mod carousel_image;
pub mod product;
pub mod catalog_service;
pub mod homepage_section;
pub mod homepage_section_service;
pub mod order;
pub mod order_item;
pub mod payment;
