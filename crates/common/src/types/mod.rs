use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Success envelope returned by admin actions and storefront reads.
#[derive(Serialize, Debug)]
pub struct ActionOk<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ActionOk<T> {
    pub fn new(data: T) -> Self { Self { success: true, data } }
}

/// A page of rows plus the totals needed to render a pager.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    pub total_items: u64,
    pub total_pages: u64,
}
