pub mod categories;
pub mod common;
pub mod items;
pub mod subcategories;

use crate::{
    db::DbPool,
    services::{CategoryService, ItemService, SubcategoryService},
};
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer used by the HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub categories: Arc<CategoryService>,
    pub subcategories: Arc<SubcategoryService>,
    pub items: Arc<ItemService>,
}

impl AppServices {
    /// Builds every service over the shared store handle
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self {
            categories: Arc::new(CategoryService::new(db_pool.clone())),
            subcategories: Arc::new(SubcategoryService::new(db_pool.clone())),
            items: Arc::new(ItemService::new(db_pool)),
        }
    }
}
