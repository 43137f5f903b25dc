// Menu hierarchy services
pub mod categories;
pub mod identifier;
pub mod items;
pub mod subcategories;

use crate::{
    entities::{item, subcategory},
    errors::ServiceError,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

pub use categories::CategoryService;
pub use items::ItemService;
pub use subcategories::SubcategoryService;

/// Name of a parent row embedded next to a child row
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ParentName {
    pub name: String,
}

/// Subcategory row with its category's name under `categories`
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SubcategoryWithCategory {
    #[serde(flatten)]
    pub subcategory: subcategory::Model,
    /// `null` when the parent row is gone
    pub categories: Option<ParentName>,
}

/// Item row with its category and subcategory names
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ItemWithParents {
    #[serde(flatten)]
    pub item: item::Model,
    pub categories: Option<ParentName>,
    pub subcategories: Option<ParentName>,
}

/// Parses an id coming from a path or body. Rejected the way the store
/// rejects a malformed uuid.
pub(crate) fn parse_id(raw: &str) -> Result<Uuid, ServiceError> {
    Uuid::parse_str(raw).map_err(|_| {
        ServiceError::ValidationError(format!("invalid input syntax for type uuid: \"{raw}\""))
    })
}
