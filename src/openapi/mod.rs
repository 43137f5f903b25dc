use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Menu Management API",
        version = "0.1.0",
        description = r#"
# Menu Management API

CRUD endpoints for a three-level menu: categories, subcategories and items.

## Lookups

Single-resource paths accept either an id or an exact name. A segment shaped
like a UUID is looked up by id, anything else by name.

## Tax inheritance

A subcategory created without `tax_applicability` or `tax` copies them from
its category at creation time. Later category changes are not propagated.

## Totals

`total_amount` is always `base_amount - discount`. Updates recompute it from
the supplied amounts, falling back to the stored ones.

## Error Handling

Every failure returns a JSON body:

```json
{
  "error": "Item not found",
  "request_id": "5f0c6f7e-1f39-4d36-8f53-7a1c2b0e9d11",
  "timestamp": "2024-01-01T00:00:00Z"
}
```
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development")
    ),
    tags(
        (name = "Categories", description = "Top-level menu groupings"),
        (name = "Subcategories", description = "Groupings within a category"),
        (name = "Items", description = "Sellable menu entries")
    ),
    paths(
        // Categories
        crate::handlers::categories::create_category,
        crate::handlers::categories::list_categories,
        crate::handlers::categories::get_category,
        crate::handlers::categories::update_category,

        // Subcategories
        crate::handlers::subcategories::create_subcategory,
        crate::handlers::subcategories::list_subcategories,
        crate::handlers::subcategories::list_subcategories_by_category,
        crate::handlers::subcategories::get_subcategory,
        crate::handlers::subcategories::update_subcategory,

        // Items
        crate::handlers::items::create_item,
        crate::handlers::items::list_items,
        crate::handlers::items::search_items,
        crate::handlers::items::list_items_by_category,
        crate::handlers::items::list_items_by_subcategory,
        crate::handlers::items::get_item,
        crate::handlers::items::update_item,
    ),
    components(
        schemas(
            // Resources
            crate::entities::category::Model,
            crate::entities::subcategory::Model,
            crate::entities::item::Model,
            crate::services::ParentName,
            crate::services::SubcategoryWithCategory,
            crate::services::ItemWithParents,

            // Request bodies
            crate::services::categories::CreateCategoryInput,
            crate::services::categories::UpdateCategoryInput,
            crate::services::subcategories::CreateSubcategoryInput,
            crate::services::subcategories::UpdateSubcategoryInput,
            crate::services::items::CreateItemInput,
            crate::services::items::UpdateItemInput,

            // Error types
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDocV1;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}
