use crate::{
    common::{deserialize_some, required_text},
    entities::category::{self, Entity as Category},
    errors::ServiceError,
    services::{identifier::Identifier, parse_id},
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Unchanged, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;

/// Body of `POST /api/categories`
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CreateCategoryInput {
    pub name: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub tax_applicability: Option<bool>,
    #[schema(value_type = Option<f64>)]
    pub tax: Option<Decimal>,
    pub tax_type: Option<String>,
}

/// Body of `PUT /api/categories/:id`; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateCategoryInput {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub image: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    pub tax_applicability: Option<bool>,
    #[schema(value_type = Option<f64>)]
    pub tax: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub tax_type: Option<Option<String>>,
}

/// Top-level menu grouping service
#[derive(Clone)]
pub struct CategoryService {
    db: Arc<DatabaseConnection>,
}

impl CategoryService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Create a category; tax defaults to not applicable at rate 0
    #[instrument(skip(self))]
    pub async fn create_category(
        &self,
        input: CreateCategoryInput,
    ) -> Result<category::Model, ServiceError> {
        let name = required_text(input.name)
            .ok_or_else(|| ServiceError::ValidationError("Name is required".to_string()))?;

        let category = category::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            image: Set(input.image),
            description: Set(input.description),
            tax_applicability: Set(input.tax_applicability.unwrap_or(false)),
            tax: Set(input.tax.unwrap_or(Decimal::ZERO)),
            tax_type: Set(input.tax_type),
            created_at: Set(Utc::now()),
        };

        let category = category.insert(&*self.db).await?;

        info!("Created category: {}", category.id);
        Ok(category)
    }

    /// All categories, newest first
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<category::Model>, ServiceError> {
        Category::find()
            .order_by_desc(category::Column::CreatedAt)
            .all(&*self.db)
            .await
            .map_err(Into::into)
    }

    /// Resolve a category by id or exact name
    #[instrument(skip(self))]
    pub async fn get_category(&self, identifier: &str) -> Result<category::Model, ServiceError> {
        let query = match Identifier::classify(identifier) {
            Identifier::ById(id) => Category::find_by_id(id),
            Identifier::ByName(name) => Category::find().filter(category::Column::Name.eq(name)),
        };

        query
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Category not found".to_string()))
    }

    /// Apply the supplied fields only. A missing row surfaces as the store's
    /// own error.
    #[instrument(skip(self))]
    pub async fn update_category(
        &self,
        id: &str,
        input: UpdateCategoryInput,
    ) -> Result<category::Model, ServiceError> {
        let id = parse_id(id)?;
        let mut active = category::ActiveModel {
            id: Unchanged(id),
            ..Default::default()
        };

        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(image) = input.image {
            active.image = Set(image);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(tax_applicability) = input.tax_applicability {
            active.tax_applicability = Set(tax_applicability);
        }
        if let Some(tax) = input.tax {
            active.tax = Set(tax);
        }
        if let Some(tax_type) = input.tax_type {
            active.tax_type = Set(tax_type);
        }

        if !active.is_changed() {
            return Category::find_by_id(id)
                .one(&*self.db)
                .await?
                .ok_or_else(|| DbErr::RecordNotFound(format!("No category with id {id}")).into());
        }

        let category = active.update(&*self.db).await?;
        info!("Updated category: {}", id);
        Ok(category)
    }
}
