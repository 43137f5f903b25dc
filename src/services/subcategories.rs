use crate::{
    common::{deserialize_some, required_text},
    entities::{
        category::{self, Entity as Category},
        subcategory::{self, Entity as Subcategory},
    },
    errors::ServiceError,
    services::{identifier::Identifier, parse_id, ParentName, SubcategoryWithCategory},
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

/// Body of `POST /api/subcategories`
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CreateSubcategoryInput {
    #[schema(value_type = Option<String>, format = Uuid)]
    pub category_id: Option<String>,
    pub name: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    /// Copied from the parent category when omitted
    pub tax_applicability: Option<bool>,
    /// Copied from the parent category when omitted
    #[schema(value_type = Option<f64>)]
    pub tax: Option<Decimal>,
}

/// Body of `PUT /api/subcategories/:id`
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateSubcategoryInput {
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
}

#[derive(Clone)]
pub struct SubcategoryService {
    db: Arc<DatabaseConnection>,
}

impl SubcategoryService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Creates a subcategory under an existing category.
    ///
    /// Tax fields that are not supplied are taken from the parent as it is
    /// right now. Later changes to the parent do not reach the subcategory.
    #[instrument(skip(self))]
    pub async fn create_subcategory(
        &self,
        input: CreateSubcategoryInput,
    ) -> Result<subcategory::Model, ServiceError> {
        let (Some(raw_category_id), Some(name)) =
            (required_text(input.category_id), required_text(input.name))
        else {
            return Err(ServiceError::ValidationError(
                "Category ID and name are required".to_string(),
            ));
        };

        // An id that cannot exist is reported the same way as a missing parent.
        let parent = match Uuid::parse_str(&raw_category_id) {
            Ok(category_id) => Category::find_by_id(category_id).one(&*self.db).await?,
            Err(_) => None,
        }
        .ok_or_else(|| ServiceError::NotFound("Category not found".to_string()))?;

        let subcategory = subcategory::ActiveModel {
            id: Set(Uuid::new_v4()),
            category_id: Set(parent.id),
            name: Set(name),
            image: Set(input.image),
            description: Set(input.description),
            tax_applicability: Set(input
                .tax_applicability
                .unwrap_or(parent.tax_applicability)),
            tax: Set(input.tax.unwrap_or(parent.tax)),
            created_at: Set(Utc::now()),
        };

        let subcategory = subcategory.insert(&*self.db).await?;

        info!(
            subcategory_id = %subcategory.id,
            category_id = %parent.id,
            "Created subcategory"
        );
        Ok(subcategory)
    }

    /// All subcategories, newest first, with the parent category name
    #[instrument(skip(self))]
    pub async fn list_subcategories(&self) -> Result<Vec<SubcategoryWithCategory>, ServiceError> {
        let rows = Subcategory::find()
            .find_also_related(Category)
            .order_by_desc(subcategory::Column::CreatedAt)
            .all(&*self.db)
            .await?;

        Ok(rows.into_iter().map(with_category_name).collect())
    }

    /// Subcategories of one category, newest first, without annotation
    #[instrument(skip(self))]
    pub async fn list_by_category(
        &self,
        category_id: &str,
    ) -> Result<Vec<subcategory::Model>, ServiceError> {
        let category_id = parse_id(category_id)?;

        Subcategory::find()
            .filter(subcategory::Column::CategoryId.eq(category_id))
            .order_by_desc(subcategory::Column::CreatedAt)
            .all(&*self.db)
            .await
            .map_err(Into::into)
    }

    #[instrument(skip(self))]
    pub async fn get_subcategory(
        &self,
        identifier: &str,
    ) -> Result<SubcategoryWithCategory, ServiceError> {
        let query = match Identifier::classify(identifier) {
            Identifier::ById(id) => Subcategory::find_by_id(id),
            Identifier::ByName(name) => {
                Subcategory::find().filter(subcategory::Column::Name.eq(name))
            }
        };

        query
            .find_also_related(Category)
            .one(&*self.db)
            .await?
            .map(with_category_name)
            .ok_or_else(|| ServiceError::NotFound("Subcategory not found".to_string()))
    }

    /// Partial update. Tax fields are never re-read from the parent.
    #[instrument(skip(self))]
    pub async fn update_subcategory(
        &self,
        id: &str,
        input: UpdateSubcategoryInput,
    ) -> Result<subcategory::Model, ServiceError> {
        let id = parse_id(id)?;
        let mut active = subcategory::ActiveModel {
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

        if !active.is_changed() {
            return Subcategory::find_by_id(id)
                .one(&*self.db)
                .await?
                .ok_or_else(|| {
                    DbErr::RecordNotFound(format!("No subcategory with id {id}")).into()
                });
        }

        let subcategory = active.update(&*self.db).await?;
        info!("Updated subcategory: {}", id);
        Ok(subcategory)
    }
}

fn with_category_name(
    (subcategory, category): (subcategory::Model, Option<category::Model>),
) -> SubcategoryWithCategory {
    SubcategoryWithCategory {
        subcategory,
        categories: category.map(|c| ParentName { name: c.name }),
    }
}
