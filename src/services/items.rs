use crate::{
    common::{deserialize_some, required_text},
    entities::{
        category::{self, Entity as Category},
        item::{self, Entity as Item},
        subcategory::{self, Entity as Subcategory},
    },
    errors::ServiceError,
    services::{identifier::Identifier, parse_id, ItemWithParents, ParentName},
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::Expr,
    ActiveModelTrait,
    ActiveValue::Unchanged,
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Select, Set,
};
use serde::Deserialize;
use std::{collections::HashMap, sync::Arc};
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;

/// Body of `POST /api/items`
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CreateItemInput {
    #[schema(value_type = Option<String>, format = Uuid)]
    pub category_id: Option<String>,
    /// Not checked against `category_id`
    #[schema(value_type = Option<String>, format = Uuid)]
    pub subcategory_id: Option<String>,
    pub name: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub tax_applicability: Option<bool>,
    #[schema(value_type = Option<f64>)]
    pub tax: Option<Decimal>,
    /// Zero is a valid amount
    #[schema(value_type = Option<f64>)]
    pub base_amount: Option<Decimal>,
    #[schema(value_type = Option<f64>)]
    pub discount: Option<Decimal>,
}

/// Body of `PUT /api/items/:id`
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateItemInput {
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
    #[schema(value_type = Option<f64>)]
    pub base_amount: Option<Decimal>,
    #[schema(value_type = Option<f64>)]
    pub discount: Option<Decimal>,
}

/// `base_amount - discount`
pub fn total_amount(base_amount: Decimal, discount: Decimal) -> Result<Decimal, ServiceError> {
    base_amount.checked_sub(discount).ok_or_else(|| {
        ServiceError::ValidationError("Total amount is out of range".to_string())
    })
}

const LIKE_ESCAPE: char = '!';

/// `%term%` with `%`, `_` and the escape char escaped, so the term only ever
/// matches literally
fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[derive(Clone)]
pub struct ItemService {
    db: Arc<DatabaseConnection>,
}

impl ItemService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Creates an item and derives its total. Category and subcategory ids are
    /// only checked by the store's foreign keys.
    #[instrument(skip(self))]
    pub async fn create_item(&self, input: CreateItemInput) -> Result<item::Model, ServiceError> {
        let (Some(raw_category_id), Some(name), Some(base_amount)) = (
            required_text(input.category_id),
            required_text(input.name),
            input.base_amount,
        ) else {
            return Err(ServiceError::ValidationError(
                "Category ID, name, and base amount are required".to_string(),
            ));
        };

        let category_id = parse_id(&raw_category_id)?;
        let subcategory_id = required_text(input.subcategory_id)
            .map(|raw| parse_id(&raw))
            .transpose()?;
        let discount = input.discount.unwrap_or(Decimal::ZERO);

        let item = item::ActiveModel {
            id: Set(Uuid::new_v4()),
            category_id: Set(category_id),
            subcategory_id: Set(subcategory_id),
            name: Set(name),
            image: Set(input.image),
            description: Set(input.description),
            tax_applicability: Set(input.tax_applicability.unwrap_or(false)),
            tax: Set(input.tax.unwrap_or(Decimal::ZERO)),
            base_amount: Set(base_amount),
            discount: Set(discount),
            total_amount: Set(total_amount(base_amount, discount)?),
            created_at: Set(Utc::now()),
        };

        let item = item.insert(&*self.db).await?;

        info!(item_id = %item.id, total_amount = %item.total_amount, "Created item");
        Ok(item)
    }

    #[instrument(skip(self))]
    pub async fn list_items(&self) -> Result<Vec<ItemWithParents>, ServiceError> {
        self.annotated(Item::find()).await
    }

    #[instrument(skip(self))]
    pub async fn list_by_category(
        &self,
        category_id: &str,
    ) -> Result<Vec<ItemWithParents>, ServiceError> {
        let category_id = parse_id(category_id)?;
        self.annotated(Item::find().filter(item::Column::CategoryId.eq(category_id)))
            .await
    }

    #[instrument(skip(self))]
    pub async fn list_by_subcategory(
        &self,
        subcategory_id: &str,
    ) -> Result<Vec<ItemWithParents>, ServiceError> {
        let subcategory_id = parse_id(subcategory_id)?;
        self.annotated(Item::find().filter(item::Column::SubcategoryId.eq(subcategory_id)))
            .await
    }

    /// Case-insensitive substring match on the item name
    #[instrument(skip(self))]
    pub async fn search_by_name(
        &self,
        term: Option<&str>,
    ) -> Result<Vec<ItemWithParents>, ServiceError> {
        let term = term.filter(|t| !t.is_empty()).ok_or_else(|| {
            ServiceError::ValidationError("Search name parameter is required".to_string())
        })?;

        // The store folds case on both sides so column and term always agree
        let name_matches = Expr::cust_with_exprs(
            format!("LOWER($1) LIKE LOWER($2) ESCAPE '{LIKE_ESCAPE}'"),
            [
                Expr::col((item::Entity, item::Column::Name)).into(),
                Expr::val(contains_pattern(term)).into(),
            ],
        );

        self.annotated(Item::find().filter(name_matches)).await
    }

    #[instrument(skip(self))]
    pub async fn get_item(&self, identifier: &str) -> Result<ItemWithParents, ServiceError> {
        let query = match Identifier::classify(identifier) {
            Identifier::ById(id) => Item::find_by_id(id),
            Identifier::ByName(name) => Item::find().filter(item::Column::Name.eq(name)),
        };

        let Some((item, category)) = query
            .find_also_related(Category)
            .one(&*self.db)
            .await?
        else {
            return Err(ServiceError::NotFound("Item not found".to_string()));
        };

        let subcategories = self.subcategory_names(item.subcategory_id.into_iter()).await?;
        Ok(with_parent_names(item, category, &subcategories))
    }

    /// Partial update. The item must already exist; the total is always
    /// rewritten from the supplied amounts, falling back to the stored ones.
    #[instrument(skip(self))]
    pub async fn update_item(
        &self,
        id: &str,
        input: UpdateItemInput,
    ) -> Result<item::Model, ServiceError> {
        let not_found = || ServiceError::NotFound("Item not found".to_string());

        let id = Uuid::parse_str(id).map_err(|_| not_found())?;
        let existing = Item::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(not_found)?;

        let mut active = item::ActiveModel {
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
        if let Some(base_amount) = input.base_amount {
            active.base_amount = Set(base_amount);
        }
        if let Some(discount) = input.discount {
            active.discount = Set(discount);
        }

        let base_amount = input.base_amount.unwrap_or(existing.base_amount);
        let discount = input.discount.unwrap_or(existing.discount);
        active.total_amount = Set(total_amount(base_amount, discount)?);

        let item = active.update(&*self.db).await?;
        info!(item_id = %id, total_amount = %item.total_amount, "Updated item");
        Ok(item)
    }

    /// Runs `query` newest first and attaches parent names
    async fn annotated(&self, query: Select<Item>) -> Result<Vec<ItemWithParents>, ServiceError> {
        let rows = query
            .find_also_related(Category)
            .order_by_desc(item::Column::CreatedAt)
            .all(&*self.db)
            .await?;

        let subcategories = self
            .subcategory_names(rows.iter().filter_map(|(item, _)| item.subcategory_id))
            .await?;

        Ok(rows
            .into_iter()
            .map(|(item, category)| with_parent_names(item, category, &subcategories))
            .collect())
    }

    async fn subcategory_names(
        &self,
        ids: impl Iterator<Item = Uuid>,
    ) -> Result<HashMap<Uuid, String>, ServiceError> {
        let mut ids: Vec<Uuid> = ids.collect();
        ids.sort_unstable();
        ids.dedup();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let subcategories = Subcategory::find()
            .filter(subcategory::Column::Id.is_in(ids))
            .all(&*self.db)
            .await?;

        Ok(subcategories.into_iter().map(|s| (s.id, s.name)).collect())
    }
}

fn with_parent_names(
    item: item::Model,
    category: Option<category::Model>,
    subcategories: &HashMap<Uuid, String>,
) -> ItemWithParents {
    let subcategory = item
        .subcategory_id
        .and_then(|id| subcategories.get(&id))
        .map(|name| ParentName { name: name.clone() });

    ItemWithParents {
        item,
        categories: category.map(|c| ParentName { name: c.name }),
        subcategories: subcategory,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn total_is_base_minus_discount() {
        assert_eq!(total_amount(dec!(100), dec!(20)).unwrap(), dec!(80));
        assert_eq!(total_amount(dec!(100), Decimal::ZERO).unwrap(), dec!(100));
        assert_eq!(total_amount(Decimal::ZERO, Decimal::ZERO).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn total_keeps_fractional_amounts_exact() {
        assert_eq!(total_amount(dec!(9.99), dec!(0.33)).unwrap(), dec!(9.66));
    }

    #[test]
    fn discount_larger_than_base_goes_negative() {
        assert_eq!(total_amount(dec!(10), dec!(15)).unwrap(), dec!(-5));
    }

    #[test]
    fn overflowing_total_is_rejected() {
        let err = total_amount(Decimal::MIN, Decimal::MAX).unwrap_err();
        assert!(matches!(err, ServiceError::ValidationError(_)));
    }

    #[test]
    fn search_pattern_is_unanchored() {
        assert_eq!(contains_pattern("Cola"), "%Cola%");
    }

    #[test]
    fn search_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("50%_off!"), "%50!%!_off!!%");
    }
}
