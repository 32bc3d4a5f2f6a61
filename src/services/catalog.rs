use crate::entities::{product, Product};
use crate::errors::ServiceError;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use std::sync::Arc;
use tracing::{info, instrument};

const NOT_FOUND: &str = "Product not found";

/// Catalog service owning all access to the products table. Handlers
/// receive it through `AppState`, so tests can stand one up against any
/// connection they like.
#[derive(Clone)]
pub struct ProductCatalogService {
    db: Arc<DatabaseConnection>,
}

/// Normalized listing inputs. `page` and `limit` are already positive by
/// the time they reach the service; non-positive wire values fall back to
/// the defaults at the handler boundary.
#[derive(Debug, Clone)]
pub struct ProductQuery {
    pub page: i64,
    pub limit: i64,
    pub search: Option<String>,
    pub category: Option<String>,
    pub min_price: i64,
    pub max_price: Option<i64>,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 6,
            search: None,
            category: None,
            min_price: 0,
            max_price: None,
        }
    }
}

/// One page of matching rows plus the filter-wide total.
#[derive(Debug)]
pub struct ProductListing {
    pub rows: Vec<product::Model>,
    pub total: u64,
}

/// Validated full field set, used by both create and update (update is a
/// full replace).
#[derive(Debug, Clone)]
pub struct ProductFields {
    pub name: String,
    pub category: String,
    pub price: i64,
    pub quantity: i64,
    pub description: Option<String>,
}

impl ProductCatalogService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Lists products matching the conjunctive filter, plus the total
    /// count over the same filter without limit/offset. A page past the
    /// end of the result set yields an empty row set, not an error.
    #[instrument(skip(self))]
    pub async fn list(&self, query: &ProductQuery) -> Result<ProductListing, ServiceError> {
        let mut condition = Condition::all();

        if let Some(search) = query.search.as_deref().filter(|s| !s.is_empty()) {
            condition = condition.add(product::Column::Name.contains(search));
        }
        if let Some(category) = query.category.as_deref().filter(|c| !c.is_empty()) {
            condition = condition.add(product::Column::Category.eq(category));
        }
        if query.min_price > 0 {
            condition = condition.add(product::Column::Price.gte(query.min_price));
        }
        if let Some(max_price) = query.max_price {
            condition = condition.add(product::Column::Price.lte(max_price));
        }

        let filtered = Product::find().filter(condition);

        let total = filtered.clone().count(&*self.db).await?;

        // Saturating, and clamped so the offset always fits the driver's
        // signed 64-bit parameter; an absurd page is just an empty page.
        let offset = (query.page.saturating_sub(1).max(0) as u64)
            .saturating_mul(query.limit.max(0) as u64)
            .min(i64::MAX as u64);
        let rows = filtered
            .order_by_asc(product::Column::Id)
            .limit(query.limit.max(0) as u64)
            .offset(offset)
            .all(&*self.db)
            .await?;

        Ok(ProductListing { rows, total })
    }

    /// Distinct non-empty category values currently present, sorted for a
    /// stable contract.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<String>, ServiceError> {
        Product::find()
            .select_only()
            .column(product::Column::Category)
            .distinct()
            .filter(product::Column::Category.ne(""))
            .order_by_asc(product::Column::Category)
            .into_tuple::<String>()
            .all(&*self.db)
            .await
            .map_err(Into::into)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i64) -> Result<product::Model, ServiceError> {
        Product::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(NOT_FOUND.to_string()))
    }

    /// Inserts a new product and returns the store-assigned id.
    #[instrument(skip(self))]
    pub async fn create(&self, fields: ProductFields) -> Result<i64, ServiceError> {
        let row = product::ActiveModel {
            name: Set(fields.name),
            category: Set(fields.category),
            price: Set(fields.price),
            quantity: Set(fields.quantity),
            description: Set(fields.description),
            ..Default::default()
        };

        let model = row.insert(&*self.db).await?;
        info!(id = model.id, "created product");
        Ok(model.id)
    }

    /// Full replace of all fields by id. Leaves the store untouched when
    /// the id does not exist.
    #[instrument(skip(self))]
    pub async fn update(&self, id: i64, fields: ProductFields) -> Result<(), ServiceError> {
        let existing = self.get(id).await?;

        let mut active: product::ActiveModel = existing.into();
        active.name = Set(fields.name);
        active.category = Set(fields.category);
        active.price = Set(fields.price);
        active.quantity = Set(fields.quantity);
        active.description = Set(fields.description);

        active.update(&*self.db).await?;
        info!(id, "updated product");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let result = Product::delete_by_id(id).exec(&*self.db).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(NOT_FOUND.to_string()));
        }
        info!(id, "deleted product");
        Ok(())
    }
}
