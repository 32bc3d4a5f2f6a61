use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product entity. Field constraints (non-empty name, enumerated category,
/// non-negative price, quantity of at least one) are enforced at the
/// handler boundary so the first violation can be surfaced verbatim.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Primary key, assigned by the store and immutable afterwards
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Product name
    pub name: String,

    /// One of the fixed category set
    pub category: String,

    /// Price in whole currency units
    pub price: i64,

    /// Units in stock
    pub quantity: i64,

    /// Optional free-form description; empty is allowed
    pub description: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
