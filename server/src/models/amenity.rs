use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Amenity {
    pub amenity_id: i64,
    pub property_id: i64,
    pub name: String,
    pub description: Option<String>,
}
