use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Property {
    pub property_id: i64,
    pub owner_id: i64,
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub description: Option<String>,
    /// Blob-store path of the listing image, served by an external proxy.
    pub image_url: Option<String>,
    pub image_description: Option<String>,
}
