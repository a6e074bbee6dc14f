use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::DataLayer;

/// A named tabular dataset registered in the lake.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct DataObject {
    pub id: i64,
    pub category: String,
    pub name: String,
    pub connector: String,
    pub system_id: i64,
    pub data_layer: Option<DataLayer>,
    /// Location of the object's raw data file (Parquet or CSV).
    pub data_path: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied when registering a new object.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NewObject {
    pub category: String,
    pub name: String,
    pub connector: String,
    pub system_id: i64,
    pub data_layer: Option<DataLayer>,
    pub data_path: Option<String>,
}

impl NewObject {
    /// Object record for a file ingested through the upload flow.
    #[must_use]
    pub fn uploaded_file(name: &str, data_path: &str) -> Self {
        Self {
            category: "Uploaded File".to_string(),
            name: name.to_string(),
            connector: "CSV".to_string(),
            system_id: 0,
            data_layer: Some(DataLayer::Bronze),
            data_path: Some(data_path.to_string()),
        }
    }
}
