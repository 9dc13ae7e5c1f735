use serde::{Deserialize, Serialize};

/// Behavioral options for a connector.
///
/// Only two keys are recognized; anything else found in a persisted
/// descriptor is kept in `extra` and ignored, so newer hosts can add
/// options without breaking older connectors.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorOptions {
    /// If true, staging storage for this connector is purged before
    /// each pipe run.
    #[serde(default)]
    pub recreate_target_db: bool,

    /// If true, each data set gets its own staging collection
    /// (`<table prefix>_<data set name>`) instead of a single shared one.
    #[serde(default)]
    pub use_custom_tables: bool,

    /// Unrecognized option keys, preserved for forward compatibility.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Default for ConnectorOptions {
    fn default() -> Self {
        Self {
            recreate_target_db: false,
            use_custom_tables: false,
            extra: serde_json::Map::new(),
        }
    }
}

/// Static identity and metadata for a connector.
///
/// Immutable after construction. The host uses `id` to route
/// configuration and to name staging storage, and `display_name` for
/// UI display.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Descriptor {
    /// Globally unique, stable connector id.
    pub id: String,
    /// Human-readable data source name.
    pub display_name: String,
    /// Behavioral options.
    pub options: ConnectorOptions,
}

impl Descriptor {
    /// Creates a descriptor.
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        options: ConnectorOptions,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            options,
        }
    }

    /// Prefix used to name staging collections for this connector.
    ///
    /// The connector id is used to assure uniqueness across connectors.
    pub fn table_prefix(&self) -> &str {
        &self.id
    }
}
