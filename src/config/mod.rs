//! Engine configuration loading and management
//!
//! A [`GridConfig`] is built once (in code or from YAML) and bound into a
//! grid engine at construction. It is never mutated while requests run.

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Message used when neither the operation nor the configuration supplies one
pub const DEFAULT_ERROR_MESSAGE: &str = "Error on operation";

/// Names of the request parameters understood by the engine
///
/// Defaults follow the jqGrid `prmNames` vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterNames {
    /// One-based page number
    pub page: String,
    /// Page size; negative means unbounded
    pub rows: String,
    /// Sort field
    pub sort: String,
    /// Sort order (`asc` or `desc`)
    pub order: String,
    /// Search flag
    pub search: String,
    /// Single filter field
    pub search_field: String,
    /// Single filter operator code
    pub search_operator: String,
    /// Single filter value
    pub search_string: String,
    /// Filter group as JSON
    pub filters: String,
    /// Pages count multiplier
    pub pages_count: String,
    /// Row identity on delete
    pub id: String,
    /// Operation discriminator
    pub operator: String,
    /// Discriminator value for add
    pub add_operator: String,
    /// Discriminator value for edit
    pub edit_operator: String,
    /// Discriminator value for delete
    pub delete_operator: String,
}

impl Default for ParameterNames {
    fn default() -> Self {
        Self {
            page: "page".to_string(),
            rows: "rows".to_string(),
            sort: "sidx".to_string(),
            order: "sord".to_string(),
            search: "_search".to_string(),
            search_field: "searchField".to_string(),
            search_operator: "searchOper".to_string(),
            search_string: "searchString".to_string(),
            filters: "filters".to_string(),
            pages_count: "npage".to_string(),
            id: "id".to_string(),
            operator: "oper".to_string(),
            add_operator: "add".to_string(),
            edit_operator: "edit".to_string(),
            delete_operator: "del".to_string(),
        }
    }
}

/// Whether list responses may be served to GET requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GetPolicy {
    #[default]
    Deny,
    Allow,
}

/// Shape of the `cell` of each listed row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellLayout {
    /// The serialized row model object
    #[default]
    Object,
    /// The row values in row-schema field order
    Array,
}

/// Per-operation settings for add, edit and delete
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperationConfig {
    /// Answer with a JSON acknowledgment instead of a bare status
    pub json_response: bool,

    /// Message sent when the operation fails without its own message
    pub error_message: Option<String>,
}

/// Complete engine configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Apply the requested page window
    pub paging: bool,

    /// Apply sorting
    pub sorting: bool,

    /// Rows per page when a request sends no page size
    pub default_page_size: Option<usize>,

    pub add: OperationConfig,
    pub edit: OperationConfig,
    pub delete: OperationConfig,

    pub parameter_names: ParameterNames,
    pub get_policy: GetPolicy,
    pub cell_layout: CellLayout,
}

impl GridConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Enable server-side paging
    pub fn with_paging(mut self) -> Self {
        self.paging = true;
        self
    }

    /// Page size used when a request does not send one
    pub fn with_default_page_size(mut self, size: usize) -> Self {
        self.default_page_size = Some(size);
        self
    }

    /// Enable server-side sorting
    pub fn with_sorting(mut self) -> Self {
        self.sorting = true;
        self
    }

    /// Edit message, also the fallback for add and delete
    pub fn edit_error_message(&self) -> &str {
        self.edit
            .error_message
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(DEFAULT_ERROR_MESSAGE)
    }

    /// Add message, falling back to the edit message
    pub fn add_error_message(&self) -> &str {
        self.add
            .error_message
            .as_deref()
            .unwrap_or_else(|| self.edit_error_message())
    }

    /// Delete message, falling back to the edit message
    pub fn delete_error_message(&self) -> &str {
        self.delete
            .error_message
            .as_deref()
            .unwrap_or_else(|| self.edit_error_message())
    }
}
