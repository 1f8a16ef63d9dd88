//! Criteria model: the typed description of one grid request
//!
//! Raw request values (query string and form fields) are collected into
//! [`RequestValues`]. The operation code decides between listing and a
//! mutation; for listings the values are bound into a [`GridRequest`] using
//! the configured [`ParameterNames`].

use crate::config::{GridConfig, ParameterNames};
use crate::core::validation::ValidationState;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Raw request values in arrival order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestValues(IndexMap<String, String>);

impl RequestValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a raw value by parameter name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Set a value; a repeated name keeps its first position and the last value
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RequestValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut values = Self::new();
        for (k, v) in iter {
            values.insert(k, v);
        }
        values
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for RequestValues {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

/// Mutation operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Add,
    Edit,
    Delete,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Edit => "edit",
            Operation::Delete => "delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the operation discriminator of a request asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationCode {
    /// No discriminator: list rows
    List,
    Mutation(Operation),
    /// A discriminator outside the configured vocabulary
    Unknown(String),
}

impl OperationCode {
    /// Read the discriminator from raw values
    pub fn from_values(values: &RequestValues, names: &ParameterNames) -> Self {
        match values.get(&names.operator) {
            None => OperationCode::List,
            Some(code) if code == names.add_operator => OperationCode::Mutation(Operation::Add),
            Some(code) if code == names.edit_operator => OperationCode::Mutation(Operation::Edit),
            Some(code) if code == names.delete_operator => {
                OperationCode::Mutation(Operation::Delete)
            }
            Some(code) => OperationCode::Unknown(code.to_string()),
        }
    }
}

/// Search operators, with their jqGrid wire codes
///
/// Codes are read case-insensitively wherever they appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum SearchOperator {
    #[serde(rename = "eq")]
    Eq,
    #[serde(rename = "ne")]
    Ne,
    #[serde(rename = "lt")]
    Lt,
    #[serde(rename = "le")]
    Le,
    #[serde(rename = "gt")]
    Gt,
    #[serde(rename = "ge")]
    Ge,
    #[serde(rename = "bw")]
    BeginsWith,
    #[serde(rename = "bn")]
    NotBeginsWith,
    #[serde(rename = "ew")]
    EndsWith,
    #[serde(rename = "en")]
    NotEndsWith,
    #[serde(rename = "cn")]
    Contains,
    #[serde(rename = "nc")]
    NotContains,
}

impl SearchOperator {
    pub const ALL: [SearchOperator; 12] = [
        SearchOperator::Eq,
        SearchOperator::Ne,
        SearchOperator::Lt,
        SearchOperator::Le,
        SearchOperator::Gt,
        SearchOperator::Ge,
        SearchOperator::BeginsWith,
        SearchOperator::NotBeginsWith,
        SearchOperator::EndsWith,
        SearchOperator::NotEndsWith,
        SearchOperator::Contains,
        SearchOperator::NotContains,
    ];

    /// Wire code of the operator
    pub fn code(self) -> &'static str {
        match self {
            SearchOperator::Eq => "eq",
            SearchOperator::Ne => "ne",
            SearchOperator::Lt => "lt",
            SearchOperator::Le => "le",
            SearchOperator::Gt => "gt",
            SearchOperator::Ge => "ge",
            SearchOperator::BeginsWith => "bw",
            SearchOperator::NotBeginsWith => "bn",
            SearchOperator::EndsWith => "ew",
            SearchOperator::NotEndsWith => "en",
            SearchOperator::Contains => "cn",
            SearchOperator::NotContains => "nc",
        }
    }

    /// Whether the operator only applies to text fields
    pub fn is_text(self) -> bool {
        !matches!(
            self,
            SearchOperator::Eq
                | SearchOperator::Ne
                | SearchOperator::Lt
                | SearchOperator::Le
                | SearchOperator::Gt
                | SearchOperator::Ge
        )
    }
}

impl FromStr for SearchOperator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown search operator '{}'", s))
    }
}

impl TryFrom<String> for SearchOperator {
    type Error = String;

    fn try_from(code: String) -> Result<Self, Self::Error> {
        code.parse()
    }
}

/// One search condition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilter {
    pub field: String,
    #[serde(rename = "op")]
    pub operator: SearchOperator,
    #[serde(rename = "data", default)]
    pub value: String,
}

impl SearchFilter {
    pub fn new(field: impl Into<String>, operator: SearchOperator, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }
}

/// How the members of a filter group combine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GroupOp {
    #[default]
    #[serde(rename = "AND", alias = "and")]
    And,
    #[serde(rename = "OR", alias = "or")]
    Or,
}

/// Ordered group of search conditions (the jqGrid `filters` JSON)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilterGroup {
    #[serde(rename = "groupOp", default)]
    pub grouping: GroupOp,
    #[serde(rename = "rules", default)]
    pub filters: Vec<SearchFilter>,
}

impl SearchFilterGroup {
    pub fn new(grouping: GroupOp, filters: Vec<SearchFilter>) -> Self {
        Self { grouping, filters }
    }
}

/// Typed description of one listing request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridRequest {
    pub operation: Option<Operation>,
    /// Zero-based page index
    pub page_index: usize,
    /// Rows per page; `None` when the client asked for every row
    pub page_size: Option<usize>,
    /// Multiplier applied to the page size when taking rows
    pub pages_count: Option<usize>,
    pub sort_field: Option<String>,
    pub sort_descending: bool,
    pub searching: bool,
    pub search_filter: Option<SearchFilter>,
    pub search_group: Option<SearchFilterGroup>,
}

impl GridRequest {
    /// Bind a request from raw values
    ///
    /// The wire page number is one-based; `page_index` is zero-based. A
    /// negative page size means "all rows" and an absent one takes the
    /// configured default. When both a single filter and a filter group are
    /// sent, the group wins.
    pub fn bind(values: &RequestValues, config: &GridConfig) -> Result<Self, ValidationState> {
        let names = &config.parameter_names;
        let mut state = ValidationState::new();
        let mut request = GridRequest {
            operation: match OperationCode::from_values(values, names) {
                OperationCode::Mutation(op) => Some(op),
                _ => None,
            },
            page_size: config.default_page_size,
            ..Default::default()
        };

        if let Some(raw) = non_empty(values.get(&names.page)) {
            match raw.parse::<usize>() {
                Ok(page) => request.page_index = page.saturating_sub(1),
                Err(_) => state.add_error(&names.page, format!("'{}' is not a valid page", raw)),
            }
        }

        if let Some(raw) = non_empty(values.get(&names.rows)) {
            match raw.parse::<i64>() {
                Ok(rows) if rows < 0 => request.page_size = None,
                Ok(rows) => request.page_size = Some(rows as usize),
                Err(_) => {
                    state.add_error(&names.rows, format!("'{}' is not a valid page size", raw))
                }
            }
        }

        if let Some(raw) = non_empty(values.get(&names.pages_count)) {
            match raw.parse::<usize>() {
                Ok(n) if n >= 1 => request.pages_count = Some(n),
                _ => state.add_error(
                    &names.pages_count,
                    format!("'{}' is not a valid pages count", raw),
                ),
            }
        }

        request.sort_field = non_empty(values.get(&names.sort)).map(str::to_string);

        match non_empty(values.get(&names.order)) {
            None => {}
            Some(raw) if raw.eq_ignore_ascii_case("asc") => request.sort_descending = false,
            Some(raw) if raw.eq_ignore_ascii_case("desc") => request.sort_descending = true,
            Some(raw) => state.add_error(&names.order, format!("'{}' is not a sort order", raw)),
        }

        if let Some(raw) = non_empty(values.get(&names.search)) {
            match raw.to_ascii_lowercase().as_str() {
                "true" => request.searching = true,
                "false" => request.searching = false,
                _ => state.add_error(&names.search, format!("'{}' is not a valid flag", raw)),
            }
        }

        if let Some(raw) = non_empty(values.get(&names.filters)) {
            match serde_json::from_str::<SearchFilterGroup>(raw) {
                Ok(group) => request.search_group = Some(group),
                Err(e) => state.add_error(&names.filters, format!("Invalid filters: {}", e)),
            }
        } else if let Some(field) = non_empty(values.get(&names.search_field)) {
            let operator = match non_empty(values.get(&names.search_operator)) {
                None => Ok(SearchOperator::Eq),
                Some(raw) => raw.parse::<SearchOperator>(),
            };
            match operator {
                Ok(operator) => {
                    let value = values.get(&names.search_string).unwrap_or_default();
                    request.search_filter = Some(SearchFilter::new(field, operator, value));
                }
                Err(message) => state.add_error(&names.search_operator, message),
            }
        }

        if state.is_valid() {
            Ok(request)
        } else {
            Err(state)
        }
    }
}

fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names() -> ParameterNames {
        ParameterNames::default()
    }

    fn config() -> GridConfig {
        GridConfig::default()
    }

    #[test]
    fn test_operation_code() {
        let names = names();
        assert_eq!(
            OperationCode::from_values(&RequestValues::new(), &names),
            OperationCode::List
        );
        let add = RequestValues::new().with("oper", "add");
        assert_eq!(
            OperationCode::from_values(&add, &names),
            OperationCode::Mutation(Operation::Add)
        );
        let odd = RequestValues::new().with("oper", "copy");
        assert_eq!(
            OperationCode::from_values(&odd, &names),
            OperationCode::Unknown("copy".to_string())
        );
    }

    #[test]
    fn test_operation_code_custom_vocabulary() {
        let names = ParameterNames {
            operator: "action".to_string(),
            delete_operator: "remove".to_string(),
            ..ParameterNames::default()
        };
        let values = RequestValues::new().with("action", "remove");
        assert_eq!(
            OperationCode::from_values(&values, &names),
            OperationCode::Mutation(Operation::Delete)
        );
        // the default discriminator name is not consulted
        let values = RequestValues::new().with("oper", "del");
        assert_eq!(OperationCode::from_values(&values, &names), OperationCode::List);
    }

    #[test]
    fn test_bind_paging_and_sorting() {
        let values = RequestValues::new()
            .with("page", "3")
            .with("rows", "10")
            .with("sidx", "name")
            .with("sord", "DESC")
            .with("npage", "2");
        let request = GridRequest::bind(&values, &config()).unwrap();

        assert_eq!(request.page_index, 2);
        assert_eq!(request.page_size, Some(10));
        assert_eq!(request.pages_count, Some(2));
        assert_eq!(request.sort_field.as_deref(), Some("name"));
        assert!(request.sort_descending);
        assert!(!request.searching);
    }

    #[test]
    fn test_bind_negative_rows_is_unbounded() {
        let values = RequestValues::new().with("rows", "-1");
        let request = GridRequest::bind(&values, &config()).unwrap();
        assert_eq!(request.page_size, None);
    }

    #[test]
    fn test_bind_default_page_size() {
        let paged = GridConfig {
            default_page_size: Some(20),
            ..GridConfig::default()
        };
        let request = GridRequest::bind(&RequestValues::new().with("page", "2"), &paged).unwrap();
        assert_eq!(request.page_size, Some(20));

        let request = GridRequest::bind(&RequestValues::new().with("rows", "5"), &paged).unwrap();
        assert_eq!(request.page_size, Some(5));

        // an explicit unbounded request overrides the default
        let request = GridRequest::bind(&RequestValues::new().with("rows", "-1"), &paged).unwrap();
        assert_eq!(request.page_size, None);

        let request = GridRequest::bind(&RequestValues::new(), &config()).unwrap();
        assert_eq!(request.page_size, None);
    }

    #[test]
    fn test_bind_blank_sort_field_is_none() {
        let values = RequestValues::new().with("sidx", "  ");
        let request = GridRequest::bind(&values, &config()).unwrap();
        assert_eq!(request.sort_field, None);
    }

    #[test]
    fn test_bind_single_filter() {
        let values = RequestValues::new()
            .with("_search", "true")
            .with("searchField", "name")
            .with("searchOper", "cn")
            .with("searchString", "bolt");
        let request = GridRequest::bind(&values, &config()).unwrap();

        assert!(request.searching);
        assert_eq!(
            request.search_filter,
            Some(SearchFilter::new("name", SearchOperator::Contains, "bolt"))
        );
        assert!(request.search_group.is_none());
    }

    #[test]
    fn test_bind_filter_group() {
        let filters = r#"{"groupOp":"OR","rules":[
            {"field":"id","op":"gt","data":"5"},
            {"field":"name","op":"bw","data":"Wid"}]}"#;
        let values = RequestValues::new()
            .with("_search", "true")
            .with("filters", filters)
            .with("searchField", "ignored");
        let request = GridRequest::bind(&values, &config()).unwrap();

        let group = request.search_group.unwrap();
        assert_eq!(group.grouping, GroupOp::Or);
        assert_eq!(group.filters.len(), 2);
        assert_eq!(group.filters[1].operator, SearchOperator::BeginsWith);
        assert!(request.search_filter.is_none());
    }

    #[test]
    fn test_filter_group_operator_codes_match_single_filter() {
        let filters = r#"{"groupOp":"AND","rules":[
            {"field":"name","op":"EQ","data":"Bolt"},
            {"field":"id","op":" Ge ","data":"2"}]}"#;
        let values = RequestValues::new().with("filters", filters);
        let group = GridRequest::bind(&values, &config()).unwrap().search_group.unwrap();
        assert_eq!(group.filters[0].operator, SearchOperator::Eq);
        assert_eq!(group.filters[1].operator, SearchOperator::Ge);

        let single = RequestValues::new()
            .with("searchField", "name")
            .with("searchOper", "EQ");
        let filter = GridRequest::bind(&single, &config()).unwrap().search_filter.unwrap();
        assert_eq!(filter.operator, SearchOperator::Eq);

        let unknown = RequestValues::new()
            .with("filters", r#"{"rules":[{"field":"name","op":"like","data":"x"}]}"#);
        let state = GridRequest::bind(&unknown, &config()).unwrap_err();
        assert!(state.field_errors("filters")[0].contains("Unknown search operator"));
    }

    #[test]
    fn test_bind_collects_every_error() {
        let values = RequestValues::new()
            .with("page", "first")
            .with("sord", "sideways")
            .with("searchField", "name")
            .with("searchOper", "like");
        let state = GridRequest::bind(&values, &config()).unwrap_err();

        assert!(!state.is_valid());
        assert!(state.has_errors("page"));
        assert!(state.has_errors("sord"));
        assert!(state.has_errors("searchOper"));
        assert!(!state.has_errors("rows"));
    }

    #[test]
    fn test_bind_malformed_filters() {
        let values = RequestValues::new().with("filters", "{not json");
        let state = GridRequest::bind(&values, &config()).unwrap_err();
        assert!(state.has_errors("filters"));
    }

    #[test]
    fn test_operator_codes_roundtrip() {
        for op in SearchOperator::ALL {
            assert_eq!(op.code().parse::<SearchOperator>(), Ok(op));
        }
        assert!(SearchOperator::Contains.is_text());
        assert!(!SearchOperator::Ge.is_text());
    }
}
