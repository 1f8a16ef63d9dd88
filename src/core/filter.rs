//! Filter expression builder
//!
//! Search criteria are lowered into a typed [`Predicate`] tree over the
//! physical fields of a record schema. Data sources either evaluate the tree
//! in memory with [`Predicate::matches`] or translate it into their own query
//! language.

use crate::core::entity::Record;
use crate::core::field::FieldValue;
use crate::core::request::{GridRequest, GroupOp, RequestValues, SearchFilter, SearchOperator};
use crate::core::schema::Schema;
use crate::core::validation::ValidationState;
use std::cmp::Ordering;

/// Relational comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

/// String tests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextOp {
    StartsWith,
    EndsWith,
    Contains,
}

/// Boolean predicate over a record's fields
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Identity predicate, true for every record
    Always,
    Compare {
        field: String,
        op: CompareOp,
        value: FieldValue,
    },
    Text {
        field: String,
        op: TextOp,
        value: String,
    },
    Not(Box<Predicate>),
    All(Vec<Predicate>),
    Any(Vec<Predicate>),
}

impl Predicate {
    pub fn compare(field: impl Into<String>, op: CompareOp, value: impl Into<FieldValue>) -> Self {
        Predicate::Compare {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    pub fn text(field: impl Into<String>, op: TextOp, value: impl Into<String>) -> Self {
        Predicate::Text {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    pub fn negate(self) -> Self {
        match self {
            Predicate::Not(inner) => *inner,
            other => Predicate::Not(Box::new(other)),
        }
    }

    /// Conjunction; identity members are dropped and a single member stands alone
    pub fn all(members: Vec<Predicate>) -> Self {
        let mut members: Vec<Predicate> = members.into_iter().filter(|p| !p.is_always()).collect();
        match members.len() {
            0 => Predicate::Always,
            1 => members.remove(0),
            _ => Predicate::All(members),
        }
    }

    /// Disjunction; an identity member makes the whole disjunction the identity
    pub fn any(mut members: Vec<Predicate>) -> Self {
        if members.is_empty() || members.iter().any(Predicate::is_always) {
            return Predicate::Always;
        }
        if members.len() == 1 {
            return members.remove(0);
        }
        Predicate::Any(members)
    }

    /// Combine with another predicate under AND
    pub fn and(self, other: Predicate) -> Self {
        Predicate::all(vec![self, other])
    }

    pub fn is_always(&self) -> bool {
        matches!(self, Predicate::Always)
    }

    /// Evaluate against a record
    ///
    /// Missing and null values fail every positive test, so negations are
    /// exact complements.
    pub fn matches<R: Record>(&self, record: &R) -> bool {
        match self {
            Predicate::Always => true,
            Predicate::Compare { field, op, value } => {
                let ordering = record
                    .field_value(field)
                    .and_then(|actual| actual.compare(value));
                match op {
                    CompareOp::Eq => ordering == Some(Ordering::Equal),
                    CompareOp::Ne => ordering != Some(Ordering::Equal),
                    CompareOp::Lt => ordering == Some(Ordering::Less),
                    CompareOp::Le => matches!(ordering, Some(Ordering::Less | Ordering::Equal)),
                    CompareOp::Gt => ordering == Some(Ordering::Greater),
                    CompareOp::Ge => {
                        matches!(ordering, Some(Ordering::Greater | Ordering::Equal))
                    }
                }
            }
            Predicate::Text { field, op, value } => {
                let actual = record.field_value(field);
                match actual.as_ref().and_then(FieldValue::as_string) {
                    Some(actual) => match op {
                        TextOp::StartsWith => actual.starts_with(value.as_str()),
                        TextOp::EndsWith => actual.ends_with(value.as_str()),
                        TextOp::Contains => actual.contains(value.as_str()),
                    },
                    None => false,
                }
            }
            Predicate::Not(inner) => !inner.matches(record),
            Predicate::All(members) => members.iter().all(|p| p.matches(record)),
            Predicate::Any(members) => members.iter().any(|p| p.matches(record)),
        }
    }
}

/// Builds predicates against a record schema
pub struct FilterBuilder<'a> {
    schema: &'a Schema,
}

impl<'a> FilterBuilder<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        Self { schema }
    }

    /// Build the search predicate of a listing request
    ///
    /// A filter group takes precedence over a single filter. With neither,
    /// every searchable field of `row_schema` present in `values` becomes an
    /// equality term.
    pub fn build(
        &self,
        request: &GridRequest,
        row_schema: &Schema,
        values: &RequestValues,
    ) -> Result<Predicate, ValidationState> {
        if !request.searching {
            return Ok(Predicate::Always);
        }
        if let Some(group) = &request.search_group {
            self.group(group.grouping, &group.filters)
        } else if let Some(filter) = &request.search_filter {
            let mut state = ValidationState::new();
            let term = self.term(filter, &mut state);
            finish(term.unwrap_or(Predicate::Always), state)
        } else {
            self.implicit(row_schema, values)
        }
    }

    /// Combine filters with a grouping operator
    pub fn group(&self, grouping: GroupOp, filters: &[SearchFilter]) -> Result<Predicate, ValidationState> {
        let mut state = ValidationState::new();
        let terms: Vec<Predicate> = filters
            .iter()
            .filter_map(|filter| self.term(filter, &mut state))
            .collect();
        let predicate = match grouping {
            GroupOp::And => Predicate::all(terms),
            GroupOp::Or => Predicate::any(terms),
        };
        finish(predicate, state)
    }

    /// Equality terms for every searchable row field present in the request
    pub fn implicit(&self, row_schema: &Schema, values: &RequestValues) -> Result<Predicate, ValidationState> {
        let mut state = ValidationState::new();
        let terms: Vec<Predicate> = row_schema
            .searchable_fields()
            .filter_map(|def| {
                // blank values on non-text fields count as absent, as when binding rows
                let raw = values
                    .get(def.name())
                    .filter(|raw| def.kind().is_text() || !raw.trim().is_empty())?;
                let filter = SearchFilter::new(def.name(), SearchOperator::Eq, raw);
                self.term(&filter, &mut state)
            })
            .collect();
        finish(Predicate::all(terms), state)
    }

    /// Lower one filter; unknown fields are skipped
    fn term(&self, filter: &SearchFilter, state: &mut ValidationState) -> Option<Predicate> {
        let Some(def) = self.schema.resolve_field(&filter.field) else {
            tracing::debug!(
                field = %filter.field,
                record = self.schema.name(),
                "Skipping search term on undeclared field"
            );
            return None;
        };

        let field = def.name();
        let text = |op: TextOp| Predicate::text(field, op, filter.value.as_str());
        let operator = filter.operator;

        if operator.is_text() && !def.kind().is_text() {
            state.add_error(
                &filter.field,
                format!(
                    "Operator '{}' is not supported on field {}",
                    operator.code(),
                    filter.field
                ),
            );
            return None;
        }

        let predicate = match operator {
            SearchOperator::BeginsWith => text(TextOp::StartsWith),
            SearchOperator::NotBeginsWith => text(TextOp::StartsWith).negate(),
            SearchOperator::EndsWith => text(TextOp::EndsWith),
            SearchOperator::NotEndsWith => text(TextOp::EndsWith).negate(),
            SearchOperator::Contains => text(TextOp::Contains),
            SearchOperator::NotContains => text(TextOp::Contains).negate(),
            relational => {
                let value = match def.kind().parse(&filter.value) {
                    Ok(value) => value,
                    Err(message) => {
                        state.add_error(&filter.field, message);
                        return None;
                    }
                };
                let op = match relational {
                    SearchOperator::Eq => CompareOp::Eq,
                    SearchOperator::Ne => CompareOp::Ne,
                    SearchOperator::Lt => CompareOp::Lt,
                    SearchOperator::Le => CompareOp::Le,
                    SearchOperator::Gt => CompareOp::Gt,
                    _ => CompareOp::Ge,
                };
                Predicate::compare(field, op, value)
            }
        };
        Some(predicate)
    }
}

fn finish(predicate: Predicate, state: ValidationState) -> Result<Predicate, ValidationState> {
    if state.is_valid() {
        Ok(predicate)
    } else {
        Err(state)
    }
}
