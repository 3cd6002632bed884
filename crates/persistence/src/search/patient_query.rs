//! Relational search compiler for Patient.
//!
//! Builds a single parameterized `SELECT` against the `patients` table:
//! AND-combined optional predicates, an allowlisted `ORDER BY`, then
//! `LIMIT`/`OFFSET`. User input only ever reaches the statement as a bound
//! parameter; column names come from a fixed allowlist.

use crate::types::{PatientSearchParams, effective_sort_order};

use super::sql::{PlaceholderStyle, SqlFragment, SqlParam};

/// Columns selected for every patient query, in row-mapping order.
pub const PATIENT_COLUMNS: &str = "id, identifier_system, identifier_value, active, family_name, given_name, gender, birth_date, created_at, updated_at";

/// Column used when no (or an unknown) sort field is requested.
pub const DEFAULT_SORT_COLUMN: &str = "created_at";

/// Maps a `_sort` field to a column, or `None` when it is not sortable.
pub fn sort_column(field: &str) -> Option<&'static str> {
    match field {
        "name" => Some("family_name"),
        "birthdate" => Some("birth_date"),
        "family_name" => Some("family_name"),
        "given_name" => Some("given_name"),
        "gender" => Some("gender"),
        "created_at" => Some("created_at"),
        _ => None,
    }
}

/// Compiles [`PatientSearchParams`] into SQL for one database dialect.
#[derive(Debug, Clone, Copy)]
pub struct PatientQueryBuilder {
    style: PlaceholderStyle,
}

impl PatientQueryBuilder {
    /// Creates a builder emitting the given placeholder style.
    pub fn new(style: PlaceholderStyle) -> Self {
        Self { style }
    }

    /// Builds the full search statement.
    pub fn build(&self, params: &PatientSearchParams) -> SqlFragment {
        let mut query = SqlFragment::new(
            format!("SELECT {} FROM patients WHERE 1=1", PATIENT_COLUMNS),
            self.style,
        );

        if let Some(name) = &params.name {
            let p = query.add_param(SqlParam::Text(contains_pattern(name)));
            query.push_sql(&format!(
                " AND (LOWER(given_name) LIKE {p} OR LOWER(family_name) LIKE {p})"
            ));
        }

        if let Some(family) = &params.family_name {
            let p = query.add_param(SqlParam::Text(contains_pattern(family)));
            query.push_sql(&format!(" AND LOWER(family_name) LIKE {p}"));
        }

        if let Some(given) = &params.given_name {
            let p = query.add_param(SqlParam::Text(contains_pattern(given)));
            query.push_sql(&format!(" AND LOWER(given_name) LIKE {p}"));
        }

        if let Some(gender) = &params.gender {
            let p = query.add_param(SqlParam::text(gender));
            query.push_sql(&format!(" AND gender = {p}"));
        }

        // Exact and range bounds are independent and may all apply at once.
        if let Some(date) = params.birth_date {
            let p = query.add_param(SqlParam::Date(date.date_naive()));
            query.push_sql(&format!(" AND birth_date = {p}"));
        }

        if let Some(date) = params.birth_date_greater_than {
            let p = query.add_param(SqlParam::Date(date.date_naive()));
            query.push_sql(&format!(" AND birth_date >= {p}"));
        }

        if let Some(date) = params.birth_date_less_than {
            let p = query.add_param(SqlParam::Date(date.date_naive()));
            query.push_sql(&format!(" AND birth_date <= {p}"));
        }

        if let Some(active) = params.active {
            let p = query.add_param(SqlParam::Bool(active));
            query.push_sql(&format!(" AND active = {p}"));
        }

        query.push_sql(&format!(" ORDER BY {}", self.build_order_by(params)));
        self.push_limit(&mut query, params.limit, params.offset);

        query
    }

    /// Builds the statement used for unfiltered listing.
    pub fn build_list(&self, limit: u32, offset: u64) -> SqlFragment {
        let mut query = SqlFragment::new(
            format!(
                "SELECT {} FROM patients ORDER BY {} DESC",
                PATIENT_COLUMNS, DEFAULT_SORT_COLUMN
            ),
            self.style,
        );
        self.push_limit(&mut query, limit, offset);
        query
    }

    /// Builds the `ORDER BY` body, e.g. `family_name DESC`.
    pub fn build_order_by(&self, params: &PatientSearchParams) -> String {
        let column = params
            .sort_by
            .as_deref()
            .and_then(sort_column)
            .unwrap_or(DEFAULT_SORT_COLUMN);
        format!("{} {}", column, effective_sort_order(params.sort_order).as_sql())
    }

    fn push_limit(&self, query: &mut SqlFragment, limit: u32, offset: u64) {
        let limit = query.add_param(SqlParam::Integer(i64::from(limit)));
        // Parsed offsets never exceed i64::MAX.
        let offset = query.add_param(SqlParam::Integer(
            i64::try_from(offset).unwrap_or(i64::MAX),
        ));
        query.push_sql(&format!(" LIMIT {limit} OFFSET {offset}"));
    }
}

/// `%value%`, lowercased, for case-insensitive substring matching.
fn contains_pattern(value: &str) -> String {
    format!("%{}%", value.to_lowercase())
}
