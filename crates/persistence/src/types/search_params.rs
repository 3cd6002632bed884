//! Structured search parameters.
//!
//! These are the parsed form of a search query string, one type per resource
//! kind. Unset filters are `None`; the compilers never see `Some("")`.


use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of results returned when `_count` is absent or unusable.
pub const DEFAULT_LIMIT: u32 = 10;

/// Upper bound applied to `_count`.
pub const MAX_LIMIT: u32 = 100;

/// Sort direction requested by `_sort`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending (`_sort=field`).
    Asc,
    /// Descending (`_sort=-field`).
    Desc,
}

impl SortOrder {
    /// Returns the SQL keyword for this direction.
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Resolves the effective direction: only an explicit ascending request flips
/// away from the descending default.
pub fn effective_sort_order(order: Option<SortOrder>) -> SortOrder {
    match order {
        Some(SortOrder::Asc) => SortOrder::Asc,
        _ => SortOrder::Desc,
    }
}

/// Search criteria for Patient.
#[derive(Debug, Clone, PartialEq)]
pub struct PatientSearchParams {
    /// Substring of either the given or the family name.
    pub name: Option<String>,
    /// Substring of the family name.
    pub family_name: Option<String>,
    /// Substring of the given name.
    pub given_name: Option<String>,
    /// Exact gender code.
    pub gender: Option<String>,
    /// Exact birth date.
    pub birth_date: Option<DateTime<Utc>>,
    /// Inclusive lower bound on birth date.
    pub birth_date_greater_than: Option<DateTime<Utc>>,
    /// Inclusive upper bound on birth date.
    pub birth_date_less_than: Option<DateTime<Utc>>,
    pub active: Option<bool>,
    pub sort_by: Option<String>,
    pub sort_order: Option<SortOrder>,
    /// Always in `1..=MAX_LIMIT`.
    pub limit: u32,
    pub offset: u64,
}

impl Default for PatientSearchParams {
    fn default() -> Self {
        Self {
            name: None,
            family_name: None,
            given_name: None,
            gender: None,
            birth_date: None,
            birth_date_greater_than: None,
            birth_date_less_than: None,
            active: None,
            sort_by: None,
            sort_order: None,
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl PatientSearchParams {
    /// Returns true when any filter or sort directive is present.
    ///
    /// Pagination alone does not count.
    pub fn has_criteria(&self) -> bool {
        self.name.is_some()
            || self.family_name.is_some()
            || self.given_name.is_some()
            || self.gender.is_some()
            || self.birth_date.is_some()
            || self.birth_date_greater_than.is_some()
            || self.birth_date_less_than.is_some()
            || self.active.is_some()
            || self.sort_by.is_some()
            || self.sort_order.is_some()
    }
}

/// Search criteria for Observation.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationSearchParams {
    /// Bare patient id.
    pub patient_id: Option<String>,
    pub code: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    /// Inclusive lower bound on the effective date.
    pub date_greater_than: Option<DateTime<Utc>>,
    /// Inclusive upper bound on the effective date.
    pub date_less_than: Option<DateTime<Utc>>,
    pub sort_by: Option<String>,
    pub sort_order: Option<SortOrder>,
    /// Always in `1..=MAX_LIMIT`.
    pub limit: u32,
    pub offset: u64,
}

impl Default for ObservationSearchParams {
    fn default() -> Self {
        Self {
            patient_id: None,
            code: None,
            category: None,
            status: None,
            date_greater_than: None,
            date_less_than: None,
            sort_by: None,
            sort_order: None,
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl ObservationSearchParams {
    /// Returns true when any filter or sort directive is present.
    pub fn has_criteria(&self) -> bool {
        self.patient_id.is_some() || self.has_criteria_besides_patient()
    }

    /// Returns true when the patient filter is the only criterion.
    pub fn is_patient_only(&self) -> bool {
        self.patient_id.is_some() && !self.has_criteria_besides_patient()
    }

    fn has_criteria_besides_patient(&self) -> bool {
        self.code.is_some()
            || self.category.is_some()
            || self.status.is_some()
            || self.date_greater_than.is_some()
            || self.date_less_than.is_some()
            || self.sort_by.is_some()
            || self.sort_order.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_order_as_sql() {
        assert_eq!(SortOrder::Asc.as_sql(), "ASC");
        assert_eq!(SortOrder::Desc.as_sql(), "DESC");
    }

    #[test]
    fn test_effective_sort_order() {
        assert_eq!(effective_sort_order(None), SortOrder::Desc);
        assert_eq!(effective_sort_order(Some(SortOrder::Desc)), SortOrder::Desc);
        assert_eq!(effective_sort_order(Some(SortOrder::Asc)), SortOrder::Asc);
    }

    #[test]
    fn test_defaults() {
        let params = PatientSearchParams::default();
        assert_eq!(params.limit, DEFAULT_LIMIT);
        assert_eq!(params.offset, 0);
        assert!(!params.has_criteria());

        let params = ObservationSearchParams::default();
        assert_eq!(params.limit, 10);
        assert!(!params.has_criteria());
        assert!(!params.is_patient_only());
    }

    #[test]
    fn test_pagination_is_not_a_criterion() {
        let params = PatientSearchParams {
            limit: 50,
            offset: 20,
            ..Default::default()
        };
        assert!(!params.has_criteria());
    }

    #[test]
    fn test_patient_only() {
        let params = ObservationSearchParams {
            patient_id: Some("abc".to_string()),
            ..Default::default()
        };
        assert!(params.has_criteria());
        assert!(params.is_patient_only());

        let params = ObservationSearchParams {
            patient_id: Some("abc".to_string()),
            code: Some("8480-6".to_string()),
            ..Default::default()
        };
        assert!(!params.is_patient_only());
    }
}
