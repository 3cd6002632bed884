//! Document search compiler for Observation.
//!
//! Produces a MongoDB filter document, a sort document and skip/limit values
//! from [`ObservationSearchParams`].

use mongodb::bson::{self, Document, doc};

use crate::types::{ObservationSearchParams, SortOrder, effective_sort_order};

/// Field used when no (or an unknown) sort field is requested.
pub const DEFAULT_SORT_FIELD: &str = "created_at";

/// Maps a `_sort` field to a document field, or `None` when it is not sortable.
pub fn sort_field(field: &str) -> Option<&'static str> {
    match field {
        "effective_date" => Some("effective_date"),
        "code" => Some("code"),
        "status" => Some("status"),
        "created_at" => Some("created_at"),
        _ => None,
    }
}

/// A compiled observation query.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationQuery {
    pub filter: Document,
    pub sort: Document,
    pub skip: u64,
    pub limit: i64,
}

/// Compiles [`ObservationSearchParams`] into document-store query parts.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObservationFilterBuilder;

impl ObservationFilterBuilder {
    /// Creates a builder.
    pub fn new() -> Self {
        Self
    }

    /// Builds filter, sort and paging for a search.
    pub fn build(&self, params: &ObservationSearchParams) -> ObservationQuery {
        ObservationQuery {
            filter: self.build_filter(params),
            sort: self.build_sort(params.sort_by.as_deref(), params.sort_order),
            skip: params.offset,
            limit: i64::from(params.limit),
        }
    }

    /// Builds the filter document. An empty document matches everything.
    pub fn build_filter(&self, params: &ObservationSearchParams) -> Document {
        let mut filter = Document::new();

        if let Some(patient_id) = &params.patient_id {
            filter.insert("patient_id", patient_id.as_str());
        }
        if let Some(code) = &params.code {
            filter.insert("code", code.as_str());
        }
        if let Some(category) = &params.category {
            filter.insert("category", category.as_str());
        }
        if let Some(status) = &params.status {
            filter.insert("status", status.as_str());
        }

        // Both bounds share one sub-document on the same field.
        let mut range = Document::new();
        if let Some(from) = params.date_greater_than {
            range.insert("$gte", bson::DateTime::from_millis(from.timestamp_millis()));
        }
        if let Some(to) = params.date_less_than {
            range.insert("$lte", bson::DateTime::from_millis(to.timestamp_millis()));
        }
        if !range.is_empty() {
            filter.insert("effective_date", range);
        }

        filter
    }

    /// Builds the sort document, e.g. `{ "created_at": -1 }`.
    pub fn build_sort(&self, sort_by: Option<&str>, order: Option<SortOrder>) -> Document {
        let field = sort_by.and_then(sort_field).unwrap_or(DEFAULT_SORT_FIELD);
        let direction: i32 = match effective_sort_order(order) {
            SortOrder::Asc => 1,
            SortOrder::Desc => -1,
        };
        doc! { field: direction }
    }

    /// Builds the query used for listing observations of one patient.
    pub fn build_for_patient(&self, patient_id: &str, limit: u32, offset: u64) -> ObservationQuery {
        ObservationQuery {
            filter: doc! { "patient_id": patient_id },
            sort: self.build_sort(None, None),
            skip: offset,
            limit: i64::from(limit),
        }
    }

    /// Builds the query used for unfiltered listing.
    pub fn build_list(&self, limit: u32, offset: u64) -> ObservationQuery {
        ObservationQuery {
            filter: Document::new(),
            sort: self.build_sort(None, None),
            skip: offset,
            limit: i64::from(limit),
        }
    }
}
