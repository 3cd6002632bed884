//! Query-string parsing for search interactions.
//!
//! Turns `key=value` pairs into [`PatientSearchParams`] or
//! [`ObservationSearchParams`]. Parsing never fails: a value that cannot be
//! understood is dropped and the corresponding filter stays unset.
//!
//! # Recognized parameters
//!
//! | Resource | Parameter | Meaning |
//! |----------|-----------|---------|
//! | Patient | `name`, `family`, `given` | substring filters |
//! | Patient | `gender` | exact filter |
//! | Patient | `birthdate` | `ge`/`gt` lower bound, `le`/`lt` upper bound, `eq` or none exact |
//! | Patient | `active` | boolean filter |
//! | Observation | `patient` | bare id or `Patient/{id}` |
//! | Observation | `code`, `category`, `status` | exact filters |
//! | Observation | `date` | `ge`/`gt` lower bound, `le`/`lt` upper bound only |
//! | both | `_sort`, `_count`, `_offset` | sorting and paging |

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use url::form_urlencoded;

use crate::types::{MAX_LIMIT, ObservationSearchParams, PatientSearchParams, SortOrder};

/// Comparison prefix on a date search value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePrefix {
    /// No prefix given.
    None,
    Eq,
    Gt,
    Ge,
    Lt,
    Le,
}

impl DatePrefix {
    fn from_token(token: &str) -> Option<Self> {
        match token {
            "eq" => Some(DatePrefix::Eq),
            "gt" => Some(DatePrefix::Gt),
            "ge" => Some(DatePrefix::Ge),
            "lt" => Some(DatePrefix::Lt),
            "le" => Some(DatePrefix::Le),
            _ => None,
        }
    }
}

/// First-value-wins view over query pairs. Empty values count as absent.
struct QueryValues(HashMap<String, String>);

impl QueryValues {
    fn collect<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut values = HashMap::new();
        for (key, value) in pairs {
            values.entry(key.into()).or_insert_with(|| value.into());
        }
        Self(values)
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    fn owned(&self, key: &str) -> Option<String> {
        self.get(key).map(str::to_string)
    }
}

/// Splits an optional two-letter prefix off a date value and parses the rest.
///
/// The prefix is only considered when the whole value is longer than two
/// characters. Returns `None` when no supported date format matches.
pub fn parse_date_with_prefix(value: &str) -> Option<(DatePrefix, DateTime<Utc>)> {
    let (prefix, rest) = match value.get(..2).and_then(DatePrefix::from_token) {
        Some(prefix) if value.len() > 2 => (prefix, &value[2..]),
        _ => (DatePrefix::None, value),
    };
    parse_search_date(rest).map(|date| (prefix, date))
}

/// Parses a date in one of the accepted literal formats, first match wins:
/// `YYYY-MM-DD`, `YYYY-MM-DDThh:mm:ssZ`, `YYYY-MM-DDThh:mm:ss`.
pub fn parse_search_date(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%SZ") {
        return Some(dt.and_utc());
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|dt| dt.and_utc())
}

/// Parses a boolean the way the wire accepts it.
fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

fn parse_sort(values: &QueryValues) -> (Option<String>, Option<SortOrder>) {
    match values.get("_sort") {
        Some(sort) => match sort.strip_prefix('-') {
            Some(field) => (
                Some(field.to_string()).filter(|f| !f.is_empty()),
                Some(SortOrder::Desc),
            ),
            None => (Some(sort.to_string()), Some(SortOrder::Asc)),
        },
        None => (None, None),
    }
}

fn parse_limit(values: &QueryValues) -> Option<u32> {
    let count = values.get("_count")?.parse::<i64>().ok()?;
    if count <= 0 {
        return None;
    }
    Some(count.min(MAX_LIMIT as i64) as u32)
}

fn parse_offset(values: &QueryValues) -> Option<u64> {
    let offset = values.get("_offset")?.parse::<i64>().ok()?;
    u64::try_from(offset).ok()
}

/// Builds Patient search parameters from query pairs.
pub fn parse_patient_params<I, K, V>(pairs: I) -> PatientSearchParams
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let values = QueryValues::collect(pairs);
    let mut params = PatientSearchParams {
        name: values.owned("name"),
        family_name: values.owned("family"),
        given_name: values.owned("given"),
        gender: values.owned("gender"),
        active: values.get("active").and_then(parse_bool),
        ..Default::default()
    };

    if let Some((prefix, date)) = values.get("birthdate").and_then(parse_date_with_prefix) {
        match prefix {
            DatePrefix::Ge | DatePrefix::Gt => params.birth_date_greater_than = Some(date),
            DatePrefix::Le | DatePrefix::Lt => params.birth_date_less_than = Some(date),
            DatePrefix::Eq | DatePrefix::None => params.birth_date = Some(date),
        }
    }

    (params.sort_by, params.sort_order) = parse_sort(&values);
    if let Some(limit) = parse_limit(&values) {
        params.limit = limit;
    }
    if let Some(offset) = parse_offset(&values) {
        params.offset = offset;
    }

    params
}

/// Builds Observation search parameters from query pairs.
pub fn parse_observation_params<I, K, V>(pairs: I) -> ObservationSearchParams
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let values = QueryValues::collect(pairs);
    let mut params = ObservationSearchParams {
        patient_id: values.get("patient").map(|patient| {
            patient
                .strip_prefix("Patient/")
                .unwrap_or(patient)
                .to_string()
        }),
        code: values.owned("code"),
        category: values.owned("category"),
        status: values.owned("status"),
        ..Default::default()
    };

    // Unlike birthdate, an unprefixed or `eq` date sets no filter.
    if let Some((prefix, date)) = values.get("date").and_then(parse_date_with_prefix) {
        match prefix {
            DatePrefix::Ge | DatePrefix::Gt => params.date_greater_than = Some(date),
            DatePrefix::Le | DatePrefix::Lt => params.date_less_than = Some(date),
            DatePrefix::Eq | DatePrefix::None => {}
        }
    }

    (params.sort_by, params.sort_order) = parse_sort(&values);
    if let Some(limit) = parse_limit(&values) {
        params.limit = limit;
    }
    if let Some(offset) = parse_offset(&values) {
        params.offset = offset;
    }

    params
}

impl PatientSearchParams {
    /// Parses a raw (still percent-encoded) query string, without the leading `?`.
    pub fn from_query_string(query: &str) -> Self {
        parse_patient_params(form_urlencoded::parse(query.as_bytes()))
    }
}

impl ObservationSearchParams {
    /// Parses a raw (still percent-encoded) query string, without the leading `?`.
    pub fn from_query_string(query: &str) -> Self {
        parse_observation_params(form_urlencoded::parse(query.as_bytes()))
    }
}
