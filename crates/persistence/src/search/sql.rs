//! Parameterized SQL fragments shared by the relational backends.

use chrono::NaiveDate;

/// Placeholder syntax of the target database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderStyle {
    /// SQLite `?N`.
    Question,
    /// PostgreSQL `$N`.
    Dollar,
}

impl PlaceholderStyle {
    /// Renders the placeholder for the 1-based parameter index.
    pub fn render(&self, index: usize) -> String {
        match self {
            PlaceholderStyle::Question => format!("?{}", index),
            PlaceholderStyle::Dollar => format!("${}", index),
        }
    }
}

/// A bound SQL parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    /// Text parameter.
    Text(String),
    /// Integer parameter.
    Integer(i64),
    /// Boolean parameter.
    Bool(bool),
    /// Calendar date parameter.
    Date(NaiveDate),
}

impl SqlParam {
    /// Creates a text parameter.
    pub fn text(s: impl Into<String>) -> Self {
        SqlParam::Text(s.into())
    }
}

/// A SQL statement with its bound parameters, in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlFragment {
    /// The SQL text.
    pub sql: String,
    /// Bound parameter values.
    pub params: Vec<SqlParam>,
    style: PlaceholderStyle,
}

impl SqlFragment {
    /// Creates a new fragment with no parameters.
    pub fn new(sql: impl Into<String>, style: PlaceholderStyle) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
            style,
        }
    }

    /// Adds a parameter and returns its placeholder.
    ///
    /// The placeholder may appear several times in the SQL; the value is bound once.
    pub fn add_param(&mut self, param: SqlParam) -> String {
        self.params.push(param);
        self.style.render(self.params.len())
    }

    /// Appends raw SQL.
    pub fn push_sql(&mut self, sql: &str) {
        self.sql.push_str(sql);
    }
}
