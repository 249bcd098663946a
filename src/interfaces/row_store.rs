//! Side-table row store interface.

use async_trait::async_trait;

/// Result type for row store operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur reading or writing side tables.
///
/// Every variant is a data-access failure: fatal to the caller, never retried.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[cfg(feature = "sqlite")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[cfg(feature = "sqlite")]
    #[error("Query build error: {0}")]
    QueryBuild(#[from] sea_query::error::Error),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Unknown procedure: {0}")]
    UnknownProcedure(String),

    #[error("Missing parameter {parameter} for procedure {procedure}")]
    MissingParameter { procedure: String, parameter: String },

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// A bound parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    Text(String),
    Integer(i64),
}

impl Param {
    /// Text form used for comparisons against stored cells.
    pub fn to_text(&self) -> String {
        match self {
            Param::Text(s) => s.clone(),
            Param::Integer(n) => n.to_string(),
        }
    }
}

impl From<&str> for Param {
    fn from(value: &str) -> Self {
        Param::Text(value.to_string())
    }
}

impl From<String> for Param {
    fn from(value: String) -> Self {
        Param::Text(value)
    }
}

impl From<i64> for Param {
    fn from(value: i64) -> Self {
        Param::Integer(value)
    }
}

#[cfg(feature = "sqlite")]
impl From<&Param> for sea_query::Value {
    fn from(value: &Param) -> Self {
        match value {
            Param::Text(s) => s.clone().into(),
            Param::Integer(n) => (*n).into(),
        }
    }
}

/// Strip the optional `@` marker from a parameter name.
pub fn normalize_name(name: &str) -> &str {
    name.strip_prefix('@').unwrap_or(name)
}

/// Ordered named parameters for a query or procedure call.
///
/// Names are matched ignoring ASCII case and a leading `@`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterSet {
    params: Vec<(String, Param)>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Param>) {
        self.params.push((name.into(), value.into()));
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Param>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Param> {
        let name = normalize_name(name);
        self.params
            .iter()
            .find(|(n, _)| normalize_name(n).eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Param)> {
        self.params.iter().map(|(n, v)| (normalize_name(n), v))
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

/// A parameterized lookup: `SELECT columns FROM schema.table WHERE col = @p AND ...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowQuery {
    pub schema: Option<String>,
    pub table: String,
    pub columns: Vec<String>,
    /// Equality filters, column name to bound value.
    pub filters: ParameterSet,
    pub limit: Option<u64>,
}

impl RowQuery {
    pub fn select(table: impl Into<String>) -> Self {
        Self {
            schema: None,
            table: table.into(),
            columns: Vec::new(),
            filters: ParameterSet::new(),
            limit: None,
        }
    }

    pub fn schema(mut self, schema: Option<String>) -> Self {
        self.schema = schema;
        self
    }

    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.columns.push(column.into());
        self
    }

    pub fn where_eq(mut self, column: impl Into<String>, value: impl Into<Param>) -> Self {
        self.filters.insert(column, value);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// One result row. Cells are text or NULL; column lookup ignores ASCII case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    cells: Vec<(String, Option<String>)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: impl Into<String>, value: Option<String>) -> Self {
        self.cells.push((column.into(), value));
        self
    }

    pub fn push(&mut self, column: impl Into<String>, value: Option<String>) {
        self.cells.push((column.into(), value));
    }

    /// Cell value; `None` for a missing column or a NULL cell.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(c, _)| c.eq_ignore_ascii_case(column))
            .and_then(|(_, v)| v.as_deref())
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.cells.iter().any(|(c, _)| c.eq_ignore_ascii_case(column))
    }

    /// Copy of this row restricted to `columns`, in the requested order.
    /// An empty column list keeps every cell.
    pub fn project(&self, columns: &[String]) -> Row {
        if columns.is_empty() {
            return self.clone();
        }
        Row {
            cells: columns
                .iter()
                .map(|c| (c.clone(), self.get(c).map(str::to_string)))
                .collect(),
        }
    }

    pub(crate) fn set(&mut self, column: &str, value: Option<String>) {
        match self
            .cells
            .iter_mut()
            .find(|(c, _)| c.eq_ignore_ascii_case(column))
        {
            Some(cell) => cell.1 = value,
            None => self.cells.push((column.to_string(), value)),
        }
    }
}

/// Interface for side-table access.
///
/// Every call acquires its own data-access handle and releases it before
/// returning, on success and on failure.
///
/// Implementations:
/// - `SqliteRowStore`: SQLite through sqlx
/// - `MockRowStore`: In-memory mock for testing
#[async_trait]
pub trait RowStore: Send + Sync {
    /// Execute a lookup and return every matching row (possibly none).
    async fn query(&self, query: &RowQuery) -> Result<Vec<Row>>;

    /// Execute a lookup and return the first matching row, if any.
    async fn query_one(&self, query: &RowQuery) -> Result<Option<Row>> {
        let query = query.clone().limit(1);
        Ok(self.query(&query).await?.into_iter().next())
    }

    /// Execute a named procedure that returns no rows.
    async fn execute_non_query(&self, procedure: &str, params: &ParameterSet) -> Result<()>;
}
