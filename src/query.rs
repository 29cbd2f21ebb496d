//! Incremental construction of filtered list queries.
//!
//! Each list endpoint accepts a fixed set of optional parameters; every
//! present parameter contributes exactly one predicate ANDed onto a base
//! `... WHERE 1=1` clause. Predicates and their bind values are pushed
//! together through [`sqlx::QueryBuilder`], so placeholders can never drift
//! out of alignment with parameters. Absent and empty values are skipped and
//! never produce `= NULL` or `LIKE '%%'` predicates.

use sqlx::{QueryBuilder, Sqlite};

pub struct FilterBuilder<'a> {
    builder: QueryBuilder<'a, Sqlite>,
}

impl<'a> FilterBuilder<'a> {
    /// Starts from a base SELECT that already ends in `WHERE 1=1`.
    pub fn new(base: &str) -> Self {
        Self {
            builder: QueryBuilder::new(base),
        }
    }

    /// Substring match: `AND <expr> LIKE '%value%'`.
    ///
    /// SQLite's LIKE is case-insensitive for ASCII, so substring filters are
    /// case-insensitive throughout the API.
    pub fn like(&mut self, expr: &str, value: Option<&str>) -> &mut Self {
        if let Some(v) = value.filter(|v| !v.trim().is_empty()) {
            self.builder.push(format!(" AND {} LIKE ", expr));
            self.builder.push_bind(format!("%{}%", v));
        }
        self
    }

    /// Substring match across several expressions:
    /// `AND (a LIKE '%v%' OR b LIKE '%v%' ...)`.
    pub fn like_any(&mut self, exprs: &[&str], value: Option<&str>) -> &mut Self {
        if let Some(v) = value.filter(|v| !v.trim().is_empty()) {
            self.builder.push(" AND (");
            for (i, expr) in exprs.iter().enumerate() {
                if i > 0 {
                    self.builder.push(" OR ");
                }
                self.builder.push(format!("{} LIKE ", expr));
                self.builder.push_bind(format!("%{}%", v));
            }
            self.builder.push(")");
        }
        self
    }

    /// Equality predicate: `AND <expr> = value`.
    pub fn eq<T>(&mut self, expr: &str, value: Option<T>) -> &mut Self
    where
        T: sqlx::Encode<'a, Sqlite> + sqlx::Type<Sqlite> + Send + 'a,
    {
        if let Some(v) = value {
            self.builder.push(format!(" AND {} = ", expr));
            self.builder.push_bind(v);
        }
        self
    }

    /// Inclusive lower bound: `AND <expr> >= value`.
    pub fn gte<T>(&mut self, expr: &str, value: Option<T>) -> &mut Self
    where
        T: sqlx::Encode<'a, Sqlite> + sqlx::Type<Sqlite> + Send + 'a,
    {
        if let Some(v) = value {
            self.builder.push(format!(" AND {} >= ", expr));
            self.builder.push_bind(v);
        }
        self
    }

    /// Inclusive upper bound: `AND <expr> <= value`.
    pub fn lte<T>(&mut self, expr: &str, value: Option<T>) -> &mut Self
    where
        T: sqlx::Encode<'a, Sqlite> + sqlx::Type<Sqlite> + Send + 'a,
    {
        if let Some(v) = value {
            self.builder.push(format!(" AND {} <= ", expr));
            self.builder.push_bind(v);
        }
        self
    }

    /// Terminates the query with a deterministic ordering.
    pub fn order_by(&mut self, clause: &str) -> &mut Self {
        self.builder.push(format!(" ORDER BY {}", clause));
        self
    }

    /// The SQL accumulated so far, with `?` placeholders.
    pub fn sql(&self) -> &str {
        self.builder.sql()
    }

    pub fn build_query_as<T>(
        &mut self,
    ) -> sqlx::query::QueryAs<'_, Sqlite, T, sqlx::sqlite::SqliteArguments<'a>>
    where
        T: for<'r> sqlx::FromRow<'r, sqlx::sqlite::SqliteRow>,
    {
        self.builder.build_query_as()
    }
}
