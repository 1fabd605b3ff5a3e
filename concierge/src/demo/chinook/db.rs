//! Chinook demo database: fetched once as a SQL script and loaded into an in-memory
//! SQLite connection that is switched to read-only after loading.

use std::sync::{Arc, Mutex};

use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::Connection;
use serde_json::{Map, Value};

/// Public Chinook SQLite script.
pub const DEFAULT_CHINOOK_SQL_URL: &str = "https://raw.githubusercontent.com/lerocha/chinook-database/master/ChinookDatabase/DataSources/Chinook_Sqlite.sql";

/// Overrides [`DEFAULT_CHINOOK_SQL_URL`].
pub const ENV_CHINOOK_SQL_URL: &str = "CHINOOK_SQL_URL";

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}").expect("email pattern")
});
static PHONE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\+\d[\d ().\-]{5,}\d").expect("phone pattern"));
/// A number counts as an id only after `customer id`, `customer number`, `id` or `#`.
static CUED_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?:\bcustomer\s+(?:id|number)|\bid)\b\s*(?:is\b|:|=)?\s*#?\s*(\d+)\b|#\s*(\d+)\b",
    )
    .expect("id pattern")
});

/// One result row: column name → JSON value.
pub type Row = Map<String, Value>;

#[derive(Debug, thiserror::Error)]
pub enum ChinookError {
    #[error("fetch failed: {0}")]
    Fetch(String),
    #[error("sqlite: {0}")]
    Sql(#[from] rusqlite::Error),
    #[error("database task failed: {0}")]
    Task(String),
}

/// How a customer identifier was recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomerIdentifier {
    Id(i64),
    Email(String),
    Phone(String),
}

impl CustomerIdentifier {
    /// Classifies a whole string: digits → id, `@` → email, leading `+` → phone.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        if raw.chars().all(|c| c.is_ascii_digit()) {
            return raw.parse().ok().map(Self::Id);
        }
        if raw.starts_with('+') {
            return Some(Self::Phone(raw.to_string()));
        }
        if raw.contains('@') {
            return Some(Self::Email(raw.to_string()));
        }
        None
    }

    /// Finds the first identifier in free text. Email and phone take precedence over a
    /// number; a number is an id only when cued (`id 5`, `customer id is 5`, `#5`) or when
    /// it is the whole message.
    pub fn find_in(text: &str) -> Option<Self> {
        if let Some(m) = EMAIL.find(text) {
            return Some(Self::Email(m.as_str().to_string()));
        }
        if let Some(m) = PHONE.find(text) {
            return Some(Self::Phone(m.as_str().trim().to_string()));
        }
        let bare = text.trim();
        if !bare.is_empty() && bare.chars().all(|c| c.is_ascii_digit()) {
            return bare.parse().ok().map(Self::Id);
        }
        CUED_ID
            .captures(text)
            .and_then(|c| c.get(1).or_else(|| c.get(2)))
            .and_then(|m| m.as_str().parse().ok())
            .map(Self::Id)
    }
}

/// Shared handle to the in-memory demo database.
#[derive(Clone)]
pub struct ChinookDb {
    conn: Arc<Mutex<Connection>>,
}

impl std::fmt::Debug for ChinookDb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChinookDb").finish_non_exhaustive()
    }
}

impl ChinookDb {
    /// Downloads the SQL script from `url` and loads it.
    pub async fn fetch(url: &str) -> Result<Self, ChinookError> {
        tracing::info!(url = %url, "fetching Chinook SQL script");
        let response = reqwest::get(url)
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| ChinookError::Fetch(e.to_string()))?;
        let script = response
            .text()
            .await
            .map_err(|e| ChinookError::Fetch(e.to_string()))?;
        tokio::task::spawn_blocking(move || Self::from_script(&script))
            .await
            .map_err(|e| ChinookError::Task(e.to_string()))?
    }

    /// Fetches from `CHINOOK_SQL_URL`, or the public script when unset.
    pub async fn fetch_default() -> Result<Self, ChinookError> {
        let url = std::env::var(ENV_CHINOOK_SQL_URL)
            .unwrap_or_else(|_| DEFAULT_CHINOOK_SQL_URL.to_string());
        Self::fetch(&url).await
    }

    /// Executes `sql` into a fresh in-memory database, then makes it read-only.
    pub fn from_script(sql: &str) -> Result<Self, ChinookError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(sql.trim_start_matches('\u{feff}'))?;
        conn.pragma_update(None, "query_only", true)?;
        tracing::debug!("Chinook database loaded");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Runs a read-only query; each row becomes a JSON object keyed by column name.
    pub async fn query(&self, sql: &str, params: Vec<SqlValue>) -> Result<Vec<Row>, ChinookError> {
        let conn = Arc::clone(&self.conn);
        let sql = sql.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|_| ChinookError::Task("connection lock poisoned".into()))?;
            query_rows(&conn, &sql, &params)
        })
        .await
        .map_err(|e| ChinookError::Task(e.to_string()))?
    }

    /// Resolves a customer id, email or phone number to a `CustomerId`.
    pub async fn find_customer(&self, identifier: &str) -> Result<Option<String>, ChinookError> {
        let Some(parsed) = CustomerIdentifier::parse(identifier) else {
            return Ok(None);
        };
        self.lookup_customer(&parsed).await
    }

    pub async fn lookup_customer(
        &self,
        identifier: &CustomerIdentifier,
    ) -> Result<Option<String>, ChinookError> {
        let (column, value) = match identifier {
            CustomerIdentifier::Id(id) => ("CustomerId", SqlValue::Integer(*id)),
            CustomerIdentifier::Email(e) => ("Email", SqlValue::Text(e.clone())),
            CustomerIdentifier::Phone(p) => ("Phone", SqlValue::Text(p.clone())),
        };
        let sql = format!("SELECT CustomerId FROM Customer WHERE {} = ?1", column);
        let rows = self.query(&sql, vec![value]).await?;
        Ok(rows
            .first()
            .and_then(|r| r.get("CustomerId"))
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            }))
    }
}

fn query_rows(conn: &Connection, sql: &str, params: &[SqlValue]) -> Result<Vec<Row>, ChinookError> {
    let mut stmt = conn.prepare(sql)?;
    let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
    let mut rows = stmt.query(rusqlite::params_from_iter(params.iter()))?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        let mut obj = Map::with_capacity(columns.len());
        for (i, name) in columns.iter().enumerate() {
            obj.insert(name.clone(), value_to_json(row.get_ref(i)?));
        }
        out.push(obj);
    }
    Ok(out)
}

fn value_to_json(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => Value::from(f),
        ValueRef::Text(t) => Value::String(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Value::String(format!("<{} bytes>", b.len())),
    }
}
