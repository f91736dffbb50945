/// Numeric primary keys (schemes) are PostgreSQL BIGINT.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
