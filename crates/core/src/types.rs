/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Monetary amounts in integer minor currency units (e.g. cents).
///
/// Stored as BIGINT; never converted through floating point.
pub type Money = i64;
