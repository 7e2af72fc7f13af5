/// Internal database primary keys are PostgreSQL BIGSERIAL. Never exposed
/// for lookups; external identification is by uuid.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
