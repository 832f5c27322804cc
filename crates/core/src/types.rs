/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All server-side timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// User-reported wall-clock time with no zone attached.
pub type LocalTimestamp = chrono::NaiveDateTime;
