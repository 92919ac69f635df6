//! # Error Handling
//!
//! This module provides the error taxonomy for the reconciliation engine.
//! Per-record failures (validation, storage writes) are contained inside the
//! batch operations and surface as human-readable strings in the batch
//! outcome; only batch-level failures propagate as typed errors.

use thiserror::Error;
use uuid::Uuid;

/// An incoming fixture payload that fails the minimum-shape check.
///
/// Validation failures are never retried; the record is skipped and the
/// message is reported in the batch outcome.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("home team name is required")]
    MissingHomeTeam,
    #[error("away team name is required")]
    MissingAwayTeam,
    #[error("competition name is required")]
    MissingCompetition,
    #[error("kickoff time '{value}' is not a valid RFC 3339 timestamp")]
    UnparseableKickoff { value: String },
}

/// Errors surfaced by the fixture store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {source}")]
    Database {
        #[from]
        source: sea_orm::DbErr,
    },
    #[error("fixture {id} not found")]
    NotFound { id: Uuid },
}

impl StoreError {
    /// Wrap a SeaORM error as a store error.
    pub fn database_error(source: sea_orm::DbErr) -> Self {
        Self::Database { source }
    }
}

/// Per-record failure inside an upsert batch.
#[derive(Debug, Error)]
pub enum UpsertError {
    #[error("invalid fixture payload: {0}")]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors raised by provider fetch clients.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider {provider} returned error status {status}")]
    Upstream {
        provider: &'static str,
        status: u16,
        body_snippet: Option<String>,
    },
    #[error("provider request failed: {source}")]
    Transport {
        #[from]
        source: reqwest::Error,
    },
    #[error("malformed provider response: {details}")]
    MalformedResponse { details: String },
    #[error("provider configuration error: {details}")]
    Configuration { details: String },
}

/// Truncate an upstream response body for error reporting.
///
/// Truncation counts characters, not bytes, so multi-byte UTF-8 input never
/// splits on a character boundary.
pub fn body_snippet(body: String) -> String {
    const MAX_CHARS: usize = 200;
    if body.chars().count() > MAX_CHARS {
        let truncated: String = body.chars().take(MAX_CHARS).collect();
        format!("{}...", truncated)
    } else {
        body
    }
}

/// Classify a database error as "column does not exist".
///
/// The capability probe relies on this to distinguish an absent optional
/// column from a transient storage failure. Codes cover Postgres and MySQL;
/// SQLite reports no stable code for this class, so the message is matched.
pub fn is_missing_column(error: &sea_orm::DbErr) -> bool {
    use sea_orm::RuntimeErr;

    const PG_UNDEFINED_COLUMN: &str = "42703";
    const MYSQL_BAD_FIELD: &str = "1054";

    let runtime_err = match error {
        sea_orm::DbErr::Query(RuntimeErr::SqlxError(sqlx_err))
        | sea_orm::DbErr::Exec(RuntimeErr::SqlxError(sqlx_err))
        | sea_orm::DbErr::Conn(RuntimeErr::SqlxError(sqlx_err)) => sqlx_err,
        _ => return false,
    };

    let Some(db_error) = runtime_err.as_database_error() else {
        return false;
    };

    if let Some(code) = db_error.code() {
        let code_str = code.as_ref();
        if code_str == PG_UNDEFINED_COLUMN || code_str == MYSQL_BAD_FIELD {
            return true;
        }
    }

    db_error.message().contains("no such column")
        || db_error.message().contains("does not exist")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_messages_name_the_field() {
        assert_eq!(
            ValidationError::MissingHomeTeam.to_string(),
            "home team name is required"
        );
        assert_eq!(
            ValidationError::UnparseableKickoff {
                value: "not-a-date".to_string()
            }
            .to_string(),
            "kickoff time 'not-a-date' is not a valid RFC 3339 timestamp"
        );
    }

    #[test]
    fn body_snippet_truncates_on_char_boundaries() {
        let long = "测试中文字符 body with multi-byte characters ".repeat(20);
        let snippet = body_snippet(long.clone());
        assert!(snippet.chars().count() <= 203);
        assert!(snippet.ends_with("..."));

        let short = "short body".to_string();
        assert_eq!(body_snippet(short.clone()), short);
    }

    #[test]
    fn non_sqlx_errors_are_not_missing_columns() {
        let err = sea_orm::DbErr::RecordNotFound("fixtures".to_string());
        assert!(!is_missing_column(&err));

        let err = sea_orm::DbErr::Custom("no such column: venue".to_string());
        assert!(!is_missing_column(&err));
    }
}
