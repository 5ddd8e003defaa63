use crate::{ErrorCode, ProdexError};
use tokio_postgres::error::SqlState;

impl From<rusqlite::Error> for ProdexError {
    fn from(err: rusqlite::Error) -> Self {
        let msg = err.to_string();
        // SQLite reports a vanished column or table at prepare time.
        if msg.contains("no such column") || msg.contains("no such table") {
            return ProdexError::new(ErrorCode::SchemaUnavailable, msg);
        }
        match err {
            rusqlite::Error::SqliteFailure(e, _)
                if e.code == rusqlite::ErrorCode::CannotOpen
                    || e.code == rusqlite::ErrorCode::DatabaseBusy
                    || e.code == rusqlite::ErrorCode::DatabaseLocked =>
            {
                ProdexError::new(ErrorCode::ConnectionFailed, msg)
            }
            _ => ProdexError::new(ErrorCode::QueryFailed, msg),
        }
    }
}

impl From<tokio_postgres::Error> for ProdexError {
    fn from(err: tokio_postgres::Error) -> Self {
        if let Some(db) = err.as_db_error() {
            if db.code() == &SqlState::UNDEFINED_COLUMN || db.code() == &SqlState::UNDEFINED_TABLE {
                return ProdexError::new(ErrorCode::SchemaUnavailable, db.message());
            }
            return ProdexError::new(ErrorCode::QueryFailed, db.message());
        }
        if err.is_closed() {
            return ProdexError::new(ErrorCode::ConnectionFailed, err.to_string());
        }
        ProdexError::new(ErrorCode::QueryFailed, err.to_string())
    }
}

impl From<std::io::Error> for ProdexError {
    fn from(err: std::io::Error) -> Self {
        ProdexError::new(ErrorCode::Internal, err.to_string())
    }
}

impl From<serde_json::Error> for ProdexError {
    fn from(err: serde_json::Error) -> Self {
        ProdexError::new(ErrorCode::SerializationFailed, err.to_string())
    }
}

impl From<serde_yaml::Error> for ProdexError {
    fn from(err: serde_yaml::Error) -> Self {
        ProdexError::new(ErrorCode::InvalidConfig, err.to_string())
    }
}

/// Levenshtein-based suggestion for "did you mean" hints.
pub fn find_closest_match(target: &str, options: &[String]) -> Option<String> {
    let mut best_match: Option<&str> = None;
    let mut min_distance = usize::MAX;

    for option in options {
        let distance = levenshtein(target, option);
        if distance < min_distance && distance <= 3 {
            min_distance = distance;
            best_match = Some(option.as_str());
        }
    }

    best_match.map(|s| s.to_string())
}

fn levenshtein(a: &str, b: &str) -> usize {
    let len_a = a.len();
    let len_b = b.len();
    let mut dp = vec![vec![0; len_b + 1]; len_a + 1];

    for (i, row) in dp.iter_mut().enumerate().take(len_a + 1) {
        row[0] = i;
    }
    for (j, val) in dp[0].iter_mut().enumerate().take(len_b + 1) {
        *val = j;
    }

    for i in 1..=len_a {
        for j in 1..=len_b {
            let cost = if a.chars().nth(i - 1) == b.chars().nth(j - 1) {
                0
            } else {
                1
            };
            dp[i][j] = std::cmp::min(
                std::cmp::min(dp[i - 1][j] + 1, dp[i][j - 1] + 1),
                dp[i - 1][j - 1] + cost,
            );
        }
    }

    dp[len_a][len_b]
}
