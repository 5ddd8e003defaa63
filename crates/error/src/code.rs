use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric error codes following PRODEX-XXXX format.
///
/// ## Code Ranges
/// - **1000-1999**: Connection errors
/// - **2000-2999**: Query errors
/// - **3000-3999**: Configuration errors
/// - **5000-5999**: Internal/System errors
///
/// Codes are stable across versions (semver contract).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
#[non_exhaustive]
pub enum ErrorCode {
    // === Connection Errors (1000-1999) ===
    /// PRODEX-1001: Database unreachable
    ConnectionFailed = 1001,
    /// PRODEX-1002: Query exceeded the configured time bound
    QueryTimeout = 1002,

    // === Query Errors (2000-2999) ===
    /// PRODEX-2001: Table metadata could not be resolved
    SchemaUnavailable = 2001,
    /// PRODEX-2002: No product with the requested symbol
    ProductNotFound = 2002,
    /// PRODEX-2003: Query execution failed
    QueryFailed = 2003,
    /// PRODEX-2004: Identifier failed structural validation
    InvalidIdentifier = 2004,

    // === Configuration Errors (3000-3999) ===
    /// PRODEX-3001: Invalid or unparseable configuration
    InvalidConfig = 3001,

    // === Internal Errors (5000-5999) ===
    /// PRODEX-5001: Serialization/deserialization failed
    SerializationFailed = 5001,
    /// PRODEX-5002: Unexpected internal state
    Internal = 5002,

    /// PRODEX-9999: Unknown/unclassified error
    Unknown = 9999,
}

impl ErrorCode {
    /// Get the numeric code value
    pub fn as_u16(&self) -> u16 {
        *self as u16
    }

    /// Get the formatted code string (e.g., "PRODEX-2002")
    pub fn as_str(&self) -> String {
        format!("PRODEX-{:04}", self.as_u16())
    }

    /// Get the error category
    pub fn category(&self) -> ErrorCategory {
        match self.as_u16() {
            1000..=1999 => ErrorCategory::Connection,
            2000..=2999 => ErrorCategory::Query,
            3000..=3999 => ErrorCategory::Config,
            _ => ErrorCategory::Internal,
        }
    }

    /// HTTP status this code surfaces as at the API boundary.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::ProductNotFound => 404,
            Self::ConnectionFailed => 503,
            Self::QueryTimeout => 504,
            _ => 500,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<ErrorCode> for String {
    fn from(code: ErrorCode) -> String {
        code.as_str()
    }
}

impl TryFrom<String> for ErrorCode {
    type Error = String;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        // Parse "PRODEX-XXXX" format
        let num: u16 = s
            .strip_prefix("PRODEX-")
            .and_then(|n| n.parse().ok())
            .ok_or_else(|| "Invalid format".to_string())?;
        Self::try_from(num).map_err(|_| "Unknown code".to_string())
    }
}

impl TryFrom<u16> for ErrorCode {
    type Error = String;

    fn try_from(n: u16) -> std::result::Result<Self, Self::Error> {
        match n {
            1001 => Ok(Self::ConnectionFailed),
            1002 => Ok(Self::QueryTimeout),
            2001 => Ok(Self::SchemaUnavailable),
            2002 => Ok(Self::ProductNotFound),
            2003 => Ok(Self::QueryFailed),
            2004 => Ok(Self::InvalidIdentifier),
            3001 => Ok(Self::InvalidConfig),
            5001 => Ok(Self::SerializationFailed),
            5002 => Ok(Self::Internal),
            9999 => Ok(Self::Unknown),
            _ => Err(format!("Unknown error code: {}", n)),
        }
    }
}

/// High-level error category for HTTP status mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ErrorCategory {
    Connection,
    Query,
    Config,
    Internal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_formatting() {
        assert_eq!(ErrorCode::ConnectionFailed.as_str(), "PRODEX-1001");
        assert_eq!(ErrorCode::SchemaUnavailable.as_str(), "PRODEX-2001");
        assert_eq!(ErrorCode::Unknown.as_str(), "PRODEX-9999");
    }

    #[test]
    fn test_error_code_parsing() {
        assert_eq!(
            ErrorCode::try_from("PRODEX-1001".to_string()).unwrap(),
            ErrorCode::ConnectionFailed
        );
        assert_eq!(
            ErrorCode::try_from("PRODEX-9999".to_string()).unwrap(),
            ErrorCode::Unknown
        );
    }

    #[test]
    fn test_error_code_parsing_errors() {
        assert!(ErrorCode::try_from("INVALID".to_string()).is_err());
        assert!(ErrorCode::try_from("PRODEX-0000".to_string()).is_err());
        assert!(ErrorCode::try_from("PRODEX-ABC".to_string()).is_err());
    }

    #[test]
    fn test_error_categories() {
        assert_eq!(
            ErrorCode::ConnectionFailed.category(),
            ErrorCategory::Connection
        );
        assert_eq!(ErrorCode::ProductNotFound.category(), ErrorCategory::Query);
        assert_eq!(ErrorCode::InvalidConfig.category(), ErrorCategory::Config);
        assert_eq!(ErrorCode::Internal.category(), ErrorCategory::Internal);
        assert_eq!(ErrorCode::Unknown.category(), ErrorCategory::Internal);
    }

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(ErrorCode::ProductNotFound.http_status(), 404);
        assert_eq!(ErrorCode::ConnectionFailed.http_status(), 503);
        assert_eq!(ErrorCode::QueryTimeout.http_status(), 504);
        assert_eq!(ErrorCode::SchemaUnavailable.http_status(), 500);
        assert_eq!(ErrorCode::QueryFailed.http_status(), 500);
    }
}
