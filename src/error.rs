//! Error types for menu construction and resolution.
//!
//! Only programming mistakes are raised as errors. Routine misses during a
//! request (unknown path with creation disabled, unrelated `list_path`
//! arguments, URLs that cannot be built) surface as `None` or `"#"` instead.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, MenuError>;

/// Errors raised by the menu tree.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MenuError {
    /// A dotted path contained an empty segment (e.g. `"a..b"` or `"a."`).
    #[error("invalid menu path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    /// Registration attributes are contradictory or shadow a core field.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// A route rule was rejected while setting up the router.
    #[error(transparent)]
    Routing(#[from] RoutingError),

    /// A menu was attached to an application that already has one.
    #[error("a menu is already attached to this application")]
    AlreadyInitialized,
}

/// Registration-time contract violations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error(
        "menu entry '{path}' cannot target both endpoint '{endpoint}' and external url '{url}'"
    )]
    ConflictingTarget {
        path: String,
        endpoint: String,
        url: String,
    },

    #[error("extra attribute '{name}' on menu entry '{path}' shadows a reserved field")]
    ReservedAttribute { path: String, name: String },
}

/// Failures reported by a [`UrlRouter`](crate::UrlRouter) while parsing rules
/// or building a URL.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoutingError {
    #[error("no route registered for endpoint '{0}'")]
    UnknownEndpoint(String),

    #[error("endpoint '{endpoint}' requires argument '{argument}'")]
    MissingArgument { endpoint: String, argument: String },

    #[error("invalid route rule '{rule}': {reason}")]
    InvalidRule { rule: String, reason: String },
}

impl MenuError {
    pub(crate) fn invalid_path(path: &str, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}
