//! Declarative configuration for nav-menu.
//!
//! This crate provides tools for:
//! - Parsing `menu.toml` files (menu entries and the route table)
//! - Validating entries before they touch a live [`Menu`]
//! - Registering the entries on a menu at startup
//!
//! # Format
//!
//! ```toml
//! [routes]
//! index = "/"
//! user = "/users/<int:id>"
//!
//! [[entries]]
//! path = "account.profile"
//! endpoint = "user"          # or: external_url = "https://..."
//! text = "Profile"
//! order = 2                  # optional
//! hidden = false             # optional
//!
//! [entries.attributes]       # optional string attributes
//! icon = "user"
//! ```
//!
//! # Usage
//!
//! ```ignore
//! let menu = nav_menu::Menu::new();
//! let config = nav_menu_config::load("menu.toml", &menu)?;
//! let router = std::sync::Arc::new(config.routes().clone());
//! ```

mod toml_parser;

pub use toml_parser::{EntryConfig, MenuConfig};

use std::path::{Path, PathBuf};

use nav_menu::{Menu, MenuError, RoutingError};
use thiserror::Error;

/// Read `config_path`, validate it and register its entries on `menu`.
///
/// Returns the parsed configuration so the caller can pick up the route table.
///
/// # Errors
///
/// Returns an error if:
/// - the file cannot be read or is not valid TOML
/// - an entry or route fails validation
/// - the menu rejects a registration
pub fn load(config_path: impl AsRef<Path>, menu: &Menu) -> Result<MenuConfig, ConfigError> {
    let config_path = config_path.as_ref();
    let config = MenuConfig::from_file(config_path)?;
    config.apply(menu)?;
    tracing::debug!(
        "Loaded menu configuration from {} ({} entries, {} routes)",
        config_path.display(),
        config.len(),
        config.routes().len()
    );
    Ok(config)
}

/// Errors that can occur while loading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid route for '{endpoint}': {source}")]
    Route {
        endpoint: String,
        #[source]
        source: RoutingError,
    },

    #[error("Menu error: {0}")]
    Menu(#[from] MenuError),
}
