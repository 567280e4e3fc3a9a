//! # Hierarchical Navigation Menus (nav-menu)
//!
//! Components register menu entries under dotted paths; on every request the
//! tree reports, per node, whether it is active, whether it should be shown,
//! which URL it links to and what it lists.
//!
//! ## Design
//!
//! ```text
//! Menu ── root
//!          ├── level2            "Level 2"   → endpoint level2
//!          │    ├── level3       "Level 3"   → endpoint level3
//!          │    └── level3B      "Level 3B"  → endpoint level3B (order 1)
//!          └── docs              "Docs"      → https://docs.rs
//! ```
//!
//! Nodes are created lazily by path traversal and never removed. Registration
//! happens once at startup; afterwards every resolver is a pure function of
//! the node and the [`RequestContext`] handed in by the host. The one piece of
//! state shared across requests is the hide flag set by [`MenuNode::hide`].
//!
//! ```ignore
//! use std::sync::Arc;
//! use nav_menu::{Menu, Registration, RequestContext, RouteTable};
//!
//! let menu = Menu::new();
//! menu.submenu("level2")?.register(Registration::new("level2", "Level 2"))?;
//!
//! let routes = Arc::new(RouteTable::new().route("level2", "/level2")?);
//! let request = RequestContext::new(routes, "level2");
//! let current = menu.current(&request);
//! assert!(current.submenu("level2")?.active());
//! assert_eq!(current.submenu("level2")?.url(), "/level2");
//! ```

pub mod bevy;
pub mod error;
pub mod item;
pub mod path;
pub mod registration;
pub mod request;
pub mod routing;
pub mod tree;

pub use error::{ConfigurationError, MenuError, Result, RoutingError};
pub use item::{DisplayItem, ListEntry, MenuItem, NO_URL};
pub use path::{join_segments, split_path, SEPARATOR};
pub use registration::{
    ArgumentsConstructor, DynamicListConstructor, Predicate, Registration, Target,
    RESERVED_ATTRIBUTES,
};
pub use request::{RequestContext, UrlArguments, UrlRouter};
pub use routing::{RouteTable, Rule};
pub use tree::{Menu, MenuNode, NodeId};
