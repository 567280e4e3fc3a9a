//! Bevy integration for navigation menus.
//!
//! Provides:
//! - `MenuPlugin` — builder-pattern plugin that attaches the [`Menu`] as a Resource
//! - `ActiveRoute` — the screen/route the app is currently showing
//! - `MenuRouter` — the URL collaborator used by menu items
//!
//! # Example
//!
//! ```ignore
//! use bevy::prelude::*;
//! use nav_menu::bevy::*;
//! use nav_menu::{Menu, Registration, RouteTable};
//!
//! fn main() {
//!     let routes = RouteTable::new().route("settings", "/settings").unwrap();
//!     App::new()
//!         .add_plugins(MenuPlugin::new().with_router(routes))
//!         .add_systems(Startup, build_menu)
//!         .run();
//! }
//!
//! fn build_menu(menu: Res<Menu>) {
//!     menu.submenu("settings")
//!         .and_then(|n| n.register(Registration::new("settings", "Settings")))
//!         .expect("valid menu entry");
//! }
//!
//! fn render(menu: Res<Menu>, route: Res<ActiveRoute>, router: Res<MenuRouter>) {
//!     let request = request_context(&route, &router);
//!     for item in menu.current(&request).children() {
//!         // draw item.text(), highlight item.active() ...
//!     }
//! }
//! ```

use bevy::prelude::*;
use std::sync::Arc;

use crate::error::MenuError;
use crate::request::{RequestContext, UrlArguments, UrlRouter};
use crate::routing::RouteTable;
use crate::tree::Menu;

// =============================================================================
// Plugin
// =============================================================================

/// Bevy plugin for the navigation menu.
///
/// ```ignore
/// App::new().add_plugins(MenuPlugin::new().with_router(routes))
/// ```
#[derive(Default)]
pub struct MenuPlugin {
    router: Option<Arc<dyn UrlRouter>>,
}

impl MenuPlugin {
    /// Plugin with an empty route table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `router` to build URLs for menu entries.
    pub fn with_router(mut self, router: impl UrlRouter + 'static) -> Self {
        self.router = Some(Arc::new(router));
        self
    }

    /// Use a shared router to build URLs for menu entries.
    pub fn with_shared_router(mut self, router: Arc<dyn UrlRouter>) -> Self {
        self.router = Some(router);
        self
    }
}

impl Plugin for MenuPlugin {
    fn build(&self, app: &mut App) {
        if let Err(err) = attach_menu(app) {
            panic!("Failed to attach navigation menu: {err}");
        }

        let router = self
            .router
            .clone()
            .unwrap_or_else(|| Arc::new(RouteTable::new()));
        app.insert_resource(MenuRouter(router));
        app.init_resource::<ActiveRoute>();
    }
}

/// Attach a fresh [`Menu`] to `app`.
///
/// # Errors
///
/// [`MenuError::AlreadyInitialized`] if the app already has a menu.
pub fn attach_menu(app: &mut App) -> Result<(), MenuError> {
    if app.world().contains_resource::<Menu>() {
        return Err(MenuError::AlreadyInitialized);
    }
    app.insert_resource(Menu::new());
    tracing::debug!("Attached navigation menu");
    Ok(())
}

// =============================================================================
// Resources
// =============================================================================

/// URL collaborator shared by all menu lookups.
#[derive(Resource, Clone)]
pub struct MenuRouter(pub Arc<dyn UrlRouter>);

/// The route the app is currently showing, i.e. the "request" menus are
/// resolved against.
#[derive(Resource, Clone, Debug, Default, PartialEq, Eq)]
pub struct ActiveRoute {
    /// Matched endpoint, `None` before the first navigation.
    pub endpoint: Option<String>,
    /// Resolved route parameters.
    pub view_args: UrlArguments,
}

impl ActiveRoute {
    /// Switch to `endpoint` with `view_args`.
    pub fn navigate(&mut self, endpoint: impl Into<String>, view_args: UrlArguments) {
        self.endpoint = Some(endpoint.into());
        self.view_args = view_args;
    }

    /// Forget the current route.
    #[inline]
    pub fn clear(&mut self) {
        self.endpoint = None;
        self.view_args.clear();
    }
}

impl Resource for Menu {}

/// Request context for the current route.
pub fn request_context(route: &ActiveRoute, router: &MenuRouter) -> RequestContext {
    let request = match &route.endpoint {
        Some(endpoint) => RequestContext::new(router.0.clone(), endpoint.clone()),
        None => RequestContext::unmatched(router.0.clone()),
    };
    request.with_args(route.view_args.clone())
}

// =============================================================================
// Tests
// =============================================================================
