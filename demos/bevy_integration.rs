//! Bevy integration example.
//!
//! This example shows how to:
//! - Set up the `MenuPlugin` with a route table
//! - Register menu entries in a startup system
//! - Switch screens through the `ActiveRoute` resource
//! - Render the menu for the current route in a system

use bevy::prelude::*;
use nav_menu::bevy::{request_context, ActiveRoute, MenuPlugin, MenuRouter};
use nav_menu::{Menu, Registration, RouteTable, UrlArguments};

fn main() -> nav_menu::Result<()> {
    let routes = RouteTable::new()
        .route("title", "/")
        .and_then(|r| r.route("play", "/play/<int:level>"))
        .and_then(|r| r.route("options.audio", "/options/audio"))
        .and_then(|r| r.route("options.video", "/options/video"))?;

    let mut app = App::new();
    app.add_plugins(MenuPlugin::new().with_router(routes))
        .add_systems(Startup, build_menu)
        .add_systems(Update, print_menu);

    println!("=== Bevy Menu Example ===\n");

    // Title screen
    navigate(&mut app, "title", &[]);
    app.update();

    // Level 3
    navigate(&mut app, "play", &[("level", "3")]);
    app.update();

    // Audio options
    navigate(&mut app, "options.audio", &[]);
    app.update();

    Ok(())
}

fn navigate(app: &mut App, endpoint: &str, args: &[(&str, &str)]) {
    let view_args: UrlArguments = args
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    app.world_mut()
        .resource_mut::<ActiveRoute>()
        .navigate(endpoint, view_args);
}

fn build_menu(menu: Res<Menu>) {
    let entries = [
        ("title", Registration::new("title", "Title Screen")),
        ("play", Registration::new("play", "Continue")),
        ("options", Registration::label("Options").order(10)),
        ("options.audio", Registration::new("options.audio", "Audio")),
        ("options.video", Registration::new("options.video", "Video")),
    ];
    for (path, registration) in entries {
        if let Err(err) = menu.submenu(path).and_then(|node| node.register(registration)) {
            eprintln!("failed to register '{}': {}", path, err);
        }
    }
}

fn print_menu(menu: Res<Menu>, route: Res<ActiveRoute>, router: Res<MenuRouter>) {
    let request = request_context(&route, &router);
    let current = menu.current(&request);

    println!("Route: {:?} {:?}", route.endpoint, route.view_args);
    for item in current.children() {
        print_item(&item, 1);
    }
    if let Some(active) = current.active_item() {
        let trail: Vec<String> = current
            .list_path(".", &active.path())
            .ok()
            .flatten()
            .unwrap_or_default()
            .iter()
            .filter_map(|n| n.text())
            .collect();
        println!("  Breadcrumbs: {}", trail.join(" > "));
    }
    println!();
}

fn print_item(item: &nav_menu::MenuItem<'_>, indent: usize) {
    if !item.visible() {
        return;
    }
    let marker = if item.active() {
        "*"
    } else if item.has_active_child(true) {
        "+"
    } else {
        " "
    };
    println!(
        "{}{} {} -> {}",
        "  ".repeat(indent),
        marker,
        item.text().unwrap_or_default(),
        item.url()
    );
    for child in item.children() {
        print_item(&child, indent + 1);
    }
}
