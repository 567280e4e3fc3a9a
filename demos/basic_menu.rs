//! Basic menu example.
//!
//! This example shows how to:
//! - Register entries under dotted paths (parents are created automatically)
//! - Resolve active state, visibility and URLs for a request
//! - Use a dynamic list to render generated items

use std::sync::Arc;

use nav_menu::{DisplayItem, ListEntry, Menu, Registration, RequestContext, RouteTable};

fn main() -> nav_menu::Result<()> {
    println!("=== Basic Menu Example ===\n");

    let menu = Menu::new();
    menu.submenu("home")?.register(Registration::new("index", "Home"))?;
    menu.submenu("projects")?.register(
        Registration::new("projects", "Projects").dynamic_list_constructor(|item| {
            ["alpha", "beta"]
                .iter()
                .map(|name| {
                    let url = format!("{}/{}", item.url(), name);
                    ListEntry::from(DisplayItem::new(*name).with_url(url))
                })
                .collect()
        }),
    )?;
    menu.submenu("projects.new")?.register(Registration::new("project_new", "New project"))?;
    menu.submenu("admin")?.register(
        Registration::new("admin", "Admin")
            .visible_when(|item| item.request().view_arg("role") == Some("admin")),
    )?;
    menu.submenu("docs")?
        .register(Registration::external("Docs", "https://docs.rs").order(-1))?;

    let routes = RouteTable::new()
        .route("index", "/")
        .and_then(|r| r.route("projects", "/projects"))
        .and_then(|r| r.route("project_new", "/projects/new"))
        .and_then(|r| r.route("admin", "/admin"))?;
    let router = Arc::new(routes);

    for (endpoint, role) in [("index", "guest"), ("project_new", "admin")] {
        let request = RequestContext::new(router.clone(), endpoint).with_arg("role", role);
        let current = menu.current(&request);

        println!("Request: endpoint={} role={}", endpoint, role);
        for item in current.children().iter().filter(|i| i.visible()) {
            let marker = if item.active() || item.has_active_child(true) {
                "*"
            } else {
                " "
            };
            println!(
                "  {} {} -> {}",
                marker,
                item.text().unwrap_or_default(),
                item.url()
            );
        }

        let projects = current.submenu("projects")?;
        let listed: Vec<String> = projects
            .dynamic_list()
            .iter()
            .map(|e| e.to_display_item().text)
            .collect();
        println!("  projects lists: {:?}", listed);
        println!();
    }

    Ok(())
}
