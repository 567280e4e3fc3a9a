//! End-to-end behaviour of the menu across simulated requests.

use std::collections::BTreeMap;
use std::sync::Arc;

use nav_menu::*;

fn routes(rules: &[(&str, &str)]) -> Arc<RouteTable> {
    let mut table = RouteTable::new();
    for (endpoint, rule) in rules {
        table.add(*endpoint, rule).unwrap();
    }
    Arc::new(table)
}

#[test]
fn test_simple_app() {
    let menu = Menu::new();
    menu.submenu(".").unwrap().register(Registration::new("test", "Test")).unwrap();
    menu.submenu(".level2")
        .unwrap()
        .register(Registration::new("level2", "Level 2"))
        .unwrap();
    menu.submenu(".level2.level3")
        .unwrap()
        .register(Registration::new("level3", "Level 3"))
        .unwrap();
    menu.submenu(".level2.level3B")
        .unwrap()
        .register(Registration::new("level3B", "Level 3B").order(1))
        .unwrap();

    let router = routes(&[
        ("test", "/test"),
        ("level2", "/level2"),
        ("level3", "/level3"),
        ("level3B", "/level3B"),
    ]);

    let request = RequestContext::new(router.clone(), "test");
    let current = menu.current(&request);
    assert_eq!(current.url(), "/test");
    assert_eq!(current.text().as_deref(), Some("Test"));
    assert!(current.active());
    assert_eq!(current.submenu("level2").unwrap().text().as_deref(), Some("Level 2"));
    assert!(!current.submenu("level2").unwrap().active());
    assert!(current.find("missing").unwrap().is_none());
    assert_eq!(current.list_path(".", ".level2.level3").unwrap().unwrap().len(), 3);
    assert!(current.list_path(".", "missing").unwrap().is_none());
    assert!(current.list_path("missing", ".level2.level3").unwrap().is_none());
    assert!(current.list_path("level2.level3B", "level2.level3").unwrap().is_none());

    let request = RequestContext::new(router.clone(), "level2");
    assert!(menu.current(&request).submenu("level2").unwrap().active());

    let request = RequestContext::new(router, "level3");
    let current = menu.current(&request);
    assert!(current.submenu(".level2.level3").unwrap().active());
    assert!(current.submenu("level2.level3").unwrap().active());

    assert!(!current.has_active_child(false));
    assert!(current.has_active_child(true));
    assert!(current.submenu("level2").unwrap().has_active_child(false));
    assert!(current.submenu("level2").unwrap().has_active_child(true));

    let item_1 = current.submenu("level2.level3").unwrap();
    let item_2 = current.submenu("level2.level3B").unwrap();
    assert!(item_1.order() < item_2.order());
    let children = current.submenu("level2").unwrap().children();
    assert_eq!(children[0], item_1);
    assert_eq!(children[1], item_2);
}

#[test]
fn test_submenu_is_idempotent() {
    let menu = Menu::new();
    let first = menu.submenu("a.b.c").unwrap();
    let nodes = menu.len();
    for path in ["a.b.c", ".a.b.c"] {
        assert_eq!(menu.submenu(path).unwrap(), first);
    }
    assert_eq!(menu.len(), nodes);
    assert_eq!(first.path(), "a.b.c");
    assert_eq!(first.segment(), "c");
    assert_eq!(first.depth(), 3);
}

#[test]
fn test_prefixed_endpoints() {
    let menu = Menu::new();
    menu.submenu(".").unwrap().register(Registration::new("foo.test", "Test")).unwrap();
    menu.submenu("bar").unwrap().register(Registration::new("foo.bar", "Foo Bar")).unwrap();

    let router = routes(&[("foo.test", "/test"), ("foo.bar", "/foo/bar")]);
    let request = RequestContext::new(router, "foo.bar");
    let current = menu.current(&request);
    assert_eq!(current.text().as_deref(), Some("Test"));
    assert!(!current.active());
    assert_eq!(current.submenu("bar").unwrap().text().as_deref(), Some("Foo Bar"));
    assert!(current.submenu("bar").unwrap().active());
    assert_eq!(current.submenu("bar").unwrap().url(), "/foo/bar");
}

fn visibility_menu() -> Menu {
    let menu = Menu::new();
    menu.submenu("always")
        .unwrap()
        .register(Registration::new("always", "Always").visible_when(|_| true))
        .unwrap();
    menu.submenu("never")
        .unwrap()
        .register(Registration::new("never", "Never").visible_when(|_| false))
        .unwrap();
    menu.submenu("normal")
        .unwrap()
        .register(Registration::new("normal", "Normal"))
        .unwrap();
    menu
}

fn assert_visibility(menu: &Menu, router: &Arc<RouteTable>, expected: &[(&str, bool)]) {
    for endpoint in ["never", "always", "normal"] {
        let request = RequestContext::new(router.clone(), endpoint).with_arg("id", "1");
        let current = menu.current(&request);
        for (path, visible) in expected {
            assert_eq!(
                current.submenu(path).unwrap().visible(),
                *visible,
                "request={endpoint} submenu={path}"
            );
        }
    }
}

#[test]
fn test_visible_when() {
    let menu = visibility_menu();
    let router = routes(&[("always", "/always"), ("never", "/never"), ("normal", "/normal")]);

    assert_visibility(
        &menu,
        &router,
        &[("never", false), ("always", true), ("normal", true)],
    );

    let request = RequestContext::unmatched(router.clone());
    menu.current(&request).submenu("always").unwrap().hide();

    assert_visibility(
        &menu,
        &router,
        &[("never", false), ("always", false), ("normal", true)],
    );
}

#[test]
fn test_visible_when_with_dynamic() {
    let menu = visibility_menu();
    let router = routes(&[
        ("always", "/always"),
        ("never", "/never"),
        ("normal", "/normal/<int:id>/"),
    ]);

    assert_visibility(
        &menu,
        &router,
        &[("never", false), ("always", true), ("normal", true)],
    );

    menu.submenu("always").unwrap().hide();

    assert_visibility(
        &menu,
        &router,
        &[("never", false), ("always", false), ("normal", true)],
    );
}

#[test]
fn test_visible_when_reads_request() {
    let menu = Menu::new();
    menu.submenu("admin")
        .unwrap()
        .register(
            Registration::new("admin", "Admin")
                .visible_when(|item| item.request().view_arg("role") == Some("admin")),
        )
        .unwrap();
    let router = routes(&[("admin", "/admin")]);

    let guest = RequestContext::new(router.clone(), "index").with_arg("role", "guest");
    assert!(!menu.current(&guest).submenu("admin").unwrap().visible());

    let admin = RequestContext::new(router, "index").with_arg("role", "admin");
    assert!(menu.current(&admin).submenu("admin").unwrap().visible());
}

#[test]
fn test_active_item() {
    let menu = Menu::new();
    menu.submenu("root").unwrap().register(Registration::new("root", "root")).unwrap();
    menu.submenu("root.sub1.item1")
        .unwrap()
        .register(Registration::new("sub1_item1", "Sub 1 - Item 1"))
        .unwrap();
    menu.submenu("root.sub2.item1")
        .unwrap()
        .register(Registration::new("sub2_item1", "Sub 2 - Item 1"))
        .unwrap();
    menu.submenu("root.sub2.item2")
        .unwrap()
        .register(Registration::new("sub2_item2", "Sub 2 - Item 2"))
        .unwrap();
    let router = routes(&[
        ("root", "/"),
        ("sub1_item1", "/sub1/item1"),
        ("sub2_item1", "/sub2/item1"),
        ("sub2_item2", "/sub2/item2"),
    ]);

    let request = RequestContext::new(router.clone(), "root");
    let current = menu.current(&request);
    assert_eq!(current.active_item(), Some(current.submenu("root").unwrap()));

    let request = RequestContext::new(router.clone(), "sub1_item1");
    let current = menu.current(&request);
    assert_eq!(
        current.active_item(),
        Some(current.submenu("root.sub1.item1").unwrap())
    );
    let sub1 = current.submenu("root.sub1").unwrap();
    assert_eq!(sub1.active_item(), Some(current.submenu("root.sub1.item1").unwrap()));
    let sub2 = current.submenu("root.sub2").unwrap();
    assert_eq!(sub2.active_item(), None);

    let request = RequestContext::new(router, "sub2_item2");
    let sub2 = menu.current(&request).submenu("root.sub2").unwrap();
    assert_eq!(
        sub2.active_item(),
        Some(menu.current(&request).submenu("root.sub2.item2").unwrap())
    );
}

#[test]
fn test_active_when() {
    let menu = Menu::new();
    menu.submenu("root").unwrap().register(Registration::new("root", "Root")).unwrap();
    menu.submenu("always")
        .unwrap()
        .register(Registration::new("always", "Always").active_when(|_| true))
        .unwrap();
    menu.submenu("never")
        .unwrap()
        .register(Registration::new("never", "Never").active_when(|_| false))
        .unwrap();
    menu.submenu("normal")
        .unwrap()
        .register(
            Registration::new("normal", "Normal")
                .active_when(|item| item.request().endpoint() == item.endpoint().as_deref()),
        )
        .unwrap();
    let router = routes(&[
        ("root", "/"),
        ("always", "/always"),
        ("never", "/never"),
        ("normal", "/normal"),
    ]);

    // (matched endpoint, [(submenu, expected active)])
    let data: &[(Option<&str>, [(&str, bool); 4])] = &[
        (
            Some("never"),
            [("root", false), ("never", false), ("always", true), ("normal", false)],
        ),
        (
            Some("always"),
            [("root", false), ("never", false), ("always", true), ("normal", false)],
        ),
        (
            Some("normal"),
            [("root", false), ("never", false), ("always", true), ("normal", true)],
        ),
        (
            None,
            [("root", false), ("never", false), ("always", true), ("normal", false)],
        ),
        (
            Some("root"),
            [("root", true), ("never", false), ("always", true), ("normal", false)],
        ),
    ];

    for (endpoint, testset) in data {
        let request = match endpoint {
            Some(endpoint) => RequestContext::new(router.clone(), *endpoint),
            None => RequestContext::unmatched(router.clone()),
        };
        let current = menu.current(&request);
        for (path, active_should) in testset {
            let active_is = current.submenu(path).unwrap().active();
            assert_eq!(
                active_is, *active_should,
                "endpoint={endpoint:?} submenu={path} active_is={active_is}"
            );
        }
    }
}

#[test]
fn test_dynamic_url() {
    let menu = Menu::new();
    menu.submenu("test")
        .unwrap()
        .register(Registration::new("test", "Test").endpoint_arguments_constructor(|item| {
            let request = item.request();
            let mut args = UrlArguments::new();
            for name in ["id", "name"] {
                if let Some(value) = request.view_arg(name) {
                    args.insert(name.to_string(), value.to_string());
                }
            }
            args
        }))
        .unwrap();
    let router = routes(&[("test", "/<int:id>/<string:name>")]);

    let mut args = UrlArguments::new();
    args.insert("id".into(), "1".into());
    args.insert("name".into(), "foo".into());
    let url = router.build_url("test", &args).unwrap();
    assert_eq!(url, "/1/foo");

    let request = RequestContext::new(router, "test").with_args(args);
    let current = menu.current(&request);
    assert_eq!(current.submenu("test").unwrap().url(), url);
    assert_eq!(current.submenu("missing").unwrap().url(), "#");
}

#[test]
fn test_dynamic_url_with_auto_args() {
    let menu = Menu::new();
    menu.submenu("edit")
        .unwrap()
        .register(Registration::new("edit", "Edit"))
        .unwrap();
    menu.submenu("view")
        .unwrap()
        .register(Registration::new("view", "View"))
        .unwrap();
    let router = routes(&[
        ("edit", "/records/<int:id>/edit"),
        ("view", "/records/<int:id>"),
    ]);

    let request = RequestContext::new(router, "view")
        .with_arg("id", "9")
        .with_arg("format", "json");
    let current = menu.current(&request);
    assert_eq!(current.submenu("edit").unwrap().url(), "/records/9/edit");
    assert_eq!(current.submenu("view").unwrap().url(), "/records/9");
}

#[test]
fn test_extra_attributes() {
    let count = 5i32;
    let menu = Menu::new();
    menu.submenu("test")
        .unwrap()
        .register(Registration::new("test", "Test").attr("count", &count))
        .unwrap();

    assert_eq!(menu.submenu("test").unwrap().attr::<i32>("count"), Some(count));
}

#[test]
fn test_extra_attributes_cannot_override() {
    let menu = Menu::new();
    let err = menu
        .submenu("test")
        .unwrap()
        .register(Registration::new("test", "Test").attr("url", "/test"))
        .unwrap_err();
    assert!(matches!(
        err,
        MenuError::Configuration(ConfigurationError::ReservedAttribute { .. })
    ));
}

#[test]
fn test_external_url() {
    let url = "https://python.org";
    let menu = Menu::new();
    let item1 = menu.submenu("menuitem1").unwrap();

    let err = item1
        .register(Registration::new("test", "Test").external_url(url))
        .unwrap_err();
    assert!(matches!(
        err,
        MenuError::Configuration(ConfigurationError::ConflictingTarget { .. })
    ));

    item1.register(Registration::external("Test", url)).unwrap();
    let request = RequestContext::unmatched(routes(&[]));
    assert_eq!(menu.current(&request).submenu("menuitem1").unwrap().url(), url);
    assert_eq!(item1.external_url().as_deref(), Some(url));
    assert_eq!(item1.endpoint(), None);
}

#[test]
fn test_dynamic_list_constructor() {
    let bar = vec!["Item 1", "Item 2", "Item 3"];
    let expected: Vec<ListEntry<'_>> = bar.iter().map(|s| ListEntry::from(*s)).collect();

    let menu = Menu::new();
    menu.submenu("foo")
        .unwrap()
        .register(
            Registration::new("foo", "foo")
                .dynamic_list_constructor(move |_| bar.iter().map(|s| ListEntry::from(*s)).collect()),
        )
        .unwrap();
    menu.submenu("other")
        .unwrap()
        .register(Registration::new("other", "Other"))
        .unwrap();

    let request = RequestContext::new(routes(&[("foo", "/"), ("other", "/other")]), "foo");
    let current = menu.current(&request);
    assert_eq!(current.submenu("foo").unwrap().dynamic_list(), expected);
    assert_eq!(
        current.submenu("other").unwrap().dynamic_list(),
        vec![ListEntry::Node(current.submenu("other").unwrap())]
    );
}

#[test]
fn test_has_visible_child() {
    let menu = Menu::new();
    menu.submenu("one.four")
        .unwrap()
        .register(Registration::new("one_four", "One Four").visible_when(|_| false))
        .unwrap();
    menu.submenu("six.seven")
        .unwrap()
        .register(Registration::new("six_seven", "Six Seven").visible_when(|_| false))
        .unwrap();
    menu.submenu("six.seven.eight")
        .unwrap()
        .register(Registration::new("six_seven_eight", "Six Seven Eight"))
        .unwrap();
    menu.submenu("two").unwrap().register(Registration::new("two", "Trow")).unwrap();
    menu.submenu("two.three")
        .unwrap()
        .register(Registration::new("two_three", "Two Three"))
        .unwrap();
    menu.submenu("two.three.five")
        .unwrap()
        .register(Registration::new("two_three_five", "Two Three Five"))
        .unwrap();
    let router = routes(&[]);

    let expected = [
        ("one", false),
        ("two", true),
        ("two.three", true),
        ("one.four", false),
        ("two.three.five", false),
        ("six", true),
        ("six.seven", true),
        ("six.seven.eight", false),
    ];
    let endpoints = [
        "one",
        "two",
        "two_three",
        "one_four",
        "six",
        "six_seven",
        "six_seven_eight",
    ];

    for endpoint in endpoints {
        let request = RequestContext::new(router.clone(), endpoint);
        let current = menu.current(&request);
        for (path, visible_should) in expected {
            let visible_is = current.submenu(path).unwrap().has_visible_child(true);
            assert_eq!(
                visible_is, visible_should,
                "endpoint={endpoint} submenu={path} visible_is={visible_is}"
            );
        }
    }

    // Non-recursive: `six` only sees the hidden `seven`.
    let request = RequestContext::unmatched(router);
    let current = menu.current(&request);
    assert!(!current.submenu("six").unwrap().has_visible_child(false));
    assert!(current.submenu("two").unwrap().has_visible_child(false));
}

#[test]
fn test_hidden_children_suppress_submenu() {
    let menu = Menu::new();
    menu.submenu("tools.a").unwrap().register(Registration::label("A")).unwrap();
    menu.submenu("tools.b").unwrap().register(Registration::label("B")).unwrap();
    let request = RequestContext::unmatched(routes(&[]));
    let tools = menu.current(&request).submenu("tools").unwrap();
    assert!(tools.has_visible_child(true));

    for child in tools.children() {
        child.hide();
    }
    assert!(!tools.has_visible_child(true));
    assert!(tools.visible());
}

#[test]
fn test_active_checks_segment_not_prefix() {
    let menu = Menu::new();
    menu.submenu("object").unwrap().register(Registration::new("object", "Object")).unwrap();
    menu.submenu("objects")
        .unwrap()
        .register(Registration::new("objects", "Objects"))
        .unwrap();
    let router = routes(&[("object", "/object"), ("objects", "/objects")]);

    let request = RequestContext::new(router.clone(), "objects");
    assert!(!menu.current(&request).submenu("object").unwrap().active());

    let request = RequestContext::new(router, "object");
    assert!(!menu.current(&request).submenu("objects").unwrap().active());
}

#[test]
fn test_sibling_order() {
    let menu = Menu::new();
    menu.submenu("z").unwrap().register(Registration::label("Z")).unwrap();
    menu.submenu("y").unwrap().register(Registration::label("Y").order(-5)).unwrap();
    menu.submenu("x").unwrap().register(Registration::label("X")).unwrap();
    menu.submenu("w").unwrap().register(Registration::label("W").order(10)).unwrap();

    let texts: Vec<String> = menu
        .root()
        .children()
        .iter()
        .filter_map(|n| n.text())
        .collect();
    // y(-5), z(0), x(1), w(10)
    assert_eq!(texts, vec!["Y", "Z", "X", "W"]);
}

#[test]
fn test_sibling_order_ignores_placeholder_creation() {
    let menu = Menu::new();
    menu.submenu("reports.daily")
        .unwrap()
        .register(Registration::label("Daily"))
        .unwrap();
    menu.submenu("home").unwrap().register(Registration::label("Home")).unwrap();
    menu.submenu("reports").unwrap().register(Registration::label("Reports")).unwrap();

    let texts: Vec<String> = menu
        .root()
        .children()
        .iter()
        .filter_map(|n| n.text())
        .collect();
    assert_eq!(texts, vec!["Home", "Reports"]);
}

#[test]
fn test_invalid_paths_are_errors() {
    let menu = Menu::new();
    for path in ["a..b", "a.", "..a"] {
        assert!(
            matches!(menu.submenu(path), Err(MenuError::InvalidPath { .. })),
            "should reject: {path}"
        );
    }
    assert!(menu.root().list_path("a..b", ".").is_err());
}

#[test]
fn test_shared_between_threads() {
    let menu = Arc::new(visibility_menu());
    let router = routes(&[("always", "/always"), ("never", "/never"), ("normal", "/normal")]);

    let handles: Vec<_> = ["always", "never", "normal"]
        .into_iter()
        .map(|endpoint| {
            let menu = menu.clone();
            let router = router.clone();
            std::thread::spawn(move || {
                let request = RequestContext::new(router, endpoint);
                let current = menu.current(&request);
                let active: BTreeMap<String, bool> = current
                    .children()
                    .iter()
                    .map(|c| (c.path(), c.active()))
                    .collect();
                (endpoint, active)
            })
        })
        .collect();

    for handle in handles {
        let (endpoint, active) = handle.join().unwrap();
        for (path, is_active) in active {
            assert_eq!(is_active, path == endpoint, "request={endpoint} node={path}");
        }
    }
}
