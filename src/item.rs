//! Request-bound node view and the per-request resolvers.
//!
//! Every resolver recomputes from the node's registration and the
//! [`RequestContext`]; nothing is cached between calls. Callables are cloned
//! out of the tree before they run so they may freely navigate the menu.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::registration::Target;
use crate::request::RequestContext;
use crate::tree::{MenuNode, NodeId};

/// URL returned for nodes that cannot be linked.
pub const NO_URL: &str = "#";

/// A menu node seen through one request.
#[derive(Clone, Copy)]
pub struct MenuItem<'r> {
    node: MenuNode<'r>,
    request: &'r RequestContext,
}

impl<'r> MenuItem<'r> {
    pub(crate) fn new(node: MenuNode<'r>, request: &'r RequestContext) -> Self {
        Self { node, request }
    }

    #[inline]
    pub fn node(&self) -> MenuNode<'r> {
        self.node
    }

    #[inline]
    pub fn request(&self) -> &'r RequestContext {
        self.request
    }

    #[inline]
    fn bind(&self, node: MenuNode<'r>) -> MenuItem<'r> {
        MenuItem::new(node, self.request)
    }

    #[inline]
    pub fn id(&self) -> NodeId {
        self.node.id()
    }

    pub fn path(&self) -> String {
        self.node.path()
    }

    pub fn text(&self) -> Option<String> {
        self.node.text()
    }

    pub fn order(&self) -> i32 {
        self.node.order()
    }

    pub fn endpoint(&self) -> Option<String> {
        self.node.endpoint()
    }

    pub fn hide(&self) {
        self.node.hide()
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Node at `path` relative to this one, creating missing nodes.
    pub fn submenu(&self, path: &str) -> Result<MenuItem<'r>> {
        Ok(self.bind(self.node.submenu(path)?))
    }

    /// Node at `path` relative to this one, if it exists.
    pub fn find(&self, path: &str) -> Result<Option<MenuItem<'r>>> {
        Ok(self.node.find(path)?.map(|n| self.bind(n)))
    }

    pub fn parent(&self) -> Option<MenuItem<'r>> {
        self.node.parent().map(|n| self.bind(n))
    }

    /// Direct children in display order.
    pub fn children(&self) -> Vec<MenuItem<'r>> {
        self.node.children().into_iter().map(|n| self.bind(n)).collect()
    }

    /// See [`MenuNode::list_path`].
    pub fn list_path(&self, from: &str, to: &str) -> Result<Option<Vec<MenuItem<'r>>>> {
        Ok(self
            .node
            .list_path(from, to)?
            .map(|nodes| nodes.into_iter().map(|n| self.bind(n)).collect()))
    }

    // =========================================================================
    // Resolvers
    // =========================================================================

    /// URL for this node.
    ///
    /// External URLs are returned verbatim. Endpoints are built through the
    /// request's router, with arguments from the registered constructor or,
    /// by default, the request's parameters that the target route declares.
    /// Anything that cannot be linked yields [`NO_URL`].
    pub fn url(&self) -> String {
        let behaviour = self.node.behaviour();
        let endpoint = match behaviour.target {
            Target::External(url) => return url,
            Target::None => return NO_URL.to_string(),
            Target::Endpoint(endpoint) => endpoint,
        };

        let arguments = match &behaviour.endpoint_arguments_constructor {
            Some(construct) => construct(self),
            None => self.request.inferred_arguments(&endpoint),
        };

        match self.request.router().build_url(&endpoint, &arguments) {
            Ok(url) => url,
            Err(err) => {
                tracing::trace!("No url for menu node '{}': {}", self.path(), err);
                NO_URL.to_string()
            }
        }
    }

    /// Is this the entry selected by the current request?
    ///
    /// Without an `active_when` callable, the node's endpoint must equal the
    /// matched endpoint exactly.
    pub fn active(&self) -> bool {
        let behaviour = self.node.behaviour();
        match &behaviour.active_when {
            Some(active_when) => active_when(self),
            None => matches!(
                (behaviour.target.endpoint(), self.request.endpoint()),
                (Some(own), Some(current)) if own == current
            ),
        }
    }

    /// Should this entry be rendered for the current request?
    ///
    /// Hidden nodes are never visible; otherwise `visible_when` decides
    /// (default: visible).
    pub fn visible(&self) -> bool {
        let behaviour = self.node.behaviour();
        if behaviour.hidden {
            return false;
        }
        behaviour
            .visible_when
            .as_ref()
            .is_none_or(|visible_when| visible_when(self))
    }

    /// The most specific active node in this subtree (this node included).
    ///
    /// Branches are searched in display order; within the first branch that
    /// contains an active node, the deepest one wins.
    pub fn active_item(&self) -> Option<MenuItem<'r>> {
        self.node
            .post_order()
            .into_iter()
            .map(|n| self.bind(n))
            .find(|item| item.active())
    }

    /// Is a direct child (or, if `recursive`, any descendant) active?
    pub fn has_active_child(&self, recursive: bool) -> bool {
        self.related(recursive).iter().any(|item| item.active())
    }

    /// Is a direct child (or, if `recursive`, any descendant) visible?
    pub fn has_visible_child(&self, recursive: bool) -> bool {
        self.related(recursive).iter().any(|item| item.visible())
    }

    fn related(&self, recursive: bool) -> Vec<MenuItem<'r>> {
        if recursive {
            self.node
                .descendants()
                .into_iter()
                .map(|n| self.bind(n))
                .collect()
        } else {
            self.children()
        }
    }

    /// Display list for this node: the registered constructor's result, or
    /// just this node.
    pub fn dynamic_list(&self) -> Vec<ListEntry<'r>> {
        match self.node.behaviour().dynamic_list_constructor {
            Some(construct) => construct(self),
            None => vec![ListEntry::Node(*self)],
        }
    }

    /// Render-ready snapshot of this node.
    pub fn to_display_item(&self) -> DisplayItem {
        DisplayItem {
            text: self.text().unwrap_or_default(),
            url: Some(self.url()),
            active: self.active(),
        }
    }
}

impl PartialEq for MenuItem<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node
    }
}

impl PartialEq<MenuNode<'_>> for MenuItem<'_> {
    fn eq(&self, other: &MenuNode<'_>) -> bool {
        self.node == *other
    }
}

impl fmt::Debug for MenuItem<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuItem")
            .field("node", &self.node)
            .field("endpoint", &self.request.endpoint())
            .finish()
    }
}

/// One element of a dynamic list.
#[derive(Clone, Debug, PartialEq)]
pub enum ListEntry<'r> {
    /// A node of the menu.
    Node(MenuItem<'r>),
    /// An ad hoc item that is not part of the tree.
    Item(DisplayItem),
}

impl<'r> ListEntry<'r> {
    /// Display form of the entry.
    pub fn to_display_item(&self) -> DisplayItem {
        match self {
            Self::Node(item) => item.to_display_item(),
            Self::Item(item) => item.clone(),
        }
    }

    pub fn as_node(&self) -> Option<&MenuItem<'r>> {
        match self {
            Self::Node(item) => Some(item),
            Self::Item(_) => None,
        }
    }
}

impl<'r> From<MenuItem<'r>> for ListEntry<'r> {
    fn from(item: MenuItem<'r>) -> Self {
        Self::Node(item)
    }
}

impl From<DisplayItem> for ListEntry<'_> {
    fn from(item: DisplayItem) -> Self {
        Self::Item(item)
    }
}

impl From<&str> for ListEntry<'_> {
    fn from(text: &str) -> Self {
        Self::Item(DisplayItem::new(text))
    }
}

impl From<String> for ListEntry<'_> {
    fn from(text: String) -> Self {
        Self::Item(DisplayItem::new(text))
    }
}

/// Plain display data, e.g. a record name in a generated submenu.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayItem {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub active: bool,
}

impl DisplayItem {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }
}
