//! Menu tree — node storage, path traversal and range listing.

use std::collections::HashMap;
use std::fmt;

use parking_lot::RwLock;
use zerocopy::FromBytes;

use crate::error::Result;
use crate::item::MenuItem;
use crate::path::split_path;
use crate::registration::{Behaviour, NodeState, Registration, Target};
use crate::request::RequestContext;

/// Index of a node inside its [`Menu`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// The root node of every menu.
    pub const ROOT: NodeId = NodeId(0);

    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Storage for a single node.
#[derive(Clone, Default)]
pub(crate) struct NodeData {
    segment: String,
    parent: Option<NodeId>,
    /// Children in creation order.
    children: Vec<NodeId>,
    child_index: HashMap<String, NodeId>,
    order: i32,
    /// Tie-breaker among equal `order`s: creation for placeholders, first
    /// registration once registered.
    sequence: u64,
    next_child_order: i32,
    next_sequence: u64,
    pub(crate) state: NodeState,
    pub(crate) hidden: bool,
}

/// Arena of menu nodes. Node 0 is the root.
///
/// Nodes are only ever appended: a node keeps its parent and index for the
/// lifetime of the tree.
#[derive(Clone)]
pub(crate) struct MenuTree {
    nodes: Vec<NodeData>,
}

impl Default for MenuTree {
    fn default() -> Self {
        Self::new()
    }
}

impl MenuTree {
    pub(crate) fn new() -> Self {
        Self {
            nodes: vec![NodeData::default()],
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub(crate) fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0]
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.0]
    }

    #[inline]
    pub(crate) fn child(&self, parent: NodeId, segment: &str) -> Option<NodeId> {
        self.node(parent).child_index.get(segment).copied()
    }

    /// Walk `segments` from `from` without creating anything.
    pub(crate) fn lookup(&self, from: NodeId, segments: &[&str]) -> Option<NodeId> {
        segments
            .iter()
            .try_fold(from, |node, segment| self.child(node, segment))
    }

    /// Walk `segments` from `from`, creating missing nodes as placeholders.
    pub(crate) fn lookup_or_create(&mut self, from: NodeId, segments: &[&str]) -> NodeId {
        let mut current = from;
        for segment in segments {
            current = match self.child(current, segment) {
                Some(child) => child,
                None => self.create_child(current, segment),
            };
        }
        current
    }

    fn create_child(&mut self, parent: NodeId, segment: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        let parent_data = self.node_mut(parent);
        // Placeholders sort with the next registration slot, without taking it.
        let order = parent_data.next_child_order;
        let sequence = parent_data.next_sequence;
        parent_data.next_sequence += 1;
        parent_data.children.push(id);
        parent_data.child_index.insert(segment.to_string(), id);

        self.nodes.push(NodeData {
            segment: segment.to_string(),
            parent: Some(parent),
            order,
            sequence,
            ..NodeData::default()
        });
        tracing::debug!("Created menu node '{}'", self.path_of(id));
        id
    }

    /// Full dotted path, derived from ancestry. The root's path is empty.
    pub(crate) fn path_of(&self, id: NodeId) -> String {
        let mut segments: Vec<&str> = self
            .ancestors(id)
            .filter(|&n| n != NodeId::ROOT)
            .map(|n| self.node(n).segment.as_str())
            .collect();
        segments.reverse();
        segments.join(".")
    }

    /// `id` followed by each of its ancestors up to the root.
    pub(crate) fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(id), |&n| self.node(n).parent)
    }

    #[inline]
    pub(crate) fn depth_of(&self, id: NodeId) -> usize {
        self.ancestors(id).count() - 1
    }

    /// Children sorted for display: `order` ascending, ties in registration
    /// order.
    pub(crate) fn display_children(&self, id: NodeId) -> Vec<NodeId> {
        let mut children = self.node(id).children.clone();
        children.sort_by_key(|&c| {
            let node = self.node(c);
            (node.order, node.sequence)
        });
        children
    }

    /// All descendants of `id` (excluding itself) in DFS display order.
    pub(crate) fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.display_children(id);
        stack.reverse();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.display_children(node).into_iter().rev());
        }
        out
    }

    /// `id` and its descendants, children before parents, siblings in
    /// display order.
    pub(crate) fn post_order(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![(id, false)];
        while let Some((node, expanded)) = stack.pop() {
            if expanded {
                out.push(node);
                continue;
            }
            stack.push((node, true));
            stack.extend(
                self.display_children(node)
                    .into_iter()
                    .rev()
                    .map(|child| (child, false)),
            );
        }
        out
    }

    /// Is `candidate` a descendant of (or equal to) `ancestor`?
    pub(crate) fn is_descendant_of(&self, candidate: NodeId, ancestor: NodeId) -> bool {
        self.ancestors(candidate).any(|n| n == ancestor)
    }

    /// Nodes from `from` down to `to`, both inclusive, if `to` lies in the
    /// subtree of `from`.
    pub(crate) fn chain(&self, from: NodeId, to: NodeId) -> Option<Vec<NodeId>> {
        let mut chain = Vec::with_capacity(self.depth_of(to) + 1);
        for node in self.ancestors(to) {
            chain.push(node);
            if node == from {
                chain.reverse();
                return Some(chain);
            }
        }
        None
    }

    /// Apply a registration to `id`.
    pub(crate) fn register(&mut self, id: NodeId, registration: Registration) -> Result<()> {
        let path = self.path_of(id);
        let (entry, order) = registration.into_entry(&path)?;
        tracing::debug!(
            "Registered menu entry '{}' ({:?}, order {:?})",
            path,
            entry.target,
            order
        );

        let node = self.node(id);
        let first_registration = node.state.entry().is_none();
        let parent = node.parent;

        // Unordered siblings display in the order they were first registered.
        let mut keys = None;
        if first_registration && let Some(parent) = parent {
            let parent_data = self.node_mut(parent);
            let sequence = parent_data.next_sequence;
            parent_data.next_sequence += 1;
            let counter = parent_data.next_child_order;
            if order.is_none() {
                parent_data.next_child_order += 1;
            }
            keys = Some((counter, sequence));
        }

        let node = self.node_mut(id);
        if let Some((counter, sequence)) = keys {
            node.order = counter;
            node.sequence = sequence;
        }
        if let Some(order) = order {
            node.order = order;
        }
        node.state = NodeState::Registered(Box::new(entry));
        Ok(())
    }
}

/// A navigation menu.
///
/// The tree sits behind a read-write lock so handles can be shared between
/// request handlers. Topology and registrations are expected to be set up
/// during startup; during steady-state serving the only mutation is
/// [`MenuNode::hide`], which deliberately persists across requests.
#[derive(Default)]
pub struct Menu {
    tree: RwLock<MenuTree>,
}

impl Menu {
    pub fn new() -> Self {
        Self::default()
    }

    /// The root node.
    #[inline]
    pub fn root(&self) -> MenuNode<'_> {
        MenuNode {
            menu: self,
            id: NodeId::ROOT,
        }
    }

    /// Node at `path` relative to the root, created if missing.
    pub fn submenu(&self, path: &str) -> Result<MenuNode<'_>> {
        self.root().submenu(path)
    }

    /// Node at `path` relative to the root, or `None` if it does not exist.
    pub fn find(&self, path: &str) -> Result<Option<MenuNode<'_>>> {
        self.root().find(path)
    }

    /// Handle for an existing node id.
    pub fn node(&self, id: NodeId) -> Option<MenuNode<'_>> {
        (id.0 < self.tree.read().len()).then_some(MenuNode { menu: self, id })
    }

    /// The menu as seen by the request described by `request`: the root
    /// node bound to that request.
    #[inline]
    pub fn current<'r>(&'r self, request: &'r RequestContext) -> MenuItem<'r> {
        self.root().with_request(request)
    }

    /// Number of nodes, including the root and placeholders.
    pub fn len(&self) -> usize {
        self.tree.read().len()
    }

    /// True if nothing but the root exists.
    pub fn is_empty(&self) -> bool {
        self.len() == 1
    }
}

impl fmt::Debug for Menu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Menu").field("nodes", &self.len()).finish()
    }
}

/// Handle to one node of a [`Menu`].
///
/// Cheap to copy. Two handles are equal when they address the same node of
/// the same menu.
#[derive(Clone, Copy)]
pub struct MenuNode<'m> {
    menu: &'m Menu,
    id: NodeId,
}

impl<'m> MenuNode<'m> {
    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    #[inline]
    pub fn menu(&self) -> &'m Menu {
        self.menu
    }

    #[inline]
    fn handle(&self, id: NodeId) -> MenuNode<'m> {
        MenuNode {
            menu: self.menu,
            id,
        }
    }

    fn read<R>(&self, f: impl FnOnce(&NodeData) -> R) -> R {
        f(self.menu.tree.read().node(self.id))
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.id == NodeId::ROOT
    }

    /// Name of this node among its siblings (empty for the root).
    pub fn segment(&self) -> String {
        self.read(|n| n.segment.clone())
    }

    /// Full dotted path from the root.
    pub fn path(&self) -> String {
        self.menu.tree.read().path_of(self.id)
    }

    pub fn depth(&self) -> usize {
        self.menu.tree.read().depth_of(self.id)
    }

    pub fn parent(&self) -> Option<MenuNode<'m>> {
        self.read(|n| n.parent).map(|p| self.handle(p))
    }

    /// Direct children in display order.
    pub fn children(&self) -> Vec<MenuNode<'m>> {
        let ids = self.menu.tree.read().display_children(self.id);
        ids.into_iter().map(|id| self.handle(id)).collect()
    }

    /// All descendants in depth-first display order.
    pub fn descendants(&self) -> Vec<MenuNode<'m>> {
        let ids = self.menu.tree.read().descendants(self.id);
        ids.into_iter().map(|id| self.handle(id)).collect()
    }

    /// Node at `path` relative to this one, creating missing nodes.
    pub fn submenu(&self, path: &str) -> Result<MenuNode<'m>> {
        let segments = split_path(path)?;
        if let Some(id) = self.menu.tree.read().lookup(self.id, &segments) {
            return Ok(self.handle(id));
        }
        let id = self.menu.tree.write().lookup_or_create(self.id, &segments);
        Ok(self.handle(id))
    }

    /// Node at `path` relative to this one, or `None` if any segment is missing.
    pub fn find(&self, path: &str) -> Result<Option<MenuNode<'m>>> {
        let segments = split_path(path)?;
        let found = self.menu.tree.read().lookup(self.id, &segments);
        Ok(found.map(|id| self.handle(id)))
    }

    /// Attach display and behaviour attributes to this node.
    ///
    /// # Errors
    ///
    /// [`ConfigurationError`](crate::ConfigurationError) if both an endpoint and an
    /// external URL are given, or an extra attribute uses a reserved name.
    pub fn register(&self, registration: Registration) -> Result<MenuNode<'m>> {
        self.menu.tree.write().register(self.id, registration)?;
        Ok(*self)
    }

    /// True once [`register`](Self::register) has succeeded on this node.
    pub fn is_registered(&self) -> bool {
        self.read(|n| n.state.entry().is_some())
    }

    /// Display label; `None` for placeholders.
    pub fn text(&self) -> Option<String> {
        self.read(|n| n.state.entry().map(|e| e.text.clone()))
    }

    /// Sibling sort key.
    pub fn order(&self) -> i32 {
        self.read(|n| n.order)
    }

    pub fn target(&self) -> Target {
        self.read(|n| n.state.entry().map(|e| e.target.clone()).unwrap_or_default())
    }

    pub fn endpoint(&self) -> Option<String> {
        self.read(|n| {
            n.state
                .entry()
                .and_then(|e| e.target.endpoint())
                .map(str::to_string)
        })
    }

    pub fn external_url(&self) -> Option<String> {
        self.read(|n| {
            n.state
                .entry()
                .and_then(|e| e.target.external_url())
                .map(str::to_string)
        })
    }

    /// Typed extra attribute.
    ///
    /// Returns `None` if the key doesn't exist or its bytes don't match the
    /// size of `T`.
    pub fn attr<T: FromBytes>(&self, key: &str) -> Option<T> {
        self.read(|n| {
            let bytes = n.state.entry()?.attributes.get(key)?;
            T::read_from_bytes(bytes).ok()
        })
    }

    /// Extra attribute stored as UTF-8 text.
    pub fn attr_str(&self, key: &str) -> Option<String> {
        self.read(|n| {
            let bytes = n.state.entry()?.attributes.get(key)?;
            std::str::from_utf8(bytes).ok().map(str::to_string)
        })
    }

    /// Extra attribute as raw bytes.
    pub fn attr_raw(&self, key: &str) -> Option<Vec<u8>> {
        self.read(|n| n.state.entry()?.attributes.get(key).cloned())
    }

    pub fn has_attr(&self, key: &str) -> bool {
        self.read(|n| {
            n.state
                .entry()
                .is_some_and(|e| e.attributes.contains_key(key))
        })
    }

    /// Names of all extra attributes, sorted.
    pub fn attr_keys(&self) -> Vec<String> {
        self.read(|n| {
            let mut keys: Vec<String> = n
                .state
                .entry()
                .map(|e| e.attributes.keys().cloned().collect())
                .unwrap_or_default();
            keys.sort();
            keys
        })
    }

    /// Hide this node for every request from now on.
    pub fn hide(&self) {
        let mut tree = self.menu.tree.write();
        tree.node_mut(self.id).hidden = true;
        tracing::debug!("Hid menu node '{}'", tree.path_of(self.id));
    }

    pub fn is_hidden(&self) -> bool {
        self.read(|n| n.hidden)
    }

    /// Is this node a descendant of (or equal to) `ancestor`?
    pub fn is_descendant_of(&self, ancestor: &MenuNode<'_>) -> bool {
        std::ptr::eq(self.menu, ancestor.menu)
            && self.menu.tree.read().is_descendant_of(self.id, ancestor.id)
    }

    /// Nodes from `from` down to `to` (both relative to this node), inclusive.
    ///
    /// Returns `None` if either path does not exist or `to` is not in the
    /// subtree of `from`. Nothing is created.
    ///
    /// ```text
    /// list_path(".", ".level2.level3")          → [root, level2, level3]
    /// list_path("level2.level3B", "level2.level3") → None
    /// ```
    pub fn list_path(&self, from: &str, to: &str) -> Result<Option<Vec<MenuNode<'m>>>> {
        let from_segments = split_path(from)?;
        let to_segments = split_path(to)?;

        let tree = self.menu.tree.read();
        let (Some(from_id), Some(to_id)) = (
            tree.lookup(self.id, &from_segments),
            tree.lookup(self.id, &to_segments),
        ) else {
            tracing::trace!("list_path('{}', '{}'): path not found", from, to);
            return Ok(None);
        };
        let chain = tree.chain(from_id, to_id);
        drop(tree);

        Ok(chain.map(|ids| ids.into_iter().map(|id| self.handle(id)).collect()))
    }

    /// Bind this node to a request.
    #[inline]
    pub fn with_request<'r>(&self, request: &'r RequestContext) -> MenuItem<'r>
    where
        'm: 'r,
    {
        MenuItem::new(*self, request)
    }

    /// This node and its descendants, children first.
    pub(crate) fn post_order(&self) -> Vec<MenuNode<'m>> {
        let ids = self.menu.tree.read().post_order(self.id);
        ids.into_iter().map(|id| self.handle(id)).collect()
    }

    pub(crate) fn behaviour(&self) -> Behaviour {
        self.read(|n| Behaviour::of(&n.state, n.hidden))
    }
}

impl PartialEq for MenuNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.menu, other.menu) && self.id == other.id
    }
}

impl Eq for MenuNode<'_> {}

impl fmt::Debug for MenuNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MenuNode").field(&self.id.0).finish()
    }
}
