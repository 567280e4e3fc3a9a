//! Registration — display and behaviour attributes attached to a node.
//!
//! A node starts life as an anonymous placeholder created by path traversal.
//! [`MenuNode::register`](crate::MenuNode::register) turns it into a
//! registered entry carrying a label, an optional navigation target and the
//! per-request callables consulted by the resolvers.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use zerocopy::{Immutable, IntoBytes};

use crate::error::ConfigurationError;
use crate::item::{ListEntry, MenuItem};
use crate::request::UrlArguments;

/// Per-request boolean callable (`visible_when`, `active_when`).
pub type Predicate = Arc<dyn Fn(&MenuItem<'_>) -> bool + Send + Sync>;

/// Per-request callable producing the arguments for the node's URL.
pub type ArgumentsConstructor = Arc<dyn Fn(&MenuItem<'_>) -> UrlArguments + Send + Sync>;

/// Per-request callable producing the node's display list.
pub type DynamicListConstructor =
    Arc<dyn for<'a> Fn(&MenuItem<'a>) -> Vec<ListEntry<'a>> + Send + Sync>;

/// Names extra attributes may not use.
pub const RESERVED_ATTRIBUTES: &[&str] = &[
    "text",
    "url",
    "order",
    "endpoint",
    "external_url",
    "active",
    "visible",
    "hidden",
    "visible_when",
    "active_when",
    "endpoint_arguments_constructor",
    "dynamic_list_constructor",
    "dynamic_list",
    "active_item",
    "children",
    "parent",
    "path",
    "segment",
    "submenu",
];

/// Where a registered entry navigates to.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum Target {
    /// Plain label, nothing to navigate to.
    #[default]
    None,
    /// An endpoint resolved through the router.
    Endpoint(String),
    /// A URL used verbatim.
    External(String),
}

impl Target {
    #[inline]
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            Self::Endpoint(e) => Some(e),
            _ => None,
        }
    }

    #[inline]
    pub fn external_url(&self) -> Option<&str> {
        match self {
            Self::External(u) => Some(u),
            _ => None,
        }
    }
}

/// Builder for the attributes of a menu entry.
///
/// ```ignore
/// menu.submenu("account.profile")?.register(
///     Registration::new("user.profile", "Profile")
///         .order(2)
///         .visible_when(|item| item.request().view_arg("user").is_some())
///         .attr("badge", &3u32),
/// )?;
/// ```
#[derive(Clone, Default)]
pub struct Registration {
    text: String,
    endpoint: Option<String>,
    external_url: Option<String>,
    order: Option<i32>,
    visible_when: Option<Predicate>,
    active_when: Option<Predicate>,
    endpoint_arguments_constructor: Option<ArgumentsConstructor>,
    dynamic_list_constructor: Option<DynamicListConstructor>,
    attributes: Vec<(String, Vec<u8>)>,
}

impl Registration {
    /// An entry linking to `endpoint`.
    pub fn new(endpoint: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            endpoint: Some(endpoint.into()),
            ..Self::default()
        }
    }

    /// An entry without a navigation target.
    pub fn label(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// An entry linking to an external URL.
    pub fn external(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            external_url: Some(url.into()),
            ..Self::default()
        }
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn external_url(mut self, url: impl Into<String>) -> Self {
        self.external_url = Some(url.into());
        self
    }

    /// Explicit sibling position; lower sorts first.
    pub fn order(mut self, order: i32) -> Self {
        self.order = Some(order);
        self
    }

    pub fn visible_when<F>(mut self, f: F) -> Self
    where
        F: Fn(&MenuItem<'_>) -> bool + Send + Sync + 'static,
    {
        self.visible_when = Some(Arc::new(f));
        self
    }

    pub fn active_when<F>(mut self, f: F) -> Self
    where
        F: Fn(&MenuItem<'_>) -> bool + Send + Sync + 'static,
    {
        self.active_when = Some(Arc::new(f));
        self
    }

    pub fn endpoint_arguments_constructor<F>(mut self, f: F) -> Self
    where
        F: Fn(&MenuItem<'_>) -> UrlArguments + Send + Sync + 'static,
    {
        self.endpoint_arguments_constructor = Some(Arc::new(f));
        self
    }

    pub fn dynamic_list_constructor<F>(mut self, f: F) -> Self
    where
        F: for<'a> Fn(&MenuItem<'a>) -> Vec<ListEntry<'a>> + Send + Sync + 'static,
    {
        self.dynamic_list_constructor = Some(Arc::new(f));
        self
    }

    /// Attach a typed extra attribute.
    ///
    /// The type must implement `zerocopy::IntoBytes + Immutable`; numbers and
    /// `str` do out of the box. Read it back with
    /// [`MenuNode::attr`](crate::MenuNode::attr) or
    /// [`MenuNode::attr_str`](crate::MenuNode::attr_str).
    pub fn attr<T: IntoBytes + Immutable + ?Sized>(
        mut self,
        key: impl Into<String>,
        value: &T,
    ) -> Self {
        self.attributes
            .push((key.into(), value.as_bytes().to_vec()));
        self
    }

    /// Attach an extra attribute as raw bytes.
    pub fn attr_raw(mut self, key: impl Into<String>, value: Vec<u8>) -> Self {
        self.attributes.push((key.into(), value));
        self
    }

    /// Validate and convert into node state. `path` is only used in errors.
    pub(crate) fn into_entry(self, path: &str) -> Result<(Entry, Option<i32>), ConfigurationError> {
        let target = match (self.endpoint, self.external_url) {
            (Some(endpoint), Some(url)) => {
                return Err(ConfigurationError::ConflictingTarget {
                    path: path.to_string(),
                    endpoint,
                    url,
                });
            }
            (Some(endpoint), None) => Target::Endpoint(endpoint),
            (None, Some(url)) => Target::External(url),
            (None, None) => Target::None,
        };

        let mut attributes = HashMap::with_capacity(self.attributes.len());
        for (name, bytes) in self.attributes {
            if RESERVED_ATTRIBUTES.contains(&name.as_str()) {
                return Err(ConfigurationError::ReservedAttribute {
                    path: path.to_string(),
                    name,
                });
            }
            attributes.insert(name, bytes);
        }

        let entry = Entry {
            text: self.text,
            target,
            visible_when: self.visible_when,
            active_when: self.active_when,
            endpoint_arguments_constructor: self.endpoint_arguments_constructor,
            dynamic_list_constructor: self.dynamic_list_constructor,
            attributes,
        };
        Ok((entry, self.order))
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("text", &self.text)
            .field("endpoint", &self.endpoint)
            .field("external_url", &self.external_url)
            .field("order", &self.order)
            .finish_non_exhaustive()
    }
}

/// Node state: an addressable placeholder or a registered entry.
#[derive(Clone, Default)]
pub(crate) enum NodeState {
    #[default]
    Placeholder,
    Registered(Box<Entry>),
}

impl NodeState {
    #[inline]
    pub(crate) fn entry(&self) -> Option<&Entry> {
        match self {
            Self::Registered(entry) => Some(entry),
            Self::Placeholder => None,
        }
    }
}

/// Attributes of a registered node.
#[derive(Clone)]
pub(crate) struct Entry {
    pub(crate) text: String,
    pub(crate) target: Target,
    pub(crate) visible_when: Option<Predicate>,
    pub(crate) active_when: Option<Predicate>,
    pub(crate) endpoint_arguments_constructor: Option<ArgumentsConstructor>,
    pub(crate) dynamic_list_constructor: Option<DynamicListConstructor>,
    pub(crate) attributes: HashMap<String, Vec<u8>>,
}

/// Snapshot of a node's behaviour, cloned out of the tree so callables run
/// without the tree lock held.
#[derive(Clone, Default)]
pub(crate) struct Behaviour {
    pub(crate) target: Target,
    pub(crate) visible_when: Option<Predicate>,
    pub(crate) active_when: Option<Predicate>,
    pub(crate) endpoint_arguments_constructor: Option<ArgumentsConstructor>,
    pub(crate) dynamic_list_constructor: Option<DynamicListConstructor>,
    pub(crate) hidden: bool,
}

impl Behaviour {
    pub(crate) fn of(state: &NodeState, hidden: bool) -> Self {
        match state.entry() {
            Some(entry) => Self {
                target: entry.target.clone(),
                visible_when: entry.visible_when.clone(),
                active_when: entry.active_when.clone(),
                endpoint_arguments_constructor: entry.endpoint_arguments_constructor.clone(),
                dynamic_list_constructor: entry.dynamic_list_constructor.clone(),
                hidden,
            },
            None => Self {
                hidden,
                ..Self::default()
            },
        }
    }
}
