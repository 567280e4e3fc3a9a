//! Per-request routing facts consumed by the resolvers.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::RoutingError;

/// Arguments used to build a URL for an endpoint (parameter name → value).
pub type UrlArguments = BTreeMap<String, String>;

/// The host's routing layer, as far as the menu needs it.
pub trait UrlRouter: Send + Sync {
    /// Build a URL for `endpoint` from `arguments`.
    fn build_url(&self, endpoint: &str, arguments: &UrlArguments) -> Result<String, RoutingError>;

    /// Parameter names declared by the route behind `endpoint`, or `None`
    /// if the endpoint is unknown.
    fn route_parameters(&self, endpoint: &str) -> Option<Vec<String>>;
}

/// Everything the host knows about the request being handled.
///
/// Passed explicitly to every resolver; nothing here outlives the request.
#[derive(Clone)]
pub struct RequestContext {
    endpoint: Option<String>,
    view_args: UrlArguments,
    router: Arc<dyn UrlRouter>,
}

impl RequestContext {
    /// A request that matched `endpoint`.
    pub fn new(router: Arc<dyn UrlRouter>, endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: Some(endpoint.into()),
            view_args: UrlArguments::new(),
            router,
        }
    }

    /// A request for which no route matched.
    pub fn unmatched(router: Arc<dyn UrlRouter>) -> Self {
        Self {
            endpoint: None,
            view_args: UrlArguments::new(),
            router,
        }
    }

    /// Builder method: add one resolved path parameter.
    pub fn with_arg(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.view_args.insert(name.into(), value.into());
        self
    }

    /// Builder method: replace the resolved path parameters.
    pub fn with_args(mut self, view_args: UrlArguments) -> Self {
        self.view_args = view_args;
        self
    }

    /// The matched endpoint, if any.
    #[inline]
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    /// Resolved path parameters of the current request.
    #[inline]
    pub fn view_args(&self) -> &UrlArguments {
        &self.view_args
    }

    /// Single resolved path parameter.
    #[inline]
    pub fn view_arg(&self, name: &str) -> Option<&str> {
        self.view_args.get(name).map(String::as_str)
    }

    #[inline]
    pub fn router(&self) -> &dyn UrlRouter {
        self.router.as_ref()
    }

    /// Arguments for `endpoint` inferred from the current request: the
    /// resolved parameters whose names the target route declares.
    pub fn inferred_arguments(&self, endpoint: &str) -> UrlArguments {
        let Some(declared) = self.router.route_parameters(endpoint) else {
            return UrlArguments::new();
        };
        self.view_args
            .iter()
            .filter(|(name, _)| declared.iter().any(|d| d == *name))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }
}

impl fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestContext")
            .field("endpoint", &self.endpoint)
            .field("view_args", &self.view_args)
            .finish_non_exhaustive()
    }
}
