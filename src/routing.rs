//! In-process route table implementing [`UrlRouter`].
//!
//! Rules use the familiar placeholder syntax: `/users/<int:id>/<name>`.
//! The table only builds URLs; matching incoming requests is the host's job.

use std::collections::HashMap;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::error::RoutingError;
use crate::request::{UrlArguments, UrlRouter};

/// Everything except RFC 3986 unreserved characters is escaped, so argument
/// values can't add path segments, query pairs or fragments.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// One piece of a parsed rule.
#[derive(Clone, Debug, PartialEq, Eq)]
enum RulePart {
    Static(String),
    Param(String),
}

/// A parsed URL rule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rule {
    source: String,
    parts: Vec<RulePart>,
}

impl Rule {
    /// Parse a rule such as `/normal/<int:id>/`.
    ///
    /// Fails with [`RoutingError::InvalidRule`] if the rule does not start
    /// with `/` or a placeholder is unterminated or empty.
    pub fn parse(rule: &str) -> Result<Self, RoutingError> {
        let invalid = |reason: &str| RoutingError::InvalidRule {
            rule: rule.to_string(),
            reason: reason.to_string(),
        };
        if !rule.starts_with('/') {
            return Err(invalid("must start with '/'"));
        }

        let mut parts = Vec::new();
        let mut rest = rule;
        while let Some(open) = rest.find('<') {
            if open > 0 {
                parts.push(RulePart::Static(rest[..open].to_string()));
            }
            let Some(close) = rest[open..].find('>') else {
                return Err(invalid("unterminated placeholder"));
            };
            let inner = &rest[open + 1..open + close];
            // `<converter:name>` or `<name>`
            let name = inner.rsplit(':').next().unwrap_or(inner).trim();
            if name.is_empty() {
                return Err(invalid("empty placeholder"));
            }
            parts.push(RulePart::Param(name.to_string()));
            rest = &rest[open + close + 1..];
        }
        if !rest.is_empty() {
            parts.push(RulePart::Static(rest.to_string()));
        }

        Ok(Self {
            source: rule.to_string(),
            parts,
        })
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Names of the placeholders, in rule order.
    pub fn parameters(&self) -> Vec<String> {
        self.parts
            .iter()
            .filter_map(|p| match p {
                RulePart::Param(name) => Some(name.clone()),
                RulePart::Static(_) => None,
            })
            .collect()
    }

    fn build(&self, endpoint: &str, arguments: &UrlArguments) -> Result<String, RoutingError> {
        let mut url = String::new();
        for part in &self.parts {
            match part {
                RulePart::Static(s) => url.push_str(s),
                RulePart::Param(name) => {
                    let value =
                        arguments
                            .get(name)
                            .ok_or_else(|| RoutingError::MissingArgument {
                                endpoint: endpoint.to_string(),
                                argument: name.clone(),
                            })?;
                    url.extend(utf8_percent_encode(value, COMPONENT));
                }
            }
        }

        // Leftover arguments become the query string, sorted by name.
        let query: Vec<String> = arguments
            .iter()
            .filter(|(name, _)| {
                !self
                    .parts
                    .iter()
                    .any(|p| matches!(p, RulePart::Param(n) if n == *name))
            })
            .map(|(name, value)| {
                format!(
                    "{}={}",
                    utf8_percent_encode(name, COMPONENT),
                    utf8_percent_encode(value, COMPONENT)
                )
            })
            .collect();
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query.join("&"));
        }
        Ok(url)
    }
}

/// Endpoint → rule mapping.
#[derive(Clone, Debug, Default)]
pub struct RouteTable {
    rules: HashMap<String, Rule>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a route. A second rule for the same endpoint replaces the first.
    pub fn add(&mut self, endpoint: impl Into<String>, rule: &str) -> Result<(), RoutingError> {
        let rule = Rule::parse(rule)?;
        self.rules.insert(endpoint.into(), rule);
        Ok(())
    }

    /// Builder variant of [`add`](Self::add).
    pub fn route(mut self, endpoint: impl Into<String>, rule: &str) -> Result<Self, RoutingError> {
        self.add(endpoint, rule)?;
        Ok(self)
    }

    #[inline]
    pub fn rule(&self, endpoint: &str) -> Option<&Rule> {
        self.rules.get(endpoint)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl UrlRouter for RouteTable {
    fn build_url(&self, endpoint: &str, arguments: &UrlArguments) -> Result<String, RoutingError> {
        self.rules
            .get(endpoint)
            .ok_or_else(|| RoutingError::UnknownEndpoint(endpoint.to_string()))?
            .build(endpoint, arguments)
    }

    fn route_parameters(&self, endpoint: &str) -> Option<Vec<String>> {
        self.rules.get(endpoint).map(Rule::parameters)
    }
}
