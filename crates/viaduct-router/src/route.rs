//! A single routing table entry

use viaduct_core::{Matcher, Params};

use crate::cache::{MatchCache, DEFAULT_CACHE_CAPACITY};
use crate::context::RequestHead;
use crate::error::{Result, RouterError};
use crate::handler::Handler;

/// Input to the registration primitive. Every field except `handlers`
/// is optional; a spec without a `path` registers a middleware entry.
pub struct RouteSpec<Req, Res> {
    pub host: Option<String>,
    pub method: Option<Vec<String>>,
    pub path: Option<String>,
    pub group: Option<String>,
    pub name: Option<String>,
    pub handlers: Vec<Handler<Req, Res>>,
    pub case_sensitive: bool,
}

impl<Req, Res> Default for RouteSpec<Req, Res> {
    fn default() -> Self {
        Self {
            host: None,
            method: None,
            path: None,
            group: None,
            name: None,
            handlers: Vec::new(),
            case_sensitive: false,
        }
    }
}

/// Everything a successful match extracted from the request strings.
#[derive(Debug, Clone, Default)]
pub struct MatchOutcome {
    pub params: Params,
    pub subdomains: Params,
}

/// One registered entry: matchers, a method filter, and the handler
/// chain. Both matchers are compiled eagerly at registration, so a bad
/// template fails the registration call instead of a request.
pub struct Route<Req, Res> {
    host: Option<String>,
    host_matcher: Option<Matcher>,
    method: Option<Vec<String>>,
    path: Option<String>,
    path_matcher: Matcher,
    group: Option<String>,
    name: Option<String>,
    handlers: Vec<Handler<Req, Res>>,
    case_sensitive: bool,
    cache: MatchCache,
}

impl<Req, Res> Route<Req, Res> {
    pub(crate) fn new(spec: RouteSpec<Req, Res>) -> Result<Self> {
        if spec.handlers.is_empty() {
            return Err(RouterError::NoHandlers);
        }

        let method = match spec.method {
            Some(methods) => {
                let mut upper = Vec::with_capacity(methods.len());
                for m in methods {
                    if m.trim().is_empty() {
                        return Err(RouterError::EmptyMethod);
                    }
                    upper.push(m.to_ascii_uppercase());
                }
                Some(upper)
            }
            None => None,
        };

        let host_matcher = match &spec.host {
            Some(host) => Some(Matcher::host(host, spec.case_sensitive)?),
            None => None,
        };

        // Middleware entries match any path under their group prefix
        let path_matcher = match (&spec.path, &spec.group) {
            (Some(path), _) => Matcher::path(path, spec.case_sensitive)?,
            (None, Some(group)) => Matcher::prefix(group, spec.case_sensitive)?,
            (None, None) => Matcher::prefix("/", spec.case_sensitive)?,
        };

        Ok(Self {
            host: spec.host,
            host_matcher,
            method,
            path: spec.path,
            path_matcher,
            group: spec.group,
            name: spec.name,
            handlers: spec.handlers,
            case_sensitive: spec.case_sensitive,
            cache: MatchCache::new(DEFAULT_CACHE_CAPACITY),
        })
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// Method filter, uppercased. `None` matches every method.
    pub fn method(&self) -> Option<&[String]> {
        self.method.as_deref()
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_middleware(&self) -> bool {
        self.path.is_none()
    }

    pub(crate) fn handlers(&self) -> &[Handler<Req, Res>] {
        &self.handlers
    }

    pub(crate) fn path_matcher(&self) -> &Matcher {
        &self.path_matcher
    }

    pub(crate) fn set_name(&mut self, name: &str) -> Result<()> {
        if self.is_middleware() {
            return Err(RouterError::MiddlewareName);
        }
        if let Some(existing) = &self.name {
            return Err(RouterError::AlreadyNamed(existing.clone()));
        }
        self.name = Some(name.to_string());
        Ok(())
    }

    /// Decompose back into a spec, for flattening into another table.
    pub(crate) fn into_spec(self) -> RouteSpec<Req, Res> {
        RouteSpec {
            host: self.host,
            method: self.method,
            path: self.path,
            group: self.group,
            name: self.name,
            handlers: self.handlers,
            case_sensitive: self.case_sensitive,
        }
    }

    /// Match a request head against this route: host first, then the
    /// method filter, then the path. The two string matches go through
    /// the per-route cache.
    pub fn matches(&self, head: &RequestHead<'_>) -> Option<MatchOutcome> {
        let mut outcome = MatchOutcome::default();

        if let Some(host_matcher) = &self.host_matcher {
            let host = head.host?;
            let key = format!("host:{}", host);
            outcome.subdomains = self.cache.get_or_compute(&key, || host_matcher.matches(host))?;
        }

        if let Some(methods) = &self.method {
            let method = head.method.to_ascii_uppercase();
            if !methods.iter().any(|m| *m == method) {
                return None;
            }
        }

        let key = format!("path:{}", head.path);
        outcome.params = self
            .cache
            .get_or_compute(&key, || self.path_matcher.matches(head.path))?;

        Some(outcome)
    }
}
