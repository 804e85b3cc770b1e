//! Route registration and the routing table

use tracing::debug;
use viaduct_core::{GenerateOptions, Params};

use crate::context::{RequestBindings, RequestHead, ResponseSink};
use crate::dispatch;
use crate::error::{DispatchError, Result, RouterError};
use crate::handler::IntoHandlers;
use crate::route::{Route, RouteSpec};

/// Router-wide registration defaults.
#[derive(Debug, Clone, Default)]
pub struct RouterConfig {
    /// Compile patterns case-sensitively. Off by default.
    pub case_sensitive: bool,
    /// Host template inherited by routes that do not set their own.
    pub host: Option<String>,
}

/// An ordered route table plus its registration API.
///
/// Registration happens once, before traffic; the table is read-only
/// during dispatch and concurrent `dispatch` calls are independent.
pub struct Router<Req, Res> {
    config: RouterConfig,
    routes: Vec<Route<Req, Res>>,
    /// Most recently registered nameable route, the target of `name`.
    /// Cleared by merges and middleware registrations.
    last: Option<usize>,
}

impl<Req, Res> Default for Router<Req, Res> {
    fn default() -> Self {
        Self::new(RouterConfig::default())
    }
}

impl<Req, Res> Router<Req, Res> {
    pub fn new(config: RouterConfig) -> Self {
        Self {
            config,
            routes: Vec::new(),
            last: None,
        }
    }

    /// The registration primitive every helper below reduces to. The
    /// router config supplies the host fallback and case sensitivity.
    pub fn add_route(&mut self, mut spec: RouteSpec<Req, Res>) -> Result<&mut Self> {
        if spec.host.is_none() {
            spec.host = self.config.host.clone();
        }
        spec.case_sensitive = self.config.case_sensitive;

        let nameable = spec.path.is_some();
        let route = Route::new(spec)?;
        debug!(
            method = ?route.method(),
            path = route.path().or(route.group()).unwrap_or("/"),
            middleware = route.is_middleware(),
            "route registered"
        );
        self.routes.push(route);
        self.last = nameable.then_some(self.routes.len() - 1);
        Ok(self)
    }

    /// Register a route for a single method.
    pub fn add(
        &mut self,
        method: &str,
        path: &str,
        handlers: impl IntoHandlers<Req, Res>,
    ) -> Result<&mut Self> {
        self.add_route(RouteSpec {
            method: Some(vec![method.to_string()]),
            path: Some(path.to_string()),
            handlers: handlers.into_handlers(),
            ..RouteSpec::default()
        })
    }

    /// Register a route for several methods at once.
    pub fn any(
        &mut self,
        methods: &[&str],
        path: &str,
        handlers: impl IntoHandlers<Req, Res>,
    ) -> Result<&mut Self> {
        self.add_route(RouteSpec {
            method: Some(methods.iter().map(|m| m.to_string()).collect()),
            path: Some(path.to_string()),
            handlers: handlers.into_handlers(),
            ..RouteSpec::default()
        })
    }

    /// Register a route matching every method.
    pub fn all(&mut self, path: &str, handlers: impl IntoHandlers<Req, Res>) -> Result<&mut Self> {
        self.add_route(RouteSpec {
            path: Some(path.to_string()),
            handlers: handlers.into_handlers(),
            ..RouteSpec::default()
        })
    }

    pub fn get(&mut self, path: &str, handlers: impl IntoHandlers<Req, Res>) -> Result<&mut Self> {
        self.add("GET", path, handlers)
    }

    pub fn post(&mut self, path: &str, handlers: impl IntoHandlers<Req, Res>) -> Result<&mut Self> {
        self.add("POST", path, handlers)
    }

    pub fn put(&mut self, path: &str, handlers: impl IntoHandlers<Req, Res>) -> Result<&mut Self> {
        self.add("PUT", path, handlers)
    }

    pub fn patch(
        &mut self,
        path: &str,
        handlers: impl IntoHandlers<Req, Res>,
    ) -> Result<&mut Self> {
        self.add("PATCH", path, handlers)
    }

    pub fn delete(
        &mut self,
        path: &str,
        handlers: impl IntoHandlers<Req, Res>,
    ) -> Result<&mut Self> {
        self.add("DELETE", path, handlers)
    }

    pub fn head(&mut self, path: &str, handlers: impl IntoHandlers<Req, Res>) -> Result<&mut Self> {
        self.add("HEAD", path, handlers)
    }

    pub fn options(
        &mut self,
        path: &str,
        handlers: impl IntoHandlers<Req, Res>,
    ) -> Result<&mut Self> {
        self.add("OPTIONS", path, handlers)
    }

    /// Register middleware that runs for every request.
    pub fn middleware(&mut self, handlers: impl IntoHandlers<Req, Res>) -> Result<&mut Self> {
        self.add_route(RouteSpec {
            handlers: handlers.into_handlers(),
            ..RouteSpec::default()
        })
    }

    /// Register middleware that runs for every request under a prefix.
    pub fn mount(
        &mut self,
        prefix: &str,
        handlers: impl IntoHandlers<Req, Res>,
    ) -> Result<&mut Self> {
        self.add_route(RouteSpec {
            group: Some(prefix.to_string()),
            handlers: handlers.into_handlers(),
            ..RouteSpec::default()
        })
    }

    /// Build a sub-router and flatten it into this table under a path
    /// prefix. The sub-router's own groups and paths nest beneath it.
    pub fn group(
        &mut self,
        prefix: &str,
        build: impl FnOnce(&mut Router<Req, Res>),
    ) -> Result<&mut Self> {
        let mut sub = self.sub_router();
        build(&mut sub);
        self.merge(None, Some(prefix), sub)
    }

    /// Build a sub-router whose routes only match a given host.
    pub fn domain(
        &mut self,
        host: &str,
        build: impl FnOnce(&mut Router<Req, Res>),
    ) -> Result<&mut Self> {
        let mut sub = self.sub_router();
        build(&mut sub);
        self.merge(Some(host), None, sub)
    }

    /// Flatten a separately built router into this table as-is.
    pub fn merge_routes(&mut self, sub: Router<Req, Res>) -> Result<&mut Self> {
        self.merge(None, None, sub)
    }

    /// Flatten a separately built router into this table under a path
    /// prefix.
    pub fn merge_at(&mut self, prefix: &str, sub: Router<Req, Res>) -> Result<&mut Self> {
        self.merge(None, Some(prefix), sub)
    }

    fn sub_router(&self) -> Router<Req, Res> {
        Router::new(RouterConfig {
            case_sensitive: self.config.case_sensitive,
            host: None,
        })
    }

    /// Rewrite each of the sub-router's routes against the mount point
    /// and re-register it here. Sub-tables never nest at dispatch time.
    fn merge(
        &mut self,
        host: Option<&str>,
        prefix: Option<&str>,
        sub: Router<Req, Res>,
    ) -> Result<&mut Self> {
        for route in sub.routes {
            let mut spec = route.into_spec();

            if let Some(host) = host {
                spec.host = Some(host.to_string());
            }
            if let Some(prefix) = prefix {
                spec.path = spec.path.map(|path| join_paths(prefix, &path));
                spec.group = Some(join_paths(prefix, spec.group.as_deref().unwrap_or("")));
            }

            self.add_route(spec)?;
        }
        self.last = None;
        Ok(self)
    }

    /// Name the most recently registered route, for `generate`.
    pub fn name(&mut self, name: &str) -> Result<&mut Self> {
        let index = self.last.ok_or(RouterError::NothingToName)?;
        self.routes[index].set_name(name)?;
        Ok(self)
    }

    /// Build the URL of a named route from parameter values.
    pub fn generate(&self, name: &str, values: &Params) -> Result<String> {
        let route = self
            .routes
            .iter()
            .find(|r| r.name() == Some(name))
            .ok_or_else(|| RouterError::UnknownRoute(name.to_string()))?;
        Ok(route
            .path_matcher()
            .generate(values, GenerateOptions::default())?)
    }

    /// The registered routes, in match order.
    pub fn routes(&self) -> &[Route<Req, Res>] {
        &self.routes
    }

    /// Run one request through the table.
    pub fn dispatch(
        &self,
        head: RequestHead<'_>,
        request: &mut Req,
        response: &mut Res,
    ) -> std::result::Result<(), DispatchError>
    where
        Req: RequestBindings,
        Res: ResponseSink,
    {
        debug!(method = head.method, path = head.path, "dispatching");
        dispatch::dispatch(&self.routes, &head, request, response)
    }
}

/// Join two path fragments with a single delimiter, the way nested
/// mounts are flattened.
fn join_paths(prefix: &str, path: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    match (prefix.is_empty(), path.is_empty()) {
        (true, true) => "/".to_string(),
        (false, true) => prefix.to_string(),
        (true, false) => format!("/{}", path),
        (false, false) => format!("{}/{}", prefix, path),
    }
}
