//! Framework-agnostic HTTP routing
//!
//! An ordered route table with Express-style dispatch, decoupled from
//! any particular server. Platform adapters extract a [`RequestHead`]
//! from their native request and implement [`RequestBindings`] and
//! [`ResponseSink`]; everything else is handled here.
//!
//! ```
//! use viaduct_router::{Flow, RequestHead, Router};
//! use viaduct_test_utils::{TestRequest, TestResponse};
//!
//! let mut router: Router<TestRequest, TestResponse> = Router::default();
//! router
//!     .get("/user/:id", |req: &mut TestRequest, res: &mut TestResponse, _: &mut Flow| {
//!         let id = req.params.get("id").unwrap_or("?").to_string();
//!         res.end(&id);
//!     })
//!     .unwrap();
//!
//! let mut req = TestRequest::new();
//! let mut res = TestResponse::new();
//! router
//!     .dispatch(RequestHead::new("GET", "/user/7"), &mut req, &mut res)
//!     .unwrap();
//! assert_eq!(res.body(), "7");
//! ```

mod cache;
mod context;
mod dispatch;
mod error;
mod handler;
mod route;
mod router;

pub use context::{RequestBindings, RequestHead, ResponseSink};
pub use error::{DispatchError, Result, RouterError};
pub use handler::{Flow, Handler, HandlerError, IntoHandlers};
pub use route::{MatchOutcome, Route, RouteSpec};
pub use router::{Router, RouterConfig};

pub use viaduct_core::{Matcher, ParamName, Params, PatternError};
