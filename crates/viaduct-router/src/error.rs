//! Router error types

use thiserror::Error;
use viaduct_core::PatternError;

use crate::handler::HandlerError;

pub type Result<T> = std::result::Result<T, RouterError>;

/// Registration-time errors. A failed registration installs nothing:
/// the table is exactly as it was before the call.
#[derive(Error, Debug)]
pub enum RouterError {
    /// Malformed host or path template
    #[error(transparent)]
    Pattern(#[from] PatternError),

    /// A route needs at least one handler
    #[error("route handlers must not be empty")]
    NoHandlers,

    /// Method names must be non-empty
    #[error("route method must not be empty")]
    EmptyMethod,

    /// `generate` was called with a name no route carries
    #[error("no route named \"{0}\"")]
    UnknownRoute(String),

    /// Middleware entries cannot be named
    #[error("cannot set a name on a middleware route")]
    MiddlewareName,

    /// A route name is settable once
    #[error("route is already named \"{0}\"")]
    AlreadyNamed(String),

    /// `name` was called with no nameable route registered
    #[error("no route to name")]
    NothingToName,
}

/// Request-time dispatch failure.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// A handler error survived to the end of the routing table with no
    /// error handler consuming it. The caller decides the platform
    /// response; the engine writes no implicit 500.
    #[error("unhandled error at end of route table: {0}")]
    Unhandled(HandlerError),
}

impl DispatchError {
    /// The error value the handler chain produced.
    pub fn into_inner(self) -> HandlerError {
        match self {
            DispatchError::Unhandled(err) => err,
        }
    }
}
