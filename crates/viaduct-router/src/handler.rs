//! Handler chain types and the continuation signal

use std::fmt;
use std::sync::Arc;

/// Opaque error value raised by a handler.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

type NormalFn<Req, Res> = dyn Fn(&mut Req, &mut Res, &mut Flow) + Send + Sync;
type ErrorFn<Req, Res> = dyn Fn(&HandlerError, &mut Req, &mut Res, &mut Flow) + Send + Sync;

/// One entry in a route's handler chain.
///
/// Whether an entry handles requests or errors is declared at
/// registration time; the dispatch engine never inspects the function
/// itself.
pub enum Handler<Req, Res> {
    /// Runs when the chain reaches it with no error pending
    Normal(Arc<NormalFn<Req, Res>>),
    /// Runs only while an error is pending, receiving it by reference
    Error(Arc<ErrorFn<Req, Res>>),
}

impl<Req, Res> Handler<Req, Res> {
    /// Wrap a request handler.
    pub fn new(f: impl Fn(&mut Req, &mut Res, &mut Flow) + Send + Sync + 'static) -> Self {
        Handler::Normal(Arc::new(f))
    }

    /// Wrap an error handler.
    pub fn error(
        f: impl Fn(&HandlerError, &mut Req, &mut Res, &mut Flow) + Send + Sync + 'static,
    ) -> Self {
        Handler::Error(Arc::new(f))
    }

    pub fn is_error_handler(&self) -> bool {
        matches!(self, Handler::Error(_))
    }
}

impl<Req, Res> Clone for Handler<Req, Res> {
    fn clone(&self) -> Self {
        match self {
            Handler::Normal(f) => Handler::Normal(Arc::clone(f)),
            Handler::Error(f) => Handler::Error(Arc::clone(f)),
        }
    }
}

impl<Req, Res> fmt::Debug for Handler<Req, Res> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handler::Normal(_) => f.write_str("Handler::Normal"),
            Handler::Error(_) => f.write_str("Handler::Error"),
        }
    }
}

/// Continuation signal recorded by a handler.
pub(crate) enum Signal {
    Next,
    Skip,
    Fail(HandlerError),
}

impl fmt::Debug for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Next => f.write_str("Next"),
            Signal::Skip => f.write_str("Skip"),
            Signal::Fail(err) => write!(f, "Fail({})", err),
        }
    }
}

/// The continuation handed to each handler invocation.
///
/// A handler signals at most once; the first signal wins and later
/// calls on the same `Flow` are ignored. Returning without signaling
/// ends the dispatch: the handler has answered the request.
#[derive(Debug, Default)]
pub struct Flow {
    signal: Option<Signal>,
}

impl Flow {
    pub(crate) fn new() -> Self {
        Self { signal: None }
    }

    /// Continue with the next handler in the chain.
    pub fn next(&mut self) {
        self.set(Signal::Next);
    }

    /// Abandon the rest of this route's chain and resume the table walk
    /// at the next matching route, with no error pending.
    pub fn skip(&mut self) {
        self.set(Signal::Skip);
    }

    /// Raise an error: normal handlers are bypassed until an error
    /// handler consumes it.
    pub fn fail(&mut self, err: impl Into<HandlerError>) {
        self.set(Signal::Fail(err.into()));
    }

    fn set(&mut self, signal: Signal) {
        if self.signal.is_none() {
            self.signal = Some(signal);
        }
    }

    pub(crate) fn take(&mut self) -> Option<Signal> {
        self.signal.take()
    }
}

/// Conversion into a handler chain: a bare closure becomes a single
/// request handler, and a `Vec` may mix request and error handlers.
pub trait IntoHandlers<Req, Res> {
    fn into_handlers(self) -> Vec<Handler<Req, Res>>;
}

impl<Req, Res, F> IntoHandlers<Req, Res> for F
where
    F: Fn(&mut Req, &mut Res, &mut Flow) + Send + Sync + 'static,
{
    fn into_handlers(self) -> Vec<Handler<Req, Res>> {
        vec![Handler::new(self)]
    }
}

impl<Req, Res> IntoHandlers<Req, Res> for Handler<Req, Res> {
    fn into_handlers(self) -> Vec<Handler<Req, Res>> {
        vec![self]
    }
}

impl<Req, Res> IntoHandlers<Req, Res> for Vec<Handler<Req, Res>> {
    fn into_handlers(self) -> Vec<Handler<Req, Res>> {
        self
    }
}
