//! The dispatch engine
//!
//! One request walks the routing table in registration order. Each
//! matching route binds its extractions onto the request, then its
//! handler chain runs as a continuation pipeline. The table cursor,
//! chain cursor, and pending error all live on this call's stack, so
//! concurrent dispatches over one router share nothing.

use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, trace, warn};

use crate::context::{RequestBindings, RequestHead, ResponseSink};
use crate::error::DispatchError;
use crate::handler::{Flow, Handler, HandlerError, Signal};
use crate::route::Route;

/// How a handler chain ended.
enum ChainExit {
    /// Chain exhausted or skipped; the table walk continues
    Continue,
    /// A handler returned without signaling: the request is answered
    Done,
}

pub(crate) fn dispatch<Req, Res>(
    routes: &[Route<Req, Res>],
    head: &RequestHead<'_>,
    request: &mut Req,
    response: &mut Res,
) -> Result<(), DispatchError>
where
    Req: RequestBindings,
    Res: ResponseSink,
{
    let mut pending: Option<HandlerError> = None;

    for (index, route) in routes.iter().enumerate() {
        let Some(outcome) = route.matches(head) else {
            continue;
        };
        trace!(route = index, path = head.path, "route matched");

        // Rebind on every match, so each chain sees its own route's
        // extractions even while an error is being carried forward
        request.bind_params(outcome.params);
        request.bind_subdomains(outcome.subdomains);

        match run_chain(route.handlers(), &mut pending, request, response) {
            ChainExit::Continue => {}
            ChainExit::Done => return Ok(()),
        }
    }

    if let Some(err) = pending {
        debug!(method = head.method, path = head.path, error = %err, "error left unhandled");
        return Err(DispatchError::Unhandled(err));
    }

    // Not-found fallback, only when the platform can confirm nothing
    // has been written yet
    if response.sent() == Some(false) {
        debug!(method = head.method, path = head.path, "no route answered");
        response.write(404, &format!("Cannot {} {}", head.method, head.path));
    }

    Ok(())
}

fn run_chain<Req, Res>(
    handlers: &[Handler<Req, Res>],
    pending: &mut Option<HandlerError>,
    request: &mut Req,
    response: &mut Res,
) -> ChainExit {
    for handler in handlers {
        let mut flow = Flow::new();

        let invoked = match (&*pending, handler) {
            (None, Handler::Normal(f)) => Some(panic::catch_unwind(AssertUnwindSafe(|| {
                f(request, response, &mut flow)
            }))),
            (Some(err), Handler::Error(f)) => Some(panic::catch_unwind(AssertUnwindSafe(|| {
                f(err, request, response, &mut flow)
            }))),
            // Error handlers sit out clean traffic; normal handlers
            // sit out while an error is pending
            _ => None,
        };

        let Some(result) = invoked else {
            continue;
        };

        if let Err(payload) = result {
            warn!("handler panicked, carrying the payload as a dispatch error");
            *pending = Some(panic_message(payload));
            continue;
        }

        match flow.take() {
            None => return ChainExit::Done,
            Some(Signal::Next) => *pending = None,
            Some(Signal::Skip) => {
                *pending = None;
                return ChainExit::Continue;
            }
            Some(Signal::Fail(err)) => *pending = Some(err),
        }
    }

    ChainExit::Continue
}

/// Turn a panic payload into a handler error, keeping the message when
/// the payload carries one.
fn panic_message(payload: Box<dyn std::any::Any + Send>) -> HandlerError {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).into()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone().into()
    } else {
        "handler panicked".into()
    }
}
