//! Viaduct Core
//!
//! Route pattern compilation for the viaduct router.
//!
//! This crate provides:
//! - Template scanning and compilation ([`Matcher`])
//! - Parameter extraction ([`Params`], [`ParamName`])
//! - Reverse URL generation ([`Matcher::generate`])
//! - Compile-time pattern errors ([`PatternError`])
//!
//! Templates support literal segments, `:name` parameters, optional
//! segments (`:name?`), embedded regex fragments (`:id(\d+)`, `([a-z]+)`),
//! wildcards (`*`) and `\X` escapes, for both paths (`/` delimited) and
//! hosts (`.` delimited).

pub mod error;
pub mod params;
pub mod pattern;
mod template;

pub use error::{PatternError, Result};
pub use params::{ParamName, ParamSpec, Params};
pub use pattern::{Anchor, CompileOptions, GenerateOptions, Matcher};

/// Segment delimiter for path templates
pub const PATH_DELIMITER: char = '/';

/// Segment delimiter for host templates
pub const HOST_DELIMITER: char = '.';
