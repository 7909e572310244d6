//! Command handlers.
//!
//! Handlers log their own failures, so `main` only maps the returned error
//! to an exit code.

pub mod clean;
pub mod run;

use alchemist_formula::AlchemyError;

/// Log `err` as a failed step of the invocation and hand it back.
pub(crate) fn report(err: AlchemyError) -> AlchemyError {
    tracing::error!("{err}");
    err
}
