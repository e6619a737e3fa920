//! Request-lifetime middleware and extractors.
//!
//! - [`fault::fault_boundary`] -- Logs and reports every fault carried by a response.
//! - [`panic::post_mortem`] -- Turns a caught panic into a fatal fault response.
//! - [`database::require_database`] -- Resolves connection parameters for `/api/*`.
//! - [`database::DbConn`] -- Opens the per-request storage connection.
//! - [`timeout::request_timeout`] -- Turns an overrun into a timeout fault.
//! - [`method::reject_head`] -- Sends HEAD to the generic 404.

pub mod database;
pub mod fault;
pub mod method;
pub mod panic;
pub mod timeout;
