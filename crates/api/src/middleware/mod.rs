//! HTTP middleware stack.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, transaction tracing)
//! 2. `TraceLayer` (request span)
//! 3. Request ID (correlate logs, Sentry events and responses)
//! 4. Response time (stamp every JSON body with the handler's duration)

pub mod request_id;
pub mod response_time;

pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use response_time::{RESPONSE_TIME_HEADER, response_time_middleware};
