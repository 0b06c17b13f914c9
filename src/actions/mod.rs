pub mod ai;
pub mod analyze;
pub mod configs;
pub mod data;
pub mod frontend;
pub mod status;

pub use ai::*;
pub use analyze::*;
pub use configs::*;
pub use data::*;
pub use frontend::*;
pub use status::*;

use axum::{extract::rejection::JsonRejection, http::StatusCode, response::Response};

pub use crate::error::json_error;

/// Malformed or mistyped request bodies get the same 400 body as validation failures
pub(crate) fn rejection_response(rejection: JsonRejection) -> Response {
    json_error(StatusCode::BAD_REQUEST, &rejection.body_text())
}
