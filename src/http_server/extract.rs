//! Request extractors

use axum::extract::FromRequest;

use crate::errors::ApiError;

/// JSON request body whose rejection renders as a 400 [`ApiError`]
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);
