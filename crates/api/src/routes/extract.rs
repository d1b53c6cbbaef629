//! Request extractors shared by the handlers.

use axum::extract::FromRequest;

use crate::error::AppError;

/// `axum::Json` whose rejections render as validation errors.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);
