//! Request extractors whose rejections render as [`AppError`].

use axum::extract::FromRequest;

use crate::error::AppError;

/// `axum::Json` with malformed bodies reported as 400 `{"error": ...}`
/// instead of axum's plain-text 415/422.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);
