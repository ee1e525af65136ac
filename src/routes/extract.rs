//! Extractors whose rejections render as `AppError` JSON bodies

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

/// `Json` body extractor answering bad input with 400 `{"error": ...}`
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// `Query` extractor answering bad input with 400 `{"error": ...}`
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);
