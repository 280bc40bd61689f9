//! `Json` and `Query` wrappers whose rejections render as [`AppError`].

use axum::extract::{FromRequest, FromRequestParts};

use crate::infra::errors::AppError;

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);
