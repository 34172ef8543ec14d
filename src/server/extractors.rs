//! Wrappers around axum's extractors that reject with [`ApiError`] JSON bodies
//! instead of axum's plain-text rejections.

use axum::extract::{FromRequest, FromRequestParts};

use super::routes::ApiError;

#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct AppJson<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct AppPath<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct AppQuery<T>(pub T);
