//! `Json`, `Path` and `Query` wrappers whose rejections answer with the same
//! `{"detail": ...}` body as every other error.

use crate::utils::error::AdError;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts};

#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AdError))]
pub struct ApiJson<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AdError))]
pub struct ApiPath<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AdError))]
pub struct ApiQuery<T>(pub T);

impl From<JsonRejection> for AdError {
    fn from(rejection: JsonRejection) -> Self {
        AdError::validation("body", rejection.body_text())
    }
}

impl From<PathRejection> for AdError {
    fn from(rejection: PathRejection) -> Self {
        AdError::validation("path", rejection.body_text())
    }
}

impl From<QueryRejection> for AdError {
    fn from(rejection: QueryRejection) -> Self {
        AdError::validation("query", rejection.body_text())
    }
}
