//! Extractors whose rejections render as [`JsonApiError`].
use axum::extract::{Multipart, Path, Query};
use axum::Json;
use axum_extra::extract::WithRejection;

use crate::errors::JsonApiError;

pub type ApiJson<T> = WithRejection<Json<T>, JsonApiError>;
pub type ApiPath<T> = WithRejection<Path<T>, JsonApiError>;
pub type ApiQuery<T> = WithRejection<Query<T>, JsonApiError>;
pub type ApiMultipart = WithRejection<Multipart, JsonApiError>;
