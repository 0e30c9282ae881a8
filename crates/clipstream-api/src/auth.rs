//! Caller identity extraction.
//!
//! clipstream trusts an upstream gateway to authenticate requests and forward
//! the caller as `X-Caller-Id` / `X-Caller-Role` headers. The extractors here
//! turn those headers into a [`CallerContext`]; token issuing and validation
//! are out of scope for this service.

use axum::{extract::FromRequestParts, http::request::Parts};
use std::str::FromStr;
use uuid::Uuid;

use clipstream_core::{AppError, CallerContext, CallerRole};

use crate::error::HttpAppError;

pub const CALLER_ID_HEADER: &str = "x-caller-id";
pub const CALLER_ROLE_HEADER: &str = "x-caller-role";

fn caller_from_parts(parts: &Parts) -> Result<Option<CallerContext>, AppError> {
    let id_header = parts.headers.get(CALLER_ID_HEADER);
    let role_header = parts.headers.get(CALLER_ROLE_HEADER);

    let (id_header, role_header) = match (id_header, role_header) {
        (None, None) => return Ok(None),
        (Some(id), Some(role)) => (id, role),
        _ => {
            return Err(AppError::Unauthorized(
                "Both X-Caller-Id and X-Caller-Role headers are required".to_string(),
            ))
        }
    };

    let caller_id = id_header
        .to_str()
        .ok()
        .and_then(|v| Uuid::parse_str(v.trim()).ok())
        .ok_or_else(|| {
            AppError::Unauthorized("X-Caller-Id must be a valid UUID".to_string())
        })?;

    let role = role_header
        .to_str()
        .ok()
        .and_then(|v| CallerRole::from_str(v.trim()).ok())
        .ok_or_else(|| {
            AppError::Unauthorized(
                "X-Caller-Role must be one of: user, creator, admin".to_string(),
            )
        })?;

    Ok(Some(CallerContext::new(caller_id, role)))
}

/// Required caller identity; rejects with 401 when the gateway headers are
/// missing or malformed.
#[derive(Debug, Clone, Copy)]
pub struct Caller(pub CallerContext);

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = HttpAppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match caller_from_parts(parts)? {
            Some(ctx) => Ok(Caller(ctx)),
            None => Err(HttpAppError(AppError::Unauthorized(
                "Missing caller identity headers".to_string(),
            ))),
        }
    }
}

/// Optional caller identity for public routes whose results vary by caller
/// (e.g. owner listings include hidden videos). Malformed headers still fail
/// with 401 rather than silently downgrading to anonymous.
#[derive(Debug, Clone, Copy)]
pub struct MaybeCaller(pub Option<CallerContext>);

impl<S> FromRequestParts<S> for MaybeCaller
where
    S: Send + Sync,
{
    type Rejection = HttpAppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeCaller(caller_from_parts(parts)?))
    }
}
