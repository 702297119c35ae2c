//! Request extractors whose rejections render as [`AppError`] envelopes.
//!
//! The gateway in front of this service verifies the session and passes the
//! user's id in the `x-user-id` header. Routes that take [`AuthUser`] reject
//! requests without a valid id before the handler runs; routes that take
//! `Option<AuthUser>` accept anonymous callers.
//!
//! [`JsonBody`] replaces axum's `Json` for request bodies so that an absent
//! body reaches the handler as empty input instead of a 415.

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, OptionalFromRequestParts, Request},
    http::{StatusCode, request::Parts},
};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::errors::AppError;

pub const USER_ID_HEADER: &str = "x-user-id";

/// The authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub id: Uuid,
}

fn user_id_from_parts(parts: &Parts) -> Option<Result<Uuid, AppError>> {
    let value = parts.headers.get(USER_ID_HEADER)?;
    Some(
        value
            .to_str()
            .ok()
            .and_then(|raw| Uuid::parse_str(raw.trim()).ok())
            .ok_or_else(|| AppError::unauthorized("Invalid user identity")),
    )
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match user_id_from_parts(parts) {
            Some(id) => Ok(AuthUser { id: id? }),
            None => Err(AppError::unauthorized("Authentication required")),
        }
    }
}

impl<S> OptionalFromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        user_id_from_parts(parts)
            .transpose()
            .map(|id| id.map(|id| AuthUser { id }))
    }
}

/// A JSON request body.
///
/// An empty, whitespace-only or `null` body yields `T::default()`; the
/// handler's own validation then reports what is missing. The content type
/// is not checked. Malformed JSON and type mismatches are 400s.
#[derive(Debug, Clone, Default)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default + Send,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| AppError::new(rejection.status(), rejection.body_text()))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(JsonBody(T::default()));
        }

        let value: serde_json::Value = serde_json::from_slice(&bytes).map_err(|err| {
            AppError::new(StatusCode::BAD_REQUEST, format!("Malformed JSON body: {}", err))
        })?;
        if value.is_null() {
            return Ok(JsonBody(T::default()));
        }

        serde_json::from_value(value).map(JsonBody).map_err(|err| {
            AppError::new(StatusCode::BAD_REQUEST, format!("Invalid request body: {}", err))
        })
    }
}
