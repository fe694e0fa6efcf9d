//! Custom Axum extractors for request parsing and authentication.
//!
//! Provides:
//! - `LenientJson<T>`: JSON body regardless of `Content-Type` (sendBeacon posts
//!   `text/plain`).
//! - `JsonOrForm<T>`: JSON or `application/x-www-form-urlencoded`.
//! - `StripeEventBody`: verifies the `Stripe-Signature` header against the raw
//!   body, then parses the event.
//! - `QrAuth` / `AdminAuth`: optional shared-secret headers.
//!
//! All cryptographic operations are delegated to [`hatch_sdk::signature`].

use axum::{
    Form,
    extract::{FromRequest, FromRequestParts, Request},
    http::{HeaderMap, header, request::Parts},
};
use bytes::Bytes;
use chrono::Utc;
use hatch_sdk::objects::StripeEvent;
use hatch_sdk::signature::{self, SIGNATURE_HEADER, SignatureError};
use serde::de::DeserializeOwned;

use crate::api::ApiError;
use crate::state::AppState;

/// Largest body accepted by any endpoint.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Header carrying the QR generator's shared key.
pub const QR_KEY_HEADER: &str = "X-Api-Key";

/// Header carrying the plaintext admin secret for `/debug/*`.
pub const ADMIN_AUTH_HEADER: &str = "Hatch-Admin-Authorization";

async fn read_body(req: Request) -> Result<Bytes, ApiError> {
    axum::body::to_bytes(req.into_body(), MAX_BODY_BYTES)
        .await
        .map_err(|_| ApiError::BadRequest("failed to read request body".to_string()))
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

// ---------------------------------------------------------------------------
// LenientJson / JsonOrForm
// ---------------------------------------------------------------------------

/// A JSON body that ignores the `Content-Type` header.
pub struct LenientJson<T>(pub T);

impl<S, T> FromRequest<S> for LenientJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, _state: &S) -> Result<Self, Self::Rejection> {
        let body = read_body(req).await?;
        serde_json::from_slice(&body)
            .map(LenientJson)
            .map_err(|e| ApiError::BadRequest(format!("invalid JSON body: {e}")))
    }
}

/// A JSON body, or a urlencoded form when the request says so.
pub struct JsonOrForm<T>(pub T);

impl<S, T> FromRequest<S> for JsonOrForm<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = header_str(req.headers(), header::CONTENT_TYPE.as_str())
            .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

        if is_form {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
            Ok(JsonOrForm(value))
        } else {
            let LenientJson(value) = LenientJson::<T>::from_request(req, state).await?;
            Ok(JsonOrForm(value))
        }
    }
}

// ---------------------------------------------------------------------------
// StripeEventBody
// ---------------------------------------------------------------------------

/// A Stripe event whose signature has been verified.
///
/// # Header format
///
/// ```text
/// Stripe-Signature: t={unix_timestamp},v1={hex_signature}[,v1=...]
/// ```
///
/// The signature is `HMAC-SHA256("{t}.{raw_body}", webhook_secret)`.
/// Without a configured secret the endpoint answers 503, unless
/// `stripe.allow_unsigned` is set.
pub struct StripeEventBody(pub StripeEvent);

impl From<SignatureError> for ApiError {
    fn from(err: SignatureError) -> Self {
        match err {
            SignatureError::InvalidFormat => {
                ApiError::BadRequest("invalid Stripe-Signature header format".to_string())
            }
            SignatureError::NoSignatures => {
                ApiError::BadRequest("no v1 signature in Stripe-Signature header".to_string())
            }
            SignatureError::SignatureMismatch => {
                ApiError::Unauthorized("signature verification failed")
            }
            SignatureError::Expired => ApiError::Unauthorized("signature expired"),
        }
    }
}

impl FromRequest<AppState> for StripeEventBody {
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let header_value = match req.headers().get(SIGNATURE_HEADER) {
            Some(value) => Some(value.to_str().map_err(|_| {
                ApiError::BadRequest("invalid Stripe-Signature header format".to_string())
            })?),
            None => None,
        }
        .map(str::to_owned);

        let body = read_body(req).await?;

        let stripe = state.config.stripe.get();
        match (stripe.secret_bytes(), header_value) {
            (Some(secret), Some(header_value)) => {
                signature::verify_signature(
                    &body,
                    &header_value,
                    secret,
                    Utc::now().timestamp(),
                    stripe.tolerance_secs,
                )
                .inspect_err(|e| tracing::warn!(error = %e, "Rejected Stripe webhook"))?;
            }
            (Some(_), None) => {
                tracing::warn!("Stripe webhook without signature header");
                return Err(ApiError::Unauthorized("missing Stripe-Signature header"));
            }
            (None, _) if stripe.allow_unsigned => {
                tracing::warn!("Accepting unsigned Stripe webhook (allow_unsigned is set)");
            }
            (None, _) => {
                return Err(ApiError::ServiceUnavailable(
                    "Stripe webhook secret is not configured",
                ));
            }
        }
        drop(stripe);

        serde_json::from_slice(&body)
            .map(StripeEventBody)
            .map_err(|e| ApiError::BadRequest(format!("invalid Stripe event: {e}")))
    }
}

// ---------------------------------------------------------------------------
// QrAuth / AdminAuth
// ---------------------------------------------------------------------------

/// Passes when no QR key is configured, or `X-Api-Key` matches it.
pub struct QrAuth;

impl FromRequestParts<AppState> for QrAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let provided = header_str(&parts.headers, QR_KEY_HEADER);
        if state.config.access.get().qr_key_matches(provided) {
            Ok(QrAuth)
        } else {
            Err(ApiError::Unauthorized("invalid API key"))
        }
    }
}

/// Passes when no admin secret is configured, or the
/// `Hatch-Admin-Authorization` header verifies against its hash.
pub struct AdminAuth;

impl FromRequestParts<AppState> for AdminAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let access = state.config.access.get();
        if !access.admin.is_protected() {
            return Ok(AdminAuth);
        }

        let provided = header_str(&parts.headers, ADMIN_AUTH_HEADER)
            .ok_or(ApiError::Unauthorized("missing admin authorization"))?
            .to_owned();

        // argon2 verification is CPU-bound.
        let verified = tokio::task::spawn_blocking(move || access.admin.verify_secret(&provided))
            .await
            .map_err(|_| ApiError::Internal)?;

        if verified {
            Ok(AdminAuth)
        } else {
            Err(ApiError::Unauthorized("invalid admin authorization"))
        }
    }
}
