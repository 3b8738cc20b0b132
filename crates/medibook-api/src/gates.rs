//! Per-role authorization gates.
//!
//! Three middleware variants, one per role group, each reading its
//! role-specific header (`atoken` / `dtoken` / `token`, kept from the
//! existing clients rather than a single bearer scheme). On failure they
//! short-circuit with the uniform envelope and never reach the handler;
//! on success the doctor/patient gates inject the resolved identity into
//! the request extensions.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use crate::credentials::{validate_token, Claims};
use crate::response::failure;
use crate::state::AppState;

/// Identity injected by the patient gate.
#[derive(Clone, Copy, Debug)]
pub struct AuthedPatient(pub Uuid);

/// Identity injected by the doctor gate.
#[derive(Clone, Copy, Debug)]
pub struct AuthedDoctor(pub Uuid);

const NOT_AUTHORIZED: &str = "Not Authorized. Login Again";
const INVALID_TOKEN: &str = "Invalid token";

fn header_token(req: &Request, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

/// Admin gate: the decoded claim must equal the configured
/// email+password concatenation exactly.
pub async fn admin_gate(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let Some(token) = header_token(&req, "atoken") else {
        return failure(NOT_AUTHORIZED).into_response();
    };
    match validate_token(&token, &state.config.jwt_secret) {
        Ok(Claims::Sentinel(claim)) if claim == state.config.admin_claim() => next.run(req).await,
        Ok(_) => failure(INVALID_TOKEN).into_response(),
        Err(err) => failure(err.to_string()).into_response(),
    }
}

/// Doctor gate: requires an identity claim, injected as [`AuthedDoctor`].
pub async fn doctor_gate(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let Some(token) = header_token(&req, "dtoken") else {
        return failure(NOT_AUTHORIZED).into_response();
    };
    match validate_token(&token, &state.config.jwt_secret) {
        Ok(Claims::Identity { id }) => {
            req.extensions_mut().insert(AuthedDoctor(id));
            next.run(req).await
        }
        Ok(_) => failure(INVALID_TOKEN).into_response(),
        Err(err) => failure(err.to_string()).into_response(),
    }
}

/// Patient gate: requires an identity claim, injected as [`AuthedPatient`].
pub async fn patient_gate(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let Some(token) = header_token(&req, "token") else {
        return failure(NOT_AUTHORIZED).into_response();
    };
    match validate_token(&token, &state.config.jwt_secret) {
        Ok(Claims::Identity { id }) => {
            req.extensions_mut().insert(AuthedPatient(id));
            next.run(req).await
        }
        Ok(_) => failure(INVALID_TOKEN).into_response(),
        Err(err) => failure(err.to_string()).into_response(),
    }
}
