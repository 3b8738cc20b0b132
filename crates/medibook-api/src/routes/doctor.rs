//! Doctor route group, mounted at `/api/doctor`.
//!
//! Public: the doctor list and login. Gated behind the doctor token:
//! appointment list, completion, cancellation, dashboard, profile read
//! and update.

use axum::extract::State;
use axum::middleware;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use medibook_core::booking;
use medibook_core::patient::Address;
use medibook_core::CancelActor;

use crate::credentials::{issue_token, verify_password, Claims};
use crate::gates::{self, AuthedDoctor};
use crate::response::{failure, ok};
use crate::state::AppState;
use crate::validate::present;

pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/list", get(list_doctors))
        .route("/login", post(login));

    let gated = Router::new()
        .route("/appointments", get(list_appointments))
        .route("/complete-appointment", post(complete_appointment))
        .route("/cancel-appointment", post(cancel_appointment))
        .route("/dashboard", get(dashboard))
        .route("/profile", get(get_profile))
        .route("/update-profile", post(update_profile))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            gates::doctor_gate,
        ));

    public.merge(gated).with_state(state)
}

/// Public listing: no email, no credentials.
async fn list_doctors(State(state): State<AppState>) -> Json<Value> {
    let doctors: Vec<_> = state
        .store
        .doctors
        .all()
        .iter()
        .map(|d| d.listing())
        .collect();
    ok(json!({ "doctors": doctors }))
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    email: Option<String>,
    password: Option<String>,
}

async fn login(State(state): State<AppState>, Json(req): Json<LoginRequest>) -> Json<Value> {
    let (Some(email), Some(password)) = (present(&req.email), present(&req.password)) else {
        return failure("Missing Data");
    };

    let Some(doctor) = state.store.doctors.find_one(|d| d.email == email) else {
        return failure("Invalid Credentials");
    };
    if !verify_password(password, &doctor.password_hash) {
        return failure("Invalid Credentials");
    }

    match issue_token(&Claims::Identity { id: doctor.id }, &state.config.jwt_secret) {
        Ok(token) => ok(json!({ "token": token })),
        Err(err) => failure(err.to_string()),
    }
}

async fn list_appointments(
    State(state): State<AppState>,
    Extension(AuthedDoctor(doctor_id)): Extension<AuthedDoctor>,
) -> Json<Value> {
    let appointments = booking::appointments_for_doctor(&state.store, doctor_id);
    ok(json!({ "appointments": appointments }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppointmentRequest {
    appointment_id: Option<Uuid>,
}

async fn complete_appointment(
    State(state): State<AppState>,
    Extension(AuthedDoctor(doctor_id)): Extension<AuthedDoctor>,
    Json(req): Json<AppointmentRequest>,
) -> Json<Value> {
    let Some(appointment_id) = req.appointment_id else {
        return failure("Missing Data");
    };

    match booking::complete_appointment(&state.store, doctor_id, appointment_id) {
        Ok(_) => ok(json!({ "message": "Appointment completed" })),
        Err(err) => failure(err.to_string()),
    }
}

async fn cancel_appointment(
    State(state): State<AppState>,
    Extension(AuthedDoctor(doctor_id)): Extension<AuthedDoctor>,
    Json(req): Json<AppointmentRequest>,
) -> Json<Value> {
    let Some(appointment_id) = req.appointment_id else {
        return failure("Missing Data");
    };

    match booking::cancel_appointment(&state.store, CancelActor::Doctor(doctor_id), appointment_id)
    {
        Ok(_) => ok(json!({ "message": "Appointment cancelled" })),
        Err(err) => failure(err.to_string()),
    }
}

async fn dashboard(
    State(state): State<AppState>,
    Extension(AuthedDoctor(doctor_id)): Extension<AuthedDoctor>,
) -> Json<Value> {
    let dashboard = booking::doctor_dashboard(&state.store, doctor_id);
    ok(json!({ "dashboard": dashboard }))
}

async fn get_profile(
    State(state): State<AppState>,
    Extension(AuthedDoctor(doctor_id)): Extension<AuthedDoctor>,
) -> Json<Value> {
    match state.store.doctors.find_by_id(doctor_id) {
        Some(doctor) => ok(json!({ "profile": doctor.profile() })),
        None => failure("Doctor does not exist"),
    }
}

#[derive(Debug, Deserialize)]
struct UpdateProfileRequest {
    fees: Option<u64>,
    address: Option<Address>,
    #[serde(default)]
    available: Option<bool>,
}

/// Partial update of the doctor-editable fields. The availability flag
/// is taken from the payload when supplied and left alone otherwise.
async fn update_profile(
    State(state): State<AppState>,
    Extension(AuthedDoctor(doctor_id)): Extension<AuthedDoctor>,
    Json(req): Json<UpdateProfileRequest>,
) -> Json<Value> {
    let (Some(fees), Some(address)) = (req.fees.filter(|f| *f > 0), req.address.clone()) else {
        return failure("Missing Data");
    };

    let updated = state.store.doctors.update_by_id(doctor_id, |d| {
        d.fees = fees;
        d.address = address;
        if let Some(available) = req.available {
            d.available = available;
        }
    });
    match updated {
        Some(doctor) => ok(json!({ "message": "Profile updated", "profile": doctor.profile() })),
        None => failure("Doctor does not exist"),
    }
}
