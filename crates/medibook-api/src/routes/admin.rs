//! Admin route group, mounted at `/api/admin`.
//!
//! Public: login against the configured credential pair. Gated behind
//! the admin token: doctor creation, listings, appointment oversight,
//! availability toggling and the dashboard.

use axum::extract::State;
use axum::middleware;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use medibook_core::booking;
use medibook_core::doctor::{Doctor, NewDoctor};
use medibook_core::patient::Address;
use medibook_core::CancelActor;

use crate::credentials::{hash_password, issue_token, Claims};
use crate::gates;
use crate::response::{failure, ok};
use crate::state::AppState;
use crate::validate::{is_strong_password, is_valid_email, present};

pub fn router(state: AppState) -> Router {
    let public = Router::new().route("/login", post(login));

    let gated = Router::new()
        .route("/add-doctor", post(add_doctor))
        .route("/all-doctors", get(all_doctors))
        .route("/appointments", get(list_appointments))
        .route("/cancel-appointment", post(cancel_appointment))
        .route("/change-availability", post(change_availability))
        .route("/dashboard", get(dashboard))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            gates::admin_gate,
        ));

    public.merge(gated).with_state(state)
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    email: Option<String>,
    password: Option<String>,
}

/// Admin login is an equality check against the configured pair; the
/// issued token signs the concatenation itself, not an identity.
async fn login(State(state): State<AppState>, Json(req): Json<LoginRequest>) -> Json<Value> {
    let (Some(email), Some(password)) = (present(&req.email), present(&req.password)) else {
        return failure("Invalid credentials");
    };
    if email != state.config.admin_email || password != state.config.admin_password {
        return failure("Invalid credentials");
    }

    let claims = Claims::Sentinel(state.config.admin_claim());
    match issue_token(&claims, &state.config.jwt_secret) {
        Ok(token) => ok(json!({ "token": token })),
        Err(err) => failure(err.to_string()),
    }
}

#[derive(Debug, Deserialize)]
struct AddDoctorRequest {
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
    speciality: Option<String>,
    degree: Option<String>,
    experience: Option<String>,
    about: Option<String>,
    fees: Option<u64>,
    address: Option<Address>,
    /// Inline `data:` image, uploaded to the blob store before insert.
    image: Option<String>,
}

async fn add_doctor(State(state): State<AppState>, Json(req): Json<AddDoctorRequest>) -> Json<Value> {
    let (
        Some(name),
        Some(email),
        Some(password),
        Some(speciality),
        Some(degree),
        Some(experience),
        Some(about),
        Some(fees),
        Some(address),
    ) = (
        present(&req.name),
        present(&req.email),
        present(&req.password),
        present(&req.speciality),
        present(&req.degree),
        present(&req.experience),
        present(&req.about),
        req.fees.filter(|f| *f > 0),
        req.address.clone(),
    )
    else {
        return failure("Missing Details");
    };
    let Some(image) = present(&req.image) else {
        return failure("Image is required");
    };
    if !is_valid_email(email) {
        return failure("Please enter a valid email");
    }
    if !is_strong_password(password) {
        return failure("Please enter a strong password");
    }
    if state.store.doctors.find_one(|d| d.email == email).is_some() {
        return failure("Doctor already exists");
    }

    let password_hash = match hash_password(password) {
        Ok(hash) => hash,
        Err(err) => return failure(err.to_string()),
    };
    let hosted_image = match state.blobs.upload(image) {
        Ok(url) => url,
        Err(err) => return failure(err.to_string()),
    };

    state.store.doctors.insert(Doctor::new(NewDoctor {
        name: name.to_owned(),
        email: email.to_owned(),
        password_hash,
        image: hosted_image,
        speciality: speciality.to_owned(),
        degree: degree.to_owned(),
        experience: experience.to_owned(),
        about: about.to_owned(),
        fees,
        address,
    }));

    ok(json!({ "message": "Doctor Added" }))
}

/// Admin listing: credentials stripped, email kept.
async fn all_doctors(State(state): State<AppState>) -> Json<Value> {
    let doctors: Vec<_> = state
        .store
        .doctors
        .all()
        .iter()
        .map(|d| d.profile())
        .collect();
    ok(json!({ "doctors": doctors }))
}

async fn list_appointments(State(state): State<AppState>) -> Json<Value> {
    ok(json!({ "appointments": state.store.appointments.all() }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppointmentRequest {
    appointment_id: Option<Uuid>,
}

async fn cancel_appointment(
    State(state): State<AppState>,
    Json(req): Json<AppointmentRequest>,
) -> Json<Value> {
    let Some(appointment_id) = req.appointment_id else {
        return failure("Data Missing");
    };

    match booking::cancel_appointment(&state.store, CancelActor::Admin, appointment_id) {
        Ok(_) => ok(json!({ "message": "Appointment Cancelled" })),
        Err(err) => failure(err.to_string()),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChangeAvailabilityRequest {
    doc_id: Option<Uuid>,
}

/// Flip the doctor's availability flag unconditionally.
async fn change_availability(
    State(state): State<AppState>,
    Json(req): Json<ChangeAvailabilityRequest>,
) -> Json<Value> {
    let Some(doc_id) = req.doc_id else {
        return failure("ID required");
    };

    match state
        .store
        .doctors
        .update_by_id(doc_id, |d| d.available = !d.available)
    {
        Some(_) => ok(json!({ "message": "Availability changed" })),
        None => failure("Doctor does not exist"),
    }
}

async fn dashboard(State(state): State<AppState>) -> Json<Value> {
    ok(json!({ "dashboard": booking::admin_dashboard(&state.store) }))
}
