//! Patient route group, mounted at `/api/user`.
//!
//! Public: register, login. Gated behind the patient token: profile
//! read/update, booking, appointment list, cancellation, payment order
//! creation and verification.

use axum::extract::State;
use axum::middleware;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use medibook_core::booking;
use medibook_core::patient::{Address, Patient};
use medibook_core::CancelActor;

use crate::blob::public_id;
use crate::credentials::{hash_password, issue_token, verify_password, Claims};
use crate::gates::{self, AuthedPatient};
use crate::payment::OrderStatus;
use crate::response::{failure, ok};
use crate::state::AppState;
use crate::validate::{is_strong_password, is_valid_email, present};

pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/register", post(register))
        .route("/login", post(login));

    let gated = Router::new()
        .route("/profile", get(get_profile))
        .route("/update-profile", post(update_profile))
        .route("/book-appointment", post(book_appointment))
        .route("/appointments", get(list_appointments))
        .route("/cancel-appointment", post(cancel_appointment))
        .route("/payment", post(create_payment))
        .route("/verify-payment", post(verify_payment))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            gates::patient_gate,
        ));

    public.merge(gated).with_state(state)
}

#[derive(Debug, Deserialize)]
struct RegisterRequest {
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
}

async fn register(State(state): State<AppState>, Json(req): Json<RegisterRequest>) -> Json<Value> {
    let (Some(name), Some(email), Some(password)) = (
        present(&req.name),
        present(&req.email),
        present(&req.password),
    ) else {
        return failure("missing details");
    };
    if !is_valid_email(email) {
        return failure("enter a valid email address");
    }
    if !is_strong_password(password) {
        return failure("enter a strong password");
    }
    if state
        .store
        .patients
        .find_one(|p| p.email == email)
        .is_some()
    {
        return failure("User already exists");
    }

    let password_hash = match hash_password(password) {
        Ok(hash) => hash,
        Err(err) => return failure(err.to_string()),
    };
    let patient = Patient::new(name, email, password_hash);
    let claims = Claims::Identity { id: patient.id };
    state.store.patients.insert(patient);

    match issue_token(&claims, &state.config.jwt_secret) {
        Ok(token) => ok(json!({ "token": token })),
        Err(err) => failure(err.to_string()),
    }
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    email: Option<String>,
    password: Option<String>,
}

async fn login(State(state): State<AppState>, Json(req): Json<LoginRequest>) -> Json<Value> {
    let (Some(email), Some(password)) = (present(&req.email), present(&req.password)) else {
        return failure("missing details");
    };

    let Some(patient) = state.store.patients.find_one(|p| p.email == email) else {
        return failure("User does not exist");
    };
    if !verify_password(password, &patient.password_hash) {
        return failure("invalid credentials");
    }

    match issue_token(&Claims::Identity { id: patient.id }, &state.config.jwt_secret) {
        Ok(token) => ok(json!({ "token": token })),
        Err(err) => failure(err.to_string()),
    }
}

async fn get_profile(
    State(state): State<AppState>,
    Extension(AuthedPatient(patient_id)): Extension<AuthedPatient>,
) -> Json<Value> {
    match state.store.patients.find_by_id(patient_id) {
        Some(patient) => ok(json!({ "profile": patient.profile() })),
        None => failure("User does not exist"),
    }
}

#[derive(Debug, Deserialize)]
struct UpdateProfileRequest {
    name: Option<String>,
    phone: Option<String>,
    dob: Option<String>,
    gender: Option<String>,
    address: Option<Address>,
    /// New avatar as an inline `data:` image; uploaded to the blob store.
    image: Option<String>,
}

async fn update_profile(
    State(state): State<AppState>,
    Extension(AuthedPatient(patient_id)): Extension<AuthedPatient>,
    Json(req): Json<UpdateProfileRequest>,
) -> Json<Value> {
    let (Some(name), Some(phone), Some(dob), Some(gender), Some(address)) = (
        present(&req.name),
        present(&req.phone),
        present(&req.dob),
        present(&req.gender),
        req.address.clone(),
    ) else {
        return failure("Data Missing");
    };

    let Some(mut updated) = state.store.patients.update_by_id(patient_id, |p| {
        p.name = name.to_owned();
        p.phone = phone.to_owned();
        p.dob = dob.to_owned();
        p.gender = gender.to_owned();
        p.address = address;
    }) else {
        return failure("User does not exist");
    };

    if let Some(image) = present(&req.image) {
        // Drop the previous avatar only when it lives in the blob store;
        // inline placeholders have nothing to delete.
        if state.blobs.is_hosted(&updated.image) {
            if let Some(id) = public_id(&updated.image) {
                if let Err(err) = state.blobs.delete(id) {
                    return failure(err.to_string());
                }
            }
        }
        let url = match state.blobs.upload(image) {
            Ok(url) => url,
            Err(err) => return failure(err.to_string()),
        };
        match state
            .store
            .patients
            .update_by_id(patient_id, |p| p.image = url)
        {
            Some(patient) => updated = patient,
            None => return failure("User does not exist"),
        }
    }

    ok(json!({ "message": "Profile Updated", "profile": updated.profile() }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BookRequest {
    doc_id: Option<Uuid>,
    slot_date: Option<String>,
    slot_time: Option<String>,
}

async fn book_appointment(
    State(state): State<AppState>,
    Extension(AuthedPatient(patient_id)): Extension<AuthedPatient>,
    Json(req): Json<BookRequest>,
) -> Json<Value> {
    let (Some(doc_id), Some(slot_date), Some(slot_time)) = (
        req.doc_id,
        present(&req.slot_date),
        present(&req.slot_time),
    ) else {
        return failure("Data Missing");
    };

    match booking::book_appointment(&state.store, patient_id, doc_id, slot_date, slot_time) {
        Ok(_) => ok(json!({ "message": "Appointment booked" })),
        Err(err) => failure(err.to_string()),
    }
}

async fn list_appointments(
    State(state): State<AppState>,
    Extension(AuthedPatient(patient_id)): Extension<AuthedPatient>,
) -> Json<Value> {
    let appointments = booking::appointments_for_patient(&state.store, patient_id);
    ok(json!({ "appointments": appointments }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppointmentRequest {
    appointment_id: Option<Uuid>,
}

async fn cancel_appointment(
    State(state): State<AppState>,
    Extension(AuthedPatient(patient_id)): Extension<AuthedPatient>,
    Json(req): Json<AppointmentRequest>,
) -> Json<Value> {
    let Some(appointment_id) = req.appointment_id else {
        return failure("Data Missing");
    };

    match booking::cancel_appointment(&state.store, CancelActor::Patient(patient_id), appointment_id)
    {
        Ok(_) => ok(json!({ "message": "Appointment Cancelled" })),
        Err(err) => failure(err.to_string()),
    }
}

async fn create_payment(
    State(state): State<AppState>,
    Json(req): Json<AppointmentRequest>,
) -> Json<Value> {
    let Some(appointment_id) = req.appointment_id else {
        return failure("Data Missing");
    };

    let appointment = state.store.appointments.find_by_id(appointment_id);
    let Some(appointment) = appointment.filter(|a| !a.cancelled) else {
        return failure("Appointment cancelled or not found");
    };

    // The gateway counts in sub-units; a fee too large to convert is
    // not payable.
    let Some(amount) = appointment.amount.checked_mul(100) else {
        return failure("Payment Failed");
    };
    let order = state
        .payments
        .create_order(amount, &state.config.currency, &appointment.id.to_string());
    match order {
        Ok(order) => ok(json!({ "order": order })),
        Err(err) => failure(err.to_string()),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VerifyPaymentRequest {
    order_id: Option<String>,
}

async fn verify_payment(
    State(state): State<AppState>,
    Json(req): Json<VerifyPaymentRequest>,
) -> Json<Value> {
    let Some(order_id) = present(&req.order_id) else {
        return failure("Data Missing");
    };

    let order = match state.payments.fetch_order(order_id) {
        Ok(order) => order,
        Err(err) => return failure(err.to_string()),
    };
    if order.status != OrderStatus::Paid {
        return failure("Payment Failed");
    }

    let Ok(appointment_id) = order.receipt.parse::<Uuid>() else {
        return failure("Appointment not found");
    };
    match booking::confirm_payment(&state.store, appointment_id) {
        Ok(_) => ok(json!({ "message": "Payment Successful" })),
        Err(err) => failure(err.to_string()),
    }
}
