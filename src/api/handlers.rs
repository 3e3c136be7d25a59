// Fixed-payload endpoint handlers
// Each handler is a pure function of the data provider

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

use super::response::{json_response, not_found};
use super::types::{
    AppointmentResponse, AppointmentsResponse, HealthResponse, NotificationsResponse,
    UnreadCountResponse,
};
use crate::data::DataProvider;

pub const HEALTH_MESSAGE: &str = "SehaTech Simple Backend API is running";

/// GET /api/health
pub fn health() -> Response<Full<Bytes>> {
    json_response(
        StatusCode::OK,
        &HealthResponse {
            status: "healthy",
            message: HEALTH_MESSAGE,
            version: env!("CARGO_PKG_VERSION"),
        },
    )
}

/// GET /api/appointments
pub fn list_appointments(provider: &dyn DataProvider) -> Response<Full<Bytes>> {
    json_response(
        StatusCode::OK,
        &AppointmentsResponse {
            appointments: provider.list_appointments(),
        },
    )
}

/// GET /api/appointments/{id}
pub fn get_appointment(provider: &dyn DataProvider, id: &str) -> Response<Full<Bytes>> {
    match provider.find_appointment(id) {
        Some(appointment) => json_response(StatusCode::OK, &AppointmentResponse { appointment }),
        None => not_found("Appointment not found", Some(id)),
    }
}

/// GET /api/notifications
pub fn list_notifications(provider: &dyn DataProvider) -> Response<Full<Bytes>> {
    json_response(
        StatusCode::OK,
        &NotificationsResponse {
            notifications: provider.list_notifications(),
        },
    )
}

/// GET /api/notifications/unread-count
pub fn unread_count(provider: &dyn DataProvider) -> Response<Full<Bytes>> {
    json_response(
        StatusCode::OK,
        &UnreadCountResponse {
            unread_count: provider.unread_notification_count(),
        },
    )
}

/// GET /api/realtime/status
pub fn realtime_status(provider: &dyn DataProvider) -> Response<Full<Bytes>> {
    json_response(StatusCode::OK, &provider.realtime_status())
}
