// API module entry
// Read-only JSON endpoints under /api

mod handlers;
mod response;
mod types;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

use crate::data::DataProvider;

/// Endpoints listed in the startup banner
pub const ENDPOINTS: &[&str] = &[
    "/api/health",
    "/api/appointments",
    "/api/appointments/{id}",
    "/api/notifications",
    "/api/notifications/unread-count",
    "/api/realtime/status",
];

/// API route table
///
/// Returns `None` for paths that are not API endpoints so the caller can fall
/// through to the asset resolver. Method checks happen before dispatch.
pub fn dispatch(path: &str, provider: &dyn DataProvider) -> Option<Response<Full<Bytes>>> {
    let path = path.strip_suffix('/').filter(|p| !p.is_empty()).unwrap_or(path);

    let response = match path {
        "/api/health" => handlers::health(),
        "/api/appointments" => handlers::list_appointments(provider),
        "/api/notifications" => handlers::list_notifications(provider),
        "/api/notifications/unread-count" => handlers::unread_count(provider),
        "/api/realtime/status" => handlers::realtime_status(provider),
        _ => {
            let id = path
                .strip_prefix("/api/appointments/")
                .filter(|id| !id.is_empty() && !id.contains('/'))?;
            handlers::get_appointment(provider, id)
        }
    };

    Some(response)
}
