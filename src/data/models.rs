//! Record types exposed by the JSON endpoints
//!
//! Field names on the wire follow what the frontend consumes: camelCase for
//! appointments, snake_case for the realtime status.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Appointment lifecycle status
// Full wire vocabulary; the fixtures only use some of it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[allow(dead_code)]
pub enum AppointmentStatus {
    Scheduled,
    Waiting,
    Completed,
    #[serde(rename = "Follow-up")]
    FollowUp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: String,
    pub patient_name: String,
    pub doctor_name: String,
    pub date_time: DateTime<Utc>,
    pub status: AppointmentStatus,
}

/// Notification category tag
///
/// Known tags serialize in snake case; anything else a provider emits, such
/// as `appointment_created`, passes through `Other` verbatim.
// Full wire vocabulary; the fixtures only use some of it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
#[allow(dead_code)]
pub enum NotificationKind {
    Appointment,
    AppointmentReminder,
    AppointmentUpdate,
    SystemAlert,
    PatientUpdate,
    PaymentReceived,
    #[serde(untagged)]
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub read: bool,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
#[allow(dead_code)]
pub enum ConnectionState {
    Connected,
    Disconnected,
}

/// Snapshot of the realtime sync channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RealtimeStatus {
    pub status: ConnectionState,
    pub last_sync: DateTime<Utc>,
    pub active_users: u32,
    pub pending_updates: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_appointment_wire_names() {
        let appointment = Appointment {
            id: "7".to_string(),
            patient_name: "P".to_string(),
            doctor_name: "D".to_string(),
            date_time: Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap(),
            status: AppointmentStatus::FollowUp,
        };
        let value = serde_json::to_value(&appointment).unwrap();
        assert_eq!(value["patientName"], "P");
        assert_eq!(value["doctorName"], "D");
        assert_eq!(value["dateTime"], "2024-01-15T10:00:00Z");
        assert_eq!(value["status"], "Follow-up");
    }

    #[test]
    fn test_notification_type_tag() {
        let notification = Notification {
            id: "1".to_string(),
            title: "t".to_string(),
            message: "m".to_string(),
            kind: NotificationKind::PaymentReceived,
            read: true,
            timestamp: Utc.with_ymd_and_hms(2024, 1, 14, 15, 30, 0).unwrap(),
        };
        let value = serde_json::to_value(&notification).unwrap();
        assert_eq!(value["type"], "payment_received");
        assert_eq!(value["read"], true);
        assert!(value.get("kind").is_none());
    }

    #[test]
    fn test_unlisted_notification_tag_passes_through() {
        let kind = NotificationKind::Other("appointment_created".to_string());
        assert_eq!(
            serde_json::to_value(&kind).unwrap(),
            serde_json::json!("appointment_created")
        );
        assert_eq!(
            serde_json::to_value(NotificationKind::SystemAlert).unwrap(),
            serde_json::json!("system_alert")
        );
        assert_eq!(
            serde_json::to_value(ConnectionState::Disconnected).unwrap(),
            serde_json::json!("disconnected")
        );
    }
}
