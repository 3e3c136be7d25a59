// Fixture-backed data provider
// Returns the same demo records on every call

use chrono::{DateTime, TimeZone, Utc};

use super::models::{
    Appointment, AppointmentStatus, ConnectionState, Notification, NotificationKind,
    RealtimeStatus,
};
use super::DataProvider;

/// Provider serving the built-in demo records
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureProvider;

impl FixtureProvider {
    pub const fn new() -> Self {
        Self
    }
}

impl DataProvider for FixtureProvider {
    fn list_appointments(&self) -> Vec<Appointment> {
        vec![
            Appointment {
                id: "1".to_string(),
                patient_name: "أحمد محمد".to_string(),
                doctor_name: "د. سارة أحمد".to_string(),
                date_time: utc(2024, 1, 15, 10, 0),
                status: AppointmentStatus::Scheduled,
            },
            Appointment {
                id: "2".to_string(),
                patient_name: "فاطمة علي".to_string(),
                doctor_name: "د. محمد حسن".to_string(),
                date_time: utc(2024, 1, 15, 14, 0),
                status: AppointmentStatus::Completed,
            },
        ]
    }

    fn list_notifications(&self) -> Vec<Notification> {
        vec![Notification {
            id: "1".to_string(),
            title: "موعد جديد".to_string(),
            message: "لديك موعد جديد غداً في الساعة 10:00 صباحاً".to_string(),
            kind: NotificationKind::Appointment,
            read: false,
            timestamp: utc(2024, 1, 14, 15, 30),
        }]
    }

    fn realtime_status(&self) -> RealtimeStatus {
        RealtimeStatus {
            status: ConnectionState::Connected,
            last_sync: utc(2024, 1, 14, 15, 30),
            active_users: 5,
            pending_updates: 0,
        }
    }
}

/// Fixed UTC timestamp; all fixture dates are valid so the epoch fallback is never hit
fn utc(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .unwrap_or_default()
}
