//! Data access layer
//!
//! Handlers only talk to a [`DataProvider`]; the bundled [`FixtureProvider`]
//! returns the demo records, and a persistent store can be slotted in later
//! without touching routing.

mod fixtures;
mod models;

pub use fixtures::FixtureProvider;
pub use models::{Appointment, Notification, RealtimeStatus};

/// Read-only source of the records served under `/api`
pub trait DataProvider: Send + Sync {
    fn list_appointments(&self) -> Vec<Appointment>;

    fn list_notifications(&self) -> Vec<Notification>;

    fn realtime_status(&self) -> RealtimeStatus;

    fn find_appointment(&self, id: &str) -> Option<Appointment> {
        self.list_appointments().into_iter().find(|a| a.id == id)
    }

    fn unread_notification_count(&self) -> usize {
        self.list_notifications().iter().filter(|n| !n.read).count()
    }
}
