use serde::{Deserialize, Serialize};

use crate::matching::{BloodGroup, Donor, DonorId, PriorityLevel, RequestId, Urgency};

/// Read access to the donor roster held by the document store.
pub trait DonorDirectory: Send + Sync {
    /// Active (non-blocked) donors, restricted to `city` when given.
    fn candidates(&self, city: Option<&str>) -> Result<Vec<Donor>, DirectoryError>;
}

/// Error enumeration for directory failures.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("donor directory unavailable: {0}")]
    Unavailable(String),
}

/// Outbound hook used to ask a donor to respond to a request (SMS, push, e-mail adapters).
pub trait DonorNotifier: Send + Sync {
    fn notify(&self, notification: DonorNotification) -> Result<(), NotifyError>;
}

/// Payload handed to the notifier for one ranked donor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonorNotification {
    pub donor_id: DonorId,
    pub request_id: RequestId,
    pub blood_group: Option<BloodGroup>,
    pub urgency: Urgency,
    /// 1-based position in the ranking.
    pub rank: usize,
    pub score: u32,
    pub priority: PriorityLevel,
}

/// Notification dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}
