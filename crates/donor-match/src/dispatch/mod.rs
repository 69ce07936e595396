//! Request dispatch around the matching engine: fetch candidates from the
//! donor directory, rank them, and notify the best matches.

pub mod directory;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use directory::{DirectoryError, DonorDirectory, DonorNotification, DonorNotifier, NotifyError};
pub use router::matching_router;
pub use service::{DispatchError, DispatchReport, DispatchService, ExcludedDonor, MatchPayload};
