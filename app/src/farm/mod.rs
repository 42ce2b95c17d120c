//! The service layer.
//!
//! [`FarmService`] validates input, checks references, runs the deletion
//! protocol and maps storage failures onto [`FarmError`]. It is shared by all
//! request handlers behind an `Arc` and holds no mutable state.

use crate::auth::TokenIssuer;
use crate::error::{DBError, FarmError};
use crate::store::{ReportStore, Repository};
use std::sync::Arc;
use tracing::{debug, error};

mod apiary;
mod deletion;
mod hive;
mod reading;
mod report;
mod sensor;
mod user;


pub struct FarmService {
    repo: Arc<dyn Repository>,
    reports: Arc<dyn ReportStore>,
    tokens: TokenIssuer,
}

impl std::fmt::Debug for FarmService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FarmService")
            .field("tokens", &self.tokens)
            .finish()
    }
}

impl FarmService {
    pub fn new(
        repo: Arc<dyn Repository>,
        reports: Arc<dyn ReportStore>,
        tokens: TokenIssuer,
    ) -> Arc<Self> {
        Arc::new(FarmService {
            repo,
            reports,
            tokens,
        })
    }

    /// "ok" while the schema is reachable, the error text otherwise.
    pub async fn check_db(&self) -> String {
        match self.repo.ping().await {
            Ok(()) => "ok".to_owned(),
            Err(err) => {
                error!("Database check failed: {}", err);
                err.to_string()
            }
        }
    }
}

/// Re-signals the constraint errors of a write with domain messages.
fn write_error(err: DBError, duplicate: &str, bad_reference: &str) -> FarmError {
    match err {
        DBError::UniqueViolation(constraint) => {
            debug!(constraint = %constraint, "Unique constraint rejected write");
            FarmError::conflict(duplicate)
        }
        DBError::ForeignKeyViolation(constraint) => {
            debug!(constraint = %constraint, "Foreign key rejected write");
            FarmError::BadReference(bad_reference.to_owned())
        }
        err => FarmError::Internal(err),
    }
}
