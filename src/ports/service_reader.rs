//! Service reader port.
//!
//! Services are owned by the surrounding application; this crate only reads
//! them to drive schedule generation and fee allocation.

use crate::domain::foundation::{DomainError, ServiceId};
use crate::domain::service::ServiceDefinition;
use async_trait::async_trait;

/// Read access to contracted services.
#[async_trait]
pub trait ServiceReader: Send + Sync {
    /// Find a service by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &ServiceId) -> Result<Option<ServiceDefinition>, DomainError>;
}
