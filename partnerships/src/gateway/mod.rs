//! Partnership gateway
//!
//! The engine reaches the remote partnership service only through the
//! [`PartnerGateway`] trait, so transport and encoding stay outside the core.

pub mod traits;
pub mod types;

pub use traits::PartnerGateway;
pub use types::{LocalUser, PartnerDepartment, PartnerUser, PartnershipSummary, RemoteEdge};

#[cfg(test)]
pub use traits::MockPartnerGateway;

/// Error reported by a gateway call
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    /// The remote side answered and refused the operation
    #[error("Request rejected{}: {message}", format_status(.status))]
    Rejected { status: Option<u16>, message: String },

    /// The remote side could not be reached
    #[error("Gateway unavailable: {0}")]
    Unavailable(String),
}

fn format_status(status: &Option<u16>) -> String {
    status.map(|s| format!(" ({})", s)).unwrap_or_default()
}

impl GatewayError {
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status: Some(status),
            message: message.into(),
        }
    }

    /// HTTP-like status code, when the remote side provided one
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => *status,
            Self::Unavailable(_) => None,
        }
    }
}
