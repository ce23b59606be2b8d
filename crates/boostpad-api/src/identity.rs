//! Identity resolution
//!
//! Authentication lives outside this service: an upstream gateway or
//! identity service hands us a bearer token, and an [`IdentityProvider`]
//! turns it into a user id. The default provider accepts tokens that are
//! themselves user UUIDs, which is how the service runs behind a gateway
//! that has already verified the session.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Errors from identity resolution
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Invalid or expired token")]
    InvalidToken,
}

/// Resolves a bearer token to a user id
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn resolve(&self, token: &str) -> Result<Uuid, IdentityError>;
}

/// Shared identity provider handle
pub type SharedIdentityProvider = Arc<dyn IdentityProvider>;

/// Accepts tokens that are user UUIDs, for deployments where the gateway
/// terminates authentication and forwards the verified subject.
pub struct GatewayIdentity;

#[async_trait]
impl IdentityProvider for GatewayIdentity {
    async fn resolve(&self, token: &str) -> Result<Uuid, IdentityError> {
        token.trim().parse::<Uuid>().map_err(|_| IdentityError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn gateway_identity_parses_uuid_tokens() {
        let id = Uuid::new_v4();
        let resolved = GatewayIdentity.resolve(&id.to_string()).await.unwrap();
        assert_eq!(resolved, id);
    }

    #[tokio::test]
    async fn gateway_identity_rejects_garbage() {
        assert!(GatewayIdentity.resolve("not-a-uuid").await.is_err());
        assert!(GatewayIdentity.resolve("").await.is_err());
    }
}
