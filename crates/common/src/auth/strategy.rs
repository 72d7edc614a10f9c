//! Closed set of supported credential strategies.

use super::authorization_code::AuthorizationCodeFlow;
use super::client_credentials::ClientCredentialsFlow;
use super::error::AuthResult;
use super::request::{TokenPlan, TokenRequest};
use super::traits::GrantFlow;
use super::types::{GrantType, TokenState};

/// The grant a session authenticates with.
///
/// Dispatches [`GrantFlow`] to the concrete flow; new grants are added as
/// variants here rather than through open extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialStrategy {
    ClientCredentials(ClientCredentialsFlow),
    AuthorizationCode(AuthorizationCodeFlow),
}

impl CredentialStrategy {
    /// The authorization-code flow, if that is the configured grant.
    #[must_use]
    pub const fn as_authorization_code(&self) -> Option<&AuthorizationCodeFlow> {
        match self {
            Self::AuthorizationCode(flow) => Some(flow),
            Self::ClientCredentials(_) => None,
        }
    }

    fn flow(&self) -> &dyn GrantFlow {
        match self {
            Self::ClientCredentials(flow) => flow,
            Self::AuthorizationCode(flow) => flow,
        }
    }
}

impl GrantFlow for CredentialStrategy {
    fn grant_type(&self) -> GrantType {
        self.flow().grant_type()
    }

    fn plan_token(&self, current: Option<&TokenState>) -> AuthResult<TokenPlan> {
        self.flow().plan_token(current)
    }

    fn plan_refresh(&self, current: Option<&TokenState>) -> AuthResult<TokenRequest> {
        self.flow().plan_refresh(current)
    }
}

impl From<ClientCredentialsFlow> for CredentialStrategy {
    fn from(flow: ClientCredentialsFlow) -> Self {
        Self::ClientCredentials(flow)
    }
}

impl From<AuthorizationCodeFlow> for CredentialStrategy {
    fn from(flow: AuthorizationCodeFlow) -> Self {
        Self::AuthorizationCode(flow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatches_to_variant() {
        let cc: CredentialStrategy = ClientCredentialsFlow::new("a", "b").into();
        let ac: CredentialStrategy = AuthorizationCodeFlow::new("a", "b", "https://cb").into();

        assert_eq!(cc.grant_type(), GrantType::ClientCredentials);
        assert_eq!(ac.grant_type(), GrantType::AuthorizationCode);
        assert!(cc.as_authorization_code().is_none());
        assert!(ac.as_authorization_code().is_some());
        assert!(ac.plan_token(None).is_err());
        assert!(cc.plan_token(None).is_ok());
    }
}
