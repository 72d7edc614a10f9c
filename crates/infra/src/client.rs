//! Basalam client
//!
//! One credential strategy, one token session and one dispatcher per
//! service, all sharing the same transport and cached token.
//!
//! ```no_run
//! use basalam_common::auth::{ClientCredentialsFlow, Scope};
//! use basalam_domain::BasalamConfig;
//! use basalam_infra::BasalamClient;
//!
//! # async fn example() -> basalam_infra::api::ApiResult<()> {
//! let flow = ClientCredentialsFlow::new("client-id", "client-secret")
//!     .with_scopes([Scope::CUSTOMER_WALLET_READ]);
//! let client = BasalamClient::new(flow, BasalamConfig::default())?;
//!
//! let me = client.core().get_current_user().await?;
//! let history = client.wallet().get_history(me.id, 1, 50, None).await?;
//! # let _ = history;
//! # Ok(())
//! # }
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use basalam_common::auth::{
    AuthError, AuthSession, BlockingAuthSession, BlockingHttpTokenEndpoint, CredentialStrategy,
    HttpTokenEndpoint, TokenState,
};
use basalam_domain::{BasalamConfig, Service};
use tracing::info;

use crate::api::{
    AccessTokenProvider, ApiClient, ApiClientConfig, ApiError, ApiResult,
    BlockingAccessTokenProvider, BlockingApiClient,
};
use crate::services::{
    BlockingChatService, BlockingCoreService, BlockingWalletService, BlockingWebhookService,
    ChatService, CoreService, WalletService, WebhookService,
};

fn dispatcher_config(config: &BasalamConfig, service: Service) -> ApiClientConfig {
    ApiClientConfig {
        base_url: config.service_url(service),
        timeout: config.timeout(),
        user_agent: config.user_agent.clone(),
    }
}

fn token_client_error(err: AuthError) -> ApiError {
    ApiError::Config(err.to_string())
}

/// Async Basalam client
#[derive(Debug, Clone)]
pub struct BasalamClient {
    config: BasalamConfig,
    session: AuthSession,
    core: CoreService,
    wallet: WalletService,
    webhook: WebhookService,
    chat: ChatService,
}

impl BasalamClient {
    /// Build a client; no network call is made until the first request.
    ///
    /// # Errors
    /// `ApiError::Config` when `config` fails validation or the transport
    /// cannot be built.
    pub fn new(strategy: impl Into<CredentialStrategy>, config: BasalamConfig) -> ApiResult<Self> {
        config.validate()?;
        let endpoint = HttpTokenEndpoint::new(config.token_url.clone(), config.timeout())
            .map_err(token_client_error)?;
        let session = AuthSession::new(strategy, Arc::new(endpoint))
            .with_authorize_url(config.authorize_url.clone());
        Self::with_session(session, config)
    }

    /// Build a client around an existing session, e.g. one restored from a
    /// persisted token.
    ///
    /// # Errors
    /// Same as [`Self::new`].
    pub fn with_session(session: AuthSession, config: BasalamConfig) -> ApiResult<Self> {
        config.validate()?;
        let auth: Arc<dyn AccessTokenProvider> = Arc::new(session.clone());
        let core = ApiClient::new(dispatcher_config(&config, Service::Core), auth)?;

        info!(environment = %config.environment, "Basalam client ready");
        Ok(Self {
            wallet: WalletService::new(core.for_base_url(config.service_url(Service::Wallet))?),
            webhook: WebhookService::new(core.for_base_url(config.service_url(Service::Webhook))?),
            chat: ChatService::new(core.for_base_url(config.service_url(Service::Chat))?),
            core: CoreService::new(core),
            session,
            config,
        })
    }

    pub const fn core(&self) -> &CoreService {
        &self.core
    }

    pub const fn wallet(&self) -> &WalletService {
        &self.wallet
    }

    pub const fn webhook(&self) -> &WebhookService {
        &self.webhook
    }

    pub const fn chat(&self) -> &ChatService {
        &self.chat
    }

    pub const fn session(&self) -> &AuthSession {
        &self.session
    }

    pub const fn config(&self) -> &BasalamConfig {
        &self.config
    }

    /// Whether the cached token grants `scope`.
    pub fn has_scope(&self, scope: impl AsRef<str>) -> bool {
        self.session.has_scope(scope)
    }

    pub fn granted_scopes(&self) -> HashSet<String> {
        self.session.granted_scopes()
    }

    /// Renew the token now instead of waiting for it to fall due.
    ///
    /// # Errors
    /// `ApiError::Auth` when the token endpoint refuses.
    pub async fn refresh_auth_token(&self) -> ApiResult<TokenState> {
        Ok(self.session.force_refresh().await?)
    }
}

/// Blocking Basalam client
///
/// Must not be used from inside an async runtime.
#[derive(Debug, Clone)]
pub struct BlockingBasalamClient {
    config: BasalamConfig,
    session: BlockingAuthSession,
    core: BlockingCoreService,
    wallet: BlockingWalletService,
    webhook: BlockingWebhookService,
    chat: BlockingChatService,
}

impl BlockingBasalamClient {
    /// # Errors
    /// See [`BasalamClient::new`].
    pub fn new(strategy: impl Into<CredentialStrategy>, config: BasalamConfig) -> ApiResult<Self> {
        config.validate()?;
        let endpoint = BlockingHttpTokenEndpoint::new(config.token_url.clone(), config.timeout())
            .map_err(token_client_error)?;
        let session = BlockingAuthSession::new(strategy, Arc::new(endpoint))
            .with_authorize_url(config.authorize_url.clone());
        Self::with_session(session, config)
    }

    /// # Errors
    /// See [`BasalamClient::new`].
    pub fn with_session(session: BlockingAuthSession, config: BasalamConfig) -> ApiResult<Self> {
        config.validate()?;
        let auth: Arc<dyn BlockingAccessTokenProvider> = Arc::new(session.clone());
        let core = BlockingApiClient::new(dispatcher_config(&config, Service::Core), auth)?;

        info!(environment = %config.environment, "Blocking Basalam client ready");
        Ok(Self {
            wallet: BlockingWalletService::new(
                core.for_base_url(config.service_url(Service::Wallet))?,
            ),
            webhook: BlockingWebhookService::new(
                core.for_base_url(config.service_url(Service::Webhook))?,
            ),
            chat: BlockingChatService::new(core.for_base_url(config.service_url(Service::Chat))?),
            core: BlockingCoreService::new(core),
            session,
            config,
        })
    }

    pub const fn core(&self) -> &BlockingCoreService {
        &self.core
    }

    pub const fn wallet(&self) -> &BlockingWalletService {
        &self.wallet
    }

    pub const fn webhook(&self) -> &BlockingWebhookService {
        &self.webhook
    }

    pub const fn chat(&self) -> &BlockingChatService {
        &self.chat
    }

    pub const fn session(&self) -> &BlockingAuthSession {
        &self.session
    }

    pub const fn config(&self) -> &BasalamConfig {
        &self.config
    }

    pub fn has_scope(&self, scope: impl AsRef<str>) -> bool {
        self.session.has_scope(scope)
    }

    pub fn granted_scopes(&self) -> HashSet<String> {
        self.session.granted_scopes()
    }

    /// # Errors
    /// `ApiError::Auth` when the token endpoint refuses.
    pub fn refresh_auth_token(&self) -> ApiResult<TokenState> {
        Ok(self.session.force_refresh()?)
    }
}
