//! Core service: the authenticated user's own profile.

use basalam_domain::PrivateUserResponse;

use crate::api::{ApiClient, ApiRequest, ApiResult, BlockingApiClient};

fn current_user() -> ApiRequest {
    ApiRequest::get("/v3/users/me")
}

/// Async core client
#[derive(Debug, Clone)]
pub struct CoreService {
    api: ApiClient,
}

impl CoreService {
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Profile of the user the token belongs to.
    ///
    /// # Errors
    /// Propagates dispatcher errors.
    pub async fn get_current_user(&self) -> ApiResult<PrivateUserResponse> {
        self.api.execute_as(&current_user()).await
    }
}

/// Blocking core client
#[derive(Debug, Clone)]
pub struct BlockingCoreService {
    api: BlockingApiClient,
}

impl BlockingCoreService {
    pub const fn new(api: BlockingApiClient) -> Self {
        Self { api }
    }

    /// # Errors
    /// Propagates dispatcher errors.
    pub fn get_current_user(&self) -> ApiResult<PrivateUserResponse> {
        self.api.execute_as(&current_user())
    }
}
