//! Wallet service
//!
//! Balances, credit history, spends and refunds. Every call accepts an
//! optional operator id, sent as `x-operator-id` when acting on behalf of a
//! user.

use basalam_domain::constants::OPERATOR_ID_HEADER;
use basalam_domain::{
    BalanceFilter, BooleanResponse, HistoryPaginationResponse, RefundRequest, RefundResponse,
    RollbackRefundRequest, SpendCreditRequest, SpendResponse,
};
use serde_json::{json, Value};

use crate::api::{ApiClient, ApiError, ApiRequest, ApiResult, BlockingApiClient};

pub const DEFAULT_HISTORY_PAGE: u32 = 1;
pub const DEFAULT_HISTORY_PER_PAGE: u32 = 50;

fn with_operator(request: ApiRequest, operator_id: Option<i64>) -> ApiRequest {
    match operator_id {
        Some(id) => request.header(OPERATOR_ID_HEADER, id.to_string()),
        None => request,
    }
}

fn balance(
    user_id: i64,
    filters: Option<Vec<BalanceFilter>>,
    operator_id: Option<i64>,
) -> ApiResult<ApiRequest> {
    let filters = filters.unwrap_or_else(|| vec![BalanceFilter::default()]);
    let request = ApiRequest::post(format!("/v2/user/{user_id}/balance"))
        .json(&json!({ "filters": filters }))?;
    Ok(with_operator(request, operator_id))
}

fn history(user_id: i64, page: u32, per_page: u32, operator_id: Option<i64>) -> ApiRequest {
    let request = ApiRequest::get(format!("/v2/user/{user_id}/history"))
        .query("page", page)
        .query("per_page", per_page);
    with_operator(request, operator_id)
}

fn spend(
    user_id: i64,
    body: &SpendCreditRequest,
    operator_id: Option<i64>,
) -> ApiResult<ApiRequest> {
    let request = ApiRequest::post(format!("/v2/user/{user_id}/spend")).json(body)?;
    Ok(with_operator(request, operator_id))
}

fn get_spend(user_id: i64, spend_id: i64, operator_id: Option<i64>) -> ApiRequest {
    with_operator(ApiRequest::get(spend_path(user_id, spend_id)), operator_id)
}

fn spend_path(user_id: i64, spend_id: i64) -> String {
    format!("/v2/user/{user_id}/spend/{spend_id}")
}

fn spend_by_ref_path(user_id: i64, reason_id: i64, reference_id: i64) -> String {
    format!("/v2/user/{user_id}/spend/by-ref/{reason_id}/{reference_id}")
}

fn get_spend_by_ref(
    user_id: i64,
    reason_id: i64,
    reference_id: i64,
    operator_id: Option<i64>,
) -> ApiRequest {
    with_operator(ApiRequest::get(spend_by_ref_path(user_id, reason_id, reference_id)), operator_id)
}

fn rollback(path: String, rollback_reason_id: i64, operator_id: Option<i64>) -> ApiRequest {
    let request =
        ApiRequest::delete(path).json_value(json!({ "rollback_reason_id": rollback_reason_id }));
    with_operator(request, operator_id)
}

fn refund(body: &RefundRequest, operator_id: Option<i64>) -> ApiResult<ApiRequest> {
    Ok(with_operator(ApiRequest::post("/v2/refund").json(body)?, operator_id))
}

fn can_rollback_refund(
    refund_reason: i64,
    refund_reference_id: i64,
    operator_id: Option<i64>,
) -> ApiRequest {
    let request = ApiRequest::post("/v2/can-rollback-refund").json_value(json!({
        "refund_reason": refund_reason,
        "refund_reference_id": refund_reference_id,
    }));
    with_operator(request, operator_id)
}

fn rollback_refund(
    body: &RollbackRefundRequest,
    operator_id: Option<i64>,
) -> ApiResult<ApiRequest> {
    Ok(with_operator(ApiRequest::delete("/v2/rollback-refund").json(body)?, operator_id))
}

/// Pick the refund variant from the response's shape.
fn refund_outcome(body: Option<Value>) -> ApiResult<RefundResponse> {
    let body =
        body.ok_or_else(|| ApiError::Validation("refund response body is empty".to_string()))?;
    RefundResponse::from_value(body).ok_or_else(|| {
        ApiError::Validation("refund response is neither a credit creation nor a spend".to_string())
    })
}

/// Async wallet client
#[derive(Debug, Clone)]
pub struct WalletService {
    api: ApiClient,
}

impl WalletService {
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Balance of `user_id`; without filters, vendor and customer credit are
    /// both counted.
    ///
    /// # Errors
    /// Propagates dispatcher errors.
    pub async fn get_balance(
        &self,
        user_id: i64,
        filters: Option<Vec<BalanceFilter>>,
        operator_id: Option<i64>,
    ) -> ApiResult<Value> {
        self.api.execute_as(&balance(user_id, filters, operator_id)?).await
    }

    /// # Errors
    /// Propagates dispatcher errors.
    pub async fn get_history(
        &self,
        user_id: i64,
        page: u32,
        per_page: u32,
        operator_id: Option<i64>,
    ) -> ApiResult<HistoryPaginationResponse> {
        self.api.execute_as(&history(user_id, page, per_page, operator_id)).await
    }

    /// # Errors
    /// Propagates dispatcher errors.
    pub async fn spend_credit(
        &self,
        user_id: i64,
        request: &SpendCreditRequest,
        operator_id: Option<i64>,
    ) -> ApiResult<SpendResponse> {
        self.api.execute_as(&spend(user_id, request, operator_id)?).await
    }

    /// # Errors
    /// Propagates dispatcher errors.
    pub async fn get_spend(
        &self,
        user_id: i64,
        spend_id: i64,
        operator_id: Option<i64>,
    ) -> ApiResult<SpendResponse> {
        self.api.execute_as(&get_spend(user_id, spend_id, operator_id)).await
    }

    /// # Errors
    /// Propagates dispatcher errors.
    pub async fn rollback_spend(
        &self,
        user_id: i64,
        spend_id: i64,
        rollback_reason_id: i64,
        operator_id: Option<i64>,
    ) -> ApiResult<SpendResponse> {
        let request = rollback(spend_path(user_id, spend_id), rollback_reason_id, operator_id);
        self.api.execute_as(&request).await
    }

    /// # Errors
    /// Propagates dispatcher errors.
    pub async fn get_spend_by_ref(
        &self,
        user_id: i64,
        reason_id: i64,
        reference_id: i64,
        operator_id: Option<i64>,
    ) -> ApiResult<SpendResponse> {
        let request = get_spend_by_ref(user_id, reason_id, reference_id, operator_id);
        self.api.execute_as(&request).await
    }

    /// # Errors
    /// Propagates dispatcher errors.
    pub async fn rollback_spend_by_ref(
        &self,
        user_id: i64,
        reason_id: i64,
        reference_id: i64,
        rollback_reason_id: i64,
        operator_id: Option<i64>,
    ) -> ApiResult<SpendResponse> {
        let path = spend_by_ref_path(user_id, reason_id, reference_id);
        self.api.execute_as(&rollback(path, rollback_reason_id, operator_id)).await
    }

    /// Refund a previous transaction.
    ///
    /// # Errors
    /// `ApiError::Validation` when the response is neither a credit creation
    /// nor a spend; otherwise propagates dispatcher errors.
    pub async fn refund(
        &self,
        request: &RefundRequest,
        operator_id: Option<i64>,
    ) -> ApiResult<RefundResponse> {
        refund_outcome(self.api.execute(&refund(request, operator_id)?).await?)
    }

    /// # Errors
    /// Propagates dispatcher errors.
    pub async fn can_rollback_refund(
        &self,
        refund_reason: i64,
        refund_reference_id: i64,
        operator_id: Option<i64>,
    ) -> ApiResult<bool> {
        let request = can_rollback_refund(refund_reason, refund_reference_id, operator_id);
        let answer: BooleanResponse = self.api.execute_as(&request).await?;
        Ok(answer.status)
    }

    /// # Errors
    /// Propagates dispatcher errors.
    pub async fn rollback_refund(
        &self,
        request: &RollbackRefundRequest,
        operator_id: Option<i64>,
    ) -> ApiResult<SpendResponse> {
        self.api.execute_as(&rollback_refund(request, operator_id)?).await
    }
}

/// Blocking wallet client
#[derive(Debug, Clone)]
pub struct BlockingWalletService {
    api: BlockingApiClient,
}

impl BlockingWalletService {
    pub const fn new(api: BlockingApiClient) -> Self {
        Self { api }
    }

    /// # Errors
    /// Propagates dispatcher errors.
    pub fn get_balance(
        &self,
        user_id: i64,
        filters: Option<Vec<BalanceFilter>>,
        operator_id: Option<i64>,
    ) -> ApiResult<Value> {
        self.api.execute_as(&balance(user_id, filters, operator_id)?)
    }

    /// # Errors
    /// Propagates dispatcher errors.
    pub fn get_history(
        &self,
        user_id: i64,
        page: u32,
        per_page: u32,
        operator_id: Option<i64>,
    ) -> ApiResult<HistoryPaginationResponse> {
        self.api.execute_as(&history(user_id, page, per_page, operator_id))
    }

    /// # Errors
    /// Propagates dispatcher errors.
    pub fn spend_credit(
        &self,
        user_id: i64,
        request: &SpendCreditRequest,
        operator_id: Option<i64>,
    ) -> ApiResult<SpendResponse> {
        self.api.execute_as(&spend(user_id, request, operator_id)?)
    }

    /// # Errors
    /// Propagates dispatcher errors.
    pub fn get_spend(
        &self,
        user_id: i64,
        spend_id: i64,
        operator_id: Option<i64>,
    ) -> ApiResult<SpendResponse> {
        self.api.execute_as(&get_spend(user_id, spend_id, operator_id))
    }

    /// # Errors
    /// Propagates dispatcher errors.
    pub fn rollback_spend(
        &self,
        user_id: i64,
        spend_id: i64,
        rollback_reason_id: i64,
        operator_id: Option<i64>,
    ) -> ApiResult<SpendResponse> {
        let request = rollback(spend_path(user_id, spend_id), rollback_reason_id, operator_id);
        self.api.execute_as(&request)
    }

    /// # Errors
    /// Propagates dispatcher errors.
    pub fn get_spend_by_ref(
        &self,
        user_id: i64,
        reason_id: i64,
        reference_id: i64,
        operator_id: Option<i64>,
    ) -> ApiResult<SpendResponse> {
        self.api.execute_as(&get_spend_by_ref(user_id, reason_id, reference_id, operator_id))
    }

    /// # Errors
    /// Propagates dispatcher errors.
    pub fn rollback_spend_by_ref(
        &self,
        user_id: i64,
        reason_id: i64,
        reference_id: i64,
        rollback_reason_id: i64,
        operator_id: Option<i64>,
    ) -> ApiResult<SpendResponse> {
        let path = spend_by_ref_path(user_id, reason_id, reference_id);
        self.api.execute_as(&rollback(path, rollback_reason_id, operator_id))
    }

    /// # Errors
    /// See [`WalletService::refund`].
    pub fn refund(
        &self,
        request: &RefundRequest,
        operator_id: Option<i64>,
    ) -> ApiResult<RefundResponse> {
        refund_outcome(self.api.execute(&refund(request, operator_id)?)?)
    }

    /// # Errors
    /// Propagates dispatcher errors.
    pub fn can_rollback_refund(
        &self,
        refund_reason: i64,
        refund_reference_id: i64,
        operator_id: Option<i64>,
    ) -> ApiResult<bool> {
        let request = can_rollback_refund(refund_reason, refund_reference_id, operator_id);
        let answer: BooleanResponse = self.api.execute_as(&request)?;
        Ok(answer.status)
    }

    /// # Errors
    /// Propagates dispatcher errors.
    pub fn rollback_refund(
        &self,
        request: &RollbackRefundRequest,
        operator_id: Option<i64>,
    ) -> ApiResult<SpendResponse> {
        self.api.execute_as(&rollback_refund(request, operator_id)?)
    }
}
