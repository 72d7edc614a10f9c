//! Wallet service types
//!
//! Credits are issued to a user for a reason and reference; spends consume
//! credits and can be rolled back. Refunds turn a previous spend back into
//! credit, or undo a previous credit with a spend.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Requests
// ============================================================================

/// Filter for balance queries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cash: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settleable: Option<bool>,
    pub vendor: bool,
    pub customer: bool,
}

impl Default for BalanceFilter {
    fn default() -> Self {
        Self { cash: None, settleable: None, vendor: true, customer: true }
    }
}

/// Spend part of a user's credit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendCreditRequest {
    pub reason_id: i64,
    pub reference_id: i64,
    pub amount: i64,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub types: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settleable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub references: Option<HashMap<String, i64>>,
}

impl SpendCreditRequest {
    pub fn new(
        reason_id: i64,
        reference_id: i64,
        amount: i64,
        description: impl Into<String>,
    ) -> Self {
        Self {
            reason_id,
            reference_id,
            amount,
            description: description.into(),
            types: None,
            settleable: None,
            references: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefundRequest {
    pub original_reason: i64,
    pub original_reference_id: i64,
    pub reason: i64,
    pub reference_id: i64,
    pub amount: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub references: Option<Vec<HashMap<String, i64>>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollbackRefundRequest {
    pub refund_reason: i64,
    pub rollback_refund_reason: i64,
    pub refund_reference_id: i64,
    pub reference_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub references: Option<Vec<HashMap<String, i64>>>,
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReasonResponse {
    pub id: i64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceResponse {
    pub reference_type_id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    pub reference_id: i64,
}

/// Credit type; types nest through `parent`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditTypeResponse {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub parent: Option<Box<CreditTypeResponse>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditResponse {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub expire_at: Option<DateTime<Utc>>,
    pub user_id: i64,
    #[serde(default)]
    pub client_id: Option<i64>,
    #[serde(default)]
    pub reference_id: Option<i64>,
    #[serde(default)]
    pub reason: Option<ReasonResponse>,
    pub amount: i64,
    pub remained_amount: i64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub credit_type: CreditTypeResponse,
    #[serde(default)]
    pub references: Option<Vec<ReferenceResponse>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendItemResponse {
    pub id: i64,
    pub amount: i64,
    pub references: Vec<ReferenceResponse>,
    pub credit: CreditResponse,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendResponse {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub amount: i64,
    pub user_id: i64,
    pub reference_id: i64,
    pub reason: ReasonResponse,
    #[serde(default)]
    pub rollback_reason: Option<ReasonResponse>,
    pub items: Vec<SpendItemResponse>,
    pub references: Vec<ReferenceResponse>,
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub client_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditCreationResponse {
    pub id: i64,
    pub client_id: i64,
    pub reference_id: i64,
    pub user_id: i64,
    #[serde(default)]
    pub reason: Option<ReasonResponse>,
    pub amount: i64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    pub credits: Vec<CreditResponse>,
    #[serde(default)]
    pub references: Option<Vec<ReferenceResponse>>,
}

/// Outcome of a refund
///
/// Refunding a spend creates credit; refunding a credit creates a spend. The
/// payload shape tells them apart: credit creations carry `credits`, spends
/// carry `items`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RefundResponse {
    Credit(CreditCreationResponse),
    Spend(SpendResponse),
}

impl RefundResponse {
    /// Pick the variant from the payload's discriminating field.
    ///
    /// Returns `None` when the payload has neither `credits` nor `items`, or
    /// does not match the shape its field announces.
    #[must_use]
    pub fn from_value(value: serde_json::Value) -> Option<Self> {
        if value.get("credits").is_some() {
            serde_json::from_value(value).ok().map(Self::Credit)
        } else if value.get("items").is_some() {
            serde_json::from_value(value).ok().map(Self::Spend)
        } else {
            None
        }
    }

    #[must_use]
    pub const fn amount(&self) -> i64 {
        match self {
            Self::Credit(credit) => credit.amount,
            Self::Spend(spend) => spend.amount,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryItemResponse {
    pub time: DateTime<Utc>,
    pub amount: i64,
    pub subtotal: i64,
    #[serde(default)]
    pub description: Option<String>,
    pub main_reference_id: i64,
    pub references: Vec<ReferenceResponse>,
    #[serde(default)]
    pub reason: Option<ReasonResponse>,
    #[serde(default)]
    pub related_credit: Option<serde_json::Value>,
    #[serde(default)]
    pub related_spend: Option<serde_json::Value>,
}

/// One page of a user's wallet history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryPaginationResponse {
    pub data: Vec<HistoryItemResponse>,
    pub total: i64,
    pub per_page: i64,
    pub current_page: i64,
    pub last_page: i64,
    #[serde(rename = "from")]
    pub from_item: i64,
    pub to: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BooleanResponse {
    pub status: bool,
}
