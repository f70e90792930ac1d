// Core structs: NormalizedProduct, PromotionDecision, ManualCoupon
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Canonical product record extracted from a provider-shaped candidate.
///
/// All numeric-looking fields stay as trimmed strings here; parsing happens
/// in the promotion filter, which tolerates locale separators.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NormalizedProduct {
    pub title: String,
    pub price: String,
    pub reference_price: Option<String>,
    pub coupon_code: Option<String>,
    pub link: Option<String>,
}

impl NormalizedProduct {
    /// A record may enter filtering only with a non-empty title, price and link.
    /// Absence of any of them is a silent rejection, not an error.
    pub fn is_eligible(&self) -> bool {
        !self.title.is_empty()
            && !self.price.is_empty()
            && self.link.as_deref().is_some_and(|l| !l.is_empty())
    }
}

/// Verdict of the promotion filter for one normalized product.
#[derive(Debug, Clone, PartialEq)]
pub struct PromotionDecision {
    pub qualifies: bool,
    pub discount_percent: Option<f64>,
}

/// Operator-submitted coupon, appended via `POST /add`.
///
/// Field names keep the original wire names of the submission endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManualCoupon {
    pub titulo: String,
    pub descricao: String,
    pub cupom: String,
    pub detalhes: String,
    pub received_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("catalog request failed: {0}")]
    Http(String),
    #[error("catalog request timed out")]
    Timeout,
    #[error("catalog responded with status {0}")]
    Status(u16),
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("telegram api error: {0}")]
    Api(String),
    #[error("telegram unreachable")]
    Unreachable,
}
