use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::models::domain::enrollment::{Currency, PaymentMethod, PaymentStatus};

/// Standalone transaction record, one per processed payment. Kept alongside
/// the payment block embedded in the enrollment so external tooling can query
/// transactions by their unique id.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Payment {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: String,
    pub course_id: String,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    pub transaction_id: String,
    pub amount: f64,
    #[serde(default)]
    pub currency: Currency,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Payment {
    pub fn new(
        user_id: &str,
        course_id: &str,
        method: PaymentMethod,
        status: PaymentStatus,
        transaction_id: &str,
        amount: f64,
        currency: Currency,
    ) -> Self {
        Payment {
            id: None,
            user_id: user_id.to_string(),
            course_id: course_id.to_string(),
            method,
            status,
            transaction_id: transaction_id.to_string(),
            amount,
            currency,
            created_at: Some(Utc::now()),
        }
    }
}
