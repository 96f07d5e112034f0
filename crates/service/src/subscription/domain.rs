use serde::{Deserialize, Serialize};

/// Create request as received on the wire; presence and format are checked by the service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateSubscriptionInput {
    #[serde(default)]
    pub service_name: Option<String>,
    #[serde(default)]
    pub price: Option<i64>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

/// Partial update. Absent fields keep the stored value; `end_date: ""` clears the end month.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSubscriptionInput {
    #[serde(default)]
    pub service_name: Option<String>,
    #[serde(default)]
    pub price: Option<i64>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

/// Raw list/total query parameters; empty strings count as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub service_name: Option<String>,
    #[serde(default)]
    pub start_month: Option<String>,
    #[serde(default)]
    pub end_month: Option<String>,
}

/// Aggregate result of the total-cost query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalCost {
    pub total: i64,
}
