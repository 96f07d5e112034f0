use utoipa::{IntoParams, OpenApi, ToSchema};
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

/// Wire shape of a stored subscription; months are `MM-YYYY`.
#[derive(ToSchema)]
pub struct SubscriptionDoc {
    pub id: Uuid,
    pub service_name: String,
    pub price: i32,
    pub user_id: Uuid,
    #[schema(example = "07-2025")]
    pub start_date: String,
    #[schema(example = "12-2025")]
    pub end_date: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(ToSchema)]
pub struct CreateSubscriptionDoc {
    #[schema(example = "Yandex Plus")]
    pub service_name: String,
    #[schema(example = 400, minimum = 0)]
    pub price: i64,
    pub user_id: Uuid,
    #[schema(example = "07-2025")]
    pub start_date: String,
    pub end_date: Option<String>,
}

#[derive(ToSchema)]
pub struct UpdateSubscriptionDoc {
    pub service_name: Option<String>,
    pub price: Option<i64>,
    pub start_date: Option<String>,
    /// Empty string clears the end month.
    pub end_date: Option<String>,
}

#[derive(ToSchema)]
pub struct TotalCostDoc { pub total: i64 }

#[derive(IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQueryDoc {
    /// Owning user UUID
    pub user_id: Option<String>,
    /// Exact service name
    pub service_name: Option<String>,
    /// `MM-YYYY`; keep subscriptions still active in or after this month
    pub start_month: Option<String>,
    /// `MM-YYYY`; keep subscriptions started in or before this month
    pub end_month: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::subscriptions::create,
        crate::routes::subscriptions::list,
        crate::routes::subscriptions::total,
        crate::routes::subscriptions::get,
        crate::routes::subscriptions::update,
        crate::routes::subscriptions::delete,
    ),
    components(
        schemas(
            HealthResponse,
            SubscriptionDoc,
            CreateSubscriptionDoc,
            UpdateSubscriptionDoc,
            TotalCostDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "subscriptions")
    )
)]
pub struct ApiDoc;
