use axum::{extract::Query, Json};
use crate::engine::pricing::{self, CreditEstimate};
use crate::models::{ApiResponse, EstimateQuery};

// Both endpoints are public and stateless.

pub async fn estimate_price(Query(query): Query<EstimateQuery>) -> Json<ApiResponse<CreditEstimate>> {
    Json(ApiResponse::ok(pricing::estimate(&query.skill_set())))
}

pub async fn list_skills() -> Json<ApiResponse<Vec<&'static str>>> {
    Json(ApiResponse::ok(pricing::all_skills()))
}
