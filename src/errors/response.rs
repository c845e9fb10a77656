use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use crate::errors::{AppError, EngineError};
use crate::models::ApiResponse;

fn reply(status: StatusCode, message: String, data: Option<Value>) -> Response {
    (status, Json(ApiResponse::failure(message, data))).into_response()
}

// Every failure leaves as the same JSON envelope with `success: false`.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Auth(msg) => reply(StatusCode::UNAUTHORIZED, msg, None),

            AppError::Validation(msg) => reply(StatusCode::BAD_REQUEST, msg, None),

            AppError::Engine(err) => convert_engine_error(err),

            // Storage and hashing failures are internal server errors
            AppError::Redis(e) => {
                tracing::error!("Redis failure: {}", e);
                reply(StatusCode::INTERNAL_SERVER_ERROR, format!("Database error: {}", e), None)
            }
            AppError::Serialization(e) => {
                tracing::error!("Serialization failure: {}", e);
                reply(StatusCode::INTERNAL_SERVER_ERROR, format!("Serialization error: {}", e), None)
            }
            AppError::Hashing(e) => {
                tracing::error!("Password hashing failure: {}", e);
                reply(StatusCode::INTERNAL_SERVER_ERROR, "Server error".to_string(), None)
            }
        }
    }
}

// Helper function to map business rule violations to status codes
fn convert_engine_error(err: EngineError) -> Response {
    let message = err.to_string();
    match err {
        EngineError::Unauthorized(_) => reply(StatusCode::FORBIDDEN, message, None),

        EngineError::InvalidCredentials => reply(StatusCode::UNAUTHORIZED, message, None),

        EngineError::NotFound(_) => reply(StatusCode::NOT_FOUND, message, None),

        EngineError::InvalidState { current, .. } => {
            let data = current.and_then(|task| serde_json::to_value(*task).ok());
            reply(StatusCode::CONFLICT, message, data)
        }

        EngineError::LoanLimitExceeded(_) | EngineError::EmailTaken => {
            reply(StatusCode::CONFLICT, message, None)
        }

        EngineError::InvalidTarget(_) => reply(StatusCode::BAD_REQUEST, message, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::Auth("Not authenticated".into()), StatusCode::UNAUTHORIZED),
            (AppError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (EngineError::Unauthorized("no".into()).into(), StatusCode::FORBIDDEN),
            (EngineError::NotFound("gone".into()).into(), StatusCode::NOT_FOUND),
            (EngineError::invalid_state("not open").into(), StatusCode::CONFLICT),
            (EngineError::LoanLimitExceeded(2).into(), StatusCode::CONFLICT),
            (EngineError::InvalidTarget("not a seeker".into()).into(), StatusCode::BAD_REQUEST),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
