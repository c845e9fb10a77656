use axum::{
    middleware::Next,
    response::{IntoResponse, Response},
    extract::Request,
    body::Body,
};
use tower_sessions::Session;
use crate::errors::AppError;
use crate::handlers::CURRENT_USER;
use crate::models::UserProfile;

const PUBLIC_PATHS: [&str; 4] = ["/signup", "/login", "/skills", "/pricing/estimate"];

pub async fn require_auth(
    session: Session,
    req: Request<Body>,
    next: Next,
) -> Response {
    let path = req.uri().path();

    if PUBLIC_PATHS.contains(&path) {
        return next.run(req).await;
    }

    match session.get::<UserProfile>(CURRENT_USER).await {
        Ok(Some(_)) => next.run(req).await,
        Ok(None) => {
            tracing::debug!("Rejected unauthenticated request to {}", path);
            AppError::Auth("Not authenticated".into()).into_response()
        }
        Err(e) => AppError::Auth(format!("Session error: {}", e)).into_response(),
    }
}
