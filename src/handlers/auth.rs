use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tower_sessions::Session;
use crate::config::Config;
use crate::engine::identity::{self, SignUp};
use crate::errors::{AppError, AppResult};
use crate::models::{ApiResponse, LoginForm, ProfileForm, SignupForm, UserProfile};
use crate::services::Repositories;
use super::{session_user, CURRENT_USER};

pub async fn handle_signup(
    State((repos, config)): State<(Repositories, Config)>,
    Json(form): Json<SignupForm>,
) -> AppResult<Response> {
    form.validate().map_err(AppError::Validation)?;

    let request = SignUp {
        name: form.name.trim().to_string(),
        email: form.email,
        password: form.password,
        role: form.role,
    };
    let user = identity::sign_up(&repos.users, &repos.loans, request, config.auth.bcrypt_cost).await?;

    let body = ApiResponse::ok_with_message(
        UserProfile::from(&user),
        "Signup successful! Please log in.",
    );
    Ok((StatusCode::CREATED, Json(body)).into_response())
}

#[axum::debug_handler]
pub async fn handle_login(
    State((repos, config)): State<(Repositories, Config)>,
    session: Session,
    Json(form): Json<LoginForm>,
) -> AppResult<Response> {
    tracing::info!("Login attempt for: {}", form.email);

    let outcome = identity::login(&repos.users, &form.email, &form.password, config.auth.bcrypt_cost).await?;
    session
        .insert(CURRENT_USER, &outcome.user)
        .await
        .map_err(|e| AppError::Auth(format!("Session error: {}", e)))?;

    let message = if outcome.first_login {
        format!("Welcome, {}!", outcome.user.name)
    } else {
        format!("Welcome back, {}!", outcome.user.name)
    };
    Ok(Json(ApiResponse::ok_with_message(outcome, message)).into_response())
}

pub async fn handle_logout(session: Session) -> Json<ApiResponse<()>> {
    if let Err(e) = session.remove::<UserProfile>(CURRENT_USER).await {
        tracing::warn!("Session removal error: {}", e);
    }
    Json(ApiResponse { success: true, message: Some("Logged out.".into()), data: None })
}

pub async fn get_me(
    State((repos, _config)): State<(Repositories, Config)>,
    session: Session,
) -> AppResult<Json<ApiResponse<UserProfile>>> {
    let user = session_user(&session, &repos.users).await?;
    Ok(Json(ApiResponse::ok(UserProfile::from(&user))))
}

pub async fn update_me(
    State((repos, _config)): State<(Repositories, Config)>,
    session: Session,
    Json(form): Json<ProfileForm>,
) -> AppResult<Json<ApiResponse<UserProfile>>> {
    let actor = session_user(&session, &repos.users).await?;
    form.validate().map_err(AppError::Validation)?;

    let updated = identity::update_profile(&repos.users, &actor, form).await?;
    let profile = UserProfile::from(&updated);
    session
        .insert(CURRENT_USER, &profile)
        .await
        .map_err(|e| AppError::Auth(format!("Session error: {}", e)))?;

    Ok(Json(ApiResponse::ok_with_message(profile, "Profile updated.")))
}
