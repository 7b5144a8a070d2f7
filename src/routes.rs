use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{
        IntoResponse,
        sse::{Event, KeepAlive, Sse},
    },
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use tokio_stream::{Stream, StreamExt, wrappers::BroadcastStream};
use tracing::{info, warn};

use crate::{
    database::{
        admin_session_active, append_submission, clear_admin_session, clear_wizard,
        fetch_submission, fetch_submissions, get_wizard, put_admin_session, put_wizard,
    },
    error::AppError,
    pdf,
    state::AppState,
    submission::{Draft, Submission},
    utils::generate_session_token,
    wizard::Wizard,
};

const WIZARD_COOKIE: &str = "wizard_session";
const ADMIN_COOKIE: &str = "admin_session";

/// Embedded in client-deliverable code in the original frontend as well; the
/// gate keeps casual visitors out of the panel, nothing more.
const ADMIN_CODE: &str = "WANGA_NHINE";

/// Where the frontend sends people after a confirmed submission, and how
/// long it waits before navigating.
const CHAT_INVITE_URL: &str = "https://chat.whatsapp.com/DuF1ZSJZESDHCu4SHSeyga?mode=wwt";
const REDIRECT_DELAY_MS: u64 = 1500;

#[derive(Deserialize)]
pub struct LoginPayload {
    code: String,
}

#[derive(Serialize)]
pub struct LoginReply {
    authenticated: bool,
}

#[derive(Serialize)]
pub struct ConfirmReply {
    pub id: String,
    pub redirect_url: &'static str,
    pub redirect_delay_ms: u64,
}

pub async fn submit_handler(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(draft): Json<Draft>,
) -> Result<(CookieJar, Json<Wizard>), AppError> {
    let (jar, token) = wizard_token(jar);

    let mut wizard = get_wizard(&state, &token).await?.unwrap_or_default();
    wizard.submit(draft)?;

    put_wizard(&state, &token, &wizard).await?;

    Ok((jar, Json(wizard)))
}

pub async fn back_handler(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<Json<Wizard>, AppError> {
    let token = jar
        .get(WIZARD_COOKIE)
        .ok_or(AppError::NoActiveForm)?
        .value()
        .to_string();

    let mut wizard = get_wizard(&state, &token)
        .await?
        .ok_or(AppError::NoActiveForm)?;
    wizard.back();

    put_wizard(&state, &token, &wizard).await?;

    Ok(Json(wizard))
}

pub async fn confirm_handler(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<Json<ConfirmReply>, AppError> {
    let token = jar
        .get(WIZARD_COOKIE)
        .ok_or(AppError::NoActiveForm)?
        .value()
        .to_string();

    let wizard = get_wizard(&state, &token)
        .await?
        .ok_or(AppError::NoActiveForm)?;
    let draft = wizard.confirming().ok_or(AppError::NotConfirming)?;

    let submission = Submission::finalize(draft.clone());
    append_submission(&state, &submission).await?;

    let _ = state.feed.send(());

    // The record is already appended; a failed session delete must not turn
    // this success into a retry. The 1h TTL reaps the leftover.
    if let Err(e) = clear_wizard(&state, &token).await {
        warn!("Failed to clear wizard session: {e}");
    }

    info!("Recorded submission {}", submission.id);

    Ok(Json(ConfirmReply {
        id: submission.id,
        redirect_url: CHAT_INVITE_URL,
        redirect_delay_ms: REDIRECT_DELAY_MS,
    }))
}

pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(payload): Json<LoginPayload>,
) -> Result<(CookieJar, Json<LoginReply>), AppError> {
    if !code_matches(&payload.code) {
        return Err(AppError::InvalidCode);
    }

    let token = generate_session_token();
    put_admin_session(&state, &token).await?;

    let jar = jar.add(session_cookie(ADMIN_COOKIE, token));

    Ok((jar, Json(LoginReply {
        authenticated: true,
    })))
}

pub async fn logout_handler(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<LoginReply>), AppError> {
    if let Some(cookie) = jar.get(ADMIN_COOKIE) {
        clear_admin_session(&state, cookie.value()).await?;
    }

    let mut removal = Cookie::from(ADMIN_COOKIE);
    removal.set_path("/");

    Ok((jar.remove(removal), Json(LoginReply {
        authenticated: false,
    })))
}

pub async fn list_handler(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<Json<Vec<Submission>>, AppError> {
    require_admin(&state, &jar).await?;

    Ok(Json(fetch_submissions(&state).await?))
}

pub async fn detail_handler(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Path(id): Path<String>,
) -> Result<Json<Submission>, AppError> {
    require_admin(&state, &jar).await?;

    let submission = fetch_submission(&state, &id)
        .await?
        .ok_or(AppError::UnknownSubmission)?;

    Ok(Json(submission))
}

pub async fn pdf_handler(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    require_admin(&state, &jar).await?;

    let submission = fetch_submission(&state, &id)
        .await?
        .ok_or(AppError::UnknownSubmission)?;

    let bytes = pdf::render(&submission)?;

    let headers = [
        (CONTENT_TYPE, "application/pdf".to_string()),
        (
            CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", pdf::filename(&submission)),
        ),
    ];

    Ok((headers, bytes))
}

pub async fn feed_handler(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<Sse<impl Stream<Item = Result<Event, axum::Error>>>, AppError> {
    require_admin(&state, &jar).await?;

    let notifications = BroadcastStream::new(state.feed.subscribe()).map(|_| ());

    // First event carries the current set, then every append re-sends the
    // complete set. A lagged receiver just re-snapshots on its next turn.
    let snapshots = tokio_stream::once(()).chain(notifications).then(move |_| {
        let state = state.clone();
        async move {
            let submissions = fetch_submissions(&state).await.map_err(axum::Error::new)?;

            Event::default().event("submissions").json_data(&submissions)
        }
    });

    Ok(Sse::new(snapshots).keep_alive(KeepAlive::default()))
}

fn code_matches(code: &str) -> bool {
    code == ADMIN_CODE
}

async fn require_admin(state: &AppState, jar: &CookieJar) -> Result<(), AppError> {
    let token = jar.get(ADMIN_COOKIE).ok_or(AppError::Unauthorized)?;

    if admin_session_active(state, token.value()).await? {
        Ok(())
    } else {
        Err(AppError::Unauthorized)
    }
}

fn wizard_token(jar: CookieJar) -> (CookieJar, String) {
    if let Some(cookie) = jar.get(WIZARD_COOKIE) {
        let token = cookie.value().to_string();
        return (jar, token);
    }

    let token = generate_session_token();
    let cookie = session_cookie(WIZARD_COOKIE, token.clone());

    (jar.add(cookie), token)
}

fn session_cookie(name: &'static str, value: String) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}
