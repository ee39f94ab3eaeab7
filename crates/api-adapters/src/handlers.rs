//! Request handlers. Each one authorizes via the [`Actor`] extractor where
//! needed, parses wire strings into domain types, and delegates to the
//! services.

use axum::extract::{Path, Query, State};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::Json;

use domains::{MovieDraft, MovieSort, ReplyAnchor, Role, UserSummary, VoteKind, VoteTarget};
use services::COMMENTS_PER_PAGE;

use crate::dto::*;
use crate::error::ApiError;
use crate::extract::{bearer_token, Actor};
use crate::state::AppState;

type ApiResult<T> = Result<T, ApiError>;

// ── Auth ─────────────────────────────────────────────────────────────────────

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let user = state.users.register(&body.name, &body.email, &body.password).await?;
    let token = state.sessions.issue(user.id);
    Ok((StatusCode::CREATED, Json(AuthResponse { token, user: UserSummary::from(&user) })))
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let user = state.users.login(&body.email, &body.password).await?;
    let token = state.sessions.issue(user.id);
    Ok(Json(AuthResponse { token, user: UserSummary::from(&user) }))
}

pub async fn logout(State(state): State<AppState>, parts: Parts) -> StatusCode {
    if let Some(token) = bearer_token(&parts) {
        state.sessions.revoke(token);
    }
    StatusCode::NO_CONTENT
}

// ── Movies ───────────────────────────────────────────────────────────────────

pub async fn list_movies(
    State(state): State<AppState>,
    Query(query): Query<MovieListQuery>,
) -> ApiResult<Json<Vec<domains::Movie>>> {
    let movies = match query.q {
        Some(q) => state.movies.search(&q).await?,
        None => {
            let sort = match query.sort.as_deref() {
                Some(raw) => raw.parse::<MovieSort>()?,
                None => MovieSort::default(),
            };
            state.movies.list(sort).await?
        }
    };
    Ok(Json(movies))
}

pub async fn create_movie(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Json(draft): Json<MovieDraft>,
) -> ApiResult<(StatusCode, Json<domains::Movie>)> {
    let movie = state.movies.create(&actor, draft).await?;
    Ok((StatusCode::CREATED, Json(movie)))
}

pub async fn get_movie(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<MovieDetail>> {
    let movie = state.movies.get(id).await?;
    let (comments, total_comments) = state.comments.list_page(id, 0).await?;
    Ok(Json(MovieDetail { movie, comments, total_comments }))
}

pub async fn update_movie(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<i64>,
    Json(draft): Json<MovieDraft>,
) -> ApiResult<Json<domains::Movie>> {
    Ok(Json(state.movies.update(&actor, id, draft).await?))
}

pub async fn delete_movie(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.movies.delete(&actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── Comments & replies ───────────────────────────────────────────────────────

pub async fn list_comments(
    State(state): State<AppState>,
    Path(movie_id): Path<i64>,
    Query(query): Query<OffsetQuery>,
) -> ApiResult<Json<CommentsPage>> {
    let offset = query.offset.unwrap_or(0);
    let (comments, total) = state.comments.list_page(movie_id, offset).await?;
    debug_assert!(comments.len() as i64 <= COMMENTS_PER_PAGE);
    Ok(Json(CommentsPage { comments, total, offset }))
}

pub async fn post_comment(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(movie_id): Path<i64>,
    Json(body): Json<CommentRequest>,
) -> ApiResult<(StatusCode, Json<domains::Comment>)> {
    let comment = state
        .comments
        .post_comment(&actor, movie_id, &body.text, body.rating, body.parent_id)
        .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn post_reply(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(comment_id): Path<i64>,
    Json(body): Json<ReplyRequest>,
) -> ApiResult<(StatusCode, Json<domains::Reply>)> {
    let anchor = match body.parent_reply_id {
        Some(reply_id) => ReplyAnchor::Reply(reply_id),
        None => ReplyAnchor::Comment(comment_id),
    };
    let reply = state.comments.post_reply(&actor, anchor, &body.text).await?;
    Ok((StatusCode::CREATED, Json(reply)))
}

pub async fn edit_comment(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<i64>,
    Json(body): Json<EditRequest>,
) -> ApiResult<StatusCode> {
    state.comments.edit_comment(&actor, id, &body.text).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_comment(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.comments.delete_comment(&actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn edit_reply(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<i64>,
    Json(body): Json<EditRequest>,
) -> ApiResult<StatusCode> {
    state.comments.edit_reply(&actor, id, &body.text).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_reply(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.comments.delete_reply(&actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── Votes ────────────────────────────────────────────────────────────────────

pub async fn cast_vote(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Json(body): Json<VoteRequest>,
) -> ApiResult<Json<VoteResponse>> {
    let target: VoteTarget = body.target.parse()?;
    let kind: VoteKind = body.vote_type.parse()?;
    let tally = state.votes.cast(&actor, target, kind).await?;
    Ok(Json(tally))
}

// ── Users ────────────────────────────────────────────────────────────────────

pub async fn list_users(
    State(state): State<AppState>,
    Actor(actor): Actor,
) -> ApiResult<Json<Vec<UserSummary>>> {
    let users = state.users.list_users(&actor).await?;
    Ok(Json(users.iter().map(UserSummary::from).collect()))
}

pub async fn assign_role(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<i64>,
    Json(body): Json<RoleRequest>,
) -> ApiResult<Json<UserSummary>> {
    let role: Role = body.role.parse()?;
    let updated = state.users.assign_role(&actor, id, role).await?;
    Ok(Json(UserSummary::from(&updated)))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.users.delete_user(&actor, id).await?;
    // Their bearer tokens die with the account.
    state.sessions.revoke_user(id);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn user_profile(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ProfileResponse>> {
    Ok(Json(state.users.profile(id).await?))
}
