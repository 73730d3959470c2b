//! In-memory stand-in for the Chatwork v2 API.
//!
//! Serves the subset of endpoints the client exercises under `/v2`, checks
//! the `X-ChatWorkToken` header and stamps every authenticated response with
//! `X-RateLimit-*` headers.

use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::{SystemTime, UNIX_EPOCH},
};

use axum::{
    extract::{Path, Query, Request, State},
    http::{HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};

pub const DEFAULT_TOKEN: &str = "mock-token";
pub const TOKEN_HEADER: &str = "x-chatworktoken";
pub const RATE_LIMIT: u64 = 300;
pub const RATE_LIMIT_RESET: u64 = 1_390_941_626;
pub const ME_ACCOUNT_ID: u64 = 1;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Account {
    pub account_id: u64,
    pub name: String,
    pub avatar_image_url: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Member {
    pub account_id: u64,
    pub role: String,
    pub name: String,
    pub chatwork_id: String,
    pub organization_id: u64,
    pub organization_name: String,
    pub department: String,
    pub avatar_image_url: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Room {
    pub room_id: u64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub role: String,
    pub sticky: bool,
    pub unread_num: u64,
    pub mention_num: u64,
    pub mytask_num: u64,
    pub message_num: u64,
    pub file_num: u64,
    pub task_num: u64,
    pub icon_path: String,
    pub last_update_time: u64,
    pub description: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Message {
    pub message_id: String,
    pub account: Account,
    pub body: String,
    pub send_time: u64,
    pub update_time: u64,
}

#[derive(Debug)]
struct RoomRecord {
    room: Room,
    members: Vec<Member>,
    messages: Vec<Message>,
    /// Messages before this index were already returned by a non-forced read.
    read_cursor: usize,
}

#[derive(Debug, Default)]
struct Store {
    next_room_id: u64,
    next_message_id: u64,
    rooms: BTreeMap<u64, RoomRecord>,
}

#[derive(Clone)]
pub struct AppState {
    token: Arc<str>,
    remaining: Arc<AtomicU64>,
    store: Arc<RwLock<Store>>,
}

impl AppState {
    fn new(token: &str) -> Self {
        Self {
            token: Arc::from(token),
            remaining: Arc::new(AtomicU64::new(RATE_LIMIT)),
            store: Arc::new(RwLock::new(Store {
                next_room_id: 100,
                next_message_id: 1000,
                rooms: BTreeMap::new(),
            })),
        }
    }
}

pub fn app() -> Router {
    app_with_token(DEFAULT_TOKEN)
}

pub fn app_with_token(token: &str) -> Router {
    let state = AppState::new(token);
    let api = Router::new()
        .route("/me", get(me))
        .route("/rooms", get(list_rooms).post(create_room))
        .route("/rooms/{room_id}", get(get_room).put(update_room).delete(delete_room))
        .route("/rooms/{room_id}/members", get(list_members).put(update_members))
        .route("/rooms/{room_id}/messages", get(list_messages).post(create_message))
        .route("/rooms/{room_id}/messages/{message_id}", get(get_message))
        .layer(middleware::from_fn_with_state(state.clone(), chatwork_headers));
    Router::new().nest("/v2", api).with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn errors(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "errors": [message] }))).into_response()
}

fn not_found() -> Response {
    errors(StatusCode::NOT_FOUND, "Resource not found")
}

fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

fn parse_ids(raw: Option<&str>) -> Result<Vec<u64>, Response> {
    let Some(raw) = raw.filter(|r| !r.is_empty()) else {
        return Ok(Vec::new());
    };
    raw.split(',')
        .map(|id| id.trim().parse::<u64>())
        .collect::<Result<_, _>>()
        .map_err(|_| errors(StatusCode::BAD_REQUEST, "Invalid account id list"))
}

fn member(account_id: u64, role: &str) -> Member {
    Member {
        account_id,
        role: role.to_string(),
        name: format!("User {account_id}"),
        chatwork_id: format!("user{account_id}"),
        organization_id: 1,
        organization_name: "Mock Inc.".to_string(),
        department: String::new(),
        avatar_image_url: format!("https://example.com/avatar/{account_id}.png"),
    }
}

fn members_by_role(admin: &[u64], member_ids: &[u64], readonly: &[u64]) -> Vec<Member> {
    admin
        .iter()
        .map(|id| member(*id, "admin"))
        .chain(member_ids.iter().map(|id| member(*id, "member")))
        .chain(readonly.iter().map(|id| member(*id, "readonly")))
        .collect()
}

/// Reject requests without the right token, then count the call against the
/// quota and report it in the rate-limit headers.
async fn chatwork_headers(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let authorized = request
        .headers()
        .get(TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == &*state.token);
    if !authorized {
        tracing::info!(path = %request.uri().path(), "rejecting request with bad token");
        return errors(StatusCode::UNAUTHORIZED, "Invalid API token");
    }

    let remaining = state
        .remaining
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |r| Some(r.saturating_sub(1)))
        .map(|previous| previous.saturating_sub(1))
        .unwrap_or_default();

    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert("x-ratelimit-limit", HeaderValue::from(RATE_LIMIT));
    headers.insert("x-ratelimit-remaining", HeaderValue::from(remaining));
    headers.insert("x-ratelimit-reset", HeaderValue::from(RATE_LIMIT_RESET));
    response
}

async fn me() -> Json<serde_json::Value> {
    Json(json!({
        "account_id": ME_ACCOUNT_ID,
        "room_id": 1,
        "name": "Mock User",
        "chatwork_id": "mockuser",
        "organization_id": 1,
        "organization_name": "Mock Inc.",
        "department": "Engineering",
        "avatar_image_url": "https://example.com/avatar/1.png"
    }))
}

async fn list_rooms(State(state): State<AppState>) -> Json<Vec<Room>> {
    let store = state.store.read().await;
    Json(store.rooms.values().map(|r| r.room.clone()).collect())
}

#[derive(Deserialize)]
pub struct CreateRoomForm {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon_preset: Option<String>,
    pub members_admin_ids: Option<String>,
    pub members_member_ids: Option<String>,
    pub members_readonly_ids: Option<String>,
}

async fn create_room(State(state): State<AppState>, Form(form): Form<CreateRoomForm>) -> Response {
    let admin = match parse_ids(form.members_admin_ids.as_deref()) {
        Ok(ids) => ids,
        Err(resp) => return resp,
    };
    if admin.is_empty() {
        return errors(StatusCode::BAD_REQUEST, "Parameter 'members_admin_ids' is required");
    }
    let (member_ids, readonly) = match (
        parse_ids(form.members_member_ids.as_deref()),
        parse_ids(form.members_readonly_ids.as_deref()),
    ) {
        (Ok(m), Ok(r)) => (m, r),
        (Err(resp), _) | (_, Err(resp)) => return resp,
    };

    let mut store = state.store.write().await;
    let room_id = store.next_room_id;
    store.next_room_id += 1;
    let room = Room {
        room_id,
        name: form.name,
        kind: "group".to_string(),
        role: "admin".to_string(),
        sticky: false,
        unread_num: 0,
        mention_num: 0,
        mytask_num: 0,
        message_num: 0,
        file_num: 0,
        task_num: 0,
        icon_path: format!(
            "https://example.com/icon/{}.png",
            form.icon_preset.as_deref().unwrap_or("group")
        ),
        last_update_time: now(),
        description: form.description,
    };
    store.rooms.insert(
        room_id,
        RoomRecord {
            room,
            members: members_by_role(&admin, &member_ids, &readonly),
            messages: Vec::new(),
            read_cursor: 0,
        },
    );
    Json(json!({ "room_id": room_id })).into_response()
}

async fn get_room(State(state): State<AppState>, Path(room_id): Path<u64>) -> Response {
    let store = state.store.read().await;
    match store.rooms.get(&room_id) {
        Some(record) => Json(record.room.clone()).into_response(),
        None => not_found(),
    }
}

#[derive(Deserialize)]
pub struct UpdateRoomForm {
    pub name: Option<String>,
    pub description: Option<String>,
    pub icon_preset: Option<String>,
}

async fn update_room(
    State(state): State<AppState>,
    Path(room_id): Path<u64>,
    Form(form): Form<UpdateRoomForm>,
) -> Response {
    let mut store = state.store.write().await;
    let Some(record) = store.rooms.get_mut(&room_id) else {
        return not_found();
    };
    if let Some(name) = form.name {
        record.room.name = name;
    }
    if let Some(description) = form.description {
        record.room.description = description;
    }
    if let Some(preset) = form.icon_preset {
        record.room.icon_path = format!("https://example.com/icon/{preset}.png");
    }
    Json(json!({ "room_id": room_id })).into_response()
}

#[derive(Deserialize)]
pub struct DeleteRoomQuery {
    pub action_type: Option<String>,
}

async fn delete_room(
    State(state): State<AppState>,
    Path(room_id): Path<u64>,
    Query(query): Query<DeleteRoomQuery>,
) -> Response {
    match query.action_type.as_deref() {
        Some("leave") | Some("delete") => {}
        _ => return errors(StatusCode::BAD_REQUEST, "Invalid value: 'action_type'"),
    }
    let mut store = state.store.write().await;
    match store.rooms.remove(&room_id) {
        Some(_) => StatusCode::NO_CONTENT.into_response(),
        None => not_found(),
    }
}

async fn list_members(State(state): State<AppState>, Path(room_id): Path<u64>) -> Response {
    let store = state.store.read().await;
    match store.rooms.get(&room_id) {
        Some(record) => Json(record.members.clone()).into_response(),
        None => not_found(),
    }
}

#[derive(Deserialize)]
pub struct UpdateMembersForm {
    pub members_admin_ids: Option<String>,
    pub members_member_ids: Option<String>,
    pub members_readonly_ids: Option<String>,
}

async fn update_members(
    State(state): State<AppState>,
    Path(room_id): Path<u64>,
    Form(form): Form<UpdateMembersForm>,
) -> Response {
    let parsed = (
        parse_ids(form.members_admin_ids.as_deref()),
        parse_ids(form.members_member_ids.as_deref()),
        parse_ids(form.members_readonly_ids.as_deref()),
    );
    let (admin, member_ids, readonly) = match parsed {
        (Ok(a), Ok(m), Ok(r)) => (a, m, r),
        (Err(resp), _, _) | (_, Err(resp), _) | (_, _, Err(resp)) => return resp,
    };
    if admin.is_empty() {
        return errors(StatusCode::BAD_REQUEST, "Parameter 'members_admin_ids' is required");
    }

    let mut store = state.store.write().await;
    let Some(record) = store.rooms.get_mut(&room_id) else {
        return not_found();
    };
    record.members = members_by_role(&admin, &member_ids, &readonly);
    Json(json!({ "admin": admin, "member": member_ids, "readonly": readonly })).into_response()
}

#[derive(Deserialize)]
pub struct ListMessagesQuery {
    #[serde(default)]
    pub force: Option<String>,
}

/// Unforced reads return only messages not seen by a previous unforced
/// read, and `204` when there are none.
async fn list_messages(
    State(state): State<AppState>,
    Path(room_id): Path<u64>,
    Query(query): Query<ListMessagesQuery>,
) -> Response {
    let force = query.force.as_deref() == Some("1");
    let mut store = state.store.write().await;
    let Some(record) = store.rooms.get_mut(&room_id) else {
        return not_found();
    };
    let start = if force { 0 } else { record.read_cursor };
    let fresh: Vec<Message> = record.messages[start..]
        .iter()
        .rev()
        .take(100)
        .rev()
        .cloned()
        .collect();
    if !force {
        record.read_cursor = record.messages.len();
    }
    if fresh.is_empty() {
        return StatusCode::NO_CONTENT.into_response();
    }
    Json(fresh).into_response()
}

#[derive(Deserialize)]
pub struct CreateMessageForm {
    pub body: String,
    #[serde(default)]
    pub self_unread: Option<String>,
}

async fn create_message(
    State(state): State<AppState>,
    Path(room_id): Path<u64>,
    Form(form): Form<CreateMessageForm>,
) -> Response {
    if form.body.is_empty() {
        return errors(StatusCode::BAD_REQUEST, "Parameter 'body' is required");
    }
    let mut store = state.store.write().await;
    let message_id = store.next_message_id.to_string();
    store.next_message_id += 1;
    let Some(record) = store.rooms.get_mut(&room_id) else {
        return not_found();
    };
    let sent_at = now();
    record.messages.push(Message {
        message_id: message_id.clone(),
        account: Account {
            account_id: ME_ACCOUNT_ID,
            name: "Mock User".to_string(),
            avatar_image_url: "https://example.com/avatar/1.png".to_string(),
        },
        body: form.body,
        send_time: sent_at,
        update_time: 0,
    });
    record.room.message_num += 1;
    record.room.last_update_time = sent_at;
    if form.self_unread.as_deref() == Some("1") {
        record.room.unread_num += 1;
    }
    Json(json!({ "message_id": message_id })).into_response()
}

async fn get_message(
    State(state): State<AppState>,
    Path((room_id, message_id)): Path<(u64, String)>,
) -> Response {
    let store = state.store.read().await;
    store
        .rooms
        .get(&room_id)
        .and_then(|record| record.messages.iter().find(|m| m.message_id == message_id))
        .map(|message| Json(message.clone()).into_response())
        .unwrap_or_else(not_found)
}
