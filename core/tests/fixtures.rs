//! Decode recorded Chatwork payloads from `tests/fixtures/` through the
//! client, with a closure standing in for the network.

use std::path::PathBuf;

use chatwork_core::{
    ApiError, ChatworkClient, Config, HttpMethod, HttpRequest, HttpResponse, Room, TaskFilter,
    TaskStatus, User,
};
use serde_json::Value;

/// Load `tests/fixtures/{name}.json`; a missing file yields an empty object.
fn load_fixture(name: &str) -> Value {
    let file = format!("{name}.json");
    let path: PathBuf = [env!("CARGO_MANIFEST_DIR"), "tests", "fixtures", file.as_str()]
        .iter()
        .collect();
    match std::fs::read_to_string(&path) {
        Ok(content) => serde_json::from_str(&content).unwrap(),
        Err(_) => Value::Object(Default::default()),
    }
}

/// A client whose transport answers every request with `status` and the
/// named fixture, after checking the method and URL it was sent.
fn replay(
    status: u16,
    fixture: &str,
    method: HttpMethod,
    url: &'static str,
) -> ChatworkClient<impl Fn(HttpRequest) -> Result<HttpResponse, ApiError>> {
    let body = load_fixture(fixture).to_string();
    let transport = move |req: HttpRequest| -> Result<HttpResponse, ApiError> {
        assert_eq!(req.method, method);
        assert_eq!(req.url, url);
        Ok(HttpResponse {
            status,
            headers: vec![
                ("X-RateLimit-Limit".to_string(), "300".to_string()),
                ("X-RateLimit-Remaining".to_string(), "299".to_string()),
                ("X-RateLimit-Reset".to_string(), "1390941626".to_string()),
            ],
            body: body.clone(),
        })
    };
    ChatworkClient::with_transport(Config::new("fixture-token"), transport)
}

#[test]
fn missing_fixture_loads_as_empty_object() {
    assert_eq!(load_fixture("does_not_exist"), Value::Object(Default::default()));
}

#[test]
fn me_fixture_decodes_and_ignores_extra_fields() {
    let client = replay(200, "me", HttpMethod::Get, "https://api.chatwork.com/v2/me");
    let me = client.me().unwrap();
    assert_eq!(me.account_id, Some(123));
    assert_eq!(me.room_id, Some(322));
    assert_eq!(me.login_mail.as_deref(), Some("account@example.com"));
}

#[test]
fn my_status_fixture_decodes_counters() {
    let client = replay(200, "my_status", HttpMethod::Get, "https://api.chatwork.com/v2/my/status");
    let status = client.my_status().unwrap();
    assert_eq!(status.unread_room_num, 2);
    assert_eq!(status.mytask_num, 8);
}

#[test]
fn contacts_fixture_decodes_list() {
    let client = replay(200, "contacts", HttpMethod::Get, "https://api.chatwork.com/v2/contacts");
    let contacts = client.contacts().unwrap();
    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0].room_id, Some(322));
    assert_eq!(contacts[0].department.as_deref(), Some("Marketing"));
}

#[test]
fn room_fixture_round_trips_through_field_map() {
    let fixture = load_fixture("room");
    let fields = fixture.as_object().unwrap();
    let room = Room::from_fields(fields).unwrap();
    let data = room.to_data();

    assert_eq!(data.len(), 13);
    assert!(!data.contains_key("last_update_time"));
    for (key, value) in &data {
        assert_eq!(value, &fields[key], "field {key}");
    }
}

#[test]
fn rooms_fixture_decodes_list() {
    let client = replay(200, "rooms", HttpMethod::Get, "https://api.chatwork.com/v2/rooms");
    let rooms = client.rooms().unwrap();
    assert_eq!(rooms.len(), 2);
    assert_eq!(rooms[1].kind.as_deref(), Some("direct"));
    assert_eq!(rooms[1].sticky, Some(true));
    assert_eq!(rooms[0].description, None);
}

#[test]
fn members_fixture_maps_to_users() {
    let client = replay(
        200,
        "members",
        HttpMethod::Get,
        "https://api.chatwork.com/v2/rooms/123/members",
    );
    let members = Room::with_id(123).members(&client).unwrap();
    assert_eq!(members.len(), 2);
    assert_eq!(members[0].name.as_deref(), Some("John Smith"));
    assert_eq!(members[1].role.as_deref(), Some("admin"));

    let fixture = load_fixture("members");
    let rebuilt = User::from_fields(fixture[0].as_object().unwrap()).unwrap();
    assert_eq!(rebuilt, members[0]);
}

#[test]
fn messages_fixture_supports_reply_markup() {
    let client = replay(
        200,
        "messages",
        HttpMethod::Get,
        "https://api.chatwork.com/v2/rooms/42/messages?force=1",
    );
    let messages = Room::with_id(42).messages(&client, true).unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].author_id(), Some(123));
    assert_eq!(
        chatwork_core::markup::build_reply(42, &messages[0], true).unwrap(),
        "[rp aid=123 to=42-5] Bob\n"
    );
}

#[test]
fn my_tasks_fixture_decodes_nested_room() {
    let client = replay(
        200,
        "my_tasks",
        HttpMethod::Get,
        "https://api.chatwork.com/v2/my/tasks?status=open",
    );
    let filter = TaskFilter {
        status: Some(TaskStatus::Open),
        ..TaskFilter::default()
    };
    let tasks = client.my_tasks(&filter).unwrap();
    assert_eq!(tasks[0].room.as_ref().and_then(|r| r.room_id), Some(5));
    assert_eq!(tasks[0].status, Some(TaskStatus::Open));
    assert!(tasks[0].account.is_none());
}

#[test]
fn error_fixture_becomes_request_failed() {
    let client = replay(401, "error", HttpMethod::Get, "https://api.chatwork.com/v2/rooms");
    match client.rooms().unwrap_err() {
        ApiError::RequestFailed { status, errors } => {
            assert_eq!(status, 401);
            assert_eq!(errors, vec!["Invalid API token".to_string()]);
        }
        other => panic!("expected RequestFailed, got {other:?}"),
    }
}
