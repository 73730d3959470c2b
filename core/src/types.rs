//! Domain DTOs for the Chatwork API.
//!
//! # Design
//! Every field is optional and defaults to unset, so a partial JSON object
//! (a room list entry, a field map assembled by the caller) still
//! deserializes. Unknown keys are ignored. `to_data` renders exactly the
//! fields a type declares, with unset ones as `""`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::params::Params;

/// Render `value`'s fields as a JSON map, turning `null`s into `""`.
fn data_map<T: Serialize>(value: &T) -> Map<String, Value> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => blank_nulls(map),
        _ => Map::new(),
    }
}

fn blank_nulls(map: Map<String, Value>) -> Map<String, Value> {
    map.into_iter()
        .map(|(key, value)| {
            let value = match value {
                Value::Null => Value::String(String::new()),
                Value::Object(inner) => Value::Object(blank_nulls(inner)),
                other => other,
            };
            (key, value)
        })
        .collect()
}

fn from_map<T: for<'de> Deserialize<'de>>(fields: &Map<String, Value>) -> Result<T, ApiError> {
    serde_json::from_value(Value::Object(fields.clone()))
        .map_err(|e| ApiError::Deserialization(e.to_string()))
}

/// A chat room.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Room {
    pub room_id: Option<u64>,
    pub name: Option<String>,
    /// `my`, `direct` or `group`.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub role: Option<String>,
    pub sticky: Option<bool>,
    pub unread_num: Option<u64>,
    pub mention_num: Option<u64>,
    pub mytask_num: Option<u64>,
    pub message_num: Option<u64>,
    pub file_num: Option<u64>,
    pub task_num: Option<u64>,
    pub icon_path: Option<String>,
    pub description: Option<String>,
}

impl Room {
    pub fn with_id(room_id: u64) -> Self {
        Self {
            room_id: Some(room_id),
            ..Self::default()
        }
    }

    pub fn from_fields(fields: &Map<String, Value>) -> Result<Self, ApiError> {
        from_map(fields)
    }

    pub fn to_data(&self) -> Map<String, Value> {
        data_map(self)
    }
}

/// A room member or contact.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct User {
    pub account_id: Option<u64>,
    pub role: Option<String>,
    pub name: Option<String>,
    pub chatwork_id: Option<String>,
    pub organization_id: Option<u64>,
    pub organization_name: Option<String>,
    pub department: Option<String>,
    pub avatar_image_url: Option<String>,
}

impl User {
    pub fn with_id(account_id: u64) -> Self {
        Self {
            account_id: Some(account_id),
            ..Self::default()
        }
    }

    pub fn from_fields(fields: &Map<String, Value>) -> Result<Self, ApiError> {
        from_map(fields)
    }

    pub fn to_data(&self) -> Map<String, Value> {
        data_map(self)
    }
}

/// The author block embedded in messages, tasks and files.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Account {
    pub account_id: Option<u64>,
    pub name: Option<String>,
    pub avatar_image_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Message {
    pub message_id: Option<String>,
    pub account: Option<Account>,
    pub body: Option<String>,
    pub send_time: Option<u64>,
    pub update_time: Option<u64>,
}

impl Message {
    pub fn from_fields(fields: &Map<String, Value>) -> Result<Self, ApiError> {
        from_map(fields)
    }

    pub fn to_data(&self) -> Map<String, Value> {
        data_map(self)
    }

    pub fn author_id(&self) -> Option<u64> {
        self.account.as_ref().and_then(|a| a.account_id)
    }
}

/// The authenticated account (`GET /me`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Me {
    pub account_id: Option<u64>,
    /// The account's own "my chat" room.
    pub room_id: Option<u64>,
    pub name: Option<String>,
    pub chatwork_id: Option<String>,
    pub organization_id: Option<u64>,
    pub organization_name: Option<String>,
    pub department: Option<String>,
    pub title: Option<String>,
    pub url: Option<String>,
    pub introduction: Option<String>,
    pub mail: Option<String>,
    pub avatar_image_url: Option<String>,
    pub login_mail: Option<String>,
}

/// Unread, mention and task counters (`GET /my/status`).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MyStatus {
    pub unread_room_num: u64,
    pub mention_room_num: u64,
    pub mytask_room_num: u64,
    pub unread_num: u64,
    pub mention_num: u64,
    pub mytask_num: u64,
}

/// A contact (`GET /contacts`): a user plus the direct-chat room shared with them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Contact {
    pub account_id: Option<u64>,
    pub room_id: Option<u64>,
    pub name: Option<String>,
    pub chatwork_id: Option<String>,
    pub organization_id: Option<u64>,
    pub organization_name: Option<String>,
    pub department: Option<String>,
    pub avatar_image_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Open,
    Done,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Open => "open",
            TaskStatus::Done => "done",
        }
    }
}

/// Room summary embedded in `GET /my/tasks` entries.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TaskRoom {
    pub room_id: Option<u64>,
    pub name: Option<String>,
    pub icon_path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Task {
    pub task_id: Option<u64>,
    pub room: Option<TaskRoom>,
    pub account: Option<Account>,
    pub assigned_by_account: Option<Account>,
    pub message_id: Option<String>,
    pub body: Option<String>,
    pub limit_time: Option<u64>,
    pub status: Option<TaskStatus>,
    /// `none`, `date` or `time`.
    pub limit_type: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct File {
    pub file_id: Option<u64>,
    pub account: Option<Account>,
    pub message_id: Option<String>,
    pub filename: Option<String>,
    pub filesize: Option<u64>,
    pub upload_time: Option<u64>,
    /// Present only when a download URL was requested.
    pub download_url: Option<String>,
}

/// A pending contact approval request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct IncomingRequest {
    pub request_id: Option<u64>,
    pub account_id: Option<u64>,
    pub message: Option<String>,
    pub name: Option<String>,
    pub chatwork_id: Option<String>,
    pub organization_id: Option<u64>,
    pub organization_name: Option<String>,
    pub department: Option<String>,
    pub avatar_image_url: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoomId {
    pub room_id: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageCreated {
    pub message_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TasksCreated {
    pub task_ids: Vec<u64>,
}

/// Member ids per role after `PUT /rooms/{id}/members`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RoomMembers {
    pub admin: Vec<u64>,
    pub member: Vec<u64>,
    pub readonly: Vec<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomDeleteAction {
    /// Leave the room; it stays for the other members.
    Leave,
    /// Delete the room for everyone. Admins only.
    Delete,
}

impl RoomDeleteAction {
    pub fn as_str(self) -> &'static str {
        match self {
            RoomDeleteAction::Leave => "leave",
            RoomDeleteAction::Delete => "delete",
        }
    }
}

/// Input for `POST /rooms`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewRoom {
    pub name: String,
    pub description: Option<String>,
    pub icon_preset: Option<String>,
    /// At least one admin is required by the server.
    pub members_admin_ids: Vec<u64>,
    pub members_member_ids: Vec<u64>,
    pub members_readonly_ids: Vec<u64>,
}

impl NewRoom {
    pub fn to_params(&self) -> Params {
        Params::new()
            .with("name", self.name.as_str())
            .with_opt("description", self.description.as_deref())
            .with_opt("icon_preset", self.icon_preset.as_deref())
            .with_list("members_admin_ids", &self.members_admin_ids)
            .with_list("members_member_ids", &self.members_member_ids)
            .with_list("members_readonly_ids", &self.members_readonly_ids)
    }
}

/// Input for `PUT /rooms/{id}`. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub icon_preset: Option<String>,
}

impl RoomUpdate {
    pub fn to_params(&self) -> Params {
        Params::new()
            .with_opt("name", self.name.as_deref())
            .with_opt("description", self.description.as_deref())
            .with_opt("icon_preset", self.icon_preset.as_deref())
    }
}

/// Input for `PUT /rooms/{id}/members`: the complete member list by role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MembersUpdate {
    pub admin_ids: Vec<u64>,
    pub member_ids: Vec<u64>,
    pub readonly_ids: Vec<u64>,
}

impl MembersUpdate {
    pub fn to_params(&self) -> Params {
        Params::new()
            .with_list("members_admin_ids", &self.admin_ids)
            .with_list("members_member_ids", &self.member_ids)
            .with_list("members_readonly_ids", &self.readonly_ids)
    }
}

/// Input for `POST /rooms/{id}/tasks`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTask {
    pub body: String,
    pub to_ids: Vec<u64>,
    /// Deadline in epoch seconds.
    pub limit: Option<u64>,
}

impl NewTask {
    pub fn to_params(&self) -> Params {
        Params::new()
            .with("body", self.body.as_str())
            .with_list("to_ids", &self.to_ids)
            .with_opt("limit", self.limit)
    }
}

/// Query for `GET /my/tasks` and `GET /rooms/{id}/tasks`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub account_id: Option<u64>,
    pub assigned_by_account_id: Option<u64>,
    pub status: Option<TaskStatus>,
}

impl TaskFilter {
    pub fn to_params(&self) -> Params {
        Params::new()
            .with_opt("account_id", self.account_id)
            .with_opt("assigned_by_account_id", self.assigned_by_account_id)
            .with_opt("status", self.status.map(TaskStatus::as_str))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn fields(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    #[test]
    fn room_to_data_fills_unset_fields_with_empty_string() {
        let room = Room::from_fields(&fields(json!({
            "room_id": 123,
            "name": "Group Chat Name",
            "unknown_key": "ignored"
        })))
        .unwrap();
        let data = room.to_data();

        let keys: Vec<&str> = data.keys().map(String::as_str).collect();
        assert_eq!(keys.len(), 13);
        assert!(!keys.contains(&"unknown_key"));
        assert_eq!(data["room_id"], 123);
        assert_eq!(data["name"], "Group Chat Name");
        assert_eq!(data["type"], "");
        assert_eq!(data["description"], "");
    }

    #[test]
    fn user_round_trips_declared_fields() {
        let user = User::from_fields(&fields(json!({
            "account_id": 123,
            "role": "member",
            "name": "John Smith",
            "chatwork_id": "tarochatworkid",
            "organization_id": 101,
            "organization_name": "Hello Company",
            "department": "Marketing",
            "avatar_image_url": "https://example.com/abc.png"
        })))
        .unwrap();
        assert_eq!(user.name.as_deref(), Some("John Smith"));
        let data = user.to_data();
        assert_eq!(data.len(), 8);
        assert_eq!(data["organization_name"], "Hello Company");
    }

    #[test]
    fn message_to_data_blanks_nested_author_fields() {
        let message = Message::from_fields(&fields(json!({
            "message_id": "5",
            "account": {"account_id": 123},
            "body": "Hello Chatwork!"
        })))
        .unwrap();
        assert_eq!(message.author_id(), Some(123));
        let data = message.to_data();
        assert_eq!(data["message_id"], "5");
        assert_eq!(data["account"]["account_id"], 123);
        assert_eq!(data["account"]["name"], "");
        assert_eq!(data["send_time"], "");
    }

    #[test]
    fn message_without_author_renders_empty_account() {
        let data = Message::default().to_data();
        assert_eq!(data["account"], "");
        assert_eq!(data.len(), 5);
    }

    #[test]
    fn mistyped_field_is_a_deserialization_error() {
        let err = Room::from_fields(&fields(json!({"room_id": "not-a-number"}))).unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }

    #[test]
    fn task_status_deserializes_lowercase() {
        let task: Task = serde_json::from_value(json!({"task_id": 3, "status": "done"})).unwrap();
        assert_eq!(task.status, Some(TaskStatus::Done));
        assert_eq!(TaskStatus::Open.as_str(), "open");
    }

    #[test]
    fn new_room_params_join_member_lists() {
        let room = NewRoom {
            name: "Website renewal project".to_string(),
            members_admin_ids: vec![123, 542],
            members_readonly_ids: vec![7],
            ..NewRoom::default()
        };
        let params = room.to_params();
        assert_eq!(params.get("name"), Some("Website renewal project"));
        assert_eq!(params.get("members_admin_ids"), Some("123,542"));
        assert_eq!(params.get("members_member_ids"), None);
        assert_eq!(params.get("members_readonly_ids"), Some("7"));
        assert_eq!(params.get("description"), None);
    }

    #[test]
    fn empty_update_sends_nothing() {
        assert!(RoomUpdate::default().to_params().is_empty());
        assert!(TaskFilter::default().to_params().is_empty());
    }

    #[test]
    fn task_inputs_encode_ids_and_status() {
        let task = NewTask {
            body: "Buy milk".to_string(),
            to_ids: vec![1, 3, 6],
            limit: Some(1385996399),
        };
        assert_eq!(
            task.to_params().encode().as_deref(),
            Some("body=Buy+milk&to_ids=1%2C3%2C6&limit=1385996399")
        );
        let filter = TaskFilter {
            status: Some(TaskStatus::Done),
            ..TaskFilter::default()
        };
        assert_eq!(filter.to_params().get("status"), Some("done"));
    }
}
