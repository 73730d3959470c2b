//! The request executor and the typed Chatwork client built on it.
//!
//! # Design
//! `ChatworkClient` owns a `Config` and a `Transport` and carries no other
//! state between calls. `send` is the executor: build the `HttpRequest`,
//! hand it to the transport once, parse the result. Every typed method is a
//! row of the endpoint table: pick an `Endpoint` and method, attach
//! parameters, send, decode.

use tracing::{debug, warn};

use crate::config::Config;
use crate::endpoint::Endpoint;
use crate::error::ApiError;
use crate::http::HttpMethod;
use crate::params::Params;
use crate::request::ApiRequest;
use crate::response::{parse_response, ApiResponse};
use crate::transport::{Transport, UreqTransport};
use crate::types::{
    Contact, File, IncomingRequest, Me, MembersUpdate, Message, MessageCreated, MyStatus, NewRoom,
    NewTask, Room, RoomDeleteAction, RoomId, RoomMembers, RoomUpdate, Task, TaskFilter,
    TasksCreated, User,
};

#[derive(Debug, Clone)]
pub struct ChatworkClient<T = UreqTransport> {
    config: Config,
    transport: T,
}

impl ChatworkClient<UreqTransport> {
    /// Client with a `ureq` transport honoring `config`'s TLS mode.
    pub fn new(config: Config) -> Self {
        let transport = UreqTransport::new(config.tls());
        Self { config, transport }
    }

    pub fn from_env() -> Self {
        Self::new(Config::from_env())
    }
}

impl<T: Transport> ChatworkClient<T> {
    pub fn with_transport(config: Config, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// A request for `endpoint` carrying the configured API key.
    ///
    /// Fails with `NoApiKey` before anything is sent.
    pub fn request(&self, method: HttpMethod, endpoint: &Endpoint) -> Result<ApiRequest, ApiError> {
        let api_key = self.config.require_api_key()?;
        Ok(ApiRequest::new(api_key, method).endpoint(endpoint.path()))
    }

    /// Execute one request: exactly one transport call, no retry.
    pub fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let http_request = request.build(self.config.base_url())?;
        debug!(
            method = %http_request.method,
            url = %http_request.url,
            params = request.param_list().len(),
            "sending chatwork request"
        );

        let http_response = self.transport.execute(http_request)?;
        let status = http_response.status;
        match parse_response(http_response) {
            Ok(response) => {
                debug!(
                    status,
                    remaining = ?response.rate_limit.remaining,
                    "chatwork request succeeded"
                );
                Ok(response)
            }
            Err(err) => {
                warn!(
                    status,
                    endpoint = request.endpoint_path(),
                    error = %err,
                    "chatwork request failed"
                );
                Err(err)
            }
        }
    }

    fn call(
        &self,
        method: HttpMethod,
        endpoint: Endpoint,
        params: Params,
    ) -> Result<ApiResponse, ApiError> {
        let request = self.request(method, &endpoint)?.params(params);
        self.send(request)
    }

    fn get(&self, endpoint: Endpoint, params: Params) -> Result<ApiResponse, ApiError> {
        self.call(HttpMethod::Get, endpoint, params)
    }

    // -----------------------------------------------------------------------
    // Account
    // -----------------------------------------------------------------------

    pub fn me(&self) -> Result<Me, ApiError> {
        self.get(Endpoint::Me, Params::new())?.decode()
    }

    pub fn my_status(&self) -> Result<MyStatus, ApiError> {
        self.get(Endpoint::MyStatus, Params::new())?.decode()
    }

    /// Tasks assigned to the authenticated account.
    pub fn my_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, ApiError> {
        self.get(Endpoint::MyTasks, filter.to_params())?.decode_list()
    }

    pub fn contacts(&self) -> Result<Vec<Contact>, ApiError> {
        self.get(Endpoint::Contacts, Params::new())?.decode_list()
    }

    // -----------------------------------------------------------------------
    // Rooms
    // -----------------------------------------------------------------------

    pub fn rooms(&self) -> Result<Vec<Room>, ApiError> {
        self.get(Endpoint::Rooms, Params::new())?.decode_list()
    }

    pub fn create_room(&self, room: &NewRoom) -> Result<RoomId, ApiError> {
        self.call(HttpMethod::Post, Endpoint::Rooms, room.to_params())?
            .decode()
    }

    pub fn room(&self, room_id: u64) -> Result<Room, ApiError> {
        self.get(Endpoint::Room(room_id), Params::new())?.decode()
    }

    pub fn update_room(&self, room_id: u64, update: &RoomUpdate) -> Result<RoomId, ApiError> {
        self.call(HttpMethod::Put, Endpoint::Room(room_id), update.to_params())?
            .decode()
    }

    /// Leave or delete a room. The action travels in the query string.
    pub fn delete_room(&self, room_id: u64, action: RoomDeleteAction) -> Result<(), ApiError> {
        let params = Params::new().with("action_type", action.as_str());
        self.call(HttpMethod::Delete, Endpoint::Room(room_id), params)?;
        Ok(())
    }

    pub fn room_members(&self, room_id: u64) -> Result<Vec<User>, ApiError> {
        self.get(Endpoint::RoomMembers(room_id), Params::new())?
            .decode_list()
    }

    pub fn update_room_members(
        &self,
        room_id: u64,
        members: &MembersUpdate,
    ) -> Result<RoomMembers, ApiError> {
        self.call(HttpMethod::Put, Endpoint::RoomMembers(room_id), members.to_params())?
            .decode()
    }

    // -----------------------------------------------------------------------
    // Messages
    // -----------------------------------------------------------------------

    /// Messages in a room. Without `force` only messages not fetched since
    /// the last call come back (at most 100); an empty result is not an error.
    pub fn room_messages(&self, room_id: u64, force: bool) -> Result<Vec<Message>, ApiError> {
        let params = Params::new().with_flag("force", force);
        self.get(Endpoint::RoomMessages(room_id), params)?.decode_list()
    }

    /// One message by id. The id is percent-encoded into its path segment;
    /// an empty id or a bare dot segment is refused before anything is sent.
    pub fn room_message(&self, room_id: u64, message_id: &str) -> Result<Message, ApiError> {
        if matches!(message_id, "" | "." | "..") {
            return Err(ApiError::InvalidMessage(format!(
                "invalid message id {message_id:?}"
            )));
        }
        self.get(Endpoint::RoomMessage(room_id, message_id.to_string()), Params::new())?
            .decode()
    }

    pub fn create_message(
        &self,
        room_id: u64,
        body: &str,
        self_unread: bool,
    ) -> Result<MessageCreated, ApiError> {
        let params = Params::new()
            .with("body", body)
            .with_flag("self_unread", self_unread);
        self.call(HttpMethod::Post, Endpoint::RoomMessages(room_id), params)?
            .decode()
    }

    // -----------------------------------------------------------------------
    // Tasks and files
    // -----------------------------------------------------------------------

    pub fn room_tasks(&self, room_id: u64, filter: &TaskFilter) -> Result<Vec<Task>, ApiError> {
        self.get(Endpoint::RoomTasks(room_id), filter.to_params())?
            .decode_list()
    }

    pub fn room_task(&self, room_id: u64, task_id: u64) -> Result<Task, ApiError> {
        self.get(Endpoint::RoomTask(room_id, task_id), Params::new())?
            .decode()
    }

    pub fn create_task(&self, room_id: u64, task: &NewTask) -> Result<TasksCreated, ApiError> {
        self.call(HttpMethod::Post, Endpoint::RoomTasks(room_id), task.to_params())?
            .decode()
    }

    /// Files in a room, optionally only those uploaded by `account_id`.
    pub fn room_files(&self, room_id: u64, account_id: Option<u64>) -> Result<Vec<File>, ApiError> {
        let params = Params::new().with_opt("account_id", account_id);
        self.get(Endpoint::RoomFiles(room_id), params)?.decode_list()
    }

    pub fn room_file(
        &self,
        room_id: u64,
        file_id: u64,
        create_download_url: bool,
    ) -> Result<File, ApiError> {
        let params = Params::new().with_flag("create_download_url", create_download_url);
        self.get(Endpoint::RoomFile(room_id, file_id), params)?.decode()
    }

    // -----------------------------------------------------------------------
    // Contact requests
    // -----------------------------------------------------------------------

    pub fn incoming_requests(&self) -> Result<Vec<IncomingRequest>, ApiError> {
        self.get(Endpoint::IncomingRequests, Params::new())?
            .decode_list()
    }

    /// Approve a contact request; the server answers with the new contact.
    pub fn accept_incoming_request(&self, request_id: u64) -> Result<Contact, ApiError> {
        self.call(HttpMethod::Put, Endpoint::IncomingRequest(request_id), Params::new())?
            .decode()
    }

    pub fn reject_incoming_request(&self, request_id: u64) -> Result<(), ApiError> {
        self.call(HttpMethod::Delete, Endpoint::IncomingRequest(request_id), Params::new())?;
        Ok(())
    }
}
