//! Blocking client for the Chatwork v2 REST API.
//!
//! # Overview
//! Every call follows the same three steps: an `ApiRequest` is rendered into
//! an `HttpRequest` (pure), a `Transport` performs the round-trip (I/O), and
//! `parse_response` turns the `HttpResponse` into an `ApiResponse` with the
//! decoded JSON body and rate-limit figures (pure).
//!
//! # Design
//! - `ChatworkClient` holds only its `Config` and `Transport`; nothing
//!   carries over between calls, and nothing is retried.
//! - TLS verification is a per-`Config` setting, never process-wide.
//! - Entities (`Room`, `User`, `Message`, ...) are typed serde structs with
//!   every field optional; unknown keys are ignored.
//! - Any status >= 400 is `ApiError::RequestFailed` with the body's
//!   `errors` attached.

pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod markup;
pub mod params;
pub mod request;
pub mod response;
mod room;
pub mod transport;
pub mod types;

pub use client::ChatworkClient;
pub use config::{Config, TlsMode};
pub use endpoint::Endpoint;
pub use error::ApiError;
pub use http::{Headers, HttpMethod, HttpRequest, HttpResponse};
pub use markup::{MentionStyle, MessageBuilder};
pub use params::Params;
pub use request::ApiRequest;
pub use response::{parse_response, ApiResponse, RateLimit};
pub use transport::{Transport, UreqTransport};
pub use types::{
    Account, Contact, File, IncomingRequest, Me, MembersUpdate, Message, MessageCreated, MyStatus,
    NewRoom, NewTask, Room, RoomDeleteAction, RoomId, RoomMembers, RoomUpdate, Task, TaskFilter,
    TaskRoom, TaskStatus, TasksCreated, User,
};
