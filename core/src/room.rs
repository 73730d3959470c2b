//! Actions on a single room.
//!
//! Each action is one request through the client. A room without a
//! `room_id` fails with `NoRoomSet` before anything is sent.

use crate::client::ChatworkClient;
use crate::error::ApiError;
use crate::markup::{build_to_all, MentionStyle, MessageBuilder};
use crate::transport::Transport;
use crate::types::{
    MembersUpdate, Message, MessageCreated, Room, RoomId, RoomMembers, RoomUpdate, User,
};

impl Room {
    /// The room id, or `NoRoomSet`.
    pub fn id(&self) -> Result<u64, ApiError> {
        self.room_id.ok_or(ApiError::NoRoomSet)
    }

    /// Reload every field from the server.
    pub fn fetch<T: Transport>(&mut self, client: &ChatworkClient<T>) -> Result<&Room, ApiError> {
        let room_id = self.id()?;
        let mut fresh = client.room(room_id)?;
        fresh.room_id.get_or_insert(room_id);
        *self = fresh;
        Ok(&*self)
    }

    pub fn update_info<T: Transport>(
        &self,
        client: &ChatworkClient<T>,
        update: &RoomUpdate,
    ) -> Result<RoomId, ApiError> {
        client.update_room(self.id()?, update)
    }

    pub fn members<T: Transport>(&self, client: &ChatworkClient<T>) -> Result<Vec<User>, ApiError> {
        client.room_members(self.id()?)
    }

    pub fn update_members<T: Transport>(
        &self,
        client: &ChatworkClient<T>,
        members: &MembersUpdate,
    ) -> Result<RoomMembers, ApiError> {
        client.update_room_members(self.id()?, members)
    }

    pub fn messages<T: Transport>(
        &self,
        client: &ChatworkClient<T>,
        force: bool,
    ) -> Result<Vec<Message>, ApiError> {
        client.room_messages(self.id()?, force)
    }

    pub fn send_message<T: Transport>(
        &self,
        client: &ChatworkClient<T>,
        body: &str,
        self_unread: bool,
    ) -> Result<MessageCreated, ApiError> {
        client.create_message(self.id()?, body, self_unread)
    }

    /// Mention every user in `members`, then append `text`.
    pub fn send_message_to_list<T: Transport>(
        &self,
        client: &ChatworkClient<T>,
        members: &[User],
        text: &str,
        style: MentionStyle,
        self_unread: bool,
    ) -> Result<MessageCreated, ApiError> {
        let room_id = self.id()?;
        let mut builder = MessageBuilder::new();
        for member in members {
            builder.to(member, style)?;
        }
        builder.append(text);
        client.create_message(room_id, builder.as_str(), self_unread)
    }

    /// Broadcast to the whole room, prefixed with `[toall]` when `mention`.
    pub fn send_message_to_all<T: Transport>(
        &self,
        client: &ChatworkClient<T>,
        text: &str,
        mention: bool,
        self_unread: bool,
    ) -> Result<MessageCreated, ApiError> {
        let room_id = self.id()?;
        client.create_message(room_id, &build_to_all(text, mention), self_unread)
    }

    /// Reply to one or more messages of this room in a single message.
    pub fn reply<T: Transport>(
        &self,
        client: &ChatworkClient<T>,
        messages: &[Message],
        text: &str,
        new_line: bool,
        self_unread: bool,
    ) -> Result<MessageCreated, ApiError> {
        let room_id = self.id()?;
        let mut builder = MessageBuilder::new();
        for message in messages {
            builder.reply(room_id, message, new_line)?;
        }
        builder.append(text);
        client.create_message(room_id, builder.as_str(), self_unread)
    }
}
