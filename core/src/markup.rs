//! Chatwork message markup: mentions, replies and `[toall]`.

use crate::error::ApiError;
use crate::types::{Message, User};

/// How a `[To:...]` mention is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MentionStyle {
    /// Follow the tag with the member's name.
    pub with_name: bool,
    /// End the mention with a line break.
    pub new_line: bool,
    /// Show the member's avatar instead of the name.
    pub use_picon: bool,
}

impl Default for MentionStyle {
    fn default() -> Self {
        Self {
            with_name: true,
            new_line: true,
            use_picon: false,
        }
    }
}

/// `[To:{account_id}]` followed by the name or avatar.
pub fn build_to(user: &User, style: MentionStyle) -> Result<String, ApiError> {
    let account_id = user
        .account_id
        .ok_or_else(|| ApiError::InvalidMessage("mention target has no account_id".to_string()))?;

    let mut out = format!("[To:{account_id}]");
    if style.use_picon {
        out.push_str(&format!(" [picon:{account_id}]"));
    } else if style.with_name {
        if let Some(name) = user.name.as_deref().filter(|n| !n.is_empty()) {
            out.push(' ');
            out.push_str(name);
        }
    }
    if style.new_line {
        out.push('\n');
    }
    Ok(out)
}

/// `[rp aid={author} to={room_id}-{message_id}]` followed by the author's name.
pub fn build_reply(room_id: u64, message: &Message, new_line: bool) -> Result<String, ApiError> {
    let message_id = message
        .message_id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::InvalidMessage("reply target has no message_id".to_string()))?;
    let account_id = message
        .author_id()
        .ok_or_else(|| ApiError::InvalidMessage("reply target has no author".to_string()))?;

    let mut out = format!("[rp aid={account_id} to={room_id}-{message_id}]");
    if let Some(name) = message
        .account
        .as_ref()
        .and_then(|a| a.name.as_deref())
        .filter(|n| !n.is_empty())
    {
        out.push(' ');
        out.push_str(name);
    }
    if new_line {
        out.push('\n');
    }
    Ok(out)
}

pub fn build_to_all(text: &str, mention: bool) -> String {
    if mention {
        format!("[toall]\n{text}")
    } else {
        text.to_string()
    }
}

/// Accumulates a message body piece by piece.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageBuilder {
    text: String,
}

impl MessageBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn to(&mut self, user: &User, style: MentionStyle) -> Result<&mut Self, ApiError> {
        let mention = build_to(user, style)?;
        self.text.push_str(&mention);
        Ok(self)
    }

    pub fn reply(
        &mut self,
        room_id: u64,
        message: &Message,
        new_line: bool,
    ) -> Result<&mut Self, ApiError> {
        let reply = build_reply(room_id, message, new_line)?;
        self.text.push_str(&reply);
        Ok(self)
    }

    pub fn append(&mut self, text: &str) -> &mut Self {
        self.text.push_str(text);
        self
    }

    pub fn reset(&mut self) -> &mut Self {
        self.text.clear();
        self
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn build(&self) -> String {
        self.text.clone()
    }
}
