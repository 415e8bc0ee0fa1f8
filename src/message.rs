//! Conversation turns

use std::fmt;
use serde::{Deserialize, Serialize};
use crate::content::Contents;

/// Speaker of a message turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role
{   User
  , Assistant
}

impl Role
{   /// Wire name of the role
    pub fn as_str(&self) -> &'static str
    {   match self
        {   Role::User => "user"
          , Role::Assistant => "assistant"
        }
    }
}

impl fmt::Display for Role
{   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {   f.write_str(self.as_str())
    }
}

/// One turn of the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message
{   /// Speaker
    role: Role
  , /// Blocks of this turn, in order
    content: Contents
}

impl Message
{   pub fn new(role: Role, content: impl Into<Contents>) -> Self
    {   Message
        {   role
          , content: content.into()
        }
    }

    pub fn user(content: impl Into<Contents>) -> Self
    {   Message::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<Contents>) -> Self
    {   Message::new(Role::Assistant, content)
    }

    pub fn role(&self) -> Role
    {   self.role
    }

    pub fn content(&self) -> &Contents
    {   &self.content
    }
}

/// Request metadata. `user_id` should be an opaque id (uuid, hash), never
/// a name, email or phone number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Metadata
{   /// Opaque end-user id
    user_id: String
}

impl Metadata
{   pub fn new(user_id: impl Into<String>) -> Self
    {   Metadata { user_id: user_id.into() }
    }

    pub fn user_id(&self) -> &str
    {   &self.user_id
    }
}
