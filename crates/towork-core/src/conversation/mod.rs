//! Conversations and direct messages.

mod model;

pub use model::{
    ConversationMessage, ConversationSummary, DirectMessage, NewDirectMessage, OutgoingMessage,
    UserRef,
};
