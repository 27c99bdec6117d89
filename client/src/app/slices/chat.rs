//! # Chat Slice
//!
//! Conversations for the inbox and message history per peer. Messages are
//! kept sorted by `created_at` (id as tie-break) and never duplicated, so a
//! message that arrives both as a REST response and as a socket echo shows
//! up once.

use std::collections::HashMap;

use shared::{Conversation, ConversationResponse, LastMessage, Message, PageMeta};

use crate::app::state::RequestState;

#[derive(Debug, Clone, Default)]
pub struct ChatSlice {
    pub conversations: Vec<Conversation>,
    pub messages: HashMap<i64, Vec<Message>>,
    pub meta: HashMap<i64, PageMeta>,
    /// Peer whose conversation is on screen; its incoming messages do not
    /// count as unread.
    pub active_peer: Option<i64>,
    pub unread_count: u32,
    pub request: RequestState,
}

impl ChatSlice {
    pub fn set_conversations(&mut self, conversations: Vec<Conversation>) {
        self.conversations = conversations;
    }

    /// Page 1 replaces the history; later pages merge older messages in.
    pub fn set_conversation_page(&mut self, peer: i64, response: ConversationResponse) {
        let history = self.messages.entry(peer).or_default();
        if response.meta.page <= 1 {
            history.clear();
        }
        for message in response.messages {
            insert_sorted(history, message);
        }
        self.meta.insert(peer, response.meta);
    }

    /// Add one message, sent or received. `me` decides which side is the peer.
    /// Returns `false` for a duplicate.
    pub fn add_message(&mut self, me: Option<i64>, message: Message) -> bool {
        let peer = match me {
            Some(me) => message.peer_of(me),
            None => message.sender_id,
        };
        let incoming = me.is_some_and(|me| message.receiver_id == me);
        let counts_unread = incoming && self.active_peer != Some(peer) && message.read_at.is_none();

        let last = LastMessage {
            content: message.content.clone(),
            created_at: message.created_at,
            read: !counts_unread,
        };
        let summary = if incoming { message.sender.clone() } else { message.receiver.clone() };

        if !insert_sorted(self.messages.entry(peer).or_default(), message) {
            return false;
        }

        match self.conversations.iter_mut().position(|c| c.other_user.id == peer) {
            Some(pos) => {
                let mut conversation = self.conversations.remove(pos);
                conversation.last_message = Some(last);
                if counts_unread {
                    conversation.unread_count += 1;
                }
                self.conversations.insert(0, conversation);
            }
            None => {
                if let Some(other_user) = summary {
                    self.conversations.insert(
                        0,
                        Conversation {
                            id: peer,
                            other_user,
                            last_message: Some(last),
                            unread_count: u32::from(counts_unread),
                        },
                    );
                }
            }
        }
        if counts_unread {
            self.unread_count += 1;
        }
        true
    }

    /// Everything from `peer` has been read.
    pub fn mark_read(&mut self, peer: i64, now: chrono::DateTime<chrono::Utc>) {
        if let Some(conversation) = self.conversations.iter_mut().find(|c| c.other_user.id == peer) {
            self.unread_count = self.unread_count.saturating_sub(conversation.unread_count);
            conversation.unread_count = 0;
            if let Some(last) = conversation.last_message.as_mut() {
                last.read = true;
            }
        }
        if let Some(history) = self.messages.get_mut(&peer) {
            for message in history.iter_mut().filter(|m| m.sender_id == peer && m.read_at.is_none()) {
                message.read_at = Some(now);
            }
        }
    }

    pub fn set_unread(&mut self, count: u32) {
        self.unread_count = count;
    }

    pub fn open(&mut self, peer: Option<i64>) {
        self.active_peer = peer;
    }

    pub fn history(&self, peer: i64) -> &[Message] {
        self.messages.get(&peer).map(Vec::as_slice).unwrap_or(&[])
    }
}

fn insert_sorted(history: &mut Vec<Message>, message: Message) -> bool {
    if history.iter().any(|m| m.id == message.id) {
        return false;
    }
    let key = (message.created_at, message.id);
    let pos = history.partition_point(|m| (m.created_at, m.id) <= key);
    history.insert(pos, message);
    true
}
