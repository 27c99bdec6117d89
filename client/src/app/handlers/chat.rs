//! # Chat Actions
//!
//! REST side of messaging. Messages sent here appear in the conversation
//! once the server has stored them.

use shared::{Message, PageQuery, SendMessageRequest};

use crate::app::state::{AppState, RequestState};
use crate::app::Store;
use crate::core::error::ApiResult;

fn chat_request(state: &mut AppState) -> &mut RequestState {
    &mut state.chat.request
}

impl Store {
    pub async fn fetch_conversations(&self) -> ApiResult<()> {
        self.fetch(chat_request, "conversations", self.api().get_conversations(), |s, conversations| {
            s.chat.set_conversations(conversations)
        })
        .await
    }

    /// Open the conversation with `peer` and load one page of its history.
    pub async fn fetch_conversation(&self, peer: i64, page: PageQuery) -> ApiResult<()> {
        self.update(|s| s.chat.open(Some(peer)));
        self.fetch(
            chat_request,
            "conversation",
            self.api().get_conversation(peer, &page),
            move |s, response| s.chat.set_conversation_page(peer, response),
        )
        .await
    }

    pub fn close_conversation(&self) {
        self.update(|s| s.chat.open(None));
    }

    pub async fn send_message(&self, request: SendMessageRequest) -> ApiResult<Message> {
        let me = self.session().current().and_then(|s| s.user_id);
        self.mutate(chat_request, "send_message", self.api().send_message(&request), |s, message: Message| {
            s.chat.add_message(me, message.clone());
            message
        })
        .await
    }

    pub async fn mark_conversation_read(&self, peer: i64) -> ApiResult<()> {
        self.mutate(
            chat_request,
            "mark_conversation_read",
            self.api().mark_conversation_read(peer),
            move |s, ()| s.chat.mark_read(peer, chrono::Utc::now()),
        )
        .await
    }

    pub async fn fetch_unread_count(&self) -> ApiResult<()> {
        self.fetch(chat_request, "unread", self.api().get_unread_count(), |s, count| {
            s.chat.set_unread(count)
        })
        .await
    }
}
