//! # Chat Endpoints
//!
//! REST half of messaging. Live delivery goes over the socket channel.

use shared::{
    Conversation, ConversationResponse, ConversationsResponse, Message, MessageEnvelope, PageQuery,
    SendMessageRequest, UnreadCountResponse,
};

use super::client::ApiClient;
use crate::core::error::ApiResult;

#[tracing::instrument(skip(client, request), fields(receiver_id = request.receiver_id))]
pub async fn send_message(client: &ApiClient, request: &SendMessageRequest) -> ApiResult<Message> {
    let envelope: MessageEnvelope = client.send_json(client.post("/chat/messages").json(request)).await?;
    tracing::debug!(message_id = envelope.message.id, "Message sent");
    Ok(envelope.message)
}

pub async fn get_conversation(
    client: &ApiClient,
    user_id: i64,
    page: &PageQuery,
) -> ApiResult<ConversationResponse> {
    client
        .send_json(client.get(&format!("/chat/conversations/{user_id}")).query(page))
        .await
}

pub async fn get_conversations(client: &ApiClient) -> ApiResult<Vec<Conversation>> {
    let response: ConversationsResponse = client.send_json(client.get("/chat/conversations")).await?;
    Ok(response.conversations)
}

pub async fn mark_conversation_read(client: &ApiClient, user_id: i64) -> ApiResult<()> {
    client
        .send_empty(client.post(&format!("/chat/conversations/{user_id}/read")))
        .await
}

pub async fn get_unread_count(client: &ApiClient) -> ApiResult<u32> {
    let response: UnreadCountResponse = client.send_json(client.get("/chat/unread")).await?;
    Ok(response.count)
}
