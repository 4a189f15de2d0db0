//! Contains all database functions for social features: channel chat,
//! private messages, and presence queries.

use sqlx::PgPool;

use super::models::{ChatMessage, OnlineCharacter, PrivateMessage};
use crate::constants::{CHAT_PAGE_LIMIT, ONLINE_WINDOW_SECS};

const MAX_MESSAGE_LEN: usize = 500;

fn validate_body(body: &str) -> Result<&str, String> {
    let body = body.trim();
    if body.is_empty() {
        return Err("You cannot send an empty message.".to_string());
    }
    if body.len() > MAX_MESSAGE_LEN {
        return Err(format!(
            "Messages are limited to {} characters.",
            MAX_MESSAGE_LEN
        ));
    }
    Ok(body)
}

/// Resolves the channel a character is allowed to read/write. The guild
/// channel requires membership; its guild id becomes part of the key.
async fn resolve_channel(
    pool: &PgPool,
    character_id: i64,
    channel: &str,
) -> Result<Option<i64>, String> {
    match channel {
        "global" => Ok(None),
        "guild" => {
            let membership = super::guilds::get_membership(pool, character_id)
                .await
                .map_err(|e| e.to_string())?;
            match membership {
                Some((guild_id, _)) => Ok(Some(guild_id)),
                None => Err("You must be in a guild to use guild chat.".to_string()),
            }
        }
        other => Err(format!("'{}' is not a chat channel.", other)),
    }
}

/// Posts a message into a channel.
pub async fn post_message(
    pool: &PgPool,
    sender_id: i64,
    channel: &str,
    body: &str,
) -> Result<ChatMessage, String> {
    let body = validate_body(body)?;
    let guild_id = resolve_channel(pool, sender_id, channel).await?;

    sqlx::query_as::<_, ChatMessage>(
        "WITH inserted AS (
             INSERT INTO chat_messages (channel, guild_id, sender_id, body)
             VALUES ($1, $2, $3, $4) RETURNING *
         )
         SELECT i.*, c.name AS sender_name FROM inserted i
         JOIN characters c ON i.sender_id = c.character_id",
    )
    .bind(channel)
    .bind(guild_id)
    .bind(sender_id)
    .bind(body)
    .fetch_one(pool)
    .await
    .map_err(|_| "Failed to send your message.".to_string())
}

/// Fetches a window of channel messages after the `since` cursor (a
/// message id), oldest first. Clients poll with their last seen id.
pub async fn fetch_messages(
    pool: &PgPool,
    character_id: i64,
    channel: &str,
    since: Option<i64>,
) -> Result<Vec<ChatMessage>, String> {
    let guild_id = resolve_channel(pool, character_id, channel).await?;

    sqlx::query_as::<_, ChatMessage>(
        "SELECT m.*, c.name AS sender_name FROM chat_messages m
         JOIN characters c ON m.sender_id = c.character_id
         WHERE m.channel = $1 AND m.guild_id IS NOT DISTINCT FROM $2 AND m.message_id > $3
         ORDER BY m.message_id
         LIMIT $4",
    )
    .bind(channel)
    .bind(guild_id)
    .bind(since.unwrap_or(0))
    .bind(CHAT_PAGE_LIMIT)
    .fetch_all(pool)
    .await
    .map_err(|_| "Failed to load the chat.".to_string())
}

/// Sends a private message to another character.
pub async fn send_private(
    pool: &PgPool,
    sender_id: i64,
    recipient_id: i64,
    body: &str,
) -> Result<PrivateMessage, String> {
    let body = validate_body(body)?;
    if sender_id == recipient_id {
        return Err("You cannot message yourself.".to_string());
    }

    sqlx::query_as::<_, PrivateMessage>(
        "INSERT INTO private_messages (sender_id, recipient_id, body) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(sender_id)
    .bind(recipient_id)
    .bind(body)
    .fetch_one(pool)
    .await
    .map_err(|_| "That character does not exist.".to_string())
}

/// Both sides of a conversation after the cursor, oldest first.
pub async fn conversation(
    pool: &PgPool,
    character_id: i64,
    other_id: i64,
    since: Option<i64>,
) -> Result<Vec<PrivateMessage>, sqlx::Error> {
    sqlx::query_as::<_, PrivateMessage>(
        "SELECT * FROM private_messages
         WHERE ((sender_id = $1 AND recipient_id = $2) OR (sender_id = $2 AND recipient_id = $1))
           AND message_id > $3
         ORDER BY message_id
         LIMIT $4",
    )
    .bind(character_id)
    .bind(other_id)
    .bind(since.unwrap_or(0))
    .bind(CHAT_PAGE_LIMIT)
    .fetch_all(pool)
    .await
}

/// Marks everything the other character sent us as read.
pub async fn mark_conversation_read(
    pool: &PgPool,
    character_id: i64,
    other_id: i64,
) -> Result<u64, sqlx::Error> {
    let res = sqlx::query(
        "UPDATE private_messages SET read_at = NOW()
         WHERE recipient_id = $1 AND sender_id = $2 AND read_at IS NULL",
    )
    .bind(character_id)
    .bind(other_id)
    .execute(pool)
    .await?;
    Ok(res.rows_affected())
}

/// Count of unread private messages, for the client's badge.
pub async fn unread_count(pool: &PgPool, character_id: i64) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM private_messages WHERE recipient_id = $1 AND read_at IS NULL",
    )
    .bind(character_id)
    .fetch_one(pool)
    .await
}

/// Characters seen within the presence window, most recent first.
pub async fn online_characters(pool: &PgPool) -> Result<Vec<OnlineCharacter>, sqlx::Error> {
    sqlx::query_as::<_, OnlineCharacter>(
        "SELECT character_id, name, level, last_seen_at FROM characters
         WHERE last_seen_at > NOW() - make_interval(secs => $1)
         ORDER BY last_seen_at DESC",
    )
    .bind(ONLINE_WINDOW_SECS as f64)
    .fetch_all(pool)
    .await
}
