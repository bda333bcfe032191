use serenity::builder::CreateMessage;
use serenity::http::Http;
use serenity::model::id::{ChannelId, MessageId};

/// Maximum characters per Discord message (2000 is the limit; we use 1950 for safety).
const CHUNK_MAX: usize = 1950;

/// Split `text` into chunks of at most [`CHUNK_MAX`] bytes, preferring
/// splits on newline/space boundaries to avoid cutting words mid-way.
///
/// The window end is aligned to a char boundary so multibyte replies never
/// split inside a character. A newline/space at index 0 is not a usable
/// split point; it would produce an empty chunk, which Discord rejects.
pub fn split_chunks(text: &str) -> Vec<String> {
    if text.len() <= CHUNK_MAX {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut remaining = text;

    while remaining.len() > CHUNK_MAX {
        let window_end = floor_char_boundary(remaining, CHUNK_MAX);
        let window = &remaining[..window_end];
        let split_at = window
            .rfind('\n')
            .filter(|&i| i > 0)
            .or_else(|| window.rfind(' ').filter(|&i| i > 0))
            .unwrap_or(window_end);

        chunks.push(remaining[..split_at].to_string());
        remaining = remaining[split_at..].trim_start();
    }

    if !remaining.is_empty() {
        chunks.push(remaining.to_string());
    }

    chunks
}

/// Largest index no greater than `max` that falls on a char boundary of `s`.
fn floor_char_boundary(s: &str, max: usize) -> usize {
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    end
}

/// Send `text` to `channel_id` in chunks.
///
/// The first chunk is posted as a reply to `reply_to` when given; any
/// overflow chunks are plain sends to the same channel.
pub async fn send_response(
    http: &Http,
    channel_id: ChannelId,
    text: &str,
    reply_to: Option<MessageId>,
) -> Result<(), serenity::Error> {
    let chunks = split_chunks(text);

    for (i, chunk) in chunks.iter().enumerate() {
        if i == 0 {
            let mut message = CreateMessage::new().content(chunk);
            if let Some(message_id) = reply_to {
                message = message.reference_message((channel_id, message_id));
            }
            channel_id.send_message(http, message).await?;
        } else {
            channel_id.say(http, chunk).await?;
        }
    }

    Ok(())
}
