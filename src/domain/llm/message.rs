use serde::{Deserialize, Serialize};

/// Role of a message in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// One part of a message's content.
///
/// Unknown tags deserialize to `Unsupported` and are dropped silently during
/// provider conversion. This is documented lossy behavior, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text {
        text: String,
    },
    Image {
        /// Base64 payload, with or without a `data:<mime>;base64,` prefix.
        data: String,
        media_type: String,
    },
    #[serde(other)]
    Unsupported,
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn image(data: impl Into<String>, media_type: impl Into<String>) -> Self {
        Self::Image {
            data: data.into(),
            media_type: media_type.into(),
        }
    }

    /// Image payload as media type plus raw base64.
    ///
    /// A `data:<mime>;base64,` prefix takes precedence over the declared
    /// media type; without the prefix the string is treated as raw base64.
    pub fn image_payload(&self) -> Option<(&str, &str)> {
        match self {
            Self::Image { data, media_type } => {
                let payload = strip_base64_data_url(data);
                let media = data_url_media_type(data).unwrap_or(media_type);
                Some((media, payload))
            }
            _ => None,
        }
    }
}

/// Strip a leading `data:<mime>;base64,` prefix if present; otherwise the
/// input is already raw base64. A missing prefix is never an error.
pub fn strip_base64_data_url(data: &str) -> &str {
    match data.split_once(";base64,") {
        Some((prefix, payload)) if prefix.starts_with("data:") => payload,
        _ => data,
    }
}

/// Media type declared by a `data:` URL prefix, if any.
pub fn data_url_media_type(data: &str) -> Option<&str> {
    let rest = data.strip_prefix("data:")?;
    let (media, _) = rest.split_once(";base64,")?;
    Some(media)
}

/// A message in a conversation, with ordered content parts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: Vec<ContentPart>,
}

impl Message {
    pub fn new(role: MessageRole, content: Vec<ContentPart>) -> Self {
        Self { role, content }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(MessageRole::User, vec![ContentPart::text(text)])
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, vec![ContentPart::text(text)])
    }

    pub fn user_with_parts(parts: Vec<ContentPart>) -> Self {
        Self::new(MessageRole::User, parts)
    }

    /// Concatenated text of all text parts, in order.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|p| match p {
                ContentPart::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_creation() {
        let msg = Message::user("Hello");
        assert_eq!(msg.role, MessageRole::User);
        assert_eq!(msg.text(), "Hello");
    }

    #[test]
    fn test_text_concatenates_parts_in_order() {
        let msg = Message::user_with_parts(vec![
            ContentPart::text("Hello"),
            ContentPart::image("abc123", "image/png"),
            ContentPart::text(" world"),
        ]);
        assert_eq!(msg.text(), "Hello world");
    }

    #[test]
    fn test_strip_data_url_prefix() {
        assert_eq!(
            strip_base64_data_url("data:image/png;base64,abc123"),
            "abc123"
        );
        assert_eq!(strip_base64_data_url("abc123"), "abc123");
    }

    #[test]
    fn test_strip_is_idempotent() {
        let stripped = strip_base64_data_url("data:image/png;base64,abc123");
        assert_eq!(strip_base64_data_url(stripped), stripped);
    }

    #[test]
    fn test_data_url_media_type() {
        assert_eq!(
            data_url_media_type("data:image/jpeg;base64,abc"),
            Some("image/jpeg")
        );
        assert_eq!(data_url_media_type("abc"), None);
    }

    #[test]
    fn test_image_payload_prefers_data_url_media_type() {
        let part = ContentPart::image("data:image/jpeg;base64,xyz", "image/png");
        assert_eq!(part.image_payload(), Some(("image/jpeg", "xyz")));

        let raw = ContentPart::image("xyz", "image/png");
        assert_eq!(raw.image_payload(), Some(("image/png", "xyz")));
    }

    #[test]
    fn test_unknown_part_tag_deserializes_to_unsupported() {
        let json = r#"{"role":"user","content":[
            {"type":"text","text":"Hello"},
            {"type":"audio","data":"zzz"}
        ]}"#;
        let msg: Message = serde_json::from_str(json).unwrap();
        assert_eq!(msg.content.len(), 2);
        assert_eq!(msg.content[1], ContentPart::Unsupported);
        assert_eq!(msg.text(), "Hello");
    }

    #[test]
    fn test_role_serialization() {
        let msg = Message::assistant("Hi");
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"role\":\"assistant\""));
    }
}
