//! Message content categories and bodies.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Content category a channel can declare support for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageContentType {
    /// Unformatted text.
    PlainText,
    /// HTML markup.
    Html,
    /// A media attachment referenced by URL.
    Media,
    /// A provider-registered template with substitution parameters.
    Template,
    /// An ordered bundle of parts, each with its own content.
    Multipart,
    /// Raw bytes with an optional MIME type.
    Binary,
}

impl MessageContentType {
    /// Content type name as it appears in validation messages.
    pub const fn name(self) -> &'static str {
        match self {
            MessageContentType::PlainText => "PlainText",
            MessageContentType::Html => "Html",
            MessageContentType::Media => "Media",
            MessageContentType::Template => "Template",
            MessageContentType::Multipart => "Multipart",
            MessageContentType::Binary => "Binary",
        }
    }
}

impl fmt::Display for MessageContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The body of a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageContent {
    /// Unformatted text.
    PlainText { text: String },

    /// HTML markup.
    Html { html: String },

    /// A media attachment referenced by URL.
    Media {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        mime_type: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        caption: Option<String>,
    },

    /// A provider-registered template with substitution parameters.
    Template {
        template_id: String,
        #[serde(default, skip_serializing_if = "HashMap::is_empty")]
        parameters: HashMap<String, String>,
    },

    /// An ordered bundle of parts.
    Multipart { parts: Vec<MessageContent> },

    /// Raw bytes with an optional MIME type.
    Binary {
        data: Vec<u8>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        mime_type: Option<String>,
    },
}

impl MessageContent {
    /// Plain-text content.
    pub fn text(body: impl Into<String>) -> Self {
        Self::PlainText { text: body.into() }
    }

    /// HTML content.
    pub fn html(markup: impl Into<String>) -> Self {
        Self::Html {
            html: markup.into(),
        }
    }

    /// Media content referenced by URL.
    pub fn media(url: impl Into<String>) -> Self {
        Self::Media {
            url: url.into(),
            mime_type: None,
            caption: None,
        }
    }

    /// Template content with no parameters.
    pub fn template(template_id: impl Into<String>) -> Self {
        Self::Template {
            template_id: template_id.into(),
            parameters: HashMap::new(),
        }
    }

    /// The category this body belongs to.
    pub fn content_type(&self) -> MessageContentType {
        match self {
            MessageContent::PlainText { .. } => MessageContentType::PlainText,
            MessageContent::Html { .. } => MessageContentType::Html,
            MessageContent::Media { .. } => MessageContentType::Media,
            MessageContent::Template { .. } => MessageContentType::Template,
            MessageContent::Multipart { .. } => MessageContentType::Multipart,
            MessageContent::Binary { .. } => MessageContentType::Binary,
        }
    }

    /// The categories used by this body, including every nested part of a
    /// multipart bundle.
    pub fn content_types(&self) -> Vec<MessageContentType> {
        let mut types = vec![self.content_type()];
        if let MessageContent::Multipart { parts } = self {
            for part in parts {
                types.extend(part.content_types());
            }
        }
        types
    }
}
