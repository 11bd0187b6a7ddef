use crate::llm::prompts::document_turn;
use crate::llm::{Content, UpstreamRole};
use crate::models::{ChatRole, ChatTurn};

/// Appended in place of a reply when the model call fails or returns nothing.
pub const FALLBACK_REPLY: &str = "Sorry, I couldn't generate a response.";

/// Maps an internal role to the label the upstream API expects. `None` means
/// the turn is not forwarded.
pub fn upstream_role(role: ChatRole) -> Option<UpstreamRole> {
    match role {
        ChatRole::User => Some(UpstreamRole::User),
        ChatRole::Assistant => Some(UpstreamRole::Model),
        ChatRole::System => None,
    }
}

/// Order-preserving conversion of chat turns into upstream `contents`.
pub fn upstream_contents(turns: &[ChatTurn]) -> Vec<Content> {
    turns
        .iter()
        .filter_map(|turn| {
            upstream_role(turn.role).map(|role| Content::text(role, turn.content.clone()))
        })
        .collect()
}

/// Ordered, append-only turn list for one conversation.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    turns: Vec<ChatTurn>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Appends the user's turn and returns it.
    ///
    /// A non-blank typed message wins (trimmed). Otherwise non-blank extracted
    /// text is wrapped as an uploaded document. With neither, nothing is
    /// appended and `None` is returned.
    pub fn append_user_turn(&mut self, typed: &str, extracted: Option<&str>) -> Option<ChatTurn> {
        let typed = typed.trim();
        let content = if !typed.is_empty() {
            typed.to_string()
        } else {
            document_turn(extracted.filter(|text| !text.trim().is_empty())?)
        };

        let turn = ChatTurn::user(content);
        self.turns.push(turn.clone());
        Some(turn)
    }

    /// Appends the model's reply, or [`FALLBACK_REPLY`] when there is none.
    pub fn append_reply(&mut self, reply: Option<String>) -> ChatTurn {
        let content = reply
            .filter(|text| !text.trim().is_empty())
            .unwrap_or_else(|| FALLBACK_REPLY.to_string());

        let turn = ChatTurn::assistant(content);
        self.turns.push(turn.clone());
        turn
    }
}
