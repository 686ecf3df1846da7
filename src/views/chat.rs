//! Chat screen state
//!
//! The panel keeps an in-memory message list that always starts with a
//! fixed greeting. Sending a message appends it, persists the whole list,
//! produces an assistant reply, and persists again. The conversation list is
//! reloaded after every save and every delete.

use std::time::Duration;

use crate::api::types::ChatQueryRequest;
use crate::api::{CallsumApi, ChatMessage, ConversationListItem, Role, SaveConversationRequest};
use crate::config::{AssistantMode, Config};
use crate::error::{user_message, Result};

/// First message of every new conversation
pub const GREETING: &str = "Hi! I'm your Call Analysis Assistant. Ask me anything about the recent call summary, transcripts, or action items.";

/// Reply used while no real assistant is wired in
pub const PLACEHOLDER_REPLY: &str =
    "Thanks for your question! Detailed answers about your calls are coming soon.";

/// Title used when a conversation has no user message yet
pub const UNTITLED: &str = "New Conversation";

/// Longest title, in characters, before it is cut and suffixed with `...`
pub const TITLE_MAX_CHARS: usize = 50;

/// Derive a conversation title from its first user message.
///
/// # Examples
///
/// ```
/// use callsum::api::ChatMessage;
/// use callsum::views::chat::derive_title;
///
/// let short = vec![ChatMessage::user("What were the action items?")];
/// assert_eq!(derive_title(&short), "What were the action items?");
///
/// let long = vec![ChatMessage::user("a".repeat(60))];
/// assert_eq!(derive_title(&long), format!("{}...", "a".repeat(50)));
/// ```
pub fn derive_title(messages: &[ChatMessage]) -> String {
    let Some(first) = messages.iter().find(|m| m.role == Role::User) else {
        return UNTITLED.to_string();
    };
    if first.content.chars().count() > TITLE_MAX_CHARS {
        let cut: String = first.content.chars().take(TITLE_MAX_CHARS).collect();
        format!("{}...", cut)
    } else {
        first.content.clone()
    }
}

/// Tunables of the chat panel
#[derive(Debug, Clone, PartialEq)]
pub struct ChatSettings {
    /// Delay before the placeholder reply appears
    pub reply_delay: Duration,
    /// Where assistant replies come from
    pub assistant: AssistantMode,
    /// Backend model used in `backend` mode
    pub model_choice: String,
    /// Page size when reloading the conversation list
    pub history_limit: u32,
}

impl ChatSettings {
    /// Settings taken from the `chat` and `api` configuration sections
    pub fn from_config(config: &Config) -> Self {
        Self {
            reply_delay: Duration::from_millis(config.chat.reply_delay_ms),
            assistant: config.chat.assistant,
            model_choice: config.chat.model_choice.clone(),
            history_limit: config.api.history_limit,
        }
    }
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Chat view model
#[derive(Debug)]
pub struct ChatPanel {
    settings: ChatSettings,
    messages: Vec<ChatMessage>,
    conversation_id: Option<String>,
    conversations: Vec<ConversationListItem>,
    error: Option<String>,
}

impl ChatPanel {
    /// Create a panel holding only the greeting.
    pub fn new(settings: ChatSettings) -> Self {
        Self {
            settings,
            messages: vec![ChatMessage::assistant(GREETING)],
            conversation_id: None,
            conversations: Vec::new(),
            error: None,
        }
    }

    /// Messages of the open conversation, in order
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Id of the open conversation once it has been saved
    pub fn conversation_id(&self) -> Option<&str> {
        self.conversation_id.as_deref()
    }

    /// Saved conversations as last loaded
    pub fn conversations(&self) -> &[ConversationListItem] {
        &self.conversations
    }

    /// Inline error message, if the last action failed
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Start over with only the greeting.
    pub fn new_conversation(&mut self) {
        self.messages = vec![ChatMessage::assistant(GREETING)];
        self.conversation_id = None;
        self.error = None;
    }

    /// Send `text` as the user and produce the assistant reply.
    ///
    /// Blank input is ignored. The user message stays in the list even if
    /// saving it fails.
    ///
    /// # Errors
    ///
    /// Returns the classified API error of the first failed call; its
    /// message is also kept in [`error`](Self::error).
    pub async fn send(&mut self, api: &dyn CallsumApi, text: &str) -> Result<()> {
        if text.trim().is_empty() {
            return Ok(());
        }
        self.error = None;

        let history = self.messages.clone();
        self.messages.push(ChatMessage::user(text));
        self.persist(api).await?;

        let reply = match self.reply(api, text, history).await {
            Ok(reply) => reply,
            Err(e) => return Err(self.fail(e)),
        };
        self.messages.push(ChatMessage::assistant(reply));
        self.persist(api).await
    }

    async fn reply(
        &self,
        api: &dyn CallsumApi,
        question: &str,
        history: Vec<ChatMessage>,
    ) -> Result<String> {
        match self.settings.assistant {
            AssistantMode::Placeholder => {
                tokio::time::sleep(self.settings.reply_delay).await;
                Ok(PLACEHOLDER_REPLY.to_string())
            }
            AssistantMode::Backend => {
                let request = ChatQueryRequest {
                    question: question.to_string(),
                    chat_history: Some(history),
                    model_choice: Some(self.settings.model_choice.clone()),
                };
                let response = api.query_chat(&request).await?;
                tracing::debug!("Answer from {}", response.model_used);
                Ok(response.answer)
            }
        }
    }

    async fn persist(&mut self, api: &dyn CallsumApi) -> Result<()> {
        let request = SaveConversationRequest {
            title: derive_title(&self.messages),
            messages: self.messages.clone(),
        };
        match api.save_conversation(&request).await {
            Ok(saved) => {
                if saved.id.is_some() {
                    self.conversation_id = saved.id;
                }
                tracing::debug!(
                    "Saved conversation {:?} ({} messages)",
                    self.conversation_id,
                    self.messages.len()
                );
            }
            Err(e) => return Err(self.fail(e)),
        }
        self.reload_quietly(api).await;
        Ok(())
    }

    /// Reload the conversation list.
    ///
    /// # Errors
    ///
    /// Returns the classified API error; the previous list is kept.
    pub async fn refresh_conversations(&mut self, api: &dyn CallsumApi) -> Result<()> {
        self.error = None;
        match api
            .conversation_history(Some(self.settings.history_limit))
            .await
        {
            Ok(list) => {
                self.conversations = list;
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    async fn reload_quietly(&mut self, api: &dyn CallsumApi) {
        if let Err(e) = self.refresh_conversations(api).await {
            tracing::warn!("Failed to reload conversations: {}", e);
        }
    }

    /// Replace the open conversation with a saved one.
    ///
    /// # Errors
    ///
    /// Returns the classified API error; the open conversation is kept.
    pub async fn load_conversation(&mut self, api: &dyn CallsumApi, id: &str) -> Result<()> {
        self.error = None;
        match api.get_conversation(id).await {
            Ok(conversation) => {
                self.conversation_id = Some(conversation.id.unwrap_or_else(|| id.to_string()));
                self.messages = conversation.messages;
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Delete a saved conversation and reload the list.
    ///
    /// Deleting the open conversation resets the panel to the greeting.
    ///
    /// # Errors
    ///
    /// Returns the classified API error of the delete call.
    pub async fn delete_conversation(&mut self, api: &dyn CallsumApi, id: &str) -> Result<()> {
        self.error = None;
        if let Err(e) = api.delete_conversation(id).await {
            return Err(self.fail(e));
        }
        if self.conversation_id.as_deref() == Some(id) {
            self.new_conversation();
        }
        self.reload_quietly(api).await;
        Ok(())
    }

    fn fail(&mut self, error: anyhow::Error) -> anyhow::Error {
        self.error = Some(user_message(&error));
        error
    }
}

impl Default for ChatPanel {
    fn default() -> Self {
        Self::new(ChatSettings::default())
    }
}
