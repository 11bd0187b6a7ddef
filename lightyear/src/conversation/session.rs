use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use nanoid::nanoid;
use tokio::sync::{Mutex, RwLock};

use crate::config::SessionConfig;
use crate::conversation::Conversation;
use crate::error::{LightyearError, Result};
use crate::llm::LlmProvider;
use crate::models::{ChatTurn, UploadedDocument};
use crate::processing::TextExtractor;

pub type SessionId = String;

/// Ten years; longer TTLs are clamped.
const MAX_IDLE_TTL_SECS: u64 = 10 * 365 * 24 * 60 * 60;

#[derive(Debug, Default)]
struct SessionState {
    conversation: Conversation,
    /// Most recent extracted upload. Forwarded with every model call and
    /// reused as the user turn when a later send has no typed text.
    document_text: Option<String>,
}

/// Result of one completed send.
#[derive(Debug, Clone)]
pub struct SendOutcome {
    pub reply: ChatTurn,
    pub history: Vec<ChatTurn>,
}

/// One conversation plus the guard that serialises sends on it.
///
/// `in_flight` is held for a whole send, including the model call. `state`
/// is only locked for short reads and writes, so history stays readable
/// while a send is waiting on the model.
#[derive(Debug)]
pub struct ChatSession {
    id: SessionId,
    created_at: DateTime<Utc>,
    last_active_ms: AtomicI64,
    in_flight: Mutex<()>,
    state: Mutex<SessionState>,
}

impl ChatSession {
    pub fn new(id: SessionId) -> Self {
        let now = Utc::now();
        Self {
            id,
            created_at: now,
            last_active_ms: AtomicI64::new(now.timestamp_millis()),
            in_flight: Mutex::new(()),
            state: Mutex::new(SessionState::default()),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_active(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.last_active_ms.load(Ordering::Relaxed))
            .unwrap_or(self.created_at)
    }

    fn touch(&self) {
        self.last_active_ms
            .store(Utc::now().timestamp_millis(), Ordering::Relaxed);
    }

    /// Runs one user action: optional upload, assembly, model call, reply.
    ///
    /// Single-flight: if another send holds the session this fails with
    /// [`LightyearError::SessionBusy`] without touching state. Upload and
    /// empty-message rejections leave both history and the remembered
    /// document unchanged. Once the user turn is appended, an assistant turn
    /// always follows it.
    pub async fn send(
        &self,
        message: &str,
        upload: Option<UploadedDocument>,
        extractor: &TextExtractor,
        llm: &LlmProvider,
    ) -> Result<SendOutcome> {
        let _in_flight = self
            .in_flight
            .try_lock()
            .map_err(|_| LightyearError::SessionBusy)?;
        self.touch();

        let extracted = match upload {
            Some(document) => Some(extractor.extract(document).await?),
            None => None,
        };

        let (turns, document) = {
            let mut state = self.state.lock().await;
            let SessionState {
                conversation,
                document_text,
            } = &mut *state;

            let candidate = extracted.or_else(|| document_text.clone());
            conversation
                .append_user_turn(message, candidate.as_deref())
                .ok_or_else(|| LightyearError::Validation("Message cannot be empty".to_string()))?;
            *document_text = candidate;

            // A blank message already carries the document as its user turn.
            let typed = !message.trim().is_empty();
            let document = document_text.clone().filter(|_| typed);
            (conversation.turns().to_vec(), document)
        };

        let reply = match llm.reply(&turns, document.as_deref()).await {
            Ok(reply) => Some(reply),
            Err(e) => {
                tracing::warn!(session_id = %self.id, error = %e, "Model call failed, appending fallback reply");
                None
            }
        };

        let mut state = self.state.lock().await;
        let reply = state.conversation.append_reply(reply);
        self.touch();
        tracing::info!(session_id = %self.id, turns = state.conversation.len(), "Chat turn completed");

        Ok(SendOutcome {
            reply,
            history: state.conversation.turns().to_vec(),
        })
    }

    /// Snapshot of the conversation. Does not wait for an in-flight model call.
    pub async fn history(&self) -> Vec<ChatTurn> {
        self.touch();
        self.state.lock().await.conversation.turns().to_vec()
    }

    fn idle_since(&self, cutoff: DateTime<Utc>) -> bool {
        self.last_active() < cutoff
    }
}

/// In-memory registry of live chat sessions. Nothing is persisted.
///
/// Sessions idle for longer than the configured TTL are dropped by
/// [`SessionStore::sweep_idle`]; once `max_sessions` is reached, inserting a
/// new session evicts the least recently active one.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, Arc<ChatSession>>>>,
    max_sessions: usize,
    idle_ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(&SessionConfig::default())
    }
}

impl SessionStore {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            max_sessions: config.max_sessions.max(1),
            idle_ttl: Duration::seconds(config.idle_ttl_secs.min(MAX_IDLE_TTL_SECS) as i64),
        }
    }

    pub async fn create(&self) -> Arc<ChatSession> {
        let session = Arc::new(ChatSession::new(nanoid!()));
        let mut sessions = self.sessions.write().await;
        self.make_room(&mut sessions);
        sessions.insert(session.id.clone(), session.clone());
        session
    }

    pub async fn get(&self, id: &str) -> Option<Arc<ChatSession>> {
        self.sessions.read().await.get(id).cloned()
    }

    pub async fn get_or_create(&self, id: &str) -> Arc<ChatSession> {
        if let Some(session) = self.get(id).await {
            return session;
        }

        let mut sessions = self.sessions.write().await;
        if let Some(session) = sessions.get(id) {
            return session.clone();
        }
        self.make_room(&mut sessions);
        let session = Arc::new(ChatSession::new(id.to_string()));
        sessions.insert(id.to_string(), session.clone());
        session
    }

    pub async fn remove(&self, id: &str) -> bool {
        self.sessions.write().await.remove(id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Drops every session idle for longer than the TTL. Returns how many
    /// were removed.
    pub async fn sweep_idle(&self) -> usize {
        let cutoff = Utc::now() - self.idle_ttl;
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.idle_since(cutoff));
        let removed = before - sessions.len();
        if removed > 0 {
            tracing::warn!(removed, remaining = sessions.len(), "Evicted idle chat sessions");
        }
        removed
    }

    fn make_room(&self, sessions: &mut HashMap<SessionId, Arc<ChatSession>>) {
        while sessions.len() >= self.max_sessions {
            let Some(oldest) = sessions
                .values()
                .min_by_key(|session| session.last_active())
                .map(|session| session.id.clone())
            else {
                break;
            };
            sessions.remove(&oldest);
            tracing::warn!(
                session_id = %oldest,
                max_sessions = self.max_sessions,
                "Session limit reached, evicted least recently active session"
            );
        }
    }
}
