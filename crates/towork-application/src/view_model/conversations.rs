//! Conversation inbox, thread view and background refresh.

use super::{ListState, record};
use crate::AppContext;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use towork_core::Result;
use towork_core::ai::SummaryResponse;
use towork_core::conversation::{ConversationMessage, ConversationSummary, OutgoingMessage};
use towork_core::session::SessionStore;
use towork_interaction::api::ConversationApi;
use tracing::{debug, info};

pub struct ConversationListViewModel {
    api: ConversationApi,
    pub state: ListState<ConversationSummary>,
}

impl ConversationListViewModel {
    pub fn new(api: ConversationApi) -> Self {
        Self {
            api,
            state: ListState::default(),
        }
    }

    pub fn from_context(context: &AppContext) -> Self {
        Self::new(context.api().conversations.clone())
    }

    pub async fn load(&mut self) -> Result<()> {
        self.state.begin();
        let result = self.api.list_mine().await;
        self.state
            .apply(result, "Impossible de charger les conversations")
    }
}

/// A message as the thread renders it.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageView {
    pub author: String,
    pub content: String,
    pub created_at: Option<String>,
    pub mine: bool,
    pub flagged: bool,
    pub flag_reason: Option<String>,
}

pub struct ConversationDetailViewModel {
    api: ConversationApi,
    session: Arc<SessionStore>,
    conversation_id: i64,
    pub messages: Vec<ConversationMessage>,
    pub summary: Option<SummaryResponse>,
    pub loading: bool,
    pub error: Option<String>,
    poller: Option<ConversationPoller>,
}

impl ConversationDetailViewModel {
    pub fn new(api: ConversationApi, session: Arc<SessionStore>, conversation_id: i64) -> Self {
        Self {
            api,
            session,
            conversation_id,
            messages: Vec::new(),
            summary: None,
            loading: false,
            error: None,
            poller: None,
        }
    }

    pub fn from_context(context: &AppContext, conversation_id: i64) -> Self {
        Self::new(
            context.api().conversations.clone(),
            context.session().clone(),
            conversation_id,
        )
    }

    pub fn conversation_id(&self) -> i64 {
        self.conversation_id
    }

    pub async fn load(&mut self) -> Result<()> {
        self.loading = true;
        let result = self.api.messages(self.conversation_id).await;
        self.loading = false;
        self.messages = record(&mut self.error, result, "Impossible de charger les messages")?;
        Ok(())
    }

    /// Posts a message. When the backend does not echo it back, the thread
    /// is reloaded instead.
    pub async fn send(&mut self, content: &str) -> Result<()> {
        let message = OutgoingMessage::new(content);
        let result = match message.validate() {
            Ok(()) => self.api.send(self.conversation_id, &message).await,
            Err(err) => Err(err),
        };
        match record(&mut self.error, result, "Impossible d'envoyer le message")? {
            Some(sent) => self.messages.push(sent),
            None => self.load().await?,
        }
        info!(conversation_id = self.conversation_id, "Message sent");
        Ok(())
    }

    /// Asks the backend for a summary of the thread.
    pub async fn summarize(&mut self, language: &str) -> Result<Option<&SummaryResponse>> {
        let result = self.api.summary(self.conversation_id, language).await;
        self.summary = record(&mut self.error, result, "Résumé indisponible")?;
        Ok(self.summary.as_ref())
    }

    pub fn views(&self) -> Vec<MessageView> {
        let state = self.session.snapshot();
        let user_id = state.user_id();
        self.messages
            .iter()
            .map(|message| MessageView {
                author: message.display_author(),
                content: message.content.clone(),
                created_at: message.created_at.clone(),
                mine: message.is_mine(user_id, state.role.as_ref()),
                flagged: message.is_flagged.unwrap_or(false),
                flag_reason: message.flag_reason.clone(),
            })
            .collect()
    }

    /// Starts refreshing the thread in the background. A previous poller is
    /// stopped first.
    pub fn start_polling(&mut self, interval: Duration) {
        self.poller = Some(ConversationPoller::spawn(
            self.api.clone(),
            self.conversation_id,
            interval,
        ));
    }

    pub fn stop_polling(&mut self) {
        self.poller = None;
    }

    pub fn is_polling(&self) -> bool {
        self.poller.as_ref().is_some_and(|p| !p.is_stopped())
    }

    /// Takes the newest polled thread, if one arrived since the last call.
    pub fn apply_polled(&mut self) -> bool {
        match self.poller.as_mut().and_then(ConversationPoller::latest) {
            Some(messages) => {
                self.messages = messages;
                true
            }
            None => false,
        }
    }

    /// Waits for the next polled thread and applies it.
    pub async fn next_poll(&mut self) -> bool {
        let Some(poller) = self.poller.as_mut() else {
            return false;
        };
        match poller.changed().await {
            Some(messages) => {
                self.messages = messages;
                true
            }
            None => false,
        }
    }
}

/// Re-fetches a conversation on a fixed interval until stopped or dropped.
pub struct ConversationPoller {
    token: CancellationToken,
    handle: JoinHandle<()>,
    updates: watch::Receiver<Option<Vec<ConversationMessage>>>,
}

impl ConversationPoller {
    /// Spawns the polling task on the current tokio runtime.
    ///
    /// # Arguments
    ///
    /// * `api` - Conversation client used for each fetch
    /// * `conversation_id` - Thread to refresh
    /// * `interval` - Delay between fetches; the first one is immediate
    pub fn spawn(api: ConversationApi, conversation_id: i64, interval: Duration) -> Self {
        let token = CancellationToken::new();
        let (tx, updates) = watch::channel(None);
        let cancelled = token.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = cancelled.cancelled() => break,
                    _ = ticker.tick() => {}
                }
                let fetched = tokio::select! {
                    _ = cancelled.cancelled() => break,
                    fetched = api.messages(conversation_id) => fetched,
                };
                match fetched {
                    Ok(messages) => {
                        if tx.send(Some(messages)).is_err() {
                            break;
                        }
                    }
                    Err(err) => debug!(conversation_id, error = %err, "Poll failed"),
                }
            }
            debug!(conversation_id, "Conversation poller stopped");
        });

        Self {
            token,
            handle,
            updates,
        }
    }

    /// The newest thread not yet seen by the caller.
    pub fn latest(&mut self) -> Option<Vec<ConversationMessage>> {
        if !self.updates.has_changed().unwrap_or(false) {
            return None;
        }
        self.updates.borrow_and_update().clone()
    }

    /// Waits for the next fetched thread; `None` once the poller stopped.
    pub async fn changed(&mut self) -> Option<Vec<ConversationMessage>> {
        self.updates.changed().await.ok()?;
        self.updates.borrow_and_update().clone()
    }

    pub fn stop(&self) {
        self.token.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.token.is_cancelled() || self.handle.is_finished()
    }
}

impl Drop for ConversationPoller {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
