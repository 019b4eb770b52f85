//! One chat widget implementation for every assistant panel, parameterised by a response
//! strategy and an optional context label.
use crate::domain::models::{ChatMessage, Sender};
use crate::services::latency::{DelayWindow, Pacer};
use crate::services::responder::{AssistantKind, ResponseStrategy};
use crate::state::WorkspaceHandle;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ChatError {
    #[error("chat widget not found")]
    NotFound,
    #[error("message is empty")]
    Empty,
}

pub struct ChatWidget {
    id: Uuid,
    kind: AssistantKind,
    context: Option<String>,
    strategy: Arc<dyn ResponseStrategy>,
    messages: Vec<ChatMessage>,
    pending: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatTranscript {
    pub id: Uuid,
    pub assistant: AssistantKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    pub messages: Vec<ChatMessage>,
    pub typing: bool,
    pub suggestions: Vec<&'static str>,
}

impl ChatWidget {
    /// Opens with the strategy's greeting as the first message.
    pub fn open(
        kind: AssistantKind,
        strategy: Arc<dyn ResponseStrategy>,
        context: Option<String>,
    ) -> Self {
        let greeting = ChatMessage::new(
            strategy.greeting(context.as_deref()),
            Sender::Ai,
            context.as_deref(),
        );
        Self {
            id: Uuid::new_v4(),
            kind,
            context,
            strategy,
            messages: vec![greeting],
            pending: 0,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_typing(&self) -> bool {
        self.pending > 0
    }

    /// Appends the user's turn and marks a reply as pending.
    pub fn submit(&mut self, text: &str) -> Result<ChatMessage, ChatError> {
        if text.trim().is_empty() {
            return Err(ChatError::Empty);
        }
        let message = ChatMessage::new(text, Sender::User, self.context.as_deref());
        self.messages.push(message.clone());
        self.pending += 1;
        Ok(message)
    }

    /// Appends a reply whose delay has elapsed. Replies land in completion order.
    pub fn deliver(&mut self, reply: String) -> ChatMessage {
        let message = ChatMessage::new(reply, Sender::Ai, self.context.as_deref());
        self.messages.push(message.clone());
        self.pending = self.pending.saturating_sub(1);
        message
    }

    pub fn transcript(&self) -> ChatTranscript {
        let suggestions = if self.messages.len() == 1 {
            self.strategy.suggestions().to_vec()
        } else {
            Vec::new()
        };
        ChatTranscript {
            id: self.id,
            assistant: self.kind,
            context: self.context.clone(),
            messages: self.messages().to_vec(),
            typing: self.is_typing(),
            suggestions,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Exchange {
    pub user: ChatMessage,
    /// `None` when the widget was closed before the reply was ready.
    pub reply: Option<ChatMessage>,
}

/// Sends one message and waits out the "thinking" delay before appending the reply.
///
/// The workspace lock is released during the delay, so overlapping sends on one widget
/// each append their own reply whenever their timer fires. The reply is delivered from its
/// own task and still lands if the caller stops waiting.
pub async fn send_message(
    workspace: &WorkspaceHandle,
    pacer: &Arc<dyn Pacer>,
    widget_id: Uuid,
    text: &str,
) -> Result<Exchange, ChatError> {
    let (user, strategy, context) = {
        let mut ws = workspace.lock().await;
        let widget = ws.chats.get_mut(&widget_id).ok_or(ChatError::NotFound)?;
        let user = widget.submit(text)?;
        (user, widget.strategy.clone(), widget.context.clone())
    };

    let (workspace, pacer, prompt) = (workspace.clone(), pacer.clone(), text.to_string());
    let delivery = tokio::spawn(async move {
        pacer.pause(DelayWindow::CHAT_REPLY).await;
        let reply = strategy.respond(&prompt, context.as_deref());

        let mut ws = workspace.lock().await;
        match ws.chats.get_mut(&widget_id) {
            Some(widget) => Some(widget.deliver(reply)),
            None => {
                tracing::debug!("Chat widget {} closed before reply, discarding", widget_id);
                None
            }
        }
    });

    let reply = delivery.await.unwrap_or_else(|e| {
        tracing::error!("Chat reply task for {} failed: {}", widget_id, e);
        None
    });
    Ok(Exchange { user, reply })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::PhaseCatalog;
    use crate::services::latency::{InstantPacer, ScriptedPacer};
    use crate::state::Workspace;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Mutex;

    fn instant() -> Arc<dyn Pacer> {
        Arc::new(InstantPacer)
    }

    async fn workspace_with(w: ChatWidget) -> (WorkspaceHandle, Uuid) {
        let handle: WorkspaceHandle = Arc::new(Mutex::new(Workspace::new()));
        let id = w.id();
        handle.lock().await.chats.insert(id, w);
        (handle, id)
    }

    fn widget(kind: AssistantKind, context: Option<&str>) -> ChatWidget {
        ChatWidget::open(
            kind,
            kind.strategy(PhaseCatalog::global()),
            context.map(str::to_string),
        )
    }

    #[test]
    fn test_open_greets_with_context() {
        let w = widget(AssistantKind::Platform, Some("Due Diligence"));
        assert_eq!(w.messages().len(), 1);
        assert_eq!(w.messages()[0].sender, Sender::Ai);
        assert!(w.messages()[0].message.contains("Due Diligence phase"));
        assert!(!w.is_typing());
    }

    #[test]
    fn test_submit_rejects_blank() {
        let mut w = widget(AssistantKind::Platform, None);
        assert_eq!(w.submit("   ").unwrap_err(), ChatError::Empty);
        assert_eq!(w.messages().len(), 1);
    }

    #[test]
    fn test_pending_replies_tracked() {
        let mut w = widget(AssistantKind::Platform, None);
        w.submit("one").unwrap();
        w.submit("two").unwrap();
        assert!(w.is_typing());
        w.deliver("reply".to_string());
        assert!(w.is_typing());
        w.deliver("reply".to_string());
        assert!(!w.is_typing());
        assert_eq!(w.messages().len(), 5);
    }

    #[test]
    fn test_suggestions_only_before_first_turn() {
        let mut w = widget(AssistantKind::Knowledge, None);
        assert_eq!(w.transcript().suggestions.len(), 3);
        w.submit("Knowledge base summary").unwrap();
        assert!(w.transcript().suggestions.is_empty());
    }

    #[tokio::test]
    async fn test_send_message_round_trip() {
        let (handle, id) = workspace_with(widget(AssistantKind::Platform, None)).await;

        let exchange = send_message(&handle, &instant(), id, "What is the progress?")
            .await
            .unwrap();
        assert_eq!(exchange.user.sender, Sender::User);
        let reply = exchange.reply.unwrap();
        assert!(reply.message.contains("65%"));

        let ws = handle.lock().await;
        let transcript = ws.chats[&id].transcript();
        assert_eq!(transcript.messages.len(), 3);
        assert!(!transcript.typing);
    }

    #[tokio::test]
    async fn test_reply_discarded_after_close() {
        let (handle, id) = workspace_with(widget(AssistantKind::Platform, None)).await;

        let sender = {
            let handle = handle.clone();
            tokio::spawn(async move { send_message(&handle, &instant(), id, "help").await })
        };
        // close as soon as the user turn is recorded
        loop {
            let mut ws = handle.lock().await;
            if ws.chats[&id].is_typing() {
                ws.chats.remove(&id);
                break;
            }
            drop(ws);
            tokio::task::yield_now().await;
        }

        let exchange = sender.await.unwrap().unwrap();
        assert!(exchange.reply.is_none());
    }

    #[tokio::test]
    async fn test_unknown_widget() {
        let handle: WorkspaceHandle = Arc::new(Mutex::new(Workspace::new()));
        let err = send_message(&handle, &instant(), Uuid::new_v4(), "hi")
            .await
            .unwrap_err();
        assert_eq!(err, ChatError::NotFound);
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_sends_reply_in_timer_order() {
        let (handle, id) = workspace_with(widget(AssistantKind::Platform, None)).await;
        let scripted = Arc::new(ScriptedPacer::new(&[3000, 1000]));
        let pacer: Arc<dyn Pacer> = scripted.clone();

        let first = {
            let (handle, pacer) = (handle.clone(), pacer.clone());
            tokio::spawn(async move {
                send_message(&handle, &pacer, id, "What is the progress?").await
            })
        };
        while scripted.remaining() > 1 {
            tokio::task::yield_now().await;
        }
        let second = {
            let (handle, pacer) = (handle.clone(), pacer.clone());
            tokio::spawn(async move { send_message(&handle, &pacer, id, "xyz").await })
        };

        tokio::time::sleep(Duration::from_millis(1500)).await;
        {
            let ws = handle.lock().await;
            let transcript = ws.chats[&id].transcript();
            assert_eq!(transcript.messages.len(), 4);
            assert!(transcript.typing);
            assert!(transcript.messages[3]
                .message
                .starts_with("I understand you're asking about"));
        }

        let first = first.await.unwrap().unwrap();
        let second = second.await.unwrap().unwrap();
        assert!(first.reply.unwrap().message.contains("65%"));
        assert!(second.reply.is_some());

        let ws = handle.lock().await;
        let transcript = ws.chats[&id].transcript();
        let senders: Vec<Sender> = transcript.messages.iter().map(|m| m.sender).collect();
        assert_eq!(
            senders,
            vec![Sender::Ai, Sender::User, Sender::User, Sender::Ai, Sender::Ai]
        );
        assert_eq!(transcript.messages[1].message, "What is the progress?");
        assert_eq!(transcript.messages[2].message, "xyz");
        assert!(transcript.messages[4].message.contains("65%"));
        assert!(!transcript.typing);
    }

    #[tokio::test(start_paused = true)]
    async fn test_abandoned_send_still_delivers() {
        let (handle, id) = workspace_with(widget(AssistantKind::Platform, None)).await;
        let pacer: Arc<dyn Pacer> = Arc::new(ScriptedPacer::new(&[2000]));

        let request = {
            let handle = handle.clone();
            tokio::spawn(async move { send_message(&handle, &pacer, id, "help").await })
        };
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.lock().await.chats[&id].is_typing());

        request.abort();
        tokio::time::sleep(Duration::from_secs(10)).await;

        let ws = handle.lock().await;
        let transcript = ws.chats[&id].transcript();
        assert!(!transcript.typing);
        assert_eq!(transcript.messages.len(), 3);
        assert_eq!(transcript.messages[2].sender, Sender::Ai);
    }
}
