//! One conversation: the message history plus the typing indicator.
//!
//! A send appends the user message, raises the typing flag, waits the think
//! delay, dispatches, waits a typing delay proportional to the reply length and
//! then appends the bot message. Observers follow along through [`ChatEvent`]s.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tracing::debug;

use crate::config::ChatConfig;
use crate::dispatcher::Dispatcher;
use crate::models::{Message, Severity};
use crate::store::MessageStore;

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub enum ChatEvent {
    TypingStarted,
    TypingStopped,
    MessageAppended(Message),
}

pub struct ChatSession {
    dispatcher: Arc<Dispatcher>,
    config: ChatConfig,
    store: MessageStore,
    typing: bool,
    events: broadcast::Sender<ChatEvent>,
}

impl ChatSession {
    /// Starts a session whose history already holds the bot greeting.
    pub fn new(dispatcher: Arc<Dispatcher>, config: ChatConfig) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let mut store = MessageStore::new();
        store.push(Message::bot(config.greeting.clone(), Severity::Info));

        Self {
            dispatcher,
            config,
            store,
            typing: false,
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChatEvent> {
        self.events.subscribe()
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    /// Sends one user message and returns the bot reply. Blank input is ignored.
    pub async fn send(&mut self, text: &str) -> Option<Message> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        self.append(Message::user(text));

        self.typing = true;
        self.emit(ChatEvent::TypingStarted);
        pause(self.config.think_delay_ms).await;

        let reply = self.dispatcher.dispatch(text).await;

        let typing_ms = self.typing_delay(reply.content.chars().count());
        debug!(typing_ms, severity = %reply.severity, "Reply ready");
        pause(typing_ms).await;

        let message = Message::from_reply(reply);
        self.append(message.clone());
        self.typing = false;
        self.emit(ChatEvent::TypingStopped);
        self.emit(ChatEvent::MessageAppended(message.clone()));

        Some(message)
    }

    /// Simulated typing time for a reply of `chars` characters, in milliseconds.
    pub fn typing_delay(&self, chars: usize) -> u64 {
        (chars as u64)
            .saturating_mul(self.config.typing_ms_per_char)
            .min(self.config.max_typing_delay_ms)
    }

    pub fn messages(&self) -> &[Message] {
        self.store.messages()
    }

    pub fn last(&self) -> Option<&Message> {
        self.store.last()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn is_typing(&self) -> bool {
        self.typing
    }

    fn append(&mut self, message: Message) {
        // user messages are announced immediately, bot messages after TypingStopped
        if message.is_user() {
            self.emit(ChatEvent::MessageAppended(message.clone()));
        }
        self.store.push(message);
    }

    fn emit(&self, event: ChatEvent) {
        // no receivers is fine
        let _ = self.events.send(event);
    }
}

async fn pause(ms: u64) {
    if ms > 0 {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}
