//! Bounded record of recently seen messages.
//!
//! The gateway's delete event carries only ids, so the author and text of a
//! deleted message must be remembered from when it was sent.

use std::{
    collections::{HashMap, VecDeque},
    sync::Mutex,
};

use warden_channels::DeletedMessage;

pub struct RecentMessages {
    capacity: usize,
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    order: VecDeque<u64>,
    messages: HashMap<u64, DeletedMessage>,
}

impl RecentMessages {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Remember `message` under its id, evicting the oldest beyond capacity.
    pub fn remember(&self, message_id: u64, message: DeletedMessage) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if inner.messages.insert(message_id, message).is_none() {
            inner.order.push_back(message_id);
        }
        while inner.order.len() > self.capacity {
            if let Some(oldest) = inner.order.pop_front() {
                inner.messages.remove(&oldest);
            }
        }
    }

    /// Track an edit so a later deletion shows the final text.
    pub fn edit(&self, message_id: u64, content: String) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(message) = inner.messages.get_mut(&message_id) {
            message.content = content;
        }
    }

    pub fn take(&self, message_id: u64) -> Option<DeletedMessage> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let message = inner.messages.remove(&message_id)?;
        inner.order.retain(|&id| id != message_id);
        Some(message)
    }

    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .messages
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
