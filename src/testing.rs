//! Test doubles shared by the unit tests

use async_trait::async_trait;
use std::sync::Mutex;

use crate::application::errors::BotError;
use crate::domain::traits::{BotInfo, Session};

/// In-memory session that records everything handlers do
#[derive(Default)]
pub struct MockSession {
    sent: Mutex<Vec<(String, String)>>,
    deleted: Mutex<Vec<(String, String)>>,
    activities: Mutex<Vec<String>>,
    fail_deletes: bool,
}

impl MockSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every delete fails as if the bot lacked the permission
    pub fn failing_deletes(mut self) -> Self {
        self.fail_deletes = true;
        self
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_texts(&self) -> Vec<String> {
        self.sent().into_iter().map(|(_, text)| text).collect()
    }

    pub fn deleted(&self) -> Vec<(String, String)> {
        self.deleted.lock().unwrap().clone()
    }

    pub fn activities(&self) -> Vec<String> {
        self.activities.lock().unwrap().clone()
    }
}

#[async_trait]
impl Session for MockSession {
    async fn send_message(&self, channel_id: &str, text: &str) -> Result<String, BotError> {
        let mut sent = self.sent.lock().unwrap();
        sent.push((channel_id.to_string(), text.to_string()));
        Ok(format!("sent-{}", sent.len()))
    }

    async fn delete_message(&self, channel_id: &str, message_id: &str) -> Result<(), BotError> {
        if self.fail_deletes {
            return Err(BotError::PermissionDenied("Missing Permissions".to_string()));
        }
        self.deleted
            .lock()
            .unwrap()
            .push((channel_id.to_string(), message_id.to_string()));
        Ok(())
    }

    async fn set_activity(&self, text: &str) -> Result<(), BotError> {
        self.activities.lock().unwrap().push(text.to_string());
        Ok(())
    }

    fn bot_info(&self) -> BotInfo {
        BotInfo {
            id: "0".to_string(),
            name: "guildkeeper".to_string(),
            tag: "guildkeeper#0000".to_string(),
        }
    }
}
