//! Small UI value types shared between app state and rendering

use std::time::Instant;

/// A temporary UI message shown in the status bar
#[derive(Debug, Clone)]
pub struct FlashMessage {
    pub text: String,
    pub is_error: bool,
    pub created: Instant,
}

impl FlashMessage {
    pub fn new(text: String, is_error: bool) -> Self {
        Self {
            text,
            is_error,
            created: Instant::now(),
        }
    }

    pub fn is_expired(&self, seconds: u64) -> bool {
        self.created.elapsed().as_secs() >= seconds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flash_not_expired_immediately() {
        let msg = FlashMessage::new("Added".to_string(), false);
        assert!(!msg.is_expired(3));
        assert!(msg.is_expired(0));
    }
}
