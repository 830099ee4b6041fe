//! Operator commands from the chat gateway.
//!
//! The poller asks the gateway for every message after the cursor,
//! advances the cursor past each one before acting on it, and answers the
//! commands it recognises. Anything else is dropped silently.

use log::{debug, info, warn};

use super::events::AppEvent;
use super::platform::{NodeIo, Platform};
use super::ports::ChatPort;
use super::status::StatusReport;
use super::weather::WeatherSnapshot;

/// Commands the node answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatCommand {
    /// Reply with the composite status report.
    Status,
}

impl ChatCommand {
    /// Parse message text. Surrounding whitespace and a `@botname` suffix
    /// (group chats) are ignored.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let command = text.split_once('@').map_or(text, |(cmd, _)| cmd);
        match command {
            "/status" => Some(Self::Status),
            _ => None,
        }
    }
}

/// One update from the gateway. `text` is absent for stickers, joins and
/// other non-text updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub update_id: i64,
    pub text: Option<String>,
}

pub struct CommandPoller {
    tank_height_cm: f32,
}

impl CommandPoller {
    pub fn new(tank_height_cm: f32) -> Self {
        Self { tank_height_cm }
    }

    /// One poll round. `cursor` is the last processed update id; it only
    /// ever moves forward. Returns the number of replies sent.
    pub fn poll<P: Platform>(
        &mut self,
        cursor: &mut i64,
        weather: Option<&WeatherSnapshot>,
        io: &mut NodeIo<P>,
    ) -> usize {
        let offset = cursor.saturating_add(1);
        let messages = match io.chat.fetch_messages(offset) {
            Ok(messages) => messages,
            Err(e) => {
                warn!("Commands: poll failed: {}", e);
                return 0;
            }
        };

        let mut replies = 0;
        for message in messages {
            if message.update_id <= *cursor {
                debug!("Commands: skipping already processed update {}", message.update_id);
                continue;
            }
            *cursor = message.update_id;

            let Some(command) = message.text.as_deref().and_then(ChatCommand::parse) else {
                debug!("Commands: ignoring update {}", message.update_id);
                continue;
            };

            info!("Commands: {:?} (update {})", command, message.update_id);
            io.emit(&AppEvent::CommandReceived {
                update_id: message.update_id,
                command,
            });

            match command {
                ChatCommand::Status => {
                    let report =
                        StatusReport::collect(&mut io.sensors, weather, self.tank_height_cm);
                    if io.notify(&report.to_chat_text()) {
                        replies += 1;
                    }
                }
            }
        }
        replies
    }
}
