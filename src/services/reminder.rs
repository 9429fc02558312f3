//! One-shot shopping reminder via desktop notifications.

use anyhow::{Context, Result};
use std::cell::Cell;
use std::time::Duration;
use thiserror::Error;

pub const REMINDER_DELAY: Duration = Duration::from_secs(5);
pub const REMINDER_TITLE: &str = "🛒 Shopping Reminder!";
pub const REMINDER_BODY: &str = "Don't forget to pick up groceries.";
/// freedesktop sound theme name played with the reminder
pub const REMINDER_SOUND: &str = "message-new-instant";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReminderError {
    #[error(
        "Please enable notifications (notifications_enabled = true in config.toml) and make sure a notification service is running."
    )]
    PermissionDenied,
    #[error("Could not schedule the reminder: {0}")]
    ScheduleFailed(String),
}

impl ReminderError {
    pub fn title(&self) -> &'static str {
        match self {
            ReminderError::PermissionDenied => "Permissions Required",
            ReminderError::ScheduleFailed(_) => "Reminder Error",
        }
    }
}

pub trait Notifier {
    /// Ask whether notifications may be shown. Repeated calls give the same answer.
    fn request_permission(&self) -> Permission;
    /// Show one notification after `delay`
    fn schedule(&self, delay: Duration, title: &str, body: &str) -> Result<()>;
}

/// Notifications through the desktop notification service (`notify-rust`)
pub struct DesktopNotifier {
    enabled: bool,
    permission: Cell<Option<Permission>>,
}

impl DesktopNotifier {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            permission: Cell::new(None),
        }
    }

    fn check_permission(&self) -> Permission {
        if self.enabled && notification_server_available() {
            Permission::Granted
        } else {
            Permission::Denied
        }
    }
}

#[cfg(all(unix, not(target_os = "macos")))]
fn notification_server_available() -> bool {
    match notify_rust::get_server_information() {
        Ok(info) => {
            tracing::debug!(server = %info.name, "notification server found");
            true
        }
        Err(e) => {
            tracing::warn!("No notification server available: {}", e);
            false
        }
    }
}

#[cfg(not(all(unix, not(target_os = "macos"))))]
fn notification_server_available() -> bool {
    true
}

impl Notifier for DesktopNotifier {
    fn request_permission(&self) -> Permission {
        if let Some(permission) = self.permission.get() {
            return permission;
        }
        let permission = self.check_permission();
        self.permission.set(Some(permission));
        permission
    }

    fn schedule(&self, delay: Duration, title: &str, body: &str) -> Result<()> {
        let title = title.to_string();
        let body = body.to_string();

        std::thread::Builder::new()
            .name("basket-reminder".to_string())
            .spawn(move || {
                std::thread::sleep(delay);
                let shown = build_notification(&title, &body).show();
                match shown {
                    Ok(_) => tracing::info!("reminder shown"),
                    Err(e) => tracing::error!("Failed to show reminder: {}", e),
                }
            })
            .context("Failed to spawn reminder thread")?;

        Ok(())
    }
}

fn build_notification(title: &str, body: &str) -> notify_rust::Notification {
    let mut notification = notify_rust::Notification::new();
    notification
        .appname("basket")
        .summary(title)
        .body(body)
        .sound_name(REMINDER_SOUND);
    notification
}

/// Schedule the fixed shopping reminder if notifications are allowed
pub fn schedule_reminder(notifier: &dyn Notifier) -> Result<(), ReminderError> {
    if notifier.request_permission() != Permission::Granted {
        return Err(ReminderError::PermissionDenied);
    }

    notifier
        .schedule(REMINDER_DELAY, REMINDER_TITLE, REMINDER_BODY)
        .map_err(|e| {
            tracing::error!("Failed to schedule reminder: {:#}", e);
            ReminderError::ScheduleFailed(format!("{:#}", e))
        })?;

    tracing::info!(delay_secs = REMINDER_DELAY.as_secs(), "reminder scheduled");
    Ok(())
}

/// Message shown after a successful schedule
pub fn scheduled_message() -> String {
    format!("You will be reminded in {} seconds.", REMINDER_DELAY.as_secs())
}
