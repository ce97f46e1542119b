// ============================================================================
// NOTIFICATION STATE - Notificaciones transitorias para el shell
// ============================================================================

use crate::state::reactivity::Observable;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
}

/// Última notificación emitida; el shell la consume y llama a clear()
#[derive(Clone)]
pub struct NotificationState {
    current: Observable<Option<Notification>>,
}

impl NotificationState {
    pub fn new() -> Self {
        Self {
            current: Observable::new(None),
        }
    }

    pub fn show(&self, message: impl Into<String>, severity: Severity) {
        let notification = Notification {
            message: message.into(),
            severity,
        };
        match severity {
            Severity::Error => log::error!("❌ {}", notification.message),
            Severity::Warning => log::warn!("⚠️ {}", notification.message),
            _ => log::info!("🔔 {}", notification.message),
        }
        self.current.set(Some(notification));
    }

    pub fn success(&self, message: impl Into<String>) {
        self.show(message, Severity::Success);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.show(message, Severity::Info);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.show(message, Severity::Warning);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.show(message, Severity::Error);
    }

    pub fn clear(&self) {
        self.current.set(None);
    }

    pub fn current(&self) -> Option<Notification> {
        self.current.snapshot()
    }

    pub fn subscribe(&self, callback: impl Fn() + 'static) {
        self.current.subscribe(callback);
    }
}

impl Default for NotificationState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warning_queda_disponible_para_el_shell() {
        let notifications = NotificationState::new();
        notifications.warning("No active orders to optimize!");

        let current = notifications.current().unwrap();
        assert_eq!(current.severity, Severity::Warning);
        assert_eq!(current.message, "No active orders to optimize!");

        notifications.clear();
        assert!(notifications.current().is_none());
    }
}
