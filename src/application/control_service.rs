// Control service - Mock manual controls, acknowledged but never actuated
use crate::domain::control::{ControlCommand, ControlNotification};
use uuid::Uuid;

#[derive(Clone, Default)]
pub struct ControlService;

impl ControlService {
    pub fn new() -> Self {
        Self
    }

    pub fn issue(&self, session_id: Uuid, command: ControlCommand) -> ControlNotification {
        tracing::info!("Session {}: control command {}", session_id, command);

        ControlNotification {
            command,
            message: format!("Command sent: {}", command.label()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_returns_notification() {
        let notification = ControlService::new().issue(Uuid::new_v4(), ControlCommand::Descend);

        assert_eq!(notification.command, ControlCommand::Descend);
        assert_eq!(notification.message, "Command sent: Descend");
    }
}
