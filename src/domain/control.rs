// Manual control commands (cosmetic, nothing is actuated)
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlCommand {
    Ascend,
    Descend,
    Forward,
    Reverse,
    Left,
    Right,
    Lights,
}

impl ControlCommand {
    pub const ALL: [ControlCommand; 7] = [
        ControlCommand::Ascend,
        ControlCommand::Descend,
        ControlCommand::Forward,
        ControlCommand::Reverse,
        ControlCommand::Left,
        ControlCommand::Right,
        ControlCommand::Lights,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ControlCommand::Ascend => "ascend",
            ControlCommand::Descend => "descend",
            ControlCommand::Forward => "forward",
            ControlCommand::Reverse => "reverse",
            ControlCommand::Left => "left",
            ControlCommand::Right => "right",
            ControlCommand::Lights => "lights",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ControlCommand::Ascend => "Ascend",
            ControlCommand::Descend => "Descend",
            ControlCommand::Forward => "Move Forward",
            ControlCommand::Reverse => "Move Reverse",
            ControlCommand::Left => "Turn Left",
            ControlCommand::Right => "Turn Right",
            ControlCommand::Lights => "Toggle Lights",
        }
    }
}

impl fmt::Display for ControlCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown control command: {0}")]
pub struct UnknownCommand(pub String);

impl FromStr for ControlCommand {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| UnknownCommand(s.to_string()))
    }
}

/// Acknowledgement shown to the operator after a button press.
#[derive(Debug, Clone, Serialize)]
pub struct ControlNotification {
    pub command: ControlCommand,
    pub message: String,
}
