//! Actuator error types

use thiserror::Error;

/// Errors raised by the robot base while handling a command
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ActuatorError {
    /// Connection to the robot base failed or was lost
    #[error("connection lost to robot base")]
    ConnectionLost,
    /// The base rejected a command
    #[error("robot rejected {command}: {reason}")]
    CommandRejected { command: String, reason: String },
}

impl ActuatorError {
    pub fn rejected(command: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CommandRejected {
            command: command.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for actuator operations
pub type ActuatorResult<T> = Result<T, ActuatorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_message() {
        let err = ActuatorError::rejected("SETO", "motors disabled");
        assert!(err.to_string().contains("SETO"));
        assert!(err.to_string().contains("motors disabled"));
    }
}
