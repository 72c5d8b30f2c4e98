//! Command status values

/// Lifecycle state of a remote command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandStatus {
    /// `pendente`: published, waiting for the controller
    Pending,
    /// `em_andamento`: picked up, motors may be turning
    InProgress,
    /// `concluido`: done
    Completed,
    /// `erro`: rejected
    Failed,
}

impl CommandStatus {
    /// Parse the wire spelling
    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "pendente" => Some(CommandStatus::Pending),
            "em_andamento" => Some(CommandStatus::InProgress),
            "concluido" => Some(CommandStatus::Completed),
            "erro" => Some(CommandStatus::Failed),
            _ => None,
        }
    }

    /// Wire spelling
    pub const fn as_wire(self) -> &'static str {
        match self {
            CommandStatus::Pending => "pendente",
            CommandStatus::InProgress => "em_andamento",
            CommandStatus::Completed => "concluido",
            CommandStatus::Failed => "erro",
        }
    }

    /// Status as a bare JSON string literal, ready to write
    pub const fn json(self) -> &'static str {
        match self {
            CommandStatus::Pending => "\"pendente\"",
            CommandStatus::InProgress => "\"em_andamento\"",
            CommandStatus::Completed => "\"concluido\"",
            CommandStatus::Failed => "\"erro\"",
        }
    }

    /// Check if the command still waits for the controller
    pub fn is_pending(self) -> bool {
        self == CommandStatus::Pending
    }
}
