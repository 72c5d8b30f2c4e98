//! Timing and motion configuration types

/// Stepper motion parameters shared by all three motors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StepperConfig {
    /// Half-steps per output shaft revolution (4096 for a 28BYJ-48)
    pub steps_per_revolution: u16,
    /// Hold time after each half-step in ms
    pub step_delay_ms: u32,
}

impl StepperConfig {
    pub const DEFAULT: Self = Self {
        steps_per_revolution: 4096,
        step_delay_ms: 3,
    };
}

impl Default for StepperConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Control loop pacing and status-write retry policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PollConfig {
    /// Pause after an iteration that found no pending command
    pub idle_pause_ms: u32,
    /// Pause after an iteration that serviced a pending command
    pub command_pause_ms: u32,
    /// Attempts at the section channel's `em_andamento` write
    pub status_write_attempts: u8,
    /// Wait after each failed section status write
    pub status_retry_backoff_ms: u32,
}

impl PollConfig {
    pub const DEFAULT: Self = Self {
        idle_pause_ms: 1000,
        command_pause_ms: 2000,
        status_write_attempts: 3,
        status_retry_backoff_ms: 1000,
    };

    /// Pause that follows an iteration
    pub fn pause_after(&self, serviced_command: bool) -> u32 {
        if serviced_command {
            self.command_pause_ms
        } else {
            self.idle_pause_ms
        }
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// UART link to the network bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkConfig {
    /// UART baud rate
    pub baudrate: u32,
    /// Timeout for one read exchange
    pub read_timeout_ms: u32,
    /// Timeout for one write exchange
    pub write_timeout_ms: u32,
}

impl LinkConfig {
    pub const DEFAULT: Self = Self {
        baudrate: 115_200,
        read_timeout_ms: 12_000,
        write_timeout_ms: 12_000,
    };
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
