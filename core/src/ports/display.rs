//! Status display port (interface).

/// Port for operator-facing status lines.
///
/// Kept apart from diagnostic logging: these are the lines a person standing
/// at the gate (or watching the console) reads.
pub trait StatusDisplayPort: Send + Sync {
    /// Show one line of status text.
    fn show(&self, line: &str);
}
