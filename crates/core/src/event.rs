/// Everything the session loop reacts to.
///
/// Sources:
/// - layer-shell configure  → `Configure`
/// - standard input         → `InputLine`
/// - `wl_buffer.release`    → `Released`
/// - stdin EOF / `closed`   → `Shutdown`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BarEvent {
    /// The display assigned a (possibly new) size to the bar surface.
    /// A zero on either axis means "keep what you asked for".
    Configure { width: u32, height: u32 },
    /// One line of input, newline already stripped.
    InputLine(String),
    /// The display stopped reading frame `slot` of pool `generation`.
    Released { generation: u64, slot: usize },
    /// Stop the loop after the current event.
    Shutdown,
}

impl BarEvent {
    /// Short label used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configure { .. } => "configure",
            Self::InputLine(_) => "input",
            Self::Released { .. } => "released",
            Self::Shutdown => "shutdown",
        }
    }
}
