//! Channel indices for monitor modes.

/// Channels recorded by a mode-0 load monitor.
///
/// The index values follow the column order of the engine's exported
/// monitor reports for that mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadChannel {
    /// First-phase voltage magnitude.
    Mode0V1 = 1,
}

impl LoadChannel {
    /// Channel index to pass to the monitor readback interface.
    pub fn index(self) -> usize {
        self as usize
    }
}
