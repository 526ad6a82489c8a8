//! Events that drive the initialization state machine

/// Outcome of each bring-up step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitEvent {
    // Local configuration steps
    /// Lines powered, identification clock programmed
    LowLevelConfigured,
    /// Transfer clock divider programmed
    TransferClockSet,
    /// No CLKDIV value brings the adapter clock down to 400 kHz
    ClockUnreachable,

    // Card identification
    /// Card answered identification within the retry budget
    Identified,
    /// Identification retry budget spent
    IdentificationExhausted,

    // Bus width negotiation
    /// Board has no D1-D3 wiring; stay at 1 bit
    WideBusSkipped,
    /// Card accepted 4-bit mode
    WideBusEnabled,
    /// 4-bit retry budget spent; go back and bring up at 1 bit
    WideBusExhausted,
}
