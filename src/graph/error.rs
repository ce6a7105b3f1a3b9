//! Errors that can stop a simulation.

/// Errors returned by [Circuit](super::Circuit) simulations.
///
/// Arithmetic never fails (division by 0 yields 0), so the only runtime failures are malformed
/// circuits and failed lookups.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimError {
    /// A combinational definition depends on itself within a single cycle,
    /// feedback has to go through a registered definition.
    #[error("combinational cycle detected through signal `{name}`")]
    CombinationalCycle {
        /// Name of the signal that was re-entered while its value was being computed.
        name: String,
    },

    /// No signal with the given name exists in the circuit.
    #[error("unknown signal `{0}`")]
    UnknownSignal(String),
}
