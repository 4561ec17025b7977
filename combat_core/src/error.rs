//! Engine errors

use crate::types::Side;
use thiserror::Error;

/// Malformed input to an engine transition
///
/// These indicate bad setup or content data and are never swallowed. The
/// state passed to the failing call is left untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Combatant id '{0}' appears more than once in the encounter")]
    DuplicateCombatant(String),
    #[error("The {0} party is empty")]
    EmptyParty(Side),
    #[error("Unknown status '{0}'")]
    UnknownStatus(String),
    #[error("Unknown combatant '{0}'")]
    UnknownCombatant(String),
}
