use crate::error::StructuredError;
use crate::types::MutationResponse;

/// Returns the structured error carried by a mutation response, if any.
///
/// Fields are checked in the order `startSensor`, `stopSensor` and the first
/// `Error` variant wins. A response with no populated field yields `None`.
pub fn extract_mutation_error(response: &MutationResponse) -> Option<&StructuredError> {
    response.outcomes().find_map(|outcome| outcome.error())
}
