//! Run-creation request building and validation.

use crate::error::ValidationError;
use crate::model::{CreatePayload, SimMode};
use std::collections::HashSet;

/// Build a create request. With `auto_fill` the server assigns teams and `selections`
/// is ignored; otherwise exactly `mode.required_teams()` distinct names are required.
pub fn build_create_payload(
    mode: SimMode,
    auto_fill: bool,
    selections: &[String],
) -> Result<CreatePayload, ValidationError> {
    if auto_fill {
        return Ok(CreatePayload {
            mode,
            auto_fill: true,
            teams: None,
        });
    }

    let required = mode.required_teams();
    let distinct: HashSet<&str> = selections.iter().map(String::as_str).collect();
    if selections.len() != required || distinct.len() != selections.len() {
        return Err(ValidationError::TeamSelection { mode, required });
    }

    Ok(CreatePayload {
        mode,
        auto_fill: false,
        teams: Some(selections.to_vec()),
    })
}
