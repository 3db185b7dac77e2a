/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use thiserror::Error;

use crate::PropertyStore;

/// The first invariant violation found in a tree of property values.
///
/// `path` names each element from the store entry down to the offending
/// value, e.g. `Recurrence/WeeklyRecurrence/DaysOfWeek`.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{}: {}", .path.join("/"), .reason)]
pub struct ValidationError {
    pub path: Vec<String>,
    pub reason: String,
}

impl ValidationError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            path: Vec::new(),
            reason: reason.into(),
        }
    }

    /// A violation of the field `field` of the value being validated.
    pub fn field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(reason).within(field)
    }

    /// Qualifies the error with the name of the enclosing value.
    pub fn within(mut self, segment: impl Into<String>) -> Self {
        self.path.insert(0, segment.into());
        self
    }
}

/// Validates every complex value which was set or changed in `store` since
/// it was last in sync with the server, stopping at the first violation.
pub fn validate(store: &PropertyStore) -> Result<(), ValidationError> {
    for definition in store.schema().definitions {
        if !store.is_changed(definition) {
            continue;
        }

        let Some(complex) = store.raw_value(definition).and_then(|value| value.as_complex()) else {
            continue;
        };

        complex
            .validate()
            .map_err(|err| err.within(definition.name))?;
    }

    Ok(())
}
