/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Property metadata and the per-object store of property values.

mod definition;
mod store;
mod validation;
mod value;

pub use definition::{
    Property, PropertyDefinition, PropertyDefinitionFlags, PropertyKind, ReadOnly,
    ReadOnlyAccess, Settable, SettableAccess,
};
pub(crate) use store::ChangeLog;
pub use store::{ChangedField, PropertyDiff, PropertyState, PropertyStore, UpdateMode};
pub use validation::{validate, ValidationError};
pub use value::{PropertyType, PropertyValue};
