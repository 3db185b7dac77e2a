/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! A change-tracked object model for Exchange Web Services entities.
//!
//! Entities (folders, items, search folders) keep their fields in a
//! [`PropertyStore`], keyed by static [`PropertyDefinition`]s grouped into
//! per-entity [`EntitySchema`]s. Nested values such as recurrences and search
//! restrictions implement [`ComplexProperty`] and notify their owning store
//! entry when mutated, so that an update only carries the fields which
//! actually changed.
//!
//! Open-ended wire elements (search filters, recurrence patterns, autodiscover
//! settings, error records) are decoded through the closed variant tables in
//! [`decoder`].

use thiserror::Error;

pub mod complex;
pub mod config;
pub mod decoder;
pub mod property;
pub mod schema;
pub mod service_object;
pub mod transport;
pub mod types;
pub mod version;
pub mod xml;

#[cfg(test)]
mod test_utils;

pub use complex::{ChangeHandle, ComplexProperty};
pub use config::EngineConfig;
pub use property::{
    ChangedField, PropertyDefinition, PropertyDefinitionFlags, PropertyDiff, PropertyKind,
    PropertyState, PropertyStore, PropertyValue, ReadOnly, Settable, UpdateMode, ValidationError,
};
pub use schema::{EntityKind, EntitySchema};
pub use service_object::ServiceObject;
pub use transport::{CreateRequest, LoadRequest, Transport, TransportError, UpdateRequest};
pub use types::*;
pub use version::{ExchangeVersion, Feature};

#[derive(Debug, Error)]
pub enum Error {
    #[error("error manipulating XML data")]
    Xml(#[from] quick_xml::Error),

    #[error("failed to write XML output")]
    Io(#[from] std::io::Error),

    #[error("XML name is not valid UTF-8")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("unknown {family} variant `{discriminator}`")]
    UnknownVariant {
        family: &'static str,
        discriminator: String,
    },

    #[error("unexpected XML structure: expected {expected}, found {found}")]
    UnexpectedElement { expected: String, found: String },

    #[error("invalid value `{value}` for `{element}`")]
    InvalidValue { element: String, value: String },

    #[error("property `{0}` cannot be set on this object")]
    ReadOnlyProperty(&'static str),

    #[error("property `{0}` cannot be deleted")]
    NotDeletable(&'static str),

    #[error("property `{0}` must be explicitly loaded before it can be read")]
    NotLoaded(&'static str),

    #[error("property `{property}` expects a value of kind {expected:?}")]
    KindMismatch {
        property: &'static str,
        expected: PropertyKind,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{feature:?} requires {required:?}, but the target version is {version:?}")]
    UnsupportedFeature {
        feature: Feature,
        required: ExchangeVersion,
        version: ExchangeVersion,
    },

    #[error("unknown Exchange server version `{0}`")]
    UnknownServerVersion(String),

    #[error("the object has no identifier; it must be created before it can be updated or loaded")]
    MissingId,

    #[error("the object already exists on the server")]
    AlreadyCreated,

    #[error("transport request failed: {0}")]
    Transport(#[source] TransportError),

    #[error("failed to parse engine configuration")]
    Config(#[from] serde_json::Error),
}
