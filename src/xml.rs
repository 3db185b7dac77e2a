/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! The pull reader and depth-first writer the object model is marshaled
//! through, plus scalar text conversions.

mod reader;
mod wire;
mod writer;

pub use reader::XmlReader;
pub use wire::{Date, DateTime, WireValue};
pub(crate) use wire::impl_wire_value_for_enum;
pub use writer::XmlWriter;

pub(crate) const MESSAGES_NS_URI: &str =
    "http://schemas.microsoft.com/exchange/services/2006/messages";
pub(crate) const TYPES_NS_URI: &str = "http://schemas.microsoft.com/exchange/services/2006/types";

/// The namespace an element is written in.
///
/// Readers match on local names only, so the namespace only matters when
/// writing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum XmlNamespace {
    /// `http://schemas.microsoft.com/exchange/services/2006/types`, written
    /// with the `t:` prefix.
    Types,

    /// `http://schemas.microsoft.com/exchange/services/2006/messages`,
    /// written with the `m:` prefix.
    Messages,

    /// The default namespace of the enclosing document, as used by
    /// autodiscover responses.
    NotSpecified,
}

impl XmlNamespace {
    pub fn prefix(self) -> Option<&'static str> {
        match self {
            XmlNamespace::Types => Some("t"),
            XmlNamespace::Messages => Some("m"),
            XmlNamespace::NotSpecified => None,
        }
    }

    pub fn uri(self) -> Option<&'static str> {
        match self {
            XmlNamespace::Types => Some(TYPES_NS_URI),
            XmlNamespace::Messages => Some(MESSAGES_NS_URI),
            XmlNamespace::NotSpecified => None,
        }
    }

    /// The qualified name of `local_name` in this namespace.
    pub(crate) fn qualify(self, local_name: &str) -> String {
        match self.prefix() {
            Some(prefix) => format!("{prefix}:{local_name}"),
            None => local_name.to_owned(),
        }
    }
}
