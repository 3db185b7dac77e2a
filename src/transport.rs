/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! The boundary between the object model and whatever carries requests to
//! the server.
//!
//! Implementations wrap the payloads they're handed in the relevant
//! operation envelope, send them, and return the entity element of the
//! server's response. Authentication, retries and the SOAP envelope itself
//! are the implementation's business.

use crate::{schema::EntitySchema, ChangedField, ExchangeVersion, PropertyDefinition, ServiceId};

/// An opaque failure reported by a [`Transport`].
pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

/// A request to create a new object on the server.
#[derive(Debug)]
pub struct CreateRequest<'a> {
    pub entity: &'static EntitySchema,

    /// The entity element carrying every property set on the object.
    pub payload: &'a str,

    pub version: ExchangeVersion,
}

/// A request to apply local changes to an existing object.
#[derive(Debug)]
pub struct UpdateRequest<'a> {
    pub entity: &'static EntitySchema,
    pub entity_id: &'a ServiceId,

    /// The properties the payload sets, in schema order.
    pub changed: &'a [ChangedField],

    /// The properties the payload deletes, in schema order.
    pub deleted: &'a [&'static PropertyDefinition],

    /// The `Updates` element expressing the changes.
    pub payload: &'a str,

    pub version: ExchangeVersion,
}

/// A request for some of an existing object's properties.
#[derive(Debug)]
pub struct LoadRequest<'a> {
    pub entity: &'static EntitySchema,
    pub entity_id: &'a ServiceId,
    pub requested: &'a [&'static PropertyDefinition],
    pub version: ExchangeVersion,
}

/// Sends requests to an Exchange server.
///
/// Each method returns the XML of the entity element in the server's
/// response, from which the object's server-assigned properties are read.
pub trait Transport {
    fn create(&mut self, request: CreateRequest<'_>) -> Result<String, TransportError>;

    fn update(&mut self, request: UpdateRequest<'_>) -> Result<String, TransportError>;

    fn load(&mut self, request: LoadRequest<'_>) -> Result<String, TransportError>;
}

/// A transport logging the payloads going through another.
pub(crate) struct TracingTransport<'t> {
    inner: &'t mut dyn Transport,
}

impl<'t> TracingTransport<'t> {
    pub(crate) fn new(inner: &'t mut dyn Transport) -> Self {
        Self { inner }
    }

    fn trace_response(
        response: Result<String, TransportError>,
    ) -> Result<String, TransportError> {
        if let Ok(body) = &response {
            log::info!("S: {body}");
        }

        response
    }
}

impl Transport for TracingTransport<'_> {
    fn create(&mut self, request: CreateRequest<'_>) -> Result<String, TransportError> {
        log::info!("C: {}", request.payload);
        Self::trace_response(self.inner.create(request))
    }

    fn update(&mut self, request: UpdateRequest<'_>) -> Result<String, TransportError> {
        log::info!("C: {}", request.payload);
        Self::trace_response(self.inner.update(request))
    }

    fn load(&mut self, request: LoadRequest<'_>) -> Result<String, TransportError> {
        let requested: Vec<_> = request
            .requested
            .iter()
            .map(|definition| definition.name)
            .collect();
        log::info!("C: load {} of {}", requested.join(" "), request.entity_id.id);

        Self::trace_response(self.inner.load(request))
    }
}
