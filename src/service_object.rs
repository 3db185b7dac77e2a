/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use crate::{
    transport::TracingTransport,
    xml::{XmlReader, XmlWriter},
    CreateRequest, EngineConfig, EntityKind, Error, ExchangeVersion, PropertyDefinition,
    PropertyStore, ServiceId, Transport, UpdateRequest,
};

/// A folder or item, along with the settings used to exchange it with the
/// server.
#[derive(Debug)]
pub struct ServiceObject {
    store: PropertyStore,
    config: EngineConfig,
}

impl ServiceObject {
    /// A new object, to be populated and then created on the server.
    pub fn new(kind: EntityKind, config: EngineConfig) -> Self {
        Self {
            store: PropertyStore::new(kind.schema()),
            config,
        }
    }

    /// An existing object read from the server's XML for it.
    pub fn from_xml(kind: EntityKind, xml: &str, config: EngineConfig) -> Result<Self, Error> {
        let mut reader = XmlReader::new(xml, config.requested_server_version)?;
        let store = PropertyStore::from_xml(kind.schema(), &mut reader)?;

        Ok(Self { store, config })
    }

    pub fn properties(&self) -> &PropertyStore {
        &self.store
    }

    pub fn properties_mut(&mut self) -> &mut PropertyStore {
        &mut self.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The server identifier, once the object has been created or loaded.
    pub fn id(&self) -> Option<&ServiceId> {
        self.store.id()
    }

    /// Creates the object on the server, then reads back the properties
    /// the server assigned, such as its identifier.
    pub fn create(&mut self, transport: &mut dyn Transport) -> Result<(), Error> {
        if !self.store.is_new() {
            return Err(Error::AlreadyCreated);
        }

        self.store.validate()?;

        let version = self.version();
        let mut writer = XmlWriter::new(version);
        self.store.write_to_xml(&mut writer)?;
        let payload = writer.into_string()?;

        let schema = self.store.schema();
        log::info!("creating {}", schema.element_name);

        let response = with_tracing(self.config.trace_wire_traffic, transport, |transport| {
            transport.create(CreateRequest {
                entity: schema,
                payload: &payload,
                version,
            })
        })
        .map_err(Error::Transport)?;

        self.store.clear_sent_changes(version);
        self.read_response(&response)
    }

    /// Sends the local changes to the server.
    ///
    /// Returns `false` without contacting the server if there was nothing to
    /// send.
    pub fn update(&mut self, transport: &mut dyn Transport) -> Result<bool, Error> {
        let entity_id = self.store.id().cloned().ok_or(Error::MissingId)?;

        self.store.validate()?;

        let version = self.version();
        let diff = self.store.diff_for_update(version);
        if diff.is_empty() {
            log::debug!(
                "no changes to send for {} {}",
                self.store.schema().element_name,
                entity_id.id
            );
            return Ok(false);
        }

        let mut writer = XmlWriter::new(version);
        self.store.write_updates_to_xml(&mut writer, &diff)?;
        let payload = writer.into_string()?;

        let schema = self.store.schema();
        log::info!(
            "updating {} of {} {}",
            diff.changed.len() + diff.deleted.len(),
            schema.element_name,
            entity_id.id
        );

        let response = with_tracing(self.config.trace_wire_traffic, transport, |transport| {
            transport.update(UpdateRequest {
                entity: schema,
                entity_id: &entity_id,
                changed: &diff.changed,
                deleted: &diff.deleted,
                payload: &payload,
                version,
            })
        })
        .map_err(Error::Transport)?;

        self.store.clear_sent_changes(version);
        self.read_response(&response)?;

        Ok(true)
    }

    /// Fetches those of `definitions` which haven't been loaded yet.
    pub fn load(
        &mut self,
        transport: &mut dyn Transport,
        definitions: &[&'static PropertyDefinition],
    ) -> Result<(), Error> {
        let version = self.version();
        let store = &mut self.store;

        with_tracing(self.config.trace_wire_traffic, transport, |transport| {
            store.load_on_demand(transport, definitions, version)
        })
    }

    fn version(&self) -> ExchangeVersion {
        self.config.requested_server_version
    }

    /// Servers may answer with an empty body when they have nothing new to
    /// report about the object.
    fn read_response(&mut self, response: &str) -> Result<(), Error> {
        if response.trim().is_empty() {
            return Ok(());
        }

        let mut reader = XmlReader::new(response, self.version())?;
        self.store.load_from_xml(&mut reader)
    }
}

fn with_tracing<R>(
    trace: bool,
    transport: &mut dyn Transport,
    send: impl FnOnce(&mut dyn Transport) -> R,
) -> R {
    if trace {
        send(&mut TracingTransport::new(transport))
    } else {
        send(transport)
    }
}
