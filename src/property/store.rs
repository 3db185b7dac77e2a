/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use std::{
    cell::RefCell,
    collections::{HashMap, HashSet},
    rc::Rc,
};

use crate::{
    property::{
        validation, PropertyDefinition, PropertyDefinitionFlags, PropertyType, PropertyValue,
        Settable, ValidationError,
    },
    schema::EntitySchema,
    types::write_extended_property,
    xml::{XmlNamespace, XmlReader, XmlWriter},
    ComplexProperty, Error, ExchangeVersion, ExtendedPropertyCollection, LoadRequest,
    PropertyPath, ServiceId, Transport,
};

use super::Property;

/// The set of properties changed since an object was last in sync with the
/// server.
///
/// Shared between a [`PropertyStore`] and the change handles of its complex
/// values, which report nested mutations into it.
#[derive(Debug, Default)]
pub(crate) struct ChangeLog {
    is_new: bool,
    added: HashSet<&'static str>,
    modified: HashSet<&'static str>,
    removed: HashSet<&'static str>,
}

impl ChangeLog {
    fn for_new_object() -> Self {
        Self {
            is_new: true,
            ..Default::default()
        }
    }

    pub(crate) fn mark_modified(&mut self, property: &'static str) {
        self.removed.remove(property);

        if self.is_new {
            self.added.insert(property);
        } else {
            self.modified.insert(property);
        }
    }

    pub(crate) fn mark_removed(&mut self, property: &'static str) {
        self.added.remove(property);
        self.modified.remove(property);

        // Nothing exists server-side to delete yet.
        if !self.is_new {
            self.removed.insert(property);
        }
    }

    pub(crate) fn mark_clean(&mut self, property: &str) {
        self.added.remove(property);
        self.modified.remove(property);
        self.removed.remove(property);
    }

    pub(crate) fn is_modified(&self, property: &str) -> bool {
        self.added.contains(property) || self.modified.contains(property)
    }

    pub(crate) fn is_removed(&self, property: &str) -> bool {
        self.removed.contains(property)
    }

    fn is_empty(&self) -> bool {
        self.added.is_empty() && self.modified.is_empty() && self.removed.is_empty()
    }

    /// Records that the object now exists on the server. Properties set
    /// before then and still pending become modifications.
    fn mark_created(&mut self) {
        if self.is_new {
            self.is_new = false;
            self.modified.extend(self.added.drain());
        }
    }

    /// Forgets all changes. The object is known to the server from then on.
    pub(crate) fn clear(&mut self) {
        self.is_new = false;
        self.added.clear();
        self.modified.clear();
        self.removed.clear();
    }
}

/// Where a property stands relative to the server's copy of the object.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropertyState {
    /// Never fetched from the server.
    Unloaded,

    /// Loaded, and unchanged since.
    Clean,

    /// Set or changed locally since the object was loaded or created.
    Dirty,

    /// Deleted locally; the next update deletes it on the server.
    Removed,
}

/// How a changed property is expressed in an update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateMode {
    /// The whole value replaces the server's.
    Replace,

    /// Each changed item of the collection is set or deleted individually.
    CollectionItems,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChangedField {
    pub definition: &'static PropertyDefinition,
    pub mode: UpdateMode,
}

/// The changes an update must carry to bring the server in line with an
/// object, in schema order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PropertyDiff {
    pub changed: Vec<ChangedField>,
    pub deleted: Vec<&'static PropertyDefinition>,
}

impl PropertyDiff {
    pub fn is_empty(&self) -> bool {
        self.changed.is_empty() && self.deleted.is_empty()
    }
}

/// The property values of a single folder or item, along with what changed
/// since it was last in sync with the server.
pub struct PropertyStore {
    schema: &'static EntitySchema,
    values: HashMap<&'static str, PropertyValue>,

    /// Properties whose server value is known, whether or not the server
    /// had one.
    loaded: HashSet<&'static str>,

    log: Rc<RefCell<ChangeLog>>,
}

impl PropertyStore {
    /// An empty store for an object which doesn't exist on the server yet.
    pub fn new(schema: &'static EntitySchema) -> Self {
        Self {
            schema,
            values: HashMap::new(),
            loaded: HashSet::new(),
            log: Rc::new(RefCell::new(ChangeLog::for_new_object())),
        }
    }

    /// An empty store for an object which exists on the server but hasn't
    /// been loaded yet.
    pub fn existing(schema: &'static EntitySchema) -> Self {
        Self {
            log: Rc::default(),
            ..Self::new(schema)
        }
    }

    /// Reads an existing object from the entity element the reader is
    /// positioned on.
    pub fn from_xml(schema: &'static EntitySchema, reader: &mut XmlReader) -> Result<Self, Error> {
        let mut store = Self::existing(schema);
        store.load_from_xml(reader)?;

        Ok(store)
    }

    pub fn schema(&self) -> &'static EntitySchema {
        self.schema
    }

    /// Whether the object has yet to be created on the server.
    pub fn is_new(&self) -> bool {
        self.log.borrow().is_new
    }

    /// The server identifier of the object, once it has one.
    pub fn id(&self) -> Option<&ServiceId> {
        self.values
            .get(self.schema.id_property.name)
            .and_then(ServiceId::peek)
    }

    /// The current value of `property`, if it has one.
    ///
    /// Fails with [`Error::NotLoaded`] for properties which the server only
    /// returns on request, until they are loaded.
    pub fn get<T: PropertyType, A>(
        &self,
        property: &'static Property<T, A>,
    ) -> Result<Option<&T>, Error> {
        Ok(self.get_value(property.definition())?.and_then(T::peek))
    }

    pub fn get_value(
        &self,
        definition: &'static PropertyDefinition,
    ) -> Result<Option<&PropertyValue>, Error> {
        self.ensure_loaded(definition)?;

        Ok(self.values.get(definition.name))
    }

    /// Mutable access to a complex property, creating an empty value first
    /// if the property has none and is instantiated on read.
    ///
    /// Changes made through the returned reference mark the property as
    /// changed. Fails if the property couldn't be set on this object.
    pub fn get_mut<T: PropertyType + ComplexProperty>(
        &mut self,
        property: &'static Settable<T>,
    ) -> Result<Option<&mut T>, Error> {
        let definition = property.definition();
        self.ensure_loaded(definition)?;
        self.ensure_settable(definition)?;

        if !self.values.contains_key(definition.name)
            && definition.has_flag(PropertyDefinitionFlags::AUTO_INSTANTIATE_ON_READ)
        {
            if let Some(value) = PropertyValue::default_for(definition.kind) {
                self.values.insert(definition.name, value);
            }
        }

        let Some(value) = self.values.get_mut(definition.name).and_then(T::peek_mut) else {
            return Ok(None);
        };
        value
            .change_handle()
            .attach_to_store(&self.log, definition.name);

        Ok(Some(value))
    }

    pub fn set<T: PropertyType>(
        &mut self,
        property: &'static Settable<T>,
        value: T,
    ) -> Result<(), Error> {
        self.set_value(property.definition(), value.wrap())
    }

    /// Installs `value` as the local value of `definition`, replacing any
    /// previous value and cancelling any pending removal.
    pub fn set_value(
        &mut self,
        definition: &'static PropertyDefinition,
        mut value: PropertyValue,
    ) -> Result<(), Error> {
        if value.kind() != definition.kind {
            return Err(Error::KindMismatch {
                property: definition.name,
                expected: definition.kind,
            });
        }
        self.ensure_settable(definition)?;

        let previous = self.values.remove(definition.name);
        if let Some(previous) = &previous {
            if let Some(complex) = previous.as_complex() {
                complex.change_handle().detach();
            }

            // Items of the replaced collection still exist server-side.
            if let (
                PropertyValue::ExtendedProperties(previous),
                PropertyValue::ExtendedProperties(collection),
            ) = (previous, &mut value)
            {
                collection.carry_removals_from(previous);
            }
        }

        if let Some(complex) = value.as_complex() {
            complex
                .change_handle()
                .attach_to_store(&self.log, definition.name);
        }

        self.values.insert(definition.name, value);
        self.log.borrow_mut().mark_modified(definition.name);

        Ok(())
    }

    pub fn remove<T>(&mut self, property: &'static Settable<T>) -> Result<(), Error> {
        self.remove_value(property.definition())
    }

    /// Clears the value of `definition`. On an existing object, the next
    /// update deletes it on the server.
    pub fn remove_value(&mut self, definition: &'static PropertyDefinition) -> Result<(), Error> {
        if !definition.has_flag(PropertyDefinitionFlags::CAN_DELETE) {
            return Err(Error::NotDeletable(definition.name));
        }

        if let Some(previous) = self.values.remove(definition.name) {
            if let Some(complex) = previous.as_complex() {
                complex.change_handle().detach();
            }
        }

        self.log.borrow_mut().mark_removed(definition.name);

        Ok(())
    }

    pub fn state(&self, definition: &PropertyDefinition) -> PropertyState {
        let log = self.log.borrow();

        if log.is_removed(definition.name) {
            PropertyState::Removed
        } else if log.is_modified(definition.name) {
            PropertyState::Dirty
        } else if self.values.contains_key(definition.name) || self.loaded.contains(definition.name)
        {
            PropertyState::Clean
        } else {
            PropertyState::Unloaded
        }
    }

    /// Whether `definition` was set or changed locally.
    pub fn is_changed(&self, definition: &PropertyDefinition) -> bool {
        self.log.borrow().is_modified(definition.name)
    }

    pub fn is_loaded(&self, definition: &PropertyDefinition) -> bool {
        self.state(definition) != PropertyState::Unloaded
    }

    pub fn has_changes(&self) -> bool {
        !self.log.borrow().is_empty()
    }

    /// The stored value, bypassing load checks.
    pub(crate) fn raw_value(&self, definition: &PropertyDefinition) -> Option<&PropertyValue> {
        self.values.get(definition.name)
    }

    /// The changes to send to a server at `version`.
    ///
    /// Properties the server doesn't know about at `version` are left out.
    pub fn diff_for_update(&self, version: ExchangeVersion) -> PropertyDiff {
        let log = self.log.borrow();
        let mut diff = PropertyDiff::default();

        for &definition in self.schema.definitions {
            if !definition.is_visible(version) {
                if log.is_modified(definition.name) || log.is_removed(definition.name) {
                    log::debug!(
                        "leaving {} out of the update: not supported by {version:?}",
                        definition.name
                    );
                }

                continue;
            }

            if log.is_modified(definition.name) {
                let mode = if !log.is_new
                    && definition.has_flag(PropertyDefinitionFlags::UPDATE_COLLECTION_ITEMS)
                {
                    UpdateMode::CollectionItems
                } else {
                    UpdateMode::Replace
                };

                diff.changed.push(ChangedField { definition, mode });
            } else if log.is_removed(definition.name) {
                diff.deleted.push(definition);
            }
        }

        diff
    }

    /// Validates every changed complex value, stopping at the first
    /// violation.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::validate(self)
    }

    /// Marks every property as in sync with the server.
    pub fn clear_change_log(&mut self) {
        self.log.borrow_mut().clear();

        for (&name, value) in self.values.iter_mut() {
            value.clear_change_log();
            self.loaded.insert(name);
        }
    }

    /// Marks the changes sent to a server at `version` as in sync with it.
    ///
    /// Changes to properties the server doesn't know about at `version` were
    /// left out of the request, and stay pending.
    pub fn clear_sent_changes(&mut self, version: ExchangeVersion) {
        let sent: Vec<&'static str> = {
            let mut log = self.log.borrow_mut();
            log.mark_created();

            let sent: Vec<&'static str> = self
                .schema
                .definitions
                .iter()
                .filter(|definition| definition.is_visible(version))
                .map(|definition| definition.name)
                .filter(|&name| log.is_modified(name) || log.is_removed(name))
                .collect();
            for name in &sent {
                log.mark_clean(name);
            }

            sent
        };

        for name in sent {
            if let Some(value) = self.values.get_mut(name) {
                value.clear_change_log();
            }
            self.loaded.insert(name);
        }
    }

    /// Writes the entity element with every property set on this new
    /// object, for a create request.
    pub fn write_to_xml(&self, writer: &mut XmlWriter) -> Result<(), Error> {
        let log = self.log.borrow();

        writer.write_start_element(XmlNamespace::Types, self.schema.element_name)?;
        for &definition in self.schema.definitions {
            if !log.is_modified(definition.name) {
                continue;
            }

            if !definition.is_visible(writer.version()) {
                log::warn!(
                    "not writing {}: not supported by {:?}",
                    definition.name,
                    writer.version()
                );
                continue;
            }

            if let Some(value) = self.values.get(definition.name) {
                value.write_to_xml(writer, definition.name)?;
            }
        }

        writer.write_end_element()
    }

    /// Writes the `Updates` element expressing `diff`.
    pub fn write_updates_to_xml(&self, writer: &mut XmlWriter, diff: &PropertyDiff) -> Result<(), Error> {
        writer.write_start_element(XmlNamespace::Types, "Updates")?;

        for field in &diff.changed {
            let definition = field.definition;
            let Some(value) = self.values.get(definition.name) else {
                continue;
            };

            match value {
                PropertyValue::ExtendedProperties(collection) => {
                    self.write_extended_property_updates(writer, collection, field.mode)?;
                }
                _ => {
                    writer.write_start_element(XmlNamespace::Types, self.schema.set_field_element)?;
                    write_field_uri(writer, definition)?;
                    writer.write_start_element(XmlNamespace::Types, self.schema.element_name)?;
                    value.write_to_xml(writer, definition.name)?;
                    writer.write_end_element()?;
                    writer.write_end_element()?;
                }
            }
        }

        for &definition in &diff.deleted {
            writer.write_start_element(XmlNamespace::Types, self.schema.delete_field_element)?;
            write_field_uri(writer, definition)?;
            writer.write_end_element()?;
        }

        writer.write_end_element()
    }

    fn write_extended_property_updates(
        &self,
        writer: &mut XmlWriter,
        collection: &ExtendedPropertyCollection,
        mode: UpdateMode,
    ) -> Result<(), Error> {
        let items: Vec<_> = match mode {
            UpdateMode::CollectionItems => collection.changed_items().collect(),
            UpdateMode::Replace => collection.iter().collect(),
        };

        for item in items {
            writer.write_start_element(XmlNamespace::Types, self.schema.set_field_element)?;
            item.path.write_to_xml(writer)?;
            writer.write_start_element(XmlNamespace::Types, self.schema.element_name)?;
            write_extended_property(writer, item)?;
            writer.write_end_element()?;
            writer.write_end_element()?;
        }

        for path in collection.removed_paths() {
            writer.write_start_element(XmlNamespace::Types, self.schema.delete_field_element)?;
            path.write_to_xml(writer)?;
            writer.write_end_element()?;
        }

        Ok(())
    }

    /// Reads the entity element the reader is positioned on into the store.
    ///
    /// Values read replace the local ones and become clean, except that
    /// properties flagged [`PropertyDefinitionFlags::REUSE_INSTANCE`] are
    /// merged into their current value. Elements the schema doesn't know
    /// are skipped. If reading fails the store is left untouched.
    pub fn load_from_xml(&mut self, reader: &mut XmlReader) -> Result<(), Error> {
        let element = self.schema.element_name;
        let mut staged: Vec<(&'static PropertyDefinition, PropertyValue)> = Vec::new();

        reader.read_start_element(element)?;
        while !reader.is_end_element(element) {
            let name = match reader.local_name() {
                Some(name) if reader.is_start() => name.to_owned(),
                _ => return Err(reader.unexpected(format!("a child element of <{element}>"))),
            };

            let Some(definition) = self.schema.lookup(&name) else {
                log::debug!("skipping unknown element <{name}> in <{element}>");
                reader.skip_current_element()?;
                continue;
            };

            // Properties such as extended properties span several elements.
            if let Some((_, value)) = staged.iter_mut().find(|(staged, _)| staged.name == name) {
                value.update_from_xml(reader, definition.name)?;
                continue;
            }

            let reused = definition
                .has_flag(PropertyDefinitionFlags::REUSE_INSTANCE)
                .then(|| {
                    self.values
                        .get(definition.name)
                        .cloned()
                        .or_else(|| PropertyValue::default_for(definition.kind))
                })
                .flatten();

            let value = match reused {
                Some(mut value) => {
                    value.update_from_xml(reader, definition.name)?;
                    value
                }
                None => PropertyValue::read_from_xml(definition.kind, reader, definition.name)?,
            };

            staged.push((definition, value));
        }
        reader.read_end_element(element)?;

        for (definition, value) in staged {
            self.commit_loaded(definition, value);
        }

        Ok(())
    }

    fn commit_loaded(&mut self, definition: &'static PropertyDefinition, value: PropertyValue) {
        if let Some(complex) = self.values.get(definition.name).and_then(PropertyValue::as_complex) {
            complex.change_handle().detach();
        }
        if let Some(complex) = value.as_complex() {
            complex
                .change_handle()
                .attach_to_store(&self.log, definition.name);
        }

        // A merged collection may still carry local changes to other items.
        let pending = matches!(
            &value,
            PropertyValue::ExtendedProperties(collection) if collection.has_pending_changes()
        );

        self.values.insert(definition.name, value);
        self.loaded.insert(definition.name);

        if !pending {
            self.log.borrow_mut().mark_clean(definition.name);
        }
    }

    /// Fetches those of `definitions` which haven't been loaded yet and
    /// which exist at `version`.
    ///
    /// Requested properties the server has no value for count as loaded
    /// afterwards.
    pub fn load_on_demand(
        &mut self,
        transport: &mut dyn Transport,
        definitions: &[&'static PropertyDefinition],
        version: ExchangeVersion,
    ) -> Result<(), Error> {
        let requested: Vec<&'static PropertyDefinition> = definitions
            .iter()
            .copied()
            .filter(|definition| {
                definition.is_visible(version) && self.state(definition) == PropertyState::Unloaded
            })
            .collect();

        if requested.is_empty() {
            return Ok(());
        }

        let response = {
            let entity_id = self.id().ok_or(Error::MissingId)?;
            log::info!(
                "loading {} properties of {} {}",
                requested.len(),
                self.schema.element_name,
                entity_id.id
            );

            transport
                .load(LoadRequest {
                    entity: self.schema,
                    entity_id,
                    requested: &requested,
                    version,
                })
                .map_err(Error::Transport)?
        };

        let mut reader = XmlReader::new(&response, version)?;
        self.load_from_xml(&mut reader)?;

        self.loaded
            .extend(requested.iter().map(|definition| definition.name));

        Ok(())
    }

    fn ensure_loaded(&self, definition: &PropertyDefinition) -> Result<(), Error> {
        if definition.has_flag(PropertyDefinitionFlags::MUST_BE_EXPLICITLY_LOADED)
            && !self.is_new()
            && self.state(definition) == PropertyState::Unloaded
        {
            return Err(Error::NotLoaded(definition.name));
        }

        Ok(())
    }

    fn ensure_settable(&self, definition: &PropertyDefinition) -> Result<(), Error> {
        let required = if self.is_new() {
            PropertyDefinitionFlags::CAN_SET
        } else {
            PropertyDefinitionFlags::CAN_UPDATE
        };

        if !definition.has_flag(required) {
            return Err(Error::ReadOnlyProperty(definition.name));
        }

        Ok(())
    }
}

impl std::fmt::Debug for PropertyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertyStore")
            .field("entity", &self.schema.element_name)
            .field("values", &self.values)
            .field("log", &self.log.borrow())
            .finish()
    }
}

fn write_field_uri(writer: &mut XmlWriter, definition: &PropertyDefinition) -> Result<(), Error> {
    let uri = definition.uri.ok_or_else(|| Error::InvalidValue {
        element: "FieldURI".to_string(),
        value: definition.name.to_string(),
    })?;

    PropertyPath::field(uri).write_to_xml(writer)
}
