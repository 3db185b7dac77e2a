/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Nested, self-serializing property values.
//!
//! A complex property owns its children outright; the only link running the
//! other way is a [`ChangeHandle`], a weak pointer to the owner which is used
//! solely to report mutations. Owners re-attach a child's handle to their own
//! whenever they hand out mutable access to it, so the chain from any leaf up
//! to the owning [`PropertyStore`](crate::PropertyStore) entry always reflects
//! where the value currently lives.

use std::{
    cell::RefCell,
    fmt,
    rc::{Rc, Weak},
};

use crate::{
    property::{ChangeLog, ValidationError},
    xml::{XmlNamespace, XmlReader, XmlWriter},
    Error,
};

enum Owner {
    Detached,
    Parent(Weak<ChangeNode>),
    Store {
        log: Weak<RefCell<ChangeLog>>,
        property: &'static str,
    },
}

struct ChangeNode {
    owner: RefCell<Owner>,
}

/// The notification link between a complex property and its owner.
///
/// Cloning a handle yields a fresh, detached handle: a cloned value is a new
/// value, and must not report its mutations to the original's owner. For the
/// same reason, handles never take part in equality, so that values deriving
/// `PartialEq` compare on their content only.
pub struct ChangeHandle(Rc<ChangeNode>);

impl ChangeHandle {
    pub fn new() -> Self {
        Self(Rc::new(ChangeNode {
            owner: RefCell::new(Owner::Detached),
        }))
    }

    /// Makes `parent` the owner notified of changes through this handle,
    /// replacing any previous owner.
    pub fn attach_to(&self, parent: &ChangeHandle) {
        *self.0.owner.borrow_mut() = Owner::Parent(Rc::downgrade(&parent.0));
    }

    pub(crate) fn attach_to_store(&self, log: &Rc<RefCell<ChangeLog>>, property: &'static str) {
        *self.0.owner.borrow_mut() = Owner::Store {
            log: Rc::downgrade(log),
            property,
        };
    }

    pub fn detach(&self) {
        *self.0.owner.borrow_mut() = Owner::Detached;
    }

    pub fn is_attached(&self) -> bool {
        !matches!(*self.0.owner.borrow(), Owner::Detached)
    }

    /// Reports a change to the owning store entry, if the chain of owners
    /// reaches one. Cost is proportional to the depth of the tree.
    pub fn notify(&self) {
        let mut node = Rc::clone(&self.0);

        loop {
            let parent = match &*node.owner.borrow() {
                Owner::Detached => return,
                Owner::Parent(parent) => match parent.upgrade() {
                    Some(parent) => parent,
                    None => return,
                },
                Owner::Store { log, property } => {
                    if let Some(log) = log.upgrade() {
                        log.borrow_mut().mark_modified(property);
                    }
                    return;
                }
            };

            node = parent;
        }
    }
}

impl Default for ChangeHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for ChangeHandle {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl PartialEq for ChangeHandle {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for ChangeHandle {}

impl fmt::Debug for ChangeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let owner = match *self.0.owner.borrow() {
            Owner::Detached => "detached",
            Owner::Parent(_) => "parent",
            Owner::Store { property, .. } => property,
        };

        f.debug_tuple("ChangeHandle").field(&owner).finish()
    }
}

/// A nested value which reads and writes its own XML subtree.
///
/// Implementors provide the element-by-element hooks; the provided methods
/// implement the generic subtree loop around them.
pub trait ComplexProperty {
    fn change_handle(&self) -> &ChangeHandle;

    /// Reports a mutation of this value to its owner.
    fn mark_changed(&self) {
        self.change_handle().notify();
    }

    /// Reads the attributes of this value's own element. The reader is
    /// positioned on the element's start tag.
    fn read_attributes(&mut self, _reader: &XmlReader) -> Result<(), Error> {
        Ok(())
    }

    /// Consumes the child element the reader is positioned on, if this value
    /// recognizes it.
    fn try_read_element(&mut self, reader: &mut XmlReader) -> Result<bool, Error>;

    /// Consumes text content found directly inside this value's element.
    fn read_text(&mut self, _text: &str) -> Result<bool, Error> {
        Ok(false)
    }

    fn write_attributes(&self, _writer: &mut XmlWriter) -> Result<(), Error> {
        Ok(())
    }

    /// Writes this value's child nodes.
    fn write_elements(&self, writer: &mut XmlWriter) -> Result<(), Error>;

    /// Checks the invariants this value must satisfy before it is sent to
    /// the server.
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }

    /// Reads this value from the element `name` the reader is positioned on,
    /// consuming it entirely.
    ///
    /// Any child node the value does not recognize fails the whole read.
    fn load_from_xml(&mut self, reader: &mut XmlReader, name: &str) -> Result<(), Error> {
        reader.ensure_start_element(name)?;
        self.read_attributes(reader)?;
        reader.advance()?;

        while !reader.is_end_element(name) {
            if reader.is_start() {
                if !self.try_read_element(reader)? {
                    return Err(reader.unexpected(format!("a known child of <{name}>")));
                }
            } else if reader.is_end() || reader.is_eof() {
                return Err(reader.unexpected(format!("</{name}>")));
            } else {
                let text = reader.read_text()?;
                if !self.read_text(&text)? {
                    return Err(Error::UnexpectedElement {
                        expected: format!("child elements of <{name}>"),
                        found: format!("text `{text}`"),
                    });
                }
            }
        }

        reader.read_end_element(name)
    }

    /// Merges the element `name` into this value in place of replacing it.
    ///
    /// By default, fields present in the element overwrite their current
    /// value and all other fields are left as they are.
    fn update_from_xml(&mut self, reader: &mut XmlReader, name: &str) -> Result<(), Error> {
        self.load_from_xml(reader, name)
    }

    /// Writes this value as the element `name`.
    fn write_to_xml(&self, writer: &mut XmlWriter, ns: XmlNamespace, name: &str) -> Result<(), Error> {
        writer.write_start_element(ns, name)?;
        self.write_attributes(writer)?;
        self.write_elements(writer)?;
        writer.write_end_element()
    }
}
