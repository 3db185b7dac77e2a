/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use strum::{Display, EnumString};

use crate::{
    decoder::{self, VariantFamily},
    property::ValidationError,
    xml::{impl_wire_value_for_enum, XmlNamespace, XmlReader, XmlWriter},
    ChangeHandle, ComplexProperty, Error, FolderIdCollection, SearchFilter,
};

/// How deep into the folder hierarchy a search folder searches.
///
/// See <https://learn.microsoft.com/en-us/exchange/client-developer/web-service-reference/searchparameters#traversal-attribute>
#[derive(Clone, Copy, Debug, Default, Display, EnumString, PartialEq, Eq)]
pub enum SearchFolderTraversal {
    /// Only the base folders themselves.
    #[default]
    Shallow,

    /// The base folders and all of their descendants.
    Deep,
}

impl_wire_value_for_enum!(SearchFolderTraversal);

/// The definition of a search folder: which folders it searches, and for
/// what.
///
/// See <https://learn.microsoft.com/en-us/exchange/client-developer/web-service-reference/searchparameters>
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchParameters {
    traversal: SearchFolderTraversal,
    restriction: Option<SearchFilter>,
    base_folder_ids: FolderIdCollection,
    handle: ChangeHandle,
}

impl SearchParameters {
    pub fn traversal(&self) -> SearchFolderTraversal {
        self.traversal
    }

    pub fn set_traversal(&mut self, traversal: SearchFolderTraversal) {
        self.traversal = traversal;
        self.mark_changed();
    }

    pub fn restriction(&self) -> Option<&SearchFilter> {
        self.restriction.as_ref()
    }

    pub fn restriction_mut(&mut self) -> Option<&mut SearchFilter> {
        let restriction = self.restriction.as_mut()?;
        restriction.change_handle().attach_to(&self.handle);

        Some(restriction)
    }

    pub fn set_restriction(&mut self, restriction: Option<SearchFilter>) {
        if let Some(previous) = &self.restriction {
            previous.change_handle().detach();
        }
        if let Some(restriction) = &restriction {
            restriction.change_handle().attach_to(&self.handle);
        }

        self.restriction = restriction;
        self.mark_changed();
    }

    pub fn base_folder_ids(&self) -> &FolderIdCollection {
        &self.base_folder_ids
    }

    pub fn base_folder_ids_mut(&mut self) -> &mut FolderIdCollection {
        self.base_folder_ids.change_handle().attach_to(&self.handle);
        &mut self.base_folder_ids
    }
}

impl ComplexProperty for SearchParameters {
    fn change_handle(&self) -> &ChangeHandle {
        &self.handle
    }

    fn read_attributes(&mut self, reader: &XmlReader) -> Result<(), Error> {
        self.traversal = reader.read_attribute("Traversal")?.unwrap_or_default();
        Ok(())
    }

    fn try_read_element(&mut self, reader: &mut XmlReader) -> Result<bool, Error> {
        if reader.is_start_element("Restriction") {
            reader.advance()?;
            self.restriction = Some(decoder::decode(reader)?);
            reader.read_end_element("Restriction")?;

            return Ok(true);
        }

        if reader.is_start_element("BaseFolderIds") {
            let mut ids = FolderIdCollection::default();
            ids.load_from_xml(reader, "BaseFolderIds")?;
            self.base_folder_ids = ids;

            return Ok(true);
        }

        Ok(false)
    }

    fn write_attributes(&self, writer: &mut XmlWriter) -> Result<(), Error> {
        writer.write_attribute("Traversal", &self.traversal.to_string())
    }

    fn write_elements(&self, writer: &mut XmlWriter) -> Result<(), Error> {
        if let Some(restriction) = &self.restriction {
            writer.write_start_element(XmlNamespace::Types, "Restriction")?;
            restriction.write(writer)?;
            writer.write_end_element()?;
        }

        self.base_folder_ids
            .write_to_xml(writer, XmlNamespace::Types, "BaseFolderIds")
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(restriction) = &self.restriction {
            restriction.validate().map_err(|err| {
                err.within(restriction.discriminator())
                    .within("Restriction")
            })?;
        }

        if self.base_folder_ids.is_empty() {
            return Err(ValidationError::field(
                "BaseFolderIds",
                "at least one folder to search is required",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        test_utils::{assert_round_trip, assert_serialized_content},
        BaseFolderId, ExistsFilter, PropertyPath,
    };

    #[test]
    fn search_parameters_round_trip() {
        let parameters: SearchParameters = assert_round_trip(
            r#"<t:SearchParameters Traversal="Deep"><t:Restriction><t:Exists><t:FieldURI FieldURI="item:Categories"/></t:Exists></t:Restriction><t:BaseFolderIds><t:DistinguishedFolderId Id="inbox"/></t:BaseFolderIds></t:SearchParameters>"#,
            "SearchParameters",
        );

        assert_eq!(parameters.traversal(), SearchFolderTraversal::Deep);
        assert!(matches!(
            parameters.restriction(),
            Some(SearchFilter::Exists(_))
        ));
        assert_eq!(parameters.base_folder_ids().len(), 1);
    }

    #[test]
    fn traversal_defaults_to_shallow() {
        let mut parameters = SearchParameters::default();
        parameters
            .base_folder_ids_mut()
            .push(BaseFolderId::distinguished("inbox"));

        assert_serialized_content(
            &parameters,
            "SearchParameters",
            r#"<t:SearchParameters Traversal="Shallow"><t:BaseFolderIds><t:DistinguishedFolderId Id="inbox"/></t:BaseFolderIds></t:SearchParameters>"#,
        );
    }

    #[test]
    fn validation() {
        let mut parameters = SearchParameters::default();
        parameters.set_restriction(Some(SearchFilter::Exists(ExistsFilter::new(
            PropertyPath::field("item:Subject"),
        ))));

        let err = parameters
            .validate()
            .expect_err("search folders need a folder to search");
        assert_eq!(err.path, ["BaseFolderIds"]);

        parameters
            .base_folder_ids_mut()
            .push(BaseFolderId::distinguished("inbox"));
        assert_eq!(parameters.validate(), Ok(()));

        parameters.set_restriction(Some(SearchFilter::Exists(ExistsFilter::default())));
        let err = parameters.validate().expect_err("Exists needs a path");
        assert_eq!(err.path, ["Restriction", "Exists"]);
    }
}
