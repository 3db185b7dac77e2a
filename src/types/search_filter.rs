/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Search restrictions.
//!
//! See <https://learn.microsoft.com/en-us/exchange/client-developer/web-service-reference/restriction>

use strum::{Display, EnumString};

use crate::{
    decoder::{self, VariantFamily},
    property::ValidationError,
    xml::{impl_wire_value_for_enum, XmlNamespace, XmlReader, XmlWriter},
    ChangeHandle, ComplexProperty, Error, PropertyPath,
};

/// A predicate over the properties of folders or items.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchFilter {
    IsEqualTo(RelationalFilter),
    IsNotEqualTo(RelationalFilter),
    IsGreaterThan(RelationalFilter),
    IsGreaterThanOrEqualTo(RelationalFilter),
    IsLessThan(RelationalFilter),
    IsLessThanOrEqualTo(RelationalFilter),
    Exists(ExistsFilter),
    Contains(ContainsFilter),
    Excludes(ExcludesFilter),
    And(SearchFilterCollection),
    Or(SearchFilterCollection),
    Not(NotFilter),
}

impl SearchFilter {
    fn inner(&self) -> &dyn ComplexProperty {
        match self {
            SearchFilter::IsEqualTo(filter)
            | SearchFilter::IsNotEqualTo(filter)
            | SearchFilter::IsGreaterThan(filter)
            | SearchFilter::IsGreaterThanOrEqualTo(filter)
            | SearchFilter::IsLessThan(filter)
            | SearchFilter::IsLessThanOrEqualTo(filter) => filter,
            SearchFilter::Exists(filter) => filter,
            SearchFilter::Contains(filter) => filter,
            SearchFilter::Excludes(filter) => filter,
            SearchFilter::And(filters) | SearchFilter::Or(filters) => filters,
            SearchFilter::Not(filter) => filter,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn ComplexProperty {
        match self {
            SearchFilter::IsEqualTo(filter)
            | SearchFilter::IsNotEqualTo(filter)
            | SearchFilter::IsGreaterThan(filter)
            | SearchFilter::IsGreaterThanOrEqualTo(filter)
            | SearchFilter::IsLessThan(filter)
            | SearchFilter::IsLessThanOrEqualTo(filter) => filter,
            SearchFilter::Exists(filter) => filter,
            SearchFilter::Contains(filter) => filter,
            SearchFilter::Excludes(filter) => filter,
            SearchFilter::And(filters) | SearchFilter::Or(filters) => filters,
            SearchFilter::Not(filter) => filter,
        }
    }

    /// Writes this filter as an element named after its variant.
    pub fn write(&self, writer: &mut XmlWriter) -> Result<(), Error> {
        self.write_to_xml(writer, XmlNamespace::Types, self.discriminator())
    }
}

impl VariantFamily for SearchFilter {
    const FAMILY: &'static str = "SearchFilter";

    fn variants() -> &'static [(&'static str, fn() -> Self)] {
        static VARIANTS: &[(&str, fn() -> SearchFilter)] = &[
            ("IsEqualTo", || SearchFilter::IsEqualTo(Default::default())),
            ("IsNotEqualTo", || SearchFilter::IsNotEqualTo(Default::default())),
            ("IsGreaterThan", || SearchFilter::IsGreaterThan(Default::default())),
            ("IsGreaterThanOrEqualTo", || {
                SearchFilter::IsGreaterThanOrEqualTo(Default::default())
            }),
            ("IsLessThan", || SearchFilter::IsLessThan(Default::default())),
            ("IsLessThanOrEqualTo", || {
                SearchFilter::IsLessThanOrEqualTo(Default::default())
            }),
            ("Exists", || SearchFilter::Exists(Default::default())),
            ("Contains", || SearchFilter::Contains(Default::default())),
            ("Excludes", || SearchFilter::Excludes(Default::default())),
            ("And", || SearchFilter::And(Default::default())),
            ("Or", || SearchFilter::Or(Default::default())),
            ("Not", || SearchFilter::Not(Default::default())),
        ];

        VARIANTS
    }

    fn discriminator(&self) -> &'static str {
        match self {
            SearchFilter::IsEqualTo(_) => "IsEqualTo",
            SearchFilter::IsNotEqualTo(_) => "IsNotEqualTo",
            SearchFilter::IsGreaterThan(_) => "IsGreaterThan",
            SearchFilter::IsGreaterThanOrEqualTo(_) => "IsGreaterThanOrEqualTo",
            SearchFilter::IsLessThan(_) => "IsLessThan",
            SearchFilter::IsLessThanOrEqualTo(_) => "IsLessThanOrEqualTo",
            SearchFilter::Exists(_) => "Exists",
            SearchFilter::Contains(_) => "Contains",
            SearchFilter::Excludes(_) => "Excludes",
            SearchFilter::And(_) => "And",
            SearchFilter::Or(_) => "Or",
            SearchFilter::Not(_) => "Not",
        }
    }

    fn load_variant(&mut self, reader: &mut XmlReader, element: &str) -> Result<(), Error> {
        self.load_from_xml(reader, element)
    }
}

impl ComplexProperty for SearchFilter {
    fn change_handle(&self) -> &ChangeHandle {
        self.inner().change_handle()
    }

    fn read_attributes(&mut self, reader: &XmlReader) -> Result<(), Error> {
        self.inner_mut().read_attributes(reader)
    }

    fn try_read_element(&mut self, reader: &mut XmlReader) -> Result<bool, Error> {
        self.inner_mut().try_read_element(reader)
    }

    fn write_attributes(&self, writer: &mut XmlWriter) -> Result<(), Error> {
        self.inner().write_attributes(writer)
    }

    fn write_elements(&self, writer: &mut XmlWriter) -> Result<(), Error> {
        self.inner().write_elements(writer)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        self.inner().validate()
    }
}

/// Reads a property path if the reader is positioned on one.
fn try_read_path(slot: &mut Option<PropertyPath>, reader: &mut XmlReader) -> Result<bool, Error> {
    match reader.local_name() {
        Some(name) if decoder::is_variant::<PropertyPath>(name) => {
            *slot = Some(decoder::decode(reader)?);
            Ok(true)
        }
        _ => Ok(false),
    }
}

/// Reads the `Value` attribute of an otherwise empty element.
fn read_value_element(reader: &mut XmlReader, element: &str) -> Result<String, Error> {
    reader.ensure_start_element(element)?;
    let value = reader.read_required_attribute("Value")?;
    reader.advance()?;
    reader.read_end_element(element)?;

    Ok(value)
}

fn write_value_element(writer: &mut XmlWriter, element: &str, value: &str) -> Result<(), Error> {
    writer.write_start_element(XmlNamespace::Types, element)?;
    writer.write_attribute("Value", value)?;
    writer.write_end_element()
}

fn require_path(path: &Option<PropertyPath>) -> Result<(), ValidationError> {
    match path {
        Some(_) => Ok(()),
        None => Err(ValidationError::new("a property path is required")),
    }
}

/// What a relational filter compares its property against.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Comparand {
    Constant(String),
    Property(PropertyPath),
}

/// A comparison between a property and a constant or another property.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RelationalFilter {
    path: Option<PropertyPath>,
    comparand: Option<Comparand>,
    handle: ChangeHandle,
}

impl RelationalFilter {
    pub fn new(path: PropertyPath, comparand: Comparand) -> Self {
        Self {
            path: Some(path),
            comparand: Some(comparand),
            handle: ChangeHandle::new(),
        }
    }

    pub fn path(&self) -> Option<&PropertyPath> {
        self.path.as_ref()
    }

    pub fn set_path(&mut self, path: PropertyPath) {
        self.path = Some(path);
        self.mark_changed();
    }

    pub fn comparand(&self) -> Option<&Comparand> {
        self.comparand.as_ref()
    }

    pub fn set_comparand(&mut self, comparand: Comparand) {
        self.comparand = Some(comparand);
        self.mark_changed();
    }
}

impl ComplexProperty for RelationalFilter {
    fn change_handle(&self) -> &ChangeHandle {
        &self.handle
    }

    fn try_read_element(&mut self, reader: &mut XmlReader) -> Result<bool, Error> {
        if try_read_path(&mut self.path, reader)? {
            return Ok(true);
        }

        if !reader.is_start_element("FieldURIOrConstant") {
            return Ok(false);
        }

        reader.advance()?;
        let comparand = if reader.is_start_element("Constant") {
            Comparand::Constant(read_value_element(reader, "Constant")?)
        } else {
            Comparand::Property(decoder::decode(reader)?)
        };
        reader.read_end_element("FieldURIOrConstant")?;

        self.comparand = Some(comparand);

        Ok(true)
    }

    fn write_elements(&self, writer: &mut XmlWriter) -> Result<(), Error> {
        if let Some(path) = &self.path {
            path.write_to_xml(writer)?;
        }

        if let Some(comparand) = &self.comparand {
            writer.write_start_element(XmlNamespace::Types, "FieldURIOrConstant")?;
            match comparand {
                Comparand::Constant(value) => write_value_element(writer, "Constant", value)?,
                Comparand::Property(path) => path.write_to_xml(writer)?,
            }
            writer.write_end_element()?;
        }

        Ok(())
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_path(&self.path)?;

        if self.comparand.is_none() {
            return Err(ValidationError::field(
                "FieldURIOrConstant",
                "either a value or a property to compare with is required",
            ));
        }

        Ok(())
    }
}

/// Matches entities on which a property has a value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExistsFilter {
    path: Option<PropertyPath>,
    handle: ChangeHandle,
}

impl ExistsFilter {
    pub fn new(path: PropertyPath) -> Self {
        Self {
            path: Some(path),
            handle: ChangeHandle::new(),
        }
    }

    pub fn path(&self) -> Option<&PropertyPath> {
        self.path.as_ref()
    }

    pub fn set_path(&mut self, path: PropertyPath) {
        self.path = Some(path);
        self.mark_changed();
    }
}

impl ComplexProperty for ExistsFilter {
    fn change_handle(&self) -> &ChangeHandle {
        &self.handle
    }

    fn try_read_element(&mut self, reader: &mut XmlReader) -> Result<bool, Error> {
        try_read_path(&mut self.path, reader)
    }

    fn write_elements(&self, writer: &mut XmlWriter) -> Result<(), Error> {
        match &self.path {
            Some(path) => path.write_to_xml(writer),
            None => Ok(()),
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_path(&self.path)
    }
}

/// Which part of a string property a [`ContainsFilter`] value must match.
///
/// See <https://learn.microsoft.com/en-us/exchange/client-developer/web-service-reference/contains#containmentmode-attribute>
#[derive(Clone, Copy, Debug, Display, EnumString, PartialEq, Eq)]
pub enum ContainmentMode {
    FullString,
    Prefixed,
    Substring,
    PrefixOnWords,
    ExactPhrase,
}

/// How strictly a [`ContainsFilter`] compares characters.
///
/// See <https://learn.microsoft.com/en-us/exchange/client-developer/web-service-reference/contains#containmentcomparison-attribute>
#[derive(Clone, Copy, Debug, Display, EnumString, PartialEq, Eq)]
pub enum ContainmentComparison {
    Exact,
    IgnoreCase,
    IgnoreNonSpacingCharacters,
    Loose,
    IgnoreCaseAndNonSpacingCharacters,
    LooseAndIgnoreCase,
    LooseAndIgnoreNonSpace,
    LooseAndIgnoreCaseAndIgnoreNonSpace,
}

impl_wire_value_for_enum!(ContainmentMode, ContainmentComparison);

/// Matches entities where a string property contains a value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContainsFilter {
    path: Option<PropertyPath>,
    value: Option<String>,
    containment_mode: Option<ContainmentMode>,
    containment_comparison: Option<ContainmentComparison>,
    handle: ChangeHandle,
}

impl ContainsFilter {
    pub fn new(
        path: PropertyPath,
        value: impl Into<String>,
        containment_mode: ContainmentMode,
        containment_comparison: ContainmentComparison,
    ) -> Self {
        Self {
            path: Some(path),
            value: Some(value.into()),
            containment_mode: Some(containment_mode),
            containment_comparison: Some(containment_comparison),
            handle: ChangeHandle::new(),
        }
    }

    pub fn path(&self) -> Option<&PropertyPath> {
        self.path.as_ref()
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn containment_mode(&self) -> Option<ContainmentMode> {
        self.containment_mode
    }

    pub fn containment_comparison(&self) -> Option<ContainmentComparison> {
        self.containment_comparison
    }

    pub fn set_path(&mut self, path: PropertyPath) {
        self.path = Some(path);
        self.mark_changed();
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = Some(value.into());
        self.mark_changed();
    }

    pub fn set_containment_mode(&mut self, mode: ContainmentMode) {
        self.containment_mode = Some(mode);
        self.mark_changed();
    }

    pub fn set_containment_comparison(&mut self, comparison: ContainmentComparison) {
        self.containment_comparison = Some(comparison);
        self.mark_changed();
    }
}

impl ComplexProperty for ContainsFilter {
    fn change_handle(&self) -> &ChangeHandle {
        &self.handle
    }

    fn read_attributes(&mut self, reader: &XmlReader) -> Result<(), Error> {
        self.containment_mode = reader.read_attribute("ContainmentMode")?;
        self.containment_comparison = reader.read_attribute("ContainmentComparison")?;

        Ok(())
    }

    fn try_read_element(&mut self, reader: &mut XmlReader) -> Result<bool, Error> {
        if try_read_path(&mut self.path, reader)? {
            return Ok(true);
        }

        if reader.is_start_element("Constant") {
            self.value = Some(read_value_element(reader, "Constant")?);
            return Ok(true);
        }

        Ok(false)
    }

    fn write_attributes(&self, writer: &mut XmlWriter) -> Result<(), Error> {
        if let Some(mode) = self.containment_mode {
            writer.write_attribute("ContainmentMode", &mode.to_string())?;
        }
        if let Some(comparison) = self.containment_comparison {
            writer.write_attribute("ContainmentComparison", &comparison.to_string())?;
        }

        Ok(())
    }

    fn write_elements(&self, writer: &mut XmlWriter) -> Result<(), Error> {
        if let Some(path) = &self.path {
            path.write_to_xml(writer)?;
        }
        if let Some(value) = &self.value {
            write_value_element(writer, "Constant", value)?;
        }

        Ok(())
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_path(&self.path)?;

        if self.value.is_none() {
            return Err(ValidationError::field("Constant", "a value to search for is required"));
        }

        Ok(())
    }
}

/// Matches entities where a bitmask property has none of the given bits set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExcludesFilter {
    path: Option<PropertyPath>,
    bitmask: Option<String>,
    handle: ChangeHandle,
}

impl ExcludesFilter {
    pub fn new(path: PropertyPath, bitmask: impl Into<String>) -> Self {
        Self {
            path: Some(path),
            bitmask: Some(bitmask.into()),
            handle: ChangeHandle::new(),
        }
    }

    pub fn path(&self) -> Option<&PropertyPath> {
        self.path.as_ref()
    }

    /// The bitmask, as a decimal or `0x`-prefixed hexadecimal string.
    pub fn bitmask(&self) -> Option<&str> {
        self.bitmask.as_deref()
    }

    pub fn set_path(&mut self, path: PropertyPath) {
        self.path = Some(path);
        self.mark_changed();
    }

    pub fn set_bitmask(&mut self, bitmask: impl Into<String>) {
        self.bitmask = Some(bitmask.into());
        self.mark_changed();
    }
}

impl ComplexProperty for ExcludesFilter {
    fn change_handle(&self) -> &ChangeHandle {
        &self.handle
    }

    fn try_read_element(&mut self, reader: &mut XmlReader) -> Result<bool, Error> {
        if try_read_path(&mut self.path, reader)? {
            return Ok(true);
        }

        if reader.is_start_element("Bitmask") {
            self.bitmask = Some(read_value_element(reader, "Bitmask")?);
            return Ok(true);
        }

        Ok(false)
    }

    fn write_elements(&self, writer: &mut XmlWriter) -> Result<(), Error> {
        if let Some(path) = &self.path {
            path.write_to_xml(writer)?;
        }
        if let Some(bitmask) = &self.bitmask {
            write_value_element(writer, "Bitmask", bitmask)?;
        }

        Ok(())
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_path(&self.path)?;

        if self.bitmask.is_none() {
            return Err(ValidationError::field("Bitmask", "a bitmask is required"));
        }

        Ok(())
    }
}

/// The operands of an `And` or `Or` filter.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchFilterCollection {
    filters: Vec<SearchFilter>,
    handle: ChangeHandle,
}

impl SearchFilterCollection {
    pub fn iter(&self) -> impl Iterator<Item = &SearchFilter> {
        self.filters.iter()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SearchFilter> {
        self.filters.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut SearchFilter> {
        let filter = self.filters.get_mut(index)?;
        filter.change_handle().attach_to(&self.handle);

        Some(filter)
    }

    pub fn push(&mut self, filter: SearchFilter) {
        filter.change_handle().attach_to(&self.handle);
        self.filters.push(filter);
        self.mark_changed();
    }

    pub fn remove(&mut self, index: usize) -> Option<SearchFilter> {
        if index >= self.filters.len() {
            return None;
        }

        let removed = self.filters.remove(index);
        removed.change_handle().detach();
        self.mark_changed();

        Some(removed)
    }
}

impl FromIterator<SearchFilter> for SearchFilterCollection {
    fn from_iter<I: IntoIterator<Item = SearchFilter>>(iter: I) -> Self {
        Self {
            filters: iter.into_iter().collect(),
            handle: ChangeHandle::new(),
        }
    }
}

impl ComplexProperty for SearchFilterCollection {
    fn change_handle(&self) -> &ChangeHandle {
        &self.handle
    }

    fn try_read_element(&mut self, reader: &mut XmlReader) -> Result<bool, Error> {
        self.filters.push(decoder::decode(reader)?);
        Ok(true)
    }

    fn write_elements(&self, writer: &mut XmlWriter) -> Result<(), Error> {
        for filter in &self.filters {
            filter.write(writer)?;
        }

        Ok(())
    }

    fn validate(&self) -> Result<(), ValidationError> {
        for (index, filter) in self.filters.iter().enumerate() {
            filter
                .validate()
                .map_err(|err| err.within(format!("{}[{index}]", filter.discriminator())))?;
        }

        Ok(())
    }
}

/// Negates another filter.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NotFilter {
    filter: Option<Box<SearchFilter>>,
    handle: ChangeHandle,
}

impl NotFilter {
    pub fn new(filter: SearchFilter) -> Self {
        let not = Self {
            filter: Some(Box::new(filter)),
            handle: ChangeHandle::new(),
        };
        if let Some(filter) = &not.filter {
            filter.change_handle().attach_to(&not.handle);
        }

        not
    }

    pub fn filter(&self) -> Option<&SearchFilter> {
        self.filter.as_deref()
    }

    pub fn filter_mut(&mut self) -> Option<&mut SearchFilter> {
        let filter = self.filter.as_deref_mut()?;
        filter.change_handle().attach_to(&self.handle);

        Some(filter)
    }

    pub fn set_filter(&mut self, filter: SearchFilter) {
        if let Some(previous) = &self.filter {
            previous.change_handle().detach();
        }

        filter.change_handle().attach_to(&self.handle);
        self.filter = Some(Box::new(filter));
        self.mark_changed();
    }
}

impl ComplexProperty for NotFilter {
    fn change_handle(&self) -> &ChangeHandle {
        &self.handle
    }

    fn try_read_element(&mut self, reader: &mut XmlReader) -> Result<bool, Error> {
        if self.filter.is_some() {
            return Ok(false);
        }

        self.filter = Some(Box::new(decoder::decode(reader)?));
        Ok(true)
    }

    fn write_elements(&self, writer: &mut XmlWriter) -> Result<(), Error> {
        match &self.filter {
            Some(filter) => filter.write(writer),
            None => Ok(()),
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        match &self.filter {
            Some(filter) => filter
                .validate()
                .map_err(|err| err.within(filter.discriminator())),
            None => Err(ValidationError::new("a filter to negate is required")),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;
    use crate::{property::ChangeLog, ExchangeVersion};

    fn decode_filter(xml: &str) -> Result<SearchFilter, Error> {
        let mut reader = XmlReader::new(xml, ExchangeVersion::LATEST)?;
        decoder::decode(&mut reader)
    }

    fn assert_filter_round_trip(xml: &str) -> SearchFilter {
        let filter = decode_filter(xml).unwrap();

        let mut writer = XmlWriter::new(ExchangeVersion::LATEST);
        filter.write(&mut writer).unwrap();
        assert_eq!(writer.into_string().unwrap(), xml);

        filter
    }

    #[test]
    fn relational_filters() {
        let filter = assert_filter_round_trip(
            r#"<t:IsEqualTo><t:FieldURI FieldURI="folder:DisplayName"/><t:FieldURIOrConstant><t:Constant Value="Inbox"/></t:FieldURIOrConstant></t:IsEqualTo>"#,
        );
        assert_eq!(
            filter,
            SearchFilter::IsEqualTo(RelationalFilter::new(
                PropertyPath::field("folder:DisplayName"),
                Comparand::Constant("Inbox".to_string()),
            ))
        );

        let filter = assert_filter_round_trip(
            r#"<t:IsGreaterThanOrEqualTo><t:FieldURI FieldURI="item:DateTimeReceived"/><t:FieldURIOrConstant><t:FieldURI FieldURI="item:DateTimeSent"/></t:FieldURIOrConstant></t:IsGreaterThanOrEqualTo>"#,
        );
        assert!(matches!(
            filter,
            SearchFilter::IsGreaterThanOrEqualTo(ref relational)
                if relational.comparand() == Some(&Comparand::Property(PropertyPath::field("item:DateTimeSent")))
        ));

        for name in [
            "IsNotEqualTo",
            "IsGreaterThan",
            "IsLessThan",
            "IsLessThanOrEqualTo",
        ] {
            let xml = format!(
                r#"<t:{name}><t:FieldURI FieldURI="folder:UnreadCount"/><t:FieldURIOrConstant><t:Constant Value="5"/></t:FieldURIOrConstant></t:{name}>"#
            );
            let filter = assert_filter_round_trip(&xml);
            assert_eq!(filter.discriminator(), name);
        }
    }

    #[test]
    fn leaf_filters() {
        assert_filter_round_trip(
            r#"<t:Exists><t:ExtendedFieldURI PropertyTag="0x1081" PropertyType="Integer"/></t:Exists>"#,
        );

        let filter = assert_filter_round_trip(
            r#"<t:Contains ContainmentMode="Substring" ContainmentComparison="IgnoreCase"><t:FieldURI FieldURI="item:Subject"/><t:Constant Value="report"/></t:Contains>"#,
        );
        match filter {
            SearchFilter::Contains(contains) => {
                assert_eq!(contains.value(), Some("report"));
                assert_eq!(contains.containment_mode(), Some(ContainmentMode::Substring));
                assert_eq!(
                    contains.containment_comparison(),
                    Some(ContainmentComparison::IgnoreCase)
                );
            }
            other => panic!("expected a Contains filter, got {other:?}"),
        }

        assert_filter_round_trip(
            r#"<t:Excludes><t:FieldURI FieldURI="message:Flags"/><t:Bitmask Value="0x4"/></t:Excludes>"#,
        );
    }

    #[test]
    fn nested_filters() {
        let filter = assert_filter_round_trip(
            r#"<t:Not><t:Or><t:Exists><t:FieldURI FieldURI="item:Categories"/></t:Exists><t:And><t:IsEqualTo><t:FieldURI FieldURI="item:Importance"/><t:FieldURIOrConstant><t:Constant Value="High"/></t:FieldURIOrConstant></t:IsEqualTo></t:And></t:Or></t:Not>"#,
        );

        let SearchFilter::Not(not) = filter else {
            panic!("expected a Not filter");
        };
        let Some(SearchFilter::Or(operands)) = not.filter() else {
            panic!("expected an Or filter");
        };
        assert_eq!(operands.len(), 2);
    }

    #[test]
    fn unknown_filter_fails_whole_decode() {
        let err = decode_filter(
            r#"<t:And><t:Exists><t:FieldURI FieldURI="item:Subject"/></t:Exists><t:FutureFilterType/></t:And>"#,
        )
        .expect_err("unknown filters should fail the decode");

        assert!(matches!(
            err,
            Error::UnknownVariant { family: "SearchFilter", discriminator } if discriminator == "FutureFilterType"
        ));
    }

    #[test]
    fn unknown_child_is_structural_error() {
        let err = decode_filter(
            r#"<t:Exists><t:FieldURI FieldURI="item:Subject"/><t:Constant Value="x"/></t:Exists>"#,
        )
        .expect_err("constants aren't part of Exists");

        assert!(matches!(err, Error::UnexpectedElement { .. }));
    }

    #[test]
    fn validation_reports_nested_path() {
        let mut and = SearchFilterCollection::default();
        and.push(SearchFilter::Exists(ExistsFilter::new(PropertyPath::field(
            "item:Subject",
        ))));
        and.push(SearchFilter::IsEqualTo(RelationalFilter {
            path: Some(PropertyPath::field("item:Importance")),
            ..Default::default()
        }));
        let filter = SearchFilter::Not(NotFilter::new(SearchFilter::And(and)));

        let err = filter.validate().expect_err("the comparison has no comparand");
        assert_eq!(err.path, ["And", "IsEqualTo[1]", "FieldURIOrConstant"]);

        assert!(NotFilter::default().validate().is_err());
        assert!(ContainsFilter::default().validate().is_err());
        assert!(ExcludesFilter {
            path: Some(PropertyPath::field("message:Flags")),
            ..Default::default()
        }
        .validate()
        .is_err());
    }

    #[test]
    fn nested_mutation_notifies_owner() {
        let log = Rc::new(RefCell::new(ChangeLog::default()));

        let mut and = SearchFilterCollection::default();
        and.push(SearchFilter::Contains(ContainsFilter::default()));
        let mut filter = SearchFilter::Not(NotFilter::new(SearchFilter::And(and)));
        filter.change_handle().attach_to_store(&log, "Restriction");

        let SearchFilter::Not(not) = &mut filter else {
            unreachable!()
        };
        let Some(SearchFilter::And(and)) = not.filter_mut() else {
            unreachable!()
        };
        let Some(SearchFilter::Contains(contains)) = and.get_mut(0) else {
            unreachable!()
        };
        contains.set_value("quarterly");

        assert!(log.borrow().is_modified("Restriction"));
    }
}
