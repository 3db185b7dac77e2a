/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Selection of concrete variants for open-ended wire elements.
//!
//! Each family of open-ended values (search filters, recurrence patterns,
//! settings, error records) is a closed Rust enum with a static table mapping
//! the wire discriminator of each variant to a constructor. Decoding looks the
//! discriminator up, constructs an empty variant and lets it consume the rest
//! of its element. Matching is exact and case-sensitive.

use crate::{xml::XmlReader, Error};

/// A closed family of variants decoded from a wire discriminator.
pub trait VariantFamily: Sized + 'static {
    /// The family's name, as reported in [`Error::UnknownVariant`].
    const FAMILY: &'static str;

    /// Every discriminator of the family with a constructor for an empty
    /// instance of the matching variant.
    fn variants() -> &'static [(&'static str, fn() -> Self)];

    /// The discriminator this value is written with.
    fn discriminator(&self) -> &'static str;

    /// Consumes the element `element` the reader is positioned on into this
    /// freshly constructed variant.
    fn load_variant(&mut self, reader: &mut XmlReader, element: &str) -> Result<(), Error>;
}

/// Looks up the constructor registered for `discriminator`.
pub fn constructor_for<F: VariantFamily>(discriminator: &str) -> Result<fn() -> F, Error> {
    F::variants()
        .iter()
        .find(|(name, _)| *name == discriminator)
        .map(|(_, constructor)| *constructor)
        .ok_or_else(|| Error::UnknownVariant {
            family: F::FAMILY,
            discriminator: discriminator.to_owned(),
        })
}

/// Decodes the element `element` as the variant named by `discriminator`.
pub fn decode_with<F: VariantFamily>(
    discriminator: &str,
    reader: &mut XmlReader,
    element: &str,
) -> Result<F, Error> {
    let mut value = constructor_for::<F>(discriminator)?();
    value.load_variant(reader, element)?;

    Ok(value)
}

/// Decodes the element the reader is positioned on, using its local name as
/// the discriminator.
pub fn decode<F: VariantFamily>(reader: &mut XmlReader) -> Result<F, Error> {
    let name = match reader.local_name() {
        Some(name) if reader.is_start() => name.to_owned(),
        _ => return Err(reader.unexpected(format!("a {} element", F::FAMILY))),
    };

    decode_with(&name, reader, &name)
}

/// Whether `name` is the discriminator of some variant of `F`.
pub fn is_variant<F: VariantFamily>(name: &str) -> bool {
    F::variants().iter().any(|(candidate, _)| *candidate == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ExchangeVersion;

    #[derive(Debug, PartialEq)]
    enum Shape {
        Circle(String),
        Square(String),
    }

    impl VariantFamily for Shape {
        const FAMILY: &'static str = "Shape";

        fn variants() -> &'static [(&'static str, fn() -> Self)] {
            static VARIANTS: &[(&str, fn() -> Shape)] = &[
                ("Circle", || Shape::Circle(String::new())),
                ("Square", || Shape::Square(String::new())),
            ];

            VARIANTS
        }

        fn discriminator(&self) -> &'static str {
            match self {
                Shape::Circle(_) => "Circle",
                Shape::Square(_) => "Square",
            }
        }

        fn load_variant(&mut self, reader: &mut XmlReader, element: &str) -> Result<(), Error> {
            let text: String = reader.read_element_value(element)?;
            match self {
                Shape::Circle(value) | Shape::Square(value) => *value = text,
            }

            Ok(())
        }
    }

    #[test]
    fn decode_by_element_name() {
        let mut reader = XmlReader::new("<t:Square>4</t:Square>", ExchangeVersion::LATEST).unwrap();
        let shape: Shape = decode(&mut reader).unwrap();

        assert_eq!(shape, Shape::Square("4".to_string()));
        assert_eq!(shape.discriminator(), "Square");
        assert!(reader.is_eof());
    }

    #[test]
    fn matching_is_case_sensitive() {
        let mut reader = XmlReader::new("<t:circle>1</t:circle>", ExchangeVersion::LATEST).unwrap();
        let err = decode::<Shape>(&mut reader).expect_err("lowercase names should not match");

        assert!(matches!(
            err,
            Error::UnknownVariant { family: "Shape", discriminator } if discriminator == "circle"
        ));
        assert!(!is_variant::<Shape>("Triangle"));
        assert!(is_variant::<Shape>("Circle"));
    }
}
