/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use time::{
    format_description::{well_known::Iso8601, well_known::Rfc3339, BorrowedFormatItem},
    macros::format_description,
    OffsetDateTime,
};

use crate::Error;

/// A scalar which can be read from and written to XML text content or an
/// attribute value.
pub trait WireValue: Sized {
    /// Parses `text`, found in the element or attribute `element`.
    fn from_wire(element: &str, text: &str) -> Result<Self, Error>;

    fn to_wire(&self) -> Result<String, Error>;
}

fn invalid(element: &str, text: &str) -> Error {
    Error::InvalidValue {
        element: element.to_owned(),
        value: text.to_owned(),
    }
}

impl WireValue for String {
    fn from_wire(_element: &str, text: &str) -> Result<Self, Error> {
        Ok(text.to_owned())
    }

    fn to_wire(&self) -> Result<String, Error> {
        Ok(self.clone())
    }
}

impl WireValue for bool {
    fn from_wire(element: &str, text: &str) -> Result<Self, Error> {
        match text.trim() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            _ => Err(invalid(element, text)),
        }
    }

    fn to_wire(&self) -> Result<String, Error> {
        Ok(if *self { "true" } else { "false" }.to_string())
    }
}

macro_rules! impl_wire_value_for_integer {
    ($($ty:ty),+) => {
        $(
            impl WireValue for $ty {
                fn from_wire(element: &str, text: &str) -> Result<Self, Error> {
                    text.trim().parse().map_err(|_| invalid(element, text))
                }

                fn to_wire(&self) -> Result<String, Error> {
                    Ok(self.to_string())
                }
            }
        )+
    };
}

impl_wire_value_for_integer!(i32, i64, u32, u64, usize);

/// Implements [`WireValue`] for closed enums deriving [`strum::Display`] and
/// [`strum::EnumString`], whose variant names are their wire names.
macro_rules! impl_wire_value_for_enum {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::xml::WireValue for $ty {
                fn from_wire(element: &str, text: &str) -> Result<Self, $crate::Error> {
                    <$ty as ::std::str::FromStr>::from_str(text.trim()).map_err(|_| {
                        $crate::Error::InvalidValue {
                            element: element.to_owned(),
                            value: text.to_owned(),
                        }
                    })
                }

                fn to_wire(&self) -> Result<String, $crate::Error> {
                    Ok(self.to_string())
                }
            }
        )+
    };
}

pub(crate) use impl_wire_value_for_enum;

/// A date and time with second precision.
///
/// Values are read as ISO 8601 and written as RFC 3339, which is the subset
/// of ISO 8601 Exchange emits itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct DateTime(pub OffsetDateTime);

impl WireValue for DateTime {
    fn from_wire(element: &str, text: &str) -> Result<Self, Error> {
        OffsetDateTime::parse(text.trim(), &Iso8601::DEFAULT)
            .map(DateTime)
            .map_err(|_| invalid(element, text))
    }

    fn to_wire(&self) -> Result<String, Error> {
        self.0.format(&Rfc3339).map_err(|err| Error::InvalidValue {
            element: "DateTime".to_string(),
            value: err.to_string(),
        })
    }
}

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// A calendar date without a time of day, as used by recurrence ranges.
///
/// Exchange may append a UTC offset to dates (`2024-03-01Z`,
/// `2024-03-01-08:00`); the offset is ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Date(pub time::Date);

impl WireValue for Date {
    fn from_wire(element: &str, text: &str) -> Result<Self, Error> {
        let date = text.trim().get(..10).ok_or_else(|| invalid(element, text))?;

        time::Date::parse(date, DATE_FORMAT)
            .map(Date)
            .map_err(|_| invalid(element, text))
    }

    fn to_wire(&self) -> Result<String, Error> {
        self.0.format(DATE_FORMAT).map_err(|err| Error::InvalidValue {
            element: "Date".to_string(),
            value: err.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use time::macros::{date, datetime};

    use super::*;

    #[test]
    fn booleans_accept_numeric_forms() {
        assert!(bool::from_wire("IsRecurring", "true").unwrap());
        assert!(bool::from_wire("IsRecurring", "1").unwrap());
        assert!(!bool::from_wire("IsRecurring", "0").unwrap());
        assert!(matches!(
            bool::from_wire("IsRecurring", "yes"),
            Err(Error::InvalidValue { element, value }) if element == "IsRecurring" && value == "yes"
        ));
    }

    #[test]
    fn integers_reject_garbage() {
        assert_eq!(i32::from_wire("UnreadCount", " 5 ").unwrap(), 5);
        assert!(u32::from_wire("Interval", "-1").is_err());
    }

    #[test]
    fn date_time_formats_as_rfc3339() {
        let value = DateTime::from_wire("Start", "2024-03-01T09:30:00Z").unwrap();
        assert_eq!(value, DateTime(datetime!(2024-03-01 09:30:00 UTC)));
        assert_eq!(value.to_wire().unwrap(), "2024-03-01T09:30:00Z");
    }

    #[test]
    fn date_ignores_trailing_offset() {
        assert_eq!(
            Date::from_wire("StartDate", "2024-03-01-08:00").unwrap(),
            Date(date!(2024 - 03 - 01))
        );
        assert_eq!(Date(date!(2024 - 12 - 31)).to_wire().unwrap(), "2024-12-31");
        assert!(Date::from_wire("StartDate", "2024").is_err());
    }
}
