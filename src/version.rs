/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use serde::Deserialize;
use strum::{Display, EnumString, IntoStaticStr};

use crate::Error;

/// The Exchange Server schema versions a request can target.
///
/// Variants are declared in release order, so comparisons follow the
/// chronology of the schema. Variant names are the wire tokens.
///
/// See <https://learn.microsoft.com/en-us/exchange/client-developer/web-service-reference/requestserverversion#version-attribute-values>
#[allow(non_camel_case_types)]
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Deserialize,
    Display,
    EnumString,
    IntoStaticStr,
)]
pub enum ExchangeVersion {
    Exchange2007,
    Exchange2007_SP1,
    Exchange2010,
    Exchange2010_SP1,
    Exchange2010_SP2,
    Exchange2013,
    Exchange2013_SP1,
}

impl ExchangeVersion {
    /// The most recent schema version this crate knows about.
    pub const LATEST: ExchangeVersion = ExchangeVersion::Exchange2013_SP1;

    /// The version named by a `RequestServerVersion` token.
    pub fn parse(token: &str) -> Result<Self, Error> {
        token
            .parse()
            .map_err(|_| Error::UnknownServerVersion(token.to_owned()))
    }

    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

impl Default for ExchangeVersion {
    fn default() -> Self {
        Self::LATEST
    }
}

/// Schema features which only exist from a given server version onwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Feature {
    /// `FirstDayOfWeek` on weekly recurrence patterns.
    FirstDayOfWeek,

    /// Retention and archive policy tags on folders.
    RetentionTags,

    /// The `Preview` element on items.
    ItemPreview,

    /// Autodiscover `GetUserSettings`.
    UserSettings,

    /// Autodiscover `GetDomainSettings`.
    DomainSettings,
}

impl Feature {
    /// The earliest version in which this feature is part of the schema.
    pub const fn minimum_version(self) -> ExchangeVersion {
        match self {
            Feature::FirstDayOfWeek => ExchangeVersion::Exchange2010_SP1,
            Feature::RetentionTags => ExchangeVersion::Exchange2010_SP1,
            Feature::ItemPreview => ExchangeVersion::Exchange2013,
            Feature::UserSettings => ExchangeVersion::Exchange2010,
            Feature::DomainSettings => ExchangeVersion::Exchange2010_SP1,
        }
    }
}

/// Whether `feature` is available when talking to a server at `version`.
pub fn is_feature_supported(feature: Feature, version: ExchangeVersion) -> bool {
    version >= feature.minimum_version()
}

/// Fails with [`Error::UnsupportedFeature`] if `feature` isn't available at
/// `version`.
pub fn ensure_feature_supported(feature: Feature, version: ExchangeVersion) -> Result<(), Error> {
    if is_feature_supported(feature, version) {
        Ok(())
    } else {
        Err(Error::UnsupportedFeature {
            feature,
            required: feature.minimum_version(),
            version,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn versions_are_ordered_chronologically() {
        assert!(ExchangeVersion::Exchange2007 < ExchangeVersion::Exchange2007_SP1);
        assert!(ExchangeVersion::Exchange2010_SP2 < ExchangeVersion::Exchange2013);
        assert_eq!(ExchangeVersion::default(), ExchangeVersion::Exchange2013_SP1);
    }

    #[test]
    fn version_tokens() {
        assert_eq!(
            ExchangeVersion::parse("Exchange2010_SP1").unwrap(),
            ExchangeVersion::Exchange2010_SP1
        );
        assert!(matches!(
            ExchangeVersion::parse("Exchange2030"),
            Err(Error::UnknownServerVersion(version)) if version == "Exchange2030"
        ));
        assert!(ExchangeVersion::parse("exchange2013").is_err());

        assert_eq!(ExchangeVersion::Exchange2007_SP1.as_str(), "Exchange2007_SP1");
        assert_eq!(ExchangeVersion::Exchange2013.to_string(), "Exchange2013");
    }

    #[test]
    fn feature_gate() {
        assert!(!is_feature_supported(
            Feature::FirstDayOfWeek,
            ExchangeVersion::Exchange2010
        ));
        assert!(is_feature_supported(
            Feature::FirstDayOfWeek,
            ExchangeVersion::Exchange2010_SP1
        ));
        assert!(is_feature_supported(
            Feature::ItemPreview,
            ExchangeVersion::Exchange2013_SP1
        ));

        let err = ensure_feature_supported(Feature::DomainSettings, ExchangeVersion::Exchange2010)
            .expect_err("domain settings should not be available in Exchange 2010");
        assert!(matches!(
            err,
            Error::UnsupportedFeature {
                feature: Feature::DomainSettings,
                required: ExchangeVersion::Exchange2010_SP1,
                version: ExchangeVersion::Exchange2010,
            }
        ));
    }
}
