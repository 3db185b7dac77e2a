/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Engine-wide settings supplied by the embedding application.

use serde::Deserialize;

use crate::{Error, ExchangeVersion};

/// Settings shared by every encode, decode and diff performed on behalf of
/// one account.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EngineConfig {
    /// The schema version requests are encoded for, and responses are
    /// assumed to conform to.
    pub requested_server_version: ExchangeVersion,

    /// Whether to log the full XML of every request and response.
    ///
    /// Payloads may include message content and addresses, so this should
    /// only be enabled for debugging.
    pub trace_wire_traffic: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            requested_server_version: ExchangeVersion::LATEST,
            trace_wire_traffic: false,
        }
    }
}

impl EngineConfig {
    /// Reads a configuration from its JSON representation. Missing fields
    /// take their default value.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    /// A configuration targeting `version` with tracing disabled.
    pub fn for_version(version: ExchangeVersion) -> Self {
        Self {
            requested_server_version: version,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_config() {
        let config = EngineConfig::from_json(
            r#"{"requested_server_version": "Exchange2010_SP2", "trace_wire_traffic": true}"#,
        )
        .unwrap();

        assert_eq!(
            config,
            EngineConfig {
                requested_server_version: ExchangeVersion::Exchange2010_SP2,
                trace_wire_traffic: true,
            }
        );
    }

    #[test]
    fn missing_fields_use_defaults() {
        let config = EngineConfig::from_json("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.requested_server_version, ExchangeVersion::Exchange2013_SP1);
    }

    #[test]
    fn unknown_version_is_rejected() {
        let err = EngineConfig::from_json(r#"{"requested_server_version": "Exchange2030"}"#)
            .expect_err("unknown versions should not parse");
        assert!(matches!(err, Error::Config(_)));
    }
}
