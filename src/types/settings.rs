/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! User and domain settings returned by the autodiscover service.
//!
//! Setting values are polymorphic: each `UserSetting` or `DomainSetting`
//! element names its concrete shape in an `i:type` attribute.
//!
//! These values only ever come from a server response and are exposed
//! read-only. Their change handles are never attached to an owner.
//!
//! See <https://learn.microsoft.com/en-us/exchange/client-developer/web-service-reference/usersettings-soap>

use strum::{Display, EnumString};

use crate::{
    decoder::{self, VariantFamily},
    version::{ensure_feature_supported, Feature},
    xml::{impl_wire_value_for_enum, WireValue, XmlNamespace, XmlReader, XmlWriter},
    ChangeHandle, ComplexProperty, Error,
};

const NS: XmlNamespace = XmlNamespace::NotSpecified;

/// The attribute carrying a setting's concrete type, matched by local name.
const TYPE_ATTRIBUTE: &str = "type";

/// Response and per-setting error codes.
///
/// See <https://learn.microsoft.com/en-us/exchange/client-developer/web-service-reference/errorcode-soap>
#[derive(Clone, Copy, Debug, Default, Display, EnumString, PartialEq, Eq)]
pub enum AutodiscoverErrorCode {
    #[default]
    NoError,
    RedirectAddress,
    RedirectUrl,
    InvalidUser,
    InvalidRequest,
    InvalidSetting,
    SettingIsNotAvailable,
    ServerBusy,
    InvalidDomain,
    NotFederated,
    InternalServerError,
}

impl_wire_value_for_enum!(AutodiscoverErrorCode);

/// Whether a response describes a user's mailbox or a whole domain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SettingsScope {
    #[default]
    User,
    Domain,
}

impl SettingsScope {
    /// The schema feature the corresponding request depends on.
    pub fn feature(self) -> Feature {
        match self {
            SettingsScope::User => Feature::UserSettings,
            SettingsScope::Domain => Feature::DomainSettings,
        }
    }

    fn response_element(self) -> &'static str {
        match self {
            SettingsScope::User => "UserResponse",
            SettingsScope::Domain => "DomainResponse",
        }
    }

    fn settings_element(self) -> &'static str {
        match self {
            SettingsScope::User => "UserSettings",
            SettingsScope::Domain => "DomainSettings",
        }
    }

    fn setting_element(self) -> &'static str {
        match self {
            SettingsScope::User => "UserSetting",
            SettingsScope::Domain => "DomainSetting",
        }
    }

    fn errors_element(self) -> &'static str {
        match self {
            SettingsScope::User => "UserSettingErrors",
            SettingsScope::Domain => "DomainSettingErrors",
        }
    }
}

/// Reads an element which may be left out. A present but empty element is
/// an empty value.
fn read_optional_text(reader: &mut XmlReader, name: &str) -> Result<Option<String>, Error> {
    Ok(Some(reader.read_element_value(name)?))
}

fn write_optional<T: WireValue>(
    writer: &mut XmlWriter,
    name: &str,
    value: &Option<T>,
) -> Result<(), Error> {
    match value {
        Some(value) => writer.write_element_value(NS, name, value),
        None => Ok(()),
    }
}

/// Reads a list element whose children are all `item` elements.
fn read_list<T: ComplexProperty + Default>(
    reader: &mut XmlReader,
    list: &str,
    item: &str,
) -> Result<Vec<T>, Error> {
    let mut items = Vec::new();

    reader.read_start_element(list)?;
    while !reader.is_end_element(list) {
        let mut value = T::default();
        value.load_from_xml(reader, item)?;
        items.push(value);
    }
    reader.read_end_element(list)?;

    Ok(items)
}

fn write_list<T: ComplexProperty>(
    writer: &mut XmlWriter,
    list: &str,
    item: &str,
    items: &[T],
) -> Result<(), Error> {
    writer.write_start_element(NS, list)?;
    for value in items {
        value.write_to_xml(writer, NS, item)?;
    }
    writer.write_end_element()
}

/// A single named setting value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Setting {
    String(StringSetting),
    DomainString(StringSetting),
    WebClientUrls(WebClientUrlCollectionSetting),
    AlternateMailboxes(AlternateMailboxCollectionSetting),
    ProtocolConnections(ProtocolConnectionCollectionSetting),
}

impl Setting {
    pub fn name(&self) -> &str {
        match self {
            Setting::String(setting) | Setting::DomainString(setting) => setting.name(),
            Setting::WebClientUrls(setting) => setting.name(),
            Setting::AlternateMailboxes(setting) => setting.name(),
            Setting::ProtocolConnections(setting) => setting.name(),
        }
    }

    /// The value of a string setting.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Setting::String(setting) | Setting::DomainString(setting) => setting.value(),
            _ => None,
        }
    }

    fn inner(&self) -> &dyn ComplexProperty {
        match self {
            Setting::String(setting) | Setting::DomainString(setting) => setting,
            Setting::WebClientUrls(setting) => setting,
            Setting::AlternateMailboxes(setting) => setting,
            Setting::ProtocolConnections(setting) => setting,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn ComplexProperty {
        match self {
            Setting::String(setting) | Setting::DomainString(setting) => setting,
            Setting::WebClientUrls(setting) => setting,
            Setting::AlternateMailboxes(setting) => setting,
            Setting::ProtocolConnections(setting) => setting,
        }
    }
}

impl VariantFamily for Setting {
    const FAMILY: &'static str = "Setting";

    fn variants() -> &'static [(&'static str, fn() -> Self)] {
        static VARIANTS: &[(&str, fn() -> Setting)] = &[
            ("StringSetting", || Setting::String(StringSetting::default())),
            ("DomainStringSetting", || {
                Setting::DomainString(StringSetting::default())
            }),
            ("WebClientUrlCollectionSetting", || {
                Setting::WebClientUrls(WebClientUrlCollectionSetting::default())
            }),
            ("AlternateMailboxCollectionSetting", || {
                Setting::AlternateMailboxes(AlternateMailboxCollectionSetting::default())
            }),
            ("ProtocolConnectionCollectionSetting", || {
                Setting::ProtocolConnections(ProtocolConnectionCollectionSetting::default())
            }),
        ];

        VARIANTS
    }

    fn discriminator(&self) -> &'static str {
        match self {
            Setting::String(_) => "StringSetting",
            Setting::DomainString(_) => "DomainStringSetting",
            Setting::WebClientUrls(_) => "WebClientUrlCollectionSetting",
            Setting::AlternateMailboxes(_) => "AlternateMailboxCollectionSetting",
            Setting::ProtocolConnections(_) => "ProtocolConnectionCollectionSetting",
        }
    }

    fn load_variant(&mut self, reader: &mut XmlReader, element: &str) -> Result<(), Error> {
        self.load_from_xml(reader, element)
    }
}

impl ComplexProperty for Setting {
    fn change_handle(&self) -> &ChangeHandle {
        self.inner().change_handle()
    }

    fn try_read_element(&mut self, reader: &mut XmlReader) -> Result<bool, Error> {
        self.inner_mut().try_read_element(reader)
    }

    fn write_attributes(&self, writer: &mut XmlWriter) -> Result<(), Error> {
        writer.write_attribute("i:type", self.discriminator())
    }

    fn write_elements(&self, writer: &mut XmlWriter) -> Result<(), Error> {
        self.inner().write_elements(writer)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StringSetting {
    name: String,
    value: Option<String>,
    handle: ChangeHandle,
}

impl StringSetting {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

impl ComplexProperty for StringSetting {
    fn change_handle(&self) -> &ChangeHandle {
        &self.handle
    }

    fn try_read_element(&mut self, reader: &mut XmlReader) -> Result<bool, Error> {
        if reader.is_start_element("Name") {
            self.name = reader.read_element_value("Name")?;
        } else if reader.is_start_element("Value") {
            self.value = read_optional_text(reader, "Value")?;
        } else {
            return Ok(false);
        }

        Ok(true)
    }

    fn write_elements(&self, writer: &mut XmlWriter) -> Result<(), Error> {
        writer.write_element_value(NS, "Name", &self.name)?;
        write_optional(writer, "Value", &self.value)
    }
}

/// A URL of the Outlook web client, and how to authenticate against it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WebClientUrl {
    authentication_methods: String,
    url: String,
    handle: ChangeHandle,
}

impl WebClientUrl {
    /// Space-separated, such as `Fba` or `Ntlm WindowsIntegrated`.
    pub fn authentication_methods(&self) -> &str {
        &self.authentication_methods
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl ComplexProperty for WebClientUrl {
    fn change_handle(&self) -> &ChangeHandle {
        &self.handle
    }

    fn try_read_element(&mut self, reader: &mut XmlReader) -> Result<bool, Error> {
        if reader.is_start_element("AuthenticationMethods") {
            self.authentication_methods = reader.read_element_value("AuthenticationMethods")?;
        } else if reader.is_start_element("Url") {
            self.url = reader.read_element_value("Url")?;
        } else {
            return Ok(false);
        }

        Ok(true)
    }

    fn write_elements(&self, writer: &mut XmlWriter) -> Result<(), Error> {
        writer.write_element_value(NS, "AuthenticationMethods", &self.authentication_methods)?;
        writer.write_element_value(NS, "Url", &self.url)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WebClientUrlCollectionSetting {
    name: String,
    urls: Vec<WebClientUrl>,
    handle: ChangeHandle,
}

impl WebClientUrlCollectionSetting {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn urls(&self) -> &[WebClientUrl] {
        &self.urls
    }
}

impl ComplexProperty for WebClientUrlCollectionSetting {
    fn change_handle(&self) -> &ChangeHandle {
        &self.handle
    }

    fn try_read_element(&mut self, reader: &mut XmlReader) -> Result<bool, Error> {
        if reader.is_start_element("Name") {
            self.name = reader.read_element_value("Name")?;
        } else if reader.is_start_element("WebClientUrls") {
            self.urls = read_list(reader, "WebClientUrls", "WebClientUrl")?;
        } else {
            return Ok(false);
        }

        Ok(true)
    }

    fn write_elements(&self, writer: &mut XmlWriter) -> Result<(), Error> {
        writer.write_element_value(NS, "Name", &self.name)?;
        write_list(writer, "WebClientUrls", "WebClientUrl", &self.urls)
    }
}

/// A mailbox the user can open besides their own, such as an archive.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AlternateMailbox {
    mailbox_type: String,
    display_name: String,
    legacy_dn: Option<String>,
    server: Option<String>,
    smtp_address: Option<String>,
    owner_smtp_address: Option<String>,
    handle: ChangeHandle,
}

impl AlternateMailbox {
    /// `Archive`, `Delegate` or `TeamMailbox`.
    pub fn mailbox_type(&self) -> &str {
        &self.mailbox_type
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn legacy_dn(&self) -> Option<&str> {
        self.legacy_dn.as_deref()
    }

    pub fn server(&self) -> Option<&str> {
        self.server.as_deref()
    }

    pub fn smtp_address(&self) -> Option<&str> {
        self.smtp_address.as_deref()
    }

    pub fn owner_smtp_address(&self) -> Option<&str> {
        self.owner_smtp_address.as_deref()
    }
}

impl ComplexProperty for AlternateMailbox {
    fn change_handle(&self) -> &ChangeHandle {
        &self.handle
    }

    fn try_read_element(&mut self, reader: &mut XmlReader) -> Result<bool, Error> {
        let Some(name) = reader.local_name().map(str::to_owned) else {
            return Ok(false);
        };

        match name.as_str() {
            "Type" => self.mailbox_type = reader.read_element_value("Type")?,
            "DisplayName" => self.display_name = reader.read_element_value("DisplayName")?,
            "LegacyDN" => self.legacy_dn = read_optional_text(reader, "LegacyDN")?,
            "Server" => self.server = read_optional_text(reader, "Server")?,
            "SmtpAddress" => self.smtp_address = read_optional_text(reader, "SmtpAddress")?,
            "OwnerSmtpAddress" => {
                self.owner_smtp_address = read_optional_text(reader, "OwnerSmtpAddress")?
            }
            _ => return Ok(false),
        }

        Ok(true)
    }

    fn write_elements(&self, writer: &mut XmlWriter) -> Result<(), Error> {
        writer.write_element_value(NS, "Type", &self.mailbox_type)?;
        writer.write_element_value(NS, "DisplayName", &self.display_name)?;
        write_optional(writer, "LegacyDN", &self.legacy_dn)?;
        write_optional(writer, "Server", &self.server)?;
        write_optional(writer, "SmtpAddress", &self.smtp_address)?;
        write_optional(writer, "OwnerSmtpAddress", &self.owner_smtp_address)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AlternateMailboxCollectionSetting {
    name: String,
    mailboxes: Vec<AlternateMailbox>,
    handle: ChangeHandle,
}

impl AlternateMailboxCollectionSetting {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mailboxes(&self) -> &[AlternateMailbox] {
        &self.mailboxes
    }
}

impl ComplexProperty for AlternateMailboxCollectionSetting {
    fn change_handle(&self) -> &ChangeHandle {
        &self.handle
    }

    fn try_read_element(&mut self, reader: &mut XmlReader) -> Result<bool, Error> {
        if reader.is_start_element("Name") {
            self.name = reader.read_element_value("Name")?;
        } else if reader.is_start_element("AlternateMailboxes") {
            self.mailboxes = read_list(reader, "AlternateMailboxes", "AlternateMailbox")?;
        } else {
            return Ok(false);
        }

        Ok(true)
    }

    fn write_elements(&self, writer: &mut XmlWriter) -> Result<(), Error> {
        writer.write_element_value(NS, "Name", &self.name)?;
        write_list(writer, "AlternateMailboxes", "AlternateMailbox", &self.mailboxes)
    }
}

/// How to reach the mailbox over another protocol, such as IMAP or SMTP.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProtocolConnection {
    encryption_method: Option<String>,
    hostname: String,
    port: Option<u32>,
    handle: ChangeHandle,
}

impl ProtocolConnection {
    pub fn encryption_method(&self) -> Option<&str> {
        self.encryption_method.as_deref()
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn port(&self) -> Option<u32> {
        self.port
    }
}

impl ComplexProperty for ProtocolConnection {
    fn change_handle(&self) -> &ChangeHandle {
        &self.handle
    }

    fn try_read_element(&mut self, reader: &mut XmlReader) -> Result<bool, Error> {
        if reader.is_start_element("EncryptionMethod") {
            self.encryption_method = read_optional_text(reader, "EncryptionMethod")?;
        } else if reader.is_start_element("Hostname") {
            self.hostname = reader.read_element_value("Hostname")?;
        } else if reader.is_start_element("Port") {
            self.port = Some(reader.read_element_value("Port")?);
        } else {
            return Ok(false);
        }

        Ok(true)
    }

    fn write_elements(&self, writer: &mut XmlWriter) -> Result<(), Error> {
        write_optional(writer, "EncryptionMethod", &self.encryption_method)?;
        writer.write_element_value(NS, "Hostname", &self.hostname)?;
        write_optional(writer, "Port", &self.port)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProtocolConnectionCollectionSetting {
    name: String,
    connections: Vec<ProtocolConnection>,
    handle: ChangeHandle,
}

impl ProtocolConnectionCollectionSetting {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn connections(&self) -> &[ProtocolConnection] {
        &self.connections
    }
}

impl ComplexProperty for ProtocolConnectionCollectionSetting {
    fn change_handle(&self) -> &ChangeHandle {
        &self.handle
    }

    fn try_read_element(&mut self, reader: &mut XmlReader) -> Result<bool, Error> {
        if reader.is_start_element("Name") {
            self.name = reader.read_element_value("Name")?;
        } else if reader.is_start_element("ProtocolConnections") {
            self.connections = read_list(reader, "ProtocolConnections", "ProtocolConnection")?;
        } else {
            return Ok(false);
        }

        Ok(true)
    }

    fn write_elements(&self, writer: &mut XmlWriter) -> Result<(), Error> {
        writer.write_element_value(NS, "Name", &self.name)?;
        write_list(
            writer,
            "ProtocolConnections",
            "ProtocolConnection",
            &self.connections,
        )
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SettingErrorDetails {
    error_code: AutodiscoverErrorCode,
    error_message: Option<String>,
    setting_name: String,
    handle: ChangeHandle,
}

impl SettingErrorDetails {
    pub fn error_code(&self) -> AutodiscoverErrorCode {
        self.error_code
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn setting_name(&self) -> &str {
        &self.setting_name
    }
}

impl ComplexProperty for SettingErrorDetails {
    fn change_handle(&self) -> &ChangeHandle {
        &self.handle
    }

    fn try_read_element(&mut self, reader: &mut XmlReader) -> Result<bool, Error> {
        if reader.is_start_element("ErrorCode") {
            self.error_code = reader.read_element_value("ErrorCode")?;
        } else if reader.is_start_element("ErrorMessage") {
            self.error_message = read_optional_text(reader, "ErrorMessage")?;
        } else if reader.is_start_element("SettingName") {
            self.setting_name = reader.read_element_value("SettingName")?;
        } else {
            return Ok(false);
        }

        Ok(true)
    }

    fn write_elements(&self, writer: &mut XmlWriter) -> Result<(), Error> {
        writer.write_element_value(NS, "ErrorCode", &self.error_code)?;
        write_optional(writer, "ErrorMessage", &self.error_message)?;
        writer.write_element_value(NS, "SettingName", &self.setting_name)
    }
}

/// Why a single requested setting couldn't be returned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SettingError {
    User(SettingErrorDetails),
    Domain(SettingErrorDetails),
}

impl SettingError {
    pub fn details(&self) -> &SettingErrorDetails {
        match self {
            SettingError::User(details) | SettingError::Domain(details) => details,
        }
    }
}

impl VariantFamily for SettingError {
    const FAMILY: &'static str = "SettingError";

    fn variants() -> &'static [(&'static str, fn() -> Self)] {
        static VARIANTS: &[(&str, fn() -> SettingError)] = &[
            ("UserSettingError", || {
                SettingError::User(SettingErrorDetails::default())
            }),
            ("DomainSettingError", || {
                SettingError::Domain(SettingErrorDetails::default())
            }),
        ];

        VARIANTS
    }

    fn discriminator(&self) -> &'static str {
        match self {
            SettingError::User(_) => "UserSettingError",
            SettingError::Domain(_) => "DomainSettingError",
        }
    }

    fn load_variant(&mut self, reader: &mut XmlReader, element: &str) -> Result<(), Error> {
        match self {
            SettingError::User(details) | SettingError::Domain(details) => {
                details.load_from_xml(reader, element)
            }
        }
    }
}

/// The settings returned for one user or domain.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SettingsResponse {
    scope: SettingsScope,
    error_code: AutodiscoverErrorCode,
    error_message: Option<String>,
    redirect_target: Option<String>,
    settings: Vec<Setting>,
    errors: Vec<SettingError>,
    handle: ChangeHandle,
}

impl SettingsResponse {
    pub fn new(scope: SettingsScope) -> Self {
        Self {
            scope,
            ..Default::default()
        }
    }

    /// Reads the `UserResponse` or `DomainResponse` element the reader is
    /// positioned on.
    ///
    /// Fails with [`Error::UnsupportedFeature`] if the reader's version
    /// predates the request that produces this response.
    pub fn from_xml(reader: &mut XmlReader, scope: SettingsScope) -> Result<Self, Error> {
        ensure_feature_supported(scope.feature(), reader.version())?;

        let mut response = Self::new(scope);
        response.load_from_xml(reader, scope.response_element())?;

        Ok(response)
    }

    pub fn scope(&self) -> SettingsScope {
        self.scope
    }

    pub fn error_code(&self) -> AutodiscoverErrorCode {
        self.error_code
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Where to retry the request when the error code is a redirect.
    pub fn redirect_target(&self) -> Option<&str> {
        self.redirect_target.as_deref()
    }

    pub fn settings(&self) -> &[Setting] {
        &self.settings
    }

    /// The requested settings the server couldn't return.
    pub fn errors(&self) -> &[SettingError] {
        &self.errors
    }

    pub fn setting(&self, name: &str) -> Option<&Setting> {
        self.settings.iter().find(|setting| setting.name() == name)
    }

    pub fn write(&self, writer: &mut XmlWriter) -> Result<(), Error> {
        self.write_to_xml(writer, NS, self.scope.response_element())
    }

    fn read_settings(&mut self, reader: &mut XmlReader) -> Result<(), Error> {
        let list = self.scope.settings_element();
        let item = self.scope.setting_element();

        reader.read_start_element(list)?;
        while !reader.is_end_element(list) {
            reader.ensure_start_element(item)?;
            let discriminator = reader
                .attribute(TYPE_ATTRIBUTE)
                .ok_or_else(|| reader.unexpected(format!("a type attribute on <{item}>")))?
                .to_owned();

            self.settings
                .push(decoder::decode_with(&discriminator, reader, item)?);
        }

        reader.read_end_element(list)
    }

    fn read_errors(&mut self, reader: &mut XmlReader) -> Result<(), Error> {
        let list = self.scope.errors_element();

        reader.read_start_element(list)?;
        while !reader.is_end_element(list) {
            self.errors.push(decoder::decode(reader)?);
        }

        reader.read_end_element(list)
    }
}

impl ComplexProperty for SettingsResponse {
    fn change_handle(&self) -> &ChangeHandle {
        &self.handle
    }

    fn try_read_element(&mut self, reader: &mut XmlReader) -> Result<bool, Error> {
        let Some(name) = reader.local_name().map(str::to_owned) else {
            return Ok(false);
        };

        match name.as_str() {
            "ErrorCode" => self.error_code = reader.read_element_value("ErrorCode")?,
            "ErrorMessage" => self.error_message = read_optional_text(reader, "ErrorMessage")?,
            "RedirectTarget" => {
                self.redirect_target = read_optional_text(reader, "RedirectTarget")?
            }
            name if name == self.scope.settings_element() => self.read_settings(reader)?,
            name if name == self.scope.errors_element() => self.read_errors(reader)?,
            _ => return Ok(false),
        }

        Ok(true)
    }

    fn write_elements(&self, writer: &mut XmlWriter) -> Result<(), Error> {
        writer.write_element_value(NS, "ErrorCode", &self.error_code)?;
        write_optional(writer, "ErrorMessage", &self.error_message)?;
        write_optional(writer, "RedirectTarget", &self.redirect_target)?;

        writer.write_start_element(NS, self.scope.errors_element())?;
        for error in &self.errors {
            error
                .details()
                .write_to_xml(writer, NS, error.discriminator())?;
        }
        writer.write_end_element()?;

        write_list(
            writer,
            self.scope.settings_element(),
            self.scope.setting_element(),
            &self.settings,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ExchangeVersion;

    const USER_RESPONSE: &str = r#"<UserResponse><ErrorCode>NoError</ErrorCode><ErrorMessage>No error.</ErrorMessage><UserSettingErrors><UserSettingError><ErrorCode>InvalidSetting</ErrorCode><ErrorMessage>The requested setting is invalid.</ErrorMessage><SettingName>FavoriteColor</SettingName></UserSettingError></UserSettingErrors><UserSettings><UserSetting i:type="StringSetting"><Name>UserDisplayName</Name><Value>Alex Doe</Value></UserSetting><UserSetting i:type="WebClientUrlCollectionSetting"><Name>ExternalWebClientUrls</Name><WebClientUrls><WebClientUrl><AuthenticationMethods>Fba</AuthenticationMethods><Url>https://mail.example.com/owa/</Url></WebClientUrl></WebClientUrls></UserSetting><UserSetting i:type="ProtocolConnectionCollectionSetting"><Name>ExternalImap4Connections</Name><ProtocolConnections><ProtocolConnection><EncryptionMethod>SSL</EncryptionMethod><Hostname>imap.example.com</Hostname><Port>993</Port></ProtocolConnection></ProtocolConnections></UserSetting><UserSetting i:type="AlternateMailboxCollectionSetting"><Name>AlternateMailboxes</Name><AlternateMailboxes><AlternateMailbox><Type>Archive</Type><DisplayName>In-Place Archive</DisplayName><SmtpAddress>archive@example.com</SmtpAddress></AlternateMailbox></AlternateMailboxes></UserSetting></UserSettings></UserResponse>"#;

    fn read(xml: &str, scope: SettingsScope, version: ExchangeVersion) -> Result<SettingsResponse, Error> {
        let mut reader = XmlReader::new(xml, version)?;
        SettingsResponse::from_xml(&mut reader, scope)
    }

    #[test]
    fn user_response_round_trip() {
        let response = read(USER_RESPONSE, SettingsScope::User, ExchangeVersion::LATEST).unwrap();

        assert_eq!(response.error_code(), AutodiscoverErrorCode::NoError);
        assert!(!response.change_handle().is_attached());
        assert_eq!(response.settings().len(), 4);
        assert_eq!(
            response.setting("UserDisplayName").and_then(Setting::as_str),
            Some("Alex Doe")
        );
        assert!(matches!(
            response.setting("ExternalImap4Connections"),
            Some(Setting::ProtocolConnections(setting)) if setting.connections()[0].port() == Some(993)
        ));
        assert_eq!(response.errors().len(), 1);
        assert_eq!(
            response.errors()[0].details().error_code(),
            AutodiscoverErrorCode::InvalidSetting
        );

        let mut writer = XmlWriter::new(ExchangeVersion::LATEST);
        response.write(&mut writer).unwrap();
        assert_eq!(writer.into_string().unwrap(), USER_RESPONSE);
    }

    #[test]
    fn domain_response() {
        let response = read(
            r#"<DomainResponse><ErrorCode>NoError</ErrorCode><DomainSettingErrors/><DomainSettings><DomainSetting i:type="DomainStringSetting"><Name>ExternalEwsUrl</Name><Value>https://mail.example.com/EWS/Exchange.asmx</Value></DomainSetting></DomainSettings></DomainResponse>"#,
            SettingsScope::Domain,
            ExchangeVersion::Exchange2010_SP1,
        )
        .unwrap();

        assert!(matches!(response.settings(), [Setting::DomainString(_)]));
        assert_eq!(
            response.settings()[0].as_str(),
            Some("https://mail.example.com/EWS/Exchange.asmx")
        );
    }

    #[test]
    fn redirect_target() {
        let response = read(
            "<UserResponse><ErrorCode>RedirectAddress</ErrorCode><RedirectTarget>alex@contoso.example</RedirectTarget><UserSettingErrors/><UserSettings/></UserResponse>",
            SettingsScope::User,
            ExchangeVersion::LATEST,
        )
        .unwrap();

        assert_eq!(response.error_code(), AutodiscoverErrorCode::RedirectAddress);
        assert_eq!(response.redirect_target(), Some("alex@contoso.example"));
        assert!(response.settings().is_empty());
    }

    #[test]
    fn empty_values_are_kept() {
        const RESPONSE: &str = r#"<UserResponse><ErrorCode>NoError</ErrorCode><ErrorMessage/><UserSettingErrors/><UserSettings><UserSetting i:type="StringSetting"><Name>UserDeploymentId</Name><Value/></UserSetting><UserSetting i:type="StringSetting"><Name>UserDisplayName</Name></UserSetting></UserSettings></UserResponse>"#;

        let response = read(RESPONSE, SettingsScope::User, ExchangeVersion::LATEST).unwrap();
        assert_eq!(response.error_message(), Some(""));
        assert_eq!(
            response.setting("UserDeploymentId").and_then(Setting::as_str),
            Some("")
        );
        assert_eq!(
            response.setting("UserDisplayName").and_then(Setting::as_str),
            None
        );

        let mut writer = XmlWriter::new(ExchangeVersion::LATEST);
        response.write(&mut writer).unwrap();
        assert_eq!(writer.into_string().unwrap(), RESPONSE);
    }

    #[test]
    fn domain_settings_are_version_gated() {
        let err = read(
            "<DomainResponse><ErrorCode>NoError</ErrorCode></DomainResponse>",
            SettingsScope::Domain,
            ExchangeVersion::Exchange2010,
        )
        .expect_err("GetDomainSettings needs Exchange 2010 SP1");

        assert!(matches!(
            err,
            Error::UnsupportedFeature {
                feature: Feature::DomainSettings,
                ..
            }
        ));
    }

    #[test]
    fn unknown_setting_type() {
        let err = read(
            r#"<UserResponse><UserSettings><UserSetting i:type="DocumentSharingLocationCollectionSetting"><Name>DocumentSharingLocations</Name></UserSetting></UserSettings></UserResponse>"#,
            SettingsScope::User,
            ExchangeVersion::LATEST,
        )
        .expect_err("unknown setting types should be rejected");

        assert!(matches!(
            err,
            Error::UnknownVariant { family: "Setting", discriminator } if discriminator == "DocumentSharingLocationCollectionSetting"
        ));
    }
}
