/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use std::{cell::RefCell, collections::VecDeque};

use crate::{
    xml::{XmlNamespace, XmlReader, XmlWriter},
    ComplexProperty, CreateRequest, ExchangeVersion, LoadRequest, Transport, TransportError,
    UpdateRequest,
};

/// Assert the expected result of XML serialization.
pub fn assert_serialized_content<T: ComplexProperty>(
    data: &T,
    root_tag_name: &str,
    expected_xml_content: &str,
) {
    assert_serialized_content_at(data, root_tag_name, expected_xml_content, ExchangeVersion::LATEST);
}

/// Assert the expected result of XML serialization for a server at
/// `version`.
pub fn assert_serialized_content_at<T: ComplexProperty>(
    data: &T,
    root_tag_name: &str,
    expected_xml_content: &str,
    version: ExchangeVersion,
) {
    let mut writer = XmlWriter::new(version);
    data.write_to_xml(&mut writer, XmlNamespace::Types, root_tag_name)
        .unwrap();

    let actual_xml_content = writer.into_string().unwrap();
    assert_eq!(actual_xml_content, expected_xml_content);
}

/// Read a value from the element `root_tag_name`, which must make up the
/// whole of `content`.
pub fn read_value<T: ComplexProperty + Default>(content: &str, root_tag_name: &str) -> T {
    let mut reader = XmlReader::new(content, ExchangeVersion::LATEST).unwrap();

    let mut value = T::default();
    value.load_from_xml(&mut reader, root_tag_name).unwrap();
    assert!(reader.is_eof(), "trailing content after <{root_tag_name}>");

    value
}

/// Assert that reading `content` and writing the result back yields the same
/// document, returning the value read.
pub fn assert_round_trip<T: ComplexProperty + Default>(content: &str, root_tag_name: &str) -> T {
    let value: T = read_value(content, root_tag_name);
    assert_serialized_content(&value, root_tag_name, content);

    value
}

/// A transport which records requests and answers them from a queue of
/// canned responses.
#[derive(Default)]
pub struct MockTransport {
    pub responses: RefCell<VecDeque<Result<String, String>>>,
    pub requests: Vec<RecordedRequest>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum RecordedRequest {
    Create {
        payload: String,
    },
    Update {
        entity_id: String,
        changed: Vec<&'static str>,
        deleted: Vec<&'static str>,
        payload: String,
    },
    Load {
        entity_id: String,
        requested: Vec<&'static str>,
    },
}

impl MockTransport {
    pub fn responding(responses: impl IntoIterator<Item = &'static str>) -> Self {
        Self {
            responses: RefCell::new(
                responses
                    .into_iter()
                    .map(|response| Ok(response.to_string()))
                    .collect(),
            ),
            requests: Vec::new(),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            responses: RefCell::new(VecDeque::from([Err(message.to_string())])),
            requests: Vec::new(),
        }
    }

    fn respond(&self) -> Result<String, TransportError> {
        match self.responses.borrow_mut().pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(message.into()),
            None => Err("no response queued".into()),
        }
    }
}

impl Transport for MockTransport {
    fn create(&mut self, request: CreateRequest<'_>) -> Result<String, TransportError> {
        self.requests.push(RecordedRequest::Create {
            payload: request.payload.to_string(),
        });
        self.respond()
    }

    fn update(&mut self, request: UpdateRequest<'_>) -> Result<String, TransportError> {
        self.requests.push(RecordedRequest::Update {
            entity_id: request.entity_id.id.clone(),
            changed: request
                .changed
                .iter()
                .map(|field| field.definition.name)
                .collect(),
            deleted: request.deleted.iter().map(|def| def.name).collect(),
            payload: request.payload.to_string(),
        });
        self.respond()
    }

    fn load(&mut self, request: LoadRequest<'_>) -> Result<String, TransportError> {
        self.requests.push(RecordedRequest::Load {
            entity_id: request.entity_id.id.clone(),
            requested: request.requested.iter().map(|def| def.name).collect(),
        });
        self.respond()
    }
}
