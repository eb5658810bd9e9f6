//! Schema-less metering documents
//!
//! The resource store only accepts untyped documents, so records go through
//! a serialize/deserialize round trip into a JSON map before the fixed
//! envelope fields are stamped on.

use std::collections::BTreeMap;

use fabrik_common::constants::{
    DEFAULT_NAMESPACE, INSTANCE_API_VERSION, METERING_KIND, METER_STATE_KEY, TO_BE_METERED,
};
use fabrik_common::{PersistenceError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::metering::MeteringRecord;

/// Convert any serializable value into an untyped JSON map
pub fn to_unstructured_map<T: Serialize>(value: &T) -> Result<Map<String, Value>> {
    let encoded = serde_json::to_vec(value)?;
    Ok(serde_json::from_slice(&encoded)?)
}

/// Typed body of a metering resource; `options` is itself a JSON string
#[derive(Debug, Serialize, Deserialize)]
struct MeteringResource {
    spec: MeteringSpec,
}

#[derive(Debug, Serialize, Deserialize)]
struct MeteringSpec {
    options: String,
}

/// Untyped resource document as submitted to the store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnstructuredDocument {
    content: Map<String, Value>,
}

impl UnstructuredDocument {
    pub fn from_content(content: Map<String, Value>) -> Self {
        Self { content }
    }

    pub fn content(&self) -> &Map<String, Value> {
        &self.content
    }

    /// Build the pending-metering document for a record
    pub fn from_record(record: &MeteringRecord) -> Result<Self> {
        let body = MeteringResource {
            spec: MeteringSpec {
                options: serde_json::to_string(&record.options)?,
            },
        };
        let mut document = Self::from_content(to_unstructured_map(&body)?);
        document.set_kind(METERING_KIND);
        document.set_api_version(INSTANCE_API_VERSION);
        document.set_namespace(DEFAULT_NAMESPACE);
        document.set_name(record.name());
        document.set_labels(BTreeMap::from([(
            METER_STATE_KEY.to_string(),
            TO_BE_METERED.to_string(),
        )]));
        Ok(document)
    }

    pub fn kind(&self) -> Option<&str> {
        self.content.get("kind").and_then(Value::as_str)
    }

    pub fn set_kind(&mut self, kind: &str) {
        self.content.insert("kind".into(), Value::String(kind.into()));
    }

    pub fn api_version(&self) -> Option<&str> {
        self.content.get("apiVersion").and_then(Value::as_str)
    }

    pub fn set_api_version(&mut self, api_version: &str) {
        self.content
            .insert("apiVersion".into(), Value::String(api_version.into()));
    }

    pub fn name(&self) -> Option<&str> {
        self.metadata_str("name")
    }

    pub fn set_name(&mut self, name: &str) {
        self.set_metadata_field("name", Value::String(name.into()));
    }

    pub fn namespace(&self) -> Option<&str> {
        self.metadata_str("namespace")
    }

    pub fn set_namespace(&mut self, namespace: &str) {
        self.set_metadata_field("namespace", Value::String(namespace.into()));
    }

    /// Labels of the document; non-string values are skipped
    pub fn labels(&self) -> BTreeMap<String, String> {
        self.content
            .get("metadata")
            .and_then(|metadata| metadata.get("labels"))
            .and_then(Value::as_object)
            .map(|labels| {
                labels
                    .iter()
                    .filter_map(|(k, v)| v.as_str().map(|v| (k.clone(), v.to_string())))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn set_labels(&mut self, labels: BTreeMap<String, String>) {
        let labels = labels
            .into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect::<Map<_, _>>();
        self.set_metadata_field("labels", Value::Object(labels));
    }

    fn metadata_str(&self, key: &str) -> Option<&str> {
        self.content
            .get("metadata")
            .and_then(|metadata| metadata.get(key))
            .and_then(Value::as_str)
    }

    fn set_metadata_field(&mut self, key: &str, value: Value) {
        let metadata = self
            .content
            .entry("metadata")
            .or_insert_with(|| Value::Object(Map::new()));
        match metadata {
            Value::Object(map) => {
                map.insert(key.to_string(), value);
            }
            other => {
                let mut map = Map::new();
                map.insert(key.to_string(), value);
                *other = Value::Object(map);
            }
        }
    }
}

impl MeteringRecord {
    /// Recover a record from its persisted document
    pub fn from_document(document: &UnstructuredDocument) -> Result<Self> {
        let options = document
            .content()
            .get("spec")
            .and_then(|spec| spec.get("options"))
            .and_then(Value::as_str)
            .ok_or(PersistenceError::MissingField("spec.options"))?;
        Ok(Self {
            options: serde_json::from_str(options)?,
        })
    }
}
