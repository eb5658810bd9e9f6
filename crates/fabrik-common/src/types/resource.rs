//! Generic Resource Model - kind-agnostic view of a service instance
//!
//! Director and Docker instances share the same outer shape. The interesting
//! payloads (`spec.options`, `status.lastOperation`, `status.appliedOptions`)
//! are stored by the controllers as JSON-encoded strings, so decoding happens
//! in two passes: the outer manifest first, then each embedded document.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::constants::{OperationType, ResourceKind, ResourceState};

/// Platform context attached to instance options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenericContext {
    /// Originating platform, e.g. `cloudfoundry`
    #[serde(deserialize_with = "null_as_default")]
    pub platform: String,
    #[serde(deserialize_with = "null_as_default")]
    pub organization_guid: String,
    #[serde(deserialize_with = "null_as_default")]
    pub space_guid: String,
}

/// Options payload of a service instance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenericOptions {
    /// Service SKU identifier
    #[serde(deserialize_with = "null_as_default")]
    pub service_id: String,
    /// Plan identifier
    #[serde(deserialize_with = "null_as_default")]
    pub plan_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub context: GenericContext,
}

/// Most recent operation recorded on a resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LastOperation {
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub op_type: OperationType,
    #[serde(deserialize_with = "null_as_default")]
    pub state: ResourceState,
}

/// Embedded documents may carry explicit `null`s; treat them like missing fields
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Desired state of a resource
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenericSpec {
    pub options: GenericOptions,
}

/// Observed state of a resource, owned by its controller
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenericStatus {
    pub state: ResourceState,
    pub last_operation: LastOperation,
    /// Options committed by the last successful operation
    pub applied_options: GenericOptions,
}

/// Kind-agnostic service-instance resource
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenericResource {
    pub kind: ResourceKind,
    pub name: String,
    pub spec: GenericSpec,
    pub status: GenericStatus,
}

impl GenericResource {
    /// Decode a resource from raw admission object bytes
    pub fn from_slice(raw: &[u8]) -> serde_json::Result<Self> {
        let manifest: ResourceManifest = serde_json::from_slice(raw)?;
        Ok(manifest.into_resource())
    }
}

/// Outer wire shape of an instance custom resource
#[derive(Debug, Deserialize)]
struct ResourceManifest {
    #[serde(default)]
    kind: Option<ResourceKind>,
    #[serde(default)]
    metadata: ObjectMeta,
    #[serde(default)]
    spec: ManifestSpec,
    #[serde(default)]
    status: ManifestStatus,
}

#[derive(Debug, Default, Deserialize)]
struct ObjectMeta {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ManifestSpec {
    #[serde(default)]
    options: Option<EmbeddedJson>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ManifestStatus {
    #[serde(default)]
    state: Option<ResourceState>,
    #[serde(default)]
    last_operation: Option<EmbeddedJson>,
    #[serde(default)]
    applied_options: Option<EmbeddedJson>,
}

/// A nested document stored either as a JSON string or inline
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EmbeddedJson {
    Text(String),
    Inline(Value),
}

impl EmbeddedJson {
    /// Decode the nested document, falling back to the default value.
    ///
    /// Controllers write these fields lazily, so an empty or unparsable
    /// payload means "not yet known" rather than a broken resource.
    fn decode_or_default<T: DeserializeOwned + Default>(field: Option<Self>, name: &str, path: &str) -> T {
        let parsed = match field {
            None => return T::default(),
            Some(EmbeddedJson::Text(text)) if text.trim().is_empty() => {
                debug!(resource = %name, field = path, "Embedded document is empty");
                return T::default();
            }
            Some(EmbeddedJson::Text(text)) => serde_json::from_str(&text),
            Some(EmbeddedJson::Inline(Value::Null)) => return T::default(),
            Some(EmbeddedJson::Inline(value)) => serde_json::from_value(value),
        };
        parsed.unwrap_or_else(|e| {
            warn!(resource = %name, field = path, error = %e, "Ignoring malformed embedded document");
            T::default()
        })
    }
}

impl ResourceManifest {
    fn into_resource(self) -> GenericResource {
        let name = self.metadata.name.unwrap_or_default();
        let options = EmbeddedJson::decode_or_default(self.spec.options, &name, "spec.options");
        let last_operation =
            EmbeddedJson::decode_or_default(self.status.last_operation, &name, "status.lastOperation");
        let applied_options =
            EmbeddedJson::decode_or_default(self.status.applied_options, &name, "status.appliedOptions");

        GenericResource {
            kind: self.kind.unwrap_or_default(),
            spec: GenericSpec { options },
            status: GenericStatus {
                state: self.status.state.unwrap_or_default(),
                last_operation,
                applied_options,
            },
            name,
        }
    }
}
