//! Admission review payload
//!
//! Only the fields the metering pipeline reads are modelled; the review is
//! decoded leniently so newer API servers can add fields freely.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Group/version/kind of the object under review
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupVersionKind {
    pub group: String,
    pub version: String,
    pub kind: String,
}

/// Identity of the user that issued the request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserInfo {
    pub username: String,
    pub uid: String,
    pub groups: Vec<String>,
}

/// A single admission request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AdmissionRequest {
    pub uid: String,
    pub kind: GroupVersionKind,
    pub namespace: String,
    pub name: String,
    /// CREATE, UPDATE, DELETE or CONNECT
    pub operation: String,
    pub user_info: UserInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_object: Option<Value>,
}

impl AdmissionRequest {
    /// Raw bytes of the new object; empty when absent
    pub fn raw_object(&self) -> serde_json::Result<Vec<u8>> {
        raw_bytes(self.object.as_ref())
    }

    /// Raw bytes of the old object; empty when absent
    pub fn raw_old_object(&self) -> serde_json::Result<Vec<u8>> {
        raw_bytes(self.old_object.as_ref())
    }
}

fn raw_bytes(value: Option<&Value>) -> serde_json::Result<Vec<u8>> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(value) => serde_json::to_vec(value),
    }
}

/// Admission review envelope sent by the API server
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AdmissionReview {
    pub api_version: String,
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<AdmissionRequest>,
}

impl AdmissionReview {
    pub fn from_slice(raw: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_review() {
        let raw = serde_json::to_vec(&json!({
            "apiVersion": "admission.k8s.io/v1beta1",
            "kind": "AdmissionReview",
            "request": {
                "uid": "705ab4f5-6393-11e8-b7cc-42010a800002",
                "kind": { "group": "deployment.servicefabrik.io", "version": "v1alpha1", "kind": "Director" },
                "namespace": "default",
                "name": "instance-1",
                "operation": "UPDATE",
                "userInfo": { "username": "admin", "groups": ["system:masters"] },
                "object": { "kind": "Director" },
                "oldObject": null
            }
        }))
        .unwrap();

        let review = AdmissionReview::from_slice(&raw).unwrap();
        let request = review.request.unwrap();
        assert_eq!(request.operation, "UPDATE");
        assert_eq!(request.kind.kind, "Director");
        assert_eq!(request.user_info.username, "admin");
        assert_eq!(request.raw_object().unwrap(), br#"{"kind":"Director"}"#.to_vec());
        assert!(request.raw_old_object().unwrap().is_empty());
    }

    #[test]
    fn test_review_without_request() {
        let review = AdmissionReview::from_slice(br#"{"kind":"AdmissionReview"}"#).unwrap();
        assert!(review.request.is_none());
    }
}
