use validator::Validate;

use crate::domain::attachment::AttachmentUpload;

/// One append submitted at the service boundary.
#[derive(Debug, Validate)]
pub struct AppendRequest {
    #[validate(length(min = 1, message = "resource_id is required"))]
    pub resource_id: String,

    /// Payload to record. Defaults to an empty object; must be a JSON object
    /// when present.
    pub metadata: Option<serde_json::Value>,

    pub created_by: Option<String>,

    /// External anchoring reference, stored verbatim if supplied.
    pub anchor_tx: Option<String>,

    pub attachments: Vec<AttachmentUpload>,
}

impl AppendRequest {
    pub fn new(resource_id: impl Into<String>) -> Self {
        Self {
            resource_id: resource_id.into(),
            metadata: None,
            created_by: None,
            anchor_tx: None,
            attachments: Vec::new(),
        }
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn with_created_by(mut self, created_by: impl Into<String>) -> Self {
        self.created_by = Some(created_by.into());
        self
    }

    pub fn with_attachment(mut self, attachment: AttachmentUpload) -> Self {
        self.attachments.push(attachment);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_resource_id_fails_validation() {
        let request = AppendRequest::new("");
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_minimal_request_is_valid() {
        let request = AppendRequest::new("doc-1");
        assert!(request.validate().is_ok());
        assert!(request.metadata.is_none());
        assert!(request.attachments.is_empty());
    }
}
