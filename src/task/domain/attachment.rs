//! Attachment records and their classification.

use super::{AttachmentId, FileName, ParseAttachmentTypeError, Role, StorageKey, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of an uploaded file.
///
/// The type determines, together with task status and actor role, who may
/// upload, delete, and see the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentType {
    /// Admin-provided reference material supplied before work starts.
    Context,
    /// Employee deliverable produced while working the task.
    Result,
    /// Admin review notes or files attached during the review.
    Feedback,
}

impl AttachmentType {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Context => "context",
            Self::Result => "result",
            Self::Feedback => "feedback",
        }
    }
}

impl TryFrom<&str> for AttachmentType {
    type Error = ParseAttachmentTypeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "context" => Ok(Self::Context),
            "result" => Ok(Self::Result),
            "feedback" => Ok(Self::Feedback),
            _ => Err(ParseAttachmentTypeError(value.to_owned())),
        }
    }
}

impl fmt::Display for AttachmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parameter object for constructing a new attachment record after the blob
/// has been accepted by the file-storage host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAttachment {
    /// Original file name as uploaded.
    pub file_name: FileName,
    /// Public delivery URL returned by the storage host.
    pub file_url: String,
    /// TLS delivery URL returned by the storage host.
    pub secure_url: String,
    /// External storage reference used for deletion.
    pub public_id: StorageKey,
    /// Blob size in bytes.
    pub file_size: u64,
    /// MIME type reported at upload time.
    pub file_type: String,
    /// Classification of the file.
    pub attachment_type: AttachmentType,
    /// Uploading user.
    pub uploaded_by: UserId,
    /// Role the uploader held at upload time.
    pub uploaded_by_role: Role,
}

/// A file attached to a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    id: AttachmentId,
    file_name: FileName,
    file_url: String,
    secure_url: String,
    public_id: StorageKey,
    file_size: u64,
    file_type: String,
    attachment_type: AttachmentType,
    uploaded_by: UserId,
    uploaded_by_role: Role,
    uploaded_at: DateTime<Utc>,
}

impl Attachment {
    /// Creates an attachment record with a fresh identifier and the current
    /// clock time.
    #[must_use]
    pub fn new(data: NewAttachment, clock: &impl Clock) -> Self {
        Self {
            id: AttachmentId::new(),
            file_name: data.file_name,
            file_url: data.file_url,
            secure_url: data.secure_url,
            public_id: data.public_id,
            file_size: data.file_size,
            file_type: data.file_type,
            attachment_type: data.attachment_type,
            uploaded_by: data.uploaded_by,
            uploaded_by_role: data.uploaded_by_role,
            uploaded_at: clock.utc(),
        }
    }

    /// Returns the attachment identifier.
    #[must_use]
    pub const fn id(&self) -> AttachmentId {
        self.id
    }

    /// Returns the original file name.
    #[must_use]
    pub const fn file_name(&self) -> &FileName {
        &self.file_name
    }

    /// Returns the public delivery URL.
    #[must_use]
    pub fn file_url(&self) -> &str {
        &self.file_url
    }

    /// Returns the TLS delivery URL.
    #[must_use]
    pub fn secure_url(&self) -> &str {
        &self.secure_url
    }

    /// Returns the external storage reference.
    #[must_use]
    pub const fn public_id(&self) -> &StorageKey {
        &self.public_id
    }

    /// Returns the blob size in bytes.
    #[must_use]
    pub const fn file_size(&self) -> u64 {
        self.file_size
    }

    /// Returns the MIME type reported at upload time.
    #[must_use]
    pub fn file_type(&self) -> &str {
        &self.file_type
    }

    /// Returns the classification of the file.
    #[must_use]
    pub const fn attachment_type(&self) -> AttachmentType {
        self.attachment_type
    }

    /// Returns the uploading user.
    #[must_use]
    pub const fn uploaded_by(&self) -> UserId {
        self.uploaded_by
    }

    /// Returns the role the uploader held at upload time.
    #[must_use]
    pub const fn uploaded_by_role(&self) -> Role {
        self.uploaded_by_role
    }

    /// Returns the upload timestamp.
    #[must_use]
    pub const fn uploaded_at(&self) -> DateTime<Utc> {
        self.uploaded_at
    }
}
