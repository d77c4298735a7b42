//! VOSpace transfer specification
//!
//! A transfer job is a negotiated, time-bounded permission to push or pull
//! one object against the store. The negotiation request carries a small XML
//! descriptor naming the target node and the direction.

use serde::{Deserialize, Serialize};

/// Direction of a VOSpace transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransferDirection {
    Push,
    Pull,
}

impl TransferDirection {
    /// Wire name used in the transfer descriptor
    pub fn as_wire(self) -> &'static str {
        match self {
            Self::Push => "pushToVoSpace",
            Self::Pull => "pullFromVoSpace",
        }
    }
}

impl std::fmt::Display for TransferDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_wire())
    }
}

/// A single push or pull against a VOSpace folder/file
///
/// Immutable once submitted for negotiation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferSpec {
    pub direction: TransferDirection,
    /// Folder under the user's VOSpace root
    pub folder: String,
    /// Remote file name within the folder
    pub file: String,
}

impl TransferSpec {
    pub fn push(folder: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            direction: TransferDirection::Push,
            folder: folder.into(),
            file: file.into(),
        }
    }

    pub fn pull(folder: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            direction: TransferDirection::Pull,
            folder: folder.into(),
            file: file.into(),
        }
    }

    /// Render the transfer descriptor posted to the negotiation endpoint
    ///
    /// The target node is addressed relative to the user's space; view and
    /// protocol identifiers are the fixed pair the store expects.
    pub fn to_descriptor(&self, user: &str) -> String {
        format!(
            r#"<vos:transfer xmlns:vos="http://www.ivoa.net/xml/VOSpace/v2.0">
    <vos:target>vos://esavo!vospace/{user}/{folder}</vos:target>
    <vos:direction>{direction}</vos:direction>
    <vos:view uri="vos://esavo!vospace/core#fits"/>
    <vos:protocol uri="vos://esavo!vospace/core#httpput"/>
</vos:transfer>"#,
            user = user,
            folder = self.folder,
            direction = self.direction.as_wire(),
        )
    }
}
