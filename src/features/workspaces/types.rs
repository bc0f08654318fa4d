//! Request and response types for workspace endpoints.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WorkspaceRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Workspace {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub team_id: Option<String>,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct WorkspaceList {
    #[serde(default)]
    pub workspaces: Vec<Workspace>,
}

/// Single-workspace responses arrive either bare or under a `workspace` key.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum WorkspacePayload {
    Wrapped { workspace: Workspace },
    Bare(Workspace),
}

impl WorkspacePayload {
    #[must_use]
    pub fn into_workspace(self) -> Workspace {
        match self {
            Self::Wrapped { workspace } | Self::Bare(workspace) => workspace,
        }
    }
}
