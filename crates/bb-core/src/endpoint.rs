//! Endpoint tokens: `id:<uuid>` and `folder:<path>`

use std::fmt;

use bb_fs::NormalizedPath;

use crate::mirror::{self, BLACKBOARD_FILE};
use crate::{Error, Result};

const ID_PREFIX: &str = "id";
const FOLDER_PREFIX: &str = "folder";

/// Id value that means "read the id from the folder's blackboard.yaml".
pub const FOLDER_ID_PLACEHOLDER: &str = "_";

/// Which side of a reconciliation an endpoint names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointKind {
    Id,
    Folder,
}

impl EndpointKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Folder => "folder",
        }
    }
}

impl fmt::Display for EndpointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The remote blackboard an `id:` endpoint refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteRef {
    Id(String),
    /// `id:_`, resolved from the paired folder.
    FromFolder,
}

/// A parsed endpoint token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Id(RemoteRef),
    Folder(NormalizedPath),
}

impl Endpoint {
    /// Parse an `id:<uuid>` or `folder:<relative-path>` token.
    pub fn parse(token: &str) -> Result<Self> {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(Error::invalid_endpoint(token, "empty endpoint"));
        }
        let Some((prefix, value)) = trimmed.split_once(':') else {
            return Err(Error::invalid_endpoint(
                trimmed,
                "expected id:<uuid> or folder:<path>",
            ));
        };

        let value = value.trim();
        match prefix.trim() {
            ID_PREFIX => {
                if value.is_empty() {
                    return Err(Error::invalid_endpoint(trimmed, "empty id"));
                }
                if value == FOLDER_ID_PLACEHOLDER {
                    return Ok(Self::Id(RemoteRef::FromFolder));
                }
                Ok(Self::Id(RemoteRef::Id(value.to_string())))
            }
            FOLDER_PREFIX => {
                if value.is_empty() {
                    return Err(Error::invalid_endpoint(trimmed, "empty folder path"));
                }
                Self::parse_folder(trimmed, value).map(Self::Folder)
            }
            other => Err(Error::invalid_endpoint(
                trimmed,
                format!("unknown endpoint prefix {other:?}, expected id: or folder:"),
            )),
        }
    }

    /// Parse the folder argument of import: `folder:<path>` or a bare path.
    pub fn parse_folder_arg(token: &str) -> Result<NormalizedPath> {
        let trimmed = token.trim();
        if trimmed.starts_with(&format!("{FOLDER_PREFIX}:")) {
            return match Self::parse(trimmed)? {
                Self::Folder(path) => Ok(path),
                Self::Id(_) => Err(Error::invalid_endpoint(trimmed, "expected a folder")),
            };
        }
        if trimmed.starts_with(&format!("{ID_PREFIX}:")) {
            return Err(Error::invalid_endpoint(trimmed, "expected a folder, got an id"));
        }
        Self::parse_folder(trimmed, trimmed)
    }

    fn parse_folder(token: &str, value: &str) -> Result<NormalizedPath> {
        NormalizedPath::relative(value).map_err(|err| match err {
            bb_fs::Error::UnsafePath { reason, .. } => Error::invalid_endpoint(token, reason),
            other => Error::Fs(other),
        })
    }

    pub fn kind(&self) -> EndpointKind {
        match self {
            Self::Id(_) => EndpointKind::Id,
            Self::Folder(_) => EndpointKind::Folder,
        }
    }
}

/// A remote blackboard paired with a local mirror folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operands {
    pub remote: RemoteRef,
    pub folder: NormalizedPath,
}

impl Operands {
    /// Pair diff endpoints: one id and one folder, in either order.
    pub fn for_diff(first: Endpoint, second: Endpoint) -> Result<Self> {
        match (first, second) {
            (Endpoint::Id(remote), Endpoint::Folder(folder))
            | (Endpoint::Folder(folder), Endpoint::Id(remote)) => Ok(Self { remote, folder }),
            (a, _) => Err(Error::invalid_endpoint(
                a.kind().as_str(),
                "diff requires one id: and one folder: endpoint",
            )),
        }
    }

    /// Pair sync endpoints, which must run id -> folder.
    pub fn for_sync(source: Endpoint, target: Endpoint) -> Result<Self> {
        let direction = SyncDirection::of(&source, &target)?;
        match (direction, source, target) {
            (SyncDirection::RemoteToFolder, Endpoint::Id(remote), Endpoint::Folder(folder)) => {
                Ok(Self { remote, folder })
            }
            _ => Err(Error::UnsupportedDirection {
                source_kind: EndpointKind::Folder.as_str(),
                target_kind: EndpointKind::Id.as_str(),
            }),
        }
    }

    /// Resolve the remote id, reading it from `<dir>/blackboard.yaml` for
    /// `id:_`. `dir` is the folder resolved against the working directory.
    pub fn remote_id(&self, dir: &NormalizedPath) -> Result<String> {
        match &self.remote {
            RemoteRef::Id(id) => Ok(id.clone()),
            RemoteRef::FromFolder => {
                let token = format!("{ID_PREFIX}:{FOLDER_ID_PLACEHOLDER}");
                let board = mirror::load_blackboard(dir)?.ok_or_else(|| {
                    Error::invalid_endpoint(
                        &token,
                        format!("{} not found in {}", BLACKBOARD_FILE, self.folder),
                    )
                })?;
                let id = board.id.trim();
                if id.is_empty() {
                    return Err(Error::invalid_endpoint(
                        &token,
                        format!("blackboard id not found in {}", self.folder.join(BLACKBOARD_FILE)),
                    ));
                }
                Ok(id.to_string())
            }
        }
    }
}

/// Direction of a sync request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncDirection {
    RemoteToFolder,
    /// Recognised so it can be rejected explicitly.
    FolderToRemote,
}

impl SyncDirection {
    /// Classify a source/target pair. Same-kind pairs are invalid.
    pub fn of(source: &Endpoint, target: &Endpoint) -> Result<Self> {
        match (source.kind(), target.kind()) {
            (EndpointKind::Id, EndpointKind::Folder) => Ok(Self::RemoteToFolder),
            (EndpointKind::Folder, EndpointKind::Id) => Ok(Self::FolderToRemote),
            (kind, _) => Err(Error::invalid_endpoint(
                kind.as_str(),
                format!("sync needs an id: and a folder: endpoint, got two {kind} endpoints"),
            )),
        }
    }
}
