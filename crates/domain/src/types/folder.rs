//! Folder and loop family descriptors

use std::fmt;

use serde::{Deserialize, Serialize};

/// Logical mail location synchronised by its own loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FolderKind {
    Inbox,
    Sentbox,
    Mvbox,
}

impl FolderKind {
    pub const ALL: [Self; 3] = [Self::Inbox, Self::Sentbox, Self::Mvbox];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Inbox => "inbox",
            Self::Sentbox => "sentbox",
            Self::Mvbox => "mvbox",
        }
    }
}

impl fmt::Display for FolderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One independently running sync loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "direction", content = "folder", rename_all = "snake_case")]
pub enum LoopFamily {
    /// Inbound: jobs, fetch, idle for one folder.
    Imap(FolderKind),
    /// Outbound: jobs, idle.
    Smtp,
}

impl LoopFamily {
    pub fn name(self) -> &'static str {
        match self {
            Self::Imap(FolderKind::Inbox) => "imap-inbox",
            Self::Imap(FolderKind::Sentbox) => "imap-sentbox",
            Self::Imap(FolderKind::Mvbox) => "imap-mvbox",
            Self::Smtp => "smtp",
        }
    }
}

impl fmt::Display for LoopFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
