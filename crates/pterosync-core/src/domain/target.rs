//! Remote targets (servers) the engine uploads to

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

/// One remote server exposing the file-management API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteTarget {
    /// Panel-wide UUID of the server
    pub uuid: String,
    /// Short identifier used in API URLs
    pub identifier: String,
    /// Human-readable display name
    pub name: String,
    /// Declared container image (e.g. `docker.io/org/image:tag`)
    pub image: String,
}

impl Display for RemoteTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.identifier)
    }
}
