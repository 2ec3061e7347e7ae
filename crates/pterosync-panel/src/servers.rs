//! Server discovery
//!
//! `GET /api/client` lists every server the API key can access. The panel
//! paginates the listing; [`list_servers`] follows the pages until the
//! reported last page.

use pterosync_core::domain::{RemoteTarget, SyncError};
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::client::{read_json, send, unexpected_status, PanelClient};
use crate::files::Wrapped;

/// Safety limit on the number of listing pages followed
const MAX_PAGES: u32 = 100;

/// Paginated server listing
#[derive(Debug, Deserialize)]
struct ServerListPage {
    data: Vec<Wrapped<ServerAttributes>>,
    meta: Option<ListMeta>,
}

#[derive(Debug, Deserialize)]
struct ServerAttributes {
    uuid: String,
    identifier: String,
    name: String,
    docker_image: String,
}

#[derive(Debug, Deserialize)]
struct ListMeta {
    pagination: Option<Pagination>,
}

#[derive(Debug, Deserialize)]
struct Pagination {
    current_page: u32,
    total_pages: u32,
}

impl From<ServerAttributes> for RemoteTarget {
    fn from(attrs: ServerAttributes) -> Self {
        Self {
            uuid: attrs.uuid,
            identifier: attrs.identifier,
            name: attrs.name,
            image: attrs.docker_image,
        }
    }
}

/// Lists all servers visible to the client's API key
///
/// A listing without pagination metadata is treated as a single page. At
/// most [`MAX_PAGES`] requests are made, and a page that does not advance
/// ends the walk.
pub async fn list_servers(client: &PanelClient) -> Result<Vec<RemoteTarget>, SyncError> {
    let mut servers = Vec::new();
    let mut page: u32 = 1;
    let mut fetched: u32 = 0;

    loop {
        debug!(page, "Fetching server listing page");

        let response = send(
            client
                .request(Method::GET, "")
                .query(&[("page", page.to_string())]),
        )
        .await?;
        fetched += 1;

        if response.status() != StatusCode::OK {
            return Err(unexpected_status(response).await);
        }

        let listing: ServerListPage = read_json(response).await?;
        let pagination = listing.meta.and_then(|m| m.pagination);

        // A panel answering an earlier page than requested would repeat servers
        if let Some(p) = &pagination {
            if p.current_page < page {
                warn!(
                    requested = page,
                    returned = p.current_page,
                    "Server listing did not advance, stopping"
                );
                break;
            }
        }

        servers.extend(listing.data.into_iter().map(|s| RemoteTarget::from(s.attributes)));

        let Some(pagination) = pagination else {
            break;
        };
        if pagination.current_page >= pagination.total_pages {
            break;
        }
        if fetched >= MAX_PAGES {
            warn!(fetched, total_pages = pagination.total_pages, "Server listing page limit reached");
            break;
        }
        page = pagination.current_page + 1;
    }

    debug!(count = servers.len(), "Server listing complete");
    Ok(servers)
}
