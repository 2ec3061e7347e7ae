//! Multipart transfer to a signed upload destination
//!
//! The destination URL is pre-authorized by the panel, so the request carries
//! no API key. The file is streamed from disk rather than buffered, and its
//! handle lives only as long as the request body.

use pterosync_core::domain::{LocalFile, SyncError};
use pterosync_core::ports::UploadDestination;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, StatusCode};
use tokio_util::io::ReaderStream;
use tracing::debug;

use crate::client::{send, unexpected_status, PanelClient};

/// Multipart field name the panel's upload handler reads
const UPLOAD_FIELD: &str = "files";

/// Streams `file` to `destination` as a multipart upload
///
/// The `directory` query parameter is repeated on the upload request, as the
/// panel's own web client does. `200 OK` and `204 No Content` are success.
///
/// # Errors
/// [`SyncError::LocalIo`] if the file cannot be opened, transport errors as
/// mapped by the client, [`SyncError::UnexpectedStatus`] otherwise
pub async fn upload_file(
    client: &PanelClient,
    destination: &UploadDestination,
    file: &LocalFile,
) -> Result<(), SyncError> {
    let path = file.local_path();
    let handle = tokio::fs::File::open(path)
        .await
        .map_err(|e| SyncError::local_io(path, e))?;
    let length = handle
        .metadata()
        .await
        .map_err(|e| SyncError::local_io(path, e))?
        .len();

    debug!(
        file = %file.relative_path(),
        bytes = length,
        "Streaming file to upload destination"
    );

    let part = Part::stream_with_length(Body::wrap_stream(ReaderStream::new(handle)), length)
        .file_name(file.file_name().to_string());
    let form = Form::new().part(UPLOAD_FIELD, part);

    let response = send(
        client
            .http_client()
            .post(&destination.url)
            .timeout(client.upload_timeout())
            .query(&[("directory", destination.directory.to_wire())])
            .multipart(form),
    )
    .await?;

    match response.status() {
        StatusCode::OK | StatusCode::NO_CONTENT => Ok(()),
        _ => Err(unexpected_status(response).await),
    }
}
