//! Integration tests for pterosync-panel
//!
//! Uses wiremock to simulate the panel API and verifies end-to-end behavior
//! of the PanelClient: server discovery, directory listing, folder creation,
//! signed upload URLs and multipart uploads.

mod common;

mod test_files;
mod test_upload;
