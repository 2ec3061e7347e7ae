//! In-memory [`IPanelApi`] used by the engine's unit tests
//!
//! Keeps a folder tree per target, hands out single-use upload destinations
//! and lets tests inject permanent or transient failures per operation.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Mutex;

use pterosync_core::domain::{LocalFile, RemotePath, RemoteTarget, SyncError};
use pterosync_core::ports::{CreateFolderOutcome, DirectoryEntry, IPanelApi, UploadDestination};
use tokio_util::sync::CancellationToken;

pub const ALLOWED_IMAGE: &str = "docker.io/sples1/k4ryuu-cs2:latest";

/// Builds a target with the allowed image
pub fn target(identifier: &str, name: &str) -> RemoteTarget {
    RemoteTarget {
        uuid: format!("{identifier}-uuid"),
        identifier: identifier.to_string(),
        name: name.to_string(),
        image: ALLOWED_IMAGE.to_string(),
    }
}

/// Port operations, for call counting and failure injection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    ListTargets,
    List,
    Create,
    UploadUrl,
    Upload,
}

#[derive(Default)]
struct State {
    targets: Vec<RemoteTarget>,
    folders: HashMap<String, BTreeSet<RemotePath>>,
    files: HashMap<String, BTreeSet<RemotePath>>,
    creates: HashMap<String, Vec<RemotePath>>,
    uploads: HashMap<String, Vec<RemotePath>>,
    destinations: HashMap<String, String>,
    next_token: u32,
    calls: HashMap<Op, usize>,
    transient: HashMap<Op, usize>,
    failing_listings: HashSet<String>,
    failing_creates: HashMap<(String, RemotePath), u16>,
    failing_upload_urls: HashSet<String>,
    failing_uploads: HashSet<RemotePath>,
    cancel_after_uploads: Option<(usize, CancellationToken)>,
}

impl State {
    /// Records a call and consumes one injected transient failure, if any
    fn enter(&mut self, op: Op) -> Result<(), SyncError> {
        *self.calls.entry(op).or_default() += 1;
        match self.transient.get_mut(&op) {
            Some(left) if *left > 0 => {
                *left -= 1;
                Err(SyncError::NetworkTimeout(format!("injected {op:?} timeout")))
            }
            _ => Ok(()),
        }
    }

    fn has_folder(&self, identifier: &str, path: &RemotePath) -> bool {
        path.is_root()
            || self
                .folders
                .get(identifier)
                .is_some_and(|folders| folders.contains(path))
    }
}

fn status(status: u16, body: &str) -> SyncError {
    SyncError::UnexpectedStatus {
        status,
        body: body.to_string(),
    }
}

#[derive(Default)]
pub struct FakePanel {
    state: Mutex<State>,
}

impl FakePanel {
    pub fn with_targets(targets: Vec<RemoteTarget>) -> Self {
        let panel = Self::default();
        panel.state().targets = targets;
        panel
    }

    fn state(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn add_folder(&self, identifier: &str, path: &str) {
        let path = RemotePath::new(path).unwrap();
        let mut state = self.state();
        let folders = state.folders.entry(identifier.to_string()).or_default();
        folders.extend(path.prefixes());
    }

    pub fn add_file(&self, identifier: &str, path: &str) {
        self.state()
            .files
            .entry(identifier.to_string())
            .or_default()
            .insert(RemotePath::new(path).unwrap());
    }

    pub fn fail_listing(&self, identifier: &str) {
        self.state().failing_listings.insert(identifier.to_string());
    }

    pub fn fail_create(&self, identifier: &str, path: &str, code: u16) {
        self.state()
            .failing_creates
            .insert((identifier.to_string(), RemotePath::new(path).unwrap()), code);
    }

    pub fn fail_upload_url(&self, identifier: &str) {
        self.state().failing_upload_urls.insert(identifier.to_string());
    }

    pub fn fail_upload(&self, relative_path: &str) {
        self.state()
            .failing_uploads
            .insert(RemotePath::new(relative_path).unwrap());
    }

    /// The next `n` calls of `op` time out
    pub fn transient_failures(&self, op: Op, n: usize) {
        self.state().transient.insert(op, n);
    }

    /// Cancels `token` once `n` uploads have completed
    pub fn cancel_after_uploads(&self, n: usize, token: CancellationToken) {
        self.state().cancel_after_uploads = Some((n, token));
    }

    /// Folders created on `identifier`, in creation order
    pub fn creates(&self, identifier: &str) -> Vec<RemotePath> {
        self.state()
            .creates
            .get(identifier)
            .cloned()
            .unwrap_or_default()
    }

    /// Files uploaded to `identifier`, sorted
    pub fn uploads(&self, identifier: &str) -> Vec<RemotePath> {
        let mut uploads = self
            .state()
            .uploads
            .get(identifier)
            .cloned()
            .unwrap_or_default();
        uploads.sort();
        uploads
    }

    pub fn count(&self, op: Op) -> usize {
        self.state().calls.get(&op).copied().unwrap_or(0)
    }
}

#[async_trait::async_trait]
impl IPanelApi for FakePanel {
    async fn list_targets(&self) -> Result<Vec<RemoteTarget>, SyncError> {
        let mut state = self.state();
        state.enter(Op::ListTargets)?;
        Ok(state.targets.clone())
    }

    async fn list_directory(
        &self,
        target: &RemoteTarget,
        directory: &RemotePath,
    ) -> Result<Vec<DirectoryEntry>, SyncError> {
        let mut state = self.state();
        state.enter(Op::List)?;
        if state.failing_listings.contains(&target.identifier) {
            return Err(status(500, "listing unavailable"));
        }
        if !state.has_folder(&target.identifier, directory) {
            return Err(status(404, "directory not found"));
        }

        let is_child = |path: &RemotePath| path.parent().as_ref() == Some(directory);
        let mut entries = Vec::new();
        if let Some(folders) = state.folders.get(&target.identifier) {
            entries.extend(folders.iter().filter(|p| is_child(p)).map(|p| DirectoryEntry {
                name: p.file_name().unwrap_or_default().to_string(),
                is_directory: true,
            }));
        }
        if let Some(files) = state.files.get(&target.identifier) {
            entries.extend(files.iter().filter(|p| is_child(p)).map(|p| DirectoryEntry {
                name: p.file_name().unwrap_or_default().to_string(),
                is_directory: false,
            }));
        }
        Ok(entries)
    }

    async fn create_folder(
        &self,
        target: &RemoteTarget,
        parent: &RemotePath,
        name: &str,
    ) -> Result<CreateFolderOutcome, SyncError> {
        let mut state = self.state();
        state.enter(Op::Create)?;
        let path = parent.join(name)?;
        let id = target.identifier.clone();

        if let Some(code) = state.failing_creates.get(&(id.clone(), path.clone())) {
            return Err(status(*code, "create rejected"));
        }
        if state.has_folder(&id, &path) {
            return Ok(CreateFolderOutcome::AlreadyExists);
        }
        if !state.has_folder(&id, parent) {
            return Err(status(500, "parent directory missing"));
        }

        state.folders.entry(id.clone()).or_default().insert(path.clone());
        state.creates.entry(id).or_default().push(path);
        Ok(CreateFolderOutcome::Created)
    }

    async fn request_upload_url(
        &self,
        target: &RemoteTarget,
        directory: &RemotePath,
    ) -> Result<UploadDestination, SyncError> {
        let mut state = self.state();
        state.enter(Op::UploadUrl)?;
        if state.failing_upload_urls.contains(&target.identifier) {
            return Err(status(403, "uploads disabled"));
        }
        if !state.has_folder(&target.identifier, directory) {
            return Err(status(404, "directory not found"));
        }

        state.next_token += 1;
        let url = format!("https://node.test/upload/file?token={}", state.next_token);
        state
            .destinations
            .insert(url.clone(), target.identifier.clone());
        Ok(UploadDestination {
            url,
            directory: directory.clone(),
        })
    }

    async fn upload_file(
        &self,
        destination: &UploadDestination,
        file: &LocalFile,
    ) -> Result<(), SyncError> {
        let mut state = self.state();
        state.enter(Op::Upload)?;
        let Some(id) = state.destinations.remove(&destination.url) else {
            return Err(status(403, "destination expired"));
        };
        if destination.directory != file.remote_directory() {
            return Err(status(400, "wrong directory"));
        }
        if state.failing_uploads.contains(file.relative_path()) {
            return Err(status(500, "upload rejected"));
        }

        let path = file.relative_path().clone();
        state.files.entry(id.clone()).or_default().insert(path.clone());
        state.uploads.entry(id).or_default().push(path);

        let done: usize = state.uploads.values().map(Vec::len).sum();
        if let Some((n, token)) = &state.cancel_after_uploads {
            if done >= *n {
                token.cancel();
            }
        }
        Ok(())
    }
}
