//! File-backed persistence for project records.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use gigboard_core::{sample_projects, Error, NewProject, Project, Result};

/// Narrow persistence seam for project records.
///
/// Request handlers only ever see this trait, so the backing storage can
/// change without touching callers.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Load the full project sequence, newest first.
    ///
    /// Never fails on an unreadable or corrupt store file: the caller gets
    /// a fresh copy of the sample dataset instead, and nothing is
    /// persisted. Callers own the returned sequence; mutating it does not
    /// affect the store until [`ProjectStore::replace_all`] runs.
    async fn read_all(&self) -> Result<Vec<Project>>;

    /// Atomically replace the persisted sequence with `projects`.
    async fn replace_all(&self, projects: &[Project]) -> Result<()>;

    /// Validate a candidate, stamp id and timestamp, insert it at the
    /// front, and persist. On persist failure the insert is discarded.
    async fn create(&self, candidate: NewProject) -> Result<Project>;

    /// Remove every record whose id matches `id` exactly.
    ///
    /// Returns [`Error::NotFound`] without writing when nothing matched.
    async fn delete(&self, id: &str) -> Result<()>;

    /// Overwrite the store with a fresh sample dataset and return it.
    async fn reset(&self) -> Result<Vec<Project>>;
}

/// JSON-file-backed [`ProjectStore`].
///
/// `path` is the current-format store file; `legacy_path` is the prior
/// well-known location, consulted once at initialization for a one-way
/// copy migration.
pub struct JsonFileStore {
    path: PathBuf,
    legacy_path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>, legacy_path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            legacy_path: legacy_path.into(),
        }
    }

    /// One-time setup, also run lazily if the store file vanishes.
    ///
    /// Priority order: an existing current-format file wins; else a legacy
    /// file that parses as a JSON array is copied (not moved) to the
    /// current path; else the sample dataset is seeded. A legacy file that
    /// fails to parse is logged and ignored, never an error.
    pub async fn initialize(&self) -> Result<()> {
        if fs::try_exists(&self.path).await? {
            return Ok(());
        }

        match fs::read(&self.legacy_path).await {
            Ok(bytes) => match serde_json::from_slice::<serde_json::Value>(&bytes) {
                Ok(value) if value.is_array() => {
                    debug!(
                        from = %self.legacy_path.display(),
                        to = %self.path.display(),
                        "store: migrating legacy file"
                    );
                    return self.write_atomic(&serde_json::to_vec_pretty(&value)?).await;
                }
                Ok(_) => {
                    warn!(
                        path = %self.legacy_path.display(),
                        "store: legacy file is not a JSON array, seeding sample dataset"
                    );
                }
                Err(e) => {
                    warn!(
                        path = %self.legacy_path.display(),
                        error = %e,
                        "store: legacy file unparseable, seeding sample dataset"
                    );
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        debug!(path = %self.path.display(), "store: seeding sample dataset");
        self.write_projects(&sample_projects()).await
    }

    async fn write_projects(&self, projects: &[Project]) -> Result<()> {
        self.write_atomic(&serde_json::to_vec_pretty(projects)?).await
    }

    /// Atomic write: temp file + rename.
    ///
    /// The rename is the commit point. On any failure the destination file
    /// still holds its previous content and the leftover temp file is
    /// removed best-effort.
    async fn write_atomic(&self, data: &[u8]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await.map_err(|e| {
                    Error::Persist(format!("create_dir_all {}: {}", parent.display(), e))
                })?;
            }
        }

        let temp_path = self.path.with_extension("json.tmp");
        let result = self.write_and_rename(&temp_path, data).await;

        if result.is_err() {
            // Best-effort cleanup
            if let Err(e) = fs::remove_file(&temp_path).await {
                if e.kind() != ErrorKind::NotFound {
                    warn!(path = %temp_path.display(), error = %e, "store: temp file cleanup failed");
                }
            }
        }

        result
    }

    async fn write_and_rename(&self, temp_path: &Path, data: &[u8]) -> Result<()> {
        let mut file = fs::File::create(temp_path).await.map_err(|e| {
            warn!(path = %temp_path.display(), error = %e, "store: temp file create failed");
            Error::Persist(format!("create {}: {}", temp_path.display(), e))
        })?;
        file.write_all(data).await.map_err(|e| {
            warn!(path = %temp_path.display(), error = %e, "store: temp file write failed");
            Error::Persist(format!("write {}: {}", temp_path.display(), e))
        })?;
        file.sync_all().await.map_err(|e| {
            Error::Persist(format!("sync {}: {}", temp_path.display(), e))
        })?;
        drop(file);

        fs::rename(temp_path, &self.path).await.map_err(|e| {
            warn!(
                from = %temp_path.display(),
                to = %self.path.display(),
                error = %e,
                "store: rename failed"
            );
            Error::Persist(format!(
                "rename {} -> {}: {}",
                temp_path.display(),
                self.path.display(),
                e
            ))
        })
    }
}

#[async_trait]
impl ProjectStore for JsonFileStore {
    async fn read_all(&self) -> Result<Vec<Project>> {
        if !fs::try_exists(&self.path).await? {
            self.initialize().await?;
        }

        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "store: read failed, serving sample dataset"
                );
                return Ok(sample_projects());
            }
        };

        match serde_json::from_slice::<Vec<Project>>(&bytes) {
            Ok(projects) => Ok(projects),
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "store: corrupt store file, serving sample dataset"
                );
                Ok(sample_projects())
            }
        }
    }

    async fn replace_all(&self, projects: &[Project]) -> Result<()> {
        self.write_projects(projects).await
    }

    async fn create(&self, candidate: NewProject) -> Result<Project> {
        let project = candidate.into_project()?;

        let mut projects = self.read_all().await?;
        projects.insert(0, project.clone());
        self.replace_all(&projects).await?;

        debug!(id = %project.id, title = %project.title, "store: project created");
        Ok(project)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut projects = self.read_all().await?;
        let before = projects.len();
        projects.retain(|p| p.id != id);

        if projects.len() == before {
            return Err(Error::NotFound(format!("project {}", id)));
        }

        self.replace_all(&projects).await?;
        debug!(id = %id, "store: project deleted");
        Ok(())
    }

    async fn reset(&self) -> Result<Vec<Project>> {
        let projects = sample_projects();
        self.replace_all(&projects).await?;
        debug!(count = projects.len(), "store: reset to sample dataset");
        Ok(projects)
    }
}
