//! Best-effort archiving of photo evidence into the team gallery.
//!
//! Submissions run as detached tasks: they outlive the transaction of the message
//! that carried them, are never retried, and report failures to the log only.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use reqwest::{Client, StatusCode};
use thiserror::Error;
use tokio::{fs, io::AsyncWriteExt, runtime::Handle};
use tracing::{info, warn};

use crate::{
    dto::PhotoRef,
    transport::{FileResolver, TransportError},
};

/// A photo to archive for a team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoSubmission {
    /// Largest available resolution of the attachment.
    pub photo: PhotoRef,
    /// Team the photo is credited to.
    pub team_id: i64,
    /// Names the gallery folder.
    pub game_title: String,
}

/// Fire-and-forget receiver of photo submissions.
pub trait PhotoSink: Send + Sync {
    /// Accept a submission without blocking. Must not fail.
    fn submit(&self, submission: PhotoSubmission);
}

/// Failures while archiving one photo.
#[derive(Debug, Error)]
pub enum PhotoError {
    /// The platform could not produce a download URL.
    #[error("failed to resolve download URL")]
    Resolve(#[source] TransportError),
    /// The team directory could not be created.
    #[error("failed to create gallery directory `{}`", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The HTTP download failed mid-flight.
    #[error("failed to download photo `{file_id}`")]
    Download {
        file_id: String,
        #[source]
        source: reqwest::Error,
    },
    /// The file server answered with a non-success status.
    #[error("unexpected download status {status} for photo `{file_id}`")]
    DownloadStatus { file_id: String, status: StatusCode },
    /// Writing the file to disk failed.
    #[error("failed to write `{}`", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Downloads photos into `gallery/<sanitized title>/<team id>/<file id>.jpg`.
#[derive(Clone)]
pub struct PhotoArchiver {
    runtime: Handle,
    resolver: Arc<dyn FileResolver>,
    client: Client,
    gallery: Arc<Path>,
}

impl PhotoArchiver {
    /// Build an archiver whose tasks are spawned on `runtime`.
    pub fn new(
        runtime: Handle,
        resolver: Arc<dyn FileResolver>,
        client: Client,
        gallery: impl Into<PathBuf>,
    ) -> Self {
        Self {
            runtime,
            resolver,
            client,
            gallery: Arc::from(gallery.into()),
        }
    }

    /// Directory holding a team's photos for a game.
    pub fn team_dir(&self, game_title: &str, team_id: i64) -> PathBuf {
        self.gallery
            .join(sanitize_title(game_title))
            .join(team_id.to_string())
    }

    /// Download one photo and return where it was written.
    pub async fn archive(&self, submission: &PhotoSubmission) -> Result<PathBuf, PhotoError> {
        let file_id = &submission.photo.file_id;
        let url = self
            .resolver
            .resolve_file_url(file_id)
            .await
            .map_err(PhotoError::Resolve)?;

        let dir = self.team_dir(&submission.game_title, submission.team_id);
        fs::create_dir_all(&dir)
            .await
            .map_err(|source| PhotoError::CreateDir {
                path: dir.clone(),
                source,
            })?;

        // the URL may embed credentials, keep it out of errors
        let download_error = |source: reqwest::Error| PhotoError::Download {
            file_id: file_id.clone(),
            source: source.without_url(),
        };

        let mut response = self.client.get(url).send().await.map_err(download_error)?;
        if !response.status().is_success() {
            return Err(PhotoError::DownloadStatus {
                file_id: file_id.clone(),
                status: response.status(),
            });
        }

        let path = dir.join(format!("{file_id}.jpg"));
        let write_error = |source: std::io::Error| PhotoError::Write {
            path: path.clone(),
            source,
        };

        let mut file = fs::File::create(&path).await.map_err(write_error)?;
        while let Some(chunk) = response.chunk().await.map_err(download_error)? {
            file.write_all(&chunk).await.map_err(write_error)?;
        }
        file.flush().await.map_err(write_error)?;

        Ok(path)
    }
}

impl PhotoSink for PhotoArchiver {
    fn submit(&self, submission: PhotoSubmission) {
        let archiver = self.clone();
        self.runtime.spawn(async move {
            match archiver.archive(&submission).await {
                Ok(path) => info!(
                    team_id = submission.team_id,
                    width = submission.photo.width,
                    height = submission.photo.height,
                    path = %path.display(),
                    "photo archived"
                ),
                Err(err) => warn!(
                    team_id = submission.team_id,
                    file_id = %submission.photo.file_id,
                    error = %err,
                    cause = ?std::error::Error::source(&err),
                    "failed to archive photo"
                ),
            }
        });
    }
}

/// Make a game title safe to use as a single directory name.
pub fn sanitize_title(title: &str) -> String {
    title
        .trim()
        .chars()
        .map(|c| {
            if c.is_whitespace() || c == '/' || c == '\\' {
                '-'
            } else {
                c
            }
        })
        .collect()
}
