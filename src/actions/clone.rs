//! Template cloning.
//!
//! Downloads a snapshot of a GitHub repository as a zip archive and unpacks
//! it into the project directory. No git history is kept.

use std::fs::{self, File};
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};
use std::time::Duration;

use zip::ZipArchive;

use crate::feedback::{Terminal, TrainAnimation};
use crate::templates::{TemplateSource, GITHUB_API};

const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(120);

/// Error type for cloning a template.
#[derive(Debug, thiserror::Error)]
pub enum CloneError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The repository or ref does not exist (or is private).
    #[error("Repository not found: {0}")]
    NotFound(String),
    /// The downloaded archive could not be read.
    #[error("Invalid template archive: {0}")]
    Archive(#[from] zip::result::ZipError),
    /// Writing files failed.
    #[error("Failed to write template files: {0}")]
    Io(#[from] io::Error),
    /// The archive (or the requested subdirectory) had no files.
    #[error("Template {0} contains no files")]
    Empty(String),
    /// The extraction task panicked or was cancelled.
    #[error("Extraction task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Clone a template into `target`, showing the train while it runs.
///
/// On failure the animation ends with a failure line and the error is
/// returned for the caller to report.
pub async fn clone_repo(source: &TemplateSource, target: &Path) -> Result<(), CloneError> {
    let client = http_client()?;
    let train = TrainAnimation::new(format!("Cloning template {source}..."));
    clone_with(&client, GITHUB_API, source, target, &train).await
}

fn http_client() -> Result<reqwest::Client, CloneError> {
    Ok(reqwest::Client::builder()
        .user_agent(format!("railyard/{}", crate::VERSION))
        .timeout(DOWNLOAD_TIMEOUT)
        .build()?)
}

async fn clone_with<T: Terminal + 'static>(
    client: &reqwest::Client,
    api_base: &str,
    source: &TemplateSource,
    target: &Path,
    train: &TrainAnimation<T>,
) -> Result<(), CloneError> {
    train.start();

    match fetch_into(client, api_base, source, target, train).await {
        Ok(files) => {
            train.stop(true, "Template cloned successfully!");
            tracing::debug!(files, dest = %target.display(), "template extracted");
            Ok(())
        }
        Err(e) => {
            train.stop(false, "Failed to clone template");
            tracing::debug!(error = %e, "clone failed");
            Err(e)
        }
    }
}

async fn fetch_into<T: Terminal + 'static>(
    client: &reqwest::Client,
    api_base: &str,
    source: &TemplateSource,
    target: &Path,
    train: &TrainAnimation<T>,
) -> Result<usize, CloneError> {
    let bytes = download_archive(client, &source.archive_url_at(api_base), source).await?;

    train.update_message(format!("Unpacking {source}..."));
    let target = target.to_path_buf();
    let subdir = source.subdir.clone();
    let label = source.to_string();
    tokio::task::spawn_blocking(move || {
        let files = extract_archive(&bytes, subdir.as_deref(), &target)?;
        if files == 0 {
            return Err(CloneError::Empty(label));
        }
        Ok(files)
    })
    .await?
}

async fn download_archive(
    client: &reqwest::Client,
    url: &str,
    source: &TemplateSource,
) -> Result<Vec<u8>, CloneError> {
    tracing::debug!(%url, "downloading template archive");

    let response = client.get(url).send().await?;
    if response.status() == reqwest::StatusCode::NOT_FOUND {
        return Err(CloneError::NotFound(source.to_string()));
    }

    let bytes = response.error_for_status()?.bytes().await?;
    Ok(bytes.to_vec())
}

/// Unpack a repository archive into `target`.
///
/// The archive's single top-level directory is stripped. When `subdir` is
/// given, only entries under it are extracted, relative to it. Existing
/// files are overwritten. Returns the number of files written.
pub fn extract_archive(
    bytes: &[u8],
    subdir: Option<&str>,
    target: &Path,
) -> Result<usize, CloneError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let prefix = subdir.map(PathBuf::from).unwrap_or_default();
    let mut written = 0;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let Some(path) = entry.enclosed_name().map(|p| p.to_path_buf()) else {
            continue;
        };

        let mut components = path.components();
        components.next();
        let Ok(relative) = components.as_path().strip_prefix(&prefix) else {
            continue;
        };
        if relative.as_os_str().is_empty() {
            continue;
        }

        let out_path = target.join(relative);
        if entry.is_dir() {
            fs::create_dir_all(&out_path)?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = File::create(&out_path)?;
        io::copy(&mut entry, &mut file)?;

        // Keep scripts executable.
        #[cfg(unix)]
        if entry.unix_mode().is_some_and(|mode| mode & 0o111 != 0) {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&out_path, fs::Permissions::from_mode(0o755))?;
        }

        written += 1;
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::{Phase, RecordingTerminal, TerminalOp};
    use std::io::Write;
    use tempfile::TempDir;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use zip::write::FileOptions;
    use zip::ZipWriter;

    fn archive(entries: &[(&str, Option<&str>)]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default();
        for (name, contents) in entries {
            match contents {
                Some(contents) => {
                    writer.start_file(*name, options).unwrap();
                    writer.write_all(contents.as_bytes()).unwrap();
                }
                None => writer.add_directory(*name, options).unwrap(),
            }
        }
        writer.finish().unwrap().into_inner()
    }

    fn sample() -> Vec<u8> {
        archive(&[
            ("foo-bar-abc123/", None),
            ("foo-bar-abc123/README.md", Some("# bar")),
            ("foo-bar-abc123/src/", None),
            ("foo-bar-abc123/src/main.rs", Some("fn main() {}")),
            ("foo-bar-abc123/examples/basic/Cargo.toml", Some("[package]")),
            ("foo-bar-abc123/examples/basic/src/lib.rs", Some("// lib")),
        ])
    }

    /// Serve a single raw HTTP response on localhost, returning the base URL.
    async fn serve_once(status: &str, body: Vec<u8>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let head = format!(
            "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        );
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 4096];
            let _ = socket.read(&mut request).await;
            socket.write_all(head.as_bytes()).await.unwrap();
            socket.write_all(&body).await.unwrap();
            let _ = socket.shutdown().await;
        });
        format!("http://{addr}")
    }

    fn local_client() -> reqwest::Client {
        reqwest::Client::builder().no_proxy().build().unwrap()
    }

    fn recorded_train(
        source: &TemplateSource,
    ) -> (TrainAnimation<RecordingTerminal>, RecordingTerminal) {
        let recorder = RecordingTerminal::new();
        let train = TrainAnimation::with_terminal(
            format!("Cloning template {source}..."),
            recorder.clone(),
            80,
        );
        (train, recorder)
    }

    #[tokio::test]
    async fn test_clone_success_stops_train() {
        let base = serve_once("200 OK", sample()).await;
        let source = TemplateSource::parse("foo/bar/examples/basic").unwrap();
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("app");
        let (train, recorder) = recorded_train(&source);

        clone_with(&local_client(), &base, &source, &target, &train)
            .await
            .unwrap();

        assert!(target.join("Cargo.toml").exists());
        assert_eq!(train.phase(), Phase::Stopped);
        assert_eq!(train.message(), "Unpacking foo/bar/examples/basic...");
        assert_eq!(
            recorder.written().last().map(String::as_str),
            Some("\x1b[32m✔\x1b[0m Template cloned successfully!")
        );
        assert!(recorder.ops().contains(&TerminalOp::ShowCursor));
    }

    #[tokio::test]
    async fn test_clone_not_found_stops_train() {
        let base = serve_once("404 Not Found", Vec::new()).await;
        let source = TemplateSource::parse("foo/missing").unwrap();
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("app");
        let (train, recorder) = recorded_train(&source);

        let err = clone_with(&local_client(), &base, &source, &target, &train)
            .await
            .unwrap_err();

        assert!(matches!(err, CloneError::NotFound(ref s) if s == "foo/missing"));
        assert!(!target.exists());
        assert_eq!(train.phase(), Phase::Stopped);
        assert_eq!(
            recorder.written().last().map(String::as_str),
            Some("\x1b[31m✖\x1b[0m Failed to clone template")
        );
        assert!(recorder.ops().contains(&TerminalOp::ShowCursor));
    }

    #[tokio::test]
    async fn test_clone_missing_subdirectory_is_empty_error() {
        let base = serve_once("200 OK", sample()).await;
        let source = TemplateSource::parse("foo/bar/nope").unwrap();
        let temp = TempDir::new().unwrap();
        let (train, recorder) = recorded_train(&source);

        let err = clone_with(&local_client(), &base, &source, &temp.path().join("app"), &train)
            .await
            .unwrap_err();

        assert!(matches!(err, CloneError::Empty(_)));
        assert_eq!(
            recorder.written().last().map(String::as_str),
            Some("\x1b[31m✖\x1b[0m Failed to clone template")
        );
    }

    #[test]
    fn test_extract_strips_top_directory() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("app");

        let files = extract_archive(&sample(), None, &target).unwrap();

        assert_eq!(files, 4);
        assert_eq!(fs::read_to_string(target.join("README.md")).unwrap(), "# bar");
        assert!(target.join("src/main.rs").exists());
        assert!(!target.join("foo-bar-abc123").exists());
    }

    #[test]
    fn test_extract_subdirectory_only() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("app");

        let files = extract_archive(&sample(), Some("examples/basic"), &target).unwrap();

        assert_eq!(files, 2);
        assert!(target.join("Cargo.toml").exists());
        assert!(target.join("src/lib.rs").exists());
        assert!(!target.join("README.md").exists());
    }

    #[test]
    fn test_extract_missing_subdirectory_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("app");

        let files = extract_archive(&sample(), Some("nope"), &target).unwrap();
        assert_eq!(files, 0);
        assert!(!target.exists());
    }

    #[test]
    fn test_extract_overwrites_existing_files() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("app");
        fs::create_dir_all(&target).unwrap();
        fs::write(target.join("README.md"), "old").unwrap();

        extract_archive(&sample(), None, &target).unwrap();
        assert_eq!(fs::read_to_string(target.join("README.md")).unwrap(), "# bar");
    }

    #[test]
    fn test_extract_rejects_garbage() {
        let temp = TempDir::new().unwrap();
        let err = extract_archive(b"not a zip", None, temp.path()).unwrap_err();
        assert!(matches!(err, CloneError::Archive(_)));
    }

    #[test]
    fn test_clone_error_display() {
        let err = CloneError::NotFound("foo/bar".to_string());
        assert_eq!(err.to_string(), "Repository not found: foo/bar");

        let err = CloneError::Empty("foo/bar/missing".to_string());
        assert!(err.to_string().contains("contains no files"));
    }
}
