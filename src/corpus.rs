use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{
    error::{Error, Result},
    walker,
};

/// The single CSV file exposed as a pseudo-folder alongside real folders.
pub const CSV_PSEUDO_FOLDER: &str = "email_headers.csv";

/// The corpus root directory and the operations that read from it.
///
/// Constructed once and passed into request handlers explicitly; there is
/// no process-global corpus state.
#[derive(Debug, Clone)]
pub struct SourceDir {
    root: PathBuf,
}

impl SourceDir {
    /// Resolve the corpus root from, in order of priority:
    /// 1. An explicit path (from --source-dir)
    /// 2. The KRONOSCOPE_SOURCE_DIR environment variable
    /// 3. `sources` in the working directory
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        let root = if let Some(path) = explicit {
            path.to_path_buf()
        } else if let Ok(val) = std::env::var("KRONOSCOPE_SOURCE_DIR") {
            PathBuf::from(val)
        } else {
            PathBuf::from("sources")
        };

        if !root.is_dir() {
            return Err(Error::Config(format!(
                "source directory does not exist: {}",
                root.display()
            )));
        }

        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The tree of news articles embedded at bootstrap time.
    pub fn news_dir(&self) -> PathBuf {
        self.root.join("news")
    }

    /// Where the docx-converted resume text files live.
    pub fn resumes_dir(&self) -> PathBuf {
        self.root.join("resumetxt")
    }

    /// List selectable corpus partitions: every sub-directory, sorted,
    /// plus the `email_headers.csv` pseudo-folder when present.
    pub fn list_folders(&self) -> Result<Vec<String>> {
        let mut folders = Vec::new();
        for entry in std::fs::read_dir(&self.root)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                folders.push(entry.file_name().to_string_lossy().to_string());
            }
        }
        folders.sort();

        if self.root.join(CSV_PSEUDO_FOLDER).is_file() {
            folders.push(CSV_PSEUDO_FOLDER.to_string());
        }
        Ok(folders)
    }

    /// Reject any requested folder that is not a listed partition.
    ///
    /// Folder names come from request bodies and are used to build
    /// filesystem paths, so they are checked against the allow-list
    /// instead of being trusted.
    fn check_folders(&self, requested: &[String]) -> Result<()> {
        let known = self.list_folders()?;
        for folder in requested {
            if !known.contains(folder) {
                return Err(Error::NotFound {
                    kind: "folder",
                    name: folder.clone(),
                });
            }
        }
        Ok(())
    }

    /// Load the selected folders as one lower-cased text blob for word
    /// frequency counting.
    ///
    /// Directory folders are walked recursively and only `.txt` files are
    /// read. The CSV pseudo-folder contributes `Subject` plus `Body` (or
    /// `Content` when `Body` is missing or empty) per row. An empty
    /// selection yields an empty string.
    pub fn load_lowercased(&self, folders: &[String]) -> Result<String> {
        self.check_folders(folders)?;

        let mut text = String::new();
        for folder in folders {
            if folder == CSV_PSEUDO_FOLDER {
                load_csv_lowercased(
                    &self.root.join(CSV_PSEUDO_FOLDER),
                    &mut text,
                )?;
                continue;
            }

            let files =
                walker::discover_files(&self.root.join(folder), Some(&["txt"]))?;
            debug!(folder, files = files.len(), "loading folder");
            for file in &files {
                text.push_str(&read_text(&file.absolute_path)?.to_lowercase());
                text.push(' ');
            }
        }
        Ok(text)
    }

    /// Concatenate every file under each selected folder (no extension
    /// filter) into one labeled context per folder.
    ///
    /// Files are ordered lexicographically by relative path so the
    /// assembled context is deterministic across runs. The pseudo-folder
    /// contributes the raw CSV content.
    pub fn folder_contexts(
        &self,
        folders: &[String],
    ) -> Result<Vec<(String, String)>> {
        self.check_folders(folders)?;

        let mut contexts = Vec::with_capacity(folders.len());
        for folder in folders {
            let mut content = String::new();
            if folder == CSV_PSEUDO_FOLDER {
                content = read_text(&self.root.join(CSV_PSEUDO_FOLDER))?;
            } else {
                let files =
                    walker::discover_files(&self.root.join(folder), None)?;
                for file in &files {
                    content.push_str(&read_text(&file.absolute_path)?);
                    content.push('\n');
                }
            }
            contexts.push((folder.clone(), content));
        }
        Ok(contexts)
    }

    /// Combine per-folder contexts into the single `all_context` string
    /// handed to the answer pipeline, each section labeled with its
    /// source folder.
    pub fn aggregate_contexts(&self, folders: &[String]) -> Result<String> {
        let mut all_context = String::new();
        for (folder, content) in self.folder_contexts(folders)? {
            all_context.push_str(&format!("Source: {folder}\n{content}\n"));
        }
        Ok(all_context)
    }
}

/// Read a file as UTF-8, falling back to Latin-1 when the bytes are not
/// valid UTF-8. Latin-1 maps every byte to a character, so the fallback
/// always succeeds.
pub fn read_text(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)?;
    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            Ok(e.into_bytes().iter().map(|&b| b as char).collect())
        }
    }
}

/// Append the lower-cased `Subject` + `Body`/`Content` of each CSV row.
fn load_csv_lowercased(path: &Path, text: &mut String) -> Result<()> {
    let raw = read_text(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(raw.as_bytes());

    let headers = reader.headers()?.clone();
    let subject_idx = headers.iter().position(|h| h == "Subject");
    let body_idx = headers.iter().position(|h| h == "Body");
    let content_idx = headers.iter().position(|h| h == "Content");

    for record in reader.records() {
        let record = record?;
        let subject = subject_idx.and_then(|i| record.get(i)).unwrap_or("");
        let mut body = body_idx.and_then(|i| record.get(i)).unwrap_or("");
        if body.is_empty() {
            body = content_idx.and_then(|i| record.get(i)).unwrap_or("");
        }
        text.push_str(&format!("{subject} {body} ").to_lowercase());
    }
    Ok(())
}
