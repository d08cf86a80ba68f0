use std::fs::File;
use std::io::{BufReader, BufWriter, Write as _};
use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::core::TrackId;
use crate::foundation::error::{SegueError, SegueResult};
use crate::store::model::{Clip, Project, Track, TrackKind};
use crate::store::project_store::{HookOutcome, ProjectStore};

/// On-disk shape of a project file.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDocument {
    /// Project payload; absent for a host that has not initialized one yet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<Project>,
    /// Playhead position in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_time: Option<f64>,
}

impl ProjectDocument {
    /// Parse a document from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> SegueResult<Self> {
        let doc: ProjectDocument = serde_json::from_reader(r)
            .map_err(|e| SegueError::serde(format!("parse project JSON: {e}")))?;
        if let Some(p) = &doc.project {
            p.validate()?;
        }
        Ok(doc)
    }
}

/// Project store backed by a JSON file; `save_now` rewrites the file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    doc: ProjectDocument,
}

impl JsonFileStore {
    /// Load a project file from disk.
    pub fn open(path: impl AsRef<Path>) -> SegueResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            SegueError::validation(format!("open project JSON '{}': {e}", path.display()))
        })?;
        let doc = ProjectDocument::from_reader(BufReader::new(f))?;
        Ok(Self {
            path: path.to_path_buf(),
            doc,
        })
    }

    /// Wrap an in-memory document that will be saved to `path`.
    pub fn with_document(path: impl Into<PathBuf>, doc: ProjectDocument) -> Self {
        Self {
            path: path.into(),
            doc,
        }
    }

    /// File backing this store.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Borrow the current document.
    pub fn document(&self) -> &ProjectDocument {
        &self.doc
    }

    /// Write the document to its file (pretty JSON, trailing newline).
    pub fn write_to_disk(&self) -> SegueResult<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create project dir '{}'", parent.display()))?;
        }
        let f = File::create(&self.path)
            .with_context(|| format!("create project JSON '{}'", self.path.display()))?;
        let mut w = BufWriter::new(f);
        serde_json::to_writer_pretty(&mut w, &self.doc)
            .map_err(|e| SegueError::serde(format!("write project JSON: {e}")))?;
        w.write_all(b"\n")
            .with_context(|| format!("write project JSON '{}'", self.path.display()))?;
        w.flush()
            .with_context(|| format!("flush project JSON '{}'", self.path.display()))?;
        Ok(())
    }
}

impl ProjectStore for JsonFileStore {
    fn project(&self) -> Option<&Project> {
        self.doc.project.as_ref()
    }

    fn project_mut(&mut self) -> Option<&mut Project> {
        self.doc.project.as_mut()
    }

    fn current_time(&self) -> Option<f64> {
        self.doc.current_time
    }

    fn add_track(&mut self, kind: TrackKind) -> Option<TrackId> {
        let project = self.doc.project.as_mut()?;
        let prefix = match kind {
            TrackKind::Video => "v",
            TrackKind::Audio => "a",
        };
        let n = project.tracks.iter().filter(|t| t.kind == kind).count() + 1;
        let id = TrackId::new(format!("{prefix}{n}"));
        project.tracks.push(Track {
            id: id.clone(),
            kind,
            clips: Vec::new(),
        });
        Some(id)
    }

    fn add_clip(&mut self, track: &TrackId, clip: Clip) -> HookOutcome {
        let Some(project) = self.doc.project.as_mut() else {
            return HookOutcome::Failed("project not initialized".to_owned());
        };
        match project.tracks.iter_mut().find(|t| &t.id == track) {
            Some(t) => {
                t.clips.push(clip);
                HookOutcome::Ran
            }
            None => HookOutcome::Failed(format!("unknown track '{track}'")),
        }
    }

    fn save_now(&mut self) -> HookOutcome {
        match self.write_to_disk() {
            Ok(()) => HookOutcome::Ran,
            Err(e) => HookOutcome::Failed(e.to_string()),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/store/json_file.rs"]
mod tests;
