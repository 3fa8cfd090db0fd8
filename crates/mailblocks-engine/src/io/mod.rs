use std::fs;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::editing::Document;
use crate::save::{TemplateId, TemplateRecord, TemplateStore};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid document {path}: {source}")]
    InvalidDocument {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Invalid templates directory: {0}")]
    InvalidTemplatesDir(String),
}

/// Read a document in the persisted `{blocks, settings}` JSON shape
pub fn load_document(path: &Path) -> Result<Document, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path).map_err(IoError::Io)?;
    Document::from_json(&content).map_err(|source| IoError::InvalidDocument {
        path: path.to_path_buf(),
        source,
    })
}

/// Write a document as pretty JSON, creating parent directories
pub fn save_document(path: &Path, document: &Document) -> Result<(), IoError> {
    let json = document
        .to_json()
        .map_err(|source| IoError::InvalidDocument {
            path: path.to_path_buf(),
            source,
        })?;
    write_file(path, &json)
}

/// Write arbitrary output (e.g. compiled HTML), creating parent directories
pub fn write_file(path: &Path, content: &str) -> Result<(), IoError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(IoError::Io)?;
    }
    fs::write(path, content).map_err(IoError::Io)
}

/// Find document files (`*.json`) under `dir`, sorted
pub fn scan_documents(dir: &Path) -> Result<Vec<PathBuf>, IoError> {
    validate_templates_dir(dir)?;

    let mut files = Vec::new();
    scan_directory_recursive(dir, &mut files)?;
    files.sort();
    Ok(files)
}

fn scan_directory_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), IoError> {
    let entries = fs::read_dir(dir).map_err(IoError::Io)?;

    for entry in entries {
        let entry = entry.map_err(IoError::Io)?;
        let path = entry.path();

        if path.is_dir() {
            scan_directory_recursive(&path, files)?;
        } else if let Some(ext) = path.extension()
            && ext == "json"
        {
            files.push(path);
        }
    }

    Ok(())
}

pub fn validate_templates_dir(path: &Path) -> Result<(), IoError> {
    if !path.exists() || !path.is_dir() {
        return Err(IoError::InvalidTemplatesDir(format!(
            "{} is not a directory",
            path.display()
        )));
    }

    Ok(())
}

/// [`TemplateStore`] that writes each record to `<dir>/<uuid>.json`
#[derive(Debug, Clone)]
pub struct FileTemplateStore {
    dir: PathBuf,
}

impl FileTemplateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    pub fn load(&self, id: &str) -> Result<TemplateRecord, IoError> {
        let path = self.path_for(id);
        if !path.exists() {
            return Err(IoError::NotFound(path));
        }
        let content = fs::read_to_string(&path).map_err(IoError::Io)?;
        serde_json::from_str(&content).map_err(|source| IoError::InvalidDocument { path, source })
    }
}

impl TemplateStore for FileTemplateStore {
    fn save(&mut self, record: &TemplateRecord) -> anyhow::Result<TemplateId> {
        let id = Uuid::new_v4().to_string();
        let json = serde_json::to_string_pretty(record)?;
        write_file(&self.path_for(&id), &json)?;
        log::debug!("wrote template {id} to {}", self.dir.display());
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::BlockType;
    use crate::editing::EditorSession;
    use crate::save::{TemplateMeta, save_template};
    use crate::tests::{create_test_dir, create_test_file, sample_document};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_save_and_load_document() {
        let dir = create_test_dir();
        let path = dir.path().join("nested/welcome.json");
        let doc = sample_document();

        save_document(&path, &doc).unwrap();
        let loaded = load_document(&path).unwrap();

        assert_eq!(loaded, doc);
    }

    #[test]
    fn test_load_missing_document() {
        let dir = create_test_dir();
        let path = dir.path().join("missing.json");

        assert!(matches!(load_document(&path), Err(IoError::NotFound(p)) if p == path));
    }

    #[test]
    fn test_load_invalid_document() {
        let dir = create_test_dir();
        let path = create_test_file(&dir, "broken.json", "{\"blocks\": 7}");

        assert!(matches!(
            load_document(&path),
            Err(IoError::InvalidDocument { .. })
        ));
    }

    #[test]
    fn test_scan_documents_finds_json_only() {
        let dir = create_test_dir();
        create_test_file(&dir, "b.json", "{}");
        create_test_file(&dir, "a.json", "{}");
        create_test_file(&dir, "notes.txt", "ignore me");
        fs::create_dir_all(dir.path().join("drafts")).unwrap();
        create_test_file(&dir, "drafts/c.json", "{}");

        let files = scan_documents(dir.path()).unwrap();

        let names: Vec<_> = files
            .iter()
            .map(|f| f.strip_prefix(dir.path()).unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.json", "b.json", "drafts/c.json"]);
    }

    #[test]
    fn test_scan_invalid_directory() {
        let result = scan_documents(Path::new("/this/path/does/not/exist"));
        assert!(matches!(result, Err(IoError::InvalidTemplatesDir(_))));
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = create_test_dir();
        let mut store = FileTemplateStore::new(dir.path().join("store"));
        let mut session = EditorSession::new();
        session.add_block(BlockType::Heading, None).unwrap();
        session.add_block(BlockType::Footer, None).unwrap();
        let meta = TemplateMeta {
            name: "Welcome".to_string(),
            tags: vec!["onboarding".to_string()],
            ..TemplateMeta::default()
        };

        let id = save_template(&mut store, meta.clone(), session.document()).unwrap();
        let record = store.load(&id).unwrap();

        assert_eq!(record.meta, meta);
        assert_eq!(record.structure, session.document().structure());
    }
}
