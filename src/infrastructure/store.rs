//! JSON file persistence for menus and page documents
//!
//! Layout below the data directory:
//! - `menu.json`: flat array of menu rows
//! - `pages/<id>.json`: one content document per page

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, instrument};

use crate::domain::{MenuRecord, PageId};
use crate::infrastructure::traits::{ContentStore, FileSystem, MenuStore};

const MENU_FILE: &str = "menu.json";
const PAGES_DIR: &str = "pages";

/// File-backed store writing pretty-printed JSON.
pub struct JsonFileStore {
    fs: Arc<dyn FileSystem>,
    data_dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(fs: Arc<dyn FileSystem>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn menu_path(&self) -> PathBuf {
        self.data_dir.join(MENU_FILE)
    }

    pub fn pages_dir(&self) -> PathBuf {
        self.data_dir.join(PAGES_DIR)
    }

    pub fn page_path(&self, page: PageId) -> PathBuf {
        self.pages_dir().join(format!("{page}.json"))
    }

    /// Write to a sibling temp file, then rename over the target.
    fn write_atomic(&self, path: &Path, content: &str) -> io::Result<()> {
        self.fs.ensure_parent(path)?;
        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        self.fs.write(&tmp, content)?;
        if let Err(e) = self.fs.rename(&tmp, path) {
            let _ = self.fs.remove_file(&tmp);
            return Err(e);
        }
        Ok(())
    }

    fn read_json<T: serde::de::DeserializeOwned>(&self, path: &Path) -> io::Result<T> {
        let content = self.fs.read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| invalid_data(path, e))
    }
}

fn invalid_data(path: &Path, e: serde_json::Error) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidData,
        format!("{}: {}", path.display(), e),
    )
}

fn to_json<T: serde::Serialize + ?Sized>(path: &Path, value: &T) -> io::Result<String> {
    let mut json = serde_json::to_string_pretty(value).map_err(|e| invalid_data(path, e))?;
    json.push('\n');
    Ok(json)
}

impl ContentStore for JsonFileStore {
    #[instrument(level = "debug", skip(self))]
    fn load(&self, page: PageId) -> io::Result<Option<Value>> {
        let path = self.page_path(page);
        if !self.fs.is_file(&path) {
            return Ok(None);
        }
        self.read_json(&path).map(Some)
    }

    #[instrument(level = "debug", skip(self, document))]
    fn save(&self, page: PageId, document: &Value) -> io::Result<()> {
        let path = self.page_path(page);
        self.write_atomic(&path, &to_json(&path, document)?)?;
        debug!("saved {}", path.display());
        Ok(())
    }

    fn pages(&self) -> io::Result<Vec<PageId>> {
        let dir = self.pages_dir();
        if !self.fs.exists(&dir) {
            return Ok(Vec::new());
        }

        let mut pages = Vec::new();
        for entry in walkdir::WalkDir::new(&dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if path.extension().map(|ext| ext == "json").unwrap_or(false) {
                // Skip files whose stem is not a page id (e.g. leftovers from editors)
                if let Some(page) = path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .and_then(|s| s.parse::<PageId>().ok())
                {
                    pages.push(page);
                }
            }
        }
        pages.sort();
        Ok(pages)
    }
}

impl MenuStore for JsonFileStore {
    #[instrument(level = "debug", skip(self))]
    fn load_all(&self) -> io::Result<Vec<MenuRecord>> {
        let path = self.menu_path();
        if !self.fs.is_file(&path) {
            return Ok(Vec::new());
        }
        self.read_json(&path)
    }

    #[instrument(level = "debug", skip(self, records), fields(count = records.len()))]
    fn save_all(&self, records: &[MenuRecord]) -> io::Result<()> {
        let path = self.menu_path();
        self.write_atomic(&path, &to_json(&path, records)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NodeId;
    use crate::infrastructure::traits::RealFileSystem;
    use serde_json::json;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> JsonFileStore {
        JsonFileStore::new(Arc::new(RealFileSystem), dir.path())
    }

    #[test]
    fn given_missing_files_when_loading_then_returns_empty() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);

        assert_eq!(ContentStore::load(&store, PageId(1)).unwrap(), None);
        assert!(store.load_all().unwrap().is_empty());
        assert!(store.pages().unwrap().is_empty());
    }

    #[test]
    fn given_saved_document_when_loading_then_returns_it_and_leaves_no_temp_file() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);
        let doc = json!({"rows": [{"columns": [{"width": 12, "elements": []}]}]});

        store.save(PageId(4), &doc).unwrap();

        assert_eq!(ContentStore::load(&store, PageId(4)).unwrap(), Some(doc));
        assert!(!temp.path().join("pages/4.json.tmp").exists());
    }

    #[test]
    fn given_page_files_when_listing_then_returns_sorted_ids_and_skips_others() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);
        for page in [10, 2, 7] {
            store.save(PageId(page), &json!({"rows": []})).unwrap();
        }
        std::fs::write(temp.path().join("pages/notes.json"), "{}").unwrap();
        std::fs::write(temp.path().join("pages/3.txt"), "").unwrap();

        assert_eq!(store.pages().unwrap(), vec![PageId(2), PageId(7), PageId(10)]);
    }

    #[test]
    fn given_corrupt_json_when_loading_then_invalid_data_error() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);
        std::fs::create_dir_all(temp.path().join("pages")).unwrap();
        std::fs::write(temp.path().join("pages/1.json"), "{ not json").unwrap();

        let err = ContentStore::load(&store, PageId(1)).unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn given_menu_rows_when_saving_then_persists_flat_table() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);
        let rows = vec![MenuRecord {
            id: NodeId(1),
            title: "Beranda".into(),
            url: Some("/".into()),
            page_id: None,
            parent_id: None,
            order: 0,
            is_published: true,
        }];

        store.save_all(&rows).unwrap();

        assert_eq!(store.load_all().unwrap(), rows);
        let raw = std::fs::read_to_string(temp.path().join("menu.json")).unwrap();
        assert!(raw.contains("\"is_published\": true"));
        assert!(raw.contains("\"parent_id\": null"));
    }
}
