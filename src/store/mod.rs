//! Filesystem-backed storage for projects, their markdown files and their images.
//!
//! Layout on disk:
//! ```text
//! <root>/<project>/<markdown>
//! <root>/<project>/img/<image>
//! ```

mod error;

pub use error::StoreError;

use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::prelude::*;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Clone)]
pub struct Store {
    root: PathBuf,
}

impl Store {
    /// Opens a store rooted at `root`, creating the directory if it does not exist yet.
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Store { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lists project names, optionally keeping only those containing `query`.
    pub fn projects(&self, query: Option<&str>) -> StoreResult<Vec<String>> {
        let query = query.filter(|q| !q.is_empty());
        let mut projects = list_entries(&self.root, |path| path.is_dir())?;
        if let Some(query) = query {
            projects.retain(|name| name.contains(query));
        }
        Ok(projects)
    }

    pub fn create_project(&self, project: &str) -> StoreResult<()> {
        let dir = self.project_dir(project)?;
        if dir.exists() {
            return Err(StoreError::AlreadyExists(format!("Project {project}")));
        }

        fs::create_dir_all(dir.join(IMAGE_DIRECTORY))?;
        info!("Created project {project}.");
        Ok(())
    }

    pub fn delete_project(&self, project: &str) -> StoreResult<()> {
        let dir = self.existing_project(project)?;
        fs::remove_dir_all(dir)?;
        info!("Deleted project {project}.");
        Ok(())
    }

    /// Lists the markdown files of a project (every regular file directly inside it).
    pub fn markdowns(&self, project: &str) -> StoreResult<Vec<String>> {
        let dir = self.existing_project(project)?;
        list_entries(&dir, |path| path.is_file())
    }

    pub fn read_markdown(&self, project: &str, id: &str) -> StoreResult<String> {
        let path = self.existing_project(project)?.join(validate_name(id)?);
        fs::read_to_string(&path).map_err(not_found(|| format!("Markdown {id} in project {project}")))
    }

    /// Creates a new, empty markdown file. Fails if one with the same name already exists.
    pub fn create_markdown(&self, project: &str, id: &str) -> StoreResult<()> {
        let path = self.existing_project(project)?.join(validate_name(id)?);
        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|err| match err.kind() {
                ErrorKind::AlreadyExists => StoreError::AlreadyExists(format!("Markdown {id} in project {project}")),
                _ => StoreError::Io(err),
            })?;
        Ok(())
    }

    /// Creates or overwrites a markdown file.
    pub fn write_markdown(&self, project: &str, id: &str, markdown: &str) -> StoreResult<()> {
        let path = self.existing_project(project)?.join(validate_name(id)?);
        fs::write(path, markdown)?;
        debug!("Wrote markdown {id} in project {project} ({} bytes).", markdown.len());
        Ok(())
    }

    pub fn delete_markdown(&self, project: &str, id: &str) -> StoreResult<()> {
        let path = self.existing_project(project)?.join(validate_name(id)?);
        fs::remove_file(path).map_err(not_found(|| format!("Markdown {id} in project {project}")))
    }

    pub fn images(&self, project: &str) -> StoreResult<Vec<String>> {
        let dir = self.image_dir(project)?;
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        list_entries(&dir, |path| path.is_file())
    }

    pub fn read_image(&self, project: &str, name: &str) -> StoreResult<Vec<u8>> {
        let path = self.image_dir(project)?.join(validate_name(name)?);
        fs::read(path).map_err(not_found(|| format!("Image {name} in project {project}")))
    }

    pub fn write_image(&self, project: &str, name: &str, bytes: &[u8]) -> StoreResult<()> {
        let dir = self.image_dir(project)?;
        let path = dir.join(validate_name(name)?);
        fs::create_dir_all(&dir)?;
        fs::write(path, bytes)?;
        info!("Stored image {name} in project {project} ({} bytes).", bytes.len());
        Ok(())
    }

    pub fn delete_image(&self, project: &str, name: &str) -> StoreResult<()> {
        let path = self.image_dir(project)?.join(validate_name(name)?);
        fs::remove_file(path).map_err(not_found(|| format!("Image {name} in project {project}")))
    }

    fn project_dir(&self, project: &str) -> StoreResult<PathBuf> {
        Ok(self.root.join(validate_name(project)?))
    }

    fn existing_project(&self, project: &str) -> StoreResult<PathBuf> {
        let dir = self.project_dir(project)?;
        match dir.is_dir() {
            true => Ok(dir),
            false => Err(StoreError::NotFound(format!("Project {project}"))),
        }
    }

    fn image_dir(&self, project: &str) -> StoreResult<PathBuf> {
        Ok(self.existing_project(project)?.join(IMAGE_DIRECTORY))
    }
}

/// Names must be a single plain path component so they can never escape the store root.
fn validate_name(name: &str) -> StoreResult<&str> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(|c: char| matches!(c, '/' | '\\' | '\0'));

    match invalid {
        true => Err(StoreError::InvalidName(name.to_owned())),
        false => Ok(name),
    }
}

/// Lists the names of entries in `dir` accepted by `filter`, sorted.
fn list_entries(dir: &Path, filter: impl Fn(&Path) -> bool) -> StoreResult<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !filter(&path) {
            continue;
        }
        // Non-UTF-8 names can't be addressed through the API, so they're skipped.
        match path.file_name().and_then(|name| name.to_str()) {
            Some(name) => names.push(name.to_owned()),
            None => warn!("Skipping entry with a non UTF-8 name: {path:?}"),
        }
    }
    names.sort_unstable();
    Ok(names)
}

fn not_found(what: impl FnOnce() -> String) -> impl FnOnce(std::io::Error) -> StoreError {
    move |err| match err.kind() {
        ErrorKind::NotFound => StoreError::NotFound(what()),
        _ => StoreError::Io(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, Store) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path().join("data")).unwrap();
        (dir, store)
    }

    #[test]
    fn project_lifecycle() {
        let (_dir, store) = store();

        store.create_project("beta").unwrap();
        store.create_project("alpha").unwrap();
        assert!(store.root().join("alpha").join(IMAGE_DIRECTORY).is_dir());

        assert_eq!(store.projects(None).unwrap(), vec!["alpha", "beta"]);
        assert_eq!(store.projects(Some("ph")).unwrap(), vec!["alpha"]);
        assert_eq!(store.projects(Some("")).unwrap(), vec!["alpha", "beta"]);

        assert!(matches!(
            store.create_project("alpha"),
            Err(StoreError::AlreadyExists(_))
        ));

        store.delete_project("alpha").unwrap();
        assert_eq!(store.projects(None).unwrap(), vec!["beta"]);
        assert!(matches!(
            store.delete_project("alpha"),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn markdown_crud() {
        let (_dir, store) = store();
        store.create_project("notes").unwrap();

        store.create_markdown("notes", "b.md").unwrap();
        assert!(matches!(
            store.create_markdown("notes", "b.md"),
            Err(StoreError::AlreadyExists(_))
        ));
        store.write_markdown("notes", "a.md", "## Intro").unwrap();
        // The image directory is not a markdown file.
        assert_eq!(store.markdowns("notes").unwrap(), vec!["a.md", "b.md"]);
        assert_eq!(store.read_markdown("notes", "a.md").unwrap(), "## Intro");

        store.write_markdown("notes", "a.md", "## Usage").unwrap();
        assert_eq!(store.read_markdown("notes", "a.md").unwrap(), "## Usage");

        store.delete_markdown("notes", "a.md").unwrap();
        assert!(matches!(
            store.read_markdown("notes", "a.md"),
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            store.markdowns("missing"),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn image_crud() {
        let (_dir, store) = store();
        store.create_project("notes").unwrap();
        assert!(store.images("notes").unwrap().is_empty());

        store.write_image("notes", "cat.png", &[0x89, b'P', b'N', b'G']).unwrap();
        assert_eq!(store.images("notes").unwrap(), vec!["cat.png"]);
        assert_eq!(store.read_image("notes", "cat.png").unwrap(), vec![0x89, b'P', b'N', b'G']);

        store.delete_image("notes", "cat.png").unwrap();
        assert!(store.images("notes").unwrap().is_empty());
        assert!(matches!(
            store.delete_image("notes", "cat.png"),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn rejects_path_traversal() {
        let (_dir, store) = store();
        store.create_project("notes").unwrap();

        for name in ["", ".", "..", "../etc", "a/b", "a\\b"] {
            assert!(matches!(
                store.read_markdown("notes", name),
                Err(StoreError::InvalidName(_))
            ));
        }
        assert!(matches!(
            store.create_project(".."),
            Err(StoreError::InvalidName(_))
        ));
    }
}
