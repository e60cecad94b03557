use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Which files the browser offers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFilter {
    Executables,
    All,
}

impl FileFilter {
    pub fn toggled(self) -> Self {
        match self {
            FileFilter::Executables => FileFilter::All,
            FileFilter::All => FileFilter::Executables,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FileFilter::Executables => "Executable Files (.exe)",
            FileFilter::All => "All Files (*.*)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    Parent,
    Directory,
    File,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub path: PathBuf,
    pub kind: EntryKind,
}

/// Single-directory file chooser state
pub struct FileBrowser {
    dir: PathBuf,
    filter: FileFilter,
    entries: Vec<Entry>,
}

impl FileBrowser {
    /// Opens at `start`, or at the working directory when there is none
    pub fn open(start: Option<PathBuf>) -> Result<Self> {
        let dir = match start {
            Some(dir) => dir,
            None => std::env::current_dir().context("Failed to read the working directory")?,
        };
        let mut browser = Self {
            dir,
            filter: FileFilter::Executables,
            entries: Vec::new(),
        };
        browser.refresh()?;
        Ok(browser)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn filter(&self) -> FileFilter {
        self.filter
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn toggle_filter(&mut self) -> Result<()> {
        self.filter = self.filter.toggled();
        self.refresh()
    }

    /// Moves into a directory entry. Returns the chosen path for a file entry.
    pub fn activate(&mut self, index: usize) -> Result<Option<PathBuf>> {
        let Some(entry) = self.entries.get(index).cloned() else {
            return Ok(None);
        };
        match entry.kind {
            EntryKind::File => Ok(Some(entry.path)),
            EntryKind::Parent | EntryKind::Directory => {
                let previous = std::mem::replace(&mut self.dir, entry.path);
                if let Err(e) = self.refresh() {
                    self.dir = previous;
                    return Err(e);
                }
                Ok(None)
            }
        }
    }

    fn refresh(&mut self) -> Result<()> {
        let mut directories = Vec::new();
        let mut files = Vec::new();

        let listing = std::fs::read_dir(&self.dir)
            .with_context(|| format!("Failed to list {}", self.dir.display()))?;
        for item in listing.flatten() {
            let path = item.path();
            let name = item.file_name().to_string_lossy().into_owned();
            if path.is_dir() {
                directories.push(Entry {
                    name,
                    path,
                    kind: EntryKind::Directory,
                });
            } else if self.filter == FileFilter::All || is_executable(&path) {
                files.push(Entry {
                    name,
                    path,
                    kind: EntryKind::File,
                });
            }
        }
        directories.sort_by_key(|entry| entry.name.to_lowercase());
        files.sort_by_key(|entry| entry.name.to_lowercase());

        self.entries.clear();
        if let Some(parent) = self.dir.parent() {
            self.entries.push(Entry {
                name: "..".to_string(),
                path: parent.to_path_buf(),
                kind: EntryKind::Parent,
            });
        }
        self.entries.extend(directories);
        self.entries.extend(files);
        Ok(())
    }
}

fn is_executable(path: &Path) -> bool {
    let has_exe_extension = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("exe"));
    has_exe_extension || has_execute_bit(path)
}

#[cfg(unix)]
fn has_execute_bit(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path).is_ok_and(|meta| meta.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn has_execute_bit(_path: &Path) -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("bin")).unwrap();
        std::fs::write(dir.path().join("Fsi.EXE"), b"").unwrap();
        std::fs::write(dir.path().join("readme.txt"), b"").unwrap();
        dir
    }

    fn names(browser: &FileBrowser) -> Vec<&str> {
        browser.entries().iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn lists_parent_directories_then_executables() {
        let dir = fixture();
        let browser = FileBrowser::open(Some(dir.path().to_path_buf())).unwrap();

        assert_eq!(browser.filter(), FileFilter::Executables);
        assert_eq!(names(&browser), vec!["..", "bin", "Fsi.EXE"]);
    }

    #[test]
    fn all_files_filter_shows_everything() {
        let dir = fixture();
        let mut browser = FileBrowser::open(Some(dir.path().to_path_buf())).unwrap();
        browser.toggle_filter().unwrap();

        assert_eq!(browser.filter(), FileFilter::All);
        assert_eq!(names(&browser), vec!["..", "bin", "Fsi.EXE", "readme.txt"]);
    }

    #[test]
    fn activating_entries_navigates_or_chooses() {
        let dir = fixture();
        let mut browser = FileBrowser::open(Some(dir.path().to_path_buf())).unwrap();

        assert_eq!(browser.activate(2).unwrap(), Some(dir.path().join("Fsi.EXE")));

        assert_eq!(browser.activate(1).unwrap(), None);
        assert_eq!(browser.dir(), dir.path().join("bin"));
        assert_eq!(names(&browser), vec![".."]);

        browser.activate(0).unwrap();
        assert_eq!(browser.dir(), dir.path());
        assert_eq!(browser.activate(99).unwrap(), None);
    }

    #[test]
    fn unlistable_directory_keeps_the_current_listing() {
        let dir = fixture();
        let mut browser = FileBrowser::open(Some(dir.path().to_path_buf())).unwrap();
        std::fs::remove_dir(dir.path().join("bin")).unwrap();

        assert!(browser.activate(1).is_err());
        assert_eq!(browser.dir(), dir.path());
        assert_eq!(names(&browser), vec!["..", "bin", "Fsi.EXE"]);
    }

    #[cfg(unix)]
    #[test]
    fn execute_bit_counts_as_executable() {
        use std::os::unix::fs::PermissionsExt;
        let dir = TempDir::new().unwrap();
        let script = dir.path().join("fsharpi");
        std::fs::write(&script, b"#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let browser = FileBrowser::open(Some(dir.path().to_path_buf())).unwrap();
        assert_eq!(names(&browser), vec!["..", "fsharpi"]);
    }
}
