//! Source file discovery for a project directory.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::workspace::{FileId, Workspace};

/// Recursively discover all `.rs` files under `root`.
///
/// Paths are joined onto `root` and sorted for determinism. Hidden
/// entries and `target` directories are skipped.
pub fn discover_rust_files(root: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    discover_recursive(root, &mut files)?;
    files.sort();
    Ok(files)
}

fn discover_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with('.') {
            continue;
        }
        if path.is_dir() {
            if name != "target" {
                discover_recursive(&path, files)?;
            }
        } else if path.extension().and_then(|e| e.to_str()) == Some("rs") {
            files.push(path);
        }
    }
    Ok(())
}

/// Read every `.rs` file under `root` into `workspace`.
pub fn load_dir(workspace: &Workspace, root: &Path) -> std::io::Result<Vec<FileId>> {
    let mut ids = Vec::new();
    for path in discover_rust_files(root)? {
        let text = std::fs::read_to_string(&path)?;
        ids.push(workspace.set_file(path, text));
    }
    debug!(root = %root.display(), files = ids.len(), "loaded project files");
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_rust_files_and_skips_hidden_and_target() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("src/nested")).unwrap();
        std::fs::create_dir_all(root.join("target/debug")).unwrap();
        std::fs::create_dir_all(root.join(".git")).unwrap();
        std::fs::write(root.join("src/lib.rs"), "struct A { x: u8 }").unwrap();
        std::fs::write(root.join("src/nested/b.rs"), "").unwrap();
        std::fs::write(root.join("src/notes.txt"), "").unwrap();
        std::fs::write(root.join("target/debug/build.rs"), "").unwrap();
        std::fs::write(root.join(".git/hook.rs"), "").unwrap();

        let files = discover_rust_files(root).unwrap();
        let relative: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            relative,
            vec![PathBuf::from("src/lib.rs"), PathBuf::from("src/nested/b.rs")]
        );

        let ws = Workspace::new();
        let ids = load_dir(&ws, root).unwrap();
        assert_eq!(ids.len(), 2);
        let snapshot = ws.snapshot();
        let lib = snapshot.file_id(&root.join("src/lib.rs")).unwrap();
        assert_eq!(snapshot.file(lib).unwrap().text(), "struct A { x: u8 }");
    }
}
