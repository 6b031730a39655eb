//! File discovery, decoding and atomic writes.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::error::{ConversionError, ConversionResult};

/// How directories given as inputs are searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Discovery {
    /// Only `*.tex` directly inside the directory
    #[default]
    Flat,
    /// `*.tex` anywhere below the directory
    Recursive,
}

fn is_tex(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("tex"))
}

/// `.tex` files found under the inputs, plus directories that could not be listed.
#[derive(Debug, Default)]
pub struct Collected {
    pub files: Vec<PathBuf>,
    pub unreadable: Vec<(PathBuf, ConversionError)>,
}

/// Expand files and directories into a sorted list of `.tex` files.
///
/// Missing paths and non-`.tex` files are ignored. Symlinked directories
/// below an input are not entered. A directory that cannot be listed is
/// recorded in `unreadable` and the walk continues with its siblings.
pub fn collect_tex_files(inputs: &[PathBuf], discovery: Discovery) -> Collected {
    let mut collected = Collected::default();
    for input in inputs {
        if input.is_dir() {
            let mut found = Vec::new();
            walk_dir(input, discovery, &mut found, &mut collected.unreadable);
            found.sort();
            collected.files.extend(found);
        } else if input.is_file() && is_tex(input) {
            collected.files.push(input.clone());
        }
    }
    collected
}

fn walk_dir(
    dir: &Path,
    discovery: Discovery,
    out: &mut Vec<PathBuf>,
    unreadable: &mut Vec<(PathBuf, ConversionError)>,
) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            unreadable.push((dir.to_path_buf(), ConversionError::io(dir, e)));
            return;
        }
    };
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                unreadable.push((dir.to_path_buf(), ConversionError::io(dir, e)));
                continue;
            }
        };
        let path = entry.path();
        let is_link = entry.file_type().is_ok_and(|t| t.is_symlink());
        if path.is_dir() {
            if discovery == Discovery::Recursive && !is_link {
                walk_dir(&path, discovery, out, unreadable);
            }
        } else if is_tex(&path) {
            out.push(path);
        }
    }
}

/// Read a whole file as UTF-8.
pub fn read_document(path: &Path) -> ConversionResult<String> {
    let bytes = fs::read(path).map_err(|e| ConversionError::io(path, e))?;
    String::from_utf8(bytes).map_err(|_| ConversionError::encoding(path))
}

/// Replace `path` with `content` in one step.
///
/// The text goes to a temporary file next to the target which is then renamed
/// over it, so readers never observe a partially written document.
pub fn write_document(path: &Path, content: &str) -> ConversionResult<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir).map_err(|e| ConversionError::io(&dir, e))?;
    let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(|e| ConversionError::io(&dir, e))?;
    tmp.write_all(content.as_bytes())
        .map_err(|e| ConversionError::io(path, e))?;
    tmp.persist(path)
        .map_err(|e| ConversionError::io(path, e.error))?;
    Ok(())
}

/// Output location for `input` inside `dir`: `<dir>/<stem><suffix>`.
pub fn output_path(input: &Path, dir: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    dir.join(format!("{}{}", stem, suffix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_flat_and_recursive() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        fs::create_dir(root.join("sub")).unwrap();
        fs::write(root.join("b.tex"), "b").unwrap();
        fs::write(root.join("a.TEX"), "a").unwrap();
        fs::write(root.join("notes.txt"), "n").unwrap();
        fs::write(root.join("sub/c.tex"), "c").unwrap();

        let flat = collect_tex_files(&[root.to_path_buf()], Discovery::Flat).files;
        assert_eq!(flat, vec![root.join("a.TEX"), root.join("b.tex")]);

        let deep = collect_tex_files(&[root.to_path_buf()], Discovery::Recursive).files;
        assert_eq!(deep.len(), 3);
        assert!(deep.contains(&root.join("sub/c.tex")));
    }

    #[test]
    fn explicit_non_tex_file_is_ignored() {
        let tmp = tempfile::tempdir().unwrap();
        let txt = tmp.path().join("x.txt");
        fs::write(&txt, "x").unwrap();
        let collected = collect_tex_files(&[txt], Discovery::Flat);
        assert!(collected.files.is_empty());
        assert!(collected.unreadable.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_directories_are_not_entered() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        fs::write(root.join("a.tex"), "\\section{Intro}").unwrap();
        fs::create_dir(root.join("sub")).unwrap();
        fs::write(root.join("sub/b.tex"), "b").unwrap();
        std::os::unix::fs::symlink(root, root.join("loop")).unwrap();
        std::os::unix::fs::symlink(root.join("sub"), root.join("sub/back")).unwrap();

        let collected = collect_tex_files(&[root.to_path_buf()], Discovery::Recursive);
        assert_eq!(collected.files, vec![root.join("a.tex"), root.join("sub/b.tex")]);
        assert!(collected.unreadable.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_subdirectory_does_not_stop_discovery() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        fs::write(root.join("a.tex"), "a").unwrap();
        let locked = root.join("locked");
        fs::create_dir(&locked).unwrap();
        fs::write(locked.join("hidden.tex"), "h").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        let listable = fs::read_dir(&locked).is_ok();
        let collected = collect_tex_files(&[root.to_path_buf()], Discovery::Recursive);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert!(collected.files.contains(&root.join("a.tex")));
        if !listable {
            // Permission bits are not enforced for root.
            assert_eq!(collected.unreadable.len(), 1);
            assert_eq!(collected.unreadable[0].0, locked);
        }
    }

    #[test]
    fn read_rejects_invalid_utf8() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("bad.tex");
        fs::write(&path, [0xff, 0xfe, b'a']).unwrap();
        assert!(matches!(
            read_document(&path),
            Err(ConversionError::Encoding { .. })
        ));
    }

    #[test]
    fn write_replaces_existing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("out/ch.tex");
        write_document(&path, "first").unwrap();
        write_document(&path, "second ā").unwrap();
        assert_eq!(read_document(&path).unwrap(), "second ā");
        assert_eq!(fs::read_dir(tmp.path().join("out")).unwrap().count(), 1);
    }

    #[test]
    fn output_path_uses_stem_and_suffix() {
        let out = output_path(Path::new("src/chapter_01.tex"), Path::new("build"), ".epub.tex");
        assert_eq!(out, PathBuf::from("build/chapter_01.epub.tex"));
    }
}
