// Copyright 2026 Oxide Computer Company

//! Reading and writing trees on disk.

use anyhow::Result;
use atomicwrites::{AtomicFile, OverwriteBehavior};
use camino::Utf8Path;
use camino_tempfile::Utf8TempDir;
use std::{fs, io::Write};
use synth_merge::{FileTree, PathPattern};
use synth_merge_fs::{ReadTreeError, TreeReader, TreeWriter, read_tree};

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

/// Writes content to a file atomically, creating parent directories.
fn write_file(
    path: impl AsRef<Utf8Path>,
    content: impl AsRef<[u8]>,
) -> std::io::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    AtomicFile::new(path, OverwriteBehavior::AllowOverwrite)
        .write(|f| f.write_all(content.as_ref()))
        .map_err(|e| e.into())
}

/// Creates a temporary directory populated with `files`.
fn setup_dir(files: &[(&str, &str)]) -> Result<Utf8TempDir> {
    let temp = Utf8TempDir::with_prefix("synth-merge-fs-")?;
    for (path, content) in files {
        write_file(temp.path().join(path), content)?;
    }
    Ok(temp)
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

#[test]
fn test_read_tree() -> Result<()> {
    let temp = setup_dir(&[
        ("Gemfile", "source \"https://rubygems.org\"\n"),
        ("lib/google/cloud/network_management.rb", "# generated\n"),
        ("lib/google/cloud/network_management/version.rb", "VERSION\n"),
    ])?;
    fs::create_dir_all(temp.path().join("empty/dir"))?;

    let tree = read_tree(temp.path())?;
    let paths: Vec<_> = tree.paths().map(Utf8Path::as_str).collect();
    assert_eq!(
        paths,
        [
            "Gemfile",
            "lib/google/cloud/network_management/version.rb",
            "lib/google/cloud/network_management.rb",
        ],
        "only regular files, relative to the root"
    );
    assert_eq!(
        tree.get("lib/google/cloud/network_management.rb"),
        Some(&b"# generated\n"[..])
    );

    Ok(())
}

#[test]
fn test_read_skips_nested_dirs_and_git() -> Result<()> {
    let temp = setup_dir(&[
        ("CHANGELOG.md", "hand\n"),
        (".git/HEAD", "ref: refs/heads/main\n"),
        ("gen/lib/a.rb", "generated\n"),
        ("out/CHANGELOG.md", "previous run\n"),
        ("outside/keep.rb", "kept\n"),
    ])?;
    let root = temp.path();

    let tree = TreeReader::new(root)
        .skip_dir(root.join("out"))
        .skip_dir(root.join("gen/../gen"))
        .skip_dir(root.join("missing"))
        .read()?;
    let paths: Vec<_> = tree.paths().map(Utf8Path::as_str).collect();
    assert_eq!(paths, ["CHANGELOG.md", "outside/keep.rb"]);

    // Skipping the root itself, or a directory elsewhere, does nothing.
    let other = setup_dir(&[("x.rb", "x\n")])?;
    let tree = TreeReader::new(root.join("gen"))
        .skip_dir(root.join("gen"))
        .skip_dir(other.path())
        .read()?;
    let paths: Vec<_> = tree.paths().map(Utf8Path::as_str).collect();
    assert_eq!(paths, ["lib/a.rb"]);

    Ok(())
}

#[test]
fn test_read_tree_binary_contents() -> Result<()> {
    let temp = setup_dir(&[])?;
    let bytes = [0u8, 159, 146, 150, 255];
    write_file(temp.path().join("logo.bin"), bytes)?;

    let tree = read_tree(temp.path())?;
    assert_eq!(tree.get("logo.bin"), Some(&bytes[..]));

    Ok(())
}

#[test]
fn test_read_tree_exclude() -> Result<()> {
    let temp = setup_dir(&[
        (".git/HEAD", "ref: refs/heads/main\n"),
        (".git/objects/ab/cdef", "blob"),
        ("lib/.DS_Store", "junk"),
        ("lib/client.rb", "# client\n"),
    ])?;

    let tree = TreeReader::new(temp.path())
        .exclude([
            PathPattern::new(".git/**")?,
            PathPattern::new(".DS_Store")?,
        ])
        .read()?;
    let paths: Vec<_> = tree.paths().map(Utf8Path::as_str).collect();
    assert_eq!(paths, ["lib/client.rb"]);

    Ok(())
}

#[test]
fn test_read_tree_missing_root() -> Result<()> {
    let temp = setup_dir(&[])?;
    let result = read_tree(temp.path().join("nonexistent"));
    assert!(
        matches!(result, Err(ReadTreeError::RootNotFound { .. })),
        "should fail with RootNotFound"
    );
    Ok(())
}

#[test]
fn test_read_tree_root_is_file() -> Result<()> {
    let temp = setup_dir(&[("a.txt", "AAA")])?;
    let result = read_tree(temp.path().join("a.txt"));
    assert!(
        matches!(result, Err(ReadTreeError::NotADirectory { .. })),
        "should fail with NotADirectory"
    );
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_read_tree_follows_symlinks() -> Result<()> {
    let temp = setup_dir(&[("shared/LICENSE.md", "license text\n")])?;
    let root = temp.path().join("package");
    fs::create_dir_all(&root)?;
    std::os::unix::fs::symlink(
        temp.path().join("shared/LICENSE.md"),
        root.join("LICENSE.md"),
    )?;

    let tree = read_tree(&root)?;
    assert_eq!(tree.get("LICENSE.md"), Some(&b"license text\n"[..]));

    Ok(())
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

#[test]
fn test_write_tree() -> Result<()> {
    let temp = setup_dir(&[("out/stale.txt", "left alone")])?;
    let output_dir = temp.path().join("out");

    let tree = FileTree::from_entries([
        ("a.txt", "AAA"),
        ("lib/google/cloud/network_management.rb", "# merged\n"),
    ])?;
    let written = TreeWriter::new(&output_dir).write(&tree)?;

    assert_eq!(
        written,
        [
            output_dir.join("a.txt"),
            output_dir.join("lib/google/cloud/network_management.rb"),
        ]
    );
    assert_eq!(fs::read_to_string(output_dir.join("a.txt"))?, "AAA");
    assert_eq!(
        fs::read_to_string(
            output_dir.join("lib/google/cloud/network_management.rb")
        )?,
        "# merged\n"
    );
    assert_eq!(
        fs::read_to_string(output_dir.join("stale.txt"))?,
        "left alone",
        "files outside the tree are not touched"
    );

    Ok(())
}

#[test]
fn test_write_tree_overwrites() -> Result<()> {
    let temp = setup_dir(&[("a.txt", "old contents that are longer")])?;

    let tree = FileTree::from_entries([("a.txt", "new")])?;
    TreeWriter::new(temp.path()).write(&tree)?;
    assert_eq!(fs::read_to_string(temp.path().join("a.txt"))?, "new");

    Ok(())
}

#[test]
fn test_write_tree_dry_run() -> Result<()> {
    let temp = setup_dir(&[])?;
    let output_dir = temp.path().join("out");

    let tree = FileTree::from_entries([("a.txt", "AAA")])?;
    let written = TreeWriter::new(&output_dir).dry_run(true).write(&tree)?;

    assert_eq!(written, [output_dir.join("a.txt")]);
    assert!(!output_dir.exists(), "dry run should not create anything");

    Ok(())
}

#[test]
fn test_write_then_read_roundtrip() -> Result<()> {
    let temp = setup_dir(&[])?;
    let tree = FileTree::from_entries([
        ("README.md", "# Network Management\n"),
        ("lib/a/b/c.rb", "# deep\n"),
    ])?;
    TreeWriter::new(temp.path()).write(&tree)?;
    assert_eq!(read_tree(temp.path())?, tree);

    Ok(())
}
