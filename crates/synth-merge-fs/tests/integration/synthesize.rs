// Copyright 2026 Oxide Computer Company

//! Full synthesis runs: configuration, read, merge, write.

use anyhow::Result;
use camino::Utf8Path;
use camino_tempfile::Utf8TempDir;
use std::fs;
use synth_merge::{FileTree, MergeEngine, MergeError, MergeResult};
use synth_merge_fs::{ConfigError, SynthConfig, TreeReader, TreeWriter};

const SYNTH_TOML: &str = r#"
[library]
api = "networkmanagement"
version = "v1"
proto-path = "google/cloud/networkmanagement/v1"

[library.generator-args]
ruby-cloud-gem-name = "google-cloud-network_management"
ruby-cloud-title = "Network Management"
ruby-cloud-wrapper-of = "v1:0.0"

[merge]
preset = "ruby"
exclude = ["synth.toml"]

[[merge.rule]]
pattern = "README.md"
strategy = "replace-marked-block"
begin = "<!--BEGIN-->"
end = "<!--END-->"
"#;

fn write_tree(root: &Utf8Path, files: &[(&str, &str)]) -> Result<()> {
    TreeWriter::new(root).write(&FileTree::from_entries(files.iter().copied())?)?;
    Ok(())
}

/// Lays out `generated/` and `overrides/` the way a synthesis run sees
/// them.
fn setup() -> Result<Utf8TempDir> {
    let temp = Utf8TempDir::with_prefix("synth-merge-fs-synth-")?;
    write_tree(
        &temp.path().join("generated"),
        &[
            ("CHANGELOG.md", "# Release History\n\n"),
            (
                "README.md",
                "# Network Management\n<!--BEGIN-->\ngenerated intro\n<!--END-->\n## Usage\n",
            ),
            (
                "lib/google/cloud/network_management/version.rb",
                "module NetworkManagement\n  VERSION = \"0.0.1\"\nend\n",
            ),
            ("lib/google/cloud/network_management.rb", "# regenerated\n"),
        ],
    )?;
    write_tree(
        &temp.path().join("overrides"),
        &[
            ("CHANGELOG.md", "# Release History\n\n### 1.0.0\n"),
            ("README.md", "\nhand-written intro\n"),
            (
                "lib/google/cloud/network_management/version.rb",
                "module NetworkManagement\n  VERSION = \"1.0.0\"\nend\n",
            ),
            ("lib/google/cloud/network_management.rb", "# stale\n"),
            ("synth.toml", SYNTH_TOML),
            (".yardopts", "--markup markdown\n"),
        ],
    )?;
    Ok(temp)
}

/// Runs one synthesis pass, the way the CLI does.
fn synthesize(
    root: &Utf8Path,
    generated: &str,
    output: &str,
) -> Result<MergeResult> {
    let config = SynthConfig::load(root.join("overrides/synth.toml"))?;
    let exclude = config.exclude_patterns()?;
    let generated =
        TreeReader::new(root.join(generated)).exclude(exclude.clone()).read()?;
    let overrides =
        TreeReader::new(root.join("overrides")).exclude(exclude).read()?;
    let result = MergeEngine::new(config.rule_table()?)
        .merge(&generated, &overrides)?;
    TreeWriter::new(root.join(output)).write(result.tree())?;
    Ok(result)
}

#[test]
fn test_synthesize_library() -> Result<()> {
    let temp = setup()?;
    let root = temp.path();

    let result = synthesize(root, "generated", "package")?;
    assert_eq!(result.decisions().len(), 5, "synth.toml is excluded");

    let read = |path: &str| fs::read_to_string(root.join("package").join(path));
    assert_eq!(read("CHANGELOG.md")?, "# Release History\n\n### 1.0.0\n");
    assert_eq!(
        read("README.md")?,
        "# Network Management\n<!--BEGIN-->\nhand-written intro\n<!--END-->\n## Usage\n"
    );
    assert_eq!(
        read("lib/google/cloud/network_management/version.rb")?,
        "module NetworkManagement\n  VERSION = \"1.0.0\"\nend\n"
    );
    assert_eq!(
        read("lib/google/cloud/network_management.rb")?,
        "# regenerated\n"
    );
    assert_eq!(read(".yardopts")?, "--markup markdown\n");
    assert!(!root.join("package/synth.toml").exists());

    Ok(())
}

#[test]
fn test_synthesize_is_idempotent() -> Result<()> {
    let temp = setup()?;
    let root = temp.path();

    let first = synthesize(root, "generated", "package")?;
    // Feed the output back in as the generated tree.
    let second = synthesize(root, "package", "package-again")?;
    assert_eq!(first.tree(), second.tree());

    let package = TreeReader::new(root.join("package")).read()?;
    let again = TreeReader::new(root.join("package-again")).read()?;
    assert_eq!(package, again);

    Ok(())
}

#[test]
fn test_synthesize_conflict_writes_nothing() -> Result<()> {
    let temp = setup()?;
    let root = temp.path();
    // Regenerated README without the markers.
    fs::write(root.join("generated/README.md"), "# Network Management\n")?;

    let error = synthesize(root, "generated", "package").unwrap_err();
    assert!(
        matches!(
            error.downcast_ref::<MergeError>(),
            Some(MergeError::Conflict { anchor, .. }) if anchor == "<!--BEGIN-->"
        ),
        "unexpected error: {error:?}"
    );
    assert!(!root.join("package").exists(), "nothing should be written");

    Ok(())
}

#[test]
fn test_missing_config() -> Result<()> {
    let temp = Utf8TempDir::with_prefix("synth-merge-fs-synth-")?;
    let result = SynthConfig::load(temp.path().join("synth.toml"));
    assert!(
        matches!(result, Err(ConfigError::Read { .. })),
        "should fail with Read"
    );
    Ok(())
}

#[test]
fn test_malformed_config() -> Result<()> {
    let temp = Utf8TempDir::with_prefix("synth-merge-fs-synth-")?;
    let path = temp.path().join("synth.toml");
    fs::write(&path, "[merge\npreset = ")?;
    let result = SynthConfig::load(&path);
    assert!(
        matches!(result, Err(ConfigError::Parse { .. })),
        "should fail with Parse"
    );
    Ok(())
}
