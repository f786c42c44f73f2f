// Copyright 2026 Oxide Computer Company

//! Integration tests for synth-merge-fs.

mod synthesize;
mod tree_io;
