//! Shared fixtures for integration tests
//!
//! Not every test binary uses every helper.
#![allow(dead_code)]

use roomglb::writer::document::Document;
use roomglb::writer::read_container;
use std::path::{Path, PathBuf};

/// Two rooms laid out the way the upstream generator writes them: shared
/// vertex list up front, then `g`/`usemtl` blocks of quad faces
pub const HOUSE_OBJ: &str = "\
# Generated by Text-to-3D Model Generator
mtllib house.mtl

v 0 0 0
v 4 0 0
v 4 3 0
v 0 3 0
v 4 0 0
v 8 0 0
v 8 3 0
v 4 3 0
v 0 0 2.5
v 4 0 2.5

# Faces

g Bedroom1
usemtl room_0
f 1 2 3 4
f 1 2 10 9

g Kitchen
usemtl room_1
f 5 6 7 8
";

/// Write `contents` to `name` inside `dir`
pub fn write_source(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("write fixture");
    path
}

/// Read a written container back into its document and binary chunk
pub fn read_glb(path: &Path) -> (Document, Vec<u8>) {
    let bytes = std::fs::read(path).expect("read output");
    read_container(&bytes).expect("valid container")
}

/// Node names in scene order
pub fn node_names(doc: &Document) -> Vec<Option<String>> {
    doc.nodes.iter().map(|n| n.name.clone()).collect()
}

/// Raw bytes behind an accessor
pub fn accessor_bytes<'a>(doc: &Document, bin: &'a [u8], accessor: usize) -> &'a [u8] {
    let view = &doc.buffer_views[doc.accessors[accessor].buffer_view];
    &bin[view.byte_offset..view.byte_offset + view.byte_length]
}

/// Files left in `dir`, sorted
pub fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("read dir")
        .map(|e| e.expect("dir entry").file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
