#![no_main]

use libfuzzer_sys::fuzz_target;
use roomglb::assembly::{assemble_banded, assemble_per_group, combine};
use roomglb::palette::BAND_COLORS;
use roomglb::writer::{encode_scene, read_container};
use roomglb::{Color, RoomPalette, Scene};

fuzz_target!(|data: &[u8]| {
    // Every scene a tier builds either encodes to a readable container or
    // fails with an error; nothing panics
    let source = String::from_utf8_lossy(data);
    let parsed = roomglb::parser::parse_str(&source);

    let grouped = assemble_per_group(&parsed, &RoomPalette::default());
    let mut scenes = Vec::new();
    if let Ok(mesh) = combine(&grouped, Color::DEFAULT_GRAY) {
        scenes.push(Scene::Single(mesh));
    }
    if let Ok(mesh) = assemble_banded(&parsed, &BAND_COLORS) {
        scenes.push(Scene::Single(mesh));
    }
    scenes.push(grouped);

    for scene in &scenes {
        if let Ok(bytes) = encode_scene(scene, "fuzz") {
            assert!(read_container(&bytes).is_ok());
        }
    }
});
