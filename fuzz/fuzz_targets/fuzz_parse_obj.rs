#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must never panic and never yield an out-of-range face
    let Ok(parsed) = roomglb::parser::parse_reader(Cursor::new(data)) else {
        return;
    };

    for face in &parsed.faces {
        assert!(face.len() >= 3);
        assert!(face.indices().iter().all(|&i| i < parsed.vertex_count()));
    }
});
