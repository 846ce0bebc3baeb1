//! End-to-end conversion tests
//!
//! These run the controller against files on disk and inspect the written
//! containers.

mod common;

use common::{HOUSE_OBJ, accessor_bytes, dir_entries, node_names, read_glb, write_source};
use roomglb::{
    ConversionController, ConverterConfig, EncodeError, Error, ExportError, ExportStrategy,
    ParseError, ParsedGeometry, RoomPalette, Scene, Tier, convert_file, convert_in_place,
};
use std::cell::RefCell;
use std::rc::Rc;
use tempfile::tempdir;

#[test]
fn test_house_exports_one_mesh_per_room() {
    let dir = tempdir().unwrap();
    let input = write_source(dir.path(), "house.obj", HOUSE_OBJ);
    let output = dir.path().join("house.glb");

    let report = convert_file(&input, &output).expect("conversion should succeed");

    assert_eq!(report.tier, Tier::PerGroup);
    assert!(!report.used_fallback());
    assert_eq!(report.mesh_count, 2);
    assert_eq!(report.triangle_count, 6);
    assert!(report.warnings.is_empty());

    let (doc, _) = read_glb(&output);
    assert_eq!(
        node_names(&doc),
        vec![Some("Bedroom1".to_string()), Some("Kitchen".to_string())]
    );

    let palette = RoomPalette::default();
    let bedroom = &doc.materials[doc.meshes[0].primitives[0].material.unwrap()];
    assert_eq!(
        bedroom.pbr_metallic_roughness.base_color_factor,
        palette.color_for("Bedroom1").to_array()
    );
    let kitchen = &doc.materials[doc.meshes[1].primitives[0].material.unwrap()];
    assert_eq!(
        kitchen.pbr_metallic_roughness.base_color_factor,
        palette.color_for("Kitchen").to_array()
    );
}

#[test]
fn test_bedroom_quad_scenario() {
    let dir = tempdir().unwrap();
    let src = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\ng Bedroom1\nf 1 2 3 4\n";
    let input = write_source(dir.path(), "bedroom.obj", src);
    let output = dir.path().join("bedroom.glb");

    let report = convert_file(&input, &output).unwrap();
    assert_eq!(report.triangle_count, 2);

    let (doc, bin) = read_glb(&output);
    let primitive = &doc.meshes[0].primitives[0];
    let indices = accessor_bytes(&doc, &bin, primitive.indices.unwrap());
    let indices: Vec<u32> = indices
        .chunks_exact(4)
        .map(|c| u32::from_le_bytes(c.try_into().unwrap()))
        .collect();
    assert_eq!(indices, vec![0, 1, 2, 0, 2, 3]);

    let material = &doc.materials[primitive.material.unwrap()];
    assert_eq!(
        material.pbr_metallic_roughness.base_color_factor,
        [1.0, 0.6, 0.8, 1.0]
    );
}

#[test]
fn test_unmatched_room_is_gray() {
    let dir = tempdir().unwrap();
    let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\ng Room42\nf 1 2 3\n";
    let input = write_source(dir.path(), "room.obj", src);
    let output = dir.path().join("room.glb");

    convert_file(&input, &output).unwrap();
    let (doc, _) = read_glb(&output);
    assert_eq!(
        doc.materials[0].pbr_metallic_roughness.base_color_factor,
        [0.7, 0.7, 0.7, 1.0]
    );
}

#[test]
fn test_empty_source_exhausts_all_tiers() {
    let dir = tempdir().unwrap();
    let input = write_source(dir.path(), "empty.obj", "# no geometry here\n\n");
    let output = dir.path().join("empty.glb");

    let err = convert_file(&input, &output).unwrap_err();
    match err {
        Error::Export(ExportError::Exhausted { attempts }) => {
            let tiers: Vec<Option<Tier>> = attempts.iter().map(|a| a.tier()).collect();
            assert_eq!(
                tiers,
                vec![Some(Tier::PerGroup), Some(Tier::Combined), Some(Tier::Banded)]
            );
        }
        other => panic!("expected exhausted tiers, got {:?}", other),
    }
    assert!(!output.exists(), "no output file may be left behind");
    assert_eq!(dir_entries(dir.path()), vec!["empty.obj".to_string()]);
}

#[test]
fn test_faces_out_of_range_only_exhaust() {
    let dir = tempdir().unwrap();
    let src = "g Kitchen\nf 1 2 3\nv 0 0 0\n";
    let input = write_source(dir.path(), "bad.obj", src);
    let output = dir.path().join("bad.glb");

    let err = convert_file(&input, &output).unwrap_err();
    assert!(matches!(err, Error::Export(ExportError::Exhausted { .. })));
    assert!(err.to_string().contains("[E3002]"));
}

#[test]
fn test_missing_input_is_unreadable() {
    let dir = tempdir().unwrap();
    let err = convert_file(dir.path().join("nope.obj"), dir.path().join("nope.glb")).unwrap_err();
    assert!(matches!(err, Error::Parse(ParseError::Unreadable { .. })));
    assert!(err.to_string().contains("[E1001]"));
}

#[test]
fn test_unwritable_output_exhausts() {
    let dir = tempdir().unwrap();
    let input = write_source(dir.path(), "house.obj", HOUSE_OBJ);
    let output = dir.path().join("no_such_dir").join("house.glb");

    let err = convert_file(&input, &output).unwrap_err();
    match err {
        Error::Export(ExportError::Exhausted { attempts }) => assert_eq!(attempts.len(), 3),
        other => panic!("expected exhausted tiers, got {:?}", other),
    }
}

#[test]
fn test_convert_in_place_derives_glb_path() {
    let dir = tempdir().unwrap();
    let input = write_source(dir.path(), "model_20240101_120000.obj", HOUSE_OBJ);

    let report = convert_in_place(&input).unwrap();
    assert_eq!(report.output, dir.path().join("model_20240101_120000.glb"));
    assert!(report.output.exists());
}

#[test]
fn test_warnings_are_reported_but_not_fatal() {
    let dir = tempdir().unwrap();
    let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nv oops\ng Lobby\nf 1 2 9\nf 1 2 3\n";
    let input = write_source(dir.path(), "noisy.obj", src);
    let output = dir.path().join("noisy.glb");

    let report = convert_file(&input, &output).unwrap();
    assert_eq!(report.tier, Tier::PerGroup);
    assert_eq!(report.triangle_count, 1);
    let lines: Vec<usize> = report.warnings.iter().map(|w| w.line()).collect();
    assert_eq!(lines, vec![4, 6]);
}

/// Fails on purpose and records that it was asked
struct RefusingExport {
    tier: Tier,
    calls: Rc<RefCell<Vec<Tier>>>,
}

impl ExportStrategy for RefusingExport {
    fn tier(&self) -> Tier {
        self.tier
    }

    fn build_scene(
        &self,
        _parsed: &ParsedGeometry,
        _config: &ConverterConfig,
    ) -> Result<Scene, EncodeError> {
        self.calls.borrow_mut().push(self.tier);
        Err(EncodeError::EmptyScene("refused".to_string()))
    }
}

#[test]
fn test_escalates_to_combined_when_per_group_fails() {
    let dir = tempdir().unwrap();
    let input = write_source(dir.path(), "house.obj", HOUSE_OBJ);
    let output = dir.path().join("house.glb");
    let calls = Rc::new(RefCell::new(Vec::new()));

    let controller = ConversionController::with_strategies(
        ConverterConfig::default(),
        vec![
            Box::new(RefusingExport {
                tier: Tier::PerGroup,
                calls: Rc::clone(&calls),
            }),
            Box::new(roomglb::CombinedExport),
            Box::new(roomglb::BandedExport),
        ],
    );

    let report = controller.convert_file(&input, &output).unwrap();
    assert_eq!(report.tier, Tier::Combined);
    assert_eq!(report.failed_attempts.len(), 1);
    assert_eq!(report.mesh_count, 1);
    assert_eq!(report.triangle_count, 6);
    assert_eq!(*calls.borrow(), vec![Tier::PerGroup]);

    let (doc, bin) = read_glb(&output);
    assert_eq!(node_names(&doc), vec![None]);
    let primitive = &doc.meshes[0].primitives[0];
    assert_eq!(primitive.indices, None);
    let colors = accessor_bytes(&doc, &bin, primitive.attributes["COLOR_0"]);
    // 6 triangles, 3 corners each, RGBA
    assert_eq!(colors.len(), 6 * 3 * 4);
    let bedroom = RoomPalette::default().color_for("Bedroom1").to_rgba8();
    let kitchen = RoomPalette::default().color_for("Kitchen").to_rgba8();
    assert_eq!(&colors[0..4], &bedroom);
    assert_eq!(&colors[colors.len() - 4..], &kitchen);
}

#[test]
fn test_escalates_to_banded_when_earlier_tiers_fail() {
    let dir = tempdir().unwrap();
    let input = write_source(dir.path(), "house.obj", HOUSE_OBJ);
    let output = dir.path().join("house.glb");
    let calls = Rc::new(RefCell::new(Vec::new()));

    let controller = ConversionController::with_strategies(
        ConverterConfig::default(),
        vec![
            Box::new(RefusingExport {
                tier: Tier::PerGroup,
                calls: Rc::clone(&calls),
            }),
            Box::new(RefusingExport {
                tier: Tier::Combined,
                calls: Rc::clone(&calls),
            }),
            Box::new(roomglb::BandedExport),
        ],
    );

    let report = controller.convert_file(&input, &output).unwrap();
    assert_eq!(report.tier, Tier::Banded);
    assert!(report.used_fallback());
    assert_eq!(*calls.borrow(), vec![Tier::PerGroup, Tier::Combined]);

    let (doc, bin) = read_glb(&output);
    let primitive = &doc.meshes[0].primitives[0];
    let colors = accessor_bytes(&doc, &bin, primitive.attributes["COLOR_0"]);
    let band_colors = ConverterConfig::default().band_colors().map(|c| c.to_rgba8());
    // 6 triangles in bands of ceil(6/5) = 2: bands 0, 0, 1, 1, 2, 2
    let per_triangle: Vec<[u8; 4]> = colors
        .chunks_exact(12)
        .map(|tri| tri[0..4].try_into().unwrap())
        .collect();
    assert_eq!(
        per_triangle,
        vec![
            band_colors[0],
            band_colors[0],
            band_colors[1],
            band_colors[1],
            band_colors[2],
            band_colors[2]
        ]
    );
}

#[test]
fn test_stops_at_first_success() {
    let dir = tempdir().unwrap();
    let input = write_source(dir.path(), "house.obj", HOUSE_OBJ);
    let output = dir.path().join("house.glb");
    let calls = Rc::new(RefCell::new(Vec::new()));

    let controller = ConversionController::with_strategies(
        ConverterConfig::default(),
        vec![
            Box::new(roomglb::PerGroupExport),
            Box::new(RefusingExport {
                tier: Tier::Combined,
                calls: Rc::clone(&calls),
            }),
        ],
    );

    let report = controller.convert_file(&input, &output).unwrap();
    assert_eq!(report.tier, Tier::PerGroup);
    assert!(calls.borrow().is_empty());
}

#[test]
fn test_failed_run_keeps_previous_output() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("house.glb");
    std::fs::write(&output, b"previous").unwrap();
    let input = write_source(dir.path(), "empty.obj", "");

    assert!(convert_file(&input, &output).is_err());
    assert_eq!(std::fs::read(&output).unwrap(), b"previous");
}

#[test]
fn test_banded_tier_ignores_unused_oversized_vertex() {
    let dir = tempdir().unwrap();
    let src = "v 1e39 0 0\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 2 3 4\n";
    let input = write_source(dir.path(), "stray.obj", src);
    let output = dir.path().join("stray.glb");

    let controller = ConversionController::with_strategies(
        ConverterConfig::default(),
        vec![Box::new(roomglb::BandedExport)],
    );
    let report = controller.convert_file(&input, &output).unwrap();
    assert_eq!(report.tier, Tier::Banded);
    assert_eq!(report.triangle_count, 1);

    let (doc, _) = read_glb(&output);
    let position = doc.meshes[0].primitives[0].attributes["POSITION"];
    assert_eq!(doc.accessors[position].count, 3);
    assert_eq!(doc.accessors[position].max, Some(vec![1.0, 1.0, 0.0]));
}

#[test]
fn test_default_color_applies_to_unmatched_rooms() {
    let dir = tempdir().unwrap();
    let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\ng Room42\nf 1 2 3\n";
    let input = write_source(dir.path(), "room.obj", src);
    let output = dir.path().join("room.glb");

    let config = ConverterConfig::new()
        .with_default_color(roomglb::Color::WHITE)
        .with_palette(RoomPalette::default());
    ConversionController::new(config)
        .convert_file(&input, &output)
        .unwrap();

    let (doc, _) = read_glb(&output);
    assert_eq!(
        doc.materials[0].pbr_metallic_roughness.base_color_factor,
        [1.0, 1.0, 1.0, 1.0]
    );
}
