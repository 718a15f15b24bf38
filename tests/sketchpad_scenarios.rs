use eframe_sketch::background::BackgroundPattern;
use eframe_sketch::config::SketchConfig;
use eframe_sketch::export::{CONFIRM_PROMPT, ExportArtifact};
use eframe_sketch::input::PointerSample;
use eframe_sketch::state::{ExportOutcome, Sketchpad, ToolbarEvent};
use eframe_sketch::tool::ToolMode;
use egui::Pos2;

fn stroke(pad: &mut Sketchpad, from: (f32, f32), to: (f32, f32)) {
    pad.pointer(PointerSample::press(from.0, from.1));
    pad.pointer(PointerSample::moved(to.0, to.1));
    pad.pointer(PointerSample::release(to.0, to.1));
}

#[test]
fn test_width_five_line_then_undo() {
    let mut pad = Sketchpad::new(&SketchConfig::default(), 100, 100);
    pad.apply(ToolbarEvent::PenWidth(5));
    stroke(&mut pad, (10.0, 10.0), (10.0, 50.0));

    let drawing = pad.drawing();
    for y in [10, 30, 49] {
        for x in 8..=11 {
            assert_eq!(drawing.pixel(x, y)[3], 255, "({x}, {y})");
        }
        assert_eq!(drawing.pixel(5, y)[3], 0);
        assert_eq!(drawing.pixel(14, y)[3], 0);
    }
    assert_eq!(drawing.pixel(30, 30)[3], 0);

    assert!(pad.undo());
    assert!(pad.drawing().is_blank());
}

#[test]
fn test_eraser_leaves_transparency_not_paper() {
    let mut pad = Sketchpad::new(&SketchConfig::default(), 100, 100);
    pad.apply(ToolbarEvent::PenWidth(30));
    stroke(&mut pad, (10.0, 50.0), (90.0, 50.0));
    assert_eq!(pad.drawing().pixel(50, 50)[3], 255);

    pad.apply(ToolbarEvent::SelectMode(ToolMode::Eraser));
    pad.apply(ToolbarEvent::EraserWidth(10));
    stroke(&mut pad, (10.0, 50.0), (90.0, 50.0));

    assert_eq!(pad.drawing().pixel(50, 50), [0, 0, 0, 0]);
    // Pen pixels outside the eraser path survive.
    assert_eq!(pad.drawing().pixel(50, 40)[3], 255);
    // The merged image shows the paper through the erased path.
    assert_eq!(pad.compose().get_pixel(50, 50).0, [255, 255, 255, 255]);
}

#[test]
fn test_pattern_switch_keeps_drawing() {
    let mut pad = Sketchpad::new(&SketchConfig::default(), 120, 120);
    stroke(&mut pad, (5.0, 5.0), (100.0, 90.0));
    let drawing = pad.drawing().image().clone();
    let plain = pad.background().image().clone();

    for pattern in [
        BackgroundPattern::Ruled,
        BackgroundPattern::Graph,
        BackgroundPattern::Dots,
    ] {
        assert!(pad.set_pattern(pattern));
        assert_eq!(pad.drawing().image(), &drawing);
    }
    assert_ne!(pad.background().image(), &plain);

    // Undo restores the drawing layer but leaves the pattern in place.
    assert!(pad.undo());
    assert_eq!(pad.pattern(), BackgroundPattern::Dots);
    assert_eq!(pad.drawing().image(), &drawing);
}

#[test]
fn test_resize_resets_both_layers() {
    let config = SketchConfig {
        pattern: BackgroundPattern::Graph,
        ..SketchConfig::default()
    };
    let mut pad = Sketchpad::new(&config, 100, 100);
    stroke(&mut pad, (5.0, 5.0), (95.0, 95.0));
    pad.pointer(PointerSample::press(20.0, 20.0));

    pad.resize(150, 90);
    assert_eq!(pad.size(), (150, 90));
    assert!(pad.drawing().is_blank());
    assert!(!pad.is_drawing());

    let fresh = Sketchpad::new(&config, 150, 90);
    assert_eq!(pad.background().image(), fresh.background().image());

    // Moves after the resize do not continue the old stroke.
    pad.pointer(PointerSample::moved(60.0, 60.0));
    assert!(pad.drawing().is_blank());
}

#[test]
fn test_coordinates_are_relative_to_surface() {
    let mut pad = Sketchpad::new(&SketchConfig::default(), 100, 100);
    pad.set_surface_origin(Pos2::new(200.0, 48.0));
    stroke(&mut pad, (220.0, 58.0), (220.0, 98.0));

    assert_eq!(pad.drawing().pixel(20, 30)[3], 255);
    assert_eq!(pad.drawing().pixel(20, 80)[3], 0);
}

#[test]
fn test_unchanged_export_prompts_and_decline_produces_nothing() {
    let mut pad = Sketchpad::new(&SketchConfig::default(), 50, 50);
    let mut prompts = Vec::new();
    let mut downloads: Vec<ExportArtifact> = Vec::new();

    let outcome = pad
        .export(
            "untouched",
            &mut |message: &str| {
                prompts.push(message.to_owned());
                false
            },
            &mut downloads,
        )
        .unwrap();

    assert_eq!(outcome, ExportOutcome::Declined);
    assert_eq!(prompts, vec![CONFIRM_PROMPT.to_owned()]);
    assert!(downloads.is_empty());
}

#[test]
fn test_export_round_trip_through_png() {
    let mut pad = Sketchpad::new(&SketchConfig::default(), 60, 40);
    pad.apply(ToolbarEvent::Pattern(BackgroundPattern::Ruled));
    stroke(&mut pad, (10.0, 10.0), (50.0, 10.0));

    let mut downloads: Vec<ExportArtifact> = Vec::new();
    let outcome = pad
        .export("lines", &mut |_: &str| -> bool { panic!("sketch was changed") }, &mut downloads)
        .unwrap();
    assert_eq!(
        outcome,
        ExportOutcome::Delivered {
            filename: "lines.png".to_owned()
        }
    );

    let decoded = image::load_from_memory(&downloads[0].bytes).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (60, 40));
    assert_eq!(decoded, pad.compose());
    // Every exported pixel is opaque.
    assert!(decoded.pixels().all(|p| p.0[3] == 255));

    // A second export without changes asks again.
    assert!(pad.needs_confirmation());
}

#[test]
fn test_file_download_writes_png() {
    use eframe_sketch::export::FileDownload;

    let dir = std::env::temp_dir().join(format!("eframe_sketch_test_{}", std::process::id()));
    let mut pad = Sketchpad::new(&SketchConfig::default(), 20, 20);
    stroke(&mut pad, (2.0, 2.0), (18.0, 18.0));

    let mut download = FileDownload::new(&dir);
    pad.export("", &mut |_: &str| true, &mut download).unwrap();

    let written = std::fs::read(dir.join("sketch.png")).unwrap();
    let decoded = image::load_from_memory(&written).unwrap().to_rgba8();
    assert_eq!(decoded, pad.compose());

    std::fs::remove_dir_all(&dir).unwrap();
}
