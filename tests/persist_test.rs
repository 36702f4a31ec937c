use std::io::Cursor;

use curve_tracer::persist::{Snapshot, load_str};
use curve_tracer::reference::{MAX_PERSISTED_IMAGE_BYTES, encode_data_url};
use curve_tracer::{
    DrawList, Editor, FileStore, KeyValueStore, MemoryStore, Point, STORAGE_KEY, SettingUpdate,
    StoreError, Tool,
};

fn populated_editor() -> Editor {
    let mut editor = Editor::new();
    let a = editor.helper.add_group("outline");
    for p in [(100.0, 100.0), (200.0, 150.0), (300.0, 100.0)] {
        a.add_point(Point::new(p.0, p.1));
    }
    let b = editor.helper.add_group("detail");
    b.add_point(Point::new(400.0, 400.0));
    editor.helper.set_active_group("outline");
    editor.helper.set_origin(Point::new(12.5, 40.0));
    editor.set_tool(Tool::EditControls);

    let settings = &mut editor.helper.settings;
    settings.apply(SettingUpdate::LineWidth(3.5));
    settings.apply(SettingUpdate::PointRange(20.0));
    settings.apply(SettingUpdate::PointSize(6.0));
    settings.apply(SettingUpdate::ActiveOpacity(0.9));
    settings.apply(SettingUpdate::InactiveOpacity(0.2));
    settings.apply(SettingUpdate::MainColor("#112233".into()));
    settings.apply(SettingUpdate::ControlColor("orange".into()));
    settings.apply(SettingUpdate::OriginColor("#abc".into()));
    settings.apply(SettingUpdate::OutputPrecision(4));

    let reference = &mut editor.helper.reference;
    reference.set_offset(Point::new(-20.0, 35.0));
    reference.set_scale(1.75);
    reference.set_opacity(0.4);
    reference.set_color("#ff00ff");
    editor
}

fn png_data_url() -> String {
    let img = image::RgbaImage::from_pixel(8, 4, image::Rgba([0, 0, 255, 255]));
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    encode_data_url(&bytes)
}

fn assert_equivalent(a: &Editor, b: &Editor) {
    assert_eq!(a.helper.groups(), b.helper.groups());
    assert_eq!(a.helper.active_group_id(), b.helper.active_group_id());
    assert_eq!(a.helper.origin(), b.helper.origin());
    assert_eq!(a.session.tool, b.session.tool);
    assert_eq!(a.helper.settings, b.helper.settings);
    let (ra, rb) = (&a.helper.reference, &b.helper.reference);
    assert_eq!(ra.offset(), rb.offset());
    assert_eq!(ra.scale(), rb.scale());
    assert_eq!(ra.opacity(), rb.opacity());
    assert_eq!(ra.color(), rb.color());
    assert_eq!(ra.data(), rb.data());
}

mod roundtrip_tests {
    use super::*;

    #[test]
    fn test_save_then_load_restores_state() {
        let original = populated_editor();
        let mut store = MemoryStore::new();
        original.save(&mut store).unwrap();

        let mut restored = Editor::new();
        assert!(restored.load(&store).unwrap());
        assert_equivalent(&original, &restored);
    }

    #[test]
    fn test_image_payload_roundtrips_and_decodes() {
        let mut original = populated_editor();
        original.helper.reference.set_data(png_data_url());
        let mut store = MemoryStore::new();
        original.save(&mut store).unwrap();

        let mut restored = Editor::new();
        restored.load(&store).unwrap();
        assert_equivalent(&original, &restored);
        assert!(restored.helper.reference.is_pending());
        restored.tick(&mut DrawList::new());
        assert!(restored.helper.reference.is_ready());
    }

    #[test]
    fn test_oversize_image_is_omitted() {
        let mut editor = populated_editor();
        let payload = format!(
            "data:image/png;base64,{}",
            "A".repeat(MAX_PERSISTED_IMAGE_BYTES)
        );
        editor.helper.reference.set_data(payload);
        let mut store = MemoryStore::new();
        editor.save(&mut store).unwrap();

        let json = store.get(STORAGE_KEY).unwrap().unwrap();
        let snapshot: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snapshot.reference.unwrap().data.as_deref(), Some(""));
    }

    #[test]
    fn test_snapshot_layout() {
        let editor = populated_editor();
        let mut store = MemoryStore::new();
        editor.save(&mut store).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&store.get(STORAGE_KEY).unwrap().unwrap()).unwrap();
        assert!(json["timestamp"].is_i64());
        assert_eq!(json["originPos"], serde_json::json!({"x": 12.5, "y": 40.0}));
        assert_eq!(json["activeGroupId"], "outline");
        assert_eq!(json["activeTool"], 4);
        assert_eq!(json["curveGroups"][0]["points"][1], serde_json::json!({"x": 200.0, "y": 150.0}));
        assert!(json["curveGroups"][0]["controls"][0]["x1"].is_f64());
        assert_eq!(json["reference"]["offset"], serde_json::json!({"x": -20.0, "y": 35.0}));
        assert_eq!(json["reference"]["data"], "");
        assert_eq!(json["controlColor"], "orange");
        assert_eq!(json["outputPrecision"], 4);
    }

    #[test]
    fn test_drag_in_progress_is_not_saved() {
        let mut editor = populated_editor();
        editor.set_tool(Tool::EditPoints);
        editor.pointer_moved(Point::new(100.0, 100.0));
        editor.pointer_down();
        editor.pointer_moved(Point::new(140.0, 100.0));

        let mut store = MemoryStore::new();
        editor.save(&mut store).unwrap();
        let mut restored = Editor::new();
        restored.load(&store).unwrap();
        assert_eq!(
            restored.helper.group("outline").unwrap().points()[0],
            Point::new(100.0, 100.0)
        );
    }
}

mod partial_load_tests {
    use super::*;

    #[test]
    fn test_missing_fields_leave_state_alone() {
        let mut editor = populated_editor();
        let before_groups = editor.helper.groups().to_vec();
        editor.load_str(r#"{"lineWidth": 7, "reference": {"opacity": 0.9}}"#).unwrap();

        assert_eq!(editor.helper.settings.line_width, 7.0);
        assert_eq!(editor.helper.settings.point_range(), 20.0);
        assert_eq!(editor.helper.groups(), before_groups.as_slice());
        assert_eq!(editor.helper.origin(), Point::new(12.5, 40.0));
        assert_eq!(editor.session.tool, Tool::EditControls);
        assert_eq!(editor.helper.reference.opacity(), 0.9);
        assert_eq!(editor.helper.reference.scale(), 1.75);
    }

    #[test]
    fn test_unknown_active_group_keeps_previous() {
        let mut editor = populated_editor();
        editor.load_str(r#"{"activeGroupId": "nope"}"#).unwrap();
        assert_eq!(editor.helper.active_group_id(), Some("outline"));
    }

    #[test]
    fn test_groups_rebuilt_from_tuples() {
        let mut editor = Editor::new();
        editor
            .load_str(
                r#"{
                    "curveGroups": [{
                        "id": "g",
                        "points": [{"x": 1, "y": 2}, {"x": 3, "y": 4}],
                        "controls": [{"x1": 1.5, "y1": 2.5, "x2": 2.5, "y2": 3.5}]
                    }],
                    "activeGroupId": "g",
                    "activeTool": 3,
                    "pointRange": 10
                }"#,
            )
            .unwrap();
        let group = editor.helper.active_group().unwrap();
        assert_eq!(group.points()[1], Point::new(3.0, 4.0));
        assert_eq!(group.controls()[0].second, Point::new(2.5, 3.5));
        assert_eq!(editor.session.tool, Tool::EditPoints);
        assert_eq!(editor.helper.settings.point_range_half(), 5.0);
    }

    #[test]
    fn test_unknown_tool_index_is_ignored() {
        let mut editor = populated_editor();
        editor.load_str(r#"{"activeTool": 42}"#).unwrap();
        assert_eq!(editor.session.tool, Tool::EditControls);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let mut editor = Editor::new();
        let mut session = editor.session;
        assert!(matches!(
            load_str("{not json", &mut editor.helper, &mut session),
            Err(StoreError::Serialize(_))
        ));
    }
}

mod store_tests {
    use super::*;

    #[test]
    fn test_quota_failure_keeps_previous_entry() {
        let mut store = MemoryStore::with_quota(64);
        store.set(STORAGE_KEY, "{}").unwrap();

        let editor = populated_editor();
        let result = editor.save(&mut store);
        assert!(matches!(result, Err(StoreError::QuotaExceeded { .. })));
        assert_eq!(store.get(STORAGE_KEY).unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn test_load_from_empty_store() {
        let store = MemoryStore::new();
        let mut editor = populated_editor();
        assert!(!editor.load(&store).unwrap());
        assert_eq!(editor.helper.groups().len(), 2);
    }

    #[test]
    fn test_failed_file_write_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        // a directory where the entry file should go makes the rename fail
        let entry = dir.path().join(format!("{}.json", STORAGE_KEY));
        std::fs::create_dir(&entry).unwrap();
        std::fs::write(entry.join("keep"), "x").unwrap();

        let mut store = FileStore::new(dir.path());
        assert!(matches!(store.set(STORAGE_KEY, "{}"), Err(StoreError::Io(_))));

        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec![format!("{}.json", STORAGE_KEY)]);
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("state"));
        assert_eq!(store.get(STORAGE_KEY).unwrap(), None);

        let original = populated_editor();
        original.save(&mut store).unwrap();
        assert!(dir.path().join("state").join(format!("{}.json", STORAGE_KEY)).exists());

        let reopened = FileStore::new(dir.path().join("state"));
        let mut restored = Editor::new();
        assert!(restored.load(&reopened).unwrap());
        assert_equivalent(&original, &restored);
    }
}
