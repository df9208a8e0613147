mod common;

use std::path::Path;

use petro_chart::{
    chart::{BorderSide, DisplayType, FillSide},
    CurveKey, LasReader, PadMode, PadOptions, ProjectPaths, Session, TemplateError,
};

fn project(root: &Path) -> ProjectPaths {
    std::fs::create_dir_all(root.join("Files")).unwrap();
    ProjectPaths::new(root, "Files")
}

fn configured_session(root: &Path) -> Session {
    let files = root.join("Files");
    let a = common::write_las(&files, "well_a.las", 1000.0);
    let b = common::write_las(&files, "well_b.las", 1100.0);
    let mut session = Session::new();
    session.add_file(&a, &LasReader).unwrap();
    session.add_file(&b, &LasReader).unwrap();

    let line = session
        .add_pad_with_curve(CurveKey::new("GR", "well_a"))
        .unwrap();
    session
        .add_chart(line, CurveKey::new("RHOB", "well_b"))
        .unwrap();
    session
        .set_chart_type(line, 1, DisplayType::Fill)
        .unwrap();
    session.set_fill_side(line, 1, FillSide::Left).unwrap();
    session.set_chart_color(line, 1, "#2ca02c".into()).unwrap();
    session
        .set_clip_border(line, 0, BorderSide::Max, "120")
        .unwrap();
    session
        .set_pad_options(
            line,
            PadOptions {
                log_scale: true,
                fixed_border_scale: true,
                grid_lines: 3,
                width: 4,
                ..Default::default()
            },
        )
        .unwrap();

    let row = session
        .add_pad(PadOptions {
            mode: PadMode::Row,
            ..Default::default()
        })
        .unwrap();
    session
        .add_chart(row, CurveKey::new("GR", "well_b"))
        .unwrap();
    session.add_row_border(row, "40").unwrap();
    session.add_row_border(row, "72,5").unwrap();
    session.shuffle_row_colors(row, 11).unwrap();
    session
}

#[test]
fn template_round_trip() {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = tempfile::tempdir().unwrap();
    let project = project(dir.path());
    let session = configured_session(dir.path());
    let path = dir.path().join("session.json");
    session.save_template_to(&path, &project).unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(
        json["files"],
        serde_json::json!(["Files/well_a.las", "Files/well_b.las"])
    );
    assert!(json["pads"][0]["charts"][0]["min_border"].is_null());
    assert_eq!(json["pads"][0]["charts"][0]["max_border"], 120.0);
    assert_eq!(json["pads"][1]["type"], "row");
    assert_eq!(json["pads"][1]["charts"][0]["borders"], serde_json::json!([40.0, 72.5]));

    let mut loaded = Session::new();
    loaded.load_template(&path, &project, &LasReader).unwrap();
    assert_eq!(loaded.pads(), session.pads());
    assert_eq!(loaded.store().file_count(), 2);
    assert_eq!(loaded.window(), session.window());
    assert_eq!(loaded.save_template(&project), session.save_template(&project));
}

#[test]
fn missing_and_malformed_templates() {
    let dir = tempfile::tempdir().unwrap();
    let project = project(dir.path());
    let mut session = configured_session(dir.path());

    let missing = dir.path().join("nope.json");
    assert!(matches!(
        session.load_template(&missing, &project, &LasReader),
        Err(TemplateError::NotFound(p)) if p == missing
    ));

    let broken = dir.path().join("broken.json");
    std::fs::write(&broken, "{ \"files\": [").unwrap();
    assert!(matches!(
        session.load_template(&broken, &project, &LasReader),
        Err(TemplateError::Malformed { .. })
    ));
    assert_eq!(session.pads().len(), 2);
}

#[test]
fn partially_invalid_template_leaves_session_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let project = project(dir.path());
    let mut session = configured_session(dir.path());
    let before = session.save_template(&project);

    let path = dir.path().join("bad.json");
    std::fs::write(
        &path,
        r#"{
            "files": ["Files/well_a.las", "Files/gone.las"],
            "pads": [
                {"type": "line", "width": 0, "charts": [{"name": "'GR' well_a"}]},
                {"charts": [{"name": "'SP' well_a"}]}
            ]
        }"#,
    )
    .unwrap();

    let Err(TemplateError::PartiallyInvalid(problems)) =
        session.load_template(&path, &project, &LasReader)
    else {
        panic!("expected a partially invalid template");
    };
    assert_eq!(problems.len(), 3);
    assert!(problems.iter().any(|p| p.contains("gone.las")));
    assert!(problems.iter().any(|p| p.contains("'SP' well_a")));
    assert_eq!(session.save_template(&project), before);
}

#[test]
fn loads_template_with_bare_infinities() {
    let dir = tempfile::tempdir().unwrap();
    let project = project(dir.path());
    common::write_las(&dir.path().join("Files"), "well_a.las", 1000.0);
    let path = dir.path().join("old.json");
    std::fs::write(
        &path,
        r#"{"files": ["Files/well_a.las"], "pads": [{"log": false, "type": "row", "border_scale_fixed": false, "line_quantity": 5, "charts": [{"name": "'GR' well_a", "color": "b", "type": "line", "borders": [-Infinity, 40.0, Infinity], "min_border": -Infinity, "max_border": Infinity, "borders_color": ["b", "r"], "fill_side": "right"}], "width": 3}, {"log": true, "type": "line", "border_scale_fixed": true, "line_quantity": 5, "charts": [{"name": "'RHOB' well_a", "color": "k", "type": "fill", "borders": [-Infinity, Infinity], "min_border": 2.05, "max_border": NaN, "borders_color": ["b"], "fill_side": "left"}], "width": 3}]}"#,
    )
    .unwrap();

    let mut session = Session::new();
    session.load_template(&path, &project, &LasReader).unwrap();
    assert_eq!(session.pads().len(), 2);

    let row = &session.pads()[0].charts()[0];
    assert_eq!(row.borders().finite().collect::<Vec<_>>(), vec![40.0]);
    assert_eq!(row.min_border(), f64::NEG_INFINITY);
    assert_eq!(row.max_border(), f64::INFINITY);

    let fill = &session.pads()[1].charts()[0];
    assert_eq!(fill.display_type, DisplayType::Fill);
    assert_eq!(fill.min_border(), 2.05);
    assert_eq!(fill.max_border(), f64::INFINITY);
    assert!(session.pads()[1].options().log_scale);
}
