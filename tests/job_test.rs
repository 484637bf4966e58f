//! Jobs against real files on disk.

use std::fs;
use std::path::Path;

use svgstore::{ConfigFile, Job, Options, run_job};

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

#[test]
fn test_missing_sources_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "home.svg", r#"<svg viewBox="0 0 24 24"><path d="M0 0"/></svg>"#);

    let dest = dir.path().join("dist/icons.svg");
    let job = Job::new(
        vec![dir.path().join("home.svg"), dir.path().join("gone.svg")],
        &dest,
    );
    let report = run_job(&job, &Options::default()).unwrap();

    assert_eq!(report.icons, ["home"]);
    assert!(report.demo_path.is_none());
    let sprite = fs::read_to_string(&dest).unwrap();
    assert!(sprite.contains(r#"<symbol id="home" viewBox="0 0 24 24">"#));
}

#[test]
fn test_demo_is_written_next_to_sprite() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "icon-a.svg", "<svg><path/></svg>");
    write(dir.path(), "icon-b.svg", "<svg><rect/></svg>");

    let options = Options {
        include_demo: true,
        ..Options::default()
    };
    let dest = dir.path().join("sprite.svg");
    let job = Job::new(
        vec![dir.path().join("icon-a.svg"), dir.path().join("icon-b.svg")],
        &dest,
    );
    let report = run_job(&job, &options).unwrap();

    let demo_path = report.demo_path.unwrap();
    assert_eq!(demo_path, dir.path().join("sprite-demo.html"));

    let html = fs::read_to_string(&demo_path).unwrap();
    assert_eq!(html.matches("<use xlink:href=").count(), 2);
    let a = html.find(r##"<use xlink:href="#icon-a">"##).unwrap();
    let b = html.find(r##"<use xlink:href="#icon-b">"##).unwrap();
    assert!(a < b);
    assert!(html.contains("<title>Sprite Demo</title>"));

    // The sprite file itself is not hidden
    let sprite = fs::read_to_string(&dest).unwrap();
    assert!(!sprite.contains("visibility:hidden"));
}

#[test]
fn test_custom_template_and_location() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "star.svg", "<svg><path/></svg>");
    write(
        dir.path(),
        "demo.tmpl",
        "<h1>{{title}}</h1><p>{{svgFilename}}</p>{{useBlock}}",
    );

    let options = Options {
        include_demo: true,
        demo_template: dir.path().join("demo.tmpl").to_string_lossy().into_owned(),
        demo_location: dir.path().join("docs").to_string_lossy().into_owned(),
        demo_title: "Star icons".into(),
        ..Options::default()
    };
    let job = Job::new(vec![dir.path().join("star.svg")], dir.path().join("stars.svg"));
    let report = run_job(&job, &options).unwrap();

    let demo_path = report.demo_path.unwrap();
    assert_eq!(demo_path, dir.path().join("docs/stars.html"));
    let html = fs::read_to_string(demo_path).unwrap();
    assert_eq!(
        html,
        "<h1>Star icons</h1><p>stars</p><svg class=\"star\"><use xlink:href=\"#star\"></use></svg>\n"
    );
}

#[test]
fn test_config_file_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("icons")).unwrap();
    write(&dir.path().join("icons"), "b.svg", "<svg><rect/></svg>");
    write(&dir.path().join("icons"), "a.svg", "<svg><path/></svg>");

    let config = ConfigFile::parse(
        r#"
        [options]
        prefix = "i-"
        includeTitle = false

        [targets.all]
        options = { svg = { class = "sprite" } }

        [[targets.all.files]]
        src = ["icons/*.svg"]
        dest = "out/all.svg"
        "#,
    )
    .unwrap();

    let options = config.target_options("all").unwrap();
    let mapping = &config.targets["all"].files[0];
    let job = Job::expand(&mapping.src, &mapping.dest, dir.path()).unwrap();
    let report = run_job(&job, &options).unwrap();

    assert_eq!(report.icons, ["i-a", "i-b"]);
    let sprite = fs::read_to_string(dir.path().join("out/all.svg")).unwrap();
    assert!(sprite.starts_with(r#"<svg class="sprite" version="1.1""#));
    assert!(sprite.ends_with(
        r#"<symbol id="i-a"><path/></symbol><symbol id="i-b"><rect/></symbol></svg>"#
    ));
}

/// Demo paths in a config file are relative to that file, not the working directory.
#[test]
fn test_config_demo_paths_follow_config_dir() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "star.svg", "<svg><path/></svg>");
    write(dir.path(), "demo.tmpl", "<p>{{svgFilename}}</p>{{useBlock}}");
    write(
        dir.path(),
        "svgstore.toml",
        r#"
        [options]
        includedemo = true
        demoTemplate = "demo.tmpl"
        demoLocation = "docs"

        [[targets.stars.files]]
        src = ["star.svg"]
        dest = "stars.svg"
        "#,
    );

    let config = ConfigFile::load(&dir.path().join("svgstore.toml")).unwrap();
    assert_eq!(config.base_dir, dir.path());

    let options = config.target_options("stars").unwrap();
    let mapping = &config.targets["stars"].files[0];
    let job = Job::expand(&mapping.src, &mapping.dest, &config.base_dir).unwrap();
    let report = run_job(&job, &options).unwrap();

    let demo_path = report.demo_path.unwrap();
    assert_eq!(demo_path, dir.path().join("docs/stars.html"));
    assert_eq!(
        fs::read_to_string(demo_path).unwrap(),
        "<p>stars</p><svg class=\"star\"><use xlink:href=\"#star\"></use></svg>\n"
    );
}
