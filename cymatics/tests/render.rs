use cymatics::chladni::ChladniMode;
use cymatics::config::{AnodeConfig, ChladniConfig, OutputConfig};
use cymatics::figures::{render_anode, render_chladni};

fn output_in(dir: &std::path::Path) -> OutputConfig {
    OutputConfig {
        dir: dir.join("figures"),
        ..OutputConfig::default()
    }
}

#[test]
fn chladni_figure_is_written() {
    let dir = tempfile::tempdir().unwrap();
    let output = output_in(dir.path());
    let config = ChladniConfig {
        points: 41,
        levels: 8,
        image_width: 600,
        image_height: 480,
        ..ChladniConfig::default()
    };
    let path = render_chladni(&config, &output).unwrap();
    assert_eq!(path, output.dir.join("chladni_modes.png"));
    assert!(path.exists());
    assert!(std::fs::metadata(&path).unwrap().len() > 0);
}

#[test]
fn single_panel_chladni_figure_is_written() {
    let dir = tempfile::tempdir().unwrap();
    let output = OutputConfig {
        chladni_file: "one.png".to_string(),
        ..output_in(dir.path())
    };
    let config = ChladniConfig {
        points: 31,
        modes: vec![ChladniMode::new(3, 5)],
        image_width: 400,
        image_height: 400,
        ..ChladniConfig::default()
    };
    let path = render_chladni(&config, &output).unwrap();
    assert!(path.ends_with("one.png"));
    assert!(path.exists());
}

#[test]
fn anode_figure_is_written() {
    let dir = tempfile::tempdir().unwrap();
    let output = output_in(dir.path());
    let config = AnodeConfig {
        points: 40,
        levels: 12,
        image_width: 600,
        image_height: 480,
        ..AnodeConfig::default()
    };
    let path = render_anode(&config, &output).unwrap();
    assert_eq!(path, output.dir.join("acoustic_anode.png"));
    assert!(path.exists());
    assert!(std::fs::metadata(&path).unwrap().len() > 0);
}
