use inference_engine::{ForestParams, ModelArtifact, RandomForest};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Working directory plus a nested search root, so no default candidate
/// escapes the temporary tree
struct Sandbox {
    dir: TempDir,
    root: PathBuf,
}

impl Sandbox {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("srv").join("health").join("bin");
        std::fs::create_dir_all(&root).unwrap();
        Self { dir, root }
    }

    fn run(&self, args: &[&str]) -> Output {
        self.run_with(args, "warn")
    }

    fn run_with(&self, args: &[&str], log_level: &str) -> Output {
        Command::new(env!("CARGO_BIN_EXE_predict-health"))
            .args(args)
            .env("HEALTH_PREDICTOR__LOG_LEVEL", log_level)
            .current_dir(self.dir.path())
            .env("HEALTH_PREDICTOR__MODEL__SEARCH_ROOT", &self.root)
            .env_remove("HEALTH_PREDICTOR__MODEL__CANDIDATES")
            .output()
            .unwrap()
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Forest that answers class index 2 for every row
fn write_constant_model(path: &Path) {
    let x: Vec<Vec<f64>> = (0..8).map(|i| vec![i as f64; 6]).collect();
    let y = vec![2; 8];
    let params = ForestParams {
        n_trees: 3,
        max_depth: 2,
        ..ForestParams::default()
    };
    let forest = RandomForest::fit(&x, &y, 3, &params).unwrap();
    ModelArtifact::new(Vec::new(), Vec::new(), forest).save(path).unwrap();
}

#[test]
fn no_model_critical() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["70", "150", "104.2", "85", "180", "100"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "Critical\n");
}

#[test]
fn no_model_normal() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["30", "80", "98.6", "98", "120", "80"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "Normal\n");
}

#[test]
fn no_model_boundary_critical() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["80", "105", "100.5", "93", "165", "95"]);
    assert_eq!(stdout(&output), "Critical\n");
}

#[test]
fn malformed_input_is_normal() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["abc", "80", "98", "97", "120", "80"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "Normal\n");
}

#[test]
fn five_args_is_usage_error() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["70", "150", "104.2", "85", "180"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: missing args"));
    assert!(stderr.contains("Usage:"));
}

#[test]
fn model_class_index_two_is_critical() {
    let sandbox = Sandbox::new();
    write_constant_model(&sandbox.root.join("model.bin"));
    let output = sandbox.run(&["30", "80", "98.6", "98", "120", "80"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "Critical\n");
}

#[test]
fn corrupt_model_falls_back() {
    let sandbox = Sandbox::new();
    std::fs::write(sandbox.root.join("model.bin"), b"not a model").unwrap();
    let output = sandbox.run(&["30", "80", "98.6", "98", "120", "80"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "Normal\n");
}

#[test]
fn malformed_forest_falls_back() {
    for (left, right) in [(7u8, 7u8), (0, 0)] {
        let sandbox = Sandbox::new();
        let mut bytes = vec![1, 0, 0, 6, 3, 1, 1, 1, 0];
        bytes.extend_from_slice(&0.0f64.to_le_bytes());
        bytes.extend_from_slice(&[left, right]);
        std::fs::write(sandbox.root.join("model.bin"), bytes).unwrap();

        let output = sandbox.run(&["70", "150", "104.2", "85", "180", "100"]);
        assert!(output.status.success());
        assert_eq!(stdout(&output), "Critical\n");
    }
}

#[test]
fn debug_logging_stays_off_stdout() {
    let sandbox = Sandbox::new();
    write_constant_model(&sandbox.root.join("model.bin"));

    let output = sandbox.run_with(&["30", "80", "98.6", "98", "120", "80"], "debug");
    assert!(output.status.success());
    assert_eq!(stdout(&output), "Critical\n");
    assert!(!output.stderr.is_empty());

    let output = sandbox.run_with(&["abc", "80", "98", "97", "120", "80"], "trace");
    assert_eq!(stdout(&output), "Normal\n");
    assert!(!output.stderr.is_empty());
}
