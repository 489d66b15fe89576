use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn taxo_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("taxo");
    path
}

struct TestEnv {
    _tmp: TempDir,
    root: PathBuf,
    config: PathBuf,
}

impl TestEnv {
    fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

fn setup_test_env() -> TestEnv {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let config_dir = root.join("config");
    fs::create_dir_all(&config_dir).unwrap();
    let config_path = config_dir.join("taxo.toml");
    fs::write(
        &config_path,
        r#"[scoring]
top_k = 3

[embedding]
provider = "hash"
dims = 128
"#,
    )
    .unwrap();

    fs::write(
        root.join("corpus.json"),
        r#"[
  {"id": "p1", "content": "Smart parking sensors report parking bay occupancy in the city centre.", "assigned_classes": ["Mobility"]},
  {"id": "p2", "content": "Parking occupancy and traffic flow counts from road side units.", "assigned_classes": ["Mobility"]},
  {"id": "e1", "content": "Air quality stations measure nitrogen dioxide and particulate matter.", "assigned_classes": ["Environment"]},
  {"id": "e2", "content": "Noise level monitoring and air quality readings near busy roads.", "assigned_classes": ["Environment", "Mobility"]},
  {"id": "w1", "content": "Weather station data with temperature, humidity and rainfall.", "core_classes": ["Environment"]}
]"#,
    )
    .unwrap();

    fs::write(root.join("taxonomy.json"), r#"["Mobility", "Environment"]"#).unwrap();

    TestEnv {
        _tmp: tmp,
        root,
        config: config_path,
    }
}

fn run_taxo(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = taxo_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .arg("--progress")
        .arg("off")
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run taxo binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

fn class_terms(result: &serde_json::Value, idx: usize) -> Vec<String> {
    result["classes"][idx]["terms"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["term"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn test_enrich_to_stdout() {
    let env = setup_test_env();
    let taxonomy = env.path("taxonomy.json");
    let corpus = env.path("corpus.json");

    let (stdout, stderr, success) = run_taxo(
        &env.config,
        &[
            "enrich",
            "--taxonomy",
            taxonomy.to_str().unwrap(),
            "--corpus",
            corpus.to_str().unwrap(),
        ],
    );
    assert!(success, "enrich failed: stdout={}, stderr={}", stdout, stderr);

    let result: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(result["model"], "fnv-hash");
    assert_eq!(result["classes"][0]["class_name"], "Mobility");
    assert_eq!(result["classes"][1]["class_name"], "Environment");
    for idx in 0..2 {
        let terms = class_terms(&result, idx);
        assert!(!terms.is_empty());
        assert!(terms.len() <= 3);
        let embeddings = result["classes"][idx]["term_embeddings"].as_array().unwrap();
        assert_eq!(embeddings.len(), terms.len());
        assert_eq!(embeddings[0].as_array().unwrap().len(), 128);
    }
}

#[test]
fn test_enrich_output_file_can_be_fed_back() {
    let env = setup_test_env();
    let taxonomy = env.path("taxonomy.json");
    let corpus = env.path("corpus.json");
    let first = env.path("out/first.json");
    let second = env.path("out/second.json");

    let (_, stderr, success) = run_taxo(
        &env.config,
        &[
            "enrich",
            "--taxonomy",
            taxonomy.to_str().unwrap(),
            "--corpus",
            corpus.to_str().unwrap(),
            "--output",
            first.to_str().unwrap(),
        ],
    );
    assert!(success, "first enrich failed: {}", stderr);
    assert!(stderr.contains("Wrote 2 classes"));

    let (_, stderr, success) = run_taxo(
        &env.config,
        &[
            "enrich",
            "--taxonomy",
            first.to_str().unwrap(),
            "--corpus",
            corpus.to_str().unwrap(),
            "--output",
            second.to_str().unwrap(),
        ],
    );
    assert!(success, "second enrich failed: {}", stderr);

    let a: serde_json::Value = serde_json::from_str(&fs::read_to_string(&first).unwrap()).unwrap();
    let b: serde_json::Value = serde_json::from_str(&fs::read_to_string(&second).unwrap()).unwrap();
    for idx in 0..2 {
        let before = class_terms(&a, idx);
        let after = class_terms(&b, idx);
        assert_eq!(&after[..before.len()], &before[..]);
    }
}

#[test]
fn test_unlabeled_document_fails() {
    let env = setup_test_env();
    let taxonomy = env.path("taxonomy.json");
    let corpus = env.path("bad_corpus.json");
    fs::write(
        &corpus,
        r#"[{"id": "orphan", "content": "bus timetable feed", "assigned_classes": []}]"#,
    )
    .unwrap();

    let (stdout, stderr, success) = run_taxo(
        &env.config,
        &[
            "enrich",
            "--taxonomy",
            taxonomy.to_str().unwrap(),
            "--corpus",
            corpus.to_str().unwrap(),
        ],
    );
    assert!(!success);
    assert!(stdout.is_empty());
    assert!(stderr.contains("Core classes for document orphan not defined"));
}

#[test]
fn test_score_prints_ranked_table() {
    let env = setup_test_env();
    let corpus = env.path("corpus.json");

    let (stdout, stderr, success) = run_taxo(
        &env.config,
        &["score", "Mobility", "--corpus", corpus.to_str().unwrap(), "--limit", "2"],
    );
    assert!(success, "score failed: {}", stderr);

    let lines: Vec<&str> = stdout.lines().collect();
    assert!(lines[0].contains("AFFINITY"));
    assert!(lines.len() >= 2 && lines.len() <= 3);
}

#[test]
fn test_score_unknown_class() {
    let env = setup_test_env();
    let corpus = env.path("corpus.json");

    let (stdout, _, success) = run_taxo(
        &env.config,
        &["score", "Energy", "--corpus", corpus.to_str().unwrap()],
    );
    assert!(success);
    assert!(stdout.contains("No candidates for class Energy"));
}

#[test]
fn test_candidates_lists_phrases() {
    let env = setup_test_env();
    let corpus = env.path("corpus.json");

    let (stdout, stderr, success) = run_taxo(
        &env.config,
        &["candidates", "Environment", "--corpus", corpus.to_str().unwrap()],
    );
    assert!(success, "candidates failed: {}", stderr);
    let count = stdout.lines().count();
    assert!(count >= 1 && count <= 5);
}

#[test]
fn test_invalid_config_rejected() {
    let env = setup_test_env();
    fs::write(&env.config, "[scoring]\ntop_k = 0\n").unwrap();
    let corpus = env.path("corpus.json");

    let (_, stderr, success) = run_taxo(
        &env.config,
        &["candidates", "Mobility", "--corpus", corpus.to_str().unwrap()],
    );
    assert!(!success);
    assert!(stderr.contains("top_k"));
}

#[test]
fn test_completions() {
    let env = setup_test_env();
    let (stdout, _, success) = run_taxo(&env.config, &["completions", "bash"]);
    assert!(success);
    assert!(stdout.contains("taxo"));
}
