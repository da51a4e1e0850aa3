// End-to-end tests for `bbase import`, `bbase recompute` and `bbase dedup`.
// Run with: cargo test -p brokerbase-cli --test import_cli

use std::path::Path;
use std::process::{Command, Output};

fn bbase(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_bbase"))
        .current_dir(dir)
        .args(args)
        .output()
        .expect("spawn bbase")
}

fn write(dir: &Path, name: &str, content: &str) {
    std::fs::write(dir.join(name), content).unwrap();
}

const CONFIG: &str = r#"
graph = "graph.json"
sheet = "export.csv"
delimiter = ";"
"#;

const SHEET: &str = "\
Kedja;Företag;Org.nr;Förnamn;Efternamn;E-post;Kundstatus;Licens;Månadspris
LF;LF Uppsala;556677-8899;Anna;Berg;anna@lf.se;kund;aktiv;849
LF;LF Uppsala;;Bo;Ek;bo@lf.se;kund;;849
;;;Glenn;Hed;;;;
";

fn graph_json(dir: &Path) -> serde_json::Value {
    let data = std::fs::read_to_string(dir.join("graph.json")).unwrap();
    serde_json::from_str(&data).unwrap()
}

#[test]
fn validate_then_run_then_rerun() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "import.toml", CONFIG);
    write(dir.path(), "export.csv", SHEET);

    let out = bbase(dir.path(), &["import", "validate", "import.toml"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("runnable: yes"));

    let out = bbase(dir.path(), &["import", "run", "import.toml", "--json"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let report: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(report["summary"]["created_brands"], 1);
    assert_eq!(report["summary"]["created_companies"], 1);
    assert_eq!(report["summary"]["created_agents"], 2);
    assert_eq!(report["summary"]["skipped_rows"], 1);

    let graph = graph_json(dir.path());
    assert_eq!(graph["companies"][0]["org_number"], "5566778899");
    assert_eq!(graph["companies"][0]["status"], "customer");

    // Second pass over the same sheet must be a no-op.
    let out = bbase(dir.path(), &["import", "run", "import.toml", "--json"]);
    assert!(out.status.success());
    let report: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(report["summary"]["created_companies"], 0);
    assert_eq!(report["summary"]["created_agents"], 0);
    assert_eq!(report["summary"]["updated_companies"], 0);
    assert_eq!(report["summary"]["updated_agents"], 0);
}

#[test]
fn dry_run_leaves_no_graph_behind() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "import.toml", CONFIG);
    write(dir.path(), "export.csv", SHEET);

    let out = bbase(dir.path(), &["import", "run", "import.toml", "--dry-run"]);
    assert!(out.status.success());
    assert!(!dir.path().join("graph.json").exists());
}

#[test]
fn unrunnable_mapping_exits_3() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "import.toml", CONFIG);
    write(dir.path(), "export.csv", "Ort;E-post\nUppsala;x@y.se\n");

    let out = bbase(dir.path(), &["import", "validate", "import.toml"]);
    assert_eq!(out.status.code(), Some(3));

    let out = bbase(dir.path(), &["import", "run", "import.toml"]);
    assert_eq!(out.status.code(), Some(3));
    assert!(!dir.path().join("graph.json").exists());
}

#[test]
fn mapping_override_rescues_odd_headers() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "import.toml",
        r#"
graph = "graph.json"
sheet = "export.csv"

[mapping]
company = "Objekt"
full_name = "Ansvarig"
"#,
    );
    write(dir.path(), "export.csv", "Objekt,Ansvarig\nLF Uppsala,Anna Berg\n");

    let out = bbase(dir.path(), &["import", "run", "import.toml"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let graph = graph_json(dir.path());
    assert_eq!(graph["agents"][0]["first_name"], "Anna");
    assert_eq!(graph["agents"][0]["last_name"], "Berg");
}

#[test]
fn bad_config_exits_4() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "import.toml", "graph = 3\n");

    let out = bbase(dir.path(), &["import", "run", "import.toml"]);
    assert_eq!(out.status.code(), Some(4));
}

#[test]
fn recompute_seeds_segments_and_reports() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "import.toml", CONFIG);
    write(dir.path(), "export.csv", SHEET);
    bbase(dir.path(), &["import", "run", "import.toml"]);

    let out = bbase(dir.path(), &["recompute", "graph.json", "--json"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let report: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(report["migration"]["segments_seeded"], 2);

    let graph = graph_json(dir.path());
    assert_eq!(graph["segments"].as_array().unwrap().len(), 2);
}

#[test]
fn dedup_lists_cross_company_duplicates() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "import.toml", CONFIG);
    write(
        dir.path(),
        "export.csv",
        "\
Kedja;Företag;Org.nr;Förnamn;Efternamn;E-post;Kundstatus;Licens;Månadspris
LF;Kontor A;;Anna;Berg;anna@lf.se;;;
LF;Kontor B;;Anna;Berg-Ek;anna@lf.se;;;
",
    );
    bbase(dir.path(), &["import", "run", "import.toml"]);

    // The second row resolves to the same agent by email, so the stored
    // graph holds one record; dedup over it finds no duplicates.
    let out = bbase(dir.path(), &["dedup", "graph.json", "--json", "--all"]);
    assert!(out.status.success());
    let people: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(people.as_array().unwrap().len(), 1);
    assert_eq!(people[0]["key"], "anna@lf.se");
}
