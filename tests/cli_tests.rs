//! End-to-end tests for the gene-match command-line interface.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const GENE_INFO: &str = "\
#tax_id\tGeneID\tSymbol\tLocusTag\tSynonyms
9606\t672\tBRCA1\t-\tBRCAI|BRCC1|IRIS
9606\t7157\tTP53\t-\tP53|LFS1
9606\t3308\tHSPA4\t-\theat shock protein 70|HSP70RY
";

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn gene_match() -> Command {
    Command::cargo_bin("gene-match").unwrap()
}

#[test]
fn test_resolve_two_column_reference() {
    let dir = TempDir::new().unwrap();
    let reference = write(dir.path(), "ref.tsv", "BRCA1-alpha\tGENE:BRCA1\nTP53\t7157\n");
    let queries = write(dir.path(), "queries.txt", "brca1 ALPHA\nzzz_not_present\n");

    gene_match()
        .arg("resolve")
        .arg("-r")
        .arg(&reference)
        .arg("-q")
        .arg(&queries)
        .assert()
        .success()
        .stdout(predicate::str::contains("brca1 ALPHA => GENE:BRCA1"))
        .stdout(predicate::str::contains("zzz_not_present").not());
}

#[test]
fn test_resolve_gene_info_synonyms_tsv_output() {
    let dir = TempDir::new().unwrap();
    let reference = write(dir.path(), "gene_info.tsv", GENE_INFO);
    let queries = write(dir.path(), "queries.txt", "IRIS\nShock Protein\n");

    gene_match()
        .args(["resolve", "--header", "--key-column", "2", "--key-column", "4"])
        .args(["--key-separator", "|", "--value-column", "1", "--show-strategy"])
        .arg("-r")
        .arg(&reference)
        .arg("-q")
        .arg(&queries)
        .args(["--format", "tsv"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("query\tvalue\tstrategy\n"))
        .stdout(predicate::str::contains("IRIS\t672\tdirect"))
        .stdout(predicate::str::contains("Shock Protein\t3308\texpanded_spans"));
}

#[test]
fn test_resolve_json_output_keeps_query_order() {
    let dir = TempDir::new().unwrap();
    let reference = write(
        dir.path(),
        "ref.json",
        r#"{"TP53": ["7157"], "BRCA1": ["672"], "kinase domain containing 1": ["X1"]}"#,
    );
    let queries = write(dir.path(), "queries.txt", "TP53\nkinasedomain\nbrca1\n");

    let output = gene_match()
        .args(["resolve", "--format", "json", "--sequential"])
        .arg("-r")
        .arg(&reference)
        .arg("-q")
        .arg(&queries)
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["TP53"], serde_json::json!(["7157"]));
    assert_eq!(json["kinasedomain"], serde_json::json!(["X1"]));
    assert_eq!(json["brca1"], serde_json::json!(["672"]));

    let tp53 = stdout.find("\"TP53\"").unwrap();
    let kinase = stdout.find("\"kinasedomain\"").unwrap();
    let brca1 = stdout.find("\"brca1\"").unwrap();
    assert!(tp53 < kinase && kinase < brca1);
}

#[test]
fn test_resolve_queries_from_stdin_and_column() {
    let dir = TempDir::new().unwrap();
    let reference = write(dir.path(), "ref.tsv", "TP53\t7157\n");

    gene_match()
        .args(["resolve", "-q", "-", "--query-column", "1", "--query-header"])
        .arg("-r")
        .arg(&reference)
        .write_stdin("pmid\tmention\n123\ttp53\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("tp53 => 7157"));
}

#[test]
fn test_resolve_reference_directory_with_pattern() {
    let dir = TempDir::new().unwrap();
    let refs = dir.path().join("refs");
    std::fs::create_dir(&refs).unwrap();
    write(&refs, "part_1.tsv", "symbol\tid\nTP53\t7157\n");
    write(&refs, "part_2.tsv", "symbol\tid\nBRCA1\t672\n");
    write(&refs, "notes.md", "TP53\tnot-a-value\n");
    let queries = write(dir.path(), "queries.txt", "TP53\nBRCA1\nsymbol\n");

    gene_match()
        .args(["resolve", "--header", "--pattern", r"part_\d+\.tsv"])
        .arg("-r")
        .arg(&refs)
        .arg("-q")
        .arg(&queries)
        .assert()
        .success()
        .stdout(predicate::str::contains("TP53 => 7157\n"))
        .stdout(predicate::str::contains("BRCA1 => 672"))
        .stdout(predicate::str::contains("not-a-value").not());
}

#[test]
fn test_resolve_capacity_error() {
    let dir = TempDir::new().unwrap();
    let reference = write(dir.path(), "ref.tsv", "heat shock protein 70\tHSP70\n");
    let queries = write(dir.path(), "queries.txt", "hsp70\n");

    gene_match()
        .args(["resolve", "--max-postings", "10"])
        .arg("-r")
        .arg(&reference)
        .arg("-q")
        .arg(&queries)
        .assert()
        .failure()
        .stderr(predicate::str::contains("capacity exceeded"));
}

#[test]
fn test_resolve_missing_query_file() {
    let dir = TempDir::new().unwrap();
    let reference = write(dir.path(), "ref.tsv", "TP53\t7157\n");

    gene_match()
        .arg("resolve")
        .arg("-r")
        .arg(&reference)
        .arg("-q")
        .arg(dir.path().join("missing.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read queries"));
}

#[test]
fn test_resolve_missing_reference_file() {
    let dir = TempDir::new().unwrap();
    let queries = write(dir.path(), "queries.txt", "TP53\n");

    gene_match()
        .arg("resolve")
        .arg("-r")
        .arg(dir.path().join("missing.tsv"))
        .arg("-q")
        .arg(&queries)
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Failed to load reference tables"));
}

#[test]
fn test_resolve_directory_skips_unreadable_tables() {
    let dir = TempDir::new().unwrap();
    let refs = dir.path().join("refs");
    std::fs::create_dir(&refs).unwrap();
    write(&refs, "good.tsv", "TP53\t7157\n");
    // Not valid gzip, so reading it fails
    write(&refs, "broken.tsv.gz", "TP53\tnot-gzip\n");
    let queries = write(dir.path(), "queries.txt", "TP53\n");

    gene_match()
        .arg("resolve")
        .arg("-r")
        .arg(&refs)
        .arg("-q")
        .arg(&queries)
        .assert()
        .success()
        .stdout("TP53 => 7157\n");
}

#[test]
fn test_normalize_command() {
    gene_match()
        .args(["normalize", "BRCA1-alpha", "HSP70-2", "heat_shock  protein"])
        .assert()
        .success()
        .stdout(predicate::str::contains("BRCA1-alpha => brca1\n"))
        .stdout(predicate::str::contains("HSP70-2 => hsp70\n"))
        .stdout(predicate::str::contains("heat_shock  protein => heat shock protein\n"));
}

#[test]
fn test_normalize_stdin_tsv() {
    gene_match()
        .args(["normalize", "-", "--format", "tsv"])
        .write_stdin("CYP2D6A\nkinase-b\n")
        .assert()
        .success()
        .stdout("raw\tnormalized\nCYP2D6A\tcyp2d6\nkinase-b\tkinase\n");
}

#[test]
fn test_stats_json() {
    let dir = TempDir::new().unwrap();
    let reference = write(dir.path(), "ref.tsv", "heat shock\tH\nalpha\tskipped\n");

    let output = gene_match()
        .args(["stats", "--format", "json"])
        .arg("-r")
        .arg(&reference)
        .output()
        .unwrap();
    assert!(output.status.success());

    let stats: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(stats["entries"], 1);
    assert_eq!(stats["skipped"], 1);
    assert_eq!(stats["expanded_keys"], 3);
    assert_eq!(stats["postings"], 24);
}

#[test]
fn test_verbose_does_not_change_results() {
    let dir = TempDir::new().unwrap();
    let reference = write(dir.path(), "ref.tsv", "TP53\t7157\nheat shock protein 70\tHSP70\n");
    let queries = write(dir.path(), "queries.txt", "tp53\nShock Protein\nxyz\n");

    let run = |verbose: bool| {
        let mut cmd = gene_match();
        cmd.arg("resolve").arg("-r").arg(&reference).arg("-q").arg(&queries);
        if verbose {
            cmd.arg("--verbose");
        }
        cmd.output().unwrap().stdout
    };

    assert_eq!(run(false), run(true));
}
