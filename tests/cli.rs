use std::fs;
use std::process::Command;

use tempfile::tempdir;

const MAP: &str = "1 rs1 0 1000\n1 rs2 0 2000\n";
const PED: &str = "\
F1 C1 0 0 1 2 A A C C
F2 C2 0 0 2 2 A G C T
F3 K1 0 0 1 1 A G C C
F4 K2 0 0 2 1 G G T C
";

fn write_inputs(dir: &std::path::Path) -> (std::path::PathBuf, std::path::PathBuf) {
    let map_path = dir.join("cohort.map");
    let ped_path = dir.join("cohort.ped");
    fs::write(&map_path, MAP).expect("write map");
    fs::write(&ped_path, PED).expect("write ped");
    (ped_path, map_path)
}

#[test]
fn cli_writes_one_report_row_per_marker() {
    let tmp = tempdir().expect("temporary directory");
    let (ped_path, map_path) = write_inputs(tmp.path());
    let out_path = tmp.path().join("results").join("cohort.assoc");

    let exe = env!("CARGO_BIN_EXE_gwas");
    let status = Command::new(exe)
        .args([
            ped_path.to_str().expect("path str"),
            map_path.to_str().expect("path str"),
            "--output",
            out_path.to_str().expect("path str"),
            "--assay",
        ])
        .status()
        .expect("run gwas cli");
    assert!(status.success(), "CLI exited with status {status:?}");

    let report = fs::read_to_string(&out_path).expect("report written");
    let lines: Vec<&str> = report.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "ID\tCHR\tPOS\tOR\tRR\tCHISQ\tP\tP_ADJ");
    assert!(lines[1].starts_with("rs1\t1\t1000\t9.000000\t"));
    assert!(lines[2].starts_with("rs2\t1\t2000\t"));
}

#[test]
fn cli_skips_testing_for_unimplemented_model() {
    let tmp = tempdir().expect("temporary directory");
    let (ped_path, map_path) = write_inputs(tmp.path());
    let out_path = tmp.path().join("cohort.assoc");

    let exe = env!("CARGO_BIN_EXE_gwas");
    let status = Command::new(exe)
        .args([
            ped_path.to_str().expect("path str"),
            map_path.to_str().expect("path str"),
            "-o",
            out_path.to_str().expect("path str"),
            "--model",
            "recessive",
        ])
        .status()
        .expect("run gwas cli");
    assert!(status.success(), "CLI exited with status {status:?}");

    let report = fs::read_to_string(&out_path).expect("report written");
    for line in report.lines().skip(1) {
        assert!(line.ends_with("NA\tNA\tNA\tNA\tNA"), "unexpected row: {line}");
    }
}

#[test]
fn cli_reads_configuration_file() {
    let tmp = tempdir().expect("temporary directory");
    let (ped_path, map_path) = write_inputs(tmp.path());
    let config_path = tmp.path().join("gwas.toml");
    fs::write(&config_path, "alpha = 0.5\nmissing_phenotype = \"exclude\"\n").expect("write config");

    let exe = env!("CARGO_BIN_EXE_gwas");
    let output = Command::new(exe)
        .args([
            ped_path.to_str().expect("path str"),
            map_path.to_str().expect("path str"),
            "--config",
            config_path.to_str().expect("path str"),
        ])
        .output()
        .expect("run gwas cli");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).expect("utf-8 report");
    assert_eq!(stdout.lines().count(), 3);
}

#[test]
fn cli_rejects_invalid_alpha() {
    let tmp = tempdir().expect("temporary directory");
    let (ped_path, map_path) = write_inputs(tmp.path());

    let exe = env!("CARGO_BIN_EXE_gwas");
    let status = Command::new(exe)
        .args([
            ped_path.to_str().expect("path str"),
            map_path.to_str().expect("path str"),
            "--alpha",
            "2",
        ])
        .status()
        .expect("run gwas cli");
    assert!(!status.success());
}

#[test]
fn cli_fails_on_truncated_genotype_row() {
    let tmp = tempdir().expect("temporary directory");
    let (ped_path, map_path) = write_inputs(tmp.path());
    fs::write(&ped_path, "F1 C1 0 0 1 2 A A C\n").expect("write ped");

    let exe = env!("CARGO_BIN_EXE_gwas");
    let status = Command::new(exe)
        .args([
            ped_path.to_str().expect("path str"),
            map_path.to_str().expect("path str"),
        ])
        .status()
        .expect("run gwas cli");
    assert!(!status.success());
}
