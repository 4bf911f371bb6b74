//! Integration tests for the fluxcsv CLI

use std::io::Write;
use std::process::{Command, Stdio};

use tempfile::NamedTempFile;

const RESPONSE: &str = "\
#datatype,string,long,dateTime:RFC3339,double,string,string
#group,false,false,false,false,true,true
#default,_result,,,,,
,result,table,_time,_value,_field,_measurement
,,0,2020-02-18T10:34:08.135814545Z,1.4,f,test
,,0,2020-02-18T22:08:44.850214724Z,6.6,f,test
,,1,2020-02-18T22:11:32.225467895Z,1122.45,g,test
";

fn run_fluxcsv(args: &[&str]) -> (String, String, bool) {
    let output = Command::new(env!("CARGO_BIN_EXE_fluxcsv"))
        .args(args)
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

fn run_with_stdin(args: &[&str], input: &str) -> (String, String, bool) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_fluxcsv"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn command");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

fn response_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_cli_help() {
    let (stdout, _, success) = run_fluxcsv(&["--help"]);

    assert!(success);
    assert!(stdout.contains("fluxcsv"));
    assert!(stdout.contains("--output"));
    assert!(stdout.contains("--no-min-widths"));
    assert!(stdout.contains("--verbose"));
}

#[test]
fn test_cli_version() {
    let (stdout, _, success) = run_fluxcsv(&["--version"]);

    assert!(success);
    assert!(stdout.contains("fluxcsv"));
}

#[test]
fn test_table_output() {
    let file = response_file(RESPONSE);
    let (stdout, stderr, success) = run_fluxcsv(&[file.path().to_str().unwrap()]);

    assert!(success, "{stderr}");
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "Result: _result");
    assert_eq!(lines[1], "Table: keys: [_field, _measurement]");
    assert!(lines[2].contains("_field:string"));
    assert!(lines[2].contains("_time:time"));
    assert!(lines[2].trim_end().ends_with("_value:float"));
    assert!(stdout.contains("2020-02-18T10:34:08.135814545Z"));
    assert_eq!(stdout.matches("Result: ").count(), 1);
    assert_eq!(stdout.matches("Table: ").count(), 2);
}

#[test]
fn test_table_from_stdin() {
    let (stdout, _, success) = run_with_stdin(&["-"], RESPONSE);

    assert!(success);
    assert!(stdout.starts_with("Result: _result\n"));
    assert!(stdout.contains("1122.45"));
}

#[test]
fn test_no_min_widths() {
    let input = "#datatype,string,long,double\n,result,table,_value1\n,_result,0,12345\n";
    let (stdout, _, success) = run_with_stdin(&["--no-min-widths"], input);

    assert!(success);
    assert_eq!(
        stdout,
        "Result: _result\nTable: keys: []\n_value1:float\n-------------\n        12345\n"
    );
}

#[test]
fn test_raw_output() {
    let file = response_file(RESPONSE);
    let (stdout, _, success) = run_fluxcsv(&[file.path().to_str().unwrap(), "--output", "raw"]);

    assert!(success);
    assert_eq!(stdout, RESPONSE);
}

#[test]
fn test_json_output() {
    let file = response_file(RESPONSE);
    let (stdout, _, success) = run_fluxcsv(&[file.path().to_str().unwrap(), "-o", "json"]);

    assert!(success);
    let records: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).expect("Invalid JSON line"))
        .collect();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0]["result"], "_result");
    assert_eq!(records[2]["table"], 1);
    assert_eq!(records[2]["values"]["_value"], 1122.45);
    assert_eq!(records[0]["values"]["_field"], "f");
}

#[test]
fn test_query_error_exits_nonzero() {
    let input = "#datatype,string,long\n,error,reference\n,boom,42\n";
    let (stdout, stderr, success) = run_with_stdin(&[], input);

    assert!(!success);
    assert!(stdout.is_empty());
    assert!(stderr.contains("Error:"));
    assert!(stderr.contains("boom,42"));
}

#[test]
fn test_parse_error_keeps_earlier_output() {
    let input = "#datatype,string,long,long\n,result,table,v\n,,0,1\n,,0,oops\n";
    let (stdout, stderr, success) = run_with_stdin(&["--no-min-widths"], input);

    assert!(!success);
    assert!(stdout.contains("v:int"));
    assert!(stderr.contains("Error:"));
    assert!(stderr.contains("oops"));
}

#[test]
fn test_missing_file() {
    let (_, stderr, success) = run_fluxcsv(&["/nonexistent/response.csv"]);

    assert!(!success);
    assert!(stderr.contains("Error:"));
    assert!(stderr.contains("cannot open /nonexistent/response.csv"));
}

#[test]
fn test_verbose_logs_to_stderr() {
    let (stdout, stderr, success) = run_with_stdin(&["-v"], RESPONSE);

    assert!(success);
    assert!(stdout.starts_with("Result: "));
    assert!(stderr.contains("table schema finalized"));
}
