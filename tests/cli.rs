use std::io::Write;
use std::process::{Command, Output, Stdio};

use tempfile::NamedTempFile;

fn ac(args: &[&str], stdin: Option<&str>) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_ac"))
        .args(args)
        .env_remove("AC_DEFAULT_OPTIONS")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("failed to spawn ac");
    {
        let mut pipe = child.stdin.take().expect("stdin is piped");
        if let Some(input) = stdin {
            pipe.write_all(input.as_bytes()).expect("failed to write stdin");
        }
    }
    child.wait_with_output().expect("failed to wait for ac")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

#[test]
fn filter_from_stdin() {
    let out = ac(&["--filter", "AP"], Some("Apple\nBanana\nApricot\n"));
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(stdout(&out), "Apple\nApricot\n");
}

#[test]
fn filter_caps_rows() {
    let out = ac(&["-f", "a", "-n", "2"], Some("a1\na2\na3\n"));
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(stdout(&out), "a1\na2\n");
}

#[test]
fn filter_without_match() {
    let out = ac(&["--filter", "zz"], Some("Apple\n"));
    assert_eq!(out.status.code(), Some(1));
    assert_eq!(stdout(&out), "");
}

#[test]
fn filter_empty_query_lists_everything() {
    let out = ac(&["--filter", "", "-n", "10"], Some("Apple\nBanana\n"));
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(stdout(&out), "Apple\nBanana\n");
}

#[test]
fn filter_from_source_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "Pineapple\r\nGrape\n\nPear").unwrap();
    let path = file.path().to_str().unwrap();

    let out = ac(&["--source", path, "--filter", "ap"], None);
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(stdout(&out), "Pineapple\nGrape\n");
}

#[test]
fn missing_source_fails() {
    let out = ac(&["--source", "/this/file/does/not/exist", "--filter", "a"], None);
    assert_eq!(out.status.code(), Some(2));
}
