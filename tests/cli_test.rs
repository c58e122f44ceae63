//! CLI contract tests
//!
//! Run the `seo` binary against a throwaway local HTTP server.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::path::Path;
use std::process::Command;

fn seo_bin() -> String {
    env!("CARGO_BIN_EXE_seo").to_string()
}

/// Serve `body` with status 200 for every request, return the base URL
fn serve(body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    std::thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { continue };
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            loop {
                let mut line = String::new();
                match reader.read_line(&mut line) {
                    Ok(0) | Err(_) => break,
                    Ok(_) if line == "\r\n" => break,
                    Ok(_) => {}
                }
            }
            let head = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            let _ = stream.write_all(head.as_bytes());
            let _ = stream.write_all(body.as_bytes());
        }
    });

    format!("http://127.0.0.1:{}/", port)
}

fn run_seo(dir: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(seo_bin())
        .args(args)
        .current_dir(dir)
        .env_remove("SEO_CONFIG")
        .env_remove("RUST_LOG")
        .output()
        .unwrap();
    (
        output.status.code().unwrap_or(-1),
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
    )
}

const PAGE: &str = r#"<html lang="en"><head><title>Home</title></head>
<body><p>Short page</p></body></html>"#;

#[test]
fn check_url_prints_score_then_done() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("seo.toml"),
        "checks = [\"response-status\", \"meta-title\", \"meta-lang\"]\n",
    )
    .unwrap();
    let url = serve(PAGE);

    let (code, stdout, stderr) = run_seo(dir.path(), &["check-url", &url]);
    assert_eq!(code, 0, "stderr: {}", stderr);
    assert_eq!(stdout, format!("{} - 100%\nDone!\n", url));
}

#[test]
fn check_url_json_output() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("seo.toml"),
        "checks = [\"meta-title\", \"content-length\"]\n",
    )
    .unwrap();
    let url = serve(PAGE);

    let (code, stdout, _) = run_seo(dir.path(), &["check-url", &url, "--format", "json"]);
    assert_eq!(code, 0);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["url"], url.as_str());
    assert_eq!(json["checks"].as_array().unwrap().len(), 2);
    assert_eq!(json["checks"][1]["id"], "content-length");
    assert_eq!(json["checks"][1]["result"], false);
}

#[test]
fn check_url_unreachable_host_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_seo(dir.path(), &["check-url", "http://127.0.0.1:9/"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("Failed to fetch"), "stderr: {}", stderr);
}

#[test]
fn init_then_checks_lists_all_builtin_checks() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, _) = run_seo(dir.path(), &["init"]);
    assert_eq!(code, 0);
    assert!(dir.path().join("seo.toml").exists());

    let (code, stdout, _) = run_seo(dir.path(), &["checks"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("response-status"));
    assert!(stdout.contains("15 active check(s)"));

    let (code, _, _) = run_seo(dir.path(), &["init"]);
    assert_ne!(code, 0, "init must not overwrite without --force");
}

#[test]
fn queued_scan_reports_every_url() {
    let dir = tempfile::tempdir().unwrap();
    let url = serve(PAGE);
    std::fs::write(
        dir.path().join("seo.toml"),
        format!("checks = [\"meta-title\"]\nurls = [\"{}\"]\n", url),
    )
    .unwrap();

    let (code, stdout, stderr) = run_seo(dir.path(), &["scan", "--queued"]);
    assert_eq!(code, 0, "stderr: {}", stderr);
    assert!(stdout.contains(&format!("{} - 100%", url)));
    assert!(stdout.contains("Scanned 1 page(s)"));
}
