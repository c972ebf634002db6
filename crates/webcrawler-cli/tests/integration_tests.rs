use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::cargo;
use httpmock::prelude::*;
use rstest::rstest;
use tempfile::TempDir;

fn serve_site(server: &MockServer) {
    server.mock(|when, then| {
        when.method(GET).path("/index.html");
        then.status(200).header("content-type", "text/html").body(
            r#"<html><body>
                <p>Rust crab rust</p>
                <a href="/about.html">about</a>
                <a href="/manual.pdf">manual</a>
            </body></html>"#,
        );
    });
    server.mock(|when, then| {
        when.method(GET).path("/about.html");
        then.status(200)
            .header("content-type", "text/html")
            .body("<html><body><p>the crab is rust</p></body></html>");
    });
}

fn write_config(dir: &Path, config: serde_json::Value) -> PathBuf {
    let path = dir.join("crawl.json");
    fs::write(&path, config.to_string()).unwrap();
    path
}

#[test]
fn test_crawl_appends_result_and_profile() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start();
    serve_site(&server);
    let dir = TempDir::new()?;
    let result_path = dir.path().join("result.json");
    let profile_path = dir.path().join("profile.txt");
    let config = write_config(
        dir.path(),
        serde_json::json!({
            "startPages": [server.url("/index.html")],
            "ignoredUrls": [".*\\.pdf"],
            "ignoredWords": ["^.{1,3}$"],
            "parallelism": 2,
            "maxDepth": 2,
            "timeoutSeconds": 30,
            "popularWordCount": 2,
            "resultPath": result_path,
            "profileOutputPath": profile_path,
        }),
    );

    for _ in 0..2 {
        cargo::cargo_bin_cmd!("webcrawler")
            .arg(&config)
            .assert()
            .success()
            .code(0);
    }

    let results = fs::read_to_string(&result_path)?;
    let lines = results.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 2);
    for line in lines {
        let result: serde_json::Value = serde_json::from_str(line)?;
        assert_eq!(result["urlsVisited"], 2);
        assert_eq!(result["wordCounts"]["rust"], 3);
        assert_eq!(result["wordCounts"]["crab"], 2);
        assert!(result["wordCounts"].get("the").is_none());
    }

    let profile = fs::read_to_string(&profile_path)?;
    assert_eq!(profile.matches("Run at ").count(), 2);
    assert!(profile.contains("#crawl took "));
    assert!(profile.contains("#parse took "));
    assert!(!profile.contains("#max_parallelism"));
    Ok(())
}

#[test]
fn test_crawl_writes_to_stdout_without_output_paths() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start();
    serve_site(&server);
    let dir = TempDir::new()?;
    let config = write_config(
        dir.path(),
        serde_json::json!({
            "startPages": [server.url("/index.html")],
            "maxDepth": 1,
            "timeoutSeconds": 30,
            "popularWordCount": 1,
        }),
    );

    let output = cargo::cargo_bin_cmd!("webcrawler")
        .env("RUST_LOG", "info")
        .arg(&config)
        .assert()
        .success()
        .get_output()
        .clone();
    let stdout = String::from_utf8(output.stdout)?;
    let stderr = String::from_utf8(output.stderr)?;

    assert!(stderr.contains("Loading crawl configuration from"));
    assert!(stderr.contains("worker thread(s) for 1 start page(s)"));

    let mut lines = stdout.lines();
    assert_eq!(lines.next(), Some(r#"{"wordCounts":{"rust":2},"urlsVisited":1}"#));
    assert!(lines.next().is_some_and(|line| line.starts_with("Run at ")));
    Ok(())
}

#[rstest]
#[case::missing_file(None)]
#[case::invalid_json(Some("{ not json"))]
#[case::invalid_pattern(Some(r#"{"ignoredUrls": ["["]}"#))]
fn test_invalid_config_fails(
    #[case] content: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let config = dir.path().join("crawl.json");
    if let Some(content) = content {
        fs::write(&config, content)?;
    }

    cargo::cargo_bin_cmd!("webcrawler")
        .arg(&config)
        .assert()
        .failure();
    Ok(())
}
