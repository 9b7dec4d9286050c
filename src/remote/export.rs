//! CSV download. This is a plain file download, so it bypasses `RequestClient`.

use super::SimulationApi;
use crate::model::SimId;
use anyhow::{bail, Context, Result};
use bytes::Bytes;
use reqwest::header::CONTENT_DISPOSITION;
use std::path::{Path, PathBuf};
use tracing::info;

/// Download the CSV export of a run into `dir` and return the written path.
pub async fn download_csv(
    api: &SimulationApi,
    id: SimId,
    mode: &str,
    dir: &Path,
) -> Result<PathBuf> {
    let url = api.export_url(id);
    let resp = api
        .client()
        .http
        .get(&url)
        .send()
        .await
        .with_context(|| format!("GET {url}"))?;

    if !resp.status().is_success() {
        bail!("server answered {}", resp.status());
    }

    let file_name = resp
        .headers()
        .get(CONTENT_DISPOSITION)
        .and_then(|v| v.to_str().ok())
        .and_then(attachment_file_name)
        .unwrap_or_else(|| fallback_file_name(id, mode));
    let bytes: Bytes = resp.bytes().await.context("read export body")?;

    let path = dir.join(file_name);
    let target = path.clone();
    tokio::task::spawn_blocking(move || std::fs::write(&target, &bytes))
        .await
        .context("export writer task failed")?
        .with_context(|| format!("write {}", path.display()))?;

    info!(%id, path = %path.display(), "exported csv");
    Ok(path)
}

/// `sim-{id}-{mode}.csv`, with anything outside `[A-Za-z0-9_-]` in the mode dropped.
fn fallback_file_name(id: SimId, mode: &str) -> String {
    let mode: String = mode
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    format!("sim-{}-{}.csv", id.0, mode)
}

/// Extract `filename="..."` from a Content-Disposition value, refusing path separators.
fn attachment_file_name(header: &str) -> Option<String> {
    let raw = header
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))?;
    let name = raw.trim_matches('"');
    if name.is_empty() || name.contains('/') || name.contains('\\') || name == ".." {
        return None;
    }
    Some(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::RequestClient;

    #[test]
    fn parses_attachment_file_name() {
        assert_eq!(
            attachment_file_name(r#"attachment; filename="sim-3-single.csv""#).as_deref(),
            Some("sim-3-single.csv")
        );
        assert_eq!(attachment_file_name("attachment"), None);
        assert_eq!(attachment_file_name(r#"attachment; filename="../x.csv""#), None);
    }

    #[test]
    fn fallback_name_strips_path_characters_from_mode() {
        assert_eq!(fallback_file_name(SimId(4), "league4"), "sim-4-league4.csv");
        assert_eq!(fallback_file_name(SimId(4), "../cup"), "sim-4-cup.csv");
    }

    #[tokio::test]
    async fn writes_export_into_directory() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/simulations/3/export.csv")
            .with_status(200)
            .with_header("content-type", "text/csv; charset=utf-8")
            .with_header("content-disposition", r#"attachment; filename="sim-3-single.csv""#)
            .with_body("Category,Home Team,Away Team\n")
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let api =
            SimulationApi::with_client(RequestClient::new(reqwest::Client::new(), &server.url()));
        let path = download_csv(&api, SimId(3), "single", dir.path())
            .await
            .unwrap();

        assert_eq!(path, dir.path().join("sim-3-single.csv"));
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("Category,"));
    }

    #[tokio::test]
    async fn failed_export_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/simulations/1/export.csv")
            .with_status(400)
            .with_body(r#"{"error":"Simulation has not run yet"}"#)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let api =
            SimulationApi::with_client(RequestClient::new(reqwest::Client::new(), &server.url()));
        assert!(download_csv(&api, SimId(1), "single", dir.path())
            .await
            .is_err());
    }
}
