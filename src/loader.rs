use std::fmt;
use std::path::PathBuf;
use std::sync::mpsc;

use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::model::{Restaurant, RestaurantFile};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Server responded with status {0}")]
    Status(u16),
    #[error("Malformed restaurant data: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Where the dataset comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Path(PathBuf),
    Url(String),
}

impl DataSource {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.starts_with("http://") || raw.starts_with("https://") {
            DataSource::Url(raw.to_string())
        } else {
            DataSource::Path(PathBuf::from(raw))
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Path(p) => write!(f, "{}", p.display()),
            DataSource::Url(u) => f.write_str(u),
        }
    }
}

/// Fetch and decode the dataset once. No retry and no timeout.
pub async fn load_dataset(
    source: &DataSource,
    client: &reqwest::Client,
) -> Result<Vec<Restaurant>, LoadError> {
    let body = match source {
        DataSource::Path(path) => {
            debug!(path = %path.display(), "reading restaurant data");
            tokio::fs::read(path).await.map_err(|source| LoadError::Io {
                path: path.clone(),
                source,
            })?
        }
        DataSource::Url(url) => {
            debug!(url = %url, "fetching restaurant data");
            let resp = client.get(url).send().await?;
            let status = resp.status();
            if !status.is_success() {
                return Err(LoadError::Status(status.as_u16()));
            }
            resp.bytes().await?.to_vec()
        }
    };
    let file: RestaurantFile = serde_json::from_slice(&body)?;
    info!(count = file.restaurants.len(), source = %source, "loaded restaurants");
    Ok(file.restaurants)
}

pub type LoadResult = Result<Vec<Restaurant>, LoadError>;

/// Start the one-shot load on the runtime and hand back its task.
pub fn spawn_load_task(source: DataSource, client: reqwest::Client) -> JoinHandle<LoadResult> {
    tokio::spawn(async move { load_dataset(&source, &client).await })
}

/// Start the one-shot load on the runtime; the result arrives on the returned inbox.
pub fn spawn_loader(source: DataSource, client: reqwest::Client) -> mpsc::Receiver<LoadResult> {
    let (tx, rx) = mpsc::channel();
    tokio::spawn(async move {
        let result = load_dataset(&source, &client).await;
        if tx.send(result).is_err() {
            debug!("loader inbox closed before the dataset arrived");
        }
    });
    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use httptest::{Expectation, Server, matchers::*, responders::*};
    use std::fs;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"{"restaurants":[
        {"name":"Tony's Pizza","type":"Restaurant","cuisine":"Italian","address":"1 Main St","lat":40.0,"lon":-73.0},
        {"name":"Bean There","type":"Cafe","cuisine":"Coffee","address":"2 Elm St","lat":40.1,"lon":-73.1}
    ]}"#;

    #[test]
    fn test_data_source_parse() {
        assert_eq!(
            DataSource::parse("restaurants.json"),
            DataSource::Path(PathBuf::from("restaurants.json"))
        );
        assert_eq!(
            DataSource::parse(" https://example.com/r.json "),
            DataSource::Url("https://example.com/r.json".into())
        );
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("restaurants.json");
        fs::write(&path, SAMPLE).unwrap();

        let rows = load_dataset(&DataSource::Path(path), &reqwest::Client::new())
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].name, "Bean There");
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = load_dataset(
            &DataSource::Path(dir.path().join("nope.json")),
            &reqwest::Client::new(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[tokio::test]
    async fn test_load_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("restaurants.json");
        fs::write(&path, "{\"restaurants\": 3}").unwrap();
        let err = load_dataset(&DataSource::Path(path), &reqwest::Client::new())
            .await
            .unwrap_err();
        assert!(matches!(err, LoadError::Parse(_)));
    }

    #[tokio::test]
    async fn test_load_over_http() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/restaurants.json"))
                .respond_with(status_code(200).body(SAMPLE)),
        );
        let url = server.url_str("/restaurants.json");
        let rows = load_dataset(&DataSource::Url(url), &reqwest::Client::new())
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    async fn test_load_http_error_status() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/restaurants.json"))
                .respond_with(status_code(404)),
        );
        let url = server.url_str("/restaurants.json");
        let err = load_dataset(&DataSource::Url(url), &reqwest::Client::new())
            .await
            .unwrap_err();
        assert!(matches!(err, LoadError::Status(404)));
    }

    #[tokio::test]
    async fn test_spawn_loader_delivers_result() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("restaurants.json");
        fs::write(&path, SAMPLE).unwrap();

        let rx = spawn_loader(DataSource::Path(path), reqwest::Client::new());
        let result = tokio::task::spawn_blocking(move || rx.recv().unwrap())
            .await
            .unwrap();
        assert_eq!(result.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_spawn_load_task_reports_failure() {
        let dir = TempDir::new().unwrap();
        let task = spawn_load_task(
            DataSource::Path(dir.path().join("missing.json")),
            reqwest::Client::new(),
        );
        let err = task.await.unwrap().unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
