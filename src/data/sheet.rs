//! Sales sheet sources: a published CSV URL or a local export.

use std::path::PathBuf;
use std::time::Duration;

use log::info;
use reqwest::blocking::Client;

use crate::error::AppError;
use crate::io::ingest::read_csv_file;

/// Environment variable holding the published CSV URL (also read from `.env`).
pub const SHEET_URL_ENV: &str = "PIZZA_SHEET_URL";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

/// Where the sales table comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    File(PathBuf),
    Url(String),
}

impl DataSource {
    /// Resolve the source from explicit flags, then the environment.
    ///
    /// Returns `None` when nothing was configured (the caller may prompt).
    pub fn resolve(csv: Option<PathBuf>, url: Option<String>) -> Option<Self> {
        if let Some(path) = csv {
            return Some(DataSource::File(path));
        }
        if let Some(url) = url {
            return Some(DataSource::Url(url));
        }
        dotenvy::dotenv().ok();
        std::env::var(SHEET_URL_ENV)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(DataSource::Url)
    }

    pub fn describe(&self) -> String {
        match self {
            DataSource::File(path) => path.display().to_string(),
            DataSource::Url(url) => url.clone(),
        }
    }

    /// Load the raw CSV text.
    pub fn load(&self) -> Result<String, AppError> {
        match self {
            DataSource::File(path) => {
                info!("reading sales sheet from {}", path.display());
                read_csv_file(path)
            }
            DataSource::Url(url) => SheetClient::new()?.fetch_csv(url),
        }
    }
}

/// Blocking HTTP client for published spreadsheet exports.
pub struct SheetClient {
    client: Client,
}

impl SheetClient {
    pub fn new() -> Result<Self, AppError> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| AppError::transport(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Fetch the CSV body. Any network error or non-success status aborts the load.
    pub fn fetch_csv(&self, url: &str) -> Result<String, AppError> {
        info!("fetching sales sheet from {url}");
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| AppError::transport(format!("Sheet request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::transport(format!(
                "Sheet request failed with status {}.",
                resp.status()
            )));
        }

        let body = resp
            .text()
            .map_err(|e| AppError::transport(format!("Failed to read sheet response: {e}")))?;
        info!("fetched {} bytes", body.len());
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_flags_win_over_environment() {
        let src = DataSource::resolve(Some(PathBuf::from("ventas.csv")), Some("http://x".to_string()));
        assert_eq!(src, Some(DataSource::File(PathBuf::from("ventas.csv"))));

        let src = DataSource::resolve(None, Some("http://x".to_string()));
        assert_eq!(src, Some(DataSource::Url("http://x".to_string())));
    }

    #[test]
    fn missing_file_is_a_usage_error() {
        let err = DataSource::File(PathBuf::from("does/not/exist.csv")).load().unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    /// Serve one canned HTTP response on a local port and return its URL.
    fn serve_once(response: &'static str) -> String {
        use std::io::{Read, Write};
        use std::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 1024];
                let _ = stream.read(&mut buf);
                let _ = stream.write_all(response.as_bytes());
            }
        });
        format!("http://{addr}/sheet.csv")
    }

    #[test]
    fn server_error_is_a_transport_error() {
        let url = serve_once("HTTP/1.1 500 Internal Server Error\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
        let err = SheetClient::new().unwrap().fetch_csv(&url).unwrap_err();
        assert_eq!(err.exit_code(), 4);
        assert!(err.to_string().contains("500"));
    }

    #[test]
    fn success_returns_the_body() {
        let url = serve_once("HTTP/1.1 200 OK\r\nContent-Length: 27\r\nConnection: close\r\n\r\nFecha,Pizzas Vendidas\n1,2\n\n");
        let body = DataSource::Url(url).load().unwrap();
        assert!(body.starts_with("Fecha,Pizzas Vendidas\n"));
    }

    #[test]
    fn refused_connection_is_a_transport_error() {
        let addr = std::net::TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
        let err = SheetClient::new()
            .unwrap()
            .fetch_csv(&format!("http://{addr}/sheet.csv"))
            .unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }
}
