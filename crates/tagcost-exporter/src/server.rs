//! Metrics HTTP server
//!
//! Serves `GET /metrics` with the Prometheus text exposition of one live
//! scrape. Every request runs the full fetch-and-normalize pipeline; a
//! failed fetch fails the scrape visibly with 502 instead of reporting
//! stale or empty data as success.

use bytes::Bytes;
use http_body_util::Full;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tagcost_core::error::{ExporterError, Result};
use tagcost_core::{pipeline, render_samples, CostSource, ExporterConfig};
use tokio::net::TcpListener;
use tracing::{debug, error, info};

/// Content type of the Prometheus text exposition
const EXPOSITION_CONTENT_TYPE: &str = "text/plain; version=0.0.4";

/// Scrape-triggered metrics server
#[derive(Clone)]
pub struct MetricsServer {
    config: Arc<ExporterConfig>,
    source: Arc<dyn CostSource>,
}

impl MetricsServer {
    /// Create a server over a cost source
    pub fn new(config: Arc<ExporterConfig>, source: Arc<dyn CostSource>) -> Self {
        Self { config, source }
    }

    /// Accept connections until the task is cancelled
    pub async fn run(&self) -> Result<()> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.port));
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ExporterError::Config(format!("failed to bind {}: {}", addr, e)))?;

        info!(addr = %addr, "Metrics endpoint listening");

        loop {
            let (stream, remote_addr) = match listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    error!("Accept failed: {}", e);
                    continue;
                }
            };

            let io = TokioIo::new(stream);
            let server = self.clone();

            tokio::spawn(async move {
                let service = service_fn(move |req: Request<hyper::body::Incoming>| {
                    let server = server.clone();
                    async move {
                        debug!(
                            method = %req.method(),
                            path = %req.uri().path(),
                            remote = %remote_addr,
                            "Handling request"
                        );
                        Ok::<_, Infallible>(
                            server.respond(req.method(), req.uri().path()).await,
                        )
                    }
                });

                if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                    error!("Connection error: {:?}", err);
                }
            });
        }
    }

    /// Route one request
    pub async fn respond(&self, method: &Method, path: &str) -> Response<Full<Bytes>> {
        if method != Method::GET {
            return plain(StatusCode::METHOD_NOT_ALLOWED, "method not allowed\n");
        }

        match path {
            "/metrics" => match self.scrape().await {
                Ok(body) => Response::builder()
                    .status(StatusCode::OK)
                    .header("Content-Type", EXPOSITION_CONTENT_TYPE)
                    .body(Full::new(Bytes::from(body)))
                    .unwrap(),
                Err(err) => {
                    error!(error = %err, "Scrape failed");
                    plain(StatusCode::BAD_GATEWAY, format!("scrape failed: {}\n", err))
                }
            },
            "/" => plain(
                StatusCode::OK,
                "tagcost exporter - metrics at /metrics\n",
            ),
            _ => plain(StatusCode::NOT_FOUND, "not found\n"),
        }
    }

    /// Run one live scrape and render it
    async fn scrape(&self) -> Result<String> {
        let records = pipeline::collect_records(self.source.as_ref(), &self.config).await?;
        render_samples(&records, &self.config.label_names())
    }
}

fn plain(status: StatusCode, body: impl Into<Bytes>) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("Content-Type", "text/plain; charset=utf-8")
        .body(Full::new(body.into()))
        .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use http_body_util::BodyExt;
    use tagcost_core::record::{RawGroup, TimeBucket};
    use tagcost_core::window::PollWindow;

    struct FixedSource {
        buckets: Vec<TimeBucket>,
    }

    #[async_trait]
    impl CostSource for FixedSource {
        async fn fetch(&self, _: &PollWindow, _: &[String]) -> Result<Vec<TimeBucket>> {
            Ok(self.buckets.clone())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl CostSource for FailingSource {
        async fn fetch(&self, _: &PollWindow, _: &[String]) -> Result<Vec<TimeBucket>> {
            Err(ExporterError::Fetch("expired credentials".to_string()))
        }
    }

    fn server(source: Arc<dyn CostSource>, dims: &[&str]) -> MetricsServer {
        let config =
            ExporterConfig::new(dims.iter().map(|d| d.to_string()).collect(), 9150).unwrap();
        MetricsServer::new(Arc::new(config), source)
    }

    async fn body_text(response: Response<Full<Bytes>>) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_metrics_scrape_renders_samples() {
        let source = Arc::new(FixedSource {
            buckets: vec![TimeBucket::new(vec![RawGroup::new(
                vec!["Product$web".to_string(), "App$checkout".to_string()],
                "12.3456",
            )])],
        });
        let response = server(source, &["Product", "App"])
            .respond(&Method::GET, "/metrics")
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("aws_project_cost"));
        assert!(body.contains("product=\"web\""));
        assert!(body.contains("app=\"checkout\""));
        assert!(body.contains("12.3456"));
    }

    #[tokio::test]
    async fn test_metrics_scrape_empty_response() {
        let source = Arc::new(FixedSource { buckets: vec![] });
        let response = server(source, &["Name"]).respond(&Method::GET, "/metrics").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(!body_text(response).await.contains("aws_project_cost{"));
    }

    #[tokio::test]
    async fn test_fetch_failure_fails_the_scrape() {
        let response = server(Arc::new(FailingSource), &["Name"])
            .respond(&Method::GET, "/metrics")
            .await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert!(body_text(response).await.contains("expired credentials"));
    }

    #[tokio::test]
    async fn test_landing_page_and_unknown_path() {
        let source = Arc::new(FixedSource { buckets: vec![] });
        let server = server(source, &["Name"]);

        let landing = server.respond(&Method::GET, "/").await;
        assert_eq!(landing.status(), StatusCode::OK);
        assert!(body_text(landing).await.contains("/metrics"));

        let missing = server.respond(&Method::GET, "/costs").await;
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_non_get_rejected() {
        let source = Arc::new(FixedSource { buckets: vec![] });
        let response = server(source, &["Name"]).respond(&Method::POST, "/metrics").await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
