use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use ::tokio::sync::Mutex;

pub use ::reqwest::{Error, IntoUrl, Response};

/// HTTP client that keeps at least `min_interval` between consecutive requests.
#[derive(Clone)]
pub struct Client {
    inner: ::reqwest::Client,
    min_interval: Duration,
    last_request_at: Arc<Mutex<Option<Instant>>>,
}

impl Client {
    const USER_AGENT: &str = "Mozilla/5.0";

    pub fn new(min_interval: Duration) -> Result<Self, Error> {
        let inner = ::reqwest::Client::builder()
            .user_agent(Self::USER_AGENT)
            .gzip(true)
            .build()?;
        Ok(Self {
            inner,
            min_interval,
            last_request_at: Arc::new(Mutex::new(None)),
        })
    }

    pub async fn get(&self, u: impl IntoUrl) -> Result<Response, Error> {
        let req = self.inner.get(u).build()?;

        let mut last = self.last_request_at.lock().await;
        if let Some(at) = *last {
            let since = at.elapsed();
            if since < self.min_interval {
                ::tokio::time::sleep(self.min_interval - since).await;
            }
        }
        log::debug!("GET {}", req.url());
        let resp = self.inner.execute(req).await;
        *last = Some(Instant::now());
        resp
    }
}
