// Common test utilities for integration tests.

use std::time::Duration;

/// Response fields the cases assert on.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub headers: reqwest::header::HeaderMap,
    pub body: Vec<u8>,
}

impl Reply {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Makes a GET request and reads the whole response.
pub async fn get(url: &str) -> Reply {
    send(reqwest::Client::new().get(url)).await
}

/// Sends a prepared request and reads the whole response.
pub async fn send(request: reqwest::RequestBuilder) -> Reply {
    let resp = request
        .timeout(Duration::from_secs(10))
        .send()
        .await
        .unwrap();
    let status = resp.status().as_u16();
    let headers = resp.headers().clone();
    let body = resp.bytes().await.unwrap().to_vec();
    Reply {
        status,
        headers,
        body,
    }
}
