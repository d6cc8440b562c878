//! Tests for the hyper-based upstream GET.
//! Verifies status handling, body limits, deadlines and request headers.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::config::RequestHeader;
    use crate::http::client::{create_client, HyperClient};
    use crate::support::upstream::default_body;
    use crate::support::{Behavior, UpstreamServer};
    use crate::upstream::backend_hyper_impl::make_get_request;
    use crate::upstream::UpstreamError;

    const LIMIT: usize = 1 << 20;

    fn client() -> HyperClient {
        create_client()
    }

    #[tokio::test]
    async fn test_ok_response_returns_body_and_headers() {
        let upstream = UpstreamServer::start().await;
        let url = format!("{}/a", upstream.base_url());

        let (status, headers, body) = make_get_request(
            &client(),
            &url,
            &[RequestHeader {
                name: "User-Agent".to_string(),
                value: "clash-verge/v2".to_string(),
            }],
            Duration::from_secs(3),
            LIMIT,
        )
        .await
        .unwrap();

        assert_eq!(status, 200);
        assert_eq!(body, default_body("/a").as_bytes());
        assert_eq!(headers["subscription-userinfo"], "upload=1; download=2; total=3");
        assert_eq!(
            upstream.last_header("/a", "user-agent").as_deref(),
            Some("clash-verge/v2")
        );

        upstream.close().await;
    }

    #[tokio::test]
    async fn test_non_ok_status_is_an_error() {
        let upstream = UpstreamServer::start().await;
        upstream.set("/a", Behavior::status(404));
        let url = format!("{}/a", upstream.base_url());

        let err = make_get_request(&client(), &url, &[], Duration::from_secs(3), LIMIT)
            .await
            .unwrap_err();

        assert!(matches!(err, UpstreamError::Status { status: 404, .. }), "{:?}", err);
        assert_eq!(err.status(), Some(404));

        upstream.close().await;
    }

    #[tokio::test]
    async fn test_body_over_limit_is_rejected() {
        let upstream = UpstreamServer::start().await;
        upstream.set("/a", Behavior::body(vec![b'x'; 4096]));
        let url = format!("{}/a", upstream.base_url());

        let err = make_get_request(&client(), &url, &[], Duration::from_secs(3), 1024)
            .await
            .unwrap_err();

        assert!(matches!(err, UpstreamError::BodyTooLarge { limit: 1024, .. }), "{:?}", err);

        upstream.close().await;
    }

    #[tokio::test]
    async fn test_slow_upstream_times_out() {
        let upstream = UpstreamServer::start().await;
        upstream.set("/a", Behavior::delayed(Duration::from_secs(2)));
        let url = format!("{}/a", upstream.base_url());

        let err = make_get_request(&client(), &url, &[], Duration::from_millis(100), LIMIT)
            .await
            .unwrap_err();

        assert!(matches!(err, UpstreamError::Timeout { .. }), "{:?}", err);

        upstream.close().await;
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        // Bind and drop to get a port nothing listens on.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let err = make_get_request(
            &client(),
            &format!("http://127.0.0.1:{}/a", port),
            &[],
            Duration::from_secs(3),
            LIMIT,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, UpstreamError::Transport { .. }), "{:?}", err);
    }

    #[tokio::test]
    async fn test_malformed_url_is_invalid_request() {
        let err = make_get_request(&client(), "http://bad host/", &[], Duration::from_secs(3), LIMIT)
            .await
            .unwrap_err();

        assert!(matches!(err, UpstreamError::InvalidRequest { .. }), "{:?}", err);
    }

    #[tokio::test]
    async fn test_invalid_header_value_is_invalid_request() {
        let err = make_get_request(
            &client(),
            "http://127.0.0.1:1/a",
            &[RequestHeader {
                name: "X-Bad".to_string(),
                value: "line\nbreak".to_string(),
            }],
            Duration::from_secs(3),
            LIMIT,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, UpstreamError::InvalidRequest { .. }), "{:?}", err);
    }
}
