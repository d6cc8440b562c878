// Integration tests for subscription selection, caching and header forwarding.

use crate::support::upstream::default_body;
use crate::support::{get, ProxyServer, UpstreamServer};

#[tokio::test]
async fn test_default_group_serves_first_permitted_subscription() {
    let upstream = UpstreamServer::start().await;
    let proxy = ProxyServer::start(&upstream).await;

    let reply = get(&proxy.url("/subscribe?token=tok1")).await;

    assert_eq!(reply.status, 200);
    assert_eq!(reply.text(), default_body("/a"));
    assert_eq!(upstream.hits("/a"), 1);
    assert_eq!(upstream.total_hits(), 1);
    assert!(proxy.cache_file("news", "a").exists());

    proxy.stop().await;
    upstream.close().await;
}

#[tokio::test]
async fn test_projection_forwards_only_allowed_headers() {
    let upstream = UpstreamServer::start().await;
    let proxy = ProxyServer::start(&upstream).await;

    let reply = get(&proxy.url("/subscribe?token=tok1&group=news")).await;

    assert_eq!(reply.status, 200);
    assert_eq!(reply.header("content-type"), Some("text/yaml; charset=utf-8"));
    assert_eq!(
        reply.header("subscription-userinfo"),
        Some("upload=1; download=2; total=3")
    );
    assert_eq!(reply.header("content-disposition"), Some("attachment; filename=a"));
    assert_eq!(reply.header("x-upstream-secret"), None);

    // Group request headers reach the upstream.
    assert_eq!(
        upstream.last_header("/a", "user-agent").as_deref(),
        Some("subproxy-test")
    );

    upstream.close().await;
}

#[tokio::test]
async fn test_group_without_forwarding_keeps_only_content_type() {
    let upstream = UpstreamServer::start().await;
    let proxy = ProxyServer::start(&upstream).await;

    let reply = get(&proxy.url("/subscribe?token=tok2&group=sport")).await;

    assert_eq!(reply.status, 200);
    assert_eq!(reply.text(), default_body("/football"));
    assert_eq!(reply.header("content-type"), Some("text/yaml; charset=utf-8"));
    assert_eq!(reply.header("subscription-userinfo"), None);
    assert_eq!(reply.header("content-disposition"), None);

    upstream.close().await;
}

#[tokio::test]
async fn test_repeated_request_is_served_from_cache() {
    let upstream = UpstreamServer::start().await;
    let proxy = ProxyServer::start(&upstream).await;

    let first = get(&proxy.url("/subscribe?token=tok1")).await;
    let second = get(&proxy.url("/subscribe?token=tok1&group=news")).await;

    assert_eq!(first.status, 200);
    assert_eq!(second.status, 200);
    assert_eq!(first.body, second.body);
    assert_eq!(
        first.header("subscription-userinfo"),
        second.header("subscription-userinfo")
    );
    assert_eq!(upstream.hits("/a"), 1);

    upstream.close().await;
}

#[tokio::test]
async fn test_get_alias_shares_the_cache() {
    let upstream = UpstreamServer::start().await;
    let proxy = ProxyServer::start(&upstream).await;

    let plain = get(&proxy.url("/subscribe?token=tok1")).await;
    let alias = get(&proxy.url("/subscribe/get?token=tok1")).await;

    assert_eq!(alias.status, 200);
    assert_eq!(plain.body, alias.body);
    assert_eq!(upstream.hits("/a"), 1);

    upstream.close().await;
}

#[tokio::test]
async fn test_routes_live_under_root_context_path() {
    let upstream = UpstreamServer::start().await;
    let proxy = ProxyServer::start_with(&upstream, |cfg| cfg.context_path = String::new()).await;

    let reply = get(&proxy.url("/subscribe?token=tok1")).await;

    assert_eq!(reply.status, 200);
    assert_eq!(reply.text(), default_body("/a"));

    upstream.close().await;
}

#[tokio::test]
async fn test_repeated_parameters_use_first_value() {
    let upstream = UpstreamServer::start().await;
    let proxy = ProxyServer::start(&upstream).await;

    let reply = get(&proxy.url("/subscribe?token=tok1&token=x&group=news&group=news")).await;

    assert_eq!(reply.status, 200);
    assert_eq!(reply.text(), default_body("/a"));

    upstream.close().await;
}
