//! Hyper HTTP client configuration for upstream subscription fetches.
//!
//! Connection pool settings:
//! - Max idle connections per host: 32
//! - Max idle connection duration: 90s
//! - Connection timeout: 3s
//! - TCP keep-alive: 30s
//! - TCP_NODELAY: enabled

use http_body_util::combinators::BoxBody;
use hyper::body::Bytes;
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::connect::dns::GaiResolver;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use std::time::Duration;
use tracing::warn;

pub const CONNS_PER_HOST: usize = 32;
pub const MAX_IDLE_CONN_DURATION: Duration = Duration::from_secs(90);
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(3);
pub const TCP_KEEPALIVE: Duration = Duration::from_secs(30);

pub type HyperClient =
    Client<HttpsConnector<HttpConnector<GaiResolver>>, BoxBody<Bytes, hyper::Error>>;

/// Creates a Hyper HTTP client able to reach both `http` and `https` origins.
///
/// Redirects are not followed; a redirect status is a non-200 response.
/// Falls back to the bundled webpki roots when the system store is unusable.
pub fn create_client() -> HyperClient {
    let mut http_connector = HttpConnector::new_with_resolver(GaiResolver::new());
    http_connector.set_nodelay(true);
    http_connector.set_keepalive(Some(TCP_KEEPALIVE));
    http_connector.set_connect_timeout(Some(CONNECT_TIMEOUT));
    http_connector.enforce_http(false);

    let roots = match hyper_rustls::HttpsConnectorBuilder::new().with_native_roots() {
        Ok(builder) => builder,
        Err(e) => {
            warn!(
                component = "http_client",
                event = "native_roots_unavailable",
                error = %e,
                "using bundled webpki roots"
            );
            hyper_rustls::HttpsConnectorBuilder::new().with_webpki_roots()
        }
    };

    let tls = roots
        .https_or_http()
        .enable_http1()
        .enable_http2()
        .wrap_connector(http_connector);

    Client::builder(TokioExecutor::new())
        .pool_idle_timeout(MAX_IDLE_CONN_DURATION)
        .pool_max_idle_per_host(CONNS_PER_HOST)
        .build(tls)
}
