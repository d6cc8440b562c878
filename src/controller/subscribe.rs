//! Subscription endpoint.

use axum::{
    extract::Query,
    response::Response,
    routing::get,
    Router,
};
use std::sync::Arc;

use crate::http::render::renderer::{write_from_projection, write_status};
use crate::http::Controller;
use crate::proxy::SubscribeProxy;

pub const SUBSCRIBE_PATH: &str = "/subscribe";
pub const SUBSCRIBE_GET_PATH: &str = "/subscribe/get";

/// Query parameters of a subscribe request. Both may be absent.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SubscribeQuery {
    pub token: String,
    pub group: String,
}

impl SubscribeQuery {
    /// Picks `token` and `group` out of raw query pairs. The first occurrence
    /// of a repeated key wins, unknown keys are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut token = None;
        let mut group = None;
        for (key, value) in pairs {
            match key.as_str() {
                "token" if token.is_none() => token = Some(value),
                "group" if group.is_none() => group = Some(value),
                _ => {}
            }
        }

        Self {
            token: token.unwrap_or_default(),
            group: group.unwrap_or_default(),
        }
    }
}

/// Serves the selected subscription document on `/subscribe` and its
/// `/subscribe/get` alias.
///
/// Denied requests get a bare 403, fetch or cache failures a bare 500.
pub struct SubscribeController {
    proxy: Arc<SubscribeProxy>,
    paths: Vec<String>,
}

impl SubscribeController {
    /// Creates a controller serving the same handler on every path in `paths`.
    pub fn new(paths: Vec<String>, proxy: Arc<SubscribeProxy>) -> Self {
        Self { proxy, paths }
    }

    async fn handle(proxy: Arc<SubscribeProxy>, query: SubscribeQuery) -> Response {
        match proxy.serve(&query.token, &query.group).await {
            Ok(projection) => write_from_projection(projection),
            Err(e) => write_status(e.status()),
        }
    }
}

impl Controller for SubscribeController {
    fn add_route(&self, router: Router) -> Router {
        let proxy = self.proxy.clone();
        let handler = move |Query(pairs): Query<Vec<(String, String)>>| {
            let proxy = proxy.clone();
            async move { Self::handle(proxy, SubscribeQuery::from_pairs(pairs)).await }
        };

        self.paths
            .iter()
            .fold(router, |router, path| router.route(path, get(handler.clone())))
    }
}
