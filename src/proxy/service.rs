use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

use super::ProxyError;
use crate::access::{AccessResolver, AuthError};
use crate::config::Config;
use crate::http::render::{project, Projection};
use crate::metrics::Meter;
use crate::model::{CacheKey, CacheRecord};
use crate::singleflight::{FetchCoordinator, FetchError, Origin};
use crate::upstream::Upstream;

/// Serves one subscription document per request.
///
/// A request is authenticated, mapped to exactly one subscription, and then
/// answered from the cache. A missing or expired record is refilled from
/// upstream by a single owner per cache key.
pub struct SubscribeProxy {
    resolver: AccessResolver,
    coordinator: Arc<FetchCoordinator>,
    upstream: Arc<dyn Upstream>,
    meter: Arc<dyn Meter>,
}

impl SubscribeProxy {
    pub fn new(
        cfg: Arc<Config>,
        coordinator: Arc<FetchCoordinator>,
        upstream: Arc<dyn Upstream>,
        meter: Arc<dyn Meter>,
    ) -> Self {
        Self {
            resolver: AccessResolver::new(cfg),
            coordinator,
            upstream,
            meter,
        }
    }

    /// Returns the projected document for `token` and the requested `group`
    /// (empty for the user's default group).
    pub async fn serve(&self, token: &str, group: &str) -> Result<Projection, ProxyError> {
        let user = match self.resolver.authenticate(token) {
            Ok(user) => user,
            Err(e) => {
                warn!(component = "proxy", event = "invalid_token", "rejected request with invalid token");
                self.meter.record_invalid_token(token);
                return Err(e.into());
            }
        };

        let group_name = self.resolver.effective_group(user, group);
        let selection = match self.resolver.select(user, group) {
            Ok(selection) => selection,
            Err(e) => {
                if let AuthError::Forbidden { reason, .. } = &e {
                    warn!(
                        component = "proxy",
                        event = "forbidden",
                        user = %user.name,
                        group = %group_name,
                        reason = %reason,
                        "no subscription selected"
                    );
                }
                self.meter.record_user_subscribe(&user.name, group_name, "");
                return Err(e.into());
            }
        };

        let group = selection.group;
        let subscribe = selection.subscribe;
        self.meter
            .record_user_subscribe(&user.name, &group.name, &subscribe.name);

        let key = CacheKey::new(&group.name, &subscribe.name);
        let fill = {
            let store = self.coordinator.store().clone();
            let upstream = self.upstream.clone();
            let meter = self.meter.clone();
            let key = key.clone();
            let url = subscribe.url.clone();
            let headers = group.request_headers.clone();
            let group_name = group.name.clone();
            let subscribe_name = subscribe.name.clone();

            move || async move {
                meter.record_cache_update(&group_name, &subscribe_name);

                let response = upstream.fetch(&url, &headers).await?;
                let record = CacheRecord::from_response(
                    response.headers,
                    response.body,
                    CacheRecord::expiry_from(Utc::now()),
                );
                store.write(&key, &record).await?;

                meter.record_cache_update_success(&group_name, &subscribe_name);
                Ok::<_, FetchError>(record)
            }
        };

        let obtained = match self.coordinator.obtain_fresh(&key, fill).await {
            Ok(obtained) => obtained,
            Err(e) => {
                warn!(
                    component = "proxy",
                    event = "unavailable",
                    key = %key,
                    error = %e,
                    "failed to obtain subscription"
                );
                return Err(e.into());
            }
        };

        if obtained.origin != Origin::Cache {
            info!(
                component = "proxy",
                event = "served",
                key = %key,
                origin = ?obtained.origin,
                bytes = obtained.record.body.len(),
                "served refreshed subscription"
            );
        }

        Ok(project(&obtained.record, &group.pass_response_headers))
    }
}
