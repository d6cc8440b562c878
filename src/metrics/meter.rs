// Metric name constants
pub const INVALID_TOKEN_REQUESTS_TOTAL: &str = "invalid_token_requests_total";
pub const USER_SUBSCRIBE_REQUESTS_TOTAL: &str = "user_subscribe_requests_total";
pub const CACHE_UPDATE_REQUESTS_TOTAL: &str = "cache_update_requests_total";
pub const CACHE_UPDATE_SUCCESS_TOTAL: &str = "cache_update_success_total";

// Label names
pub const LABEL_TOKEN: &str = "token";
pub const LABEL_USERNAME: &str = "username";
pub const LABEL_SUBSCRIBE_GROUP: &str = "subscribe_group";
pub const LABEL_SUBSCRIBE_NAME: &str = "subscribe_name";

/// Counters recorded along the subscribe request path.
///
/// Kept behind a trait so the proxy can be exercised with a recording
/// double; the production implementation writes to the global recorder.
pub trait Meter: Send + Sync {
    /// A request arrived with a missing or unknown token.
    fn record_invalid_token(&self, token: &str);

    /// An authenticated user asked for a group. `subscribe` is empty when
    /// the request was denied before a subscription was selected.
    fn record_user_subscribe(&self, username: &str, group: &str, subscribe: &str);

    /// A cache fill for (group, subscribe) is starting.
    fn record_cache_update(&self, group: &str, subscribe: &str);

    /// A cache fill for (group, subscribe) persisted a fresh record.
    fn record_cache_update_success(&self, group: &str, subscribe: &str);
}

/// Meter backed by the `metrics` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrometheusMeter;

impl PrometheusMeter {
    pub fn new() -> Self {
        Self
    }
}

impl Meter for PrometheusMeter {
    fn record_invalid_token(&self, token: &str) {
        metrics::counter!(INVALID_TOKEN_REQUESTS_TOTAL, LABEL_TOKEN => token.to_string()).increment(1);
    }

    fn record_user_subscribe(&self, username: &str, group: &str, subscribe: &str) {
        metrics::counter!(
            USER_SUBSCRIBE_REQUESTS_TOTAL,
            LABEL_USERNAME => username.to_string(),
            LABEL_SUBSCRIBE_GROUP => group.to_string(),
            LABEL_SUBSCRIBE_NAME => subscribe.to_string()
        )
        .increment(1);
    }

    fn record_cache_update(&self, group: &str, subscribe: &str) {
        metrics::counter!(
            CACHE_UPDATE_REQUESTS_TOTAL,
            LABEL_SUBSCRIBE_GROUP => group.to_string(),
            LABEL_SUBSCRIBE_NAME => subscribe.to_string()
        )
        .increment(1);
    }

    fn record_cache_update_success(&self, group: &str, subscribe: &str) {
        metrics::counter!(
            CACHE_UPDATE_SUCCESS_TOTAL,
            LABEL_SUBSCRIBE_GROUP => group.to_string(),
            LABEL_SUBSCRIBE_NAME => subscribe.to_string()
        )
        .increment(1);
    }
}
