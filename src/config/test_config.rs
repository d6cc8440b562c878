use super::{Config, Logs, RequestHeader, Subscribe, SubscribeGroup, User, UserSubscribeGroup};
use std::path::Path;
use std::time::Duration;

/// Creates a configuration with a fixed set of users and groups whose
/// subscriptions point at `upstream_base` (e.g. "http://127.0.0.1:9000").
///
/// - alice (`tok1`): group `news` permits `[a, b]`, default group `news`;
///   group `sport` permits `[zzz]`, which the group does not contain.
/// - bob (`tok2`): group `sport` permits `[football]`, no default group.
pub fn new_test_config(cache_dir: &Path, upstream_base: &str) -> Config {
    let subscribe = |name: &str| Subscribe {
        name: name.to_string(),
        url: format!("{}/{}", upstream_base, name),
    };

    Config {
        env: Some(super::TEST.to_string()),
        logs: Some(Logs {
            level: Some("debug".to_string()),
        }),
        port: "0".to_string(),
        context_path: "/api".to_string(),
        cache_dir: cache_dir.to_path_buf(),
        cors_origin: "https://dash.example.com".to_string(),
        wait_timeout: Some(Duration::from_secs(10)),
        request_timeout: Some(Duration::from_secs(30)),
        upstream: Some(super::Upstream {
            timeout: Some(Duration::from_secs(5)),
            max_body_size: Some(1 << 20),
        }),
        users: vec![
            User {
                name: "alice".to_string(),
                token: "tok1".to_string(),
                default_subscribe_group: Some("news".to_string()),
                subscribe_groups: vec![
                    UserSubscribeGroup {
                        name: "news".to_string(),
                        subscribes: vec!["a".to_string(), "b".to_string()],
                    },
                    UserSubscribeGroup {
                        name: "sport".to_string(),
                        subscribes: vec!["zzz".to_string()],
                    },
                ],
            },
            User {
                name: "bob".to_string(),
                token: "tok2".to_string(),
                default_subscribe_group: None,
                subscribe_groups: vec![UserSubscribeGroup {
                    name: "sport".to_string(),
                    subscribes: vec!["football".to_string()],
                }],
            },
        ],
        subscribe_groups: vec![
            SubscribeGroup {
                name: "news".to_string(),
                request_headers: vec![RequestHeader {
                    name: "User-Agent".to_string(),
                    value: "subproxy-test".to_string(),
                }],
                pass_response_headers: vec![
                    "Subscription-Userinfo".to_string(),
                    "Content-Disposition".to_string(),
                ],
                subscribes: vec![subscribe("a"), subscribe("b"), subscribe("c")],
            },
            SubscribeGroup {
                name: "sport".to_string(),
                request_headers: Vec::new(),
                pass_response_headers: Vec::new(),
                subscribes: vec![subscribe("football")],
            },
        ],
        users_by_token: Default::default(),
        groups_by_name: Default::default(),
    }
    .prepare()
    .expect("test config is valid")
}
