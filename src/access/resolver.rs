//! Resolves a caller's token and requested group to a single subscription.

use std::sync::Arc;
use tracing::debug;

use super::error::{AuthError, ForbiddenReason};
use crate::config::{Config, Subscribe, SubscribeGroup, User};

/// Authorized selection for one request.
#[derive(Debug, Clone, Copy)]
pub struct Selection<'a> {
    pub user: &'a User,
    pub group: &'a SubscribeGroup,
    pub subscribe: &'a Subscribe,
}

/// Looks users and groups up in the immutable configuration.
#[derive(Debug, Clone)]
pub struct AccessResolver {
    cfg: Arc<Config>,
}

impl AccessResolver {
    pub fn new(cfg: Arc<Config>) -> Self {
        Self { cfg }
    }

    /// Authenticates `token`.
    pub fn authenticate(&self, token: &str) -> Result<&User, AuthError> {
        if token.is_empty() {
            return Err(AuthError::Unauthenticated);
        }
        self.cfg
            .user_by_token(token)
            .ok_or(AuthError::Unauthenticated)
    }

    /// Group the user asked for, or its default group when none was given.
    pub fn effective_group<'a>(&self, user: &'a User, requested: &'a str) -> &'a str {
        if requested.is_empty() {
            user.default_subscribe_group.as_deref().unwrap_or("")
        } else {
            requested
        }
    }

    /// Authenticates `token` and selects the subscription to serve.
    ///
    /// The first subscription in group order that the user is permitted to
    /// read wins.
    pub fn resolve(&self, token: &str, requested_group: &str) -> Result<Selection<'_>, AuthError> {
        let user = self.authenticate(token)?;
        self.select(user, requested_group)
    }

    /// Selects the subscription for an already authenticated user.
    pub fn select<'a>(
        &'a self,
        user: &'a User,
        requested_group: &str,
    ) -> Result<Selection<'a>, AuthError> {
        let group_name = self.effective_group(user, requested_group);
        let forbidden = |reason| AuthError::Forbidden {
            user: user.name.clone(),
            group: group_name.to_string(),
            reason,
        };

        let group = self
            .cfg
            .group(group_name)
            .ok_or_else(|| forbidden(ForbiddenReason::UnknownGroup))?;

        let membership = user
            .membership(group_name)
            .ok_or_else(|| forbidden(ForbiddenReason::NoMembership))?;

        let subscribe = group
            .subscribes
            .iter()
            .find(|s| membership.subscribes.iter().any(|name| name == &s.name))
            .ok_or_else(|| forbidden(ForbiddenReason::NothingPermitted))?;

        debug!(
            component = "access",
            event = "selected",
            user = %user.name,
            group = %group.name,
            subscribe = %subscribe.name,
            "subscription selected"
        );

        Ok(Selection {
            user,
            group,
            subscribe,
        })
    }
}
