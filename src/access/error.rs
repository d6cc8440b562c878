//! Access errors.

/// Denial reasons. Both variants are terminal for the request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("missing or unknown token")]
    Unauthenticated,
    #[error("user {user} may not access group {group:?}: {reason}")]
    Forbidden {
        user: String,
        group: String,
        reason: ForbiddenReason,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForbiddenReason {
    UnknownGroup,
    NoMembership,
    NothingPermitted,
}

impl std::fmt::Display for ForbiddenReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ForbiddenReason::UnknownGroup => "group not found",
            ForbiddenReason::NoMembership => "no membership",
            ForbiddenReason::NothingPermitted => "no permitted subscription in group",
        })
    }
}
