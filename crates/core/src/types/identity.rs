//! Requester identity and ownership scoping.
//!
//! A requester is either an authenticated member (identified by the external
//! identity provider) or an anonymous browser session. Cart holds and queue
//! reservations are owned by exactly one of the two, so every query that
//! touches them is scoped by an [`OwnershipKey`].

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::id::MemberId;

/// The identity making a shop request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Requester {
    /// An authenticated member.
    Member { id: MemberId },
    /// An anonymous session, identified by a per-session UUID.
    Anonymous { id: Uuid },
}

/// Fixed ownership predicate value for consumable/reservation queries.
///
/// Exactly one side is set. Queries bind both columns unconditionally
/// (`member_id = $a OR session_id = $b`); the absent side binds SQL NULL,
/// which can never match a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnershipKey {
    pub member_id: Option<MemberId>,
    pub session_id: Option<Uuid>,
}

impl Requester {
    /// Resolve this identity to the ownership key used in queries.
    #[must_use]
    pub const fn ownership(&self) -> OwnershipKey {
        match *self {
            Self::Member { id } => OwnershipKey {
                member_id: Some(id),
                session_id: None,
            },
            Self::Anonymous { id } => OwnershipKey {
                member_id: None,
                session_id: Some(id),
            },
        }
    }

    /// Whether this requester is an authenticated member.
    #[must_use]
    pub const fn is_member(&self) -> bool {
        matches!(self, Self::Member { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_ownership_key() {
        let requester = Requester::Member {
            id: MemberId::new(5),
        };
        let key = requester.ownership();
        assert_eq!(key.member_id, Some(MemberId::new(5)));
        assert_eq!(key.session_id, None);
        assert!(requester.is_member());
    }

    #[test]
    fn test_anonymous_ownership_key() {
        let session = Uuid::new_v4();
        let requester = Requester::Anonymous { id: session };
        let key = requester.ownership();
        assert_eq!(key.member_id, None);
        assert_eq!(key.session_id, Some(session));
        assert!(!requester.is_member());
    }

    #[test]
    fn test_requester_serde_roundtrip() {
        let requester = Requester::Member {
            id: MemberId::new(9),
        };
        let json = serde_json::to_string(&requester).expect("serialize");
        let back: Requester = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, requester);
    }
}
