//! Task group visibility.
//!
//! A group is visible to a user when it is a default group or the user owns
//! it. Suggestions inherit visibility from their group. Both group listing and
//! candidate selection render their filters from [`Visibility`] so the rule
//! lives in exactly one place.

use sqlx::{QueryBuilder, Sqlite};

/// Which task groups a requester may see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Visibility {
    /// Anonymous requester: shared groups only.
    DefaultOnly,
    /// Shared groups plus the ones owned by this user ID.
    DefaultOrOwnedBy(String),
}

impl Visibility {
    /// Build the visibility for an optionally resolved user.
    pub fn for_user(user_id: Option<&str>) -> Self {
        match user_id {
            Some(id) => Visibility::DefaultOrOwnedBy(id.to_string()),
            None => Visibility::DefaultOnly,
        }
    }

    /// Append the SQL predicate for a `task_groups` table aliased as `alias`.
    pub(crate) fn push_predicate(&self, qb: &mut QueryBuilder<'_, Sqlite>, alias: &str) {
        match self {
            Visibility::DefaultOnly => {
                qb.push(format!("{alias}.is_default = 1"));
            }
            Visibility::DefaultOrOwnedBy(user_id) => {
                qb.push(format!("({alias}.is_default = 1 OR {alias}.user_id = "));
                qb.push_bind(user_id.clone());
                qb.push(")");
            }
        }
    }
}

/// Candidate set for drawing a suggestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateScope {
    /// Exactly one group, regardless of who asks.
    Group(String),
    /// Every group the requester can see.
    Visible(Visibility),
}

impl CandidateScope {
    /// An explicit group wins; otherwise fall back to the requester's visibility.
    pub fn new(group_id: Option<&str>, user_id: Option<&str>) -> Self {
        match group_id {
            Some(id) => CandidateScope::Group(id.to_string()),
            None => CandidateScope::Visible(Visibility::for_user(user_id)),
        }
    }

    /// Append the SQL predicate restricting a `suggestions` table aliased as `alias`.
    pub(crate) fn push_predicate(&self, qb: &mut QueryBuilder<'_, Sqlite>, alias: &str) {
        match self {
            CandidateScope::Group(group_id) => {
                qb.push(format!("{alias}.group_id = "));
                qb.push_bind(group_id.clone());
            }
            CandidateScope::Visible(visibility) => {
                qb.push(format!(
                    "{alias}.group_id IN (SELECT g.id FROM task_groups g WHERE "
                ));
                visibility.push_predicate(qb, "g");
                qb.push(")");
            }
        }
    }
}
