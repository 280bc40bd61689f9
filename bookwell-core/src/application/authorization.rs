//! Listing authorization.
//!
//! Every decision about which jobs a caller may list is made by
//! [`select_listing`]. It is a pure function of the caller and the requested
//! filter; services consume the returned [`ListingScope`] and never compare
//! roles themselves.

use crate::domain::{Caller, JobFilter, JobQuery, JobScope, UserId};

pub const DEFAULT_PER_PAGE: u32 = 15;
pub const MAX_PER_PAGE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingPolicy {
    /// When set, a regular caller passing another user's id gets no result.
    pub restrict_target_to_self: bool,
    pub default_per_page: u32,
}

impl Default for ListingPolicy {
    fn default() -> Self {
        Self {
            restrict_target_to_self: false,
            default_per_page: DEFAULT_PER_PAGE,
        }
    }
}

/// Permitted listing query for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingScope {
    /// Jobs of one user, as customer or translator.
    Owner(UserId),
    /// Every job.
    All,
    /// No listing is produced. Not an error.
    Nothing,
}

pub fn select_listing(caller: &Caller, filter: &JobFilter, policy: &ListingPolicy) -> ListingScope {
    if caller.role.is_administrative() {
        return ListingScope::All;
    }

    match filter.user_id {
        Some(target) if policy.restrict_target_to_self && target != caller.id => {
            ListingScope::Nothing
        }
        Some(target) => ListingScope::Owner(target),
        None => ListingScope::Nothing,
    }
}

impl ListingScope {
    /// Shape the scope into a repository query using the filter's status and
    /// paging options. `Nothing` yields no query at all.
    pub fn into_query(self, filter: &JobFilter, policy: &ListingPolicy) -> Option<JobQuery> {
        let scope = match self {
            ListingScope::Owner(user) => JobScope::Involving(user),
            ListingScope::All => JobScope::All,
            ListingScope::Nothing => return None,
        };

        let per_page = filter
            .per_page
            .filter(|n| *n > 0)
            .unwrap_or(policy.default_per_page)
            .min(MAX_PER_PAGE);
        let page = filter.page.filter(|n| *n > 0).unwrap_or(1);

        Some(JobQuery {
            scope,
            status: filter
                .status
                .as_ref()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            limit: i64::from(per_page),
            offset: i64::from(page - 1) * i64::from(per_page),
        })
    }
}
