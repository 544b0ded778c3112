//! Approximate user-identity resolution.
//!
//! Upstream user tables contain near-duplicate records for the same person.
//! [`cluster_users()`] partitions the table with a greedy single pass: each
//! unclustered record seeds a cluster and absorbs every later unclustered
//! record that agrees with the seed on at least [`MATCH_THRESHOLD`] of the
//! four identity fields. The pass is deliberately order-dependent and
//! non-transitive — matches are judged against the seed only, and a record
//! absorbed earlier is never re-examined. The full pairwise scan is quadratic
//! in the number of users, which bounds practical input size.

use log::debug;

/// One row of the user table after sentinel scrubbing. Absent fields never
/// participate in matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub name: Option<String>,
}

/// Minimum number of agreeing identity fields for two records to be treated
/// as the same person.
pub const MATCH_THRESHOLD: usize = 3;

/// Counts the identity fields on which both records are defined and equal.
pub fn match_score(left: &UserRecord, right: &UserRecord) -> usize {
    [
        field_matches(&left.email, &right.email),
        field_matches(&left.phone, &right.phone),
        field_matches(&left.address, &right.address),
        field_matches(&left.name, &right.name),
    ]
    .into_iter()
    .filter(|matched| *matched)
    .count()
}

/// Partitions `users` into identity clusters, preserving table order.
///
/// Every user id lands in exactly one cluster; the cluster count is reported
/// downstream as the unique-user count.
pub fn cluster_users(users: &[UserRecord]) -> Vec<Vec<String>> {
    let mut used = vec![false; users.len()];
    let mut clusters = Vec::new();
    for seed_idx in 0..users.len() {
        if used[seed_idx] {
            continue;
        }
        used[seed_idx] = true;
        let seed = &users[seed_idx];
        let mut members = vec![seed.id.clone()];
        for candidate_idx in seed_idx + 1..users.len() {
            if used[candidate_idx] {
                continue;
            }
            if match_score(seed, &users[candidate_idx]) >= MATCH_THRESHOLD {
                used[candidate_idx] = true;
                members.push(users[candidate_idx].id.clone());
            }
        }
        clusters.push(members);
    }
    debug!(
        "Resolved {} user record(s) into {} cluster(s)",
        users.len(),
        clusters.len()
    );
    clusters
}

fn field_matches(left: &Option<String>, right: &Option<String>) -> bool {
    matches!((left, right), (Some(l), Some(r)) if l == r)
}
