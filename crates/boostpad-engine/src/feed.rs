//! Task feed selector
//!
//! Read-only ranking of the tasks a user may complete. Candidates come from
//! one indexed query; per-user exclusions and band ordering are applied in
//! memory and re-derived per request - nothing here mutates any entity.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashSet;
use uuid::Uuid;

use boostpad_db::{DbFeedCandidate, DbTask};
use boostpad_types::{ActionType, DuplicateKey};

use crate::error::EngineResult;
use crate::TaskEngine;

/// Feed shape knobs, fixed at engine construction
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Maximum tasks returned per request
    pub page_size: usize,
    /// Cap on promoted tasks shown ahead of the ranked bands
    pub pinned_cap: usize,
    /// Age below which a task ranks in the "fresh" band
    pub fresh_window: Duration,
    /// Main actions remaining at or below which a task is "almost done"
    pub almost_done_threshold: i32,
    /// How many ACTIVE candidates to pull from the database per request
    pub candidate_limit: i64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            page_size: 50,
            pinned_cap: 10,
            fresh_window: Duration::hours(24),
            almost_done_threshold: 2,
            candidate_limit: 500,
        }
    }
}

/// Per-user exclusion sets applied on top of the candidate query
#[derive(Debug, Default)]
pub struct FeedExclusions {
    /// Tasks the requester has reported
    pub reported: HashSet<Uuid>,
    /// Exact task ids the requester has completed
    pub completed_tasks: HashSet<Uuid>,
    /// Duplicate keys of everything the requester has completed; hides
    /// same-content tasks that carry a different id
    pub completed_keys: HashSet<DuplicateKey>,
}

impl FeedExclusions {
    fn excludes(&self, task: &DbTask) -> bool {
        if self.reported.contains(&task.id) || self.completed_tasks.contains(&task.id) {
            return true;
        }
        match task.task_type.parse::<ActionType>() {
            Ok(action) => self
                .completed_keys
                .contains(&DuplicateKey::new(&task.post_url, action, &task.social_network)),
            Err(_) => false,
        }
    }
}

/// Rank candidates into pinned + fresh + almost-done + other, truncated to
/// the page size. Bands sort by creator tier, then fewest remaining main
/// actions, then newest first.
pub fn rank_feed(
    candidates: Vec<DbFeedCandidate>,
    exclusions: &FeedExclusions,
    now: DateTime<Utc>,
    config: &FeedConfig,
) -> Vec<DbFeedCandidate> {
    let mut pinned = Vec::new();
    let mut fresh = Vec::new();
    let mut almost_done = Vec::new();
    let mut other = Vec::new();

    for candidate in candidates {
        if exclusions.excludes(&candidate.task) {
            continue;
        }
        if candidate.task.is_pinned {
            pinned.push(candidate);
        } else if now - candidate.task.created_at <= config.fresh_window {
            fresh.push(candidate);
        } else if candidate.task.main_remaining() <= config.almost_done_threshold {
            almost_done.push(candidate);
        } else {
            other.push(candidate);
        }
    }

    pinned.sort_by(|a, b| b.task.created_at.cmp(&a.task.created_at));
    pinned.truncate(config.pinned_cap);

    for band in [&mut fresh, &mut almost_done, &mut other] {
        band.sort_by(|a, b| {
            b.creator_tier()
                .feed_priority()
                .cmp(&a.creator_tier().feed_priority())
                .then(a.task.main_remaining().cmp(&b.task.main_remaining()))
                .then(b.task.created_at.cmp(&a.task.created_at))
        });
    }

    let mut feed = pinned;
    feed.extend(fresh);
    feed.extend(almost_done);
    feed.extend(other);
    feed.truncate(config.page_size);
    feed
}

impl TaskEngine {
    /// Build the ordered feed of tasks the user can work on
    pub async fn task_feed(
        &self,
        user: Uuid,
        social_network: Option<&str>,
    ) -> EngineResult<Vec<DbFeedCandidate>> {
        let candidates = self
            .task_repo()
            .list_feed_candidates(user, social_network, self.feed.candidate_limit)
            .await?;

        let reported: HashSet<Uuid> =
            self.report_repo().task_ids_reported_by(user).await?.into_iter().collect();

        let mut completed_tasks = HashSet::new();
        let mut completed_keys = HashSet::new();
        for (task_id, post_url, action, network) in
            self.completion_repo().completed_work_keys(user).await?
        {
            completed_tasks.insert(task_id);
            if let Ok(action) = action.parse::<ActionType>() {
                completed_keys.insert(DuplicateKey::new(&post_url, action, &network));
            }
        }

        let exclusions = FeedExclusions { reported, completed_tasks, completed_keys };

        Ok(rank_feed(candidates, &exclusions, Utc::now(), &self.feed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn candidate(
        id: Uuid,
        created_hours_ago: i64,
        remaining: i32,
        pinned: bool,
        tier: &str,
    ) -> DbFeedCandidate {
        let now = Utc::now();
        DbFeedCandidate {
            task: DbTask {
                id,
                creator_id: Uuid::new_v4(),
                social_network: "instagram".to_string(),
                task_type: "like".to_string(),
                post_url: format!("https://instagram.com/p/{id}"),
                url_key: format!("instagram.com/p/{id}"),
                price: Decimal::TEN,
                original_price: Decimal::ONE_HUNDRED,
                actions_required: 10,
                actions_completed: 10 - remaining,
                bonus_actions: 0,
                bonus_actions_completed: 0,
                status: "active".to_string(),
                is_pinned: pinned,
                deletion_reason: None,
                created_at: now - Duration::hours(created_hours_ago),
                completed_at: None,
                completion_duration_secs: None,
            },
            creator_status: tier.to_string(),
        }
    }

    #[test]
    fn bands_keep_precedence_fresh_then_almost_done_then_other() {
        let fresh = Uuid::new_v4();
        let almost = Uuid::new_v4();
        let stale = Uuid::new_v4();

        let feed = rank_feed(
            vec![
                candidate(stale, 72, 8, false, "free"),
                candidate(almost, 48, 1, false, "free"),
                candidate(fresh, 1, 9, false, "free"),
            ],
            &FeedExclusions::default(),
            Utc::now(),
            &FeedConfig::default(),
        );

        let order: Vec<Uuid> = feed.iter().map(|c| c.task.id).collect();
        assert_eq!(order, vec![fresh, almost, stale]);
    }

    #[test]
    fn pinned_tasks_lead_and_are_capped() {
        let mut candidates = Vec::new();
        for hour in 0..12 {
            candidates.push(candidate(Uuid::new_v4(), hour, 5, true, "free"));
        }
        let ordinary = Uuid::new_v4();
        candidates.push(candidate(ordinary, 1, 5, false, "free"));

        let feed = rank_feed(
            candidates,
            &FeedExclusions::default(),
            Utc::now(),
            &FeedConfig::default(),
        );

        assert_eq!(feed.iter().filter(|c| c.task.is_pinned).count(), 10);
        // Newest pinned first
        assert!(feed[0].task.created_at >= feed[9].task.created_at);
        assert_eq!(feed.last().unwrap().task.id, ordinary);
    }

    #[test]
    fn tier_priority_sorts_within_a_band() {
        let mate = Uuid::new_v4();
        let buddy = Uuid::new_v4();
        let free = Uuid::new_v4();

        let feed = rank_feed(
            vec![
                candidate(free, 2, 5, false, "free"),
                candidate(mate, 3, 5, false, "mate"),
                candidate(buddy, 2, 5, false, "buddy"),
            ],
            &FeedExclusions::default(),
            Utc::now(),
            &FeedConfig::default(),
        );

        let order: Vec<Uuid> = feed.iter().map(|c| c.task.id).collect();
        assert_eq!(order, vec![mate, buddy, free]);
    }

    #[test]
    fn fewest_remaining_breaks_tier_ties() {
        let closer = Uuid::new_v4();
        let farther = Uuid::new_v4();

        let feed = rank_feed(
            vec![
                candidate(farther, 2, 9, false, "member"),
                candidate(closer, 3, 4, false, "member"),
            ],
            &FeedExclusions::default(),
            Utc::now(),
            &FeedConfig::default(),
        );

        assert_eq!(feed[0].task.id, closer);
        assert_eq!(feed[1].task.id, farther);
    }

    #[test]
    fn completed_duplicate_key_hides_other_task_ids() {
        let seen = candidate(Uuid::new_v4(), 1, 5, false, "free");
        let mut twin = candidate(Uuid::new_v4(), 1, 5, false, "free");
        // Different id, same content modulo URL noise
        twin.task.post_url = format!("https://www.{}/", seen.task.url_key);

        let mut exclusions = FeedExclusions::default();
        exclusions.completed_keys.insert(DuplicateKey::new(
            &seen.task.post_url,
            ActionType::Like,
            "instagram",
        ));

        let feed = rank_feed(
            vec![seen, twin],
            &exclusions,
            Utc::now(),
            &FeedConfig::default(),
        );
        assert!(feed.is_empty());
    }

    #[test]
    fn reported_tasks_are_excluded() {
        let reported = candidate(Uuid::new_v4(), 1, 5, false, "free");
        let kept = candidate(Uuid::new_v4(), 1, 5, false, "free");

        let mut exclusions = FeedExclusions::default();
        exclusions.reported.insert(reported.task.id);

        let feed = rank_feed(
            vec![reported, kept.clone()],
            &exclusions,
            Utc::now(),
            &FeedConfig::default(),
        );
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].task.id, kept.task.id);
    }

    #[test]
    fn page_size_truncates_the_concatenation() {
        let mut candidates = Vec::new();
        for _ in 0..80 {
            candidates.push(candidate(Uuid::new_v4(), 1, 5, false, "free"));
        }

        let feed = rank_feed(
            candidates,
            &FeedExclusions::default(),
            Utc::now(),
            &FeedConfig::default(),
        );
        assert_eq!(feed.len(), 50);
    }
}
