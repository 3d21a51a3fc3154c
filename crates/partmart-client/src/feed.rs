//! Sequence-tagged listing feed.
//!
//! Overlapping refreshes (pull-to-refresh racing a periodic poll) may resolve
//! in any order. Every request takes a [`RequestTicket`] from
//! [`ListingFeed::begin`], and [`ListingFeed::resolve`] only applies a result
//! newer than the last one applied. A failed fetch never produces fabricated
//! listings: the feed becomes [`FeedState::Degraded`] and keeps the last good
//! products visibly separate.

use std::fmt::Display;
use std::sync::{Mutex, MutexGuard, PoisonError};

use partmart_core::{FilterState, Product};

use crate::client::PartsClient;
use crate::types::PartsQuery;

/// Handed out by [`ListingFeed::begin`]; later tickets carry larger sequence
/// numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket {
    seq: u64,
}

impl RequestTicket {
    #[must_use]
    pub fn seq(self) -> u64 {
        self.seq
    }
}

/// Outcome of [`ListingFeed::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Applied,
    /// A newer response was already applied; this one was discarded.
    Stale,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum FeedState {
    /// Nothing has resolved yet.
    #[default]
    Idle,
    Ready(Vec<Product>),
    /// The latest fetch failed. `last_good` holds whatever was shown before.
    Degraded {
        reason: String,
        last_good: Vec<Product>,
    },
}

impl FeedState {
    /// Products currently held, fresh or stale.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        match self {
            FeedState::Idle => &[],
            FeedState::Ready(products) => products,
            FeedState::Degraded { last_good, .. } => last_good,
        }
    }

    #[must_use]
    pub fn is_degraded(&self) -> bool {
        matches!(self, FeedState::Degraded { .. })
    }

    /// Products passing `filter`, in feed order.
    #[must_use]
    pub fn visible<'a>(&'a self, filter: &FilterState) -> Vec<&'a Product> {
        filter.apply(self.products())
    }
}

#[derive(Debug, Default)]
pub struct ListingFeed {
    issued: u64,
    applied: Option<u64>,
    state: FeedState,
}

impl ListingFeed {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> &FeedState {
        &self.state
    }

    /// Sequence number of the last applied response, if any.
    #[must_use]
    pub fn applied_seq(&self) -> Option<u64> {
        self.applied
    }

    /// Starts a request and returns its ticket.
    pub fn begin(&mut self) -> RequestTicket {
        self.issued += 1;
        RequestTicket { seq: self.issued }
    }

    /// Applies the result of the request behind `ticket`, unless a newer
    /// request has already been applied.
    pub fn resolve<E: Display>(
        &mut self,
        ticket: RequestTicket,
        result: Result<Vec<Product>, E>,
    ) -> Resolution {
        if self.applied.is_some_and(|applied| ticket.seq <= applied) {
            tracing::debug!(
                seq = ticket.seq,
                applied = ?self.applied,
                "discarding stale listing response"
            );
            return Resolution::Stale;
        }
        self.applied = Some(ticket.seq);

        self.state = match result {
            Ok(products) => FeedState::Ready(products),
            Err(err) => {
                let reason = err.to_string();
                tracing::warn!(
                    seq = ticket.seq,
                    error = %reason,
                    "listing fetch failed, feed degraded"
                );
                let last_good = match std::mem::take(&mut self.state) {
                    FeedState::Idle => Vec::new(),
                    FeedState::Ready(products) => products,
                    FeedState::Degraded { last_good, .. } => last_good,
                };
                FeedState::Degraded { reason, last_good }
            }
        };
        Resolution::Applied
    }
}

fn lock(feed: &Mutex<ListingFeed>) -> MutexGuard<'_, ListingFeed> {
    feed.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Runs one fetch-and-apply cycle. The lock is only held to take the ticket
/// and to apply the result, never across the network call.
pub async fn refresh_feed(
    feed: &Mutex<ListingFeed>,
    client: &PartsClient,
    query: &PartsQuery,
) -> Resolution {
    let ticket = lock(feed).begin();
    let result = client.fetch_products(query).await;
    lock(feed).resolve(ticket, result)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::{TimeZone, Utc};
    use partmart_core::{Condition, ListingStatus, ShippingOption, YearRange};

    use super::*;

    fn product(id: &str, brand: &str) -> Product {
        let stamp = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        Product {
            id: id.to_string(),
            part_name: "Part".to_string(),
            part_number: String::new(),
            brand: brand.to_string(),
            car_brand: String::new(),
            model: String::new(),
            car_model: String::new(),
            category: "brakes".to_string(),
            compatible_models: vec![],
            year_range: YearRange::default(),
            price: 0.0,
            condition: Condition::UsedGood,
            stock_count: 1,
            description: String::new(),
            images: vec!["https://api.test/placeholder-part.jpg".to_string()],
            specifications: BTreeMap::new(),
            features: vec![],
            seller_id: String::new(),
            seller_name: String::new(),
            seller_phone: String::new(),
            seller_city: String::new(),
            seller_district: String::new(),
            status: ListingStatus::Active,
            views: 0,
            rating: 0.0,
            review_count: 0,
            is_oem: false,
            shipping_options: vec![ShippingOption::Delivery],
            created_at: stamp,
            updated_at: stamp,
        }
    }

    fn ids(state: &FeedState) -> Vec<&str> {
        state.products().iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn tickets_increase() {
        let mut feed = ListingFeed::new();
        let first = feed.begin();
        let second = feed.begin();
        assert!(second > first);
        assert_eq!(second.seq(), first.seq() + 1);
    }

    #[test]
    fn newer_response_wins_when_older_resolves_late() {
        let mut feed = ListingFeed::new();
        let older = feed.begin();
        let newer = feed.begin();

        let applied = feed.resolve::<String>(newer, Ok(vec![product("new", "Kia")]));
        assert_eq!(applied, Resolution::Applied);

        let stale = feed.resolve::<String>(older, Ok(vec![product("old", "Kia")]));
        assert_eq!(stale, Resolution::Stale);
        assert_eq!(ids(feed.state()), vec!["new"]);
        assert_eq!(feed.applied_seq(), Some(newer.seq()));
    }

    #[test]
    fn in_order_responses_both_apply() {
        let mut feed = ListingFeed::new();
        let first = feed.begin();
        let second = feed.begin();
        assert_eq!(
            feed.resolve::<String>(first, Ok(vec![product("a", "Kia")])),
            Resolution::Applied
        );
        assert_eq!(
            feed.resolve::<String>(second, Ok(vec![product("b", "Kia")])),
            Resolution::Applied
        );
        assert_eq!(ids(feed.state()), vec!["b"]);
    }

    #[test]
    fn failure_degrades_and_keeps_last_good() {
        let mut feed = ListingFeed::new();
        let ok = feed.begin();
        feed.resolve::<String>(ok, Ok(vec![product("a", "Kia")]));

        let failing = feed.begin();
        feed.resolve(failing, Err("connection refused"));
        match feed.state() {
            FeedState::Degraded { reason, last_good } => {
                assert_eq!(reason, "connection refused");
                assert_eq!(last_good.len(), 1);
            }
            other => panic!("expected degraded state, got {other:?}"),
        }

        let failing_again = feed.begin();
        feed.resolve(failing_again, Err("timeout"));
        assert!(feed.state().is_degraded());
        assert_eq!(ids(feed.state()), vec!["a"]);
    }

    #[test]
    fn failure_before_any_success_has_no_products() {
        let mut feed = ListingFeed::new();
        let ticket = feed.begin();
        feed.resolve(ticket, Err("offline"));
        assert!(feed.state().is_degraded());
        assert!(feed.state().products().is_empty());
    }

    #[test]
    fn recovery_clears_degraded_state() {
        let mut feed = ListingFeed::new();
        let failing = feed.begin();
        feed.resolve(failing, Err("offline"));
        let ok = feed.begin();
        feed.resolve::<String>(ok, Ok(vec![product("a", "Kia")]));
        assert!(!feed.state().is_degraded());
        assert_eq!(ids(feed.state()), vec!["a"]);
    }

    #[test]
    fn visible_applies_filter() {
        let mut feed = ListingFeed::new();
        let ticket = feed.begin();
        feed.resolve::<String>(
            ticket,
            Ok(vec![product("1", "Toyota"), product("2", "Honda")]),
        );
        let filter = FilterState::new().with_brand("honda");
        let visible: Vec<&str> = feed
            .state()
            .visible(&filter)
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(visible, vec!["2"]);
    }

    #[test]
    fn idle_feed_shows_nothing() {
        let feed = ListingFeed::new();
        assert_eq!(feed.state(), &FeedState::Idle);
        assert!(feed.state().visible(&FilterState::new()).is_empty());
    }
}
