//! Per-candidate restriction checks.

use crate::config::{RestrictionConfig, RestrictionOrder, UndatedPolicy};
use crate::core::{CandidateRecord, SkipReason, StopReason};

/// Decision for one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Emit the candidate.
    Accept,
    /// Drop the candidate and keep going.
    Skip(SkipReason),
    /// End the crawl without emitting the candidate.
    Stop(StopReason),
}

/// Applies a `RestrictionConfig` to candidates. Holds no crawl state.
#[derive(Debug, Clone)]
pub struct RestrictionFilter {
    config: RestrictionConfig,
}

impl RestrictionFilter {
    /// Creates a filter over a copy of the restrictions.
    #[must_use]
    pub fn new(config: &RestrictionConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Gets the configuration.
    #[must_use]
    pub fn config(&self) -> &RestrictionConfig {
        &self.config
    }

    /// Evaluates one candidate.
    ///
    /// `known` is the identity index's answer for the candidate and
    /// `accepted` the number of documents emitted so far.
    #[must_use]
    pub fn evaluate(&self, candidate: &CandidateRecord, known: bool, accepted: usize) -> Verdict {
        let early = match self.config.order {
            RestrictionOrder::NoveltyFirst => self
                .check_novelty(known)
                .or_else(|| self.check_dates(candidate)),
            RestrictionOrder::DateFirst => self
                .check_dates(candidate)
                .or_else(|| self.check_novelty(known)),
        };
        if let Some(verdict) = early {
            return verdict;
        }
        if self.cap_reached(accepted) {
            return Verdict::Stop(StopReason::MaxReached);
        }
        Verdict::Accept
    }

    /// Whether `emitted` documents exhaust the item cap.
    #[must_use]
    pub fn cap_reached(&self, emitted: usize) -> bool {
        self.config.max_items.is_some_and(|max| emitted >= max)
    }

    fn check_novelty(&self, known: bool) -> Option<Verdict> {
        match (known, self.config.to_last_seen) {
            (false, _) => None,
            (true, false) => Some(Verdict::Skip(SkipReason::Known)),
            (true, true) => Some(Verdict::Stop(StopReason::KnownReached)),
        }
    }

    fn check_dates(&self, candidate: &CandidateRecord) -> Option<Verdict> {
        let Some(published) = candidate.published else {
            return match self.config.undated {
                UndatedPolicy::PassThrough => None,
                UndatedPolicy::Drop => Some(Verdict::Skip(SkipReason::Undated)),
            };
        };
        if self.config.from_date.is_some_and(|floor| published < floor) {
            return Some(Verdict::Stop(StopReason::DateExceeded));
        }
        if self.config.to_date.is_some_and(|ceiling| published > ceiling) {
            return Some(Verdict::Skip(SkipReason::AfterToDate));
        }
        None
    }
}
