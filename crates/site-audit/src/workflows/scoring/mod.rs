//! Weighted site-audit scoring.
//!
//! Page analyses for one crawl task are weighted by structural importance
//! (depth, page type, inbound internal links). Each rule of the penalty table
//! deducts points in proportion to the weight share of the pages it matches,
//! producing four category scores and a global score.

pub mod breakdown;
pub mod dispatch;
pub mod domain;
pub mod engine;
pub mod report;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
pub(crate) mod tests;

pub use breakdown::{ScoreBreakdown, ScoreRecord};
pub use dispatch::{
    spawn_side_effect_worker, DispatchError, SideEffect, SideEffectDispatcher, SideEffectWorker,
};
pub use domain::{PageAnalysis, PageType, TaskId, TaskMetadata, TaskStatus};
pub use engine::{
    CategoryScores, EmptyCrawl, IssueKind, IssueRule, IssueSeverity, RuleDeduction, ScoreCategory,
    ScoringConfig, ScoringEngine,
};
pub use report::{Completion, CrawlProgress, SeverityCounts};
pub use repository::{
    AuditStatus, AuditStatusUpdate, AuditStore, CollaboratorError, NotificationPublisher,
    OptimizationTrigger, RepositoryError, ScoreNotification,
};
pub use router::{
    scoring_router, CalculateScoresRequest, CalculateScoresResponse, ScoringFailure,
};
pub use service::{ScoringError, ScoringService};
