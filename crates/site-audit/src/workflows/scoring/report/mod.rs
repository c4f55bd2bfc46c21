mod completion;
mod distribution;

pub use completion::{assess_completion, Completion, CrawlProgress};
pub use distribution::{
    issue_percentages, issues_by_severity, pages_by_depth, pages_by_type, SeverityCounts,
};
