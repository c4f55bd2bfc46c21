use super::super::domain::{TaskMetadata, TaskStatus};
use serde::{Deserialize, Serialize};

/// Crawl progress as reported by the task owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrawlProgress {
    pub status: TaskStatus,
    pub total_urls: u32,
    pub pages_scanned: u32,
}

impl From<&TaskMetadata> for CrawlProgress {
    fn from(task: &TaskMetadata) -> Self {
        Self {
            status: task.status.clone(),
            total_urls: task.total_urls,
            pages_scanned: task.pages_scanned,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    pub is_partial: bool,
    pub completion_percentage: u8,
    pub partial_data_note: Option<String>,
}

/// Judges whether a run covers enough of the crawl to be considered final.
///
/// A zero `total_urls` or `pages_scanned` falls back to the number of page
/// records actually scored.
pub fn assess_completion(progress: &CrawlProgress, page_count: usize, threshold: f64) -> Completion {
    let page_count = u32::try_from(page_count).unwrap_or(u32::MAX);
    let total = match progress.total_urls {
        0 => page_count,
        total => total,
    };
    let scanned = match progress.pages_scanned {
        0 => page_count,
        scanned => scanned,
    };

    let ratio = if total > 0 {
        f64::from(scanned) / f64::from(total)
    } else {
        0.0
    };
    let completion_percentage = (ratio * 100.0).round().clamp(0.0, 100.0) as u8;
    let is_partial =
        !progress.status.is_completed() || f64::from(scanned) < f64::from(total) * threshold;

    let partial_data_note = is_partial.then(|| {
        format!(
            "Partial results: {scanned} of {total} pages scanned ({completion_percentage}%). \
             Scores may change once the crawl completes."
        )
    });

    Completion {
        is_partial,
        completion_percentage,
        partial_data_note,
    }
}
