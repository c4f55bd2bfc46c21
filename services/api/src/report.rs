use clap::Args;
use site_audit::config::AppConfig;
use site_audit::error::AppError;
use site_audit::workflows::crawl_import::CrawlExportImporter;
use site_audit::workflows::scoring::{
    CrawlProgress, EmptyCrawl, ScoreBreakdown, ScoreCategory, ScoringEngine, ScoringError, TaskId,
    TaskStatus,
};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Crawler CSV export to score
    #[arg(long)]
    pub(crate) pages_csv: PathBuf,
    /// Crawl task status (completed, running, ...)
    #[arg(long, default_value = "completed")]
    pub(crate) status: String,
    /// URLs discovered by the crawl (defaults to the exported page count)
    #[arg(long)]
    pub(crate) total_urls: Option<u32>,
    /// URLs scanned so far (defaults to the exported page count)
    #[arg(long)]
    pub(crate) pages_scanned: Option<u32>,
    /// Print the breakdown as JSON instead of a text report
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_score_report(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        pages_csv,
        status,
        total_urls,
        pages_scanned,
        json,
    } = args;

    let config = AppConfig::load()?;
    let pages = CrawlExportImporter::from_path(&pages_csv)?;

    let exported = u32::try_from(pages.len()).unwrap_or(u32::MAX);
    let progress = CrawlProgress {
        status: TaskStatus::from_label(&status),
        total_urls: total_urls.unwrap_or(exported),
        pages_scanned: pages_scanned.unwrap_or(exported),
    };
    let breakdown = ScoringEngine::new(config.scoring)
        .score(&pages, &progress)
        .map_err(|EmptyCrawl| {
            let label = pages_csv
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| pages_csv.display().to_string());
            ScoringError::NoPages(TaskId(label))
        })?;

    if json {
        let rendered = serde_json::to_string_pretty(&breakdown).map_err(std::io::Error::from)?;
        println!("{rendered}");
    } else {
        print!("{}", render_breakdown(&breakdown));
    }

    Ok(())
}

pub(crate) fn render_breakdown(breakdown: &ScoreBreakdown) -> String {
    let mut out = String::new();
    out.push_str("Site audit score\n");
    out.push_str(&format!("  Global score: {}/100\n", breakdown.global_score));
    for category in ScoreCategory::ordered() {
        let score = match category {
            ScoreCategory::Seo => breakdown.seo_score,
            ScoreCategory::Technical => breakdown.technical_score,
            ScoreCategory::Content => breakdown.content_score,
            ScoreCategory::Performance => breakdown.performance_score,
        };
        out.push_str(&format!("  {:<12} {:>3}/100\n", category.label(), score));
    }
    out.push_str(&format!(
        "  Pages scored: {} ({}% of crawl)\n",
        breakdown.page_count, breakdown.completion_percentage
    ));

    if let Some(note) = &breakdown.partial_data_note {
        out.push_str(&format!("  Note: {note}\n"));
    }

    if breakdown.deductions.is_empty() {
        out.push_str("\nNo issues found.\n");
        return out;
    }

    out.push_str("\nDeductions\n");
    for deduction in &breakdown.deductions {
        out.push_str(&format!(
            "  -{:>3} {:<12} {} ({} pages, {:.1}% of weight)\n",
            deduction.points,
            deduction.category.label(),
            deduction.issue.label(),
            deduction.affected_pages,
            deduction.weighted_impact * 100.0
        ));
    }

    let severity = &breakdown.issues_by_severity;
    out.push_str(&format!(
        "\nIssues by severity: {} critical, {} important, {} minor\n",
        severity.critical, severity.important, severity.minor
    ));

    out.push_str("Pages by depth:");
    for (depth, count) in &breakdown.pages_by_depth {
        out.push_str(&format!(" {depth}={count}"));
    }
    out.push('\n');

    out
}
