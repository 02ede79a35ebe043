//! Dashboard aggregation: summary counts and work queues derived from a
//! record collection. A pure reduction over the input slice; nothing
//! here mutates records or touches the clock on its own.

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use tabled::{Table, Tabled};

use crate::cli::{AppContext, StatsArgs};
use crate::core::record::{EventRecord, parse_iso_date};
use crate::core::workflow::Status;
use crate::infra::{config, store};

/// Cap on the `upcoming` queue.
pub const UPCOMING_LIMIT: usize = 10;

/// Aggregate view over a record collection at a reference instant.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub total: usize,
    /// Counts per status, in canonical status order, zeros included.
    pub by_status: IndexMap<String, usize>,
    /// Records awaiting a reviewer: review + pending.
    pub pending_review: usize,
    /// Records still in authoring hands: draft + pending.
    pub pending_draft: usize,
    pub submissions_this_week: usize,
    pub submissions_this_month: usize,
    /// Up to ten records starting today or later, soonest first.
    pub upcoming: Vec<EventRecord>,
    /// Draft/review/pending records, most recently touched first.
    pub review_queue: Vec<EventRecord>,
}

/// Reduce `records` into dashboard stats relative to `now`.
///
/// Submission windows are trailing 7/30 days, inclusive on both ends.
/// "Upcoming" compares date strings, so an event starting today (even
/// with a time component) is included.
pub fn compute_stats(records: &[EventRecord], now: DateTime<Utc>) -> DashboardStats {
    let today = now.date_naive();
    let today_str = today.format("%Y-%m-%d").to_string();
    let week_floor = today - Duration::days(7);
    let month_floor = today - Duration::days(30);

    let mut by_status: IndexMap<String, usize> = Status::ALL
        .iter()
        .map(|s| (s.as_str().to_string(), 0))
        .collect();
    for record in records {
        *by_status.entry(record.status.as_str().to_string()).or_default() += 1;
    }

    let count = |s: Status| by_status.get(s.as_str()).copied().unwrap_or(0);
    let pending_review = count(Status::Review) + count(Status::Pending);
    let pending_draft = count(Status::Draft) + count(Status::Pending);

    let mut submissions_this_week = 0;
    let mut submissions_this_month = 0;
    for record in records {
        let Some(created) = parse_iso_date(&record.created_at) else {
            continue;
        };
        if created > today {
            continue;
        }
        if created >= week_floor {
            submissions_this_week += 1;
        }
        if created >= month_floor {
            submissions_this_month += 1;
        }
    }

    let mut upcoming: Vec<EventRecord> = records
        .iter()
        .filter(|r| !r.event_start_date.is_empty() && r.event_start_date.as_str() >= today_str.as_str())
        .cloned()
        .collect();
    upcoming.sort_by(|a, b| a.event_start_date.cmp(&b.event_start_date));
    upcoming.truncate(UPCOMING_LIMIT);

    let mut review_queue: Vec<EventRecord> = records
        .iter()
        .filter(|r| matches!(r.status, Status::Draft | Status::Review | Status::Pending))
        .cloned()
        .collect();
    review_queue.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

    DashboardStats {
        total: records.len(),
        by_status,
        pending_review,
        pending_draft,
        submissions_this_week,
        submissions_this_month,
        upcoming,
        review_queue,
    }
}

#[derive(Tabled)]
struct StatusRow {
    status: String,
    count: usize,
}

/// Run the `stats` command.
pub fn run(args: StatsArgs, ctx: &AppContext) -> Result<()> {
    let cfg = config::load_config().unwrap_or_default();
    let records = store::load_records(&args.path, &cfg.scan.ignore)?;
    let stats = compute_stats(&records, Utc::now());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    let rows: Vec<StatusRow> = stats
        .by_status
        .iter()
        .map(|(status, count)| StatusRow { status: status.clone(), count: *count })
        .collect();
    println!("{}", Table::new(rows));

    println!("total:            {}", stats.total);
    println!("pending review:   {}", stats.pending_review);
    println!("pending draft:    {}", stats.pending_draft);
    println!("new this week:    {}", stats.submissions_this_week);
    println!("new this month:   {}", stats.submissions_this_month);

    if !stats.upcoming.is_empty() && !ctx.quiet {
        println!("\nUpcoming:");
        for event in &stats.upcoming {
            println!("  {}  {}", event.event_start_date, event.event_name);
        }
    }
    if !stats.review_queue.is_empty() && !ctx.quiet {
        println!("\nReview queue:");
        for event in &stats.review_queue {
            println!("  [{}] {}", event.status, event.event_name);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(date: &str) -> DateTime<Utc> {
        let d = parse_iso_date(date).unwrap();
        Utc.from_utc_datetime(&d.and_hms_opt(12, 0, 0).unwrap())
    }

    #[test]
    fn empty_collection_is_all_zeros() {
        let stats = compute_stats(&[], at("2026-06-15"));
        assert_eq!(stats.total, 0);
        assert_eq!(stats.pending_review, 0);
        assert_eq!(stats.pending_draft, 0);
        assert_eq!(stats.submissions_this_week, 0);
        assert_eq!(stats.submissions_this_month, 0);
        assert!(stats.upcoming.is_empty());
        assert!(stats.review_queue.is_empty());
        assert_eq!(stats.by_status.len(), 6);
        assert!(stats.by_status.values().all(|&c| c == 0));
    }

    #[test]
    fn same_day_event_counts_as_upcoming() {
        let record = EventRecord {
            event_start_date: "2026-06-15".to_string(),
            ..Default::default()
        };
        let stats = compute_stats(&[record], at("2026-06-15"));
        assert_eq!(stats.upcoming.len(), 1);
    }

    #[test]
    fn window_edges_are_inclusive() {
        let mk = |created: &str| EventRecord {
            created_at: created.to_string(),
            ..Default::default()
        };
        let records = [mk("2026-06-08"), mk("2026-05-16"), mk("2026-05-15")];
        let stats = compute_stats(&records, at("2026-06-15"));

        // Exactly 7 days back is in; exactly 30 days back is in; 31 is out
        assert_eq!(stats.submissions_this_week, 1);
        assert_eq!(stats.submissions_this_month, 2);
    }
}
