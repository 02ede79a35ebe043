//! Dashboard aggregation over realistic mixed collections.

use chrono::{DateTime, TimeZone, Utc};
use event_reconcile::core::dashboard::{UPCOMING_LIMIT, compute_stats};
use event_reconcile::core::record::EventRecord;
use event_reconcile::core::workflow::Status;

fn noon(date: &str) -> DateTime<Utc> {
    let d = chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
    Utc.from_utc_datetime(&d.and_hms_opt(12, 0, 0).unwrap())
}

fn record(status: Status, start: &str, created: &str, updated: &str) -> EventRecord {
    EventRecord {
        status,
        event_start_date: start.to_string(),
        created_at: created.to_string(),
        updated_at: updated.to_string(),
        ..Default::default()
    }
}

#[test]
fn counts_split_by_status_with_overlap_in_pending() {
    let records = [
        record(Status::Draft, "", "2026-06-01", ""),
        record(Status::Draft, "", "2026-06-02", ""),
        record(Status::Review, "", "2026-06-03", ""),
        record(Status::Pending, "", "2026-06-04", ""),
        record(Status::Approved, "", "2026-06-05", ""),
        record(Status::Published, "", "2026-06-06", ""),
        record(Status::Archived, "", "2026-06-07", ""),
    ];
    let stats = compute_stats(&records, noon("2026-06-15"));

    assert_eq!(stats.total, 7);
    assert_eq!(stats.by_status["draft"], 2);
    assert_eq!(stats.by_status["review"], 1);
    assert_eq!(stats.by_status["pending"], 1);
    assert_eq!(stats.by_status["archived"], 1);

    // `pending` contributes to both queues
    assert_eq!(stats.pending_review, 2);
    assert_eq!(stats.pending_draft, 3);
}

#[test]
fn by_status_preserves_canonical_order() {
    let stats = compute_stats(&[], noon("2026-06-15"));
    let keys: Vec<&str> = stats.by_status.keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        vec!["draft", "review", "pending", "approved", "published", "archived"]
    );
}

#[test]
fn upcoming_is_sorted_soonest_first_and_capped() {
    let mut records = Vec::new();
    for day in 1..=15 {
        records.push(record(
            Status::Published,
            &format!("2026-07-{day:02}"),
            "",
            "",
        ));
    }
    // Past events never show up
    records.push(record(Status::Published, "2026-01-01", "", ""));
    // Dateless events never show up
    records.push(record(Status::Published, "", "", ""));

    let stats = compute_stats(&records, noon("2026-06-15"));
    assert_eq!(stats.upcoming.len(), UPCOMING_LIMIT);
    assert_eq!(stats.upcoming[0].event_start_date, "2026-07-01");
    assert_eq!(stats.upcoming[9].event_start_date, "2026-07-10");
}

#[test]
fn review_queue_orders_most_recently_touched_first() {
    let records = [
        record(Status::Draft, "", "", "2026-06-01T08:00:00Z"),
        record(Status::Review, "", "", "2026-06-10T08:00:00Z"),
        record(Status::Pending, "", "", "2026-06-05T08:00:00Z"),
        record(Status::Published, "", "", "2026-06-12T08:00:00Z"),
    ];
    let stats = compute_stats(&records, noon("2026-06-15"));

    assert_eq!(stats.review_queue.len(), 3);
    assert_eq!(stats.review_queue[0].status, Status::Review);
    assert_eq!(stats.review_queue[1].status, Status::Pending);
    assert_eq!(stats.review_queue[2].status, Status::Draft);
}

#[test]
fn unparseable_created_dates_are_skipped_in_windows() {
    let records = [
        record(Status::Draft, "", "soon", ""),
        record(Status::Draft, "", "", ""),
        record(Status::Draft, "", "2026-06-14T23:59:00Z", ""),
    ];
    let stats = compute_stats(&records, noon("2026-06-15"));
    assert_eq!(stats.submissions_this_week, 1);
    assert_eq!(stats.submissions_this_month, 1);
}

#[test]
fn future_created_dates_do_not_count_as_submissions() {
    let records = [record(Status::Draft, "", "2026-07-01", "")];
    let stats = compute_stats(&records, noon("2026-06-15"));
    assert_eq!(stats.submissions_this_week, 0);
    assert_eq!(stats.submissions_this_month, 0);
}
