//! Fuzzy duplicate detection over event records.
//!
//! A pairwise scorer combines name similarity, date overlap, and
//! location/organizer/URL equality into one additive confidence score
//! with attributed reasons. Two entry points apply it: a targeted search
//! against one record, and an all-pairs scan that clusters qualifying
//! pairs into groups via connected components.
//!
//! The all-pairs scan is O(n²) on purpose. Event collections live in the
//! hundreds; blocking or indexing only becomes interesting around tens
//! of thousands of records and is left as an extension point.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashSet, VecDeque};

use anyhow::Result;
use owo_colors::OwoColorize;
use petgraph::graph::{NodeIndex, UnGraph};
use serde::Serialize;
use tracing::{debug, info};

use crate::cli::{AppContext, CheckArgs, DuplicatesArgs};
use crate::core::normalize::{dice_coefficient, normalize};
use crate::core::record::EventRecord;
use crate::infra::{config, store};

/// Default duplicate-confidence cutoff.
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Outcome of scoring one pair of records.
#[derive(Debug, Clone, Serialize)]
pub struct PairScore {
    /// Combined confidence in [0, 1].
    pub score: f64,
    /// Human-readable signals, in accumulation order.
    pub reasons: Vec<String>,
}

/// One candidate that scored at or above the threshold against a target.
#[derive(Debug, Clone, Serialize)]
pub struct DuplicateMatch {
    /// Id of the record the search ran against, for JSON consumers that
    /// mix matches from several targets.
    pub target_id: String,
    pub matched: EventRecord,
    pub score: f64,
    pub reasons: Vec<String>,
}

/// A connected cluster of mutually-similar records.
#[derive(Debug, Clone, Serialize)]
pub struct DuplicateGroup {
    /// At least two records.
    pub events: Vec<EventRecord>,
    /// Maximum pairwise score observed on any edge inside the group.
    pub score: f64,
    /// Deduplicated union of the reasons from every qualifying pair.
    pub reasons: Vec<String>,
}

/// Score two records for duplicate likelihood.
///
/// Records sharing an id are the same record; the guard returns zero
/// before any signal runs. Signals accumulate in a fixed order and the
/// reason list mirrors that order, which callers rely on for display.
pub fn score_pair(a: &EventRecord, b: &EventRecord) -> PairScore {
    if a.id == b.id {
        return PairScore { score: 0.0, reasons: Vec::new() };
    }

    let mut score: f64 = 0.0;
    let mut reasons = Vec::new();

    // 1) Name similarity, two mutually exclusive tiers
    let similarity = dice_coefficient(&a.event_name, &b.event_name);
    let percent = (similarity * 100.0).round() as i64;
    if similarity >= 0.85 {
        score += 0.5;
        reasons.push(format!("Similar name ({percent}%)"));
    } else if similarity >= 0.6 {
        score += 0.3;
        reasons.push(format!("Partial name match ({percent}%)"));
    }

    // 2) Date signal: exact start-date match beats range overlap
    if !a.event_start_date.is_empty()
        && !b.event_start_date.is_empty()
        && a.event_start_date == b.event_start_date
    {
        score += 0.25;
        reasons.push("Same start date".to_string());
    } else if let (Some(start_a), Some(end_a), Some(start_b), Some(end_b)) =
        (a.start_date(), a.end_date(), b.start_date(), b.end_date())
    {
        if start_a <= end_b && start_b <= end_a {
            score += 0.15;
            reasons.push("Overlapping dates".to_string());
        }
    }

    // 3) Location equality after normalization
    if !a.location_name.is_empty()
        && !b.location_name.is_empty()
        && normalize(&a.location_name) == normalize(&b.location_name)
    {
        score += 0.15;
        reasons.push("Same location".to_string());
    }

    // 4) Organizer equality after normalization
    if !a.organizer_name.is_empty()
        && !b.organizer_name.is_empty()
        && normalize(&a.organizer_name) == normalize(&b.organizer_name)
    {
        score += 0.10;
        reasons.push("Same organizer".to_string());
    }

    // 5) URL equality, byte-for-byte
    if !a.event_url.is_empty() && !b.event_url.is_empty() && a.event_url == b.event_url {
        score += 0.30;
        reasons.push("Same URL".to_string());
    }

    PairScore { score: score.min(1.0), reasons }
}

/// Score `target` against every candidate except itself and keep matches
/// at or above `threshold`, sorted descending by score.
pub fn find_for_target(
    target: &EventRecord,
    candidates: &[EventRecord],
    threshold: f64,
) -> Vec<DuplicateMatch> {
    let mut matches: Vec<DuplicateMatch> = candidates
        .iter()
        .filter(|candidate| candidate.id != target.id)
        .filter_map(|candidate| {
            let pair = score_pair(target, candidate);
            (pair.score >= threshold).then(|| DuplicateMatch {
                target_id: target.id.clone(),
                matched: candidate.clone(),
                score: pair.score,
                reasons: pair.reasons,
            })
        })
        .collect();

    matches.sort_by(|x, y| y.score.partial_cmp(&x.score).unwrap_or(Ordering::Equal));
    matches
}

/// All-pairs duplicate scan with connected-component clustering.
///
/// Builds an undirected graph with one node per record and an edge per
/// pair scoring at or above `threshold`, then walks components breadth
/// first with an explicit queue and visited set (no recursion). Only
/// components of two or more records become groups. A group's score is
/// the best edge inside it, and its reasons are the union of reasons
/// from the edges that were actually evaluated, not a re-scoring of
/// every member pair.
pub fn find_all_groups(records: &[EventRecord], threshold: f64) -> Vec<DuplicateGroup> {
    let mut graph: UnGraph<usize, PairScore> = UnGraph::new_undirected();
    let nodes: Vec<NodeIndex> = (0..records.len()).map(|i| graph.add_node(i)).collect();

    for i in 0..records.len() {
        for j in (i + 1)..records.len() {
            let pair = score_pair(&records[i], &records[j]);
            if pair.score >= threshold {
                graph.add_edge(nodes[i], nodes[j], pair);
            }
        }
    }

    debug!(
        records = records.len(),
        edges = graph.edge_count(),
        "pairwise scan complete"
    );

    let mut visited: HashSet<NodeIndex> = HashSet::new();
    let mut groups = Vec::new();

    for &start in &nodes {
        if visited.contains(&start) {
            continue;
        }
        visited.insert(start);

        let mut component = vec![start];
        let mut queue = VecDeque::from([start]);
        while let Some(node) = queue.pop_front() {
            for neighbor in graph.neighbors(node) {
                if visited.insert(neighbor) {
                    component.push(neighbor);
                    queue.push_back(neighbor);
                }
            }
        }

        if component.len() < 2 {
            continue;
        }

        // Every edge touching a component node stays inside the component
        let mut best = 0.0f64;
        let mut reasons: BTreeSet<String> = BTreeSet::new();
        for &node in &component {
            for edge in graph.edges(node) {
                best = best.max(edge.weight().score);
                reasons.extend(edge.weight().reasons.iter().cloned());
            }
        }

        let mut indices: Vec<usize> = component.iter().map(|&n| graph[n]).collect();
        indices.sort_unstable();

        groups.push(DuplicateGroup {
            events: indices.iter().map(|&i| records[i].clone()).collect(),
            score: best,
            reasons: reasons.into_iter().collect(),
        });
    }

    groups.sort_by(|x, y| y.score.partial_cmp(&x.score).unwrap_or(Ordering::Equal));
    groups
}

/// Run the `duplicates` command: scan a directory and report groups.
pub fn run_scan(args: DuplicatesArgs, ctx: &AppContext) -> Result<()> {
    let cfg = config::load_config().unwrap_or_default();
    let threshold = args.threshold.unwrap_or(cfg.duplicates.threshold);

    let records = store::load_records(&args.path, &cfg.scan.ignore)?;
    info!(count = records.len(), threshold, "scanning for duplicate groups");

    let groups = find_all_groups(&records, threshold);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&groups)?);
        return Ok(());
    }

    if groups.is_empty() {
        if !ctx.quiet {
            println!("No duplicate groups at threshold {threshold:.2}");
        }
        return Ok(());
    }

    for (i, group) in groups.iter().enumerate() {
        let header = format!(
            "Group {} — {} events, confidence {:.0}%",
            i + 1,
            group.events.len(),
            group.score * 100.0
        );
        print_severity(&header, group.score, ctx);

        for event in &group.events {
            let line = format!(
                "  {} ({}) {}",
                event.event_name,
                if event.event_start_date.is_empty() { "no date" } else { &event.event_start_date },
                event.file_path
            );
            print_dim(&line, ctx);
        }
        println!("  reasons: {}", group.reasons.join(", "));
        println!();
    }
    Ok(())
}

/// Run the `check` command: one file against a candidate directory.
pub fn run_check(args: CheckArgs, ctx: &AppContext) -> Result<()> {
    let cfg = config::load_config().unwrap_or_default();
    let threshold = args.threshold.unwrap_or(cfg.duplicates.threshold);

    let target = store::load_record(&args.file)?;
    let candidates = store::load_records(&args.path, &cfg.scan.ignore)?;

    let matches = find_for_target(&target, &candidates, threshold);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&matches)?);
        return Ok(());
    }

    if matches.is_empty() {
        if !ctx.quiet {
            println!(
                "No likely duplicates of '{}' at threshold {threshold:.2}",
                target.event_name
            );
        }
        return Ok(());
    }

    println!("Possible duplicates of '{}':", target.event_name);
    for m in &matches {
        let line = format!(
            "  {:.0}%  {} ({})",
            m.score * 100.0,
            m.matched.event_name,
            m.matched.file_path
        );
        print_severity(&line, m.score, ctx);
        print_dim(&format!("        {}", m.reasons.join(", ")), ctx);
    }
    Ok(())
}

fn print_dim(line: &str, ctx: &AppContext) {
    if ctx.no_color {
        println!("{line}");
    } else {
        println!("{}", line.bright_black());
    }
}

/// Color a line by confidence band.
fn print_severity(line: &str, score: f64, ctx: &AppContext) {
    if ctx.no_color {
        println!("{line}");
    } else if score >= 0.8 {
        println!("{}", line.red().bold());
    } else if score >= 0.65 {
        println!("{}", line.yellow());
    } else {
        println!("{}", line.green());
    }
}
