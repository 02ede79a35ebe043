//! Event lifecycle state machine.
//!
//! A fixed, hand-authored transition table over the six publication
//! statuses. The table is the single authority for what a record may do
//! next: bulk operations and single-record transitions both validate
//! against it and report the exact transition they attempted.
//!
//! `archived` is the sole terminal state; every status can reach it.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::cli::{AppContext, TransitionArgs};
use crate::infra::store;

/// Publication status of an event record.
///
/// Stored in frontmatter as a lowercase token. Unknown or missing values
/// coerce to `Draft` at parse time; the enum itself is closed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Draft,
    Review,
    Pending,
    Approved,
    Published,
    Archived,
}

impl Status {
    /// All statuses in canonical (dashboard) order.
    pub const ALL: [Status; 6] = [
        Status::Draft,
        Status::Review,
        Status::Pending,
        Status::Approved,
        Status::Published,
        Status::Archived,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Draft => "draft",
            Status::Review => "review",
            Status::Pending => "pending",
            Status::Approved => "approved",
            Status::Published => "published",
            Status::Archived => "archived",
        }
    }

    /// Lenient parse used by the frontmatter lift: anything that is not a
    /// known status token falls back to `Draft`.
    pub fn parse_or_default(s: &str) -> Status {
        match s {
            "review" => Status::Review,
            "pending" => Status::Pending,
            "approved" => Status::Approved,
            "published" => Status::Published,
            "archived" => Status::Archived,
            _ => Status::Draft,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Legal next statuses for `from`, in fixed row order.
///
/// Row order is part of the contract: consumers render transition
/// affordances in exactly this order.
pub fn next_statuses(from: Status) -> &'static [Status] {
    match from {
        Status::Draft => &[Status::Review, Status::Archived],
        Status::Review => &[Status::Draft, Status::Pending, Status::Archived],
        Status::Pending => &[Status::Review, Status::Approved, Status::Archived],
        Status::Approved => &[Status::Published, Status::Review, Status::Archived],
        Status::Published => &[Status::Archived],
        Status::Archived => &[],
    }
}

/// Membership test against the transition table. No self-loops.
pub fn can_transition(from: Status, to: Status) -> bool {
    next_statuses(from).contains(&to)
}

/// A status is terminal when its transition row is empty.
pub fn is_terminal(status: Status) -> bool {
    next_statuses(status).is_empty()
}

/// Attempted transition not present in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("Cannot transition from {from} to {to}")]
    Illegal { from: Status, to: Status },
}

/// Validate a transition, naming the offending edge on failure.
pub fn check_transition(from: Status, to: Status) -> Result<(), TransitionError> {
    if can_transition(from, to) {
        Ok(())
    } else {
        Err(TransitionError::Illegal { from, to })
    }
}

/// Run the `transition` command: validate, then rewrite the file through
/// the codec with the new status.
pub fn run(args: TransitionArgs, ctx: &AppContext) -> Result<()> {
    let mut record = store::load_record(&args.file)?;
    let to: Status = args.to.into();
    let from = record.status;

    check_transition(from, to)?;
    record.status = to;

    if ctx.dry_run {
        if !ctx.quiet {
            println!("{}: {} -> {} (dry run)", args.file.display(), from, to);
        }
        return Ok(());
    }

    store::save_record(&record)?;

    if !ctx.quiet {
        println!("{}: {} -> {}", args.file.display(), from, to);
    }
    Ok(())
}
