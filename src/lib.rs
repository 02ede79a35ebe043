//! **event-reconcile** - Reconciliation core for Markdown+YAML event records
//!
//! Frontmatter codec, lifecycle status workflow, fuzzy duplicate detection,
//! and dashboard aggregation over a Git-backed collection of event files.
//! The algorithmic core is pure and synchronous; the CLI is a thin shell.

/// Command-line interface with clap integration
pub mod cli;

/// Core reconciliation pipeline - codec, workflow, similarity, aggregation
pub mod core {
    /// Text normalization and bigram (Dice) similarity
    pub mod normalize;
    pub use self::normalize::{dice_coefficient, normalize};

    /// Canonical event record shape and field enums
    pub mod record;
    pub use self::record::{EventRecord, PriceModel};

    /// YAML frontmatter codec with round-trip-safe serialization
    pub mod frontmatter;
    pub use self::frontmatter::{parse_record, serialize_record};

    /// Lifecycle status state machine with a fixed transition table
    pub mod workflow;
    pub use self::workflow::{Status, can_transition, is_terminal, next_statuses};

    /// Pairwise duplicate scoring and connected-component grouping
    pub mod duplicates;
    pub use self::duplicates::{find_all_groups, find_for_target, score_pair};

    /// Summary counts and work queues over a record collection
    pub mod dashboard;
    pub use self::dashboard::compute_stats;
}

/// Infrastructure - Configuration and file loading
pub mod infra {
    /// Configuration management with TOML support
    pub mod config;
    pub use self::config::{Config, init as config_init, load_config};

    /// Event file collection, loading, and canonical writes
    pub mod store;
    pub use self::store::{collect_event_files, load_record, load_records, save_record};
}

// Strategic re-exports for clean consumer interface
pub use crate::cli::{AppContext, Cli, Commands};
pub use crate::core::duplicates::{DuplicateGroup, DuplicateMatch, PairScore};
pub use crate::core::record::EventRecord;
pub use crate::core::workflow::{Status, TransitionError};
pub use crate::core::{dice_coefficient, normalize, parse_record, serialize_record};
pub use crate::infra::{Config, load_config};
