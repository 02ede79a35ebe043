//! Frontmatter codec: YAML+Markdown text to typed records and back.
//!
//! The parser is deliberately permissive because the source files are
//! hand-edited: malformed values degrade to defaults, and a missing or
//! malformed delimiter block degrades to "no fields, whole text is the
//! body". The serializer is the strict side of the contract: a fixed key
//! order and aggressive field omission keep version-control diffs small.
//!
//! Round-trip law: serializing a record and parsing it back reproduces
//! every emitted field exactly, and the body modulo outer whitespace.

use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;
use serde_yaml::{Mapping, Value};
use tracing::debug;

use crate::cli::{AppContext, FmtArgs};
use crate::core::record::{
    AttendanceMode, Availability, DEFAULT_CURRENCY, EventRecord, FeaturedKind, PriceModel,
};
use crate::core::workflow::Status;
use crate::infra::{config, store};

/// Leading `---` fenced block. The content group must be non-empty: two
/// adjacent fences with nothing between them do not count as a block,
/// and the whole input falls through as body text.
static FRONTMATTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\A---\r?\n(.*?)\r?\n---(?:\r?\n|\z)").expect("static pattern")
});

/// Split raw file text into a YAML field map and a trimmed body.
///
/// Degrades instead of failing: no recognizable block, or a block that
/// does not decode to a mapping, yields an empty map with the raw input
/// unchanged as the body. A whitespace-only block is an empty map.
pub fn parse(raw: &str) -> (Mapping, String) {
    let Some(caps) = FRONTMATTER.captures(raw) else {
        return (Mapping::new(), raw.to_string());
    };

    let block = caps.get(1).map_or("", |m| m.as_str());
    let body = raw[caps.get(0).map_or(0, |m| m.end())..].trim().to_string();

    if block.trim().is_empty() {
        return (Mapping::new(), body);
    }

    match serde_yaml::from_str::<Value>(block) {
        Ok(Value::Mapping(fields)) => (fields, body),
        Ok(Value::Null) => (Mapping::new(), body),
        Ok(_) | Err(_) => (Mapping::new(), raw.to_string()),
    }
}

/// Parse raw file text straight into a typed record.
pub fn parse_record(raw: &str) -> EventRecord {
    let (fields, body) = parse(raw);
    record_from_parts(&fields, body)
}

/// Lift a decoded field map into a typed record, applying the coercion
/// policy: strings pass through (absent/null become ""), numbers accept
/// numeric values or numeric-looking strings, booleans accept only real
/// booleans, arrays accept only real sequences.
pub fn record_from_parts(fields: &Mapping, body: String) -> EventRecord {
    let currency = string_field(fields, "price_currency");

    EventRecord {
        id: string_field(fields, "id"),
        status: Status::parse_or_default(&string_field(fields, "status")),
        file_path: String::new(),
        event_name: string_field(fields, "event_name"),
        event_description: string_field(fields, "event_description"),
        event_url: string_field(fields, "event_url"),
        event_start_date: string_field(fields, "event_start_date"),
        event_end_date: string_field(fields, "event_end_date"),
        location_name: string_field(fields, "location_name"),
        location_address: string_field(fields, "location_address"),
        organizer_name: string_field(fields, "organizer_name"),
        organizer_url: string_field(fields, "organizer_url"),
        contact_name: string_field(fields, "contact_name"),
        contact_email: string_field(fields, "contact_email"),
        contact_phone: string_field(fields, "contact_phone"),
        price_type: PriceModel::parse_or_default(&string_field(fields, "price_type")),
        price_currency: if currency.is_empty() {
            DEFAULT_CURRENCY.to_string()
        } else {
            currency
        },
        price_amount: number_field(fields, "price_amount"),
        price_low: number_field(fields, "price_low"),
        price_high: number_field(fields, "price_high"),
        price_availability: Availability::parse_or_default(&string_field(
            fields,
            "price_availability",
        )),
        attendance_mode: AttendanceMode::parse_or_default(&string_field(
            fields,
            "attendance_mode",
        )),
        languages: list_field(fields, "languages"),
        tags: list_field(fields, "tags"),
        featured: bool_field(fields, "featured"),
        featured_kind: FeaturedKind::parse(&string_field(fields, "featured_kind")),
        created_at: string_field(fields, "created_at"),
        updated_at: string_field(fields, "updated_at"),
        body,
    }
}

fn get<'a>(fields: &'a Mapping, key: &str) -> Option<&'a Value> {
    fields.get(&Value::String(key.to_string()))
}

/// Strings pass through as-is; anything else is absent.
fn string_field(fields: &Mapping, key: &str) -> String {
    match get(fields, key) {
        Some(Value::String(s)) => s.clone(),
        _ => String::new(),
    }
}

/// Numbers accept numeric values or numeric-looking strings; failure
/// coerces to `None`, never to zero.
fn number_field(fields: &Mapping, key: &str) -> Option<f64> {
    match get(fields, key) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Only literal booleans count; truthy strings like "yes" do not.
fn bool_field(fields: &Mapping, key: &str) -> bool {
    matches!(get(fields, key), Some(Value::Bool(true)))
}

/// Only real sequences count; scalar values coerce to an empty list.
fn list_field(fields: &Mapping, key: &str) -> Vec<String> {
    match get(fields, key) {
        Some(Value::Sequence(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                _ => String::new(),
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Serialize a record to frontmatter + body.
///
/// Keys are emitted in a fixed, explicit order so rewrites produce
/// minimal diffs; fields holding `""`, `None`, or `[]` are omitted
/// entirely and repopulate as defaults on the next parse.
pub fn serialize_record(record: &EventRecord) -> String {
    let mut out = String::from("---\n");

    emit_string(&mut out, "id", &record.id);
    emit_token(&mut out, "status", record.status.as_str());
    emit_string(&mut out, "event_name", &record.event_name);
    emit_string(&mut out, "event_description", &record.event_description);
    emit_string(&mut out, "event_url", &record.event_url);
    emit_string(&mut out, "event_start_date", &record.event_start_date);
    emit_string(&mut out, "event_end_date", &record.event_end_date);
    emit_string(&mut out, "location_name", &record.location_name);
    emit_string(&mut out, "location_address", &record.location_address);
    emit_string(&mut out, "organizer_name", &record.organizer_name);
    emit_string(&mut out, "organizer_url", &record.organizer_url);
    emit_string(&mut out, "contact_name", &record.contact_name);
    emit_string(&mut out, "contact_email", &record.contact_email);
    emit_string(&mut out, "contact_phone", &record.contact_phone);
    emit_token(&mut out, "price_type", record.price_type.as_str());
    emit_string(&mut out, "price_currency", &record.price_currency);
    emit_number(&mut out, "price_amount", record.price_amount);
    emit_number(&mut out, "price_low", record.price_low);
    emit_number(&mut out, "price_high", record.price_high);
    emit_token(&mut out, "price_availability", record.price_availability.as_str());
    emit_token(&mut out, "attendance_mode", record.attendance_mode.as_str());
    emit_list(&mut out, "languages", &record.languages);
    emit_list(&mut out, "tags", &record.tags);
    emit_token(&mut out, "featured", if record.featured { "true" } else { "false" });
    if let Some(kind) = record.featured_kind {
        emit_token(&mut out, "featured_kind", kind.as_str());
    }
    emit_string(&mut out, "created_at", &record.created_at);
    emit_string(&mut out, "updated_at", &record.updated_at);

    out.push_str("---\n");

    let body = record.body.trim();
    if !body.is_empty() {
        out.push_str(body);
        out.push('\n');
    }
    out
}

/// Emit a string field unless it is absent (empty).
fn emit_string(out: &mut String, key: &str, value: &str) {
    if value.is_empty() {
        return;
    }
    out.push_str(key);
    out.push_str(": ");
    out.push_str(&yaml_scalar(value));
    out.push('\n');
}

/// Emit a fixed token (enum variants, booleans) that never needs quoting.
fn emit_token(out: &mut String, key: &str, token: &str) {
    out.push_str(key);
    out.push_str(": ");
    out.push_str(token);
    out.push('\n');
}

fn emit_number(out: &mut String, key: &str, value: Option<f64>) {
    let Some(n) = value else { return };
    out.push_str(key);
    out.push_str(": ");
    out.push_str(&render_number(n));
    out.push('\n');
}

/// Emit a block-style list; empty lists are omitted entirely.
fn emit_list(out: &mut String, key: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    out.push_str(key);
    out.push_str(":\n");
    for item in items {
        out.push_str("  - ");
        out.push_str(&yaml_scalar(item));
        out.push('\n');
    }
}

/// Render a scalar, double-quoting when plain style would be ambiguous:
/// markup-significant characters, leading/trailing space, newlines, or a
/// value YAML would reinterpret as a non-string (booleans, numbers).
fn yaml_scalar(value: &str) -> String {
    if needs_quotes(value) {
        let mut quoted = String::with_capacity(value.len() + 2);
        quoted.push('"');
        for c in value.chars() {
            match c {
                '\\' => quoted.push_str("\\\\"),
                '"' => quoted.push_str("\\\""),
                '\n' => quoted.push_str("\\n"),
                '\r' => quoted.push_str("\\r"),
                '\t' => quoted.push_str("\\t"),
                _ => quoted.push(c),
            }
        }
        quoted.push('"');
        quoted
    } else {
        value.to_string()
    }
}

fn needs_quotes(value: &str) -> bool {
    if value.is_empty() {
        return true;
    }
    if value.starts_with([' ', '-', '?', '!']) || value.ends_with(' ') {
        return true;
    }
    if value.chars().any(|c| {
        matches!(
            c,
            ':' | '#' | '[' | ']' | '{' | '}' | '"' | '\'' | ',' | '&' | '*' | '|' | '>' | '%'
                | '@' | '`' | '\n' | '\r' | '\t'
        )
    }) {
        return true;
    }
    // Plain style must not round-trip into a bool/number/null
    looks_like_yaml_literal(value)
}

fn looks_like_yaml_literal(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "true" | "false" | "yes" | "no" | "on" | "off" | "null" | "~"
    ) || value.parse::<f64>().is_ok()
}

fn render_number(n: f64) -> String {
    if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// Run the `fmt` command: rewrite every event file under the given path
/// into canonical serialization. With `--check`, report drifted files
/// and fail without writing.
pub fn run_fmt(args: FmtArgs, ctx: &AppContext) -> Result<()> {
    let cfg = config::load_config().unwrap_or_default();
    let files = store::collect_event_files(&args.path, &cfg.scan.ignore)?;

    let mut drifted = Vec::new();
    for file in files {
        let record = store::load_record(&file)?;
        let canonical = serialize_record(&record);
        let current = std::fs::read_to_string(&file)
            .with_context(|| format!("Failed to read {}", file.display()))?;

        if current == canonical {
            continue;
        }
        drifted.push(file.clone());

        if args.check || ctx.dry_run {
            continue;
        }
        std::fs::write(&file, canonical)
            .with_context(|| format!("Failed to write {}", file.display()))?;
        if !ctx.quiet {
            println!("rewrote {}", file.display());
        }
    }

    debug!(drifted = drifted.len(), "fmt pass complete");

    if args.check && !drifted.is_empty() {
        for file in &drifted {
            println!("would rewrite {}", file.display());
        }
        anyhow::bail!("{} file(s) not in canonical form", drifted.len());
    }
    Ok(())
}
