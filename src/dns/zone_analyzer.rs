//! Zone file analysis and validation
//!
//! Parses RFC 1035 style zone file text into resource record entries, computes
//! aggregate statistics, and checks zone-level invariants:
//! * SOA presence and uniqueness
//! * NS presence and redundancy
//! * CNAME exclusivity per owner name
//! * SOA serial syntax and range
//! * TTL sanity (zero and excessive values)
//! * Record type support and per-type value shape
//!
//! Multi-line records (parenthesized groups) are merged with a greedy,
//! non-nesting scan: an opening `(` without a `)` on the same line starts a
//! merge that runs until the first line containing `)`. Nested or repeated
//! groups on a continuation line are treated as plain concatenation.

use lazy_static::lazy_static;
use regex::Regex;

use crate::dns::errors::DnsResult;

/// Record type mnemonics the analyzer accepts
const SUPPORTED_TYPES: &[&str] = &[
    "A", "AAAA", "MX", "NS", "TXT", "SOA", "CNAME", "PTR", "SRV", "CAA", "TLSA", "DNSKEY", "DS",
    "NSEC", "NSEC3", "RRSIG", "SPF", "AFSDB", "DHCID", "DLV",
];

/// TTLs above 30 days are flagged as propagation hazards
const MAX_SANE_TTL: u32 = 2_592_000;

lazy_static! {
    static ref IPV4_RE: Regex = Regex::new(r"^(\d{1,3}\.){3}\d{1,3}$").unwrap();
    static ref IPV6_RE: Regex = Regex::new(r"(?i)^[0-9a-f:]+$").unwrap();
}

/// One parsed resource record line
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneRecord {
    /// Owner name token, possibly relative (`@`, bare label) or absolute
    pub name: String,
    /// Explicit TTL, present only when a numeric token follows the name
    pub ttl: Option<u32>,
    /// Uppercased record type mnemonic
    pub rtype: String,
    /// Remaining tokens rejoined with single spaces, unparsed
    pub value: String,
    /// Merged original text, retained for diagnostics
    pub line: String,
}

/// Aggregate statistics over the parsed record sequence
#[derive(Debug, Clone, Default)]
pub struct ZoneStats {
    pub total_records: usize,
    /// Per-type histogram in first-seen order
    pub record_types: Vec<(String, usize)>,
    pub soa_count: usize,
    pub ns_count: usize,
    /// TTL min/max/average over records carrying an explicit TTL; zeroed when
    /// `ttl_samples` is 0
    pub ttl_min: u32,
    pub ttl_max: u32,
    pub ttl_average: u32,
    /// Number of records that carried an explicit TTL
    pub ttl_samples: usize,
}

/// Full analysis report for one zone text
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub suggestions: Vec<String>,
    pub stats: ZoneStats,
}

impl AnalysisResult {
    fn new() -> AnalysisResult {
        AnalysisResult {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            suggestions: Vec::new(),
            stats: ZoneStats::default(),
        }
    }
}

/// Analyze a zone file and render the report as display text.
///
/// Always returns text: malformed zone data is reported inside the rendered
/// report, and an unexpected internal failure degrades to a single-line
/// `Error analyzing zone file: ...` message.
pub fn analyze_zone_file(zone_content: &str, zone_name: &str) -> String {
    match try_analyze(zone_content, zone_name) {
        Ok(report) => report,
        Err(e) => format!("Error analyzing zone file: {}", e),
    }
}

fn try_analyze(zone_content: &str, zone_name: &str) -> DnsResult<String> {
    let result = analyze_zone(zone_content, zone_name);
    Ok(format_analysis_output(&result))
}

/// Analyze a zone file and return the structured report.
pub fn analyze_zone(zone_content: &str, zone_name: &str) -> AnalysisResult {
    log::debug!("analyzing zone file for {}", zone_name);

    let mut result = AnalysisResult::new();
    let records = parse_records(zone_content);

    let mut ttl_sum: u64 = 0;
    let mut ttl_min = u32::MAX;
    let mut ttl_max = 0u32;

    for record in &records {
        result.stats.total_records += 1;

        match result
            .stats
            .record_types
            .iter_mut()
            .find(|(t, _)| t == &record.rtype)
        {
            Some(entry) => entry.1 += 1,
            None => result.stats.record_types.push((record.rtype.clone(), 1)),
        }

        if record.rtype == "SOA" {
            result.stats.soa_count += 1;
        }
        if record.rtype == "NS" {
            result.stats.ns_count += 1;
        }

        if let Some(ttl) = record.ttl {
            ttl_sum += u64::from(ttl);
            result.stats.ttl_samples += 1;
            ttl_min = ttl_min.min(ttl);
            ttl_max = ttl_max.max(ttl);
        }
    }

    if result.stats.ttl_samples > 0 {
        result.stats.ttl_min = ttl_min;
        result.stats.ttl_max = ttl_max;
        let average = ttl_sum as f64 / result.stats.ttl_samples as f64;
        result.stats.ttl_average = average.round() as u32;
    }

    validate_records(&records, &mut result);

    result
}

/// Split zone text into logical record lines and parse each one.
///
/// Blank lines and `;` comment lines are skipped entirely. Continuation lines
/// of an open parenthesized group are consumed by the merge, so they never
/// parse as stand-alone records.
fn parse_records(content: &str) -> Vec<ZoneRecord> {
    let mut records = Vec::new();
    let mut in_multiline = false;
    let mut buffer = String::new();

    for raw in content.lines() {
        let line = raw.trim();

        if in_multiline {
            buffer.push(' ');
            buffer.push_str(line);
            if line.contains(')') {
                in_multiline = false;
                if let Some(record) = parse_zone_record(&strip_parens(&buffer)) {
                    records.push(record);
                }
                buffer.clear();
            }
            continue;
        }

        if line.is_empty() || line.starts_with(';') {
            continue;
        }

        if line.contains('(') && !line.contains(')') {
            in_multiline = true;
            buffer = line.to_string();
            continue;
        }

        if let Some(record) = parse_zone_record(&strip_parens(line)) {
            records.push(record);
        }
    }

    // Unterminated group at end of input: parse what was gathered.
    if in_multiline {
        if let Some(record) = parse_zone_record(&strip_parens(&buffer)) {
            records.push(record);
        }
    }

    records
}

fn strip_parens(line: &str) -> String {
    line.chars().filter(|c| *c != '(' && *c != ')').collect()
}

/// Parse a single logical line into a record.
///
/// Field recognition order: owner name, optional numeric TTL, optional class
/// (`IN`, `CH`, `HS`), record type, value. Lines yielding fewer than three
/// tokens are discarded without error.
fn parse_zone_record(line: &str) -> Option<ZoneRecord> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 3 {
        return None;
    }

    let mut idx = 0;
    let name = parts[idx].to_string();
    idx += 1;

    let mut ttl = None;
    if let Ok(value) = parts[idx].parse::<u32>() {
        ttl = Some(value);
        idx += 1;
    }

    if idx < parts.len() && matches!(parts[idx], "IN" | "CH" | "HS") {
        idx += 1;
    }

    if idx >= parts.len() {
        return None;
    }

    let rtype = parts[idx].to_uppercase();
    idx += 1;

    let value = parts[idx..].join(" ");

    Some(ZoneRecord {
        name,
        ttl,
        rtype,
        value,
        line: line.to_string(),
    })
}

/// Apply the zone-level validation rules over the collected record sequence.
///
/// Errors flip `is_valid`; warnings and suggestions never do. Messages are
/// appended in scan order of detection and are not deduplicated.
fn validate_records(records: &[ZoneRecord], result: &mut AnalysisResult) {
    if result.stats.soa_count == 0 {
        result
            .errors
            .push("Missing SOA record - zone must have exactly one SOA record".to_string());
        result.is_valid = false;
    } else if result.stats.soa_count > 1 {
        result.errors.push(format!(
            "Multiple SOA records found ({}) - zone should have exactly one",
            result.stats.soa_count
        ));
        result.is_valid = false;
    }

    if result.stats.ns_count == 0 {
        result.errors.push(
            "Missing NS records - zone must have at least one NS record at the zone apex"
                .to_string(),
        );
        result.is_valid = false;
    } else if result.stats.ns_count < 2 {
        result
            .warnings
            .push("Only one NS record found - redundancy is recommended".to_string());
    }

    // CNAME may not share an owner name with any other record type
    for cname in records.iter().filter(|r| r.rtype == "CNAME") {
        let conflicts = records
            .iter()
            .any(|r| r.rtype != "CNAME" && r.name == cname.name);
        if conflicts {
            result.errors.push(format!(
                "CNAME conflict at {}: CNAME cannot coexist with other records",
                cname.name
            ));
            result.is_valid = false;
        }
    }

    if let Some(soa) = records.iter().find(|r| r.rtype == "SOA") {
        let soa_parts: Vec<&str> = soa.value.split_whitespace().collect();
        if soa_parts.len() >= 3 {
            match soa_parts[2].parse::<i64>() {
                Ok(serial) => {
                    if !(1..=4_294_967_295).contains(&serial) {
                        result.warnings.push(format!(
                            "SOA serial {} is outside recommended range (1-4294967295)",
                            serial
                        ));
                    }
                }
                Err(_) => {
                    result
                        .errors
                        .push("Invalid SOA serial number format".to_string());
                    result.is_valid = false;
                }
            }
        }
    }

    if result.stats.ttl_samples == 0 {
        result
            .warnings
            .push("No explicit TTL values found - default TTL will be used".to_string());
    } else {
        if result.stats.ttl_min == 0 {
            result
                .warnings
                .push("Zero TTL found - DNS entries will not be cached".to_string());
        }
        if result.stats.ttl_max > MAX_SANE_TTL {
            result.warnings.push(format!(
                "High TTL detected ({}s) - may slow down propagation of changes",
                result.stats.ttl_max
            ));
        }
    }

    for record in records {
        if !is_supported_type(&record.rtype) {
            result
                .errors
                .push(format!("Invalid record type: {}", record.rtype));
            result.is_valid = false;
        }

        if let Some(issue) = check_record_value(&record.rtype, &record.value) {
            result
                .warnings
                .push(format!("{} record validation: {}", record.rtype, issue));
        }
    }

    if !records.iter().any(|r| r.rtype == "MX") {
        result
            .suggestions
            .push("No MX records found - add MX records if this zone handles email".to_string());
    }

    if !records.iter().any(|r| r.rtype == "AAAA") {
        result
            .suggestions
            .push("No AAAA records found - consider adding IPv6 support".to_string());
    }

    if !records.iter().any(|r| r.rtype == "CAA") {
        result.suggestions.push(
            "No CAA records found - add CAA records to restrict certificate issuance".to_string(),
        );
    }

    if !records
        .iter()
        .any(|r| r.rtype == "DNSKEY" || r.rtype == "DS")
    {
        result
            .suggestions
            .push("DNSSEC is not configured - consider enabling DNSSEC for security".to_string());
    }
}

fn is_supported_type(rtype: &str) -> bool {
    SUPPORTED_TYPES.contains(&rtype)
}

/// Type-specific spot checks on the unparsed value. Advisory only.
fn check_record_value(rtype: &str, value: &str) -> Option<&'static str> {
    match rtype {
        "A" => {
            if IPV4_RE.is_match(value) {
                None
            } else {
                Some("Invalid IPv4 address format")
            }
        }
        "AAAA" => {
            if IPV6_RE.is_match(value) {
                None
            } else {
                Some("Invalid IPv6 address format")
            }
        }
        "MX" => {
            let parts: Vec<&str> = value.split_whitespace().collect();
            if parts.len() < 2 {
                Some("MX record must have priority and exchange")
            } else if parts[0].parse::<i64>().is_err() {
                Some("Invalid MX priority")
            } else {
                None
            }
        }
        "SOA" => {
            if value.split_whitespace().count() < 7 {
                Some("SOA record incomplete")
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Render the analysis report. Section order and omission of empty sections
/// are a compatibility contract; the TTL block is suppressed when no record
/// carried an explicit TTL.
pub fn format_analysis_output(result: &AnalysisResult) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push("=== DNS Zone File Analysis ===".to_string());
    lines.push(String::new());

    if result.is_valid {
        lines.push("Status: VALID".to_string());
    } else {
        lines.push("Status: INVALID".to_string());
    }
    lines.push(String::new());

    if !result.errors.is_empty() {
        lines.push("ERRORS:".to_string());
        for err in &result.errors {
            lines.push(format!("  - {}", err));
        }
        lines.push(String::new());
    }

    if !result.warnings.is_empty() {
        lines.push("WARNINGS:".to_string());
        for warn in &result.warnings {
            lines.push(format!("  - {}", warn));
        }
        lines.push(String::new());
    }

    if !result.suggestions.is_empty() {
        lines.push("SUGGESTIONS:".to_string());
        for sugg in &result.suggestions {
            lines.push(format!("  - {}", sugg));
        }
        lines.push(String::new());
    }

    lines.push("STATISTICS:".to_string());
    lines.push(format!("  Total Records: {}", result.stats.total_records));
    lines.push(format!("  SOA Records: {}", result.stats.soa_count));
    lines.push(format!("  NS Records: {}", result.stats.ns_count));
    lines.push(String::new());
    lines.push("Record Types:".to_string());

    let mut types = result.stats.record_types.clone();
    types.sort_by(|a, b| b.1.cmp(&a.1));
    for (rtype, count) in &types {
        lines.push(format!("    {}: {}", rtype, count));
    }
    lines.push(String::new());

    if result.stats.ttl_samples > 0 {
        lines.push("TTL Statistics:".to_string());
        lines.push(format!("  Minimum: {}s", result.stats.ttl_min));
        lines.push(format!("  Maximum: {}s", result.stats.ttl_max));
        lines.push(format!("  Average: {}s", result.stats.ttl_average));
    }

    lines.join("\n")
}
