//! DNS server configuration validation
//!
//! Dispatches on a declared server dialect to a dialect-specific line scanner.
//! Each scanner is an independent pure function over the raw text that fills a
//! shared [`ValidationResult`]; the only behavior they share is comment
//! skipping. Supported dialects: BIND, NSD, Unbound, PowerDNS, djbdns.
//!
//! The BIND "recursion without allow-recursion" check is a line-local
//! substring heuristic with no block correlation. It can both false-positive
//! and false-negative against real named.conf semantics; its observable
//! behavior is kept as-is.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

use crate::dns::errors::DnsResult;

lazy_static! {
    static ref BIND_ZONE_RE: Regex = Regex::new(r#"zone\s+"([^"]+)""#).unwrap();
    static ref NSD_ZONE_NAME_RE: Regex = Regex::new(r"name:\s*(\S+)").unwrap();
    static ref UNBOUND_SECTION_RE: Regex = Regex::new(r"^([A-Za-z0-9_-]+):").unwrap();
    static ref PDNS_OPTION_RE: Regex = Regex::new(r"^([A-Za-z0-9-]+)=(.+)$").unwrap();
    static ref DJB_A_RECORD_RE: Regex =
        Regex::new(r"^\+[^:]+:\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}").unwrap();
}

/// Supported server configuration dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerKind {
    Bind,
    Nsd,
    Unbound,
    PowerDns,
    DjbDns,
}

impl ServerKind {
    /// Case-insensitive dialect lookup
    pub fn parse(name: &str) -> Option<ServerKind> {
        match name.to_lowercase().as_str() {
            "bind" => Some(ServerKind::Bind),
            "nsd" => Some(ServerKind::Nsd),
            "unbound" => Some(ServerKind::Unbound),
            "powerdns" => Some(ServerKind::PowerDns),
            "djbdns" => Some(ServerKind::DjbDns),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ServerKind::Bind => "bind",
            ServerKind::Nsd => "nsd",
            ServerKind::Unbound => "unbound",
            ServerKind::PowerDns => "powerdns",
            ServerKind::DjbDns => "djbdns",
        }
    }
}

/// Validation report for one configuration text
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub server_type: ServerKind,
    /// False only when `syntax_errors` is non-empty
    pub is_valid: bool,
    pub syntax_errors: Vec<String>,
    pub security_issues: Vec<String>,
    pub deprecated_options: Vec<String>,
    pub suggestions: Vec<String>,
    /// Detected section/option keys with the raw lines observed under each,
    /// in first-seen key order
    pub sections: Vec<(String, Vec<String>)>,
}

impl ValidationResult {
    fn new(server_type: ServerKind) -> ValidationResult {
        ValidationResult {
            server_type,
            is_valid: true,
            syntax_errors: Vec::new(),
            security_issues: Vec::new(),
            deprecated_options: Vec::new(),
            suggestions: Vec::new(),
            sections: Vec::new(),
        }
    }

    fn section_mut(&mut self, key: &str) -> &mut Vec<String> {
        let pos = match self.sections.iter().position(|(k, _)| k == key) {
            Some(pos) => pos,
            None => {
                self.sections.push((key.to_string(), Vec::new()));
                self.sections.len() - 1
            }
        };
        &mut self.sections[pos].1
    }

    fn has_section(&self, key: &str) -> bool {
        self.sections
            .iter()
            .any(|(k, lines)| k == key && !lines.is_empty())
    }

    fn syntax_error(&mut self, message: String) {
        self.syntax_errors.push(message);
        self.is_valid = false;
    }
}

/// Validate a DNS server configuration and render the report as display text.
///
/// Unknown server types short-circuit to a descriptive error string without
/// scanning; an unexpected internal failure degrades to a single-line
/// `Error validating config: ...` message.
pub fn validate_dns_config(server_type: &str, config_content: &str) -> String {
    let kind = match ServerKind::parse(server_type) {
        Some(kind) => kind,
        None => {
            return format!(
                "Error: Unknown server type '{}'. Supported types: bind, nsd, unbound, powerdns, djbdns",
                server_type
            );
        }
    };

    match try_validate(kind, config_content) {
        Ok(report) => report,
        Err(e) => format!("Error validating config: {}", e),
    }
}

fn try_validate(kind: ServerKind, config_content: &str) -> DnsResult<String> {
    Ok(format_validation_output(&validate_config(
        kind,
        config_content,
    )))
}

/// Run exactly one dialect scanner and return the structured report.
pub fn validate_config(kind: ServerKind, content: &str) -> ValidationResult {
    log::debug!("validating {} configuration", kind.name());

    let mut result = ValidationResult::new(kind);
    match kind {
        ServerKind::Bind => scan_bind(content, &mut result),
        ServerKind::Nsd => scan_nsd(content, &mut result),
        ServerKind::Unbound => scan_unbound(content, &mut result),
        ServerKind::PowerDns => scan_powerdns(content, &mut result),
        ServerKind::DjbDns => scan_djbdns(content, &mut result),
    }
    result
}

/// Shared comment-skipping convention across all dialect scanners
fn is_comment_or_blank(line: &str, markers: &[&str]) -> bool {
    line.is_empty() || markers.iter().any(|m| line.starts_with(m))
}

fn scan_bind(content: &str, result: &mut ValidationResult) {
    let mut brace_depth: i64 = 0;
    let mut configured_zones: Vec<String> = Vec::new();

    for raw in content.lines() {
        let line = raw.trim();
        if is_comment_or_blank(line, &["//", "#"]) {
            continue;
        }

        brace_depth += line.matches('{').count() as i64;
        brace_depth -= line.matches('}').count() as i64;

        if line.starts_with("options") {
            result.section_mut("options").push(line.to_string());
        } else if line.starts_with("zone") {
            // Zone names feed the absence check only; they are not a
            // detected section
            if let Some(caps) = BIND_ZONE_RE.captures(line) {
                configured_zones.push(caps[1].to_string());
            }
        }

        if line.contains("rrset-order") {
            result
                .deprecated_options
                .push("rrset-order - deprecated in BIND 9.9+".to_string());
        }
        if line.contains("slave") {
            result
                .deprecated_options
                .push("slave keyword - use secondary instead".to_string());
        }

        if line.contains("allow-transfer") && line.contains("any") {
            result
                .security_issues
                .push("allow-transfer set to any - restricts zone transfers for security".to_string());
        }
        if line.contains("recursion") && line.contains("yes") && !line.contains("allow-recursion") {
            result.security_issues.push(
                "recursion enabled without allow-recursion restriction - can lead to open resolver attacks"
                    .to_string(),
            );
        }
        if line.contains("allow-query") && line.contains("any") {
            result
                .security_issues
                .push("allow-query set to any - consider restricting query sources".to_string());
        }
        if line.contains("dnssec-validation") && line.contains("no") {
            result
                .suggestions
                .push("DNSSEC validation is disabled - enable for better security".to_string());
        }
    }

    if brace_depth != 0 {
        result.syntax_error(format!(
            "Unbalanced braces: {}",
            if brace_depth > 0 {
                "missing closing braces"
            } else {
                "missing opening braces"
            }
        ));
    }

    if !result.has_section("options") {
        result
            .suggestions
            .push("No options section found - add options block for configuration".to_string());
    }

    if configured_zones.is_empty() {
        result
            .suggestions
            .push("No zones configured - add zone statements for your domains".to_string());
    }

    if !content.contains("dnssec-enable") {
        result
            .suggestions
            .push("DNSSEC not enabled - consider enabling for security".to_string());
    }

    result
        .suggestions
        .push("Consider using BIND 9.18+ for latest security fixes".to_string());
}

fn scan_nsd(content: &str, result: &mut ValidationResult) {
    let mut in_server_section = false;
    let mut in_zone_section = false;
    let mut configured_zones: Vec<String> = Vec::new();

    for raw in content.lines() {
        let line = raw.trim();
        if is_comment_or_blank(line, &["#", ";"]) {
            continue;
        }

        // Whichever block header was seen most recently is current
        if line == "server:" {
            in_server_section = true;
            in_zone_section = false;
        } else if line == "zone:" {
            in_zone_section = true;
            in_server_section = false;
        }

        if in_server_section && line.starts_with("ip-address:") {
            result.section_mut("server").push(line.to_string());
        }

        if in_zone_section && line.starts_with("name:") {
            if let Some(caps) = NSD_ZONE_NAME_RE.captures(line) {
                configured_zones.push(caps[1].to_string());
            }
        }

        if line.contains("provide-xfr") && line.contains("0.0.0.0/0") {
            result
                .security_issues
                .push("Zone transfer allowed from any host - restrict to your secondaries".to_string());
        }

        if line.contains("allow-notify") && line.contains("0.0.0.0/0") {
            result
                .security_issues
                .push("NOTIFY allowed from any host - restrict to your primaries".to_string());
        }

        if line.contains("tcp:") {
            result
                .deprecated_options
                .push("tcp option - NSD now auto-enables TCP".to_string());
        }
    }

    if configured_zones.is_empty() {
        result
            .suggestions
            .push("No zones configured - add zone sections".to_string());
    }

    result
        .suggestions
        .push("Ensure zonefiles exist at configured paths".to_string());
}

fn scan_unbound(content: &str, result: &mut ValidationResult) {
    let mut section_names: HashSet<String> = HashSet::new();

    for raw in content.lines() {
        let line = raw.trim();
        if is_comment_or_blank(line, &["#", ";"]) {
            continue;
        }

        if let Some(caps) = UNBOUND_SECTION_RE.captures(line) {
            section_names.insert(caps[1].to_string());
        }

        if line.contains("interface:") && line.contains("0.0.0.0") {
            result.section_mut("interface").push(line.to_string());
        }

        if line.contains("access-control")
            && line.contains("allow")
            && line.contains("0.0.0.0/0")
        {
            result
                .security_issues
                .push("access-control allows from 0.0.0.0/0 - publicly accessible".to_string());
        }

        if line.contains("edns-buffer-size") && line.contains("512") {
            result.suggestions.push(
                "EDNS buffer size set to 512 - consider increasing to 1280+ for DNSSEC".to_string(),
            );
        }

        if line.contains("dnssec-validation:") && line.contains("no") {
            result
                .suggestions
                .push("DNSSEC validation disabled - enable for security".to_string());
        }
    }

    // Global absence check, once per scan
    if !content.contains("ratelimit") {
        result
            .suggestions
            .push("No rate limiting configured - consider adding rate-limit".to_string());
    }

    if !section_names.contains("server") {
        result.syntax_error("Missing server: section".to_string());
    }

    if !section_names.contains("forward-zone") && !section_names.contains("stub-zone") {
        result
            .suggestions
            .push("No forward-zone or stub-zone configured".to_string());
    }

    result.suggestions.push(
        "Ensure log-file has appropriate permissions (usually Unbound runs as unbound user)"
            .to_string(),
    );
}

fn scan_powerdns(content: &str, result: &mut ValidationResult) {
    let mut configured_zones: Vec<String> = Vec::new();

    for raw in content.lines() {
        let line = raw.trim();
        if is_comment_or_blank(line, &["#", ";"]) {
            continue;
        }

        if let Some(caps) = PDNS_OPTION_RE.captures(line) {
            let key = caps[1].to_string();
            let value = caps[2].to_string();

            if key == "zone" {
                configured_zones.push(value.clone());
            }

            if key == "allow-recursion" && value.contains("0.0.0.0/0") {
                result
                    .security_issues
                    .push("Recursion allowed from any source - restrict this".to_string());
            }

            if key == "allow-axfr-ips" && value.contains("0.0.0.0/0") {
                result
                    .security_issues
                    .push("Zone transfers allowed from any IP - restrict to your secondaries".to_string());
            }

            if key == "api" && value.contains("yes") && !content.contains("api-key") {
                result
                    .security_issues
                    .push("API enabled without api-key - add api-key for security".to_string());
            }

            result
                .section_mut(&key)
                .push(format!("{}={}", key, value));
        }

        if line.starts_with("launch=") && line.contains("gmysql") {
            result.suggestions.push(
                "gmysql backend - ensure MySQL/MariaDB backend is properly configured".to_string(),
            );
        }
    }

    if configured_zones.is_empty() {
        result
            .suggestions
            .push("No zones configured - add zone= entries or use database backend".to_string());
    }

    if !content.contains("api=") {
        result
            .suggestions
            .push("API not configured - enable for easier zone management".to_string());
    }

    result
        .suggestions
        .push("Ensure database backend is properly initialized and accessible".to_string());
}

fn scan_djbdns(content: &str, result: &mut ValidationResult) {
    let mut record_count = 0usize;

    for raw in content.lines() {
        let line = raw.trim();
        if is_comment_or_blank(line, &["#"]) {
            continue;
        }

        let leader = match line.chars().next() {
            Some(c) if ".+&|%^@=".contains(c) => c,
            _ => continue,
        };
        record_count += 1;

        match leader {
            '.' => {
                // NS line format: .fqdn:ip:x:ttl:timestamp:loc
                if !line.contains(':') {
                    result.syntax_error(format!("Invalid NS record format: {}", clip(line, 50)));
                }
            }
            '+' => {
                // A line format: +fqdn:ip:ttl:timestamp:loc
                if !DJB_A_RECORD_RE.is_match(line) {
                    result
                        .suggestions
                        .push(format!("A record may have invalid format: {}", clip(line, 50)));
                }
            }
            '@' => {
                // MX line format: @fqdn:ip:mx:ttl:timestamp:loc
                if !line.contains(':') {
                    result.syntax_error(format!("Invalid MX record format: {}", clip(line, 50)));
                }
            }
            _ => {}
        }
    }

    if record_count == 0 {
        result.syntax_error("No DNS records found in tinydns data file".to_string());
    }

    result
        .suggestions
        .push("Ensure tinydns data file is compiled with tinydns-data before use".to_string());
    result
        .suggestions
        .push("Test with dnstracesoa to verify zone data".to_string());
}

fn clip(line: &str, limit: usize) -> String {
    line.chars().take(limit).collect()
}

/// Render the validation report. Section order and omission of empty sections
/// are a compatibility contract.
pub fn format_validation_output(result: &ValidationResult) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!(
        "=== {} Configuration Validation ===",
        result.server_type.name().to_uppercase()
    ));
    lines.push(String::new());

    if result.is_valid {
        lines.push("Status: VALID".to_string());
    } else {
        lines.push("Status: INVALID".to_string());
    }
    lines.push(String::new());

    if !result.syntax_errors.is_empty() {
        lines.push("SYNTAX ERRORS:".to_string());
        for err in &result.syntax_errors {
            lines.push(format!("  - {}", err));
        }
        lines.push(String::new());
    }

    if !result.security_issues.is_empty() {
        lines.push("SECURITY ISSUES:".to_string());
        for issue in &result.security_issues {
            lines.push(format!("  - {}", issue));
        }
        lines.push(String::new());
    }

    if !result.deprecated_options.is_empty() {
        lines.push("DEPRECATED OPTIONS:".to_string());
        for opt in &result.deprecated_options {
            lines.push(format!("  - {}", opt));
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

    if !result.sections.is_empty() {
        lines.push("DETECTED SECTIONS:".to_string());
        for (section, items) in &result.sections {
            lines.push(format!("  {}: {} item(s)", section, items.len()));
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_kind_parse_case_insensitive() {
        assert_eq!(ServerKind::parse("BIND"), Some(ServerKind::Bind));
        assert_eq!(ServerKind::parse("PowerDNS"), Some(ServerKind::PowerDns));
        assert_eq!(ServerKind::parse("ftp"), None);
    }

    #[test]
    fn test_unknown_server_type_message() {
        assert_eq!(
            validate_dns_config("ftp", ""),
            "Error: Unknown server type 'ftp'. Supported types: bind, nsd, unbound, powerdns, djbdns"
        );
    }

    #[test]
    fn test_bind_brace_imbalance() {
        let config = "options {\n  directory \"/var/cache/bind\";\n";
        let result = validate_config(ServerKind::Bind, config);
        assert!(!result.is_valid);
        assert!(result.syntax_errors[0].contains("missing closing braces"));

        let config = "options {\n  recursion no;\n};\n};\n";
        let result = validate_config(ServerKind::Bind, config);
        assert!(!result.is_valid);
        assert!(result.syntax_errors[0].contains("missing opening braces"));
    }

    #[test]
    fn test_bind_security_checks() {
        let config = "\
options {\n\
  allow-transfer { any; };\n\
  recursion yes;\n\
  allow-query { any; };\n\
};\n";
        let result = validate_config(ServerKind::Bind, config);
        assert!(result.is_valid);
        assert_eq!(result.security_issues.len(), 3);
        assert!(result.security_issues[1].contains("open resolver"));
    }

    #[test]
    fn test_bind_recursion_with_allow_recursion_same_line() {
        // Line-local heuristic: allow-recursion on the same line suppresses it
        let config = "recursion yes; allow-recursion { internals; };\n";
        let result = validate_config(ServerKind::Bind, config);
        assert!(result.security_issues.is_empty());
    }

    #[test]
    fn test_bind_deprecated_options() {
        let config = "zone \"x.com\" {\n  type slave;\n  rrset-order fixed;\n};\n";
        let result = validate_config(ServerKind::Bind, config);
        assert_eq!(result.deprecated_options.len(), 2);
    }

    #[test]
    fn test_bind_always_suggests_upgrade() {
        let result = validate_config(ServerKind::Bind, "");
        assert!(result
            .suggestions
            .iter()
            .any(|s| s.contains("BIND 9.18+")));
    }

    #[test]
    fn test_nsd_sections_and_zones() {
        let config = "\
server:\n\
  ip-address: 127.0.0.1\n\
  ip-address: ::1\n\
zone:\n\
  name: example.com\n\
  provide-xfr: 0.0.0.0/0 NOKEY\n";
        let result = validate_config(ServerKind::Nsd, config);
        assert!(result.is_valid);
        assert!(result.has_section("server"));
        assert_eq!(result.sections[0].1.len(), 2);
        assert_eq!(result.security_issues.len(), 1);
        assert!(!result
            .suggestions
            .iter()
            .any(|s| s.contains("No zones configured")));
    }

    #[test]
    fn test_unbound_missing_server_section() {
        let result = validate_config(ServerKind::Unbound, "forward-zone:\n  name: \".\"\n");
        assert!(!result.is_valid);
        assert!(result.syntax_errors[0].contains("Missing server"));
        // forward-zone present, so no forward/stub suggestion
        assert!(!result
            .suggestions
            .iter()
            .any(|s| s.contains("No forward-zone or stub-zone")));
    }

    #[test]
    fn test_unbound_ratelimit_suggested_once() {
        let config = "server:\n  verbosity: 1\n  interface: 0.0.0.0\n  num-threads: 2\n";
        let result = validate_config(ServerKind::Unbound, config);
        let count = result
            .suggestions
            .iter()
            .filter(|s| s.contains("rate limiting"))
            .count();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_powerdns_api_without_key() {
        let config = "api=yes\nlaunch=gmysql\n";
        let result = validate_config(ServerKind::PowerDns, config);
        assert!(result
            .security_issues
            .iter()
            .any(|s| s.contains("API enabled without api-key")));
        assert!(result
            .suggestions
            .iter()
            .any(|s| s.contains("gmysql backend")));

        let config = "api=yes\napi-key=secret\n";
        let result = validate_config(ServerKind::PowerDns, config);
        assert!(result.security_issues.is_empty());
    }

    #[test]
    fn test_powerdns_sections_accumulate() {
        let config = "local-address=127.0.0.1\nlocal-address=::1\nzone=example.com\n";
        let result = validate_config(ServerKind::PowerDns, config);
        assert_eq!(result.sections[0].0, "local-address");
        assert_eq!(result.sections[0].1.len(), 2);
        assert!(result.has_section("zone"));
    }

    #[test]
    fn test_djbdns_record_shapes() {
        let config = "\
.example.com:192.0.2.1:a:259200\n\
+www.example.com:192.0.2.10:86400\n\
@example.com:192.0.2.20:mail.example.com:10\n";
        let result = validate_config(ServerKind::DjbDns, config);
        assert!(result.is_valid);
        assert!(result.syntax_errors.is_empty());
    }

    #[test]
    fn test_djbdns_empty_data_is_error() {
        let result = validate_config(ServerKind::DjbDns, "# nothing here\n");
        assert!(!result.is_valid);
        assert!(result.syntax_errors[0].contains("No DNS records found"));
    }

    #[test]
    fn test_djbdns_malformed_ns_record() {
        let result = validate_config(ServerKind::DjbDns, ".example-without-colon\n");
        assert!(!result.is_valid);
        assert!(result.syntax_errors[0].starts_with("Invalid NS record format:"));
    }

    #[test]
    fn test_case_insensitive_dispatch_identical_output() {
        let config = "options {\n  recursion no;\n};\n";
        assert_eq!(
            validate_dns_config("bind", config),
            validate_dns_config("BIND", config)
        );
    }

    #[test]
    fn test_report_idempotent() {
        let config = "server:\n  ip-address: 0.0.0.0\n";
        assert_eq!(
            validate_dns_config("nsd", config),
            validate_dns_config("nsd", config)
        );
    }
}
