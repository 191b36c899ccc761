//! DNS troubleshooting checks
//!
//! Runs a battery of checks over a domain (format validity, delegation,
//! address/mail/SOA records, DNSSEC keys, resolver propagation, common
//! misconfigurations) and renders a report with per-check status and
//! deduplicated recommendations.
//!
//! Lookups go through the [`ProbeSource`] trait rather than the network, so
//! the checks are deterministic and unit-testable; [`StaticProbe`] is a
//! fixture-backed implementation. Wiring a live resolver in means
//! implementing `ProbeSource` on top of one.

use std::collections::HashMap;

use chrono::{SecondsFormat, Utc};
use lazy_static::lazy_static;
use regex::Regex;

use crate::dns::errors::{AdvisorError, DnsResult};

lazy_static! {
    static ref DOMAIN_RE: Regex =
        Regex::new(r"(?i)^(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,}$").unwrap();
}

/// Public resolvers consulted by the propagation check
const PUBLIC_RESOLVERS: &[(&str, &str)] = &[
    ("Google", "8.8.8.8"),
    ("Cloudflare", "1.1.1.1"),
    ("Quad9", "9.9.9.9"),
    ("OpenDNS", "208.67.222.222"),
];

const COMMON_SUBDOMAINS: &[&str] = &["www", "mail", "ftp"];

#[derive(Debug, Clone, PartialEq)]
pub struct MxRecord {
    pub priority: u16,
    pub exchange: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SoaRecord {
    pub nsname: String,
    pub hostmaster: String,
    pub serial: u32,
    pub refresh: u32,
    pub retry: u32,
    pub expire: u32,
    pub minttl: u32,
}

/// Source of DNS answers for the debugger checks
pub trait ProbeSource {
    fn lookup_ns(&self, domain: &str) -> DnsResult<Vec<String>>;
    fn lookup_a(&self, domain: &str) -> DnsResult<Vec<String>>;
    fn lookup_aaaa(&self, domain: &str) -> DnsResult<Vec<String>>;
    fn lookup_mx(&self, domain: &str) -> DnsResult<Vec<MxRecord>>;
    fn lookup_txt(&self, domain: &str) -> DnsResult<Vec<String>>;
    fn lookup_soa(&self, domain: &str) -> DnsResult<SoaRecord>;
    fn lookup_dnskey(&self, domain: &str) -> DnsResult<Vec<String>>;
    /// Whether the given public resolver already answers for the domain
    fn resolver_has_answer(&self, resolver_ip: &str, domain: &str) -> bool;
}

/// Fixture-backed probe. Lookups not seeded with data fail with a nodata
/// error; resolvers not seeded report as propagated.
#[derive(Debug, Default)]
pub struct StaticProbe {
    ns: HashMap<String, Vec<String>>,
    a: HashMap<String, Vec<String>>,
    aaaa: HashMap<String, Vec<String>>,
    mx: HashMap<String, Vec<MxRecord>>,
    txt: HashMap<String, Vec<String>>,
    soa: HashMap<String, SoaRecord>,
    dnskey: HashMap<String, Vec<String>>,
    unpropagated: Vec<String>,
}

impl StaticProbe {
    pub fn new() -> StaticProbe {
        StaticProbe::default()
    }

    pub fn with_ns(mut self, domain: &str, hosts: &[&str]) -> Self {
        self.ns.insert(
            domain.to_string(),
            hosts.iter().map(|s| s.to_string()).collect(),
        );
        self
    }

    pub fn with_a(mut self, domain: &str, addrs: &[&str]) -> Self {
        self.a.insert(
            domain.to_string(),
            addrs.iter().map(|s| s.to_string()).collect(),
        );
        self
    }

    pub fn with_aaaa(mut self, domain: &str, addrs: &[&str]) -> Self {
        self.aaaa.insert(
            domain.to_string(),
            addrs.iter().map(|s| s.to_string()).collect(),
        );
        self
    }

    pub fn with_mx(mut self, domain: &str, records: Vec<MxRecord>) -> Self {
        self.mx.insert(domain.to_string(), records);
        self
    }

    pub fn with_txt(mut self, domain: &str, values: &[&str]) -> Self {
        self.txt.insert(
            domain.to_string(),
            values.iter().map(|s| s.to_string()).collect(),
        );
        self
    }

    pub fn with_soa(mut self, domain: &str, soa: SoaRecord) -> Self {
        self.soa.insert(domain.to_string(), soa);
        self
    }

    pub fn with_dnskey(mut self, domain: &str, keys: &[&str]) -> Self {
        self.dnskey.insert(
            domain.to_string(),
            keys.iter().map(|s| s.to_string()).collect(),
        );
        self
    }

    /// Mark a resolver IP as not yet carrying the domain
    pub fn with_unpropagated(mut self, resolver_ip: &str) -> Self {
        self.unpropagated.push(resolver_ip.to_string());
        self
    }

    fn fetch<'a, T>(
        map: &'a HashMap<String, Vec<T>>,
        domain: &str,
        query: &str,
    ) -> DnsResult<Vec<T>>
    where
        T: Clone,
    {
        map.get(domain)
            .cloned()
            .ok_or_else(|| AdvisorError::probe(domain, query, "no data"))
    }
}

impl ProbeSource for StaticProbe {
    fn lookup_ns(&self, domain: &str) -> DnsResult<Vec<String>> {
        Self::fetch(&self.ns, domain, "NS")
    }

    fn lookup_a(&self, domain: &str) -> DnsResult<Vec<String>> {
        Self::fetch(&self.a, domain, "A")
    }

    fn lookup_aaaa(&self, domain: &str) -> DnsResult<Vec<String>> {
        Self::fetch(&self.aaaa, domain, "AAAA")
    }

    fn lookup_mx(&self, domain: &str) -> DnsResult<Vec<MxRecord>> {
        Self::fetch(&self.mx, domain, "MX")
    }

    fn lookup_txt(&self, domain: &str) -> DnsResult<Vec<String>> {
        Self::fetch(&self.txt, domain, "TXT")
    }

    fn lookup_soa(&self, domain: &str) -> DnsResult<SoaRecord> {
        self.soa
            .get(domain)
            .cloned()
            .ok_or_else(|| AdvisorError::probe(domain, "SOA", "no data"))
    }

    fn lookup_dnskey(&self, domain: &str) -> DnsResult<Vec<String>> {
        Self::fetch(&self.dnskey, domain, "DNSKEY")
    }

    fn resolver_has_answer(&self, resolver_ip: &str, _domain: &str) -> bool {
        !self.unpropagated.iter().any(|ip| ip == resolver_ip)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

impl CheckStatus {
    fn label(&self) -> &'static str {
        match self {
            CheckStatus::Pass => "PASS",
            CheckStatus::Warn => "WARN",
            CheckStatus::Fail => "FAIL",
        }
    }

    fn glyph(&self) -> &'static str {
        match self {
            CheckStatus::Pass => "✓",
            CheckStatus::Warn => "⚠",
            CheckStatus::Fail => "✗",
        }
    }
}

#[derive(Debug)]
pub struct DebugCheck {
    pub name: &'static str,
    pub status: CheckStatus,
    pub details: Vec<String>,
}

impl DebugCheck {
    fn new(name: &'static str) -> DebugCheck {
        DebugCheck {
            name,
            status: CheckStatus::Pass,
            details: Vec::new(),
        }
    }
}

#[derive(Debug)]
pub struct DebugReport {
    pub domain: String,
    pub checks: Vec<DebugCheck>,
    pub recommendations: Vec<String>,
}

impl DebugReport {
    fn recommend(&mut self, text: String) {
        if !self.recommendations.contains(&text) {
            self.recommendations.push(text);
        }
    }
}

/// Run the debug checks for a domain and render the report.
pub fn debug_dns_issue(
    domain: &str,
    issue: Option<&str>,
    check_dnssec: bool,
    check_propagation: bool,
    probe: &dyn ProbeSource,
) -> String {
    if let Some(issue) = issue {
        log::debug!("debugging {} (reported issue: {})", domain, issue);
    }

    let report = run_checks(domain, check_dnssec, check_propagation, probe);
    format_debug_output(&report)
}

/// Run the debug checks and return the structured report.
pub fn run_checks(
    domain: &str,
    check_dnssec: bool,
    check_propagation: bool,
    probe: &dyn ProbeSource,
) -> DebugReport {
    let mut report = DebugReport {
        domain: domain.to_string(),
        checks: Vec::new(),
        recommendations: Vec::new(),
    };

    check_domain_validity(domain, &mut report);
    check_nameserver_delegation(domain, probe, &mut report);
    check_address_records(domain, probe, &mut report);
    check_mail_records(domain, probe, &mut report);
    check_soa_record(domain, probe, &mut report);
    if check_dnssec {
        check_dnssec_keys(domain, probe, &mut report);
    }
    if check_propagation {
        check_dns_propagation(domain, probe, &mut report);
    }
    check_common_issues(domain, probe, &mut report);

    report
}

fn check_domain_validity(domain: &str, report: &mut DebugReport) {
    let mut check = DebugCheck::new("Domain Validity");

    if !DOMAIN_RE.is_match(domain) {
        check.status = CheckStatus::Fail;
        check.details.push(format!("Invalid domain format: {}", domain));
    } else {
        check.details.push(format!("Domain format valid: {}", domain));
        let parts: Vec<&str> = domain.split('.').collect();
        check
            .details
            .push(format!("Domain components: {}", parts.len()));
        check
            .details
            .push(format!("TLD: {}", parts[parts.len() - 1]));
    }

    report.checks.push(check);
}

fn check_nameserver_delegation(domain: &str, probe: &dyn ProbeSource, report: &mut DebugReport) {
    let mut check = DebugCheck::new("Nameserver Delegation");

    match probe.lookup_ns(domain) {
        Ok(nameservers) if nameservers.is_empty() => {
            check.status = CheckStatus::Fail;
            check
                .details
                .push("No nameservers found for domain".to_string());
            report.recommend(
                "Verify domain is registered and nameservers are properly delegated".to_string(),
            );
        }
        Ok(nameservers) => {
            check
                .details
                .push(format!("Found {} nameserver(s):", nameservers.len()));
            for ns in &nameservers {
                check.details.push(format!("  - {}", ns));
            }

            if nameservers.len() < 2 {
                check.status = CheckStatus::Warn;
                check
                    .details
                    .push("Warning: Only one nameserver found - no redundancy".to_string());
                report.recommend(
                    "Add at least one additional nameserver for redundancy".to_string(),
                );
            }
        }
        Err(e) => {
            check.status = CheckStatus::Fail;
            check
                .details
                .push(format!("Error querying nameservers: {}", e));
            report.recommend("Verify domain registration and DNS delegation".to_string());
        }
    }

    report.checks.push(check);
}

fn check_address_records(domain: &str, probe: &dyn ProbeSource, report: &mut DebugReport) {
    let mut check = DebugCheck::new("Address Records (A/AAAA)");
    let mut found_any = false;

    match probe.lookup_a(domain) {
        Ok(records) if !records.is_empty() => {
            check.details.push(format!("A records ({}):", records.len()));
            for ip in &records {
                check.details.push(format!("  - {}", ip));
            }
            found_any = true;
        }
        _ => check.details.push("No A records found".to_string()),
    }

    match probe.lookup_aaaa(domain) {
        Ok(records) if !records.is_empty() => {
            check
                .details
                .push(format!("AAAA records ({}):", records.len()));
            for ip in &records {
                check.details.push(format!("  - {}", ip));
            }
            found_any = true;
        }
        _ => check.details.push("No AAAA records found".to_string()),
    }

    if !found_any {
        check.status = CheckStatus::Fail;
        check.details.push("No A or AAAA records found".to_string());
        report.recommend("Add A or AAAA records for domain to be accessible".to_string());
    }

    report.checks.push(check);
}

fn check_mail_records(domain: &str, probe: &dyn ProbeSource, report: &mut DebugReport) {
    let mut check = DebugCheck::new("Mail Records (MX)");

    match probe.lookup_mx(domain) {
        Ok(records) if records.is_empty() => {
            check.status = CheckStatus::Warn;
            check
                .details
                .push("No MX records found - domain cannot receive email".to_string());
            report.recommend("Add MX records if domain should receive email".to_string());
        }
        Ok(mut records) => {
            records.sort_by_key(|mx| mx.priority);
            check.details.push(format!("MX records ({}):", records.len()));
            for mx in &records {
                check
                    .details
                    .push(format!("  - Priority {}: {}", mx.priority, mx.exchange));
            }

            for mx in &records {
                match probe.lookup_a(&mx.exchange) {
                    Ok(addrs) if !addrs.is_empty() => {
                        check
                            .details
                            .push(format!("  ✓ {} resolves to A record", mx.exchange));
                    }
                    _ => {
                        check.status = CheckStatus::Warn;
                        check.details.push(format!(
                            "  ✗ {} does not resolve - may cause mail delivery issues",
                            mx.exchange
                        ));
                        report
                            .recommend(format!("Add A/AAAA records for MX host {}", mx.exchange));
                    }
                }
            }
        }
        Err(_) => {
            check.details.push("Error querying MX records".to_string());
        }
    }

    report.checks.push(check);
}

fn check_soa_record(domain: &str, probe: &dyn ProbeSource, report: &mut DebugReport) {
    let mut check = DebugCheck::new("SOA Record");

    match probe.lookup_soa(domain) {
        Ok(soa) => {
            check.details.push(format!("Primary NS: {}", soa.nsname));
            check
                .details
                .push(format!("Responsible party: {}", soa.hostmaster));
            check.details.push(format!("Serial: {}", soa.serial));
            check.details.push(format!("Refresh: {}s", soa.refresh));
            check.details.push(format!("Retry: {}s", soa.retry));
            check.details.push(format!("Expire: {}s", soa.expire));
            check.details.push(format!("Min TTL: {}s", soa.minttl));

            if soa.serial == 0 {
                check.status = CheckStatus::Warn;
                check
                    .details
                    .push("Warning: Serial is 0 - should be incremented".to_string());
                report.recommend("Increment SOA serial when making zone changes".to_string());
            }

            if soa.minttl > 86_400 {
                check.details.push(format!(
                    "Note: Minimum TTL is high ({}s) - changes may propagate slowly",
                    soa.minttl
                ));
            }
        }
        Err(_) => {
            check.status = CheckStatus::Fail;
            check.details.push("Error retrieving SOA record".to_string());
            report.recommend("Ensure zone has a valid SOA record".to_string());
        }
    }

    report.checks.push(check);
}

fn check_dnssec_keys(domain: &str, probe: &dyn ProbeSource, report: &mut DebugReport) {
    let mut check = DebugCheck::new("DNSSEC Validation");
    check.status = CheckStatus::Warn;
    check.details.push("Checking DNSSEC key records...".to_string());

    match probe.lookup_dnskey(domain) {
        Ok(keys) if !keys.is_empty() => {
            check.status = CheckStatus::Pass;
            check.details.push(format!(
                "DNSSEC enabled: Found {} DNSKEY record(s)",
                keys.len()
            ));
            report.recommend("DNSSEC is properly configured".to_string());
        }
        Ok(_) | Err(_) => {
            check.details.push("No DNSSEC keys found".to_string());
            report.recommend("Consider enabling DNSSEC for improved security".to_string());
        }
    }

    report.checks.push(check);
}

fn check_dns_propagation(domain: &str, probe: &dyn ProbeSource, report: &mut DebugReport) {
    let mut check = DebugCheck::new("DNS Propagation");
    check
        .details
        .push("Checking propagation across public resolvers:".to_string());

    for (name, ip) in PUBLIC_RESOLVERS {
        let propagated = probe.resolver_has_answer(ip, domain);
        let glyph = if propagated { "✓" } else { "✗" };
        check.details.push(format!("  {} {} ({})", glyph, name, ip));

        if !propagated {
            check.status = CheckStatus::Warn;
            report.recommend(format!(
                "DNS not yet propagated to {} - may take up to 48 hours",
                name
            ));
        }
    }

    report.checks.push(check);
}

fn check_common_issues(domain: &str, probe: &dyn ProbeSource, report: &mut DebugReport) {
    let mut check = DebugCheck::new("Common Issues");

    match probe.lookup_txt(domain) {
        Ok(records) => {
            match records.iter().find(|txt| txt.starts_with("v=spf1")) {
                Some(spf) => {
                    check.details.push(format!("✓ SPF record found: {}", spf));
                }
                None => {
                    check.details.push(
                        "No SPF record found - add SPF record to prevent email spoofing"
                            .to_string(),
                    );
                    report.recommend("Add SPF record (v=spf1 record in TXT)".to_string());
                }
            }
        }
        Err(_) => check.details.push("Unable to check SPF record".to_string()),
    }

    check.details.push("Checking common subdomains...".to_string());
    for sub in COMMON_SUBDOMAINS {
        let subdomain = format!("{}.{}", sub, domain);
        match probe.lookup_a(&subdomain) {
            Ok(addrs) if !addrs.is_empty() => {
                check.details.push(format!("✓ {} resolves", subdomain));
            }
            _ => {
                check.details.push(format!("✗ {} does not resolve", subdomain));
            }
        }
    }

    report.checks.push(check);
}

/// Render the debug report with per-check status, summary counts, and
/// numbered recommendations.
pub fn format_debug_output(report: &DebugReport) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!("=== DNS Debug Report for {} ===", report.domain));
    lines.push(String::new());

    for check in &report.checks {
        lines.push(format!(
            "{} {} [{}]",
            check.status.glyph(),
            check.name,
            check.status.label()
        ));
        for detail in &check.details {
            lines.push(format!("    {}", detail));
        }
        lines.push(String::new());
    }

    let pass = report
        .checks
        .iter()
        .filter(|c| c.status == CheckStatus::Pass)
        .count();
    let warn = report
        .checks
        .iter()
        .filter(|c| c.status == CheckStatus::Warn)
        .count();
    let fail = report
        .checks
        .iter()
        .filter(|c| c.status == CheckStatus::Fail)
        .count();

    lines.push("=== Summary ===".to_string());
    lines.push(format!("PASS: {}, WARN: {}, FAIL: {}", pass, warn, fail));
    lines.push(String::new());

    if !report.recommendations.is_empty() {
        lines.push("=== Recommendations ===".to_string());
        for (i, rec) in report.recommendations.iter().enumerate() {
            lines.push(format!("{}. {}", i + 1, rec));
        }
        lines.push(String::new());
    }

    lines.push(format!(
        "Report generated: {}",
        Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
    ));

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn healthy_probe() -> StaticProbe {
        StaticProbe::new()
            .with_ns("example.com", &["ns1.example.com", "ns2.example.com"])
            .with_a("example.com", &["192.0.2.1"])
            .with_aaaa("example.com", &["2001:db8::1"])
            .with_mx(
                "example.com",
                vec![MxRecord {
                    priority: 10,
                    exchange: "mail.example.com".to_string(),
                }],
            )
            .with_a("mail.example.com", &["192.0.2.2"])
            .with_txt("example.com", &["v=spf1 mx -all"])
            .with_soa(
                "example.com",
                SoaRecord {
                    nsname: "ns1.example.com".to_string(),
                    hostmaster: "admin.example.com".to_string(),
                    serial: 2024011701,
                    refresh: 3600,
                    retry: 1800,
                    expire: 604800,
                    minttl: 300,
                },
            )
            .with_dnskey("example.com", &["257 3 13 abcdef"])
    }

    #[test]
    fn test_healthy_domain_all_pass() {
        let probe = healthy_probe();
        let report = run_checks("example.com", true, true, &probe);
        assert!(report
            .checks
            .iter()
            .all(|c| c.status != CheckStatus::Fail));
        let delegation = &report.checks[1];
        assert_eq!(delegation.status, CheckStatus::Pass);
    }

    #[test]
    fn test_invalid_domain_format_fails() {
        let probe = StaticProbe::new();
        let report = run_checks("not a domain", true, false, &probe);
        assert_eq!(report.checks[0].status, CheckStatus::Fail);
        assert!(report.checks[0].details[0].contains("Invalid domain format"));
    }

    #[test]
    fn test_single_nameserver_warns() {
        let probe = healthy_probe().with_ns("example.com", &["ns1.example.com"]);
        let report = run_checks("example.com", false, false, &probe);
        let delegation = &report.checks[1];
        assert_eq!(delegation.status, CheckStatus::Warn);
        assert!(report
            .recommendations
            .iter()
            .any(|r| r.contains("additional nameserver")));
    }

    #[test]
    fn test_unresolvable_mx_host_warns() {
        let probe = healthy_probe().with_mx(
            "example.com",
            vec![MxRecord {
                priority: 10,
                exchange: "ghost.example.com".to_string(),
            }],
        );
        let report = run_checks("example.com", false, false, &probe);
        let mail = &report.checks[3];
        assert_eq!(mail.status, CheckStatus::Warn);
        assert!(report
            .recommendations
            .iter()
            .any(|r| r == "Add A/AAAA records for MX host ghost.example.com"));
    }

    #[test]
    fn test_mx_sorted_by_priority() {
        let probe = healthy_probe().with_mx(
            "example.com",
            vec![
                MxRecord {
                    priority: 20,
                    exchange: "backup.example.com".to_string(),
                },
                MxRecord {
                    priority: 10,
                    exchange: "mail.example.com".to_string(),
                },
            ],
        );
        let report = run_checks("example.com", false, false, &probe);
        let mail = &report.checks[3];
        let first = mail
            .details
            .iter()
            .position(|d| d.contains("Priority 10"))
            .unwrap();
        let second = mail
            .details
            .iter()
            .position(|d| d.contains("Priority 20"))
            .unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_unpropagated_resolver_warns() {
        let probe = healthy_probe().with_unpropagated("9.9.9.9");
        let report = run_checks("example.com", false, true, &probe);
        let propagation = report
            .checks
            .iter()
            .find(|c| c.name == "DNS Propagation")
            .unwrap();
        assert_eq!(propagation.status, CheckStatus::Warn);
        assert!(report
            .recommendations
            .iter()
            .any(|r| r.contains("Quad9")));
    }

    #[test]
    fn test_recommendations_deduplicated() {
        let mut report = DebugReport {
            domain: "example.com".to_string(),
            checks: Vec::new(),
            recommendations: Vec::new(),
        };
        report.recommend("Do the thing".to_string());
        report.recommend("Do the thing".to_string());
        assert_eq!(report.recommendations.len(), 1);
    }

    #[test]
    fn test_missing_soa_fails_and_recommends() {
        let probe = StaticProbe::new()
            .with_ns("example.com", &["ns1.example.com", "ns2.example.com"])
            .with_a("example.com", &["192.0.2.1"]);
        let report = run_checks("example.com", false, false, &probe);
        let soa = report
            .checks
            .iter()
            .find(|c| c.name == "SOA Record")
            .unwrap();
        assert_eq!(soa.status, CheckStatus::Fail);
        assert!(report
            .recommendations
            .iter()
            .any(|r| r.contains("valid SOA record")));
    }

    #[test]
    fn test_report_layout() {
        let probe = healthy_probe();
        let out = debug_dns_issue("example.com", Some("slow resolution"), true, true, &probe);
        assert!(out.starts_with("=== DNS Debug Report for example.com ==="));
        assert!(out.contains("=== Summary ==="));
        assert!(out.contains("Report generated: "));
    }
}
