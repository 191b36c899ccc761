//! DNS server configuration generation
//!
//! Fills opinionated configuration templates for BIND, NSD, Unbound and
//! PowerDNS based on the requested server role, with optional DNSSEC, rate
//! limiting and logging verbosity. Also produces a starter zone file with a
//! Unix-timestamp serial.

use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{SecondsFormat, Utc};
use serde::Deserialize;

/// Logging verbosity for generated configurations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogVerbosity {
    Minimal,
    Standard,
    Verbose,
}

impl Default for LogVerbosity {
    fn default() -> Self {
        LogVerbosity::Standard
    }
}

/// Optional knobs for generated configurations
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GenerateOptions {
    pub dnssec: bool,
    pub ratelimit: bool,
    pub logging: LogVerbosity,
}

/// Generate a server configuration for the given dialect and role.
///
/// `config_type` is one of `authoritative`, `recursive`, `both` (matched
/// case-insensitively; unrecognized roles fall back to the authoritative
/// template paths). Always returns text; an unknown dialect yields a
/// descriptive error string.
pub fn generate_config(
    server_type: &str,
    config_type: &str,
    zones: &[String],
    options: &GenerateOptions,
) -> String {
    let role = config_type.to_lowercase();
    match server_type.to_lowercase().as_str() {
        "bind" => generate_bind_config(&role, zones, options),
        "nsd" => generate_nsd_config(&role, zones, options),
        "unbound" => generate_unbound_config(&role, zones, options),
        "powerdns" => generate_powerdns_config(&role, zones, options),
        other => format!(
            "Error: Unknown server type '{}'. Supported: bind, nsd, unbound, powerdns",
            other
        ),
    }
}

fn is_recursive(role: &str) -> bool {
    role == "recursive" || role == "both"
}

fn is_authoritative(role: &str) -> bool {
    role == "authoritative" || role == "both"
}

fn generate_bind_config(role: &str, zones: &[String], options: &GenerateOptions) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push("// BIND 9 Configuration File".to_string());
    lines.push("// Generated configuration - customize as needed".to_string());
    lines.push(String::new());

    lines.push("include \"/etc/bind/named.conf.local\";".to_string());
    lines.push("include \"/etc/bind/named.conf.default-zones\";".to_string());
    lines.push(String::new());

    lines.push("acl internals {".to_string());
    lines.push("  127.0.0.1;".to_string());
    lines.push("  ::1;".to_string());
    lines.push("  // Add your trusted networks here".to_string());
    lines.push("};".to_string());
    lines.push(String::new());

    lines.push("options {".to_string());
    lines.push("  directory \"/var/cache/bind\";".to_string());
    lines.push("  listen-on port 53 { 127.0.0.1; };".to_string());
    lines.push("  listen-on-v6 port 53 { ::1; };".to_string());
    lines.push(String::new());

    if is_recursive(role) {
        lines.push("  recursion yes;".to_string());
        lines.push("  allow-recursion { internals; };".to_string());
        lines.push("  allow-query { any; };".to_string());
    } else {
        lines.push("  recursion no;".to_string());
        lines.push("  allow-query { any; };".to_string());
    }
    lines.push(String::new());

    lines.push("  dnssec-enable yes;".to_string());
    if options.dnssec {
        lines.push("  dnssec-validation auto;".to_string());
    } else {
        lines.push("  dnssec-validation no;".to_string());
    }
    lines.push(String::new());

    lines.push("  allow-transfer { none; };  // Configure for secondary servers".to_string());
    lines.push("  notify yes;".to_string());
    lines.push("  also-notify { };  // Add secondary server IPs".to_string());
    lines.push(String::new());

    if options.ratelimit {
        lines.push("  rate-limit {".to_string());
        lines.push("    responses-per-second 5;".to_string());
        lines.push("    window 5;".to_string());
        lines.push("  };".to_string());
        lines.push(String::new());
    }

    if options.logging == LogVerbosity::Verbose {
        lines.push("  log-queries yes;".to_string());
    }

    lines.push("};".to_string());
    lines.push(String::new());

    if !zones.is_empty() {
        lines.push("// Zone definitions".to_string());
        for zone in zones {
            lines.push(format!("zone \"{}\" {{", zone));
            if is_authoritative(role) {
                lines.push("  type master;".to_string());
                lines.push(format!("  file \"/etc/bind/zones/db.{}\";", zone));
            } else {
                lines.push("  type slave;".to_string());
                lines.push("  masters { <primary_ip>; };".to_string());
                lines.push(format!("  file \"/var/cache/bind/db.{}\";", zone));
            }
            lines.push("};".to_string());
        }
    }

    lines.join("\n")
}

fn generate_nsd_config(role: &str, zones: &[String], options: &GenerateOptions) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push("# NSD Configuration File".to_string());
    lines.push("# Generated configuration - customize as needed".to_string());
    lines.push(String::new());

    lines.push("server:".to_string());
    lines.push("  # Server identity".to_string());
    lines.push("  identity: \"NSD\"".to_string());
    lines.push("  version: \"NSD\"".to_string());
    lines.push(String::new());

    lines.push("  # Listening interfaces".to_string());
    lines.push("  ip-address: 127.0.0.1".to_string());
    lines.push("  ip-address: ::1".to_string());
    lines.push(String::new());

    lines.push("  # Port".to_string());
    lines.push("  port: 53".to_string());
    lines.push(String::new());

    if is_authoritative(role) {
        lines.push("  # Authoritative server configuration".to_string());
        lines.push("  hide-version: yes".to_string());
    }
    lines.push(String::new());

    if options.logging == LogVerbosity::Verbose {
        lines.push("  log-time-ascii: yes".to_string());
    }
    lines.push(String::new());

    if !zones.is_empty() {
        lines.push("zone:".to_string());
        for zone in zones {
            lines.push(format!("  name: {}", zone));
            lines.push(format!("  zonefile: \"/etc/nsd/{}.zone\"", zone));
            lines.push("  notify: <secondary_ip> NOKEY".to_string());
            lines.push("  provide-xfr: <secondary_ip> NOKEY".to_string());
        }
    }

    lines.join("\n")
}

fn generate_unbound_config(role: &str, zones: &[String], options: &GenerateOptions) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push("# Unbound Configuration File".to_string());
    lines.push("# Generated configuration - customize as needed".to_string());
    lines.push(String::new());

    lines.push("server:".to_string());
    lines.push("  # Network interfaces".to_string());
    lines.push("  interface: 127.0.0.1".to_string());
    lines.push("  interface: ::1".to_string());
    lines.push("  port: 53".to_string());
    lines.push(String::new());

    if is_recursive(role) {
        lines.push("  # Recursive resolver".to_string());
        lines.push("  access-control: 127.0.0.0/8 allow".to_string());
        lines.push("  access-control: ::1/128 allow".to_string());
        lines.push("  access-control: 0.0.0.0/0 deny".to_string());
        lines.push(String::new());
    }

    lines.push("  # Performance".to_string());
    lines.push("  num-threads: 2".to_string());
    lines.push("  msg-buffer-size: 65552".to_string());
    lines.push("  msg-cache-size: 4m".to_string());
    lines.push("  rrset-cache-size: 8m".to_string());
    lines.push(String::new());

    if options.dnssec {
        lines.push("  # DNSSEC".to_string());
        lines.push("  dnssec-validation: auto".to_string());
        lines.push("  root-hints: \"/usr/share/dns/root.hints\"".to_string());
        lines.push(String::new());
    }

    lines.push("  # Logging".to_string());
    match options.logging {
        LogVerbosity::Verbose => lines.push("  verbosity: 2".to_string()),
        LogVerbosity::Minimal => lines.push("  verbosity: 0".to_string()),
        LogVerbosity::Standard => lines.push("  verbosity: 1".to_string()),
    }
    lines.push(String::new());

    if options.ratelimit {
        lines.push("  # Rate limiting".to_string());
        lines.push("  ratelimit: 1000".to_string());
        lines.push(String::new());
    }

    if !zones.is_empty() && role != "authoritative" {
        lines.push("forward-zone:".to_string());
        lines.push("  name: \".\"".to_string());
        lines.push("  forward-addr: 8.8.8.8".to_string());
        lines.push("  forward-addr: 8.8.4.4".to_string());
        lines.push(String::new());

        for zone in zones {
            lines.push("forward-zone:".to_string());
            lines.push(format!("  name: \"{}\"", zone));
            lines.push("  forward-addr: 127.0.0.1@53".to_string());
        }
    }

    lines.join("\n")
}

fn generate_powerdns_config(role: &str, _zones: &[String], options: &GenerateOptions) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push("# PowerDNS Configuration".to_string());
    lines.push("# Generated configuration - customize as needed".to_string());
    lines.push(String::new());

    lines.push("# Server".to_string());
    lines.push("daemon=yes".to_string());
    lines.push("guardian=yes".to_string());
    lines.push("local-port=5300".to_string());
    lines.push("local-address=127.0.0.1".to_string());
    lines.push(String::new());

    lines.push("# Logging".to_string());
    match options.logging {
        LogVerbosity::Verbose => lines.push("loglevel=6".to_string()),
        LogVerbosity::Minimal => lines.push("loglevel=3".to_string()),
        LogVerbosity::Standard => lines.push("loglevel=4".to_string()),
    }
    lines.push(String::new());

    if is_authoritative(role) {
        lines.push("# Authoritative server".to_string());
        lines.push("master=yes".to_string());
        lines.push("slave=no".to_string());
        lines.push(String::new());
    } else {
        lines.push("# Recursive server".to_string());
        lines.push("master=no".to_string());
        lines.push("slave=no".to_string());
        lines.push("recursor=127.0.0.1:5301".to_string());
        lines.push(String::new());
    }

    lines.push("# Backend".to_string());
    lines.push("launch=bind".to_string());
    lines.push("bind-config=/etc/powerdns/bind.conf".to_string());
    lines.push(String::new());

    if options.dnssec {
        lines.push("# DNSSEC".to_string());
        lines.push("dnssec=yes".to_string());
        lines.push(String::new());
    }

    if options.ratelimit {
        lines.push("# Rate limiting".to_string());
        lines.push("out-of-zone-additional-processing=no".to_string());
        lines.push(String::new());
    }

    lines.push("# API".to_string());
    lines.push("api=yes".to_string());
    lines.push("api-key=changeme".to_string());
    lines.push("api-readonly=no".to_string());

    lines.join("\n")
}

/// Generate a starter zone file with SOA/NS/A/MX/CNAME/CAA/TXT records.
///
/// The SOA serial is the current Unix timestamp, so regenerating always moves
/// the serial forward.
pub fn generate_zone_file(
    zone_name: &str,
    primary_ns: &str,
    admin_email: &str,
    options: &GenerateOptions,
) -> String {
    let serial = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let mut lines: Vec<String> = Vec::new();

    lines.push(format!("; Zone file for {}", zone_name));
    lines.push(format!(
        "; Generated: {}",
        Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
    ));
    lines.push(String::new());

    lines.push(format!("$ORIGIN {}.", zone_name));
    lines.push("$TTL 3600".to_string());
    lines.push(String::new());

    lines.push("; SOA record".to_string());
    lines.push(format!("@  IN  SOA  {}. {}. (", primary_ns, admin_email));
    lines.push(format!("           {}  ; Serial", serial));
    lines.push("           3600     ; Refresh".to_string());
    lines.push("           1800     ; Retry".to_string());
    lines.push("           604800   ; Expire".to_string());
    lines.push("           300 )    ; Minimum TTL".to_string());
    lines.push(String::new());

    lines.push("; NS records".to_string());
    lines.push(format!("@  IN  NS  {}.", primary_ns));
    lines.push("@  IN  NS  ns2.example.com.".to_string());
    lines.push(String::new());

    lines.push("; A records".to_string());
    lines.push("@           IN  A      192.0.2.1".to_string());
    lines.push("www         IN  A      192.0.2.1".to_string());
    lines.push("mail        IN  A      192.0.2.2".to_string());
    lines.push(String::new());

    lines.push("; MX records".to_string());
    lines.push("@           IN  MX  10 mail.example.com.".to_string());
    lines.push(String::new());

    lines.push("; CNAME records".to_string());
    lines.push("alias       IN  CNAME  www".to_string());
    lines.push(String::new());

    lines.push("; CAA records".to_string());
    lines.push("@           IN  CAA  0 issue \"letsencrypt.org\"".to_string());
    lines.push(String::new());

    lines.push("; TXT/SPF records".to_string());
    lines.push("@           IN  TXT  \"v=spf1 mx -all\"".to_string());
    lines.push("_dmarc      IN  TXT  \"v=DMARC1; p=none;\"".to_string());
    lines.push(String::new());

    if options.dnssec {
        lines.push("; DNSSEC records (added by zone signing)".to_string());
        lines.push("; DNSKEY, DS, RRSIG records would appear here".to_string());
        lines.push(String::new());
    }

    lines.push(format!("; End of zone file for {}", zone_name));

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::zone_analyzer::analyze_zone;

    #[test]
    fn test_unknown_server_type() {
        let out = generate_config("maradns", "authoritative", &[], &GenerateOptions::default());
        assert_eq!(
            out,
            "Error: Unknown server type 'maradns'. Supported: bind, nsd, unbound, powerdns"
        );
    }

    #[test]
    fn test_bind_recursive_role() {
        let out = generate_config("bind", "recursive", &[], &GenerateOptions::default());
        assert!(out.contains("recursion yes;"));
        assert!(out.contains("allow-recursion { internals; };"));
    }

    #[test]
    fn test_bind_authoritative_zones() {
        let zones = vec!["example.com".to_string()];
        let out = generate_config("bind", "authoritative", &zones, &GenerateOptions::default());
        assert!(out.contains("recursion no;"));
        assert!(out.contains("zone \"example.com\" {"));
        assert!(out.contains("file \"/etc/bind/zones/db.example.com\";"));
    }

    #[test]
    fn test_bind_ratelimit_and_verbose_logging() {
        let options = GenerateOptions {
            dnssec: true,
            ratelimit: true,
            logging: LogVerbosity::Verbose,
        };
        let out = generate_config("bind", "both", &[], &options);
        assert!(out.contains("rate-limit {"));
        assert!(out.contains("log-queries yes;"));
        assert!(out.contains("dnssec-validation auto;"));
    }

    #[test]
    fn test_unbound_verbosity_levels() {
        for (verbosity, expected) in &[
            (LogVerbosity::Minimal, "verbosity: 0"),
            (LogVerbosity::Standard, "verbosity: 1"),
            (LogVerbosity::Verbose, "verbosity: 2"),
        ] {
            let options = GenerateOptions {
                logging: *verbosity,
                ..GenerateOptions::default()
            };
            let out = generate_config("unbound", "recursive", &[], &options);
            assert!(out.contains(expected));
        }
    }

    #[test]
    fn test_nsd_zone_block() {
        let zones = vec!["example.org".to_string()];
        let out = generate_config("NSD", "authoritative", &zones, &GenerateOptions::default());
        assert!(out.contains("zone:"));
        assert!(out.contains("  name: example.org"));
        assert!(out.contains("zonefile: \"/etc/nsd/example.org.zone\""));
    }

    #[test]
    fn test_powerdns_roles() {
        let out = generate_config("powerdns", "recursive", &[], &GenerateOptions::default());
        assert!(out.contains("recursor=127.0.0.1:5301"));
        let out = generate_config("powerdns", "authoritative", &[], &GenerateOptions::default());
        assert!(out.contains("master=yes"));
    }

    #[test]
    fn test_generated_zone_file_passes_analysis() {
        let zone = generate_zone_file(
            "example.com",
            "ns1.example.com",
            "admin.example.com",
            &GenerateOptions::default(),
        );
        let result = analyze_zone(&zone, "example.com");
        assert!(result.is_valid, "errors: {:?}", result.errors);
        assert_eq!(result.stats.soa_count, 1);
        assert_eq!(result.stats.ns_count, 2);
    }
}
