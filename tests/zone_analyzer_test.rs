//! Integration tests for zone file analysis

use meridian::dns::zone_analyzer::{analyze_zone, analyze_zone_file};

const VALID_ZONE: &str = "\
$TTL 3600
@ 3600 IN SOA ns1.example.com. admin.example.com. 2024011701 3600 1800 604800 86400
@ 3600 IN NS ns1.example.com.
@ 3600 IN NS ns2.example.com.
www 300 IN A 192.0.2.10
";

#[test]
fn test_well_formed_zone_is_valid() {
    let result = analyze_zone(VALID_ZONE, "example.com");
    assert!(result.is_valid);
    assert!(result.errors.is_empty());
    assert_eq!(result.stats.soa_count, 1);
    assert_eq!(result.stats.ns_count, 2);
}

#[test]
fn test_removing_soa_adds_one_error() {
    let without_soa: String = VALID_ZONE
        .lines()
        .filter(|line| !line.contains("SOA"))
        .collect::<Vec<_>>()
        .join("\n");

    let result = analyze_zone(&without_soa, "example.com");
    assert!(!result.is_valid);
    let soa_errors = result
        .errors
        .iter()
        .filter(|e| e.contains("Missing SOA record"))
        .count();
    assert_eq!(soa_errors, 1);
}

#[test]
fn test_second_soa_adds_one_error() {
    let doubled = format!(
        "{}@ 3600 IN SOA ns2.example.com. admin.example.com. 2024011702 3600 1800 604800 86400\n",
        VALID_ZONE
    );

    let result = analyze_zone(&doubled, "example.com");
    assert!(!result.is_valid);
    let uniqueness_errors = result
        .errors
        .iter()
        .filter(|e| e.contains("Multiple SOA records"))
        .count();
    assert_eq!(uniqueness_errors, 1);
}

#[test]
fn test_cname_conflict_in_either_order() {
    let a_first = "\
@ IN SOA ns1.example.com. admin.example.com. 1 3600 1800 604800 86400
@ IN NS ns1.example.com.
@ IN NS ns2.example.com.
www 300 IN A 192.0.2.10
www IN CNAME host.example.com.
";
    let cname_first = "\
@ IN SOA ns1.example.com. admin.example.com. 1 3600 1800 604800 86400
@ IN NS ns1.example.com.
@ IN NS ns2.example.com.
www IN CNAME host.example.com.
www 300 IN A 192.0.2.10
";

    for zone in [a_first, cname_first] {
        let result = analyze_zone(zone, "example.com");
        assert!(!result.is_valid);
        assert!(result
            .errors
            .iter()
            .any(|e| e.contains("CNAME conflict at www")));
    }
}

#[test]
fn test_ttl_aggregation() {
    let zone = "\
@ IN SOA ns1.example.com. admin.example.com. 1 3600 1800 604800 86400
@ IN NS ns1.example.com.
@ IN NS ns2.example.com.
a 10 IN A 192.0.2.1
b 20 IN A 192.0.2.2
c 30 IN A 192.0.2.3
";

    let result = analyze_zone(zone, "example.com");
    assert_eq!(result.stats.ttl_min, 10);
    assert_eq!(result.stats.ttl_max, 30);
    assert_eq!(result.stats.ttl_average, 20);
    assert_eq!(result.stats.ttl_samples, 3);
}

#[test]
fn test_no_explicit_ttl_suppresses_block_and_warns_once() {
    let zone = "\
@ IN SOA ns1.example.com. admin.example.com. 1 3600 1800 604800 86400
@ IN NS ns1.example.com.
@ IN NS ns2.example.com.
www IN A 192.0.2.10
";

    let result = analyze_zone(zone, "example.com");
    assert_eq!(result.stats.ttl_samples, 0);
    let ttl_warnings = result
        .warnings
        .iter()
        .filter(|w| w.contains("No explicit TTL values found"))
        .count();
    assert_eq!(ttl_warnings, 1);

    let output = analyze_zone_file(zone, "example.com");
    assert!(!output.contains("TTL Statistics:"));
}

#[test]
fn test_multiline_soa_matches_single_line() {
    let multiline = "\
@ IN SOA ns1.example.com. admin.example.com. (
    2024011701
    3600
    1800
    604800
    86400 )
@ IN NS ns1.example.com.
@ IN NS ns2.example.com.
";
    let single_line = "\
@ IN SOA ns1.example.com. admin.example.com. 2024011701 3600 1800 604800 86400
@ IN NS ns1.example.com.
@ IN NS ns2.example.com.
";

    assert_eq!(
        analyze_zone_file(multiline, "example.com"),
        analyze_zone_file(single_line, "example.com")
    );
}

#[test]
fn test_worked_scenario() {
    let zone = "\
@  IN SOA ns1.example.com. admin.example.com. ( 2024011701 3600 1800 604800 86400 )
@  IN NS ns1.example.com.
www 300 IN A 192.0.2.10
www IN CNAME example.com.
";

    let result = analyze_zone(zone, "example.com");
    assert!(!result.is_valid);
    assert_eq!(result.stats.soa_count, 1);
    assert_eq!(result.stats.ns_count, 1);
    assert!(result
        .warnings
        .iter()
        .any(|w| w.contains("Only one NS record found")));
    assert_eq!(
        result
            .errors
            .iter()
            .filter(|e| e.contains("CNAME conflict"))
            .count(),
        1
    );
    assert_eq!(result.stats.ttl_min, 300);
    assert_eq!(result.stats.ttl_max, 300);
    assert_eq!(result.stats.ttl_average, 300);
}

#[test]
fn test_report_is_idempotent() {
    let first = analyze_zone_file(VALID_ZONE, "example.com");
    let second = analyze_zone_file(VALID_ZONE, "example.com");
    assert_eq!(first, second);
}

#[test]
fn test_report_layout() {
    let output = analyze_zone_file(VALID_ZONE, "example.com");
    assert!(output.starts_with("=== DNS Zone File Analysis ==="));
    assert!(output.contains("Status: VALID"));
    assert!(output.contains("STATISTICS:"));
    assert!(output.contains("Total Records: 4"));
    assert!(output.contains("TTL Statistics:"));
}

#[test]
fn test_empty_input_still_reports() {
    let output = analyze_zone_file("", "example.com");
    assert!(output.starts_with("=== DNS Zone File Analysis ==="));
    assert!(output.contains("Status: INVALID"));
}
