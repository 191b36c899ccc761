//! Property-based tests for the analysis entry points

use proptest::prelude::*;

use meridian::dns::config_validator::validate_dns_config;
use meridian::dns::zone_analyzer::analyze_zone_file;

// Strategy for generating valid domain names
fn domain_name_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-z][a-z0-9-]{0,10}", 1..4).prop_map(|parts| parts.join("."))
}

// Strategy for arbitrary printable config/zone text
fn text_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[\\x20-\\x7E\\n]{0,400}").unwrap()
}

proptest! {
    #[test]
    fn test_zone_analysis_never_panics(content in text_strategy(), name in domain_name_strategy()) {
        let output = analyze_zone_file(&content, &name);
        prop_assert!(output.starts_with("=== DNS Zone File Analysis ===")
            || output.starts_with("Error analyzing zone file:"));
    }

    #[test]
    fn test_zone_analysis_is_deterministic(content in text_strategy(), name in domain_name_strategy()) {
        let first = analyze_zone_file(&content, &name);
        let second = analyze_zone_file(&content, &name);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn test_config_validation_never_panics(
        server in "[a-zA-Z]{1,12}",
        content in text_strategy()
    ) {
        let output = validate_dns_config(&server, &content);
        prop_assert!(!output.is_empty());
    }

    #[test]
    fn test_unknown_server_types_get_exact_error(server in "[a-z]{1,12}", content in text_strategy()) {
        prop_assume!(!matches!(
            server.as_str(),
            "bind" | "nsd" | "unbound" | "powerdns" | "djbdns"
        ));
        let output = validate_dns_config(&server, &content);
        prop_assert_eq!(
            output,
            format!(
                "Error: Unknown server type '{}'. Supported types: bind, nsd, unbound, powerdns, djbdns",
                server
            )
        );
    }

    #[test]
    fn test_server_type_case_folding(content in text_strategy()) {
        for server in ["bind", "nsd", "unbound", "powerdns", "djbdns"] {
            let lower = validate_dns_config(server, &content);
            let upper = validate_dns_config(&server.to_uppercase(), &content);
            prop_assert_eq!(lower, upper);
        }
    }

    #[test]
    fn test_config_validation_is_deterministic(
        server in "(bind|nsd|unbound|powerdns|djbdns)",
        content in text_strategy()
    ) {
        let first = validate_dns_config(&server, &content);
        let second = validate_dns_config(&server, &content);
        prop_assert_eq!(first, second);
    }
}
