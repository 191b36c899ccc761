//! Meridian - DNS zone and configuration advisor
//!
//! Analyzes RFC 1035 zone files, validates server configurations for BIND,
//! NSD, Unbound, PowerDNS, and djbdns, generates configuration templates,
//! runs diagnostic checks, and serves a small JSON API over HTTP.

pub mod dns;
pub mod web;
