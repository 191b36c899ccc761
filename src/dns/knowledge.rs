//! Static DNS knowledge base
//!
//! Immutable topic lookup table built into the binary. Topics cover the five
//! supported server dialects plus query tooling, registrars, DNSSEC, DANE,
//! certificates, record types, and troubleshooting.

/// (topic id, display name, one-line description)
const TOPIC_INDEX: &[(&str, &str, &str)] = &[
    (
        "bind",
        "BIND DNS Server Knowledge",
        "ISC BIND configuration, troubleshooting, and best practices",
    ),
    (
        "nsd",
        "NSD Authoritative DNS Server",
        "NLnet Labs NSD configuration, zone management, and optimization",
    ),
    (
        "unbound",
        "Unbound Recursive Resolver",
        "Unbound DNS resolver configuration, DNSSEC, and caching strategies",
    ),
    (
        "djbdns",
        "DJBDNS/TinyDNS",
        "Dan Bernstein's DNS software suite including tinydns and dnscache",
    ),
    (
        "powerdns",
        "PowerDNS",
        "PowerDNS Authoritative and Recursor, database backends, API",
    ),
    (
        "dig",
        "DNS Debugging Tools",
        "dig, drill, ldns-tools, host, nslookup - query and debugging",
    ),
    (
        "registrars",
        "Domain Registrars & APIs",
        "OpenSRS, GoDaddy, Namecheap, and registrar API integration",
    ),
    (
        "dnssec",
        "DNSSEC Implementation",
        "DNSSEC signing, validation, key management, and troubleshooting",
    ),
    (
        "troubleshooting",
        "DNS Troubleshooting Guide",
        "Common DNS issues, debugging strategies, and resolution steps",
    ),
    (
        "dns-records",
        "Complete DNS Record Types",
        "All DNS record types: A, AAAA, MX, NS, TXT, SRV, CAA, TLSA, DNSKEY, and more",
    ),
    (
        "dane-tlsa",
        "DANE and TLSA Records",
        "DANE protocol, TLSA record configuration, and certificate pinning",
    ),
    (
        "openssl-certs",
        "OpenSSL and SSL/TLS Certificates",
        "Certificate generation, CSR creation, key management, and TLSA hashes",
    ),
];

/// Look up the reference text for a topic id.
pub fn lookup(topic: &str) -> Option<&'static str> {
    match topic {
        "bind" => Some(BIND),
        "nsd" => Some(NSD),
        "unbound" => Some(UNBOUND),
        "djbdns" => Some(DJBDNS),
        "powerdns" => Some(POWERDNS),
        "dig" => Some(DIG),
        "registrars" => Some(REGISTRARS),
        "dnssec" => Some(DNSSEC),
        "troubleshooting" => Some(TROUBLESHOOTING),
        "dns-records" => Some(DNS_RECORDS),
        "dane-tlsa" => Some(DANE_TLSA),
        "openssl-certs" => Some(OPENSSL_CERTS),
        _ => None,
    }
}

/// Enumerate topics as (id, name, description) tuples.
pub fn topics() -> &'static [(&'static str, &'static str, &'static str)] {
    TOPIC_INDEX
}

const BIND: &str = "\
ISC BIND (named) - the reference DNS server implementation.

Configuration lives in named.conf with curly-brace block syntax. Key blocks:
  options { ... }   global server behavior (directory, listen-on, recursion)
  zone \"name\" { }   per-zone declarations (type master/slave, file path)
  acl name { ... }  reusable address match lists
  logging { ... }   channels and categories

Security checklist:
  - recursion no; on authoritative-only servers, or restrict with
    allow-recursion { trusted; };
  - allow-transfer { none; }; unless secondaries need AXFR, then list them
  - allow-query { any; }; is fine for authoritative data, not for recursion
  - dnssec-validation auto; on resolvers
  - run with rate-limit { responses-per-second 5; }; to blunt amplification

Deprecations: the slave keyword is now secondary; rrset-order is deprecated
in BIND 9.9+; dnssec-enable was removed in 9.16 (always on).

Operations:
  named-checkconf /etc/bind/named.conf    validate configuration
  named-checkzone example.com db.example  validate a zone file
  rndc reload [zone]                      apply changes
  rndc status                             runtime state";

const NSD: &str = "\
NSD - authoritative-only name server from NLnet Labs.

nsd.conf uses YAML-like attribute: value lines under server: and zone:
section headers. NSD serves zones only; pair it with Unbound for recursion.

server:
  ip-address: 192.0.2.1
  port: 53
  hide-version: yes
  zonesdir: \"/etc/nsd\"

zone:
  name: example.com
  zonefile: \"example.com.zone\"
  provide-xfr: 203.0.113.5 NOKEY
  notify: 203.0.113.5 NOKEY

Never use 0.0.0.0/0 in provide-xfr or allow-notify; restrict transfers to
your secondaries. The tcp: option is obsolete (TCP is always enabled).

Operations:
  nsd-checkconf /etc/nsd/nsd.conf   validate configuration
  nsd-control reload                reload zones
  nsd-control write                 flush updated zones to disk";

const UNBOUND: &str = "\
Unbound - validating, recursive, caching resolver from NLnet Labs.

unbound.conf is organized in clauses: server:, forward-zone:, stub-zone:,
remote-control:. The server: clause is mandatory.

server:
  interface: 127.0.0.1
  access-control: 192.0.2.0/24 allow
  access-control: 0.0.0.0/0 deny
  dnssec-validation: auto
  ratelimit: 1000
  edns-buffer-size: 1232

Security notes:
  - access-control 0.0.0.0/0 allow makes an open resolver; never ship that
  - keep dnssec-validation enabled; auto-trust-anchor-file handles rollover
  - edns-buffer-size below 1232 can break DNSSEC responses; 512 is too small
  - ratelimit protects upstreams from floods

forward-zone: sends queries for a name to fixed resolvers; stub-zone: points
at authoritative servers directly (internal zones).

Operations:
  unbound-checkconf                 validate configuration
  unbound-control reload            apply changes
  unbound-control dump_cache        inspect cache";

const DJBDNS: &str = "\
djbdns - Dan Bernstein's DNS suite: tinydns (authoritative), dnscache
(resolver), axfrdns (zone transfer).

tinydns serves from a compiled data file (data.cdb), built from a line
oriented data file where the first character selects the record type:
  .fqdn:ip:x:ttl         NS + A for the nameserver + SOA
  &fqdn:ip:x:ttl         NS + A (delegation, no SOA)
  =fqdn:ip:ttl           A + matching PTR
  +fqdn:ip:ttl           A only
  @fqdn:ip:x:dist:ttl    MX + A for the exchanger
  'fqdn:text:ttl         TXT
  ^fqdn:host:ttl         PTR
  Cfqdn:host:ttl         CNAME
  Zfqdn:mname:rname:...  raw SOA
  %lo:prefix             location for split horizon

Rebuild with tinydns-data after editing (it writes data.cdb atomically).
Records with no colon-separated fields are malformed and will be rejected.
dnscache and tinydns must listen on different IPs; they are separate
programs by design.";

const POWERDNS: &str = "\
PowerDNS - authoritative server and recursor with database backends.

pdns.conf uses flat key=value lines. Common settings:
  launch=gmysql                 backend selection (gmysql, gpgsql, bind, ...)
  local-address=192.0.2.1
  api=yes
  api-key=<strong secret>       required whenever api=yes
  allow-axfr-ips=203.0.113.5    never 0.0.0.0/0
  master=yes / slave=yes        replication role

The HTTP API (port 8081 by default) manages zones and records; leaving
api=yes without api-key is an unauthenticated control plane. For the gmysql
backend, initialize the schema before first start and verify connectivity
with pdnsutil list-all-zones.

Operations:
  pdnsutil check-zone example.com    zone sanity check
  pdnsutil increase-serial example.com
  pdns_control reload                apply changes";

const DIG: &str = "\
DNS query and debugging tools.

dig - the standard query tool:
  dig example.com A                  basic query
  dig @8.8.8.8 example.com MX        query a specific server
  dig +trace example.com             follow delegation from the root
  dig +dnssec example.com            request DNSSEC records (DO bit)
  dig -x 192.0.2.1                   reverse (PTR) lookup
  dig +short example.com             terse output
  dig +tcp example.com               force TCP

drill (ldns) mirrors dig and adds chase-mode DNSSEC validation:
  drill -S example.com               chase the signature chain

host and nslookup give quick human-oriented answers:
  host example.com
  nslookup -type=soa example.com

Reading dig output: status (NOERROR, NXDOMAIN, SERVFAIL), flags (aa =
authoritative, ra = recursion available, ad = validated), and the ANSWER
section with TTLs counting down from cache.";

const REGISTRARS: &str = "\
Domain registrars and APIs.

The registrar sets the NS records and (for DNSSEC) the DS record at the
parent zone. Changing nameservers at the registrar is a delegation change;
it propagates with the parent's TTL, commonly 24-48h worst case.

API integration notes:
  - OpenSRS: XML/HTTPS API, reseller oriented; set_domain_nameservers call
  - GoDaddy: REST API with key/secret pair; PUT /v1/domains/{domain}/records
  - Namecheap: XML API, IP allow-listing required; namecheap.domains.dns.*

Checklist when moving DNS:
  1. Lower zone TTLs ahead of the move
  2. Stand up the new servers and verify with dig @new-ns
  3. Update NS records at the registrar
  4. If DNSSEC is enabled, update or remove the DS record first - a stale
     DS against new keys takes the domain offline for validating resolvers";

const DNSSEC: &str = "\
DNSSEC - cryptographic signing of DNS data.

Record types: DNSKEY (public keys: KSK flag 257, ZSK flag 256), RRSIG
(signatures), DS (digest of the KSK, published in the parent), NSEC/NSEC3
(authenticated denial of existence).

The chain of trust runs from the root trust anchor through each parent DS
to the child DNSKEY. A zone is secure only when every link validates.

Signing a zone (BIND):
  dnssec-keygen -a ECDSAP256SHA256 -f KSK example.com
  dnssec-keygen -a ECDSAP256SHA256 example.com
  dnssec-signzone -A -o example.com db.example.com
  (or: dnssec-policy default; in named.conf for automatic signing)

Publish the DS at the registrar: dnssec-dsfromkey Kexample.com.+013+*.key

Validation failures surface as SERVFAIL from validating resolvers while
non-validating resolvers still answer - the classic DNSSEC outage
signature. Check with: dig +dnssec +cd example.com (cd bypasses validation)
versus dig +dnssec example.com.

Key rollover: pre-publish the new ZSK, wait the TTL, switch signing, retire
the old key. KSK rollover additionally requires a DS update at the parent.";

const TROUBLESHOOTING: &str = "\
DNS troubleshooting guide.

Resolution fails entirely:
  - dig +trace to find where delegation breaks
  - verify NS records at parent and child match
  - check that every listed nameserver answers authoritatively (aa flag)

Stale data after a change:
  - old TTL still counting down in caches; verify with dig @authoritative
  - serial not incremented, secondaries never transferred; compare
    dig @primary example.com SOA with dig @secondary example.com SOA

Intermittent failures:
  - one of several nameservers is broken; query each NS directly
  - UDP fragmentation of large (DNSSEC) responses; test dig +tcp

SERVFAIL from resolvers but authoritative answers fine:
  - DNSSEC validation failure; check RRSIG expiry and DS/DNSKEY match
  - dig +cd succeeding where plain dig fails confirms it

Mail problems:
  - MX must point at a hostname with A/AAAA, never a CNAME or bare IP
  - missing SPF (v=spf1 TXT) invites spoofing and delivery failures

CNAME rules: a CNAME owner may hold no other record types; the zone apex
cannot be a CNAME.";

const DNS_RECORDS: &str = "\
DNS record type reference.

Address:
  A       IPv4 address
  AAAA    IPv6 address

Infrastructure:
  NS      delegation to a nameserver (hostname, never an IP)
  SOA     zone authority: primary, contact, serial, refresh, retry,
          expire, minimum; exactly one per zone
  PTR     reverse mapping (in-addr.arpa / ip6.arpa)
  SRV     service location: priority weight port target
  CNAME   alias; excludes all other types at the same name

Mail:
  MX      mail exchanger: preference + hostname
  TXT     free text; carries SPF (v=spf1), DKIM, DMARC policies
  SPF     historical dedicated type, superseded by TXT

Security:
  CAA     restricts which CAs may issue certificates for the name
  TLSA    DANE certificate association (see dane-tlsa topic)
  DNSKEY  zone public key        DS     parent-side key digest
  RRSIG   record signature       NSEC/NSEC3  authenticated denial
  DLV     historical lookaside validation (retired)

Misc:
  AFSDB   AFS database server    DHCID  DHCP client binding
  NAPTR   rewrite rules (ENUM/SIP)  SVCB/HTTPS  service binding records";

const DANE_TLSA: &str = "\
DANE and TLSA records.

DANE pins TLS certificates in DNS, authenticated by DNSSEC. The TLSA owner
name encodes port and protocol: _443._tcp.www.example.com.

TLSA rdata is: usage selector matching-type certificate-data
  usage: 0 CA constraint, 1 service cert constraint, 2 trust anchor
         assertion, 3 domain-issued certificate (most common: 3)
  selector: 0 full certificate, 1 SubjectPublicKeyInfo only
  matching: 0 exact, 1 SHA-256, 2 SHA-512

The ubiquitous choice is 3 1 1: pin the SHA-256 of the server key.

Generate the hash:
  openssl x509 -in cert.pem -pubkey -noout |
    openssl pkey -pubin -outform DER |
    openssl dgst -sha256 -binary | hexdump -ve '/1 \"%02x\"'

Record: _443._tcp.www IN TLSA 3 1 1 <hex digest>

DANE requires a validly signed zone - without DNSSEC the TLSA record
carries no security. SMTP (port 25) DANE is the main production user;
verify with: posttls-finger -tv example.com.";

const OPENSSL_CERTS: &str = "\
OpenSSL certificate operations.

Key and CSR:
  openssl genpkey -algorithm ED25519 -out key.pem
  openssl ecparam -genkey -name prime256v1 -out key.pem
  openssl req -new -key key.pem -out req.csr -subj \"/CN=example.com\"

Self-signed (testing):
  openssl req -x509 -newkey rsa:2048 -keyout key.pem -out cert.pem \\
    -days 365 -nodes -subj \"/CN=example.com\"

Inspection:
  openssl x509 -in cert.pem -text -noout       full dump
  openssl x509 -in cert.pem -enddate -noout    expiry
  openssl s_client -connect example.com:443 -servername example.com
  openssl s_client -starttls smtp -connect mail.example.com:25

Verification:
  openssl verify -CAfile chain.pem cert.pem
  openssl x509 -in cert.pem -pubkey -noout | openssl pkey -pubin -noout

TLSA hash generation is covered under the dane-tlsa topic. Keep private
keys 0600, rotate before expiry, and serve the full chain - a missing
intermediate is the most common TLS deployment fault.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_indexed_topic_resolves() {
        for (id, _, _) in topics() {
            assert!(lookup(id).is_some(), "missing body for topic {}", id);
        }
    }

    #[test]
    fn test_unknown_topic() {
        assert!(lookup("netbios").is_none());
    }

    #[test]
    fn test_topic_count() {
        assert_eq!(topics().len(), 12);
    }
}
