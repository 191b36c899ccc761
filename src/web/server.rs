use serde_derive::Deserialize;
use tiny_http::{Header, Method, Response, ResponseBox, Server, StatusCode};

use crate::dns::config_generator::{generate_config, GenerateOptions};
use crate::dns::config_validator::validate_dns_config;
use crate::dns::debugger::{debug_dns_issue, StaticProbe};
use crate::dns::knowledge;
use crate::dns::zone_analyzer::analyze_zone_file;
use crate::web::{Result, WebError};

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeZoneRequest {
    zone_content: String,
    zone_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ValidateConfigRequest {
    server_type: String,
    config_content: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateConfigRequest {
    server_type: String,
    config_type: String,
    #[serde(default)]
    zones: Vec<String>,
    #[serde(default)]
    options: GenerateOptions,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DebugRequest {
    domain: String,
    #[serde(default)]
    issue: Option<String>,
    #[serde(default = "default_true")]
    check_dnssec: bool,
    #[serde(default = "default_true")]
    check_propagation: bool,
}

/// (tool name, one-line description) for the listing endpoint
const TOOLS: &[(&str, &str)] = &[
    (
        "analyze_zone_file",
        "Parse and validate a DNS zone file, with statistics",
    ),
    (
        "validate_dns_config",
        "Check a BIND, NSD, Unbound, PowerDNS, or djbdns configuration",
    ),
    (
        "generate_dns_config",
        "Generate a server configuration template",
    ),
    (
        "generate_zone_file",
        "Generate a starter zone file with SOA and NS records",
    ),
    (
        "debug_dns_issue",
        "Run diagnostic checks against a domain",
    ),
];

pub struct AdvisorServer {
    port: u16,
}

impl AdvisorServer {
    pub fn new(port: u16) -> AdvisorServer {
        AdvisorServer { port }
    }

    /// Route an HTTP request to the appropriate handler
    fn route_request(&self, request: &mut tiny_http::Request) -> Result<ResponseBox> {
        let url = request.url().to_string();
        let method = request.method();
        let url_parts: Vec<&str> = url.split('/').filter(|x| !x.is_empty()).collect();

        match (method, url_parts.as_slice()) {
            (Method::Get, ["api", "v1", "tools"]) => self.list_tools(),
            (Method::Get, ["api", "v1", "knowledge"]) => self.list_knowledge(),
            (Method::Get, ["api", "v1", "knowledge", topic]) => self.get_knowledge(topic),
            (Method::Post, ["api", "v1", "zone", "analyze"]) => self.analyze_zone(request),
            (Method::Post, ["api", "v1", "config", "validate"]) => self.validate_config(request),
            (Method::Post, ["api", "v1", "config", "generate"]) => self.generate(request),
            (Method::Post, ["api", "v1", "debug"]) => self.debug(request),
            (_, _) => Err(WebError::NotFound),
        }
    }

    fn list_tools(&self) -> Result<ResponseBox> {
        let tools: Vec<serde_json::Value> = TOOLS
            .iter()
            .map(|(name, description)| {
                serde_json::json!({
                    "name": name,
                    "description": description,
                })
            })
            .collect();

        json_response(200, &serde_json::json!({ "tools": tools }))
    }

    fn list_knowledge(&self) -> Result<ResponseBox> {
        let topics: Vec<serde_json::Value> = knowledge::topics()
            .iter()
            .map(|(id, name, description)| {
                serde_json::json!({
                    "id": id,
                    "name": name,
                    "description": description,
                })
            })
            .collect();

        json_response(200, &serde_json::json!({ "topics": topics }))
    }

    fn get_knowledge(&self, topic: &str) -> Result<ResponseBox> {
        let body = knowledge::lookup(topic).ok_or(WebError::NotFound)?;
        json_response(200, &serde_json::json!({ "text": body }))
    }

    fn analyze_zone(&self, request: &mut tiny_http::Request) -> Result<ResponseBox> {
        let payload: AnalyzeZoneRequest = serde_json::from_reader(request.as_reader())?;
        let text = analyze_zone_file(&payload.zone_content, &payload.zone_name);
        json_response(200, &serde_json::json!({ "text": text }))
    }

    fn validate_config(&self, request: &mut tiny_http::Request) -> Result<ResponseBox> {
        let payload: ValidateConfigRequest = serde_json::from_reader(request.as_reader())?;
        let text = validate_dns_config(&payload.server_type, &payload.config_content);
        json_response(200, &serde_json::json!({ "text": text }))
    }

    fn generate(&self, request: &mut tiny_http::Request) -> Result<ResponseBox> {
        let payload: GenerateConfigRequest = serde_json::from_reader(request.as_reader())?;
        let text = generate_config(
            &payload.server_type,
            &payload.config_type,
            &payload.zones,
            &payload.options,
        );
        json_response(200, &serde_json::json!({ "text": text }))
    }

    fn debug(&self, request: &mut tiny_http::Request) -> Result<ResponseBox> {
        let payload: DebugRequest = serde_json::from_reader(request.as_reader())?;

        // No live queries from the API; the empty probe yields a fully
        // deterministic report.
        let probe = StaticProbe::new();
        let text = debug_dns_issue(
            &payload.domain,
            payload.issue.as_deref(),
            payload.check_dnssec,
            payload.check_propagation,
            &probe,
        );
        json_response(200, &serde_json::json!({ "text": text }))
    }

    /// Handle a single HTTP request
    fn handle_request(&self, mut request: tiny_http::Request) {
        log::info!("HTTP {:?} {:?}", request.method(), request.url());

        let response = self.route_request(&mut request);
        let response_result = self.send_response(request, response);

        if let Err(err) = response_result {
            log::info!("Failed to write response to client: {:?}", err);
        }
    }

    /// Send the response back to the client with proper error handling
    fn send_response(
        &self,
        request: tiny_http::Request,
        response: Result<ResponseBox>,
    ) -> std::io::Result<()> {
        match response {
            Ok(response) => request.respond(response),
            Err(err) => {
                log::info!("Request failed: {:?}", err);
                let status = match err {
                    WebError::NotFound => 404,
                    WebError::Io(_) => 500,
                    _ => 400,
                };
                let body = serde_json::json!({
                    "message": err.to_string(),
                });
                match json_response(status, &body) {
                    Ok(rendered) => request.respond(rendered),
                    Err(_) => request.respond(
                        Response::from_string(err.to_string())
                            .with_status_code(StatusCode(status))
                            .boxed(),
                    ),
                }
            }
        }
    }

    pub fn run(&self) {
        let webserver = match Server::http(("0.0.0.0", self.port)) {
            Ok(x) => x,
            Err(e) => {
                log::info!("Failed to start HTTP web server: {:?}", e);
                return;
            }
        };

        log::info!(
            "HTTP web server started and listening on port {}",
            self.port
        );

        for request in webserver.incoming_requests() {
            self.handle_request(request);
        }
    }
}

fn json_response(status: u16, body: &serde_json::Value) -> Result<ResponseBox> {
    let body = serde_json::to_string(body)?;
    let mut response = Response::from_string(body).with_status_code(StatusCode(status));
    if let Ok(header) = Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]) {
        response = response.with_header(header);
    }
    Ok(response.boxed())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_listing_is_complete() {
        assert_eq!(TOOLS.len(), 5);
        assert!(TOOLS.iter().any(|(name, _)| *name == "analyze_zone_file"));
        assert!(TOOLS.iter().any(|(name, _)| *name == "debug_dns_issue"));
    }

    #[test]
    fn test_analyze_request_camel_case() {
        let payload: AnalyzeZoneRequest = serde_json::from_str(
            r#"{"zoneContent": "@ 3600 IN A 192.0.2.1", "zoneName": "example.com"}"#,
        )
        .unwrap();
        assert_eq!(payload.zone_name, "example.com");
    }

    #[test]
    fn test_debug_request_defaults() {
        let payload: DebugRequest =
            serde_json::from_str(r#"{"domain": "example.com"}"#).unwrap();
        assert!(payload.check_dnssec);
        assert!(payload.check_propagation);
        assert!(payload.issue.is_none());
    }

    #[test]
    fn test_generate_request_defaults() {
        let payload: GenerateConfigRequest = serde_json::from_str(
            r#"{"serverType": "bind", "configType": "authoritative"}"#,
        )
        .unwrap();
        assert!(payload.zones.is_empty());
        assert!(!payload.options.dnssec);
    }
}
