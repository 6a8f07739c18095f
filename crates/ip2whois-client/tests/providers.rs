use ip2whois_client::{
    IpApiProvider, IpWhoisProvider, LookupClient, Provider, RdapProvider, WhoisXmlProvider,
};
use ip2whois_core::{AdapterFailure, CanonicalRecord, DomainStatus, Query};
use serde_json::json;
use std::time::{Duration, Instant};
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TIMEOUT: Duration = Duration::from_millis(2000);

fn client_for(server: &MockServer) -> LookupClient {
    LookupClient::builder()
        .base_url(server.uri())
        .user_agent("ip2whois-test/1.0")
        .whoisxml_api_key("test-key")
        .build()
        .expect("client builds")
}

fn rdap_body() -> serde_json::Value {
    json!({
        "objectClassName": "domain",
        "ldhName": "example.com",
        "status": ["active"],
        "events": [{"eventAction": "registration", "eventDate": "1995-08-14T04:00:00Z"}],
        "nameservers": [{"ldhName": "a.iana-servers.net"}],
        "entities": [{
            "roles": ["registrar"],
            "vcardArray": ["vcard", [["fn", {}, "text", "Example Registrar"]]]
        }]
    })
}

#[tokio::test]
async fn test_rdap_sends_media_type_and_user_agent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/domain/example.com"))
        .and(header("accept", "application/rdap+json"))
        .and(header("user-agent", "ip2whois-test/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rdap_body()))
        .expect(1)
        .mount(&server)
        .await;

    let provider = RdapProvider::new(client_for(&server));
    let query = Query::domain("example.com").unwrap();
    let record = assert_ok!(provider.lookup(&query, TIMEOUT).await);

    let CanonicalRecord::Domain(domain) = record else {
        panic!("expected a domain record");
    };
    assert_eq!(domain.source, "RDAP");
    assert_eq!(domain.registrar, "Example Registrar");
    assert_eq!(domain.status, DomainStatus::List(vec!["active".into()]));
    assert_eq!(domain.nameservers, ["a.iana-servers.net"]);
}

#[tokio::test]
async fn test_rdap_follows_bootstrap_redirect() {
    let server = MockServer::start().await;
    let registry = format!("{}/registry/domain/example.com", server.uri());

    Mock::given(method("GET"))
        .and(path("/domain/example.com"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", registry.as_str()))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/registry/domain/example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rdap_body()))
        .expect(1)
        .mount(&server)
        .await;

    let provider = RdapProvider::new(client_for(&server));
    let query = Query::domain("example.com").unwrap();
    let record = assert_ok!(provider.lookup(&query, TIMEOUT).await);
    assert_eq!(record.source(), "RDAP");
}

#[tokio::test]
async fn test_non_success_status_is_upstream_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/domain/unknown.example"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"errorCode": 404})))
        .mount(&server)
        .await;

    let provider = RdapProvider::new(client_for(&server));
    let query = Query::domain("unknown.example").unwrap();
    let err = assert_err!(provider.lookup(&query, TIMEOUT).await);
    assert_eq!(err, AdapterFailure::UpstreamError { status: 404 });
}

#[tokio::test]
async fn test_non_json_body_is_malformed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/domain/example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>rate limited</html>"))
        .mount(&server)
        .await;

    let provider = RdapProvider::new(client_for(&server));
    let query = Query::domain("example.com").unwrap();
    let err = assert_err!(provider.lookup(&query, TIMEOUT).await);
    assert!(matches!(err, AdapterFailure::MalformedResponse(_)));
}

#[tokio::test]
async fn test_slow_provider_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/domain/example.com"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(rdap_body())
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let provider = RdapProvider::new(client_for(&server));
    let query = Query::domain("example.com").unwrap();
    let timeout = Duration::from_millis(200);

    let started = Instant::now();
    let err = assert_err!(provider.lookup(&query, timeout).await);
    assert_eq!(err, AdapterFailure::Timeout { after: timeout });
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn test_connection_refused_is_network_failure() {
    let client = LookupClient::builder()
        .base_url("http://127.0.0.1:1")
        .build()
        .unwrap();

    let provider = RdapProvider::new(client);
    let query = Query::domain("example.com").unwrap();
    let err = assert_err!(provider.lookup(&query, TIMEOUT).await);
    assert!(matches!(err, AdapterFailure::Network(_)), "got {err:?}");
}

#[tokio::test]
async fn test_whoisxml_query_parameters() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/whoisserver/WhoisService"))
        .and(query_param("apiKey", "test-key"))
        .and(query_param("domainName", "example.org"))
        .and(query_param("outputFormat", "JSON"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "WhoisRecord": {
                "domainName": "example.org",
                "registrarName": "Example Registrar, LLC",
                "dnssec": "signedDelegation"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = WhoisXmlProvider::new(client_for(&server));
    let query = Query::domain("example.org").unwrap();
    let record = assert_ok!(provider.lookup(&query, TIMEOUT).await);
    let domain = record.as_domain().unwrap();
    assert_eq!(domain.source, "WhoisXML API");
    assert_eq!(domain.registrar, "Example Registrar, LLC");
    assert_eq!(domain.dnssec, "signedDelegation");
}

#[tokio::test]
async fn test_ipwhois_rejection() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/json/example.org"))
        .and(query_param("lang", "en"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": false, "message": "Reserved range"})),
        )
        .mount(&server)
        .await;

    let provider = IpWhoisProvider::new(client_for(&server));
    let query = Query::domain("example.org").unwrap();
    let err = assert_err!(provider.lookup(&query, TIMEOUT).await);
    assert_eq!(
        err,
        AdapterFailure::UpstreamRejected {
            message: "Reserved range".into()
        }
    );
}

#[tokio::test]
async fn test_ipapi_lookup() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/8.8.8.8/json/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ip": "8.8.8.8",
            "country_code": "US",
            "country_name": "United States",
            "org": "GOOGLE",
            "asn": "AS15169"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = IpApiProvider::new(client_for(&server));
    let query = Query::ip("8.8.8.8").unwrap();
    let record = assert_ok!(provider.lookup(&query, TIMEOUT).await);
    let ip = record.as_ip().unwrap();
    assert_eq!(ip.source, "ipapi.co");
    assert_eq!(ip.isp.as_deref(), Some("GOOGLE"));
    assert_eq!(ip.is_proxy, None);
}

#[tokio::test]
async fn test_wrong_kind_is_unsupported_without_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let provider = IpApiProvider::new(client_for(&server));
    let query = Query::domain("example.org").unwrap();
    let err = assert_err!(provider.lookup(&query, TIMEOUT).await);
    assert!(matches!(err, AdapterFailure::Unsupported(_)));
}

#[tokio::test]
async fn test_rate_limited_lookup_waits_for_slot() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/domain/example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rdap_body()))
        .expect(2)
        .mount(&server)
        .await;

    let client = LookupClient::builder()
        .base_url(server.uri())
        .requests_per_second(1)
        .build()
        .expect("client builds");
    let provider = RdapProvider::new(client);
    let query = Query::domain("example.com").unwrap();
    let timeout = Duration::from_millis(300);

    provider.ready().await;
    assert_ok!(provider.lookup(&query, timeout).await);

    let started = Instant::now();
    provider.ready().await;
    assert!(started.elapsed() >= Duration::from_millis(500));
    assert_ok!(provider.lookup(&query, timeout).await);
}
