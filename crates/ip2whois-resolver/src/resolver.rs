//! Ordered provider fallback.

use crate::attempt::{Attempt, Resolution};
use ip2whois_client::{domain_chain, ip_chain, ClientConfig, LookupClient, Provider};
use ip2whois_core::{
    classify, synthesize, AdapterFailure, CanonicalRecord, LookupError, Query, QueryKind,
    ValidationError,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Default per-provider timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

/// Tries providers one at a time, in priority order, and returns the first
/// record any of them produces.
///
/// Each provider call gets its own timeout; a resolution is therefore bounded
/// by the chain length times the timeout. When the chain is exhausted the
/// record is synthesized locally, so resolving a validated query never fails.
#[derive(Clone)]
pub struct Resolver {
    domain_chain: Vec<Arc<dyn Provider>>,
    ip_chain: Vec<Arc<dyn Provider>>,
    timeout: Duration,
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names = |chain: &[Arc<dyn Provider>]| chain.iter().map(|p| p.name()).collect::<Vec<_>>();
        f.debug_struct("Resolver")
            .field("domain_chain", &names(&self.domain_chain))
            .field("ip_chain", &names(&self.ip_chain))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Resolver {
    /// Resolver over the default providers with default settings
    pub fn new() -> Result<Self, LookupError> {
        Ok(Self::with_client(&LookupClient::new()?))
    }

    /// Resolver over the default providers built from `config`
    pub fn from_config(config: ClientConfig) -> Result<Self, LookupError> {
        Ok(Self::with_client(&LookupClient::from_config(config)?))
    }

    /// Resolver over the default providers sharing `client`
    #[must_use]
    pub fn with_client(client: &LookupClient) -> Self {
        Self {
            domain_chain: domain_chain(client),
            ip_chain: ip_chain(client),
            timeout: client.timeout(),
        }
    }

    /// Create a builder for a custom provider chain
    #[must_use]
    pub fn builder() -> ResolverBuilder {
        ResolverBuilder::new()
    }

    /// Providers consulted for `kind`, in order
    #[must_use]
    pub fn chain(&self, kind: QueryKind) -> &[Arc<dyn Provider>] {
        match kind {
            QueryKind::Ip => &self.ip_chain,
            QueryKind::Domain => &self.domain_chain,
        }
    }

    /// Per-provider timeout
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Validate raw input and resolve it.
    ///
    /// The only error is a rejected input, reported before any provider is
    /// contacted.
    pub async fn resolve(
        &self,
        raw: &str,
        kind: &str,
    ) -> Result<CanonicalRecord, ValidationError> {
        let query = classify(raw, kind)?;
        Ok(self.resolve_query(&query).await)
    }

    /// Like [`resolve`](Self::resolve), also returning the attempt log
    pub async fn resolve_traced(&self, raw: &str, kind: &str) -> Result<Resolution, ValidationError> {
        let query = classify(raw, kind)?;
        Ok(self.resolve_query_traced(&query).await)
    }

    /// Resolve an already validated query
    pub async fn resolve_query(&self, query: &Query) -> CanonicalRecord {
        self.resolve_query_traced(query).await.record
    }

    /// Resolve an already validated query, returning the attempt log
    #[instrument(skip(self, query), fields(query = %query, kind = %query.kind()))]
    pub async fn resolve_query_traced(&self, query: &Query) -> Resolution {
        let mut attempts = Vec::new();

        for provider in self.chain(query.kind()) {
            provider.ready().await;
            let started = Instant::now();
            let outcome = self.attempt(provider.as_ref(), query).await;
            let elapsed = started.elapsed();

            match outcome {
                Ok(record) => {
                    debug!(provider = provider.name(), ?elapsed, "provider answered");
                    attempts.push(Attempt::succeeded(provider.name(), elapsed));
                    return Resolution { record, attempts };
                }
                Err(failure) => {
                    warn!(
                        provider = provider.name(),
                        failure = failure.kind(),
                        error = %failure,
                        "provider failed, trying next"
                    );
                    attempts.push(Attempt::failed(provider.name(), elapsed, failure));
                }
            }
        }

        info!(attempts = attempts.len(), "all providers failed, using local analysis");
        Resolution {
            record: synthesize(query),
            attempts,
        }
    }

    /// Resolve independent queries concurrently, preserving input order.
    ///
    /// Each query still walks its own chain strictly in sequence.
    pub async fn resolve_many(
        &self,
        requests: &[(&str, &str)],
    ) -> Vec<Result<CanonicalRecord, ValidationError>> {
        let futures: Vec<_> = requests
            .iter()
            .map(|(raw, kind)| self.resolve(raw, kind))
            .collect();
        futures_util::future::join_all(futures).await
    }

    /// One provider call under the per-provider timeout.
    ///
    /// The adapter enforces the timeout on its own request as well; this outer
    /// bound holds for adapters that do not. The provider must already be
    /// [`ready`](Provider::ready). A record of the wrong kind counts as a
    /// malformed response.
    async fn attempt(
        &self,
        provider: &dyn Provider,
        query: &Query,
    ) -> Result<CanonicalRecord, AdapterFailure> {
        match tokio::time::timeout(self.timeout, provider.lookup(query, self.timeout)).await {
            Ok(Ok(record)) if record.kind() != query.kind() => {
                Err(AdapterFailure::MalformedResponse(format!(
                    "{} record for a {} query",
                    record.kind(),
                    query.kind()
                )))
            }
            Ok(result) => result,
            Err(_) => Err(AdapterFailure::Timeout {
                after: self.timeout,
            }),
        }
    }
}

/// Builder for a [`Resolver`] with custom providers
#[derive(Default)]
pub struct ResolverBuilder {
    domain_chain: Vec<Arc<dyn Provider>>,
    ip_chain: Vec<Arc<dyn Provider>>,
    timeout: Option<Duration>,
}

impl ResolverBuilder {
    /// Create a builder with empty chains
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a provider to the chain matching its kind
    #[must_use]
    pub fn provider(mut self, provider: Arc<dyn Provider>) -> Self {
        match provider.kind() {
            QueryKind::Ip => self.ip_chain.push(provider),
            QueryKind::Domain => self.domain_chain.push(provider),
        }
        self
    }

    /// Append the default providers for both kinds
    #[must_use]
    pub fn default_providers(mut self, client: &LookupClient) -> Self {
        self.domain_chain.extend(domain_chain(client));
        self.ip_chain.extend(ip_chain(client));
        self.timeout.get_or_insert(client.timeout());
        self
    }

    /// Set the per-provider timeout
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the resolver
    #[must_use]
    pub fn build(self) -> Resolver {
        Resolver {
            domain_chain: self.domain_chain,
            ip_chain: self.ip_chain,
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use ip2whois_core::{
        DomainRecord, IpRecord, LOCAL_DOMAIN_NOTE, LOCAL_IP_NOTE, LOCAL_SOURCE,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone)]
    enum Behavior {
        Succeed,
        Fail(AdapterFailure),
        Hang(Duration),
        WrongKind,
        Queued(Duration),
    }

    struct MockProvider {
        name: &'static str,
        kind: QueryKind,
        behavior: Behavior,
        calls: Arc<AtomicUsize>,
    }

    impl MockProvider {
        fn new(name: &'static str, kind: QueryKind, behavior: Behavior) -> (Arc<Self>, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let provider = Arc::new(Self {
                name,
                kind,
                behavior,
                calls: Arc::clone(&calls),
            });
            (provider, calls)
        }
    }

    #[async_trait]
    impl Provider for MockProvider {
        fn name(&self) -> &'static str {
            self.name
        }

        fn kind(&self) -> QueryKind {
            self.kind
        }

        async fn ready(&self) {
            if let Behavior::Queued(wait) = &self.behavior {
                tokio::time::sleep(*wait).await;
            }
        }

        async fn lookup(
            &self,
            query: &Query,
            _timeout: Duration,
        ) -> Result<CanonicalRecord, AdapterFailure> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.behavior {
                Behavior::Succeed | Behavior::Queued(_) => Ok(match query.kind() {
                    QueryKind::Ip => IpRecord::bare(query.as_str(), self.name).into(),
                    QueryKind::Domain => {
                        DomainRecord::unknown(query.as_str(), query.parts(), self.name).into()
                    }
                }),
                Behavior::Fail(failure) => Err(failure.clone()),
                Behavior::Hang(delay) => {
                    tokio::time::sleep(*delay).await;
                    Ok(IpRecord::bare(query.as_str(), "too late").into())
                }
                Behavior::WrongKind => Ok(IpRecord::bare("192.0.2.1", self.name).into()),
            }
        }
    }

    fn upstream_error() -> Behavior {
        Behavior::Fail(AdapterFailure::UpstreamError { status: 500 })
    }

    #[tokio::test]
    async fn test_first_success_stops_the_chain() {
        let (first, first_calls) = MockProvider::new("first", QueryKind::Domain, upstream_error());
        let (second, second_calls) = MockProvider::new("second", QueryKind::Domain, Behavior::Succeed);
        let (third, third_calls) = MockProvider::new("third", QueryKind::Domain, Behavior::Succeed);

        let resolver = Resolver::builder()
            .provider(first)
            .provider(second)
            .provider(third)
            .build();

        let resolution = resolver.resolve_traced("example.com", "domain").await.unwrap();
        assert_eq!(resolution.record.source(), "second");
        assert_eq!(first_calls.load(Ordering::SeqCst), 1);
        assert_eq!(second_calls.load(Ordering::SeqCst), 1);
        assert_eq!(third_calls.load(Ordering::SeqCst), 0);

        assert_eq!(resolution.attempts.len(), 2);
        assert!(!resolution.attempts[0].is_success());
        assert!(resolution.attempts[1].is_success());
        assert!(!resolution.used_fallback());
    }

    #[tokio::test]
    async fn test_all_failures_fall_back_to_local_analysis() {
        let (a, _) = MockProvider::new("a", QueryKind::Domain, upstream_error());
        let (b, _) = MockProvider::new(
            "b",
            QueryKind::Domain,
            Behavior::Fail(AdapterFailure::MalformedResponse("eof".into())),
        );
        let (c, _) = MockProvider::new(
            "c",
            QueryKind::Domain,
            Behavior::Fail(AdapterFailure::UpstreamRejected {
                message: "quota".into(),
            }),
        );

        let resolver = Resolver::builder().provider(a).provider(b).provider(c).build();
        let resolution = resolver.resolve_traced("example.test", "domain").await.unwrap();

        let domain = resolution.record.as_domain().unwrap();
        assert_eq!(domain.domain, "example.test");
        assert_eq!(domain.source, LOCAL_SOURCE);
        assert_eq!(domain.note.as_deref(), Some(LOCAL_DOMAIN_NOTE));
        assert_eq!(domain.country_code, None);
        assert_eq!(resolution.failures().count(), 3);
        assert!(resolution.used_fallback());
    }

    #[tokio::test]
    async fn test_rejected_input_never_reaches_providers() {
        let (a, a_calls) = MockProvider::new("a", QueryKind::Domain, Behavior::Succeed);
        let (ip, ip_calls) = MockProvider::new("ip", QueryKind::Ip, Behavior::Succeed);
        let resolver = Resolver::builder().provider(a).provider(ip).build();

        let err = resolver.resolve("not a domain!!", "domain").await.unwrap_err();
        assert!(matches!(err, ValidationError::InvalidDomain(_)));

        let err = resolver.resolve("example.com", "hostname").await.unwrap_err();
        assert_eq!(err, ValidationError::InvalidKind("hostname".into()));

        let err = resolver.resolve("", "ip").await.unwrap_err();
        assert_eq!(err, ValidationError::MissingQuery);

        assert_eq!(a_calls.load(Ordering::SeqCst), 0);
        assert_eq!(ip_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_provider_times_out_after_default_timeout() {
        let (slow, _) = MockProvider::new(
            "slow",
            QueryKind::Domain,
            Behavior::Hang(Duration::from_secs(60)),
        );
        let (fast, _) = MockProvider::new("fast", QueryKind::Domain, Behavior::Succeed);
        let resolver = Resolver::builder().provider(slow).provider(fast).build();
        assert_eq!(resolver.timeout(), Duration::from_millis(5000));

        let started = Instant::now();
        let resolution = resolver.resolve_traced("example.com", "domain").await.unwrap();
        let elapsed = started.elapsed();

        assert_eq!(resolution.record.source(), "fast");
        assert_eq!(
            resolution.attempts[0].failure,
            Some(AdapterFailure::Timeout {
                after: Duration::from_millis(5000)
            })
        );
        assert!(elapsed >= Duration::from_millis(5000));
        assert!(elapsed < Duration::from_millis(5500), "took {elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_waiting_for_a_slot_is_not_charged_to_the_timeout() {
        let (queued, calls) = MockProvider::new(
            "queued",
            QueryKind::Domain,
            Behavior::Queued(Duration::from_secs(8)),
        );
        let resolver = Resolver::builder()
            .timeout(Duration::from_millis(5000))
            .provider(queued)
            .build();

        let resolution = resolver.resolve_traced("example.com", "domain").await.unwrap();
        assert_eq!(resolution.record.source(), "queued");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(resolution.attempts[0].is_success());
        assert!(resolution.attempts[0].elapsed < Duration::from_millis(5000));
    }

    #[tokio::test]
    async fn test_record_of_wrong_kind_advances_chain() {
        let (confused, _) = MockProvider::new("confused", QueryKind::Domain, Behavior::WrongKind);
        let (good, good_calls) = MockProvider::new("good", QueryKind::Domain, Behavior::Succeed);
        let resolver = Resolver::builder().provider(confused).provider(good).build();

        let resolution = resolver.resolve_traced("example.com", "domain").await.unwrap();
        assert_eq!(resolution.record.source(), "good");
        assert!(resolution.record.as_domain().is_some());
        assert_eq!(good_calls.load(Ordering::SeqCst), 1);
        assert!(matches!(
            resolution.attempts[0].failure,
            Some(AdapterFailure::MalformedResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_identical_inputs_give_identical_records() {
        let (a, _) = MockProvider::new("a", QueryKind::Domain, upstream_error());
        let (b, _) = MockProvider::new("b", QueryKind::Domain, Behavior::Succeed);
        let resolver = Resolver::builder().provider(a).provider(b).build();

        let first = resolver.resolve("example.org", "domain").await.unwrap();
        let second = resolver.resolve("example.org", "domain").await.unwrap();
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[tokio::test]
    async fn test_ip_chain() {
        let (ok, _) = MockProvider::new("geo", QueryKind::Ip, Behavior::Succeed);
        let resolver = Resolver::builder().provider(ok).build();
        let record = resolver.resolve("8.8.8.8", "ip").await.unwrap();
        assert_eq!(record.source(), "geo");

        let (down, calls) = MockProvider::new(
            "geo",
            QueryKind::Ip,
            Behavior::Fail(AdapterFailure::Network("connection refused".into())),
        );
        let resolver = Resolver::builder().provider(down).build();
        let record = resolver.resolve("8.8.8.8", "ip").await.unwrap();
        let ip = record.as_ip().unwrap();
        assert_eq!(ip.ip, "8.8.8.8");
        assert_eq!(ip.source, LOCAL_SOURCE);
        assert_eq!(ip.note.as_deref(), Some(LOCAL_IP_NOTE));
        assert!(ip.org.is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_chain_is_local_analysis() {
        let resolver = Resolver::builder().build();
        let resolution = resolver.resolve_traced("example.de", "domain").await.unwrap();
        assert!(resolution.attempts.is_empty());
        assert_eq!(resolution.record.country_code(), Some("DE"));
    }

    #[tokio::test]
    async fn test_resolve_many_preserves_order() {
        let (geo, _) = MockProvider::new("geo", QueryKind::Ip, Behavior::Succeed);
        let (reg, _) = MockProvider::new("reg", QueryKind::Domain, Behavior::Succeed);
        let resolver = Resolver::builder().provider(geo).provider(reg).build();

        let results = resolver
            .resolve_many(&[("1.1.1.1", "ip"), ("bad domain", "domain"), ("example.com", "domain")])
            .await;

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().source(), "geo");
        assert!(results[1].is_err());
        assert_eq!(results[2].as_ref().unwrap().query(), "example.com");
    }

    #[test]
    fn test_default_resolver_chains() {
        let resolver = Resolver::new().unwrap();
        let domain: Vec<_> = resolver
            .chain(QueryKind::Domain)
            .iter()
            .map(|p| p.name())
            .collect();
        assert_eq!(domain, ["RDAP", "WhoisXML API", "ipwhois.io"]);
        assert_eq!(resolver.chain(QueryKind::Ip).len(), 1);
        assert_eq!(resolver.timeout(), DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_builder_appends_after_defaults() {
        let client = LookupClient::builder()
            .timeout(Duration::from_millis(750))
            .build()
            .unwrap();
        let (extra, _) = MockProvider::new("extra", QueryKind::Domain, Behavior::Succeed);

        let resolver = Resolver::builder()
            .default_providers(&client)
            .provider(extra)
            .build();

        let names: Vec<_> = resolver
            .chain(QueryKind::Domain)
            .iter()
            .map(|p| p.name())
            .collect();
        assert_eq!(names, ["RDAP", "WhoisXML API", "ipwhois.io", "extra"]);
        assert_eq!(resolver.timeout(), Duration::from_millis(750));
    }
}
