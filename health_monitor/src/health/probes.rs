//! Probes for each kind of monitored resource

use crate::error::{CheckError, Result};
use crate::models::{ResourceKind, ServiceResponse};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Assesses the health of one resource of a given kind.
#[async_trait::async_trait]
pub trait Prober {
    /// Produces exactly one response for `name`, reachable through `handle`.
    async fn probe(&self, name: &str, handle: &str) -> ServiceResponse;
    fn kind(&self) -> ResourceKind;
}

pub type SharedProber = Arc<dyn Prober + Send + Sync>;

/// A probe running on its own task. Dropping the handle before the result has
/// been collected aborts the task.
pub struct ProbeTask {
    resource: String,
    handle: JoinHandle<ServiceResponse>,
}

impl ProbeTask {
    /// Starts probing immediately without waiting for the result.
    pub fn spawn(prober: SharedProber, name: String, handle: String) -> Self {
        let resource = name.clone();
        let handle = tokio::spawn(async move {
            let start = std::time::Instant::now();
            let mut response = prober.probe(&name, &handle).await;
            // Results are always reported under the registered name
            if response.resource != name {
                warn!(
                    "Probe for '{}' answered as '{}'; keeping the registered name",
                    name, response.resource
                );
                response.resource = name.clone();
            }
            debug!(
                "Probe '{}' ({}) finished in {:?} with status '{}'",
                name,
                prober.kind(),
                start.elapsed(),
                response.status
            );
            response
        });

        Self { resource, handle }
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Waits for the probe result until `deadline`.
    pub async fn join_until(&mut self, deadline: Instant) -> std::result::Result<ServiceResponse, CheckError> {
        match tokio::time::timeout_at(deadline, &mut self.handle).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(e)) => Err(CheckError::Generic(format!(
                "probe for '{}' did not complete: {}",
                self.resource, e
            ))),
            Err(_) => Err(CheckError::Timeout),
        }
    }
}

impl Drop for ProbeTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn simulate(latency: Duration, name: &str) -> ServiceResponse {
    tokio::time::sleep(latency).await;
    ServiceResponse::ok(name)
}

/// Stand-in for an HTTP service probe. Waits `latency` and reports success.
pub struct ServiceUrlProbe {
    latency: Duration,
}

impl ServiceUrlProbe {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

#[async_trait::async_trait]
impl Prober for ServiceUrlProbe {
    async fn probe(&self, name: &str, url: &str) -> ServiceResponse {
        debug!("Probing service '{}' at {}", name, url);
        simulate(self.latency, name).await
    }

    fn kind(&self) -> ResourceKind {
        ResourceKind::ServiceUrl
    }
}

/// Stand-in for a cache client probe.
pub struct RedisClientProbe {
    latency: Duration,
}

impl RedisClientProbe {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

#[async_trait::async_trait]
impl Prober for RedisClientProbe {
    async fn probe(&self, name: &str, client: &str) -> ServiceResponse {
        debug!("Pinging cache '{}' using {}", name, client);
        simulate(self.latency, name).await
    }

    fn kind(&self) -> ResourceKind {
        ResourceKind::RedisClient
    }
}

/// Stand-in for a search cluster probe.
pub struct ElasticsearchClientProbe {
    latency: Duration,
}

impl ElasticsearchClientProbe {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

#[async_trait::async_trait]
impl Prober for ElasticsearchClientProbe {
    async fn probe(&self, name: &str, client: &str) -> ServiceResponse {
        debug!("Querying search cluster '{}' using {}", name, client);
        simulate(self.latency, name).await
    }

    fn kind(&self) -> ResourceKind {
        ResourceKind::ElasticsearchClient
    }
}

/// Stand-in for a database client probe.
pub struct PostgresClientProbe {
    latency: Duration,
}

impl PostgresClientProbe {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

#[async_trait::async_trait]
impl Prober for PostgresClientProbe {
    async fn probe(&self, name: &str, client: &str) -> ServiceResponse {
        debug!("Running test query on database '{}' using {}", name, client);
        simulate(self.latency, name).await
    }

    fn kind(&self) -> ResourceKind {
        ResourceKind::PostgresPromiseClient
    }
}

/// Probe backed by a synchronous closure. `Ok` reports `"ok"`, `Err` reports
/// the status `"error"`.
pub struct DependencyProbe {
    kind: ResourceKind,
    check_fn: Box<dyn Fn(&str, &str) -> Result<()> + Send + Sync>,
}

impl DependencyProbe {
    pub fn new<F>(kind: ResourceKind, check_fn: F) -> Self
    where
        F: Fn(&str, &str) -> Result<()> + Send + Sync + 'static,
    {
        Self {
            kind,
            check_fn: Box::new(check_fn),
        }
    }
}

#[async_trait::async_trait]
impl Prober for DependencyProbe {
    async fn probe(&self, name: &str, handle: &str) -> ServiceResponse {
        match (self.check_fn)(name, handle) {
            Ok(()) => ServiceResponse::ok(name),
            Err(e) => {
                debug!("Dependency '{}' check failed: {}", name, e);
                ServiceResponse::with_status(name, "error")
            }
        }
    }

    fn kind(&self) -> ResourceKind {
        self.kind
    }
}

/// Maps each resource kind to the probe used for it.
#[derive(Clone, Default)]
pub struct ProberSet {
    probers: HashMap<ResourceKind, SharedProber>,
}

impl ProberSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stand-in probes for every known kind, each answering after `latency`.
    pub fn simulated(latency: Duration) -> Self {
        Self::new()
            .with_prober(ServiceUrlProbe::new(latency))
            .with_prober(RedisClientProbe::new(latency))
            .with_prober(ElasticsearchClientProbe::new(latency))
            .with_prober(PostgresClientProbe::new(latency))
    }

    /// Registers `prober` for its kind, replacing any previous one.
    pub fn with_prober<P: Prober + Send + Sync + 'static>(mut self, prober: P) -> Self {
        self.probers.insert(prober.kind(), Arc::new(prober));
        self
    }

    pub fn get(&self, kind: ResourceKind) -> Option<SharedProber> {
        self.probers.get(&kind).cloned()
    }

    pub fn len(&self) -> usize {
        self.probers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probers.is_empty()
    }
}
