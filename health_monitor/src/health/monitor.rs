//! Fan-out/fan-in health check over every registered resource

use super::probes::{ProbeTask, ProberSet};
use super::registry::{Registry, RegistrySnapshot};
use crate::config::MonitorConfig;
use crate::error::{CheckError, Result};
use crate::models::{RegisteredResource, Resource, ServerResponse, ServiceResponse};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

pub struct HealthMonitor {
    registry: Registry,
    probers: ProberSet,
    timeout: Duration,
}

impl HealthMonitor {
    pub fn new(probers: ProberSet, timeout: Duration) -> Self {
        Self {
            registry: Registry::new(),
            probers,
            timeout,
        }
    }

    /// Monitor with the stand-in probes configured by `config`.
    pub fn from_config(config: &MonitorConfig) -> Self {
        Self::new(ProberSet::simulated(config.probe_latency()), config.timeout())
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn register(&self, resource: &Resource) -> Result<bool> {
        match self.registry.register(resource) {
            Ok(accepted) => {
                info!(
                    "Registered resource '{}' of type '{}' (critical: {})",
                    resource.name, resource.kind, resource.critical
                );
                Ok(accepted)
            }
            Err(e) => {
                warn!("Failed to add resource '{}': {}", resource.name, e);
                Err(e)
            }
        }
    }

    /// Registers each resource in turn and returns how many were accepted.
    pub fn register_all(&self, resources: &[Resource]) -> usize {
        resources
            .iter()
            .filter(|resource| self.register(resource).is_ok())
            .count()
    }

    pub fn resources(&self) -> Vec<RegisteredResource> {
        self.registry.resources()
    }

    pub async fn check(&self) -> ServerResponse {
        let snapshot = self.registry.snapshot();
        info!("Running health check for {} resources", snapshot.entries.len());

        let response = match self.run(&snapshot).await {
            Ok(results) => derive_status(results, &snapshot),
            Err(e) => {
                match &e {
                    CheckError::NothingToCheck => warn!("Health check skipped: nothing to check"),
                    CheckError::Timeout => {
                        warn!("Health check timed out after {:?}", self.timeout)
                    }
                    CheckError::Generic(reason) => error!("Health check failed: {}", reason),
                }
                ServerResponse::from(e)
            }
        };

        info!(
            "Health check completed - status: {}, message: {}",
            response.status, response.message
        );
        response
    }

    async fn run(&self, snapshot: &RegistrySnapshot) -> std::result::Result<Vec<ServiceResponse>, CheckError> {
        let tasks = self.dispatch(snapshot)?;
        self.collect(tasks).await
    }

    fn dispatch(&self, snapshot: &RegistrySnapshot) -> std::result::Result<Vec<ProbeTask>, CheckError> {
        if snapshot.is_empty() {
            return Err(CheckError::NothingToCheck);
        }

        let mut tasks = Vec::with_capacity(snapshot.entries.len());
        for (kind, name, handle) in &snapshot.entries {
            // Returning early drops and aborts whatever was already spawned
            let prober = self
                .probers
                .get(*kind)
                .ok_or_else(|| CheckError::Generic(format!("no probe registered for type '{}'", kind)))?;
            tasks.push(ProbeTask::spawn(prober, name.clone(), handle.clone()));
        }

        debug!("Dispatched {} probes", tasks.len());
        Ok(tasks)
    }

    async fn collect(&self, mut tasks: Vec<ProbeTask>) -> std::result::Result<Vec<ServiceResponse>, CheckError> {
        let deadline = Instant::now() + self.timeout;
        let mut results = Vec::with_capacity(tasks.len());

        // Dispatch order, not completion order. Uncollected tasks are aborted
        // when `tasks` is dropped on an early return.
        for task in tasks.iter_mut() {
            match task.join_until(deadline).await {
                Ok(response) => results.push(response),
                Err(CheckError::Timeout) => {
                    warn!("Deadline expired while waiting on '{}'", task.resource());
                    return Err(CheckError::Timeout);
                }
                Err(e) => return Err(e),
            }
        }

        Ok(results)
    }
}

fn derive_status(results: Vec<ServiceResponse>, snapshot: &RegistrySnapshot) -> ServerResponse {
    let mut failed = Vec::new();
    let mut escalated = false;

    for result in results.iter().filter(|result| !result.is_ok()) {
        if snapshot.is_critical(&result.resource) {
            error!("Critical resource '{}' reported '{}'", result.resource, result.status);
            escalated = true;
        } else {
            warn!("Resource '{}' reported '{}'", result.resource, result.status);
        }
        failed.push(result.resource.clone());
    }

    let mut response = ServerResponse::ok(results);
    if escalated {
        response.status = 503;
        response.message = "Fail in a critical resource service".to_string();
    }
    if !failed.is_empty() {
        response.failed = Some(failed);
    }

    response
}
