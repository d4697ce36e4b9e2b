pub mod monitor;
pub mod probes;
pub mod registry;


pub use monitor::HealthMonitor;
pub use probes::{
    DependencyProbe, ElasticsearchClientProbe, PostgresClientProbe, ProbeTask, Prober, ProberSet,
    RedisClientProbe, ServiceUrlProbe, SharedProber,
};
pub use registry::{Registry, RegistrySnapshot};
