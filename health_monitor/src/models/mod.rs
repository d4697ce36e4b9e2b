//! Data transfer types shared by the registry, the aggregator and the HTTP layer

pub mod resource;
pub mod response;

pub use resource::{RegisteredResource, Resource, ResourceKind};
pub use response::{RegisterResponse, ServerResponse, ServiceResponse};
