//! IAM Role Cloner Service Layer
//!
//! The service owns the [`GatewayConnector`] used to open profiles and exposes
//! the high-level operations (clone, list) the CLI drives.

use crate::aws::gateway::{AwsConnector, GatewayConnector};

/// Main service struct that holds the connector and provides the workflows
pub struct RoleClonerService<C: GatewayConnector = AwsConnector> {
    pub(crate) connector: C,
}

impl RoleClonerService<AwsConnector> {
    /// Create a service that opens profiles from the shared AWS config files.
    pub fn new() -> Self {
        Self::with_connector(AwsConnector)
    }
}

impl Default for RoleClonerService<AwsConnector> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: GatewayConnector> RoleClonerService<C> {
    pub fn with_connector(connector: C) -> Self {
        Self { connector }
    }

    // clone_roles() is implemented in clone.rs
    // list_roles() is implemented in list.rs
}
