//! Session entry point

use std::sync::Arc;

use super::PartStudio;
use crate::service::{CadService, ElementTarget};
use crate::units::UnitSystem;

/// A connection to the CAD service with a fixed unit system
#[derive(Clone)]
pub struct Client {
    service: Arc<dyn CadService>,
    units: UnitSystem,
}

impl Client {
    /// Client over `service` using `units` for every studio
    pub fn new(service: Arc<dyn CadService>, units: UnitSystem) -> Self {
        Self { service, units }
    }

    /// Session unit system
    pub fn units(&self) -> UnitSystem {
        self.units
    }

    /// Shared service handle
    pub fn service(&self) -> &Arc<dyn CadService> {
        &self.service
    }

    /// Open the part studio at `target`
    pub fn partstudio(&self, target: ElementTarget) -> PartStudio {
        PartStudio::new(self.service.clone(), target, self.units)
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Client(units={})", self.units)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::mock::MockService;

    #[test]
    fn test_partstudio_inherits_units() {
        let client = Client::new(Arc::new(MockService::new()), UnitSystem::Metric);
        let studio = client.partstudio(ElementTarget::new("d", "w", "e"));
        assert_eq!(studio.units(), UnitSystem::Metric);
        assert_eq!(studio.target().element_id, "e");
    }
}
