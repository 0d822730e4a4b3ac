//! Server host shared by every exposure
//!
//! `KioskHost` holds the immutable, process-wide state: configuration, the
//! geofence checker, the registration service (with its injected record
//! store) and the page renderer. Handlers receive it as `Arc<KioskHost>`.

use crate::config::KioskConfig;
use crate::core::geo::GeofenceChecker;
use crate::core::registration::RegistrationValidator;
use crate::core::service::RegistrationService;
use crate::core::store::RecordStore;
use crate::server::exposure::html::PageRenderer;
use anyhow::Result;
use std::sync::Arc;

/// Host context containing all kiosk state
pub struct KioskHost {
    /// Validated configuration
    pub config: Arc<KioskConfig>,

    /// Classifies device locations against the reference point
    pub geofence: GeofenceChecker,

    /// Validation + persistence of submissions
    pub registrations: RegistrationService,

    /// HTML page renderer
    pub pages: PageRenderer,
}

impl KioskHost {
    /// Build the host from a configuration and a record store
    ///
    /// Fails if the configuration is invalid or the page templates do not
    /// compile.
    pub fn new(config: KioskConfig, store: Arc<dyn RecordStore>) -> Result<Self> {
        config.validate()?;

        let geofence = GeofenceChecker::new(config.reference_point()?);
        let validator = RegistrationValidator::new(config.timezone()?);
        let pages = PageRenderer::new()?;

        Ok(Self {
            config: Arc::new(config),
            geofence,
            registrations: RegistrationService::new(validator, store),
            pages,
        })
    }

    /// Bind address from the configuration
    pub fn bind_addr(&self) -> &str {
        &self.config.server.bind_addr
    }
}

impl std::fmt::Debug for KioskHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KioskHost")
            .field("config", &self.config)
            .field("geofence", &self.geofence)
            .finish_non_exhaustive()
    }
}
