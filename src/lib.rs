//! Geo Payload - template-whitelisted map scripts built from untrusted gallery data
//!
//! This library composes the map program for a set of gallery entities, ships it
//! to a consuming runtime together with the list of code fragments it may
//! contain, and lets the consumer execute it only after everything that is not
//! an approved fragment has passed the validation rules.
//!
//! # Example
//!
//! ```rust
//! use geo_payload::{run_cycle, Configuration, Entity, MapId, RecordingRuntime};
//!
//! let lake = Entity::new(5, 46.45, 6.5)
//!     .with_title("Lake")
//!     .with_description("Blue water");
//!
//! let mut runtime = RecordingRuntime::default();
//! run_cycle(&[lake], &Configuration::default(), MapId::new(3), &mut runtime).unwrap();
//!
//! assert_eq!(runtime.invoked, vec!["geo2Map_3".to_string()]);
//! assert!(runtime.installed[0].contains("\"Lake\""));
//! ```

pub mod config;
pub mod entity;
pub mod error;
pub mod executor;
pub mod guard;
pub mod template;
pub mod transport;

pub use config::{Configuration, ConfigurationError, Lightbox, PinMode};
pub use entity::Entity;
pub use error::{ValidationError, ValidationErrorKind};
pub use executor::{CycleState, Executor, RecordingRuntime, Runtime};
pub use template::{
    CatalogDriftError, CodePayload, FragmentCatalog, MapId, TemplateComposer, TemplateDefinition,
};
pub use transport::{Exchange, TransportError};

use thiserror::Error;
use tracing::debug;

/// Errors that can end a request cycle
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("payload rejected: {0}")]
    Validation(#[from] ValidationError),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The composer and its catalog disagree
    #[error("catalog drift: {0}")]
    CatalogDrift(#[from] CatalogDriftError),

    #[error("request cannot move from {from} to {to}")]
    InvalidTransition { from: CycleState, to: CycleState },
}

/// Compose the map program for `entities` and package it for the wire
///
/// Debug builds also check that every literal the composer emitted is in the
/// fragment catalog.
pub fn compose_exchange(
    entities: &[Entity],
    config: &Configuration,
    map_id: MapId,
) -> Result<(CodePayload, Exchange), PipelineError> {
    let definition = TemplateDefinition::for_config(config)?;
    let catalog = FragmentCatalog::from_definition(&definition);
    let payload = TemplateComposer::from_definition(definition, map_id).compose(entities);

    if cfg!(debug_assertions) {
        catalog.verify(&payload)?;
    }

    let exchange = Exchange::encode(&payload, &catalog)?;
    debug!(
        map_id = %map_id,
        fragments = catalog.fragments().len(),
        placed = payload.entities_order.len(),
        "composed exchange"
    );
    Ok((payload, exchange))
}

/// Run one full request cycle into `runtime`
///
/// Returns the installed program. On any error the runtime is left untouched.
pub fn run_cycle<R: Runtime>(
    entities: &[Entity],
    config: &Configuration,
    map_id: MapId,
    runtime: R,
) -> Result<String, PipelineError> {
    let mut executor = Executor::new(runtime);
    let exchange = executor.compose(entities, config, map_id)?;
    executor.receive(&exchange)
}
