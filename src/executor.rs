//! Request cycle: compose, transmit, validate, execute
//!
//! An [`Executor`] drives one request through
//! `Idle -> Composing -> Transmitted -> Validating -> Executing | Rejected`.
//! The runtime is only touched on the way into `Executing`; a rejected
//! payload never reaches it, in whole or in part.

use std::fmt;

use tracing::debug;

use crate::config::Configuration;
use crate::entity::Entity;
use crate::guard;
use crate::template::{compose_snippet, entry_point, MapId};
use crate::transport::{fill, flatten_captions, Exchange};
use crate::{compose_exchange, PipelineError};

/// Where a request is in its cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CycleState {
    Idle,
    Composing,
    Transmitted,
    Validating,
    Executing,
    Rejected,
}

impl CycleState {
    /// `Executing` and `Rejected` end the cycle; there is no retry
    pub fn is_terminal(&self) -> bool {
        matches!(self, CycleState::Executing | CycleState::Rejected)
    }

    pub fn can_move_to(&self, next: CycleState) -> bool {
        use CycleState::*;
        matches!(
            (self, next),
            (Idle, Composing)
                | (Composing, Transmitted)
                | (Composing, Rejected)
                | (Transmitted, Validating)
                | (Validating, Executing)
                | (Validating, Rejected)
        )
    }
}

impl fmt::Display for CycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CycleState::Idle => write!(f, "idle"),
            CycleState::Composing => write!(f, "composing"),
            CycleState::Transmitted => write!(f, "transmitted"),
            CycleState::Validating => write!(f, "validating"),
            CycleState::Executing => write!(f, "executing"),
            CycleState::Rejected => write!(f, "rejected"),
        }
    }
}

/// The consuming script context
pub trait Runtime {
    /// Load validated code into the execution context
    fn install(&mut self, code: &str);

    /// Call a function defined by installed code
    fn invoke(&mut self, entry_point: &str);
}

impl<R: Runtime + ?Sized> Runtime for &mut R {
    fn install(&mut self, code: &str) {
        (**self).install(code);
    }

    fn invoke(&mut self, entry_point: &str) {
        (**self).invoke(entry_point);
    }
}

/// Runtime that records what it was asked to do
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingRuntime {
    pub installed: Vec<String>,
    pub invoked: Vec<String>,
}

impl Runtime for RecordingRuntime {
    fn install(&mut self, code: &str) {
        self.installed.push(code.to_string());
    }

    fn invoke(&mut self, entry_point: &str) {
        self.invoked.push(entry_point.to_string());
    }
}

/// Validate a received exchange and reassemble its program
///
/// Each body section is checked against its own approved fragments; caption
/// records are flattened to text first.
pub fn check_exchange(exchange: &Exchange) -> Result<String, PipelineError> {
    let received = exchange.decode()?;
    let body = exchange.body()?;
    let approved = &received.approved;

    guard::validate_text("pins", body.pins, &approved.pins)?;
    guard::validate_text("lightbox", body.lightbox, &approved.lightbox)?;
    let captions = flatten_captions(body.captions)?;
    guard::validate_text("captions", &captions, &approved.captions)?;

    Ok(fill(&received.skeleton, &body))
}

/// Drives one request and owns the runtime it executes into
#[derive(Debug)]
pub struct Executor<R: Runtime> {
    runtime: R,
    state: CycleState,
}

impl<R: Runtime> Executor<R> {
    /// Start a full cycle at `Idle`
    pub fn new(runtime: R) -> Self {
        Self {
            runtime,
            state: CycleState::Idle,
        }
    }

    /// Start at `Transmitted`, for a consumer handed a payload by another process
    pub fn awaiting(runtime: R) -> Self {
        Self {
            runtime,
            state: CycleState::Transmitted,
        }
    }

    pub fn state(&self) -> CycleState {
        self.state
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    pub fn into_runtime(self) -> R {
        self.runtime
    }

    /// Compose the map program and package it for the wire
    pub fn compose(
        &mut self,
        entities: &[Entity],
        config: &Configuration,
        map_id: MapId,
    ) -> Result<Exchange, PipelineError> {
        self.advance(CycleState::Composing)?;
        match compose_exchange(entities, config, map_id) {
            Ok((_, exchange)) => {
                self.advance(CycleState::Transmitted)?;
                Ok(exchange)
            }
            Err(err) => Err(self.reject(err)),
        }
    }

    /// Validate an exchange, then install it and call its entry point
    ///
    /// Returns the installed program.
    pub fn receive(&mut self, exchange: &Exchange) -> Result<String, PipelineError> {
        self.advance(CycleState::Validating)?;
        match check_exchange(exchange) {
            Ok(program) => {
                self.advance(CycleState::Executing)?;
                self.runtime.install(&program);
                self.runtime.invoke(&entry_point(exchange.map_id));
                Ok(program)
            }
            Err(err) => Err(self.reject(err)),
        }
    }

    /// Compose a worldmap lightbox snippet
    pub fn compose_lightbox(
        &mut self,
        entities: &[Entity],
        config: &Configuration,
        map_id: MapId,
    ) -> Result<String, PipelineError> {
        self.advance(CycleState::Composing)?;
        match compose_snippet(entities, config, map_id) {
            Ok(payload) => {
                self.advance(CycleState::Transmitted)?;
                Ok(payload.composed)
            }
            Err(err) => Err(self.reject(err)),
        }
    }

    /// Validate and install a lightbox snippet; it invokes itself
    pub fn receive_lightbox(&mut self, snippet: &str) -> Result<(), PipelineError> {
        self.advance(CycleState::Validating)?;
        match guard::validate_lightbox(snippet) {
            Ok(()) => {
                self.advance(CycleState::Executing)?;
                self.runtime.install(snippet);
                Ok(())
            }
            Err(err) => Err(self.reject(err)),
        }
    }

    fn advance(&mut self, next: CycleState) -> Result<(), PipelineError> {
        if !self.state.can_move_to(next) {
            return Err(PipelineError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        debug!(from = %self.state, to = %next, "cycle transition");
        self.state = next;
        Ok(())
    }

    fn reject(&mut self, err: impl Into<PipelineError>) -> PipelineError {
        let err = err.into();
        debug!(from = %self.state, error = %err, "cycle rejected");
        self.state = CycleState::Rejected;
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Lightbox;
    use crate::error::ValidationErrorKind;
    use pretty_assertions::assert_eq;

    fn lake() -> Entity {
        Entity::new(5, 46.45, 6.5)
            .with_title("Lake")
            .with_description("Blue water")
    }

    #[test]
    fn test_transitions() {
        use CycleState::*;
        assert!(Idle.can_move_to(Composing));
        assert!(Validating.can_move_to(Rejected));
        assert!(!Idle.can_move_to(Executing));
        assert!(!Transmitted.can_move_to(Executing));
        for terminal in [Executing, Rejected] {
            assert!(terminal.is_terminal());
            for next in [Idle, Composing, Transmitted, Validating, Executing, Rejected] {
                assert!(!terminal.can_move_to(next));
            }
        }
    }

    #[test]
    fn test_benign_cycle_executes() {
        let config = Configuration::default().with_lightbox(Lightbox::Infobox);
        let mut executor = Executor::new(RecordingRuntime::default());
        let exchange = executor.compose(&[lake()], &config, MapId::new(3)).unwrap();
        assert_eq!(executor.state(), CycleState::Transmitted);

        let program = executor.receive(&exchange).unwrap();
        assert_eq!(executor.state(), CycleState::Executing);
        let runtime = executor.into_runtime();
        assert_eq!(runtime.installed, vec![program]);
        assert_eq!(runtime.invoked, vec!["geo2Map_3".to_string()]);
    }

    #[test]
    fn test_rejected_payload_never_reaches_runtime() {
        let config = Configuration::default().with_lightbox(Lightbox::Infobox);
        let entity = lake().with_description("<script>alert(1)</script>");
        let mut executor = Executor::new(RecordingRuntime::default());
        let exchange = executor.compose(&[entity], &config, MapId::new(3)).unwrap();

        let err = executor.receive(&exchange).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Validation(ref e) if e.kind() == ValidationErrorKind::UnsafeCharacter
        ));
        assert_eq!(executor.state(), CycleState::Rejected);
        assert_eq!(executor.runtime(), &RecordingRuntime::default());
    }

    #[test]
    fn test_rejected_is_final() {
        let mut executor = Executor::awaiting(RecordingRuntime::default());
        let mut exchange = Executor::new(RecordingRuntime::default())
            .compose(&[lake()], &Configuration::default(), MapId::new(1))
            .unwrap();
        exchange.body = "no sections".to_string();
        assert!(matches!(
            executor.receive(&exchange),
            Err(PipelineError::Transport(_))
        ));
        assert!(matches!(
            executor.receive(&exchange),
            Err(PipelineError::InvalidTransition {
                from: CycleState::Rejected,
                to: CycleState::Validating
            })
        ));
    }

    #[test]
    fn test_invalid_configuration_rejects_at_composition() {
        let mut config = Configuration::default();
        config.zoom = 0;
        let mut executor = Executor::new(RecordingRuntime::default());
        assert!(matches!(
            executor.compose(&[lake()], &config, MapId::new(1)),
            Err(PipelineError::Configuration(_))
        ));
        assert_eq!(executor.state(), CycleState::Rejected);
    }

    #[test]
    fn test_lightbox_cycle_installs_without_invoking() {
        let config = Configuration::default().with_lightbox(Lightbox::Fancybox);
        let mut executor = Executor::new(RecordingRuntime::default());
        let snippet = executor
            .compose_lightbox(&[lake()], &config, MapId::new(4))
            .unwrap();
        executor.receive_lightbox(&snippet).unwrap();
        let runtime = executor.into_runtime();
        assert_eq!(runtime.installed, vec![snippet]);
        assert!(runtime.invoked.is_empty());
    }
}
