//! Unit builders and the lightweight-unit capability probe.
//!
//! Two builders exist: [`StandardUnitBuilder`] always produces OS threads, and
//! [`LightweightUnitBuilder`] places units on the host tokio runtime. Whether the
//! lightweight builder exists at all is decided once per process by
//! [`lightweight_builder`]; without the `lightweight` feature the probe reports it
//! unavailable and factories silently use OS threads.

use std::fmt;

use once_cell::sync::Lazy;
use tracing::trace;

#[cfg(feature = "lightweight")]
use crate::core::errors::ThreadFactoryError;
use crate::factory::unit::{ExecutionUnit, Launcher, UnitKind, Work};

/// A construction attempt that failed. Hands the work back so the caller can retry elsewhere.
pub struct BuildRejected {
    /// The work that was not wrapped
    pub work: Work,
    /// Why construction failed
    pub error: ThreadFactoryError,
}

impl fmt::Debug for BuildRejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildRejected")
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

/// Capability interface for constructing units.
pub trait UnitBuilder: Send + Sync {
    /// Kind of unit this builder produces
    fn kind(&self) -> UnitKind;

    /// Construct an unstarted unit.
    fn build(
        &self,
        name: String,
        daemon: bool,
        work: Work,
    ) -> std::result::Result<ExecutionUnit, BuildRejected>;
}

/// Builds units backed by dedicated OS threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardUnitBuilder;

impl StandardUnitBuilder {
    /// Construct an OS-thread unit. This cannot fail.
    pub fn build_unit(&self, name: String, daemon: bool, work: Work) -> ExecutionUnit {
        ExecutionUnit::new(name, daemon, work, Launcher::Standard)
    }
}

impl UnitBuilder for StandardUnitBuilder {
    fn kind(&self) -> UnitKind {
        UnitKind::Standard
    }

    fn build(
        &self,
        name: String,
        daemon: bool,
        work: Work,
    ) -> std::result::Result<ExecutionUnit, BuildRejected> {
        Ok(self.build_unit(name, daemon, work))
    }
}

/// Builds units that run on the blocking pool of the tokio runtime entered by the caller.
///
/// Construction fails when the calling thread is outside any tokio runtime. The
/// daemon flag is recorded but has no effect: runtime tasks are always detached.
#[cfg(feature = "lightweight")]
#[derive(Debug, Clone, Copy, Default)]
pub struct LightweightUnitBuilder;

#[cfg(feature = "lightweight")]
impl UnitBuilder for LightweightUnitBuilder {
    fn kind(&self) -> UnitKind {
        UnitKind::Lightweight
    }

    fn build(
        &self,
        name: String,
        daemon: bool,
        work: Work,
    ) -> std::result::Result<ExecutionUnit, BuildRejected> {
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => Ok(ExecutionUnit::new(
                name,
                daemon,
                work,
                Launcher::Lightweight(runtime),
            )),
            Err(e) => Err(BuildRejected {
                work,
                error: ThreadFactoryError::runtime_unavailable(e.to_string()),
            }),
        }
    }
}

/// Process-wide probe result, evaluated once.
static LIGHTWEIGHT_BUILDER: Lazy<Option<&'static (dyn UnitBuilder + 'static)>> =
    Lazy::new(probe_lightweight);

#[cfg(feature = "lightweight")]
fn probe_lightweight() -> Option<&'static (dyn UnitBuilder + 'static)> {
    static BUILDER: LightweightUnitBuilder = LightweightUnitBuilder;
    trace!("lightweight units available");
    let builder: &'static dyn UnitBuilder = &BUILDER;
    Some(builder)
}

#[cfg(not(feature = "lightweight"))]
fn probe_lightweight() -> Option<&'static (dyn UnitBuilder + 'static)> {
    trace!("lightweight units unavailable in this build");
    None
}

/// The lightweight builder, if this process supports lightweight units.
pub fn lightweight_builder() -> Option<&'static dyn UnitBuilder> {
    *LIGHTWEIGHT_BUILDER
}

/// Whether the capability probe found lightweight units.
pub fn lightweight_available() -> bool {
    lightweight_builder().is_some()
}
