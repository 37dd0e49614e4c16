//! Thread factory: names execution units and decides how they are built.
//!
//! [`DefaultThreadFactory`] numbers and decorates names (see [`naming`]) and
//! constructs either OS-thread units or, when enabled and supported, lightweight
//! units on the host runtime. Construction and renaming never fail; a failed
//! lightweight construction falls back to an OS thread and switches the
//! lightweight path off for the rest of the factory's life.
//!
//! # Usage
//!
//! ```no_run
//! use thread_factory_rs::{DefaultThreadFactory, ThreadFactory};
//!
//! let mut factory = DefaultThreadFactory::with_numbering("Incoming", true, true);
//! factory.set_cluster_name(Some("ClusterA")).set_pattern(Some("c"));
//!
//! let unit = factory.new_unit(Box::new(|| println!("working")));
//! assert_eq!(unit.name_cell().get(), "Incoming-1,ClusterA");
//! unit.start()?.join()?;
//! # Ok::<(), thread_factory_rs::ThreadFactoryError>(())
//! ```

pub mod builder;
pub mod diagnostics;
pub mod naming;
pub mod unit;

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::core::config::FactoryConfig;
use crate::core::errors::Result;

pub use builder::{
    lightweight_available, lightweight_builder, BuildRejected, StandardUnitBuilder, UnitBuilder,
};
#[cfg(feature = "lightweight")]
pub use builder::LightweightUnitBuilder;
pub use diagnostics::{DiagnosticSink, TracingSink};
pub use naming::{NamingContext, NamingPolicy, SequenceCounter, DEFAULT_BASE_NAME};
pub use unit::{current_unit, ExecutionUnit, Named, UnitHandle, UnitKind, UnitName, Work};

/// Replaceable factory seam used by code that spins up worker units.
pub trait ThreadFactory: Send + Sync {
    /// Create a unit named after the factory's base name
    fn new_unit(&self, work: Work) -> ExecutionUnit;

    /// Create a unit named after `name`
    fn new_named_unit(&self, work: Work, name: &str) -> ExecutionUnit;

    /// Recompute an existing unit's name from the factory's base name and context
    fn rename(&self, unit: &dyn Named);
}

/// Stock [`ThreadFactory`].
///
/// `base_name`, `create_daemons` and numbering are fixed at construction. The
/// remaining settings may be changed at any time, but not concurrently with
/// calls that generate names.
pub struct DefaultThreadFactory {
    base_name: String,
    create_daemons: bool,
    policy: NamingPolicy,
    counter: SequenceCounter,
    use_lightweight: AtomicBool,
    sink: Option<Arc<dyn DiagnosticSink>>,
    standard: StandardUnitBuilder,
}

impl DefaultThreadFactory {
    /// Create a factory without numbering
    pub fn new(base_name: impl Into<String>, create_daemons: bool) -> Self {
        Self::with_numbering(base_name, create_daemons, false)
    }

    /// Create a factory, optionally numbering every name
    pub fn with_numbering(
        base_name: impl Into<String>,
        create_daemons: bool,
        use_numbering: bool,
    ) -> Self {
        Self {
            base_name: base_name.into(),
            create_daemons,
            policy: NamingPolicy::new(use_numbering),
            counter: SequenceCounter::new(),
            use_lightweight: AtomicBool::new(false),
            sink: None,
            standard: StandardUnitBuilder,
        }
    }

    /// Create a factory from a validated configuration.
    ///
    /// The explicit `include_*` flags are applied first, then the pattern.
    pub fn from_config(config: &FactoryConfig) -> Result<Self> {
        config.validate()?;

        let mut factory = Self::with_numbering(
            config.base_name.clone(),
            config.create_daemons,
            config.use_numbering,
        );
        factory
            .set_include_cluster_name(config.include_cluster_name)
            .set_include_local_address(config.include_local_address)
            .set_pattern(config.pattern.as_deref())
            .set_cluster_name(config.cluster_name.as_deref())
            .set_address(config.local_address.as_deref())
            .use_lightweight_units(config.use_lightweight_units);
        Ok(factory)
    }

    /// Set the inclusion flags from a pattern (`c` = cluster, `l` = address).
    /// `None` or `""` leaves both flags as they are.
    pub fn set_pattern(&mut self, pattern: Option<&str>) -> &mut Self {
        self.policy.apply_pattern(pattern);
        self
    }

    /// Include the cluster name in generated names
    pub fn set_include_cluster_name(&mut self, include: bool) -> &mut Self {
        self.policy.include_cluster_name = include;
        self
    }

    /// Include the local address in generated names
    pub fn set_include_local_address(&mut self, include: bool) -> &mut Self {
        self.policy.include_local_address = include;
        self
    }

    /// Default cluster name for calls that supply none
    pub fn set_cluster_name(&mut self, cluster_name: Option<&str>) -> &mut Self {
        self.policy.cluster_name = owned_non_empty(cluster_name);
        self
    }

    /// Default local address for calls that supply none
    pub fn set_address(&mut self, address: Option<&str>) -> &mut Self {
        self.policy.local_address = owned_non_empty(address);
        self
    }

    /// Try lightweight units on subsequent constructions
    pub fn use_lightweight_units(&mut self, enabled: bool) -> &mut Self {
        *self.use_lightweight.get_mut() = enabled;
        self
    }

    /// Install or remove the sink that hears about lightweight fallbacks
    pub fn set_diagnostic_sink(&mut self, sink: Option<Arc<dyn DiagnosticSink>>) -> &mut Self {
        self.sink = sink;
        self
    }

    /// Base name for units created without an explicit name
    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    /// Whether produced units are daemons
    pub fn creates_daemons(&self) -> bool {
        self.create_daemons
    }

    /// Whether names carry a sequence number
    pub fn uses_numbering(&self) -> bool {
        self.policy.use_numbering
    }

    /// Whether the cluster name is appended
    pub fn includes_cluster_name(&self) -> bool {
        self.policy.include_cluster_name
    }

    /// Whether the local address is appended
    pub fn includes_local_address(&self) -> bool {
        self.policy.include_local_address
    }

    /// Configured default cluster name
    pub fn cluster_name(&self) -> Option<&str> {
        self.policy.cluster_name.as_deref()
    }

    /// Configured default local address
    pub fn address(&self) -> Option<&str> {
        self.policy.local_address.as_deref()
    }

    /// Whether the next construction will try a lightweight unit
    pub fn uses_lightweight_units(&self) -> bool {
        self.use_lightweight.load(Ordering::Acquire)
    }

    /// Create a unit with explicit name, address and cluster overrides.
    ///
    /// A missing or empty `name` falls back to `"thread"`, not to the base name.
    pub fn new_unit_with_context(
        &self,
        work: Work,
        name: Option<&str>,
        address: Option<&str>,
        cluster_name: Option<&str>,
    ) -> ExecutionUnit {
        let context = self.policy.context(address, cluster_name);
        let unit_name = self.policy.new_unit_name(name, &self.counter, context);
        let unit = self.build_unit(unit_name, work);
        debug!(
            unit = %unit.name_cell(),
            kind = %unit.kind(),
            daemon = self.create_daemons,
            "constructed unit"
        );
        unit
    }

    /// Rename using an explicit base name (or the factory's base name) and the configured context
    pub fn rename_with_base(&self, base_name: Option<&str>, unit: &dyn Named) {
        self.rename_with_context(base_name, unit, None, None);
    }

    /// Rename with explicit base, address and cluster overrides.
    ///
    /// Leaves the unit untouched when no naming feature applies.
    pub fn rename_with_context(
        &self,
        base_name: Option<&str>,
        unit: &dyn Named,
        address: Option<&str>,
        cluster_name: Option<&str>,
    ) {
        let base = base_name
            .filter(|b| !b.is_empty())
            .unwrap_or(self.base_name.as_str());
        let context = self.policy.context(address, cluster_name);
        if let Some(name) = self.policy.rename_name(base, &self.counter, context) {
            debug!(from = %unit.name(), to = %name, "renaming unit");
            unit.set_name(name);
        }
    }

    /// Rename the unit running on the calling thread. Returns `false` outside any unit.
    pub fn rename_current_unit(&self, base_name: Option<&str>) -> bool {
        match current_unit() {
            Some(current) => {
                self.rename_with_base(base_name, &current);
                true
            }
            None => false,
        }
    }

    fn build_unit(&self, name: String, work: Work) -> ExecutionUnit {
        if !self.use_lightweight.load(Ordering::Acquire) {
            return self.standard.build_unit(name, self.create_daemons, work);
        }
        let Some(builder) = lightweight_builder() else {
            return self.standard.build_unit(name, self.create_daemons, work);
        };

        match builder.build(name.clone(), self.create_daemons, work) {
            Ok(unit) => unit,
            Err(rejected) => {
                // only the caller that flips the flag reports
                let disabled_now = self
                    .use_lightweight
                    .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
                    .is_ok();
                if disabled_now {
                    if let Some(sink) = &self.sink {
                        sink.report(
                            "failed creating lightweight unit; disabling lightweight units",
                            &rejected.error,
                        );
                    }
                }
                self.standard
                    .build_unit(name, self.create_daemons, rejected.work)
            }
        }
    }
}

impl ThreadFactory for DefaultThreadFactory {
    fn new_unit(&self, work: Work) -> ExecutionUnit {
        self.new_unit_with_context(work, Some(&self.base_name), None, None)
    }

    fn new_named_unit(&self, work: Work, name: &str) -> ExecutionUnit {
        self.new_unit_with_context(work, Some(name), None, None)
    }

    fn rename(&self, unit: &dyn Named) {
        self.rename_with_base(None, unit);
    }
}

impl fmt::Debug for DefaultThreadFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultThreadFactory")
            .field("base_name", &self.base_name)
            .field("create_daemons", &self.create_daemons)
            .field("policy", &self.policy)
            .field("counter", &self.counter.current())
            .field("use_lightweight", &self.uses_lightweight_units())
            .field("has_sink", &self.sink.is_some())
            .finish()
    }
}

fn owned_non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

#[cfg(test)]
#[path = "factory_tests.rs"]
mod tests;
