//! # Thread-Factory-RS: Thread Naming for Group Communication Runtimes
//!
//! A naming and construction policy for the worker threads of a group
//! communication stack. Every unit it produces carries a name that says what it
//! does and, when configured, which cluster and which member it belongs to:
//!
//! - **Numbering**: `Incoming-1`, `Incoming-2`, ... from a per-factory counter
//! - **Cluster/address detail**: `Incoming-5,MyCluster,192.168.1.5:63754`
//! - **Shared transports**: `Timer-3,shared=MyCluster`
//! - **Lightweight units**: optional placement on the host tokio runtime, with a
//!   permanent fallback to OS threads if that ever fails
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │              ThreadFactory / DefaultThreadFactory     │
//! ├──────────────────┬─────────────────┬─────────────────┤
//! │  Naming          │  Builders       │  Units          │
//! │ • NamingPolicy   │ • Standard      │ • ExecutionUnit │
//! │ • SequenceCounter│ • Lightweight   │ • UnitHandle    │
//! │ • NamingContext  │ • probe (once)  │ • UnitName      │
//! ├──────────────────┴─────────────────┴─────────────────┤
//! │        Core: FactoryConfig (YAML) · errors            │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use thread_factory_rs::{DefaultThreadFactory, ThreadFactory};
//!
//! let mut factory = DefaultThreadFactory::with_numbering("Timer", true, true);
//! factory.set_cluster_name(Some("MyCluster"));
//!
//! let unit = factory.new_unit(Box::new(|| { /* periodic work */ }));
//! assert_eq!(unit.name_cell().get(), "Timer-1,shared=MyCluster");
//! let handle = unit.start()?;
//! handle.join()?;
//! # Ok::<(), thread_factory_rs::ThreadFactoryError>(())
//! ```

#![warn(missing_docs)]
#![warn(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Configuration and error handling
pub mod core {
    //! Configuration and error types.

    pub mod config;
    pub mod errors;
}

// Naming policy, builders and units
pub mod factory;

// Re-export primary types for convenience
pub use crate::core::config::FactoryConfig;
pub use crate::core::errors::{Result, ThreadFactoryError};
pub use factory::{
    current_unit, DefaultThreadFactory, DiagnosticSink, ExecutionUnit, Named, ThreadFactory,
    TracingSink, UnitHandle, UnitKind, UnitName, Work,
};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build-time feature detection
pub mod features {
    //! Build-time feature detection.

    /// Check if lightweight units were compiled in
    pub const fn has_lightweight() -> bool {
        cfg!(feature = "lightweight")
    }
}
