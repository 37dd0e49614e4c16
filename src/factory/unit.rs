//! Execution units produced by a thread factory.
//!
//! An [`ExecutionUnit`] is constructed but not yet running; [`ExecutionUnit::start`]
//! launches it and returns a [`UnitHandle`]. Both share a [`UnitName`] cell with the
//! running work, so renaming stays visible through [`current_unit`] after start.
//! The OS thread name is fixed when the thread starts.

use std::cell::RefCell;
use std::fmt;
use std::sync::Arc;
use std::thread;

use parking_lot::RwLock;
use tracing::debug;

use crate::core::errors::{Result, ThreadFactoryError};

/// Work wrapped by a unit.
pub type Work = Box<dyn FnOnce() + Send + 'static>;

/// How a unit is scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitKind {
    /// Dedicated OS thread
    Standard,
    /// Task on the host runtime's blocking pool
    Lightweight,
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard => f.write_str("standard"),
            Self::Lightweight => f.write_str("lightweight"),
        }
    }
}

/// Shared, renameable name of a unit.
#[derive(Clone)]
pub struct UnitName {
    inner: Arc<RwLock<String>>,
}

impl UnitName {
    /// Create a new name cell
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(name.into())),
        }
    }

    /// Current name
    pub fn get(&self) -> String {
        self.inner.read().clone()
    }

    /// Replace the name
    pub fn set(&self, name: impl Into<String>) {
        *self.inner.write() = name.into();
    }

    /// Whether two cells refer to the same unit
    pub fn same_unit(&self, other: &UnitName) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for UnitName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("UnitName").field(&*self.inner.read()).finish()
    }
}

impl fmt::Display for UnitName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inner.read())
    }
}

/// Anything carrying a unit name that a factory can rename.
pub trait Named {
    /// Current name
    fn name(&self) -> String;

    /// Replace the name
    fn set_name(&self, name: String);
}

impl Named for UnitName {
    fn name(&self) -> String {
        self.get()
    }

    fn set_name(&self, name: String) {
        self.set(name);
    }
}

thread_local! {
    static CURRENT_UNIT: RefCell<Option<UnitName>> = const { RefCell::new(None) };
}

/// Name cell of the unit running on the current thread, if any.
pub fn current_unit() -> Option<UnitName> {
    CURRENT_UNIT.with(|current| current.borrow().clone())
}

/// Installs a unit name for the current thread; restores the previous one on drop.
struct CurrentUnitGuard {
    previous: Option<UnitName>,
}

impl CurrentUnitGuard {
    fn enter(name: UnitName) -> Self {
        let previous = CURRENT_UNIT.with(|current| current.borrow_mut().replace(name));
        Self { previous }
    }
}

impl Drop for CurrentUnitGuard {
    fn drop(&mut self) {
        let previous = self.previous.take();
        CURRENT_UNIT.with(|current| *current.borrow_mut() = previous);
    }
}

/// Where a unit runs once started.
pub(crate) enum Launcher {
    Standard,
    #[cfg(feature = "lightweight")]
    Lightweight(tokio::runtime::Handle),
}

impl Launcher {
    fn kind(&self) -> UnitKind {
        match self {
            Self::Standard => UnitKind::Standard,
            #[cfg(feature = "lightweight")]
            Self::Lightweight(_) => UnitKind::Lightweight,
        }
    }
}

/// A named unit of work that has not been started yet.
pub struct ExecutionUnit {
    name: UnitName,
    daemon: bool,
    work: Work,
    launcher: Launcher,
}

impl ExecutionUnit {
    pub(crate) fn new(name: String, daemon: bool, work: Work, launcher: Launcher) -> Self {
        Self {
            name: UnitName::new(name),
            daemon,
            work,
            launcher,
        }
    }

    /// How this unit will be scheduled
    pub fn kind(&self) -> UnitKind {
        self.launcher.kind()
    }

    /// Whether this unit is a daemon
    pub fn is_daemon(&self) -> bool {
        self.daemon
    }

    /// Shared name cell of this unit
    pub fn name_cell(&self) -> UnitName {
        self.name.clone()
    }

    /// Launch the work.
    ///
    /// Standard units get an OS thread named after the unit's current name.
    pub fn start(self) -> Result<UnitHandle> {
        let Self {
            name,
            daemon,
            work,
            launcher,
        } = self;
        let kind = launcher.kind();
        let cell = name.clone();
        let body = move || {
            let _current = CurrentUnitGuard::enter(cell);
            work();
        };

        let running = match launcher {
            Launcher::Standard => {
                let handle = thread::Builder::new()
                    .name(os_thread_name(&name.get()))
                    .spawn(body)
                    .map_err(|e| ThreadFactoryError::spawn(name.get(), e))?;
                Running::Standard(handle)
            }
            #[cfg(feature = "lightweight")]
            Launcher::Lightweight(runtime) => Running::Lightweight(runtime.spawn_blocking(body)),
        };

        debug!(unit = %name, %kind, daemon, "unit started");
        Ok(UnitHandle {
            name,
            daemon,
            kind,
            running,
        })
    }
}

impl Named for ExecutionUnit {
    fn name(&self) -> String {
        self.name.get()
    }

    fn set_name(&self, name: String) {
        self.name.set(name);
    }
}

impl fmt::Debug for ExecutionUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionUnit")
            .field("name", &self.name)
            .field("kind", &self.kind())
            .field("daemon", &self.daemon)
            .finish_non_exhaustive()
    }
}

enum Running {
    Standard(thread::JoinHandle<()>),
    #[cfg(feature = "lightweight")]
    Lightweight(tokio::task::JoinHandle<()>),
}

/// A started unit.
///
/// Dropping the handle detaches the unit, whatever its daemon flag. Callers that
/// need a non-daemon unit to finish before they exit must [`join`](Self::join) it.
pub struct UnitHandle {
    name: UnitName,
    daemon: bool,
    kind: UnitKind,
    running: Running,
}

impl UnitHandle {
    /// How this unit is scheduled
    pub fn kind(&self) -> UnitKind {
        self.kind
    }

    /// Whether this unit is a daemon
    pub fn is_daemon(&self) -> bool {
        self.daemon
    }

    /// Shared name cell of this unit
    pub fn name_cell(&self) -> UnitName {
        self.name.clone()
    }

    /// Whether the work has finished
    pub fn is_finished(&self) -> bool {
        match &self.running {
            Running::Standard(handle) => handle.is_finished(),
            #[cfg(feature = "lightweight")]
            Running::Lightweight(task) => task.is_finished(),
        }
    }

    /// Wait for the work to finish.
    pub fn join(self) -> Result<()> {
        let Self { name, running, .. } = self;
        match running {
            Running::Standard(handle) => handle
                .join()
                .map_err(|_| ThreadFactoryError::panicked(name.get())),
            #[cfg(feature = "lightweight")]
            Running::Lightweight(task) => match futures::executor::block_on(task) {
                Ok(()) => Ok(()),
                Err(err) if err.is_panic() => Err(ThreadFactoryError::panicked(name.get())),
                Err(err) => Err(ThreadFactoryError::runtime_unavailable(format!(
                    "unit '{name}' was cancelled: {err}"
                ))),
            },
        }
    }
}

impl Named for UnitHandle {
    fn name(&self) -> String {
        self.name.get()
    }

    fn set_name(&self, name: String) {
        self.name.set(name);
    }
}

impl fmt::Debug for UnitHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnitHandle")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("daemon", &self.daemon)
            .field("finished", &self.is_finished())
            .finish()
    }
}

/// OS thread names are C strings.
fn os_thread_name(name: &str) -> String {
    name.replace('\0', "")
}
