//! Name generation for execution units.
//!
//! A name is built from a base name, an optional sequence number, and optional
//! cluster and address details:
//!
//! ```text
//! WORKER                          plain
//! WORKER-5                        numbered
//! WORKER-5,ClusterA,10.0.0.1:7800 cluster and address ("cl" pattern)
//! WORKER-5,shared=ClusterA        shared transport shorthand
//! ```
//!
//! When neither cluster nor address inclusion is enabled but a cluster name is
//! known, the transport is assumed to be shared between several clusters and the
//! name carries `shared=<cluster>` instead.

use parking_lot::Mutex;

/// Base name used for new units when the caller supplies none.
pub const DEFAULT_BASE_NAME: &str = "thread";

/// Per-factory 16-bit sequence counter.
///
/// Wraps silently from `u16::MAX` back to `0`.
#[derive(Debug, Default)]
pub struct SequenceCounter {
    value: Mutex<u16>,
}

impl SequenceCounter {
    /// Create a counter starting at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a counter whose next value is `start + 1`
    pub fn starting_at(start: u16) -> Self {
        Self {
            value: Mutex::new(start),
        }
    }

    /// Increment and return the new value
    pub fn next(&self) -> u16 {
        let mut value = self.value.lock();
        *value = value.wrapping_add(1);
        *value
    }

    /// Last value handed out (0 if none yet)
    pub fn current(&self) -> u16 {
        *self.value.lock()
    }
}

/// Effective cluster name and address for one naming call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NamingContext<'a> {
    /// Cluster name, from the call or the factory default
    pub cluster_name: Option<&'a str>,
    /// Local address, from the call or the factory default
    pub address: Option<&'a str>,
}

impl<'a> NamingContext<'a> {
    /// Resolve call overrides against configured defaults. Empty overrides count as absent.
    pub fn resolve(
        cluster_override: Option<&'a str>,
        address_override: Option<&'a str>,
        default_cluster: Option<&'a str>,
        default_address: Option<&'a str>,
    ) -> Self {
        Self {
            cluster_name: non_empty(cluster_override).or(default_cluster),
            address: non_empty(address_override).or(default_address),
        }
    }
}

/// Naming switches and default context held by a factory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamingPolicy {
    /// Append `-<seq>` to every name
    pub use_numbering: bool,
    /// Append `,<cluster>` when a cluster name is known
    pub include_cluster_name: bool,
    /// Append `,<address>` when an address is known
    pub include_local_address: bool,
    /// Default cluster name
    pub cluster_name: Option<String>,
    /// Default local address
    pub local_address: Option<String>,
}

impl NamingPolicy {
    /// Create a policy with numbering switched on or off and nothing else enabled
    pub fn new(use_numbering: bool) -> Self {
        Self {
            use_numbering,
            ..Self::default()
        }
    }

    /// Derive both inclusion flags from a pattern: `c` for cluster, `l` for address.
    ///
    /// `None` and the empty string leave the flags untouched.
    pub fn apply_pattern(&mut self, pattern: Option<&str>) {
        if let Some(pattern) = non_empty(pattern) {
            self.include_cluster_name = pattern.contains('c');
            self.include_local_address = pattern.contains('l');
        }
    }

    /// Resolve the context for one call
    pub fn context<'a>(
        &'a self,
        address_override: Option<&'a str>,
        cluster_override: Option<&'a str>,
    ) -> NamingContext<'a> {
        NamingContext::resolve(
            cluster_override,
            address_override,
            self.cluster_name.as_deref(),
            self.local_address.as_deref(),
        )
    }

    /// Name for a brand-new unit. Always yields a name.
    pub fn new_unit_name(
        &self,
        base_name: Option<&str>,
        counter: &SequenceCounter,
        context: NamingContext<'_>,
    ) -> String {
        let base = non_empty(base_name).unwrap_or(DEFAULT_BASE_NAME);
        self.compose(base, counter, context).into_name()
    }

    /// Name for an existing unit.
    ///
    /// Returns `None` when no naming feature applies, so the unit keeps its current name.
    pub fn rename_name(
        &self,
        base_name: &str,
        counter: &SequenceCounter,
        context: NamingContext<'_>,
    ) -> Option<String> {
        match self.compose(base_name, counter, context) {
            Composed::Undecorated(_) => None,
            composed => Some(composed.into_name()),
        }
    }

    fn compose(&self, base: &str, counter: &SequenceCounter, context: NamingContext<'_>) -> Composed {
        let mut name = String::from(base);
        if self.use_numbering {
            let seq = counter.next();
            name.push('-');
            name.push_str(&seq.to_string());
        }

        if !self.include_cluster_name && !self.include_local_address {
            if let Some(cluster) = context.cluster_name {
                name.push_str(",shared=");
                name.push_str(cluster);
                return Composed::Decorated(name);
            }
        }

        if self.include_cluster_name {
            if let Some(cluster) = context.cluster_name {
                name.push(',');
                name.push_str(cluster);
            }
        }
        if self.include_local_address {
            if let Some(address) = context.address {
                name.push(',');
                name.push_str(address);
            }
        }

        if self.use_numbering || self.include_cluster_name || self.include_local_address {
            Composed::Decorated(name)
        } else {
            Composed::Undecorated(name)
        }
    }
}

/// Whether any naming feature contributed to a composed name.
enum Composed {
    Decorated(String),
    Undecorated(String),
}

impl Composed {
    fn into_name(self) -> String {
        match self {
            Self::Decorated(name) | Self::Undecorated(name) => name,
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(numbering: bool, pattern: &str) -> NamingPolicy {
        let mut policy = NamingPolicy::new(numbering);
        policy.apply_pattern(Some(pattern));
        policy
    }

    #[test]
    fn test_counter_starts_at_one() {
        let counter = SequenceCounter::new();
        assert_eq!(counter.current(), 0);
        assert_eq!(counter.next(), 1);
        assert_eq!(counter.next(), 2);
        assert_eq!(counter.current(), 2);
    }

    #[test]
    fn test_counter_wraps_silently() {
        let counter = SequenceCounter::starting_at(u16::MAX - 1);
        assert_eq!(counter.next(), u16::MAX);
        assert_eq!(counter.next(), 0);
        assert_eq!(counter.next(), 1);
    }

    #[test]
    fn test_numbered_names() {
        let policy = NamingPolicy::new(true);
        let counter = SequenceCounter::new();
        let ctx = policy.context(None, None);

        assert_eq!(policy.new_unit_name(Some("WORKER"), &counter, ctx), "WORKER-1");
        assert_eq!(policy.new_unit_name(Some("WORKER"), &counter, ctx), "WORKER-2");
    }

    #[test]
    fn test_missing_base_uses_literal_default() {
        let policy = NamingPolicy::new(false);
        let counter = SequenceCounter::new();
        let ctx = policy.context(None, None);

        assert_eq!(policy.new_unit_name(None, &counter, ctx), "thread");
        assert_eq!(policy.new_unit_name(Some(""), &counter, ctx), "thread");
    }

    #[test]
    fn test_cluster_and_address_order() {
        let mut policy = policy(true, "lc");
        policy.cluster_name = Some("MyCluster".into());
        policy.local_address = Some("192.168.1.5:63754".into());
        let counter = SequenceCounter::starting_at(4);

        let name = policy.new_unit_name(Some("THREAD"), &counter, policy.context(None, None));
        assert_eq!(name, "THREAD-5,MyCluster,192.168.1.5:63754");
    }

    #[test]
    fn test_include_cluster_only() {
        let mut policy = NamingPolicy::new(false);
        policy.include_cluster_name = true;
        policy.cluster_name = Some("ClusterA".into());
        let counter = SequenceCounter::new();

        let name = policy.new_unit_name(Some("WORKER"), &counter, policy.context(None, None));
        assert_eq!(name, "WORKER,ClusterA");
    }

    #[test]
    fn test_missing_values_are_skipped() {
        let policy = policy(false, "cl");
        let counter = SequenceCounter::new();

        let name = policy.new_unit_name(Some("WORKER"), &counter, policy.context(None, None));
        assert_eq!(name, "WORKER");
    }

    #[test]
    fn test_shared_transport_shorthand() {
        let mut policy = NamingPolicy::new(true);
        policy.cluster_name = Some("X".into());
        policy.local_address = Some("10.0.0.1:7800".into());
        let counter = SequenceCounter::new();

        let name = policy.new_unit_name(Some("Timer"), &counter, policy.context(None, None));
        assert_eq!(name, "Timer-1,shared=X");
    }

    #[test]
    fn test_overrides_take_precedence() {
        let mut policy = policy(false, "cl");
        policy.cluster_name = Some("Default".into());
        policy.local_address = Some("10.0.0.1:7800".into());
        let counter = SequenceCounter::new();

        let ctx = policy.context(Some("10.0.0.2:7900"), Some("Other"));
        assert_eq!(
            policy.new_unit_name(Some("OOB"), &counter, ctx),
            "OOB,Other,10.0.0.2:7900"
        );

        let ctx = policy.context(Some(""), None);
        assert_eq!(
            policy.new_unit_name(Some("OOB"), &counter, ctx),
            "OOB,Default,10.0.0.1:7800"
        );
    }

    #[test]
    fn test_rename_without_features_is_no_change() {
        let policy = NamingPolicy::new(false);
        let counter = SequenceCounter::new();

        assert_eq!(policy.rename_name("WORKER", &counter, policy.context(None, None)), None);
    }

    #[test]
    fn test_rename_shared_shorthand_fires() {
        let policy = NamingPolicy::new(false);
        let counter = SequenceCounter::new();
        let ctx = policy.context(None, Some("X"));

        assert_eq!(
            policy.rename_name("WORKER", &counter, ctx),
            Some("WORKER,shared=X".to_string())
        );
    }

    #[test]
    fn test_rename_with_numbering_consumes_sequence() {
        let policy = NamingPolicy::new(true);
        let counter = SequenceCounter::new();
        let ctx = policy.context(None, None);

        assert_eq!(policy.rename_name("W", &counter, ctx), Some("W-1".into()));
        assert_eq!(policy.new_unit_name(Some("W"), &counter, ctx), "W-2");
    }

    #[test]
    fn test_pattern_application() {
        let mut policy = NamingPolicy::new(false);
        policy.apply_pattern(Some("cl"));
        assert!(policy.include_cluster_name);
        assert!(policy.include_local_address);

        policy.apply_pattern(Some(""));
        policy.apply_pattern(None);
        assert!(policy.include_cluster_name);
        assert!(policy.include_local_address);

        policy.apply_pattern(Some("l"));
        assert!(!policy.include_cluster_name);
        assert!(policy.include_local_address);

        policy.apply_pattern(Some("xyz"));
        assert!(!policy.include_cluster_name);
        assert!(!policy.include_local_address);
    }
}
