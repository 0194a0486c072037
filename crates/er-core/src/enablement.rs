//! Enablement resolution for mountable services.
//!
//! The operator supplies one global "enable all" flag plus one flag per
//! service. A service is active when either its own flag or the global
//! flag is set; once the global flag is set, no service can be forced
//! off. Resolution happens exactly once, at startup, so every request
//! observes the same snapshot.

/// Resolves per-service enablement against the global override.
#[derive(Debug, Clone, Copy, Default)]
pub struct Enablement {
    enable_all: bool,
}

impl Enablement {
    pub fn new(enable_all: bool) -> Self {
        Self { enable_all }
    }

    /// Whether the global override is set.
    pub fn enable_all(&self) -> bool {
        self.enable_all
    }

    /// Resolve one service's flag: `enable_all OR service_flag`.
    pub fn active(&self, service_flag: bool) -> bool {
        self.enable_all || service_flag
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(false, false, false)]
    #[case(false, true, true)]
    #[case(true, false, true)]
    #[case(true, true, true)]
    fn resolution_truth_table(
        #[case] enable_all: bool,
        #[case] service_flag: bool,
        #[case] expected: bool,
    ) {
        assert_eq!(Enablement::new(enable_all).active(service_flag), expected);
    }

    #[test]
    fn enable_all_cannot_be_overridden() {
        let enablement = Enablement::new(true);
        assert!(enablement.active(false));
    }

    #[test]
    fn default_disables_everything() {
        let enablement = Enablement::default();
        assert!(!enablement.active(false));
    }
}
