//! Process-wide configuration holder.
//!
//! Assessments take an `Arc<ScoringConfig>` snapshot and keep it for their
//! whole run. A reload swaps in a complete new snapshot; readers holding the
//! old one are unaffected.

use std::sync::Arc;

use arc_swap::ArcSwap;

use super::ScoringConfig;

#[derive(Debug)]
pub struct ConfigHandle {
    current: ArcSwap<ScoringConfig>,
}

impl ConfigHandle {
    pub fn new(config: ScoringConfig) -> Self {
        Self {
            current: ArcSwap::from_pointee(config),
        }
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> Arc<ScoringConfig> {
        self.current.load_full()
    }

    /// Replace the configuration, returning the previous snapshot.
    pub fn reload(&self, config: ScoringConfig) -> Arc<ScoringConfig> {
        tracing::info!("scoring configuration reloaded");
        self.current.swap(Arc::new(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RawConfig;
    use crate::domain::Scope;

    #[test]
    fn reload_does_not_touch_existing_snapshots() {
        let handle = ConfigHandle::new(ScoringConfig::default_methodology().unwrap());
        let before = handle.snapshot();

        let mut raw = RawConfig::default_methodology();
        raw.neutral_weight = 2.0;
        raw.thresholds.client.medium_high = 12.0;
        let previous = handle.reload(ScoringConfig::try_from(raw).unwrap());

        assert!(Arc::ptr_eq(&before, &previous));
        assert_eq!(before.neutral_weight(), 1.0);
        assert_eq!(before.thresholds(Scope::Client).medium_high, 9.0);

        let after = handle.snapshot();
        assert_eq!(after.neutral_weight(), 2.0);
        assert_eq!(after.thresholds(Scope::Client).medium_high, 12.0);
    }
}
