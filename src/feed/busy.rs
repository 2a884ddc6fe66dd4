// SPDX-License-Identifier: MPL-2.0

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Whether a remote call is in flight. Shared between the controller,
/// which holds it for the duration of each call, and the scroll trigger,
/// which must not fire a load while one is running.
#[derive(Debug, Clone, Default)]
pub struct BusyIndicator {
    busy: Arc<AtomicBool>,
}

impl BusyIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Mark busy until the returned guard is dropped.
    pub fn hold(&self) -> BusyGuard {
        self.busy.store(true, Ordering::Release);
        BusyGuard {
            busy: Arc::clone(&self.busy),
        }
    }
}

/// Clears the busy flag when dropped, including on early return or when
/// the owning future is cancelled. Only the shared flag is released this
/// way; the on-screen indicator is lowered by the controller once the call
/// returns, so a cancelled call leaves it up until the next one completes.
#[derive(Debug)]
pub struct BusyGuard {
    busy: Arc<AtomicBool>,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_releases_on_drop() {
        let indicator = BusyIndicator::new();
        assert!(!indicator.is_busy());
        {
            let _guard = indicator.hold();
            assert!(indicator.is_busy());
            assert!(indicator.clone().is_busy());
        }
        assert!(!indicator.is_busy());
    }

    #[test]
    fn test_guard_releases_on_early_return() {
        fn fails(indicator: &BusyIndicator) -> Result<(), ()> {
            let _guard = indicator.hold();
            Err(())?;
            Ok(())
        }

        let indicator = BusyIndicator::new();
        assert!(fails(&indicator).is_err());
        assert!(!indicator.is_busy());
    }
}
