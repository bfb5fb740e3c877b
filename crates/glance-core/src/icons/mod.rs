//! Trend icon resources and the slot that owns the displayed one
//!
//! Acquiring an icon (loading or rasterizing a bitmap) is treated as
//! expensive, and every acquired icon must be handed back exactly once. The
//! [`TrendIndicator`] is the single owner of the displayed icon and the only
//! place that acquires or releases one.

mod raster;

pub use raster::{RasterIconStore, TREND_ICON_SIZE_PX, draw_arrow};

use log::{debug, warn};

use crate::metrics::{TrendArrow, TrendCode};

/// Capability that produces and reclaims trend icon resources.
pub trait IconStore {
    /// Handle to an acquired icon
    type Icon;

    /// Acquire the icon for `arrow`, or `None` if it cannot be produced.
    fn acquire(&mut self, arrow: TrendArrow) -> Option<Self::Icon>;

    /// Give an icon back. Called exactly once per acquired icon.
    fn release(&mut self, icon: Self::Icon);
}

/// Debounced owner of the currently displayed trend icon.
///
/// Repeating the previous trend code is a no-op. A changed code releases the
/// held icon before acquiring the next one; a code without an arrow releases
/// it and hides the indicator.
pub struct TrendIndicator<S: IconStore> {
    store: S,
    last_code: Option<TrendCode>,
    arrow: Option<TrendArrow>,
    icon: Option<S::Icon>,
    dirty: bool,
}

impl<S: IconStore> TrendIndicator<S> {
    /// Create an empty, hidden indicator backed by `store`.
    pub fn new(store: S) -> Self {
        Self {
            store,
            last_code: None,
            arrow: None,
            icon: None,
            dirty: true,
        }
    }

    /// Apply a newly received trend code.
    ///
    /// Returns `true` if the displayed icon changed.
    pub fn set_code(&mut self, code: TrendCode) -> bool {
        if self.last_code == Some(code) {
            return false;
        }
        self.last_code = Some(code);

        let arrow = TrendArrow::from_code(code);
        self.replace(arrow);
        true
    }

    /// Release the held icon and acquire the one for `arrow`.
    fn replace(&mut self, arrow: Option<TrendArrow>) {
        if let Some(old) = self.icon.take() {
            self.store.release(old);
        }

        self.arrow = arrow;
        self.dirty = true;

        let Some(arrow) = arrow else {
            debug!("Trend icon hidden");
            return;
        };

        self.icon = self.store.acquire(arrow);
        if self.icon.is_none() {
            warn!("Trend icon {} unavailable, hiding indicator", arrow.label());
            self.arrow = None;
        } else {
            debug!("Trend icon set to {}", arrow.label());
        }
    }

    /// Release any held icon and forget the last code.
    pub fn clear(&mut self) {
        self.replace(None);
        self.last_code = None;
    }

    /// Arrow currently shown, `None` when hidden.
    pub fn arrow(&self) -> Option<TrendArrow> {
        self.arrow
    }

    /// Icon currently shown, `None` when hidden.
    pub fn icon(&self) -> Option<&S::Icon> {
        self.icon.as_ref()
    }

    /// Last applied trend code
    pub fn last_code(&self) -> Option<TrendCode> {
        self.last_code
    }

    pub fn is_hidden(&self) -> bool {
        self.icon.is_none()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }
}

impl<S: IconStore> Drop for TrendIndicator<S> {
    fn drop(&mut self) {
        if let Some(icon) = self.icon.take() {
            self.store.release(icon);
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use alloc::vec::Vec;

    /// Store that hands out numbered tokens and records every call.
    #[derive(Default)]
    pub(crate) struct CountingStore {
        pub(crate) acquired: Vec<TrendArrow>,
        pub(crate) released: Vec<u32>,
        pub(crate) next_token: u32,
        pub(crate) fail: bool,
    }

    impl CountingStore {
        pub(crate) fn live(&self) -> usize {
            self.acquired.len() - self.released.len()
        }
    }

    impl IconStore for CountingStore {
        type Icon = u32;

        fn acquire(&mut self, arrow: TrendArrow) -> Option<u32> {
            if self.fail {
                return None;
            }
            self.acquired.push(arrow);
            self.next_token += 1;
            Some(self.next_token)
        }

        fn release(&mut self, icon: u32) {
            self.released.push(icon);
        }
    }

    #[test]
    fn test_repeated_code_is_debounced() {
        let mut indicator = TrendIndicator::new(CountingStore::default());

        assert!(indicator.set_code(2));
        assert!(!indicator.set_code(2));
        assert!(!indicator.set_code(2));

        assert_eq!(indicator.store().acquired.len(), 1);
        assert!(indicator.store().released.is_empty());
        assert_eq!(indicator.arrow(), Some(TrendArrow::SingleUp));
    }

    #[test]
    fn test_changed_code_releases_before_acquiring() {
        let mut indicator = TrendIndicator::new(CountingStore::default());
        indicator.set_code(4);
        indicator.set_code(6);

        let store = indicator.store();
        assert_eq!(store.acquired, [TrendArrow::Flat, TrendArrow::SingleDown]);
        assert_eq!(store.released, [1]);
        assert_eq!(store.live(), 1);
        assert_eq!(indicator.icon(), Some(&2));
    }

    #[test]
    fn test_code_without_icon_releases_immediately() {
        let mut indicator = TrendIndicator::new(CountingStore::default());
        indicator.set_code(3);
        indicator.set_code(0);

        assert!(indicator.is_hidden());
        assert_eq!(indicator.store().live(), 0);
        assert_eq!(indicator.arrow(), None);
    }

    #[test]
    fn test_first_code_without_icon_acquires_nothing() {
        let mut indicator = TrendIndicator::new(CountingStore::default());
        assert!(indicator.set_code(9));
        assert!(indicator.is_hidden());
        assert!(indicator.store().acquired.is_empty());
    }

    #[test]
    fn test_out_of_contract_code_hides_icon() {
        let mut indicator = TrendIndicator::new(CountingStore::default());
        indicator.set_code(1);
        indicator.set_code(42);

        assert!(indicator.is_hidden());
        assert_eq!(indicator.store().live(), 0);
        assert_eq!(indicator.last_code(), Some(42));
    }

    #[test]
    fn test_failed_acquire_hides_indicator() {
        let store = CountingStore {
            fail: true,
            ..Default::default()
        };
        let mut indicator = TrendIndicator::new(store);
        indicator.set_code(5);

        assert!(indicator.is_hidden());
        assert_eq!(indicator.arrow(), None);
    }

    #[test]
    fn test_clear_releases_and_allows_same_code_again() {
        let mut indicator = TrendIndicator::new(CountingStore::default());
        indicator.set_code(7);
        indicator.clear();
        assert_eq!(indicator.store().live(), 0);

        assert!(indicator.set_code(7));
        assert_eq!(indicator.store().acquired.len(), 2);
    }
}
