//! The single loading flag shared by the state containers.

use tokio::sync::watch;

/// A view with a loading flag
pub(crate) trait Loading {
    fn loading_mut(&mut self) -> &mut bool;
}

/// Holds a view's loading flag while a fetch runs
///
/// The flag is cleared when the guard is released or dropped, so a fetch
/// that is cancelled mid-flight (timeout, aborted task) does not leave the
/// screen locked in the loading state.
pub(crate) struct LoadingGuard<'a, V: Loading> {
    view: &'a watch::Sender<V>,
    armed: bool,
}

impl<'a, V: Loading> LoadingGuard<'a, V> {
    /// Set the flag and run `prepare` in the same update
    ///
    /// Returns `None` without touching the view if a load is already running.
    pub(crate) fn acquire(view: &'a watch::Sender<V>, prepare: impl FnOnce(&mut V)) -> Option<Self> {
        let acquired = view.send_if_modified(|v| {
            if *v.loading_mut() {
                return false;
            }
            *v.loading_mut() = true;
            prepare(v);
            true
        });
        if acquired {
            Some(Self { view, armed: true })
        } else {
            None
        }
    }

    /// Clear the flag and apply `finish` in one update
    pub(crate) fn release_with(mut self, finish: impl FnOnce(&mut V)) {
        self.armed = false;
        self.view.send_modify(|v| {
            *v.loading_mut() = false;
            finish(v);
        });
    }
}

impl<V: Loading> Drop for LoadingGuard<'_, V> {
    fn drop(&mut self) {
        if self.armed {
            self.view.send_modify(|v| *v.loading_mut() = false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct View {
        loading: bool,
        loads: usize,
    }

    impl Loading for View {
        fn loading_mut(&mut self) -> &mut bool {
            &mut self.loading
        }
    }

    #[test]
    fn test_second_acquire_is_refused() {
        let (view, _) = watch::channel(View::default());
        let guard = LoadingGuard::acquire(&view, |v| v.loads += 1);
        assert!(guard.is_some());
        assert!(LoadingGuard::acquire(&view, |v| v.loads += 1).is_none());
        assert_eq!(view.borrow().loads, 1);
    }

    #[test]
    fn test_drop_clears_flag() {
        let (view, _) = watch::channel(View::default());
        let guard = LoadingGuard::acquire(&view, |_| {});
        assert!(view.borrow().loading);
        drop(guard);
        assert!(!view.borrow().loading);
        assert!(LoadingGuard::acquire(&view, |_| {}).is_some());
    }

    #[test]
    fn test_release_with() {
        let (view, _) = watch::channel(View::default());
        let guard = LoadingGuard::acquire(&view, |_| {}).unwrap();
        guard.release_with(|v| v.loads = 7);
        let v = view.borrow();
        assert!(!v.loading);
        assert_eq!(v.loads, 7);
    }
}
