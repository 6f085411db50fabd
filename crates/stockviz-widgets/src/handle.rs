// File: crates/stockviz-widgets/src/handle.rs
// Summary: Live chart handle and its scoped disposer.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::Result;
use stockviz_core::Artifact;
use tracing::debug;

use crate::document::{Document, Subscription};
use crate::renderer::{Family, Visual};
use crate::tooltip::Tooltip;

pub type SharedVisual = Arc<Mutex<Box<dyn Visual>>>;

pub(crate) fn lock_visual(visual: &SharedVisual) -> MutexGuard<'_, Box<dyn Visual>> {
    visual.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Releases everything a mount registered: pointer listener, resize observer, tooltip.
/// Runs at most once, on the first `dispose()` or on drop.
pub struct Disposer {
    doc: Document,
    pointer: Subscription,
    observer: Subscription,
    tooltip: Tooltip,
    disposed: AtomicBool,
}

impl Disposer {
    pub fn new(doc: Document, pointer: Subscription, observer: Subscription, tooltip: Tooltip) -> Self {
        Self { doc, pointer, observer, tooltip, disposed: AtomicBool::new(false) }
    }

    /// `true` if this call released the resources.
    pub fn dispose(&self) -> bool {
        if self.disposed.swap(true, Ordering::AcqRel) {
            return false;
        }
        self.doc.remove_pointer_listener(self.pointer);
        self.doc.disconnect(self.observer);
        self.tooltip.remove();
        true
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }
}

impl Drop for Disposer {
    fn drop(&mut self) {
        self.dispose();
    }
}

pub struct ChartHandle {
    container: String,
    family: Family,
    series: Vec<String>,
    visual: SharedVisual,
    disposer: Disposer,
}

impl std::fmt::Debug for ChartHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChartHandle")
            .field("container", &self.container)
            .field("family", &self.family)
            .field("series", &self.series)
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

impl ChartHandle {
    pub(crate) fn new(container: impl Into<String>, visual: SharedVisual, disposer: Disposer) -> Self {
        let (family, series) = {
            let v = lock_visual(&visual);
            (v.family(), v.series_ids())
        };
        Self { container: container.into(), family, series, visual, disposer }
    }

    pub fn container(&self) -> &str {
        &self.container
    }

    pub fn family(&self) -> Family {
        self.family
    }

    pub fn series(&self) -> &[String] {
        &self.series
    }

    pub fn visual(&self) -> SharedVisual {
        self.visual.clone()
    }

    pub fn point_count(&self) -> usize {
        lock_visual(&self.visual).point_count()
    }

    pub fn size(&self) -> (u32, u32) {
        lock_visual(&self.visual).size()
    }

    pub fn render(&self) -> Result<Artifact> {
        lock_visual(&self.visual).render()
    }

    /// Unregister listeners and remove the tooltip. Later calls do nothing and return `false`.
    pub fn cleanup(&self) -> bool {
        let released = self.disposer.dispose();
        if released {
            debug!(container = %self.container, family = self.family.name(), "chart disposed");
        }
        released
    }

    pub fn is_disposed(&self) -> bool {
        self.disposer.is_disposed()
    }
}
