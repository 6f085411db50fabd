// File: crates/stockviz-widgets/src/widget.rs
// Summary: Chart widgets with control buttons, explicit state and generation-tagged reloads.
// Notes:
// - Each reload takes the next generation number before it awaits the data source.
//   Under `ReloadPolicy::LatestWins` a response is mounted only if no newer reload
//   started in the meantime.
// - The handle slot lock is held from the staleness check through the mount, and
//   never across an await.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use stockviz_client::{DataSource, StockQuery};
use tracing::{debug, error, warn};

use crate::document::{ClickCallback, Content, Document, Element, Subscription};
use crate::handle::ChartHandle;
use crate::loader::{fetch_chart, present, today_utc, ChartType, LoadKind, TimeRange};
use crate::options::ChartOptions;
use crate::placeholder;
use crate::styles::add_chart_styles;

pub const ACTIVE: &str = "active";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    Stock,
    Volume,
    Combined,
    Heatmap,
    Pie,
}

impl WidgetKind {
    pub fn default_height(&self) -> u32 {
        match self {
            WidgetKind::Volume => 300,
            WidgetKind::Combined => 500,
            WidgetKind::Stock | WidgetKind::Heatmap | WidgetKind::Pie => 400,
        }
    }

    pub fn has_type_controls(&self) -> bool {
        *self == WidgetKind::Stock
    }

    pub fn has_range_controls(&self) -> bool {
        matches!(self, WidgetKind::Stock | WidgetKind::Volume | WidgetKind::Combined)
    }

    fn load_kind(&self, chart_type: ChartType) -> LoadKind {
        match self {
            WidgetKind::Stock => LoadKind::Stock(chart_type),
            WidgetKind::Volume => LoadKind::Volume,
            WidgetKind::Combined => LoadKind::Combined,
            WidgetKind::Heatmap => LoadKind::MonthlyReturns,
            WidgetKind::Pie => LoadKind::Shareholders,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WidgetState {
    pub symbol: String,
    pub chart_type: ChartType,
    pub range: TimeRange,
}

impl WidgetState {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self { symbol: symbol.into(), chart_type: ChartType::default(), range: TimeRange::default() }
    }
}

/// What happens when reloads overlap.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReloadPolicy {
    /// Responses of superseded reloads are dropped.
    #[default]
    LatestWins,
    /// Every response is mounted as it arrives; the last to resolve wins.
    Unordered,
}

#[derive(Clone, Debug, Default)]
pub struct WidgetOptions {
    pub chart: ChartOptions,
    /// Chart element height; the kind's default when unset.
    pub height: Option<u32>,
    pub policy: ReloadPolicy,
}

struct Inner {
    doc: Document,
    source: Arc<dyn DataSource>,
    container: String,
    chart_id: String,
    kind: WidgetKind,
    options: WidgetOptions,
    state: Mutex<WidgetState>,
    handle: Mutex<Option<ChartHandle>>,
    generation: AtomicU64,
    subscriptions: Mutex<Vec<Subscription>>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub fn controls_id(container: &str) -> String {
    format!("{container}-controls")
}

pub fn chart_id(container: &str) -> String {
    format!("{container}-chart")
}

pub fn type_button_id(container: &str, chart_type: ChartType) -> String {
    format!("{container}-type-{}", chart_type.key())
}

pub fn range_button_id(container: &str, range: TimeRange) -> String {
    format!("{container}-range-{}", range.key())
}

#[derive(Clone)]
pub struct ChartWidget {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for ChartWidget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChartWidget")
            .field("container", &self.inner.container)
            .field("kind", &self.inner.kind)
            .field("state", &self.state())
            .field("generation", &self.generation())
            .finish()
    }
}

impl ChartWidget {
    /// Build controls and the chart element inside `container`, then load the first chart.
    /// `None` (logged) when the container does not exist.
    pub async fn init(
        doc: &Document,
        source: Arc<dyn DataSource>,
        container: &str,
        symbol: &str,
        kind: WidgetKind,
        options: WidgetOptions,
    ) -> Option<ChartWidget> {
        let Some((width, _)) = doc.client_size(container) else {
            error!(container, "widget container not found");
            return None;
        };
        add_chart_styles(doc);

        let state = WidgetState::new(symbol);
        let height = options.height.unwrap_or(kind.default_height());
        let widget = ChartWidget {
            inner: Arc::new(Inner {
                doc: doc.clone(),
                source,
                container: container.to_string(),
                chart_id: chart_id(container),
                kind,
                options,
                state: Mutex::new(state.clone()),
                handle: Mutex::new(None),
                generation: AtomicU64::new(0),
                subscriptions: Mutex::new(Vec::new()),
            }),
        };
        widget.build_controls(&state);
        let mut chart = Element::new(widget.inner.chart_id.clone(), width, height);
        chart.style.insert("height".into(), format!("{height}px"));
        doc.append_child(container, chart);
        widget.follow_container_width();

        widget.reload().await;
        Some(widget)
    }

    fn build_controls(&self, state: &WidgetState) {
        let inner = &self.inner;
        if !inner.kind.has_type_controls() && !inner.kind.has_range_controls() {
            return;
        }
        let doc = &inner.doc;
        let strings = inner.options.chart.locale().strings;
        let controls = controls_id(&inner.container);
        doc.append_child(&inner.container, Element::new(controls.clone(), 0, 0).with_class("chart-controls"));

        let mut subs = Vec::new();
        if inner.kind.has_type_controls() {
            let group = format!("{controls}-type");
            doc.append_child(&controls, Element::new(group.clone(), 0, 0).with_class("btn-group chart-type-controls"));
            for t in ChartType::ALL {
                let id = type_button_id(&inner.container, t);
                let mut class = "btn btn-sm btn-outline-primary chart-type-btn".to_string();
                if t == state.chart_type {
                    class.push_str(" active");
                }
                let mut button = Element::new(id.clone(), 0, 0).with_class(class);
                button.attrs.insert("data-type".into(), t.key().into());
                button.content = Content::Html(t.label(&strings).into());
                doc.append_child(&group, button);
                let weak = Arc::downgrade(inner);
                let on_click: ClickCallback = Arc::new(move || {
                    spawn_on_click(&weak, move |w| async move {
                        w.select_chart_type(t).await;
                    })
                });
                subs.push(doc.add_click_listener(&id, on_click));
            }
        }
        if inner.kind.has_range_controls() {
            let group = format!("{controls}-range");
            doc.append_child(&controls, Element::new(group.clone(), 0, 0).with_class("btn-group time-range-controls"));
            for r in TimeRange::CONTROLS {
                let id = range_button_id(&inner.container, r);
                let mut class = "btn btn-sm btn-outline-secondary time-range-btn".to_string();
                if r == state.range {
                    class.push_str(" active");
                }
                let mut button = Element::new(id.clone(), 0, 0).with_class(class);
                button.attrs.insert("data-range".into(), r.key().into());
                button.content = Content::Html(r.label(&strings).into());
                doc.append_child(&group, button);
                let weak = Arc::downgrade(inner);
                let on_click: ClickCallback = Arc::new(move || {
                    spawn_on_click(&weak, move |w| async move {
                        w.select_range(r).await;
                    })
                });
                subs.push(doc.add_click_listener(&id, on_click));
            }
        }
        lock(&inner.subscriptions).extend(subs);
    }

    /// Keep the chart element as wide as the container.
    fn follow_container_width(&self) {
        let weak = Arc::downgrade(&self.inner);
        let sub = self.inner.doc.observe_resize(
            &self.inner.container,
            Arc::new(move |width, _| {
                if let Some(inner) = weak.upgrade() {
                    let height = inner.doc.client_size(&inner.chart_id).map(|(_, h)| h).unwrap_or(0);
                    inner.doc.resize(&inner.chart_id, width, height);
                }
            }),
        );
        lock(&self.inner.subscriptions).push(sub);
    }

    pub fn container(&self) -> &str {
        &self.inner.container
    }

    pub fn chart_id(&self) -> &str {
        &self.inner.chart_id
    }

    pub fn kind(&self) -> WidgetKind {
        self.inner.kind
    }

    pub fn policy(&self) -> ReloadPolicy {
        self.inner.options.policy
    }

    pub fn state(&self) -> WidgetState {
        lock(&self.inner.state).clone()
    }

    /// Number of reloads started so far.
    pub fn generation(&self) -> u64 {
        self.inner.generation.load(Ordering::SeqCst)
    }

    pub fn has_chart(&self) -> bool {
        lock(&self.inner.handle).is_some()
    }

    /// Run `f` against the live chart handle, if any.
    pub fn with_handle<R>(&self, f: impl FnOnce(Option<&ChartHandle>) -> R) -> R {
        f(lock(&self.inner.handle).as_ref())
    }

    pub async fn select_chart_type(&self, chart_type: ChartType) -> bool {
        lock(&self.inner.state).chart_type = chart_type;
        for t in ChartType::ALL {
            self.set_active(&type_button_id(&self.inner.container, t), t == chart_type);
        }
        self.reload().await
    }

    pub async fn select_range(&self, range: TimeRange) -> bool {
        lock(&self.inner.state).range = range;
        for r in TimeRange::CONTROLS {
            self.set_active(&range_button_id(&self.inner.container, r), r == range);
        }
        self.reload().await
    }

    pub async fn update_symbol(&self, symbol: &str) -> bool {
        lock(&self.inner.state).symbol = symbol.to_string();
        self.reload().await
    }

    fn set_active(&self, id: &str, active: bool) {
        if active {
            self.inner.doc.add_class(id, ACTIVE);
        } else {
            self.inner.doc.remove_class(id, ACTIVE);
        }
    }

    fn query(&self, state: &WidgetState) -> StockQuery {
        let today = self.inner.options.chart.today.unwrap_or_else(today_utc);
        let start = match self.inner.kind {
            WidgetKind::Stock | WidgetKind::Volume | WidgetKind::Combined => Some(state.range.start_date(today)),
            // Loader defaults: five years of monthly returns, no dates for shareholders.
            WidgetKind::Heatmap | WidgetKind::Pie => None,
        };
        StockQuery::new(state.symbol.clone()).with_start(start)
    }

    /// Dispose the current chart and load one for the current state.
    /// `true` when this reload left a live chart.
    pub async fn reload(&self) -> bool {
        let inner = &self.inner;
        let generation = inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(old) = lock(&inner.handle).take() {
            old.cleanup();
        }

        let state = self.state();
        let kind = inner.kind.load_kind(state.chart_type);
        let chart_opts = &inner.options.chart;
        let locale = chart_opts.locale();
        placeholder::show_loading(&inner.doc, &inner.chart_id, &locale);
        let query = kind.complete(self.query(&state), chart_opts.today.unwrap_or_else(today_utc));

        let outcome = fetch_chart(inner.source.as_ref(), kind, &query, &locale).await;

        let mut slot = lock(&inner.handle);
        let latest = inner.generation.load(Ordering::SeqCst);
        if inner.options.policy == ReloadPolicy::LatestWins && generation != latest {
            debug!(container = %inner.container, generation, latest, "discarding stale chart response");
            return false;
        }
        if let Some(old) = slot.take() {
            old.cleanup();
        }
        *slot = present(&inner.doc, &inner.chart_id, outcome, chart_opts);
        slot.is_some()
    }

    /// Remove the chart and every listener the widget registered.
    pub fn dispose(&self) {
        let inner = &self.inner;
        // Subscription ids are unique across listener kinds.
        for sub in lock(&inner.subscriptions).drain(..) {
            inner.doc.remove_click_listener(sub);
            inner.doc.disconnect(sub);
        }
        if let Some(handle) = lock(&inner.handle).take() {
            handle.cleanup();
        }
    }
}

/// Run a widget action from a click on the current tokio runtime.
fn spawn_on_click<F, Fut>(weak: &Weak<Inner>, action: F)
where
    F: FnOnce(ChartWidget) -> Fut,
    Fut: std::future::Future<Output = ()> + Send + 'static,
{
    let Some(inner) = weak.upgrade() else {
        return;
    };
    match tokio::runtime::Handle::try_current() {
        Ok(rt) => {
            rt.spawn(action(ChartWidget { inner }));
        }
        Err(_) => warn!(container = %inner.container, "click ignored outside an async runtime"),
    }
}
