// File: crates/stockviz-widgets/src/lib.rs
// Summary: Chart widgets over a headless document: DOM utilities, renderer, handles, loaders, embedded news charts and controls.

pub mod document;
pub mod tooltip;
pub mod placeholder;
pub mod styles;
pub mod options;
pub mod renderer;
pub mod handle;
pub mod builders;
pub mod loader;
pub mod embedded;
pub mod widget;

pub use builders::{
    create_bar_chart, create_candlestick_chart, create_combined_chart, create_doughnut_chart, create_heatmap_chart,
    create_line_chart, create_pie_chart, create_sentiment_trend_chart, create_volume_chart, mount,
};
pub use embedded::{init_embedded_charts, load_embedded_chart, read_embedded, EmbeddedChart};
pub use document::{Content, Document, Element, PointerEvent, Subscription};
pub use handle::{ChartHandle, Disposer, SharedVisual};
pub use loader::{
    load_combined_chart, load_monthly_returns_heatmap, load_shareholders_pie, load_stock_chart, load_volume_chart,
    ChartType, LoadKind, Outcome, TimeRange,
};
pub use options::{ChartOptions, ResolvedOptions};
pub use placeholder::{show_error, show_loading};
pub use renderer::{build_visual, ChartSpec, Family, Visual};
pub use styles::add_chart_styles;
pub use tooltip::Tooltip;
pub use widget::{ChartWidget, ReloadPolicy, WidgetKind, WidgetOptions, WidgetState};
