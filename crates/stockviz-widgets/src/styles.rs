// File: crates/stockviz-widgets/src/styles.rs
// Summary: Shared chart stylesheet, injected once per document.

use crate::document::Document;

pub const STYLESHEET_ID: &str = "chart-styles";

pub const CHART_CSS: &str = r#"
.chart-container { position: relative; height: 100%; width: 100%; }
.chart-error { display: flex; flex-direction: column; align-items: center; justify-content: center; height: 100%; color: #e74c3c; text-align: center; padding: 20px; }
.chart-error i { font-size: 32px; margin-bottom: 10px; }
.chart-loading { display: flex; flex-direction: column; align-items: center; justify-content: center; height: 100%; text-align: center; padding: 20px; }
.spinner { border: 4px solid rgba(0, 0, 0, 0.1); border-radius: 50%; border-top: 4px solid #3498db; width: 30px; height: 30px; animation: spin 1s linear infinite; margin-bottom: 10px; }
@keyframes spin { 0% { transform: rotate(0deg); } 100% { transform: rotate(360deg); } }
.lightweight-charts-tooltip { font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif; line-height: 1.5; }
.chart-controls { display: flex; justify-content: space-between; margin-bottom: 10px; }
.chart-controls .btn-group { display: flex; }
.chart-legend { display: flex; flex-wrap: wrap; font-size: 12px; padding: 5px; background-color: rgba(255, 255, 255, 0.7); border-radius: 4px; position: absolute; top: 5px; left: 5px; z-index: 100; }
.legend-item { display: flex; align-items: center; margin-right: 10px; }
.legend-color { width: 10px; height: 10px; margin-right: 5px; border-radius: 50%; }
"#;

/// Inject the stylesheet; `false` when it is already present.
pub fn add_chart_styles(doc: &Document) -> bool {
    doc.append_stylesheet(STYLESHEET_ID, CHART_CSS)
}
