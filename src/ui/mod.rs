/// Rendering: the filter sidebar, top bar, static text, and the four charts.
pub mod panels;
pub mod plot;
