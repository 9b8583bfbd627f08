//! Rendering capabilities a host provides to each window's controller.
//!
//! Controllers compute what to show; surfaces only draw it.

use crate::dataset::DatasetPanel;
use crate::view::ListView;
use unialias_types::Settings;

/// Anything that can switch its color theme
pub trait ThemeSurface: Send + Sync {
    fn apply_theme(&self, theme: &str);
}

pub trait MainSurface: ThemeSurface {
    fn focus_input(&self);

    fn clear_input(&self);

    /// Replace the whole candidate list
    fn render_list(&self, view: &ListView);

    /// Move the selected marker without redrawing the list
    fn move_marker(&self, from: Option<usize>, to: usize);
}

pub trait SettingsSurface: ThemeSurface {
    fn show_form(&self, form: &Settings);
}

pub trait DatasetSurface: ThemeSurface {
    fn render_panel(&self, panel: &DatasetPanel);

    fn activate_tab(&self, index: usize);
}
