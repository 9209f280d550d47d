use eframe::egui::{
    Color32, Stroke, Visuals,
    epaint::{CornerRadius, Shadow},
    style::WidgetVisuals,
};

/// Color scheme shared by both pages.
#[derive(Clone, Copy)]
pub struct Palette {
    /// Window background.
    pub bg_primary: Color32,
    /// Panel background.
    pub bg_secondary: Color32,
    /// Widget background.
    pub bg_tertiary: Color32,
    /// Panel and widget outlines.
    pub panel_outline: Color32,
    /// Soft fill for selections.
    pub grid_soft: Color32,
    /// Default text.
    pub text_primary: Color32,
    /// Secondary text.
    pub text_muted: Color32,
    /// New-item counter and links.
    pub accent_ice: Color32,
    /// Sold-item counter.
    pub accent_copper: Color32,
    /// Aging-stock counter.
    pub accent_amber: Color32,
    /// Error text.
    pub warning: Color32,
    /// Success text and the unchanged-items counter.
    pub success: Color32,
}

/// Return the fixed dark palette.
pub fn palette() -> Palette {
    Palette {
        bg_primary: Color32::from_rgb(12, 12, 14),
        bg_secondary: Color32::from_rgb(24, 26, 29),
        bg_tertiary: Color32::from_rgb(40, 43, 47),
        panel_outline: Color32::from_rgb(40, 44, 50),
        grid_soft: Color32::from_rgb(30, 32, 36),
        text_primary: Color32::from_rgb(188, 194, 202),
        text_muted: Color32::from_rgb(138, 144, 153),
        accent_ice: Color32::from_rgb(167, 217, 255),
        accent_copper: Color32::from_rgb(214, 144, 120),
        accent_amber: Color32::from_rgb(222, 190, 110),
        warning: Color32::from_rgb(208, 122, 96),
        success: Color32::from_rgb(110, 182, 140),
    }
}

/// Apply the rectilinear dark style to egui visuals.
pub fn apply_visuals(visuals: &mut Visuals) {
    let palette = palette();
    visuals.window_fill = palette.bg_primary;
    visuals.panel_fill = palette.bg_secondary;
    visuals.override_text_color = Some(palette.text_primary);
    visuals.hyperlink_color = palette.accent_ice;
    visuals.extreme_bg_color = palette.bg_primary;
    visuals.faint_bg_color = palette.bg_secondary;
    visuals.error_fg_color = palette.warning;
    visuals.warn_fg_color = palette.warning;
    visuals.selection.bg_fill = palette.grid_soft;
    visuals.selection.stroke = Stroke::new(1.0, palette.accent_ice);
    visuals.widgets.noninteractive.bg_fill = palette.bg_secondary;
    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, palette.text_primary);
    set_rectilinear(&mut visuals.widgets.inactive, palette);
    set_rectilinear(&mut visuals.widgets.hovered, palette);
    set_rectilinear(&mut visuals.widgets.active, palette);
    set_rectilinear(&mut visuals.widgets.open, palette);
    visuals.window_corner_radius = CornerRadius::ZERO;
    visuals.menu_corner_radius = CornerRadius::ZERO;
    visuals.popup_shadow = Shadow::NONE;
    visuals.button_frame = true;
}

fn set_rectilinear(vis: &mut WidgetVisuals, palette: Palette) {
    vis.corner_radius = CornerRadius::ZERO;
    vis.bg_fill = palette.bg_tertiary;
    vis.weak_bg_fill = palette.grid_soft;
    vis.bg_stroke = Stroke::new(1.0, palette.panel_outline);
    vis.fg_stroke = Stroke::new(1.0, palette.text_primary);
}
