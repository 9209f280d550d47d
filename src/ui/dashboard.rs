//! Dashboard page: one summary fetch per mount, four counters.

use eframe::egui::{self, Color32, RichText};

use crate::api::inventory::{FetchError, InventorySummary, SummaryFetch};

use super::jobs::UiJobs;
use super::style;

/// Fixed user-facing message for any failed summary fetch.
pub const FETCH_ERROR_MESSAGE: &str = "Failed to load inventory data. Please upload a CSV first.";

const RECOMMENDATION_NOTE: &str = "Based on current data, consider reviewing aging stock for \
    potential discounts to improve sales velocity. Items that are hot sellers might be candidates \
    for a price markup if demand continues to rise.";

/// Fetch lifecycle for one mount of the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardPhase {
    /// Fetch outstanding.
    Loading,
    /// Summary received.
    Loaded(InventorySummary),
    /// Server reported no data yet.
    Empty,
    /// Fetch failed; the fixed message is shown.
    Error,
}

/// State owned by the dashboard page.
pub struct DashboardPage {
    /// Current lifecycle phase.
    pub phase: DashboardPhase,
}

impl DashboardPage {
    /// Create a page that will fetch on its first mount.
    pub fn new() -> Self {
        Self {
            phase: DashboardPhase::Loading,
        }
    }

    /// Start the once-per-mount fetch. Any previous summary is discarded.
    pub fn mount(&mut self, jobs: &mut UiJobs, ctx: &egui::Context, base_url: &str) {
        self.phase = DashboardPhase::Loading;
        jobs.begin_summary_fetch(ctx, base_url.to_string());
    }

    /// Cancel the in-flight fetch when the page goes away.
    pub fn unmount(&mut self, jobs: &mut UiJobs) {
        jobs.cancel_summary_fetch();
    }

    /// Apply a finished fetch for the current mount.
    pub fn apply_result(&mut self, result: Result<SummaryFetch, FetchError>) {
        match result {
            Ok(SummaryFetch::Data(summary)) => self.phase = DashboardPhase::Loaded(summary),
            Ok(SummaryFetch::Empty) => self.phase = DashboardPhase::Empty,
            Err(err) => {
                tracing::warn!("Inventory summary fetch failed: {err}");
                self.phase = DashboardPhase::Error;
            }
        }
    }

    /// Render the page; returns true when the user asked to go to the
    /// upload page.
    pub(super) fn render(&self, ui: &mut egui::Ui) -> bool {
        match &self.phase {
            DashboardPhase::Loading => {
                ui.vertical_centered(|ui| {
                    ui.add_space(40.0);
                    ui.spinner();
                    ui.add_space(8.0);
                    ui.label(
                        RichText::new("Loading dashboard data...")
                            .color(style::palette().text_muted),
                    );
                });
                false
            }
            DashboardPhase::Error => render_error(ui),
            DashboardPhase::Empty => render_empty(ui),
            DashboardPhase::Loaded(summary) => {
                render_summary(ui, summary);
                false
            }
        }
    }
}

fn render_error(ui: &mut egui::Ui) -> bool {
    let palette = style::palette();
    let mut go_to_upload = false;
    ui.vertical_centered(|ui| {
        ui.add_space(40.0);
        ui.label(RichText::new("Error:").color(palette.warning).strong());
        ui.label(RichText::new(FETCH_ERROR_MESSAGE).color(palette.warning));
        ui.add_space(12.0);
        if ui.button("Go to Upload Page").clicked() {
            go_to_upload = true;
        }
    });
    go_to_upload
}

fn render_empty(ui: &mut egui::Ui) -> bool {
    let palette = style::palette();
    let mut go_to_upload = false;
    ui.vertical_centered(|ui| {
        ui.add_space(40.0);
        ui.label(
            RichText::new("No inventory data available.")
                .color(palette.text_primary)
                .strong(),
        );
        ui.label(
            RichText::new("Please upload your first CSV file to see dashboard insights.")
                .color(palette.text_muted),
        );
        ui.add_space(12.0);
        if ui.button("Upload CSV Now").clicked() {
            go_to_upload = true;
        }
    });
    go_to_upload
}

fn render_summary(ui: &mut egui::Ui, summary: &InventorySummary) {
    let palette = style::palette();
    ui.vertical_centered(|ui| {
        ui.heading("Inventory Overview");
    });
    ui.add_space(16.0);
    ui.columns(4, |columns| {
        counter_box(
            &mut columns[0],
            "New Items This Month",
            summary.new_items_count,
            palette.accent_ice,
        );
        counter_box(
            &mut columns[1],
            "Sold Items This Month",
            summary.sold_items_count,
            palette.accent_copper,
        );
        counter_box(
            &mut columns[2],
            "Aging Stock (3+ Months)",
            summary.aging_items_count,
            palette.accent_amber,
        );
        counter_box(
            &mut columns[3],
            "Unchanged Items",
            summary.unchanged_items_count,
            palette.success,
        );
    });
    ui.add_space(24.0);
    ui.heading("Recommendations");
    ui.add_space(4.0);
    ui.group(|ui| {
        ui.label(RichText::new(RECOMMENDATION_NOTE).color(palette.text_primary));
    });
}

fn counter_box(ui: &mut egui::Ui, label: &str, value: u64, accent: Color32) {
    ui.group(|ui| {
        ui.vertical_centered(|ui| {
            ui.label(RichText::new(label).color(style::palette().text_muted).small());
            ui.label(RichText::new(value.to_string()).color(accent).size(32.0));
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;

    fn sample_summary() -> InventorySummary {
        InventorySummary {
            new_items_count: 5,
            sold_items_count: 2,
            aging_items_count: 1,
            unchanged_items_count: 10,
        }
    }

    #[test]
    fn counts_are_stored_verbatim() {
        let mut page = DashboardPage::new();
        page.apply_result(Ok(SummaryFetch::Data(sample_summary())));
        let DashboardPhase::Loaded(summary) = &page.phase else {
            panic!("expected loaded phase");
        };
        assert_eq!(summary.new_items_count, 5);
        assert_eq!(summary.sold_items_count, 2);
        assert_eq!(summary.aging_items_count, 1);
        assert_eq!(summary.unchanged_items_count, 10);
    }

    #[test]
    fn empty_result_is_not_an_error() {
        let mut page = DashboardPage::new();
        page.apply_result(Ok(SummaryFetch::Empty));
        assert_eq!(page.phase, DashboardPhase::Empty);
    }

    #[test]
    fn failure_discards_previous_counts() {
        let mut page = DashboardPage::new();
        page.phase = DashboardPhase::Loaded(sample_summary());
        page.apply_result(Err(FetchError::Status { code: 404 }));
        assert_eq!(page.phase, DashboardPhase::Error);
    }

    #[test]
    fn mount_resets_to_loading_and_starts_a_fetch() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let ctx = egui::Context::default();
        let mut jobs = UiJobs::new();
        let mut page = DashboardPage::new();
        page.phase = DashboardPhase::Loaded(sample_summary());

        page.mount(&mut jobs, &ctx, &url);

        assert_eq!(page.phase, DashboardPhase::Loading);
        assert!(jobs.summary_fetch_in_flight());

        page.unmount(&mut jobs);
        assert!(!jobs.summary_fetch_in_flight());
    }
}
