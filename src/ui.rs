//! egui application shell: navigation, routing, and per-frame job polling.

/// Background worker plumbing.
pub mod jobs;
/// Visual style shared by both pages.
pub mod style;

/// Dashboard page.
pub mod dashboard;
/// Upload page.
pub mod upload;

use eframe::egui::{self, RichText};

use crate::config::Settings;

use dashboard::DashboardPage;
use jobs::{JobMessage, UiJobs};
use upload::UploadPage;

/// Client-side routes; `Upload` is the default landing page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    /// The CSV upload form.
    Upload,
    /// The inventory summary dashboard.
    Dashboard,
}

/// Renders the two-page client UI over the shared job runtime.
pub struct StockLensApp {
    settings: Settings,
    route: Route,
    upload: UploadPage,
    dashboard: DashboardPage,
    jobs: UiJobs,
    visuals_set: bool,
}

impl StockLensApp {
    /// Create the app on the upload route.
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            route: Route::Upload,
            upload: UploadPage::new(),
            dashboard: DashboardPage::new(),
            jobs: UiJobs::new(),
            visuals_set: false,
        }
    }

    /// Switch routes, driving page mount semantics: entering the dashboard
    /// starts a fresh fetch, leaving it cancels the outstanding one.
    fn navigate(&mut self, ctx: &egui::Context, route: Route) {
        if self.route == route {
            return;
        }
        if self.route == Route::Dashboard {
            self.dashboard.unmount(&mut self.jobs);
        }
        self.route = route;
        if route == Route::Dashboard {
            let base_url = self.settings.api.base_url.clone();
            self.dashboard.mount(&mut self.jobs, ctx, &base_url);
        }
    }

    /// Drain finished jobs; results for retired request ids are dropped.
    fn poll_background_jobs(&mut self, ctx: &egui::Context) {
        loop {
            let Ok(message) = self.jobs.try_recv_message() else {
                break;
            };
            match message {
                JobMessage::UploadFinished(finished) => {
                    if !self.jobs.finish_upload(finished.request_id) {
                        continue;
                    }
                    if self.upload.apply_result(finished.result) {
                        self.navigate(ctx, Route::Dashboard);
                    }
                }
                JobMessage::SummaryFetched(fetched) => {
                    if !self.jobs.finish_summary_fetch(fetched.request_id) {
                        continue;
                    }
                    self.dashboard.apply_result(fetched.result);
                }
            }
        }
    }

    fn apply_visuals(&mut self, ctx: &egui::Context) {
        if self.visuals_set {
            return;
        }
        let mut visuals = egui::Visuals::dark();
        style::apply_visuals(&mut visuals);
        ctx.set_visuals(visuals);
        self.visuals_set = true;
    }

    fn render_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("nav_bar").show(ctx, |ui| {
            let palette = style::palette();
            ui.horizontal(|ui| {
                ui.label(RichText::new("AI Parts App").color(palette.accent_ice).strong());
                ui.add_space(16.0);
                ui.separator();
                let mut target = None;
                if ui
                    .selectable_label(self.route == Route::Upload, "Upload CSV")
                    .clicked()
                {
                    target = Some(Route::Upload);
                }
                if ui
                    .selectable_label(self.route == Route::Dashboard, "Dashboard")
                    .clicked()
                {
                    target = Some(Route::Dashboard);
                }
                if let Some(route) = target {
                    self.navigate(ctx, route);
                }
            });
        });
    }
}

impl eframe::App for StockLensApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_visuals(ctx);
        self.poll_background_jobs(ctx);
        self.render_top_bar(ctx);
        egui::CentralPanel::default().show(ctx, |ui| match self.route {
            Route::Upload => {
                let base_url = self.settings.api.base_url.clone();
                self.upload.render(ui, &mut self.jobs, &base_url);
            }
            Route::Dashboard => {
                if self.dashboard.render(ui) {
                    self.navigate(ctx, Route::Upload);
                }
            }
        });
    }
}
