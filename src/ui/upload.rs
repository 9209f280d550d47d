//! Upload page: pick a CSV file and post it to the server.

use std::path::PathBuf;

use eframe::egui::{self, RichText};

use crate::api::upload::{UploadError, UploadResponse};

use super::jobs::UiJobs;
use super::style;

/// Local validation error shown when submitting with no file selected.
pub const SELECT_FILE_ERROR: &str = "Please select a CSV file to upload.";

/// One user-chosen file plus its display name.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    /// Path returned by the file dialog.
    pub path: PathBuf,
    /// Name shown in the UI and sent to the server.
    pub name: String,
}

/// Upload request lifecycle as far as the page cares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadPhase {
    /// No request outstanding.
    Idle,
    /// One multipart POST is in flight.
    InFlight,
    /// Last upload succeeded; holds the status line.
    Success(String),
}

/// State owned by the upload page.
pub struct UploadPage {
    /// Currently selected file, if any.
    pub selected: Option<SelectedFile>,
    /// Request lifecycle.
    pub phase: UploadPhase,
    /// Error line shown under the form.
    pub error: Option<String>,
}

impl UploadPage {
    /// Create an empty page.
    pub fn new() -> Self {
        Self {
            selected: None,
            phase: UploadPhase::Idle,
            error: None,
        }
    }

    /// Replace the selected file and clear any previous outcome.
    pub fn set_selected(&mut self, path: PathBuf) {
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("upload.csv")
            .to_string();
        self.selected = Some(SelectedFile { path, name });
        self.phase = UploadPhase::Idle;
        self.error = None;
    }

    fn choose_file(&mut self) {
        let picked = rfd::FileDialog::new()
            .set_title("Select CSV File")
            .add_filter("CSV files", &["csv"])
            .add_filter("All files", &["*"])
            .pick_file();
        if let Some(path) = picked {
            self.set_selected(path);
        }
    }

    /// Submit the selected file; no-ops while an upload is outstanding.
    ///
    /// With no file selected this sets the local validation error and makes
    /// no network call.
    pub fn submit(&mut self, jobs: &mut UiJobs, ctx: &egui::Context, base_url: &str) {
        if jobs.upload_in_flight() {
            return;
        }
        let Some(file) = self.selected.clone() else {
            self.error = Some(SELECT_FILE_ERROR.to_string());
            return;
        };
        let payload = match std::fs::read(&file.path) {
            Ok(payload) => payload,
            Err(err) => {
                tracing::warn!("Could not read {}: {err}", file.path.display());
                self.error = Some(format!("Could not read {}.", file.name));
                return;
            }
        };
        self.error = None;
        self.phase = UploadPhase::InFlight;
        jobs.begin_upload(ctx, base_url.to_string(), file.name, payload);
    }

    /// Apply a finished upload; returns true when the app should switch to
    /// the dashboard.
    pub fn apply_result(&mut self, result: Result<UploadResponse, UploadError>) -> bool {
        match result {
            Ok(response) => {
                self.phase = UploadPhase::Success(format!(
                    "Upload successful! {} processed.",
                    response.filename
                ));
                self.selected = None;
                self.error = None;
                true
            }
            Err(err) => {
                tracing::warn!("Upload failed: {err}");
                self.phase = UploadPhase::Idle;
                self.error = Some(err.user_message());
                false
            }
        }
    }

    pub(super) fn render(&mut self, ui: &mut egui::Ui, jobs: &mut UiJobs, base_url: &str) {
        let palette = style::palette();
        ui.heading("Upload Inventory CSV");
        ui.add_space(12.0);

        ui.horizontal(|ui| {
            if ui.button("Select CSV File").clicked() {
                self.choose_file();
            }
            match &self.selected {
                Some(file) => {
                    ui.label(
                        RichText::new(format!("Selected file: {}", file.name))
                            .color(palette.text_primary),
                    );
                }
                None => {
                    ui.label(RichText::new("No file selected").color(palette.text_muted));
                }
            }
        });
        ui.add_space(8.0);

        let in_flight = self.phase == UploadPhase::InFlight;
        let label = if in_flight { "Processing..." } else { "Upload & Process" };
        let can_submit = self.selected.is_some() && !in_flight;
        if ui.add_enabled(can_submit, egui::Button::new(label)).clicked() {
            let ctx = ui.ctx().clone();
            self.submit(jobs, &ctx, base_url);
        }

        ui.add_space(8.0);
        match &self.phase {
            UploadPhase::InFlight => {
                ui.label(RichText::new("Uploading...").color(palette.accent_ice));
            }
            UploadPhase::Success(message) => {
                ui.label(RichText::new(message).color(palette.success));
            }
            UploadPhase::Idle => {}
        }
        if let Some(error) = &self.error {
            ui.label(RichText::new(error).color(palette.warning));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> egui::Context {
        egui::Context::default()
    }

    #[test]
    fn submit_without_file_is_a_local_error() {
        let mut jobs = UiJobs::new();
        let mut page = UploadPage::new();

        page.submit(&mut jobs, &ctx(), "http://127.0.0.1:9");

        assert_eq!(page.error.as_deref(), Some(SELECT_FILE_ERROR));
        assert_eq!(page.phase, UploadPhase::Idle);
        assert!(!jobs.upload_in_flight());
    }

    #[test]
    fn submit_is_rejected_while_one_is_outstanding() {
        let mut jobs = UiJobs::new();
        jobs.mark_upload_pending();
        let mut page = UploadPage::new();
        page.set_selected(PathBuf::from("/tmp/inventory.csv"));

        page.submit(&mut jobs, &ctx(), "http://127.0.0.1:9");

        assert_eq!(page.phase, UploadPhase::Idle);
        assert_eq!(page.error, None);
    }

    #[test]
    fn unreadable_file_is_a_local_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone.csv");
        let mut jobs = UiJobs::new();
        let mut page = UploadPage::new();
        page.set_selected(missing);

        page.submit(&mut jobs, &ctx(), "http://127.0.0.1:9");

        assert!(page.error.as_deref().unwrap().contains("gone.csv"));
        assert_eq!(page.phase, UploadPhase::Idle);
        assert!(!jobs.upload_in_flight());
    }

    #[test]
    fn success_clears_selection_and_requests_navigation() {
        let mut page = UploadPage::new();
        page.set_selected(PathBuf::from("/tmp/x.csv"));
        page.phase = UploadPhase::InFlight;

        let navigate = page.apply_result(Ok(UploadResponse {
            filename: "x.csv".to_string(),
        }));

        assert!(navigate);
        assert!(matches!(&page.phase, UploadPhase::Success(status) if status.contains("x.csv")));
        assert!(page.selected.is_none());
        assert_eq!(page.error, None);
    }

    #[test]
    fn failure_shows_detail_and_keeps_selection() {
        let mut page = UploadPage::new();
        page.set_selected(PathBuf::from("/tmp/x.csv"));
        page.phase = UploadPhase::InFlight;

        let navigate = page.apply_result(Err(UploadError::Rejected {
            detail: "bad format".to_string(),
        }));

        assert!(!navigate);
        assert_eq!(page.error.as_deref(), Some("bad format"));
        assert_eq!(page.phase, UploadPhase::Idle);
        assert!(page.selected.is_some());
    }

    #[test]
    fn failure_without_detail_shows_fallback() {
        use crate::api::upload::UPLOAD_FALLBACK_ERROR;

        let mut page = UploadPage::new();
        page.phase = UploadPhase::InFlight;

        page.apply_result(Err(UploadError::Status { code: 502 }));

        assert_eq!(page.error.as_deref(), Some(UPLOAD_FALLBACK_ERROR));
        assert_eq!(page.phase, UploadPhase::Idle);
    }

    #[test]
    fn selecting_a_file_clears_previous_outcome() {
        let mut page = UploadPage::new();
        page.phase = UploadPhase::Success("Upload successful! a.csv processed.".to_string());
        page.error = Some("stale".to_string());

        page.set_selected(PathBuf::from("/tmp/b.csv"));

        assert_eq!(page.phase, UploadPhase::Idle);
        assert_eq!(page.error, None);
        assert_eq!(page.selected.as_ref().unwrap().name, "b.csv");
    }
}
