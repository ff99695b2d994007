//! Application state shared by the scan, results and history views.
//!
//! A single [`AppState`] is owned by the caller and passed explicitly to
//! whatever needs it; mutation goes through the typed actions below.

use crate::scan::{Language, ScanResult};

#[derive(Debug, Clone, Default)]
pub struct AppState {
    current_scan: Option<ScanResult>,
    scan_history: Vec<ScanResult>,
    is_scanning: bool,
    uploaded_image: Option<String>,
    language: Language,
}

impl AppState {
    #[must_use]
    pub fn new(language: Language) -> Self {
        Self {
            language,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn current_scan(&self) -> Option<&ScanResult> {
        self.current_scan.as_ref()
    }

    /// Past scans, newest first.
    #[must_use]
    pub fn scan_history(&self) -> &[ScanResult] {
        &self.scan_history
    }

    #[must_use]
    pub fn is_scanning(&self) -> bool {
        self.is_scanning
    }

    #[must_use]
    pub fn uploaded_image(&self) -> Option<&str> {
        self.uploaded_image.as_deref()
    }

    #[must_use]
    pub fn language(&self) -> Language {
        self.language
    }

    pub fn set_uploaded_image(&mut self, image: Option<String>) {
        self.uploaded_image = image;
    }

    pub fn begin_scan(&mut self) {
        self.is_scanning = true;
    }

    pub fn finish_scan(&mut self) {
        self.is_scanning = false;
    }

    pub fn set_current_scan(&mut self, scan: ScanResult) {
        self.current_scan = Some(scan);
    }

    pub fn add_to_history(&mut self, scan: ScanResult) {
        self.scan_history.insert(0, scan);
    }

    /// Drops the current scan together with the image that produced it.
    pub fn clear_current_scan(&mut self) {
        self.current_scan = None;
        self.uploaded_image = None;
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }
}
