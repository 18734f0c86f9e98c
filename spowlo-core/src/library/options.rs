//! Translating stored preferences into library options.

use std::path::Path;

use super::formats::{AudioFormat, AudioQuality};
use super::request::SpotDlRequest;
use crate::prefs::keys::{
    AUDIO_FORMAT, AUDIO_QUALITY, CUSTOM_COMMAND, CUSTOM_COMMAND_TEMPLATE, DEBUG,
    DONT_FILTER_RESULTS, GEO_BYPASS, USE_CACHING,
};
use crate::prefs::{Preferences, ThreadCount};

/// Snapshot of every preference that affects a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOptions {
    pub threads: ThreadCount,
    pub format: AudioFormat,
    pub quality: AudioQuality,
    pub use_caching: bool,
    pub dont_filter_results: bool,
    pub geo_bypass: bool,
    pub print_errors: bool,
    /// Set when custom command mode is on and the template is not blank.
    pub custom_template: Option<String>,
}

impl DownloadOptions {
    pub fn load(prefs: &Preferences) -> Self {
        let custom_template = prefs
            .get_value(&CUSTOM_COMMAND)
            .then(|| prefs.get_value(&CUSTOM_COMMAND_TEMPLATE))
            .filter(|template| !template.trim().is_empty());

        Self {
            threads: prefs.thread_count(),
            format: AudioFormat::from_index(prefs.get_value(&AUDIO_FORMAT)),
            quality: AudioQuality::from_index(prefs.get_value(&AUDIO_QUALITY)),
            use_caching: prefs.get_value(&USE_CACHING),
            dont_filter_results: prefs.get_value(&DONT_FILTER_RESULTS),
            geo_bypass: prefs.get_value(&GEO_BYPASS),
            print_errors: prefs.get_value(&DEBUG),
            custom_template,
        }
    }

    /// Append options to `request`.
    ///
    /// A custom template replaces every generated option.
    pub fn apply(&self, request: &mut SpotDlRequest) {
        if let Some(template) = &self.custom_template {
            for token in template.split_whitespace() {
                request.add_option(token);
            }
            return;
        }

        request.add_option_value("--threads", self.threads.to_string());
        request.add_option_value("--format", self.format.as_str());
        if let Some(bitrate) = self.quality.bitrate().filter(|_| !self.format.is_lossless()) {
            request.add_option_value("--bitrate", bitrate);
        }
        if !self.use_caching {
            request.add_option("--no-cache");
        }
        if self.dont_filter_results {
            request.add_option("--dont-filter-results");
        }
        if self.print_errors {
            request.add_option("--print-errors");
        }
        if self.geo_bypass {
            request.add_option_value("--yt-dlp-args", "--geo-bypass");
        }
    }
}

/// Build a download request for `url` from the current preferences.
pub fn build_download_request(
    prefs: &Preferences,
    url: &str,
    output_dir: Option<&Path>,
) -> SpotDlRequest {
    let options = DownloadOptions::load(prefs);
    let mut request = SpotDlRequest::with_url(url);
    options.apply(&mut request);
    if options.custom_template.is_none() {
        if let Some(dir) = output_dir {
            request.add_option_value("--output", dir.display().to_string());
        }
    }
    request
}
