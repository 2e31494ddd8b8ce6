//! Avatar image / fallback visibility.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Loading state of an avatar image.
pub enum ImageLoadingStatus {
    /// No source yet.
    #[default]
    Idle,
    /// Request in flight.
    Loading,
    /// Image decoded and displayable.
    Loaded,
    /// Request failed.
    Error,
}

/// Whether the fallback should render.
///
/// The fallback never shows over a loaded image, and with a delay configured it waits
/// until `delay_elapsed` so fast-loading images do not flash a placeholder.
pub fn fallback_visible(status: ImageLoadingStatus, delay_elapsed: bool) -> bool {
    status != ImageLoadingStatus::Loaded && delay_elapsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loaded_image_hides_fallback() {
        assert!(!fallback_visible(ImageLoadingStatus::Loaded, true));
    }

    #[test]
    fn fallback_waits_for_delay() {
        assert!(!fallback_visible(ImageLoadingStatus::Loading, false));
        assert!(fallback_visible(ImageLoadingStatus::Loading, true));
        assert!(fallback_visible(ImageLoadingStatus::Error, true));
    }
}
