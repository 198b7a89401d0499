//! INI serialization logic for converting `ConfigFile` → INI string.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    format!(
        r#"[provider]
; Tile URL template. {{quadkey}} is replaced with the tile's quadkey.
; Default: Bing Maps aerial imagery
url_template = {}

[download]
; Maximum concurrent tile requests (default: 16, max: 256)
max_concurrent = {}
; Retries per tile after a network failure (default: 3)
max_retries = {}
; HTTP request timeout in seconds (default: 30)
timeout = {}

[output]
; Shrink the aerial image by this factor before merging the overlay (default: 1)
shrink_factor = {}
; Resampling filter: nearest or triangle (default: triangle)
filter = {}

[logging]
; Log file path (default: ~/.aerialstitch/aerialstitch.log)
file = {}
"#,
        config.provider.url_template,
        config.download.max_concurrent,
        config.download.max_retries,
        config.download.timeout,
        config.output.shrink_factor,
        config.output.filter,
        path_to_string(&config.logging.file),
    )
}

fn path_to_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_written_config_has_all_sections() {
        let content = to_config_string(&ConfigFile::default());
        for section in ["[provider]", "[download]", "[output]", "[logging]"] {
            assert!(content.contains(section), "missing {}", section);
        }
        assert!(content.contains("url_template = https://ecn.t0.tiles.virtualearth.net"));
        assert!(content.contains("; Tile URL template. {quadkey} is replaced"));
        assert!(content.contains("filter = triangle"));
    }
}
