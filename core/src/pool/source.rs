//! Frame source resolution
//!
//! Turns the source section of a config into one URL per frame, either from
//! an explicit JSON list or by expanding a filename template, optionally
//! rewritten through a responsive image CDN.

use spin360_shared::constants::INDEX_PLACEHOLDER;
use spin360_shared::{responsive_width, size_for_pixel_ratio};
use thiserror::Error;

use crate::config::{ResolvedConfig, ResponsiveConfig};

/// Why an explicit image list could not be used.
#[derive(Error, Debug)]
pub enum ImageListError {
    #[error("wrong format in image list: {0}")]
    Format(#[from] serde_json::Error),
    #[error("image list is empty")]
    Empty,
}

/// Zero-pad `index` to `width` digits.
pub fn pad_index(index: usize, width: u32) -> String {
    format!("{:0width$}", index, width = width as usize)
}

/// Replace every `{index}` placeholder with the padded zero-based index.
pub fn expand_template(template: &str, index: usize, width: u32) -> String {
    template.replace(INDEX_PLACEHOLDER, &pad_index(index, width))
}

/// Parse a JSON array of image URLs.
pub fn parse_image_list(raw: &str) -> Result<Vec<String>, ImageListError> {
    let list: Vec<String> = serde_json::from_str(raw)?;
    if list.is_empty() {
        return Err(ImageListError::Empty);
    }
    Ok(list)
}

/// Whether `src` carries its own `http://` or `https://` scheme.
pub fn is_absolute_url(src: &str) -> bool {
    let lower = src.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// `https://{token}.{host}/{operation}/{size}/{filters}/{src}`
pub fn cdn_url(responsive: &ResponsiveConfig, size: &str, src: &str) -> String {
    format!(
        "https://{}.{}/{}/{}/{}/{}",
        responsive.token, responsive.host, responsive.operation, size, responsive.filters, src
    )
}

/// Source behind a CDN-rewritten URL, used for full-resolution magnifying.
///
/// Everything from the last `//` onwards when it appears past the CDN's
/// own scheme; otherwise the URL unchanged.
pub fn original_source(url: &str) -> &str {
    match url.rfind("//") {
        Some(i) if i > 10 => &url[i..],
        _ => url,
    }
}

/// Resolve one source URL per frame.
///
/// `extent_width` is the on-screen width used to pick a responsive size when
/// none is configured. A malformed or empty image list is logged and the
/// templated sequence with the configured amount is used instead.
pub fn resolve_sources(config: &ResolvedConfig, extent_width: f64, pixel_ratio: f64) -> Vec<String> {
    let source = &config.source;
    let cdn = config.responsive.as_ref().map(|responsive| {
        let size = match &responsive.size {
            Some(size) => size.clone(),
            None => responsive_width(extent_width).to_string(),
        };
        (responsive, size_for_pixel_ratio(&size, pixel_ratio))
    });
    let rewrite = |src: String| match &cdn {
        Some((responsive, size)) => cdn_url(responsive, size, &src),
        None => src,
    };

    if let Some(raw) = &source.image_list {
        match parse_image_list(raw) {
            Ok(list) => {
                if list.len() as u32 != config.amount() {
                    tracing::warn!(
                        "Image list has {} entries but the grid has {} frames",
                        list.len(),
                        config.amount()
                    );
                }
                return list
                    .into_iter()
                    .map(|src| {
                        if is_absolute_url(&src) {
                            rewrite(src)
                        } else {
                            rewrite(format!("{}{}", source.folder, src))
                        }
                    })
                    .collect();
            }
            Err(e) => {
                tracing::error!(
                    "{}; falling back to {} templated frames",
                    e,
                    config.amount()
                );
            }
        }
    }

    let template = rewrite(format!("{}{}", source.folder, source.filename));
    (0..config.amount() as usize)
        .map(|index| expand_template(&template, index, source.index_zero_base))
        .collect()
}
