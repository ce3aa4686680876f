use serde::{Deserialize, Serialize};
use url::Url;

use crate::Document;

/// Page metadata passed through to the analysis result
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub title: String,
    pub preview_image_url: Option<String>,
}

impl Document {
    /// Extract title with priority fallback:
    /// 1. First non-blank `<h1>` element
    /// 2. `<title>` element
    ///
    /// Returns an empty string when neither is present.
    pub fn extract_title(&self) -> String {
        if let Ok(elements) = self.select("h1") {
            for heading in elements {
                let text = normalize(&heading.text());
                if !text.is_empty() {
                    return text;
                }
            }
        }

        self.title().map(|t| normalize(&t)).unwrap_or_default()
    }

    /// Extract the social preview image:
    /// 1. Open Graph `og:image`
    /// 2. Twitter `twitter:image`
    pub fn extract_preview_image(&self) -> Option<String> {
        self.get_meta_content("og:image")
            .or_else(|| self.get_meta_content("twitter:image"))
    }

    /// Extract all metadata at once, resolving a relative preview URL when a base is known
    pub fn extract_metadata(&self, base_url: Option<&Url>) -> PageMetadata {
        let preview_image_url = self
            .extract_preview_image()
            .map(|image| resolve(&image, base_url));

        PageMetadata { title: self.extract_title(), preview_image_url }
    }

    /// Get meta tag content by property or name attribute
    fn get_meta_content(&self, attr: &str) -> Option<String> {
        for key in ["property", "name"] {
            if let Ok(Some(meta)) = self.select_first(&format!("meta[{}=\"{}\"][content]", key, attr))
                && let Some(content) = meta.attr("content")
            {
                let content = content.trim();
                if !content.is_empty() {
                    return Some(content.to_string());
                }
            }
        }

        None
    }
}

fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn resolve(image: &str, base_url: Option<&Url>) -> String {
    match base_url {
        Some(base) => base.join(image).map(|u| u.to_string()).unwrap_or_else(|_| image.to_string()),
        None => image.to_string(),
    }
}
