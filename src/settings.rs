//! Launch configuration
//!
//! Read once from the page URL. Only affects how the object looks.

/// Options supplied on the page URL
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LaunchConfig {
    /// Image shown on the thrown object (`?image=...`), already URI-decoded
    pub image: Option<String>,
}

impl LaunchConfig {
    /// Query parameter holding the image reference
    pub const IMAGE_PARAM: &'static str = "image";

    pub fn new(image: Option<String>) -> Self {
        Self {
            image: image.filter(|s| !s.is_empty()),
        }
    }

    /// Background colour to paint behind the image
    pub fn background_color(&self) -> Option<&'static str> {
        self.image.as_ref().map(|_| "white")
    }

    /// CSS `background-image` value
    pub fn background_image(&self) -> Option<String> {
        self.image.as_ref().map(|url| format!("url({})", url))
    }

    /// Parse from the current page location (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn from_location() -> Self {
        let search = web_sys::window()
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default();
        let image = web_sys::UrlSearchParams::new_with_str(&search)
            .ok()
            .and_then(|params| params.get(Self::IMAGE_PARAM))
            .map(|raw| match js_sys::decode_uri(&raw) {
                Ok(decoded) => String::from(decoded),
                Err(_) => {
                    log::warn!("Could not decode image parameter, using it as-is");
                    raw
                }
            });
        if let Some(ref image) = image {
            log::info!("Using object image: {}", image);
        }
        Self::new(image)
    }

    /// Native builds take the image from `THROWABLE_IMAGE`
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_location() -> Self {
        Self::new(std::env::var("THROWABLE_IMAGE").ok())
    }
}
