//! Browser assets for the mdp previewer.
//!
//! The editor page, the markdown guide and their script and stylesheet live
//! under `assets/`. Two modes share one API:
//!
//! - **`embed` feature on**: assets are compiled into the binary via `rust-embed`
//! - **`embed` feature off**: assets are read from the crate's `assets/` directory
//!   on every request, so edits show up without a rebuild

use std::borrow::Cow;
#[cfg(not(feature = "embed"))]
use std::path::Path;

/// Asset path of the editor page served at `/`.
pub const INDEX_PAGE: &str = "index.html";

/// Asset path of the markdown guide served at `/guide`.
pub const GUIDE_PAGE: &str = "guide.html";

#[cfg(feature = "embed")]
#[derive(rust_embed::RustEmbed)]
#[folder = "assets"]
struct Assets;

#[cfg(not(feature = "embed"))]
const DEV_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/assets");

/// Get an asset by path relative to `assets/`.
#[cfg(feature = "embed")]
pub fn get(path: &str) -> Option<Cow<'static, [u8]>> {
    Assets::get(path).map(|f| f.data)
}

/// Get an asset by path relative to `assets/`.
///
/// Paths containing `..` components are rejected.
#[cfg(not(feature = "embed"))]
pub fn get(path: &str) -> Option<Cow<'static, [u8]>> {
    if path.split(['/', '\\']).any(|part| part == "..") {
        return None;
    }
    std::fs::read(Path::new(DEV_DIR).join(path))
        .ok()
        .map(Cow::Owned)
}

/// MIME type for an asset path, `application/octet-stream` when unknown.
#[must_use]
pub fn mime_for(path: &str) -> &'static str {
    mime_guess::from_path(path)
        .first_raw()
        .unwrap_or("application/octet-stream")
}
