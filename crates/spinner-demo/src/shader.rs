//! Where the WGSL comes from, and fetching it.

use std::fmt;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use reqwest::Url;

use crate::scene::Variant;

/// Source location of the scene's shader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShaderLocation {
    /// The WGSL compiled into the binary for the variant.
    Builtin(Variant),
    File(PathBuf),
    Url(Url),
}

impl ShaderLocation {
    /// `http://` / `https://` become URLs, anything else a file path.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.starts_with("http://") || raw.starts_with("https://") {
            let url = Url::parse(raw).with_context(|| format!("invalid shader URL {raw:?}"))?;
            return Ok(Self::Url(url));
        }
        Ok(Self::File(PathBuf::from(raw)))
    }
}

impl fmt::Display for ShaderLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builtin(variant) => write!(f, "built-in {variant} shader"),
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => write!(f, "{url}"),
        }
    }
}

/// WGSL source that was fetched successfully.
///
/// Only [`fetch_shader`] produces one, so holding a `ShaderCode` means the
/// fetch is behind us.
#[derive(Debug, Clone)]
pub struct ShaderCode {
    pub origin: String,
    pub source: String,
}

/// Reads the shader once. A non-success HTTP status, a network error, or an
/// unreadable file is fatal to the caller.
pub fn fetch_shader(location: &ShaderLocation) -> Result<ShaderCode> {
    let source = match location {
        ShaderLocation::Builtin(variant) => variant.builtin_shader().to_string(),
        ShaderLocation::File(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read shader {}", path.display()))?,
        ShaderLocation::Url(url) => {
            let response = reqwest::blocking::get(url.clone())
                .with_context(|| format!("failed to fetch shader {url}"))?;
            let status = response.status();
            if !status.is_success() {
                bail!("fetching shader failed: {}", status.as_u16());
            }
            response
                .text()
                .with_context(|| format!("failed to read shader body from {url}"))?
        }
    };

    log::debug!("loaded {} bytes of WGSL from {location}", source.len());
    Ok(ShaderCode {
        origin: location.to_string(),
        source,
    })
}

/// A variant paired with where its shader lives.
#[derive(Debug, Clone)]
pub struct SceneSource {
    pub variant: Variant,
    pub location: ShaderLocation,
}

impl SceneSource {
    /// Fetches the shader, then hands it to `build`.
    ///
    /// `build` is where pipelines and buffers get created, so a failed fetch
    /// returns before any of them exist.
    pub fn load<T>(&self, build: impl FnOnce(Variant, &ShaderCode) -> Result<T>) -> Result<T> {
        let code = fetch_shader(&self.location)?;
        build(self.variant, &code)
    }
}
