//! Where asset files come from.
//!
//! Natively files are read from a directory with `tokio::fs`, in the browser
//! they are fetched relative to the page origin with `reqwest`.

use std::future::Future;

use anyhow::Context;

/// Environment variable overriding the native resource directory.
pub const RESOURCE_DIR_ENV: &str = "FARMSTEAD_RESOURCE_DIR";
/// Resource directory relative to the working directory or the page origin.
pub const DEFAULT_RESOURCE_DIR: &str = "resources/models";

/// Resolves asset file names to their contents.
pub trait AssetSource {
    fn load_string(&self, file_name: &str) -> impl Future<Output = anyhow::Result<String>>;

    fn load_binary(&self, file_name: &str) -> impl Future<Output = anyhow::Result<Vec<u8>>>;
}

/// The resource directory of the running application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDir {
    root: String,
}

impl ResourceDir {
    pub fn new(root: impl Into<String>) -> Self {
        Self { root: root.into() }
    }

    /// `FARMSTEAD_RESOURCE_DIR` if set (native only), [`DEFAULT_RESOURCE_DIR`] otherwise.
    pub fn from_env() -> Self {
        #[cfg(not(target_arch = "wasm32"))]
        if let Ok(root) = std::env::var(RESOURCE_DIR_ENV) {
            return Self::new(root);
        }
        Self::new(DEFAULT_RESOURCE_DIR)
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn path(&self, file_name: &str) -> std::path::PathBuf {
        std::path::Path::new(&self.root).join(file_name)
    }

    #[cfg(target_arch = "wasm32")]
    fn url(&self, file_name: &str) -> anyhow::Result<reqwest::Url> {
        let window = web_sys::window().context("no browser window")?;
        let origin = window
            .location()
            .origin()
            .map_err(|_| anyhow::anyhow!("the page origin is unavailable"))?;
        let base = reqwest::Url::parse(&format!("{}/{}/", origin, self.root.trim_matches('/')))?;
        Ok(base.join(file_name)?)
    }
}

impl Default for ResourceDir {
    fn default() -> Self {
        Self::from_env()
    }
}

impl AssetSource for ResourceDir {
    async fn load_string(&self, file_name: &str) -> anyhow::Result<String> {
        #[cfg(target_arch = "wasm32")]
        let txt = {
            let url = self.url(file_name)?;
            reqwest::get(url.clone())
                .await?
                .error_for_status()?
                .text()
                .await
                .with_context(|| format!("reading {url}"))?
        };
        #[cfg(not(target_arch = "wasm32"))]
        let txt = {
            let path = self.path(file_name);
            tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("reading {}", path.display()))?
        };

        Ok(txt)
    }

    async fn load_binary(&self, file_name: &str) -> anyhow::Result<Vec<u8>> {
        #[cfg(target_arch = "wasm32")]
        let data = {
            let url = self.url(file_name)?;
            reqwest::get(url.clone())
                .await?
                .error_for_status()?
                .bytes()
                .await
                .with_context(|| format!("reading {url}"))?
                .to_vec()
        };
        #[cfg(not(target_arch = "wasm32"))]
        let data = {
            let path = self.path(file_name);
            tokio::fs::read(&path)
                .await
                .with_context(|| format!("reading {}", path.display()))?
        };

        Ok(data)
    }
}
