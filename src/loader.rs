//! Document loader: resolves a `schemaLocation`/WSDL URI to bytes,
//! de-duplicating by canonical URI so cyclic `import`/`include` chains
//! terminate (§4.1).

use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

#[cfg(feature = "tracing")]
use tracing::debug;

use crate::error::{Error, Result};

/// Tunables an embedder can set; the core applies no implicit retry or
/// timeout policy of its own beyond what an injected `reqwest::Client`
/// is configured with.
#[derive(Default)]
pub struct LoaderConfig {
    /// Directory schemaLocations are resolved against when the owning
    /// namespace isn't an `http(s)://` URL (or the HTTP attempt fails).
    pub local_schema_dir: Option<PathBuf>,
    /// A pre-configured HTTP client; a default one is built if omitted.
    pub http_client: Option<reqwest::blocking::Client>,
}

/// Fetches documents and remembers which canonical URIs were already
/// loaded, so a nested parser asking for the same URI a second time is
/// told to skip rather than re-parse (breaking import/include cycles).
pub struct Loader {
    config: LoaderConfig,
    client: reqwest::blocking::Client,
    loaded: HashSet<String>,
}

/// What a resolved load looks like to the caller.
pub enum Loaded {
    /// First time this canonical URI has been requested; here are the bytes.
    Fresh { canonical_uri: String, bytes: Vec<u8> },
    /// Already loaded earlier in this session; the caller should treat the
    /// nested import/include as a no-op rather than re-parsing.
    AlreadyLoaded { canonical_uri: String },
}

impl Loader {
    pub fn new(config: LoaderConfig) -> Self {
        let client = config.http_client.clone().unwrap_or_else(|| {
            reqwest::blocking::Client::builder()
                .redirect(reqwest::redirect::Policy::none())
                .build()
                .unwrap_or_else(|_| reqwest::blocking::Client::new())
        });
        Loader {
            config,
            client,
            loaded: HashSet::new(),
        }
    }

    fn is_url(s: &str) -> bool {
        s.starts_with("http://") || s.starts_with("https://")
    }

    /// Resolve `location` (a `schemaLocation`/WSDL URI, possibly relative)
    /// against `namespace_hint` (the enclosing target namespace, if any),
    /// load it unless already loaded, and record it as loaded.
    pub fn load(&mut self, location: &str, namespace_hint: Option<&str>) -> Result<Loaded> {
        let (canonical_uri, bytes) = if Self::is_url(location) {
            (location.to_string(), self.fetch_http(location)?)
        } else if let Some(ns) = namespace_hint.filter(|ns| Self::is_url(ns)) {
            let remote = join_namespace(ns, location);
            match self.fetch_http(&remote) {
                Ok(bytes) => (remote, bytes),
                Err(_) => self.fetch_file(location)?,
            }
        } else {
            self.fetch_file(location)?
        };

        if !self.loaded.insert(canonical_uri.clone()) {
            return Ok(Loaded::AlreadyLoaded { canonical_uri });
        }

        #[cfg(feature = "tracing")]
        debug!(uri = %canonical_uri, "loaded document");

        Ok(Loaded::Fresh { canonical_uri, bytes })
    }

    /// Share this loader's "already loaded" set with a nested parser's
    /// loader instance, per §4.4 rule 3.
    pub fn loaded_uris(&self) -> HashSet<String> {
        self.loaded.clone()
    }

    pub fn adopt_loaded_uris(&mut self, uris: HashSet<String>) {
        self.loaded.extend(uris);
    }

    fn fetch_http(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().map_err(|e| Error::LoadFailed {
            uri: url.to_string(),
            cause: e.to_string(),
        })?;

        // reqwest follows redirects by default with a bounded policy; the
        // spec asks for exactly one hop honored explicitly, so disable
        // automatic redirect handling and follow a single 3xx ourselves.
        let response = if response.status().is_redirection() {
            let target = response
                .headers()
                .get(reqwest::header::LOCATION)
                .and_then(|v| v.to_str().ok())
                .map(|s| s.to_string())
                .ok_or_else(|| Error::LoadFailed {
                    uri: url.to_string(),
                    cause: "redirect with no Location header".to_string(),
                })?;
            self.client.get(&target).send().map_err(|e| Error::LoadFailed {
                uri: target.clone(),
                cause: e.to_string(),
            })?
        } else {
            response
        };

        if !response.status().is_success() {
            return Err(Error::LoadFailed {
                uri: url.to_string(),
                cause: format!("HTTP {}", response.status()),
            });
        }

        response.bytes().map(|b| b.to_vec()).map_err(|e| Error::LoadFailed {
            uri: url.to_string(),
            cause: e.to_string(),
        })
    }

    fn fetch_file(&self, location: &str) -> Result<(String, Vec<u8>)> {
        let path = match &self.config.local_schema_dir {
            Some(dir) => dir.join(location),
            None => PathBuf::from(location),
        };
        let bytes = fs::read(&path).map_err(|e| Error::LoadFailed {
            uri: path.display().to_string(),
            cause: e.to_string(),
        })?;
        let canonical = fs::canonicalize(&path)
            .map(|p| p.display().to_string())
            .unwrap_or_else(|_| path.display().to_string());
        Ok((canonical, bytes))
    }
}

/// The loader's exact (non-URL-joining) concatenation rule for turning a
/// relative schemaLocation into a remote URL when the owning namespace is
/// itself an http(s) URL.
fn join_namespace(namespace: &str, location: &str) -> String {
    if namespace.ends_with('/') {
        format!("{namespace}{location}")
    } else {
        format!("{namespace}/{location}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn join_namespace_inserts_separator() {
        assert_eq!(
            join_namespace("http://tempuri.org", "types.xsd"),
            "http://tempuri.org/types.xsd"
        );
        assert_eq!(
            join_namespace("http://tempuri.org/", "types.xsd"),
            "http://tempuri.org/types.xsd"
        );
    }

    #[test]
    fn loads_local_file_once_then_reports_already_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("types.xsd");
        let mut f = fs::File::create(&file_path).unwrap();
        f.write_all(b"<schema/>").unwrap();

        let mut loader = Loader::new(LoaderConfig {
            local_schema_dir: Some(dir.path().to_path_buf()),
            http_client: None,
        });

        match loader.load("types.xsd", None).unwrap() {
            Loaded::Fresh { bytes, .. } => assert_eq!(bytes, b"<schema/>"),
            Loaded::AlreadyLoaded { .. } => panic!("expected fresh load"),
        }

        match loader.load("types.xsd", None).unwrap() {
            Loaded::Fresh { .. } => panic!("expected cached load"),
            Loaded::AlreadyLoaded { .. } => {}
        }
    }

    #[test]
    fn missing_file_fails_with_load_failed() {
        let mut loader = Loader::new(LoaderConfig::default());
        let err = loader.load("/no/such/file.xsd", None).unwrap_err();
        assert!(matches!(err, Error::LoadFailed { .. }));
    }
}
