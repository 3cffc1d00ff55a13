use super::store::CatalogStore;
use crate::config::CatalogConfig;
use crate::device::DeviceClass;
use crate::error::PlaylistError;
use std::cmp::Ordering;
use tracing::{info, warn};
use url::Url;

/// Ordered, immutable list of sources for one session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    sources: Vec<String>,
    /// 1-based position to play first because new content was appended
    start_index: Option<usize>,
}

impl Playlist {
    pub fn new(sources: Vec<String>, start_index: Option<usize>) -> Self {
        Self {
            sources,
            start_index,
        }
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.sources.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn start_index(&self) -> Option<usize> {
        self.start_index
    }
}

/// Supplies the playlist for the current device class
pub trait PlaylistProvider: Send {
    fn playlist(&mut self, device: DeviceClass) -> Result<Playlist, PlaylistError>;

    /// Catalog size recorded by an earlier session, for diagnostics
    fn stored_count(&self, _device: DeviceClass) -> Option<u32> {
        None
    }
}

/// Provider returning a fixed list, regardless of device class
#[derive(Debug, Clone)]
pub struct StaticPlaylistProvider {
    playlist: Playlist,
}

impl StaticPlaylistProvider {
    pub fn new(sources: Vec<String>, start_index: Option<usize>) -> Self {
        Self {
            playlist: Playlist::new(sources, start_index),
        }
    }
}

impl PlaylistProvider for StaticPlaylistProvider {
    fn playlist(&mut self, device: DeviceClass) -> Result<Playlist, PlaylistError> {
        if self.playlist.is_empty() {
            return Err(PlaylistError::Empty {
                device: device.to_string(),
            });
        }
        Ok(self.playlist.clone())
    }
}

/// How the first video of a session is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogStrategy {
    Random,
    /// The catalog grew; start on its newest entry (1-based)
    LatestFirst { start: u32 },
}

/// Provider that generates numbered source URLs and remembers catalog sizes
pub struct CatalogPlaylistProvider {
    config: CatalogConfig,
    store: Box<dyn CatalogStore>,
}

impl CatalogPlaylistProvider {
    pub fn new(config: CatalogConfig, store: Box<dyn CatalogStore>) -> Self {
        Self { config, store }
    }

    pub fn count_for(&self, device: DeviceClass) -> u32 {
        match device {
            DeviceClass::Pointer => self.config.desktop_count,
            DeviceClass::Touch => self.config.mobile_count,
        }
    }

    /// Compare the configured catalog size with the stored one and update the store
    pub fn process_count(&mut self, device: DeviceClass) -> Result<CatalogStrategy, PlaylistError> {
        let current = self.count_for(device);
        let stored = self.store.stored_count(device)?;
        let platform = device.catalog_name();

        let strategy = match stored {
            None => {
                self.store.save_count(device, current)?;
                CatalogStrategy::Random
            }
            Some(previous) => match previous.cmp(&current) {
                Ordering::Equal => {
                    info!("{} catalog count unchanged ({})", platform, previous);
                    CatalogStrategy::Random
                }
                Ordering::Greater => {
                    info!("{} catalog count reduced: {} -> {}", platform, previous, current);
                    self.store.save_count(device, current)?;
                    CatalogStrategy::Random
                }
                Ordering::Less => {
                    info!(
                        "{} catalog count increased: {} -> {} (new content)",
                        platform, previous, current
                    );
                    self.store.save_count(device, current)?;
                    CatalogStrategy::LatestFirst { start: current }
                }
            },
        };

        Ok(strategy)
    }
}

impl PlaylistProvider for CatalogPlaylistProvider {
    fn stored_count(&self, device: DeviceClass) -> Option<u32> {
        self.store.stored_count(device).ok().flatten()
    }

    fn playlist(&mut self, device: DeviceClass) -> Result<Playlist, PlaylistError> {
        let sources = generate_sources(
            &self.config.base_url,
            &self.config.extension,
            self.count_for(device),
        )?;
        if sources.is_empty() {
            return Err(PlaylistError::Empty {
                device: device.to_string(),
            });
        }

        let strategy = match self.process_count(device) {
            Ok(strategy) => strategy,
            Err(e) => {
                warn!("Catalog bookkeeping unavailable, using random start: {}", e);
                CatalogStrategy::Random
            }
        };

        let start_index = match strategy {
            CatalogStrategy::Random => None,
            CatalogStrategy::LatestFirst { start } => Some(start as usize),
        };

        info!(
            "Playlist ready for {}: {} sources, strategy {:?}",
            device.catalog_name(),
            sources.len(),
            strategy
        );
        Ok(Playlist::new(sources, start_index))
    }
}

/// Numbered URLs `base + 0001 + extension` up to `count`
pub fn generate_sources(
    base_url: &str,
    extension: &str,
    count: u32,
) -> Result<Vec<String>, PlaylistError> {
    Url::parse(base_url).map_err(|e| PlaylistError::InvalidBaseUrl {
        url: base_url.to_string(),
        details: e.to_string(),
    })?;

    let sources: Vec<String> = (1..=count)
        .map(|number| format!("{}{:04}{}", base_url, number, extension))
        .collect();

    if let Some(invalid) = sources.iter().find(|s| !is_valid_source(s, extension)) {
        return Err(PlaylistError::InvalidBaseUrl {
            url: base_url.to_string(),
            details: format!("{} is not an https URL ending in {}", invalid, extension),
        });
    }

    Ok(sources)
}

/// Sources must be served over https and carry the expected extension
pub fn is_valid_source(source: &str, extension: &str) -> bool {
    match Url::parse(source) {
        Ok(url) => url.scheme() == "https" && url.path().ends_with(extension),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playlist::MemoryCatalogStore;

    fn catalog_config(desktop: u32, mobile: u32) -> CatalogConfig {
        CatalogConfig {
            base_url: "https://cdn.example.com/loop/".to_string(),
            extension: ".mp4".to_string(),
            desktop_count: desktop,
            mobile_count: mobile,
            store_path: String::new(),
            max_failures_per_source: 3,
        }
    }

    #[test]
    fn test_generate_sources_pads_numbers() {
        let sources = generate_sources("https://cdn.example.com/loop/", ".mp4", 3).unwrap();
        assert_eq!(
            sources,
            vec![
                "https://cdn.example.com/loop/0001.mp4",
                "https://cdn.example.com/loop/0002.mp4",
                "https://cdn.example.com/loop/0003.mp4",
            ]
        );
        assert!(generate_sources("nope", ".mp4", 3).is_err());
        assert!(matches!(
            generate_sources("http://cdn.example.com/loop/", ".mp4", 3),
            Err(PlaylistError::InvalidBaseUrl { .. })
        ));
        assert!(generate_sources("https://cdn.example.com/loop/?v=", ".mp4", 1).is_err());
    }

    #[test]
    fn test_is_valid_source() {
        assert!(is_valid_source("https://cdn.example.com/0001.mp4", ".mp4"));
        assert!(!is_valid_source("http://cdn.example.com/0001.mp4", ".mp4"));
        assert!(!is_valid_source("https://cdn.example.com/0001.webm", ".mp4"));
        assert!(!is_valid_source("0001.mp4", ".mp4"));
    }

    #[test]
    fn test_first_session_saves_count_and_randomizes() {
        let mut provider =
            CatalogPlaylistProvider::new(catalog_config(10, 5), Box::new(MemoryCatalogStore::new()));

        let playlist = provider.playlist(DeviceClass::Pointer).unwrap();
        assert_eq!(playlist.len(), 10);
        assert_eq!(playlist.start_index(), None);
        assert_eq!(provider.stored_count(DeviceClass::Pointer), Some(10));
    }

    #[test]
    fn test_grown_catalog_starts_on_newest() {
        let store = MemoryCatalogStore::with_count(DeviceClass::Touch, 3);
        let mut provider = CatalogPlaylistProvider::new(catalog_config(10, 5), Box::new(store));

        let playlist = provider.playlist(DeviceClass::Touch).unwrap();
        assert_eq!(playlist.len(), 5);
        assert_eq!(playlist.start_index(), Some(5));
        assert_eq!(provider.stored_count(DeviceClass::Touch), Some(5));

        // Next session sees the same size again.
        let playlist = provider.playlist(DeviceClass::Touch).unwrap();
        assert_eq!(playlist.start_index(), None);
    }

    #[test]
    fn test_shrunk_catalog_overwrites_store() {
        let store = MemoryCatalogStore::with_count(DeviceClass::Pointer, 80);
        let mut provider = CatalogPlaylistProvider::new(catalog_config(10, 5), Box::new(store));

        assert_eq!(
            provider.process_count(DeviceClass::Pointer).unwrap(),
            CatalogStrategy::Random
        );
        assert_eq!(provider.stored_count(DeviceClass::Pointer), Some(10));
    }

    #[test]
    fn test_empty_catalog_is_an_error() {
        let mut provider =
            CatalogPlaylistProvider::new(catalog_config(10, 0), Box::new(MemoryCatalogStore::new()));
        assert!(matches!(
            provider.playlist(DeviceClass::Touch),
            Err(PlaylistError::Empty { .. })
        ));
    }
}
