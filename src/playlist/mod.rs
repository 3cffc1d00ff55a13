mod ledger;
mod provider;
mod store;

pub use ledger::FailureLedger;
pub use provider::{
    generate_sources, is_valid_source, CatalogPlaylistProvider, CatalogStrategy, Playlist,
    PlaylistProvider, StaticPlaylistProvider,
};
pub use store::{CatalogStore, FileCatalogStore, MemoryCatalogStore};
