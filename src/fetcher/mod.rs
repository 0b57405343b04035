pub mod asset_fetcher;

pub use asset_fetcher::{AssetFetcher, FETCH_TIMEOUT, FetchError, HttpAssetFetcher};
