//! Social page extractors used by Backstage.
//!
//! Currently only the YouTube channel community tab is implemented. Its pipeline is pure
//! over an already-fetched page; fetching is delegated to a [`youtube::PageFetcher`].
pub mod youtube;
