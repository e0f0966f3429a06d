pub mod config;
pub mod controller;
pub mod discovery;
pub mod error;
pub mod layout;
pub mod markup;
pub mod navigation;
pub mod page;
pub mod readiness;
pub mod runtime;
pub mod startup;

#[cfg(not(target_arch = "wasm32"))]
pub mod probe;
#[cfg(not(target_arch = "wasm32"))]
pub mod server;
#[cfg(feature = "wasm")]
pub mod wasm;

use config::FlipbookConfig;
use discovery::AssetProbe;
use error::Result;
use page::Book;

/// Discover the pages of a book with any probe.
pub async fn discover_book<P: AssetProbe + ?Sized>(
    probe: &P,
    config: &FlipbookConfig,
) -> Result<Book> {
    discovery::discover(probe, &config.assets).await
}

/// Render the page markup fragment for a discovered book.
pub fn render_book_html(book: &Book, config: &FlipbookConfig) -> String {
    markup::render_pages_html(&markup::build_pages(book, config))
}

/// Discover a book directory on disk and render its page markup.
#[cfg(not(target_arch = "wasm32"))]
pub async fn render_dir(dir: &std::path::Path, config: &FlipbookConfig) -> Result<String> {
    let probe = probe::FsProbe::new(dir);
    let book = discover_book(&probe, config).await?;
    Ok(render_book_html(&book, config))
}
