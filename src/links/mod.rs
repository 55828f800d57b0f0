pub mod detector;
pub mod fetch;
pub mod resolver;
pub mod title;
pub mod types;

pub use detector::{detect_urls, first_url};
pub use resolver::TitleResolver;
pub use title::title_from_html;
pub use types::{FetchedPage, LinkConfig};
