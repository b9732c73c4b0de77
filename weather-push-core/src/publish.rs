//! Delivery of the rendered reports: WxPusher message push and GitHub Pages
//! upload. The two paths are independent; a failure in one never blocks the
//! other.

pub mod pages;
pub mod wxpusher;

pub use pages::PagesPublisher;
pub use wxpusher::WxPusherClient;
