//! Embeddable community server widget: a live channel list, online member
//! roster and invite button rendered into mount points of a host document.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use discord_widget::{Document, HttpProvider, WidgetOptions, init_widgets};
//!
//! # async fn run() {
//! let page = Document::parse(
//!     r#"<div class="discord-widget"><div class="discord-content"></div></div>"#,
//! );
//! let options = WidgetOptions {
//!     server_id: Some("81384788765712384".into()),
//!     ..Default::default()
//! };
//! let provider = Arc::new(HttpProvider::new("https://discord.com"));
//! init_widgets(&page, options, provider).finished().await;
//! println!("{}", page.to_html());
//! # }
//! ```

pub mod config;
pub mod dom;
pub mod engine;
pub mod error;
pub mod provider;
pub mod render;
pub mod widget;


pub use config::{WidgetConfig, WidgetOptions};
pub use dom::{Document, Element};
pub use error::WidgetError;
pub use provider::{HttpProvider, RemoteSnapshot, SnapshotProvider, StaticProvider};
pub use widget::{WidgetLoad, init_widgets};
