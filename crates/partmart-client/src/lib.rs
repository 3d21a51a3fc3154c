pub mod client;
pub mod coerce;
pub mod error;
pub mod feed;
pub mod image;
pub mod normalize;
pub(crate) mod retry;
pub mod types;

pub use client::PartsClient;
pub use error::ClientError;
pub use feed::{refresh_feed, FeedState, ListingFeed, RequestTicket, Resolution};
pub use image::{placeholder_url, resolve_image_url};
pub use normalize::{normalize_part, normalize_part_detail};
pub use types::{Pagination, PartDetail, PartsPage, PartsQuery, RawPartRecord};
