mod fetch;
mod model;

pub use fetch::{fetch_item, fetch_listing_page, item_url, listing_url};
pub use model::{ItemDetail, ItemResponse, ListItem, ListResponse, MediaRef, Pagination};
