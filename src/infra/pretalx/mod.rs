pub mod client;
pub mod pages;

pub use client::PretalxClient;
pub use pages::{Page, fetch_all_pages};
