// Problem bank browsing for the worksheet builder: remote fetch, local multi-select
// filtering and textbook autocomplete.

pub mod filter;
pub mod handlers;
