pub mod fetcher;
pub mod resolver;
pub mod web;
