pub mod app;
pub mod cli;
pub mod config;
pub mod fetcher;
pub mod filters;
pub mod money;
pub mod output;
pub mod view;

#[cfg(test)]
mod tests;
