pub mod clear;
pub mod config;
pub mod details;
pub mod popular;
pub mod search;
pub mod shell;
pub mod watchlist;
