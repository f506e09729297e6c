//! NSE stock screener around the 200-week moving average.
//!
//! Fetches historical prices from Yahoo Finance, computes trailing means,
//! and serves buy/avoid recommendations and watch-list tables over HTTP.

pub mod cli;
pub mod commands;
pub mod constants;
pub mod error;
pub mod models;
pub mod server;
pub mod services;
