/*-------------------------------------------------------------------------------------------------
  Core Modules
-------------------------------------------------------------------------------------------------*/

pub mod allowlist;
pub mod builtin;
pub mod check;
pub mod client;
pub mod config;
pub mod contribution;
pub mod coverage;
pub mod errors;
pub mod filter;
pub mod json;
pub mod network;
