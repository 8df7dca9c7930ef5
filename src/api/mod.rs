pub mod kambi_api;

pub use kambi_api::{FetchBatch, FetchFailure, KambiClient};
