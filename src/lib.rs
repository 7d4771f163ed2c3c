//! ons_rs
//!
//! A small Rust library for discovering the dimensions of datasets published on the
//! ONS dataset API and fetching their observations. Pairs with the `ons` CLI.
//!
//! ### Features
//! - List published datasets and find one by (partial) title
//! - List every dimension of a dataset with its valid options
//! - Fetch observations for a selection, wildcarding any dimension (usually time)
//! - Sort, summarize, and save observations as CSV or JSON
//!
//! ### Example
//! ```no_run
//! use ons_rs::{Client, Selection};
//!
//! let client = Client::default();
//! let series = client.get_timeseries("cpih01", &Selection::new().with("geography", "K02000001"))?;
//! let mut obs = series.observations.observations;
//! ons_rs::stats::sort_chronologically(&mut obs);
//! ons_rs::storage::save_csv(&obs, "cpih01.csv")?;
//! println!("{:#?}", ons_rs::stats::summarize(&obs));
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod stats;
pub mod storage;
pub mod transport;

pub use api::{Client, choose_dimensions, find_dataset_by_name};
pub use config::ClientConfig;
pub use error::{ApiError, ErrorKind};
pub use models::{Choice, Dimension, DimensionOption, Dimensions, Observation, Observations, Selection};
pub use transport::{HttpResponse, HttpTransport, Transport};
