//! QM item segmentation: quartile scoring of SKUs by quantity and
//! monetary value, with segment labels per product family.

pub mod cohort;
pub mod config;
pub mod engine;
pub mod error;
pub mod inactive;
pub mod item;
pub mod label;
pub mod output;
pub mod pipeline;
pub mod quantile;
pub mod run;
pub mod score;
pub mod source;
pub mod store;
pub mod types;
