//! Core types for Bangkok park PM2.5 data.
//!
//! Reads the wide yearly/monthly source table and reshapes it into one
//! [`observation::Observation`] per park, year and month.

pub mod error;
pub mod month;
pub mod observation;
pub mod park;
pub mod raw_record;
pub mod reshape;
pub mod source;
