//! Core domain types shared by every module

pub mod error;
pub mod ids;
