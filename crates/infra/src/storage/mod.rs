//! Object storage adapters.

pub mod presigned;

pub use presigned::PresignedUploader;
