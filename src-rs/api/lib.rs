pub mod client;
pub mod types;

pub use client::HttpRepairApi;
#[cfg(test)]
pub use types::MockRepairApi;
pub use types::{open_envelope, Attachment, RepairApi};
