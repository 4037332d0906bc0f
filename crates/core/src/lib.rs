pub mod challenge;
pub mod detection;
pub mod pipeline;
pub mod shared;
