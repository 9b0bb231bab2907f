pub mod basis;
pub mod batch;
pub mod correlation;
pub mod features;
pub mod graph;
pub mod output;
pub mod pipeline;
pub mod prune;
pub mod stats;
pub mod tree;
