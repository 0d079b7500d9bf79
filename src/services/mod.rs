pub mod document;
pub mod encoding;
pub mod extract;
pub mod merge;
pub mod pack;
pub mod pipeline;
pub mod stats;
pub mod storage;
