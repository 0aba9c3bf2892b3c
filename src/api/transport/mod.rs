mod segment_download;

pub use segment_download::*;
