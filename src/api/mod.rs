/// Download records handed over by the transport layer: [SegmentDownloadEvent](transport::SegmentDownloadEvent).
pub mod transport;

/// Some unit types, such as [DataSize](units::DataSize) and [TimeDelta](units::TimeDelta).
pub mod units;
