mod dataset;
mod monthly;

pub use dataset::StationDataset;
pub use monthly::MonthlyRecord;
