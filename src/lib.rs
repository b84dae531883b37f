mod error;
mod fetch;
mod index;
mod metoffice;
mod station_data;
mod types;

pub use error::HistoricDataError;
pub use metoffice::*;

pub use fetch::{FetchError, HttpTextFetcher, TextFetcher};

pub use index::discover::{
    build_station_url, derive_station_name, INDEX_URL, STATION_DATA_PREFIX,
};
pub use index::error::IndexError;

pub use station_data::error::StationDataError;
pub use station_data::parser::parse_station_text;

pub use types::{MonthlyRecord, StationDataset};
