use crate::index::error::IndexError;
use crate::station_data::error::StationDataError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HistoricDataError {
    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    StationData(#[from] StationDataError),
}
