use crate::fetch::FetchError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StationDataError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    // The 'degC' units line doubles as a sanity check that the URL points at
    // a station data file in the expected layout.
    #[error("expected 'degC' units header line is missing")]
    MissingUnitsHeader,
}
