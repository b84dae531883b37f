use crate::types::monthly::MonthlyRecord;

/// A station's full parsed time series.
///
/// Records keep the file's original order (chronological by construction).
/// Latitude and longitude come from the file header and are absent when no
/// header line carried them. The parser produces a dataset with an empty
/// station name; the cache layer tags it before storing, after which the
/// dataset is shared immutably.
#[derive(Debug, PartialEq, Clone)]
pub struct StationDataset {
    pub station: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub records: Vec<MonthlyRecord>,
}

impl StationDataset {
    /// Attaches the station key to the dataset and to every record, so rows
    /// stay attributable when datasets are concatenated downstream.
    pub(crate) fn tag_station(&mut self, name: &str) {
        self.station = name.to_string();
        for record in &mut self.records {
            record.station = name.to_string();
        }
    }
}
