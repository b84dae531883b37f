//! The main entry point for the historic station data archive: discovery of
//! the available stations and cached retrieval of their parsed datasets.

use crate::error::HistoricDataError;
use crate::fetch::{HttpTextFetcher, TextFetcher};
use crate::index::discover::{self, INDEX_URL};
use crate::station_data::cache::DatasetCache;
use crate::types::StationDataset;
use log::info;
use std::sync::Arc;

/// Client for the historic station data archive.
///
/// Holds an in-memory cache of parsed datasets keyed by station name: the
/// first request for a station downloads and parses its data file, every
/// later request returns the cached result. The cache lives as long as the
/// client; there is no eviction or refresh.
///
/// # Examples
///
/// ```no_run
/// use metoffice_historic::HistoricStations;
///
/// # fn run() -> Result<(), metoffice_historic::HistoricDataError> {
/// let client = HistoricStations::new();
/// let dataset = client.get_dataset("ballypatrick")?;
/// println!("{} records at lat {:?}", dataset.records.len(), dataset.latitude);
/// # Ok(())
/// # }
/// ```
pub struct HistoricStations {
    fetcher: Box<dyn TextFetcher>,
    cache: DatasetCache,
    index_url: String,
}

impl HistoricStations {
    /// Creates a client that downloads over HTTP from the live archive.
    pub fn new() -> Self {
        Self::with_fetcher(Box::new(HttpTextFetcher::new()))
    }

    /// Creates a client with a custom download implementation. Tests inject
    /// a canned fetcher here instead of hitting the network.
    pub fn with_fetcher(fetcher: Box<dyn TextFetcher>) -> Self {
        Self {
            fetcher,
            cache: DatasetCache::new(),
            index_url: INDEX_URL.to_string(),
        }
    }

    /// Overrides the index page URL, e.g. to point at a mirror.
    pub fn with_index_url(mut self, url: impl Into<String>) -> Self {
        self.index_url = url.into();
        self
    }

    /// Returns the dataset for a station that is already in the cache,
    /// without touching the network.
    pub fn cached(&self, name: &str) -> Option<Arc<StationDataset>> {
        self.cache.get(name)
    }

    /// Returns the dataset for a station name or a station data file URL.
    ///
    /// An input containing `/` is treated as a URL and the station name is
    /// inferred from it; anything else is taken as a station name and the
    /// canonical URL is derived. Either spelling resolves to the same cache
    /// entry, and only the first call for a station touches the network.
    ///
    /// # Errors
    ///
    /// [`HistoricDataError::StationData`] when the download fails or the
    /// file does not have the expected layout. The failed station stays out
    /// of the cache, so a later call retries.
    pub fn get_dataset(
        &self,
        name_or_url: &str,
    ) -> Result<Arc<StationDataset>, HistoricDataError> {
        let (name, url) = if name_or_url.contains('/') {
            (
                discover::derive_station_name(name_or_url),
                name_or_url.to_string(),
            )
        } else {
            (
                name_or_url.to_string(),
                discover::build_station_url(name_or_url),
            )
        };
        Ok(self.cache.get_or_fetch(&name, &url, self.fetcher.as_ref())?)
    }

    /// Data file URLs for every station currently listed on the index page.
    /// The index page is fetched anew on each call.
    pub fn station_urls(&self) -> Result<Vec<String>, HistoricDataError> {
        Ok(discover::station_urls(
            self.fetcher.as_ref(),
            &self.index_url,
        )?)
    }

    /// Station keys for every station currently listed on the index page.
    pub fn station_names(&self) -> Result<Vec<String>, HistoricDataError> {
        Ok(discover::station_names(
            self.fetcher.as_ref(),
            &self.index_url,
        )?)
    }

    /// Loads every discoverable station into the cache. Stops at the first
    /// failing station.
    pub fn load_all(&self) -> Result<(), HistoricDataError> {
        for name in self.station_names()? {
            info!("load {}", name);
            self.get_dataset(&name)?;
        }
        Ok(())
    }
}

impl Default for HistoricStations {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::{FetchError, TextFetcher};
    use crate::index::discover::build_station_url;
    use crate::station_data::error::StationDataError;
    use std::collections::HashMap;
    use std::sync::Mutex;

    const BALLYPATRICK_FILE: &str = r#"Ballypatrick Forest
Location 3147E 4296N, Lat 55.18 Lon -6.15, 156 metres amsl
yyyy  mm   tmax   tmin   af   rain   sun
           degC   degC   days   mm   hours
1990   1    8.2    2.1   12   95.4   45.0
1990   2    ---    1.5    5   60.0   30.0
"#;

    const OXFORD_FILE: &str = r#"Oxford
Location 4509E 2072N, Lat 51.76 Lon -1.26, 63 metres amsl
yyyy  mm   tmax   tmin   af   rain   sun
           degC   degC   days   mm   hours
1853   1    8.4    2.7    4   62.8    ---
"#;

    const INDEX_PAGE: &str = r#"<html><body>
<a href="https://www.metoffice.gov.uk/pub/data/weather/uk/climate/stationdata/ballypatrickdata.txt">Ballypatrick</a>
<a href="https://www.metoffice.gov.uk/pub/data/weather/uk/climate/stationdata/oxforddata.txt">Oxford</a>
<a href="https://www.metoffice.gov.uk/about-us">About</a>
</body></html>"#;

    const TEST_INDEX_URL: &str = "https://index.test/historic-station-data";

    /// Serves canned bodies and records every requested URL, so tests can
    /// assert how often the network would have been touched.
    struct FakeFetcher {
        responses: HashMap<String, String>,
        requests: Mutex<Vec<String>>,
    }

    impl FakeFetcher {
        fn new(responses: &[(&str, &str)]) -> Arc<Self> {
            Arc::new(Self {
                responses: responses
                    .iter()
                    .map(|(url, body)| (url.to_string(), body.to_string()))
                    .collect(),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn request_count(&self, url: &str) -> usize {
            self.requests
                .lock()
                .unwrap()
                .iter()
                .filter(|requested| *requested == url)
                .count()
        }
    }

    impl TextFetcher for Arc<FakeFetcher> {
        fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
            self.requests.lock().unwrap().push(url.to_string());
            match self.responses.get(url) {
                Some(body) => Ok(body.clone()),
                None => panic!("unexpected URL requested: {}", url),
            }
        }
    }

    fn ballypatrick_client() -> (Arc<FakeFetcher>, HistoricStations) {
        let url = build_station_url("ballypatrick");
        let fetcher = FakeFetcher::new(&[(url.as_str(), BALLYPATRICK_FILE)]);
        let client = HistoricStations::with_fetcher(Box::new(Arc::clone(&fetcher)));
        (fetcher, client)
    }

    #[test]
    fn get_dataset_parses_and_tags() {
        let (_, client) = ballypatrick_client();

        let dataset = client.get_dataset("ballypatrick").unwrap();

        assert_eq!(dataset.station, "ballypatrick");
        assert_eq!(dataset.latitude, Some(55.18));
        assert_eq!(dataset.longitude, Some(-6.15));
        assert_eq!(dataset.records.len(), 2);
        assert!(dataset
            .records
            .iter()
            .all(|record| record.station == "ballypatrick"));
    }

    #[test]
    fn second_get_returns_cached_dataset_without_refetch() {
        let (fetcher, client) = ballypatrick_client();
        let url = build_station_url("ballypatrick");

        let first = client.get_dataset("ballypatrick").unwrap();
        let second = client.get_dataset("ballypatrick").unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(fetcher.request_count(&url), 1);
    }

    #[test]
    fn name_and_url_resolve_to_the_same_entry() {
        let (fetcher, client) = ballypatrick_client();
        let url = build_station_url("ballypatrick");

        let by_name = client.get_dataset("ballypatrick").unwrap();
        let by_url = client.get_dataset(&url).unwrap();

        assert!(Arc::ptr_eq(&by_name, &by_url));
        assert_eq!(fetcher.request_count(&url), 1);
    }

    #[test]
    fn malformed_file_is_an_error_and_stays_uncached() {
        let url = build_station_url("oxford");
        let fetcher = FakeFetcher::new(&[(url.as_str(), "<html>not a station file</html>")]);
        let client = HistoricStations::with_fetcher(Box::new(Arc::clone(&fetcher)));

        let error = client.get_dataset("oxford").unwrap_err();
        assert!(matches!(
            error,
            HistoricDataError::StationData(StationDataError::MissingUnitsHeader)
        ));
        assert!(client.cached("oxford").is_none());

        // Not cached: the next call fetches again.
        let _ = client.get_dataset("oxford").unwrap_err();
        assert_eq!(fetcher.request_count(&url), 2);
    }

    #[test]
    fn station_names_come_from_the_index_page() {
        let fetcher = FakeFetcher::new(&[(TEST_INDEX_URL, INDEX_PAGE)]);
        let client = HistoricStations::with_fetcher(Box::new(Arc::clone(&fetcher)))
            .with_index_url(TEST_INDEX_URL);

        assert_eq!(client.station_names().unwrap(), ["ballypatrick", "oxford"]);
        assert_eq!(fetcher.request_count(TEST_INDEX_URL), 1);
    }

    #[test]
    fn load_all_populates_the_cache() {
        let ballypatrick_url = build_station_url("ballypatrick");
        let oxford_url = build_station_url("oxford");
        let fetcher = FakeFetcher::new(&[
            (TEST_INDEX_URL, INDEX_PAGE),
            (ballypatrick_url.as_str(), BALLYPATRICK_FILE),
            (oxford_url.as_str(), OXFORD_FILE),
        ]);
        let client = HistoricStations::with_fetcher(Box::new(Arc::clone(&fetcher)))
            .with_index_url(TEST_INDEX_URL);

        client.load_all().unwrap();

        // Everything is cached now; further gets stay off the network.
        assert!(client.cached("ballypatrick").is_some());
        let oxford = client.get_dataset("oxford").unwrap();
        assert_eq!(oxford.records[0].year, 1853);
        assert_eq!(oxford.records[0].sunshine_hours, None);
        assert_eq!(fetcher.request_count(&ballypatrick_url), 1);
        assert_eq!(fetcher.request_count(&oxford_url), 1);
    }
}
