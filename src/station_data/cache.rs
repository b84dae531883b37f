use crate::fetch::TextFetcher;
use crate::station_data::error::StationDataError;
use crate::station_data::parser::parse_station_text;
use crate::types::StationDataset;
use log::info;
use std::collections::{hash_map::Entry, HashMap};
use std::sync::{Arc, Mutex};

/// Process-lifetime cache of parsed station datasets, keyed by station name.
/// No eviction and no refresh: a station is fetched at most once per process.
pub struct DatasetCache {
    datasets: Mutex<HashMap<String, Arc<StationDataset>>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self {
            datasets: Mutex::new(HashMap::new()),
        }
    }

    /// Hit-only lookup.
    pub fn get(&self, name: &str) -> Option<Arc<StationDataset>> {
        self.datasets
            .lock()
            .expect("dataset cache mutex poisoned")
            .get(name)
            .cloned()
    }

    /// Returns the cached dataset for `name`, downloading and parsing `url`
    /// on a miss. A fetch or parse error leaves the cache untouched for that
    /// name, so a later call retries from scratch.
    pub fn get_or_fetch(
        &self,
        name: &str,
        url: &str,
        fetcher: &dyn TextFetcher,
    ) -> Result<Arc<StationDataset>, StationDataError> {
        // --- Fast path: already cached ---
        {
            let cache = self.datasets.lock().expect("dataset cache mutex poisoned");
            if let Some(dataset) = cache.get(name) {
                return Ok(Arc::clone(dataset));
            }
        } // lock released before the network round trip

        // --- Slow path: fetch and parse outside the lock ---
        let text = fetcher.fetch_text(url)?;
        let mut dataset = parse_station_text(&text)?;
        dataset.tag_station(name);
        info!(
            "parsed {} monthly records for station {}",
            dataset.records.len(),
            name
        );
        let dataset = Arc::new(dataset);

        let mut cache = self.datasets.lock().expect("dataset cache mutex poisoned");
        match cache.entry(name.to_string()) {
            // Another caller fetched the same station while we were parsing;
            // their copy wins.
            Entry::Occupied(entry) => Ok(Arc::clone(entry.get())),
            Entry::Vacant(entry) => {
                entry.insert(Arc::clone(&dataset));
                Ok(dataset)
            }
        }
    }
}

impl Default for DatasetCache {
    fn default() -> Self {
        Self::new()
    }
}
