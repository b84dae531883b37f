//! Discovery of the available stations from the historic-station-data index
//! page: scrape the anchor elements, keep the hrefs under the data file
//! prefix, and derive station keys from the filenames.

use crate::fetch::TextFetcher;
use crate::index::error::IndexError;
use scraper::{Html, Selector};

/// Index page listing every station with a published data file.
pub const INDEX_URL: &str =
    "https://www.metoffice.gov.uk/research/climate/maps-and-data/historic-station-data";

/// Every station data file lives directly under this prefix.
pub const STATION_DATA_PREFIX: &str =
    "https://www.metoffice.gov.uk/pub/data/weather/uk/climate/stationdata/";

/// Data file URLs linked from the index page, in document order.
///
/// The page is fetched anew on every call, so re-enumerating always reflects
/// the currently published index.
pub fn station_urls(
    fetcher: &dyn TextFetcher,
    index_url: &str,
) -> Result<Vec<String>, IndexError> {
    let html = fetcher.fetch_text(index_url)?;
    Ok(extract_station_urls(&html))
}

/// Station keys for every data file linked from the index page.
pub fn station_names(
    fetcher: &dyn TextFetcher,
    index_url: &str,
) -> Result<Vec<String>, IndexError> {
    Ok(station_urls(fetcher, index_url)?
        .iter()
        .map(|url| derive_station_name(url))
        .collect())
}

/// Pulls the href of every anchor element pointing at a station data file.
/// Malformed markup degrades to however many links the parser still sees.
pub fn extract_station_urls(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let anchors = Selector::parse("a[href]").expect("anchor selector is valid");
    document
        .select(&anchors)
        .filter_map(|element| element.value().attr("href"))
        .filter(|href| href.starts_with(STATION_DATA_PREFIX))
        .map(str::to_string)
        .collect()
}

/// Infers the station key from a data file URL: the final path segment with
/// its extension and the trailing `data` suffix removed, so
/// `.../stationdata/ballypatrickdata.txt` yields `ballypatrick`.
pub fn derive_station_name(url: &str) -> String {
    let file = url.rsplit('/').next().unwrap_or(url);
    let stem = file.rsplit_once('.').map_or(file, |(stem, _)| stem);
    stem.strip_suffix("data").unwrap_or(stem).to_string()
}

/// The canonical download URL for a station key such as `ballypatrick`.
pub fn build_station_url(name: &str) -> String {
    format!("{}{}data.txt", STATION_DATA_PREFIX, name)
}
