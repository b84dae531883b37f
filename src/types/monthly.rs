use chrono::NaiveDate;

/// One row of a station's data file.
///
/// Every observation field may be absent: the archive renders missing values
/// as `-`/`--`/`---` sentinels, and fields that fail best-effort conversion
/// are treated the same way.
#[derive(Debug, PartialEq, Clone)]
pub struct MonthlyRecord {
    pub station: String,             // station key, filled when the dataset is tagged
    pub year: i32,                   // yyyy
    pub month: u32,                  // mm
    pub max_temp_c: Option<f64>,     // tmax (mean daily maximum, degC)
    pub min_temp_c: Option<f64>,     // tmin (mean daily minimum, degC)
    pub air_frost_days: Option<u32>, // af (days of air frost)
    pub rainfall_mm: Option<f64>,    // rain (total mm)
    pub sunshine_hours: Option<f64>, // sun (total hours)
}

impl MonthlyRecord {
    /// First day of the month this record covers, if the month number is a
    /// real calendar month.
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }
}
