use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::reservation::hhmm;

#[derive(Debug, Deserialize)]
pub struct ReservedTimesQuery {
    pub date: NaiveDate,
}

#[derive(Debug, Serialize)]
pub struct ReservedTimeResponse {
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
}

impl From<(NaiveTime, NaiveTime)> for ReservedTimeResponse {
    fn from((start, end): (NaiveTime, NaiveTime)) -> Self {
        Self { start, end }
    }
}
