//! Typed view of the provider's JSON payload.
//!
//! AMap encodes every scalar as a string, so numeric and date accessors
//! parse lazily and return `None` when the provider sends something odd.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const REPORT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    /// `"1"` on success, `"0"` on failure.
    pub status: String,
    #[serde(default)]
    pub count: Option<String>,
    #[serde(default)]
    pub info: String,
    #[serde(default)]
    pub infocode: String,
    #[serde(default)]
    pub lives: Vec<LiveWeather>,
    #[serde(default)]
    pub forecasts: Vec<Forecast>,
}

impl WeatherReport {
    pub(crate) fn deserialize_map(map: &Map<String, Value>) -> Result<Self, serde_json::Error> {
        serde_json::from_value(Value::Object(map.clone()))
    }

    pub fn is_ok(&self) -> bool {
        self.status == "1"
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LiveWeather {
    pub province: String,
    pub city: String,
    pub adcode: String,
    pub weather: String,
    pub temperature: String,
    #[serde(rename = "winddirection")]
    pub wind_direction: String,
    #[serde(rename = "windpower")]
    pub wind_power: String,
    pub humidity: String,
    #[serde(rename = "reporttime")]
    pub report_time: String,
}

impl LiveWeather {
    pub fn temperature_c(&self) -> Option<f64> {
        self.temperature.trim().parse().ok()
    }

    pub fn humidity_pct(&self) -> Option<u8> {
        self.humidity.trim().parse().ok()
    }

    pub fn reported_at(&self) -> Option<NaiveDateTime> {
        parse_report_time(&self.report_time)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub city: String,
    pub adcode: String,
    pub province: String,
    #[serde(rename = "reporttime")]
    pub report_time: String,
    #[serde(default)]
    pub casts: Vec<Cast>,
}

impl Forecast {
    pub fn reported_at(&self) -> Option<NaiveDateTime> {
        parse_report_time(&self.report_time)
    }
}

/// One forecast day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cast {
    pub date: String,
    pub week: String,
    #[serde(rename = "dayweather")]
    pub day_weather: String,
    #[serde(rename = "nightweather")]
    pub night_weather: String,
    #[serde(rename = "daytemp")]
    pub day_temp: String,
    #[serde(rename = "nighttemp")]
    pub night_temp: String,
    #[serde(rename = "daywind")]
    pub day_wind: String,
    #[serde(rename = "nightwind")]
    pub night_wind: String,
    #[serde(rename = "daypower")]
    pub day_power: String,
    #[serde(rename = "nightpower")]
    pub night_power: String,
}

impl Cast {
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()
    }

    pub fn day_temp_c(&self) -> Option<f64> {
        self.day_temp.trim().parse().ok()
    }

    pub fn night_temp_c(&self) -> Option<f64> {
        self.night_temp.trim().parse().ok()
    }
}

fn parse_report_time(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, REPORT_TIME_FORMAT).ok()
}
