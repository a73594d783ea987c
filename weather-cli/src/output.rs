use amap_weather_core::{Forecast, LiveWeather, WeatherReport};
use anyhow::bail;
use chrono::NaiveDateTime;
use std::fmt::{self, Write};

/// Render a provider report for the terminal.
pub fn render(report: &WeatherReport) -> anyhow::Result<String> {
    if !report.is_ok() {
        bail!("AMap returned an error: {} (infocode {})", report.info, report.infocode);
    }

    let mut out = String::new();

    for live in &report.lives {
        render_live(&mut out, live)?;
    }
    for forecast in &report.forecasts {
        render_forecast(&mut out, forecast)?;
    }

    if out.is_empty() {
        out.push_str("No weather data for this location.");
    }

    Ok(out.trim_end().to_string())
}

fn render_live(out: &mut String, live: &LiveWeather) -> fmt::Result {
    writeln!(out, "{} ({})", live.city, live.province)?;
    writeln!(out, "  Weather:     {}", live.weather)?;
    writeln!(out, "  Temperature: {}°C", live.temperature)?;
    writeln!(out, "  Humidity:    {}%", live.humidity)?;
    writeln!(out, "  Wind:        {} {}", live.wind_direction, live.wind_power)?;
    writeln!(out, "  Reported:    {}", reported(live.reported_at(), &live.report_time))
}

fn render_forecast(out: &mut String, forecast: &Forecast) -> fmt::Result {
    writeln!(out, "{} ({})", forecast.city, forecast.province)?;
    writeln!(
        out,
        "  Reported: {}",
        reported(forecast.reported_at(), &forecast.report_time)
    )?;

    for cast in &forecast.casts {
        let date = cast
            .date()
            .map(|d| d.format("%a %m-%d").to_string())
            .unwrap_or_else(|| cast.date.clone());

        writeln!(
            out,
            "  {date}: {} / {}, {}~{}°C, wind {} {}",
            cast.day_weather,
            cast.night_weather,
            cast.night_temp,
            cast.day_temp,
            cast.day_wind,
            cast.day_power,
        )?;
    }

    Ok(())
}

fn reported(parsed: Option<NaiveDateTime>, raw: &str) -> String {
    parsed.map(|t| t.format("%Y-%m-%d %H:%M").to_string()).unwrap_or_else(|| raw.to_string())
}
