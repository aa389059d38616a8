//! Chart image URLs for metric series.
//!
//! Rendering is delegated to an image chart service speaking the Google
//! Image Charts query format; this module only builds the URL.

use url::Url;

use crate::error::TrustError;
use crate::metrics::MetricSeries;

/// Chart width in pixels.
pub const WIDTH: u32 = 400;

/// Chart height in pixels.
pub const HEIGHT: u32 = 250;

/// Line color of the single series.
pub const SERIES_COLOR: &str = "0000cc";

/// Build the image URL of a line chart for `series`.
///
/// The chart is auto-scaled, has a transparent background and the legend on
/// top.
///
/// # Errors
/// Returns [`TrustError::Config`] if `base_url` is not a valid URL.
pub fn line_chart_url(base_url: &str, series: &MetricSeries) -> Result<String, TrustError> {
    let mut url = Url::parse(base_url)
        .map_err(|e| TrustError::Config(format!("invalid chart URL {base_url:?}: {e}")))?;

    {
        let mut query = url.query_pairs_mut();
        query
            .append_pair("cht", "lc")
            .append_pair("chs", &format!("{WIDTH}x{HEIGHT}"));

        if let Some(title) = &series.title {
            query.append_pair("chtt", title);
        }

        query
            .append_pair("chd", &format!("t:{}", encode_values(&series.values)))
            .append_pair("chds", "a")
            .append_pair("chco", SERIES_COLOR)
            .append_pair("chdl", &series.label)
            .append_pair("chdlp", "t")
            .append_pair("chf", "bg,s,00000000");
    }

    Ok(url.into())
}

/// Text encoding: comma separated values at full precision.
fn encode_values(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| if *v == 0.0 { "0".to_string() } else { v.to_string() })
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(title: Option<&str>) -> MetricSeries {
        MetricSeries {
            name: "TransactionCount".to_string(),
            title: title.map(str::to_string),
            label: "All Instances (in Billions)".to_string(),
            values: vec![5.0, 6.25, 7.123],
            labels: vec![
                "2024-01-01".to_string(),
                "2024-01-02".to_string(),
                "2024-01-03".to_string(),
            ],
        }
    }

    fn params(url: &str) -> Vec<(String, String)> {
        Url::parse(url)
            .unwrap()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    fn param<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
        pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_chart_url_parameters() {
        let url = line_chart_url(
            "https://chart.googleapis.com/chart",
            &series(Some("Daily Transaction Count")),
        )
        .unwrap();
        assert!(url.starts_with("https://chart.googleapis.com/chart?cht=lc&"));

        let pairs = params(&url);
        assert_eq!(param(&pairs, "chs"), Some("400x250"));
        assert_eq!(param(&pairs, "chtt"), Some("Daily Transaction Count"));
        assert_eq!(param(&pairs, "chd"), Some("t:5,6.25,7.123"));
        assert_eq!(param(&pairs, "chds"), Some("a"));
        assert_eq!(param(&pairs, "chco"), Some("0000cc"));
        assert_eq!(param(&pairs, "chdl"), Some("All Instances (in Billions)"));
        assert_eq!(param(&pairs, "chdlp"), Some("t"));
        assert_eq!(param(&pairs, "chf"), Some("bg,s,00000000"));
    }

    #[test]
    fn test_chart_url_without_title() {
        let url = line_chart_url("https://chart.googleapis.com/chart", &series(None)).unwrap();
        assert!(param(&params(&url), "chtt").is_none());
    }

    #[test]
    fn test_invalid_base_url() {
        let err = line_chart_url("not a url", &series(None)).unwrap_err();
        assert!(matches!(err, TrustError::Config(_)));
    }

    #[test]
    fn test_encode_values() {
        assert_eq!(encode_values(&[]), "");
        assert_eq!(encode_values(&[0.0, 10.0, 1.5, -0.0]), "0,10,1.5,0");
        assert_eq!(encode_values(&[5.123_456_789, 0.001]), "5.123456789,0.001");
    }
}
