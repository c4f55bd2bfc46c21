use super::CrawlImportError;
use crate::workflows::scoring::PageAnalysis;
use serde::{Deserialize, Deserializer};
use std::io::Read;
use std::str::FromStr;

pub(crate) fn parse_pages<R: Read>(reader: R) -> Result<Vec<PageAnalysis>, CrawlImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut pages = Vec::new();

    for (index, record) in csv_reader.deserialize::<CrawlRow>().enumerate() {
        let row = record?;
        pages.push(row.into_page(index + 1)?);
    }

    Ok(pages)
}

/// One line of a crawler export. Columns follow the page analysis field names.
#[derive(Debug, Deserialize)]
struct CrawlRow {
    url: String,
    depth: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    page_type: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    title: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    meta_description: Option<String>,
    h1_count: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    h1_text: Option<String>,
    word_count: String,
    load_time: String,
    status_code: String,
    is_indexable: String,
    has_canonical: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    canonical_points_to_self: Option<String>,
    has_thin_content: String,
    missing_alt_images_count: String,
    internal_links_count: String,
    has_viewport: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    ttfb: Option<String>,
    #[serde(default)]
    redirect_chain_length: String,
}

impl CrawlRow {
    fn into_page(self, row: usize) -> Result<PageAnalysis, CrawlImportError> {
        let field = Field { row };
        let canonical_points_to_self = self
            .canonical_points_to_self
            .map(|value| field.flag("canonical_points_to_self", &value))
            .transpose()?;
        let ttfb = self
            .ttfb
            .map(|value| field.seconds("ttfb", &value))
            .transpose()?;
        let redirect_chain_length = if self.redirect_chain_length.is_empty() {
            0
        } else {
            field.number("redirect_chain_length", &self.redirect_chain_length)?
        };

        if self.url.is_empty() {
            return Err(field.invalid("url", &self.url));
        }

        Ok(PageAnalysis {
            depth: field.number("depth", &self.depth)?,
            page_type: self.page_type.unwrap_or_else(|| "other".to_string()),
            title: self.title,
            meta_description: self.meta_description,
            h1_count: field.number("h1_count", &self.h1_count)?,
            h1_text: self.h1_text,
            word_count: field.number("word_count", &self.word_count)?,
            load_time: field.seconds("load_time", &self.load_time)?,
            status_code: field.number("status_code", &self.status_code)?,
            is_indexable: field.flag("is_indexable", &self.is_indexable)?,
            has_canonical: field.flag("has_canonical", &self.has_canonical)?,
            canonical_points_to_self,
            has_thin_content: field.flag("has_thin_content", &self.has_thin_content)?,
            missing_alt_images_count: field
                .number("missing_alt_images_count", &self.missing_alt_images_count)?,
            internal_links_count: field.number("internal_links_count", &self.internal_links_count)?,
            has_viewport: field.flag("has_viewport", &self.has_viewport)?,
            ttfb,
            redirect_chain_length,
            url: self.url,
        })
    }
}

/// Converts raw cells of a single row, tagging failures with their position.
struct Field {
    row: usize,
}

impl Field {
    fn number<T: FromStr>(&self, column: &'static str, value: &str) -> Result<T, CrawlImportError> {
        value.parse().map_err(|_| self.invalid(column, value))
    }

    fn seconds(&self, column: &'static str, value: &str) -> Result<f64, CrawlImportError> {
        match value.parse::<f64>() {
            Ok(seconds) if seconds.is_finite() && seconds >= 0.0 => Ok(seconds),
            _ => Err(self.invalid(column, value)),
        }
    }

    fn flag(&self, column: &'static str, value: &str) -> Result<bool, CrawlImportError> {
        parse_flag(value).ok_or_else(|| self.invalid(column, value))
    }

    fn invalid(&self, column: &'static str, value: &str) -> CrawlImportError {
        CrawlImportError::InvalidField {
            row: self.row,
            column,
            value: value.to_string(),
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_accept_common_spellings() {
        for raw in ["true", "TRUE", "1", "yes", " Yes "] {
            assert_eq!(parse_flag(raw), Some(true), "{raw}");
        }
        for raw in ["false", "0", "no", "No"] {
            assert_eq!(parse_flag(raw), Some(false), "{raw}");
        }
        assert_eq!(parse_flag("maybe"), None);
        assert_eq!(parse_flag(""), None);
    }

    #[test]
    fn negative_timings_are_rejected() {
        let field = Field { row: 4 };
        assert!(field.seconds("load_time", "1.5").is_ok());
        match field.seconds("load_time", "-0.2") {
            Err(CrawlImportError::InvalidField { row, column, value }) => {
                assert_eq!(row, 4);
                assert_eq!(column, "load_time");
                assert_eq!(value, "-0.2");
            }
            other => panic!("expected invalid field, got {other:?}"),
        }
    }
}
