//! Loads page analyses from a crawler CSV export.

mod parser;

use crate::workflows::scoring::PageAnalysis;
use std::io::Read;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum CrawlImportError {
    #[error("failed to read crawl export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid crawl CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: invalid value '{value}' in column {column}")]
    InvalidField {
        row: usize,
        column: &'static str,
        value: String,
    },
}

pub struct CrawlExportImporter;

impl CrawlExportImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<PageAnalysis>, CrawlImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<PageAnalysis>, CrawlImportError> {
        parser::parse_pages(reader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const HEADER: &str = "url,depth,page_type,title,meta_description,h1_count,h1_text,word_count,load_time,status_code,is_indexable,has_canonical,canonical_points_to_self,has_thin_content,missing_alt_images_count,internal_links_count,has_viewport,ttfb,redirect_chain_length";

    fn export(rows: &[&str]) -> Cursor<String> {
        let mut body = String::from(HEADER);
        for row in rows {
            body.push('\n');
            body.push_str(row);
        }
        Cursor::new(body)
    }

    #[test]
    fn parses_a_crawler_export() {
        let data = export(&[
            "https://example.com/,0,home,,Leather goods,1,Welcome,420,1.2,200,true,true,yes,false,0,50,1,0.3,0",
            "https://example.com/blog/care, 2 ,landing,Care guide,,0,,90,4.5,301,no,false,,TRUE,3,0,0,,2",
        ]);

        let pages = CrawlExportImporter::from_reader(data).expect("export parses");

        assert_eq!(pages.len(), 2);
        let home = &pages[0];
        assert_eq!(home.url, "https://example.com/");
        assert_eq!(home.page_type, "home");
        assert_eq!(home.title, None);
        assert!(home.title_missing());
        assert_eq!(home.internal_links_count, 50);
        assert_eq!(home.canonical_points_to_self, Some(true));
        assert_eq!(home.ttfb, Some(0.3));
        assert!(home.has_viewport);

        let article = &pages[1];
        assert_eq!(article.depth, 2);
        assert_eq!(article.page_type, "landing");
        assert_eq!(article.meta_description, None);
        assert_eq!(article.h1_text, None);
        assert_eq!(article.status_code, 301);
        assert!(!article.is_indexable);
        assert_eq!(article.canonical_points_to_self, None);
        assert!(article.has_thin_content);
        assert_eq!(article.ttfb, None);
        assert_eq!(article.redirect_chain_length, 2);
    }

    #[test]
    fn reports_row_and_column_for_bad_values() {
        let data = export(&[
            "https://example.com/,0,home,Home,Shop,1,,420,1.2,200,true,true,true,false,0,50,true,0.3,0",
            "https://example.com/a,1,category,A,Shop,1,,300,1.0,200,sometimes,true,true,false,0,4,true,0.2,0",
        ]);

        let err = CrawlExportImporter::from_reader(data).expect_err("bad flag is rejected");

        match &err {
            CrawlImportError::InvalidField { row, column, value } => {
                assert_eq!(*row, 2);
                assert_eq!(*column, "is_indexable");
                assert_eq!(value, "sometimes");
            }
            other => panic!("expected invalid field, got {other:?}"),
        }
        assert!(err.to_string().contains("row 2"));
    }

    #[test]
    fn blank_required_numbers_are_invalid() {
        let data = export(&[
            "https://example.com/,,home,Home,Shop,1,,420,1.2,200,true,true,true,false,0,50,true,0.3,0",
        ]);

        match CrawlExportImporter::from_reader(data) {
            Err(CrawlImportError::InvalidField { column, .. }) => assert_eq!(column, "depth"),
            other => panic!("expected invalid depth, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = CrawlExportImporter::from_path("/definitely/not/here.csv")
            .expect_err("missing file fails");
        assert!(matches!(err, CrawlImportError::Io(_)));
    }
}
