//! Per-site spreadsheet reports with embedded thumbnails.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, FormatAlign, Formula, Image, Workbook, Worksheet};
use tracing::info;

use crate::config::CategoryTarget;
use crate::extractor::vocab;
use crate::models::{ResultRecord, ResultStore};

/// Fixed report column set, in sheet order.
pub const REPORT_COLUMNS: [&str; 30] = [
    "결과",
    "상품넘버",
    "거래처",
    "단가",
    "이미지",
    "1차",
    "2차",
    "3차",
    "4차",
    "필터",
    "성별",
    "브랜드",
    "2차 브랜드",
    "상품명",
    "영문명",
    "추가 정보\n모델명",
    "추가 정보\n배송방법",
    "추가 정보\n소재",
    "추가 정보\n구성품",
    "매장가",
    "판매가1",
    "판매가2",
    "판매가3",
    "필수옵션\n등급선택",
    "필수옵션\n사이즈",
    "필수옵션\n색상",
    "필수옵션\n굽높이",
    "필수옵션\n버클",
    "필수옵션\n도금방식",
    "필수옵션\n밴드",
];

/// Zero-based positions of the hyperlink and thumbnail columns.
const HYPERLINK_COL: u16 = 1;
const IMAGE_COL: u16 = 4;

/// Embedded thumbnail edge length in pixels, and the row height that fits it.
const THUMB_SIZE: f64 = 80.0;
const IMAGE_ROW_HEIGHT: f64 = 65.0;

/// Width overrides; unlisted columns keep the sheet default.
const COLUMN_WIDTHS: &[(u16, f64)] = &[
    (1, 18.0),   // B 상품넘버
    (4, 12.0),   // E 이미지
    (5, 8.25),   // F 1차
    (6, 11.25),  // G 2차
    (7, 12.75),  // H 3차
    (10, 12.75), // K 성별
    (11, 15.0),  // L 브랜드
    (13, 39.0),  // N 상품명
    (14, 22.5),  // O 영문명
    (15, 12.0),
    (16, 12.0),
    (17, 12.0),
    (18, 12.0),
    (19, 12.0),
    (20, 12.0),
    (21, 12.0),
    (22, 12.0),
    (23, 12.0),
    (24, 20.0), // Y 필수옵션 사이즈
    (25, 20.0), // Z 필수옵션 색상
    (26, 12.0),
    (27, 12.0),
    (28, 12.0),
    (29, 12.0),
];

/// Blank any extracted value that escaped the closed vocabularies. The
/// second-level check is against the flattened list only, not the record's
/// own first-level group.
pub fn validate_vocabulary(store: &mut ResultStore) {
    for record in store.iter_mut() {
        if !vocab::is_known_brand(&record.brand) {
            record.brand.clear();
        }
        if !vocab::is_known_first_category(&record.first_category) {
            record.first_category.clear();
        }
        if !vocab::is_known_second_category(&record.second_category) {
            record.second_category.clear();
        }
    }
}

pub struct ReportBuilder {
    output_dir: PathBuf,
    timestamp: String,
}

impl ReportBuilder {
    pub fn new(output_dir: impl Into<PathBuf>, timestamp: &str) -> Self {
        ReportBuilder {
            output_dir: output_dir.into(),
            timestamp: timestamp.to_string(),
        }
    }

    /// Emit one workbook per configured site that accumulated records.
    /// Returns the written file paths.
    pub fn write_reports(
        &self,
        store: &ResultStore,
        targets: &[CategoryTarget],
    ) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();

        for site_name in unique_site_names(targets) {
            let rows: Vec<&ResultRecord> =
                store.iter().filter(|r| r.vendor == site_name).collect();
            if rows.is_empty() {
                continue;
            }

            let path = self.output_dir.join(format!(
                "result_{}_{}_{}.xlsx",
                site_name,
                rows.len(),
                self.timestamp
            ));
            write_site_report(&path, &rows)
                .with_context(|| format!("failed to write report for {site_name}"))?;

            info!("[{site_name}] report written: {} rows", rows.len());
            written.push(path);
        }

        Ok(written)
    }
}

fn unique_site_names(targets: &[CategoryTarget]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for target in targets {
        if !names.contains(&target.site_name) {
            names.push(target.site_name.clone());
        }
    }
    names
}

fn write_site_report(path: &Path, rows: &[&ResultRecord]) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    let cell_format = Format::new()
        .set_font_name("Arial")
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_text_wrap();

    for (col, header) in REPORT_COLUMNS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &cell_format)?;
    }

    for (i, record) in rows.iter().enumerate() {
        let row = (i + 1) as u32;
        let mut cells = record_cells(record);

        if !record.thumbnail.is_empty() && Path::new(&record.thumbnail).exists() {
            embed_thumbnail(worksheet, row, &record.thumbnail)?;
            cells[IMAGE_COL as usize].clear();
        }

        for (col, value) in cells.iter().enumerate() {
            if col as u16 == HYPERLINK_COL {
                worksheet.write_formula_with_format(
                    row,
                    col as u16,
                    Formula::new(value.as_str()),
                    &cell_format,
                )?;
            } else {
                worksheet.write_string_with_format(row, col as u16, value.as_str(), &cell_format)?;
            }
        }
    }

    for (col, width) in COLUMN_WIDTHS {
        worksheet.set_column_width(*col, *width)?;
    }

    workbook.save(path)?;
    Ok(())
}

fn embed_thumbnail(worksheet: &mut Worksheet, row: u32, thumbnail: &str) -> Result<()> {
    let image = Image::new(thumbnail)?.set_scale_to_size(THUMB_SIZE, THUMB_SIZE, false);
    worksheet.insert_image(row, IMAGE_COL, &image)?;
    worksheet.set_row_height(row, IMAGE_ROW_HEIGHT)?;
    Ok(())
}

/// Flatten one record into the 30-column row. Columns with no extracted
/// counterpart stay blank for manual fill.
fn record_cells(record: &ResultRecord) -> [String; 30] {
    [
        record.outcome.label().to_string(),
        record.product_ref.clone(),
        record.vendor.clone(),
        record.unit_price.clone(),
        record.thumbnail.clone(),
        String::new(), // 1차
        record.first_category.clone(),
        record.second_category.clone(),
        String::new(), // 4차
        String::new(), // 필터
        record.gender.clone(),
        record.brand.clone(),
        String::new(), // 2차 브랜드
        record.kor_name.clone(),
        record.eng_name.clone(),
        record.model_number.clone(),
        record.shipping.clone(),
        String::new(), // 소재
        record.package_note.clone(),
        record.market_price.clone(),
        String::new(), // 판매가1
        String::new(), // 판매가2
        String::new(), // 판매가3
        String::new(), // 등급선택
        record.sizes.clone(),
        record.colors.clone(),
        String::new(), // 굽높이
        String::new(), // 버클
        String::new(), // 도금방식
        String::new(), // 밴드
    ]
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use crate::models::Outcome;

    use super::*;

    fn record(url: &str, vendor: &str) -> ResultRecord {
        ResultRecord::new(url, vendor, "20250101120000")
    }

    #[test]
    fn test_validate_vocabulary_blanks_unknown_values() {
        let mut store = ResultStore::new();
        let mut bad = record("http://a/1", "site");
        bad.brand = "NOTABRAND".to_string();
        bad.first_category = "없는 카테고리".to_string();
        bad.second_category = "없는 분류".to_string();
        store.insert("http://a/1", bad);

        let mut good = record("http://a/2", "site");
        good.brand = "GUCCI".to_string();
        good.first_category = "가방".to_string();
        good.second_category = "백팩".to_string();
        store.insert("http://a/2", good);

        validate_vocabulary(&mut store);

        let bad = store.get("http://a/1").unwrap();
        assert!(bad.brand.is_empty());
        assert!(bad.first_category.is_empty());
        assert!(bad.second_category.is_empty());

        let good = store.get("http://a/2").unwrap();
        assert_eq!(good.brand, "GUCCI");
        assert_eq!(good.first_category, "가방");
        assert_eq!(good.second_category, "백팩");
    }

    #[test]
    fn test_second_category_validation_ignores_first_level_grouping() {
        let mut store = ResultStore::new();
        let mut crossed = record("http://a/1", "site");
        crossed.first_category = "가방".to_string();
        // Second level from the 시계 group survives the flattened check.
        crossed.second_category = "메탈".to_string();
        store.insert("http://a/1", crossed);

        validate_vocabulary(&mut store);
        assert_eq!(store.get("http://a/1").unwrap().second_category, "메탈");
    }

    #[test]
    fn test_record_cells_layout() {
        let mut rec = record("http://a/1", "퀄엔드");
        rec.outcome = Outcome::Success;
        rec.brand = "GUCCI".to_string();
        rec.sizes = "S[90]".to_string();
        rec.colors = "블랙".to_string();

        let cells = record_cells(&rec);
        assert_eq!(cells.len(), REPORT_COLUMNS.len());
        assert_eq!(cells[0], "성공");
        assert_eq!(cells[2], "퀄엔드");
        assert_eq!(cells[11], "GUCCI");
        assert_eq!(cells[16], "항공특송");
        assert_eq!(cells[18], "풀박스");
        assert_eq!(cells[24], "S[90]");
        assert_eq!(cells[25], "블랙");
    }

    #[test]
    fn test_write_reports_groups_by_site() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ResultStore::new();

        let mut a = record("http://a/1", "퀄엔드");
        a.outcome = Outcome::Success;
        store.insert("http://a/1", a);
        let mut b = record("http://b/1", "바이헤븐");
        b.outcome = Outcome::Failure;
        store.insert("http://b/1", b);

        let targets = vec![
            CategoryTarget {
                site_name: "퀄엔드".to_string(),
                category_name: "가방".to_string(),
                category_url: "http://a".to_string(),
            },
            CategoryTarget {
                site_name: "바이헤븐".to_string(),
                category_name: "신발".to_string(),
                category_url: "http://b".to_string(),
            },
            CategoryTarget {
                site_name: "빈 사이트".to_string(),
                category_name: "지갑".to_string(),
                category_url: "http://c".to_string(),
            },
        ];

        let builder = ReportBuilder::new(dir.path(), "20250101120000");
        let written = builder.write_reports(&store, &targets).unwrap();

        assert_eq!(written.len(), 2);
        assert!(written[0].ends_with("result_퀄엔드_1_20250101120000.xlsx"));
        assert!(written[1].ends_with("result_바이헤븐_1_20250101120000.xlsx"));
        assert!(written.iter().all(|p| p.exists()));
    }

    #[test]
    fn test_write_reports_embeds_existing_thumbnail() {
        let dir = tempfile::tempdir().unwrap();

        let img = image::DynamicImage::ImageRgb8(image::RgbImage::new(300, 300));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
        let thumb_path = dir.path().join("0.jpg");
        std::fs::write(&thumb_path, buf.into_inner()).unwrap();

        let mut store = ResultStore::new();
        let mut rec = record("http://a/1", "퀄엔드");
        rec.outcome = Outcome::Success;
        rec.thumbnail = thumb_path.to_string_lossy().into_owned();
        store.insert("http://a/1", rec);

        let targets = vec![CategoryTarget {
            site_name: "퀄엔드".to_string(),
            category_name: "가방".to_string(),
            category_url: "http://a".to_string(),
        }];

        let builder = ReportBuilder::new(dir.path(), "20250101120000");
        let written = builder.write_reports(&store, &targets).unwrap();
        assert_eq!(written.len(), 1);
        assert!(written[0].exists());
    }
}
