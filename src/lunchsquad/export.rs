use crate::catalog::Catalog;
use crate::error::{ExportError, Result};
use crate::model::Order;
use crate::presenter::{self, SortKey};
use crate::report::{self, ReportFont};
use chrono::{DateTime, Local};
use image::codecs::png::PngEncoder;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const CSV_HEADER: [&str; 5] = ["Time", "Name", "Restaurant", "Order", "Details"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Json,
    Csv,
    Text,
    Image,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [
        ExportFormat::Json,
        ExportFormat::Csv,
        ExportFormat::Text,
        ExportFormat::Image,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            ExportFormat::Json => "lunch_orders.json",
            ExportFormat::Csv => "lunch_orders.csv",
            ExportFormat::Text => "lunch_orders.txt",
            ExportFormat::Image => "lunch_orders.png",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Text => "txt",
            ExportFormat::Image => "png",
        };
        f.write_str(name)
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "txt" | "text" => Ok(ExportFormat::Text),
            "png" | "image" => Ok(ExportFormat::Image),
            _ => Err(format!("Unknown export format: {} (expected json, csv, txt or png)", s)),
        }
    }
}

/// Inputs to an export besides the orders themselves.
#[derive(Debug, Clone)]
pub struct ExportContext<'a> {
    pub generated_at: DateTime<Local>,
    pub sort: SortKey,
    /// TrueType candidates for the image report.
    pub font_paths: &'a [PathBuf],
}

impl<'a> ExportContext<'a> {
    pub fn new(font_paths: &'a [PathBuf]) -> Self {
        Self {
            generated_at: Local::now(),
            sort: SortKey::default(),
            font_paths,
        }
    }
}

/// Serialize orders into the bytes of a downloadable file.
pub fn export(
    orders: &[Order],
    catalog: &Catalog,
    format: ExportFormat,
    ctx: &ExportContext,
) -> Result<Vec<u8>> {
    match format {
        ExportFormat::Json => Ok(serde_json::to_vec_pretty(orders)?),
        ExportFormat::Csv => Ok(to_csv(orders, catalog, ctx.sort)?),
        ExportFormat::Text => {
            Ok(report::text_report(orders, catalog, ctx.generated_at).into_bytes())
        }
        ExportFormat::Image => {
            let font = ReportFont::load(ctx.font_paths);
            Ok(to_png(orders, catalog, &font, ctx.generated_at)?)
        }
    }
}

fn to_csv(
    orders: &[Order],
    catalog: &Catalog,
    sort: SortKey,
) -> std::result::Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;
    for row in presenter::project(orders, catalog, sort) {
        writer.write_record([
            &row.timestamp,
            &row.submitter,
            &row.restaurant,
            &row.summary,
            &row.detail,
        ])?;
    }
    writer
        .into_inner()
        .map_err(|e| ExportError::Csv(e.into_error().into()))
}

fn to_png(
    orders: &[Order],
    catalog: &Catalog,
    font: &ReportFont,
    generated_at: DateTime<Local>,
) -> std::result::Result<Vec<u8>, ExportError> {
    let img = report::image_report(orders, catalog, font, generated_at).ok_or(ExportError::Empty)?;
    let mut buffer = Vec::new();
    img.write_with_encoder(PngEncoder::new(&mut buffer))?;
    Ok(buffer)
}

/// Write an export payload into `dir` under the format's fixed file name.
pub fn write_to(dir: &Path, format: ExportFormat, bytes: &[u8]) -> Result<PathBuf> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    let path = dir.join(format.file_name());
    fs::write(&path, bytes)?;
    Ok(path)
}
