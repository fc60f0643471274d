use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use geojson::FeatureCollection;
use tracing::{error, info};

use crate::converter::convert_document;
use crate::error::{ConversionWarning, Gpx2GeoJsonError};
use crate::options::ConvertOptions;
use crate::parser::load_gpx;

type Result<T> = std::result::Result<T, Gpx2GeoJsonError>;

/// Summary of one converted file.
#[derive(Debug)]
pub struct FileReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub feature_count: usize,
    pub types: Vec<String>,
    pub warnings: Vec<ConversionWarning>,
}

/// Outcome of one file in a batch.
#[derive(Debug)]
pub struct BatchOutcome {
    pub input: PathBuf,
    pub result: Result<FileReport>,
}

/// Where the GeoJSON for `input` goes: same directory, `.json` extension.
pub fn output_path(input: &Path) -> PathBuf {
    input.with_extension("json")
}

/// Write `collection` to `path` as compact JSON.
pub fn write_geojson(collection: &FeatureCollection, path: &Path) -> Result<()> {
    let write_error = |source| Gpx2GeoJsonError::Write {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(write_error)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, collection)?;
    writer.flush().map_err(write_error)
}

/// Convert the GPX file `input` and write the result to `output`.
pub fn convert_file(input: &Path, output: &Path, opts: &ConvertOptions) -> Result<FileReport> {
    let doc = load_gpx(input)?;
    let conversion = convert_document(&doc, opts);
    write_geojson(&conversion.collection, output)?;

    info!(
        input = %input.display(),
        output = %output.display(),
        features = conversion.collection.features.len(),
        "wrote GeoJSON"
    );

    Ok(FileReport {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
        feature_count: conversion.collection.features.len(),
        types: conversion.types,
        warnings: conversion.warnings,
    })
}

/// Convert every file in `inputs`, each to its [`output_path`].
///
/// Files are independent: a file that fails is logged and reported, and the
/// remaining files are still converted.
pub fn convert_batch<P: AsRef<Path>>(inputs: &[P], opts: &ConvertOptions) -> Vec<BatchOutcome> {
    inputs
        .iter()
        .map(|input| {
            let input = input.as_ref();
            let result = convert_file(input, &output_path(input), opts);
            if let Err(e) = &result {
                error!(input = %input.display(), "conversion failed: {e}");
            }
            BatchOutcome {
                input: input.to_path_buf(),
                result,
            }
        })
        .collect()
}
