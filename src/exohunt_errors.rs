use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExohuntError {
    #[error("HTTP request error: {0}")]
    HttpError(#[from] ureq::Error),

    #[error("CSV parsing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("JSON decoding error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Catalog column not found: {0}")]
    MissingColumn(String),

    #[error("Unexpected archive response: {0}")]
    ArchiveResponse(String),

    #[error("Empty search string")]
    EmptySearchString,

    #[error("Name searches require at least one mission and one author filter")]
    EmptySearchFilter,

    #[error("Could not process any of the selected light curve data")]
    NoUsableSegments,

    #[error("Light curve is empty after {0}")]
    EmptySeries(&'static str),

    #[error("Sample arrays have mismatched lengths: {time} times, {flux} fluxes, {flux_err} errors")]
    SampleLengthMismatch {
        time: usize,
        flux: usize,
        flux_err: usize,
    },

    #[error("Bin width must be positive, got {0}")]
    InvalidBinWidth(f64),

    #[error("Flattening window is too small to fit a degree-{order} polynomial ({window} samples)")]
    DegenerateFlattenWindow { window: usize, order: usize },

    #[error("Period grid is empty: the time span is too short for the requested period range")]
    DegeneratePeriodGrid,

    #[error("Fold period must be positive, got {0}")]
    InvalidFoldPeriod(f64),

    #[error("Strongest peak power {power:.4} is below the configured threshold {threshold:.4}")]
    BelowPowerThreshold { power: f64, threshold: f64 },
}
