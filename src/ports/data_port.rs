//! Data access port traits.
//!
//! The domain only ever sees already-validated records or a typed failure;
//! network/storage specifics stay behind these traits.

use crate::domain::error::OracleError;
use crate::domain::ohlcv::PriceBar;
use crate::domain::sentiment::SentimentObservation;

pub trait PriceDataPort {
    /// Fetch the daily price series for one instrument, ascending by date.
    fn fetch_prices(&self, instrument: &str) -> Result<Vec<PriceBar>, OracleError>;
}

pub trait SentimentDataPort {
    /// Fetch raw sentiment observations for one instrument. An instrument
    /// with no sentiment data yields an empty vec, not an error.
    fn fetch_observations(&self, instrument: &str)
        -> Result<Vec<SentimentObservation>, OracleError>;
}
