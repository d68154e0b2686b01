//! Market data access port trait.

use crate::domain::error::TidetraderError;
use crate::domain::ohlcv::Bar;
use crate::domain::simulator::Timeframe;

pub trait DataPort {
    /// Full OHLCV history for one symbol and timeframe, sorted by
    /// timestamp ascending.
    fn fetch_ohlcv(&self, symbol: &str, timeframe: Timeframe)
        -> Result<Vec<Bar>, TidetraderError>;

    fn list_symbols(&self) -> Result<Vec<String>, TidetraderError>;
}
