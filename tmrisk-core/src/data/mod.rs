//! Price download, alignment, and the price/return tables.

pub mod align;
pub mod csv_io;
pub mod download;
pub mod frame;
pub mod provider;
pub mod series;
pub mod yahoo;

pub use download::download_prices;
pub use frame::TickerFrame;
pub use provider::{
    ClosePoint, DataError, DataSource, DownloadProgress, FetchResult, InMemoryProvider,
    PriceProvider, SilentProgress, StdoutProgress,
};
pub use series::{PriceSeries, ReturnSeries};
pub use yahoo::YahooProvider;
