//! Validated choice between URL and path inputs.

use csvgeo_core::Row;
use log::debug;

use crate::error::{ProviderError, SourceError};
use crate::reader::{read_from_glob, read_many, read_one};
use crate::transport::CsvTransport;

/// The inputs a request reads from, decided once per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSelection {
    /// Usable URLs or local CSV files, read in order.
    Urls(Vec<String>),
    /// Glob pattern selecting local files.
    Path(String),
}

impl SourceSelection {
    /// Choose between the resolved `urls` and the configured `path` pattern.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::MissingSource`] when neither is present and
    /// [`ProviderError::AmbiguousSource`] when both are.
    ///
    /// # Examples
    ///
    /// ```
    /// use csvgeo_data::{ProviderError, SourceSelection};
    ///
    /// let selection = SourceSelection::choose(Vec::new(), Some("data/*.csv"))?;
    /// assert_eq!(selection, SourceSelection::Path("data/*.csv".to_owned()));
    /// assert_eq!(
    ///     SourceSelection::choose(Vec::new(), None),
    ///     Err(ProviderError::MissingSource)
    /// );
    /// # Ok::<(), ProviderError>(())
    /// ```
    pub fn choose(urls: Vec<String>, path: Option<&str>) -> Result<Self, ProviderError> {
        let pattern = path.filter(|pattern| !pattern.is_empty());
        match (urls.is_empty(), pattern) {
            (true, None) => Err(ProviderError::MissingSource),
            (false, Some(_)) => Err(ProviderError::AmbiguousSource),
            (false, None) => Ok(Self::Urls(urls)),
            (true, Some(pattern)) => Ok(Self::Path(pattern.to_owned())),
        }
    }

    /// Read every row the selection names.
    ///
    /// # Errors
    ///
    /// Propagates the first [`SourceError`] raised while reading.
    pub async fn read<T>(&self, transport: &T) -> Result<Vec<Row>, SourceError>
    where
        T: CsvTransport + ?Sized,
    {
        match self {
            Self::Urls(urls) => match urls.as_slice() {
                [single] => {
                    debug!("reading single location {single}");
                    read_one(transport, single).await
                }
                many => {
                    debug!("reading {} locations in order", many.len());
                    read_many(transport, many).await
                }
            },
            Self::Path(pattern) => {
                debug!("reading files matching {pattern:?}");
                read_from_glob(pattern).await
            }
        }
    }
}
