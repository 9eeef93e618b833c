//! The comparison facade.

use crate::config::ComparerConfig;
use crate::connect::ConnectionFactory;
use crate::error::CompareError;
use dataset_core::{CompareOptions, ExpectedDataset};
use dataset_verify::{CompareOutcome, DatasetVerifier};
use std::path::Path;
use tracing::info;

/// Compares expected datasets with the database behind a connection string.
///
/// A comparer holds no mutable state. Every call loads its own dataset,
/// acquires its own handle and releases it before returning.
pub struct DbComparer<F: ConnectionFactory> {
    factory: F,
    connection_string: String,
}

impl<F: ConnectionFactory> DbComparer<F> {
    /// Create a comparer. A blank connection string is rejected.
    pub fn new(factory: F, connection_string: impl Into<String>) -> Result<Self, CompareError> {
        let connection_string = connection_string.into();
        if connection_string.trim().is_empty() {
            return Err(CompareError::InvalidConfig(
                "connection string is empty".to_string(),
            ));
        }
        Ok(Self {
            factory,
            connection_string,
        })
    }

    /// Create a comparer from a loaded configuration file.
    pub fn from_config(factory: F, config: &ComparerConfig) -> Result<Self, CompareError> {
        Self::new(factory, config.connection_string.clone())
    }

    pub fn connection_string(&self) -> &str {
        &self.connection_string
    }

    /// Load the dataset at `dataset_file` and compare it with the database.
    ///
    /// The dataset is loaded before any connection is made, so an unreadable
    /// file never touches the database.
    pub async fn compare<P: AsRef<Path>>(
        &self,
        dataset_file: P,
        options: &CompareOptions,
    ) -> Result<CompareOutcome, CompareError> {
        let path = dataset_file.as_ref();
        info!("Loading expected dataset from {}", path.display());
        let dataset = ExpectedDataset::from_file(path)?;
        self.compare_dataset(&dataset, options).await
    }

    /// Compare an already loaded dataset with the database.
    pub async fn compare_dataset(
        &self,
        dataset: &ExpectedDataset,
        options: &CompareOptions,
    ) -> Result<CompareOutcome, CompareError> {
        let handle = self
            .factory
            .connect(&self.connection_string)
            .await
            .map_err(|e| CompareError::Connection(e.into()))?;

        let outcome = DatasetVerifier::new(dataset, options)
            .verify(&handle)
            .await?;
        Ok(outcome)
    }
}
