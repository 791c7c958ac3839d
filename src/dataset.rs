use crate::error::{DiscretizeError, LoadError};
use crate::{Discretization, KMeansDiscretizer, Observation, ObservationSet};
use log::{debug, info, warn};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// One observation set per numeric column of a delimited table.
#[derive(Clone, Debug, Default)]
pub struct Dataset {
    columns: Vec<ObservationSet>,
}

impl Dataset {
    pub fn new(columns: Vec<ObservationSet>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[ObservationSet] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&ObservationSet> {
        self.columns.iter().find(|c| c.name() == name)
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Discretizes every column with the same configuration, in column
    /// order. Stops at the first column that fails. Columns are left sorted.
    pub fn discretize(
        &mut self,
        discretizer: &KMeansDiscretizer,
    ) -> Result<Vec<Discretization>, DiscretizeError> {
        self.columns
            .iter_mut()
            .map(|column| {
                info!(
                    "discretizing column '{}' ({} values) into {} intervals",
                    column.name(),
                    column.len(),
                    discretizer.n_intervals()
                );
                discretizer.discretize(column)
            })
            .collect()
    }
}

/// Reads delimited text with a header row into a [`Dataset`].
///
/// Every field that parses as a finite number becomes an observation of the
/// column at its position; anything else is skipped. Columns that end up
/// with no values are dropped.
#[derive(Clone, Debug)]
pub struct DatasetReader {
    delimiter: char,
    label_column: Option<String>,
}

impl Default for DatasetReader {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetReader {
    pub fn new() -> Self {
        Self {
            delimiter: ';',
            label_column: None,
        }
    }

    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Header name of a column whose field is attached as the label of every
    /// value read from the same record.
    pub fn label_column(mut self, name: &str) -> Self {
        self.label_column = Some(name.to_string());
        self
    }

    pub fn open<P: AsRef<Path>>(&self, path: P) -> Result<Dataset, LoadError> {
        let file = File::open(path.as_ref())?;
        debug!("reading dataset from {}", path.as_ref().display());
        self.read(BufReader::new(file))
    }

    pub fn read<R: BufRead>(&self, reader: R) -> Result<Dataset, LoadError> {
        let mut lines = reader.lines();

        let header = match lines.next() {
            Some(line) => line?,
            None => return Err(LoadError::MissingHeader),
        };
        if header.trim().is_empty() {
            return Err(LoadError::MissingHeader);
        }

        let mut columns: Vec<ObservationSet> = header
            .split(self.delimiter)
            .map(|name| ObservationSet::new(name.trim()))
            .collect();

        let label_index = match &self.label_column {
            Some(name) => Some(
                columns
                    .iter()
                    .position(|c| c.name() == name.as_str())
                    .ok_or_else(|| LoadError::UnknownLabelColumn(name.clone()))?,
            ),
            None => None,
        };

        let mut records = 0usize;
        let mut skipped = 0usize;

        for line in lines {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            records += 1;

            let fields: Vec<&str> = line.split(self.delimiter).map(str::trim).collect();
            let label = label_index.and_then(|i| fields.get(i)).copied().unwrap_or("");

            for (i, field) in fields.iter().enumerate() {
                if Some(i) == label_index {
                    continue;
                }

                match field.parse::<f64>() {
                    Ok(value) if value.is_finite() => {
                        while columns.len() <= i {
                            let position = columns.len();
                            columns.push(ObservationSet::new(format!("column{}", position)));
                        }
                        columns[i].push(Observation::new(value, label));
                    }
                    _ => skipped += 1,
                }
            }
        }

        let (kept, dropped): (Vec<_>, Vec<_>) =
            columns.into_iter().enumerate().partition(|(i, c)| {
                !c.is_empty() && Some(*i) != label_index
            });

        for (i, column) in &dropped {
            if Some(*i) != label_index {
                warn!("dropping column '{}': no numeric values", column.name());
            }
        }

        debug!(
            "read {} records, kept {} columns, skipped {} non-numeric fields",
            records,
            kept.len(),
            skipped
        );

        Ok(Dataset::new(kept.into_iter().map(|(_, c)| c).collect()))
    }
}
