//! Plain text records of trained networks.
//!
//! A record holds, in order and separated by whitespace:
//! the input size, the hidden size, every window width,
//! every output weight, then every center's components.
//! [`RbfNetwork::serialize`] places each group on its own line,
//! and each center on its own line:
//!
//! ```text
//! <input_size>
//! <hidden_size>
//! <window_0> ... <window_{h-1}>
//! <weight_0> ... <weight_{h-1}>
//! <center_0_0> ... <center_0_{input_size-1}>
//! ...
//! <center_{h-1}_0> ... <center_{h-1}_{input_size-1}>
//! ```
use super::{NetworkError, RbfNetwork};

use nalgebra::DVector;

use std::error::Error;
use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::num::NonZeroUsize;
use std::path::Path;
use std::str::{FromStr, SplitWhitespace};

/// An error type indicating a network
/// record could not be loaded.
#[derive(Debug)]
pub enum RecordError {
    /// The underlying stream failed.
    Io(io::Error),
    /// The record ended before this field.
    MissingField(String),
    /// This field's token could not be parsed.
    InvalidField { field: String, token: String },
    /// The record's values do not form a valid network.
    InvalidNetwork(NetworkError),
    /// The record has tokens after its last field.
    TrailingData(String),
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "network record i/o failure: {}", e),
            Self::MissingField(field) => write!(f, "network record is missing {}", field),
            Self::InvalidField { field, token } => {
                write!(f, "invalid value {:?} for {} in network record", token, field)
            }
            Self::InvalidNetwork(e) => write!(f, "network record is invalid: {}", e),
            Self::TrailingData(token) => {
                write!(f, "unexpected data {:?} after end of network record", token)
            }
        }
    }
}

impl Error for RecordError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::InvalidNetwork(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for RecordError {
    fn from(e: io::Error) -> RecordError {
        RecordError::Io(e)
    }
}

impl From<NetworkError> for RecordError {
    fn from(e: NetworkError) -> RecordError {
        RecordError::InvalidNetwork(e)
    }
}

/// Sequential reader of a record's whitespace-separated fields.
struct Fields<'a> {
    tokens: SplitWhitespace<'a>,
}

impl<'a> Fields<'a> {
    fn new(record: &'a str) -> Fields<'a> {
        Fields {
            tokens: record.split_whitespace(),
        }
    }

    fn next<T: FromStr>(&mut self, field: impl Fn() -> String) -> Result<T, RecordError> {
        let token = self
            .tokens
            .next()
            .ok_or_else(|| RecordError::MissingField(field()))?;
        token.parse().map_err(|_| RecordError::InvalidField {
            field: field(),
            token: token.to_owned(),
        })
    }

    fn vector(
        &mut self,
        len: usize,
        field: impl Fn(usize) -> String,
    ) -> Result<DVector<f64>, RecordError> {
        let values = (0..len)
            .map(|i| self.next(|| field(i)))
            .collect::<Result<Vec<f64>, RecordError>>()?;
        Ok(DVector::from_vec(values))
    }

    fn finish(mut self) -> Result<(), RecordError> {
        match self.tokens.next() {
            Some(token) => Err(RecordError::TrailingData(token.to_owned())),
            None => Ok(()),
        }
    }
}

fn join(values: impl Iterator<Item = f64>) -> String {
    values.map(|v| v.to_string()).collect::<Vec<_>>().join(" ")
}

impl RbfNetwork {
    /// Returns the network's text record.
    ///
    /// # Examples
    /// ```
    /// use evogen_rbf::networks::RbfNetwork;
    /// use nalgebra::dvector;
    /// use std::num::NonZeroUsize;
    ///
    /// let network = RbfNetwork::from_parts(
    ///     NonZeroUsize::new(2).unwrap(),
    ///     vec![dvector![0.0, 1.0], dvector![2.5, -1.0]],
    ///     dvector![0.5, 1.5],
    ///     dvector![3.0, -0.25],
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(network.serialize(), "2\n2\n0.5 1.5\n3 -0.25\n0 1\n2.5 -1\n");
    /// ```
    pub fn serialize(&self) -> String {
        let mut record = format!(
            "{}\n{}\n{}\n{}\n",
            self.input_size,
            self.hidden_size(),
            join(self.windows.iter().copied()),
            join(self.weights.iter().copied()),
        );
        for center in &self.centers {
            record.push_str(&join(center.iter().copied()));
            record.push('\n');
        }
        record
    }

    /// Writes the network's text record to `writer`.
    pub fn save<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writer.write_all(self.serialize().as_bytes())
    }

    /// Writes the network's text record to the file at `path`,
    /// creating or truncating it.
    pub fn save_to_path(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        self.save(&mut writer)?;
        writer.flush()?;
        log::debug!(
            "saved network with {} hidden units to {}",
            self.hidden_size(),
            path.display()
        );
        Ok(())
    }

    /// Reads a network from a text record, as written by
    /// [`save`] or [`serialize`].
    ///
    /// # Errors
    /// Returns an error if reading fails, a field is missing or
    /// cannot be parsed, extra data follows the record, or the
    /// values do not describe a valid network.
    ///
    /// [`save`]: RbfNetwork::save
    /// [`serialize`]: RbfNetwork::serialize
    ///
    /// # Examples
    /// ```
    /// use evogen_rbf::networks::{RbfNetwork, RecordError};
    ///
    /// let network = RbfNetwork::load("1\n2\n0.5 0.5\n1 -1\n0\n1\n".as_bytes()).unwrap();
    /// assert_eq!(network.hidden_size(), 2);
    /// assert_eq!(network.centers()[1][0], 1.0);
    /// assert_eq!(RbfNetwork::load(network.serialize().as_bytes()).unwrap(), network);
    ///
    /// // Truncated records are rejected.
    /// assert!(matches!(
    ///     RbfNetwork::load("1\n2\n0.5 0.5\n1".as_bytes()),
    ///     Err(RecordError::MissingField(_))
    /// ));
    /// ```
    pub fn load<R: Read>(mut reader: R) -> Result<RbfNetwork, RecordError> {
        let mut record = String::new();
        reader.read_to_string(&mut record)?;
        let mut fields = Fields::new(&record);

        let input_size: usize = fields.next(|| "input size".into())?;
        let input_size = NonZeroUsize::new(input_size).ok_or(NetworkError::InvalidDimension {
            expected: 1,
            found: 0,
        })?;
        let hidden_size: usize = fields.next(|| "hidden size".into())?;
        let windows = fields.vector(hidden_size, |i| format!("window {}", i))?;
        let weights = fields.vector(hidden_size, |i| format!("weight {}", i))?;
        let centers = (0..hidden_size)
            .map(|i| fields.vector(input_size.get(), |j| format!("center {} component {}", i, j)))
            .collect::<Result<Vec<_>, RecordError>>()?;
        fields.finish()?;

        Ok(RbfNetwork::from_parts(input_size, centers, windows, weights)?)
    }

    /// Reads a network from the file at `path`.
    ///
    /// # Errors
    /// See [`load`](RbfNetwork::load).
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<RbfNetwork, RecordError> {
        let path = path.as_ref();
        let network = RbfNetwork::load(BufReader::new(File::open(path)?))?;
        log::debug!(
            "loaded network with {} hidden units from {}",
            network.hidden_size(),
            path.display()
        );
        Ok(network)
    }
}

impl fmt::Display for RbfNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.serialize())
    }
}
