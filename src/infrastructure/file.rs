use crate::domain::payment::{Payment, share_users};
use crate::domain::ports::PaymentSource;
use crate::error::Result;
use crate::interfaces::csv::payment_reader::PaymentReader;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum FileFormat {
    Csv,
    Json,
}

impl FileFormat {
    /// `.json` files are read as JSON, everything else as CSV.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Csv,
        }
    }
}

/// A payment source backed by a file on disk.
///
/// The file is opened and parsed again on every fetch, so results always
/// reflect its current contents.
#[derive(Debug, Clone)]
pub struct FilePaymentSource {
    path: PathBuf,
    format: FileFormat,
}

impl FilePaymentSource {
    /// Creates a source whose format is inferred from the file extension.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let format = FileFormat::from_path(&path);
        Self { path, format }
    }

    pub fn with_format<P: AsRef<Path>>(path: P, format: FileFormat) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            format,
        }
    }

    pub fn format(&self) -> FileFormat {
        self.format
    }
}

impl PaymentSource for FilePaymentSource {
    fn fetch_all(&self) -> Result<Vec<Payment>> {
        let file = File::open(&self.path)?;
        let payments = match self.format {
            FileFormat::Csv => PaymentReader::new(file).payments()?,
            FileFormat::Json => {
                let mut payments: Vec<Payment> = serde_json::from_reader(BufReader::new(file))?;
                share_users(&mut payments);
                payments
            }
        };
        tracing::debug!(
            path = %self.path.display(),
            format = ?self.format,
            count = payments.len(),
            "loaded payments"
        );
        Ok(payments)
    }
}
