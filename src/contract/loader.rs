//! Load payment schedules from CSV and contracts from JSON

use super::{OptionContract, Payment};
use crate::error::Result;
use csv::Reader;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Raw CSV row: `time,amount[,rate]`
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "time")]
    time: f64,
    #[serde(rename = "amount")]
    amount: f64,
    #[serde(rename = "rate", default)]
    rate: Option<f64>,
}

impl CsvRow {
    fn into_payment(self) -> Payment {
        Payment {
            time: self.time,
            amount: self.amount,
            rate: self.rate,
        }
    }
}

/// Load a payment schedule from a CSV file
pub fn load_payments<P: AsRef<Path>>(path: P) -> Result<Vec<Payment>> {
    let file = File::open(path)?;
    load_payments_from_reader(file)
}

/// Load a payment schedule from any reader (e.g., string buffer)
pub fn load_payments_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<Payment>> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut payments = Vec::new();

    for result in csv_reader.deserialize() {
        let row: CsvRow = result?;
        payments.push(row.into_payment());
    }

    Ok(payments)
}

/// Load a full contract from a JSON file
pub fn load_contract<P: AsRef<Path>>(path: P) -> Result<OptionContract> {
    let file = File::open(path)?;
    let contract: OptionContract = serde_json::from_reader(BufReader::new(file))?;
    contract.validate()?;
    Ok(contract)
}
