//! Per-processor batch report parsers, grounded on the original's
//! `routing/ingestion/parsers.py`. Each parser maps one processor's raw
//! report row shape onto the canonical `RawTransactionRecord`; the
//! defects in what a given report can and cannot reconstruct (no BIN, no
//! latency) are preserved rather than papered over, since the Aggregator
//! is meant to see exactly what a report actually contains.

use std::collections::HashMap;
use std::io::Read;

use chrono::{NaiveDateTime, TimeZone, Utc};
use router_core::{Provider, RawTransactionRecord, RouterError, RouterResult};
use rust_decimal::Decimal;

/// One CSV report row as a header-to-value map, mirroring the `dict` row
/// the original's parsers receive.
pub type ReportRow = HashMap<String, String>;

/// Transforms a single raw report row into a canonical record.
pub trait TransactionParser: Send + Sync {
    fn parse(&self, row: &ReportRow) -> RouterResult<RawTransactionRecord>;
}

fn field<'a>(row: &'a ReportRow, key: &str) -> RouterResult<&'a str> {
    row.get(key)
        .map(String::as_str)
        .ok_or_else(|| RouterError::Validation(format!("missing field: {key}")))
}

fn parse_amount(raw: &str) -> RouterResult<Decimal> {
    raw.parse()
        .map_err(|_| RouterError::Validation(format!("invalid amount: {raw}")))
}

fn parse_timestamp(raw: &str) -> RouterResult<chrono::DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .map(|naive| Utc.from_utc_datetime(&naive))
        .map_err(|_| RouterError::Validation(format!("invalid timestamp: {raw}")))
}

/// Parses Stripe's balance transaction report CSV:
/// `id,amount,currency,fee,net,type,created,card_brand,card_country,status`.
///
/// The report carries no BIN or latency data, so those fields are filled
/// with the original's placeholder values (`bin = "000000"`,
/// `latency_ms = 0`), and `card_type` is always assumed `"credit"`
/// (matching the original's own assumption).
pub struct StripeCsvParser;

impl TransactionParser for StripeCsvParser {
    fn parse(&self, row: &ReportRow) -> RouterResult<RawTransactionRecord> {
        let status = field(row, "status")?;
        let country = field(row, "card_country")?;

        Ok(RawTransactionRecord {
            provider: Provider::Stripe,
            payment_form: "card_on_file".to_string(),
            processing_type: "signature".to_string(),
            amount: parse_amount(field(row, "amount")?)?,
            currency: field(row, "currency")?.to_uppercase(),
            status: if status == "available" { "succeeded" } else { "failed" }.to_string(),
            error_code: None,
            latency_ms: 0,
            bin: "000000".to_string(),
            card_type: "credit".to_string(),
            network: field(row, "card_brand")?.to_lowercase(),
            region: if country == "US" { "domestic" } else { "international" }.to_string(),
            timestamp: parse_timestamp(field(row, "created")?)?,
            extra_fields: Default::default(),
        })
    }
}

/// Parses Adyen's Payment Accounting Report CSV: `Merchant Reference,PSP
/// Reference,Payment Method,Creation Date,Type,Currency,Gross Debit,
/// Commission,Status`.
///
/// Same report-shape limitations as Stripe's: no BIN, no latency, and
/// region is always `"domestic"` since the report carries no country
/// column to derive it from.
pub struct AdyenCsvParser;

impl TransactionParser for AdyenCsvParser {
    fn parse(&self, row: &ReportRow) -> RouterResult<RawTransactionRecord> {
        Ok(RawTransactionRecord {
            provider: Provider::Adyen,
            payment_form: "card_on_file".to_string(),
            processing_type: "signature".to_string(),
            amount: parse_amount(field(row, "Gross Debit")?)?,
            currency: field(row, "Currency")?.to_uppercase(),
            status: if field(row, "Type")? == "Settled" { "succeeded" } else { "failed" }.to_string(),
            error_code: None,
            latency_ms: 0,
            bin: "000000".to_string(),
            card_type: "credit".to_string(),
            network: field(row, "Payment Method")?.to_lowercase(),
            region: "domestic".to_string(),
            timestamp: parse_timestamp(field(row, "Creation Date")?)?,
            extra_fields: Default::default(),
        })
    }
}

/// Reads a CSV report from `source`, parsing every row with `parser`. A
/// single malformed row fails the whole batch rather than silently
/// dropping data the caller didn't ask to discard.
pub fn parse_csv_report<R: Read>(
    parser: &dyn TransactionParser,
    source: R,
) -> RouterResult<Vec<RawTransactionRecord>> {
    let mut reader = csv::Reader::from_reader(source);
    let headers = reader
        .headers()
        .map_err(|e| RouterError::Validation(format!("malformed CSV header: {e}")))?
        .clone();

    let mut records = Vec::new();
    for result in reader.records() {
        let csv_record = result.map_err(|e| RouterError::Validation(format!("malformed CSV row: {e}")))?;
        let row: ReportRow = headers
            .iter()
            .zip(csv_record.iter())
            .map(|(header, value)| (header.to_string(), value.to_string()))
            .collect();
        records.push(parser.parse(&row)?);
    }
    Ok(records)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn stripe_parser_preserves_report_defects() {
        let mut row = ReportRow::new();
        row.insert("amount".to_string(), "19.99".to_string());
        row.insert("currency".to_string(), "usd".to_string());
        row.insert("status".to_string(), "available".to_string());
        row.insert("card_brand".to_string(), "Visa".to_string());
        row.insert("card_country".to_string(), "US".to_string());
        row.insert("created".to_string(), "2026-01-15 10:30:00".to_string());

        let record = StripeCsvParser.parse(&row).unwrap();
        assert_eq!(record.provider, Provider::Stripe);
        assert_eq!(record.amount, Decimal::new(1999, 2));
        assert_eq!(record.currency, "USD");
        assert_eq!(record.status, "succeeded");
        assert_eq!(record.network, "visa");
        assert_eq!(record.region, "domestic");
        assert_eq!(record.bin, "000000");
        assert_eq!(record.card_type, "credit");
        assert_eq!(record.latency_ms, 0);
    }

    #[test]
    fn stripe_parser_maps_non_available_status_to_failed() {
        let mut row = ReportRow::new();
        row.insert("amount".to_string(), "5.00".to_string());
        row.insert("currency".to_string(), "usd".to_string());
        row.insert("status".to_string(), "pending".to_string());
        row.insert("card_brand".to_string(), "Mastercard".to_string());
        row.insert("card_country".to_string(), "DE".to_string());
        row.insert("created".to_string(), "2026-01-15 10:30:00".to_string());

        let record = StripeCsvParser.parse(&row).unwrap();
        assert_eq!(record.status, "failed");
        assert_eq!(record.region, "international");
    }

    #[test]
    fn stripe_parser_rejects_missing_field() {
        let row = ReportRow::new();
        assert!(StripeCsvParser.parse(&row).is_err());
    }

    #[test]
    fn adyen_parser_maps_settled_to_succeeded() {
        let mut row = ReportRow::new();
        row.insert("Gross Debit".to_string(), "42.50".to_string());
        row.insert("Currency".to_string(), "eur".to_string());
        row.insert("Type".to_string(), "Settled".to_string());
        row.insert("Payment Method".to_string(), "Mastercard".to_string());
        row.insert("Creation Date".to_string(), "2026-02-01 08:00:00".to_string());

        let record = AdyenCsvParser.parse(&row).unwrap();
        assert_eq!(record.provider, Provider::Adyen);
        assert_eq!(record.amount, Decimal::new(4250, 2));
        assert_eq!(record.status, "succeeded");
        assert_eq!(record.region, "domestic");
    }

    #[test]
    fn parse_csv_report_reads_multiple_rows() {
        let csv_data = "id,amount,currency,fee,net,type,created,card_brand,card_country,status\n\
             txn_1,10.00,usd,0.30,9.70,charge,2026-01-01 00:00:00,visa,US,available\n\
             txn_2,20.00,usd,0.50,19.50,charge,2026-01-02 00:00:00,mastercard,CA,failed\n";

        let records = parse_csv_report(&StripeCsvParser, csv_data.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].status, "succeeded");
        assert_eq!(records[1].status, "failed");
        assert_eq!(records[1].region, "international");
    }
}
