use assert_matches::assert_matches;

use ff_regional::error::FactorError;
use ff_regional::parser::{PERIOD_COLUMN, parse_block};
use ff_regional::table::ParsedTable;

const FIVE_FACTOR_FILE: &str = "This file was created by CMPT_NA_5_FACTORS using the 202312 Bloomberg database.\r
The 1-month TBill return is the U.S. one month TBill rate.\r
\r
,Mkt-RF,SMB,HML,RMW,CMA,RF\r
199007,   0.86,  -0.23,  -0.29,   0.41,   0.33,   0.68\r
199008,  -9.82,  -2.32,   1.95,   0.70,   1.57,   0.66\r
199009,  -5.74,  -1.85,   0.41,   0.93,   1.48,   0.60\r
\r
 Annual Factors: January-December \r
,Mkt-RF,SMB,HML,RMW,CMA,RF\r
1991,  28.56,  -1.41, -14.76,   6.34,  -1.87,   5.46\r
";

#[test]
fn header_first_column_is_renamed() {
    let block = parse_block("North_America_5_Factors.csv", FIVE_FACTOR_FILE.lines()).unwrap();
    let header = block.header.unwrap();
    assert_eq!(header[0], PERIOD_COLUMN);
    assert_eq!(header, vec!["DATEYM", "Mkt-RF", "SMB", "HML", "RMW", "CMA", "RF"]);
}

#[test]
fn only_first_block_is_collected() {
    let block = parse_block("North_America_5_Factors.csv", FIVE_FACTOR_FILE.lines()).unwrap();
    assert_eq!(block.rows.len(), 3);
    assert_eq!(block.rows[2][0], "199009");
    assert_eq!(block.rows[0][1], "0.86");
}

#[test]
fn synthetic_block_builds_table_in_row_order() {
    let periods = ["199507", "199412", "199510", "199601"];
    let mut text = String::from(",Mkt-RF,SMB,HML,RMW,CMA,RF\n");
    for period in periods {
        text.push_str(&format!("{period},1,2,3,4,5,6\n"));
    }
    text.push('\n');

    let block = parse_block("synthetic.csv", text.lines()).unwrap();
    let table = ParsedTable::from_block("synthetic.csv", block).unwrap();
    assert_eq!(table.len(), periods.len());
    assert_eq!(
        table.columns(),
        &["DATEYM", "Mkt-RF", "SMB", "HML", "RMW", "CMA", "RF"]
    );
    assert_eq!(table.periods(), &periods);
    assert_eq!(table.get("199510", "CMA"), Some("5"));
}

#[test]
fn block_without_trailing_blank_runs_to_end() {
    let block = parse_block("momentum.csv", ["notes", ",WML", "199011,1.5", "199012,-0.4"]).unwrap();
    assert_eq!(block.header.unwrap(), vec!["DATEYM", "WML"]);
    assert_eq!(block.rows.len(), 2);
}

#[test]
fn header_followed_by_blank_is_empty_block() {
    let block = parse_block("momentum.csv", [",WML", "", "199011,1.5"]).unwrap();
    let table = ParsedTable::from_block("momentum.csv", block).unwrap();
    assert!(table.is_empty());
}

#[test]
fn row_width_mismatch_is_a_parse_error() {
    let err = parse_block("bad.csv", [",Mkt-RF,SMB,HML", "199001,1,2,3", "199002,1,2"]).unwrap_err();
    assert_matches!(err, FactorError::FieldCount { line: 3, .. });
    assert!(err.is_parse());
}

#[test]
fn missing_header_fails_when_building() {
    let block = parse_block("empty.csv", ["nothing here", "", "199001,1"]).unwrap();
    let err = ParsedTable::from_block("empty.csv", block).unwrap_err();
    assert_matches!(err, FactorError::HeaderNotFound { .. });
    assert!(err.is_parse());
}
