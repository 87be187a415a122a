use std::io::Write;
use std::path::Path;

use assert_matches::assert_matches;
use zip::write::SimpleFileOptions;

use ff_regional::archive::read_block;
use ff_regional::domain::DatasetId;
use ff_regional::error::FactorError;
use ff_regional::loader::DatasetLoader;

const FIVE_FACTOR_CSV: &str = "This file was created by CMPT_EUR_5_FACTORS.\r
\r
,Mkt-RF,SMB,HML,RMW,CMA,RF\r
199007,   1.10,   0.20,  -0.30,   0.40,   0.50,   0.68\r
199008,  -8.00,  -1.00,   1.00,   0.10,   0.20,   0.66\r
\r
 Annual Factors: January-December \r
,Mkt-RF,SMB,HML,RMW,CMA,RF\r
1991,  10.00,   1.00,   2.00,   3.00,   4.00,   5.00\r
";

const MOMENTUM_CSV: &str = "This file was created by CMPT_EUR_MOM_FACTOR.\r
\r
,WML\r
199011,   1.20\r
199012,  -0.40\r
199101,   2.10\r
\r
";

fn write_archive(path: &Path, entries: &[(&str, &str)]) {
    let entries: Vec<(&str, &[u8])> = entries
        .iter()
        .map(|(name, body)| (*name, body.as_bytes()))
        .collect();
    write_archive_bytes(path, &entries);
}

fn write_archive_bytes(path: &Path, entries: &[(&str, &[u8])]) {
    let file = std::fs::File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    for (name, body) in entries {
        zip.start_file(*name, SimpleFileOptions::default()).unwrap();
        zip.write_all(body).unwrap();
    }
    zip.finish().unwrap();
}

fn id(name: &str) -> DatasetId {
    name.parse().unwrap()
}

#[test]
fn loads_datasets_in_configured_order() {
    let temp = tempfile::tempdir().unwrap();
    write_archive(
        &temp.path().join("Europe_Mom_Factor_CSV.zip"),
        &[("Europe_MOM_Factor.csv", MOMENTUM_CSV)],
    );
    write_archive(
        &temp.path().join("Europe_5_Factors_CSV.zip"),
        &[("Europe_5_Factors.csv", FIVE_FACTOR_CSV)],
    );

    let datasets = vec![id("Europe_Mom_Factor_CSV.zip"), id("Europe_5_Factors_CSV.zip")];
    let tables = DatasetLoader::new(temp.path()).load_all(&datasets).unwrap();

    let order: Vec<&str> = tables.ids().map(DatasetId::as_str).collect();
    assert_eq!(order, vec!["Europe_Mom_Factor_CSV.zip", "Europe_5_Factors_CSV.zip"]);

    let momentum = tables.get(&datasets[0]).unwrap();
    assert_eq!(momentum.columns(), &["DATEYM", "WML"]);
    assert_eq!(momentum.len(), 3);
    assert_eq!(momentum.get("199012", "WML"), Some("-0.40"));

    let five = tables.get(&datasets[1]).unwrap();
    assert_eq!(five.len(), 2);
    assert_eq!(five.get("199008", "SMB"), Some("-1.00"));
}

#[test]
fn missing_archive_is_not_found() {
    let temp = tempfile::tempdir().unwrap();
    write_archive(
        &temp.path().join("Europe_5_Factors_CSV.zip"),
        &[("Europe_5_Factors.csv", FIVE_FACTOR_CSV)],
    );

    let datasets = vec![id("Europe_5_Factors_CSV.zip"), id("Japan_5_Factors_CSV.zip")];
    let err = DatasetLoader::new(temp.path()).load_all(&datasets).unwrap_err();
    assert_matches!(err, FactorError::ArchiveNotFound(ref path) if path.ends_with("Japan_5_Factors_CSV.zip"));
    assert!(err.is_not_found());
}

#[test]
fn missing_entry_is_a_parse_error() {
    let temp = tempfile::tempdir().unwrap();
    write_archive(
        &temp.path().join("Japan_Mom_Factor_CSV.zip"),
        &[("Japan_Mom_Factor.csv", MOMENTUM_CSV)],
    );

    let err = DatasetLoader::new(temp.path())
        .load_one(&id("Japan_Mom_Factor_CSV.zip"))
        .unwrap_err();
    assert_matches!(err, FactorError::EntryNotFound { ref entry, .. } if entry == "Japan_MOM_Factor.csv");
    assert!(err.is_parse());
}

#[test]
fn entry_without_header_is_a_parse_error() {
    let temp = tempfile::tempdir().unwrap();
    write_archive(
        &temp.path().join("Japan_5_Factors_CSV.zip"),
        &[("Japan_5_Factors.csv", "no factor data\r\n\r\n")],
    );

    let err = DatasetLoader::new(temp.path())
        .load_one(&id("Japan_5_Factors_CSV.zip"))
        .unwrap_err();
    assert_matches!(err, FactorError::HeaderNotFound { .. });
}

#[test]
fn non_zip_file_is_malformed() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("Emerging_5_Factors_CSV.zip");
    std::fs::write(&path, b"<html>not found</html>").unwrap();

    let err = read_block(&path, "Emerging_5_Factors.csv").unwrap_err();
    assert_matches!(err, FactorError::MalformedArchive { .. });
}

#[test]
fn read_picks_exact_entry_name() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("Europe_5_Factors_CSV.zip");
    write_archive(
        &path,
        &[
            ("readme.txt", "ignore"),
            ("Europe_5_Factors.csv", FIVE_FACTOR_CSV),
        ],
    );

    let block = read_block(&path, "Europe_5_Factors.csv").unwrap();
    assert_eq!(block.header.as_ref().map(Vec::len), Some(7));
    assert_eq!(block.rows.len(), 2);
}

#[test]
fn trailing_latin1_footer_is_ignored() {
    let temp = tempfile::tempdir().unwrap();
    write_archive_bytes(
        &temp.path().join("Japan_5_Factors_CSV.zip"),
        &[(
            "Japan_5_Factors.csv",
            b",Mkt-RF,SMB\r\n199507,1,2\r\n\r\n Copyright \xA9 2024 Kenneth R. French\r\n"
                .as_slice(),
        )],
    );

    let table = DatasetLoader::new(temp.path())
        .load_one(&id("Japan_5_Factors_CSV.zip"))
        .unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(table.get("199507", "SMB"), Some("2"));
}

#[test]
fn undecodable_row_inside_block_is_a_parse_error() {
    let temp = tempfile::tempdir().unwrap();
    write_archive_bytes(
        &temp.path().join("Japan_5_Factors_CSV.zip"),
        &[("Japan_5_Factors.csv", b",Mkt-RF,SMB\r\n199507,1,\xA9\r\n".as_slice())],
    );

    let err = DatasetLoader::new(temp.path())
        .load_one(&id("Japan_5_Factors_CSV.zip"))
        .unwrap_err();
    assert_matches!(err, FactorError::InvalidEncoding { line: 2, .. });
    assert!(err.is_parse());
}
