use pretty_assertions::assert_eq;
use tally_core::IncidentTypeRecord;
use tally_report::{CSV_HEADER, ReportError, write_report};

fn records() -> Vec<IncidentTypeRecord> {
    vec![
        IncidentTypeRecord::new("fire", 9, 7),
        IncidentTypeRecord::new("slip, trip or fall", 5, 4),
        IncidentTypeRecord::new("chemical \"spill\"", 2, 0),
    ]
}

#[test]
fn json_reads_back_identical() {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_report(&records(), &dir.path().join("reports/analysis.json"), None).unwrap();

    let back: Vec<IncidentTypeRecord> =
        serde_json::from_str(&std::fs::read_to_string(&paths.json).unwrap()).unwrap();
    assert_eq!(back, records());
}

#[test]
fn csv_has_header_plus_one_line_per_record() {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_report(&records(), &dir.path().join("analysis.json"), None).unwrap();

    let csv = std::fs::read_to_string(&paths.csv).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), records().len() + 1);
    assert_eq!(lines[0], CSV_HEADER);
    assert_eq!(lines[1], "fire,9,7");
    assert_eq!(lines[2], "\"slip, trip or fall\",5,4");
    assert_eq!(lines[3], "\"chemical \"\"spill\"\"\",2,0");
}

#[test]
fn json_is_pretty_printed_with_fixed_keys() {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_report(
        &[IncidentTypeRecord::new("fire", 1, 2)],
        &dir.path().join("a.json"),
        None,
    )
    .unwrap();
    let json = std::fs::read_to_string(&paths.json).unwrap();
    assert_eq!(
        json,
        "[\n  {\n    \"name\": \"fire\",\n    \"ground_truth_count\": 1,\n    \"discovered_count\": 2\n  }\n]"
    );
}

#[test]
fn unwritable_destination_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "file, not dir").unwrap();

    let err = write_report(&records(), &blocker.join("out.json"), None).unwrap_err();
    assert!(matches!(err, ReportError::Io { .. }));
}
