#![cfg(feature = "web")]

use inquiry::flatten::flatten_tab;
use inquiry::google::{Spreadsheet, grid_rows};

const GRID_RESPONSE: &str = r#"{
  "sheets": [
    {
      "data": [
        {
          "rowData": [
            {
              "values": [
                {
                  "formattedValue": "System Name",
                  "textFormatRuns": [{ "format": { "bold": true } }]
                },
                { "formattedValue": "Notes" },
                { "formattedValue": "Approved Scopes" }
              ]
            },
            {
              "values": [
                {
                  "formattedValue": "<3 Sheets CRM",
                  "textFormatRuns": [
                    { "format": { "bold": true } },
                    { "startIndex": 2, "format": {} }
                  ]
                },
                {
                  "formattedValue": "keep it short",
                  "textFormatRuns": [
                    { "format": {} },
                    { "startIndex": 5, "format": { "italic": true, "underline": true } }
                  ]
                }
              ]
            },
            {},
            {
              "values": [
                {},
                { "formattedValue": "no name here" }
              ]
            },
            {
              "values": [
                { "formattedValue": "Acme" },
                {
                  "formattedValue": "broken",
                  "textFormatRuns": [
                    { "startIndex": 3, "format": { "bold": true } },
                    { "startIndex": 1, "format": {} }
                  ]
                },
                { "formattedValue": "finance" }
              ]
            }
          ]
        }
      ]
    }
  ]
}"#;

fn grid() -> Vec<Vec<String>> {
    let spreadsheet: Spreadsheet = serde_json::from_str(GRID_RESPONSE).unwrap();
    grid_rows(spreadsheet)
}

#[test]
fn test_grid_rows_follow_sheet_rows() {
    let rows = grid();

    assert_eq!(rows.len(), 5);
    assert_eq!(
        rows[0],
        vec!["<strong>System Name</strong>", "Notes", "Approved Scopes"]
    );
    assert_eq!(
        rows[1],
        vec![
            "<strong>&lt;3</strong> Sheets CRM",
            "keep <em><u>it short</u></em>"
        ]
    );
    assert!(rows[2].is_empty());
    assert_eq!(rows[3], vec!["", "no name here"]);
    // Runs out of order fall back to the unformatted text.
    assert_eq!(rows[4], vec!["Acme", "broken", "finance"]);
}

#[test]
fn test_rich_rows_flatten_like_values() {
    let records = flatten_tab("CRM", &grid());

    let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["CRM__2", "CRM__5"]);

    let hearts = &records[0];
    assert_eq!(hearts.display_name(), "<3 Sheets CRM");
    assert_eq!(hearts.get("System Name"), "<strong>&lt;3</strong> Sheets CRM");
    assert_eq!(hearts.get("Notes"), "keep <em><u>it short</u></em>");
    assert_eq!(hearts.get("Approved Scopes"), "");

    let acme = &records[1];
    assert_eq!(acme.plain("Approved Scopes"), "finance");
    assert!(acme.fields.keys().all(|key| !key.contains('<')));
}
