use inquiry::column::{CellRange, cell_a1, column_index, column_label};
use inquiry::markup::{
    RunError, TextFormat, TextFormatRun, plain_text, render_rich_cell, runs_to_markup,
    sanitize_markup, strip_tags,
};

fn run(start_index: usize, bold: bool, italic: bool, underline: bool) -> TextFormatRun {
    TextFormatRun {
        start_index,
        format: TextFormat {
            bold,
            italic,
            underline,
        },
    }
}

#[test]
fn test_runs_wrap_each_slice() {
    let runs = vec![
        run(0, true, false, false),
        run(5, false, false, false),
        run(9, false, true, true),
    ];
    assert_eq!(
        runs_to_markup("Acme ERP suite", &runs).unwrap(),
        "<strong>Acme </strong>ERP <em><u>suite</u></em>"
    );
}

#[test]
fn test_all_flags_nest_in_fixed_order() {
    let runs = vec![run(0, true, true, true)];
    assert_eq!(
        runs_to_markup("all", &runs).unwrap(),
        "<strong><em><u>all</u></em></strong>"
    );
}

#[test]
fn test_no_runs_returns_text_unchanged() {
    assert_eq!(runs_to_markup("plain <text>", &[]).unwrap(), "plain <text>");
}

#[test]
fn test_leading_text_before_first_run_is_unformatted() {
    let runs = vec![run(4, true, false, false)];
    assert_eq!(
        runs_to_markup("see this", &runs).unwrap(),
        "see <strong>this</strong>"
    );
}

#[test]
fn test_run_text_is_escaped() {
    let runs = vec![run(0, true, false, false), run(2, false, false, false)];
    let markup = render_rich_cell("<3 Sheets CRM", &runs);
    assert_eq!(markup, "<strong>&lt;3</strong> Sheets CRM");
    assert_eq!(plain_text(&markup), "<3 Sheets CRM");
    assert_eq!(sanitize_markup(&markup), markup);

    let leading = vec![run(4, false, true, false)];
    assert_eq!(
        runs_to_markup("a < b & c", &leading).unwrap(),
        "a &lt; <em>b &amp; c</em>"
    );
}

#[test]
fn test_offsets_are_utf16_units() {
    // "é" is one UTF-16 unit, the emoji is two.
    let runs = vec![run(0, false, false, false), run(4, true, false, false)];
    assert_eq!(
        runs_to_markup("é😀 ok", &runs).unwrap(),
        "é😀 <strong>ok</strong>"
    );
}

#[test]
fn test_malformed_runs_are_rejected() {
    let out_of_order = vec![run(3, true, false, false), run(1, false, false, false)];
    assert_eq!(
        runs_to_markup("abcdef", &out_of_order),
        Err(RunError::OutOfOrder {
            previous: 3,
            offset: 1
        })
    );

    let duplicate = vec![run(2, true, false, false), run(2, false, true, false)];
    assert!(matches!(
        runs_to_markup("abcdef", &duplicate),
        Err(RunError::OutOfOrder { .. })
    ));

    let past_end = vec![run(10, true, false, false)];
    assert_eq!(
        runs_to_markup("abc", &past_end),
        Err(RunError::OutOfRange { offset: 10, len: 3 })
    );
}

#[test]
fn test_render_rich_cell_falls_back_to_text() {
    let bad = vec![run(10, true, false, false)];
    assert_eq!(render_rich_cell("abc", &bad), "abc");
}

#[test]
fn test_runs_deserialize_from_vendor_json() {
    let runs: Vec<TextFormatRun> = serde_json::from_str(
        r#"[{"format": {"bold": true}}, {"startIndex": 4, "format": {}}]"#,
    )
    .unwrap();
    assert_eq!(runs[0].start_index, 0);
    assert!(runs[0].format.bold);
    assert_eq!(
        runs_to_markup("Acme ERP", &runs).unwrap(),
        "<strong>Acme</strong> ERP"
    );
}

#[test]
fn test_strip_and_sanitize() {
    assert_eq!(strip_tags("<p>Hello <b>World</b></p>"), "Hello World");
    assert_eq!(
        sanitize_markup("<em>ok</em><img src=x onerror=alert(1)>"),
        "<em>ok</em>&lt;img src=x onerror=alert(1)&gt;"
    );
    assert_eq!(sanitize_markup("line<br>next"), "line<br>next");
    assert_eq!(sanitize_markup("Tom &amp; Jerry & co"), "Tom &amp; Jerry &amp; co");
    assert_eq!(strip_tags("&lt;b&gt; &quot;x&quot; &#39;y&#39; &amp;lt;"), "<b> \"x\" 'y' &lt;");
}

#[test]
fn test_column_labels_round_trip() {
    for index in [0, 1, 25, 26, 27, 51, 52, 701, 702, 18277] {
        assert_eq!(column_index(&column_label(index)), Some(index));
    }
    assert_eq!(column_label(701), "ZZ");
    assert_eq!(column_label(702), "AAA");
    assert_eq!(column_index("k"), Some(10));
    assert_eq!(column_index(""), None);
    assert_eq!(column_index("A1"), None);
    assert_eq!(column_index(&"Z".repeat(15)), None);
}

#[test]
fn test_a1_ranges_quote_tab_names() {
    let range = CellRange {
        last_row: 2000,
        columns: 26,
    };
    assert_eq!(range.to_a1("ERP"), "'ERP'!A1:Z2000");
    assert_eq!(CellRange::header(11).to_a1("Other Systems"), "'Other Systems'!A1:K1");
    assert_eq!(cell_a1("ERP", 7, 5), "'ERP'!H5");
    assert_eq!(cell_a1("Wide", 26, 2), "'Wide'!AA2");
}
