use contracts::dashboards::d400_item_segmentation::ItemStrategy;
use contracts::shared::report::CellValue;
use reporting::dashboards::d400_item_segmentation::segment;
use reporting::projections::p900_sales_lines::{load_snapshot, LoadError, SalesSnapshot};
use reporting::shared::aggregation::item_aggregates;
use reporting::shared::config::{load_config, Config, OutputFormat};
use reporting::shared::reports::{render, run_report};
use std::path::{Path, PathBuf};

fn fixture() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/coffee_sales.csv")
}

fn write_config(dir: &Path, dataset: &Path) -> Config {
    let path = dir.join("config.toml");
    let contents = format!(
        "[dataset]\npath = {:?}\n\n[output]\ndir = \"reports\"\nformat = \"csv\"\n",
        dataset.to_string_lossy()
    );
    std::fs::write(&path, contents).unwrap();
    load_config(Some(&path)).unwrap()
}

fn snapshot() -> SalesSnapshot {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), &fixture());
    load_snapshot(&config).unwrap()
}

#[test]
fn loads_fixture_and_drops_repeated_header() {
    let snapshot = snapshot();
    let stats = snapshot.stats();
    assert_eq!(stats.raw_rows, 6);
    assert_eq!(stats.header_artifacts, 1);
    assert_eq!(stats.loaded_rows, 5);

    let water = snapshot
        .lines()
        .iter()
        .find(|l| l.item_name == "Water")
        .unwrap();
    assert_eq!(water.revenue, 0.0);
    assert_eq!(water.margin, None);
    assert_eq!(water.channel, "Takeaway");
}

#[test]
fn category_performance_from_fixture() {
    let table = run_report("category_performance", &snapshot()).unwrap();
    assert_eq!(table.rows.len(), 3);
    assert_eq!(table.cell(0, "category"), Some(&CellValue::text("Coffee")));
    assert_eq!(table.cell(0, "orders"), Some(&CellValue::Integer(3)));
    assert_eq!(table.cell(0, "items_sold"), Some(&CellValue::Integer(6)));
    assert_eq!(table.cell(0, "revenue"), Some(&CellValue::Number(21.0)));
    // zero revenue leaves the margin undefined rather than 0
    assert_eq!(table.cell(2, "category"), Some(&CellValue::text("Drinks")));
    assert_eq!(table.cell(2, "margin_pct"), Some(&CellValue::Null));
}

#[test]
fn segmentation_from_fixture() {
    let segmentation = segment(&item_aggregates(snapshot().lines()));
    let summary = segmentation.summary;
    assert_eq!(summary.avg_units, Some(2.0));
    assert!((summary.total_profit - 15.4).abs() < 1e-9);

    let strategies: Vec<(&str, ItemStrategy)> = segmentation
        .items
        .iter()
        .map(|s| (s.item.item_name.as_str(), s.item_strategy))
        .collect();
    assert_eq!(
        strategies,
        vec![
            ("Latte", ItemStrategy::Star),
            ("Espresso", ItemStrategy::Star),
            ("Croissant", ItemStrategy::WeakPerformer),
            ("Water", ItemStrategy::WeakPerformer),
        ]
    );
}

#[test]
fn item_pareto_written_as_csv() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), &fixture());
    assert_eq!(config.output.format, OutputFormat::Csv);

    let snapshot = load_snapshot(&config).unwrap();
    let table = run_report("item_pareto", &snapshot).unwrap();
    let out_dir = dir.path().join(&config.output.dir);
    let path = render::emit(&table, config.output.format, &out_dir)
        .unwrap()
        .unwrap();

    let text = std::fs::read_to_string(path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines[0],
        "rank,item_name,category,size,profit,cumulative_profit,profit_share_pct,cumulative_pct,profit_segment"
    );
    assert_eq!(lines[1], "1,Latte,Coffee,M,9.00,9.00,58.44,58.44,Core Profit Drivers");
    assert_eq!(lines[2], "2,Espresso,Coffee,S,5.10,14.10,33.12,91.56,Long Tail");
    assert_eq!(lines.len(), 5);
}

#[test]
fn kpi_overview_as_json() {
    let table = run_report("kpi_overview", &snapshot()).unwrap();
    let json = render::to_json(&table);
    let value_of = |id: &str| {
        json["rows"]
            .as_array()
            .unwrap()
            .iter()
            .find(|row| row["indicator_id"] == id)
            .map(|row| row["value"].clone())
            .unwrap()
    };
    assert_eq!(value_of("sales.revenue"), serde_json::json!(24.0));
    assert_eq!(value_of("sales.margin_pct"), serde_json::json!(64.17));
    assert_eq!(value_of("sales.order_count"), serde_json::json!(3));
    assert_eq!(value_of("sales.avg_order_value"), serde_json::json!(8.0));
}

#[test]
fn malformed_row_aborts_with_its_row_id() {
    let dir = tempfile::tempdir().unwrap();
    let mut csv = std::fs::read_to_string(fixture()).unwrap();
    csv.push_str(
        "6,ORD-004,31-02-2024,9,Morning,Thursday,Dan,Dine-in,I-01,LAT-M,Latte,Coffee,M,1,4.50,4.50,1.50,1.50,3.00,66.67%\n",
    );
    let data = dir.path().join("broken.csv");
    std::fs::write(&data, csv).unwrap();

    let config = write_config(dir.path(), &data);
    match load_snapshot(&config) {
        Err(LoadError::Parse(e)) => {
            assert_eq!(e.row_id, "6");
            assert_eq!(e.field, "order_date");
        }
        other => panic!("expected a parse error, got {other:?}"),
    }
}

#[test]
fn missing_dataset_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), &dir.path().join("absent.csv"));
    assert!(matches!(load_snapshot(&config), Err(LoadError::Io { .. })));
}

#[test]
fn workspace_config_resolves_from_its_own_directory() {
    let workspace = Path::new(env!("CARGO_MANIFEST_DIR")).join("../..");
    let config = load_config(Some(&workspace.join("config.toml"))).unwrap();
    assert_eq!(config.output.format, OutputFormat::Table);

    let snapshot = load_snapshot(&config).unwrap();
    let stats = snapshot.stats();
    assert!(stats.loaded_rows > 0);
    assert_eq!(stats.raw_rows - stats.header_artifacts, stats.loaded_rows);
}
