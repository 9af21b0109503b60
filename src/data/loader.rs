use std::path::Path;

use anyhow::{Context, Result, bail};
use calamine::{DataType as Cell, Reader, open_workbook_auto};
use serde::{Deserialize, Serialize};

use super::model::{DurationMatrix, ExpressionMatrix, PromoterMatrix, RawDataset};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Names of the three sheets (workbooks) or files (CSV folders) to read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetNames {
    pub gfp: String,
    pub mcherry: String,
    pub time: String,
}

impl Default for SheetNames {
    fn default() -> Self {
        Self {
            gfp: "GFP".to_owned(),
            mcherry: "mcherry".to_owned(),
            time: "time".to_owned(),
        }
    }
}

/// Load the three promoter matrices.  Dispatch by extension.
///
/// Supported inputs:
/// * `.xlsx` / `.xlsm` / `.xls` / `.ods` – one sheet per quantity
/// * `.json` – `{ "gfp": M, "mcherry": M, "time": M }` with
///   `M = { "receivers": [...], "senders": [...], "values": [[...]] }`
/// * a directory holding `<gfp>.csv`, `<mcherry>.csv`, `<time>.csv`
///
/// Sheets and CSV files share one layout: the header row lists sender labels
/// after an ignored corner cell, every following row starts with the
/// receiver label.
pub fn load_path(path: &Path, sheets: &SheetNames) -> Result<RawDataset> {
    if path.is_dir() {
        return load_csv_dir(path, sheets);
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "xlsx" | "xlsm" | "xls" | "ods" => load_workbook(path, sheets),
        "json" => load_json(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// Grid → matrix (shared by workbook and CSV readers)
// ---------------------------------------------------------------------------

/// How a particular cell type exposes itself to the grid parser.
trait GridCell {
    fn is_blank(&self) -> bool;
    fn label(&self) -> String;
}

impl GridCell for Cell {
    fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::String(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    fn label(&self) -> String {
        match self {
            Cell::String(s) => s.trim().to_owned(),
            Cell::Empty => String::new(),
            other => other.to_string(),
        }
    }
}

impl GridCell for String {
    fn is_blank(&self) -> bool {
        self.trim().is_empty()
    }

    fn label(&self) -> String {
        self.trim().to_owned()
    }
}

/// Turn a header-plus-rows grid into a labelled matrix.
///
/// Trailing blank header cells and fully blank rows are dropped; short rows
/// are padded with `blank`. A value sitting outside the labelled area is an
/// error rather than being silently discarded.
fn grid_to_matrix<C, T>(
    sheet: &str,
    grid: &[Vec<C>],
    blank: &C,
    mut value: impl FnMut(&C) -> Result<T>,
) -> Result<PromoterMatrix<T>>
where
    C: GridCell,
{
    let (header, body) = grid
        .split_first()
        .with_context(|| format!("sheet '{sheet}' is empty"))?;

    let mut senders: Vec<String> = header.iter().skip(1).map(GridCell::label).collect();
    while senders.last().is_some_and(|s| s.is_empty()) {
        senders.pop();
    }
    if let Some(i) = senders.iter().position(|s| s.is_empty()) {
        bail!("sheet '{sheet}': header column {} has no sender label", i + 2);
    }
    let width = senders.len();

    let mut receivers = Vec::new();
    let mut values = Vec::new();

    for (row_no, row) in body.iter().enumerate() {
        // 1-based, counting the header row
        let line = row_no + 2;
        if row.iter().all(GridCell::is_blank) {
            continue;
        }
        if let Some(extra) = row.iter().skip(width + 1).position(|c| !c.is_blank()) {
            bail!(
                "sheet '{sheet}', row {line}: value in column {} has no sender label",
                width + extra + 2
            );
        }

        let receiver = row.first().map(GridCell::label).unwrap_or_default();
        if receiver.is_empty() {
            bail!("sheet '{sheet}', row {line}: missing receiver label");
        }

        let cells = (1..=width)
            .map(|c| {
                value(row.get(c).unwrap_or(blank))
                    .with_context(|| format!("sheet '{sheet}', row {line}, sender '{}'", senders[c - 1]))
            })
            .collect::<Result<Vec<T>>>()?;

        receivers.push(receiver);
        values.push(cells);
    }

    Ok(PromoterMatrix::new(receivers, senders, values))
}

// ---------------------------------------------------------------------------
// Workbook loader
// ---------------------------------------------------------------------------

fn load_workbook(path: &Path, sheets: &SheetNames) -> Result<RawDataset> {
    let mut wb = open_workbook_auto(path)
        .with_context(|| format!("opening workbook {}", path.display()))?;

    let mut read_sheet = |name: &str| -> Result<Vec<Vec<Cell>>> {
        let range = wb
            .worksheet_range(name)
            .with_context(|| format!("workbook has no sheet named '{name}'"))?
            .with_context(|| format!("reading sheet '{name}'"))?;
        Ok(range.rows().map(|r| r.to_vec()).collect())
    };

    let gfp_grid = read_sheet(&sheets.gfp)?;
    let mcherry_grid = read_sheet(&sheets.mcherry)?;
    let time_grid = read_sheet(&sheets.time)?;

    Ok(RawDataset {
        gfp: grid_to_matrix(&sheets.gfp, &gfp_grid, &Cell::Empty, numeric_cell)?,
        mcherry: grid_to_matrix(&sheets.mcherry, &mcherry_grid, &Cell::Empty, numeric_cell)?,
        time: grid_to_matrix(&sheets.time, &time_grid, &Cell::Empty, |c| Ok(duration_cell(c)))?,
    })
}

/// Blank expression cells become NaN; such records rank as unscorable.
fn numeric_cell(cell: &Cell) -> Result<f64> {
    match cell {
        Cell::Float(v) => Ok(*v),
        Cell::Int(i) => Ok(*i as f64),
        Cell::Empty => Ok(f64::NAN),
        Cell::String(s) if s.trim().is_empty() => Ok(f64::NAN),
        Cell::String(s) => s
            .trim()
            .parse::<f64>()
            .with_context(|| format!("'{s}' is not a number")),
        other => bail!("expected a number, found {other:?}"),
    }
}

/// Time cells are kept as text; Excel time values are rendered as `HH:MM:SS`.
///
/// A date-time serial of one day or more carries a calendar date, not an
/// elapsed time, so it is left blank (undefined). Only explicit duration
/// cells may run past 24 hours.
fn duration_cell(cell: &Cell) -> String {
    match cell {
        Cell::String(s) | Cell::DateTimeIso(s) | Cell::DurationIso(s) => s.clone(),
        Cell::DateTime(days) if *days >= 1.0 => String::new(),
        Cell::DateTime(days) | Cell::Duration(days) => day_fraction_to_hms(*days),
        Cell::Empty | Cell::Error(_) => String::new(),
        other => other.to_string(),
    }
}

/// Excel stores times as fractions of a day. Hours may exceed 24.
fn day_fraction_to_hms(days: f64) -> String {
    if !days.is_finite() || days < 0.0 {
        return String::new();
    }
    let total = (days * 86_400.0).round() as u64;
    format!("{:02}:{:02}:{:02}", total / 3600, total % 3600 / 60, total % 60)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

fn load_json(path: &Path) -> Result<RawDataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    serde_json::from_str(&text).context("parsing JSON dataset")
}

// ---------------------------------------------------------------------------
// CSV folder loader
// ---------------------------------------------------------------------------

fn load_csv_dir(dir: &Path, sheets: &SheetNames) -> Result<RawDataset> {
    let gfp_grid = read_csv_grid(&dir.join(format!("{}.csv", sheets.gfp)))?;
    let mcherry_grid = read_csv_grid(&dir.join(format!("{}.csv", sheets.mcherry)))?;
    let time_grid = read_csv_grid(&dir.join(format!("{}.csv", sheets.time)))?;

    let blank = String::new();
    let gfp: ExpressionMatrix = grid_to_matrix(&sheets.gfp, &gfp_grid, &blank, |s| numeric_text(s))?;
    let mcherry: ExpressionMatrix =
        grid_to_matrix(&sheets.mcherry, &mcherry_grid, &blank, |s| numeric_text(s))?;
    let time: DurationMatrix = grid_to_matrix(&sheets.time, &time_grid, &blank, |s| Ok(s.clone()))?;

    Ok(RawDataset { gfp, mcherry, time })
}

fn read_csv_grid(path: &Path) -> Result<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    reader
        .records()
        .enumerate()
        .map(|(row_no, result)| {
            let record = result.with_context(|| format!("{} row {}", path.display(), row_no + 1))?;
            Ok(record.iter().map(str::to_owned).collect())
        })
        .collect()
}

fn numeric_text(s: &str) -> Result<f64> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(f64::NAN);
    }
    s.parse::<f64>()
        .with_context(|| format!("'{s}' is not a number"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use crate::data::model::TargetProfile;
    use crate::data::normalize::normalize_duration;
    use crate::data::rank::{ScoreConfig, top_matches};

    fn write(dir: &Path, name: &str, body: &str) {
        fs::write(dir.join(name), body).unwrap();
    }

    #[test]
    fn csv_folder_round_trips_into_table() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "GFP.csv", ",S1,S2\nR1,0.3,0.5\nR2,0.4,0.6\n");
        write(dir.path(), "mcherry.csv", ",S1,S2\nR1,0.4,0.4\nR2,0.3,0.5\n");
        write(dir.path(), "time.csv", ",S1,S2\nR1,01:00:00,02:00:00\nR2,03:20:00,bad\n");

        let raw = load_path(dir.path(), &SheetNames::default()).unwrap();
        assert_eq!(raw.gfp.receivers, vec!["R1", "R2"]);
        assert_eq!(raw.gfp.senders, vec!["S1", "S2"]);
        assert_eq!(raw.time.values[1][1], "bad");

        let table = raw.to_table().unwrap();
        assert_eq!(table.len(), 4);
        assert_eq!(table[1].trigger_minutes, Some(120.0));
        assert_eq!(table[3].trigger_minutes, None);
    }

    #[test]
    fn csv_blank_rows_and_short_rows() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "GFP.csv", "Unnamed: 0,S1,S2,\nR1,0.3\n,,\nR2,0.4,0.6\n");
        write(dir.path(), "mcherry.csv", ",S1,S2\nR1,0.4,0.4\nR2,0.3,0.5\n");
        write(dir.path(), "time.csv", ",S1,S2\nR1,01:00:00\nR2,03:20:00,00:10:00\n");

        let raw = load_path(dir.path(), &SheetNames::default()).unwrap();
        assert_eq!(raw.gfp.shape(), (2, 2));
        assert!(raw.gfp.values[0][1].is_nan());
        assert_eq!(raw.time.values[0][1], "");

        let table = raw.to_table().unwrap();
        assert_eq!(table[1].trigger_minutes, None);
    }

    #[test]
    fn csv_rejects_non_numeric_expression() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "GFP.csv", ",S1\nR1,high\n");
        write(dir.path(), "mcherry.csv", ",S1\nR1,0.4\n");
        write(dir.path(), "time.csv", ",S1\nR1,01:00:00\n");

        let err = load_path(dir.path(), &SheetNames::default()).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("row 2"), "{msg}");
        assert!(msg.contains("'high'"), "{msg}");
    }

    #[test]
    fn csv_rejects_unlabelled_values() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "GFP.csv", ",S1\nR1,0.3,0.9\n");
        write(dir.path(), "mcherry.csv", ",S1\nR1,0.4\n");
        write(dir.path(), "time.csv", ",S1\nR1,01:00:00\n");

        assert!(load_path(dir.path(), &SheetNames::default()).is_err());
    }

    #[test]
    fn missing_csv_file_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "GFP.csv", ",S1\nR1,0.3\n");
        let err = load_path(dir.path(), &SheetNames::default()).unwrap_err();
        assert!(format!("{err:#}").contains("mcherry.csv"));
    }

    #[test]
    fn json_dataset_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        write(
            dir.path(),
            "data.json",
            r#"{
                "gfp":     {"receivers": ["R1"], "senders": ["S1", "S2"], "values": [[0.3, 0.5]]},
                "mcherry": {"receivers": ["R1"], "senders": ["S1", "S2"], "values": [[0.4, 0.4]]},
                "time":    {"receivers": ["R1"], "senders": ["S1", "S2"], "values": [["01:00:00", "x"]]}
            }"#,
        );
        let raw = load_path(&path, &SheetNames::default()).unwrap();
        assert_eq!(raw.gfp.values, vec![vec![0.3, 0.5]]);
        assert_eq!(raw.time.values[0][1], "x");
    }

    #[test]
    fn unsupported_extension() {
        let err = load_path(Path::new("data.txt"), &SheetNames::default()).unwrap_err();
        assert!(err.to_string().contains(".txt"));
    }

    #[test]
    fn missing_workbook_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_path(&dir.path().join("absent.xlsx"), &SheetNames::default()).is_err());
    }

    #[test]
    fn excel_time_cells_render_as_hms() {
        assert_eq!(duration_cell(&Cell::DateTime(0.125)), "03:00:00");
        assert_eq!(duration_cell(&Cell::Duration(1.5)), "36:00:00");
        assert_eq!(duration_cell(&Cell::DateTime(30.0 / 86_400.0)), "00:00:30");
        assert_eq!(duration_cell(&Cell::String("02:30:00".into())), "02:30:00");
        assert_eq!(duration_cell(&Cell::Empty), "");
    }

    #[test]
    fn dated_excel_cells_are_undefined_durations() {
        // 2023-03-15 12:00 as an Excel serial
        let dated = duration_cell(&Cell::DateTime(45_000.5));
        assert_eq!(dated, "");
        assert_eq!(normalize_duration(&dated), None);
        assert_eq!(duration_cell(&Cell::DateTime(1.0)), "");

        assert_eq!(normalize_duration(&duration_cell(&Cell::DateTime(0.125))), Some(180.0));
        assert_eq!(normalize_duration(&duration_cell(&Cell::Duration(1.5))), Some(2160.0));
    }

    fn fixture(name: &str) -> std::path::PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("testdata").join(name)
    }

    #[test]
    fn workbook_loads_three_sheets_into_ranking() {
        let raw = load_path(&fixture("promoters_2x2.xlsx"), &SheetNames::default()).unwrap();
        assert_eq!(raw.gfp.receivers, vec!["R1", "R2"]);
        assert_eq!(raw.gfp.senders, vec!["S1", "S2"]);
        assert_eq!(raw.mcherry.values, vec![vec![0.4, 0.4], vec![0.3, 0.5]]);
        assert_eq!(raw.time.values[1][1], "bad");

        let table = raw.to_table().unwrap();
        let target = TargetProfile {
            desired_gfp: 0.4,
            desired_mcherry: 0.4,
            desired_trigger_minutes: 120.0,
        };
        let ranked = top_matches(&table, &target, &ScoreConfig::default(), 10);
        let order: Vec<(&str, &str)> = ranked
            .iter()
            .map(|m| (m.record.receiver.as_str(), m.record.sender.as_str()))
            .collect();
        assert_eq!(order, vec![("R1", "S2"), ("R1", "S1"), ("R2", "S1"), ("R2", "S2")]);
        assert!((ranked[0].diff_score.unwrap() - 0.1).abs() < 1e-9);
        assert!((ranked[1].diff_score.unwrap() - 1.1).abs() < 1e-9);
        assert!((ranked[2].diff_score.unwrap() - (0.1 + 80.0 / 60.0)).abs() < 1e-9);
        assert_eq!(ranked[3].diff_score, None);
    }

    #[test]
    fn workbook_missing_sheet_is_named() {
        let err = load_path(&fixture("promoters_no_mcherry.xlsx"), &SheetNames::default()).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("no sheet named 'mcherry'"), "{msg}");
    }

    #[test]
    fn workbook_numeric_cells() {
        assert_eq!(numeric_cell(&Cell::Int(2)).unwrap(), 2.0);
        assert_eq!(numeric_cell(&Cell::String(" 0.25 ".into())).unwrap(), 0.25);
        assert!(numeric_cell(&Cell::Empty).unwrap().is_nan());
        assert!(numeric_cell(&Cell::Bool(true)).is_err());
    }

    #[test]
    fn workbook_grid_skips_corner_cell() {
        let grid = vec![
            vec![Cell::String("Unnamed: 0".into()), Cell::String("S1".into()), Cell::Empty],
            vec![Cell::String("R1".into()), Cell::Float(0.3), Cell::Empty],
            vec![Cell::Empty, Cell::Empty, Cell::Empty],
        ];
        let m = grid_to_matrix("GFP", &grid, &Cell::Empty, numeric_cell).unwrap();
        assert_eq!(m.receivers, vec!["R1"]);
        assert_eq!(m.senders, vec!["S1"]);
        assert_eq!(m.values, vec![vec![0.3]]);
    }
}
