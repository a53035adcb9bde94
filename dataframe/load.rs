use super::*;
use anyhow::{bail, Context, Result};
use std::path::Path;

/// How the cells of one csv column are turned into `Value`s.
#[derive(Clone, Copy, Debug, PartialEq)]
enum InferColumnType {
	Number,
	Text,
}

/// The header and records of a csv, before any cell is converted.
struct RawCsv {
	column_names: Vec<String>,
	records: Vec<csv::StringRecord>,
}

impl DataFrame {
	pub fn from_path(path: &Path) -> Result<Self> {
		let csv = read_path(path)?;
		let column_types = infer_column_types(&[&csv]);
		csv_to_dataframe(csv, &column_types)
			.with_context(|| format!("failed to load csv file {}", path.display()))
	}

	/// Load a training and a test csv whose column types are inferred from both files together. The two files must have the same header.
	pub fn from_path_pair(train_path: &Path, test_path: &Path) -> Result<(Self, Self)> {
		let train = read_path(train_path)?;
		let test = read_path(test_path)?;
		Self::from_raw_pair(train, test)
	}

	/**
	Read a csv with a header row. A column becomes a number column only if every one of its cells parses as a finite number. Otherwise every cell in the column is kept as text, so `"1"` and `"a"` in the same column never compare as different kinds of values.
	*/
	pub fn from_csv<R>(reader: &mut csv::Reader<R>) -> Result<Self>
	where
		R: std::io::Read,
	{
		let csv = read_csv(reader)?;
		let column_types = infer_column_types(&[&csv]);
		csv_to_dataframe(csv, &column_types)
	}

	/// Like `from_csv`, but a column is a number column only if it holds numbers in both csvs.
	pub fn from_csv_pair<R>(
		train_reader: &mut csv::Reader<R>,
		test_reader: &mut csv::Reader<R>,
	) -> Result<(Self, Self)>
	where
		R: std::io::Read,
	{
		let train = read_csv(train_reader)?;
		let test = read_csv(test_reader)?;
		Self::from_raw_pair(train, test)
	}

	fn from_raw_pair(train: RawCsv, test: RawCsv) -> Result<(Self, Self)> {
		if train.column_names != test.column_names {
			bail!("the training and test files have different columns");
		}
		let column_types = infer_column_types(&[&train, &test]);
		Ok((
			csv_to_dataframe(train, &column_types)?,
			csv_to_dataframe(test, &column_types)?,
		))
	}
}

fn read_path(path: &Path) -> Result<RawCsv> {
	let mut reader = csv::Reader::from_path(path)
		.with_context(|| format!("failed to open csv file {}", path.display()))?;
	read_csv(&mut reader).with_context(|| format!("failed to read csv file {}", path.display()))
}

fn read_csv<R>(reader: &mut csv::Reader<R>) -> Result<RawCsv>
where
	R: std::io::Read,
{
	let column_names = reader
		.headers()?
		.into_iter()
		.map(|column_name| column_name.to_owned())
		.collect();
	let records = reader
		.records()
		.collect::<std::result::Result<Vec<csv::StringRecord>, csv::Error>>()?;
	Ok(RawCsv {
		column_names,
		records,
	})
}

/// A column is a number column only if every cell in every one of `csvs` parses as a number.
fn infer_column_types(csvs: &[&RawCsv]) -> Vec<InferColumnType> {
	let n_columns = csvs.first().map(|csv| csv.column_names.len()).unwrap_or(0);
	let mut column_types = vec![InferColumnType::Number; n_columns];
	for record in csvs.iter().flat_map(|csv| csv.records.iter()) {
		for (column_type, value) in column_types.iter_mut().zip(record.iter()) {
			if *column_type == InferColumnType::Number && parse_number(value).is_none() {
				*column_type = InferColumnType::Text;
			}
		}
	}
	column_types
}

fn csv_to_dataframe(csv: RawCsv, column_types: &[InferColumnType]) -> Result<DataFrame> {
	let n_rows = csv.records.len();
	let n_columns = csv.column_names.len();
	let mut values = Vec::with_capacity(n_rows * n_columns);
	for record in csv.records.iter() {
		for (column_type, value) in column_types.iter().zip(record.iter()) {
			let value = match column_type {
				InferColumnType::Number => match parse_number(value) {
					Some(number) => Value::Number(number),
					None => Value::Text(value.to_owned()),
				},
				InferColumnType::Text => Value::Text(value.to_owned()),
			};
			values.push(value);
		}
	}
	let rows = Array2::from_shape_vec((n_rows, n_columns), values)?;
	DataFrame::new(csv.column_names, rows)
}

fn parse_number(value: &str) -> Option<Number> {
	lexical::parse::<f64, _>(value.trim())
		.ok()
		.and_then(|value| Number::new(value).ok())
}

#[test]
fn test_infer() {
	let csv = r#"cap,size,label
x,1,yes
y,2.5,no
z,3,no
"#;
	let df = DataFrame::from_csv(&mut csv::Reader::from_reader(std::io::Cursor::new(csv))).unwrap();
	assert_eq!(df.column_names, vec!["cap", "size", "label"]);
	assert_eq!(df.nrows(), 3);
	let rendered = df
		.rows
		.outer_iter()
		.map(|row| row.iter().map(|value| value.to_string()).join(","))
		.join("\n");
	insta::assert_snapshot!(rendered, @r###"
 x,1,yes
 y,2.5,no
 z,3,no
 "###);
	assert_eq!(df.rows[[1, 1]], Value::number(2.5f64).unwrap());
	assert_eq!(df.rows[[0, 0]], Value::text("x"));
}

#[test]
fn test_mixed_column_is_text() {
	let csv = r#"a,label
1,yes
?,no
"#;
	let df = DataFrame::from_csv(&mut csv::Reader::from_reader(std::io::Cursor::new(csv))).unwrap();
	assert_eq!(df.rows[[0, 0]], Value::text("1"));
	assert_eq!(df.rows[[1, 0]], Value::text("?"));
}

#[test]
fn test_ragged_csv() {
	let csv = r#"a,b,label
1,2,yes
1,no
"#;
	let result = DataFrame::from_csv(&mut csv::Reader::from_reader(std::io::Cursor::new(csv)));
	assert!(result.is_err());
}

#[test]
fn test_pair_shares_column_types() {
	let train = "size,label\n1,yes\n2,no\n1,yes\n2,no\n";
	let test = "size,label\n1,yes\n2,no\n?,no\n";
	let (train, test) = DataFrame::from_csv_pair(
		&mut csv::Reader::from_reader(std::io::Cursor::new(train)),
		&mut csv::Reader::from_reader(std::io::Cursor::new(test)),
	)
	.unwrap();
	assert_eq!(train.rows[[0, 0]], Value::text("1"));
	assert_eq!(test.rows[[0, 0]], Value::text("1"));
	assert_eq!(test.rows[[2, 0]], Value::text("?"));
	let (train, _) = DataFrame::from_csv_pair(
		&mut csv::Reader::from_reader(std::io::Cursor::new("size,label\n1,yes\n")),
		&mut csv::Reader::from_reader(std::io::Cursor::new("size,label\n2.5,no\n")),
	)
	.unwrap();
	assert_eq!(train.rows[[0, 0]], Value::from(1));
}

#[test]
fn test_pair_different_columns() {
	let result = DataFrame::from_csv_pair(
		&mut csv::Reader::from_reader(std::io::Cursor::new("a,label\n1,yes\n")),
		&mut csv::Reader::from_reader(std::io::Cursor::new("b,label\n1,yes\n")),
	);
	assert!(result.is_err());
}
