//! Catalog loading
//!
//! Two on-disk formats are accepted:
//! - `*.json`: a JSON array of [`ServiceRecord`] objects
//! - anything else: a tabular text catalog parsed with nom
//!
//! Tabular format:
//! ```text
//! services[2]{name,description,category,subcategory}:
//!   Firewall Setup,network defense,network,perimeter
//!   "Malware Scan, Deep",endpoint defense,endpoint,
//! ```

use std::path::Path;

use nom::{
    branch::alt,
    bytes::complete::{is_not, take_till, take_while1},
    character::complete::{char, digit1, space0},
    combinator::{all_consuming, map_res, opt},
    multi::separated_list1,
    sequence::{delimited, tuple},
    IResult,
};

use crate::error::{Error, Result};
use crate::record::ServiceRecord;

/// Header line of a tabular catalog
#[derive(Debug, Clone, PartialEq)]
pub struct TableHeader {
    /// Collection name (informational)
    pub collection: String,
    /// Declared number of rows
    pub row_count: usize,
    /// Column names in row order
    pub columns: Vec<String>,
}

/// Load a catalog file, choosing the format by extension
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Vec<ServiceRecord>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        parse_json(&text)
    } else {
        parse_table(&text)
    }
}

/// Parse a JSON array of records
pub fn parse_json(text: &str) -> Result<Vec<ServiceRecord>> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    if !value.is_array() {
        return Err(Error::invalid("catalog must be a JSON array"));
    }
    Ok(serde_json::from_value(value)?)
}

/// Parse a tabular catalog
pub fn parse_table(text: &str) -> Result<Vec<ServiceRecord>> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(n, line)| (n + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty());

    let header = match lines.next() {
        Some((_, line)) => parse_header(line)?,
        None => return Err(Error::Parse("empty catalog".to_string())),
    };
    let layout = ColumnLayout::from_header(&header)?;

    let mut records = Vec::with_capacity(header.row_count.min(1024));
    for (line_no, line) in lines {
        let (_, values) = all_consuming(row)(line)
            .map_err(|e| Error::Parse(format!("line {}: {:?}", line_no, e)))?;

        if values.len() != header.columns.len() {
            return Err(Error::Parse(format!(
                "line {}: expected {} values, found {}",
                line_no,
                header.columns.len(),
                values.len()
            )));
        }
        records.push(layout.record(&values));
    }

    if records.len() != header.row_count {
        return Err(Error::Parse(format!(
            "header declares {} rows, found {}",
            header.row_count,
            records.len()
        )));
    }

    Ok(records)
}

/// Parse the `collection[count]{col,...}:` header line
pub fn parse_header(line: &str) -> Result<TableHeader> {
    let (_, (collection, row_count, columns, _)) = all_consuming(tuple((
        identifier,
        delimited(char('['), map_res(digit1, str::parse::<usize>), char(']')),
        delimited(
            char('{'),
            separated_list1(char(','), delimited(space0, identifier, space0)),
            char('}'),
        ),
        char(':'),
    )))(line)?;

    Ok(TableHeader {
        collection: collection.to_string(),
        row_count,
        columns: columns.into_iter().map(str::to_string).collect(),
    })
}

fn identifier(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_')(input)
}

fn quoted(input: &str) -> IResult<&str, &str> {
    delimited(
        space0,
        delimited(char('"'), take_till(|c| c == '"'), char('"')),
        space0,
    )(input)
}

fn bare(input: &str) -> IResult<&str, &str> {
    let (rest, value) = opt(is_not::<_, _, nom::error::Error<&str>>(",\""))(input)?;
    Ok((rest, value.unwrap_or("").trim()))
}

fn row(input: &str) -> IResult<&str, Vec<&str>> {
    separated_list1(char(','), alt((quoted, bare)))(input)
}

/// Positions of the record fields within a row
struct ColumnLayout {
    name: usize,
    description: usize,
    category: usize,
    subcategory: Option<usize>,
}

impl ColumnLayout {
    fn from_header(header: &TableHeader) -> Result<Self> {
        let find = |col: &str| header.columns.iter().position(|c| c == col);
        let require = |col: &str| {
            find(col).ok_or_else(|| Error::invalid(format!("catalog is missing column '{}'", col)))
        };

        Ok(Self {
            name: require("name")?,
            description: require("description")?,
            category: require("category")?,
            subcategory: find("subcategory"),
        })
    }

    fn record(&self, values: &[&str]) -> ServiceRecord {
        ServiceRecord {
            name: values[self.name].to_string(),
            description: values[self.description].to_string(),
            category: values[self.category].to_string(),
            subcategory: self
                .subcategory
                .map(|idx| values[idx])
                .filter(|v| !v.is_empty())
                .map(str::to_string),
        }
    }
}
