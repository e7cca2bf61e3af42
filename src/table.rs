use crate::element::{Element, Group, Query};
use serde::Deserialize;
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Element data shipped with the binary.
const EMBEDDED_TABLE: &str = include_str!("../res/table.csv");

/// Value the data file uses for "not known".
const UNKNOWN: i32 = -1;

/// Errors produced while loading element data.
#[derive(Debug, Error)]
pub enum TableError {
    /// The CSV itself could not be read or a field had the wrong type.
    #[error("failed to read element data: {0}")]
    Csv(#[from] csv::Error),

    /// A record parsed but holds a value outside its allowed range.
    #[error("line {line}: {message}")]
    InvalidRecord { line: u64, message: String },

    /// Atomic numbers must run 1, 2, 3, ... in file order.
    #[error("line {line}: expected atomic number {expected}, found {found}")]
    OutOfOrder { line: u64, expected: usize, found: u8 },

    #[error("line {line}: duplicate symbol '{symbol}'")]
    DuplicateSymbol { line: u64, symbol: String },

    #[error("element data contains no records")]
    Empty,
}

/// Errors produced by element lookups.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("Could not find element with atomic number, symbol, or name: {0}")]
    NotFound(String),
}

/// One row of the data file, before validation.
#[derive(Debug, Deserialize)]
struct RawElement {
    name: String,
    symbol: String,
    atomic_number: u8,
    period: u8,
    group: i8,
    electronegativity: f32,
    radius: i16,
}

impl RawElement {
    fn validate(self, line: u64) -> Result<Element, TableError> {
        let invalid = |message: String| TableError::InvalidRecord { line, message };

        if self.name.is_empty() {
            return Err(invalid("element name is empty".to_string()));
        }
        if !is_valid_symbol(&self.symbol) {
            return Err(invalid(format!("malformed symbol '{}'", self.symbol)));
        }
        if !(1..=7).contains(&self.period) {
            return Err(invalid(format!("period {} is out of range", self.period)));
        }
        let group = Group::from_code(self.group)
            .ok_or_else(|| invalid(format!("group {} is out of range", self.group)))?;

        let electronegativity = if self.electronegativity == UNKNOWN as f32 {
            None
        } else if self.electronegativity > 0.0 {
            Some(self.electronegativity)
        } else {
            return Err(invalid(format!(
                "electronegativity {} must be positive or {}",
                self.electronegativity, UNKNOWN
            )));
        };

        let radius = match self.radius {
            r if i32::from(r) == UNKNOWN => None,
            r if r > 0 => Some(r as u16),
            r => {
                return Err(invalid(format!(
                    "radius {} must be positive or {}",
                    r, UNKNOWN
                )));
            }
        };

        Ok(Element {
            name: self.name,
            symbol: self.symbol,
            atomic_number: self.atomic_number,
            period: self.period,
            group,
            electronegativity,
            radius,
        })
    }
}

/// One to three ASCII letters, first one uppercase, the rest lowercase.
fn is_valid_symbol(symbol: &str) -> bool {
    let mut chars = symbol.chars();
    match chars.next() {
        Some(first) if first.is_ascii_uppercase() => {}
        _ => return false,
    }
    symbol.len() <= 3 && chars.all(|c| c.is_ascii_lowercase())
}

/// The in-memory periodic table, ordered by atomic number.
#[derive(Debug, Clone, Default)]
pub struct Table {
    elements: Vec<Element>,
}

impl Table {
    /// Load the table compiled into the binary.
    pub fn embedded() -> Result<Self, TableError> {
        Self::from_reader(EMBEDDED_TABLE.as_bytes())
    }

    /// Load a table from a CSV file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading element data");
        let reader = std::fs::File::open(path).map_err(csv::Error::from)?;
        Self::from_reader(reader)
    }

    /// Parse and validate CSV element data.
    ///
    /// The first row is a header naming the seven columns; surrounding
    /// whitespace in every field is ignored.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, TableError> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers = rdr.headers()?.clone();

        let mut elements = Vec::new();
        let mut symbols = HashSet::new();
        for record in rdr.records() {
            let record = record?;
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            let raw: RawElement = record.deserialize(Some(&headers))?;

            let expected = elements.len() + 1;
            if usize::from(raw.atomic_number) != expected {
                return Err(TableError::OutOfOrder {
                    line,
                    expected,
                    found: raw.atomic_number,
                });
            }
            if !symbols.insert(raw.symbol.clone()) {
                return Err(TableError::DuplicateSymbol {
                    line,
                    symbol: raw.symbol,
                });
            }
            elements.push(raw.validate(line)?);
        }

        if elements.is_empty() {
            return Err(TableError::Empty);
        }
        debug!(count = elements.len(), "element data loaded");
        Ok(Self { elements })
    }

    /// Linear scan for the first element matching `query`.
    pub fn find(&self, query: &Query) -> Option<&Element> {
        self.elements.iter().find(|e| query.matches(e))
    }

    /// Look an element up by atomic number, symbol or name.
    pub fn query(&self, arg: &str) -> Result<&Element, LookupError> {
        self.find(&Query::parse(arg))
            .ok_or_else(|| LookupError::NotFound(arg.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env as stdenv;
    use std::fs;
    use std::io::Write;

    const HEADER: &str = "name,symbol,atomic_number,period,group,electronegativity,radius\n";

    fn load(body: &str) -> Result<Table, TableError> {
        Table::from_reader(format!("{}{}", HEADER, body).as_bytes())
    }

    #[test]
    fn test_embedded_table_is_complete() {
        let table = Table::embedded().unwrap();
        assert_eq!(table.len(), 118);
        for (i, e) in table.iter().enumerate() {
            assert_eq!(usize::from(e.atomic_number), i + 1);
        }
        assert_eq!(table.query("118").unwrap().symbol, "Og");
    }

    #[test]
    fn test_query_by_number_symbol_and_name() {
        let table = Table::embedded().unwrap();
        assert_eq!(table.query("1").unwrap().name, "Hydrogen");
        assert_eq!(table.query("Fe").unwrap().name, "Iron");
        assert_eq!(table.query("gOlD").unwrap().symbol, "Au");
        assert_eq!(table.query("Zirconium").unwrap().atomic_number, 40);
    }

    #[test]
    fn test_query_not_found() {
        let table = Table::embedded().unwrap();
        assert_eq!(
            table.query("0"),
            Err(LookupError::NotFound("0".to_string()))
        );
        assert!(table.query("119").is_err());
        // symbols are case sensitive
        assert!(table.query("fe").is_err());
        assert!(table.query("Unobtainium").is_err());
        assert_eq!(
            table.query("Xx").unwrap_err().to_string(),
            "Could not find element with atomic number, symbol, or name: Xx"
        );
    }

    #[test]
    fn test_series_and_unknown_values() {
        let table = Table::embedded().unwrap();
        let la = table.query("La").unwrap();
        assert_eq!(la.group, Group::Lanthanide);
        assert_eq!(la.radius, None);
        assert_eq!(table.query("U").unwrap().group, Group::Actinide);
        assert_eq!(table.query("He").unwrap().electronegativity, None);
        assert_eq!(table.query("H").unwrap().group, Group::Column(1));
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        let table = load(" Hydrogen , H , 1 , 1 , 1 , 2.20 , 53 \n").unwrap();
        let h = table.query("H").unwrap();
        assert_eq!(h.name, "Hydrogen");
        assert_eq!(h.electronegativity, Some(2.2));
        assert_eq!(h.radius, Some(53));
    }

    #[test]
    fn test_rejects_out_of_order_atomic_numbers() {
        let err = load("Hydrogen,H,1,1,1,2.20,53\nLithium,Li,3,2,1,0.98,167\n").unwrap_err();
        assert!(matches!(
            err,
            TableError::OutOfOrder {
                expected: 2,
                found: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_duplicate_symbol() {
        let err = load("Hydrogen,H,1,1,1,2.20,53\nHelium,H,2,1,18,-1,31\n").unwrap_err();
        assert!(matches!(err, TableError::DuplicateSymbol { line: 3, .. }));
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        let bad_group = load("Hydrogen,H,1,1,19,2.20,53\n").unwrap_err();
        assert!(bad_group.to_string().contains("group 19"));

        let bad_period = load("Hydrogen,H,1,8,1,2.20,53\n").unwrap_err();
        assert!(bad_period.to_string().contains("period 8"));

        let bad_symbol = load("Hydrogen,hy,1,1,1,2.20,53\n").unwrap_err();
        assert!(bad_symbol.to_string().contains("malformed symbol"));

        let upper_tail = load("Helium,HE,1,1,18,-1,31\n").unwrap_err();
        assert!(upper_tail.to_string().contains("malformed symbol 'HE'"));

        let too_long = load("Hydrogen,Hydr,1,1,1,2.20,53\n").unwrap_err();
        assert!(too_long.to_string().contains("malformed symbol"));

        let bad_radius = load("Hydrogen,H,1,1,1,2.20,-5\n").unwrap_err();
        assert!(bad_radius.to_string().contains("radius -5"));

        let bad_en = load("Hydrogen,H,1,1,1,0,53\n").unwrap_err();
        assert!(matches!(bad_en, TableError::InvalidRecord { line: 2, .. }));
    }

    #[test]
    fn test_rejects_malformed_rows() {
        assert!(matches!(
            load("Hydrogen,H,1,1,1,2.20\n").unwrap_err(),
            TableError::Csv(_)
        ));
        assert!(matches!(
            load("Hydrogen,H,one,1,1,2.20,53\n").unwrap_err(),
            TableError::Csv(_)
        ));
        assert!(matches!(load("").unwrap_err(), TableError::Empty));
    }

    #[test]
    fn test_from_path() {
        let mut p = stdenv::temp_dir();
        p.push(format!("ptable_test_{}.csv", std::process::id()));
        let mut f = fs::File::create(&p).unwrap();
        write!(f, "{}Hydrogen,H,1,1,1,2.20,53\nHelium,He,2,1,18,-1,31\n", HEADER).unwrap();
        drop(f);

        let table = Table::from_path(&p).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.query("helium").unwrap().atomic_number, 2);

        let _ = fs::remove_file(&p);
        assert!(Table::from_path(&p).is_err());
    }
}
