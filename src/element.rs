use std::fmt;

/// Column of the periodic table an element sits in.
///
/// The f-block series have no column of their own and are reported by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Group {
    /// Regular column, `1..=18`.
    Column(u8),
    Lanthanide,
    Actinide,
}

impl Group {
    /// Raw value used by the data file for lanthanides.
    pub const LANTHANIDE_CODE: i8 = -1;
    /// Raw value used by the data file for actinides.
    pub const ACTINIDE_CODE: i8 = -2;

    /// Decode the data file representation. Returns `None` for anything that
    /// is neither a valid column nor one of the series codes.
    pub fn from_code(code: i8) -> Option<Self> {
        match code {
            1..=18 => Some(Group::Column(code as u8)),
            Self::LANTHANIDE_CODE => Some(Group::Lanthanide),
            Self::ACTINIDE_CODE => Some(Group::Actinide),
            _ => None,
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Group::Column(n) => write!(f, "{}", n),
            Group::Lanthanide => f.write_str("Lanthanide"),
            Group::Actinide => f.write_str("Actinide"),
        }
    }
}

/// A single record of the periodic table.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: String,
    pub symbol: String,
    pub atomic_number: u8,
    pub period: u8,
    pub group: Group,
    /// Pauling electronegativity, `None` when not known.
    pub electronegativity: Option<f32>,
    /// Calculated atomic radius in picometres, `None` when not known.
    pub radius: Option<u16>,
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({})", self.name, self.symbol)?;
        writeln!(f, "Atomic Number: {}", self.atomic_number)?;
        writeln!(f, "Period: {}\tGroup: {}", self.period, self.group)?;
        match self.electronegativity {
            Some(en) => writeln!(f, "Electronegativity: {}", en)?,
            None => writeln!(f, "Electronegativity: unknown")?,
        }
        match self.radius {
            Some(r) => writeln!(f, "Radius: {} pm", r),
            None => writeln!(f, "Radius: unknown"),
        }
    }
}

/// How a user-supplied element argument should be matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    AtomicNumber(u32),
    /// Matched case-sensitively, e.g. `Co` vs `CO`.
    Symbol(String),
    /// Matched ignoring ASCII case.
    Name(String),
}

impl Query {
    /// Classify an argument: integers are atomic numbers, anything up to two
    /// characters long is a symbol and the rest are names.
    pub fn parse(arg: &str) -> Self {
        if let Ok(number) = arg.parse::<u32>() {
            Query::AtomicNumber(number)
        } else if arg.chars().count() <= 2 {
            Query::Symbol(arg.to_string())
        } else {
            Query::Name(arg.to_string())
        }
    }

    pub fn matches(&self, element: &Element) -> bool {
        match self {
            Query::AtomicNumber(n) => u32::from(element.atomic_number) == *n,
            Query::Symbol(s) => element.symbol == *s,
            Query::Name(name) => eq_ignore_case(&element.name, name),
        }
    }
}

/// String equality without case sensitivity (ASCII only).
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.len() == b.len()
        && a
            .chars()
            .zip(b.chars())
            .all(|(x, y)| x.to_ascii_uppercase() == y.to_ascii_uppercase())
}
