use crate::month::Month;

/// One cell of the wide source table, before numeric parsing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RawCell {
    /// The column does not exist in the source header.
    #[default]
    Absent,
    /// The column exists but the cell is empty.
    Null,
    /// Raw cell content.
    Text(String),
}

impl RawCell {
    /// Classify a CSV field: blank fields are null, anything else is text.
    pub fn from_field(field: &str) -> RawCell {
        if field.trim().is_empty() {
            RawCell::Null
        } else {
            RawCell::Text(field.to_string())
        }
    }

    /// Numeric value of a cell: null cells zero-fill, text cells are parsed.
    pub fn to_value(&self) -> Result<f64, CellError> {
        match self {
            RawCell::Absent => Err(CellError::Absent),
            RawCell::Null => Ok(0.0),
            RawCell::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| CellError::Unparsable(s.clone())),
        }
    }
}

impl From<f64> for RawCell {
    fn from(value: f64) -> Self {
        RawCell::Text(value.to_string())
    }
}

impl From<&str> for RawCell {
    fn from(value: &str) -> Self {
        RawCell::from_field(value)
    }
}

/// Why a month of a raw record could not become an observation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellError {
    Absent,
    Unparsable(String),
}

/// The four readings a raw record carries for one month.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MonthCells {
    pub lowest: RawCell,
    pub highest: RawCell,
    pub average: RawCell,
    pub exceeding_days: RawCell,
}

/// Parsed readings for one month, in source units (µg/m³ and days).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthValues {
    pub lowest: f64,
    pub highest: f64,
    pub average: f64,
    pub exceeding_days: f64,
}

impl MonthCells {
    /// A month where every reading is present but empty.
    pub fn null() -> Self {
        MonthCells {
            lowest: RawCell::Null,
            highest: RawCell::Null,
            average: RawCell::Null,
            exceeding_days: RawCell::Null,
        }
    }

    pub fn new(
        lowest: impl Into<RawCell>,
        highest: impl Into<RawCell>,
        average: impl Into<RawCell>,
        exceeding_days: impl Into<RawCell>,
    ) -> Self {
        MonthCells {
            lowest: lowest.into(),
            highest: highest.into(),
            average: average.into(),
            exceeding_days: exceeding_days.into(),
        }
    }

    /// Parse all four cells. The first failing cell decides the error.
    pub fn values(&self) -> Result<MonthValues, CellError> {
        Ok(MonthValues {
            lowest: self.lowest.to_value()?,
            highest: self.highest.to_value()?,
            average: self.average.to_value()?,
            exceeding_days: self.exceeding_days.to_value()?,
        })
    }
}

/// One row of the wide source table: a location's readings for one year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub location: String,
    /// Year as written in the source; coerced to an integer when reshaping.
    pub year: String,
    months: [MonthCells; 12],
}

impl RawRecord {
    /// A record with every month column absent.
    pub fn new(location: impl Into<String>, year: impl Into<String>) -> Self {
        RawRecord {
            location: location.into(),
            year: year.into(),
            months: Default::default(),
        }
    }

    /// Builder-style setter for one month's cells.
    pub fn with_month(mut self, month: Month, cells: MonthCells) -> Self {
        self.months[month as usize] = cells;
        self
    }

    /// Builder-style setter that marks every month as present but empty.
    #[cfg(test)]
    pub(crate) fn with_all_months_null(mut self) -> Self {
        for cells in self.months.iter_mut() {
            *cells = MonthCells::null();
        }
        self
    }

    pub fn cells(&self, month: Month) -> &MonthCells {
        &self.months[month as usize]
    }

    pub fn cells_mut(&mut self, month: Month) -> &mut MonthCells {
        &mut self.months[month as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::{CellError, MonthCells, RawCell, RawRecord};
    use crate::month::Month;

    #[test]
    fn test_cell_classification() {
        assert_eq!(RawCell::from_field(""), RawCell::Null);
        assert_eq!(RawCell::from_field("   "), RawCell::Null);
        assert_eq!(RawCell::from_field("12.5"), RawCell::Text("12.5".into()));
    }

    #[test]
    fn test_cell_values() {
        assert_eq!(RawCell::Null.to_value(), Ok(0.0));
        assert_eq!(RawCell::Text(" 42.5 ".into()).to_value(), Ok(42.5));
        assert_eq!(RawCell::Absent.to_value(), Err(CellError::Absent));
        assert_eq!(
            RawCell::Text("N/A".into()).to_value(),
            Err(CellError::Unparsable("N/A".into()))
        );
    }

    #[test]
    fn test_record_builder() {
        let record = RawRecord::new("ParkA", "2023")
            .with_month(Month::Feb, MonthCells::new(10.0, 50.0, 30.0, 2.0));
        assert_eq!(record.cells(Month::Jan), &MonthCells::default());
        let feb = record.cells(Month::Feb).values().unwrap();
        assert_eq!(feb.average, 30.0);
        assert_eq!(feb.exceeding_days, 2.0);
    }
}
