use sqlparser::ast::{
    self, Expr, GroupByExpr, ObjectNamePart, SelectItem, SetExpr, Statement, TableFactor,
    TableObject, Value, ValueWithSpan,
};
use sqlparser::dialect::PostgreSqlDialect;
use sqlparser::parser::Parser;

use crate::limits::*;
use crate::model::*;

const TIME_COLUMN: &str = "booking_time";
const NAME_COLUMN: &str = "name";

/// Parsed and validated command from SQL input.
#[derive(Debug, PartialEq)]
pub enum Command {
    InsertBooking { booking: Booking },
    SelectBookings,
}

pub fn parse_sql(sql: &str) -> Result<Command, SqlError> {
    let dialect = PostgreSqlDialect {};
    let stmts = Parser::parse_sql(&dialect, sql).map_err(|e| SqlError::Parse(e.to_string()))?;
    if stmts.is_empty() {
        return Err(SqlError::Empty);
    }
    if stmts.len() > 1 {
        return Err(SqlError::Unsupported("multiple statements".into()));
    }

    match &stmts[0] {
        Statement::Insert(insert) => parse_insert(insert),
        Statement::Query(query) => parse_select(query),
        other => Err(SqlError::Unsupported(format!("{other}"))),
    }
}

fn parse_insert(insert: &ast::Insert) -> Result<Command, SqlError> {
    let table = insert_table_name(insert)?;
    if table != "bookings" {
        return Err(SqlError::UnknownTable(table));
    }

    let values = extract_single_row(insert)?;
    let columns: Vec<String> = insert.columns.iter().map(|c| c.value.to_lowercase()).collect();

    let (time_expr, name_expr) = if columns.is_empty() {
        if values.len() != 2 {
            return Err(SqlError::WrongArity("bookings", 2, values.len()));
        }
        (&values[0], &values[1])
    } else {
        if columns.len() != values.len() {
            return Err(SqlError::WrongArity("bookings", columns.len(), values.len()));
        }
        if let Some(unknown) = columns.iter().find(|c| *c != TIME_COLUMN && *c != NAME_COLUMN) {
            return Err(SqlError::UnknownColumn(unknown.clone()));
        }
        let find = |col: &'static str| {
            columns
                .iter()
                .position(|c| c == col)
                .map(|i| &values[i])
                .ok_or(SqlError::MissingColumn(col))
        };
        (find(TIME_COLUMN)?, find(NAME_COLUMN)?)
    };

    let time_text = parse_text_or_null(time_expr)?.unwrap_or_default();
    let name = parse_text_or_null(name_expr)?.unwrap_or_default();
    let booking = validate_booking(&time_text, name)?;
    Ok(Command::InsertBooking { booking })
}

fn parse_select(query: &ast::Query) -> Result<Command, SqlError> {
    let select = match query.body.as_ref() {
        SetExpr::Select(s) => s,
        _ => return Err(SqlError::Unsupported("non-SELECT query".into())),
    };

    let from = match select.from.as_slice() {
        [] => return Err(SqlError::Parse("SELECT without FROM".into())),
        [from] if from.joins.is_empty() => from,
        _ => return Err(SqlError::Unsupported("joins or multiple tables".into())),
    };
    let table = table_factor_name(&from.relation)?;
    if table != "bookings" {
        return Err(SqlError::UnknownTable(table));
    }

    // Only the full listing exists: every column, every row, in time order.
    if !matches!(select.projection.as_slice(), [SelectItem::Wildcard(_)]) {
        return Err(SqlError::Unsupported("column lists on bookings; use SELECT *".into()));
    }
    if select.selection.is_some() {
        return Err(SqlError::Unsupported("filters on bookings".into()));
    }
    let grouped = !matches!(&select.group_by, GroupByExpr::Expressions(exprs, _) if exprs.is_empty());
    if select.distinct.is_some() || grouped || select.having.is_some() {
        return Err(SqlError::Unsupported("aggregation on bookings".into()));
    }
    if query.order_by.is_some() || query.limit_clause.is_some() || query.fetch.is_some() {
        return Err(SqlError::Unsupported("ordering or limits on bookings".into()));
    }

    Ok(Command::SelectBookings)
}

/// Boundary checks the engine relies on: `HH:MM` inside opening hours and a
/// non-blank name of bounded length.
pub fn validate_booking(time_text: &str, name: String) -> Result<Booking, SqlError> {
    let time: TimeOfDay = time_text.parse().map_err(SqlError::InvalidTime)?;
    if time < OPENING_TIME || time > CLOSING_TIME {
        return Err(SqlError::OutsideOpeningHours(time));
    }
    if name.trim().is_empty() {
        return Err(SqlError::MissingName);
    }
    if name.len() > MAX_NAME_LEN {
        return Err(SqlError::NameTooLong(name.len()));
    }
    Ok(Booking::new(time, name))
}

// ── Helpers ───────────────────────────────────────────────────

fn object_name_last(name: &ast::ObjectName) -> Option<String> {
    name.0.last().and_then(|part| match part {
        ObjectNamePart::Identifier(ident) => Some(ident.value.to_lowercase()),
        _ => None,
    })
}

fn insert_table_name(insert: &ast::Insert) -> Result<String, SqlError> {
    match &insert.table {
        TableObject::TableName(name) => {
            object_name_last(name).ok_or_else(|| SqlError::Parse("empty table name".into()))
        }
        _ => Err(SqlError::Parse("unsupported table object in INSERT".into())),
    }
}

fn table_factor_name(tf: &TableFactor) -> Result<String, SqlError> {
    match tf {
        TableFactor::Table { name, .. } => {
            object_name_last(name).ok_or_else(|| SqlError::Parse("empty table name".into()))
        }
        _ => Err(SqlError::Parse("complex table expression".into())),
    }
}

fn extract_single_row(insert: &ast::Insert) -> Result<&[Expr], SqlError> {
    let body = insert
        .source
        .as_ref()
        .ok_or(SqlError::Parse("no VALUES".into()))?;
    match body.body.as_ref() {
        SetExpr::Values(values) => match values.rows.as_slice() {
            [] => Err(SqlError::Parse("empty VALUES".into())),
            [row] => Ok(row.as_slice()),
            rows => Err(SqlError::MultipleRows(rows.len())),
        },
        _ => Err(SqlError::Parse("expected VALUES".into())),
    }
}

fn extract_value(expr: &Expr) -> Option<&Value> {
    match expr {
        Expr::Value(ValueWithSpan { value, .. }) => Some(value),
        _ => None,
    }
}

fn parse_text_or_null(expr: &Expr) -> Result<Option<String>, SqlError> {
    match extract_value(expr) {
        Some(Value::Null) => Ok(None),
        Some(Value::SingleQuotedString(s)) => Ok(Some(s.clone())),
        Some(value) => Err(SqlError::Parse(format!("expected string, got {value:?}"))),
        None => Err(SqlError::Parse(format!("expected value, got {expr:?}"))),
    }
}

// ── Errors ────────────────────────────────────────────────────

#[derive(Debug, PartialEq)]
pub enum SqlError {
    Parse(String),
    Empty,
    Unsupported(String),
    UnknownTable(String),
    UnknownColumn(String),
    MissingColumn(&'static str),
    WrongArity(&'static str, usize, usize),
    MultipleRows(usize),
    InvalidTime(TimeParseError),
    OutsideOpeningHours(TimeOfDay),
    MissingName,
    NameTooLong(usize),
}

impl std::fmt::Display for SqlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SqlError::Parse(s) => write!(f, "parse error: {s}"),
            SqlError::Empty => write!(f, "empty query"),
            SqlError::Unsupported(s) => write!(f, "unsupported: {s}"),
            SqlError::UnknownTable(t) => write!(f, "unknown table: {t}"),
            SqlError::UnknownColumn(c) => write!(f, "unknown column: {c}"),
            SqlError::MissingColumn(c) => write!(f, "missing column: {c}"),
            SqlError::WrongArity(t, expected, got) => {
                write!(f, "{t}: expected {expected} values, got {got}")
            }
            SqlError::MultipleRows(n) => write!(f, "one booking per statement, got {n} rows"),
            SqlError::InvalidTime(e) => write!(f, "{e}"),
            SqlError::OutsideOpeningHours(_) => write!(
                f,
                "Booking time must be between {OPENING_TIME} and {CLOSING_TIME}"
            ),
            SqlError::MissingName => write!(f, "Name is required"),
            SqlError::NameTooLong(len) => {
                write!(f, "Name is too long ({len} bytes, max {MAX_NAME_LEN})")
            }
        }
    }
}

impl std::error::Error for SqlError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn insert_of(sql: &str) -> Booking {
        match parse_sql(sql).unwrap() {
            Command::InsertBooking { booking } => booking,
            other => panic!("expected InsertBooking, got {other:?}"),
        }
    }

    #[test]
    fn parse_insert_booking() {
        let b = insert_of("INSERT INTO bookings (booking_time, name) VALUES ('09:30', 'John Smith')");
        assert_eq!(b.time, TimeOfDay::from_hm(9, 30));
        assert_eq!(b.name, "John Smith");
    }

    #[test]
    fn parse_insert_columns_any_order() {
        let b = insert_of("INSERT INTO bookings (name, booking_time) VALUES ('Jane', '15:45')");
        assert_eq!(b.time, TimeOfDay::from_hm(15, 45));
        assert_eq!(b.name, "Jane");
    }

    #[test]
    fn parse_insert_without_column_list() {
        let b = insert_of("INSERT INTO bookings VALUES ('10:00', 'Ann')");
        assert_eq!(b.time, TimeOfDay::from_hm(10, 0));
    }

    #[test]
    fn parse_insert_escaped_quote_in_name() {
        let b = insert_of("INSERT INTO bookings (booking_time, name) VALUES ('11:00', 'O''Brien')");
        assert_eq!(b.name, "O'Brien");
    }

    #[test]
    fn parse_select_bookings() {
        assert_eq!(parse_sql("SELECT * FROM bookings").unwrap(), Command::SelectBookings);
        assert_eq!(parse_sql("select * from Bookings;").unwrap(), Command::SelectBookings);
    }

    #[test]
    fn select_shapes_other_than_full_listing_unsupported() {
        for sql in [
            "SELECT booking_id, name FROM bookings",
            "SELECT count(*) FROM bookings",
            "SELECT * FROM bookings ORDER BY name",
            "SELECT * FROM bookings LIMIT 1",
            "SELECT * FROM bookings OFFSET 2",
            "SELECT DISTINCT * FROM bookings",
            "SELECT * FROM bookings GROUP BY name",
            "SELECT * FROM bookings, bookings b2",
            "SELECT * FROM bookings JOIN bookings b2 ON true",
        ] {
            assert!(
                matches!(parse_sql(sql), Err(SqlError::Unsupported(_))),
                "{sql} should be rejected"
            );
        }
    }

    #[test]
    fn select_with_filter_unsupported() {
        assert!(matches!(
            parse_sql("SELECT * FROM bookings WHERE name = 'x'"),
            Err(SqlError::Unsupported(_))
        ));
    }

    #[test]
    fn opening_hours_inclusive() {
        insert_of("INSERT INTO bookings VALUES ('09:00', 'a')");
        insert_of("INSERT INTO bookings VALUES ('16:00', 'a')");
        assert_eq!(
            parse_sql("INSERT INTO bookings VALUES ('08:59', 'a')"),
            Err(SqlError::OutsideOpeningHours(TimeOfDay::from_hm(8, 59)))
        );
        assert_eq!(
            parse_sql("INSERT INTO bookings VALUES ('16:01', 'a')"),
            Err(SqlError::OutsideOpeningHours(TimeOfDay::from_hm(16, 1)))
        );
    }

    #[test]
    fn out_of_hours_message() {
        let err = parse_sql("INSERT INTO bookings VALUES ('17:00', 'a')").unwrap_err();
        assert_eq!(err.to_string(), "Booking time must be between 09:00 and 16:00");
    }

    #[test]
    fn malformed_time_rejected() {
        for bad in ["9:30", "09:30:00", "25:00", "noon"] {
            let sql = format!("INSERT INTO bookings VALUES ('{bad}', 'a')");
            assert!(
                matches!(parse_sql(&sql), Err(SqlError::InvalidTime(TimeParseError::Format(_)))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn empty_or_null_time_rejected() {
        assert_eq!(
            parse_sql("INSERT INTO bookings VALUES ('', 'a')"),
            Err(SqlError::InvalidTime(TimeParseError::Empty))
        );
        assert_eq!(
            parse_sql("INSERT INTO bookings VALUES (NULL, 'a')"),
            Err(SqlError::InvalidTime(TimeParseError::Empty))
        );
    }

    #[test]
    fn numeric_time_rejected() {
        assert!(matches!(
            parse_sql("INSERT INTO bookings VALUES (930, 'a')"),
            Err(SqlError::Parse(_))
        ));
    }

    #[test]
    fn blank_name_rejected() {
        for name in ["''", "'   '", "NULL"] {
            let sql = format!("INSERT INTO bookings VALUES ('10:00', {name})");
            assert_eq!(parse_sql(&sql), Err(SqlError::MissingName), "{name}");
        }
    }

    #[test]
    fn long_name_rejected() {
        let name = "x".repeat(MAX_NAME_LEN + 1);
        let sql = format!("INSERT INTO bookings VALUES ('10:00', '{name}')");
        assert_eq!(parse_sql(&sql), Err(SqlError::NameTooLong(MAX_NAME_LEN + 1)));
    }

    #[test]
    fn multi_row_insert_rejected() {
        let sql = "INSERT INTO bookings VALUES ('10:00', 'a'), ('11:00', 'b')";
        assert_eq!(parse_sql(sql), Err(SqlError::MultipleRows(2)));
    }

    #[test]
    fn column_errors() {
        assert_eq!(
            parse_sql("INSERT INTO bookings (booking_time) VALUES ('10:00')"),
            Err(SqlError::MissingColumn("name"))
        );
        assert_eq!(
            parse_sql("INSERT INTO bookings (booking_time, who) VALUES ('10:00', 'a')"),
            Err(SqlError::UnknownColumn("who".into()))
        );
        assert_eq!(
            parse_sql("INSERT INTO bookings (booking_time, name) VALUES ('10:00')"),
            Err(SqlError::WrongArity("bookings", 2, 1))
        );
        assert_eq!(
            parse_sql("INSERT INTO bookings VALUES ('10:00')"),
            Err(SqlError::WrongArity("bookings", 2, 1))
        );
    }

    #[test]
    fn unknown_table_errors() {
        assert!(matches!(
            parse_sql("INSERT INTO rooms VALUES ('10:00', 'a')"),
            Err(SqlError::UnknownTable(_))
        ));
        assert!(matches!(
            parse_sql("SELECT * FROM rooms"),
            Err(SqlError::UnknownTable(_))
        ));
    }

    #[test]
    fn mutations_other_than_insert_unsupported() {
        assert!(matches!(
            parse_sql("DELETE FROM bookings WHERE name = 'a'"),
            Err(SqlError::Unsupported(_))
        ));
        assert!(matches!(
            parse_sql("UPDATE bookings SET name = 'b'"),
            Err(SqlError::Unsupported(_))
        ));
    }

    #[test]
    fn parse_empty_errors() {
        assert!(matches!(parse_sql(""), Err(SqlError::Empty)));
    }

    #[test]
    fn syntax_error() {
        assert!(matches!(parse_sql("SELEKT * FROM bookings"), Err(SqlError::Parse(_))));
    }
}
