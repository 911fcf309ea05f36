use serde_json::{json, Map, Value};

use crate::api::invoices::{LineItem, UnitCost};
use crate::error::FbooksError;

/// Parse `key=value` CLI arguments into a JSON object.
///
/// Values are auto-coerced: quoted strings have quotes stripped,
/// `true`/`false` become booleans, `null` becomes null, valid numbers
/// become JSON numbers, everything else stays a string.
pub fn parse_field_args(args: &[String]) -> Result<Map<String, Value>, FbooksError> {
    let mut map = Map::new();
    for arg in args {
        let Some((key, raw_value)) = arg.split_once('=') else {
            return Err(FbooksError::InvalidArgument(format!(
                "cannot parse '{arg}': expected 'key=value'"
            )));
        };
        if key.is_empty() {
            return Err(FbooksError::InvalidArgument(format!(
                "empty key in argument '{arg}'"
            )));
        }
        map.insert(key.to_string(), coerce_value(raw_value));
    }
    Ok(map)
}

/// Parse an `--item` spec into a line item.
///
/// Format: comma-separated `key=value` pairs with keys `name` (required),
/// `amount` (required), `qty` (default 1) and `currency` (default USD),
/// e.g. `name=Consulting Services,amount=500.00,qty=2`.
pub fn parse_line_item(spec: &str) -> Result<LineItem, FbooksError> {
    let mut name = None;
    let mut amount = None;
    let mut qty = "1".to_string();
    let mut currency = "USD".to_string();

    for part in spec.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let Some((key, value)) = part.split_once('=') else {
            return Err(FbooksError::InvalidArgument(format!(
                "cannot parse item part '{part}': expected 'key=value'"
            )));
        };
        match key.trim() {
            "name" => name = Some(value.trim().to_string()),
            "amount" => amount = Some(value.trim().to_string()),
            "qty" => qty = value.trim().to_string(),
            "currency" => currency = value.trim().to_string(),
            other => {
                return Err(FbooksError::InvalidArgument(format!(
                    "unknown item key '{other}' (expected name, amount, qty or currency)"
                )));
            }
        }
    }

    let name = name.ok_or_else(|| {
        FbooksError::InvalidArgument(format!("item '{spec}' is missing 'name='"))
    })?;
    let amount = amount.ok_or_else(|| {
        FbooksError::InvalidArgument(format!("item '{spec}' is missing 'amount='"))
    })?;

    Ok(LineItem {
        name,
        qty,
        unit_cost: UnitCost {
            amount,
            code: currency,
        },
    })
}

fn coerce_value(raw: &str) -> Value {
    if ((raw.starts_with('"') && raw.ends_with('"'))
        || (raw.starts_with('\'') && raw.ends_with('\'')))
        && raw.len() >= 2
    {
        return Value::String(raw[1..raw.len() - 1].to_string());
    }

    if raw.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if raw.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    if raw == "null" {
        return Value::Null;
    }
    if let Ok(n) = raw.parse::<i64>() {
        return json!(n);
    }
    if let Ok(f) = raw.parse::<f64>() {
        return json!(f);
    }

    Value::String(raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_field_args_strings() {
        let fields =
            parse_field_args(&["organization=Acme Corp".to_string(), "fname=Ada".to_string()])
                .unwrap();
        assert_eq!(fields["organization"], "Acme Corp");
        assert_eq!(fields["fname"], "Ada");
    }

    #[test]
    fn parse_field_args_coerces_scalars() {
        let fields = parse_field_args(&[
            "vis_state=1".to_string(),
            "active=true".to_string(),
            "note=null".to_string(),
        ])
        .unwrap();
        assert_eq!(fields["vis_state"], 1);
        assert_eq!(fields["active"], true);
        assert_eq!(fields["note"], Value::Null);
    }

    #[test]
    fn parse_field_args_strips_quotes() {
        let fields = parse_field_args(&[r#"organization="Acme, Inc.""#.to_string()]).unwrap();
        assert_eq!(fields["organization"], "Acme, Inc.");
    }

    #[test]
    fn parse_field_args_value_with_equals() {
        let fields = parse_field_args(&["note=a=b".to_string()]).unwrap();
        assert_eq!(fields["note"], "a=b");
    }

    #[test]
    fn parse_field_args_rejects_bare_words() {
        assert!(parse_field_args(&["noseparator".to_string()]).is_err());
    }

    #[test]
    fn parse_field_args_rejects_empty_key() {
        assert!(parse_field_args(&["=value".to_string()]).is_err());
    }

    #[test]
    fn parse_line_item_full() {
        let item =
            parse_line_item("name=Consulting Services,amount=500.00,qty=2,currency=EUR").unwrap();
        assert_eq!(item.name, "Consulting Services");
        assert_eq!(item.qty, "2");
        assert_eq!(item.unit_cost.amount, "500.00");
        assert_eq!(item.unit_cost.code, "EUR");
    }

    #[test]
    fn parse_line_item_defaults() {
        let item = parse_line_item("name=Hosting,amount=25.00").unwrap();
        assert_eq!(item.qty, "1");
        assert_eq!(item.unit_cost.code, "USD");
    }

    #[test]
    fn parse_line_item_missing_name() {
        let err = parse_line_item("amount=25.00").unwrap_err();
        assert!(err.to_string().contains("name"));
    }

    #[test]
    fn parse_line_item_missing_amount() {
        let err = parse_line_item("name=Hosting").unwrap_err();
        assert!(err.to_string().contains("amount"));
    }

    #[test]
    fn parse_line_item_unknown_key() {
        assert!(parse_line_item("name=x,amount=1,color=red").is_err());
    }
}
