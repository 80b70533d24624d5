//! Exclusion keys for rest extraction.

use objrest_ast::{Node, NodeArena, NodeIndex};

/// Canonical exclusion key for a pattern property.
///
/// A non-computed identifier key `n` becomes the string literal `"n"`. A
/// non-computed numeric key becomes the string the runtime would use as the
/// property name (`1.50` is `"1.5"`, `0x10` is `"16"`, `1e3` is `"1000"`),
/// since the helper compares against the strings `for...in` yields. Every
/// other key is a copy of the original key expression; a computed key is
/// evaluated again by the generated call.
pub fn normalize_key(arena: &mut NodeArena, property: NodeIndex) -> NodeIndex {
    let Some(prop) = arena.get_property(property) else {
        return NodeIndex::NONE;
    };
    let (key, computed) = (prop.key, prop.computed);
    if !computed {
        let text = match arena.get(key) {
            Some(Node::Identifier { name }) => Some(name.clone()),
            Some(Node::NumericLiteral { raw }) => numeric_key_text(raw),
            _ => None,
        };
        if let Some(text) = text {
            return arena.string_literal(text);
        }
    }
    arena.clone_subtree(key)
}

/// Property name of a numeric literal key, or `None` when `raw` is not a
/// number this module understands.
pub fn numeric_key_text(raw: &str) -> Option<String> {
    parse_numeric_literal(raw).map(number_to_string)
}

fn parse_numeric_literal(raw: &str) -> Option<f64> {
    let text: String = raw.chars().filter(|&c| c != '_').collect();
    let bytes = text.as_bytes();
    if let [b'0', prefix, rest @ ..] = bytes {
        let radix = match prefix {
            b'x' | b'X' => Some(16),
            b'o' | b'O' => Some(8),
            b'b' | b'B' => Some(2),
            _ => None,
        };
        if let Some(radix) = radix {
            return parse_radix(rest, radix);
        }
        // Legacy octal: `010` is 8, but `019` is decimal.
        if bytes.iter().all(|b| (b'0'..=b'7').contains(b)) {
            return parse_radix(&bytes[1..], 8);
        }
    }
    if !bytes.first().is_some_and(|b| b.is_ascii_digit() || *b == b'.') {
        return None;
    }
    text.parse::<f64>().ok().filter(|value| value.is_finite())
}

fn parse_radix(digits: &[u8], radix: u32) -> Option<f64> {
    if digits.is_empty() {
        return None;
    }
    digits.iter().try_fold(0f64, |acc, &b| {
        char::from(b)
            .to_digit(radix)
            .map(|digit| acc * f64::from(radix) + f64::from(digit))
    })
}

/// `Number.prototype.toString()` for a finite, non-negative value.
fn number_to_string(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    // Shortest round-trip digits, as `d.ddde<exp>`.
    let formatted = format!("{value:e}");
    let Some((mantissa, exponent)) = formatted.split_once('e') else {
        return formatted;
    };
    let digits: String = mantissa.chars().filter(|&c| c != '.').collect();
    let Ok(exponent) = exponent.parse::<i32>() else {
        return formatted;
    };
    let k = digits.len() as i32;
    let n = exponent + 1;

    if k <= n && n <= 21 {
        format!("{digits}{}", "0".repeat((n - k) as usize))
    } else if 0 < n && n <= 21 {
        let (whole, fraction) = digits.split_at(n as usize);
        format!("{whole}.{fraction}")
    } else if -6 < n && n <= 0 {
        format!("0.{}{digits}", "0".repeat((-n) as usize))
    } else {
        let sign = if n - 1 >= 0 { '+' } else { '-' };
        let magnitude = (n - 1).abs();
        match digits.split_at(1) {
            (first, "") => format!("{first}e{sign}{magnitude}"),
            (first, rest) => format!("{first}.{rest}e{sign}{magnitude}"),
        }
    }
}
