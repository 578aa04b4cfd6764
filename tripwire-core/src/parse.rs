//! Numeric arguments typed at the prompts.

/// Parse a signed integer the way C's `strtol(s, NULL, 0)` does.
///
/// Leading whitespace and a sign are accepted, `0x` selects hex and a
/// leading `0` octal. Parsing stops at the first byte that is not a digit
/// of the base; no digits at all gives 0. Out of range values saturate.
pub fn parse_int(text: &[u8]) -> i32 {
    let mut rest = text;

    while let [b' ' | b'\t' | b'\x0b' | b'\x0c', tail @ ..] = rest {
        rest = tail;
    }

    let negative = match rest {
        [b'-', tail @ ..] => {
            rest = tail;
            true
        }
        [b'+', tail @ ..] => {
            rest = tail;
            false
        }
        _ => false,
    };

    let radix = match rest {
        [b'0', b'x' | b'X', d, ..] if (*d as char).is_digit(16) => {
            rest = &rest[2..];
            16
        }
        [b'0', ..] => 8,
        _ => 10,
    };

    let mut value: i64 = 0;
    for byte in rest {
        match (*byte as char).to_digit(radix) {
            Some(digit) => {
                value = (value * radix as i64 + digit as i64).min(i64::from(i32::MAX) + 1);
            }
            None => break,
        }
    }

    let value = if negative { -value } else { value };
    value.max(i64::from(i32::MIN)).min(i64::from(i32::MAX)) as i32
}
