use crate::error::NumberError;
use num_bigint::{BigInt, Sign};
use std::convert::TryFrom;
use std::fmt;
use std::str::FromStr;

/// An arbitrary-precision decimal.
///
/// The literal text is kept exactly as written; the value is
/// `unscaled * 10^-scale`, normalized so that `unscaled` carries no trailing
/// zeros. Equality compares values, so `1`, `1.0` and `10e-1` are equal.
#[derive(Clone)]
pub struct Number {
    literal: String,
    unscaled: BigInt,
    scale: i64,
}

struct Parts<'a> {
    negative: bool,
    int: &'a str,
    frac: &'a str,
    exponent: Option<&'a str>,
}

// -? digit+ ('.' digit+)? ([eE] [+-]? digit+)?
fn split(literal: &str) -> Option<Parts<'_>> {
    let bytes = literal.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let negative = bytes.first() == Some(&b'-');
    let int_start = if negative { 1 } else { 0 };
    let mut pos = digits_from(int_start);
    if pos == int_start {
        return None;
    }
    let int = &literal[int_start..pos];

    let mut frac = "";
    if bytes.get(pos) == Some(&b'.') {
        let start = pos + 1;
        pos = digits_from(start);
        if pos == start {
            return None;
        }
        frac = &literal[start..pos];
    }

    let mut exponent = None;
    if let Some(b'e') | Some(b'E') = bytes.get(pos) {
        let start = pos + 1;
        let mut digits_start = start;
        if let Some(b'+') | Some(b'-') = bytes.get(start) {
            digits_start += 1;
        }
        pos = digits_from(digits_start);
        if pos == digits_start {
            return None;
        }
        exponent = Some(&literal[start..pos]);
    }

    if pos != bytes.len() {
        return None;
    }
    Some(Parts {
        negative,
        int,
        frac,
        exponent,
    })
}

impl Number {
    fn from_big_int(literal: String, value: BigInt) -> Self {
        let ten = BigInt::from(10);
        let mut unscaled = value;
        let mut scale = 0i64;
        while unscaled.sign() != Sign::NoSign {
            let rem = &unscaled % &ten;
            if rem.sign() != Sign::NoSign {
                break;
            }
            unscaled = &unscaled / &ten;
            scale -= 1;
        }
        Self {
            literal,
            unscaled,
            scale,
        }
    }

    /// The literal text this number was read from.
    pub fn as_str(&self) -> &str {
        &self.literal
    }

    pub fn is_integer(&self) -> bool {
        self.scale <= 0
    }

    /// The value as an `i64`, if it is integral and in range.
    pub fn as_i64(&self) -> Option<i64> {
        if self.unscaled.sign() == Sign::NoSign {
            return Some(0);
        }
        if self.scale > 0 || self.scale < -18 {
            return None;
        }
        let value = &self.unscaled * BigInt::from(10).pow((-self.scale) as u32);
        i64::try_from(&value).ok()
    }

    /// The nearest `f64`. Precision may be lost.
    pub fn as_f64(&self) -> f64 {
        self.literal.parse().unwrap_or(f64::NAN)
    }

    /// The value as a `BigInt`, if it is integral.
    ///
    /// Large exponents allocate accordingly: `1e100000` yields a 100001-digit
    /// integer.
    pub fn to_big_int(&self) -> Option<BigInt> {
        if self.scale > 0 {
            return None;
        }
        let exponent = u32::try_from(-self.scale).ok()?;
        Some(&self.unscaled * BigInt::from(10).pow(exponent))
    }
}

impl FromStr for Number {
    type Err = NumberError;

    fn from_str(literal: &str) -> Result<Self, Self::Err> {
        if literal.is_empty() {
            return Err(NumberError::Empty);
        }
        let parts = split(literal).ok_or_else(|| NumberError::Invalid {
            literal: literal.to_string(),
        })?;
        let overflow = || NumberError::ExponentOverflow {
            literal: literal.to_string(),
        };

        let exponent = match parts.exponent {
            Some(e) => e.parse::<i64>().map_err(|_| overflow())?,
            None => 0,
        };
        let digits = format!("{}{}", parts.int, parts.frac);
        let significant = digits.trim_end_matches('0');
        if significant.trim_start_matches('0').is_empty() {
            return Ok(Self {
                literal: literal.to_string(),
                unscaled: BigInt::from(0),
                scale: 0,
            });
        }

        let trailing = (digits.len() - significant.len()) as i64;
        let scale = (parts.frac.len() as i64)
            .checked_sub(exponent)
            .and_then(|s| s.checked_sub(trailing))
            .ok_or_else(overflow)?;
        let magnitude =
            BigInt::parse_bytes(significant.as_bytes(), 10).ok_or_else(|| NumberError::Invalid {
                literal: literal.to_string(),
            })?;
        let unscaled = if parts.negative { -magnitude } else { magnitude };

        Ok(Self {
            literal: literal.to_string(),
            unscaled,
            scale,
        })
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.scale == other.scale && self.unscaled == other.unscaled
    }
}

impl Eq for Number {}

// shows the literal, not the BigInt internals
impl fmt::Debug for Number {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Number({})", self.literal)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.literal)
    }
}

impl From<BigInt> for Number {
    fn from(n: BigInt) -> Self {
        Self::from_big_int(n.to_string(), n)
    }
}

macro_rules! impl_from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Number {
                fn from(n: $t) -> Self {
                    Self::from(BigInt::from(n))
                }
            }
        )*
    };
}

impl_from_integer!(i32, i64, u32, u64);
