//! Complex number values
//!
//! Stored as `(re+imi)`, e.g. `(1.5-2i)`. Exponent notation in either
//! part (`(1e+20+2i)`) is accepted on decode.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::StoreValue;
use crate::error::{Result, StoreError};

/// A complex number with real and imaginary parts of type `T`
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Complex<T> {
    pub re: T,
    pub im: T,
}

/// Complex number with `f32` parts (64 bits total)
pub type Complex32 = Complex<f32>;

/// Complex number with `f64` parts (128 bits total)
pub type Complex64 = Complex<f64>;

impl<T> Complex<T> {
    pub fn new(re: T, im: T) -> Self {
        Self { re, im }
    }
}

impl<T: fmt::Display> fmt::Display for Complex<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Negative parts (including -0) already carry their '-'
        let im = self.im.to_string();
        let sign = if im.starts_with('-') { "" } else { "+" };
        write!(f, "({}{}{}i)", self.re, sign, im)
    }
}

/// Split `re±im` at the sign that starts the imaginary part
fn split_parts(body: &str) -> Option<(&str, &str)> {
    let bytes = body.as_bytes();
    (1..bytes.len())
        .rev()
        .find(|&i| {
            matches!(bytes[i], b'+' | b'-') && !matches!(bytes[i - 1], b'e' | b'E')
        })
        .map(|i| body.split_at(i))
}

fn parse_complex<T: FromStr>(raw: &str) -> Option<Complex<T>> {
    let s = raw.trim();
    let s = s
        .strip_prefix('(')
        .and_then(|inner| inner.strip_suffix(')'))
        .unwrap_or(s);
    let body = s.strip_suffix('i')?;
    let (re, im) = split_parts(body)?;
    Some(Complex {
        re: re.parse().ok()?,
        im: im.parse().ok()?,
    })
}

macro_rules! impl_complex {
    ($($t:ty),*) => {
        $(
            impl StoreValue for Complex<$t> {
                fn encode(&self) -> Result<String> {
                    Ok(self.to_string())
                }

                fn decode(raw: &str) -> Result<Self> {
                    parse_complex(raw).ok_or_else(|| StoreError::Decode {
                        reason: "not a complex number".to_string(),
                    })
                }
            }
        )*
    };
}

impl_complex!(f32, f64);
