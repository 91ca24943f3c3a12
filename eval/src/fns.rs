//! Built-in math functions callable from formulas.

/// Unary functions.
const UNARY: &[(&str, fn(f64) -> f64)] = &[
    ("abs", f64::abs),
    ("acos", f64::acos),
    ("acosh", f64::acosh),
    ("asin", f64::asin),
    ("asinh", f64::asinh),
    ("atan", f64::atan),
    ("atanh", f64::atanh),
    ("ceil", f64::ceil),
    ("cos", f64::cos),
    ("cosh", f64::cosh),
    ("exp", f64::exp),
    ("floor", f64::floor),
    ("log", f64::ln),
    ("log10", f64::log10),
    ("log2", f64::log2),
    ("round", f64::round),
    ("sin", f64::sin),
    ("sinh", f64::sinh),
    ("sqrt", f64::sqrt),
    ("tan", f64::tan),
    ("tanh", f64::tanh),
    ("trunc", f64::trunc),
];

/// Binary functions.
const BINARY: &[(&str, fn(f64, f64) -> f64)] = &[
    ("atan2", f64::atan2),
    ("hypot", f64::hypot),
    ("max", f64::max),
    ("min", f64::min),
    ("mod", fmod),
    ("remainder", remainder),
];

fn fmod(x: f64, y: f64) -> f64 {
    x % y
}

/// IEEE 754 remainder: `x - n * y`, where `n` is `x / y` rounded to the nearest integer,
/// with ties going to the even integer.
fn remainder(x: f64, y: f64) -> f64 {
    let rem = x % y;
    if !rem.is_finite() || rem == 0.0 {
        return rem;
    }
    let half = y.abs() / 2.0;
    #[allow(clippy::float_cmp)]
    let rounds_away = rem.abs() > half || (rem.abs() == half && ((x - rem) / y) % 2.0 != 0.0);
    if rounds_away {
        rem - y.abs().copysign(rem)
    } else {
        rem
    }
}

/// Calls a built-in function with the specified args. Returns `None` if there is no function
/// with this name and number of args.
pub(crate) fn call(name: &str, args: &[f64]) -> Option<f64> {
    match *args {
        [x] => UNARY
            .iter()
            .find(|(fn_name, _)| *fn_name == name)
            .map(|(_, function)| function(x)),
        [x, y] => BINARY
            .iter()
            .find(|(fn_name, _)| *fn_name == name)
            .map(|(_, function)| function(x, y)),
        _ => None,
    }
}

/// Returns names of built-in functions grouped by the number of args:
/// unary functions first, then binary ones.
pub fn function_names() -> (Vec<&'static str>, Vec<&'static str>) {
    (
        UNARY.iter().map(|(name, _)| *name).collect(),
        BINARY.iter().map(|(name, _)| *name).collect(),
    )
}
