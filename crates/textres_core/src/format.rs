//! printf-style template substitution.
//!
//! Supported syntax: `%[index$][flags][width][.precision]conversion`, plus `%%`
//! and `%n`. `index` is 1-based; `%<s` reuses the previous argument; ordinary
//! specifiers take arguments in sequence, independent of indexed ones.
//!
//! | conversion | accepts            |
//! |------------|--------------------|
//! | `s` `S`    | anything           |
//! | `d`        | integers           |
//! | `x` `X` `o`| integers           |
//! | `f` `e`    | floats             |
//! | `b` `B`    | anything (non-bool → `true`) |
//! | `c`        | integer code point or one-character string |
//!
//! Flags: `-` left-justify, `0` zero-pad, `+` always sign, ` ` space for
//! positive, `,` locale grouping, `#` alternate form (`0x`/`0` prefix).
//! Decimal and grouping separators come from the locale. Floats under `%s`
//! print as plain decimals for magnitudes in `[1e-3, 1e7)` and as `1.0E-5`
//! style scientific notation otherwise.

use thiserror::Error;
use unic_langid::LanguageIdentifier;

use crate::args::FormatArg;

const MAX_FIELD_WIDTH: usize = 4096;
const DEFAULT_FLOAT_PRECISION: usize = 6;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("missing argument {index} for `{spec}`")]
    MissingArgument { index: usize, spec: String },

    #[error("`%{conversion}` cannot format a {arg} argument")]
    IllegalConversion { conversion: char, arg: &'static str },

    #[error("unknown conversion `{0}`")]
    UnknownConversion(char),

    #[error("`%<` used before any argument was consumed")]
    NoPreviousArgument,

    #[error("incomplete format specifier at end of template")]
    Dangling,

    #[error("field width or precision above {MAX_FIELD_WIDTH}")]
    FieldTooWide,
}

/// Separators used when rendering numbers for a locale.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NumberSymbols {
    pub decimal: char,
    pub group: &'static str,
}

impl NumberSymbols {
    pub fn for_locale(locale: &LanguageIdentifier) -> Self {
        match locale.language.as_str() {
            "fr" => Self {
                decimal: ',',
                group: "\u{202f}",
            },
            "de" | "es" | "it" | "nl" | "pt" | "id" | "da" | "tr" | "el" | "ro" | "hr" | "sr"
            | "sl" => Self {
                decimal: ',',
                group: ".",
            },
            "ru" | "uk" | "be" | "pl" | "cs" | "sk" | "sv" | "nb" | "nn" | "no" | "fi" | "et"
            | "lt" | "lv" | "hu" | "bg" => Self {
                decimal: ',',
                group: "\u{a0}",
            },
            _ => Self::default(),
        }
    }
}

impl Default for NumberSymbols {
    fn default() -> Self {
        Self {
            decimal: '.',
            group: ",",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ArgIndex {
    Ordinary,
    Explicit(usize),
    Previous,
}

#[derive(Clone, Copy, Debug, Default)]
struct Flags {
    left: bool,
    zero: bool,
    plus: bool,
    space: bool,
    group: bool,
    alternate: bool,
}

#[derive(Clone, Copy, Debug)]
struct Spec {
    index: ArgIndex,
    flags: Flags,
    width: Option<usize>,
    precision: Option<usize>,
    conversion: char,
}

/// Substitute `args` into `template` using the separators of `locale`.
pub fn format_template(
    template: &str,
    args: &[FormatArg],
    locale: &LanguageIdentifier,
) -> Result<String, FormatError> {
    format_with_symbols(template, args, NumberSymbols::for_locale(locale))
}

pub fn format_with_symbols(
    template: &str,
    args: &[FormatArg],
    symbols: NumberSymbols,
) -> Result<String, FormatError> {
    if !template.contains('%') {
        return Ok(template.to_string());
    }

    let mut out = String::with_capacity(template.len() + 16);
    let mut ordinal = 0usize;
    let mut last: Option<usize> = None;
    let mut rest = template;

    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        let (spec, consumed) = parse_spec(&rest[pos + 1..])?;
        let spec_text = &rest[pos..pos + 1 + consumed];
        rest = &rest[pos + 1 + consumed..];

        match spec.conversion {
            '%' => pad_into(&mut out, "%", &spec),
            'n' => out.push('\n'),
            _ => {
                let index = match spec.index {
                    ArgIndex::Ordinary => {
                        ordinal += 1;
                        ordinal - 1
                    }
                    ArgIndex::Explicit(i) => i.checked_sub(1).ok_or_else(|| {
                        FormatError::MissingArgument {
                            index: 0,
                            spec: spec_text.to_string(),
                        }
                    })?,
                    ArgIndex::Previous => last.ok_or(FormatError::NoPreviousArgument)?,
                };
                let arg = args.get(index).ok_or_else(|| FormatError::MissingArgument {
                    index: index + 1,
                    spec: spec_text.to_string(),
                })?;
                last = Some(index);

                let body = convert(&spec, arg, symbols)?;
                pad_into(&mut out, &body, &spec);
            }
        }
    }

    out.push_str(rest);
    Ok(out)
}

/// Parse the specifier following a `%`. Returns it and the bytes consumed.
fn parse_spec(s: &str) -> Result<(Spec, usize), FormatError> {
    let bytes = s.as_bytes();
    let mut i = 0;

    let mut index = ArgIndex::Ordinary;
    if bytes.first() == Some(&b'<') {
        index = ArgIndex::Previous;
        i = 1;
    } else {
        let digits = count_digits(&bytes[i..]);
        if digits > 0 && bytes.get(digits) == Some(&b'$') {
            index = ArgIndex::Explicit(parse_number(&s[..digits])?);
            i = digits + 1;
        }
    }

    let mut flags = Flags::default();
    while let Some(&b) = bytes.get(i) {
        match b {
            b'-' => flags.left = true,
            b'0' => flags.zero = true,
            b'+' => flags.plus = true,
            b' ' => flags.space = true,
            b',' => flags.group = true,
            b'#' => flags.alternate = true,
            _ => break,
        }
        i += 1;
    }

    let mut width = None;
    let digits = count_digits(&bytes[i..]);
    if digits > 0 {
        width = Some(parse_number(&s[i..i + digits])?);
        i += digits;
    }

    let mut precision = None;
    if bytes.get(i) == Some(&b'.') {
        let digits = count_digits(&bytes[i + 1..]);
        precision = Some(if digits == 0 {
            0
        } else {
            parse_number(&s[i + 1..i + 1 + digits])?
        });
        i += 1 + digits;
    }

    let conversion = s[i..].chars().next().ok_or(FormatError::Dangling)?;
    Ok((
        Spec {
            index,
            flags,
            width,
            precision,
            conversion,
        },
        i + conversion.len_utf8(),
    ))
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

fn parse_number(digits: &str) -> Result<usize, FormatError> {
    match digits.parse::<usize>() {
        Ok(n) if n <= MAX_FIELD_WIDTH => Ok(n),
        _ => Err(FormatError::FieldTooWide),
    }
}

fn convert(spec: &Spec, arg: &FormatArg, symbols: NumberSymbols) -> Result<String, FormatError> {
    let illegal = || FormatError::IllegalConversion {
        conversion: spec.conversion,
        arg: arg.type_name(),
    };

    match spec.conversion {
        's' | 'S' => {
            let mut s = match arg {
                FormatArg::Str(s) => s.clone(),
                FormatArg::Int(i) => i.to_string(),
                FormatArg::Float(f) => float_to_string(*f),
                FormatArg::Bool(b) => b.to_string(),
                FormatArg::Text(_) => return Err(illegal()),
            };
            if let Some(p) = spec.precision {
                if let Some((cut, _)) = s.char_indices().nth(p) {
                    s.truncate(cut);
                }
            }
            if spec.conversion == 'S' {
                s = s.to_uppercase();
            }
            Ok(s)
        }
        'd' => match arg {
            FormatArg::Int(i) => {
                let digits = i.unsigned_abs().to_string();
                let digits = if spec.flags.group {
                    group_digits(&digits, symbols.group)
                } else {
                    digits
                };
                Ok(with_sign(*i < 0, &spec.flags, digits))
            }
            _ => Err(illegal()),
        },
        'x' | 'X' | 'o' => match arg {
            FormatArg::Int(i) => {
                let v = *i as u64;
                let (mut s, prefix) = match spec.conversion {
                    'o' => (format!("{v:o}"), "0"),
                    _ => (format!("{v:x}"), "0x"),
                };
                if spec.flags.alternate {
                    s.insert_str(0, prefix);
                }
                if spec.conversion == 'X' {
                    s = s.to_uppercase();
                }
                Ok(s)
            }
            _ => Err(illegal()),
        },
        'f' | 'e' => match arg {
            FormatArg::Float(f) => Ok(format_float(*f, spec, symbols)),
            _ => Err(illegal()),
        },
        'b' | 'B' => {
            let s = match arg {
                FormatArg::Bool(b) => b.to_string(),
                _ => "true".to_string(),
            };
            Ok(if spec.conversion == 'B' {
                s.to_uppercase()
            } else {
                s
            })
        }
        'c' => match arg {
            FormatArg::Int(i) => u32::try_from(*i)
                .ok()
                .and_then(char::from_u32)
                .map(String::from)
                .ok_or_else(illegal),
            FormatArg::Str(s) if s.chars().count() == 1 => Ok(s.clone()),
            _ => Err(illegal()),
        },
        other => Err(FormatError::UnknownConversion(other)),
    }
}

/// `%s` rendering of a float: plain decimal for magnitudes in `[1e-3, 1e7)`,
/// `d.dddE±n` outside it, always with at least one fractional digit.
fn float_to_string(f: f64) -> String {
    if f.is_nan() {
        return "NaN".to_string();
    }
    if f.is_infinite() {
        return if f < 0.0 { "-Infinity" } else { "Infinity" }.to_string();
    }
    if f == 0.0 {
        return if f.is_sign_negative() { "-0.0" } else { "0.0" }.to_string();
    }

    if (1e-3..1e7).contains(&f.abs()) {
        let s = f.to_string();
        return if s.contains('.') { s } else { format!("{s}.0") };
    }

    let raw = format!("{f:e}");
    let (mantissa, exp) = raw.split_once('e').unwrap_or((raw.as_str(), "0"));
    if mantissa.contains('.') {
        format!("{mantissa}E{exp}")
    } else {
        format!("{mantissa}.0E{exp}")
    }
}

fn format_float(f: f64, spec: &Spec, symbols: NumberSymbols) -> String {
    if f.is_nan() {
        return "NaN".to_string();
    }
    if f.is_infinite() {
        return with_sign(f < 0.0, &spec.flags, "Infinity".to_string());
    }

    let precision = spec.precision.unwrap_or(DEFAULT_FLOAT_PRECISION);
    let magnitude = f.abs();

    let body = if spec.conversion == 'e' {
        let raw = format!("{magnitude:.precision$e}");
        let (mantissa, exp) = raw.split_once('e').unwrap_or((raw.as_str(), "0"));
        let exp: i32 = exp.parse().unwrap_or(0);
        let mantissa = mantissa.replace('.', &symbols.decimal.to_string());
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exp.unsigned_abs())
    } else {
        let raw = format!("{magnitude:.precision$}");
        let (int_part, frac_part) = match raw.split_once('.') {
            Some((i, f)) => (i.to_string(), Some(f.to_string())),
            None => (raw.clone(), None),
        };
        let int_part = if spec.flags.group {
            group_digits(&int_part, symbols.group)
        } else {
            int_part
        };
        match frac_part {
            Some(frac) => format!("{int_part}{}{frac}", symbols.decimal),
            None => int_part,
        }
    };

    with_sign(f.is_sign_negative() && magnitude != 0.0, &spec.flags, body)
}

fn with_sign(negative: bool, flags: &Flags, body: String) -> String {
    if negative {
        format!("-{body}")
    } else if flags.plus {
        format!("+{body}")
    } else if flags.space {
        format!(" {body}")
    } else {
        body
    }
}

fn group_digits(digits: &str, sep: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3 * sep.len());
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push_str(sep);
        }
        out.push(c);
    }
    out
}

fn pad_into(out: &mut String, body: &str, spec: &Spec) {
    let len = body.chars().count();
    let Some(width) = spec.width.filter(|&w| w > len) else {
        out.push_str(body);
        return;
    };
    let fill = width - len;

    if spec.flags.left {
        out.push_str(body);
        out.extend(std::iter::repeat(' ').take(fill));
    } else if spec.flags.zero && matches!(spec.conversion, 'd' | 'x' | 'X' | 'o' | 'f' | 'e') {
        let mut prefix = body
            .chars()
            .take_while(|c| matches!(c, '-' | '+' | ' '))
            .count();
        let radix_prefix = body[prefix..]
            .get(..2)
            .is_some_and(|p| p.eq_ignore_ascii_case("0x"));
        if spec.flags.alternate && radix_prefix {
            prefix += 2;
        }
        out.push_str(&body[..prefix]);
        out.extend(std::iter::repeat('0').take(fill));
        out.push_str(&body[prefix..]);
    } else {
        out.extend(std::iter::repeat(' ').take(fill));
        out.push_str(body);
    }
}
