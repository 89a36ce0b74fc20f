/// Value → physical representation for each logical type
///
/// Every function here is exact or fails: integers never clamp, decimals never
/// round, dates and instants that fall outside the target width are rejected.
use arrow::datatypes::TimeUnit;
use chrono::{DateTime, Datelike, NaiveTime, Timelike, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::core::{Value, ValueError};
use crate::mapping::LogicalType;

/// `NaiveDate::num_days_from_ce` of 1970-01-01
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// chrono encodes a leap second as `nanosecond() >= 1_000_000_000`
const MAX_NANOS_IN_SECOND: i64 = 999_999_999;

pub(crate) fn mismatch(value: &Value, target: &LogicalType) -> ValueError {
    ValueError::TypeMismatch {
        kind: value.kind(),
        target: target.to_string(),
    }
}

pub(crate) fn out_of_range(value: &Value, target: &LogicalType) -> ValueError {
    ValueError::OutOfRange {
        value: value.to_string(),
        target: target.to_string(),
    }
}

/// Any integer variant, or an integral NUMERIC, narrowed to `T`.
pub(crate) fn integer<T: TryFrom<i128>>(value: &Value, target: &LogicalType) -> Result<T, ValueError> {
    let wide = match value {
        Value::Numeric(d) if d.fract().is_zero() => d.to_i128(),
        other => other.as_i128(),
    }
    .ok_or_else(|| mismatch(value, target))?;
    T::try_from(wide).map_err(|_| out_of_range(value, target))
}

pub(crate) fn float32(value: &Value, target: &LogicalType) -> Result<f32, ValueError> {
    let exact = match value {
        Value::Real(r) => Some(*r),
        Value::Double(d) => {
            let narrowed = *d as f32;
            (d.is_nan() || f64::from(narrowed).to_bits() == d.to_bits()).then_some(narrowed)
        }
        Value::Numeric(d) => d.to_f32().filter(|f| decimal_round_trips(d, f.to_string())),
        other => {
            let wide = other.as_i128().ok_or_else(|| mismatch(value, target))?;
            integer_fits_mantissa(wide, f32::MANTISSA_DIGITS).then_some(wide as f32)
        }
    };
    exact.ok_or_else(|| out_of_range(value, target))
}

pub(crate) fn float64(value: &Value, target: &LogicalType) -> Result<f64, ValueError> {
    let exact = match value {
        Value::Real(r) => Some(f64::from(*r)),
        Value::Double(d) => Some(*d),
        Value::Numeric(d) => d.to_f64().filter(|f| decimal_round_trips(d, f.to_string())),
        other => {
            let wide = other.as_i128().ok_or_else(|| mismatch(value, target))?;
            integer_fits_mantissa(wide, f64::MANTISSA_DIGITS).then_some(wide as f64)
        }
    };
    exact.ok_or_else(|| out_of_range(value, target))
}

/// True when `value` has at most `digits` significant bits, i.e. a float
/// with that mantissa width holds it exactly.
const fn integer_fits_mantissa(value: i128, digits: u32) -> bool {
    let magnitude = value.unsigned_abs();
    magnitude == 0 || (magnitude >> magnitude.trailing_zeros()) < (1_u128 << digits)
}

/// `shortest` is the float's shortest round-trip decimal form.
fn decimal_round_trips(source: &Decimal, shortest: String) -> bool {
    Decimal::from_str_exact(&shortest).is_ok_and(|back| back == *source)
}

/// BOOLEAN values, or BIT-style 0/1 integers.
pub(crate) fn boolean(value: &Value, target: &LogicalType) -> Result<bool, ValueError> {
    if let Some(b) = value.as_bool() {
        return Ok(b);
    }
    match value.as_i128() {
        Some(0) => Ok(false),
        Some(1) => Ok(true),
        Some(_) => Err(out_of_range(value, target)),
        None => Err(mismatch(value, target)),
    }
}

/// Unscaled `i128` for a Decimal128 of the given precision and scale.
pub(crate) fn decimal(value: &Value, precision: u8, scale: i8, target: &LogicalType) -> Result<i128, ValueError> {
    let (mantissa, source_scale) = match value {
        Value::Numeric(d) => (d.mantissa(), d.scale() as i32),
        other => (other.as_i128().ok_or_else(|| mismatch(value, target))?, 0),
    };

    let shift = i32::from(scale) - source_scale;
    let unscaled = if shift >= 0 {
        10_i128
            .checked_pow(shift.unsigned_abs())
            .and_then(|factor| mantissa.checked_mul(factor))
    } else {
        // Dropping digits is only allowed when they are all zero
        10_i128
            .checked_pow(shift.unsigned_abs())
            .filter(|divisor| mantissa % divisor == 0)
            .map(|divisor| mantissa / divisor)
    }
    .ok_or_else(|| out_of_range(value, target))?;

    let limit = 10_u128.pow(u32::from(precision));
    if unscaled.unsigned_abs() >= limit {
        return Err(out_of_range(value, target));
    }
    Ok(unscaled)
}

pub(crate) fn date32(value: &Value, target: &LogicalType) -> Result<i32, ValueError> {
    match value {
        Value::Date(d) => Ok(d.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE),
        other => Err(mismatch(other, target)),
    }
}

/// Units since midnight; digits finer than `unit` are truncated. A leap
/// second is clamped to the last instant of 23:59:59.
pub(crate) fn time_of_day(value: &Value, unit: TimeUnit, target: &LogicalType) -> Result<i64, ValueError> {
    let Value::Time(time) = value else {
        return Err(mismatch(value, target));
    };
    let seconds = i64::from(time.num_seconds_from_midnight());
    let nanos = i64::from(time.nanosecond()).min(MAX_NANOS_IN_SECOND);
    Ok(match unit {
        TimeUnit::Second => seconds,
        TimeUnit::Millisecond => seconds * 1_000 + nanos / 1_000_000,
        TimeUnit::Microsecond => seconds * 1_000_000 + nanos / 1_000,
        TimeUnit::Nanosecond => seconds * 1_000_000_000 + nanos,
    })
}

/// Units since the Unix epoch, UTC. Naive timestamps are read as UTC and
/// offset-bearing ones keep their instant.
pub(crate) fn timestamp(value: &Value, unit: TimeUnit, target: &LogicalType) -> Result<i64, ValueError> {
    let instant: DateTime<Utc> = match value {
        Value::Timestamp(ts) => ts.and_utc(),
        Value::TimestampTz(ts) => ts.with_timezone(&Utc),
        Value::Date(d) => d.and_time(NaiveTime::default()).and_utc(),
        other => return Err(mismatch(other, target)),
    };
    let units = match unit {
        TimeUnit::Second => Some(instant.timestamp()),
        TimeUnit::Millisecond => Some(instant.timestamp_millis()),
        TimeUnit::Microsecond => Some(instant.timestamp_micros()),
        TimeUnit::Nanosecond => instant.timestamp_nanos_opt(),
    };
    units.ok_or_else(|| out_of_range(value, target))
}
