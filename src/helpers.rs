//! Public helpers for working with batched requests and varbind values.

use crate::value::Value;

/// Returns true at the boundary positions of an equal-sized partition of
/// `[0, slice_length)`, including the final (possibly short) partition.
///
/// Useful for dispatching a large OID list as batched GETs: collect OIDs
/// until `partition` fires, then send.
///
/// ```
/// use snmp_client::helpers::partition;
///
/// // 8 items in partitions of 3 fire at positions 2, 5, and 7.
/// let fires: Vec<usize> = (0..8).filter(|&i| partition(i, 3, 8)).collect();
/// assert_eq!(fires, vec![2, 5, 7]);
/// ```
pub fn partition(current_position: usize, partition_size: usize, slice_length: usize) -> bool {
    if partition_size == 0 || current_position >= slice_length {
        return false;
    }
    if partition_size == 1 {
        return true;
    }
    if current_position % partition_size == partition_size - 1 {
        return true;
    }
    current_position == slice_length - 1
}

/// Best-effort coercion of a [`Value`] into a wide integer.
///
/// Numeric variants widen losslessly (i128 holds the full signed-64 and
/// unsigned-64 domains). Byte-string variants are parsed as decimal;
/// everything else, including strings that fail to parse, yields 0.
///
/// ```
/// use snmp_client::helpers::to_numeric;
/// use snmp_client::Value;
///
/// assert_eq!(to_numeric(&Value::Counter64(u64::MAX)), u64::MAX as i128);
/// assert_eq!(to_numeric(&Value::Integer(-5)), -5);
/// assert_eq!(to_numeric(&Value::from("1234")), 1234);
/// assert_eq!(to_numeric(&Value::Null), 0);
/// ```
pub fn to_numeric(value: &Value) -> i128 {
    match value {
        Value::Boolean(_) => 0,
        Value::Integer(v) => *v as i128,
        Value::Counter32(v) | Value::Gauge32(v) | Value::TimeTicks(v) | Value::Uinteger32(v) => {
            *v as i128
        }
        Value::Counter64(v) => *v as i128,
        Value::OctetString(data) | Value::ObjectDescription(data) | Value::Opaque(data) => {
            // Numbers sometimes arrive as strings; parse at 64-bit width.
            std::str::from_utf8(data)
                .ok()
                .and_then(|s| s.parse::<i64>().ok())
                .map(|v| v as i128)
                .unwrap_or(0)
        }
        _ => 0,
    }
}
