//! Shared fixtures: MIB-ish data and scripted-agent helpers.

#![allow(dead_code)]

use snmp_client::transport::{MockTransport, ResponseBuilder};
use snmp_client::{Oid, Value, oid};
use std::collections::BTreeMap;
use std::ops::Bound;

/// Decode a hex string (whitespace tolerated) into bytes.
pub fn decode_hex(s: &str) -> Vec<u8> {
    let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    assert!(compact.len() % 2 == 0, "odd-length hex string");
    (0..compact.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&compact[i..i + 2], 16).expect("hex digit"))
        .collect()
}

/// Encode bytes as a lowercase hex string.
pub fn encode_hex(data: &[u8]) -> String {
    data.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Standard system group entries (1.3.6.1.2.1.1).
pub fn system_mib() -> BTreeMap<Oid, Value> {
    let mut data = BTreeMap::new();

    data.insert(
        oid!(1, 3, 6, 1, 2, 1, 1, 1, 0),
        Value::from("Test SNMP Agent"),
    );
    data.insert(
        oid!(1, 3, 6, 1, 2, 1, 1, 2, 0),
        Value::ObjectIdentifier(oid!(1, 3, 6, 1, 4, 1, 99999)),
    );
    data.insert(oid!(1, 3, 6, 1, 2, 1, 1, 3, 0), Value::TimeTicks(123456));
    data.insert(
        oid!(1, 3, 6, 1, 2, 1, 1, 4, 0),
        Value::from("admin@test.local"),
    );
    data.insert(oid!(1, 3, 6, 1, 2, 1, 1, 5, 0), Value::from("test-agent"));
    data.insert(oid!(1, 3, 6, 1, 2, 1, 1, 6, 0), Value::from("Test Lab"));
    data.insert(oid!(1, 3, 6, 1, 2, 1, 1, 7, 0), Value::Integer(72));

    data
}

/// System subtree root: 1.3.6.1.2.1.1
pub fn system_subtree() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1)
}

/// sysDescr.0
pub fn sys_descr() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 1, 0)
}

/// sysUpTime.0
pub fn sys_uptime() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 3, 0)
}

/// Queue the GETNEXT responses a walk over `data` from `root` will consume.
///
/// Plays the role of a well-behaved agent: each response carries the
/// lexicographic successor of the previous OID, and the sequence ends with
/// either the first OID outside the walker's subtree or endOfMibView.
pub fn script_getnext_walk(mock: &MockTransport, data: &BTreeMap<Oid, Value>, root: &Oid) {
    let mut cursor = root.clone();

    loop {
        let successor = data
            .range((Bound::Excluded(cursor.clone()), Bound::Unbounded))
            .next();

        match successor {
            Some((oid, value)) => {
                mock.queue_response(
                    ResponseBuilder::new(0)
                        .varbind(oid.clone(), value.clone())
                        .build_v2c(b"public"),
                );
                if !oid.starts_with(root) {
                    // The walker stops here without asking again.
                    return;
                }
                cursor = oid.clone();
            }
            None => {
                mock.queue_response(
                    ResponseBuilder::new(0)
                        .varbind(cursor.clone(), Value::EndOfMibView)
                        .build_v2c(b"public"),
                );
                return;
            }
        }
    }
}

/// Queue the GETBULK responses a bulk walk over `data` from `root` will
/// consume, batching `max_repetitions` varbinds per response.
pub fn script_bulk_walk(
    mock: &MockTransport,
    data: &BTreeMap<Oid, Value>,
    root: &Oid,
    max_repetitions: usize,
) {
    let mut cursor = root.clone();
    let mut done = false;

    while !done {
        let mut builder = ResponseBuilder::new(0);
        let mut count = 0;

        while count < max_repetitions {
            let successor = data
                .range((Bound::Excluded(cursor.clone()), Bound::Unbounded))
                .next();

            match successor {
                Some((oid, value)) => {
                    builder = builder.varbind(oid.clone(), value.clone());
                    cursor = oid.clone();
                    count += 1;
                    if !oid.starts_with(root) {
                        done = true;
                        break;
                    }
                }
                None => {
                    builder = builder.varbind(cursor.clone(), Value::EndOfMibView);
                    done = true;
                    break;
                }
            }
        }

        mock.queue_response(builder.build_v2c(b"public"));
    }
}
