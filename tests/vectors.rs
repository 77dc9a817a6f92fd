use csv::ReaderBuilder;
use num_bigint::BigUint;
use tvm_cell::{Cell, Error, LoadCell};

#[test]
fn decode_vectors() {
    const PATH: &str = "fixtures/vectors.csv";

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(PATH)
        .unwrap();

    let mut count = 0;

    for record in reader.records() {
        let record = record.unwrap();

        let name = &record[0];
        let bits: usize = record[1].parse().unwrap();
        let cell = Cell::new(bits, hex(&record[2]), vec![]).unwrap();

        let mut cursor = cell.begin_parse();
        let mut loaded = 0;

        for op in record[3].split_whitespace() {
            loaded += apply(&mut cursor, op, name);
            assert_eq!(cursor.bits_loaded(), loaded, "{name}: {op}");
            assert_eq!(cursor.bits_left(), bits - loaded, "{name}: {op}");
        }

        count += 1;
    }

    assert!(count > 0);
}

/// Apply one operation to the cursor, returning the number of bits it
/// consumed.
fn apply(cursor: &mut LoadCell<'_>, op: &str, name: &str) -> usize {
    if let Some(op) = op.strip_prefix('!') {
        let (kind, width) = op.split_at(1);
        let width: usize = width.parse().unwrap();

        let err = match kind {
            "s" => cursor.load_slice(width).unwrap_err(),
            "u" => cursor.load_uint(width).unwrap_err(),
            "b" => cursor.load_big_int(width).unwrap_err(),
            _ => panic!("{name}: unknown operation {op}"),
        };

        if width > 256 && kind != "s" {
            assert_eq!(err, Error::TooBigValue(width), "{name}: {op}");
        } else {
            assert!(
                matches!(err, Error::NotEnoughData { requested, .. } if requested == width),
                "{name}: {op} gave {err:?}"
            );
        }

        return 0;
    }

    let (lhs, expected) = op.split_once('=').unwrap();
    let (kind, width) = lhs.split_at(1);
    let width: usize = width.parse().unwrap_or(0);

    match kind {
        "u" => {
            let expected = u64::from_str_radix(expected, 16).unwrap();
            assert_eq!(cursor.load_uint(width).unwrap(), expected, "{name}: {op}");
            width
        }
        "i" => {
            let expected: i64 = expected.parse().unwrap();
            assert_eq!(cursor.load_int(width).unwrap(), expected, "{name}: {op}");
            width
        }
        "b" => {
            let expected = BigUint::parse_bytes(expected.as_bytes(), 16).unwrap();
            assert_eq!(cursor.load_big_int(width).unwrap(), expected, "{name}: {op}");
            width
        }
        "s" => {
            assert_eq!(cursor.load_slice(width).unwrap(), hex(expected), "{name}: {op}");
            width
        }
        "c" => {
            let before = cursor.bits_loaded();
            let expected = u64::from_str_radix(expected, 16).unwrap();
            assert_eq!(cursor.load_coins().unwrap(), expected, "{name}: {op}");
            cursor.bits_loaded() - before
        }
        "C" => {
            let before = cursor.bits_loaded();
            let expected = BigUint::parse_bytes(expected.as_bytes(), 16).unwrap();
            assert_eq!(cursor.load_big_coins().unwrap(), expected, "{name}: {op}");
            cursor.bits_loaded() - before
        }
        "r" => {
            let (bits, data) = expected.split_once(':').unwrap();
            let bits: usize = bits.parse().unwrap();
            assert_eq!(cursor.rest_bits(), (bits, hex(data)), "{name}: {op}");
            bits
        }
        _ => panic!("{name}: unknown operation {op}"),
    }
}

fn hex(s: &str) -> Vec<u8> {
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).unwrap())
        .collect()
}
