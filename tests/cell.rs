use tvm_cell::{
    Cell,
    cell::{CellError, parse_slice, repr::Descriptor},
};

#[test]
fn new_checks_limits() {
    assert_eq!(
        Cell::new(1024, vec![0; 128], vec![]).unwrap_err(),
        CellError::TooManyBits(1024)
    );

    let children = vec![Cell::default(); 5];
    assert_eq!(
        Cell::new(0, vec![], children).unwrap_err(),
        CellError::TooManyRefs(5)
    );

    assert_eq!(
        Cell::new(9, vec![0], vec![]).unwrap_err(),
        CellError::DataLength {
            expected: 2,
            found: 1
        }
    );

    let cell = Cell::new(1023, vec![0xFF; 128], vec![Cell::default(); 4]).unwrap();
    assert_eq!(cell.bit_len(), 1023);
    assert_eq!(cell.refs().len(), 4);
}

#[test]
fn descriptor_fields() {
    let descriptor = Descriptor::decode([0b0011_1011, 0x03]);

    assert_eq!(descriptor.refs, 3);
    assert!(descriptor.is_exotic);
    assert!(descriptor.has_hashes);
    assert_eq!(descriptor.level_mask, 1);
    assert_eq!(descriptor.data_len(), 2);
    assert!(!descriptor.is_aligned());
}

#[test]
fn parse_with_completion_tag() {
    let (cell, used) = parse_slice(&[0x00, 0x03, 0xAB, 0xC8, 0xEE], vec![]).unwrap();

    assert_eq!(used, 4);
    assert_eq!(cell.bit_len(), 12);
    assert_eq!(cell.data(), &[0xAB, 0xC0]);

    let mut cursor = cell.begin_parse();
    assert_eq!(cursor.load_uint(4).unwrap(), 0xA);
    assert_eq!(cursor.load_uint(8).unwrap(), 0xBC);
}

#[test]
fn parse_aligned_with_ref() {
    let child = Cell::new(8, vec![0x99], vec![]).unwrap();
    let (cell, used) = parse_slice(&[0x01, 0x04, 0x12, 0x34], vec![child.clone()]).unwrap();

    assert_eq!(used, 4);
    assert_eq!(cell.bit_len(), 16);
    assert_eq!(cell.refs(), &[child]);
}

#[test]
fn parse_single_bit_and_empty() {
    let (cell, _) = parse_slice(&[0x00, 0x01, 0x40], vec![]).unwrap();
    assert_eq!(cell.bit_len(), 1);
    assert_eq!(cell.data(), &[0x00]);

    let (cell, used) = parse_slice(&[0x00, 0x00], vec![]).unwrap();
    assert_eq!(used, 2);
    assert_eq!(cell.bit_len(), 0);
    assert!(cell.begin_parse().is_empty());
}

#[test]
fn parse_full_cell() {
    let mut repr = vec![0x00, 0xFF];
    repr.extend([0xFF; 127]);
    repr.push(0xFF);

    let (cell, used) = parse_slice(&repr, vec![]).unwrap();
    assert_eq!(used, 130);
    assert_eq!(cell.bit_len(), 1023);
    assert_eq!(cell.data()[127], 0xFE);
}

#[test]
fn parse_rejects() {
    let cases: [(&[u8], CellError); 7] = [
        (&[], CellError::EndOfSlice),
        (&[0x00, 0x04, 0x12], CellError::EndOfSlice),
        (&[0x00, 0x01, 0x00], CellError::MissingCompletionTag),
        (&[0x00, 0x01, 0x80], CellError::MissingCompletionTag),
        (&[0x08, 0x00], CellError::Exotic),
        (&[0x10, 0x00], CellError::StoredHashes),
        (
            &[0x02, 0x00],
            CellError::RefsMismatch {
                expected: 2,
                found: 0,
            },
        ),
    ];

    for (repr, expected) in cases {
        assert_eq!(parse_slice(repr, vec![]).unwrap_err(), expected, "{repr:02x?}");
    }
}

#[test]
fn level_mask_is_accepted() {
    let (cell, _) = parse_slice(&[0x20, 0x02, 0x7F], vec![]).unwrap();
    assert_eq!(cell.bit_len(), 8);
}

#[cfg(feature = "std")]
#[test]
fn read_from_reader() {
    use std::io::{Cursor, ErrorKind};

    use tvm_cell::cell::{parse_reader, reader::ReadError};

    let mut r = Cursor::new(vec![0x00, 0x03, 0xAB, 0xC8, 0xEE]);
    let cell = parse_reader(&mut r, vec![]).unwrap();

    assert_eq!(cell.bit_len(), 12);
    assert_eq!(r.position(), 4);

    let mut r = Cursor::new(vec![0x00, 0x04, 0x12]);
    let err = parse_reader(&mut r, vec![]).unwrap_err();
    assert!(matches!(err, ReadError::Io(e) if e.kind() == ErrorKind::UnexpectedEof));

    let mut r = Cursor::new(vec![0x08, 0x00]);
    let err = parse_reader(&mut r, vec![]).unwrap_err();
    assert!(matches!(err, ReadError::Cell(CellError::Exotic)));
}
