//! Object [attribute](https://inform-fiction.org/zmachine/standards/z1point1/sect12.html#three) utility functions
use crate::{error::*, recoverable_error, zmachine::ZMachine};

use super::object_address;

/// Locates the byte holding an attribute and the mask selecting its bit
///
/// Attributes are numbered from the most significant bit of the first byte.
fn location(
    zmachine: &ZMachine,
    object: usize,
    attribute: u8,
    action: &str,
) -> Result<(usize, u8), RuntimeError> {
    let max = if zmachine.version() < 4 { 32 } else { 48 };
    if object == 0 || attribute >= max {
        return recoverable_error!(
            ErrorCode::InvalidObjectAttribute,
            "{} of invalid attribute {} on object {}",
            action,
            attribute,
            object
        );
    }

    let object_address = object_address(zmachine, object)?;
    Ok((
        object_address + (attribute as usize / 8),
        1 << (7 - (attribute % 8)),
    ))
}

/// Tests an attribute
///
/// # Arguments
/// * `zmachine` - Reference to the zmachine
/// * `object` - Object number
/// * `attribute` - Attribute number
///
/// # Returns
/// [Result] with the attribute state or a [RuntimeError]
pub fn value(zmachine: &ZMachine, object: usize, attribute: u8) -> Result<bool, RuntimeError> {
    let (address, mask) = location(zmachine, object, attribute, "Test")?;
    Ok(zmachine.read_byte(address)? & mask == mask)
}

pub fn set(zmachine: &mut ZMachine, object: usize, attribute: u8) -> Result<(), RuntimeError> {
    let (address, mask) = location(zmachine, object, attribute, "Set")?;
    let attribute_byte = zmachine.read_byte(address)?;
    debug!(target: "app::state", "Set attribute {} on object {}", attribute, object);
    zmachine.write_byte(address, attribute_byte | mask)
}

pub fn clear(zmachine: &mut ZMachine, object: usize, attribute: u8) -> Result<(), RuntimeError> {
    let (address, mask) = location(zmachine, object, attribute, "Clear")?;
    let attribute_byte = zmachine.read_byte(address)?;
    debug!(target: "app::state", "Clear attribute {} on object {}", attribute, object);
    zmachine.write_byte(address, attribute_byte & !mask)
}

#[cfg(test)]
mod tests {
    use crate::{assert_ok, assert_ok_eq, test_util::*};

    use super::*;

    #[test]
    fn test_value_v3() {
        let mut map = test_map(3);
        mock_object(&mut map, 1, vec![], (0, 0, 0));
        mock_attributes(&mut map, 1, &[0x80, 0x01, 0x00, 0x10]);
        let zmachine = mock_zmachine(map);
        assert_ok_eq!(value(&zmachine, 1, 0), true);
        assert_ok_eq!(value(&zmachine, 1, 1), false);
        assert_ok_eq!(value(&zmachine, 1, 15), true);
        assert_ok_eq!(value(&zmachine, 1, 27), true);
        assert_ok_eq!(value(&zmachine, 1, 31), false);
    }

    #[test]
    fn test_value_invalid() {
        let mut map = test_map(3);
        mock_object(&mut map, 1, vec![], (0, 0, 0));
        let zmachine = mock_zmachine(map);
        let e = value(&zmachine, 1, 32).unwrap_err();
        assert!(e.is_recoverable());
        assert_eq!(e.code(), ErrorCode::InvalidObjectAttribute);
        assert!(value(&zmachine, 0, 1).is_err());
    }

    #[test]
    fn test_value_v5() {
        let mut map = test_map(5);
        mock_object(&mut map, 2, vec![], (0, 0, 0));
        mock_attributes(&mut map, 2, &[0, 0, 0, 0, 0, 0x01]);
        let zmachine = mock_zmachine(map);
        assert_ok_eq!(value(&zmachine, 2, 47), true);
        assert_ok_eq!(value(&zmachine, 2, 46), false);
        assert!(value(&zmachine, 2, 48).is_err());
    }

    #[test]
    fn test_set_clear() {
        let mut map = test_map(3);
        mock_object(&mut map, 1, vec![], (0, 0, 0));
        let mut zmachine = mock_zmachine(map);
        assert_ok!(set(&mut zmachine, 1, 17));
        assert_ok_eq!(value(&zmachine, 1, 17), true);
        assert_ok_eq!(zmachine.read_byte(0x23E + 2), 0x40);
        assert_ok!(set(&mut zmachine, 1, 16));
        assert_ok!(clear(&mut zmachine, 1, 17));
        assert_ok_eq!(value(&zmachine, 1, 17), false);
        assert_ok_eq!(value(&zmachine, 1, 16), true);
        assert!(clear(&mut zmachine, 1, 40).is_err());
    }
}
