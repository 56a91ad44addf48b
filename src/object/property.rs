//! Object [property](https://inform-fiction.org/zmachine/standards/z1point1/sect12.html#four) utility functions
use crate::{
    error::*, fatal_error, recoverable_error, text, zmachine::ZMachine,
};

use super::object_address;

/// Gets the property table byte address for an object
///
/// # Arguments
/// * `zmachine` - Reference to the zmachine
/// * `object` - Object number
///
/// # Returns
/// [Result] with the byte address of the property table or a [RuntimeError]
pub(crate) fn property_table_address(
    zmachine: &ZMachine,
    object: usize,
) -> Result<usize, RuntimeError> {
    if object == 0 {
        return recoverable_error!(
            ErrorCode::InvalidObjectTree,
            "Object 0 has no properties"
        );
    }

    let object_address = object_address(zmachine, object)?;
    let offset = if zmachine.version() < 4 { 7 } else { 12 };
    Ok(zmachine.read_word(object_address + offset)? as usize)
}

/// Decodes the size byte(s) of a property entry
///
/// # Returns
/// [Result] with a tuple (property number, header bytes, data size) or a [RuntimeError]
fn entry(zmachine: &ZMachine, property_address: usize) -> Result<(u8, usize, usize), RuntimeError> {
    let size_byte = zmachine.read_byte(property_address)?;
    if zmachine.version() < 4 {
        Ok((size_byte & 0x1F, 1, (size_byte as usize >> 5) + 1))
    } else if size_byte & 0x80 == 0x80 {
        let size = zmachine.read_byte(property_address + 1)? as usize & 0x3F;
        Ok((size_byte & 0x3F, 2, if size == 0 { 64 } else { size }))
    } else if size_byte & 0x40 == 0x40 {
        Ok((size_byte & 0x3F, 1, 2))
    } else {
        Ok((size_byte & 0x3F, 1, 1))
    }
}

/// Address of the first property entry, past the short name
fn first_entry(zmachine: &ZMachine, object: usize) -> Result<usize, RuntimeError> {
    let property_table_address = property_table_address(zmachine, object)?;
    let header_size = zmachine.read_byte(property_table_address)? as usize;
    Ok(property_table_address + 1 + (header_size * 2))
}

/// Gets the byte address for a specific property entry for an object.
///
/// The whole list is scanned up to its terminator, so properties needn't be in descending order.
/// If the property does not exist for the object, 0 is returned.
fn address(zmachine: &ZMachine, object: usize, property: u8) -> Result<usize, RuntimeError> {
    let mut property_address = first_entry(zmachine, object)?;
    while zmachine.read_byte(property_address)? != 0 {
        let (number, header, size) = entry(zmachine, property_address)?;
        if number == property {
            return Ok(property_address);
        }
        property_address = property_address + header + size;
    }

    Ok(0)
}

/// Gets the byte address of an object's property
///
/// If the property does not exist for the object, 0 is returned.
/// # Arguments
/// * `zmachine` - Reference to the zmachine
/// * `object` - Object number
/// * `property` - Property number
///
/// # Returns
/// [Result] with the byte address of the property data, 0, or a [RuntimeError]
pub fn property_data_address(
    zmachine: &ZMachine,
    object: usize,
    property: u8,
) -> Result<usize, RuntimeError> {
    let property_address = address(zmachine, object, property)?;
    if property_address == 0 {
        Ok(0)
    } else {
        let (_, header, _) = entry(zmachine, property_address)?;
        Ok(property_address + header)
    }
}

/// Gets the length of a property's data
///
/// If the `property_data_address` is 0, 0 is returned.  The size byte immediately before the data
/// is either the only size byte or, in V4+, the second of two, which always has its top bit set.
///
/// # Arguments
/// * `zmachine` - Reference to the zmachine
/// * `property_data_address` - Byte address of the property's data
///
/// # Returns
/// [Result] the length of a property's data, 0, or a [RuntimeError]
pub fn property_length(
    zmachine: &ZMachine,
    property_data_address: usize,
) -> Result<usize, RuntimeError> {
    if property_data_address == 0 {
        return Ok(0);
    }

    let size_byte = zmachine.read_byte(property_data_address - 1)?;
    if zmachine.version() < 4 {
        Ok((size_byte as usize >> 5) + 1)
    } else if size_byte & 0x80 == 0x80 {
        let size = size_byte as usize & 0x3F;
        Ok(if size == 0 { 64 } else { size })
    } else if size_byte & 0x40 == 0x40 {
        Ok(2)
    } else {
        Ok(1)
    }
}

/// Decodes the short name of an object
///
/// # Arguments
/// * `zmachine` - Reference to the zmachine
/// * `object` - Object number
///
/// # Returns
/// [Result] with the object name, which may be empty, or a [RuntimeError]
pub fn short_name(zmachine: &ZMachine, object: usize) -> Result<String, RuntimeError> {
    let property_table_address = property_table_address(zmachine, object)?;
    let header_count = zmachine.read_byte(property_table_address)? as usize;
    let mut ztext = Vec::new();
    for i in 0..header_count {
        ztext.push(zmachine.read_word(property_table_address + 1 + (i * 2))?);
    }

    text::from_vec(zmachine, &ztext, false)
}

/// Gets the default value of a property from the table preceding the object entries
fn default_property(zmachine: &ZMachine, property: u8) -> Result<u16, RuntimeError> {
    let max = if zmachine.version() < 4 { 31 } else { 63 };
    if property == 0 || property > max {
        return fatal_error!(
            ErrorCode::InvalidObjectProperty,
            "Property number {} out of range 1-{}",
            property,
            max
        );
    }

    let object_table = zmachine.header().object_table();
    zmachine.read_word(object_table + ((property as usize - 1) * 2))
}

/// Gets the value of a property for an object
///
/// A 1-byte property yields its byte value; longer properties yield their first word. If the property
/// does not exist for the object, the default property word value is returned.
///
/// # Arguments
/// * `zmachine` - Reference to the zmachine
/// * `object` - Object number
/// * `property` - Property number
///
/// # Returns
/// [Result] with the property value or a [RuntimeError]
pub fn property(zmachine: &ZMachine, object: usize, property: u8) -> Result<u16, RuntimeError> {
    let property_address = address(zmachine, object, property)?;
    if property_address == 0 {
        default_property(zmachine, property)
    } else {
        let (_, header, size) = entry(zmachine, property_address)?;
        if size == 1 {
            Ok(zmachine.read_byte(property_address + header)? as u16)
        } else {
            if size > 2 {
                debug!(target: "app::trace", "Read of property {} on object {} with size {}", property, object, size);
            }
            zmachine.read_word(property_address + header)
        }
    }
}

/// Gets the next property set on an object.
///
/// Properties are walked in table order.  If `property` is 0, the first property number on the object is returned.
/// If there is no next property, 0 is returned.
///
/// # Arguments
/// * `zmachine` - Reference to the zmachine
/// * `object` - Object number
/// * `property` - Property number
///
/// # Returns
/// [Result] with the next property number set for the object, 0, or a [RuntimeError]
pub fn next_property(zmachine: &ZMachine, object: usize, property: u8) -> Result<u8, RuntimeError> {
    let next_address = if property == 0 {
        first_entry(zmachine, object)?
    } else {
        let property_address = address(zmachine, object, property)?;
        if property_address == 0 {
            return recoverable_error!(
                ErrorCode::InvalidObjectProperty,
                "Object {} does not have property {}",
                object,
                property
            );
        }
        let (_, header, size) = entry(zmachine, property_address)?;
        property_address + header + size
    };

    if zmachine.read_byte(next_address)? == 0 {
        Ok(0)
    } else {
        let (number, _, _) = entry(zmachine, next_address)?;
        Ok(number)
    }
}

/// Lists the property numbers on an object in table order
///
/// # Arguments
/// * `zmachine` - Reference to the zmachine
/// * `object` - Object number
///
/// # Returns
/// [Result] with the property numbers or a [RuntimeError]
pub fn properties(zmachine: &ZMachine, object: usize) -> Result<Vec<u8>, RuntimeError> {
    let mut result = Vec::new();
    let mut property_address = first_entry(zmachine, object)?;
    while zmachine.read_byte(property_address)? != 0 && result.len() < 64 {
        let (number, header, size) = entry(zmachine, property_address)?;
        result.push(number);
        property_address = property_address + header + size;
    }

    Ok(result)
}

/// Sets the value of a property for an object.
///
/// The property must exist on the object. A 1-byte property takes the low byte of `value`, anything
/// longer has its first word set.
///
/// # Arguments
/// * `zmachine` - Reference to the zmachine
/// * `object` - Object number
/// * `property` - Property number
/// * `value` - Byte or word value to set
///
/// # Returns
/// Empty [Result] or a [RuntimeError]
pub fn set_property(
    zmachine: &mut ZMachine,
    object: usize,
    property: u8,
    value: u16,
) -> Result<(), RuntimeError> {
    let property_address = address(zmachine, object, property)?;
    if property_address == 0 {
        return recoverable_error!(
            ErrorCode::InvalidObjectProperty,
            "Object {} does not have property {}",
            object,
            property
        );
    }

    let (_, header, size) = entry(zmachine, property_address)?;
    debug!(target: "app::state", "Set property {} on object {} to {:04x}", property, object, value);
    if size == 1 {
        zmachine.write_byte(property_address + header, value as u8)
    } else {
        zmachine.write_word(property_address + header, value)
    }
}

#[cfg(test)]
mod tests {
    use crate::{assert_ok, assert_ok_eq, test_util::*};

    use super::*;

    fn objects(version: u8) -> ZMachine {
        let mut map = test_map(version);
        mock_default_properties(&mut map);
        // "mxyzpltk"
        mock_object(&mut map, 1, vec![0x4BBE, 0x7EB1, 0xE605], (0, 0, 0));
        mock_properties(
            &mut map,
            1,
            &[
                (20, &vec![0x12, 0x34, 0x56, 0x78]),
                (15, &vec![0x9A, 0xBC]),
                (4, &vec![0xDE]),
            ],
        );
        mock_object(&mut map, 2, vec![], (0, 0, 0));
        mock_zmachine(map)
    }

    #[test]
    fn test_property_table_address() {
        let zmachine = objects(3);
        assert_ok_eq!(property_table_address(&zmachine, 1), 0x300);
        assert_ok_eq!(property_table_address(&zmachine, 2), 0x314);
        assert!(property_table_address(&zmachine, 0).is_err());
    }

    #[test]
    fn test_short_name() {
        let zmachine = objects(3);
        assert_ok_eq!(short_name(&zmachine, 1), "mxyzpltk");
        assert_ok_eq!(short_name(&zmachine, 2), "");
    }

    #[test]
    fn test_property_v3() {
        let zmachine = objects(3);
        assert_ok_eq!(property(&zmachine, 1, 15), 0x9ABC);
        assert_ok_eq!(property(&zmachine, 1, 4), 0xDE);
        assert_ok_eq!(property(&zmachine, 1, 20), 0x1234);
    }

    #[test]
    fn test_property_v5() {
        let zmachine = objects(5);
        assert_ok_eq!(property(&zmachine, 1, 15), 0x9ABC);
        assert_ok_eq!(property(&zmachine, 1, 4), 0xDE);
        assert_ok_eq!(property(&zmachine, 1, 20), 0x1234);
    }

    #[test]
    fn test_property_default() {
        let zmachine = objects(3);
        // Defaults are ((n - 1) % 16, n - 1)
        assert_ok_eq!(property(&zmachine, 1, 10), 0x0909);
        assert_ok_eq!(property(&zmachine, 1, 18), 0x0111);
        assert_ok_eq!(property(&zmachine, 2, 1), 0x0000);
        assert!(property(&zmachine, 1, 0).is_err());
    }

    #[test]
    fn test_property_data_address_and_length_v3() {
        let zmachine = objects(3);
        // 7 bytes of short name, then 20: 4 bytes
        assert_ok_eq!(property_data_address(&zmachine, 1, 20), 0x308);
        assert_ok_eq!(property_length(&zmachine, 0x308), 4);
        assert_ok_eq!(property_data_address(&zmachine, 1, 15), 0x30D);
        assert_ok_eq!(property_length(&zmachine, 0x30D), 2);
        assert_ok_eq!(property_data_address(&zmachine, 1, 4), 0x310);
        assert_ok_eq!(property_length(&zmachine, 0x310), 1);
        assert_ok_eq!(property_data_address(&zmachine, 1, 5), 0);
        assert_ok_eq!(property_length(&zmachine, 0), 0);
    }

    #[test]
    fn test_property_data_address_and_length_v5() {
        let zmachine = objects(5);
        assert_ok_eq!(property_data_address(&zmachine, 1, 20), 0x309);
        assert_ok_eq!(property_length(&zmachine, 0x309), 4);
        assert_ok_eq!(property_data_address(&zmachine, 1, 15), 0x30E);
        assert_ok_eq!(property_length(&zmachine, 0x30E), 2);
        assert_ok_eq!(property_data_address(&zmachine, 1, 4), 0x311);
        assert_ok_eq!(property_length(&zmachine, 0x311), 1);
    }

    #[test]
    fn test_property_length_64() {
        let mut map = test_map(5);
        map[0x301] = 0x80 | 0x07;
        map[0x302] = 0x80;
        let zmachine = mock_zmachine(map);
        assert_ok_eq!(property_length(&zmachine, 0x303), 64);
    }

    #[test]
    fn test_next_property() {
        let zmachine = objects(3);
        assert_ok_eq!(next_property(&zmachine, 1, 0), 20);
        assert_ok_eq!(next_property(&zmachine, 1, 20), 15);
        assert_ok_eq!(next_property(&zmachine, 1, 15), 4);
        assert_ok_eq!(next_property(&zmachine, 1, 4), 0);
        assert_ok_eq!(next_property(&zmachine, 2, 0), 0);
        assert!(next_property(&zmachine, 1, 7).is_err());
        assert_ok_eq!(properties(&zmachine, 1), vec![20, 15, 4]);
    }

    #[test]
    fn test_property_ascending_order() {
        for version in [3, 5] {
            let mut map = test_map(version);
            mock_default_properties(&mut map);
            mock_object(&mut map, 1, vec![], (0, 0, 0));
            mock_properties(&mut map, 1, &[(5, &vec![0x11]), (10, &vec![0x22])]);
            let mut zmachine = mock_zmachine(map);
            assert_ok_eq!(property(&zmachine, 1, 5), 0x11);
            assert_ok_eq!(property(&zmachine, 1, 10), 0x22);
            assert!(assert_ok!(property_data_address(&zmachine, 1, 10)) > 0);
            assert_ok_eq!(next_property(&zmachine, 1, 5), 10);
            assert_ok_eq!(next_property(&zmachine, 1, 10), 0);
            assert_ok!(set_property(&mut zmachine, 1, 10, 0x33));
            assert_ok_eq!(property(&zmachine, 1, 10), 0x33);
            // Missing properties still fall back to the default
            assert_ok_eq!(property(&zmachine, 1, 7), 0x0606);
        }
    }

    #[test]
    fn test_set_property() {
        let mut zmachine = objects(5);
        assert_ok!(set_property(&mut zmachine, 1, 15, 0x1122));
        assert_ok_eq!(property(&zmachine, 1, 15), 0x1122);
        assert_ok!(set_property(&mut zmachine, 1, 4, 0x1234));
        assert_ok_eq!(property(&zmachine, 1, 4), 0x34);
        assert_ok!(set_property(&mut zmachine, 1, 20, 0xFFFF));
        assert_ok_eq!(property(&zmachine, 1, 20), 0xFFFF);
        assert_ok_eq!(zmachine.read_byte(0x30B), 0x56);
        let e = set_property(&mut zmachine, 1, 9, 1).unwrap_err();
        assert!(e.is_recoverable());
        assert_eq!(e.code(), ErrorCode::InvalidObjectProperty);
    }
}
