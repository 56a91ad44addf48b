//! [Object](https://inform-fiction.org/zmachine/standards/z1point1/sect12.html) utility functions

use crate::{error::*, fatal_error, zmachine::ZMachine};

pub mod attribute;
pub mod property;

/// Largest object number for V1-3
const MAX_OBJECTS_V3: usize = 255;
/// Largest object number for V4+
const MAX_OBJECTS_V4: usize = 65535;

/// Gets the (offset, size) of object table entries, where the offset skips the property defaults table
fn table_layout(version: u8) -> (usize, usize) {
    if version < 4 {
        (62, 9)
    } else {
        (126, 14)
    }
}

/// Gets the byte address of an object's table entry
///
/// If `object` is 0, 0 is returned.
///
/// # Arguments
/// * `zmachine` - Reference to the zmachine
/// * `object` - Object number
///
/// # Returns
/// [Result] with the byte address of the object table entry, 0, or a [RuntimeError]
fn object_address(zmachine: &ZMachine, object: usize) -> Result<usize, RuntimeError> {
    if object == 0 {
        Ok(0)
    } else {
        let max = if zmachine.version() < 4 {
            MAX_OBJECTS_V3
        } else {
            MAX_OBJECTS_V4
        };
        if object > max {
            return fatal_error!(
                ErrorCode::InvalidObjectTree,
                "Object number {} out of range 1-{}",
                object,
                max
            );
        }
        let table = zmachine.header().object_table();
        let (offset, size) = table_layout(zmachine.version());

        Ok(table + offset + (size * (object - 1)))
    }
}

/// Gets an object's relative (sibling, child, or parent)
///
/// If `object` is 0, 0 is returned.
///
/// # Arguments
/// * `zmachine` - Reference to the zmachine
/// * `object` - Object number
/// * `offset` - Byte offset of the relative data in the object's table entry
///
/// # Returns
/// [Result] with the relative object number, 0, or a [RuntimeError]
fn relative(zmachine: &ZMachine, object: usize, offset: usize) -> Result<usize, RuntimeError> {
    if object == 0 {
        Ok(0)
    } else {
        let object_address = object_address(zmachine, object)?;

        if zmachine.version() < 4 {
            Ok(zmachine.read_byte(object_address + offset)? as usize)
        } else {
            Ok(zmachine.read_word(object_address + offset)? as usize)
        }
    }
}

/// Gets an object's parent
///
/// If `object` is 0, 0 is returned
///
/// # Arguments
/// * `zmachine` - Reference to the zmachine
/// * `object` - Object number
///
/// # Returns
/// [Result] with the parent object number, 0 or a [RuntimeError]
pub fn parent(zmachine: &ZMachine, object: usize) -> Result<usize, RuntimeError> {
    let offset = if zmachine.version() < 4 { 4 } else { 6 };
    relative(zmachine, object, offset)
}

/// Gets an object's first child
///
/// If `object` is 0, 0 is returned
///
/// # Arguments
/// * `zmachine` - Reference to the zmachine
/// * `object` - Object number
///
/// # Returns
/// [Result] with the child object number, 0 or a [RuntimeError]
pub fn child(zmachine: &ZMachine, object: usize) -> Result<usize, RuntimeError> {
    let offset = if zmachine.version() < 4 { 6 } else { 10 };
    relative(zmachine, object, offset)
}

/// Gets an object's next sibling
///
/// If `object` is 0, 0 is returned
///
/// # Arguments
/// * `zmachine` - Reference to the zmachine
/// * `object` - Object number
///
/// # Returns
/// [Result] with the sibling object number, 0 or a [RuntimeError]
pub fn sibling(zmachine: &ZMachine, object: usize) -> Result<usize, RuntimeError> {
    let offset = if zmachine.version() < 4 { 5 } else { 8 };
    relative(zmachine, object, offset)
}

/// Sets the relative (parent, child, sibling) of an object
///
/// # Arguments
/// * `zmachine` - Reference to the zmachine
/// * `offset` - Byte offset of the relative data in the object's table entry
/// * `object` - Object number
/// * `relative` - New relative object number
///
/// # Returns
/// Empty [Result] or a [RuntimeError]
fn set_relative(
    zmachine: &mut ZMachine,
    offset: usize,
    object: usize,
    relative: usize,
) -> Result<(), RuntimeError> {
    if object == 0 {
        return fatal_error!(
            ErrorCode::InvalidObjectTree,
            "Can't set a relative of object 0"
        );
    }

    let object_address = object_address(zmachine, object)?;

    if zmachine.version() < 4 {
        zmachine.write_byte(object_address + offset, relative as u8)
    } else {
        zmachine.write_word(object_address + offset, relative as u16)
    }
}

/// Sets the parent of an object.
///
/// This function only updates the `object` table entry and does *not* remove the `object`
/// from its previous parent or otherwise update the object tree.
///
/// # Arguments
/// * `zmachine` - Reference to the zmachine
/// * `object` - Object number
/// * `parent` - New parent object number
///
/// # Returns
/// Empty [Result] or a [RuntimeError]
pub fn set_parent(
    zmachine: &mut ZMachine,
    object: usize,
    parent: usize,
) -> Result<(), RuntimeError> {
    let offset = if zmachine.version() < 4 { 4 } else { 6 };
    set_relative(zmachine, offset, object, parent)
}

/// Sets the child of an object.
///
/// This function only updates the `object` table entry and does *not* update the sibling
/// of the new `child` object or otherwise update the object tree.
///
/// # Arguments
/// * `zmachine` - Reference to the zmachine
/// * `object` - Object number
/// * `child` - New child object number
///
/// # Returns
/// Empty [Result] or a [RuntimeError]
pub fn set_child(zmachine: &mut ZMachine, object: usize, child: usize) -> Result<(), RuntimeError> {
    let offset = if zmachine.version() < 4 { 6 } else { 10 };
    set_relative(zmachine, offset, object, child)
}

/// Sets the next sibling of an object.
///
/// This function only updates the `object` table entry and does *not* update the new `sibling`
/// or otherwise update the object tree.
///
/// # Arguments
/// * `zmachine` - Reference to the zmachine
/// * `object` - Object number
/// * `sibling` - New sibling object number
///
/// # Returns
/// Empty [Result] or a [RuntimeError]
pub fn set_sibling(
    zmachine: &mut ZMachine,
    object: usize,
    sibling: usize,
) -> Result<(), RuntimeError> {
    let offset = if zmachine.version() < 4 { 5 } else { 8 };
    set_relative(zmachine, offset, object, sibling)
}

/// Detach an object from its parent.
///
/// The object keeps its own children.
///
/// # Arguments
/// * `zmachine` - Reference to the zmachine
/// * `object` - Object number
///
/// # Returns
/// Empty [Result] or a [RuntimeError]
pub fn remove(zmachine: &mut ZMachine, object: usize) -> Result<(), RuntimeError> {
    if object == 0 {
        return Ok(());
    }

    let parent = parent(zmachine, object)?;
    if parent == 0 {
        return Ok(());
    }

    let next = sibling(zmachine, object)?;
    let first = child(zmachine, parent)?;
    if first == object {
        set_child(zmachine, parent, next)?;
    } else {
        let mut previous = first;
        let mut steps = 0;
        loop {
            if previous == 0 {
                return fatal_error!(
                    ErrorCode::InvalidObjectTree,
                    "Object {} not found in the children of its parent {}",
                    object,
                    parent
                );
            }
            let s = sibling(zmachine, previous)?;
            if s == object {
                set_sibling(zmachine, previous, next)?;
                break;
            }
            previous = s;
            steps += 1;
            if steps > MAX_OBJECTS_V4 {
                return fatal_error!(
                    ErrorCode::InvalidObjectTree,
                    "Sibling chain of object {} loops",
                    parent
                );
            }
        }
    }

    debug!(target: "app::state", "Remove object {} from parent {}", object, parent);
    set_parent(zmachine, object, 0)?;
    set_sibling(zmachine, object, 0)
}

/// Move an object to be the first child of another object
///
/// # Arguments
/// * `zmachine` - Reference to the zmachine
/// * `object` - Object number
/// * `destination` - New parent object number
///
/// # Returns
/// Empty [Result] or a [RuntimeError]
pub fn insert(
    zmachine: &mut ZMachine,
    object: usize,
    destination: usize,
) -> Result<(), RuntimeError> {
    if object == 0 || destination == 0 {
        return fatal_error!(
            ErrorCode::InvalidObjectTree,
            "Can't insert object {} into object {}",
            object,
            destination
        );
    }

    remove(zmachine, object)?;
    let first = child(zmachine, destination)?;
    set_sibling(zmachine, object, first)?;
    set_child(zmachine, destination, object)?;
    set_parent(zmachine, object, destination)?;
    debug!(target: "app::state", "Insert object {} into {}", object, destination);
    Ok(())
}

/// Count the objects in the object table.
///
/// The table has no explicit length, so it's taken to end where the first property table starts.
///
/// # Arguments
/// * `zmachine` - Reference to the zmachine
///
/// # Returns
/// [Result] with the number of objects or a [RuntimeError]
pub fn object_count(zmachine: &ZMachine) -> Result<usize, RuntimeError> {
    let (_, size) = table_layout(zmachine.version());
    let max = if zmachine.version() < 4 {
        MAX_OBJECTS_V3
    } else {
        MAX_OBJECTS_V4
    };
    let mut lowest_property_table = zmachine.memory_size();
    let mut count = 0;
    for object in 1..=max {
        let address = object_address(zmachine, object)?;
        if address + size > lowest_property_table {
            break;
        }
        let property_table = property::property_table_address(zmachine, object)?;
        if property_table == 0 || property_table >= zmachine.memory_size() {
            break;
        }
        lowest_property_table = usize::min(lowest_property_table, property_table);
        count = object;
    }

    Ok(count)
}
