//! The scan primitive: copying a raw JSON payload into a caller destination.
//!
//! Typed accessors use [`scan`] for raw-byte and raw-JSON targets and fall
//! back to the generic decoder for everything else. Raw targets always
//! receive storage of their own; a scanned buffer never aliases a feed's
//! internal buffer, so later feed advances cannot mutate it.

use serde::de::DeserializeOwned;
use serde_json::value::RawValue;
use std::any::Any;

use crate::error::{Error, Result};

/// Copies `raw` into `dest`.
///
/// - A `Vec<u8>` destination receives a fresh buffer holding the raw JSON
///   text, byte for byte.
/// - A `Box<RawValue>` destination receives an owned copy of the raw JSON.
/// - Any other destination is filled by decoding the JSON.
///
/// # Errors
///
/// A `None` destination fails with the [`Error::NilPointer`] sentinel; the
/// decode path fails with a serialization error on malformed or mismatched
/// JSON.
pub fn scan<T>(dest: Option<&mut T>, raw: &RawValue) -> Result<()>
where
    T: DeserializeOwned + 'static,
{
    let dest = dest.ok_or(Error::NilPointer)?;
    {
        let any: &mut dyn Any = &mut *dest;
        if let Some(buf) = any.downcast_mut::<Vec<u8>>() {
            let mut fresh = Vec::with_capacity(raw.get().len());
            fresh.extend_from_slice(raw.get().as_bytes());
            *buf = fresh;
            return Ok(());
        }
        if let Some(raw_dest) = any.downcast_mut::<Box<RawValue>>() {
            *raw_dest = raw.to_owned();
            return Ok(());
        }
    }
    *dest = serde_json::from_str(raw.get())?;
    Ok(())
}
