//! Pretty JSON rendering.

use std::io::Write;

use serde::Serialize;

use crate::AppError;

pub(super) fn write<T: Serialize, W: Write>(report: &T, out: &mut W) -> Result<(), AppError> {
    serde_json::to_writer_pretty(&mut *out, report).map_err(AppError::SerialiseReport)?;
    writeln!(out)?;
    Ok(())
}
