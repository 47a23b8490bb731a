use indexmap::IndexMap;

use crate::core::ZoneResolver;
use crate::error::{DashError, DashResult};
use crate::render::PaletteEntry;

pub(super) fn validate_zone_aliases(aliases: &IndexMap<String, String>) -> DashResult<()> {
    if aliases.is_empty() {
        return Err(DashError::InvalidConfig(
            "zone alias table must not be empty".to_owned(),
        ));
    }
    ZoneResolver::from_pairs(aliases).map(|_| ())
}

pub(super) fn validate_palette(palette: &[PaletteEntry]) -> DashResult<()> {
    for (index, entry) in palette.iter().enumerate() {
        if entry.name.trim().is_empty() {
            return Err(DashError::InvalidConfig(format!(
                "palette entry {index} must have a non-empty name"
            )));
        }
        entry.color.validate()?;
        if palette[..index].iter().any(|prior| prior.name == entry.name) {
            return Err(DashError::InvalidConfig(format!(
                "palette lists series `{}` more than once",
                entry.name
            )));
        }
    }
    Ok(())
}
