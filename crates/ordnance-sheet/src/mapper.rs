//! Column → [`Weapon`] mapping.
//!
//! Row labels are reduced to a key (the text before the first `:`) and looked
//! up in the declarative table behind [`WeaponParams::assign`]. `Name` and
//! `Additional Notes` feed the identity fields instead.
//!
//! [`WeaponParams::assign`]: ordnance_core::weapon::WeaponParams::assign

use ordnance_core::weapon::Weapon;

use crate::{Error, Result};

/// Key of the row holding the weapon's display name.
pub const NAME_KEY: &str = "Name";
/// Key of the row holding free-text notes.
pub const NOTES_KEY: &str = "Additional Notes";

/// Reduce a row label to its lookup key: `"Mass: [kg]"` → `"Mass"`.
pub fn column_key(label: &str) -> &str {
  let label = label.trim();
  match label.split_once(':') {
    Some((key, _)) => key.trim(),
    None => label,
  }
}

/// Map column `column` of `rows` to a weapon tagged with `category`.
///
/// Blank cells leave the corresponding attribute unset; unknown labels are
/// ignored. Fails if the grid is empty or `column` is not a weapon column.
pub fn map_column(rows: &[Vec<String>], category: &str, column: usize) -> Result<Weapon> {
  let width = rows.first().map_or(0, Vec::len);
  if rows.is_empty() || column == 0 || column >= width {
    return Err(Error::InvalidData(format!(
      "column {column} is outside the sheet (width {width})"
    )));
  }

  let mut weapon = Weapon::new("", category);

  for row in rows {
    let Some(label) = row.first() else { continue };
    let Some(value) = row.get(column).map(|v| v.trim()).filter(|v| !v.is_empty())
    else {
      continue;
    };

    match column_key(label) {
      NAME_KEY => weapon.name = value.to_owned(),
      NOTES_KEY => weapon.notes = value.to_owned(),
      key => {
        weapon.params.assign(key, value.to_owned());
      }
    }
  }

  Ok(weapon)
}
