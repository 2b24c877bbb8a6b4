use super::Record;

/// Width of the street column in the fixed-layout address strings
pub const STREET_FIELD_WIDTH: usize = 50;
/// Addresses are right-padded to at least this many characters before slicing
pub const MIN_PADDED_LENGTH: usize = 65;

/// A parsed postal address. Every component is always present, possibly empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

impl Address {
    /// Write the four components into `record` as `<prefix>.street`, `<prefix>.city`, ...
    pub fn write_into(self, record: &mut Record, prefix: &str) {
        record.insert(format!("{prefix}.street"), self.street.into());
        record.insert(format!("{prefix}.city"), self.city.into());
        record.insert(format!("{prefix}.state"), self.state.into());
        record.insert(format!("{prefix}.zip"), self.zip.into());
    }
}

/// Extract street/city/state/zip from `<street padded to 50><city>, <state> <zip>`.
///
/// Best effort: short, empty or delimiter-less input never fails, missing
/// components come back as empty strings. Offsets count characters, not bytes.
pub fn extract_address(raw: &str) -> Address {
    let mut chars: Vec<char> = raw.chars().collect();
    if chars.len() < MIN_PADDED_LENGTH {
        chars.resize(MIN_PADDED_LENGTH, ' ');
    }

    let street: String = chars[..STREET_FIELD_WIDTH].iter().collect();
    let csz: String = chars[STREET_FIELD_WIDTH..].iter().collect();

    // trailing separators guarantee at least two parts from each split
    let csz = format!("{csz},");
    let mut parts = csz.split(',');
    let city = parts.next().unwrap_or_default();
    let state_zip = parts.next().unwrap_or_default();

    let state_zip = format!("{} ", state_zip.trim());
    let mut parts = state_zip.split(' ');
    let state = parts.next().unwrap_or_default();
    let zip = parts.next().unwrap_or_default();

    Address {
        street: street.trim().to_string(),
        city: city.trim().to_string(),
        state: state.trim().to_string(),
        zip: zip.trim().to_string(),
    }
}
