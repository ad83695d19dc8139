//! UUID validation for record ids

use uuid::Uuid;

use crate::{Error, Result};

/// Parse `id` as a UUID and return its canonical lowercase hyphenated form.
pub fn canonical(id: &str) -> Result<String> {
    Uuid::parse_str(id.trim())
        .map(|uuid| uuid.hyphenated().to_string())
        .map_err(|_| Error::InvalidId { id: id.to_string() })
}

/// Generate a fresh random id.
pub fn generate() -> String {
    Uuid::new_v4().hyphenated().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_lowercases_and_trims() {
        let id = canonical(" 6F9619FF-8B86-D011-B42D-00C04FC964FF ").unwrap();
        assert_eq!(id, "6f9619ff-8b86-d011-b42d-00c04fc964ff");
    }

    #[test]
    fn canonical_rejects_non_uuid() {
        assert!(matches!(canonical("not-a-uuid"), Err(Error::InvalidId { .. })));
    }

    #[test]
    fn generated_ids_are_canonical() {
        let id = generate();
        assert_eq!(canonical(&id).unwrap(), id);
    }
}
