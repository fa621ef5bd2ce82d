use getrandom::fill;

use super::SALT_LEN;
use crate::error::PasswordError;

/// Fresh salt from the OS random generator. There is no fallback source.
pub(crate) fn generate_salt() -> Result<[u8; SALT_LEN], PasswordError> {
    let mut salt = [0u8; SALT_LEN];
    fill(&mut salt).map_err(|_| PasswordError::RandomSource)?;
    Ok(salt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn salts_are_not_reused() {
        let a = generate_salt().unwrap();
        let b = generate_salt().unwrap();
        assert_ne!(a, b);
    }
}
