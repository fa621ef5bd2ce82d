use argon2::{Algorithm, Argon2, Params, Version};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::HASH_LEN;
use crate::error::PasswordError;

/// Largest memory cost accepted, 2 GiB.
pub const MAX_MEM_COST_KIB: u32 = 2 * 1024 * 1024;
/// Largest iteration count accepted.
pub const MAX_TIME_COST: u32 = 64;
/// Largest lane count accepted.
pub const MAX_PARALLELISM: u32 = 64;

/// Argon2id cost parameters.
///
/// Embedded in every password record, so changing the values used for new
/// hashes never breaks verification of old ones. Costs are capped so a
/// corrupted record cannot make verification allocate or spin without bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argon2Params {
    mem_cost_kib: u32,
    time_cost: u32,
    parallelism: u32,
}

impl Default for Argon2Params {
    fn default() -> Self {
        Self {
            // 19 MiB
            mem_cost_kib: 19 * 1024,
            time_cost: 2,
            parallelism: 1,
        }
    }
}

impl Argon2Params {
    pub fn new(mem_cost_kib: u32, time_cost: u32, parallelism: u32) -> Result<Self, PasswordError> {
        let params = Self {
            mem_cost_kib,
            time_cost,
            parallelism,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn mem_cost_kib(&self) -> u32 {
        self.mem_cost_kib
    }

    pub fn time_cost(&self) -> u32 {
        self.time_cost
    }

    pub fn parallelism(&self) -> u32 {
        self.parallelism
    }

    pub fn validate(&self) -> Result<(), PasswordError> {
        if self.mem_cost_kib < Params::MIN_M_COST {
            return Err(invalid("memory cost too low"));
        }
        if self.time_cost < Params::MIN_T_COST {
            return Err(invalid("time cost must be >= 1"));
        }
        if self.parallelism < Params::MIN_P_COST {
            return Err(invalid("parallelism must be >= 1"));
        }
        if self.mem_cost_kib > MAX_MEM_COST_KIB {
            return Err(invalid("memory cost above 2 GiB"));
        }
        if self.time_cost > MAX_TIME_COST {
            return Err(invalid("time cost above 64"));
        }
        if self.parallelism > MAX_PARALLELISM {
            return Err(invalid("parallelism above 64"));
        }
        if self.mem_cost_kib < self.parallelism.saturating_mul(8) {
            return Err(invalid("memory cost must be at least 8 * parallelism"));
        }
        Ok(())
    }

    /// Runs Argon2id v0x13 over `password` and `salt`.
    pub(crate) fn derive(
        &self,
        password: &[u8],
        salt: &[u8],
    ) -> Result<Zeroizing<[u8; HASH_LEN]>, PasswordError> {
        self.validate()?;

        let params = Params::new(
            self.mem_cost_kib,
            self.time_cost,
            self.parallelism,
            Some(HASH_LEN),
        )
        .map_err(|e| PasswordError::InvalidParams(e.to_string()))?;

        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

        let mut key = Zeroizing::new([0u8; HASH_LEN]);
        argon2
            .hash_password_into(password, salt, &mut key[..])
            .map_err(|e| PasswordError::Derivation(e.to_string()))?;

        Ok(key)
    }
}

fn invalid(reason: &str) -> PasswordError {
    PasswordError::InvalidParams(reason.to_string())
}
